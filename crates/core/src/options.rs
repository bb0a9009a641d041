//! Plugin options and their validation
//!
//! Options mirror what a site configuration hands to the source plugin: an API
//! key and an optional set of filters that end up in the post-list query
//! string. Options can be layered (file, environment, command line) with
//! [`PluginOptions::merge`] and must pass [`PluginOptions::validate`] before
//! any request is issued.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Query parameters appended to the post-list request, keyed by name.
///
/// A `BTreeMap` keeps the keys sorted so the rendered query string is stable.
pub type Filters = BTreeMap<String, serde_json::Value>;

/// Raw, possibly incomplete plugin options
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct PluginOptions {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub filters: Filters,
}

/// Options that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOptions {
    pub key: String,
    pub filters: Filters,
}

impl PluginOptions {
    /// Parse options from a TOML document
    ///
    /// ```toml
    /// key = "my-hapikey"
    ///
    /// [filters]
    /// state = "PUBLISHED"
    /// content_group_id = 12345
    /// ```
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        toml::from_str::<toml::Value>(input)
            .map_err(|e| ConfigError::InvalidOptions(e.to_string()))
            .and_then(|value| {
                // Round-trip through JSON so filter values land as `serde_json::Value`.
                let json = serde_json::to_value(value)
                    .map_err(|e| ConfigError::InvalidOptions(e.to_string()))?;
                serde_json::from_value(json).map_err(|e| ConfigError::InvalidOptions(e.to_string()))
            })
    }

    /// Layer `other` on top of `self`.
    ///
    /// A key in `other` replaces ours; filters merge name by name with `other`
    /// winning on conflicts.
    pub fn merge(mut self, other: PluginOptions) -> Self {
        if other.key.is_some() {
            self.key = other.key;
        }
        self.filters.extend(other.filters);
        self
    }

    /// Check that the options are usable.
    ///
    /// A missing or blank key is fatal.
    pub fn validate(self) -> Result<ValidatedOptions, ConfigError> {
        let key = self
            .key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(ValidatedOptions {
            key,
            filters: self.filters,
        })
    }
}

/// Parse a `NAME=VALUE` command line filter.
///
/// The value is read as JSON when it parses as a JSON scalar or array
/// (`limit=20`, `archived=false`, `ids=[1,2]`); anything else is kept as a
/// plain string.
pub fn parse_filter(input: &str) -> Result<(String, serde_json::Value), ConfigError> {
    let (name, raw) = input
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidFilter(input.to_string()))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::InvalidFilter(input.to_string()));
    }

    let value = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) if !value.is_object() => value,
        _ => serde_json::Value::String(raw.to_string()),
    };

    Ok((name.to_string(), value))
}

/// Collect command line filters, turning repeated names into arrays.
pub fn collect_filters<I, S>(inputs: I) -> Result<Filters, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut filters = Filters::new();

    for input in inputs {
        let (name, value) = parse_filter(input.as_ref())?;
        match filters.remove(&name) {
            None => {
                filters.insert(name, value);
            }
            Some(serde_json::Value::Array(mut values)) => {
                values.push(value);
                filters.insert(name, serde_json::Value::Array(values));
            }
            Some(previous) => {
                filters.insert(name, serde_json::Value::Array(vec![previous, value]));
            }
        }
    }

    Ok(filters)
}
