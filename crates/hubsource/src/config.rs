use std::path::Path;
use std::time::Duration;

use hubsource_core::options::{collect_filters, PluginOptions};
use hubsource_core::query::DEFAULT_API_BASE;

use crate::prelude::*;

/// Default per-request timeout, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything a sourcing run needs
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub options: PluginOptions,
    pub base_url: String,
    pub timeout: Duration,
    /// Treat a failed topic fetch as fatal instead of continuing without topics
    pub strict_topics: bool,
}

impl SourceConfig {
    pub fn new(options: PluginOptions) -> Self {
        Self {
            options,
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            strict_topics: false,
        }
    }

    /// Build the configuration from global CLI flags.
    ///
    /// Options are layered: the TOML file (if any) first, then `--key` /
    /// `HUBSPOT_API_KEY`, then `--filter` flags. The key is not validated here;
    /// that happens right before the first request.
    pub fn from_global(global: &crate::Global) -> Result<Self> {
        let file_options = match &global.config {
            Some(path) => load_options_file(path)?,
            None => PluginOptions::default(),
        };

        let cli_options = PluginOptions {
            key: global.key.clone(),
            filters: collect_filters(&global.filters)?,
        };

        Ok(Self {
            base_url: global.base_url.clone(),
            timeout: Duration::from_secs(global.timeout),
            strict_topics: global.strict_topics,
            ..Self::new(file_options.merge(cli_options))
        })
    }
}

/// Read plugin options from a TOML file
pub fn load_options_file(path: &Path) -> Result<PluginOptions> {
    let contents = std::fs::read_to_string(path)
        .wrap_err_with(|| f!("Failed to read config file {}", path.display()))?;

    PluginOptions::from_toml_str(&contents)
        .wrap_err_with(|| f!("Failed to load config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn global() -> crate::Global {
        crate::Global {
            config: None,
            key: None,
            filters: Vec::new(),
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            strict_topics: false,
            verbose: false,
        }
    }

    #[test]
    fn test_load_options_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "key = \"from-file\"\n\n[filters]\nstate = \"PUBLISHED\"").unwrap();

        let options = load_options_file(file.path()).unwrap();
        assert_eq!(options.key.as_deref(), Some("from-file"));
        assert_eq!(options.filters["state"], json!("PUBLISHED"));
    }

    #[test]
    fn test_load_options_file_missing() {
        let result = load_options_file(Path::new("/definitely/not/here.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_global_cli_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "key = \"from-file\"\n\n[filters]\nstate = \"DRAFT\"\nlimit = 5"
        )
        .unwrap();

        let mut global = global();
        global.config = Some(file.path().to_path_buf());
        global.key = Some("from-cli".to_string());
        global.filters = vec!["state=PUBLISHED".to_string()];
        global.timeout = 5;
        global.strict_topics = true;

        let config = SourceConfig::from_global(&global).unwrap();
        assert_eq!(config.options.key.as_deref(), Some("from-cli"));
        assert_eq!(config.options.filters["state"], json!("PUBLISHED"));
        assert_eq!(config.options.filters["limit"], json!(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.strict_topics);
    }

    #[test]
    fn test_from_global_without_key_is_not_an_error_yet() {
        let config = SourceConfig::from_global(&global()).unwrap();
        assert!(config.options.key.is_none());
        assert_eq!(config.base_url, DEFAULT_API_BASE);
    }

    #[test]
    fn test_from_global_rejects_bad_filter() {
        let mut global = global();
        global.filters = vec!["nonsense".to_string()];
        assert!(SourceConfig::from_global(&global).is_err());
    }
}
