//! Error types for the functional core

/// Configuration problems detected before any request is made
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("No Hubspot API key provided")]
    MissingApiKey,

    #[error("Invalid filter {0:?}: expected NAME=VALUE")]
    InvalidFilter(String),

    #[error("Invalid options file: {0}")]
    InvalidOptions(String),
}

/// Failures while shaping records into nodes
#[derive(thiserror::Error, Debug)]
pub enum TransformError {
    #[error("Failed to serialize {kind} {id}: {source}")]
    Serialize {
        kind: &'static str,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialized {0} is not a JSON object")]
    NotAnObject(&'static str),
}
