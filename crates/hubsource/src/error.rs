use hubsource_core::error::{ConfigError, TransformError};

#[derive(thiserror::Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Received bad response from Hubspot API ({endpoint}): HTTP {status}")]
    Upstream { endpoint: &'static str, status: u16 },

    #[error("Network error while fetching {endpoint}: {message}")]
    Network {
        endpoint: &'static str,
        message: String,
    },

    #[error("Failed to parse {endpoint} response: {message}")]
    Parse {
        endpoint: &'static str,
        message: String,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error(transparent)]
    Transform(#[from] TransformError),
}
