use thiserror::Error;

/// Failures that stop a run before any data is examined. Data problems are
/// never errors; they are collected as findings.
#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config could not be rendered back to TOML.
    #[error("config serialize error: {0}")]
    ConfigSerialize(String),
    /// Config value out of range.
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
