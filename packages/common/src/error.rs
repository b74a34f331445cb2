use thiserror::Error;

/// Errors raised at the settings-application boundary.
///
/// These never abort a compilation pass: the caller keeps the previous
/// settings and reports the message.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    #[error("Invalid value for setting '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
