use crate::error::ConfigError;

/// Result type for settings operations
pub type ConfigResult<T> = Result<T, ConfigError>;
