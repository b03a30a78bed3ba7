//! Error types for settings operations.

use std::fmt;

/// Errors that can occur when modifying configuration settings.
#[derive(Debug)]
pub enum SettingError {
    /// The provided setting key is not recognized.
    UnknownKey(String),
    /// `set` was called without a value.
    MissingValue {
        key: &'static str,
        example: &'static str,
    },
    /// The value does not make sense for this key.
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    /// An error occurred while persisting the configuration.
    ConfigError(String),
}

impl SettingError {
    /// Print the error message to stderr with appropriate formatting.
    pub fn print(&self) {
        match self {
            SettingError::UnknownKey(key) => {
                eprintln!("❌ Unknown config key: {key}");
                eprintln!("   Run 'yccoach set' to list available keys.");
            }
            SettingError::MissingValue { key, example } => {
                eprintln!("⚠️  Provide a value for {key}.");
                eprintln!("Example: {example}");
            }
            SettingError::InvalidValue { key, value, reason } => {
                eprintln!("❌ Invalid value for {key}: '{value}' ({reason})");
            }
            SettingError::ConfigError(msg) => {
                eprintln!("❌ Failed to save configuration: {msg}");
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => write!(f, "Unknown config key: {key}"),
            SettingError::MissingValue { key, .. } => write!(f, "Missing value for {key}"),
            SettingError::InvalidValue { key, value, reason } => {
                write!(f, "Invalid value for {key}: '{value}' ({reason})")
            }
            SettingError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for SettingError {}
