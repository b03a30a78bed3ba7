//! `yccoach set` / `yccoach unset`.
//!
//! Each key is a [`FieldHandler`] that validates and writes one config
//! field. Handlers work on a `&mut Config`; [`set_setting`] and
//! [`unset_setting`] run them inside `Config::mutate` so a rejected value
//! never reaches the file.

pub mod error;
pub mod registry;

pub use error::SettingError;
pub use registry::{find_setting, SETTINGS};

use crate::core::config::Config;

/// Data-driven handler for one config key.
pub struct FieldHandler {
    pub key: &'static str,
    pub example: &'static str,
    /// Values of secret keys are never echoed back.
    pub secret: bool,
    /// Validates and stores the value, returning how to display it.
    apply: fn(&mut Config, &str) -> Result<String, SettingError>,
    clear: fn(&mut Config),
}

impl FieldHandler {
    pub fn set(&self, config: &mut Config, args: &[String]) -> Result<String, SettingError> {
        let value = args.join(" ");
        let value = value.trim();
        if value.is_empty() {
            return Err(SettingError::MissingValue {
                key: self.key,
                example: self.example,
            });
        }

        let display = (self.apply)(config, value)?;
        if self.secret {
            Ok(format!("✅ Set {} (value hidden)", self.key))
        } else {
            Ok(format!("✅ Set {} to: {display}", self.key))
        }
    }

    pub fn unset(&self, config: &mut Config) -> String {
        (self.clear)(config);
        format!("✅ Unset {}", self.key)
    }
}

pub fn set_setting(key: &str, args: &[String]) -> Result<String, SettingError> {
    let handler = find_setting(key).ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    mutate_config(|config| handler.set(config, args))
}

pub fn unset_setting(key: &str) -> Result<String, SettingError> {
    let handler = find_setting(key).ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    mutate_config(|config| Ok(handler.unset(config)))
}

/// Runs `f` under `Config::mutate`. A `SettingError` from `f` comes back
/// unchanged; anything else is a persistence failure.
fn mutate_config<F>(f: F) -> Result<String, SettingError>
where
    F: FnOnce(&mut Config) -> Result<String, SettingError>,
{
    Config::mutate(|config| f(config).map_err(Into::into)).map_err(|err| {
        match err.downcast::<SettingError>() {
            Ok(setting_error) => *setting_error,
            Err(other) => SettingError::ConfigError(other.to_string()),
        }
    })
}
