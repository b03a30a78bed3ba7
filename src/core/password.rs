use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::core::config::data::path_display;
use crate::core::config::Config;
use crate::core::keyring::{self, KeyringAccessError};
use crate::core::startup::StartupError;

pub const PASSWORD_ENV_VAR: &str = "YCCOACH_PASSWORD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordOrigin {
    Environment,
    Keyring,
    File(PathBuf),
}

impl fmt::Display for PasswordOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordOrigin::Environment => write!(f, "${PASSWORD_ENV_VAR}"),
            PasswordOrigin::Keyring => write!(f, "system keyring"),
            PasswordOrigin::File(path) => write!(f, "{}", path_display(path)),
        }
    }
}

/// The password that unlocks the chat. Never printed.
#[derive(Clone)]
pub struct ExpectedPassword {
    value: String,
    origin: PasswordOrigin,
}

impl ExpectedPassword {
    /// Surrounding whitespace is ignored; an empty password is refused.
    pub fn new(value: &str, origin: PasswordOrigin) -> Option<Self> {
        let value = value.trim();
        (!value.is_empty()).then(|| Self {
            value: value.to_string(),
            origin,
        })
    }

    pub fn matches(&self, submitted: &str) -> bool {
        submitted.trim() == self.value
    }

    pub fn origin(&self) -> &PasswordOrigin {
        &self.origin
    }
}

impl fmt::Debug for ExpectedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpectedPassword")
            .field("value", &"<redacted>")
            .field("origin", &self.origin)
            .finish()
    }
}

/// Environment first, then the keyring, then the configured password file.
pub fn resolve_password(config: &Config) -> Result<ExpectedPassword, StartupError> {
    resolve_from(
        std::env::var(PASSWORD_ENV_VAR).ok(),
        keyring::load_password,
        config.password_file.as_deref(),
    )
}

fn resolve_from(
    env_value: Option<String>,
    keyring_lookup: impl FnOnce() -> Result<Option<String>, KeyringAccessError>,
    password_file: Option<&Path>,
) -> Result<ExpectedPassword, StartupError> {
    if let Some(password) = env_value
        .as_deref()
        .and_then(|value| ExpectedPassword::new(value, PasswordOrigin::Environment))
    {
        return Ok(password);
    }

    match keyring_lookup() {
        Ok(Some(value)) => {
            if let Some(password) = ExpectedPassword::new(&value, PasswordOrigin::Keyring) {
                return Ok(password);
            }
        }
        Ok(None) => {}
        Err(err) if err.is_recoverable() => {
            warn!(error = %err, "keyring unavailable, trying the password file");
        }
        Err(err) => return Err(StartupError::password_source("the system keyring", err)),
    }

    if let Some(path) = password_file {
        let contents = fs::read_to_string(path)
            .map_err(|err| StartupError::password_source(&path_display(path), err))?;
        let first_line = contents.lines().next().unwrap_or_default();
        if let Some(password) =
            ExpectedPassword::new(first_line, PasswordOrigin::File(path.to_path_buf()))
        {
            return Ok(password);
        }
    }

    Err(StartupError::missing_password())
}
