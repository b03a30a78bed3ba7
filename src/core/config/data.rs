use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Which completion backend the chat talks to.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// POST to `endpoint_url`.
    Http,
    /// Offline canned coaching replies.
    Mock,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Http => "http",
            BackendKind::Mock => "mock",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "http" => Some(BackendKind::Http),
            "mock" => Some(BackendKind::Mock),
            _ => None,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Full URL of the completion endpoint (e.g. an API Gateway `/chat` route)
    pub endpoint_url: Option<String>,
    /// Explicit backend choice; inferred from `endpoint_url` when unset
    pub backend: Option<BackendKind>,
    /// Sent as `x-api-key` when present
    pub api_key: Option<String>,
    /// File holding the expected login password (first line)
    pub password_file: Option<PathBuf>,
    /// Text shown at the top of a fresh chat screen
    pub greeting: Option<String>,
    /// Simulated latency of the mock backend
    pub mock_latency_ms: Option<u64>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
