use std::time::Duration;

use crate::core::config::data::{BackendKind, Config};

pub const ENDPOINT_ENV_VAR: &str = "YCCOACH_ENDPOINT";

pub const DEFAULT_GREETING: &str = "Hi! I'm your YC application coach. Paste your current answer to \
\"What is your company going to make?\" and we'll sharpen it together.";

pub const DEFAULT_MOCK_LATENCY_MS: u64 = 600;

impl Config {
    /// Endpoint from the environment when set, otherwise from the config file.
    pub fn endpoint(&self) -> Option<String> {
        resolve_endpoint(std::env::var(ENDPOINT_ENV_VAR).ok(), self.endpoint_url.as_deref())
    }

    /// An explicit `backend` wins; otherwise a configured endpoint means HTTP.
    pub fn effective_backend(&self) -> BackendKind {
        self.backend.unwrap_or_else(|| {
            if self.endpoint().is_some() {
                BackendKind::Http
            } else {
                BackendKind::Mock
            }
        })
    }

    pub fn greeting(&self) -> &str {
        self.greeting
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or(DEFAULT_GREETING)
    }

    pub fn mock_latency(&self) -> Duration {
        Duration::from_millis(self.mock_latency_ms.unwrap_or(DEFAULT_MOCK_LATENCY_MS))
    }
}

fn resolve_endpoint(env_value: Option<String>, configured: Option<&str>) -> Option<String> {
    env_value
        .as_deref()
        .or(configured)
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}
