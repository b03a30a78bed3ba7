//! Completion backends.
//!
//! The controller only sees [`CompletionBackend`]. Which implementation sits
//! behind it is decided once at startup from configuration: the HTTP client
//! for a deployed endpoint, or the offline mock coach.

mod http;
mod mock;

pub use http::HttpBackend;
pub use mock::MockBackend;

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{CompletionRequest, CompletionResponse};
use crate::core::config::{BackendKind, Config};
use crate::core::startup::StartupError;

#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, BackendError>;

    /// Short label for the title bar, e.g. the endpoint host.
    fn describe(&self) -> String;
}

/// Why an exchange failed. Only ever logged; the user sees one generic text.
#[derive(Debug)]
pub enum BackendError {
    Transport(reqwest::Error),
    Status { status: u16, detail: Option<String> },
    Malformed(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Transport(err) => write!(f, "request failed: {err}"),
            BackendError::Status {
                status,
                detail: Some(detail),
            } => write!(f, "endpoint returned HTTP {status}: {detail}"),
            BackendError::Status {
                status,
                detail: None,
            } => write!(f, "endpoint returned HTTP {status}"),
            BackendError::Malformed(reason) => write!(f, "malformed response body: {reason}"),
        }
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BackendError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

/// Builds the backend selected by `config`. `force_mock` comes from `--mock`.
pub fn build_backend(
    config: &Config,
    force_mock: bool,
) -> Result<Arc<dyn CompletionBackend>, StartupError> {
    let kind = if force_mock {
        BackendKind::Mock
    } else {
        config.effective_backend()
    };

    match kind {
        BackendKind::Mock => Ok(Arc::new(MockBackend::new(config.mock_latency()))),
        BackendKind::Http => {
            let endpoint = config.endpoint().ok_or_else(StartupError::missing_endpoint)?;
            let backend = HttpBackend::new(&endpoint, config.api_key.clone())?;
            Ok(Arc::new(backend))
        }
    }
}
