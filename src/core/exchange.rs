use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tokio::sync::mpsc;
use tracing::debug;

use crate::api::{CompletionRequest, CompletionResponse};
use crate::core::backend::CompletionBackend;

/// Result of one dispatched request, delivered back to the event loop.
#[derive(Debug, Clone)]
pub enum ExchangeOutcome {
    Reply(CompletionResponse),
    /// Diagnostic description of the failure. Never shown verbatim.
    Failed(String),
}

pub type ExchangeReceiver = mpsc::UnboundedReceiver<(ExchangeOutcome, u64)>;

/// Runs completion requests off the UI task and reports back by exchange id.
#[derive(Clone)]
pub struct ExchangeService {
    tx: mpsc::UnboundedSender<(ExchangeOutcome, u64)>,
}

impl ExchangeService {
    pub fn new() -> (Self, ExchangeReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn(
        &self,
        backend: Arc<dyn CompletionBackend>,
        request: CompletionRequest,
        exchange_id: u64,
    ) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = run_exchange(backend.as_ref(), &request).await;
            if tx.send((outcome, exchange_id)).is_err() {
                debug!(exchange_id, "exchange finished after the chat loop closed");
            }
        });
    }
}

/// A panicking backend still produces an outcome, so the caller always gets
/// to leave the busy state.
pub async fn run_exchange(
    backend: &dyn CompletionBackend,
    request: &CompletionRequest,
) -> ExchangeOutcome {
    match AssertUnwindSafe(backend.complete(request))
        .catch_unwind()
        .await
    {
        Ok(Ok(response)) => ExchangeOutcome::Reply(response),
        Ok(Err(err)) => ExchangeOutcome::Failed(err.to_string()),
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            ExchangeOutcome::Failed(format!("backend panicked: {reason}"))
        }
    }
}
