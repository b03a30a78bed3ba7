//! Diagnostic logging via `tracing`.
//!
//! Failure causes are only ever written here, never shown in the chat. The
//! full-screen UI owns stderr, so the chat logs to a file; one-shot commands
//! log to stderr.

use std::error::Error;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::core::config::io::project_dirs;

pub const LOG_ENV_VAR: &str = "YCCOACH_LOG";

pub enum DiagnosticsTarget {
    Stderr,
    File(PathBuf),
}

/// `default_level` applies when `YCCOACH_LOG` is unset or invalid.
pub fn init_diagnostics(
    target: DiagnosticsTarget,
    default_level: &str,
) -> Result<(), Box<dyn Error>> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_level));

    match target {
        DiagnosticsTarget::Stderr => tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .with(filter)
            .try_init()?,
        DiagnosticsTarget::File(path) => tracing_subscriber::registry()
            .with(file_layer(open_log_file(&path)?))
            .with(filter)
            .try_init()?,
    }
    Ok(())
}

/// Opens `path` for appending, creating missing parent directories.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file))
}

pub fn default_diagnostics_path() -> PathBuf {
    project_dirs()
        .map(|dirs| {
            dirs.state_dir()
                .unwrap_or_else(|| dirs.cache_dir())
                .to_path_buf()
        })
        .unwrap_or_else(|| std::env::temp_dir().join("yccoach"))
        .join("yccoach.log")
}
