//! Persisted "unlocked" flag.
//!
//! The flag outlives a restart of the program inside the same shell session
//! but not a new shell or a reboot. On disk it is a file holding the id of
//! the shell that launched us; a mismatching id reads as "not authenticated".

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::config::io::project_dirs;

pub trait SessionStore: Send {
    fn is_authenticated(&self) -> bool;
    fn persist_authenticated(&mut self) -> io::Result<()>;
    fn clear(&mut self) -> io::Result<()>;
}

pub struct FileSessionStore {
    path: PathBuf,
    session_id: String,
}

impl FileSessionStore {
    pub fn new() -> Self {
        Self::at(default_session_path(), current_session_id())
    }

    pub fn at(path: impl Into<PathBuf>, session_id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            session_id: session_id.into(),
        }
    }
}

impl Default for FileSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for FileSessionStore {
    fn is_authenticated(&self) -> bool {
        fs::read_to_string(&self.path)
            .map(|stored| stored.trim() == self.session_id)
            .unwrap_or(false)
    }

    fn persist_authenticated(&mut self) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, &self.session_id)
    }

    fn clear(&mut self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}

/// Flag kept in memory only, for tests and one-shot commands.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    authenticated: bool,
}

impl MemorySessionStore {
    pub fn new(authenticated: bool) -> Self {
        Self { authenticated }
    }
}

impl SessionStore for MemorySessionStore {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn persist_authenticated(&mut self) -> io::Result<()> {
        self.authenticated = true;
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.authenticated = false;
        Ok(())
    }
}

/// The runtime dir is wiped at logout/reboot on Linux; elsewhere we fall back
/// to the temp dir and rely on the shell id check alone.
fn default_session_path() -> PathBuf {
    project_dirs()
        .and_then(|dirs| dirs.runtime_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::temp_dir().join("yccoach"))
        .join("session")
}

#[cfg(unix)]
fn current_session_id() -> String {
    format!("ppid:{}", std::os::unix::process::parent_id())
}

#[cfg(not(unix))]
fn current_session_id() -> String {
    std::env::var("SESSIONNAME")
        .map(|name| format!("session:{name}"))
        .unwrap_or_else(|_| "session:console".to_string())
}
