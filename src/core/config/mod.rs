pub mod data;
pub mod defaults;
pub mod io;
pub mod orchestrator;
pub mod printing;

pub use data::{BackendKind, Config};
pub use io::ConfigError;

#[cfg(test)]
mod tests;
