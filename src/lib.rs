//! yccoach is a password-gated terminal chat with a hosted YC application coach.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the session/chat controller, the committed transcript,
//!   the completion backends, password and session-flag storage, and config.
//! - [`ui`] renders the login and chat screens and runs the interactive event
//!   loop that feeds key presses and exchange outcomes into the controller.
//! - [`commands`] implements the slash commands handled inside the chat.
//! - [`api`] defines the completion endpoint's request and response payloads.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into [`ui::chat_loop`] for
//! interactive sessions and into [`cli::say`] for one-shot messages.

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
