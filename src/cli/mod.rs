//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod password;
pub mod say;
pub mod settings;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::password::{clear_password, logout, set_password};
use crate::cli::say::run_say;
use crate::cli::settings::{set_setting, unset_setting};
use crate::core::config::Config;
use crate::ui::chat_loop::run_chat;
use crate::utils::diagnostics::{default_diagnostics_path, init_diagnostics, DiagnosticsTarget};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("VERGEN_GIT_SHA"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ")\nbuilt: ",
    env!("VERGEN_BUILD_DATE"),
    "\nrustc: ",
    env!("VERGEN_RUSTC_SEMVER"),
);

#[derive(Parser)]
#[command(name = "yccoach")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "A password-gated terminal chat with a YC application coach")]
#[command(
    long_about = "yccoach is a full-screen terminal chat with a hosted YC application coach. \
The chat is locked behind a shared password; once unlocked, the session stays open for the \
rest of the shell session.\n\n\
Setup:\n\
  yccoach set endpoint-url <url>   Completion endpoint (or YCCOACH_ENDPOINT)\n\
  yccoach set-password             Store the login password in the system keyring\n\
  yccoach --mock                   Practice offline with canned coaching replies\n\n\
Environment Variables:\n\
  YCCOACH_ENDPOINT   Completion endpoint URL (overrides the config file)\n\
  YCCOACH_PASSWORD   Login password (overrides the keyring)\n\
  YCCOACH_LOG        Diagnostic log filter, e.g. debug or yccoach=trace\n\n\
Controls:\n\
  Enter             Send the message (or sign in on the login screen)\n\
  Alt+Enter         Insert a new line\n\
  PageUp/PageDown   Scroll through the conversation\n\
  Ctrl+L            Log out\n\
  Ctrl+C            Quit the application\n\n\
Commands:\n\
  /help             Show keys and commands\n\
  /log <filename>   Enable logging to specified file\n\
  /log              Toggle logging pause/resume\n\
  /logout           Log out"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable transcript logging to specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,

    /// Write diagnostic logs to this file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub diagnostics: Option<PathBuf>,

    /// Use the offline mock coach regardless of configuration
    #[arg(long, global = true)]
    pub mock: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send one message and print the reply
    Say {
        /// The message to send
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
    /// Set configuration values, or show them all when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Store the login password in the system keyring
    SetPassword,
    /// Remove the login password from the system keyring
    ClearPassword,
    /// Forget the unlocked session so the next start asks for the password
    Logout,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Commands::Chat);

    // The chat owns the screen, so its diagnostics go to a file.
    let target = match (&command, args.diagnostics) {
        (_, Some(path)) => DiagnosticsTarget::File(path),
        (Commands::Chat, None) => DiagnosticsTarget::File(default_diagnostics_path()),
        (_, None) => DiagnosticsTarget::Stderr,
    };
    let default_level = match command {
        Commands::Chat => "info",
        _ => "warn",
    };
    if let Err(e) = init_diagnostics(target, default_level) {
        eprintln!("⚠️  Diagnostic logging disabled: {e}");
    }

    match command {
        Commands::Chat => run_chat(args.log, args.mock).await,
        Commands::Say { words } => run_say(words, args.mock).await,
        Commands::Set { key: None, .. } => {
            Config::load()?.print_all();
            Ok(())
        }
        Commands::Set {
            key: Some(key),
            value,
        } => {
            match set_setting(&key, &value) {
                Ok(message) => println!("{message}"),
                Err(err) => {
                    err.print();
                    std::process::exit(err.exit_code());
                }
            }
            Ok(())
        }
        Commands::Unset { key } => {
            match unset_setting(&key) {
                Ok(message) => println!("{message}"),
                Err(err) => {
                    err.print();
                    std::process::exit(err.exit_code());
                }
            }
            Ok(())
        }
        Commands::SetPassword => set_password(),
        Commands::ClearPassword => clear_password(),
        Commands::Logout => logout(),
    }
}
