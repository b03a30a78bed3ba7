//! TUI-less "say" command

use std::error::Error;
use std::io::{self, BufRead, IsTerminal};

use crate::core::controller::{ChatController, ChatView, ExchangeStatus, Screen};
use crate::core::exchange::ExchangeReceiver;
use crate::core::message::{Message, TranscriptRole};
use crate::core::startup::{bootstrap_controller, StartupError};
use crate::utils::line_editor::prompt_masked;

/// Prints replies to stdout and app notes to stderr.
#[derive(Debug, Default)]
pub struct StdoutView;

impl ChatView for StdoutView {
    fn show_screen(&mut self, _screen: Screen) {}

    fn render_turn(&mut self, message: &Message) {
        match message.role {
            TranscriptRole::User => {}
            TranscriptRole::Assistant => println!("{}", message.content),
            TranscriptRole::AppInfo => eprintln!("{}", message.content),
            TranscriptRole::AppError => eprintln!("❌ {}", message.content),
        }
    }

    fn set_busy(&mut self, _busy: bool) {}

    fn show_login_error(&mut self, text: &str) {
        eprintln!("❌ {text}");
    }

    fn clear_login_error(&mut self) {}

    fn clear_password_input(&mut self) {}

    fn focus_password_input(&mut self) {}

    fn reset_chat(&mut self, _greeting: &str) {}
}

pub async fn run_say(words: Vec<String>, force_mock: bool) -> Result<(), Box<dyn Error>> {
    let message = words.join(" ");
    if message.trim().is_empty() {
        eprintln!("Usage: yccoach say <message>");
        std::process::exit(1);
    }

    let (mut controller, mut outcomes) = match bootstrap_controller(StdoutView, force_mock) {
        Ok(parts) => parts,
        Err(e) => {
            if let Some(startup_error) = e.downcast_ref::<StartupError>() {
                startup_error.print();
                std::process::exit(startup_error.exit_code());
            }
            return Err(e);
        }
    };

    if !controller.is_authenticated() {
        let password = read_password()?;
        if !controller.attempt_login(&password) {
            std::process::exit(1);
        }
    }

    if !deliver_one(&mut controller, &mut outcomes, &message).await {
        std::process::exit(1);
    }
    Ok(())
}

/// Prompts with a mask on a terminal; otherwise takes the first stdin line.
fn read_password() -> Result<String, Box<dyn Error>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(prompt_masked("Password: ")?);
    }
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    Ok(line)
}

/// Sends `message` and waits for its outcome. Returns whether a reply was
/// committed.
pub async fn deliver_one<V: ChatView>(
    controller: &mut ChatController<V>,
    outcomes: &mut ExchangeReceiver,
    message: &str,
) -> bool {
    if controller.send_message(message).is_none() {
        return false;
    }
    while let Some((outcome, exchange_id)) = outcomes.recv().await {
        match controller.complete_exchange(exchange_id, outcome) {
            ExchangeStatus::Committed => return true,
            ExchangeStatus::Failed => return false,
            ExchangeStatus::Stale => continue,
        }
    }
    false
}
