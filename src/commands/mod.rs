//! Slash commands typed into the chat input.
//!
//! Commands act on the local session only. Anything that does not name a
//! known command, including unknown `/words`, is sent as a normal message.

mod registry;

pub use registry::{all_commands, find_command, Command, CommandInvocation};

use crate::core::controller::ChatController;
use crate::ui::view::TerminalView;

pub type ChatCommandTarget = ChatController<TerminalView>;

const USAGE_LOG: &str = "Usage: /log [filename]";

const KEY_HELP: &[(&str, &str)] = &[
    ("Enter", "Send the message"),
    ("Alt+Enter", "Insert a new line"),
    ("PageUp/PageDown", "Scroll the conversation"),
    ("Ctrl+L", "Log out"),
    ("Ctrl+C", "Quit"),
];

#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
}

pub fn process_input(target: &mut ChatCommandTarget, input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match find_command(command_name) {
        Some(command) => (command.handler)(target, CommandInvocation { args }),
        None => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

pub(super) fn handle_help(
    target: &mut ChatCommandTarget,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    let mut help = String::from("Keys:\n");
    for (key, description) in KEY_HELP {
        help.push_str(&format!("  {key:<16} {description}\n"));
    }
    help.push_str("\nCommands:\n");
    for command in all_commands() {
        help.push_str(&format!("  {:<16} {}\n", command.usage, command.help));
    }
    target.show_notice(help.trim_end());
    CommandResult::Continue
}

pub(super) fn handle_log(
    target: &mut ChatCommandTarget,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    let logging = target.view_mut().logging_mut();
    let result: Result<String, Box<dyn std::error::Error>> = match invocation.args_len() {
        0 => logging.toggle_logging(),
        1 => logging
            .set_log_file(invocation.args.to_string())
            .map_err(|err| format!("Logfile error: {err}").into()),
        _ => Err(USAGE_LOG.into()),
    };

    match result {
        Ok(status) => target.show_notice(&status),
        Err(err) => target.show_notice(&err.to_string()),
    }
    CommandResult::Continue
}

pub(super) fn handle_logout(
    target: &mut ChatCommandTarget,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    target.logout();
    CommandResult::Continue
}
