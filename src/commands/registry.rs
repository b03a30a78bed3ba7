use super::{ChatCommandTarget, CommandResult};

pub type CommandHandler = fn(&mut ChatCommandTarget, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub args: &'a str,
}

impl CommandInvocation<'_> {
    pub fn args_len(&self) -> usize {
        self.args.split_whitespace().count()
    }
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "Show keys and commands.",
        handler: super::handle_help,
    },
    Command {
        name: "log",
        usage: "/log [filename]",
        help: "Start a transcript log, or pause and resume the current one.",
        handler: super::handle_log,
    },
    Command {
        name: "logout",
        usage: "/logout",
        help: "End the session and return to the login screen.",
        handler: super::handle_logout,
    },
];
