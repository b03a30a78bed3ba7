//! Masked single-line prompt for interactive CLI commands.

use crate::utils::input::sanitize_single_line;
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

const MASK: char = '*';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEditAction {
    Insert(char),
    Backspace,
    ClearAll,
    Paste(String),
    Submit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEditOutcome {
    Continue { redraw: bool },
    Submit(String),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct LineEditorError {
    message: String,
}

impl LineEditorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for LineEditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LineEditorError {}

impl From<io::Error> for LineEditorError {
    fn from(err: io::Error) -> Self {
        LineEditorError::new(err.to_string())
    }
}

/// Reads one line from the terminal, echoing a mask instead of the text.
pub fn prompt_masked(prompt: &str) -> Result<String, LineEditorError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, event::EnableBracketedPaste)?;

    let result = (|| -> Result<String, LineEditorError> {
        let mut text = String::new();
        let mut needs_redraw = true;

        loop {
            if needs_redraw {
                redraw_line(prompt, &text)?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))? {
                continue;
            }
            let action = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => map_key_event_to_action(&key),
                Event::Paste(pasted) => Some(LineEditAction::Paste(pasted)),
                _ => None,
            };
            let Some(action) = action else {
                continue;
            };
            match apply_line_edit_action(&mut text, action) {
                LineEditOutcome::Continue { redraw } => needs_redraw = redraw,
                LineEditOutcome::Submit(value) => break Ok(value),
                LineEditOutcome::Cancelled => break Err(LineEditorError::new("Cancelled by user")),
            }
        }
    })();

    let disable_raw_result = disable_raw_mode().map_err(LineEditorError::from);
    let disable_paste_result =
        execute!(stdout, event::DisableBracketedPaste).map_err(LineEditorError::from);
    println!();

    result.and_then(|value| {
        disable_raw_result?;
        disable_paste_result?;
        Ok(value)
    })
}

fn redraw_line(prompt: &str, text: &str) -> io::Result<()> {
    let masked: String = std::iter::repeat(MASK).take(text.chars().count()).collect();
    print!("\r\x1b[K{prompt}{masked}");
    io::stdout().flush()
}

pub fn map_key_event_to_action(key: &KeyEvent) -> Option<LineEditAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => Some(LineEditAction::Submit),
        KeyCode::Esc => Some(LineEditAction::Cancel),
        KeyCode::Backspace => Some(LineEditAction::Backspace),
        KeyCode::Char('c') if ctrl => Some(LineEditAction::Cancel),
        KeyCode::Char('u') if ctrl => Some(LineEditAction::ClearAll),
        KeyCode::Char(c) if !ctrl => {
            if c == '\n' || c == '\r' {
                Some(LineEditAction::Submit)
            } else {
                Some(LineEditAction::Insert(c))
            }
        }
        _ => None,
    }
}

pub fn apply_line_edit_action(text: &mut String, action: LineEditAction) -> LineEditOutcome {
    match action {
        LineEditAction::Insert(c) => {
            text.push(c);
            LineEditOutcome::Continue { redraw: true }
        }
        LineEditAction::Backspace => LineEditOutcome::Continue {
            redraw: text.pop().is_some(),
        },
        LineEditAction::ClearAll => {
            let redraw = !text.is_empty();
            text.clear();
            LineEditOutcome::Continue { redraw }
        }
        LineEditAction::Paste(pasted) => {
            // A pasted trailing newline submits, like typing Enter.
            let submits = pasted.ends_with('\n') || pasted.ends_with('\r');
            text.push_str(&sanitize_single_line(&pasted));
            if submits {
                LineEditOutcome::Submit(std::mem::take(text))
            } else {
                LineEditOutcome::Continue { redraw: true }
            }
        }
        LineEditAction::Submit => LineEditOutcome::Submit(std::mem::take(text)),
        LineEditAction::Cancel => LineEditOutcome::Cancelled,
    }
}
