//! Key and paste handling for both screens.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::Input as TAInput;

use crate::commands::{process_input, ChatCommandTarget, CommandResult};
use crate::core::controller::Screen;
use crate::utils::input::{sanitize_single_line, sanitize_text_input};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLoopAction {
    Continue,
    Exit,
}

pub fn handle_key(controller: &mut ChatCommandTarget, key: KeyEvent) -> KeyLoopAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return KeyLoopAction::Exit;
    }

    match controller.view().screen() {
        Screen::Login => handle_login_key(controller, key),
        Screen::Chat => handle_chat_key(controller, key),
    }
}

fn handle_login_key(controller: &mut ChatCommandTarget, key: KeyEvent) -> KeyLoopAction {
    match key.code {
        KeyCode::Esc => return KeyLoopAction::Exit,
        KeyCode::Enter => {
            let submitted = controller.view().password_text();
            controller.attempt_login(&submitted);
        }
        KeyCode::Tab => {}
        _ => {
            controller
                .view_mut()
                .password_area_mut()
                .input(TAInput::from(key));
        }
    }
    KeyLoopAction::Continue
}

fn handle_chat_key(controller: &mut ChatCommandTarget, key: KeyEvent) -> KeyLoopAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let single_line_input = controller.view().input_area().lines().len() <= 1;

    match key.code {
        KeyCode::Char('l') if ctrl => controller.logout(),
        KeyCode::Enter if alt || key.modifiers.contains(KeyModifiers::SHIFT) => {
            controller.view_mut().input_area_mut().insert_newline();
        }
        KeyCode::Enter => submit_input(controller),
        KeyCode::PageUp => {
            let view = controller.view_mut();
            let page = view.page_height();
            view.scroll_up(page);
        }
        KeyCode::PageDown => {
            let view = controller.view_mut();
            let page = view.page_height();
            view.scroll_down(page);
        }
        KeyCode::Up if single_line_input => controller.view_mut().scroll_up(1),
        KeyCode::Down if single_line_input => controller.view_mut().scroll_down(1),
        _ => {
            controller
                .view_mut()
                .input_area_mut()
                .input(TAInput::from(key));
        }
    }
    KeyLoopAction::Continue
}

/// Sends the typed text unless an exchange is still running. The text stays
/// in the input while busy so nothing typed is lost.
fn submit_input(controller: &mut ChatCommandTarget) {
    if controller.is_busy() {
        return;
    }
    let text = controller.view_mut().take_input();
    if let CommandResult::ProcessAsMessage(message) = process_input(controller, &text) {
        controller.send_message(&message);
    }
}

pub fn handle_paste(controller: &mut ChatCommandTarget, text: &str) {
    let view = controller.view_mut();
    match view.screen() {
        Screen::Login => {
            view.password_area_mut()
                .insert_str(sanitize_single_line(text));
        }
        Screen::Chat => {
            view.input_area_mut().insert_str(sanitize_text_input(text));
        }
    }
}
