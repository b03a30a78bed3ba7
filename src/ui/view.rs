//! Terminal-backed [`ChatView`].
//!
//! The view only holds what is on screen. The controller decides what gets
//! rendered; the renderer reads this state back when drawing a frame.

use std::time::Instant;

use tracing::warn;
use tui_textarea::TextArea;

use crate::core::controller::{ChatView, Screen};
use crate::core::message::Message;
use crate::ui::theme::Theme;
use crate::utils::logging::LoggingState;

const PASSWORD_MASK: char = '•';

pub struct TerminalView {
    screen: Screen,
    greeting: String,
    turns: Vec<Message>,
    busy_since: Option<Instant>,
    login_error: Option<String>,
    password: TextArea<'static>,
    input: TextArea<'static>,
    password_focused: bool,
    /// Lines scrolled up from the newest turn; 0 follows the conversation.
    scroll_from_bottom: u16,
    /// Transcript viewport height from the last frame, used for paging.
    viewport_height: u16,
    logging: LoggingState,
    pub theme: Theme,
}

impl TerminalView {
    pub fn new(logging: LoggingState, theme: Theme) -> Self {
        Self {
            screen: Screen::Login,
            greeting: String::new(),
            turns: Vec::new(),
            busy_since: None,
            login_error: None,
            password: new_password_area(),
            input: TextArea::default(),
            password_focused: false,
            scroll_from_bottom: 0,
            viewport_height: 0,
            logging,
            theme,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub fn turns(&self) -> &[Message] {
        &self.turns
    }

    pub fn is_busy(&self) -> bool {
        self.busy_since.is_some()
    }

    pub fn busy_since(&self) -> Option<Instant> {
        self.busy_since
    }

    pub fn login_error(&self) -> Option<&str> {
        self.login_error.as_deref()
    }

    pub fn password_focused(&self) -> bool {
        self.password_focused
    }

    pub fn password_area(&self) -> &TextArea<'static> {
        &self.password
    }

    pub fn password_area_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.password
    }

    pub fn input_area(&self) -> &TextArea<'static> {
        &self.input
    }

    pub fn input_area_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.input
    }

    /// Empties the chat input and returns what was typed.
    pub fn take_input(&mut self) -> String {
        let text = self.input.lines().join("\n");
        self.input = TextArea::default();
        text
    }

    /// Returns the typed password. The field itself is cleared by the
    /// controller, and only on failure.
    pub fn password_text(&self) -> String {
        self.password.lines().join("")
    }

    pub fn logging(&self) -> &LoggingState {
        &self.logging
    }

    pub fn logging_mut(&mut self) -> &mut LoggingState {
        &mut self.logging
    }

    pub fn scroll_from_bottom(&self) -> u16 {
        self.scroll_from_bottom
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    pub fn page_height(&self) -> u16 {
        self.viewport_height.saturating_sub(1).max(1)
    }

    /// Called by the renderer once the transcript has been laid out.
    pub(crate) fn record_viewport(&mut self, height: u16, max_scroll: u16) {
        self.viewport_height = height;
        self.scroll_from_bottom = self.scroll_from_bottom.min(max_scroll);
    }
}

fn new_password_area() -> TextArea<'static> {
    let mut area = TextArea::default();
    area.set_mask_char(PASSWORD_MASK);
    area
}

impl ChatView for TerminalView {
    fn show_screen(&mut self, screen: Screen) {
        self.screen = screen;
        if screen == Screen::Chat {
            self.password_focused = false;
            self.password = new_password_area();
        }
    }

    fn render_turn(&mut self, message: &Message) {
        if let Err(err) = self.logging.log_message(message) {
            warn!(error = %err, "could not write transcript log");
        }
        self.turns.push(message.clone());
        self.scroll_from_bottom = 0;
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy_since = match (busy, self.busy_since) {
            (true, Some(since)) => Some(since),
            (true, None) => Some(Instant::now()),
            (false, _) => None,
        };
    }

    fn show_login_error(&mut self, text: &str) {
        self.login_error = Some(text.to_string());
    }

    fn clear_login_error(&mut self) {
        self.login_error = None;
    }

    fn clear_password_input(&mut self) {
        self.password = new_password_area();
    }

    fn focus_password_input(&mut self) {
        self.password_focused = true;
    }

    fn reset_chat(&mut self, greeting: &str) {
        self.greeting = greeting.to_string();
        self.turns.clear();
        self.input = TextArea::default();
        self.scroll_from_bottom = 0;
    }
}
