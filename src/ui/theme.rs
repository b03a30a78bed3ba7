use ratatui::style::{Color, Modifier, Style};

use crate::core::message::TranscriptRole;

#[derive(Debug, Clone)]
pub struct Theme {
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_text_style: Style,
    pub greeting_style: Style,
    pub app_info_style: Style,
    pub app_error_style: Style,

    // Chrome
    pub title_style: Style,
    pub busy_indicator_style: Style,
    pub input_border_style: Style,
    pub input_disabled_style: Style,
    pub login_error_style: Style,
    pub hint_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_text_style: Style::default().fg(Color::White),
            greeting_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            app_info_style: Style::default().fg(Color::DarkGray),
            app_error_style: Style::default().fg(Color::LightRed),

            title_style: Style::default().fg(Color::Gray),
            busy_indicator_style: Style::default().fg(Color::Yellow),
            input_border_style: Style::default().fg(Color::Cyan),
            input_disabled_style: Style::default().fg(Color::DarkGray),
            login_error_style: Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
            hint_style: Style::default().fg(Color::DarkGray),
        }
    }

    pub fn style_for(&self, role: TranscriptRole) -> Style {
        match role {
            TranscriptRole::User => self.user_text_style,
            TranscriptRole::Assistant => self.assistant_text_style,
            TranscriptRole::AppInfo => self.app_info_style,
            TranscriptRole::AppError => self.app_error_style,
        }
    }
}
