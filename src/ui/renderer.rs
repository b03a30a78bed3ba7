use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::core::controller::Screen;
use crate::core::message::TranscriptRole;
use crate::ui::theme::Theme;
use crate::ui::view::TerminalView;
use crate::ui::wrap::wrap_text;

const USER_PREFIX: &str = "You: ";
const SPINNER_FRAMES: [&str; 4] = ["○", "◔", "◑", "◕"];
const MAX_INPUT_ROWS: u16 = 6;
const LOGIN_BOX_WIDTH: u16 = 52;

pub fn draw(f: &mut Frame, view: &mut TerminalView, backend_label: &str) {
    match view.screen() {
        Screen::Login => draw_login(f, view),
        Screen::Chat => draw_chat(f, view, backend_label),
    }
}

fn draw_login(f: &mut Frame, view: &mut TerminalView) {
    let theme = view.theme.clone();
    let [row] = Layout::vertical([Constraint::Length(9)])
        .flex(Flex::Center)
        .areas(f.area());
    let [area] = Layout::horizontal([Constraint::Length(LOGIN_BOX_WIDTH.min(f.area().width))])
        .flex(Flex::Center)
        .areas(row);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" YC Coach v{} ", env!("CARGO_PKG_VERSION")))
        .title_style(theme.title_style);
    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let [prompt, password, error, hint] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    f.render_widget(Paragraph::new("Enter the access password"), prompt);

    let focused = view.password_focused();
    let password_area = view.password_area_mut();
    password_area.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.input_border_style),
    );
    password_area.set_cursor_line_style(Style::default());
    password_area.set_cursor_style(cursor_style(focused));
    f.render_widget(&*password_area, password);

    if let Some(message) = view.login_error() {
        f.render_widget(
            Paragraph::new(Span::styled(message.to_string(), theme.login_error_style)),
            error,
        );
    }
    f.render_widget(
        Paragraph::new(Span::styled("Enter to sign in • Esc to quit", theme.hint_style)),
        hint,
    );
}

fn draw_chat(f: &mut Frame, view: &mut TerminalView, backend_label: &str) {
    let theme = view.theme.clone();
    let input_rows = (view.input_area().lines().len() as u16).clamp(1, MAX_INPUT_ROWS);
    let [title_area, transcript_area, input_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(input_rows + 2),
    ])
    .areas(f.area());

    let title = format!(
        "YC Coach v{} - {} • Logging: {}",
        env!("CARGO_PKG_VERSION"),
        backend_label,
        view.logging().get_status_string()
    );
    f.render_widget(
        Paragraph::new(Span::styled(title, theme.title_style)),
        title_area,
    );

    let mut lines = build_transcript_lines(view, transcript_area.width as usize);
    let total = keep_scrollable_tail(&mut lines);
    let max_scroll = total.saturating_sub(transcript_area.height);
    view.record_viewport(transcript_area.height, max_scroll);
    let offset = max_scroll - view.scroll_from_bottom().min(max_scroll);
    f.render_widget(Paragraph::new(lines).scroll((offset, 0)), transcript_area);

    let busy = view.busy_since().map(|since| {
        let frame = (since.elapsed().as_millis() / 150) as usize % SPINNER_FRAMES.len();
        SPINNER_FRAMES[frame]
    });
    let (title, border_style) = match busy {
        Some(spinner) => (
            Line::from(vec![
                Span::styled(format!(" {spinner} "), theme.busy_indicator_style),
                Span::raw("Waiting for the coach (Ctrl+L to log out, Ctrl+C to quit) "),
            ]),
            theme.input_disabled_style,
        ),
        None => (
            Line::from(
                " Type your message (Alt+Enter for new line, /help for help, Ctrl+C to quit) ",
            ),
            theme.input_border_style,
        ),
    };

    let input = view.input_area_mut();
    input.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    input.set_cursor_line_style(Style::default());
    input.set_cursor_style(cursor_style(busy.is_none()));
    f.render_widget(&*input, input_area);
}

/// Drops the oldest lines past what a `u16` scroll offset can reach and
/// returns how many remain.
fn keep_scrollable_tail(lines: &mut Vec<Line<'static>>) -> u16 {
    let overflow = lines.len().saturating_sub(usize::from(u16::MAX));
    lines.drain(..overflow);
    u16::try_from(lines.len()).unwrap_or(u16::MAX)
}

fn cursor_style(visible: bool) -> Style {
    if visible {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    }
}

/// Lays out the greeting and every rendered turn, wrapped to `width`.
pub fn build_transcript_lines(view: &TerminalView, width: usize) -> Vec<Line<'static>> {
    let theme = &view.theme;
    let mut lines = Vec::new();

    for line in wrap_text(view.greeting(), width) {
        lines.push(Line::from(Span::styled(line, theme.greeting_style)));
    }
    lines.push(Line::default());

    for turn in view.turns() {
        match turn.role {
            TranscriptRole::User => push_user_turn(&mut lines, theme, &turn.content, width),
            role => {
                let style = theme.style_for(role);
                for line in wrap_text(&turn.content, width) {
                    lines.push(Line::from(Span::styled(line, style)));
                }
            }
        }
        lines.push(Line::default());
    }
    lines
}

fn push_user_turn(lines: &mut Vec<Line<'static>>, theme: &Theme, content: &str, width: usize) {
    let indent = " ".repeat(USER_PREFIX.len());
    let body_width = width.saturating_sub(USER_PREFIX.len()).max(1);
    for (index, line) in wrap_text(content, body_width).into_iter().enumerate() {
        let lead = if index == 0 {
            Span::styled(USER_PREFIX, theme.user_prefix_style)
        } else {
            Span::raw(indent.clone())
        };
        lines.push(Line::from(vec![
            lead,
            Span::styled(line, theme.user_text_style),
        ]));
    }
}
