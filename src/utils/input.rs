//! Text sanitization for pasted input.

/// Makes pasted text safe to insert into a text area.
///
/// Tabs become 4 spaces, carriage returns become newlines, and every other
/// control character is dropped.
pub fn sanitize_text_input(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\t' => sanitized.push_str("    "),
            '\r' => sanitized.push('\n'),
            '\n' => sanitized.push(c),
            _ if !c.is_control() => sanitized.push(c),
            _ => {}
        }
    }

    sanitized
}

/// Collapses pasted text to one line, for single-line fields like the
/// password box.
pub fn sanitize_single_line(text: &str) -> String {
    sanitize_text_input(text)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
