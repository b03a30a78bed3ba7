//! Word wrapping measured in terminal cells.
//!
//! The transcript is wrapped here rather than by ratatui so the scroll math
//! and the rendered output always agree on the line count.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TAB: &str = "    ";

/// Wraps `text` to `width` cells. Explicit newlines are kept, words longer
/// than a line are split, and blank lines survive as empty strings. Leading
/// indentation is repeated on continuation lines and spacing between words
/// is left as typed.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return text.lines().map(str::to_string).collect();
    }

    let mut out = Vec::new();
    for source_line in text.split('\n') {
        let source_line = source_line.trim_end_matches('\r');
        if source_line.trim().is_empty() {
            out.push(String::new());
            continue;
        }
        wrap_line(source_line, width, &mut out);
    }
    out
}

fn wrap_line(line: &str, width: usize, out: &mut Vec<String>) {
    let words = split_words(line);
    let leading = words
        .first()
        .map(|(gap, _)| gap.replace('\t', TAB))
        .unwrap_or_default();
    // An indent that eats half the line is dropped rather than repeated.
    let indent = if leading.width() * 2 <= width {
        leading
    } else {
        String::new()
    };
    let indent_width = indent.width();

    let mut current = indent.clone();
    let mut current_width = indent_width;
    let mut has_text = false;

    for (gap, word) in words {
        let gap = if has_text {
            gap.replace('\t', TAB)
        } else {
            String::new()
        };
        let gap_width = gap.width();
        let word_width = word.width();

        if current_width + gap_width + word_width <= width {
            current.push_str(&gap);
            current.push_str(word);
            current_width += gap_width + word_width;
            has_text = true;
            continue;
        }

        if has_text {
            out.push(std::mem::replace(&mut current, indent.clone()));
            current_width = indent_width;
            has_text = false;
        }

        if current_width + word_width <= width {
            current.push_str(word);
            current_width += word_width;
            has_text = true;
            continue;
        }

        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width + ch_width > width && has_text {
                out.push(std::mem::replace(&mut current, indent.clone()));
                current_width = indent_width;
            }
            current.push(ch);
            current_width += ch_width;
            has_text = true;
        }
    }
    if has_text {
        out.push(current);
    }
}

/// Splits a line into `(whitespace before, word)` pairs. Trailing whitespace
/// is dropped.
fn split_words(line: &str) -> Vec<(&str, &str)> {
    let mut words = Vec::new();
    let mut rest = line;
    loop {
        let gap_len = rest.len() - rest.trim_start().len();
        let (gap, after_gap) = rest.split_at(gap_len);
        if after_gap.is_empty() {
            break;
        }
        let word_len = after_gap
            .find(char::is_whitespace)
            .unwrap_or(after_gap.len());
        let (word, tail) = after_gap.split_at(word_len);
        words.push((gap, word));
        rest = tail;
    }
    words
}
