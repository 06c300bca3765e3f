//! Word wrapping for styled spans.
//!
//! Ratatui's own `Wrap` can't tell us how many rows a message takes, and the
//! viewport needs exact line counts to scroll, so text is broken into lines
//! up front and rendered without wrapping.

use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wrap `spans` to `max_width` columns at whitespace, keeping each word's
/// style. Runs of whitespace collapse to a single space; words wider than a
/// line are broken by character.
pub fn wrap_spans(spans: &[Span<'static>], max_width: usize) -> Vec<Vec<Span<'static>>> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();
    let mut line: Vec<Span<'static>> = Vec::new();
    let mut line_width = 0usize;
    // Whitespace seen since the last word; emitted only between words.
    let mut pending_space: Option<Style> = None;

    for span in spans {
        let style = span.style;
        for (is_space, piece) in split_words(&span.content) {
            if is_space {
                if line_width > 0 {
                    pending_space = Some(style);
                }
                continue;
            }

            let word_width = UnicodeWidthStr::width(piece);
            let space_width = usize::from(pending_space.is_some());
            if line_width > 0 && line_width + space_width + word_width > max_width {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
                pending_space = None;
            }
            if let Some(space_style) = pending_space.take() {
                line.push(Span::styled(" ", space_style));
                line_width += 1;
            }

            if word_width <= max_width - line_width {
                line.push(Span::styled(piece.to_string(), style));
                line_width += word_width;
                continue;
            }

            for chunk in hard_break(piece, max_width - line_width, max_width) {
                if line_width > 0 && line_width + UnicodeWidthStr::width(chunk.as_str()) > max_width
                {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line_width += UnicodeWidthStr::width(chunk.as_str());
                line.push(Span::styled(chunk, style));
            }
        }
    }

    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

fn split_words(text: &str) -> Vec<(bool, &str)> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;
    for (idx, ch) in text.char_indices() {
        let is_space = ch.is_whitespace();
        match current {
            Some(kind) if kind != is_space => {
                pieces.push((kind, &text[start..idx]));
                start = idx;
            }
            _ => {}
        }
        current = Some(is_space);
    }
    if let Some(kind) = current {
        pieces.push((kind, &text[start..]));
    }
    pieces
}

/// Split `word` into chunks: the first fits in `first_width`, the rest in
/// `width`.
fn hard_break(word: &str, first_width: usize, width: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut chunk = String::new();
    let mut chunk_width = 0usize;
    let mut limit = if first_width == 0 { width } else { first_width };

    for ch in word.chars() {
        let cw = ch.width().unwrap_or(0);
        if chunk_width + cw > limit && !chunk.is_empty() {
            chunks.push(std::mem::take(&mut chunk));
            chunk_width = 0;
            limit = width;
        }
        chunk.push(ch);
        chunk_width += cw;
    }
    if !chunk.is_empty() {
        chunks.push(chunk);
    }
    chunks
}
