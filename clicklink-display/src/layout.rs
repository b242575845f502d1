//! Word wrapping for the label
//!
//! Greedy fill: words are packed onto a line while they fit; a word longer
//! than a whole line is split across lines. Lines are slices of the input,
//! so runs of spaces between words on the same line are kept as written.
//! Text beyond the last available line is dropped.

use heapless::Vec;

/// Upper bound on wrapped lines for any supported screen
pub const MAX_LINES: usize = 8;

/// Wrapped lines of a label
pub type Lines<'a> = Vec<&'a str, MAX_LINES>;

/// Split `text` into at most `max_lines` lines of at most `cols` characters
pub fn wrap(text: &str, cols: usize, max_lines: usize) -> Lines<'_> {
    let mut lines = Lines::new();
    let max_lines = max_lines.min(MAX_LINES);
    if cols == 0 || max_lines == 0 {
        return lines;
    }

    // Current line as a byte range of `text` plus its width in chars
    let mut current: Option<(usize, usize, usize)> = None;

    for (start, word) in words(text) {
        let width = word.chars().count();

        if let Some((line_start, line_end, line_width)) = current {
            if line_width + 1 + width <= cols {
                current = Some((line_start, start + word.len(), line_width + 1 + width));
                continue;
            }
            if !emit(&mut lines, &text[line_start..line_end], max_lines) {
                return lines;
            }
            current = None;
        }

        let mut rest = word;
        let mut rest_start = start;
        while rest.chars().count() > cols {
            let split = rest
                .char_indices()
                .nth(cols)
                .map_or(rest.len(), |(i, _)| i);
            if !emit(&mut lines, &rest[..split], max_lines) {
                return lines;
            }
            rest = &rest[split..];
            rest_start += split;
        }
        current = Some((rest_start, rest_start + rest.len(), rest.chars().count()));
    }

    if let Some((line_start, line_end, _)) = current {
        emit(&mut lines, &text[line_start..line_end], max_lines);
    }
    lines
}

/// Push a line; false once the line budget is used up
fn emit<'a>(lines: &mut Lines<'a>, line: &'a str, max_lines: usize) -> bool {
    if lines.len() >= max_lines {
        return false;
    }
    let _ = lines.push(line);
    lines.len() < max_lines
}

/// Whitespace-separated words with their byte offsets
fn words(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut pos = 0;
    core::iter::from_fn(move || {
        let rest = &text[pos..];
        let start = pos + (rest.len() - rest.trim_start().len());
        if start >= text.len() {
            return None;
        }
        let word_len = text[start..]
            .find(char::is_whitespace)
            .unwrap_or(text.len() - start);
        pos = start + word_len;
        Some((start, &text[start..pos]))
    })
}
