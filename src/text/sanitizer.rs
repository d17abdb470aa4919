//! Cleanup of raw model output.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::borrow::Cow;

lazy_static! {
    /// A list marker preceded by content on the same line. Numbered markers
    /// may be glued to text, except after a digit where whitespace is needed
    /// so `10.` stays whole. Bullet glyphs always need whitespace before them.
    static ref INLINE_MARKER: Regex = Regex::new(
        r"([^\s0-9])[^\S\n]*([0-9]+\.\s)|([0-9])[^\S\n]+([0-9]+\.\s)|(\S)[^\S\n]+([*\-]\s)"
    )
    .unwrap();
    /// A bullet glyph at the start of a line, with any leading indentation.
    /// A glyph alone on its line goes too.
    static ref LEADING_BULLET: Regex = Regex::new(r"(?m)^[^\S\n]*[*\-](?:\s+|$)").unwrap();
}

const BOLD_MARKER: &str = "**";

/// Clean raw AI text so it can be stored and re-parsed.
///
/// Applies a single cleaning pass until the text stops changing. A pass that
/// changes anything either removes characters or moves a marker to the
/// start of its line, so the loop terminates and the result is idempotent.
pub fn sanitize(raw: &str) -> String {
    let mut current = sanitize_pass(raw);
    loop {
        let next = sanitize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// One pass of the four cleanup steps, in order.
///
/// 1. Break inline list markers onto their own line.
/// 2. Drop `**` bold markers, keeping the enclosed text.
/// 3. Drop `*`/`-` bullets at the start of a line. Numbered markers stay.
/// 4. Trim the whole string.
fn sanitize_pass(raw: &str) -> String {
    let split = split_inline_markers(raw);
    let unbolded = strip_bold(&split);
    let unbulleted = LEADING_BULLET.replace_all(&unbolded, "");
    unbulleted.trim().to_string()
}

fn split_inline_markers(text: &str) -> Cow<'_, str> {
    INLINE_MARKER.replace_all(text, |caps: &Captures| {
        let (before, marker) = [(1, 2), (3, 4), (5, 6)]
            .iter()
            .find_map(|&(b, m)| Some((caps.get(b)?.as_str(), caps.get(m)?.as_str())))
            .unwrap_or_default();
        format!("{}\n{}", before, marker)
    })
}

fn strip_bold(text: &str) -> Cow<'_, str> {
    if text.contains(BOLD_MARKER) {
        Cow::Owned(text.replace(BOLD_MARKER, ""))
    } else {
        Cow::Borrowed(text)
    }
}
