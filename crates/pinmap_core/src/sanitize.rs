//! Free-text input sanitization.
//!
//! # Responsibility
//! - Strip HTML tags from admin-submitted text before it reaches storage.
//! - Escape backslashes, line breaks, NUL and single quotes so stored values
//!   survive textual export unchanged.
//!
//! # Invariants
//! - Tag stripping always runs before escaping; escaping the angle brackets
//!   first would change what the tag pattern matches.
//! - Both steps are total: no input, including `None`, can make them fail.
//!
//! All queries in this crate are parameterized, so the escape step is not an
//! injection defense. It is kept because stored values are compared and
//! exported including these escapes.

use once_cell::sync::Lazy;
use regex::Regex;

/// Shortest-match tag pattern: everything from a `<` to the next `>`.
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").expect("valid tag regex"));

/// Removes every HTML tag, including the angle brackets and everything
/// between them. Free text interleaved between tags is preserved.
pub fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

/// Inserts escape sequences for characters that would corrupt textual
/// storage or export: backslash, newline, carriage return, NUL and the
/// single quote.
///
/// Not idempotent: applying it twice doubles the backslashes.
pub fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\0', "\\0")
        .replace('\'', "\\'")
}

/// Cleans one raw request parameter: absent input becomes the empty string,
/// present input is tag-stripped and then escaped.
pub fn sanitize(raw: Option<&str>) -> String {
    match raw {
        Some(text) => escape_text(&strip_tags(text)),
        None => String::new(),
    }
}
