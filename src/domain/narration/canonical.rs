use once_cell::sync::Lazy;
use regex::Regex;

static HORIZONTAL_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static BLANK_LINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Normalize text so that incidental formatting differences hash to the same
/// content identifier.
///
/// Applied in order:
/// - trim leading/trailing whitespace
/// - CRLF (and any lone CR) to LF
/// - runs of spaces/tabs to a single space
/// - three or more consecutive newlines to exactly two
///
/// The function is idempotent: canonicalizing canonical text returns it unchanged.
pub fn canonicalize(text: &str) -> String {
    let trimmed = text.trim();
    let unix_newlines = trimmed.replace("\r\n", "\n").replace('\r', "\n");
    let single_spaced = HORIZONTAL_WHITESPACE.replace_all(&unix_newlines, " ");
    BLANK_LINE_RUN.replace_all(&single_spaced, "\n\n").into_owned()
}
