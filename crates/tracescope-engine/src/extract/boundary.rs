//! Boundary predicates shared by the block matchers.
//!
//! Every predicate takes the remainder of the log text starting at the
//! position being tested (normally a line start) and may look past the end of
//! the current line. None of them allocate.

use regex::Regex;
use std::sync::LazyLock;

/// Introductory line of a Python-style traceback
pub const TRACEBACK_MARKER: &str = "Traceback (most recent call last):";

/// Identifier suffixes that mark a type as error-like
pub const ERROR_SUFFIXES: [&str; 5] = [
    "Error",
    "Exception",
    "Warning",
    "Throwable",
    "RuntimeException",
];

/// `[dotted.namespace.]Identifier<Suffix>` followed by `:`, whitespace or end of line.
/// Group 1 holds the name without the follower.
pub(crate) static EXCEPTION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"(?m)\b((?:[A-Za-z_][A-Za-z0-9_]*\.)*[A-Za-z_][A-Za-z0-9_]*(?:{}))(?:[:\s]|$)",
        ERROR_SUFFIXES.join("|")
    );
    Regex::new(&pattern).unwrap()
});

/// `LEVEL: token` or `YYYY-MM-DD` at the very start of the haystack
static RECORD_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A(?:[A-Z]+:\s+\S|\d{4}-\d{2}-\d{2})").unwrap());

static CLOSING_BRACKET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)\A\s*\)\s*[})]\s*$").unwrap());

static FRAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)\A[ \t]*(?:at\s|Caused by:|\.\.\.[ \t]+\d+[ \t]+more[ \t]*\r?$)").unwrap()
});

/// A structured log record starts exactly here (no indentation).
pub fn opens_record(rest: &str) -> bool {
    RECORD_HEAD.is_match(rest)
}

/// A structured log record starts after optional whitespace, blank lines included.
pub fn opens_indented_record(rest: &str) -> bool {
    RECORD_HEAD.is_match(rest.trim_start())
}

/// Lone `)}` or `))` line, optionally preceded by blank lines.
pub fn is_closing_bracket_line(rest: &str) -> bool {
    CLOSING_BRACKET.is_match(rest)
}

/// Stack frame continuation: `at ...`, `Caused by: ...` or `... N more`.
pub fn is_frame_line(rest: &str) -> bool {
    FRAME.is_match(rest)
}

/// `rest` begins with a line break, and the line after it starts flush with a
/// non-frame token.
pub fn blank_line_then_new_record(rest: &str) -> bool {
    let Some(next) = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
    else {
        return false;
    };

    next.chars().next().is_some_and(|c| !c.is_whitespace()) && !is_frame_line(next)
}

/// True when an inline exception block must stop before the line at `rest`.
pub fn ends_inline_block(rest: &str) -> bool {
    rest.is_empty()
        || opens_indented_record(rest)
        || is_closing_bracket_line(rest)
        || blank_line_then_new_record(rest)
}
