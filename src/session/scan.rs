// ABOUTME: Error scan over a session transcript.
// ABOUTME: Counts lines that start with an Oracle (ORA) or SQL*Plus (SP2) error code.

use regex::bytes::Regex;
use std::sync::LazyLock;

static ERROR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:ORA|SP2)-[0-9]+:").expect("error pattern is valid"));

/// Count transcript lines reporting a database or client error.
///
/// A line counts when it begins with `ORA-` or `SP2-`, then one or more
/// digits, then a colon. Codes appearing later in a line are ignored.
pub fn count_errors(transcript: &[u8]) -> usize {
    transcript
        .split(|&b| b == b'\n')
        .filter(|line| is_error_line(line))
        .count()
}

/// Whether a single line (without its terminator) is an error line.
pub fn is_error_line(line: &[u8]) -> bool {
    ERROR_LINE.is_match(line)
}
