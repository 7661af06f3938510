//! Transcript sanitization
//!
//! Strips the terminal control sequences an emulated console actually
//! emits so that log lines can be compared against literal boundary
//! markers. Lines are the atomic unit; sequences split across line
//! boundaries are not reassembled.

use once_cell::sync::Lazy;
use regex::Regex;

/// CSI sequences: ESC `[` (or the C1 CSI byte) + parameter bytes +
/// intermediate bytes + one final byte in `@`..=`~`.
static ANSI_CSI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\x1b\[|\u{9b})[0-?]*[ -/]*[@-~]").unwrap());

/// OSC-style "set window parameter" sequences: ESC `]` (or the C1 OSC
/// byte) + numeric parameter + `;` + payload, terminated by BEL.
static VT_WINDOW_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\x1b\]|\u{9d})[0-9]+;\S+\x07").unwrap());

/// Remove ANSI color codes, window-parameter control codes, and trailing
/// line terminators from a single line.
///
/// Total over all input: text that matches no known sequence passes
/// through unchanged. Applying the function twice yields the same result
/// as applying it once.
pub fn strip_control_codes(line: &str) -> String {
    let line = ANSI_CSI.replace_all(line, "");
    let line = VT_WINDOW_PARAM.replace_all(&line, "");
    line.trim_end_matches(['\r', '\n']).to_string()
}

/// Sanitize every line of a raw transcript, dropping lines that become
/// empty. This is the line sequence segment extraction operates on.
pub fn sanitize_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(strip_control_codes)
        .filter(|line| !line.is_empty())
        .collect()
}
