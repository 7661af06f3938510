//! Segment extraction
//!
//! Slices a raw transcript into the lines attributable to one executed
//! command. The console echoes every command after its prompt, so the
//! line `<prompt><command>` marks where a command's output starts and
//! the next bare `<prompt>` line marks where it ends.

use crate::sanitize::sanitize_lines;

/// Extract the cleaned output lines for one command from a raw transcript.
///
/// Lines are sanitized and empty lines dropped before boundary
/// comparison. The segment starts after the first line exactly equal to
/// `prompt + command` and ends (exclusive) at the first subsequent line
/// exactly equal to the bare prompt; if that never occurs the segment
/// runs to the end of the transcript. Only the first occurrence of the
/// start marker is considered, even if the same command text recurs
/// later. A missing start marker yields an empty segment, which the
/// parser scores as zero subtests.
pub fn extract_segment(raw: &str, prompt: &str, command: &str) -> Vec<String> {
    let start_marker = format!("{}{}", prompt, command);
    let mut segment = Vec::new();
    let mut started = false;

    for line in sanitize_lines(raw) {
        if !started {
            if line == start_marker {
                started = true;
            }
            continue;
        }
        if line == prompt {
            break;
        }
        segment.push(line);
    }

    if !started {
        debug!("command '{}' never echoed after prompt '{}'", command, prompt);
    }
    segment
}
