//! Case-state parser
//!
//! Parses the runner that reports each case as
//! `CASE <name> [STARTED]` then `CASE <name> [PASSED]` or
//! `CASE <name> [FAILED]`, followed by a
//! `CASES: <n> SUCCESS: <s> FAILED: <f>` summary line.
//!
//! The scan is a strict three-state machine per case:
//! `Idle -> Started -> Ended -> Idle`. The summary is only accepted in
//! `Ended`, and its failure count must agree with the case verdict.
//! Ending the input anywhere other than `Idle` means the transcript was
//! truncated and is a hard parse error, unlike the counted-group
//! parser's tolerance for unterminated groups (the two formats evolved
//! independently and are scored to their own rules).

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ParseError, ParseResult};
use crate::ledger::SubtestLedger;

static CASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CASE (\w+) \[(STARTED|PASSED|FAILED)\]").unwrap());

static SUMMARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CASES: (\d+) SUCCESS: (\d+) FAILED: (\d+)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Idle,
    Started { name: String },
    Ended { name: String, passed: bool },
}

impl State {
    fn describe(&self) -> String {
        match self {
            State::Idle => "Idle".to_string(),
            State::Started { name } => format!("Started({})", name),
            State::Ended { name, .. } => format!("Ended({})", name),
        }
    }
}

pub fn parse(lines: &[String]) -> ParseResult {
    let mut ledger = SubtestLedger::new();
    let mut state = State::Idle;

    for line in lines {
        if let Some(caps) = CASE.captures(line) {
            let name = caps[1].to_string();
            let verdict = &caps[2];

            state = match (state, verdict) {
                (State::Idle, "STARTED") => {
                    if ledger.contains(&name) {
                        return Err(ParseError::DuplicateStart { name });
                    }
                    State::Started { name }
                }
                (State::Started { name: current }, "PASSED" | "FAILED") => {
                    if current != name {
                        return Err(ParseError::CaseMismatch {
                            expected: current,
                            found: name,
                        });
                    }
                    State::Ended {
                        name,
                        passed: verdict == "PASSED",
                    }
                }
                (state, _) => {
                    return Err(ParseError::MarkerOutOfPlace {
                        marker: caps[0].to_string(),
                        state: state.describe(),
                    });
                }
            };
            continue;
        }

        if let Some(caps) = SUMMARY.captures(line) {
            let cases: u64 = caps[1].parse().unwrap_or(0);
            let success: u64 = caps[2].parse().unwrap_or(0);
            let failed: u64 = caps[3].parse().unwrap_or(0);

            state = match state {
                State::Ended { name, passed } => {
                    if !passed && failed == 0 {
                        return Err(ParseError::InconsistentFailureCount { name });
                    }
                    if success > cases {
                        return Err(ParseError::PassedExceedsTotal {
                            name,
                            passed: success,
                            total: cases,
                        });
                    }
                    ledger.open(&name, cases);
                    if let Some(subtest) = ledger.get_mut(&name) {
                        subtest.passed = success;
                    }
                    State::Idle
                }
                other => {
                    return Err(ParseError::MarkerOutOfPlace {
                        marker: caps[0].to_string(),
                        state: other.describe(),
                    });
                }
            };
        }
    }

    if state != State::Idle {
        return Err(ParseError::Truncated {
            state: state.describe(),
        });
    }

    Ok(ledger)
}
