//! Counted-group parser
//!
//! Recognizes the embedded kernel's unit-test runner output. A group
//! announces itself with `<name> : Running <N> tests` and finishes with
//! `<name> : [Not a|A]ll tests passed (<P>/<T>) in ...`. Groups that
//! never reach their end marker keep `passed = 0`, which is the
//! conservative reading of a runner that hung or rebooted mid-group.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ParseError, ParseResult};
use crate::ledger::SubtestLedger;

static START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\w+) : Running (\d+) test").unwrap());

static END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+) : (?:Not a|A)ll tests passed \((\d+)/(\d+)\) in").unwrap());

pub fn parse(lines: &[String]) -> ParseResult {
    let mut ledger = SubtestLedger::new();

    for line in lines {
        if let Some(caps) = START.captures(line) {
            let name = &caps[1];
            let total: u64 = caps[2].parse().unwrap_or(0);

            if ledger.contains(name) {
                return Err(ParseError::DuplicateStart {
                    name: name.to_string(),
                });
            }
            ledger.open(name, total);
            continue;
        }

        if let Some(caps) = END.captures(line) {
            let name = &caps[1];
            let passed: u64 = caps[2].parse().unwrap_or(0);

            let Some(subtest) = ledger.get_mut(name) else {
                return Err(ParseError::EndWithoutStart {
                    name: name.to_string(),
                });
            };
            if subtest.passed + passed > subtest.total {
                return Err(ParseError::PassedExceedsTotal {
                    name: name.to_string(),
                    passed: subtest.passed + passed,
                    total: subtest.total,
                });
            }
            subtest.passed += passed;
        }
    }

    Ok(ledger)
}
