//! Grouped-assertion parser
//!
//! Parses the xUnit-style framework whose runner prints
//! `<N> tests from <Group>` before a group and one
//! `[  OK  ] Group.Case` or `[FAILED] Group.Case` line per case. The
//! group banner carries the expected total; only `OK` lines count as
//! passes. The runner repeats the banner after the group finishes, so a
//! re-announcement with the same count is ignored.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ParseError, ParseResult};
use crate::ledger::SubtestLedger;

static GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+) tests? from (\w+)").unwrap());

static RESULT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\s*(OK|FAILED)\s*\]\s+(\w+)\.(\w+)").unwrap());

pub fn parse(lines: &[String]) -> ParseResult {
    let mut ledger = SubtestLedger::new();

    for line in lines {
        if let Some(caps) = RESULT.captures(line) {
            let verdict = &caps[1];
            let group = &caps[2];

            let Some(subtest) = ledger.get_mut(group) else {
                return Err(ParseError::UnknownGroup {
                    name: group.to_string(),
                });
            };
            if verdict == "OK" {
                if subtest.passed + 1 > subtest.total {
                    return Err(ParseError::PassedExceedsTotal {
                        name: group.to_string(),
                        passed: subtest.passed + 1,
                        total: subtest.total,
                    });
                }
                subtest.passed += 1;
            }
            continue;
        }

        if let Some(caps) = GROUP.captures(line) {
            let total: u64 = caps[1].parse().unwrap_or(0);
            let name = &caps[2];

            match ledger.get(name).map(|existing| existing.total) {
                None => ledger.open(name, total),
                Some(expected) if expected == total => {
                    // trailing banner after the group completed
                }
                Some(expected) => {
                    return Err(ParseError::GroupSizeMismatch {
                        name: name.to_string(),
                        expected,
                        found: total,
                    });
                }
            }
        }
    }

    Ok(ledger)
}
