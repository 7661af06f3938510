//! Flat enumerated-result parser
//!
//! The simplest format: a numbered list of `<N>: <name>: PASSED` or
//! `<N>: <name>: FAILED` lines with no start/end pairing. Every result
//! increments one shared ledger entry, so the only state is the running
//! tally itself. The entry exists even when the segment contains no
//! result lines at all; a zero-count entry then fails the run through
//! the `total > 0` rule.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ParseResult;
use crate::ledger::SubtestLedger;

static RESULT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+: (\w+): (PASSED|FAILED)").unwrap());

pub fn parse(lines: &[String], label: &str) -> ParseResult {
    let mut ledger = SubtestLedger::new();
    ledger.open(label, 0);

    for line in lines {
        if let Some(caps) = RESULT.captures(line) {
            let passed = &caps[2] == "PASSED";
            if let Some(subtest) = ledger.get_mut(label) {
                subtest.total += 1;
                if passed {
                    subtest.passed += 1;
                }
            }
        }
    }

    Ok(ledger)
}
