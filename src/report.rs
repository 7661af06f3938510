//! Run results and report rendering
//!
//! Collects the per-command outcomes of one harness run into the final
//! report: a fixed-width table with one seed row per executed command
//! and one row per subtest, followed by a totals line. The table is
//! always rendered, even on failure, so the operator can see how far
//! execution progressed.

use crate::ledger::SubtestLedger;
use crate::parsers::ParseError;

/// Outcome of one executed command: its ledger, or the parse error that
/// voided it. Computed once at the end of a run; immutable thereafter.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    /// The command text that was executed
    pub command: String,

    /// Ledger produced by the command's parser, absent on parse failure
    pub ledger: Option<SubtestLedger>,

    /// The structural inconsistency that voided the ledger, if any
    pub error: Option<ParseError>,
}

impl CommandOutcome {
    /// Outcome for a command whose segment parsed cleanly
    pub fn parsed(command: impl Into<String>, ledger: SubtestLedger) -> Self {
        Self {
            command: command.into(),
            ledger: Some(ledger),
            error: None,
        }
    }

    /// Outcome for a command whose parser reported an inconsistency
    pub fn failed(command: impl Into<String>, error: ParseError) -> Self {
        Self {
            command: command.into(),
            ledger: None,
            error: Some(error),
        }
    }

    /// Sum of (total, passed) for this command
    pub fn aggregate(&self) -> (u64, u64) {
        self.ledger
            .as_ref()
            .map(|ledger| ledger.aggregate())
            .unwrap_or((0, 0))
    }
}

/// Final result of a harness run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Per-command outcomes in execution order
    pub outcomes: Vec<CommandOutcome>,

    /// Whether the interactive session itself aborted before parsing
    pub session_failed: bool,
}

impl RunReport {
    /// Report for a session that aborted mid-protocol; no command
    /// output is trustworthy past that point.
    pub fn session_failure() -> Self {
        Self {
            outcomes: Vec::new(),
            session_failed: true,
        }
    }

    /// Grand (total, passed) over all command outcomes
    pub fn aggregate(&self) -> (u64, u64) {
        self.outcomes
            .iter()
            .fold((0, 0), |(total, passed), outcome| {
                let (t, p) = outcome.aggregate();
                (total + t, passed + p)
            })
    }

    /// A run passes only when the session completed, every parser
    /// succeeded, at least one test ran, and none failed. An empty
    /// result set is a FAIL, not a vacuous pass.
    pub fn passed(&self) -> bool {
        if self.session_failed {
            return false;
        }
        if self.outcomes.iter().any(|outcome| outcome.error.is_some()) {
            return false;
        }
        let (total, passed) = self.aggregate();
        total > 0 && total == passed
    }

    /// Render the summary table.
    pub fn render(&self) -> String {
        let mut out = String::new();

        if self.session_failed {
            out.push_str(
                "Failed to run test commands, please check expect log for detail information\n",
            );
            return out;
        }

        out.push_str(&format!(
            "{:<20} {:>5} {:>5} {:>5}\n",
            "TEST", "TOTAL", "PASS", "FAIL"
        ));
        for outcome in &self.outcomes {
            match (&outcome.ledger, &outcome.error) {
                (Some(ledger), _) => {
                    // seed row for the command itself, then its subtests
                    out.push_str(&format!(
                        "{:<20} {:>5} {:>5} {:>5}\n",
                        outcome.command, 0, 0, 0
                    ));
                    for subtest in ledger {
                        out.push_str(&format!(
                            "{:<20} {:>5} {:>5} {:>5}\n",
                            subtest.name,
                            subtest.total,
                            subtest.passed,
                            subtest.failed()
                        ));
                    }
                }
                (None, Some(error)) => {
                    out.push_str(&format!("{:<20} parse error: {}\n", outcome.command, error));
                }
                (None, None) => {
                    out.push_str(&format!("{:<20} no result\n", outcome.command));
                }
            }
        }

        let (total, passed) = self.aggregate();
        out.push_str("----------------------------\n");
        out.push_str(&format!(
            "Summary: {}/{} (Fail/Total)\n",
            total - passed,
            total
        ));
        out
    }
}
