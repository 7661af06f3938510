//! Result parsers
//!
//! One parser per supported test-framework output format. Each consumes
//! the cleaned line sequence of a log segment and produces a
//! [`SubtestLedger`](crate::ledger::SubtestLedger) or a structural
//! [`ParseError`]. The family is a closed set: the known frameworks are
//! enumerated explicitly rather than dispatched through an open trait
//! object.

pub mod case_state;
pub mod counted_group;
pub mod flat;
pub mod grouped_assertion;

use std::fmt;

use crate::ledger::SubtestLedger;

/// Result alias for parser operations
pub type ParseResult = std::result::Result<SubtestLedger, ParseError>;

/// Structural inconsistency detected while scanning a log segment.
///
/// A parse error voids the ledger for that command and marks the
/// command failed; it never aborts sibling commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A start marker repeats a test name that is already tracked
    DuplicateStart { name: String },

    /// An end marker names a test that was never started
    EndWithoutStart { name: String },

    /// A result marker names a different case than the one in flight
    CaseMismatch { expected: String, found: String },

    /// A recognized marker appeared in a state where it is not accepted
    MarkerOutOfPlace { marker: String, state: String },

    /// A case was marked FAILED but the summary reports zero failures
    InconsistentFailureCount { name: String },

    /// Input ended while a case state machine was mid-flight
    Truncated { state: String },

    /// A result line references a group that was never opened
    UnknownGroup { name: String },

    /// A repeated group banner disagrees with the recorded expected count
    GroupSizeMismatch {
        name: String,
        expected: u64,
        found: u64,
    },

    /// A tally would record more passes than its expected total
    PassedExceedsTotal {
        name: String,
        passed: u64,
        total: u64,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::DuplicateStart { name } => {
                write!(f, "test ({}) already started", name)
            }
            ParseError::EndWithoutStart { name } => {
                write!(f, "test ({}) not started yet", name)
            }
            ParseError::CaseMismatch { expected, found } => {
                write!(f, "result for case ({}) while case ({}) is running", found, expected)
            }
            ParseError::MarkerOutOfPlace { marker, state } => {
                write!(f, "marker '{}' not accepted in state {}", marker, state)
            }
            ParseError::InconsistentFailureCount { name } => {
                write!(f, "case ({}) failed but summary reports zero failures", name)
            }
            ParseError::Truncated { state } => {
                write!(f, "input ended in state {} (truncated transcript)", state)
            }
            ParseError::UnknownGroup { name } => {
                write!(f, "result for group ({}) that was never opened", name)
            }
            ParseError::GroupSizeMismatch {
                name,
                expected,
                found,
            } => {
                write!(
                    f,
                    "group ({}) re-announced with {} tests, expected {}",
                    name, found, expected
                )
            }
            ParseError::PassedExceedsTotal {
                name,
                passed,
                total,
            } => {
                write!(
                    f,
                    "test ({}) reports {} passed out of {}",
                    name, passed, total
                )
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// The closed family of result parsers, selected per command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultParser {
    /// Counted-group format of the embedded kernel unit-test runner
    CountedGroup,

    /// `CASE x [STARTED]/[PASSED|FAILED]` runner with trailing summary
    CaseState,

    /// xUnit-style `N tests from Group` plus `[  OK  ] Group.Case` lines
    GroupedAssertion,

    /// Flat `N: name: PASSED|FAILED` list tallied under one shared entry
    FlatEnumerated { label: String },
}

impl ResultParser {
    /// Parse a cleaned log segment into a ledger
    pub fn parse(&self, lines: &[String]) -> ParseResult {
        match self {
            ResultParser::CountedGroup => counted_group::parse(lines),
            ResultParser::CaseState => case_state::parse(lines),
            ResultParser::GroupedAssertion => grouped_assertion::parse(lines),
            ResultParser::FlatEnumerated { label } => flat::parse(lines, label),
        }
    }

    /// Stable kind name used by the configuration file
    pub fn kind(&self) -> &'static str {
        match self {
            ResultParser::CountedGroup => "counted-group",
            ResultParser::CaseState => "case-state",
            ResultParser::GroupedAssertion => "grouped-assertion",
            ResultParser::FlatEnumerated { .. } => "flat-enumerated",
        }
    }

    /// Build a parser from its configuration kind name.
    ///
    /// The flat parser tallies everything under one shared entry and
    /// needs a `label` for it; the label defaults to the kind name when
    /// the profile omits it.
    pub fn from_kind(kind: &str, label: Option<&str>) -> crate::error::Result<Self> {
        match kind {
            "counted-group" => Ok(ResultParser::CountedGroup),
            "case-state" => Ok(ResultParser::CaseState),
            "grouped-assertion" => Ok(ResultParser::GroupedAssertion),
            "flat-enumerated" => Ok(ResultParser::FlatEnumerated {
                label: label.unwrap_or(kind).to_string(),
            }),
            _ => Err(crate::error::Error::UnknownParserKind {
                kind: kind.to_string(),
            }),
        }
    }
}
