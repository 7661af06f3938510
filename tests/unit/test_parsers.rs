//! Unit tests for the result-parser family, exercised through the
//! public `ResultParser` interface the harness itself uses.

use bootcheck::parsers::{ParseError, ResultParser};

fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod counted_group_tests {
    use super::*;

    #[test]
    fn test_passing_group_yields_full_ledger() {
        let parser = ResultParser::CountedGroup;
        let ledger = parser
            .parse(&lines(&[
                "foo : Running 3 tests",
                "foo : All tests passed (3/3) in 1ms",
            ]))
            .unwrap();
        let subtest = ledger.get("foo").unwrap();
        assert_eq!(subtest.total, 3);
        assert_eq!(subtest.passed, 3);
        assert_eq!(subtest.failed(), 0);
    }

    #[test]
    fn test_end_marker_without_start_is_error() {
        let parser = ResultParser::CountedGroup;
        let result = parser.parse(&lines(&["bar : All tests passed (1/1) in 2ms"]));
        assert_eq!(
            result,
            Err(ParseError::EndWithoutStart {
                name: "bar".to_string()
            })
        );
    }

    #[test]
    fn test_unterminated_group_is_conservative_not_fatal() {
        let parser = ResultParser::CountedGroup;
        let ledger = parser.parse(&lines(&["hung : Running 7 tests"])).unwrap();
        assert_eq!(ledger.get("hung").unwrap().passed, 0);
        assert_eq!(ledger.get("hung").unwrap().failed(), 7);
    }
}

#[cfg(test)]
mod case_state_tests {
    use super::*;

    #[test]
    fn test_failed_case_with_matching_summary() {
        let parser = ResultParser::CaseState;
        let ledger = parser
            .parse(&lines(&[
                "CASE x [STARTED]",
                "CASE x [FAILED]",
                "CASES: 1 SUCCESS: 0 FAILED: 1",
            ]))
            .unwrap();
        let subtest = ledger.get("x").unwrap();
        assert_eq!((subtest.total, subtest.passed), (1, 0));
    }

    #[test]
    fn test_failed_case_with_zero_failure_summary_is_error() {
        let parser = ResultParser::CaseState;
        let result = parser.parse(&lines(&[
            "CASE x [STARTED]",
            "CASE x [FAILED]",
            "CASES: 1 SUCCESS: 0 FAILED: 0",
        ]));
        assert_eq!(
            result,
            Err(ParseError::InconsistentFailureCount {
                name: "x".to_string()
            })
        );
    }

    #[test]
    fn test_end_of_input_mid_case_is_truncation() {
        let parser = ResultParser::CaseState;
        assert!(matches!(
            parser.parse(&lines(&["CASE x [STARTED]", "CASE x [PASSED]"])),
            Err(ParseError::Truncated { .. })
        ));
    }
}

#[cfg(test)]
mod grouped_assertion_tests {
    use super::*;

    #[test]
    fn test_group_with_mixed_results() {
        let parser = ResultParser::GroupedAssertion;
        let ledger = parser
            .parse(&lines(&[
                "[----------] 3 tests from Vmo",
                "[       OK ] Vmo.Create",
                "[  FAILED  ] Vmo.Map",
                "[       OK ] Vmo.Clone",
            ]))
            .unwrap();
        let subtest = ledger.get("Vmo").unwrap();
        assert_eq!((subtest.total, subtest.passed), (3, 2));
    }

    #[test]
    fn test_result_for_unknown_group_is_error() {
        let parser = ResultParser::GroupedAssertion;
        assert_eq!(
            parser.parse(&lines(&["[       OK ] Nobody.Home"])),
            Err(ParseError::UnknownGroup {
                name: "Nobody".to_string()
            })
        );
    }
}

#[cfg(test)]
mod flat_tests {
    use super::*;

    #[test]
    fn test_results_tally_under_shared_label() {
        let parser = ResultParser::FlatEnumerated {
            label: "tipc-test".to_string(),
        };
        let ledger = parser
            .parse(&lines(&[
                "1: connect: PASSED",
                "2: select: PASSED",
                "3: blocked_read: FAILED",
            ]))
            .unwrap();
        let subtest = ledger.get("tipc-test").unwrap();
        assert_eq!((subtest.total, subtest.passed), (3, 2));
    }

    #[test]
    fn test_no_results_leaves_zero_entry() {
        let parser = ResultParser::FlatEnumerated {
            label: "tipc-test".to_string(),
        };
        let ledger = parser.parse(&[]).unwrap();
        assert_eq!(ledger.get("tipc-test").unwrap().total, 0);
    }
}

#[cfg(test)]
mod invariant_tests {
    use super::*;

    /// Every parser maintains passed <= total on every entry it emits.
    #[test]
    fn test_ledger_invariant_across_parsers() {
        let cases: Vec<(ResultParser, Vec<String>)> = vec![
            (
                ResultParser::CountedGroup,
                lines(&[
                    "a : Running 2 tests",
                    "a : Not all tests passed (1/2) in 1ms",
                ]),
            ),
            (
                ResultParser::CaseState,
                lines(&[
                    "CASE c [STARTED]",
                    "CASE c [PASSED]",
                    "CASES: 1 SUCCESS: 1 FAILED: 0",
                ]),
            ),
            (
                ResultParser::GroupedAssertion,
                lines(&["1 test from G", "[       OK ] G.One"]),
            ),
            (
                ResultParser::FlatEnumerated {
                    label: "flat".to_string(),
                },
                lines(&["1: x: FAILED"]),
            ),
        ];
        for (parser, input) in cases {
            let ledger = parser.parse(&input).unwrap();
            for subtest in &ledger {
                assert!(
                    subtest.passed <= subtest.total,
                    "{} violates passed <= total",
                    subtest.name
                );
            }
        }
    }
}
