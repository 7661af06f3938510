//! Integration tests for the transcript-to-report pipeline:
//! segmentation, parsing, aggregation, and rendering, driven the same
//! way the harness drives them.

use bootcheck::parsers::ResultParser;
use bootcheck::profile::{CommandFilter, TargetProfile, TestCommand};
use bootcheck::report::{CommandOutcome, RunReport};
use bootcheck::segment::extract_segment;

/// Score a canned transcript against a profile, mirroring the harness
/// scoring loop.
fn score(raw: &str, profile: &TargetProfile, filter: &CommandFilter) -> RunReport {
    let outcomes = profile
        .filtered_commands(filter)
        .into_iter()
        .map(|command| {
            let segment = extract_segment(raw, &profile.prompt, &command.line);
            match command.parser.parse(&segment) {
                Ok(ledger) => CommandOutcome::parsed(&command.line, ledger),
                Err(error) => CommandOutcome::failed(&command.line, error),
            }
        })
        .collect();
    RunReport {
        outcomes,
        session_failed: false,
    }
}

#[test]
fn test_gzos_passing_run_end_to_end() {
    let raw = concat!(
        "=== Expect Environment ===\n",
        "Target profile: gzos\n",
        "=== Expect Logs ===\n",
        "booting...\r\n",
        "$ \r\n",
        "$ k ut all\r\n",
        "\x1b[32mfoo : Running 3 tests\x1b[0m\r\n",
        "foo : All tests passed (3/3) in 1ms\r\n",
        "$ \r\n",
    );
    let profile = TargetProfile::resolve("gzos", &[]).unwrap();
    let report = score(raw, &profile, &CommandFilter::All);

    assert!(report.passed());
    let rendered = report.render();
    assert!(rendered.contains("k ut all"));
    assert!(rendered.contains("foo"));
    assert!(rendered.contains("Summary: 0/3 (Fail/Total)"));
}

#[test]
fn test_gzos_failing_group_fails_run() {
    let raw = concat!(
        "$ k ut all\r\n",
        "foo : Running 3 tests\r\n",
        "foo : Not all tests passed (2/3) in 4ms\r\n",
        "$ \r\n",
    );
    let profile = TargetProfile::resolve("gzos", &[]).unwrap();
    let report = score(raw, &profile, &CommandFilter::All);

    assert!(!report.passed());
    assert!(report.render().contains("Summary: 1/3 (Fail/Total)"));
}

#[test]
fn test_trusty_flat_results() {
    let raw = concat!(
        "Please press Enter to activate this console.\r\n",
        "root@FVP:/ tipc-test -t ta2ta-ipc\r\n",
        "1: connect: PASSED\r\n",
        "2: echo: PASSED\r\n",
        "root@FVP:/ \r\n",
    );
    let profile = TargetProfile::resolve("trusty", &[]).unwrap();
    let report = score(raw, &profile, &CommandFilter::All);

    assert!(report.passed());
    assert_eq!(report.aggregate(), (2, 2));
    assert!(report.render().contains("tipc-test"));
}

#[test]
fn test_parse_error_voids_one_command_not_the_run_report() {
    let profile = TargetProfile {
        name: "two".to_string(),
        boot_complete: "# ".to_string(),
        prompt: "# ".to_string(),
        commands: vec![
            TestCommand::new("bad", ResultParser::CountedGroup),
            TestCommand::new("good", ResultParser::CountedGroup),
        ],
    };
    let raw = concat!(
        "# bad\r\n",
        "b : All tests passed (1/1) in 1ms\r\n",
        "# good\r\n",
        "a : Running 1 test\r\n",
        "a : All tests passed (1/1) in 1ms\r\n",
        "# \r\n",
    );
    let report = score(raw, &profile, &CommandFilter::All);

    // the run fails, but the clean command's results still render
    assert!(!report.passed());
    let rendered = report.render();
    assert!(rendered.contains("parse error"));
    assert_eq!(report.outcomes[1].aggregate(), (1, 1));
}

#[test]
fn test_all_commands_filtered_out_is_fail_not_vacuous_pass() {
    let profile = TargetProfile::resolve("gzos", &[]).unwrap();
    let report = score("$ \r\n", &profile, &CommandFilter::from_arg("no-such-cmd"));

    assert!(report.outcomes.is_empty());
    assert_eq!(report.aggregate(), (0, 0));
    assert!(!report.passed());
}

#[test]
fn test_empty_command_list_is_fail() {
    let profile = TargetProfile {
        name: "empty".to_string(),
        boot_complete: "> ".to_string(),
        prompt: "> ".to_string(),
        commands: vec![],
    };
    let report = score("> \r\n", &profile, &CommandFilter::All);
    assert!(!report.passed());
}

#[test]
fn test_case_state_and_grouped_profiles_from_config_kinds() {
    let profile = TargetProfile {
        name: "mixed".to_string(),
        boot_complete: "# ".to_string(),
        prompt: "# ".to_string(),
        commands: vec![
            TestCommand::new(
                "runtest",
                ResultParser::from_kind("case-state", None).unwrap(),
            ),
            TestCommand::new(
                "gtests",
                ResultParser::from_kind("grouped-assertion", None).unwrap(),
            ),
        ],
    };
    let raw = concat!(
        "# runtest\r\n",
        "CASE ipc [STARTED]\r\n",
        "CASE ipc [PASSED]\r\n",
        "CASES: 1 SUCCESS: 1 FAILED: 0\r\n",
        "# gtests\r\n",
        "[----------] 2 tests from Fs\r\n",
        "[       OK ] Fs.Read\r\n",
        "[       OK ] Fs.Write\r\n",
        "# \r\n",
    );
    let report = score(raw, &profile, &CommandFilter::All);

    assert!(report.passed());
    assert_eq!(report.aggregate(), (3, 3));
}
