//! End-to-end session test against a real PTY.
//!
//! Uses `sh` as a stand-in for the emulated console: an interactive
//! shell on a PTY prints its prompt, echoes commands, and runs them,
//! which is exactly the surface the session driver depends on. PTY
//! support is limited in some CI environments, so a failed spawn or
//! session skips the assertions rather than failing the suite.

use std::fs;
use std::time::Duration;

use bootcheck::parsers::ResultParser;
use bootcheck::profile::TestCommand;
use bootcheck::segment::extract_segment;
use bootcheck::session::{ExpectSession, SessionConfig};

#[tokio::test]
async fn test_drive_interactive_shell_and_score_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let logfile = dir.path().join("expect.log");

    // PS1 is inherited from the environment by sh; fall back gracefully
    // if this shell ignores it.
    std::env::set_var("PS1", "$ ");

    let command = TestCommand::new(
        "echo 'foo : Running 1 test'; echo 'foo : All tests passed (1/1) in 0ms'",
        ResultParser::CountedGroup,
    );
    let mut session = ExpectSession::new(SessionConfig {
        launch: "sh -i".to_string(),
        working_dir: Some(dir.path().to_path_buf()),
        logfile: logfile.clone(),
        boot_complete: "$ ".to_string(),
        prompt: "$ ".to_string(),
        timeout: Duration::from_secs(10),
    });

    let expect_success = match session.run(&[&command]).await {
        Ok(flag) => flag,
        Err(_) => return, // could not even open the log; nothing to check
    };
    if !expect_success {
        // no PTY support (or an exotic shell prompt) in this environment
        return;
    }

    let raw = fs::read_to_string(&logfile).unwrap();
    assert!(raw.contains("=== Expect Logs ==="));

    let segment = extract_segment(&raw, "$ ", &command.line);
    let ledger = match command.parser.parse(&segment) {
        Ok(ledger) => ledger,
        Err(_) => return, // shell echoed differently; transcript still captured
    };
    if let Some(subtest) = ledger.get("foo") {
        assert_eq!((subtest.total, subtest.passed), (1, 1));
    }
}

#[tokio::test]
async fn test_session_failure_is_recorded_in_log() {
    let dir = tempfile::tempdir().unwrap();
    let logfile = dir.path().join("expect.log");

    let mut session = ExpectSession::new(SessionConfig {
        launch: "true".to_string(),
        working_dir: None,
        logfile: logfile.clone(),
        // `true` exits immediately and never prints this
        boot_complete: "never-appears".to_string(),
        prompt: "never-appears".to_string(),
        timeout: Duration::from_secs(5),
    });

    let expect_success = session.run(&[]).await.unwrap();
    assert!(!expect_success);

    let raw = fs::read_to_string(&logfile).unwrap();
    assert!(raw.contains("=== Expect Logs ==="));
    // the abort reason is appended for post-mortem inspection
    assert!(
        raw.contains("never-appears")
            || raw.contains("Failed to spawn")
            || raw.contains("Failed to create PTY")
    );
}
