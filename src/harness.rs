//! Harness entry point
//!
//! Resolves the target profile, drives the interactive session, then
//! slices the transcript per executed command and scores each segment
//! with its parser. The report is built even when individual commands
//! fail to parse; only a session abort or an unknown profile stops the
//! run outright.

use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;

use crate::error::Result;
use crate::profile::{CommandFilter, TargetProfile, TestCommand};
use crate::report::{CommandOutcome, RunReport};
use crate::segment::extract_segment;
use crate::session::{ExpectSession, SessionConfig};

/// Everything one harness run needs, assembled by the caller from CLI
/// and configuration values.
#[derive(Debug, Clone)]
pub struct HarnessOptions {
    /// Target-profile selector
    pub profile: String,

    /// Emulator launch command
    pub launch: String,

    /// Working directory for the spawned process
    pub working_dir: Option<PathBuf>,

    /// Transcript log path
    pub logfile: PathBuf,

    /// Restricts which of the profile's commands execute
    pub filter: CommandFilter,

    /// Upper bound on any single boot/prompt wait
    pub timeout: Duration,
}

/// Execute one full harness run and return its report.
///
/// Returns an error only for configuration problems detected before the
/// session is spawned; everything later is folded into the report.
pub async fn run(options: &HarnessOptions, extra_profiles: &[TargetProfile]) -> Result<RunReport> {
    let profile = TargetProfile::resolve(&options.profile, extra_profiles)?;
    profile.validate()?;

    let commands = profile.filtered_commands(&options.filter);
    info!(
        "profile '{}': running {} of {} commands",
        profile.name,
        commands.len(),
        profile.commands.len()
    );

    write_environment_header(options, &profile)?;

    let mut session = ExpectSession::new(SessionConfig {
        launch: options.launch.clone(),
        working_dir: options.working_dir.clone(),
        logfile: options.logfile.clone(),
        boot_complete: profile.boot_complete.clone(),
        prompt: profile.prompt.clone(),
        timeout: options.timeout,
    });

    let expect_success = session.run(&commands).await?;
    if !expect_success {
        return Ok(RunReport::session_failure());
    }

    Ok(score_transcript(&options.logfile, &profile, &commands)?)
}

/// Truncate the log and write the environment header block. The session
/// appends the transcript after it.
fn write_environment_header(options: &HarnessOptions, profile: &TargetProfile) -> Result<()> {
    let mut log = File::create(&options.logfile)?;
    writeln!(log, "=== Expect Environment ===")?;
    writeln!(log, "Date: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(
        log,
        "Working DIR: {}",
        options
            .working_dir
            .as_ref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| ".".to_string())
    )?;
    writeln!(log, "Expect LOGFILE: {}", options.logfile.display())?;
    writeln!(log, "Target profile: {}", profile.name)?;
    writeln!(log, "Launch CMD: {}", options.launch)?;
    Ok(())
}

/// Extract and parse each executed command's segment from the raw
/// transcript. A parse error voids only that command's ledger.
fn score_transcript(
    logfile: &PathBuf,
    profile: &TargetProfile,
    commands: &[&TestCommand],
) -> Result<RunReport> {
    // the transcript is raw console bytes and need not be valid UTF-8
    let raw = String::from_utf8_lossy(&fs::read(logfile)?).into_owned();

    let outcomes = commands
        .iter()
        .map(|command| {
            let segment = extract_segment(&raw, &profile.prompt, &command.line);
            match command.parser.parse(&segment) {
                Ok(ledger) => CommandOutcome::parsed(&command.line, ledger),
                Err(error) => {
                    warn!("command '{}' failed to parse: {}", command.line, error);
                    CommandOutcome::failed(&command.line, error)
                }
            }
        })
        .collect();

    Ok(RunReport {
        outcomes,
        session_failed: false,
    })
}
