//! bootcheck - an interactive console test harness
//!
//! bootcheck boots an emulated device, drives its serial console over a
//! pseudoterminal, and scores the resulting transcript into a pass/fail
//! test report.
//!
//! ## How a run works
//!
//! 1. A [`profile::TargetProfile`] names the boot-completion literal,
//!    the shell prompt literal, and the commands to run.
//! 2. The [`session::ExpectSession`] spawns the emulator under a PTY,
//!    waits for boot, sends each command after its prompt, and appends
//!    every console byte to the transcript log.
//! 3. [`segment`] slices the transcript into per-command line segments,
//!    stripping terminal control sequences along the way.
//! 4. Each segment is handed to the command's [`parsers::ResultParser`],
//!    a small state machine over free-form text that recovers
//!    structured pass/fail counts or reports a structural inconsistency.
//! 5. [`report::RunReport`] aggregates every command's
//!    [`ledger::SubtestLedger`] into the final verdict: PASS only when
//!    at least one test ran and none failed.
//!
//! ## Module Organization
//!
//! ### Core Functionality
//!
//! - [`profile`] - Target profiles, commands, and the command filter
//! - [`session`] - The boot-then-command protocol driver
//! - [`pty`] - PTY process spawning and I/O streams
//! - [`sanitize`] - Control-sequence stripping for transcript lines
//! - [`segment`] - Per-command transcript slicing
//! - [`parsers`] - The result-parser family
//! - [`ledger`] - Subtest tallies
//! - [`report`] - Run results and table rendering
//! - [`harness`] - End-to-end run orchestration
//! - [`mod@error`] - Error types and Result aliases
//!
//! ### Collaborators
//!
//! - [`symbolize`] - Backtrace frame symbolication
//! - [`sdk`] - SDK archive unpacking and atom dispatch
//!
//! ## Safety and Reliability
//!
//! - **No Panics:** All fallible operations return `Result`
//! - **Fail Safe:** inconsistent test output is a parse error, never a
//!   silently optimistic tally
//! - **No Leaked Children:** the spawned emulator is forcibly
//!   terminated on every exit path

#[macro_use]
extern crate tracing;

pub mod config;
pub mod error;

// Core modules
pub mod harness;
pub mod ledger;
pub mod parsers;
pub mod profile;
pub mod pty;
pub mod report;
pub mod sanitize;
pub mod segment;
pub mod session;

// Collaborator modules
pub mod sdk;
pub mod symbolize;

// Re-exports for core functionality
pub use config::loader::ConfigLoader;
pub use config::Config;
pub use error::{Error, Result};
pub use harness::HarnessOptions;
pub use ledger::{Subtest, SubtestLedger};
pub use parsers::{ParseError, ResultParser};
pub use profile::{CommandFilter, TargetProfile, TestCommand};
pub use report::RunReport;
pub use session::{ExpectSession, SessionConfig};

// Version information
/// The current version of bootcheck from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");
