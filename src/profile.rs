//! Target profiles
//!
//! A target profile describes one operating system under test: the
//! literal that signals boot completion, the shell prompt literal, and
//! the ordered commands to run with the parser that scores each one.
//! Built-in profiles cover the targets the harness grew up with;
//! additional profiles come from the configuration file.

use regex::Regex;

use crate::error::{Error, Result};
use crate::parsers::ResultParser;

/// A literal command paired with the parser that interprets its output.
/// Immutable once constructed; many commands may use the same parser kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCommand {
    /// Exact text sent to the console
    pub line: String,

    /// Parser that scores this command's log segment
    pub parser: ResultParser,
}

impl TestCommand {
    pub fn new(line: impl Into<String>, parser: ResultParser) -> Self {
        Self {
            line: line.into(),
            parser,
        }
    }
}

/// Per-operating-system session configuration.
#[derive(Debug, Clone)]
pub struct TargetProfile {
    /// Selector name used on the command line
    pub name: String,

    /// Exact substring that signals the console finished booting
    pub boot_complete: String,

    /// Exact substring the console prints before accepting a command
    pub prompt: String,

    /// Ordered commands to execute after boot
    pub commands: Vec<TestCommand>,
}

impl TargetProfile {
    /// The profiles compiled into the harness.
    pub fn builtin() -> Vec<TargetProfile> {
        vec![
            TargetProfile {
                name: "gzos".to_string(),
                boot_complete: "$ ".to_string(),
                prompt: "$ ".to_string(),
                commands: vec![TestCommand::new("k ut all", ResultParser::CountedGroup)],
            },
            TargetProfile {
                name: "trusty".to_string(),
                boot_complete: "Please press Enter to activate this console.".to_string(),
                prompt: "root@FVP:/ ".to_string(),
                commands: vec![TestCommand::new(
                    "tipc-test -t ta2ta-ipc",
                    ResultParser::FlatEnumerated {
                        label: "tipc-test".to_string(),
                    },
                )],
            },
        ]
    }

    /// Find a profile by selector among built-ins and config-provided
    /// extras. Config profiles shadow built-ins of the same name.
    pub fn resolve(selector: &str, extra: &[TargetProfile]) -> Result<TargetProfile> {
        extra
            .iter()
            .chain(Self::builtin().iter())
            .find(|profile| profile.name == selector)
            .cloned()
            .ok_or_else(|| Error::UnknownProfile {
                selector: selector.to_string(),
            })
    }

    /// Check the profile invariants: boot and prompt literals are
    /// non-empty. An empty command list is degenerate but valid.
    pub fn validate(&self) -> Result<()> {
        if self.boot_complete.is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: format!("profile.{}.boot_complete", self.name),
                reason: "boot-completion literal cannot be empty".to_string(),
            });
        }
        if self.prompt.is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: format!("profile.{}.prompt", self.name),
                reason: "prompt literal cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Commands whose text matches the filter, in profile order.
    pub fn filtered_commands(&self, filter: &CommandFilter) -> Vec<&TestCommand> {
        self.commands
            .iter()
            .filter(|command| filter.matches(&command.line))
            .collect()
    }
}

/// Restricts which of a profile's commands execute.
#[derive(Debug, Clone)]
pub enum CommandFilter {
    /// Run every command
    All,

    /// Run commands whose text matches the pattern
    Pattern(Regex),
}

impl CommandFilter {
    /// Build a filter from the CLI argument. The literal `all` expands
    /// to match-everything; anything else is treated as an unanchored
    /// regex, falling back to a literal substring match when the
    /// pattern does not compile.
    pub fn from_arg(arg: &str) -> CommandFilter {
        if arg == "all" {
            return CommandFilter::All;
        }
        match Regex::new(arg) {
            Ok(regex) => CommandFilter::Pattern(regex),
            Err(e) => {
                warn!("filter '{}' is not a valid regex ({}), matching literally", arg, e);
                // escaped pattern always compiles
                CommandFilter::Pattern(Regex::new(&regex::escape(arg)).unwrap())
            }
        }
    }

    /// Whether a command's text passes the filter
    pub fn matches(&self, command: &str) -> bool {
        match self {
            CommandFilter::All => true,
            CommandFilter::Pattern(regex) => regex.is_match(command),
        }
    }
}
