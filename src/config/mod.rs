//! Configuration management for bootcheck
//!
//! Harness settings come from a TOML file merged over built-in
//! defaults: where to find the emulator launch command, where the
//! transcript log goes, wait timeouts, symbolication paths, and any
//! extra target profiles beyond the built-ins.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::parsers::ResultParser;
use crate::profile::{TargetProfile, TestCommand};

/// Main configuration structure for bootcheck
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Emulator launch configuration
    #[serde(default)]
    pub launch: LaunchConfig,

    /// Session wait configuration
    #[serde(default)]
    pub session: SessionSettings,

    /// Backtrace symbolication paths
    #[serde(default)]
    pub symbolize: SymbolizeSettings,

    /// Extra target profiles beyond the built-ins
    #[serde(default, rename = "profile")]
    pub profiles: Vec<ProfileConfig>,
}

/// Where and how the emulator is started
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Command line that starts the emulator
    pub command: Option<String>,

    /// Working directory for the spawned process
    pub working_dir: Option<PathBuf>,

    /// Transcript log path
    pub logfile: PathBuf,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            command: None,
            working_dir: None,
            logfile: PathBuf::from("expect.log"),
        }
    }
}

/// Session wait bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Upper bound in seconds on any single boot/prompt wait
    pub timeout_secs: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { timeout_secs: 120 }
    }
}

impl SessionSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Paths used to resolve frame addresses to source lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolizeSettings {
    /// External address-to-line tool
    pub addr2line: PathBuf,

    /// Unstripped executables directory
    pub exe_dir: PathBuf,

    /// Unstripped shared libraries directory
    pub lib_dir: PathBuf,

    /// Debug-symbol sysroot fallback for shared libraries
    pub sysroot_debug_dir: PathBuf,
}

impl Default for SymbolizeSettings {
    fn default() -> Self {
        Self {
            addr2line: PathBuf::from("addr2line"),
            exe_dir: PathBuf::from("exe.unstripped"),
            lib_dir: PathBuf::from("lib.unstripped"),
            sysroot_debug_dir: PathBuf::from("sysroot/debug"),
        }
    }
}

/// A target profile as written in the configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Selector name
    pub name: String,

    /// Boot-completion literal
    pub boot_complete: String,

    /// Prompt literal
    pub prompt: String,

    /// Commands to run after boot
    #[serde(default, rename = "command")]
    pub commands: Vec<CommandConfig>,
}

/// One command entry inside a profile table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Exact command text
    pub line: String,

    /// Result-parser kind name
    pub parser: String,

    /// Ledger entry label, used by the flat parser
    pub label: Option<String>,
}

impl Config {
    /// Validate the configuration and build the extra target profiles.
    pub fn target_profiles(&self) -> Result<Vec<TargetProfile>> {
        self.profiles
            .iter()
            .map(|profile| {
                let commands = profile
                    .commands
                    .iter()
                    .map(|command| {
                        let parser = ResultParser::from_kind(
                            &command.parser,
                            command.label.as_deref(),
                        )?;
                        Ok(TestCommand::new(command.line.clone(), parser))
                    })
                    .collect::<Result<Vec<_>>>()?;

                let target = TargetProfile {
                    name: profile.name.clone(),
                    boot_complete: profile.boot_complete.clone(),
                    prompt: profile.prompt.clone(),
                    commands,
                };
                target.validate()?;
                Ok(target)
            })
            .collect()
    }

    /// Validate fields that do not depend on profile construction.
    pub fn validate(&self) -> Result<()> {
        if self.session.timeout_secs == 0 {
            return Err(Error::ConfigValidationFailed {
                field: "session.timeout_secs".to_string(),
                reason: "timeout must be nonzero".to_string(),
            });
        }
        if self.launch.logfile.as_os_str().is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: "launch.logfile".to_string(),
                reason: "log path cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}
