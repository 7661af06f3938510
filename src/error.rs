//! Error types and Result aliases for bootcheck

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::parsers::ParseError;

/// Result type alias for bootcheck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for bootcheck
#[derive(Debug)]
pub enum Error {
    // === PTY-related errors ===
    /// Failed to create PTY
    PtyCreationFailed {
        command: String,
        reason: String,
    },

    /// Failed to spawn command in PTY
    CommandSpawnFailed {
        command: String,
        reason: String,
    },

    /// Failed to clone PTY reader
    PtyReaderCloneFailed {
        reason: String,
    },

    /// Failed to take PTY writer
    PtyWriterTakeFailed {
        reason: String,
    },

    /// Failed to send input to PTY
    PtyInputSendFailed {
        reason: String,
    },

    // === Session errors ===
    /// A boot or prompt literal did not appear within the timeout
    ExpectTimeout {
        literal: String,
        timeout: Duration,
    },

    /// The process output stream closed while waiting for a literal
    StreamClosed {
        literal: String,
    },

    /// The launch command string is empty
    EmptyLaunchCommand,

    // === Result parsing errors ===
    /// A parser detected a structural inconsistency in a log segment
    Parse(ParseError),

    // === Configuration errors ===
    /// Unknown target-profile selector
    UnknownProfile {
        selector: String,
    },

    /// Failed to load configuration file
    ConfigLoadFailed {
        path: PathBuf,
        reason: String,
    },

    /// Configuration file not found
    ConfigNotFound,

    /// Configuration validation failed
    ConfigValidationFailed {
        field: String,
        reason: String,
    },

    /// Failed to parse configuration
    ConfigParseFailed {
        format: String,
        reason: String,
    },

    /// Unknown result-parser kind named in a profile
    UnknownParserKind {
        kind: String,
    },

    // === Collaborator errors ===
    /// Failed to run the external address-to-line tool
    AddrToLineFailed {
        tool: PathBuf,
        reason: String,
    },

    /// Failed to extract an SDK archive
    ArchiveExtractFailed {
        archive: PathBuf,
        reason: String,
    },

    /// SDK manifest or atom metadata could not be loaded
    ManifestLoadFailed {
        path: PathBuf,
        reason: String,
    },

    /// Neither an archive nor a directory was given to the SDK unpacker
    NoSdkSource,

    // === I/O and serialization errors (kept for compatibility) ===
    /// I/O errors
    Io(std::io::Error),

    /// Serialization errors
    Serde(serde_json::Error),

    /// TOML parsing errors
    Toml(toml::de::Error),

    /// Regex compilation errors
    Regex(regex::Error),

    // === Generic fallback (use sparingly) ===
    /// Generic errors (for cases not yet categorized)
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // PTY errors
            Error::PtyCreationFailed { command, reason } => {
                write!(f, "Failed to create PTY for command '{}': {}", command, reason)
            }
            Error::CommandSpawnFailed { command, reason } => {
                write!(f, "Failed to spawn command '{}': {}", command, reason)
            }
            Error::PtyReaderCloneFailed { reason } => {
                write!(f, "Failed to clone PTY reader: {}", reason)
            }
            Error::PtyWriterTakeFailed { reason } => {
                write!(f, "Failed to take PTY writer: {}", reason)
            }
            Error::PtyInputSendFailed { reason } => {
                write!(f, "Failed to send input to PTY: {}", reason)
            }

            // Session errors
            Error::ExpectTimeout { literal, timeout } => {
                write!(f, "Timed out after {:?} waiting for '{}'", timeout, literal)
            }
            Error::StreamClosed { literal } => {
                write!(f, "Process output closed while waiting for '{}'", literal)
            }
            Error::EmptyLaunchCommand => {
                write!(f, "Launch command cannot be empty")
            }

            // Parsing errors
            Error::Parse(err) => write!(f, "Parse error: {}", err),

            // Configuration errors
            Error::UnknownProfile { selector } => {
                write!(f, "Target profile is not supported ({})", selector)
            }
            Error::ConfigLoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path.display(), reason)
            }
            Error::ConfigNotFound => {
                write!(f, "Configuration file not found")
            }
            Error::ConfigValidationFailed { field, reason } => {
                write!(f, "Configuration validation failed for '{}': {}", field, reason)
            }
            Error::ConfigParseFailed { format, reason } => {
                write!(f, "Failed to parse {} config: {}", format, reason)
            }
            Error::UnknownParserKind { kind } => {
                write!(f, "Unknown result-parser kind '{}'", kind)
            }

            // Collaborator errors
            Error::AddrToLineFailed { tool, reason } => {
                write!(f, "Failed to run '{}': {}", tool.display(), reason)
            }
            Error::ArchiveExtractFailed { archive, reason } => {
                write!(f, "Failed to extract '{}': {}", archive.display(), reason)
            }
            Error::ManifestLoadFailed { path, reason } => {
                write!(f, "Failed to load metadata from '{}': {}", path.display(), reason)
            }
            Error::NoSdkSource => {
                write!(f, "Either an archive or a directory must be set")
            }

            // I/O and serialization errors
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Serde(err) => write!(f, "Serialization error: {}", err),
            Error::Toml(err) => write!(f, "TOML parsing error: {}", err),
            Error::Regex(err) => write!(f, "Regex compilation error: {}", err),

            // Generic fallback
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serde(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Toml(err)
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::Regex(err)
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}
