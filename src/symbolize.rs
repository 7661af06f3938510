//! Backtrace symbolication
//!
//! Resolves bare-metal backtrace frames found in a transcript to source
//! locations. A frame line carries the module path and the frame
//! address; the module is mapped to an on-disk unstripped binary and
//! handed to an external address-to-line tool.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::SymbolizeSettings;
use crate::error::{Error, Result};

static BACKTRACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"bt#(\d+).* \(([a-z:/_.]*),(0x[0-9a-f]+)").unwrap());

/// One frame extracted from a backtrace line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacktraceFrame {
    /// Frame number
    pub frame: u64,

    /// Module path as printed by the kernel
    pub module: String,

    /// Hexadecimal frame address
    pub address: String,
}

/// Match a single transcript line against the backtrace format.
pub fn scan_line(line: &str) -> Option<BacktraceFrame> {
    BACKTRACE.captures(line).map(|caps| BacktraceFrame {
        frame: caps[1].parse().unwrap_or(0),
        module: caps[2].to_string(),
        address: caps[3].to_string(),
    })
}

/// Map a module path to the unstripped binary to symbolize against.
///
/// Shared libraries live in the library search path, with the
/// debug-symbol sysroot as fallback; anything else is an executable
/// looked up by basename.
pub fn resolve_binary(settings: &SymbolizeSettings, module: &str) -> PathBuf {
    if module.contains(".so") {
        let lib_path = settings.lib_dir.join(module);
        if lib_path.is_file() {
            return lib_path;
        }
        return settings.sysroot_debug_dir.join(module);
    }
    let basename = module.rsplit('/').next().unwrap_or(module);
    settings.exe_dir.join(basename)
}

/// Symbolize every backtrace line in the transcript, writing
/// `<frame> <resolved-location>` lines to `out`.
pub fn symbolize_log(
    settings: &SymbolizeSettings,
    logfile: &Path,
    out: &mut impl Write,
) -> Result<()> {
    let raw = String::from_utf8_lossy(&fs::read(logfile)?).into_owned();

    for line in raw.lines() {
        let Some(frame) = scan_line(line) else {
            continue;
        };
        let binary = resolve_binary(settings, &frame.module);
        let location = addr_to_line(settings, &binary, &frame.address)?;
        writeln!(out, "{} {}", frame.frame, location)?;
    }
    Ok(())
}

/// Invoke the external address-to-line tool for one address.
fn addr_to_line(settings: &SymbolizeSettings, binary: &Path, address: &str) -> Result<String> {
    let output = Command::new(&settings.addr2line)
        .arg("-e")
        .arg(binary)
        .arg(address)
        .output()
        .map_err(|e| Error::AddrToLineFailed {
            tool: settings.addr2line.clone(),
            reason: e.to_string(),
        })?;

    Ok(String::from_utf8_lossy(&output.stdout)
        .trim_end_matches('\n')
        .to_string())
}
