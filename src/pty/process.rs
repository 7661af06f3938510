//! PTY Process Spawning
//!
//! Handles the creation and spawning of the emulator process under a
//! pseudoterminal using the portable-pty crate for cross-platform
//! compatibility.

use portable_pty::{native_pty_system, Child, CommandBuilder, PtyPair, PtySize};
use std::io::{Read, Write};
use std::path::Path;
use std::sync::mpsc::channel;
use std::thread;
use tokio::sync::mpsc::unbounded_channel;

use super::streams::PtyStreams;
use crate::error::{Error, Result};

/// Handle to the spawned child process
pub struct PtyChild {
    child: Box<dyn Child + Send + Sync>,
    /// Full launch command, kept for diagnostics
    pub command_line: String,
}

impl PtyChild {
    /// Process id, if the platform reports one
    pub fn pid(&self) -> Option<u32> {
        self.child.process_id()
    }

    /// Forcibly terminate the process. Errors are reported but not
    /// propagated: the process may already have exited.
    pub fn kill(&mut self) {
        if let Err(e) = self.child.kill() {
            debug!("kill '{}' failed: {}", self.command_line, e);
        }
        // reap so the child does not linger as a zombie
        let _ = self.child.wait();
    }
}

impl std::fmt::Debug for PtyChild {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PtyChild")
            .field("command_line", &self.command_line)
            .field("pid", &self.pid())
            .finish()
    }
}

/// Spawn the launch command under a new PTY.
///
/// The command line is split on whitespace, the way the original
/// launcher strings for emulators are written; quoting is not
/// interpreted.
pub fn spawn_pty_process(
    command_line: &str,
    working_directory: Option<&Path>,
) -> Result<(PtyChild, PtyStreams)> {
    let mut parts = command_line.split_whitespace();
    let program = parts.next().ok_or(Error::EmptyLaunchCommand)?;
    let args: Vec<&str> = parts.collect();

    let pty_system = native_pty_system();

    let pair = pty_system
        .openpty(PtySize {
            rows: 24,
            cols: 80,
            pixel_width: 0,
            pixel_height: 0,
        })
        .map_err(|e| Error::PtyCreationFailed {
            command: command_line.to_string(),
            reason: e.to_string(),
        })?;

    let mut cmd_builder = CommandBuilder::new(program);
    cmd_builder.args(&args);
    if let Some(dir) = working_directory {
        cmd_builder.cwd(dir);
    }

    let child = pair
        .slave
        .spawn_command(cmd_builder)
        .map_err(|e| Error::CommandSpawnFailed {
            command: command_line.to_string(),
            reason: e.to_string(),
        })?;

    let streams = create_pty_streams(pair)?;

    Ok((
        PtyChild {
            child,
            command_line: command_line.to_string(),
        },
        streams,
    ))
}

/// Create PTY streams from a PTY pair
fn create_pty_streams(pair: PtyPair) -> Result<PtyStreams> {
    // Bridge blocking PTY I/O to async via channels and background threads
    let mut master_reader =
        pair.master
            .try_clone_reader()
            .map_err(|e| Error::PtyReaderCloneFailed {
                reason: e.to_string(),
            })?;
    let mut master_writer = pair
        .master
        .take_writer()
        .map_err(|e| Error::PtyWriterTakeFailed {
            reason: e.to_string(),
        })?;

    // Channel: PTY output -> async consumer
    let (tx_output, rx_output) = unbounded_channel::<Vec<u8>>();
    // Channel: async producer (stdin) -> PTY writer thread
    let (tx_stdin, rx_stdin) = channel::<Vec<u8>>();

    // Reader thread: read from PTY master and forward to async channel.
    // Dropping tx_output on EOF closes the channel, which the session
    // observes as a stream closure.
    thread::spawn(move || {
        let mut buf = [0u8; 4096];
        loop {
            match master_reader.read(&mut buf) {
                Ok(0) => {
                    debug!("PTY read EOF - process terminated");
                    break;
                }
                Ok(n) => {
                    if tx_output.send(buf[..n].to_vec()).is_err() {
                        debug!("PTY read: receiver dropped, stopping reader thread");
                        break;
                    }
                }
                Err(e) => {
                    if e.kind() == std::io::ErrorKind::Interrupted {
                        continue;
                    }
                    debug!("PTY read error ({}): {}", e.kind(), e);
                    break;
                }
            }
        }
        debug!("PTY reader thread exiting");
    });

    // Writer thread: receive input data and write to PTY master
    thread::spawn(move || {
        while let Ok(data) = rx_stdin.recv() {
            match master_writer.write_all(&data) {
                Ok(()) => {
                    if let Err(e) = master_writer.flush() {
                        debug!("PTY flush error: {}", e);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    debug!("PTY write error ({}): {}", e.kind(), e);
                    break;
                }
            }
        }
        debug!("PTY writer thread exiting");
    });

    Ok(PtyStreams::from_channels(rx_output, tx_stdin))
}
