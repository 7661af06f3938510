//! Interactive session driver
//!
//! Runs the boot-then-command protocol against the spawned emulator and
//! captures every byte of console output to the transcript log. The
//! protocol is a strict sequence with no resynchronization: wait for the
//! boot-completion literal, then for each command wait for the prompt
//! and send the command, then wait for one final prompt. Any timeout or
//! stream closure voids the rest of the run.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::Instant;

use crate::error::{Error, Result};
use crate::profile::TestCommand;
use crate::pty::{spawn_pty_process, PtyStreams};

/// Everything the driver needs to run one session. Built explicitly by
/// the harness from CLI and config values rather than read from ambient
/// process state.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Command line that launches the emulator
    pub launch: String,

    /// Working directory for the spawned process
    pub working_dir: Option<PathBuf>,

    /// Transcript log path; the session appends to it
    pub logfile: PathBuf,

    /// Exact substring that signals boot completion
    pub boot_complete: String,

    /// Exact substring the console prompt prints
    pub prompt: String,

    /// Upper bound on any single boot/prompt wait
    pub timeout: Duration,
}

/// Drives one interactive session over a PTY.
pub struct ExpectSession {
    config: SessionConfig,
    /// Rolling window of console output not yet consumed by a match
    buffer: String,
}

impl ExpectSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            buffer: String::new(),
        }
    }

    /// Execute the boot-then-command protocol.
    ///
    /// Returns `Ok(true)` when every wait succeeded, `Ok(false)` when
    /// the protocol aborted; in the latter case the failure is appended
    /// to the transcript log for post-mortem inspection. Errors are
    /// returned only for failures to open the log itself. The spawned
    /// process is forcibly terminated on every exit path.
    pub async fn run(&mut self, commands: &[&TestCommand]) -> Result<bool> {
        let mut log = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.config.logfile)?;
        log.write_all(b"=== Expect Logs ===\n")?;

        let (mut child, mut streams) = match spawn_pty_process(
            &self.config.launch,
            self.config.working_dir.as_deref(),
        ) {
            Ok(spawned) => spawned,
            Err(e) => {
                error!("failed to spawn '{}': {}", self.config.launch, e);
                write!(log, "{}", e)?;
                return Ok(false);
            }
        };
        info!(
            "spawned '{}' (pid {:?})",
            self.config.launch,
            child.pid()
        );

        let outcome = self.drive(&mut streams, commands, &mut log).await;

        // no leaked children on any exit path
        child.kill();

        match outcome {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!("session aborted: {}", e);
                write!(log, "{}", e)?;
                Ok(false)
            }
        }
    }

    /// The strict protocol sequence. A failure at command *k* voids all
    /// commands after it.
    async fn drive(
        &mut self,
        streams: &mut PtyStreams,
        commands: &[&TestCommand],
        log: &mut File,
    ) -> Result<()> {
        let boot_complete = self.config.boot_complete.clone();
        let prompt = self.config.prompt.clone();

        self.expect_exact(streams, &boot_complete, log).await?;
        self.send_line(streams, "")?;

        for command in commands {
            self.expect_exact(streams, &prompt, log).await?;
            debug!("sending command '{}'", command.line);
            self.send_line(streams, &command.line)?;
        }

        self.expect_exact(streams, &prompt, log).await?;
        self.send_line(streams, "")?;
        Ok(())
    }

    /// Block until `literal` appears verbatim in the console output.
    ///
    /// This is an exact substring match, never a pattern match: boot and
    /// prompt literals routinely contain regex metacharacters. Bytes are
    /// appended to the transcript log as they arrive, and the buffer
    /// keeps everything after the match so back-to-back literals are
    /// found across read boundaries.
    async fn expect_exact(
        &mut self,
        streams: &mut PtyStreams,
        literal: &str,
        log: &mut File,
    ) -> Result<()> {
        let deadline = Instant::now() + self.config.timeout;

        loop {
            if let Some(pos) = self.buffer.find(literal) {
                let end = pos + literal.len();
                self.buffer.drain(..end);
                return Ok(());
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(Error::ExpectTimeout {
                    literal: literal.to_string(),
                    timeout: self.config.timeout,
                });
            }

            let chunk = match tokio::time::timeout_at(deadline, streams.read()).await {
                Ok(Ok(chunk)) => chunk,
                Ok(Err(Error::StreamClosed { .. })) => {
                    return Err(Error::StreamClosed {
                        literal: literal.to_string(),
                    });
                }
                Ok(Err(e)) => return Err(e),
                Err(_) => {
                    return Err(Error::ExpectTimeout {
                        literal: literal.to_string(),
                        timeout: self.config.timeout,
                    });
                }
            };

            log.write_all(&chunk)?;
            self.buffer.push_str(&String::from_utf8_lossy(&chunk));
        }
    }

    /// Send a line of input followed by a line terminator. An empty
    /// `text` sends just the terminator, the way an operator would press
    /// Enter.
    fn send_line(&mut self, streams: &mut PtyStreams, text: &str) -> Result<()> {
        streams.write(format!("{}\n", text).as_bytes())
    }
}
