//! PTY Streams
//!
//! Async-friendly interface over the PTY master, backed by the channels
//! the reader/writer threads service. Closure of the output channel
//! means the spawned process went away, which the session driver must
//! distinguish from a quiet console.

use crate::error::{Error, Result};
use std::sync::mpsc::Sender as StdSender;
use tokio::sync::mpsc::UnboundedReceiver;

/// PTY I/O streams wrapper
pub struct PtyStreams {
    /// Receiver for output bytes from the PTY
    output_rx: UnboundedReceiver<Vec<u8>>,
    /// Sender for input bytes to the PTY
    input_tx: StdSender<Vec<u8>>,
}

impl PtyStreams {
    /// Create new PTY streams from channels
    pub fn from_channels(
        output_rx: UnboundedReceiver<Vec<u8>>,
        input_tx: StdSender<Vec<u8>>,
    ) -> Self {
        Self {
            output_rx,
            input_tx,
        }
    }

    /// Write data to the PTY stdin
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        self.input_tx
            .send(data.to_vec())
            .map_err(|e| Error::PtyInputSendFailed {
                reason: e.to_string(),
            })?;
        Ok(())
    }

    /// Wait for the next chunk of process output.
    ///
    /// Returns an error once the process side has closed; the caller
    /// wraps this read in its own timeout.
    pub async fn read(&mut self) -> Result<Vec<u8>> {
        self.output_rx.recv().await.ok_or(Error::StreamClosed {
            literal: String::new(),
        })
    }
}
