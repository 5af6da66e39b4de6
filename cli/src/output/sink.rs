//! `TerminalSink` — forwards raw bytes to the local stdout/stderr.

use std::io::Write as _;

use crate::application::ports::StreamSink;
use crate::domain::StreamOrigin;

/// Writes each chunk to the matching local stream and flushes immediately.
/// Write errors (closed pipe) are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalSink;

impl StreamSink for TerminalSink {
    fn write(&self, origin: StreamOrigin, bytes: &[u8]) {
        match origin {
            StreamOrigin::Stdout => {
                let mut out = std::io::stdout().lock();
                let _ = out.write_all(bytes);
                let _ = out.flush();
            }
            StreamOrigin::Stderr => {
                let mut err = std::io::stderr().lock();
                let _ = err.write_all(bytes);
                let _ = err.flush();
            }
        }
    }
}
