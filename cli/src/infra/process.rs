//! Infrastructure implementation of the `ProcessLauncher` / `ProcessHandle` ports.
//!
//! Each launched child gets one reader task per output pipe. The tasks push
//! chunks into an unbounded channel; the handle drains that channel whenever
//! the owning stage observes it, so the controlling task never blocks on a
//! pipe read.

use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};

use crate::application::ports::{ProcessHandle, ProcessLauncher};
use crate::domain::{CapturedOutput, StreamOrigin};

const READ_BUFFER: usize = 8 * 1024;

type Chunk = (StreamOrigin, Vec<u8>);

/// Production launcher backed by `tokio::process`. Must be used inside a
/// tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioProcessLauncher;

impl ProcessLauncher for TokioProcessLauncher {
    type Handle = TokioProcess;

    fn launch(&self, program: &str, args: &[String]) -> Result<TokioProcess> {
        tracing::debug!(program, ?args, "launching subprocess");
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let (tx, chunks) = mpsc::unbounded_channel();
        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(pump(stdout, StreamOrigin::Stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(pump(stderr, StreamOrigin::Stderr, tx));
        }

        Ok(TokioProcess {
            program: program.to_string(),
            child,
            chunks,
            captured: CapturedOutput::default(),
            exit_code: None,
            streams_closed: false,
        })
    }
}

async fn pump<R: AsyncRead + Unpin>(mut reader: R, origin: StreamOrigin, tx: UnboundedSender<Chunk>) {
    let mut buf = vec![0u8; READ_BUFFER];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if tx.send((origin, buf[..n].to_vec())).is_err() {
                    break;
                }
            }
        }
    }
}

/// A running child process with captured output.
pub struct TokioProcess {
    program: String,
    child: tokio::process::Child,
    chunks: UnboundedReceiver<Chunk>,
    captured: CapturedOutput,
    exit_code: Option<i32>,
    streams_closed: bool,
}

impl TokioProcess {
    fn drain(&mut self) {
        loop {
            match self.chunks.try_recv() {
                Ok((origin, chunk)) => self.captured.append(origin, &chunk),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.streams_closed = true;
                    break;
                }
            }
        }
    }
}

impl ProcessHandle for TokioProcess {
    fn try_exit_code(&mut self) -> Result<Option<i32>> {
        self.drain();
        if self.exit_code.is_none() {
            let status = self
                .child
                .try_wait()
                .with_context(|| format!("checking {}", self.program))?;
            self.exit_code = status.map(exit_code);
        }
        // Report the exit only once every pipe has been read to the end.
        Ok(self.exit_code.filter(|_| self.streams_closed))
    }

    fn captured(&self) -> &CapturedOutput {
        &self.captured
    }

    async fn kill(&mut self) -> Result<()> {
        if self.exit_code.is_some() {
            return Ok(());
        }
        self.child
            .kill()
            .await
            .with_context(|| format!("killing {}", self.program))
    }

    async fn wait_streaming(
        &mut self,
        mut on_chunk: impl FnMut(StreamOrigin, &[u8]),
    ) -> Result<i32> {
        while let Some((origin, chunk)) = self.chunks.recv().await {
            on_chunk(origin, &chunk);
        }
        self.streams_closed = true;

        if let Some(code) = self.exit_code {
            return Ok(code);
        }
        let status = self
            .child
            .wait()
            .await
            .with_context(|| format!("waiting for {}", self.program))?;
        let code = exit_code(status);
        self.exit_code = Some(code);
        Ok(code)
    }
}

/// Exit code as a shell would report it: `128 + signal` for signalled children.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
