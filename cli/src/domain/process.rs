//! Captured subprocess output.

/// Which stream a chunk of subprocess output came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOrigin {
    Stdout,
    Stderr,
}

impl StreamOrigin {
    /// Prefix written before live output forwarded from this stream.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Stdout => "OUT > ",
            Self::Stderr => "ERR > ",
        }
    }
}

/// Everything a subprocess has written so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CapturedOutput {
    pub fn append(&mut self, origin: StreamOrigin, chunk: &[u8]) {
        match origin {
            StreamOrigin::Stdout => self.stdout.extend_from_slice(chunk),
            StreamOrigin::Stderr => self.stderr.extend_from_slice(chunk),
        }
    }

    #[must_use]
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    #[must_use]
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// Stdout followed by stderr, trimmed. Used for failure reports.
    #[must_use]
    pub fn combined_text(&self) -> String {
        let stdout = self.stdout_text();
        let stderr = self.stderr_text();
        match (stdout.trim(), stderr.trim()) {
            ("", err) => err.to_string(),
            (out, "") => out.to_string(),
            (out, err) => format!("{out}\n{err}"),
        }
    }

    /// Whether `needle` appears in either stream.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.stdout_text().contains(needle) || self.stderr_text().contains(needle)
    }
}
