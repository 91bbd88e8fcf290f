//! Redirection of subprocess output to temporary files.
//!
//! External tools write diagnostics to stderr even when they succeed. Letting
//! those streams inherit ours would make a wrapping shell treat the tool's
//! chatter as our own failure, so both streams always go to temp files that
//! are read back after the process exits and deleted on drop.

use crate::error::Result;
use std::process::Stdio;
use tempfile::NamedTempFile;

/// Pair of temp files receiving a child's stdout and stderr.
#[derive(Debug)]
pub struct OutputCapture {
    stdout: NamedTempFile,
    stderr: NamedTempFile,
}

/// Text read back from an [`OutputCapture`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedText {
    /// Everything the child wrote to stdout.
    pub stdout: String,
    /// Everything the child wrote to stderr.
    pub stderr: String,
}

impl OutputCapture {
    /// Create both capture files in the system temp directory.
    pub fn new() -> Result<Self> {
        Ok(Self {
            stdout: tempfile::Builder::new()
                .prefix("winpdfmerge-out-")
                .suffix(".txt")
                .tempfile()?,
            stderr: tempfile::Builder::new()
                .prefix("winpdfmerge-err-")
                .suffix(".txt")
                .tempfile()?,
        })
    }

    /// Fresh handles to hand to a child as `(stdout, stderr)`.
    pub fn stdio(&self) -> Result<(Stdio, Stdio)> {
        Ok((
            Stdio::from(self.stdout.reopen()?),
            Stdio::from(self.stderr.reopen()?),
        ))
    }

    /// Read back what the child wrote and delete the files.
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    pub async fn collect(self) -> Result<CapturedText> {
        let stdout = tokio::fs::read(self.stdout.path()).await?;
        let stderr = tokio::fs::read(self.stderr.path()).await?;

        self.stdout.close()?;
        self.stderr.close()?;

        Ok(CapturedText {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }
}
