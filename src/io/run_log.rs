//! Append-only run log.
//!
//! One [`RunLog`] exists per run. It is created before any external tool is
//! invoked and handed by `&mut` to each stage, so a run that stops early
//! still leaves a record of how far it got. Every line is flushed as soon as
//! it is written.

use crate::error::{MergeError, Result};
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const LINE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const RULE_WIDTH: usize = 60;

/// Timestamped, append-only text log for one run.
#[derive(Debug)]
pub struct RunLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl RunLog {
    /// Open (or create) the log at `path` and write the run header.
    ///
    /// An existing file is appended to, never truncated.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::RunLog`] if the file cannot be opened or written.
    pub fn create(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| MergeError::RunLog {
                path: path.to_path_buf(),
                source,
            })?;

        let mut log = Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        };

        let rule = "=".repeat(RULE_WIDTH);
        log.raw(&rule)?;
        log.raw(&format!(
            "{} {} run started {}",
            crate::NAME,
            crate::VERSION,
            Local::now().format(LINE_TIME_FORMAT)
        ))?;
        log.raw(&rule)?;

        Ok(log)
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped line.
    pub fn line(&mut self, message: impl AsRef<str>) -> Result<()> {
        let message = message.as_ref();
        tracing::debug!(target: "winpdfmerge::run_log", "{message}");
        self.raw(&format!(
            "[{}] {message}",
            Local::now().format(LINE_TIME_FORMAT)
        ))
    }

    /// Append captured subprocess output under a title line.
    ///
    /// Each line of `text` is indented; empty output is recorded as such.
    pub fn block(&mut self, title: &str, text: &str) -> Result<()> {
        let text = text.trim_end();
        if text.trim().is_empty() {
            return self.line(format!("{title}: (empty)"));
        }

        self.line(format!("{title}:"))?;
        for line in text.lines() {
            self.raw(&format!("    {line}"))?;
        }
        Ok(())
    }

    /// Write the closing line and flush.
    pub fn finish(mut self, success: bool) -> Result<()> {
        let status = if success { "SUCCESS" } else { "FAILED" };
        self.line(format!("Run finished: {status}"))?;
        self.raw("")?;
        Ok(())
    }

    fn raw(&mut self, text: &str) -> Result<()> {
        writeln!(self.writer, "{text}")
            .and_then(|()| self.writer.flush())
            .map_err(|source| MergeError::RunLog {
                path: self.path.clone(),
                source,
            })
    }
}
