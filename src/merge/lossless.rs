//! Lossless concatenation with PDFtk.
//!
//! ```text
//! pdftk <input>... cat output <master> compress
//! ```
//!
//! Inputs are absolute paths, so none can be mistaken for an option or for a
//! PDFtk handle assignment (`A=file.pdf`). Every argument is a separate argv
//! entry; no shell is involved.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::context::RunContext;
use crate::error::{MergeError, Result, Stage};
use crate::io::RunLog;
use crate::merge::{IsolatedEnv, StageResult, log_captured, remove_stale, run_tool};
use crate::tools::{Tool, render_command_line};
use crate::walker::PdfEntry;

/// The lossless merge stage.
#[derive(Debug, Clone)]
pub struct LosslessMerge {
    concatenator: PathBuf,
}

impl LosslessMerge {
    /// Stage that runs the concatenator at `concatenator`.
    pub fn new(concatenator: impl Into<PathBuf>) -> Self {
        Self {
            concatenator: concatenator.into(),
        }
    }

    /// Concatenator arguments for `files` written to `output`.
    pub fn arguments(files: &[PdfEntry], output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = files
            .iter()
            .map(|entry| entry.full_path.clone().into_os_string())
            .collect();
        args.push("cat".into());
        args.push("output".into());
        args.push(output.as_os_str().to_owned());
        args.push("compress".into());
        args
    }

    /// Merge `files`, in order, into the master named by `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::StageFailed`] when the concatenator exits
    /// non-zero or leaves no master, [`MergeError::SpawnFailed`] when it
    /// cannot be started. Both are logged before returning.
    pub async fn run(
        &self,
        files: &[PdfEntry],
        ctx: &RunContext,
        log: &mut RunLog,
    ) -> Result<StageResult> {
        let output = &ctx.out_lossless_path;
        let args = Self::arguments(files, output);
        let command_line = render_command_line(&self.concatenator, &args);

        remove_stale(output, log).await?;
        log.line(format!(
            "Merging {} file(s) losslessly with {}",
            files.len(),
            Tool::Concatenator
        ))?;
        log.line(format!("Command: {command_line}"))?;

        let result = match run_tool(&self.concatenator, &args, &IsolatedEnv::inherit(), output).await
        {
            Ok(result) => result,
            Err(err) => {
                log.line(format!("Lossless merge FAILED: {err}"))?;
                return Err(err);
            }
        };
        log_captured(log, Tool::Concatenator, &result)?;

        if !result.succeeded() {
            log.line(format!(
                "Lossless merge FAILED (exit code {}, output {})",
                result.exit_code_display(),
                if result.output_exists {
                    "present"
                } else {
                    "missing"
                }
            ))?;
            log.line(format!("Attempted command: {command_line}"))?;
            return Err(MergeError::stage_failed(
                Stage::Merge,
                result.exit_code,
                command_line,
            ));
        }

        log.line(format!("Lossless master created: {}", output.display()))?;
        Ok(result)
    }
}
