//! Email-friendly copy of the master, re-encoded by Ghostscript.
//!
//! ```text
//! gs -dBATCH -dNOPAUSE -dSAFER -sDEVICE=pdfwrite -dCompatibilityLevel=1.6
//!    -dPDFSETTINGS=/screen -dDetectDuplicateImages=true -o <copy> -f <master>
//! ```
//!
//! Every failure here is contained: the master already exists, so the run
//! still succeeds and the log explains why there is no copy. The stage
//! reports such failures as non-fatal [`MergeError::StageFailed`] errors and
//! the pipeline turns them into [`EmailOutcome::Failed`].

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::{EMAIL_COMPATIBILITY_LEVEL, EmailPreset};
use crate::context::RunContext;
use crate::error::{MergeError, Result, Stage};
use crate::io::RunLog;
use crate::merge::{IsolatedEnv, log_captured, remove_stale, run_tool};
use crate::tools::{Tool, render_command_line};

/// What became of the email copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailOutcome {
    /// The copy was written.
    Created {
        /// Path of the copy.
        path: PathBuf,
    },
    /// The compressor ran but did not produce the copy.
    Failed {
        /// Exit code, `None` when it was killed or never started.
        exit_code: Option<i32>,
    },
    /// The compressor is not installed.
    ToolMissing,
    /// The copy was disabled by configuration.
    Disabled,
}

impl EmailOutcome {
    /// Whether an email copy exists after the run.
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

/// The email-copy stage.
#[derive(Debug, Clone)]
pub struct EmailCopy {
    compressor: PathBuf,
    preset: EmailPreset,
}

impl EmailCopy {
    /// Stage that runs the compressor at `compressor` with `preset`.
    pub fn new(compressor: impl Into<PathBuf>, preset: EmailPreset) -> Self {
        Self {
            compressor: compressor.into(),
            preset,
        }
    }

    /// Compressor arguments re-encoding `input` into `output`.
    ///
    /// Both paths go through explicit `-o`/`-f` flags. `-f` ends option
    /// parsing so the input is never read as a switch.
    pub fn arguments(preset: EmailPreset, input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-dBATCH".into(),
            "-dNOPAUSE".into(),
            "-dSAFER".into(),
            "-sDEVICE=pdfwrite".into(),
            format!("-dCompatibilityLevel={EMAIL_COMPATIBILITY_LEVEL}").into(),
            format!("-dPDFSETTINGS={}", preset.as_setting()).into(),
            "-dDetectDuplicateImages=true".into(),
            "-o".into(),
            escape_output_template(output),
            "-f".into(),
            input.as_os_str().to_owned(),
        ]
    }

    /// Write the email copy of `master` to the path named by `ctx`.
    ///
    /// # Errors
    ///
    /// Any failure of the stage itself is logged together with the skip
    /// notice and returned as a [`MergeError::StageFailed`] for
    /// [`Stage::EmailCopy`], which is not fatal. Only a run-log failure is
    /// returned as is.
    pub async fn run(&self, master: &Path, ctx: &RunContext, log: &mut RunLog) -> Result<PathBuf> {
        let output = &ctx.out_email_path;
        let args = Self::arguments(self.preset, master, output);
        let command_line = render_command_line(&self.compressor, &args);
        let env = IsolatedEnv::for_compressor();

        log.line(format!(
            "Creating email copy with {} (preset {})",
            Tool::Compressor,
            self.preset.as_setting()
        ))?;

        match remove_stale(output, log).await {
            Ok(()) => {}
            Err(err @ MergeError::RunLog { .. }) => return Err(err),
            Err(err) => {
                let reason = format!("Email copy FAILED: cannot remove previous copy: {err}");
                return Err(skip(log, &reason, None, command_line)?);
            }
        }

        for (name, value) in env.overridden() {
            log.line(format!("Ignoring inherited {name}={value}"))?;
        }
        log.line(format!("Command: {command_line}"))?;

        let result = match run_tool(&self.compressor, &args, &env, output).await {
            Ok(result) => result,
            Err(err) => {
                let reason = format!("Email copy FAILED: {err}");
                return Err(skip(log, &reason, None, command_line)?);
            }
        };
        log_captured(log, Tool::Compressor, &result)?;

        if !result.succeeded() {
            let reason = format!(
                "Email copy FAILED (exit code {})",
                result.exit_code_display()
            );
            return Err(skip(log, &reason, result.exit_code, command_line)?);
        }

        log.line(format!("Email copy created: {}", output.display()))?;
        Ok(output.clone())
    }
}

/// Log why there is no email copy and build the contained error for it.
fn skip(
    log: &mut RunLog,
    reason: &str,
    exit_code: Option<i32>,
    command_line: String,
) -> Result<MergeError> {
    log.line(reason)?;
    log.line("Skipping email copy; the lossless master is unaffected")?;
    Ok(MergeError::stage_failed(
        Stage::EmailCopy,
        exit_code,
        command_line,
    ))
}

/// Ghostscript expands `%d` in the `-o` file name into page numbers; a
/// literal `%` must be doubled.
fn escape_output_template(path: &Path) -> OsString {
    match path.to_str() {
        Some(text) => text.replace('%', "%%").into(),
        None => path.as_os_str().to_owned(),
    }
}
