//! The two external-tool stages of a run.
//!
//! - [`LosslessMerge`]: concatenates every input into the master PDF with
//!   PDFtk. Failure is fatal.
//! - [`EmailCopy`]: re-encodes the master with Ghostscript into a smaller
//!   copy. Failure is logged and contained.
//!
//! Both stages spawn their tool exactly once, wait for it with no timeout,
//! and capture its stdout/stderr into the run log.

pub mod email;
pub mod env;
pub mod lossless;

pub use email::{EmailCopy, EmailOutcome};
pub use env::IsolatedEnv;
pub use lossless::LosslessMerge;

use crate::error::{MergeError, Result};
use crate::io::{CapturedText, OutputCapture, RunLog};
use crate::tools::Tool;
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Outcome of one external invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageResult {
    /// Exit code, `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Whether the expected output file exists after the process exited.
    pub output_exists: bool,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl StageResult {
    /// A stage succeeded only if the tool exited 0 and left its output.
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0) && self.output_exists
    }

    /// Exit code as it appears in the log.
    pub fn exit_code_display(&self) -> String {
        self.exit_code
            .map_or_else(|| "none (terminated by signal)".to_string(), |code| code.to_string())
    }
}

/// Spawn `program`, wait for it, and collect its output.
///
/// stdin is closed and both output streams go to temp files.
pub(crate) async fn run_tool(
    program: &Path,
    args: &[OsString],
    env: &IsolatedEnv,
    expected_output: &Path,
) -> Result<StageResult> {
    let capture = OutputCapture::new()?;
    let (stdout, stderr) = capture.stdio()?;

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(stdout)
        .stderr(stderr);
    env.apply(&mut command);

    tracing::debug!(program = %program.display(), args = args.len(), "spawning tool");
    let status = command
        .status()
        .await
        .map_err(|source| MergeError::SpawnFailed {
            program: program.to_path_buf(),
            source,
        })?;

    let CapturedText { stdout, stderr } = capture.collect().await?;
    let output_exists = tokio::fs::try_exists(expected_output)
        .await
        .unwrap_or(false);

    Ok(StageResult {
        exit_code: status.code(),
        output_exists,
        stdout,
        stderr,
    })
}

/// Append a tool's captured streams to the log.
pub(crate) fn log_captured(log: &mut RunLog, tool: Tool, result: &StageResult) -> Result<()> {
    log.block(&format!("{tool} stdout"), &result.stdout)?;
    log.block(&format!("{tool} stderr"), &result.stderr)
}

/// Delete a leftover artifact so a failed run cannot pass for a stale success.
pub(crate) async fn remove_stale(path: &Path, log: &mut RunLog) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => log.line(format!("Removed previous file: {}", path.display())),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(MergeError::Io { source }),
    }
}
