//! Error types for winpdfmerge.
//!
//! Every failure of a run is a [`MergeError`]. A failed email copy is a
//! [`MergeError::StageFailed`] that [`MergeError::is_fatal`] reports as
//! contained; the pipeline turns it into [`crate::pipeline::EmailOutcome`].
//! A missing compressor is not an error at all.
//!
//! # Error Categories
//!
//! - **Input Errors**: missing folder argument, folder not a directory
//! - **Discovery Errors**: no PDF files in the folder
//! - **Tool Errors**: concatenator missing, merge stage failed
//! - **I/O Errors**: run log cannot be created or written

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for winpdfmerge operations.
pub type Result<T> = std::result::Result<T, MergeError>;

/// The two stages that invoke an external tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Lossless concatenation into the master PDF.
    Merge,
    /// Re-encoding of the master into the email copy.
    EmailCopy,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Merge => write!(f, "lossless merge"),
            Self::EmailCopy => write!(f, "email copy"),
        }
    }
}

/// Main error type for a merge run.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// No folder argument was supplied.
    #[error("Missing folder argument")]
    Usage,

    /// The folder argument does not name an existing directory.
    #[error("Invalid source folder: {}\n  Reason: {reason}", .path.display())]
    InvalidInput {
        /// Path as supplied.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// The folder has no top-level PDF files.
    #[error("No PDF files found in: {}", .folder.display())]
    NoFilesFound {
        /// Folder that was searched.
        folder: PathBuf,
    },

    /// A required external tool could not be located.
    #[error(
        "{name} not found\n  Hint: install it or pass its location with {flag}",
        name = .tool.display_name(),
        flag = .tool.override_flag()
    )]
    ToolNotFound {
        /// Which tool was missing.
        tool: crate::tools::Tool,
    },

    /// An external tool ran but did not produce its output.
    #[error(
        "{stage} stage failed (exit code {})\n  Command: {command}",
        .exit_code.map_or_else(|| "none".to_string(), |code| code.to_string())
    )]
    StageFailed {
        /// Stage that failed.
        stage: Stage,
        /// Exit code, `None` when the process was killed by a signal.
        exit_code: Option<i32>,
        /// Rendered command line that was attempted.
        command: String,
    },

    /// The external tool could not be started at all.
    #[error("Failed to start {}: {source}", .program.display())]
    SpawnFailed {
        /// Executable that was spawned.
        program: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The run log could not be created or written.
    #[error("Run log failure: {}\n  Reason: {source}", .path.display())]
    RunLog {
        /// Path of the log file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },
}

impl MergeError {
    /// Create an InvalidInput error.
    pub fn invalid_input(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            path,
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a StageFailed error.
    pub fn stage_failed(stage: Stage, exit_code: Option<i32>, command: impl Into<String>) -> Self {
        Self::StageFailed {
            stage,
            exit_code,
            command: command.into(),
        }
    }

    /// Whether this error ends the run.
    ///
    /// Only an email-copy stage failure is contained; everything else aborts
    /// the pipeline.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::StageFailed {
                stage: Stage::EmailCopy,
                ..
            }
        )
    }

    /// Get the process exit code for this error.
    ///
    /// A failed merge propagates the concatenator's own exit code when it
    /// fits a process status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage => 1,
            Self::InvalidConfig { .. } => 1,
            Self::InvalidInput { .. } => 2,
            Self::NoFilesFound { .. } => 3,
            Self::ToolNotFound { .. } => 4,
            Self::StageFailed { exit_code, .. } => match exit_code {
                Some(code @ 1..=255) => *code,
                _ => 5,
            },
            Self::SpawnFailed { .. } => 5,
            Self::RunLog { .. } => 6,
            Self::Io { .. } => 6,
        }
    }
}
