//! Configuration for a run.
//!
//! This module turns CLI arguments into a validated [`Config`]:
//! - Parsing of the email-copy quality preset
//! - Resolution of the output directory (beside the executable by default)
//! - Capture of the program-start timestamp shared by all artifacts

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{MergeError, Result};

/// Ghostscript `-dCompatibilityLevel` of the email copy.
pub const EMAIL_COMPATIBILITY_LEVEL: &str = "1.6";

/// Quality/size preset passed to the compressor as `-dPDFSETTINGS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailPreset {
    /// 72 dpi images, smallest output.
    #[default]
    Screen,
    /// 150 dpi images.
    Ebook,
    /// 300 dpi images.
    Printer,
    /// Color-preserving 300 dpi images.
    Prepress,
    /// Ghostscript's general-purpose default.
    Default,
}

impl EmailPreset {
    /// Every preset name accepted on the command line.
    pub const NAMES: [&'static str; 5] = ["screen", "ebook", "printer", "prepress", "default"];

    /// Value of `-dPDFSETTINGS` for this preset.
    pub fn as_setting(&self) -> &'static str {
        match self {
            Self::Screen => "/screen",
            Self::Ebook => "/ebook",
            Self::Printer => "/printer",
            Self::Prepress => "/prepress",
            Self::Default => "/default",
        }
    }
}

impl FromStr for EmailPreset {
    type Err = MergeError;

    /// Parse a preset name, case-insensitively, with or without the leading
    /// slash Ghostscript uses.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_start_matches('/').to_lowercase().as_str() {
            "screen" => Ok(Self::Screen),
            "ebook" => Ok(Self::Ebook),
            "printer" => Ok(Self::Printer),
            "prepress" => Ok(Self::Prepress),
            "default" => Ok(Self::Default),
            _ => Err(MergeError::invalid_config(format!(
                "Invalid email preset: {s}. Must be one of: {}",
                Self::NAMES.join(", ")
            ))),
        }
    }
}

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Folder whose top-level PDFs are merged.
    pub source_folder: PathBuf,

    /// Directory that receives the master, the email copy and the log.
    pub output_dir: PathBuf,

    /// Preset for the email copy.
    pub preset: EmailPreset,

    /// Skip the email copy entirely.
    pub skip_email: bool,

    /// Program-start time; names every artifact of the run.
    pub started_at: DateTime<Local>,

    /// Quiet mode - suppress non-error console output.
    pub quiet: bool,

    /// Verbose console output.
    pub verbose: bool,
}

impl Config {
    /// Configuration with defaults for everything but the two folders,
    /// stamped with the current time.
    pub fn new(source_folder: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_folder: source_folder.into(),
            output_dir: output_dir.into(),
            preset: EmailPreset::default(),
            skip_email: false,
            started_at: Local::now(),
            quiet: false,
            verbose: false,
        }
    }

    /// Validate the configuration.
    ///
    /// Checks that need no I/O on the source folder itself; the folder is
    /// validated by the pipeline so that the failure is reported as invalid
    /// input.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Verbose and quiet modes are both enabled
    /// - The output directory is missing or not a directory
    /// - The output directory is the source folder
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            return Err(MergeError::invalid_config(
                "Cannot use both --verbose and --quiet",
            ));
        }

        if !self.output_dir.is_dir() {
            return Err(MergeError::invalid_config(format!(
                "Output directory does not exist: {}",
                self.output_dir.display()
            )));
        }

        if same_dir(&self.output_dir, &self.source_folder) {
            return Err(MergeError::invalid_config(format!(
                "Output directory cannot be the source folder: {}",
                self.output_dir.display()
            )));
        }

        Ok(())
    }
}

/// Directory containing the running executable.
pub fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let exe = exe.canonicalize().unwrap_or(exe);
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        MergeError::invalid_config(format!(
            "Cannot determine the directory of {}",
            exe.display()
        ))
    })
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
