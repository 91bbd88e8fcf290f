//! CLI argument parsing for winpdfmerge.
//!
//! The usual entry point is a drag-and-drop wrapper that passes exactly one
//! folder path; every option has an environment-variable fallback so the
//! wrapper never has to change.

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{Config, EmailPreset, executable_dir};
use crate::error::{MergeError, Result};
use crate::tools::{SystemLocator, Tool};

/// Merge every PDF in a folder into one lossless master plus a small email copy.
///
/// Files are merged in natural order of their names (page2 before page10).
/// The master, the email copy and a run log are written next to this
/// program, named after the folder and the start time.
#[derive(Parser, Debug)]
#[command(name = "winpdfmerge")]
#[command(version)]
#[command(about = "Merge every PDF in a folder into one master PDF plus an email copy", long_about = None)]
pub struct Cli {
    /// Folder whose top-level PDF files are merged
    #[arg(value_name = "FOLDER")]
    pub folder: Option<PathBuf>,

    /// Quality preset of the email copy
    ///
    /// - screen: smallest file, 72 dpi images (default)
    /// - ebook: 150 dpi images
    /// - printer, prepress: 300 dpi images
    /// - default: Ghostscript's general-purpose settings
    #[arg(short, long, value_name = "PRESET", default_value = "screen", env = "WINPDFMERGE_PRESET")]
    #[arg(value_parser = EmailPreset::NAMES)]
    pub preset: String,

    /// Directory for the master, the email copy and the log
    ///
    /// Defaults to the directory containing this program. It may not be
    /// the source folder.
    #[arg(short, long, value_name = "DIR", env = "WINPDFMERGE_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to the PDFtk executable, searched on PATH when omitted
    #[arg(long, value_name = "PATH", env = "WINPDFMERGE_PDFTK")]
    pub pdftk: Option<PathBuf>,

    /// Path to the Ghostscript executable, searched on PATH when omitted
    #[arg(long, value_name = "PATH", env = "WINPDFMERGE_GS")]
    pub gs: Option<PathBuf>,

    /// Only produce the lossless master
    #[arg(long)]
    pub no_email: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show artifact sizes and diagnostic logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated [`Config`].
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::Usage`] when no folder was given, or an
    /// invalid-configuration error for a bad preset or output directory.
    pub fn to_config(&self) -> Result<Config> {
        let folder = self.folder.clone().ok_or(MergeError::Usage)?;
        let preset = EmailPreset::from_str(&self.preset)?;

        let output_dir = match &self.output_dir {
            Some(dir) => dir.clone(),
            None => executable_dir()?,
        };

        let mut config = Config::new(folder, output_dir);
        config.preset = preset;
        config.skip_email = self.no_email;
        config.quiet = self.quiet;
        config.verbose = self.verbose;

        Ok(config)
    }

    /// Tool locator honoring `--pdftk` and `--gs`.
    pub fn locator(&self) -> SystemLocator {
        SystemLocator::new()
            .with_override(Tool::Concatenator, self.pdftk.clone())
            .with_override(Tool::Compressor, self.gs.clone())
    }
}
