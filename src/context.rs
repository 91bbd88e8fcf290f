//! Output naming for one run.
//!
//! All three artifacts of a run share a prefix built from the source folder's
//! leaf name and the program-start timestamp:
//!
//! ```text
//! WinPDFMerge_<Folder>_<yyyyMMdd_HHmmss>.pdf
//! WinPDFMerge_<Folder>_<yyyyMMdd_HHmmss>_email.pdf
//! WinPDFMerge_<Folder>_<yyyyMMdd_HHmmss>.log
//! ```

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Prefix shared by every artifact.
pub const ARTIFACT_PREFIX: &str = "WinPDFMerge";

/// Timestamp layout used in artifact names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

const FALLBACK_NAME: &str = "folder";

const INVALID_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Paths and naming for a single run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// Sanitized leaf name of the source folder.
    pub folder_base_name: String,
    /// Program-start time formatted with [`TIMESTAMP_FORMAT`].
    pub timestamp: String,
    /// Master PDF.
    pub out_lossless_path: PathBuf,
    /// Compressed copy of the master.
    pub out_email_path: PathBuf,
    /// Run log.
    pub log_path: PathBuf,
}

impl RunContext {
    /// Derive the run's paths.
    ///
    /// `output_dir` is where the artifacts go; callers pass the directory of
    /// the running executable, never the source folder.
    pub fn new(source_folder: &Path, output_dir: &Path, started_at: DateTime<Local>) -> Self {
        let folder_base_name = source_folder
            .file_name()
            .map(|name| sanitize_file_name(&name.to_string_lossy()))
            .unwrap_or_else(|| FALLBACK_NAME.to_string());
        let timestamp = started_at.format(TIMESTAMP_FORMAT).to_string();
        let stem = format!("{ARTIFACT_PREFIX}_{folder_base_name}_{timestamp}");

        Self {
            out_lossless_path: output_dir.join(format!("{stem}.pdf")),
            out_email_path: output_dir.join(format!("{stem}_email.pdf")),
            log_path: output_dir.join(format!("{stem}.log")),
            folder_base_name,
            timestamp,
        }
    }
}

/// Make `name` safe to embed in a file name on any platform.
///
/// Characters reserved on Windows and control characters become `_`;
/// trailing dots and spaces are removed. An empty result becomes `folder`.
///
/// ```
/// use winpdfmerge::context::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("Q1: Report?"), "Q1_ Report_");
/// ```
pub fn sanitize_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|ch| {
            if INVALID_CHARS.contains(&ch) || ch.is_control() {
                '_'
            } else {
                ch
            }
        })
        .collect();

    let trimmed = replaced.trim_end_matches(['.', ' ']);
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}
