//! File I/O for a run.
//!
//! - [`RunLog`]: the append-only, timestamped log every stage writes to
//! - [`OutputCapture`]: temp files that receive a subprocess's stdout and
//!   stderr so nothing is inherited by the orchestrating process
//!
//! # Examples
//!
//! ```no_run
//! use winpdfmerge::io::RunLog;
//! use std::path::Path;
//!
//! # fn example() -> winpdfmerge::Result<()> {
//! let mut log = RunLog::create(Path::new("WinPDFMerge_Scans_20240101_120000.log"))?;
//! log.line("Source folder: /home/me/Scans")?;
//! log.finish(true)?;
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod run_log;

pub use capture::{CapturedText, OutputCapture};
pub use run_log::RunLog;

/// Size of a file on disk, `None` when it does not exist.
pub async fn file_size(path: &std::path::Path) -> Option<u64> {
    tokio::fs::metadata(path).await.ok().map(|meta| meta.len())
}

/// Format a byte count as a human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
