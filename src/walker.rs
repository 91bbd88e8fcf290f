//! Discovery and ordering of the PDFs in a source folder.

use crate::error::{MergeError, Result};
use crate::sort::NaturalSortKey;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A top-level PDF found in the source folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfEntry {
    /// File name without its extension.
    pub base_name: String,
    /// Absolute path to the file.
    pub full_path: PathBuf,
}

impl PdfEntry {
    fn from_path(path: PathBuf) -> Self {
        let base_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            base_name,
            full_path: path,
        }
    }

    /// Ordering by natural key on the base name, then by path bytes.
    pub fn natural_cmp(&self, other: &Self) -> Ordering {
        NaturalSortKey::new(&self.base_name)
            .cmp(&NaturalSortKey::new(&other.base_name))
            .then_with(|| {
                self.full_path
                    .as_os_str()
                    .as_encoded_bytes()
                    .cmp(other.full_path.as_os_str().as_encoded_bytes())
            })
    }
}

/// List the direct children of `folder` that are PDF files, in merge order.
///
/// Subdirectories are not descended into. A symlink counts when it points at
/// a regular file.
///
/// # Errors
///
/// Returns [`MergeError::NoFilesFound`] when nothing matches, or an I/O error
/// when the folder cannot be read.
pub fn discover_pdfs<P: AsRef<Path>>(folder: P) -> Result<Vec<PdfEntry>> {
    let folder = folder.as_ref();
    let mut entries = Vec::new();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            // A dangling symlink is not a file we could merge.
            Err(err) if err.depth() == 1 && err.io_error().is_some_and(is_not_found) => continue,
            Err(err) => return Err(walk_error(folder, err)),
        };

        if entry.file_type().is_file() && has_pdf_extension(entry.path()) {
            entries.push(PdfEntry::from_path(entry.into_path()));
        }
    }

    if entries.is_empty() {
        return Err(MergeError::NoFilesFound {
            folder: folder.to_path_buf(),
        });
    }

    entries.sort_by(PdfEntry::natural_cmp);
    tracing::debug!(count = entries.len(), folder = %folder.display(), "discovered PDFs");

    Ok(entries)
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn is_not_found(err: &std::io::Error) -> bool {
    err.kind() == std::io::ErrorKind::NotFound
}

fn walk_error(folder: &Path, err: walkdir::Error) -> MergeError {
    let message = err.to_string();
    match err.into_io_error() {
        Some(source) => MergeError::Io { source },
        None => MergeError::invalid_input(folder.to_path_buf(), message),
    }
}
