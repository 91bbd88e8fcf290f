//! Shared helpers for the integration tests.
//!
//! The external tools are replaced by small shell scripts that behave like
//! PDFtk and Ghostscript as far as the pipeline can tell: they parse the
//! same arguments and write (or fail to write) the same output files.

#![allow(dead_code)]

use chrono::{Local, TimeZone};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use winpdfmerge::config::{Config, EmailPreset};
use winpdfmerge::tools::{Tool, ToolLocator};

/// Locator that only knows the tools it was given.
#[derive(Debug, Default)]
pub struct FakeLocator {
    tools: HashMap<Tool, PathBuf>,
}

impl FakeLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tool: Tool, path: impl Into<PathBuf>) -> Self {
        self.tools.insert(tool, path.into());
        self
    }
}

impl ToolLocator for FakeLocator {
    fn locate(&self, tool: Tool) -> Option<PathBuf> {
        self.tools.get(&tool).cloned()
    }
}

/// Source folder, output folder and a folder for the fake tools.
pub struct Workspace {
    pub source: TempDir,
    pub output: TempDir,
    pub bin: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            source: TempDir::new().expect("Failed to create source dir"),
            output: TempDir::new().expect("Failed to create output dir"),
            bin: TempDir::new().expect("Failed to create bin dir"),
        }
    }

    /// Config for this workspace with a fixed start time.
    pub fn config(&self) -> Config {
        Config {
            source_folder: self.source.path().to_path_buf(),
            output_dir: self.output.path().to_path_buf(),
            preset: EmailPreset::Screen,
            skip_email: false,
            started_at: Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap(),
            quiet: true,
            verbose: false,
        }
    }

    /// Write a one-page PDF named `name` into the source folder.
    pub fn add_pdf(&self, name: &str) -> PathBuf {
        let path = self.source.path().join(name);
        write_blank_pdf(&path);
        path
    }

    /// Names of the files currently in the output folder, sorted.
    pub fn output_files(&self) -> Vec<String> {
        list_names(self.output.path())
    }

    /// Names of the files currently in the source folder, sorted.
    pub fn source_files(&self) -> Vec<String> {
        list_names(self.source.path())
    }

    /// Install a fake tool script called `name` and return its path.
    #[cfg(unix)]
    pub fn tool(&self, name: &str, body: &str) -> PathBuf {
        write_script(&self.bin.path().join(name), body)
    }
}

fn list_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Minimal valid one-page PDF.
pub fn write_blank_pdf(path: &Path) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).expect("Failed to save fixture PDF");
}

#[cfg(unix)]
fn write_script(path: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    std::fs::write(path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to mark script executable");
    path.to_path_buf()
}

/// PDFtk stand-in: writes the input paths, one per line, into the output.
pub const CONCAT_OK: &str = r#"
out=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "output" ]; then out="$arg"; fi
  prev="$arg"
done
: > "$out"
for arg in "$@"; do
  [ "$arg" = "cat" ] && break
  printf '%s\n' "$arg" >> "$out"
done
echo "merged $# arguments"
exit 0
"#;

/// PDFtk stand-in that refuses an encrypted input.
pub const CONCAT_FAIL: &str = r#"
echo "Error: Unexpected Exception in open_reader()" >&2
echo "OWNER PASSWORD REQUIRED, but not given (or incorrect)" >&2
exit 3
"#;

/// PDFtk stand-in that reports success without writing anything.
pub const CONCAT_SILENT: &str = "exit 0";

/// Ghostscript stand-in: reports the GS_OPTIONS it sees and writes the copy.
///
/// Like Ghostscript it reads `%%` in the `-o` name as a literal `%`.
pub const COMPRESS_OK: &str = r#"
out=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-o" ]; then out="$arg"; fi
  prev="$arg"
done
out=$(printf '%s' "$out" | sed 's/%%/%/g')
echo "GS_OPTIONS=${GS_OPTIONS-unset}"
echo "   **** Warning: harmless diagnostic" >&2
printf 'small' > "$out"
exit 0
"#;

/// Ghostscript stand-in that fails.
pub const COMPRESS_FAIL: &str = r#"
echo "Unrecoverable error, exit code 1" >&2
exit 1
"#;

/// Ghostscript stand-in that leaves a marker next to itself when run.
pub fn compress_marker(marker: &Path) -> String {
    format!("touch '{}'\nexit 0", marker.display())
}

/// Contents of the only log in `dir`.
pub fn read_log(dir: &Path) -> String {
    let log = list_names(dir)
        .into_iter()
        .find(|name| name.ends_with(".log"))
        .expect("No run log written");
    std::fs::read_to_string(dir.join(log)).unwrap()
}

/// Locate a real tool on PATH, for the end-to-end tests.
pub fn real_tool(names: &[&str]) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
}
