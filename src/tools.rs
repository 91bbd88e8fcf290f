//! Locating and describing the external tools.
//!
//! The pipeline never searches the filesystem itself; it asks a
//! [`ToolLocator`]. [`SystemLocator`] is the host implementation: explicit
//! overrides first, then `PATH`, then the usual install directories.

use crate::sort::NaturalSortKey;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

/// The external programs a run depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Lossless concatenator (PDFtk). Required.
    Concatenator,
    /// Re-encoding compressor (Ghostscript). Optional.
    Compressor,
}

impl Tool {
    /// Human-readable product name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Concatenator => "PDFtk",
            Self::Compressor => "Ghostscript",
        }
    }

    /// CLI flag that overrides the location of this tool.
    pub fn override_flag(&self) -> &'static str {
        match self {
            Self::Concatenator => "--pdftk",
            Self::Compressor => "--gs",
        }
    }

    /// Executable names searched for, in preference order, without any
    /// platform suffix.
    pub fn candidate_names(&self) -> &'static [&'static str] {
        match self {
            Self::Concatenator => &["pdftk"],
            Self::Compressor => &["gswin64c", "gswin32c", "gs"],
        }
    }

    /// Glob patterns for well-known install locations on this platform.
    fn install_patterns(&self) -> &'static [&'static str] {
        if cfg!(windows) {
            match self {
                Self::Concatenator => &[
                    "C:/Program Files/PDFtk Server/bin/pdftk.exe",
                    "C:/Program Files (x86)/PDFtk Server/bin/pdftk.exe",
                    "C:/Program Files/PDFtk/bin/pdftk.exe",
                    "C:/Program Files (x86)/PDFtk/bin/pdftk.exe",
                ],
                Self::Compressor => &[
                    "C:/Program Files/gs/gs*/bin/gswin64c.exe",
                    "C:/Program Files (x86)/gs/gs*/bin/gswin32c.exe",
                ],
            }
        } else {
            match self {
                Self::Concatenator => &[
                    "/usr/local/bin/pdftk",
                    "/opt/homebrew/bin/pdftk",
                    "/opt/pdflabs/pdftk/bin/pdftk",
                    "/usr/bin/pdftk",
                    "/snap/bin/pdftk",
                ],
                Self::Compressor => &["/usr/local/bin/gs", "/opt/homebrew/bin/gs", "/usr/bin/gs"],
            }
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Capability to find an external tool's executable.
pub trait ToolLocator {
    /// Absolute path of the executable, or `None` when it is not installed.
    fn locate(&self, tool: Tool) -> Option<PathBuf>;
}

/// Host lookup: overrides, then `PATH`, then install directories.
#[derive(Debug, Clone, Default)]
pub struct SystemLocator {
    concatenator: Option<PathBuf>,
    compressor: Option<PathBuf>,
    search_path: Option<std::ffi::OsString>,
    use_install_dirs: bool,
}

impl SystemLocator {
    /// Locator that searches `PATH` and the install directories.
    pub fn new() -> Self {
        Self {
            use_install_dirs: true,
            ..Default::default()
        }
    }

    /// Use `path` for `tool` when it names an existing file.
    pub fn with_override(mut self, tool: Tool, path: Option<PathBuf>) -> Self {
        match tool {
            Tool::Concatenator => self.concatenator = path,
            Tool::Compressor => self.compressor = path,
        }
        self
    }

    /// Search `paths` (in `PATH` syntax) instead of the process `PATH`, and
    /// skip the install directories.
    #[cfg(test)]
    fn with_search_path(mut self, paths: impl Into<std::ffi::OsString>) -> Self {
        self.search_path = Some(paths.into());
        self.use_install_dirs = false;
        self
    }

    fn override_for(&self, tool: Tool) -> Option<&Path> {
        match tool {
            Tool::Concatenator => self.concatenator.as_deref(),
            Tool::Compressor => self.compressor.as_deref(),
        }
    }

    fn search_path_entries(&self, tool: Tool) -> Option<PathBuf> {
        let paths = match &self.search_path {
            Some(paths) => paths.clone(),
            None => std::env::var_os("PATH")?,
        };

        for name in tool.candidate_names() {
            let file_name = executable_name(name);
            for dir in std::env::split_paths(&paths) {
                if dir.as_os_str().is_empty() {
                    continue;
                }
                let candidate = dir.join(&file_name);
                if is_executable(&candidate) {
                    return Some(candidate);
                }
            }
        }
        None
    }

    fn search_install_dirs(&self, tool: Tool) -> Option<PathBuf> {
        for pattern in tool.install_patterns() {
            let Ok(matches) = glob::glob(pattern) else {
                continue;
            };
            let mut found: Vec<PathBuf> = matches
                .filter_map(|entry| entry.ok())
                .filter(|path| is_executable(path))
                .collect();

            // gs/gs9.56.1 vs gs/gs10.03.1: newest version wins.
            found.sort_by_key(|path| NaturalSortKey::new(&path.to_string_lossy()));
            if let Some(path) = found.pop() {
                return Some(path);
            }
        }
        None
    }
}

impl ToolLocator for SystemLocator {
    fn locate(&self, tool: Tool) -> Option<PathBuf> {
        if let Some(path) = self.override_for(tool) {
            if path.is_file() {
                return Some(absolute(path));
            }
            tracing::warn!(
                tool = %tool,
                path = %path.display(),
                "override does not exist, searching instead"
            );
        }

        let found = self.search_path_entries(tool).or_else(|| {
            if self.use_install_dirs {
                self.search_install_dirs(tool)
            } else {
                None
            }
        });

        match &found {
            Some(path) => tracing::debug!(tool = %tool, path = %path.display(), "located tool"),
            None => tracing::debug!(tool = %tool, "tool not found"),
        }
        found.map(|path| absolute(&path))
    }
}

fn executable_name(name: &str) -> String {
    if cfg!(windows) {
        format!("{name}.exe")
    } else {
        name.to_string()
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Render a program and its arguments as one loggable command line.
///
/// Arguments are passed to the child as separate argv entries, never through
/// a shell; this rendering only has to be unambiguous for a human reading the
/// log. Arguments containing whitespace, quotes or shell metacharacters are
/// wrapped in double quotes with embedded quotes and backslashes escaped.
pub fn render_command_line<I, S>(program: &Path, args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut line = quote_arg(program.as_os_str());
    for arg in args {
        line.push(' ');
        line.push_str(&quote_arg(arg.as_ref()));
    }
    line
}

fn quote_arg(arg: &OsStr) -> String {
    let arg = arg.to_string_lossy();
    let needs_quotes = arg.is_empty()
        || arg
            .chars()
            .any(|ch| ch.is_whitespace() || "\"'`$&|;<>()[]{}*?!#~^%\\".contains(ch));

    if !needs_quotes {
        return arg.into_owned();
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for ch in arg.chars() {
        if ch == '"' || ch == '\\' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}
