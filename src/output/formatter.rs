//! Console messages for a run.
//!
//! Everything printed here is for the person who dropped the folder on the
//! tool; the durable record lives in the run log.
//!
//! ```
//! use winpdfmerge::output::formatter::{MessageLevel, OutputFormatter};
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Merging 3 PDF files...");
//! formatter.success("Master created");
//! assert_eq!(formatter.render(MessageLevel::Warning, "no copy"), "⚠ no copy");
//! ```

use std::io::{self, IsTerminal};

/// Level of a console message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Progress and paths.
    Info,
    /// A stage completed.
    Success,
    /// Something degraded but the run continues.
    Warning,
    /// The run failed.
    Error,
    /// Verbose-only detail.
    Debug,
}

impl MessageLevel {
    fn prefix(&self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "✓ ",
            Self::Warning => "⚠ ",
            Self::Error => "✗ ",
            Self::Debug => "→ ",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "\x1b[32m",
            Self::Warning => "\x1b[33m",
            Self::Error => "\x1b[31m",
            Self::Debug => "\x1b[36m",
        }
    }

    fn to_stderr(&self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }
}

/// Console printer honoring quiet and verbose modes.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    quiet: bool,
    verbose: bool,
    colored: bool,
}

impl OutputFormatter {
    /// Create a formatter; color is used only on a terminal with `TERM` set.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: io::stdout().is_terminal() && std::env::var_os("TERM").is_some(),
        }
    }

    /// Suppressed in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.emit(MessageLevel::Info, message);
        }
    }

    /// Suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.emit(MessageLevel::Success, message);
        }
    }

    /// Always shown, on stderr.
    pub fn warning(&self, message: &str) {
        self.emit(MessageLevel::Warning, message);
    }

    /// Always shown, on stderr.
    pub fn error(&self, message: &str) {
        self.emit(MessageLevel::Error, message);
    }

    /// Verbose mode only.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            self.emit(MessageLevel::Debug, message);
        }
    }

    /// `label: value` pair, verbose mode only.
    pub fn detail(&self, label: &str, value: &str) {
        if self.verbose {
            println!("  {label}: {value}");
        }
    }

    /// Text of a message without color codes.
    pub fn render(&self, level: MessageLevel, message: &str) -> String {
        format!("{}{message}", level.prefix())
    }

    fn emit(&self, level: MessageLevel, message: &str) {
        let text = self.render(level, message);
        let text = if self.colored && !level.color().is_empty() {
            format!("{}{text}\x1b[0m", level.color())
        } else {
            text
        };

        if level.to_stderr() {
            eprintln!("{text}");
        } else {
            println!("{text}");
        }
    }

    /// Whether verbose output is shown.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}
