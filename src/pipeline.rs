//! The run, start to finish.
//!
//! ```text
//! Validate → Discover → OpenRunLog → LocateConcatenator → Merge
//!          → LocateCompressor → EmailCopy → Finish
//! ```
//!
//! The pipeline is linear. It fails when the folder is invalid, no PDFs are
//! found, the concatenator is missing or the merge fails. It succeeds as soon
//! as the master exists, whatever becomes of the email copy.
//!
//! The run log is opened after discovery, so a folder that is invalid or
//! holds no PDFs leaves nothing behind at all. From then on every step writes
//! to the log before moving on, including the step that fails.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::context::RunContext;
use crate::error::{MergeError, Result};
use crate::io::RunLog;
use crate::merge::{EmailCopy, LosslessMerge};
use crate::tools::{Tool, ToolLocator};
use crate::walker::{PdfEntry, discover_pdfs};

pub use crate::merge::EmailOutcome;

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Names and paths of the run's artifacts.
    pub context: RunContext,
    /// Inputs, in the order they were merged.
    pub files: Vec<PdfEntry>,
    /// Fate of the email copy.
    pub email: EmailOutcome,
}

/// Run the whole pipeline for `config`, finding tools through `locator`.
///
/// # Errors
///
/// Returns the fatal [`MergeError`] that stopped the run. Once the run log
/// exists the error has already been written to it.
pub async fn run(config: &Config, locator: &dyn ToolLocator) -> Result<RunSummary> {
    let source = validate_source(&config.source_folder)?;
    config.validate()?;
    let files = discover_pdfs(&source)?;

    let context = RunContext::new(&source, &config.output_dir, config.started_at);
    let mut log = RunLog::create(&context.log_path)?;
    tracing::info!(log = %log.path().display(), "run log opened");

    let outcome = run_logged(config, locator, &source, &files, &context, &mut log).await;
    match outcome {
        Ok(email) => {
            log.finish(true)?;
            Ok(RunSummary {
                context,
                files,
                email,
            })
        }
        Err(err) => {
            // Keep the original error even if the log cannot take more lines.
            let _ = log.line(format!("FATAL: {err}"));
            let _ = log.finish(false);
            Err(err)
        }
    }
}

async fn run_logged(
    config: &Config,
    locator: &dyn ToolLocator,
    source: &Path,
    files: &[PdfEntry],
    context: &RunContext,
    log: &mut RunLog,
) -> Result<EmailOutcome> {
    log.line(format!("Source folder: {}", source.display()))?;
    log.line(format!("Found {} PDF file(s), merge order:", files.len()))?;
    for (idx, entry) in files.iter().enumerate() {
        log.line(format!("  {:>3}. {}", idx + 1, entry.full_path.display()))?;
    }
    log.line(format!("Master: {}", context.out_lossless_path.display()))?;
    log.line(format!("Email copy: {}", context.out_email_path.display()))?;

    let concatenator = match locator.locate(Tool::Concatenator) {
        Some(path) => path,
        None => {
            log.line(format!("{} not found", Tool::Concatenator))?;
            return Err(MergeError::ToolNotFound {
                tool: Tool::Concatenator,
            });
        }
    };
    log.line(format!(
        "Using {}: {}",
        Tool::Concatenator,
        concatenator.display()
    ))?;

    LosslessMerge::new(concatenator)
        .run(files, context, log)
        .await?;

    if config.skip_email {
        log.line("Email copy disabled; skipping")?;
        return Ok(EmailOutcome::Disabled);
    }

    let Some(compressor) = locator.locate(Tool::Compressor) else {
        log.line(format!(
            "{} not found; skipping email copy (master only)",
            Tool::Compressor
        ))?;
        return Ok(EmailOutcome::ToolMissing);
    };
    log.line(format!("Using {}: {}", Tool::Compressor, compressor.display()))?;

    let stage = EmailCopy::new(compressor, config.preset);
    match stage.run(&context.out_lossless_path, context, log).await {
        Ok(path) => Ok(EmailOutcome::Created { path }),
        Err(err) if !err.is_fatal() => {
            tracing::warn!(error = %err, "email copy skipped");
            let exit_code = match err {
                MergeError::StageFailed { exit_code, .. } => exit_code,
                _ => None,
            };
            Ok(EmailOutcome::Failed { exit_code })
        }
        Err(err) => Err(err),
    }
}

/// Resolve the folder argument to a canonical directory path.
///
/// `..` and symlinks are resolved so that the folder's real leaf name ends up
/// in the artifact names.
fn validate_source(folder: &Path) -> Result<PathBuf> {
    if folder.as_os_str().is_empty() {
        return Err(MergeError::invalid_input(
            folder.to_path_buf(),
            "empty path",
        ));
    }

    let resolved = std::fs::canonicalize(folder).map_err(|err| {
        let reason = if err.kind() == std::io::ErrorKind::NotFound {
            "does not exist".to_string()
        } else {
            err.to_string()
        };
        MergeError::invalid_input(folder.to_path_buf(), reason)
    })?;

    if !resolved.is_dir() {
        return Err(MergeError::invalid_input(
            folder.to_path_buf(),
            "not a directory",
        ));
    }

    Ok(without_verbatim_prefix(resolved))
}

/// Windows `canonicalize` yields `\\?\C:\...` paths, which PDFtk and
/// Ghostscript reject. Disk and UNC paths are turned back into plain form.
#[cfg(windows)]
fn without_verbatim_prefix(path: PathBuf) -> PathBuf {
    use std::path::{Component, Prefix};

    let plain = {
        let mut components = path.components();
        match components.next() {
            Some(Component::Prefix(prefix)) => match prefix.kind() {
                Prefix::VerbatimDisk(drive) => Some(format!("{}:\\", char::from(drive))),
                Prefix::VerbatimUNC(server, share) => Some(format!(
                    "\\\\{}\\{}\\",
                    server.to_string_lossy(),
                    share.to_string_lossy()
                )),
                _ => None,
            }
            .map(|root| {
                let mut plain = PathBuf::from(root);
                plain.extend(components.filter(|c| !matches!(c, Component::RootDir)));
                plain
            }),
            _ => None,
        }
    };
    plain.unwrap_or(path)
}

#[cfg(not(windows))]
fn without_verbatim_prefix(path: PathBuf) -> PathBuf {
    path
}
