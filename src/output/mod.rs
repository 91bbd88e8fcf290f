//! Console output for winpdfmerge.
//!
//! - Formatted status messages ([`OutputFormatter`])
//! - The end-of-run summary ([`display_run_summary`])

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::io::{file_size, format_file_size};
use crate::pipeline::{EmailOutcome, RunSummary};

/// One-line description of the email copy's fate.
pub fn describe_email_outcome(outcome: &EmailOutcome) -> String {
    match outcome {
        EmailOutcome::Created { path } => format!("Email copy: {}", path.display()),
        EmailOutcome::Failed {
            exit_code: Some(code),
        } => format!("Email copy skipped: Ghostscript failed with exit code {code}"),
        EmailOutcome::Failed { exit_code: None } => {
            "Email copy skipped: Ghostscript did not run to completion".to_string()
        }
        EmailOutcome::ToolMissing => "Email copy skipped: Ghostscript not found".to_string(),
        EmailOutcome::Disabled => "Email copy disabled".to_string(),
    }
}

/// Print the result of a successful run.
///
/// In verbose mode the artifact sizes and the size reduction are shown too.
pub async fn display_run_summary(formatter: &OutputFormatter, summary: &RunSummary) {
    let ctx = &summary.context;

    formatter.success(&format!(
        "Merged {} file(s) into {}",
        summary.files.len(),
        ctx.out_lossless_path.display()
    ));

    let email = describe_email_outcome(&summary.email);
    if summary.email.is_created() || summary.email == EmailOutcome::Disabled {
        formatter.success(&email);
    } else {
        formatter.warning(&email);
    }
    formatter.info(&format!("Log: {}", ctx.log_path.display()));

    for (idx, entry) in summary.files.iter().enumerate() {
        formatter.debug(&format!("{:>3}. {}", idx + 1, entry.full_path.display()));
    }

    if formatter.is_verbose() {
        let master = file_size(&ctx.out_lossless_path).await;
        let copy = file_size(&ctx.out_email_path).await;

        if let Some(master) = master {
            formatter.detail("Master size", &format_file_size(master));
        }
        if let Some(copy) = copy {
            formatter.detail("Email copy size", &format_file_size(copy));
        }
        if let (Some(master), Some(copy)) = (master, copy)
            && master > 0
        {
            let saved = 100.0 - (copy as f64 / master as f64 * 100.0);
            formatter.detail("Reduction", &format!("{saved:.1}%"));
        }
    }
}
