//! winpdfmerge - merge a folder of PDFs into one master plus an email copy.

use clap::{CommandFactory, Parser};
use std::process;
use tracing_subscriber::EnvFilter;

use winpdfmerge::cli::Cli;
use winpdfmerge::error::MergeError;
use winpdfmerge::output::{OutputFormatter, display_run_summary};
use winpdfmerge::pipeline;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Bad arguments share the exit code of a missing folder; --help
            // and --version are not failures.
            let code = if err.use_stderr() {
                MergeError::Usage.exit_code()
            } else {
                0
            };
            let _ = err.print();
            process::exit(code);
        }
    };
    init_tracing(cli.verbose);

    let formatter = OutputFormatter::new(cli.quiet, cli.verbose);

    if let Err(err) = run(&cli, &formatter).await {
        if matches!(err, MergeError::Usage) {
            eprintln!("{}", Cli::command().render_usage());
            eprintln!("Drop a folder onto winpdfmerge, or pass its path as the only argument.");
        } else {
            formatter.error(&err.to_string());
        }
        process::exit(err.exit_code());
    }
}

/// Main application logic.
async fn run(cli: &Cli, formatter: &OutputFormatter) -> Result<(), MergeError> {
    let config = cli.to_config()?;

    formatter.info(&format!(
        "{} v{}: merging PDFs in {}",
        winpdfmerge::NAME,
        winpdfmerge::VERSION,
        config.source_folder.display()
    ));

    let summary = pipeline::run(&config, &cli.locator()).await?;
    display_run_summary(formatter, &summary).await;

    Ok(())
}

/// Diagnostics go to stderr, filtered by `RUST_LOG`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "winpdfmerge=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
