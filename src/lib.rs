//! winpdfmerge - merge a folder of PDFs into one master plus an email copy.
//!
//! A run takes one folder and:
//!
//! - lists its top-level PDF files and orders them naturally by name
//! - concatenates them losslessly with PDFtk into a master PDF
//! - re-encodes the master with Ghostscript into a smaller email copy
//! - records every command and its output in an append-only run log
//!
//! The master is required; the email copy is best effort.
//!
//! # Examples
//!
//! ```no_run
//! use winpdfmerge::config::{Config, executable_dir};
//! use winpdfmerge::pipeline;
//! use winpdfmerge::tools::SystemLocator;
//!
//! # async fn example() -> winpdfmerge::Result<()> {
//! let config = Config::new("/home/me/Scans", executable_dir()?);
//! let summary = pipeline::run(&config, &SystemLocator::new()).await?;
//! println!("Master: {}", summary.context.out_lossless_path.display());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod io;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod sort;
pub mod tools;
pub mod walker;

pub use config::Config;
pub use error::{MergeError, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
