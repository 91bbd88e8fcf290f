//! Environment isolation for a single subprocess.
//!
//! Ghostscript prepends the contents of `GS_OPTIONS` to its command line, so
//! a user's global setting could silently change the email copy's size or
//! quality. [`IsolatedEnv`] strips such variables from one child's
//! environment. The parent's environment is never touched, so there is
//! nothing to restore when the call returns or fails.

use tokio::process::Command;

/// Variables Ghostscript reads implicit options from.
pub const COMPRESSOR_DEFAULT_OPTIONS: &[&str] = &["GS_OPTIONS"];

/// Set of inherited variables to withhold from one child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IsolatedEnv {
    removed: Vec<&'static str>,
}

impl IsolatedEnv {
    /// Pass the environment through unchanged.
    pub fn inherit() -> Self {
        Self::default()
    }

    /// Withhold the compressor's default-options variables.
    pub fn for_compressor() -> Self {
        Self {
            removed: COMPRESSOR_DEFAULT_OPTIONS.to_vec(),
        }
    }

    /// Withheld variables that are actually set in this process, with their
    /// values, for the run log.
    pub fn overridden(&self) -> Vec<(&'static str, String)> {
        self.removed
            .iter()
            .filter_map(|name| {
                std::env::var_os(name).map(|value| (*name, value.to_string_lossy().into_owned()))
            })
            .collect()
    }

    /// Apply to `command` before it is spawned.
    pub fn apply(&self, command: &mut Command) {
        for name in &self.removed {
            command.env_remove(name);
        }
    }
}
