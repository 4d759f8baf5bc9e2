//! Configuration to acknowledge user preferences as well as set defaults.
//!
//! Specifically, we try to find a datapick.toml, and if present we load settings from there.
//! This provides the scan threshold, table delimiter, navigation qualifier and clipboard
//! behaviour.

use crate::scan::DEFAULT_THRESHOLD;
use crate::selection::Qualifier;
use crate::table::DEFAULT_DELIMITER;
use facet::Facet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// File consulted in the working directory.
pub const CONFIG_FILE: &str = "datapick.toml";

#[derive(Facet, Clone, Debug, PartialEq)]
/// User preferences loaded from datapick.toml or falling back to defaults.
pub struct Config {
    #[facet(default = 100)]
    /// Minimum trimmed text length for a scan candidate.
    pub text_threshold: usize,
    #[facet(default = "\t".to_string())]
    /// Field separator for table parsing; only the first character is used.
    pub field_delimiter: String,
    #[facet(default = "shift".to_string())]
    /// Modifier that must be held for wheel navigation: `shift`, `ctrl` or `alt`.
    pub qualifier: String,
    #[facet(default = "Clipped".to_string())]
    /// Confirmation shown after a commit.
    pub confirmation: String,
    #[facet(default = "Copy failed".to_string())]
    /// Confirmation shown instead when the copy failed and failures are surfaced.
    pub copy_failed_message: String,
    #[facet(default = true)]
    /// Whether a failed clipboard write changes the confirmation text.
    pub surface_copy_failure: bool,
    #[facet(default = true)]
    /// Whether the terminal front end writes to the system clipboard.
    pub use_system_clipboard: bool,
    #[facet(default = "myapp".to_string())]
    /// URL scheme used when handing payloads to a desktop application.
    pub launch_scheme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            text_threshold: DEFAULT_THRESHOLD,
            field_delimiter: DEFAULT_DELIMITER.to_string(),
            qualifier: "shift".to_string(),
            confirmation: "Clipped".to_string(),
            copy_failed_message: "Copy failed".to_string(),
            surface_copy_failure: true,
            use_system_clipboard: true,
            launch_scheme: "myapp".to_string(),
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from datapick.toml if present.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    #[must_use]
    /// Load configuration from `path`, keeping defaults when it is missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        };
        match facet_toml::from_str::<Self>(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Self::default()
            }
        }
    }

    #[must_use]
    /// The table field separator.
    pub fn delimiter(&self) -> char {
        self.field_delimiter
            .chars()
            .next()
            .unwrap_or(DEFAULT_DELIMITER)
    }

    #[must_use]
    /// The wheel qualifier, falling back to Shift for unrecognised names.
    pub fn qualifier(&self) -> Qualifier {
        self.qualifier.parse().unwrap_or_else(|()| {
            warn!(qualifier = %self.qualifier, "unknown qualifier, using shift");
            Qualifier::Shift
        })
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
