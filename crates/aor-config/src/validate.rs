//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.

use std::fmt;

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// The archive root does not exist.
    ArchiveRootMissing {
        /// Configured path.
        path: String,
    },
    /// The archive root exists but is not a directory.
    ArchiveRootNotDirectory {
        /// Configured path.
        path: String,
    },
    /// A lookup table file does not exist.
    LookupTableMissing {
        /// Table name.
        table: &'static str,
        /// Configured path.
        path: String,
    },
    /// The base URI is not an absolute http(s) URI.
    BaseUriNotHttp {
        /// Configured URI.
        uri: String,
    },
    /// Result pages would hold no hits.
    ZeroPageSize,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArchiveRootMissing { path } => {
                write!(f, "archive root does not exist: {path}")
            }
            Self::ArchiveRootNotDirectory { path } => {
                write!(f, "archive root is not a directory: {path}")
            }
            Self::LookupTableMissing { table, path } => {
                write!(f, "lookup table '{table}' does not exist: {path}")
            }
            Self::BaseUriNotHttp { uri } => {
                write!(f, "base URI is not an http(s) URI: {uri}")
            }
            Self::ZeroPageSize => write!(f, "search page_size is 0; every result page is empty"),
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    let archive = &config.archive.root;
    if !archive.exists() {
        warnings.push(ConfigWarning::ArchiveRootMissing {
            path: archive.display().to_string(),
        });
    } else if !archive.is_dir() {
        warnings.push(ConfigWarning::ArchiveRootNotDirectory {
            path: archive.display().to_string(),
        });
    }

    let tables = [
        ("places", config.lookup.places.as_deref()),
        ("people", config.lookup.people.as_deref()),
        ("dictionary", config.lookup.dictionary.as_deref()),
    ];
    for (table, path) in tables {
        if let Some(path) = path.filter(|p| !p.is_file()) {
            warnings.push(ConfigWarning::LookupTableMissing {
                table,
                path: path.display().to_string(),
            });
        }
    }

    let uri = &config.presentation.base_uri;
    if !(uri.starts_with("http://") || uri.starts_with("https://")) {
        warnings.push(ConfigWarning::BaseUriNotHttp { uri: uri.clone() });
    }

    if config.search.page_size == 0 {
        warnings.push(ConfigWarning::ZeroPageSize);
    }

    warnings
}
