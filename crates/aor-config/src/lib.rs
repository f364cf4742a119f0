//! Configuration system for aor.
//!
//! aor uses TOML configuration files named `.aor.toml`. Configuration is resolved by walking up
//! the directory tree from the current working directory, collecting any `.aor.toml` files found,
//! then loading `~/.aor.toml` as the global config with lowest precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod resolve;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawArchiveSettings, RawConfig, RawIndexSettings, RawLookupSettings, RawPresentationSettings,
    RawSearchSettings, parse_config_file, parse_config_str,
};
pub use resolve::resolve_path;
use serde::Serialize;
pub use templates::local_template;
pub use validate::ConfigWarning;
use validate::validate_config;

/// Default archive directory, relative to the config root.
const DEFAULT_ARCHIVE_DIR: &str = "archive";

/// Default index directory, relative to the config root.
const DEFAULT_INDEX_DIR: &str = ".aor-index";

/// Default base URI of generated identifiers.
const DEFAULT_BASE_URI: &str = "http://localhost:8080/iiif";

/// Top-level merged configuration for aor.
///
/// This represents the fully resolved configuration after merging all discovered `.aor.toml`
/// files according to precedence rules. All paths are absolute.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Archive settings.
    pub archive: ArchiveSettings,
    /// Index settings.
    pub index: IndexSettings,
    /// Presentation settings.
    pub presentation: PresentationSettings,
    /// Search settings.
    pub search: SearchSettings,
    /// Lookup table settings.
    pub lookup: LookupSettings,
    /// Directory containing the most specific config file.
    #[serde(skip)]
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.aor.toml` files.
    ///
    /// Returns the defaults, resolved against `cwd`, if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files, cwd)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf], cwd: &Path) -> Result<Self, ConfigError> {
        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed, cwd)
    }

    /// Default configuration with paths resolved against `dir`.
    pub fn defaults_in(dir: &Path) -> Self {
        Self {
            archive: ArchiveSettings {
                root: dir.join(DEFAULT_ARCHIVE_DIR),
            },
            index: IndexSettings {
                root: dir.join(DEFAULT_INDEX_DIR),
            },
            presentation: PresentationSettings::default(),
            search: SearchSettings::default(),
            lookup: LookupSettings::default(),
            config_root: None,
        }
    }

    /// Directory of the index for `collection`.
    pub fn index_dir(&self, collection: &str) -> PathBuf {
        self.index.root.join(collection)
    }

    /// Validates the configuration and returns any warnings.
    ///
    /// This checks for:
    /// - An archive root that doesn't exist or isn't a directory
    /// - Lookup table files that don't exist
    /// - A base URI that is not an http(s) URI
    /// - A zero page size
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Archive settings.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveSettings {
    /// Directory holding one subdirectory per collection.
    pub root: PathBuf,
}

/// Index settings.
#[derive(Debug, Clone, Serialize)]
pub struct IndexSettings {
    /// Directory holding one index per collection.
    pub root: PathBuf,
}

/// Presentation settings.
#[derive(Debug, Clone, Serialize)]
pub struct PresentationSettings {
    /// Base URI of canvases, annotations, lists and search results.
    pub base_uri: String,
}

impl Default for PresentationSettings {
    fn default() -> Self {
        Self {
            base_uri: String::from(DEFAULT_BASE_URI),
        }
    }
}

/// Search settings.
#[derive(Debug, Clone, Serialize)]
pub struct SearchSettings {
    /// Hits per result page.
    pub page_size: usize,
    /// Characters of context before and after a hit.
    pub context_chars: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            page_size: 20,
            context_chars: 50,
        }
    }
}

/// Lookup table files. Missing tables are treated as empty.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LookupSettings {
    /// Gazetteer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub places: Option<PathBuf>,
    /// Person registry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub people: Option<PathBuf>,
    /// Dictionary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dictionary: Option<PathBuf>,
}
