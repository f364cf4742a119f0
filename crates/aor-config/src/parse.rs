//! Configuration file parsing.
//!
//! Parses individual `.aor.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{fs, path::Path};

use serde::Deserialize;
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// When true, stop discovery here and ignore parent and global configs.
    pub root: Option<bool>,
    /// Archive section.
    pub archive: Option<RawArchiveSettings>,
    /// Index section.
    pub index: Option<RawIndexSettings>,
    /// Presentation section.
    pub presentation: Option<RawPresentationSettings>,
    /// Search section.
    pub search: Option<RawSearchSettings>,
    /// Lookup table section.
    pub lookup: Option<RawLookupSettings>,
}

/// Raw archive settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawArchiveSettings {
    /// Archive root directory.
    pub root: Option<String>,
}

/// Raw index settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawIndexSettings {
    /// Directory holding one index per collection.
    pub root: Option<String>,
}

/// Raw presentation settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawPresentationSettings {
    /// Base URI of every generated identifier.
    pub base_uri: Option<String>,
}

/// Raw search settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSearchSettings {
    /// Hits per result page.
    pub page_size: Option<usize>,
    /// Characters of context before and after a hit.
    pub context_chars: Option<usize>,
}

/// Raw lookup table settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawLookupSettings {
    /// Gazetteer file.
    pub places: Option<String>,
    /// Person registry file.
    pub people: Option<String>,
    /// Dictionary file.
    pub dictionary: Option<String>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context.
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config_str("", Path::new("test.toml")).unwrap();
        assert!(config.archive.is_none());
        assert!(config.index.is_none());
        assert!(config.search.is_none());
        assert!(config.lookup.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
root = true

[archive]
root = "./archive"

[index]
root = "~/.cache/aor"

[presentation]
base_uri = "https://example.org/iiif"

[search]
page_size = 10
context_chars = 25

[lookup]
places = "tables/places.json"
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        assert_eq!(config.root, Some(true));
        assert_eq!(config.archive.unwrap().root.as_deref(), Some("./archive"));
        assert_eq!(config.index.unwrap().root.as_deref(), Some("~/.cache/aor"));
        let search = config.search.unwrap();
        assert_eq!(search.page_size, Some(10));
        assert_eq!(search.context_chars, Some(25));
        let lookup = config.lookup.unwrap();
        assert_eq!(lookup.places.as_deref(), Some("tables/places.json"));
        assert!(lookup.people.is_none());
    }

    #[test]
    fn test_unknown_keys_are_errors() {
        let err = parse_config_str("[search]\nlimit = 3\n", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        assert!(parse_config("[search]\npage_size = \"ten\"\n").is_err());
    }
}
