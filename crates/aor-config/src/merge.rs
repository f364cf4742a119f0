//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, applying
//! precedence rules and resolving paths against the file that set them.

use std::path::{Path, PathBuf};

use crate::{
    Config, ConfigError, LookupSettings, SearchSettings,
    parse::RawConfig,
    resolve::resolve_path,
};

/// A parsed config file with its source path.
#[derive(Debug)]
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

impl ParsedConfig {
    /// Directory containing the config file.
    fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Merges configuration files into a single resolved `Config`.
///
/// Configs are given in precedence order, highest first. For every setting the
/// first file that defines it wins. Relative paths resolve against the directory
/// of the file that defines them; defaults resolve against the directory of the
/// highest-precedence file, or `cwd` when there are no files.
pub fn merge_configs(configs: &[ParsedConfig], cwd: &Path) -> Result<Config, ConfigError> {
    let config_root = configs.first().map(|c| c.dir().to_path_buf());
    let mut config = Config::defaults_in(config_root.as_deref().unwrap_or(cwd));
    config.config_root = config_root;

    if let Some((raw, dir)) = first_defined(configs, |c| c.archive.as_ref()?.root.as_deref()) {
        config.archive.root = resolve_path(raw, dir)?;
    }
    if let Some((raw, dir)) = first_defined(configs, |c| c.index.as_ref()?.root.as_deref()) {
        config.index.root = resolve_path(raw, dir)?;
    }
    if let Some((raw, _)) =
        first_defined(configs, |c| c.presentation.as_ref()?.base_uri.as_deref())
    {
        config.presentation.base_uri = raw.to_string();
    }

    config.search = merge_search(configs);
    config.lookup = merge_lookup(configs)?;

    Ok(config)
}

/// Finds the first config defining a value, with the directory of that config.
fn first_defined<'a, T: ?Sized>(
    configs: &'a [ParsedConfig],
    get: impl Fn(&'a RawConfig) -> Option<&'a T>,
) -> Option<(&'a T, &'a Path)> {
    configs
        .iter()
        .find_map(|parsed| get(&parsed.config).map(|value| (value, parsed.dir())))
}

/// Merges search settings, taking the first defined value for each field.
fn merge_search(configs: &[ParsedConfig]) -> SearchSettings {
    let mut result = SearchSettings::default();

    // Lowest precedence first so higher precedence overwrites
    for raw in configs.iter().rev().filter_map(|c| c.config.search.as_ref()) {
        if let Some(v) = raw.page_size {
            result.page_size = v;
        }
        if let Some(v) = raw.context_chars {
            result.context_chars = v;
        }
    }

    result
}

/// Merges lookup table paths, resolving each against its defining file.
fn merge_lookup(configs: &[ParsedConfig]) -> Result<LookupSettings, ConfigError> {
    let resolve = |get: fn(&RawConfig) -> Option<&str>| {
        first_defined(configs, get)
            .map(|(raw, dir)| resolve_path(raw, dir))
            .transpose()
    };

    Ok(LookupSettings {
        places: resolve(|c| c.lookup.as_ref()?.places.as_deref())?,
        people: resolve(|c| c.lookup.as_ref()?.people.as_deref())?,
        dictionary: resolve(|c| c.lookup.as_ref()?.dictionary.as_deref())?,
    })
}
