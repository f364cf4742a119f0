//! Resolution of configured paths.
//!
//! Archive, index and lookup table paths may be written relative to the
//! config file that names them, or with a leading `~`. They need not exist:
//! the index root is created by the first build.

use std::path::{Component, Path, PathBuf};

use crate::{ConfigError, discovery::home_dir};

/// Resolves a configured path against the directory of its config file.
///
/// `.` components are dropped, so `./archive` and `archive` resolve alike.
pub fn resolve_path(path: &str, config_dir: &Path) -> Result<PathBuf, ConfigError> {
    let path = Path::new(path.trim());
    let anchored = match path.strip_prefix("~") {
        Ok(rest) => home_dir().ok_or(ConfigError::NoHomeDirectory)?.join(rest),
        Err(_) => config_dir.join(path),
    };
    Ok(anchored
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect())
}
