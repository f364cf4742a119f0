//! Locating `.aor.toml` files.
//!
//! An archive checkout usually carries one config at its top, sometimes with
//! per-collection overrides below it. Every ancestor of the working directory
//! is checked, nearest first. A file with `root = true` ends the search; if no
//! such file is met, `~/.aor.toml` comes last.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".aor.toml";

/// Config files that apply to `cwd`, highest precedence first.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for candidate in cwd.ancestors().map(|dir| dir.join(CONFIG_FILENAME)) {
        if !candidate.is_file() {
            continue;
        }
        let stops_search = is_root_config(&candidate);
        files.push(candidate);
        if stops_search {
            return files;
        }
    }

    if let Some(global) = global_config_path().filter(|g| g.is_file() && !files.contains(g)) {
        files.push(global);
    }
    files
}

/// The user's home directory, if it can be determined.
pub(crate) fn home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Location of `~/.aor.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(CONFIG_FILENAME))
}

/// Returns true if `path` is `~/.aor.toml`.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}
