//! Scratch archive layouts for aor-config unit tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::discovery::CONFIG_FILENAME;

/// A temporary archive checkout with config files placed at chosen levels.
pub struct ArchiveTree {
    /// Owned temporary directory.
    root: TempDir,
}

impl ArchiveTree {
    /// An empty tree.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    /// Top of the tree.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates a directory; `""` is the top of the tree.
    pub fn dir(&self, rel: &str) -> PathBuf {
        let dir = self.root.path().join(rel);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Writes an empty lookup table.
    pub fn table(&self, rel: &str) -> PathBuf {
        let path = self.root.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "{}").unwrap();
        path
    }

    /// Writes `.aor.toml` with `contents` into the directory `rel`.
    pub fn config(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.dir(rel).join(CONFIG_FILENAME);
        fs::write(&path, contents).unwrap();
        path
    }
}
