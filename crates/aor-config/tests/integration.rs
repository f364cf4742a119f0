//! Integration tests for aor-config.
//!
//! Tests the full configuration loading pipeline: discovery -> parse -> merge -> resolve.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use aor_config::{CONFIG_FILENAME, Config, ConfigError, is_global_config, local_template};

/// Test helper to create a temporary directory structure for tests.
struct TestEnv {
    root: tempfile::TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates a directory and returns its path.
    fn create_dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Creates a file with content and returns its path.
    fn create_file(&self, rel_path: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }
}

#[test]
fn test_load_with_root_config() {
    let env = TestEnv::new();
    env.create_file(
        &format!("project/{CONFIG_FILENAME}"),
        r#"
root = true

[archive]
root = "data"

[presentation]
base_uri = "https://example.org/iiif/"

[search]
page_size = 3
"#,
    );
    let cwd = env.create_dir("project/data/demo");

    let config = Config::load(&cwd).unwrap();
    let project = env.path().join("project");
    assert_eq!(config.config_root.as_deref(), Some(project.as_path()));
    assert_eq!(config.archive.root, project.join("data"));
    assert_eq!(config.index.root, project.join(".aor-index"));
    assert_eq!(config.index_dir("demo"), project.join(".aor-index/demo"));
    assert_eq!(config.presentation.base_uri, "https://example.org/iiif/");
    assert_eq!(config.search.page_size, 3);
    assert_eq!(config.search.context_chars, 50);
}

#[test]
fn test_nested_configs_merge() {
    let env = TestEnv::new();
    env.create_file(
        CONFIG_FILENAME,
        "root = true\n[search]\ncontext_chars = 9\n[lookup]\nplaces = \"places.json\"\n",
    );
    env.create_file(
        &format!("inner/{CONFIG_FILENAME}"),
        "[search]\npage_size = 4\n",
    );
    let cwd = env.create_dir("inner");

    let config = Config::load(&cwd).unwrap();
    assert_eq!(config.search.page_size, 4);
    assert_eq!(config.search.context_chars, 9);
    assert_eq!(
        config.lookup.places.as_deref(),
        Some(env.path().join("places.json").as_path())
    );
}

#[test]
fn test_invalid_toml_reports_path() {
    let env = TestEnv::new();
    let path = env.create_file(CONFIG_FILENAME, "root = true\n[search\n");

    let err = Config::load(env.path()).unwrap_err();
    let ConfigError::ParseToml { path: reported, .. } = err else {
        panic!("expected a parse error, got {err:?}");
    };
    assert_eq!(reported, path);
}

#[test]
fn test_no_local_config_uses_defaults() {
    let env = TestEnv::new();
    let files: Vec<PathBuf> = aor_config::discover_config_files(env.path())
        .into_iter()
        .filter(|p| !is_global_config(p))
        .collect();
    assert!(files.is_empty());

    let config = Config::load_from_files(&files, env.path()).unwrap();
    assert_eq!(config.archive.root, env.path().join("archive"));
    assert!(config.config_root.is_none());
}

#[test]
fn test_effective_config_renders_as_toml() {
    let env = TestEnv::new();
    let config = Config::defaults_in(env.path());
    let rendered = config.to_toml().unwrap();
    assert!(rendered.contains("[archive]"));
    assert!(rendered.contains("page_size = 20"));
    assert!(!rendered.contains("config_root"));
}

#[test]
fn test_template_file_loads() {
    let env = TestEnv::new();
    env.create_file(CONFIG_FILENAME, &local_template());
    let config = Config::load(env.path()).unwrap();
    assert_eq!(config.search.page_size, 20);
}
