//! CLI integration tests for aor commands.
//!
//! These tests focus on exit codes and the JSON documents written to stdout,
//! not on the human-readable formatting, which may change.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

/// Helper to create a temp directory for tests.
fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

/// Repository fixture archive.
fn fixture_archive() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("archive")
}

/// Helper to run `aor` with HOME isolated to the provided directory.
fn aor(home: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("aor").unwrap();
    cmd.env("HOME", home);
    cmd.env_remove("AOR_LOG");
    cmd.current_dir(home);
    cmd
}

/// Writes a root config pointing at the fixture archive.
fn configure(dir: &Path) {
    let archive = fixture_archive().canonicalize().unwrap();
    fs::write(
        dir.join(".aor.toml"),
        format!(
            "root = true\n\n[archive]\nroot = '{}'\n\n[index]\nroot = '.aor-index'\n",
            archive.display()
        ),
    )
    .unwrap();
}

/// A configured directory with the `demo` collection built.
fn built() -> tempfile::TempDir {
    let dir = temp_dir();
    configure(dir.path());
    aor(dir.path()).args(["build", "demo"]).assert().success();
    dir
}

/// Runs a command that must succeed and parses its stdout as JSON.
fn json(dir: &Path, args: &[&str]) -> Value {
    let output = aor(dir).args(args).assert().success().get_output().clone();
    serde_json::from_slice(&output.stdout).unwrap()
}

mod init {
    use super::*;

    #[test]
    fn creates_config_file() {
        let dir = temp_dir();
        aor(dir.path()).arg("init").assert().success();

        let contents = fs::read_to_string(dir.path().join(".aor.toml")).unwrap();
        assert!(contents.contains("# [archive]"));
        assert!(contents.contains("# page_size = 20"));
    }

    #[test]
    fn fails_if_config_exists() {
        let dir = temp_dir();
        fs::write(dir.path().join(".aor.toml"), "existing").unwrap();

        aor(dir.path())
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("--force"));
    }

    #[test]
    fn force_overwrites_existing() {
        let dir = temp_dir();
        fs::write(dir.path().join(".aor.toml"), "old content").unwrap();

        aor(dir.path()).args(["init", "--force"]).assert().success();

        let contents = fs::read_to_string(dir.path().join(".aor.toml")).unwrap();
        assert!(contents.contains("# [archive]"));
    }

    #[test]
    fn updates_gitignore_once() {
        let dir = temp_dir();
        fs::write(dir.path().join(".gitignore"), "*.log").unwrap();

        aor(dir.path()).arg("init").assert().success();
        aor(dir.path()).args(["init", "--force"]).assert().success();

        let gitignore = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(gitignore, "*.log\n.aor-index/\n");
    }
}

mod check {
    use super::*;

    #[test]
    fn reports_collections() {
        let dir = temp_dir();
        configure(dir.path());

        aor(dir.path())
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("demo"))
            .stdout(predicate::str::contains("missing"));
    }

    #[test]
    fn missing_archive_is_a_warning() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".aor.toml"),
            "root = true\n\n[archive]\nroot = 'nowhere'\n",
        )
        .unwrap();

        aor(dir.path())
            .arg("check")
            .assert()
            .failure()
            .stdout(predicate::str::contains("archive root does not exist"));
    }

    #[test]
    fn invalid_config_fails() {
        let dir = temp_dir();
        fs::write(dir.path().join(".aor.toml"), "[archive\n").unwrap();

        aor(dir.path())
            .arg("check")
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to load configuration"));
    }
}

mod config {
    use super::*;

    #[test]
    fn prints_effective_settings() {
        let dir = temp_dir();
        configure(dir.path());

        aor(dir.path())
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("page_size = 20"))
            .stdout(predicate::str::contains("base_uri"));
    }
}

mod build {
    use super::*;

    #[test]
    fn indexes_the_collection() {
        let dir = temp_dir();
        configure(dir.path());

        aor(dir.path())
            .args(["build", "demo"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Indexed"))
            .stdout(predicate::str::contains("Castiglione.099r.tif"));

        assert!(dir.path().join(".aor-index").join("demo").is_dir());
    }

    #[test]
    fn unknown_collection_fails() {
        let dir = temp_dir();
        configure(dir.path());

        aor(dir.path())
            .args(["build", "nosuch"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("indexing failed"));
    }

    #[test]
    fn verbose_flag_logs_progress() {
        let dir = temp_dir();
        configure(dir.path());

        aor(dir.path())
            .args(["-v", "build", "demo"])
            .assert()
            .success()
            .stderr(predicate::str::contains("indexed book"));
    }

    #[test]
    fn log_env_overrides_verbosity() {
        let dir = temp_dir();
        configure(dir.path());

        aor(dir.path())
            .env("AOR_LOG", "error")
            .args(["-vv", "build", "demo"])
            .assert()
            .success()
            .stderr(predicate::str::contains("indexed book").not());
    }
}

mod search {
    use super::*;

    #[test]
    fn requires_a_built_index() {
        let dir = temp_dir();
        configure(dir.path());

        aor(dir.path())
            .args(["search", "demo", "sun"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("aor build demo"));
    }

    #[test]
    fn finds_symbols() {
        let dir = built();
        let result = json(dir.path(), &["search", "demo", "sun"]);

        assert_eq!(result["within"]["total"], 3);
        assert_eq!(result["hits"].as_array().unwrap().len(), 3);
        let resources = result["resources"].as_array().unwrap();
        assert_eq!(resources.len(), 3);
        assert!(
            resources
                .iter()
                .all(|r| r["motivation"].as_str().unwrap().ends_with("Symbol"))
        );
    }

    #[test]
    fn page_scope_and_phrase() {
        let dir = built();

        let scoped = json(dir.path(), &["search", "demo.Castiglione.1r", "sun"]);
        assert_eq!(scoped["within"]["total"], 2);

        let phrase = json(
            dir.path(),
            &[
                "search",
                "demo",
                "\"if you wish, you may command the citizens.\"",
            ],
        );
        assert_eq!(phrase["within"]["total"], 1);
        assert!(
            phrase["resources"][0]["@id"]
                .as_str()
                .unwrap()
                .contains("Castiglione.001r.tif")
        );
    }

    #[test]
    fn nested_output_omits_context() {
        let dir = built();
        let result = json(dir.path(), &["search", "demo", "sun", "--nested"]);

        assert!(result.get("@context").is_none());
        assert!(result.get("resources").is_none());
        assert_eq!(result["within"]["total"], 3);
    }

    #[test]
    fn malformed_query_is_an_empty_result() {
        let dir = built();
        let result = json(dir.path(), &["search", "demo", "\"unclosed"]);

        assert_eq!(result["within"]["total"], 0);
        assert!(result["hits"].as_array().unwrap().is_empty());
    }

    #[test]
    fn explain_prints_the_query_tree() {
        let dir = temp_dir();
        configure(dir.path());

        aor(dir.path())
            .args(["search", "demo", "sun", "--motivation", "aor:Symbol", "--explain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Term(symbols:\"sun\")"))
            .stdout(predicate::str::contains("not applied"));
    }
}

mod annotations {
    use super::*;

    #[test]
    fn lists_page_annotations() {
        let dir = temp_dir();
        configure(dir.path());

        let list = json(dir.path(), &["annotations", "demo", "Castiglione", "1r"]);
        assert_eq!(list["@type"], "sc:AnnotationList");
        assert!(list["@id"].as_str().unwrap().ends_with("/list/1r"));
        assert!(!list["resources"].as_array().unwrap().is_empty());
    }

    #[test]
    fn lists_illustrations_separately() {
        let dir = temp_dir();
        configure(dir.path());

        let list = json(
            dir.path(),
            &["annotations", "demo", "Castiglione", "2r", "--illustrations"],
        );
        let resources = list["resources"].as_array().unwrap();
        assert!(!resources.is_empty());
        assert!(
            resources
                .iter()
                .all(|r| r["motivation"].as_str().unwrap().ends_with("Illustration"))
        );
    }

    #[test]
    fn unknown_page_fails() {
        let dir = temp_dir();
        configure(dir.path());

        aor(dir.path())
            .args(["annotations", "demo", "Castiglione", "9v"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("no page"));
    }
}
