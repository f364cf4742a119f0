//! End-to-end search scenarios over the fixture archive.
//!
//! Each test builds the `demo` collection from `fixtures/archive` into a
//! temporary index root and queries it through the service facade.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::path::{Path, PathBuf};

use aor_config::Config;
use aor_iiif::{Depth, Motivation};
use aor_index::{BuildIssue, SearchService, SilentReporter, serialize};
use tempfile::TempDir;

/// Repository fixtures directory.
fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
}

/// A service over the fixture archive with its index under `temp`.
fn service(temp: &TempDir) -> SearchService {
    let mut config = Config::defaults_in(temp.path());
    config.archive.root = fixtures().join("archive");
    config.lookup.places = Some(fixtures().join("tables").join("places.json"));
    config.lookup.people = Some(fixtures().join("tables").join("people.json"));
    config.lookup.dictionary = Some(fixtures().join("tables").join("dictionary.json"));
    SearchService::from_config(config)
}

/// A service with the `demo` collection already built.
fn built(temp: &TempDir) -> SearchService {
    let service = service(temp);
    service.build("demo", &mut SilentReporter).unwrap();
    service
}

/// Serialized result of a query-string search.
fn json(service: &SearchService, scope: &str, query: &str, depth: Depth) -> String {
    let page = service.search_query_string(scope, query).unwrap();
    serialize(&page, depth).unwrap().to_string()
}

#[test]
fn build_skips_the_orphan_record() {
    let temp = TempDir::new().unwrap();
    let report = service(&temp).build("demo", &mut SilentReporter).unwrap();

    assert_eq!(report.books, 2);
    assert_eq!(report.issues.len(), 1);
    match &report.issues[0] {
        BuildIssue::Record { book, error } => {
            assert_eq!(book, "Castiglione");
            assert!(error.to_string().contains("Castiglione.099r.tif"));
        }
        other => panic!("unexpected issue: {other}"),
    }
}

#[test]
fn symbol_name_finds_every_sun() {
    let temp = TempDir::new().unwrap();
    let service = built(&temp);

    let page = service.search_query_string("demo", "q=Sun").unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.annotations.len(), 3);
    assert!(
        page.annotations
            .iter()
            .all(|a| a.motivation == Motivation::Symbol)
    );
}

#[test]
fn exact_phrase_finds_one_marginalia() {
    let temp = TempDir::new().unwrap();
    let service = built(&temp);

    let page = service
        .search_query_string(
            "demo",
            "q=%22if%20you%20wish%2C%20you%20may%20command%20the%20citizens.%22",
        )
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.annotations.len(), 1);
    assert!(page.annotations[0].id.contains("Castiglione.001r.tif"));
    assert_eq!(page.annotations[0].motivation, Motivation::Marginalia);
}

#[test]
fn page_scope_restricts_matches() {
    let temp = TempDir::new().unwrap();
    let service = built(&temp);

    let page = service
        .search_query_string("demo.Castiglione.1r", "q=sun")
        .unwrap();
    assert_eq!(page.total, 2);
    let canvas = service.uris().canvas("demo", "Castiglione", "1r");
    assert!(page.annotations.iter().all(|a| a.targets(&canvas)));

    let by_image = service
        .search_query_string("demo.Castiglione.Castiglione.001r.tif", "q=sun")
        .unwrap();
    assert_eq!(by_image.total, 2);
    assert!(by_image.annotations.iter().all(|a| a.targets(&canvas)));

    let other_book = service.search_query_string("demo.Livy", "q=sun").unwrap();
    assert_eq!(other_book.total, 0);
}

#[test]
fn page_scope_ignores_image_name_fragments() {
    let temp = TempDir::new().unwrap();
    let service = built(&temp);

    for scope in [
        "demo.Castiglione.tif",
        "demo.Castiglione.Castiglione",
        "demo.Castiglione.001",
    ] {
        let page = service.search_query_string(scope, "q=sun").unwrap();
        assert_eq!(page.total, 0, "{scope}");
    }
}

#[test]
fn full_depth_result_is_a_complete_document() {
    let temp = TempDir::new().unwrap();
    let service = built(&temp);

    let page = service.search_query_string("demo", "q=sun").unwrap();
    let value = serialize(&page, Depth::Top).unwrap();
    let text = value.to_string();

    assert_eq!(text.matches("\"total\"").count(), 1);
    assert_eq!(value["within"]["total"], 3);
    assert!(value.get("@context").is_some());
    assert!(
        value["resources"]
            .as_array()
            .is_some_and(|resources| !resources.is_empty())
    );

    let nested = serialize(&page, Depth::Nested).unwrap();
    assert!(nested.get("@context").is_none());
    assert!(nested.get("resources").is_none());
}

#[test]
fn rebuild_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let service = built(&temp);
    let query = "q=Rome";
    let first = json(&service, "demo", query, Depth::Top);

    service.build("demo", &mut SilentReporter).unwrap();
    let second = json(&service, "demo", query, Depth::Top);

    assert_eq!(first, second);
    assert_eq!(service.search_query_string("demo", "q=Sun").unwrap().total, 3);
}

#[test]
fn entities_are_not_escaped_twice() {
    let temp = TempDir::new().unwrap();
    let service = built(&temp);

    let text = json(&service, "demo", "q=graceful", Depth::Top);
    assert!(text.contains("graceful &amp; wise, in città e corte"));
    assert!(!text.contains("&amp;amp;"));
    assert!(!text.contains("&amp;agrave;"));
    assert!(!text.contains("&agrave;"));

    let page = service
        .search_query_string("demo", "q=citt%C3%A0")
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.annotations[0].motivation, Motivation::Underline);
}

#[test]
fn symbol_anchoring_text_is_not_searchable() {
    let temp = TempDir::new().unwrap();
    let service = built(&temp);

    let page = service.search_query_string("demo", "q=Phoebus").unwrap();
    assert_eq!(page.total, 0);
    assert!(page.annotations.is_empty());
}

#[test]
fn empty_query_matches_nothing() {
    let temp = TempDir::new().unwrap();
    let service = built(&temp);

    let page = service.search_query_string("demo", "").unwrap();
    assert_eq!(page.total, 0);
    assert!(page.hits.is_empty());
    assert!(page.next.is_none());
}

#[test]
fn page_list_carries_illustrations_separately() {
    let temp = TempDir::new().unwrap();
    let service = service(&temp);

    let list = service
        .annotation_list("demo", "Castiglione", "2r", false)
        .unwrap();
    assert!(
        list.annotations
            .iter()
            .all(|a| a.motivation != Motivation::Illustration)
    );
    assert!(!list.annotations.is_empty());

    let illustrations = service
        .annotation_list("demo", "Castiglione", "2r", true)
        .unwrap();
    assert!(!illustrations.annotations.is_empty());
    assert!(
        illustrations
            .annotations
            .iter()
            .all(|a| a.motivation == Motivation::Illustration)
    );
}
