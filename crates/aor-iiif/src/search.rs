//! Search result model and its wire document.

use serde::Serialize;

use crate::{
    annotation::Annotation,
    json::{AnnotationJson, Depth, PRESENTATION_CONTEXT},
};

/// IIIF Search 0.9 context.
pub const SEARCH_CONTEXT: &str = "http://iiif.io/api/search/0/context.json";

/// Request parameters that are accepted but never narrow results.
pub const IGNORED_PARAMETERS: [&str; 3] = ["date", "user", "box"];

/// One search match with its context window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    /// Identifiers of the annotations the match belongs to.
    pub annotations: Vec<String>,
    /// Exact matched span.
    pub matching: Option<String>,
    /// Text preceding the matched span.
    pub before: Option<String>,
    /// Text following the matched span.
    pub after: Option<String>,
}

impl Hit {
    /// Creates a hit that carries no context window.
    pub fn bare(annotation: impl Into<String>) -> Self {
        Self {
            annotations: vec![annotation.into()],
            matching: None,
            before: None,
            after: None,
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultPage {
    /// Result resource identifier.
    pub id: String,
    /// Total number of matching annotations across all pages.
    pub total: usize,
    /// Offset of the first annotation on this page.
    pub start_index: usize,
    /// URI of the next page, if any.
    pub next: Option<String>,
    /// URI of the previous page, if any.
    pub prev: Option<String>,
    /// Hits on this page.
    pub hits: Vec<Hit>,
    /// Annotations referenced by the hits.
    pub annotations: Vec<Annotation>,
}

impl SearchResultPage {
    /// An empty, valid result.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            total: 0,
            start_index: 0,
            next: None,
            prev: None,
            hits: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Builds the wire document at the given depth.
    pub fn to_json(&self, depth: Depth) -> SearchResponseJson<'_> {
        let top = depth.is_top();
        SearchResponseJson {
            context: top.then_some([PRESENTATION_CONTEXT, SEARCH_CONTEXT]),
            id: &self.id,
            kind: "sc:AnnotationList",
            within: WithinJson {
                kind: "search:Layer",
                total: self.total,
            },
            start_index: self.start_index,
            next: self.next.as_deref(),
            prev: self.prev.as_deref(),
            ignored: IGNORED_PARAMETERS,
            resources: top.then(|| {
                self.annotations
                    .iter()
                    .map(|a| a.to_json(Depth::Nested))
                    .collect()
            }),
            hits: self.hits.iter().map(HitJson::from).collect(),
        }
    }
}

/// Search response document.
#[derive(Debug, Serialize)]
pub struct SearchResponseJson<'a> {
    /// Presentation and search contexts, top level only.
    #[serde(rename = "@context", skip_serializing_if = "Option::is_none")]
    context: Option<[&'static str; 2]>,
    /// Result identifier.
    #[serde(rename = "@id")]
    id: &'a str,
    /// Resource type.
    #[serde(rename = "@type")]
    kind: &'static str,
    /// Layer and total count.
    within: WithinJson,
    /// Offset of the first result.
    #[serde(rename = "startIndex")]
    start_index: usize,
    /// Next page.
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<&'a str>,
    /// Previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    prev: Option<&'a str>,
    /// Accepted but unapplied parameters.
    ignored: [&'static str; 3],
    /// Referenced annotations, top level only.
    #[serde(skip_serializing_if = "Option::is_none")]
    resources: Option<Vec<AnnotationJson<'a>>>,
    /// Hits.
    hits: Vec<HitJson<'a>>,
}

/// Layer description carrying the total.
#[derive(Debug, Serialize)]
struct WithinJson {
    /// Layer type.
    #[serde(rename = "@type")]
    kind: &'static str,
    /// Total number of matches.
    total: usize,
}

/// Serialized hit.
#[derive(Debug, Serialize)]
struct HitJson<'a> {
    /// Hit type.
    #[serde(rename = "@type")]
    kind: &'static str,
    /// Annotation identifiers.
    annotations: &'a [String],
    /// Matched span.
    #[serde(skip_serializing_if = "Option::is_none")]
    matching: Option<&'a str>,
    /// Preceding context.
    #[serde(skip_serializing_if = "Option::is_none")]
    before: Option<&'a str>,
    /// Following context.
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<&'a str>,
}

impl<'a> From<&'a Hit> for HitJson<'a> {
    fn from(hit: &'a Hit) -> Self {
        Self {
            kind: "search:Hit",
            annotations: &hit.annotations,
            matching: hit.matching.as_deref(),
            before: hit.before.as_deref(),
            after: hit.after.as_deref(),
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::annotation::{Motivation, Source, Target};

    fn page() -> SearchResultPage {
        SearchResultPage {
            id: "http://x/demo/search?q=sun".into(),
            total: 1,
            start_index: 0,
            next: None,
            prev: None,
            hits: vec![Hit {
                annotations: vec!["http://x/a_1".into()],
                matching: Some("Sun".into()),
                before: Some(String::new()),
                after: Some(String::new()),
            }],
            annotations: vec![Annotation {
                id: "http://x/a_1".into(),
                motivation: Motivation::Symbol,
                source: Source::text("Symbol: Sun"),
                target: Target {
                    canvas: "http://x/canvas/1r".into(),
                    selector: None,
                },
                alternate_sources: vec![],
            }],
        }
    }

    #[test]
    fn top_level_document_shape() {
        let value = serde_json::to_value(page().to_json(Depth::Top)).unwrap();
        assert_eq!(value["@context"], json!([PRESENTATION_CONTEXT, SEARCH_CONTEXT]));
        assert_eq!(value["within"], json!({"@type": "search:Layer", "total": 1}));
        assert_eq!(value["ignored"], json!(["date", "user", "box"]));
        assert_eq!(value["resources"].as_array().unwrap().len(), 1);
        assert!(value["resources"][0].get("@context").is_none());
        assert_eq!(value["hits"][0]["@type"], json!("search:Hit"));
        assert_eq!(value["hits"][0]["matching"], json!("Sun"));
        assert!(value.get("next").is_none());
    }

    #[test]
    fn nested_document_omits_context_and_resources() {
        let text = serde_json::to_string(&page().to_json(Depth::Nested)).unwrap();
        assert!(!text.contains("@context"));
        assert!(!text.contains("\"resources\""));
        assert!(text.contains("\"within\""));
        assert_eq!(text.matches("\"total\":").count(), 1);
    }

    #[test]
    fn bare_hit_skips_context_strings() {
        let mut result = page();
        result.hits = vec![Hit::bare("http://x/a_1")];
        let value = serde_json::to_value(result.to_json(Depth::Nested)).unwrap();
        assert!(value["hits"][0].get("matching").is_none());
        assert_eq!(value["hits"][0]["annotations"], json!(["http://x/a_1"]));
    }

    #[test]
    fn empty_result_is_valid() {
        let value = serde_json::to_value(SearchResultPage::empty("id").to_json(Depth::Top)).unwrap();
        assert_eq!(value["within"]["total"], json!(0));
        assert_eq!(value["hits"], json!([]));
        assert_eq!(value["resources"], json!([]));
    }
}
