//! JSON-LD views of annotation resources.
//!
//! Views borrow from the model and are built per serialization, so the same
//! [`Annotation`] can be written at the top level of a document (with its
//! `@context`) or nested inside another resource (without it).

use serde::Serialize;

use crate::{
    annotation::{Annotation, Source, Target},
    selector::Selector,
};

/// IIIF Presentation 2 context.
pub const PRESENTATION_CONTEXT: &str = "http://iiif.io/api/presentation/2/context.json";

/// Media type of embedded annotation text.
const TEXT_FORMAT: &str = "text/html";

/// How deep in a document a resource is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Top-level resource: carries `@context` and nested resource lists.
    Top,
    /// Nested resource: context and resource lists are omitted.
    Nested,
}

impl Depth {
    /// Returns true for [`Depth::Top`].
    pub fn is_top(self) -> bool {
        matches!(self, Self::Top)
    }
}

/// Serialized annotation.
#[derive(Debug, Serialize)]
pub struct AnnotationJson<'a> {
    /// Presentation context, top level only.
    #[serde(rename = "@context", skip_serializing_if = "Option::is_none")]
    context: Option<&'static str>,
    /// Annotation identifier.
    #[serde(rename = "@id")]
    id: &'a str,
    /// Resource type.
    #[serde(rename = "@type")]
    kind: &'static str,
    /// Motivation wire name.
    motivation: &'static str,
    /// Body.
    resource: ResourceJson<'a>,
    /// Target.
    on: TargetJson<'a>,
}

/// Annotation body: a single text or a choice between texts.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ResourceJson<'a> {
    /// One embedded text.
    Single(SourceJson<'a>),
    /// Default text plus alternates.
    Choice(ChoiceJson<'a>),
}

/// Embedded text body.
#[derive(Debug, Serialize)]
struct SourceJson<'a> {
    /// Body type.
    #[serde(rename = "@type")]
    kind: &'static str,
    /// HTML content.
    chars: &'a str,
    /// Media type.
    format: &'static str,
    /// Language tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
    /// Selector into the text.
    #[serde(skip_serializing_if = "Option::is_none")]
    selector: Option<&'a Selector>,
}

/// Choice between a default body and alternates.
#[derive(Debug, Serialize)]
struct ChoiceJson<'a> {
    /// Body type.
    #[serde(rename = "@type")]
    kind: &'static str,
    /// Default body.
    default: SourceJson<'a>,
    /// Alternate bodies.
    item: Vec<SourceJson<'a>>,
}

/// Annotation target: a bare canvas or a selected region of it.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum TargetJson<'a> {
    /// Whole canvas.
    Canvas(&'a str),
    /// Canvas narrowed by a selector.
    Specific(SpecificJson<'a>),
}

/// Selected region of a canvas.
#[derive(Debug, Serialize)]
struct SpecificJson<'a> {
    /// Target type.
    #[serde(rename = "@type")]
    kind: &'static str,
    /// Canvas URI.
    full: &'a str,
    /// Selector.
    selector: &'a Selector,
}

impl<'a> From<&'a Source> for SourceJson<'a> {
    fn from(source: &'a Source) -> Self {
        Self {
            kind: "cnt:ContentAsText",
            chars: &source.text,
            format: TEXT_FORMAT,
            language: source.language.as_deref(),
            selector: source.selector.as_ref(),
        }
    }
}

impl<'a> From<&'a Target> for TargetJson<'a> {
    fn from(target: &'a Target) -> Self {
        match &target.selector {
            None => Self::Canvas(&target.canvas),
            Some(selector) => Self::Specific(SpecificJson {
                kind: "oa:SpecificResource",
                full: &target.canvas,
                selector,
            }),
        }
    }
}

#[allow(clippy::multiple_inherent_impl)]
impl Annotation {
    /// Builds the JSON view of this annotation at the given depth.
    pub fn to_json(&self, depth: Depth) -> AnnotationJson<'_> {
        let resource = if self.alternate_sources.is_empty() {
            ResourceJson::Single(SourceJson::from(&self.source))
        } else {
            ResourceJson::Choice(ChoiceJson {
                kind: "oa:Choice",
                default: SourceJson::from(&self.source),
                item: self.alternate_sources.iter().map(SourceJson::from).collect(),
            })
        };

        AnnotationJson {
            context: depth.is_top().then_some(PRESENTATION_CONTEXT),
            id: &self.id,
            kind: "oa:Annotation",
            motivation: self.motivation.as_str(),
            resource,
            on: TargetJson::from(&self.target),
        }
    }
}

/// Serialized annotation list for a page.
#[derive(Debug, Serialize)]
pub struct AnnotationListJson<'a> {
    /// Presentation context.
    #[serde(rename = "@context")]
    context: &'static str,
    /// List identifier.
    #[serde(rename = "@id")]
    id: &'a str,
    /// Resource type.
    #[serde(rename = "@type")]
    kind: &'static str,
    /// Annotations, nested.
    resources: Vec<AnnotationJson<'a>>,
}

/// Builds the JSON view of an annotation list.
pub fn annotation_list<'a>(id: &'a str, annotations: &'a [Annotation]) -> AnnotationListJson<'a> {
    AnnotationListJson {
        context: PRESENTATION_CONTEXT,
        id,
        kind: "sc:AnnotationList",
        resources: annotations
            .iter()
            .map(|a| a.to_json(Depth::Nested))
            .collect(),
    }
}
