//! Search result assembly and serialization.
//!
//! A result page is identified by the search URI of its own request. When
//! more matches exist before or after it, `prev` and `next` carry the URIs of
//! the same request addressed to the neighboring pages.

use aor_iiif::{Annotation, Depth, PresentationUris, SearchResultPage};
use aor_query::SearchRequest;
use serde_json::Value;

use crate::{error::SearchError, search::SearchHits};

/// URI of the result page answering `request`.
pub fn result_id(uris: &PresentationUris, request: &SearchRequest) -> String {
    uris.search(&request.scope.to_string(), &request.to_query_string())
}

/// Assembles the result page for `request` from its matches and the
/// annotations they resolved to.
pub fn result_page(
    uris: &PresentationUris,
    request: &SearchRequest,
    hits: SearchHits,
    annotations: Vec<Annotation>,
) -> SearchResultPage {
    let shown = hits.start_index + hits.matches.len();
    let next = (shown < hits.total).then(|| result_id(uris, &request.with_page(request.page + 1)));
    let prev = (request.page > 0).then(|| result_id(uris, &request.with_page(request.page - 1)));

    SearchResultPage {
        id: result_id(uris, request),
        total: hits.total,
        start_index: hits.start_index,
        next,
        prev,
        hits: hits.matches.into_iter().flat_map(|m| m.hits).collect(),
        annotations,
    }
}

/// Serializes a result page at the given depth.
///
/// At [`Depth::Top`] the document carries its contexts and the referenced
/// annotations; at [`Depth::Nested`] only the list, the total and the hits.
pub fn serialize(page: &SearchResultPage, depth: Depth) -> Result<Value, SearchError> {
    Ok(serde_json::to_value(page.to_json(depth))?)
}
