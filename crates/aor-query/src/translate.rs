//! Request to query translation.

use crate::{field::category_for_term, query::Query, request::SearchRequest};

/// Translates a request into a query tree.
///
/// Every non-blank term expands to an OR over the fields of its category;
/// the per-term ORs are combined under one AND. A request without terms
/// yields an AND with no children, which matches nothing. Restriction
/// parameters are not translated.
pub fn translate(request: &SearchRequest) -> Query {
    Query::and(
        request
            .terms
            .iter()
            .map(String::as_str)
            .filter_map(translate_term)
            .collect(),
    )
}

/// Expands one term over the fields of its category.
fn translate_term(term: &str) -> Option<Query> {
    let leaves = category_for_term(term)
        .fields()
        .iter()
        .filter_map(|&field| Query::term(field, term))
        .collect();
    Query::or(leaves)
}
