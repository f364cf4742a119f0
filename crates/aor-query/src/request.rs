//! Search requests and their query-string encoding.
//!
//! A request is addressed to a scope (`collection`, `collection.book` or
//! `collection.book.page`) and carries its parameters as
//! `q=<terms>&motivation=..&user=..&date=..&box=x,y,w,h&page=<n>`.
//! Multi-valued parameters are joined with spaces before percent-encoding,
//! so they travel as `%20`-separated lists. `page` is zero-based.

use std::{borrow::Cow, fmt};

use aor_iiif::{Motivation, Rect};

use crate::{error::RequestError, lexer::split_terms};

/// Where a search applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchScope {
    /// Collection id.
    pub collection: String,
    /// Book id, for book and page scopes.
    pub book: Option<String>,
    /// Page id or image name, for page scopes.
    pub page: Option<String>,
}

impl SearchScope {
    /// Scope covering a whole collection.
    pub fn collection(id: impl Into<String>) -> Self {
        Self {
            collection: id.into(),
            book: None,
            page: None,
        }
    }

    /// Parses `collection`, `collection.book` or `collection.book.page`.
    ///
    /// The page part may itself contain dots, so image names are accepted.
    pub fn parse(scope: &str) -> Result<Self, RequestError> {
        let invalid = || RequestError::InvalidScope(scope.to_string());
        let mut parts = scope.splitn(3, '.');
        let mut next = || -> Result<Option<String>, RequestError> {
            match parts.next() {
                None => Ok(None),
                Some(part) if part.is_empty() || part.contains(['/', '\\', '?']) => {
                    Err(invalid())
                }
                Some(part) => Ok(Some(part.to_string())),
            }
        };
        let collection = next()?.ok_or_else(invalid)?;
        let book = next()?;
        let page = next()?;
        Ok(Self {
            collection,
            book,
            page,
        })
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.collection)?;
        if let Some(book) = &self.book {
            write!(f, ".{book}")?;
        }
        if let Some(page) = &self.page {
            write!(f, ".{page}")?;
        }
        Ok(())
    }
}

/// An immutable search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Scope searched.
    pub scope: SearchScope,
    /// Raw terms in request order; phrases are single terms.
    pub terms: Vec<String>,
    /// Motivation restriction. Accepted, not applied.
    pub motivations: Vec<Motivation>,
    /// Reader restriction. Accepted, not applied.
    pub users: Vec<String>,
    /// Date restriction. Accepted, not applied.
    pub dates: Vec<String>,
    /// Region restriction. Accepted, not applied.
    pub region: Option<Rect>,
    /// Zero-based result page.
    pub page: usize,
}

impl SearchRequest {
    /// Creates a request for `terms` on the first result page.
    pub fn new(scope: SearchScope, terms: Vec<String>) -> Self {
        Self {
            scope,
            terms,
            motivations: Vec::new(),
            users: Vec::new(),
            dates: Vec::new(),
            region: None,
            page: 0,
        }
    }

    /// Parses a scope id and an encoded query string (without the `?`).
    ///
    /// Unknown parameters are ignored.
    pub fn from_query_string(scope: &str, query: &str) -> Result<Self, RequestError> {
        let mut request = Self::new(SearchScope::parse(scope)?, Vec::new());

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (name, raw) = pair.split_once('=').unwrap_or((pair, ""));
            let name = decode(name, name)?;
            let value = decode(&name, raw)?;
            match name.as_str() {
                "q" => request.terms = split_terms(&value)?,
                "motivation" => {
                    request.motivations = value
                        .split_whitespace()
                        .map(|m| {
                            Motivation::parse(m).ok_or_else(|| RequestError::InvalidParameter {
                                name: "motivation",
                                value: m.to_string(),
                            })
                        })
                        .collect::<Result<_, _>>()?;
                }
                "user" => request.users = split_list(&value),
                "date" => request.dates = split_list(&value),
                "box" => request.region = Some(parse_box(&value)?),
                "page" => {
                    request.page =
                        value
                            .trim()
                            .parse()
                            .map_err(|_| RequestError::InvalidParameter {
                                name: "page",
                                value: value.to_string(),
                            })?;
                }
                _ => {}
            }
        }

        Ok(request)
    }

    /// Encodes the request parameters as a query string (without the `?`).
    ///
    /// Empty parameters are omitted; `page` is written only when non-zero.
    pub fn to_query_string(&self) -> String {
        let mut params: Vec<String> = Vec::new();
        let mut push = |name: &str, value: &str| {
            if !value.is_empty() {
                params.push(format!("{name}={}", urlencoding::encode(value)));
            }
        };

        push("q", &self.query_text());
        let motivations: Vec<_> = self.motivations.iter().map(|m| m.as_str()).collect();
        push("motivation", &motivations.join(" "));
        push("user", &self.users.join(" "));
        push("date", &self.dates.join(" "));
        if let Some(region) = &self.region {
            push("box", &region.to_string());
        }
        if self.page > 0 {
            push("page", &self.page.to_string());
        }

        params.join("&")
    }

    /// The terms as a single query text, re-quoting phrases.
    pub fn query_text(&self) -> String {
        self.terms
            .iter()
            .map(|t| {
                if t.contains(char::is_whitespace) {
                    Cow::Owned(format!("\"{t}\""))
                } else {
                    Cow::Borrowed(t.as_str())
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The same request addressed to another result page.
    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}

/// Percent-decodes a parameter, treating `+` as a space.
fn decode(name: &str, raw: &str) -> Result<String, RequestError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(Cow::into_owned)
        .map_err(|_| RequestError::Encoding {
            name: name.to_string(),
        })
}

/// Splits a space-joined list parameter.
fn split_list(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

/// Parses `x,y,w,h`.
fn parse_box(value: &str) -> Result<Rect, RequestError> {
    let invalid = || RequestError::InvalidParameter {
        name: "box",
        value: value.to_string(),
    };
    let numbers = value
        .split(',')
        .map(|n| n.trim().parse::<u32>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;
    match numbers.as_slice() {
        &[x, y, w, h] => Ok(Rect::new(x, y, w, h)),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_parse_at_three_levels() {
        assert_eq!(SearchScope::parse("demo").unwrap(), SearchScope::collection("demo"));

        let book = SearchScope::parse("demo.Castiglione").unwrap();
        assert_eq!(book.book.as_deref(), Some("Castiglione"));
        assert!(book.page.is_none());

        let page = SearchScope::parse("demo.Castiglione.Castiglione.001r.tif").unwrap();
        assert_eq!(page.page.as_deref(), Some("Castiglione.001r.tif"));
        assert_eq!(page.to_string(), "demo.Castiglione.Castiglione.001r.tif");
    }

    #[test]
    fn malformed_scopes_are_rejected() {
        for scope in ["", ".book", "demo..1r", "demo/x", "demo."] {
            assert!(SearchScope::parse(scope).is_err(), "{scope}");
        }
    }

    #[test]
    fn parses_all_parameters() {
        let request = SearchRequest::from_query_string(
            "demo.Castiglione",
            "q=sun%20%22in%20rome%22&motivation=aor%3ASymbol%20mark&user=Harvey&date=1580&box=1,2,3,4&page=2",
        )
        .unwrap();
        assert_eq!(request.terms, vec!["sun", "in rome"]);
        assert_eq!(request.motivations, vec![Motivation::Symbol, Motivation::Mark]);
        assert_eq!(request.users, vec!["Harvey"]);
        assert_eq!(request.dates, vec!["1580"]);
        assert_eq!(request.region, Some(Rect::new(1, 2, 3, 4)));
        assert_eq!(request.page, 2);
    }

    #[test]
    fn plus_is_a_space() {
        let request = SearchRequest::from_query_string("demo", "q=sun+moon").unwrap();
        assert_eq!(request.terms, vec!["sun", "moon"]);
    }

    #[test]
    fn unknown_parameters_are_ignored() {
        let request = SearchRequest::from_query_string("demo", "q=sun&foo=bar&&").unwrap();
        assert_eq!(request.terms, vec!["sun"]);
    }

    #[test]
    fn malformed_parameters_are_errors() {
        assert!(SearchRequest::from_query_string("demo", "box=1,2,3").is_err());
        assert!(SearchRequest::from_query_string("demo", "page=-1").is_err());
        assert!(SearchRequest::from_query_string("demo", "motivation=poem").is_err());
        assert!(SearchRequest::from_query_string("demo", "q=%22sun").is_err());
        assert!(SearchRequest::from_query_string("demo", "q=%FF").is_err());
    }

    #[test]
    fn encodes_with_percent_twenty() {
        let mut request = SearchRequest::new(
            SearchScope::collection("demo"),
            vec!["sun".into(), "in rome".into()],
        );
        request.users = vec!["Harvey".into(), "Dee".into()];
        request.page = 1;
        assert_eq!(
            request.to_query_string(),
            "q=sun%20%22in%20rome%22&user=Harvey%20Dee&page=1"
        );
    }

    #[test]
    fn encoding_survives_parsing() {
        let mut request = SearchRequest::new(
            SearchScope::parse("demo.Castiglione").unwrap(),
            vec!["sun".into(), "a, b".into()],
        );
        request.motivations = vec![Motivation::Symbol];
        request.region = Some(Rect::new(0, 0, 10, 20));
        let parsed =
            SearchRequest::from_query_string("demo.Castiglione", &request.to_query_string())
                .unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn with_page_keeps_everything_else() {
        let request = SearchRequest::new(SearchScope::collection("demo"), vec!["sun".into()]);
        let next = request.with_page(3);
        assert_eq!(next.page, 3);
        assert_eq!(next.terms, request.terms);
    }
}
