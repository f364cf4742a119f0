//! Search execution over a collection index.
//!
//! The [`Searcher`] translates a request, compiles it with its scope, counts
//! every matching annotation and retrieves one page of them. Each matching
//! annotation yields one [`Hit`] per occurrence of a request term in its
//! context fields, carrying the matched span and a window of surrounding
//! text. Annotations that matched only on non-context fields get a bare hit.

use std::{collections::BTreeSet, path::Path};

use aor_iiif::Hit;
use aor_query::{SearchField, SearchRequest, translate};
use tantivy::{
    Index, ReloadPolicy, TantivyDocument,
    collector::{Count, TopDocs},
    directory::MmapDirectory,
    schema::{Field, Value},
};
use tracing::debug;

use crate::{
    analyzer::{Analyzers, register_analyzers},
    compile::QueryCompiler,
    error::IndexError,
    schema::IndexSchema,
};

/// One matching annotation on the requested result page.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedAnnotation {
    /// Annotation identifier.
    pub id: String,
    /// Book id.
    pub book: String,
    /// Page id.
    pub page: String,
    /// Relevance score.
    pub score: f32,
    /// Hits with context windows.
    pub hits: Vec<Hit>,
}

/// One page of matches with the overall total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHits {
    /// Number of matching annotations across all pages.
    pub total: usize,
    /// Offset of the first match on this page.
    pub start_index: usize,
    /// Matches on this page, best first.
    pub matches: Vec<MatchedAnnotation>,
}

/// Size of one result page and of the context windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSettings {
    /// Annotations per result page.
    pub page_size: usize,
    /// Characters of context on each side of a hit.
    pub context_chars: usize,
}

/// Searches one collection index.
pub struct Searcher {
    /// The Tantivy index.
    index: Index,
    /// Schema with field handles.
    schema: IndexSchema,
    /// Analyzers shared by query compilation and hit extraction.
    analyzers: Analyzers,
}

impl Searcher {
    /// Opens an existing index for searching.
    pub fn open(path: &Path) -> Result<Self, IndexError> {
        if !path.exists() {
            return Err(IndexError::OpenIndex {
                path: path.to_path_buf(),
                message: "index directory does not exist".to_string(),
            });
        }

        let dir = MmapDirectory::open(path).map_err(|e| {
            let err: tantivy::TantivyError = e.into();
            IndexError::open_index(path.to_path_buf(), &err)
        })?;
        let index = Index::open(dir).map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;
        register_analyzers(&index);

        Ok(Self {
            index,
            schema: IndexSchema::new(),
            analyzers: Analyzers::default(),
        })
    }

    /// Runs `request` and returns its requested page of matches.
    pub fn search(
        &mut self,
        request: &SearchRequest,
        settings: PageSettings,
    ) -> Result<SearchHits, IndexError> {
        let query = translate(request);
        debug!(scope = %request.scope, "query tree:\n{query}");
        let compiled =
            QueryCompiler::new(&self.schema, &mut self.analyzers).compile(&query, &request.scope);

        let reader = self
            .index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| IndexError::search(&e))?;
        let searcher = reader.searcher();

        let total = searcher
            .search(&*compiled, &Count)
            .map_err(|e| IndexError::search(&e))?;

        let page_size = settings.page_size.max(1);
        let start_index = request.page.saturating_mul(page_size);
        let mut hits = SearchHits {
            total,
            start_index,
            matches: Vec::new(),
        };
        if start_index >= total {
            return Ok(hits);
        }

        let top_docs = searcher
            .search(
                &*compiled,
                &TopDocs::with_limit(page_size).and_offset(start_index),
            )
            .map_err(|e| IndexError::search(&e))?;

        for (score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address).map_err(|e| IndexError::search(&e))?;
            let id = self.text(&doc, self.schema.stored(SearchField::Id));
            let hits_for_doc = self.context_hits(&doc, &id, &request.terms, settings.context_chars);
            hits.matches.push(MatchedAnnotation {
                book: self.text(&doc, self.schema.stored(SearchField::BookId)),
                page: self.text(&doc, Some(self.schema.page)),
                id,
                score,
                hits: hits_for_doc,
            });
        }

        Ok(hits)
    }

    /// Reads a stored text field, returning an empty string if missing.
    fn text(&self, doc: &TantivyDocument, field: Option<Field>) -> String {
        field
            .and_then(|f| doc.get_first(f))
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    }

    /// Hits for every occurrence of a request term in the context fields.
    fn context_hits(
        &mut self,
        doc: &TantivyDocument,
        id: &str,
        terms: &[String],
        context_chars: usize,
    ) -> Vec<Hit> {
        let mut hits = Vec::new();
        for field in SearchField::ALL.into_iter().filter(|f| f.is_context()) {
            let Some(stored) = self.schema.stored(field) else {
                continue;
            };
            for value in doc.get_all(stored).filter_map(|v| v.as_str()) {
                for (start, end) in self.match_spans(field, value, terms) {
                    hits.push(Hit {
                        annotations: vec![id.to_string()],
                        matching: Some(value[start..end].to_string()),
                        before: before(value, start, context_chars),
                        after: after(value, end, context_chars),
                    });
                }
            }
        }
        if hits.is_empty() {
            hits.push(Hit::bare(id));
        }
        hits
    }

    /// Byte spans of `value` matched by any term under any subtype of `field`.
    ///
    /// A term analyzing into several tokens matches a run of consecutive
    /// tokens. The same span found by several subtypes is reported once.
    fn match_spans(
        &mut self,
        field: SearchField,
        value: &str,
        terms: &[String],
    ) -> BTreeSet<(usize, usize)> {
        let mut spans = BTreeSet::new();
        for &(subtype, _) in self.schema.physical(field) {
            let tokens = self.analyzers.tokens(subtype, value);
            for term in terms {
                let wanted = self.analyzers.terms(subtype, term);
                if wanted.is_empty() || wanted.len() > tokens.len() {
                    continue;
                }
                for window in tokens.windows(wanted.len()) {
                    if window.iter().zip(&wanted).all(|(t, w)| t.text == *w)
                        && let (Some(first), Some(last)) = (window.first(), window.last())
                    {
                        spans.insert((first.offset_from, last.offset_to));
                    }
                }
            }
        }
        spans
    }
}

/// Up to `chars` characters preceding byte offset `start`.
fn before(text: &str, start: usize, chars: usize) -> Option<String> {
    if chars == 0 {
        return None;
    }
    let prefix = &text[..start];
    let from = prefix
        .char_indices()
        .rev()
        .nth(chars - 1)
        .map_or(0, |(i, _)| i);
    non_empty(&prefix[from..])
}

/// Up to `chars` characters following byte offset `end`.
fn after(text: &str, end: usize, chars: usize) -> Option<String> {
    let suffix = &text[end..];
    let to = suffix
        .char_indices()
        .nth(chars)
        .map_or(suffix.len(), |(i, _)| i);
    non_empty(&suffix[..to])
}

/// Returns `None` for an empty window.
fn non_empty(window: &str) -> Option<String> {
    (!window.is_empty()).then(|| window.to_string())
}
