//! Service facade wiring the archive, the lookup tables and the indexes.
//!
//! A [`SearchService`] answers the three requests the system serves: build a
//! collection index, search a scope, and list the annotations of a page. It
//! holds only immutable state and the lazily loaded lookup tables, so one
//! instance can be shared across threads.

use std::{
    collections::{HashMap, hash_map::Entry},
    sync::OnceLock,
};

use aor_archive::{Archive, Book, FsArchive};
use aor_config::Config;
use aor_iiif::{
    Annotation, AnnotationListJson, PresentationUris, SearchResultPage, annotation_list,
};
use aor_query::SearchRequest;
use aor_transform::{LookupTables, Transformer};
use tracing::{debug, warn};

use crate::{
    error::SearchError,
    indexer::{BuildReport, Indexer, ProgressReporter},
    search::{MatchedAnnotation, PageSettings, Searcher},
    serialize::{result_id, result_page},
};

/// Annotations of one page with the list identifier.
#[derive(Debug, Clone)]
pub struct PageAnnotations {
    /// Annotation list URI.
    pub id: String,
    /// Annotations in record order.
    pub annotations: Vec<Annotation>,
}

impl PageAnnotations {
    /// Builds the `sc:AnnotationList` document.
    pub fn to_json(&self) -> AnnotationListJson<'_> {
        annotation_list(&self.id, &self.annotations)
    }
}

/// Builds, searches and lists annotations.
pub struct SearchService<A: Archive = FsArchive> {
    /// Source of books.
    archive: A,
    /// Effective configuration.
    config: Config,
    /// Identifier builder.
    uris: PresentationUris,
    /// Lookup tables, loaded on first use.
    tables: OnceLock<LookupTables>,
}

impl SearchService<FsArchive> {
    /// Creates a service over the archive directory named in `config`.
    pub fn from_config(config: Config) -> Self {
        let archive = FsArchive::new(config.archive.root.clone());
        Self::new(archive, config)
    }
}

impl<A: Archive> SearchService<A> {
    /// Creates a service over `archive`.
    pub fn new(archive: A, config: Config) -> Self {
        let uris = PresentationUris::new(&config.presentation.base_uri);
        Self {
            archive,
            config,
            uris,
            tables: OnceLock::new(),
        }
    }

    /// The identifier builder.
    pub fn uris(&self) -> &PresentationUris {
        &self.uris
    }

    /// The shared lookup tables, loading them on first use.
    pub fn tables(&self) -> Result<&LookupTables, SearchError> {
        if let Some(tables) = self.tables.get() {
            return Ok(tables);
        }
        let lookup = &self.config.lookup;
        let loaded = LookupTables::load(
            lookup.places.as_deref(),
            lookup.people.as_deref(),
            lookup.dictionary.as_deref(),
        )?;
        debug!(
            places = loaded.places.len(),
            people = loaded.people.len(),
            dictionary = loaded.dictionary.len(),
            "loaded lookup tables"
        );
        Ok(self.tables.get_or_init(|| loaded))
    }

    /// Rebuilds the index of `collection`.
    pub fn build<R: ProgressReporter>(
        &self,
        collection: &str,
        reporter: &mut R,
    ) -> Result<BuildReport, SearchError> {
        let tables = self.tables()?;
        let indexer = Indexer::new(&self.archive, &self.uris, tables);
        Ok(indexer.build(collection, &self.config.index_dir(collection), reporter)?)
    }

    /// Answers an encoded search request (query string without `?`).
    ///
    /// A malformed scope or query string yields an empty result rather than
    /// an error.
    pub fn search_query_string(
        &self,
        scope: &str,
        query: &str,
    ) -> Result<SearchResultPage, SearchError> {
        match SearchRequest::from_query_string(scope, query) {
            Ok(request) => self.search(&request),
            Err(error) => {
                debug!(scope, query, %error, "malformed search request");
                Ok(SearchResultPage::empty(self.uris.search(scope, query)))
            }
        }
    }

    /// Answers a parsed search request.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResultPage, SearchError> {
        let collection = &request.scope.collection;
        let index_dir = self.config.index_dir(collection);
        if !index_dir.exists() {
            return Err(SearchError::UnknownScope {
                collection: collection.clone(),
            });
        }

        let settings = PageSettings {
            page_size: self.config.search.page_size,
            context_chars: self.config.search.context_chars,
        };
        let hits = Searcher::open(&index_dir)?.search(request, settings)?;
        debug!(
            id = %result_id(&self.uris, request),
            total = hits.total,
            "search complete"
        );

        let annotations = self.resolve(collection, &hits.matches)?;
        Ok(result_page(&self.uris, request, hits, annotations))
    }

    /// Annotations of one page, or only its illustrations.
    pub fn annotation_list(
        &self,
        collection: &str,
        book: &str,
        page: &str,
        illustrations: bool,
    ) -> Result<PageAnnotations, SearchError> {
        let book = self.archive.load_book(collection, book)?;
        let page = book.page(page).ok_or_else(|| SearchError::UnknownPage {
            book: book.id.clone(),
            page: page.to_string(),
        })?;

        let tables = self.tables()?;
        let transformer = Transformer::new(&self.uris, tables);
        let transformer = transformer.for_book(collection, &book);
        let transformed = if illustrations {
            transformer.illustrations_for_page(page)
        } else {
            transformer.annotations_for_page(page)
        };

        Ok(PageAnnotations {
            id: transformer.list(page),
            annotations: transformed.annotations,
        })
    }

    /// Re-derives the annotations behind `matches`, in match order.
    ///
    /// Each book is loaded and each page transformed at most once. Matches
    /// that no longer resolve are logged and left out.
    fn resolve(
        &self,
        collection: &str,
        matches: &[MatchedAnnotation],
    ) -> Result<Vec<Annotation>, SearchError> {
        let tables = self.tables()?;
        let transformer = Transformer::new(&self.uris, tables);

        let mut books: HashMap<&str, Option<Book>> = HashMap::new();
        let mut pages: HashMap<(&str, &str), Vec<Annotation>> = HashMap::new();
        let mut resolved = Vec::with_capacity(matches.len());

        for matched in matches {
            let key = (matched.book.as_str(), matched.page.as_str());
            if let Entry::Vacant(entry) = pages.entry(key) {
                let book = books.entry(matched.book.as_str()).or_insert_with(|| {
                    self.archive
                        .load_book(collection, &matched.book)
                        .inspect_err(|error| {
                            warn!(book = %matched.book, %error, "cannot load book");
                        })
                        .ok()
                });
                let annotations = book
                    .as_ref()
                    .and_then(|book| {
                        let page = book.page(&matched.page)?;
                        let bound = transformer.for_book(collection, book);
                        let mut all = bound.annotations_for_page(page).annotations;
                        all.extend(bound.illustrations_for_page(page).annotations);
                        Some(all)
                    })
                    .unwrap_or_default();
                entry.insert(annotations);
            }

            match pages
                .get(&key)
                .and_then(|all| all.iter().find(|a| a.id == matched.id))
            {
                Some(annotation) => resolved.push(annotation.clone()),
                None => warn!(id = %matched.id, "indexed annotation no longer resolves"),
            }
        }

        Ok(resolved)
    }
}
