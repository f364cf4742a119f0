//! Full indexing pipeline.
//!
//! The [`Indexer`] rebuilds the index of one collection from scratch:
//! 1. Load the collection; an unknown collection aborts the build
//! 2. Load each book; an unreadable book is reported and skipped
//! 3. Transform every record of every page into annotations
//! 4. Clear the live index and write one [`AnnotationDocument`] per annotation
//! 5. Commit
//!
//! Nothing is visible until the commit swaps the index metadata, so readers
//! see either the previous index or the complete new one. A build that fails
//! before committing leaves the previous index untouched.

use std::{fmt, path::Path};

use aor_archive::{Archive, ArchiveError, Book};
use aor_iiif::PresentationUris;
use aor_transform::{LookupTables, TransformError, Transformer};
use tracing::{info, warn};

use crate::{document::AnnotationDocument, error::IndexError, writer::IndexWriter};

/// A problem that did not stop the build.
#[derive(Debug)]
pub enum BuildIssue {
    /// A book could not be loaded and was left out.
    Book {
        /// Book id.
        book: String,
        /// Load error.
        error: ArchiveError,
    },
    /// A record could not be transformed and was left out.
    Record {
        /// Book id.
        book: String,
        /// Transform error.
        error: TransformError,
    },
}

impl fmt::Display for BuildIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Book { book, error } => write!(f, "book {book} skipped: {error}"),
            Self::Record { book, error } => write!(f, "record in {book} skipped: {error}"),
        }
    }
}

/// Outcome of a collection build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Collection id.
    pub collection: String,
    /// Number of books indexed.
    pub books: usize,
    /// Number of annotation documents written.
    pub annotations: usize,
    /// Problems that were skipped over.
    pub issues: Vec<BuildIssue>,
}

impl BuildReport {
    /// Returns true if nothing was skipped.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Callback for reporting indexing progress.
pub trait ProgressReporter {
    /// Called when starting to process a book.
    fn on_book_start(&mut self, book: &str, current: usize, total: usize);

    /// Called when a book was indexed.
    fn on_book_done(&mut self, book: &str, annotations: usize);

    /// Called when a book could not be loaded.
    fn on_book_error(&mut self, book: &str, error: &ArchiveError);

    /// Called when a record was skipped.
    fn on_record_skipped(&mut self, book: &str, error: &TransformError);

    /// Called when the build is complete.
    fn on_complete(&mut self, report: &BuildReport);
}

/// A no-op progress reporter for silent indexing.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn on_book_start(&mut self, _book: &str, _current: usize, _total: usize) {}
    fn on_book_done(&mut self, _book: &str, _annotations: usize) {}
    fn on_book_error(&mut self, _book: &str, _error: &ArchiveError) {}
    fn on_record_skipped(&mut self, _book: &str, _error: &TransformError) {}
    fn on_complete(&mut self, _report: &BuildReport) {}
}

/// A progress reporter that emits `tracing` events.
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn on_book_start(&mut self, book: &str, current: usize, total: usize) {
        info!(book, current, total, "indexing book");
    }

    fn on_book_done(&mut self, book: &str, annotations: usize) {
        info!(book, annotations, "indexed book");
    }

    fn on_book_error(&mut self, book: &str, error: &ArchiveError) {
        warn!(book, %error, "skipping book");
    }

    fn on_record_skipped(&mut self, book: &str, error: &TransformError) {
        warn!(book, %error, "skipping record");
    }

    fn on_complete(&mut self, report: &BuildReport) {
        info!(
            collection = %report.collection,
            books = report.books,
            annotations = report.annotations,
            issues = report.issues.len(),
            "index built"
        );
    }
}

/// Builds collection indexes from an archive.
pub struct Indexer<'a> {
    /// Source of books.
    archive: &'a dyn Archive,
    /// Record transformer.
    transformer: Transformer<'a>,
}

impl<'a> Indexer<'a> {
    /// Creates an indexer reading from `archive`.
    pub fn new(
        archive: &'a dyn Archive,
        uris: &'a PresentationUris,
        tables: &'a LookupTables,
    ) -> Self {
        Self {
            archive,
            transformer: Transformer::new(uris, tables),
        }
    }

    /// Rebuilds the index of `collection` at `index_dir`.
    ///
    /// Documents of any previous build are deleted in the same commit that
    /// adds the new ones.
    pub fn build<R: ProgressReporter>(
        &self,
        collection: &str,
        index_dir: &Path,
        reporter: &mut R,
    ) -> Result<BuildReport, IndexError> {
        let books = self.archive.load_collection(collection)?;
        let mut report = BuildReport {
            collection: collection.to_string(),
            ..Default::default()
        };

        let mut writer = IndexWriter::open(index_dir)?;
        writer.delete_all()?;

        let total = books.book_ids.len();
        for (idx, book_id) in books.book_ids.iter().enumerate() {
            reporter.on_book_start(book_id, idx + 1, total);
            match self.archive.load_book(collection, book_id) {
                Ok(book) => {
                    let written =
                        self.index_book(&mut writer, collection, &book, &mut report, reporter)?;
                    report.books += 1;
                    report.annotations += written;
                    reporter.on_book_done(book_id, written);
                }
                Err(error) => {
                    reporter.on_book_error(book_id, &error);
                    report.issues.push(BuildIssue::Book {
                        book: book_id.clone(),
                        error,
                    });
                }
            }
        }

        writer.commit()?;
        writer.finish()?;

        reporter.on_complete(&report);
        Ok(report)
    }

    /// Writes the annotations of one book, returning how many were written.
    fn index_book<R: ProgressReporter>(
        &self,
        writer: &mut IndexWriter,
        collection: &str,
        book: &Book,
        report: &mut BuildReport,
        reporter: &mut R,
    ) -> Result<usize, IndexError> {
        let transformer = self.transformer.for_book(collection, book);
        let mut written = 0;
        let mut skipped = Vec::new();

        for page in &book.pages {
            for (seq, record) in transformer.numbered_records(page) {
                match transformer.transform(page, record, seq) {
                    Ok(annotations) => {
                        for annotation in &annotations {
                            let doc =
                                AnnotationDocument::new(collection, book, page, record, annotation);
                            writer.add_document(&doc)?;
                            written += 1;
                        }
                    }
                    Err(error) => skipped.push(error),
                }
            }
        }
        skipped.extend(book.orphan_records().map(|record| TransformError::UnresolvedPage {
            book: book.id.clone(),
            reference: record.page().to_string(),
        }));

        for error in skipped {
            reporter.on_record_skipped(&book.id, &error);
            report.issues.push(BuildIssue::Record {
                book: book.id.clone(),
                error,
            });
        }
        Ok(written)
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;

    use std::fs;

    use aor_archive::FsArchive;
    use aor_query::SearchRequest;
    use tempfile::TempDir;

    use super::*;
    use crate::search::{PageSettings, Searcher};

    /// Test reporter that records all events.
    #[derive(Default)]
    struct TestReporter {
        events: RefCell<Vec<String>>,
    }

    impl ProgressReporter for TestReporter {
        fn on_book_start(&mut self, book: &str, current: usize, total: usize) {
            self.events
                .borrow_mut()
                .push(format!("start: {book} ({current}/{total})"));
        }

        fn on_book_done(&mut self, book: &str, annotations: usize) {
            self.events
                .borrow_mut()
                .push(format!("done: {book} ({annotations})"));
        }

        fn on_book_error(&mut self, book: &str, _error: &ArchiveError) {
            self.events.borrow_mut().push(format!("error: {book}"));
        }

        fn on_record_skipped(&mut self, book: &str, _error: &TransformError) {
            self.events.borrow_mut().push(format!("skipped: {book}"));
        }

        fn on_complete(&mut self, report: &BuildReport) {
            self.events
                .borrow_mut()
                .push(format!("complete: {}", report.annotations));
        }
    }

    fn archive() -> TempDir {
        let temp = TempDir::new().unwrap();
        let demo = temp.path().join("demo");
        fs::create_dir_all(&demo).unwrap();
        fs::write(
            demo.join("A.json"),
            r#"{
                "pages": [{"id": "1r", "image": "A.001r.tif", "width": 1000, "height": 1600}],
                "annotations": [
                    {"type": "symbol", "page": "1r", "name": "Sun", "position": ["head"]},
                    {"type": "symbol", "page": "1r", "name": "Moon", "position": ["nowhere"]},
                    {"type": "numeral", "page": "9r", "numeral": "3"}
                ]
            }"#,
        )
        .unwrap();
        fs::write(demo.join("Broken.json"), "{ not json").unwrap();
        temp
    }

    fn build(archive_root: &Path, index_dir: &Path, reporter: &mut TestReporter) -> BuildReport {
        let archive = FsArchive::new(archive_root);
        let uris = PresentationUris::new("http://example.org/iiif");
        let tables = LookupTables::default();
        Indexer::new(&archive, &uris, &tables)
            .build("demo", index_dir, reporter)
            .unwrap()
    }

    #[test]
    fn reports_skipped_books_and_records() {
        let archive_dir = archive();
        let index_root = TempDir::new().unwrap();
        let index_dir = index_root.path().join("demo");
        let mut reporter = TestReporter::default();

        let report = build(archive_dir.path(), &index_dir, &mut reporter);

        assert_eq!(report.books, 1);
        assert_eq!(report.annotations, 1);
        assert_eq!(report.issues.len(), 3);
        assert!(matches!(report.issues[0], BuildIssue::Record { .. }));
        assert!(matches!(report.issues[2], BuildIssue::Book { .. }));
        assert!(!report.is_clean());

        let events = reporter.events.borrow();
        assert_eq!(events[0], "start: A (1/2)");
        assert_eq!(events.last().unwrap(), "complete: 1");
    }

    fn sun_count(index_dir: &Path) -> usize {
        let mut searcher = Searcher::open(index_dir).unwrap();
        let request = SearchRequest::from_query_string("demo", "q=sun").unwrap();
        let settings = PageSettings {
            page_size: 10,
            context_chars: 10,
        };
        searcher.search(&request, settings).unwrap().total
    }

    #[test]
    fn rebuild_replaces_the_previous_index() {
        let archive_dir = archive();
        let index_root = TempDir::new().unwrap();
        let index_dir = index_root.path().join("demo");

        build(archive_dir.path(), &index_dir, &mut TestReporter::default());
        build(archive_dir.path(), &index_dir, &mut TestReporter::default());

        assert!(index_dir.join("meta.json").exists());
        assert_eq!(sun_count(&index_dir), 1);
    }

    #[test]
    fn reader_sees_the_old_index_until_the_build_commits() {
        let archive_dir = archive();
        let index_root = TempDir::new().unwrap();
        let index_dir = index_root.path().join("demo");
        build(archive_dir.path(), &index_dir, &mut TestReporter::default());

        let mut writer = IndexWriter::open(&index_dir).unwrap();
        writer.delete_all().unwrap();
        assert_eq!(sun_count(&index_dir), 1);

        drop(writer);
        assert_eq!(sun_count(&index_dir), 1);
    }

    #[test]
    fn failed_build_keeps_the_previous_index() {
        let archive_dir = archive();
        let index_root = TempDir::new().unwrap();
        let index_dir = index_root.path().join("demo");
        build(archive_dir.path(), &index_dir, &mut TestReporter::default());

        let archive = FsArchive::new(archive_dir.path());
        let uris = PresentationUris::new("http://example.org/iiif");
        let tables = LookupTables::default();
        let _writer = IndexWriter::open(&index_dir).unwrap();
        let result =
            Indexer::new(&archive, &uris, &tables).build("demo", &index_dir, &mut SilentReporter);

        assert!(result.is_err());
        assert_eq!(sun_count(&index_dir), 1);
    }

    #[test]
    fn unknown_collection_aborts() {
        let archive_dir = archive();
        let index_root = TempDir::new().unwrap();
        let archive = FsArchive::new(archive_dir.path());
        let uris = PresentationUris::new("http://example.org/iiif");
        let tables = LookupTables::default();

        let result = Indexer::new(&archive, &uris, &tables).build(
            "missing",
            &index_root.path().join("missing"),
            &mut SilentReporter,
        );
        assert!(matches!(result, Err(IndexError::Archive(_))));
        assert!(!index_root.path().join("missing").exists());
    }
}
