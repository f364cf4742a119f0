//! Index writer for adding annotation documents to the Tantivy index.

use std::{fs, path::Path};

use aor_archive::normalize_page_id;
use aor_query::SearchField;
use tantivy::{
    Index, IndexWriter as TantivyIndexWriter, TantivyDocument, directory::MmapDirectory,
};

use crate::{
    analyzer::register_analyzers, document::AnnotationDocument, error::IndexError,
    schema::IndexSchema,
};

/// Default heap size for the index writer (50 MB).
const DEFAULT_HEAP_SIZE: usize = 50_000_000;

/// Writes annotation documents to a Tantivy index.
///
/// The writer uses a single indexing thread, so the same input always
/// produces the same document order.
pub struct IndexWriter {
    /// The underlying Tantivy writer.
    writer: TantivyIndexWriter,
    /// Schema with field handles.
    schema: IndexSchema,
}

impl IndexWriter {
    /// Opens or creates an index at the given path.
    pub fn open(path: &Path) -> Result<Self, IndexError> {
        let schema = IndexSchema::new();

        fs::create_dir_all(path)?;

        let dir = MmapDirectory::open(path).map_err(|e| {
            let err: tantivy::TantivyError = e.into();
            IndexError::open_index(path.to_path_buf(), &err)
        })?;

        let index = Index::open_or_create(dir, schema.schema().clone())
            .map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;
        register_analyzers(&index);

        let writer = index
            .writer_with_num_threads(1, DEFAULT_HEAP_SIZE)
            .map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;

        Ok(Self { writer, schema })
    }

    /// Adds an annotation document to the index.
    ///
    /// Content values are written to every physical field of their search
    /// field, so each subtype analyzes the same text.
    pub fn add_document(&mut self, doc: &AnnotationDocument) -> Result<(), IndexError> {
        let mut tantivy_doc = TantivyDocument::new();

        let identifiers = [
            (SearchField::Id, &doc.id),
            (SearchField::CollectionId, &doc.collection),
            (SearchField::BookId, &doc.book),
            (SearchField::Image, &doc.image),
        ];
        for (field, value) in identifiers {
            for &(_, handle) in self.schema.physical(field) {
                tantivy_doc.add_text(handle, value);
            }
        }

        for (field, value) in &doc.values {
            for &(_, handle) in self.schema.physical(*field) {
                tantivy_doc.add_text(handle, value);
            }
        }

        tantivy_doc.add_text(self.schema.page, &doc.page);
        for key in [&doc.page, &doc.image] {
            tantivy_doc.add_text(self.schema.page_key, normalize_page_id(key));
        }
        tantivy_doc.add_text(self.schema.motivation, doc.motivation.as_str());

        self.writer
            .add_document(tantivy_doc)
            .map_err(|e| IndexError::write(&e))?;
        Ok(())
    }

    /// Commits all pending documents, making them visible to readers.
    pub fn commit(&mut self) -> Result<(), IndexError> {
        self.writer.commit().map_err(|e| IndexError::commit(&e))?;
        Ok(())
    }

    /// Deletes every document; takes effect with the next commit.
    pub fn delete_all(&mut self) -> Result<(), IndexError> {
        self.writer
            .delete_all_documents()
            .map_err(|e| IndexError::write(&e))?;
        Ok(())
    }

    /// Waits for background merges and releases the index lock.
    pub fn finish(self) -> Result<(), IndexError> {
        self.writer
            .wait_merging_threads()
            .map_err(|e| IndexError::commit(&e))
    }
}
