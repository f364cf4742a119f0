//! Conversion from annotations to index documents.
//!
//! An [`AnnotationDocument`] flattens one annotation, the raw record it was
//! derived from, its page and its book into search field values. Values are
//! entity-decoded plain text, so a hit's matching span is the exact text the
//! reader sees.
//!
//! Symbol and mark records index their name only. The printed passage they
//! are anchored to is not their content and is never searchable.

use aor_archive::{AnnotationRecord, Book, Page};
use aor_iiif::{Annotation, Motivation};
use aor_query::SearchField;
use aor_transform::decode_entities;

/// A document ready for indexing, representing one annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationDocument {
    /// Annotation identifier.
    pub id: String,
    /// Collection id.
    pub collection: String,
    /// Book id.
    pub book: String,
    /// Page id.
    pub page: String,
    /// Page image file name.
    pub image: String,
    /// Annotation motivation.
    pub motivation: Motivation,
    /// Content values in field order; a field may repeat.
    pub values: Vec<(SearchField, String)>,
}

impl AnnotationDocument {
    /// Builds the document for `annotation`, derived from `record` on `page`.
    pub fn new(
        collection: &str,
        book: &Book,
        page: &Page,
        record: &AnnotationRecord,
        annotation: &Annotation,
    ) -> Self {
        let mut doc = Self {
            id: annotation.id.clone(),
            collection: collection.to_string(),
            book: book.id.clone(),
            page: page.id.clone(),
            image: page.image.clone(),
            motivation: annotation.motivation,
            values: Vec::new(),
        };

        doc.push(SearchField::Description, &book.description_text());
        doc.push_opt(SearchField::Reader, record.reader());
        doc.push_opt(SearchField::Pagination, page.pagination.as_deref());
        doc.push_opt(SearchField::Signature, page.signature.as_deref());

        match record {
            AnnotationRecord::Marginalia(r) => {
                doc.push_all(SearchField::MarginaliaBooks, &r.books);
                doc.push_all(SearchField::MarginaliaPeople, &r.people);
                doc.push_all(SearchField::MarginaliaLocations, &r.locations);
                doc.push(SearchField::MarginaliaTranscription, &r.transcription);
                doc.push_opt(SearchField::MarginaliaTranslation, r.translation.as_deref());
                doc.push_all(SearchField::MarginaliaInternalRef, &r.internal_refs);
            }
            AnnotationRecord::Mark(r) => doc.push(SearchField::Marks, &r.name),
            AnnotationRecord::Symbol(r) => doc.push(SearchField::Symbols, &r.name),
            AnnotationRecord::Illustration(r) => {
                doc.push_all(SearchField::MarginaliaBooks, &r.books);
                doc.push_all(SearchField::MarginaliaPeople, &r.people);
                doc.push_all(SearchField::MarginaliaLocations, &r.locations);
            }
            AnnotationRecord::Underline(r) => doc.push(SearchField::Underlines, &r.text),
            AnnotationRecord::Errata(r) => {
                doc.push(SearchField::Errata, &r.copy_text);
                doc.push(SearchField::Errata, &r.amended_text);
            }
            AnnotationRecord::Drawing(r) => doc.push(SearchField::Drawings, &r.name),
            AnnotationRecord::Numeral(r) => doc.push(SearchField::Numerals, &r.numeral),
        }

        doc
    }

    /// Values of `field`, in insertion order.
    pub fn values(&self, field: SearchField) -> impl Iterator<Item = &str> {
        self.values
            .iter()
            .filter(move |(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    /// Adds a decoded value, skipping blank ones.
    fn push(&mut self, field: SearchField, value: &str) {
        let value = decode_entities(value.trim());
        if !value.is_empty() {
            self.values.push((field, value));
        }
    }

    /// Adds a value when present.
    fn push_opt(&mut self, field: SearchField, value: Option<&str>) {
        if let Some(value) = value {
            self.push(field, value);
        }
    }

    /// Adds every value of a list.
    fn push_all(&mut self, field: SearchField, values: &[String]) {
        for value in values {
            self.push(field, value);
        }
    }
}
