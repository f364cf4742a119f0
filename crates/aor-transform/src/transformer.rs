//! Raw record to annotation transformation.
//!
//! A [`Transformer`] holds what every book shares: identifier construction
//! and the lookup tables. [`Transformer::for_book`] binds it to one book,
//! which adds the book's own reference sheet to decoration.
//!
//! Records are numbered per page in file order, starting at 1. The number is
//! part of the annotation identifier, so identifiers stay stable no matter
//! which subset of a page's records is requested.

use std::slice;

use aor_archive::{
    AnnotationRecord, Book, Drawing, Illustration, Marginalia, Page, RawOutline, RawRegion,
};
use aor_iiif::{
    Annotation, Motivation, Point, PresentationUris, Rect, Selector, Source, SvgSelector,
    SvgShape, Target, TextQuote,
};
use tracing::warn;

use crate::{
    decorator::{Decorator, LookupTable, LookupTables},
    error::TransformError,
    escape::{decode_entities, escape_html},
    position::Position,
};

/// Language tag of translations.
const TRANSLATION_LANGUAGE: &str = "en";

/// Annotations produced from a set of records, with the records skipped.
#[derive(Debug, Default)]
pub struct Transformed {
    /// Produced annotations, in record order.
    pub annotations: Vec<Annotation>,
    /// One error per skipped record.
    pub skipped: Vec<TransformError>,
}

/// Shared transformation state.
#[derive(Debug, Clone, Copy)]
pub struct Transformer<'a> {
    /// Identifier builder.
    uris: &'a PresentationUris,
    /// Decorator over the shared lookup tables.
    decorator: Decorator<'a>,
}

impl<'a> Transformer<'a> {
    /// Creates a transformer.
    pub fn new(uris: &'a PresentationUris, tables: &'a LookupTables) -> Self {
        Self {
            uris,
            decorator: Decorator::new(tables),
        }
    }

    /// Binds the transformer to one book of `collection`.
    pub fn for_book<'b>(&self, collection: &'b str, book: &'b Book) -> BookTransformer<'b>
    where
        'a: 'b,
    {
        BookTransformer {
            uris: self.uris,
            decorator: self.decorator,
            collection,
            book,
            references: LookupTable::from_references(&book.references),
        }
    }
}

/// Transformer bound to one book.
#[derive(Debug)]
pub struct BookTransformer<'b> {
    /// Identifier builder.
    uris: &'b PresentationUris,
    /// Decorator over the shared lookup tables.
    decorator: Decorator<'b>,
    /// Collection id.
    collection: &'b str,
    /// Book being transformed.
    book: &'b Book,
    /// The book's reference sheet.
    references: LookupTable,
}

impl<'b> BookTransformer<'b> {
    /// The book being transformed.
    pub fn book(&self) -> &'b Book {
        self.book
    }

    /// Records of `page` with their sequence numbers.
    pub fn numbered_records(
        &self,
        page: &'b Page,
    ) -> impl Iterator<Item = (usize, &'b AnnotationRecord)> + 'b {
        self.book
            .records_for_page(page)
            .enumerate()
            .map(|(i, record)| (i + 1, record))
    }

    /// Canvas URI of `page`.
    pub fn canvas(&self, page: &Page) -> String {
        self.uris.canvas(self.collection, &self.book.id, &page.id)
    }

    /// Annotation list URI of `page`.
    pub fn list(&self, page: &Page) -> String {
        self.uris.list(self.collection, &self.book.id, &page.id)
    }

    /// Transforms one record.
    ///
    /// Most records produce one annotation; an illustration produces one per
    /// position tag.
    pub fn transform(
        &self,
        page: &Page,
        record: &AnnotationRecord,
        seq: usize,
    ) -> Result<Vec<Annotation>, TransformError> {
        let canvas = self.canvas(page);
        let id = self.annotation_id(page, &seq.to_string());
        let annotation = match record {
            AnnotationRecord::Marginalia(r) => self.marginalia(page, r, id, canvas)?,
            AnnotationRecord::Mark(r) => {
                let selector = position_selector(page, &r.position)?;
                labelled(id, Motivation::Mark, &r.name, canvas, selector)
            }
            AnnotationRecord::Symbol(r) => {
                let selector = position_selector(page, &r.position)?;
                labelled(id, Motivation::Symbol, &r.name, canvas, selector)
            }
            AnnotationRecord::Illustration(r) => {
                return self.illustration(page, r, seq, &canvas);
            }
            AnnotationRecord::Underline(r) => Annotation {
                id,
                motivation: Motivation::Underline,
                source: Source::text(self.decorate(&r.text)),
                target: Target {
                    canvas,
                    selector: None,
                },
                alternate_sources: Vec::new(),
            },
            AnnotationRecord::Errata(r) => Annotation {
                id,
                motivation: Motivation::Errata,
                source: Source::text(plain_html(&format!(
                    "{} \u{2192} {}",
                    r.copy_text, r.amended_text
                ))),
                target: Target {
                    canvas,
                    selector: None,
                },
                alternate_sources: Vec::new(),
            },
            AnnotationRecord::Drawing(r) => self.drawing(page, r, id, canvas)?,
            AnnotationRecord::Numeral(r) => Annotation {
                id,
                motivation: Motivation::Numeral,
                source: Source::text(plain_html(&r.numeral)),
                target: Target {
                    canvas,
                    selector: position_selector(page, &r.position)?,
                },
                alternate_sources: Vec::new(),
            },
        };
        Ok(vec![annotation])
    }

    /// Annotations for every record of `page` except illustrations.
    pub fn annotations_for_page(&self, page: &'b Page) -> Transformed {
        self.transform_where(page, |r| !matches!(r, AnnotationRecord::Illustration(_)))
    }

    /// Annotations for the illustrations of `page`.
    pub fn illustrations_for_page(&self, page: &'b Page) -> Transformed {
        self.transform_where(page, |r| matches!(r, AnnotationRecord::Illustration(_)))
    }

    /// Annotations for every record of the book.
    ///
    /// Records whose page cannot be resolved are reported as skipped.
    pub fn annotations(&self) -> Transformed {
        let mut out = Transformed::default();
        for page in &self.book.pages {
            let page_out = self.transform_where(page, |_| true);
            out.annotations.extend(page_out.annotations);
            out.skipped.extend(page_out.skipped);
        }
        for record in self.book.orphan_records() {
            out.skipped.push(self.unresolved(record));
        }
        out
    }

    /// Error for a record whose page does not exist, logged once.
    pub fn unresolved(&self, record: &AnnotationRecord) -> TransformError {
        let error = TransformError::UnresolvedPage {
            book: self.book.id.clone(),
            reference: record.page().to_string(),
        };
        warn!(book = %self.book.id, kind = record.kind(), %error, "skipping record");
        error
    }

    /// Transforms the records of `page` accepted by `filter`.
    fn transform_where(
        &self,
        page: &'b Page,
        filter: impl Fn(&AnnotationRecord) -> bool,
    ) -> Transformed {
        let mut out = Transformed::default();
        for (seq, record) in self.numbered_records(page).filter(|(_, r)| filter(r)) {
            match self.transform(page, record, seq) {
                Ok(annotations) => out.annotations.extend(annotations),
                Err(error) => {
                    warn!(
                        book = %self.book.id,
                        page = %page.id,
                        seq,
                        kind = record.kind(),
                        %error,
                        "skipping record"
                    );
                    out.skipped.push(error);
                }
            }
        }
        out
    }

    /// Identifier of an annotation on `page`.
    fn annotation_id(&self, page: &Page, seq: &str) -> String {
        self.uris
            .annotation(self.collection, &self.book.id, &page.image, seq)
    }

    /// Decodes, links and escapes annotation text.
    fn decorate(&self, text: &str) -> String {
        self.decorator.decorate(text, &self.references)
    }

    /// Marginal note with its quote selector and optional translation.
    fn marginalia(
        &self,
        page: &Page,
        record: &Marginalia,
        id: String,
        canvas: String,
    ) -> Result<Annotation, TransformError> {
        let selector = match (&record.region, &record.position) {
            (Some(region), _) => Some(Selector::Fragment(rect(region))),
            (None, Some(position)) => position_selector(page, slice::from_ref(position))?,
            (None, None) => None,
        };

        let quote = TextQuote {
            prefix: record.preceding_text.as_deref().map(decode_entities),
            exact: decode_entities(&record.transcription),
            suffix: record.following_text.as_deref().map(decode_entities),
        };

        let alternate_sources = record
            .translation
            .iter()
            .filter(|t| !t.trim().is_empty())
            .map(|translation| Source {
                text: self.decorate(translation),
                language: Some(TRANSLATION_LANGUAGE.to_string()),
                selector: None,
            })
            .collect();

        Ok(Annotation {
            id,
            motivation: Motivation::Marginalia,
            source: Source {
                text: self.decorate(&record.transcription),
                language: record.language.clone(),
                selector: Some(Selector::TextQuote(quote)),
            },
            target: Target { canvas, selector },
            alternate_sources,
        })
    }

    /// Drawing, outlined when an outline is recorded.
    fn drawing(
        &self,
        page: &Page,
        record: &Drawing,
        id: String,
        canvas: String,
    ) -> Result<Annotation, TransformError> {
        let selector = match &record.outline {
            Some(outline) => Some(outline_selector(page, outline)?),
            None => position_selector(page, &record.position)?,
        };
        Ok(labelled(id, Motivation::Drawing, &record.name, canvas, selector))
    }

    /// One annotation per position tag, all sharing one source.
    fn illustration(
        &self,
        page: &Page,
        record: &Illustration,
        seq: usize,
        canvas: &str,
    ) -> Result<Vec<Annotation>, TransformError> {
        let text = match (&record.title, &record.text) {
            (Some(title), Some(text)) => format!("{title}: {text}"),
            (Some(only), None) | (None, Some(only)) => only.clone(),
            (None, None) => Motivation::Illustration.label().to_string(),
        };
        let source = Source::text(self.decorate(&text));
        let outline = record
            .outline
            .as_ref()
            .map(|o| outline_selector(page, o))
            .transpose()?;

        let annotation = |id: String, selector: Option<Selector>| Annotation {
            id,
            motivation: Motivation::Illustration,
            source: source.clone(),
            target: Target {
                canvas: canvas.to_string(),
                selector,
            },
            alternate_sources: Vec::new(),
        };

        if record.position.is_empty() {
            let id = self.annotation_id(page, &seq.to_string());
            return Ok(vec![annotation(id, outline)]);
        }

        let multiple = record.position.len() > 1;
        record
            .position
            .iter()
            .map(|tag| -> Result<Annotation, TransformError> {
                let position = parse_position(page, tag)?;
                let selector = match &outline {
                    Some(outline) => outline.clone(),
                    None => Selector::Fragment(region(page, position)?),
                };
                let suffix = if multiple {
                    format!("{seq}-{}", tag.trim())
                } else {
                    seq.to_string()
                };
                Ok(annotation(self.annotation_id(page, &suffix), Some(selector)))
            })
            .collect()
    }
}

/// Annotation whose source is a short label such as `Symbol: Sun`.
fn labelled(
    id: String,
    motivation: Motivation,
    name: &str,
    canvas: String,
    selector: Option<Selector>,
) -> Annotation {
    Annotation {
        id,
        motivation,
        source: Source::text(plain_html(&format!("{}: {}", motivation.label(), name.trim()))),
        target: Target { canvas, selector },
        alternate_sources: Vec::new(),
    }
}

/// Decodes and escapes text without linking.
fn plain_html(text: &str) -> String {
    escape_html(&decode_entities(text))
}

/// Converts a recorded region.
fn rect(region: &RawRegion) -> Rect {
    Rect::new(region.x, region.y, region.w, region.h)
}

/// Parses a position tag of a record on `page`.
fn parse_position(page: &Page, tag: &str) -> Result<Position, TransformError> {
    Position::parse(tag).ok_or_else(|| TransformError::UnknownPosition {
        page: page.id.clone(),
        position: tag.to_string(),
    })
}

/// Region of `position` on `page`.
fn region(page: &Page, position: Position) -> Result<Rect, TransformError> {
    match (page.width, page.height) {
        (Some(width), Some(height)) => Ok(position.region(width, height)),
        _ => Err(TransformError::MissingDimensions {
            page: page.id.clone(),
        }),
    }
}

/// Fragment covering the union of the tagged regions, or `None` without tags.
fn position_selector(page: &Page, tags: &[String]) -> Result<Option<Selector>, TransformError> {
    let mut union: Option<Rect> = None;
    for tag in tags {
        let rect = region(page, parse_position(page, tag)?)?;
        union = Some(union.map_or(rect, |u| u.union(&rect)));
    }
    Ok(union.map(Selector::Fragment))
}

/// SVG selector from a recorded outline.
fn outline_selector(page: &Page, outline: &RawOutline) -> Result<Selector, TransformError> {
    let invalid = |source| TransformError::Outline {
        page: page.id.clone(),
        source,
    };
    let shape = SvgShape::parse(&outline.shape).map_err(invalid)?;
    let points = outline
        .points
        .iter()
        .map(|&[x, y]| Point::new(x, y))
        .collect();
    let svg = SvgSelector::new(shape, points).map_err(invalid)?;
    Ok(Selector::Svg(svg))
}
