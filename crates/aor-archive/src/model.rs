//! Raw archive records as stored on disk.
//!
//! These types mirror the book files one to one. They carry no protocol
//! semantics; the transformer turns them into annotation resources.

use std::collections::BTreeMap;

use serde::Deserialize;

/// A collection of books.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookCollection {
    /// Collection id.
    pub id: String,
    /// Ids of the books in the collection, sorted.
    pub book_ids: Vec<String>,
}

/// One archived book.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Book {
    /// Book id, matching the file stem.
    pub id: String,
    /// Title.
    pub title: Option<String>,
    /// Author.
    pub author: Option<String>,
    /// Publication date.
    pub date: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Per-book reference sheet: term to external URI.
    pub references: BTreeMap<String, String>,
    /// Pages in reading order.
    pub pages: Vec<Page>,
    /// Annotation records for all pages.
    pub annotations: Vec<AnnotationRecord>,
}

impl Book {
    /// Finds the page a record reference points at.
    ///
    /// A reference may be the image file name or the page id, with or
    /// without leading zeros.
    pub fn page(&self, reference: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.matches(reference))
    }

    /// Iterates the records attached to `page`, in file order.
    pub fn records_for_page<'a>(
        &'a self,
        page: &'a Page,
    ) -> impl Iterator<Item = &'a AnnotationRecord> + 'a {
        self.annotations
            .iter()
            .filter(move |r| page.matches(r.page()))
    }

    /// Iterates records whose page reference resolves to no page.
    pub fn orphan_records(&self) -> impl Iterator<Item = &AnnotationRecord> + '_ {
        self.annotations
            .iter()
            .filter(|r| self.page(r.page()).is_none())
    }

    /// Book-level metadata joined into one searchable text.
    pub fn description_text(&self) -> String {
        [&self.title, &self.author, &self.date, &self.description]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One page image of a book.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Page {
    /// Short page id such as `1r`.
    pub id: String,
    /// Image file name such as `Book.001r.tif`.
    pub image: String,
    /// Image width in pixels.
    pub width: Option<u32>,
    /// Image height in pixels.
    pub height: Option<u32>,
    /// Printed page number.
    pub pagination: Option<String>,
    /// Printer's signature mark.
    pub signature: Option<String>,
}

impl Page {
    /// Returns true if `reference` names this page.
    pub fn matches(&self, reference: &str) -> bool {
        let reference = reference.trim();
        reference == self.image
            || reference == self.id
            || normalize_page_id(reference) == normalize_page_id(&self.id)
    }
}

/// Strips leading zeros from a page id, keeping at least one character.
pub fn normalize_page_id(id: &str) -> &str {
    let id = id.trim();
    let stripped = id.trim_start_matches('0');
    if stripped.is_empty() && !id.is_empty() {
        &id[id.len() - 1..]
    } else {
        stripped
    }
}

/// Explicit rectangular region recorded on a page.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct RawRegion {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

/// SVG outline recorded on a page.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RawOutline {
    /// Shape name (`polygon`, `rect`, ...).
    pub shape: String,
    /// Ordered `[x, y]` points.
    pub points: Vec<[u32; 2]>,
}

/// A raw annotation record, tagged by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnnotationRecord {
    /// Transcribed marginal note.
    Marginalia(Marginalia),
    /// Reader's mark.
    Mark(Mark),
    /// Reader's symbol.
    Symbol(Symbol),
    /// Printed illustration.
    Illustration(Illustration),
    /// Underlined passage.
    Underline(Underline),
    /// Correction.
    Errata(Errata),
    /// Reader's drawing.
    Drawing(Drawing),
    /// Reader's numeral.
    Numeral(Numeral),
}

impl AnnotationRecord {
    /// Page reference of the record.
    pub fn page(&self) -> &str {
        match self {
            Self::Marginalia(r) => &r.page,
            Self::Mark(r) => &r.page,
            Self::Symbol(r) => &r.page,
            Self::Illustration(r) => &r.page,
            Self::Underline(r) => &r.page,
            Self::Errata(r) => &r.page,
            Self::Drawing(r) => &r.page,
            Self::Numeral(r) => &r.page,
        }
    }

    /// Reader (hand) the record is attributed to.
    pub fn reader(&self) -> Option<&str> {
        match self {
            Self::Marginalia(r) => r.reader.as_deref(),
            Self::Mark(r) => r.reader.as_deref(),
            Self::Symbol(r) => r.reader.as_deref(),
            Self::Illustration(_) => None,
            Self::Underline(r) => r.reader.as_deref(),
            Self::Errata(r) => r.reader.as_deref(),
            Self::Drawing(r) => r.reader.as_deref(),
            Self::Numeral(r) => r.reader.as_deref(),
        }
    }

    /// Record type name as it appears in book files.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Marginalia(_) => "marginalia",
            Self::Mark(_) => "mark",
            Self::Symbol(_) => "symbol",
            Self::Illustration(_) => "illustration",
            Self::Underline(_) => "underline",
            Self::Errata(_) => "errata",
            Self::Drawing(_) => "drawing",
            Self::Numeral(_) => "numeral",
        }
    }
}

/// Transcribed marginal note.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Marginalia {
    /// Page reference.
    pub page: String,
    /// Reader.
    pub reader: Option<String>,
    /// Language of the transcription.
    pub language: Option<String>,
    /// Transcribed text.
    pub transcription: String,
    /// English translation.
    pub translation: Option<String>,
    /// Printed text immediately preceding the anchor.
    pub preceding_text: Option<String>,
    /// Printed text immediately following the anchor.
    pub following_text: Option<String>,
    /// Position tag.
    pub position: Option<String>,
    /// Explicit region, preferred over the position tag.
    pub region: Option<RawRegion>,
    /// Books mentioned.
    pub books: Vec<String>,
    /// People mentioned.
    pub people: Vec<String>,
    /// Places mentioned.
    pub locations: Vec<String>,
    /// References to other pages of the book.
    pub internal_refs: Vec<String>,
}

/// Reader's mark.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Mark {
    /// Page reference.
    pub page: String,
    /// Reader.
    pub reader: Option<String>,
    /// Mark name.
    pub name: String,
    /// Writing method.
    pub method: Option<String>,
    /// Position tags.
    pub position: Vec<String>,
    /// Printed passage the mark is anchored to.
    pub text: Option<String>,
}

/// Reader's symbol.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Symbol {
    /// Page reference.
    pub page: String,
    /// Reader.
    pub reader: Option<String>,
    /// Symbol name.
    pub name: String,
    /// Position tags.
    pub position: Vec<String>,
    /// Printed passage the symbol is anchored to.
    pub text: Option<String>,
}

/// Printed illustration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Illustration {
    /// Page reference.
    pub page: String,
    /// Title.
    pub title: Option<String>,
    /// Illustration kind (portrait, diagram, ...).
    pub illustration_type: Option<String>,
    /// Description.
    pub text: Option<String>,
    /// Position tags; one annotation per tag.
    pub position: Vec<String>,
    /// Explicit outline.
    pub outline: Option<RawOutline>,
    /// Books depicted or cited.
    pub books: Vec<String>,
    /// People depicted.
    pub people: Vec<String>,
    /// Places depicted.
    pub locations: Vec<String>,
}

/// Underlined passage.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Underline {
    /// Page reference.
    pub page: String,
    /// Reader.
    pub reader: Option<String>,
    /// Underlined text.
    pub text: String,
    /// Writing method.
    pub method: Option<String>,
    /// Underline style.
    pub underline_type: Option<String>,
}

/// Correction of a printing error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Errata {
    /// Page reference.
    pub page: String,
    /// Reader.
    pub reader: Option<String>,
    /// Text as printed.
    pub copy_text: String,
    /// Text as corrected.
    pub amended_text: String,
}

/// Reader's drawing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Drawing {
    /// Page reference.
    pub page: String,
    /// Reader.
    pub reader: Option<String>,
    /// Drawing name.
    pub name: String,
    /// Writing method.
    pub method: Option<String>,
    /// Position tags.
    pub position: Vec<String>,
    /// Explicit outline.
    pub outline: Option<RawOutline>,
}

/// Reader's numeral.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Numeral {
    /// Page reference.
    pub page: String,
    /// Reader.
    pub reader: Option<String>,
    /// Numeral as written.
    pub numeral: String,
    /// Position tags.
    pub position: Vec<String>,
}
