//! Search fields and the category table used for term expansion.
//!
//! A [`SearchField`] names one logical slot of an index document. Each field
//! declares the [`FieldSubtype`]s its values are analyzed with; the index
//! keeps one physical field per subtype so the same text is searchable both
//! verbatim and stemmed.

use std::fmt;

/// Language of a free-text subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextLanguage {
    /// Lowercased words, no stemming.
    Plain,
    /// English stemming.
    English,
    /// Italian stemming.
    Italian,
}

/// How the values of a field are analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldSubtype {
    /// Free-running text in a language.
    Text(TextLanguage),
    /// Exact identifier, not tokenized.
    Identifier,
    /// Page image name: split on whitespace and dots, leading zeros stripped.
    ImageName,
}

impl FieldSubtype {
    /// Suffix appended to the field name to form the physical index field.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Text(TextLanguage::English) => "_en",
            Self::Text(TextLanguage::Italian) => "_it",
            Self::Text(TextLanguage::Plain) | Self::Identifier | Self::ImageName => "",
        }
    }
}

/// Plain text only.
const PLAIN: &[FieldSubtype] = &[FieldSubtype::Text(TextLanguage::Plain)];

/// Plain and English-stemmed text.
const PLAIN_ENGLISH: &[FieldSubtype] = &[
    FieldSubtype::Text(TextLanguage::Plain),
    FieldSubtype::Text(TextLanguage::English),
];

/// Transcriptions appear in English, Latin and Italian.
const TRANSCRIPTION: &[FieldSubtype] = &[
    FieldSubtype::Text(TextLanguage::Plain),
    FieldSubtype::Text(TextLanguage::English),
    FieldSubtype::Text(TextLanguage::Italian),
];

/// Exact identifier.
const IDENTIFIER: &[FieldSubtype] = &[FieldSubtype::Identifier];

/// Image name.
const IMAGE_NAME: &[FieldSubtype] = &[FieldSubtype::ImageName];

/// A named, typed slot of an index document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    /// Annotation identifier.
    Id,
    /// Collection the annotation belongs to.
    CollectionId,
    /// Book the annotation belongs to.
    BookId,
    /// Page image name.
    Image,
    /// Book-level metadata: title, author, date, description.
    Description,
    /// Reader the annotation is attributed to.
    Reader,
    /// Printed page number.
    Pagination,
    /// Printer's signature mark.
    Signature,
    /// Books named in marginalia and illustrations.
    MarginaliaBooks,
    /// People named in marginalia and illustrations.
    MarginaliaPeople,
    /// Places named in marginalia and illustrations.
    MarginaliaLocations,
    /// Marginal note transcriptions.
    MarginaliaTranscription,
    /// Marginal note translations.
    MarginaliaTranslation,
    /// Cross references to other pages.
    MarginaliaInternalRef,
    /// Mark names.
    Marks,
    /// Symbol names.
    Symbols,
    /// Underlined text.
    Underlines,
    /// Errata, printed and amended.
    Errata,
    /// Drawing names.
    Drawings,
    /// Numerals.
    Numerals,
}

impl SearchField {
    /// Every field, in schema order.
    pub const ALL: [Self; 20] = [
        Self::Id,
        Self::CollectionId,
        Self::BookId,
        Self::Image,
        Self::Description,
        Self::Reader,
        Self::Pagination,
        Self::Signature,
        Self::MarginaliaBooks,
        Self::MarginaliaPeople,
        Self::MarginaliaLocations,
        Self::MarginaliaTranscription,
        Self::MarginaliaTranslation,
        Self::MarginaliaInternalRef,
        Self::Marks,
        Self::Symbols,
        Self::Underlines,
        Self::Errata,
        Self::Drawings,
        Self::Numerals,
    ];

    /// Base name of the field in the index.
    pub fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::CollectionId => "collection_id",
            Self::BookId => "book_id",
            Self::Image => "image",
            Self::Description => "description",
            Self::Reader => "reader",
            Self::Pagination => "pagination",
            Self::Signature => "signature",
            Self::MarginaliaBooks => "marginalia_books",
            Self::MarginaliaPeople => "marginalia_people",
            Self::MarginaliaLocations => "marginalia_locations",
            Self::MarginaliaTranscription => "marginalia_transcription",
            Self::MarginaliaTranslation => "marginalia_translation",
            Self::MarginaliaInternalRef => "marginalia_internal_ref",
            Self::Marks => "marks",
            Self::Symbols => "symbols",
            Self::Underlines => "underlines",
            Self::Errata => "errata",
            Self::Drawings => "drawings",
            Self::Numerals => "numerals",
        }
    }

    /// Subtypes the field is analyzed with. The first one is stored.
    pub fn subtypes(self) -> &'static [FieldSubtype] {
        match self {
            Self::Id | Self::CollectionId | Self::BookId => IDENTIFIER,
            Self::Image => IMAGE_NAME,
            Self::MarginaliaTranscription => TRANSCRIPTION,
            Self::Description
            | Self::MarginaliaTranslation
            | Self::Underlines
            | Self::Errata
            | Self::Drawings => PLAIN_ENGLISH,
            Self::Reader
            | Self::Pagination
            | Self::Signature
            | Self::MarginaliaBooks
            | Self::MarginaliaPeople
            | Self::MarginaliaLocations
            | Self::MarginaliaInternalRef
            | Self::Marks
            | Self::Symbols
            | Self::Numerals => PLAIN,
        }
    }

    /// Whether the field may supply before/after text for a hit.
    pub fn is_context(self) -> bool {
        !matches!(
            self,
            Self::Id
                | Self::CollectionId
                | Self::BookId
                | Self::Image
                | Self::Description
                | Self::Reader
                | Self::Pagination
                | Self::Signature
        )
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Restriction category a term is searched under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchCategory {
    /// Every annotation content field.
    All,
}

/// Fields searched under [`SearchCategory::All`].
const ALL_CATEGORY_FIELDS: [SearchField; 15] = [
    SearchField::Reader,
    SearchField::Pagination,
    SearchField::Signature,
    SearchField::MarginaliaBooks,
    SearchField::MarginaliaPeople,
    SearchField::MarginaliaLocations,
    SearchField::MarginaliaTranscription,
    SearchField::MarginaliaTranslation,
    SearchField::MarginaliaInternalRef,
    SearchField::Marks,
    SearchField::Symbols,
    SearchField::Underlines,
    SearchField::Errata,
    SearchField::Drawings,
    SearchField::Numerals,
];

impl SearchCategory {
    /// Fields a term in this category expands to.
    pub fn fields(self) -> &'static [SearchField] {
        match self {
            Self::All => &ALL_CATEGORY_FIELDS,
        }
    }
}

/// Chooses the category a raw term is searched under.
///
/// Every term currently maps to [`SearchCategory::All`].
pub fn category_for_term(_term: &str) -> SearchCategory {
    SearchCategory::All
}
