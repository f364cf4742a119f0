//! Text analysis pipelines for the aor search index.
//!
//! Every field subtype has its own analyzer:
//! - plain text: `SimpleTokenizer`, `LowerCaser`, `RemoveLongFilter`
//! - English and Italian text: the plain pipeline followed by a `Stemmer`
//! - image names: [`ImageNameTokenizer`] followed by `LowerCaser`
//! - identifiers: Tantivy's built-in `raw` tokenizer
//!
//! The same analyzer is used at index time and at query time, so a query term
//! and the indexed text are always normalized the same way.

use std::collections::HashMap;

use aor_query::{FieldSubtype, TextLanguage};
use tantivy::{
    Index,
    tokenizer::{
        Language, LowerCaser, RawTokenizer, RemoveLongFilter, SimpleTokenizer, Stemmer,
        TextAnalyzer, Token, TokenStream, Tokenizer,
    },
};

/// Tokenizer name for unstemmed text.
pub const PLAIN_TOKENIZER: &str = "aor_plain";

/// Tokenizer name for English text.
pub const ENGLISH_TOKENIZER: &str = "aor_en";

/// Tokenizer name for Italian text.
pub const ITALIAN_TOKENIZER: &str = "aor_it";

/// Tokenizer name for image file names.
pub const IMAGE_TOKENIZER: &str = "aor_image";

/// Tantivy's built-in single-token tokenizer.
pub const RAW_TOKENIZER: &str = "raw";

/// Maximum token length in bytes before filtering.
const MAX_TOKEN_LENGTH: usize = 40;

/// Name of the tokenizer registered for `subtype`.
pub fn tokenizer_name(subtype: FieldSubtype) -> &'static str {
    match subtype {
        FieldSubtype::Text(TextLanguage::Plain) => PLAIN_TOKENIZER,
        FieldSubtype::Text(TextLanguage::English) => ENGLISH_TOKENIZER,
        FieldSubtype::Text(TextLanguage::Italian) => ITALIAN_TOKENIZER,
        FieldSubtype::ImageName => IMAGE_TOKENIZER,
        FieldSubtype::Identifier => RAW_TOKENIZER,
    }
}

/// Builds the analyzer for `subtype`.
pub fn build_analyzer(subtype: FieldSubtype) -> TextAnalyzer {
    match subtype {
        FieldSubtype::Text(TextLanguage::Plain) => text_analyzer(None),
        FieldSubtype::Text(TextLanguage::English) => text_analyzer(Some(Language::English)),
        FieldSubtype::Text(TextLanguage::Italian) => text_analyzer(Some(Language::Italian)),
        FieldSubtype::ImageName => TextAnalyzer::builder(ImageNameTokenizer::default())
            .filter(LowerCaser)
            .build(),
        FieldSubtype::Identifier => TextAnalyzer::from(RawTokenizer::default()),
    }
}

/// Builds a free-text analyzer, stemming when a language is given.
fn text_analyzer(language: Option<Language>) -> TextAnalyzer {
    let builder = TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH));
    match language {
        Some(language) => builder.filter(Stemmer::new(language)).build(),
        None => builder.build(),
    }
}

/// Registers every custom analyzer with `index`.
pub fn register_analyzers(index: &Index) {
    let subtypes = [
        FieldSubtype::Text(TextLanguage::Plain),
        FieldSubtype::Text(TextLanguage::English),
        FieldSubtype::Text(TextLanguage::Italian),
        FieldSubtype::ImageName,
    ];
    for subtype in subtypes {
        index
            .tokenizers()
            .register(tokenizer_name(subtype), build_analyzer(subtype));
    }
}

/// Runs `text` through `analyzer`, collecting the tokens with their offsets.
pub fn analyze(analyzer: &mut TextAnalyzer, text: &str) -> Vec<Token> {
    let mut stream = analyzer.token_stream(text);
    let mut tokens = Vec::new();
    while let Some(token) = stream.next() {
        tokens.push(token.clone());
    }
    tokens
}

/// Analyzers for every field subtype, built on first use.
#[derive(Clone, Default)]
pub struct Analyzers {
    /// Analyzer per subtype.
    by_subtype: HashMap<FieldSubtype, TextAnalyzer>,
}

impl Analyzers {
    /// Analyzes `text` the way fields of `subtype` are indexed.
    pub fn tokens(&mut self, subtype: FieldSubtype, text: &str) -> Vec<Token> {
        let analyzer = self
            .by_subtype
            .entry(subtype)
            .or_insert_with(|| build_analyzer(subtype));
        analyze(analyzer, text)
    }

    /// Token texts of `text`, without offsets.
    pub fn terms(&mut self, subtype: FieldSubtype, text: &str) -> Vec<String> {
        self.tokens(subtype, text)
            .into_iter()
            .map(|t| t.text)
            .collect()
    }
}

/// Splits image names on whitespace and `.`, stripping leading zeros.
///
/// `Castiglione.004r.tif` yields `Castiglione`, `4r` and `tif`, so a page
/// can be addressed as `4r` or `004r`.
#[derive(Debug, Clone, Default)]
pub struct ImageNameTokenizer {
    /// Reusable token buffer.
    token: Token,
}

/// Token stream of [`ImageNameTokenizer`].
#[derive(Debug)]
pub struct ImageNameTokenStream<'a> {
    /// Text being tokenized.
    text: &'a str,
    /// Byte offset where the next token search starts.
    cursor: usize,
    /// Current token.
    token: &'a mut Token,
}

impl Tokenizer for ImageNameTokenizer {
    type TokenStream<'a> = ImageNameTokenStream<'a>;

    fn token_stream<'a>(&'a mut self, text: &'a str) -> Self::TokenStream<'a> {
        self.token.reset();
        ImageNameTokenStream {
            text,
            cursor: 0,
            token: &mut self.token,
        }
    }
}

/// Returns true for characters that separate image name parts.
fn is_separator(c: char) -> bool {
    c == '.' || c.is_whitespace()
}

impl TokenStream for ImageNameTokenStream<'_> {
    fn advance(&mut self) -> bool {
        let rest = &self.text[self.cursor..];
        let Some(skip) = rest.find(|c: char| !is_separator(c)) else {
            self.cursor = self.text.len();
            return false;
        };
        let start = self.cursor + skip;
        let end = self.text[start..]
            .find(is_separator)
            .map_or(self.text.len(), |len| start + len);
        self.cursor = end;

        let piece = &self.text[start..end];
        let stripped = piece.trim_start_matches('0');
        let stripped = if stripped.is_empty() { "0" } else { stripped };

        self.token.text.clear();
        self.token.text.push_str(stripped);
        self.token.offset_from = start;
        self.token.offset_to = end;
        self.token.position = self.token.position.wrapping_add(1);
        true
    }

    fn token(&self) -> &Token {
        self.token
    }

    fn token_mut(&mut self) -> &mut Token {
        self.token
    }
}
