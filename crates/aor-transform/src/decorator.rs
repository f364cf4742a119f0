//! External resource decoration.
//!
//! The decorator turns plain annotation text into HTML in which known names
//! are linked to external resources. Lookup tables are consulted in a fixed
//! priority order: places, people, per-book references, dictionary. The first
//! table that claims a span of words wins, and claimed spans never overlap.
//! Matching is done on whole words only, so `RomeAthens` links nothing even
//! when `Rome` is a known place.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
};

use crate::{
    error::TransformError,
    escape::{decode_entities, escape_html},
};

/// Term to URI lookup table.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    /// Normalized term to URI.
    entries: HashMap<String, String>,
    /// Number of words in the longest term.
    max_words: usize,
}

impl LookupTable {
    /// Builds a table from `(term, uri)` pairs.
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut table = Self::default();
        for (term, uri) in entries {
            let key = normalize_term(term.as_ref());
            if key.is_empty() {
                continue;
            }
            table.max_words = table.max_words.max(word_spans(&key).len());
            table.entries.insert(key, uri.into());
        }
        table
    }

    /// Builds a table from a book's reference sheet.
    pub fn from_references(references: &BTreeMap<String, String>) -> Self {
        Self::new(references.iter().map(|(k, v)| (k, v.as_str())))
    }

    /// Loads a JSON object `{"term": "uri", ...}`.
    pub fn load(path: &Path) -> Result<Self, TransformError> {
        let contents = fs::read_to_string(path).map_err(|source| TransformError::ReadTable {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: BTreeMap<String, String> =
            serde_json::from_str(&contents).map_err(|source| TransformError::ParseTable {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(entries))
    }

    /// Looks up a term, ignoring case and whitespace differences.
    pub fn lookup(&self, term: &str) -> Option<&str> {
        self.entries.get(&normalize_term(term)).map(String::as_str)
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no terms.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lowercases a term and collapses whitespace.
fn normalize_term(term: &str) -> String {
    term.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The shared lookup tables.
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    /// Gazetteer.
    pub places: LookupTable,
    /// Person registry.
    pub people: LookupTable,
    /// Dictionary.
    pub dictionary: LookupTable,
}

impl LookupTables {
    /// Loads each table that has a path; missing paths give empty tables.
    pub fn load(
        places: Option<&Path>,
        people: Option<&Path>,
        dictionary: Option<&Path>,
    ) -> Result<Self, TransformError> {
        let load = |path: Option<&Path>| {
            path.map_or_else(|| Ok(LookupTable::default()), LookupTable::load)
        };
        Ok(Self {
            places: load(places)?,
            people: load(people)?,
            dictionary: load(dictionary)?,
        })
    }
}

/// A linked span of the decoded text.
#[derive(Debug)]
struct Link<'a> {
    /// Byte offset of the first character.
    start: usize,
    /// Byte offset past the last character.
    end: usize,
    /// Target URI.
    uri: &'a str,
}

/// Links known names in annotation text.
#[derive(Debug, Clone, Copy)]
pub struct Decorator<'a> {
    /// Shared tables.
    tables: &'a LookupTables,
}

impl<'a> Decorator<'a> {
    /// Creates a decorator over `tables`.
    pub fn new(tables: &'a LookupTables) -> Self {
        Self { tables }
    }

    /// Decodes, links and escapes `text`.
    ///
    /// `references` is the per-book table, consulted after places and people.
    pub fn decorate(&self, text: &str, references: &LookupTable) -> String {
        let decoded = decode_entities(text);
        let words = word_spans(&decoded);
        let mut claimed = vec![false; words.len()];
        let mut links = Vec::new();

        let tables = [
            &self.tables.places,
            &self.tables.people,
            references,
            &self.tables.dictionary,
        ];
        for table in tables.into_iter().filter(|t| !t.is_empty()) {
            claim(table, &decoded, &words, &mut claimed, &mut links);
        }
        links.sort_by_key(|l| l.start);

        let mut out = String::with_capacity(decoded.len());
        let mut cursor = 0;
        for link in links {
            out.push_str(&escape_html(&decoded[cursor..link.start]));
            out.push_str(&format!(
                "<a href=\"{}\">{}</a>",
                escape_html(link.uri),
                escape_html(&decoded[link.start..link.end])
            ));
            cursor = link.end;
        }
        out.push_str(&escape_html(&decoded[cursor..]));
        out
    }
}

/// Claims every unclaimed word run `table` knows, longest first.
fn claim<'t>(
    table: &'t LookupTable,
    text: &str,
    words: &[(usize, usize)],
    claimed: &mut [bool],
    links: &mut Vec<Link<'t>>,
) {
    let mut i = 0;
    while i < words.len() {
        let longest = table.max_words.min(words.len() - i);
        let found = (1..=longest).rev().find_map(|n| {
            if claimed[i..i + n].iter().any(|&c| c) {
                return None;
            }
            let (start, end) = (words[i].0, words[i + n - 1].1);
            table
                .lookup(&text[start..end])
                .map(|uri| (n, Link { start, end, uri }))
        });
        match found {
            Some((n, link)) => {
                claimed[i..i + n].fill(true);
                links.push(link);
                i += n;
            }
            None => i += 1,
        }
    }
}

/// Byte spans of the alphanumeric word runs in `text`.
fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (idx, ch) in text.char_indices() {
        match (ch.is_alphanumeric(), start) {
            (true, None) => start = Some(idx),
            (false, Some(s)) => {
                spans.push((s, idx));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> LookupTables {
        LookupTables {
            places: LookupTable::new([
                ("Rome", "http://places/rome"),
                ("Athens", "http://places/athens"),
                ("Castel Sant Angelo", "http://places/castel"),
            ]),
            people: LookupTable::new([
                ("Cicero", "http://people/cicero"),
                ("Rome", "http://people/x"),
            ]),
            dictionary: LookupTable::new([("citizens", "http://dict/citizen")]),
        }
    }

    #[test]
    fn links_known_names() {
        let tables = tables();
        let out = Decorator::new(&tables).decorate("Cicero in Rome", &LookupTable::default());
        assert_eq!(
            out,
            "<a href=\"http://people/cicero\">Cicero</a> in <a href=\"http://places/rome\">Rome</a>"
        );
    }

    #[test]
    fn whole_words_only() {
        let tables = tables();
        let out = Decorator::new(&tables).decorate("RomeAthens", &LookupTable::default());
        assert_eq!(out, "RomeAthens");
        assert!(!out.contains("<a"));
    }

    #[test]
    fn earlier_tables_win() {
        let tables = tables();
        let out = Decorator::new(&tables).decorate("Rome", &LookupTable::default());
        assert!(out.contains("http://places/rome"));
        assert!(!out.contains("http://people/x"));
    }

    #[test]
    fn references_rank_before_dictionary() {
        let tables = tables();
        let refs = LookupTable::new([("citizens", "http://book/ref")]);
        let out = Decorator::new(&tables).decorate("the citizens.", &refs);
        assert_eq!(out, "the <a href=\"http://book/ref\">citizens</a>.");
    }

    #[test]
    fn longest_match_first() {
        let tables = tables();
        let out =
            Decorator::new(&tables).decorate("at  castel sant angelo", &LookupTable::default());
        assert_eq!(
            out,
            "at  <a href=\"http://places/castel\">castel sant angelo</a>"
        );
    }

    #[test]
    fn never_double_escapes() {
        let tables = tables();
        let out = Decorator::new(&tables).decorate("Rome &amp; <Athens>", &LookupTable::default());
        assert!(!out.contains("&amp;amp;"));
        assert_eq!(
            out,
            "<a href=\"http://places/rome\">Rome</a> &amp; &lt;<a href=\"http://places/athens\">Athens</a>&gt;"
        );
    }

    #[test]
    fn empty_tables_only_escape() {
        let tables = LookupTables::default();
        let out = Decorator::new(&tables).decorate("a < b", &LookupTable::default());
        assert_eq!(out, "a &lt; b");
    }

    #[test]
    fn loads_tables_from_json() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("places.json");
        fs::write(&path, r#"{"Rome": "http://places/rome"}"#).unwrap();
        let table = LookupTable::load(&path).unwrap();
        assert_eq!(table.lookup("ROME"), Some("http://places/rome"));
        assert_eq!(table.len(), 1);

        fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(
            LookupTable::load(&path),
            Err(TransformError::ParseTable { .. })
        ));
    }
}
