//! Annotation resources.

use crate::selector::Selector;

/// Semantic category of an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motivation {
    /// Transcribed marginal note.
    Marginalia,
    /// Reader's mark (dash, bracket, ...).
    Mark,
    /// Reader's symbol (astronomical, alchemical, ...).
    Symbol,
    /// Printed illustration.
    Illustration,
    /// Underlined passage.
    Underline,
    /// Correction of a printing error.
    Errata,
    /// Reader's drawing.
    Drawing,
    /// Reader's numeral.
    Numeral,
}

impl Motivation {
    /// All motivations in a stable order.
    pub const ALL: [Self; 8] = [
        Self::Marginalia,
        Self::Mark,
        Self::Symbol,
        Self::Illustration,
        Self::Underline,
        Self::Errata,
        Self::Drawing,
        Self::Numeral,
    ];

    /// Wire name used in the `motivation` property.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Marginalia => "aor:Marginalia",
            Self::Mark => "aor:Mark",
            Self::Symbol => "aor:Symbol",
            Self::Illustration => "aor:Illustration",
            Self::Underline => "aor:Underline",
            Self::Errata => "aor:Errata",
            Self::Drawing => "aor:Drawing",
            Self::Numeral => "aor:Numeral",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Marginalia => "Marginalia",
            Self::Mark => "Mark",
            Self::Symbol => "Symbol",
            Self::Illustration => "Illustration",
            Self::Underline => "Underline",
            Self::Errata => "Errata",
            Self::Drawing => "Drawing",
            Self::Numeral => "Numeral",
        }
    }

    /// Parses a wire name or a bare label, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        let bare = name.strip_prefix("aor:").unwrap_or(name);
        Self::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(bare))
    }
}

/// Body of an annotation: embedded HTML text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Embedded HTML. Escaped exactly once.
    pub text: String,
    /// Language tag of the text, if known.
    pub language: Option<String>,
    /// Optional selector into the text.
    pub selector: Option<Selector>,
}

impl Source {
    /// Creates a source with no language or selector.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
            selector: None,
        }
    }
}

/// Target of an annotation: a canvas, optionally narrowed by a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Canvas URI.
    pub canvas: String,
    /// Region or outline on the canvas.
    pub selector: Option<Selector>,
}

/// A presentable, searchable annotation resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Stable identifier.
    pub id: String,
    /// Category.
    pub motivation: Motivation,
    /// Default source.
    pub source: Source,
    /// Default target.
    pub target: Target,
    /// Additional sources, such as a translation.
    pub alternate_sources: Vec<Source>,
}

impl Annotation {
    /// Returns true if the annotation targets the given canvas.
    pub fn targets(&self, canvas: &str) -> bool {
        self.target.canvas == canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motivation_round_trips_through_names() {
        for m in Motivation::ALL {
            assert_eq!(Motivation::parse(m.as_str()), Some(m));
            assert_eq!(Motivation::parse(m.label()), Some(m));
        }
        assert_eq!(Motivation::parse("symbol"), Some(Motivation::Symbol));
        assert_eq!(Motivation::parse("unknown"), None);
    }
}
