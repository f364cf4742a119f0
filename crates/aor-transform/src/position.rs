//! Named page positions and their regions.
//!
//! Records locate themselves with coarse position tags rather than pixel
//! coordinates. Each tag maps to a fixed fraction of the page: the head and
//! tail bands are an eighth of the height, the margins a fifth of the width.

use aor_iiif::Rect;

/// A coarse position on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Band across the top.
    Head,
    /// Band across the bottom.
    Tail,
    /// Left margin between head and tail.
    LeftMargin,
    /// Right margin between head and tail.
    RightMargin,
    /// Text block between the margins.
    Intext,
    /// Whole page.
    FullPage,
}

impl Position {
    /// Parses a tag, ignoring case and `-`/`_`/space differences.
    pub fn parse(tag: &str) -> Option<Self> {
        let tag: String = tag
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match tag.as_str() {
            "head" | "top" => Some(Self::Head),
            "tail" | "bottom" => Some(Self::Tail),
            "leftmargin" => Some(Self::LeftMargin),
            "rightmargin" => Some(Self::RightMargin),
            "intext" => Some(Self::Intext),
            "fullpage" => Some(Self::FullPage),
            _ => None,
        }
    }

    /// Region of a `width` x `height` page this position covers.
    pub fn region(self, width: u32, height: u32) -> Rect {
        let band = height / 8;
        let margin = width / 5;
        let middle = height.saturating_sub(2 * band);
        match self {
            Self::Head => Rect::new(0, 0, width, band),
            Self::Tail => Rect::new(0, height - band, width, band),
            Self::LeftMargin => Rect::new(0, band, margin, middle),
            Self::RightMargin => Rect::new(width - margin, band, margin, middle),
            Self::Intext => Rect::new(margin, band, width.saturating_sub(2 * margin), middle),
            Self::FullPage => Rect::new(0, 0, width, height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_on_a_1000_by_1600_page() {
        assert_eq!(Position::Head.region(1000, 1600), Rect::new(0, 0, 1000, 200));
        assert_eq!(Position::Tail.region(1000, 1600), Rect::new(0, 1400, 1000, 200));
        assert_eq!(Position::LeftMargin.region(1000, 1600), Rect::new(0, 200, 200, 1200));
        assert_eq!(Position::RightMargin.region(1000, 1600), Rect::new(800, 200, 200, 1200));
        assert_eq!(Position::Intext.region(1000, 1600), Rect::new(200, 200, 600, 1200));
        assert_eq!(Position::FullPage.region(1000, 1600), Rect::new(0, 0, 1000, 1600));
    }

    #[test]
    fn tags_are_lenient() {
        assert_eq!(Position::parse("left_margin"), Some(Position::LeftMargin));
        assert_eq!(Position::parse("Left-Margin"), Some(Position::LeftMargin));
        assert_eq!(Position::parse(" HEAD "), Some(Position::Head));
        assert_eq!(Position::parse("full page"), Some(Position::FullPage));
        assert_eq!(Position::parse("sideways"), None);
    }
}
