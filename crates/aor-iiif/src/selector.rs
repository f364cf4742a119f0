//! Selectors describing where on a page an annotation applies.
//!
//! A [`Selector`] is one of three variants. Each variant exposes the same three
//! capabilities (a JSON-LD context, a type name and a rendered content string),
//! so consumers never need to match on the variant to serialize it.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::IiifError;

/// Context for the Open Annotation selectors (fragment and text quote).
pub const OA_CONTEXT: &str = "http://www.w3.org/ns/oa.jsonld";

/// Context for the IIIF SVG selector extension.
pub const SVG_CONTEXT: &str = "http://iiif.io/api/annex/openannotation/context.json";

/// SVG namespace used in rendered shape markup.
const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// A rectangle on a page image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl Rect {
    /// Creates a rectangle.
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns the smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.w).max(other.x + other.w);
        let bottom = (self.y + self.h).max(other.y + other.h);
        Self::new(x, y, right - x, bottom - y)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.w, self.h)
    }
}

/// A point on a page image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: u32,
    /// Vertical coordinate.
    pub y: u32,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// SVG shape kinds an outline can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvgShape {
    /// Open path through the points.
    Path,
    /// Rectangle spanned by two corner points.
    Rect,
    /// Circle given by its center and a point on the circumference.
    Circle,
    /// Ellipse given by its center and a corner of its bounding box.
    Ellipse,
    /// Open polyline.
    Polyline,
    /// Closed polygon.
    Polygon,
    /// Group of point markers.
    Group,
}

impl SvgShape {
    /// Parses a shape name as it appears in archive records.
    pub fn parse(name: &str) -> Result<Self, IiifError> {
        match name.to_ascii_lowercase().as_str() {
            "path" => Ok(Self::Path),
            "rect" => Ok(Self::Rect),
            "circle" => Ok(Self::Circle),
            "ellipse" => Ok(Self::Ellipse),
            "polyline" => Ok(Self::Polyline),
            "polygon" => Ok(Self::Polygon),
            "group" | "g" => Ok(Self::Group),
            other => Err(IiifError::UnknownShape(other.to_string())),
        }
    }

    /// Minimum number of points needed to draw the shape.
    fn min_points(self) -> usize {
        match self {
            Self::Group => 1,
            Self::Path | Self::Rect | Self::Circle | Self::Ellipse | Self::Polyline => 2,
            Self::Polygon => 3,
        }
    }

    /// Name of the shape as used in error messages.
    fn name(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Polyline => "polyline",
            Self::Polygon => "polygon",
            Self::Group => "group",
        }
    }
}

/// An SVG outline: a shape and its ordered points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgSelector {
    /// Shape kind.
    shape: SvgShape,
    /// Ordered points defining the shape.
    points: Vec<Point>,
}

impl SvgSelector {
    /// Creates an outline, checking that the shape has enough points.
    pub fn new(shape: SvgShape, points: Vec<Point>) -> Result<Self, IiifError> {
        if points.len() < shape.min_points() {
            return Err(IiifError::TooFewPoints {
                shape: shape.name(),
                required: shape.min_points(),
                found: points.len(),
            });
        }
        Ok(Self { shape, points })
    }

    /// Returns the shape kind.
    pub fn shape(&self) -> SvgShape {
        self.shape
    }

    /// Returns the points.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Renders the shape as a standalone SVG document.
    pub fn markup(&self) -> String {
        let pts = &self.points;
        let inner = match self.shape {
            SvgShape::Path => {
                let mut d = format!("M{},{}", pts[0].x, pts[0].y);
                for p in &pts[1..] {
                    d.push_str(&format!(" L{},{}", p.x, p.y));
                }
                format!("<path d=\"{d}\"/>")
            }
            SvgShape::Rect => {
                let (a, b) = (pts[0], pts[1]);
                format!(
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/>",
                    a.x.min(b.x),
                    a.y.min(b.y),
                    a.x.abs_diff(b.x),
                    a.y.abs_diff(b.y)
                )
            }
            SvgShape::Circle => {
                let (c, edge) = (pts[0], pts[1]);
                let dx = f64::from(c.x.abs_diff(edge.x));
                let dy = f64::from(c.y.abs_diff(edge.y));
                let r = dx.hypot(dy).round();
                format!("<circle cx=\"{}\" cy=\"{}\" r=\"{r}\"/>", c.x, c.y)
            }
            SvgShape::Ellipse => {
                let (c, corner) = (pts[0], pts[1]);
                format!(
                    "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\"/>",
                    c.x,
                    c.y,
                    c.x.abs_diff(corner.x),
                    c.y.abs_diff(corner.y)
                )
            }
            SvgShape::Polyline => format!("<polyline points=\"{}\"/>", point_list(pts)),
            SvgShape::Polygon => format!("<polygon points=\"{}\"/>", point_list(pts)),
            SvgShape::Group => {
                let markers: String = pts
                    .iter()
                    .map(|p| format!("<circle cx=\"{}\" cy=\"{}\" r=\"1\"/>", p.x, p.y))
                    .collect();
                format!("<g>{markers}</g>")
            }
        };
        format!("<svg xmlns=\"{SVG_NAMESPACE}\">{inner}</svg>")
    }
}

/// Formats points as an SVG `points` attribute value.
fn point_list(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A quoted span of text with optional surrounding context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuote {
    /// Text immediately preceding the quote.
    pub prefix: Option<String>,
    /// The quoted text.
    pub exact: String,
    /// Text immediately following the quote.
    pub suffix: Option<String>,
}

/// Where an annotation's source or target applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Rectangular region of an image.
    Fragment(Rect),
    /// SVG outline on an image.
    Svg(SvgSelector),
    /// Quoted text with context.
    TextQuote(TextQuote),
}

impl Selector {
    /// JSON-LD context the selector type is defined in.
    pub fn context(&self) -> &'static str {
        match self {
            Self::Fragment(_) | Self::TextQuote(_) => OA_CONTEXT,
            Self::Svg(_) => SVG_CONTEXT,
        }
    }

    /// Selector type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Fragment(_) => "oa:FragmentSelector",
            Self::Svg(_) => "oa:SvgSelector",
            Self::TextQuote(_) => "oa:TextQuoteSelector",
        }
    }

    /// Rendered selector content.
    pub fn content(&self) -> String {
        match self {
            Self::Fragment(rect) => rect.to_string(),
            Self::Svg(svg) => svg.markup(),
            Self::TextQuote(quote) => format!(
                "{}{}{}",
                quote.prefix.as_deref().unwrap_or(""),
                quote.exact,
                quote.suffix.as_deref().unwrap_or("")
            ),
        }
    }
}

/// Wire shape shared by all selector variants.
#[derive(Serialize)]
struct SelectorJson {
    /// Context namespace.
    #[serde(rename = "@context")]
    context: &'static str,
    /// Type name.
    #[serde(rename = "@type")]
    kind: &'static str,
    /// Rendered content.
    value: String,
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SelectorJson {
            context: self.context(),
            kind: self.type_name(),
            value: self.content(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn svg(shape: SvgShape, points: &[(u32, u32)]) -> SvgSelector {
        let points = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
        SvgSelector::new(shape, points).unwrap()
    }

    #[test]
    fn fragment_content_is_four_integers() {
        let selector = Selector::Fragment(Rect::new(10, 20, 300, 40));
        assert_eq!(selector.content(), "10,20,300,40");
        assert_eq!(selector.type_name(), "oa:FragmentSelector");
        assert_eq!(selector.context(), OA_CONTEXT);
    }

    #[test]
    fn text_quote_concatenates_context() {
        let selector = Selector::TextQuote(TextQuote {
            prefix: Some("before ".into()),
            exact: "quoted".into(),
            suffix: Some(" after".into()),
        });
        assert_eq!(selector.content(), "before quoted after");

        let bare = Selector::TextQuote(TextQuote {
            prefix: None,
            exact: "quoted".into(),
            suffix: None,
        });
        assert_eq!(bare.content(), "quoted");
    }

    #[test]
    fn every_shape_renders_distinct_markup() {
        let shapes = [
            svg(SvgShape::Path, &[(0, 0), (10, 10)]),
            svg(SvgShape::Rect, &[(0, 0), (10, 10)]),
            svg(SvgShape::Circle, &[(0, 0), (10, 10)]),
            svg(SvgShape::Ellipse, &[(0, 0), (10, 10)]),
            svg(SvgShape::Polyline, &[(0, 0), (10, 10)]),
            svg(SvgShape::Polygon, &[(0, 0), (10, 10), (0, 10)]),
            svg(SvgShape::Group, &[(0, 0), (10, 10)]),
        ];
        let rendered: Vec<String> = shapes.iter().map(SvgSelector::markup).collect();
        for (i, a) in rendered.iter().enumerate() {
            assert!(a.starts_with("<svg xmlns="), "{a}");
            for b in &rendered[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn shape_markup_details() {
        assert_eq!(
            svg(SvgShape::Rect, &[(30, 40), (10, 10)]).markup(),
            "<svg xmlns=\"http://www.w3.org/2000/svg\"><rect x=\"10\" y=\"10\" width=\"20\" height=\"30\"/></svg>"
        );
        assert!(
            svg(SvgShape::Circle, &[(0, 0), (3, 4)])
                .markup()
                .contains("r=\"5\"")
        );
        assert!(
            svg(SvgShape::Path, &[(1, 2), (3, 4), (5, 6)])
                .markup()
                .contains("d=\"M1,2 L3,4 L5,6\"")
        );
        assert!(
            svg(SvgShape::Polygon, &[(1, 2), (3, 4), (5, 6)])
                .markup()
                .contains("points=\"1,2 3,4 5,6\"")
        );
    }

    #[test]
    fn too_few_points_rejected() {
        let err = SvgSelector::new(SvgShape::Polygon, vec![Point::new(0, 0), Point::new(1, 1)])
            .unwrap_err();
        assert!(err.to_string().contains("polygon"));
    }

    #[test]
    fn unknown_shape_rejected() {
        assert!(SvgShape::parse("star").is_err());
        assert_eq!(SvgShape::parse("Polygon").unwrap(), SvgShape::Polygon);
    }

    #[test]
    fn rect_union_covers_both() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 5, 10, 10);
        assert_eq!(a.union(&b), Rect::new(0, 0, 30, 15));
    }

    #[test]
    fn serializes_uniformly() {
        let selector = Selector::Fragment(Rect::new(1, 2, 3, 4));
        let value = serde_json::to_value(&selector).unwrap();
        assert_eq!(
            value,
            json!({
                "@context": OA_CONTEXT,
                "@type": "oa:FragmentSelector",
                "value": "1,2,3,4"
            })
        );
    }
}
