//! Identifier construction for presentation resources.

/// Builds stable URIs for canvases, annotations, lists and search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationUris {
    /// Base URI without a trailing slash.
    base: String,
}

impl PresentationUris {
    /// Creates a URI builder rooted at `base`.
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// Returns the base URI.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Prefix shared by every resource of a book.
    fn book(&self, collection: &str, book: &str) -> String {
        format!("{}/{collection}.{book}", self.base)
    }

    /// Canvas URI for a page.
    pub fn canvas(&self, collection: &str, book: &str, page: &str) -> String {
        format!("{}/canvas/{page}", self.book(collection, book))
    }

    /// Annotation URI for the record with sequence `seq` on `image`.
    pub fn annotation(&self, collection: &str, book: &str, image: &str, seq: &str) -> String {
        format!("{}/annotation/{image}_{seq}", self.book(collection, book))
    }

    /// Annotation list URI for a page.
    pub fn list(&self, collection: &str, book: &str, page: &str) -> String {
        format!("{}/list/{page}", self.book(collection, book))
    }

    /// Search result URI for a scope and an encoded query string (without `?`).
    pub fn search(&self, scope: &str, query_string: &str) -> String {
        if query_string.is_empty() {
            format!("{}/{scope}/search", self.base)
        } else {
            format!("{}/{scope}/search?{query_string}", self.base)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let uris = PresentationUris::new("http://example.org/iiif/");
        assert_eq!(uris.base(), "http://example.org/iiif");
        assert_eq!(
            uris.canvas("demo", "Book", "1r"),
            "http://example.org/iiif/demo.Book/canvas/1r"
        );
    }

    #[test]
    fn annotation_ids_embed_image_and_sequence() {
        let uris = PresentationUris::new("http://example.org/iiif");
        assert_eq!(
            uris.annotation("demo", "Book", "Book.001r.tif", "3"),
            "http://example.org/iiif/demo.Book/annotation/Book.001r.tif_3"
        );
    }

    #[test]
    fn search_uri_with_and_without_query() {
        let uris = PresentationUris::new("http://example.org/iiif");
        assert_eq!(
            uris.search("demo.Book", "q=sun"),
            "http://example.org/iiif/demo.Book/search?q=sun"
        );
        assert_eq!(
            uris.search("demo", ""),
            "http://example.org/iiif/demo/search"
        );
    }
}
