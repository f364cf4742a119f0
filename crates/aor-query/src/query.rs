//! Query tree.
//!
//! A [`Query`] is either a `(field, term)` leaf or a boolean node over child
//! queries. The constructors keep two invariants: leaves never carry empty
//! terms, and boolean nodes built from a single child collapse to that child.
//! The only node allowed to have no children is the empty top-level AND an
//! empty request translates to.

use std::fmt;

use crate::field::SearchField;

/// Boolean operator of an internal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    /// Every child must match.
    And,
    /// At least one child must match.
    Or,
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => f.write_str("And"),
            Self::Or => f.write_str("Or"),
        }
    }
}

/// A translated search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Match `text` in `field`.
    Term {
        /// Field searched.
        field: SearchField,
        /// Raw term text, analyzed per field subtype at compile time.
        text: String,
    },
    /// Boolean combination of children.
    Bool {
        /// Operator.
        op: BoolOp,
        /// Children, in request order.
        children: Vec<Self>,
    },
}

impl Query {
    /// Creates a leaf, or `None` if the term is blank.
    pub fn term(field: SearchField, text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self::Term {
            field,
            text: text.to_string(),
        })
    }

    /// Creates an AND node over `children`.
    pub fn and(children: Vec<Self>) -> Self {
        Self::Bool {
            op: BoolOp::And,
            children,
        }
    }

    /// Creates an OR node, or `None` if there are no children.
    ///
    /// A single child is returned unwrapped.
    pub fn or(mut children: Vec<Self>) -> Option<Self> {
        match children.len() {
            0 => None,
            1 => children.pop(),
            _ => Some(Self::Bool {
                op: BoolOp::Or,
                children,
            }),
        }
    }

    /// Returns true for a boolean node without children, which matches nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Bool { children, .. } if children.is_empty())
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Term { .. } => 1,
            Self::Bool { children, .. } => children.iter().map(Self::leaf_count).sum(),
        }
    }

    /// Formats the query as an indented tree.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Term { field, text } => writeln!(f, "{prefix}Term({field}:{text:?})"),
            Self::Bool { op, children } => {
                writeln!(f, "{prefix}{op}")?;
                for child in children {
                    child.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_terms_make_no_leaf() {
        assert!(Query::term(SearchField::Symbols, "").is_none());
        assert!(Query::term(SearchField::Symbols, "   ").is_none());
        assert_eq!(
            Query::term(SearchField::Symbols, " sun "),
            Some(Query::Term {
                field: SearchField::Symbols,
                text: "sun".into(),
            })
        );
    }

    #[test]
    fn or_collapses() {
        assert!(Query::or(vec![]).is_none());
        let leaf = Query::term(SearchField::Marks, "dash").unwrap();
        assert_eq!(Query::or(vec![leaf.clone()]), Some(leaf));
    }

    #[test]
    fn empty_and_matches_nothing() {
        let query = Query::and(vec![]);
        assert!(query.is_empty());
        assert_eq!(query.leaf_count(), 0);
    }

    #[test]
    fn display_is_a_tree() {
        let query = Query::and(vec![
            Query::or(vec![
                Query::term(SearchField::Symbols, "sun").unwrap(),
                Query::term(SearchField::Marks, "sun").unwrap(),
            ])
            .unwrap(),
        ]);
        assert_eq!(
            query.to_string(),
            "And\n  Or\n    Term(symbols:\"sun\")\n    Term(marks:\"sun\")\n"
        );
    }
}
