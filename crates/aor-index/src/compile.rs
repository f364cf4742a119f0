//! Query compiler.
//!
//! Compiles a translated [`Query`] tree into a Tantivy query. A leaf
//! `(field, term)` becomes a disjunction over the field's physical subtype
//! fields; within each one the term is analyzed with that subtype's analyzer
//! and compiled to a term query, or to a phrase query when it analyzes into
//! several tokens. A term that analyzes into nothing is dropped.
//!
//! The search scope adds mandatory identifier clauses for the collection,
//! the book and the page. A page is matched by its id or its full image name,
//! never by a single token of the image name.

use aor_archive::normalize_page_id;
use aor_query::{BoolOp, FieldSubtype, Query, SearchField, SearchScope};
use tantivy::{
    Term,
    query::{BooleanQuery, EmptyQuery, Occur, PhraseQuery, Query as TantivyQuery, TermQuery},
    schema::{Field, IndexRecordOption},
};

use crate::{analyzer::Analyzers, schema::IndexSchema};

/// Compiles query trees into Tantivy queries.
pub struct QueryCompiler<'a> {
    /// Index schema for field references.
    schema: &'a IndexSchema,
    /// Analyzers for tokenizing query terms.
    analyzers: &'a mut Analyzers,
}

impl<'a> QueryCompiler<'a> {
    /// Creates a new query compiler.
    pub fn new(schema: &'a IndexSchema, analyzers: &'a mut Analyzers) -> Self {
        Self { schema, analyzers }
    }

    /// Compiles `query` restricted to `scope`.
    ///
    /// A query with nothing to match, such as the empty AND of a request
    /// without terms, compiles to a query matching no documents.
    pub fn compile(&mut self, query: &Query, scope: &SearchScope) -> Box<dyn TantivyQuery> {
        let content = self
            .compile_node(query)
            .unwrap_or_else(|| Box::new(EmptyQuery));

        let mut clauses = vec![(Occur::Must, content)];
        let restrictions = [
            (SearchField::CollectionId, Some(scope.collection.as_str())),
            (SearchField::BookId, scope.book.as_deref()),
        ];
        for (field, value) in restrictions {
            if let Some(value) = value {
                let clause = self
                    .compile_term(field, value)
                    .unwrap_or_else(|| Box::new(EmptyQuery));
                clauses.push((Occur::Must, clause));
            }
        }
        if let Some(page) = scope.page.as_deref() {
            let term = Term::from_field_text(self.schema.page_key, normalize_page_id(page));
            clauses.push((
                Occur::Must,
                Box::new(TermQuery::new(term, IndexRecordOption::Basic)),
            ));
        }

        Box::new(BooleanQuery::new(clauses))
    }

    /// Compiles one node, returning `None` when it can match nothing.
    fn compile_node(&mut self, query: &Query) -> Option<Box<dyn TantivyQuery>> {
        match query {
            Query::Term { field, text } => self.compile_term(*field, text),
            Query::Bool { op, children } => {
                let occur = match op {
                    BoolOp::And => Occur::Must,
                    BoolOp::Or => Occur::Should,
                };
                let clauses: Vec<(Occur, Box<dyn TantivyQuery>)> = children
                    .iter()
                    .filter_map(|child| self.compile_node(child))
                    .map(|q| (occur, q))
                    .collect();
                if clauses.is_empty() {
                    None
                } else {
                    Some(Box::new(BooleanQuery::new(clauses)))
                }
            }
        }
    }

    /// Compiles a term against every subtype of `field`.
    fn compile_term(&mut self, field: SearchField, text: &str) -> Option<Box<dyn TantivyQuery>> {
        let mut clauses: Vec<(Occur, Box<dyn TantivyQuery>)> = Vec::new();
        for &(subtype, handle) in self.schema.physical(field) {
            if let Some(query) = self.compile_subtype(subtype, handle, text) {
                clauses.push((Occur::Should, query));
            }
        }
        match clauses.len() {
            0 => None,
            1 => clauses.pop().map(|(_, q)| q),
            _ => Some(Box::new(BooleanQuery::new(clauses))),
        }
    }

    /// Compiles a term against one physical field.
    fn compile_subtype(
        &mut self,
        subtype: FieldSubtype,
        field: Field,
        text: &str,
    ) -> Option<Box<dyn TantivyQuery>> {
        let record_option = match subtype {
            FieldSubtype::Identifier => IndexRecordOption::Basic,
            _ => IndexRecordOption::WithFreqs,
        };
        let mut terms: Vec<Term> = self
            .analyzers
            .terms(subtype, text)
            .iter()
            .map(|t| Term::from_field_text(field, t))
            .collect();
        if terms.len() > 1 {
            return Some(Box::new(PhraseQuery::new(terms)));
        }
        let term = terms.pop()?;
        Some(Box::new(TermQuery::new(term, record_option)))
    }
}
