//! Splits a raw query string into search terms.
//!
//! Terms are separated by whitespace. A double-quoted phrase is kept as a
//! single term with the quotes removed.

use std::{iter::Peekable, str::Chars};

use crate::error::RequestError;

/// Splits `input` into terms.
pub fn split_terms(input: &str) -> Result<Vec<String>, RequestError> {
    TermLexer::new(input).split()
}

/// Single-pass term scanner.
struct TermLexer<'a> {
    /// Original input, for error reporting.
    input: &'a str,
    /// Characters with one-character lookahead.
    chars: Peekable<Chars<'a>>,
}

impl<'a> TermLexer<'a> {
    /// Creates a lexer over `input`.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
        }
    }

    /// Consumes the input and returns the terms.
    fn split(mut self) -> Result<Vec<String>, RequestError> {
        let mut terms = Vec::new();
        loop {
            self.skip_whitespace();
            let term = match self.chars.peek() {
                None => break,
                Some('"') => self.read_phrase()?,
                Some(_) => self.read_word(),
            };
            if !term.is_empty() {
                terms.push(term);
            }
        }
        Ok(terms)
    }

    /// Reads a quoted phrase, returning its trimmed content.
    fn read_phrase(&mut self) -> Result<String, RequestError> {
        self.chars.next();
        let mut content = String::new();
        loop {
            match self.chars.next() {
                Some('"') => return Ok(content.trim().to_string()),
                Some(ch) => content.push(ch),
                None => return Err(RequestError::UnclosedQuote(self.input.to_string())),
            }
        }
    }

    /// Reads a bare word up to whitespace or a quote.
    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || ch == '"' {
                break;
            }
            word.push(ch);
            self.chars.next();
        }
        word
    }

    /// Skips whitespace.
    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }
}
