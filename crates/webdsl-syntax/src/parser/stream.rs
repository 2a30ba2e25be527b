//! Token stream wrapper for the hand-written parser.

use super::ParseError;
use crate::{
    ast::Ident,
    lexer::Token,
    span::{FileId, Span},
};

///
/// TokenStream
/// Lookahead and span tracking over a tokenized file.
///

pub(crate) struct TokenStream<'src> {
    tokens: &'src [(Token, Span)],
    pos: usize,
    eof: Span,
}

impl<'src> TokenStream<'src> {
    pub(crate) fn new(tokens: &'src [(Token, Span)], file: FileId, len: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            eof: Span::new(file, len, len),
        }
    }

    pub(crate) fn peek(&self) -> Option<&'src Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    pub(crate) fn peek_nth(&self, n: usize) -> Option<&'src Token> {
        self.tokens.get(self.pos + n).map(|(token, _)| token)
    }

    pub(crate) fn advance(&mut self) -> Option<&'src (Token, Span)> {
        let entry = self.tokens.get(self.pos);
        if entry.is_some() {
            self.pos += 1;
        }

        entry
    }

    pub(crate) fn check(&self, expected: &Token) -> bool {
        matches!(self.peek(), Some(t) if std::mem::discriminant(t) == std::mem::discriminant(expected))
    }

    /// Consume `expected` when it is next.
    pub(crate) fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, expected: &Token) -> Result<Span, ParseError> {
        if self.check(expected) {
            let span = self.current_span();
            self.pos += 1;
            Ok(span)
        } else {
            Err(self.error_expected(&expected.to_string()))
        }
    }

    /// Identifier, also accepting keyword tokens used as plain names.
    pub(crate) fn expect_ident(&mut self) -> Result<Ident, ParseError> {
        self.expect_name(Token::keyword_text)
    }

    /// Identifier or any reserved word, for positions where a name cannot
    /// end a block: attribute names and `.name` accessors.
    pub(crate) fn expect_word(&mut self) -> Result<Ident, ParseError> {
        self.expect_name(Token::word_text)
    }

    fn expect_name(
        &mut self,
        text_of: fn(&Token) -> Option<&'static str>,
    ) -> Result<Ident, ParseError> {
        let span = self.current_span();
        let name = match self.peek() {
            Some(Token::Ident(name)) => name.clone(),
            Some(token) => match text_of(token) {
                Some(text) => text.to_string(),
                None => return Err(self.error_expected("identifier")),
            },
            None => return Err(self.error_expected("identifier")),
        };
        self.pos += 1;

        Ok(Ident::new(name, span))
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(crate) fn current_span(&self) -> Span {
        self.tokens.get(self.pos).map_or(self.eof, |(_, span)| *span)
    }

    /// Span of the most recently consumed token.
    pub(crate) fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(self.eof, |(_, span)| *span)
    }

    pub(crate) fn error_expected(&self, what: &str) -> ParseError {
        ParseError::expected(what, self.peek(), self.current_span())
    }
}
