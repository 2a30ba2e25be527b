use crate::{lexer::Token, span::Span};
use thiserror::Error as ThisError;

///
/// ParseError
///

#[derive(Clone, Debug, ThisError)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    pub(crate) fn expected(what: &str, found: Option<&Token>, span: Span) -> Self {
        let message = match found {
            Some(token) => format!("expected {what}, found {token}"),
            None => format!("expected {what}, found end of file"),
        };

        Self::new(message, span)
    }
}
