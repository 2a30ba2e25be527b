//! Hand-written recursive descent parser for WebDSL files.
//!
//! - `stream`: token stream with lookahead
//! - `decl`: imports, declarations, bodies, values and screen elements
//! - `expr`: access paths and boolean condition expressions

mod decl;
mod error;
mod expr;
mod stream;

#[cfg(test)]
mod tests;

pub use error::ParseError;

use crate::{
    ast::{File, OrExpr},
    lexer::tokenize,
    span::FileId,
};
use stream::TokenStream;

/// Parse one source file into its syntax tree.
pub fn parse_file(source: &str, file: FileId) -> Result<File, ParseError> {
    let tokens = tokenize(source, file)?;
    let mut stream = TokenStream::new(&tokens, file, source.len());

    decl::parse_file(&mut stream, file)
}

/// Parse a standalone boolean condition (`a.x > 5 and b.y == 2`).
pub fn parse_condition(source: &str, file: FileId) -> Result<OrExpr, ParseError> {
    let tokens = tokenize(source, file)?;
    let mut stream = TokenStream::new(&tokens, file, source.len());
    let expr = expr::parse_or_expr(&mut stream)?;

    if stream.at_end() {
        Ok(expr)
    } else {
        Err(stream.error_expected("end of condition"))
    }
}
