pub mod ast;
pub mod lexer;
pub mod parser;
pub mod span;

pub use parser::{ParseError, parse_condition, parse_file};
pub use span::{FileId, Location, SourceMap, Span};
