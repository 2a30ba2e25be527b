//! Tokenization of WebDSL source text using logos.
//!
//! Whitespace and comments (`//` and `#` to end of line) are skipped. Every
//! produced token carries the byte span it was read from.

use crate::{
    parser::ParseError,
    span::{FileId, Span},
};
use logos::Logos;
use std::fmt;

///
/// Token
///

#[derive(Logos, Clone, Debug, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    // declaration keywords
    #[token("API")]
    Api,
    #[token("Broker")]
    Broker,
    #[token("Component")]
    Component,
    #[token("Database")]
    Database,
    #[token("Endpoint")]
    Endpoint,
    #[token("Entity")]
    Entity,
    #[token("Query")]
    Query,
    #[token("RESTApi")]
    RestApi,
    #[token("Role")]
    Role,
    #[token("Screen")]
    Screen,
    #[token("Topic")]
    Topic,
    #[token("User")]
    User,
    #[token("Webpage")]
    Webpage,
    #[token("Websocket")]
    Websocket,

    // screen elements
    #[token("Row")]
    Row,
    #[token("Column")]
    Column,
    #[token("Condition")]
    Condition,
    #[token("Repetition")]
    Repetition,

    #[token("import")]
    Import,
    #[token("end")]
    End,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // punctuation
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("-")]
    Dash,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    // comparison operators (`<` and `>` double as kind brackets)
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    // literals
    #[regex(r"-?[0-9]+\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),
    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),
    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    Str(String),
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

impl Token {
    /// Text of a keyword token when it appears in a position that accepts
    /// a plain identifier (property keys, kind parameters).
    #[must_use]
    pub const fn keyword_text(&self) -> Option<&'static str> {
        let text = match self {
            Self::Api => "API",
            Self::Broker => "Broker",
            Self::Component => "Component",
            Self::Database => "Database",
            Self::Endpoint => "Endpoint",
            Self::Entity => "Entity",
            Self::Query => "Query",
            Self::RestApi => "RESTApi",
            Self::Role => "Role",
            Self::Screen => "Screen",
            Self::Topic => "Topic",
            Self::User => "User",
            Self::Webpage => "Webpage",
            Self::Websocket => "Websocket",
            Self::Row => "Row",
            Self::Column => "Column",
            Self::Condition => "Condition",
            Self::Repetition => "Repetition",
            _ => return None,
        };

        Some(text)
    }

    /// Source text of any keyword or reserved word.
    #[must_use]
    pub const fn word_text(&self) -> Option<&'static str> {
        let text = match self {
            Self::Import => "import",
            Self::End => "end",
            Self::And => "and",
            Self::Or => "or",
            Self::True => "true",
            Self::False => "false",
            _ => return self.keyword_text(),
        };

        Some(text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(text) = self.keyword_text() {
            return write!(f, "`{text}`");
        }

        match self {
            Self::Import => f.write_str("`import`"),
            Self::End => f.write_str("`end`"),
            Self::And => f.write_str("`and`"),
            Self::Or => f.write_str("`or`"),
            Self::True => f.write_str("`true`"),
            Self::False => f.write_str("`false`"),
            Self::Colon => f.write_str("`:`"),
            Self::Comma => f.write_str("`,`"),
            Self::Dot => f.write_str("`.`"),
            Self::Dash => f.write_str("`-`"),
            Self::LBracket => f.write_str("`[`"),
            Self::RBracket => f.write_str("`]`"),
            Self::LBrace => f.write_str("`{`"),
            Self::RBrace => f.write_str("`}`"),
            Self::LParen => f.write_str("`(`"),
            Self::RParen => f.write_str("`)`"),
            Self::EqEq => f.write_str("`==`"),
            Self::NotEq => f.write_str("`!=`"),
            Self::LtEq => f.write_str("`<=`"),
            Self::GtEq => f.write_str("`>=`"),
            Self::Lt => f.write_str("`<`"),
            Self::Gt => f.write_str("`>`"),
            Self::Float(v) => write!(f, "float `{v}`"),
            Self::Int(v) => write!(f, "integer `{v}`"),
            Self::Str(s) => write!(f, "string {s:?}"),
            Self::Ident(s) => write!(f, "identifier `{s}`"),
            _ => f.write_str("keyword"),
        }
    }
}

// unescape
// strips the surrounding quotes and resolves backslash escapes
fn unescape(slice: &str) -> Option<String> {
    let inner = slice.get(1..slice.len() - 1)?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            other => out.push(other),
        }
    }

    Some(out)
}

/// Tokenize one file, attaching spans that point back into it.
pub fn tokenize(source: &str, file: FileId) -> Result<Vec<(Token, Span)>, ParseError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let span = Span::new(file, range.start, range.end);

        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                return Err(ParseError::new(
                    format!("unrecognised input `{}`", lexer.slice()),
                    span,
                ));
            }
        }
    }

    Ok(tokens)
}
