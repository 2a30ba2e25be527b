use super::{ParseError, stream::TokenStream};
use crate::{
    ast::{
        AccessPath, Accessor, AndExpr, CompareOp, ComparisonExpr, HalfExpr, Literal, Operand,
        OrExpr, PrimaryExpr,
    },
    lexer::Token,
};

/// `base ('.' name | '[' int ']')*`
pub(crate) fn parse_access_path(stream: &mut TokenStream<'_>) -> Result<AccessPath, ParseError> {
    let base = stream.expect_ident()?;
    let mut span = base.span;
    let mut accessors = Vec::new();

    loop {
        if stream.eat(&Token::Dot) {
            let name = stream.expect_word()?;
            span = span.to(name.span);
            accessors.push(Accessor::Attribute(name));
        } else if stream.check(&Token::LBracket) {
            let open = stream.expect(&Token::LBracket)?;
            let index = match stream.peek() {
                Some(Token::Int(index)) => *index,
                _ => return Err(stream.error_expected("integer index")),
            };
            stream.advance();
            let close = stream.expect(&Token::RBracket)?;
            span = span.to(close);
            accessors.push(Accessor::Index {
                index,
                span: open.to(close),
            });
        } else {
            break;
        }
    }

    Ok(AccessPath {
        base,
        accessors,
        span,
    })
}

/// `AndExpr ('or' OrExpr)?`
pub(crate) fn parse_or_expr(stream: &mut TokenStream<'_>) -> Result<OrExpr, ParseError> {
    let left = parse_and_expr(stream)?;
    let right = if stream.eat(&Token::Or) {
        Some(Box::new(parse_or_expr(stream)?))
    } else {
        None
    };

    Ok(OrExpr { left, right })
}

/// `PrimaryExpr ('and' AndExpr)?`
fn parse_and_expr(stream: &mut TokenStream<'_>) -> Result<AndExpr, ParseError> {
    let left = parse_primary_expr(stream)?;
    let right = if stream.eat(&Token::And) {
        Some(Box::new(parse_and_expr(stream)?))
    } else {
        None
    };

    Ok(AndExpr { left, right })
}

/// `'(' OrExpr ')' | Operand op Operand`
fn parse_primary_expr(stream: &mut TokenStream<'_>) -> Result<PrimaryExpr, ParseError> {
    if stream.eat(&Token::LParen) {
        let inner = parse_or_expr(stream)?;
        stream.expect(&Token::RParen)?;

        return Ok(PrimaryExpr::Group(Box::new(inner)));
    }

    let start = stream.current_span();
    let left = parse_operand(stream)?;
    let op = parse_compare_op(stream)?;
    let right = parse_operand(stream)?;

    Ok(PrimaryExpr::Comparison(ComparisonExpr {
        left,
        op,
        right,
        span: start.to(stream.previous_span()),
    }))
}

/// `op Operand` with the left side left implicit.
pub(crate) fn parse_half_expr(stream: &mut TokenStream<'_>) -> Result<HalfExpr, ParseError> {
    let start = stream.current_span();
    let op = parse_compare_op(stream)?;
    let right = parse_operand(stream)?;

    Ok(HalfExpr {
        op,
        right,
        span: start.to(stream.previous_span()),
    })
}

fn parse_operand(stream: &mut TokenStream<'_>) -> Result<Operand, ParseError> {
    let span = stream.current_span();
    let value = match stream.peek() {
        Some(Token::Int(v)) => Literal::Int(*v),
        Some(Token::Float(v)) => Literal::Float(*v),
        Some(Token::Str(s)) => Literal::Str(s.clone()),
        Some(Token::True) => Literal::Bool(true),
        Some(Token::False) => Literal::Bool(false),
        Some(Token::Ident(_)) => return parse_access_path(stream).map(Operand::Path),
        _ => return Err(stream.error_expected("operand")),
    };
    stream.advance();

    Ok(Operand::Literal { value, span })
}

fn parse_compare_op(stream: &mut TokenStream<'_>) -> Result<CompareOp, ParseError> {
    let op = match stream.peek() {
        Some(Token::EqEq) => CompareOp::Eq,
        Some(Token::NotEq) => CompareOp::Ne,
        Some(Token::Lt) => CompareOp::Lt,
        Some(Token::LtEq) => CompareOp::Lte,
        Some(Token::Gt) => CompareOp::Gt,
        Some(Token::GtEq) => CompareOp::Gte,
        _ => return Err(stream.error_expected("comparison operator")),
    };
    stream.advance();

    Ok(op)
}
