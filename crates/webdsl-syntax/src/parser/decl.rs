use super::{
    ParseError,
    expr::{parse_access_path, parse_half_expr, parse_or_expr},
    stream::TokenStream,
};
use crate::{
    ast::{
        AttributeDecl, Body, ConditionDecl, Decl, DeclKind, Element, File, Ident, Import,
        Property, RepetitionDecl, Value,
    },
    lexer::Token,
    span::FileId,
};

/// `Import* Decl*`
pub(crate) fn parse_file(stream: &mut TokenStream<'_>, file: FileId) -> Result<File, ParseError> {
    let mut imports = Vec::new();
    while stream.check(&Token::Import) {
        imports.push(parse_import(stream)?);
    }

    let mut decls = Vec::new();
    while !stream.at_end() {
        decls.push(parse_decl(stream)?);
    }

    Ok(File {
        file,
        imports,
        decls,
    })
}

fn parse_import(stream: &mut TokenStream<'_>) -> Result<Import, ParseError> {
    let start = stream.expect(&Token::Import)?;
    let path = match stream.peek() {
        Some(Token::Str(path)) => path.clone(),
        _ => return Err(stream.error_expected("import path string")),
    };
    stream.advance();

    Ok(Import {
        path,
        span: start.to(stream.previous_span()),
    })
}

const fn decl_kind(token: &Token) -> Option<DeclKind> {
    let kind = match token {
        Token::Api => DeclKind::Api,
        Token::Broker => DeclKind::Broker,
        Token::Component => DeclKind::Component,
        Token::Database => DeclKind::Database,
        Token::Endpoint => DeclKind::Endpoint,
        Token::Entity => DeclKind::Entity,
        Token::Query => DeclKind::Query,
        Token::RestApi => DeclKind::RestApi,
        Token::Role => DeclKind::Role,
        Token::Screen => DeclKind::Screen,
        Token::Topic => DeclKind::Topic,
        Token::User => DeclKind::User,
        Token::Webpage => DeclKind::Webpage,
        Token::Websocket => DeclKind::Websocket,
        _ => return None,
    };

    Some(kind)
}

/// `Keyword ('<' ID '>')? ID Body 'end'`
fn parse_decl(stream: &mut TokenStream<'_>) -> Result<Decl, ParseError> {
    let start = stream.current_span();
    let Some(kind) = stream.peek().and_then(decl_kind) else {
        return Err(stream.error_expected("declaration"));
    };
    stream.advance();

    let variant = if kind.takes_variant() {
        stream.expect(&Token::Lt)?;
        let variant = stream.expect_ident()?;
        stream.expect(&Token::Gt)?;
        Some(variant)
    } else {
        None
    };

    let name = stream.expect_ident()?;
    let body = parse_body(stream)?;
    let end = stream.expect(&Token::End)?;

    Ok(Decl {
        kind,
        variant,
        name,
        body,
        span: start.to(end),
    })
}

// is_property_start
// an identifier-like token directly followed by `:`
fn is_property_start(stream: &TokenStream<'_>) -> bool {
    let key_like = match stream.peek() {
        Some(Token::Ident(_)) => true,
        Some(token) => token.keyword_text().is_some() && !is_element_start(token),
        None => false,
    };

    key_like && matches!(stream.peek_nth(1), Some(Token::Colon))
}

const fn is_element_start(token: &Token) -> bool {
    matches!(
        token,
        Token::Row | Token::Column | Token::Condition | Token::Repetition | Token::Component
    )
}

/// Properties, an optional attribute list and screen elements up to `end`.
fn parse_body(stream: &mut TokenStream<'_>) -> Result<Body, ParseError> {
    let mut body = Body::default();

    loop {
        match stream.peek() {
            None | Some(Token::End) => break,
            Some(_) if is_property_start(stream) => {
                let key = stream.expect_ident()?;
                stream.expect(&Token::Colon)?;

                if key.name == "attributes" && stream.check(&Token::Dash) {
                    if body.attributes.is_some() {
                        return Err(ParseError::new("duplicate attribute list", key.span));
                    }
                    body.attributes = Some(parse_attribute_list(stream)?);
                } else {
                    let value = parse_value(stream)?;
                    body.properties.push(Property { key, value });
                }
            }
            Some(_) => body.elements.push(parse_element(stream)?),
        }
    }

    Ok(body)
}

/// `('-' ID ':' ID)+`
fn parse_attribute_list(stream: &mut TokenStream<'_>) -> Result<Vec<AttributeDecl>, ParseError> {
    let mut attributes = Vec::new();

    while stream.eat(&Token::Dash) {
        let name = stream.expect_word()?;
        stream.expect(&Token::Colon)?;
        let ty = stream.expect_ident()?;
        attributes.push(AttributeDecl { name, ty });
    }

    Ok(attributes)
}

fn parse_value(stream: &mut TokenStream<'_>) -> Result<Value, ParseError> {
    let span = stream.current_span();
    let value = match stream.peek() {
        Some(Token::Str(value)) => Value::Str {
            value: value.clone(),
            span,
        },
        Some(Token::Int(value)) => Value::Int {
            value: *value,
            span,
        },
        Some(Token::Float(value)) => Value::Float {
            value: *value,
            span,
        },
        Some(Token::True) => Value::Bool { value: true, span },
        Some(Token::False) => Value::Bool { value: false, span },
        Some(Token::LBracket) => return parse_list(stream),
        Some(Token::LBrace) => return parse_map(stream),
        Some(Token::Ident(_)) => return parse_access_path(stream).map(Value::Path),
        _ => return Err(stream.error_expected("value")),
    };
    stream.advance();

    Ok(value)
}

/// `'[' (Value (',' Value)*)? ']'`, trailing comma allowed.
fn parse_list(stream: &mut TokenStream<'_>) -> Result<Value, ParseError> {
    let start = stream.expect(&Token::LBracket)?;
    let mut items = Vec::new();

    while !stream.check(&Token::RBracket) {
        items.push(parse_value(stream)?);
        if !stream.eat(&Token::Comma) {
            break;
        }
    }
    let end = stream.expect(&Token::RBracket)?;

    Ok(Value::List {
        items,
        span: start.to(end),
    })
}

/// `'{' (ID ':' Value (',' ID ':' Value)*)? '}'`
fn parse_map(stream: &mut TokenStream<'_>) -> Result<Value, ParseError> {
    let start = stream.expect(&Token::LBrace)?;
    let mut entries = Vec::new();

    while !stream.check(&Token::RBrace) {
        let key = stream.expect_ident()?;
        stream.expect(&Token::Colon)?;
        entries.push((key, parse_value(stream)?));
        if !stream.eat(&Token::Comma) {
            break;
        }
    }
    let end = stream.expect(&Token::RBrace)?;

    Ok(Value::Map {
        entries,
        span: start.to(end),
    })
}

fn parse_element(stream: &mut TokenStream<'_>) -> Result<Element, ParseError> {
    match stream.peek() {
        Some(Token::Component) => Ok(Element::Component(Box::new(parse_decl(stream)?))),
        Some(Token::Row) => {
            let start = stream.expect(&Token::Row)?;
            let children = parse_children(stream)?;
            let end = stream.expect(&Token::End)?;

            Ok(Element::Row {
                children,
                span: start.to(end),
            })
        }
        Some(Token::Column) => {
            let start = stream.expect(&Token::Column)?;
            let children = parse_children(stream)?;
            let end = stream.expect(&Token::End)?;

            Ok(Element::Column {
                children,
                span: start.to(end),
            })
        }
        Some(Token::Condition) => parse_condition(stream).map(Element::Condition),
        Some(Token::Repetition) => parse_repetition(stream).map(Element::Repetition),
        Some(Token::Ident(_)) => Ok(Element::Reference(stream.expect_ident()?)),
        _ => Err(stream.error_expected("property or screen element")),
    }
}

fn parse_children(stream: &mut TokenStream<'_>) -> Result<Vec<Element>, ParseError> {
    let mut children = Vec::new();
    while !stream.at_end() && !stream.check(&Token::End) {
        children.push(parse_element(stream)?);
    }

    Ok(children)
}

// element_key
// reads `key :` inside a Condition or Repetition block
fn element_key(stream: &mut TokenStream<'_>) -> Result<Ident, ParseError> {
    let key = stream.expect_ident()?;
    stream.expect(&Token::Colon)?;

    Ok(key)
}

fn duplicate_key(key: &Ident) -> ParseError {
    ParseError::new(format!("duplicate key `{key}`"), key.span)
}

fn set_once<T>(slot: &mut Option<T>, key: &Ident, value: T) -> Result<(), ParseError> {
    if slot.is_some() {
        return Err(duplicate_key(key));
    }
    *slot = Some(value);

    Ok(())
}

/// `'Condition' 'if' ':' OrExpr 'then' ':' ID ('else' ':' (ID | '[' ID,* ']'))? 'end'`
fn parse_condition(stream: &mut TokenStream<'_>) -> Result<ConditionDecl, ParseError> {
    let start = stream.expect(&Token::Condition)?;
    let mut expr = None;
    let mut then = None;
    let mut otherwise = None;

    while !stream.at_end() && !stream.check(&Token::End) {
        let key = element_key(stream)?;
        match key.as_str() {
            "if" => set_once(&mut expr, &key, parse_or_expr(stream)?)?,
            "then" => set_once(&mut then, &key, stream.expect_ident()?)?,
            "else" => set_once(&mut otherwise, &key, parse_ident_or_list(stream)?)?,
            _ => {
                return Err(ParseError::new(
                    format!("unknown condition key `{key}`"),
                    key.span,
                ));
            }
        }
    }
    let end = stream.expect(&Token::End)?;
    let span = start.to(end);

    Ok(ConditionDecl {
        expr: expr.ok_or_else(|| ParseError::new("condition is missing `if`", span))?,
        then: then.ok_or_else(|| ParseError::new("condition is missing `then`", span))?,
        otherwise: otherwise.unwrap_or_default(),
        span,
    })
}

fn parse_ident_or_list(stream: &mut TokenStream<'_>) -> Result<Vec<Ident>, ParseError> {
    if !stream.eat(&Token::LBracket) {
        return Ok(vec![stream.expect_ident()?]);
    }

    let mut names = Vec::new();
    while !stream.check(&Token::RBracket) {
        names.push(stream.expect_ident()?);
        if !stream.eat(&Token::Comma) {
            break;
        }
    }
    stream.expect(&Token::RBracket)?;

    Ok(names)
}

/// `'Repetition' (key ':' value)* 'end'`
fn parse_repetition(stream: &mut TokenStream<'_>) -> Result<RepetitionDecl, ParseError> {
    let start = stream.expect(&Token::Repetition)?;
    let mut item = None;
    let mut data = None;
    let mut data_else = None;
    let mut condition = None;
    let mut component = None;
    let mut otherwise = None;
    let mut orientation = None;

    while !stream.at_end() && !stream.check(&Token::End) {
        let key = element_key(stream)?;
        match key.as_str() {
            "item" => set_once(&mut item, &key, parse_access_path(stream)?)?,
            "data" => set_once(&mut data, &key, parse_access_path(stream)?)?,
            "dataElse" => set_once(&mut data_else, &key, parse_access_path(stream)?)?,
            "condition" => set_once(&mut condition, &key, parse_half_expr(stream)?)?,
            "component" => set_once(&mut component, &key, stream.expect_ident()?)?,
            "else" => set_once(&mut otherwise, &key, stream.expect_ident()?)?,
            "orientation" => set_once(&mut orientation, &key, stream.expect_ident()?)?,
            _ => {
                return Err(ParseError::new(
                    format!("unknown repetition key `{key}`"),
                    key.span,
                ));
            }
        }
    }
    let end = stream.expect(&Token::End)?;
    let span = start.to(end);

    Ok(RepetitionDecl {
        item: item.ok_or_else(|| ParseError::new("repetition is missing `item`", span))?,
        data,
        data_else,
        condition,
        component: component
            .ok_or_else(|| ParseError::new("repetition is missing `component`", span))?,
        otherwise,
        orientation,
        span,
    })
}
