//! Typed syntax tree handed from the parser to the linker.
//!
//! Nodes carry spans so every later error can report a location. Access
//! paths inside boolean expressions are generic over their path type: the
//! parser produces `AccessPath`, and the linker maps each one to a resolved
//! form with `try_map_paths`.

use crate::span::{FileId, Span};
use std::fmt;

///
/// Ident
///

#[derive(Clone, Debug, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

///
/// File
///

#[derive(Clone, Debug)]
pub struct File {
    pub file: FileId,
    pub imports: Vec<Import>,
    pub decls: Vec<Decl>,
}

///
/// Import
///

#[derive(Clone, Debug)]
pub struct Import {
    pub path: String,
    pub span: Span,
}

///
/// DeclKind
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[remain::sorted]
pub enum DeclKind {
    Api,
    Broker,
    Component,
    Database,
    Endpoint,
    Entity,
    Query,
    RestApi,
    Role,
    Screen,
    Topic,
    User,
    Webpage,
    Websocket,
}

impl DeclKind {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
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
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Broker => "broker",
            Self::Component => "component",
            Self::Database => "database",
            Self::Endpoint => "rest endpoint",
            Self::Entity => "entity",
            Self::Query => "query",
            Self::RestApi => "rest api",
            Self::Role => "role",
            Self::Screen => "screen",
            Self::Topic => "broker topic",
            Self::User => "user",
            Self::Webpage => "webpage",
            Self::Websocket => "websocket",
        }
    }

    /// Declarations written as `Keyword<Variant> Name`.
    #[must_use]
    pub const fn takes_variant(self) -> bool {
        matches!(self, Self::Broker | Self::Component | Self::Database)
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

///
/// Decl
/// One named top-level (or inline) declaration.
///

#[derive(Clone, Debug)]
pub struct Decl {
    pub kind: DeclKind,
    pub variant: Option<Ident>,
    pub name: Ident,
    pub body: Body,
    pub span: Span,
}

///
/// Body
///

#[derive(Clone, Debug, Default)]
pub struct Body {
    pub properties: Vec<Property>,
    pub attributes: Option<Vec<AttributeDecl>>,
    pub elements: Vec<Element>,
}

///
/// Property
///

#[derive(Clone, Debug)]
pub struct Property {
    pub key: Ident,
    pub value: Value,
}

///
/// AttributeDecl
/// `- name: type` line inside an entity's attribute list.
///

#[derive(Clone, Debug)]
pub struct AttributeDecl {
    pub name: Ident,
    pub ty: Ident,
}

///
/// Value
///

#[derive(Clone, Debug)]
pub enum Value {
    Str { value: String, span: Span },
    Int { value: i64, span: Span },
    Float { value: f64, span: Span },
    Bool { value: bool, span: Span },
    Path(AccessPath),
    List { items: Vec<Self>, span: Span },
    Map { entries: Vec<(Ident, Self)>, span: Span },
}

impl Value {
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Str { span, .. }
            | Self::Int { span, .. }
            | Self::Float { span, .. }
            | Self::Bool { span, .. }
            | Self::List { span, .. }
            | Self::Map { span, .. } => *span,
            Self::Path(path) => path.span,
        }
    }

    /// Short noun used in "expected X, found Y" messages.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Str { .. } => "string",
            Self::Int { .. } => "integer",
            Self::Float { .. } => "float",
            Self::Bool { .. } => "boolean",
            Self::Path(path) if path.accessors.is_empty() => "name",
            Self::Path(_) => "access path",
            Self::List { .. } => "list",
            Self::Map { .. } => "map",
        }
    }
}

///
/// AccessPath
/// `base` followed by zero or more `.name` / `[index]` accessors.
///

#[derive(Clone, Debug, PartialEq)]
pub struct AccessPath {
    pub base: Ident,
    pub accessors: Vec<Accessor>,
    pub span: Span,
}

impl AccessPath {
    /// The bare name when the path has no accessors.
    #[must_use]
    pub fn as_name(&self) -> Option<&Ident> {
        self.accessors.is_empty().then_some(&self.base)
    }
}

///
/// Accessor
///

#[derive(Clone, Debug, PartialEq)]
pub enum Accessor {
    Attribute(Ident),
    Index { index: i64, span: Span },
}

///
/// Literal
///

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// Operand
///

#[derive(Clone, Debug, PartialEq)]
pub enum Operand<P = AccessPath> {
    Path(P),
    Literal { value: Literal, span: Span },
}

impl<P> Operand<P> {
    fn try_map_paths<Q, E>(self, f: &mut impl FnMut(P) -> Result<Q, E>) -> Result<Operand<Q>, E> {
        Ok(match self {
            Self::Path(path) => Operand::Path(f(path)?),
            Self::Literal { value, span } => Operand::Literal { value, span },
        })
    }

    fn for_each_path(&self, f: &mut impl FnMut(&P)) {
        if let Self::Path(path) = self {
            f(path);
        }
    }

    fn for_each_path_mut(&mut self, f: &mut impl FnMut(&mut P)) {
        if let Self::Path(path) = self {
            f(path);
        }
    }
}

///
/// OrExpr
///

#[derive(Clone, Debug, PartialEq)]
pub struct OrExpr<P = AccessPath> {
    pub left: AndExpr<P>,
    pub right: Option<Box<Self>>,
}

///
/// AndExpr
///

#[derive(Clone, Debug, PartialEq)]
pub struct AndExpr<P = AccessPath> {
    pub left: PrimaryExpr<P>,
    pub right: Option<Box<Self>>,
}

///
/// PrimaryExpr
///

#[derive(Clone, Debug, PartialEq)]
pub enum PrimaryExpr<P = AccessPath> {
    Group(Box<OrExpr<P>>),
    Comparison(ComparisonExpr<P>),
}

///
/// ComparisonExpr
///

#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonExpr<P = AccessPath> {
    pub left: Operand<P>,
    pub op: CompareOp,
    pub right: Operand<P>,
    pub span: Span,
}

///
/// HalfExpr
/// Comparison with an implicit left operand (the repeated item).
///

#[derive(Clone, Debug, PartialEq)]
pub struct HalfExpr<P = AccessPath> {
    pub op: CompareOp,
    pub right: Operand<P>,
    pub span: Span,
}

impl<P> OrExpr<P> {
    /// Rebuild the expression with every path operand mapped through `f`.
    pub fn try_map_paths<Q, E>(
        self,
        f: &mut impl FnMut(P) -> Result<Q, E>,
    ) -> Result<OrExpr<Q>, E> {
        Ok(OrExpr {
            left: self.left.try_map_paths(f)?,
            right: match self.right {
                Some(right) => Some(Box::new(right.try_map_paths(f)?)),
                None => None,
            },
        })
    }

    pub fn for_each_path(&self, f: &mut impl FnMut(&P)) {
        self.left.for_each_path(f);
        if let Some(right) = &self.right {
            right.for_each_path(f);
        }
    }

    pub fn for_each_path_mut(&mut self, f: &mut impl FnMut(&mut P)) {
        self.left.for_each_path_mut(f);
        if let Some(right) = &mut self.right {
            right.for_each_path_mut(f);
        }
    }
}

impl<P> AndExpr<P> {
    fn try_map_paths<Q, E>(self, f: &mut impl FnMut(P) -> Result<Q, E>) -> Result<AndExpr<Q>, E> {
        Ok(AndExpr {
            left: self.left.try_map_paths(f)?,
            right: match self.right {
                Some(right) => Some(Box::new(right.try_map_paths(f)?)),
                None => None,
            },
        })
    }

    fn for_each_path(&self, f: &mut impl FnMut(&P)) {
        self.left.for_each_path(f);
        if let Some(right) = &self.right {
            right.for_each_path(f);
        }
    }

    fn for_each_path_mut(&mut self, f: &mut impl FnMut(&mut P)) {
        self.left.for_each_path_mut(f);
        if let Some(right) = &mut self.right {
            right.for_each_path_mut(f);
        }
    }
}

impl<P> PrimaryExpr<P> {
    fn try_map_paths<Q, E>(
        self,
        f: &mut impl FnMut(P) -> Result<Q, E>,
    ) -> Result<PrimaryExpr<Q>, E> {
        Ok(match self {
            Self::Group(inner) => PrimaryExpr::Group(Box::new(inner.try_map_paths(f)?)),
            Self::Comparison(cmp) => PrimaryExpr::Comparison(ComparisonExpr {
                left: cmp.left.try_map_paths(f)?,
                op: cmp.op,
                right: cmp.right.try_map_paths(f)?,
                span: cmp.span,
            }),
        })
    }

    fn for_each_path(&self, f: &mut impl FnMut(&P)) {
        match self {
            Self::Group(inner) => inner.for_each_path(f),
            Self::Comparison(cmp) => {
                cmp.left.for_each_path(f);
                cmp.right.for_each_path(f);
            }
        }
    }

    fn for_each_path_mut(&mut self, f: &mut impl FnMut(&mut P)) {
        match self {
            Self::Group(inner) => inner.for_each_path_mut(f),
            Self::Comparison(cmp) => {
                cmp.left.for_each_path_mut(f);
                cmp.right.for_each_path_mut(f);
            }
        }
    }
}

impl<P> HalfExpr<P> {
    pub fn try_map_paths<Q, E>(
        self,
        f: &mut impl FnMut(P) -> Result<Q, E>,
    ) -> Result<HalfExpr<Q>, E> {
        Ok(HalfExpr {
            op: self.op,
            right: self.right.try_map_paths(f)?,
            span: self.span,
        })
    }

    pub fn for_each_path(&self, f: &mut impl FnMut(&P)) {
        self.right.for_each_path(f);
    }

    pub fn for_each_path_mut(&mut self, f: &mut impl FnMut(&mut P)) {
        self.right.for_each_path_mut(f);
    }
}

///
/// Element
/// Child of a screen or a layout group.
///

#[derive(Clone, Debug)]
pub enum Element {
    Reference(Ident),
    Component(Box<Decl>),
    Row { children: Vec<Self>, span: Span },
    Column { children: Vec<Self>, span: Span },
    Condition(ConditionDecl),
    Repetition(RepetitionDecl),
}

///
/// ConditionDecl
///

#[derive(Clone, Debug)]
pub struct ConditionDecl {
    pub expr: OrExpr,
    pub then: Ident,
    pub otherwise: Vec<Ident>,
    pub span: Span,
}

///
/// RepetitionDecl
///

#[derive(Clone, Debug)]
pub struct RepetitionDecl {
    pub item: AccessPath,
    pub data: Option<AccessPath>,
    pub data_else: Option<AccessPath>,
    pub condition: Option<HalfExpr>,
    pub component: Ident,
    pub otherwise: Option<Ident>,
    pub orientation: Option<Ident>,
    pub span: Span,
}
