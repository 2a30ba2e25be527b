use crate::{
    error::{ReferenceError, StructuralError},
    model::{
        BrokerId, ComponentId, DatabaseId, EndpointId, EntityId, QueryId, RestApiId, RoleId,
        ScreenId, TopicId, UserId,
    },
};
use indexmap::IndexMap;
use webdsl_syntax::{SourceMap, Span, ast::Ident};

///
/// NodeRef
/// What a top-level (or inline component) name was registered as.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum NodeRef {
    Api,
    Broker(BrokerId),
    Component(ComponentId),
    Database(DatabaseId),
    Endpoint(EndpointId),
    Entity(EntityId),
    Query(QueryId),
    RestApi(RestApiId),
    Role(RoleId),
    Screen(ScreenId),
    Topic(TopicId),
    User(UserId),
    Webpage,
    Websocket,
}

impl NodeRef {
    pub(crate) const fn description(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Broker(_) => "broker",
            Self::Component(_) => "component",
            Self::Database(_) => "database",
            Self::Endpoint(_) => "rest endpoint",
            Self::Entity(_) => "entity",
            Self::Query(_) => "query",
            Self::RestApi(_) => "rest api",
            Self::Role(_) => "role",
            Self::Screen(_) => "screen",
            Self::Topic(_) => "broker topic",
            Self::User(_) => "user",
            Self::Webpage => "webpage",
            Self::Websocket => "websocket",
        }
    }
}

///
/// Registered
///

#[derive(Clone, Copy, Debug)]
pub(crate) struct Registered {
    pub node: NodeRef,
    pub span: Span,
}

///
/// Namespace
///
/// Combined namespace of every file in the repository, filled before any
/// reference is resolved so forward and cross-file references work.
///

#[derive(Debug, Default)]
pub(crate) struct Namespace {
    entries: IndexMap<String, Registered>,
}

impl Namespace {
    pub(crate) fn register(
        &mut self,
        name: &Ident,
        node: NodeRef,
        sources: &SourceMap,
    ) -> Result<(), StructuralError> {
        if let Some(previous) = self.entries.get(&name.name) {
            return Err(StructuralError::at(
                format!(
                    "duplicate declaration '{}' (first declared as {} at {})",
                    name.name,
                    previous.node.description(),
                    sources.location(previous.span)
                ),
                sources.location(name.span),
            ));
        }
        self.entries.insert(
            name.name.clone(),
            Registered {
                node,
                span: name.span,
            },
        );

        Ok(())
    }

    pub(crate) fn get(&self, name: &str) -> Option<Registered> {
        self.entries.get(name).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Resolve `name`, narrowing to one node kind with `pick`.
    pub(crate) fn resolve<T>(
        &self,
        name: &Ident,
        expected: &'static str,
        sources: &SourceMap,
        pick: impl FnOnce(NodeRef) -> Option<T>,
    ) -> Result<T, ReferenceError> {
        let found = self.get(&name.name);
        let node = found.map(|registered| registered.node);

        node.and_then(pick).ok_or_else(|| ReferenceError {
            name: name.name.clone(),
            expected,
            found: node.map(NodeRef::description),
            location: sources.location(name.span),
        })
    }
}

macro_rules! resolvers {
    ($($fn_name:ident => $variant:ident($id:ident), $expected:literal;)*) => {
        impl Namespace {
            $(
                pub(crate) fn $fn_name(
                    &self,
                    name: &Ident,
                    sources: &SourceMap,
                ) -> Result<$id, ReferenceError> {
                    self.resolve(name, $expected, sources, |node| match node {
                        NodeRef::$variant(id) => Some(id),
                        _ => None,
                    })
                }
            )*
        }
    };
}

resolvers! {
    broker => Broker(BrokerId), "broker";
    component => Component(ComponentId), "component";
    database => Database(DatabaseId), "database";
    entity => Entity(EntityId), "entity";
    rest_api => RestApi(RestApiId), "rest api";
    role => Role(RoleId), "role";
    screen => Screen(ScreenId), "screen";
}

#[cfg(test)]
mod tests {
    use super::*;
    use webdsl_syntax::FileId;

    fn ident(name: &str, start: usize) -> Ident {
        Ident::new(name, Span::new(FileId::new(0), start, start + name.len()))
    }

    fn sources() -> SourceMap {
        let mut map = SourceMap::new();
        map.add("root.wdsl", "Entity Temp end\nComponent<Gauge> Temp end\n");
        map
    }

    #[test]
    fn duplicate_names_are_structural_errors() {
        let sources = sources();
        let mut ns = Namespace::default();
        ns.register(&ident("Temp", 7), NodeRef::Entity(EntityId::new(0)), &sources)
            .unwrap();

        let err = ns
            .register(&ident("Temp", 33), NodeRef::Component(ComponentId::new(0)), &sources)
            .unwrap_err();
        assert!(err.message.contains("first declared as entity at root.wdsl:1:8"));
        assert_eq!(err.location.map(|l| l.line), Some(2));
    }

    #[test]
    fn resolve_reports_wrong_kind() {
        let sources = sources();
        let mut ns = Namespace::default();
        ns.register(&ident("Temp", 7), NodeRef::Entity(EntityId::new(0)), &sources)
            .unwrap();

        assert_eq!(ns.entity(&ident("Temp", 0), &sources).unwrap(), EntityId::new(0));

        let err = ns.component(&ident("Temp", 0), &sources).unwrap_err();
        assert_eq!(err.found, Some("entity"));
        assert_eq!(err.expected, "component");

        let err = ns.entity(&ident("Missing", 0), &sources).unwrap_err();
        assert_eq!(err.found, None);
    }
}
