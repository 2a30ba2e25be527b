//! Multi-file linking.
//!
//! Linking runs in two phases over the whole repository. Registration walks
//! every file in load order and assigns each declaration (and each component
//! declared inline in a screen) its handle in the shared [`Namespace`].
//! Lowering then turns every declaration into its node, resolving each name
//! against the finished namespace, so forward and cross-file references need
//! no special treatment.
//!
//! Entities are not final yet: their `overloads` targets and inherited fields
//! are settled by the overload phase, and conditions and repetitions keep
//! their raw entity paths until the compile phase.

mod component;
mod decl;
mod namespace;
mod props;
mod screen;

pub(crate) use namespace::{Namespace, NodeRef};

use crate::{
    error::{Error, ReferenceError, StructuralError},
    load::Repository,
    model::{
        BrokerId, ComponentId, DatabaseId, EndpointId, EntityId, Model, QueryId, RestApiId,
        RoleId, ScreenId, TopicId, UserId,
    },
    node::{Attribute, EntityPath, Orientation, SourceRef},
};
use props::Props;
use std::collections::BTreeMap;
use tracing::debug;
use webdsl_syntax::{
    Location, SourceMap, Span,
    ast::{AccessPath, Decl, DeclKind, Element, HalfExpr, Ident, OrExpr},
};

///
/// PendingEntity
/// Entity as declared; unset fields may still be inherited through `overloads`.
///

#[derive(Clone, Debug)]
pub(crate) struct PendingEntity {
    pub name: String,
    pub description: Option<String>,
    pub attributes: Option<Vec<Attribute>>,
    pub strict: Option<bool>,
    pub interval: Option<u64>,
    pub source: Option<SourceRef>,
    pub overloads: Option<Ident>,
    pub location: Location,
}

///
/// ConditionDraft
///

#[derive(Clone, Debug)]
pub(crate) struct ConditionDraft {
    pub expr: OrExpr<EntityPath>,
    pub then: ComponentId,
    pub otherwise: Vec<ComponentId>,
    pub location: Location,
}

///
/// RepetitionDraft
///

#[derive(Clone, Debug)]
pub(crate) struct RepetitionDraft {
    pub item: EntityPath,
    pub data: Option<EntityPath>,
    pub data_else: Option<EntityPath>,
    pub condition: Option<HalfExpr<EntityPath>>,
    pub component: ComponentId,
    pub otherwise: Option<ComponentId>,
    pub orientation: Orientation,
    pub location: Location,
}

///
/// Linked
/// Output of the link phase.
///

#[derive(Debug)]
pub(crate) struct Linked {
    pub model: Model,
    pub entities: Vec<PendingEntity>,
    pub conditions: Vec<ConditionDraft>,
    pub repetitions: Vec<RepetitionDraft>,
    pub namespace: Namespace,
}

/// Link every file of `repo` into one model.
pub(crate) fn link(repo: &Repository) -> Result<Linked, Error> {
    let mut linker = Linker {
        sources: &repo.sources,
        namespace: Namespace::default(),
        model: Model::default(),
        entities: Vec::new(),
        conditions: Vec::new(),
        repetitions: Vec::new(),
        counts: BTreeMap::new(),
    };

    let registered = linker.register(repo)?;
    debug!(
        declarations = linker.namespace.len(),
        "registered repository namespace"
    );

    // a query's variant follows its database and an entity's source tag
    // follows its query, so those kinds are lowered after what they read
    for layer in LOWERING_LAYERS {
        for &(decl, node) in registered.iter().filter(|(d, _)| layer.contains(&d.kind)) {
            linker.lower(decl, node)?;
        }
    }

    Ok(Linked {
        model: linker.model,
        entities: linker.entities,
        conditions: linker.conditions,
        repetitions: linker.repetitions,
        namespace: linker.namespace,
    })
}

const LOWERING_LAYERS: [&[DeclKind]; 4] = [
    &[
        DeclKind::Api,
        DeclKind::Broker,
        DeclKind::Database,
        DeclKind::RestApi,
        DeclKind::Role,
        DeclKind::User,
        DeclKind::Websocket,
    ],
    &[DeclKind::Endpoint, DeclKind::Query, DeclKind::Topic],
    &[DeclKind::Entity],
    &[DeclKind::Component, DeclKind::Screen, DeclKind::Webpage],
];

///
/// Linker
///

struct Linker<'a> {
    sources: &'a SourceMap,
    namespace: Namespace,
    model: Model,
    entities: Vec<PendingEntity>,
    conditions: Vec<ConditionDraft>,
    repetitions: Vec<RepetitionDraft>,
    counts: BTreeMap<DeclKind, usize>,
}

impl<'a> Linker<'a> {
    fn location(&self, span: Span) -> Location {
        self.sources.location(span)
    }

    fn props(&self, decl: &'a Decl) -> Result<Props<'a>, StructuralError> {
        Props::new(
            format!("{} '{}'", decl.kind, decl.name),
            &decl.body.properties,
            self.sources,
        )
    }

    // register
    // phase one: every declaration in load order, inline components included
    fn register(&mut self, repo: &'a Repository) -> Result<Vec<(&'a Decl, NodeRef)>, Error> {
        let mut registered: Vec<(&'a Decl, NodeRef)> = Vec::new();
        let mut webpage: Option<&Decl> = None;

        for (index, file) in repo.files.iter().enumerate() {
            for decl in &file.decls {
                match decl.kind {
                    DeclKind::Webpage => {
                        if let Some(first) = webpage {
                            return Err(self.singleton_error(decl, first).into());
                        }
                        if index != 0 {
                            return Err(StructuralError::at(
                                format!("webpage '{}' must be declared in the root file", decl.name),
                                self.location(decl.name.span),
                            )
                            .into());
                        }
                        webpage = Some(decl);
                    }
                    DeclKind::Api | DeclKind::Websocket => {
                        let first = registered
                            .iter()
                            .map(|(d, _)| *d)
                            .find(|d| d.kind == decl.kind);
                        if let Some(first) = first {
                            return Err(self.singleton_error(decl, first).into());
                        }
                    }
                    _ => {}
                }

                self.register_decl(decl, &mut registered)?;
            }
        }

        if webpage.is_none() {
            return Err(StructuralError::new("repository declares no webpage", None).into());
        }

        Ok(registered)
    }

    fn singleton_error(&self, decl: &Decl, first: &Decl) -> StructuralError {
        StructuralError::at(
            format!(
                "{} '{}' is declared more than once (first '{}' at {})",
                decl.kind,
                decl.name,
                first.name,
                self.location(first.name.span)
            ),
            self.location(decl.name.span),
        )
    }

    fn register_decl(
        &mut self,
        decl: &'a Decl,
        registered: &mut Vec<(&'a Decl, NodeRef)>,
    ) -> Result<(), StructuralError> {
        if decl.kind != DeclKind::Screen && !decl.body.elements.is_empty() {
            return Err(StructuralError::at(
                format!("{} '{}' cannot contain screen elements", decl.kind, decl.name),
                self.location(decl.name.span),
            ));
        }
        if decl.kind != DeclKind::Entity && decl.body.attributes.is_some() {
            return Err(StructuralError::at(
                format!("{} '{}' cannot declare an attribute list", decl.kind, decl.name),
                self.location(decl.name.span),
            ));
        }

        let count = self.counts.entry(decl.kind).or_default();
        let node = node_ref(decl.kind, *count);
        *count += 1;

        self.namespace.register(&decl.name, node, self.sources)?;
        registered.push((decl, node));

        if decl.kind == DeclKind::Screen {
            self.register_inline(&decl.body.elements, registered)?;
        }

        Ok(())
    }

    fn register_inline(
        &mut self,
        elements: &'a [Element],
        registered: &mut Vec<(&'a Decl, NodeRef)>,
    ) -> Result<(), StructuralError> {
        for element in elements {
            match element {
                Element::Component(decl) => self.register_decl(decl, registered)?,
                Element::Row { children, .. } | Element::Column { children, .. } => {
                    self.register_inline(children, registered)?;
                }
                Element::Reference(_) | Element::Condition(_) | Element::Repetition(_) => {}
            }
        }

        Ok(())
    }

    // lower
    // phase two: build the node for one registered declaration
    fn lower(&mut self, decl: &'a Decl, node: NodeRef) -> Result<(), Error> {
        match node {
            NodeRef::Api => self.model.api = Some(self.lower_api(decl)?),
            NodeRef::Broker(id) => {
                let broker = self.lower_broker(decl)?;
                push(&mut self.model.brokers, id.index(), broker);
            }
            NodeRef::Component(id) => {
                let component = self.lower_component(decl)?;
                push(&mut self.model.components, id.index(), component);
            }
            NodeRef::Database(id) => {
                let database = self.lower_database(decl)?;
                push(&mut self.model.databases, id.index(), database);
            }
            NodeRef::Endpoint(id) => {
                let endpoint = self.lower_endpoint(decl)?;
                push(&mut self.model.endpoints, id.index(), endpoint);
            }
            NodeRef::Entity(id) => {
                let entity = self.lower_entity(decl)?;
                push(&mut self.entities, id.index(), entity);
            }
            NodeRef::Query(id) => {
                let query = self.lower_query(decl)?;
                push(&mut self.model.queries, id.index(), query);
            }
            NodeRef::RestApi(id) => {
                let rest_api = self.lower_rest_api(decl)?;
                push(&mut self.model.rest_apis, id.index(), rest_api);
            }
            NodeRef::Role(id) => {
                let role = self.lower_role(decl)?;
                push(&mut self.model.roles, id.index(), role);
            }
            NodeRef::Screen(id) => {
                let screen = self.lower_screen(decl)?;
                push(&mut self.model.screens, id.index(), screen);
            }
            NodeRef::Topic(id) => {
                let topic = self.lower_topic(decl)?;
                push(&mut self.model.topics, id.index(), topic);
            }
            NodeRef::User(id) => {
                let user = self.lower_user(decl)?;
                push(&mut self.model.users, id.index(), user);
            }
            NodeRef::Webpage => self.model.webpage = Some(self.lower_webpage(decl)?),
            NodeRef::Websocket => self.model.websocket = Some(self.lower_websocket(decl)?),
        }

        Ok(())
    }

    /// Handles of every screen, in declaration order.
    fn all_screens(&self) -> Vec<ScreenId> {
        let count = self.counts.get(&DeclKind::Screen).copied().unwrap_or_default();

        (0..count).map(ScreenId::new).collect()
    }

    fn resolve_names<T>(
        &self,
        names: Option<Vec<&Ident>>,
        resolve: impl Fn(&Namespace, &Ident, &SourceMap) -> Result<T, ReferenceError>,
    ) -> Result<Vec<T>, Error> {
        names
            .unwrap_or_default()
            .into_iter()
            .map(|name| resolve(&self.namespace, name, self.sources).map_err(Error::from))
            .collect()
    }

    /// Entity-rooted path inside a condition or repetition.
    fn entity_path(&self, path: AccessPath) -> Result<EntityPath, Error> {
        let entity = self.namespace.entity(&path.base, self.sources)?;

        Ok(EntityPath { entity, path })
    }
}

// push
// arena position must equal the handle assigned during registration
fn push<T>(arena: &mut Vec<T>, index: usize, node: T) {
    debug_assert_eq!(arena.len(), index, "lowering order diverged from registration");
    arena.push(node);
}

const fn node_ref(kind: DeclKind, index: usize) -> NodeRef {
    match kind {
        DeclKind::Api => NodeRef::Api,
        DeclKind::Broker => NodeRef::Broker(BrokerId::new(index)),
        DeclKind::Component => NodeRef::Component(ComponentId::new(index)),
        DeclKind::Database => NodeRef::Database(DatabaseId::new(index)),
        DeclKind::Endpoint => NodeRef::Endpoint(EndpointId::new(index)),
        DeclKind::Entity => NodeRef::Entity(EntityId::new(index)),
        DeclKind::Query => NodeRef::Query(QueryId::new(index)),
        DeclKind::RestApi => NodeRef::RestApi(RestApiId::new(index)),
        DeclKind::Role => NodeRef::Role(RoleId::new(index)),
        DeclKind::Screen => NodeRef::Screen(ScreenId::new(index)),
        DeclKind::Topic => NodeRef::Topic(TopicId::new(index)),
        DeclKind::User => NodeRef::User(UserId::new(index)),
        DeclKind::Webpage => NodeRef::Webpage,
        DeclKind::Websocket => NodeRef::Websocket,
    }
}

#[cfg(test)]
mod tests;
