//! Arena holding every resolved node of one build.
//!
//! Nodes reference each other through typed handles (`EntityId`,
//! `ComponentId`, ...) rather than pointers, so the cyclic screen / component /
//! entity graph is plain data and overload resolution only has to redirect
//! handles.

use crate::node::{
    Api, Broker, Component, Condition, Database, Endpoint, Entity, Query, Repetition, RestApi,
    Role, Screen, Topic, User, Webpage, Websocket,
};
use derive_more::Display;
use serde::Serialize;

macro_rules! node_ids {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(
                Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
            )]
            #[serde(transparent)]
            pub struct $name(usize);

            impl $name {
                #[must_use]
                pub const fn index(self) -> usize {
                    self.0
                }

                pub(crate) const fn new(index: usize) -> Self {
                    Self(index)
                }
            }
        )*
    };
}

node_ids! {
    /// Handle to an [`Entity`].
    EntityId,
    /// Handle to a [`Component`], top-level or declared inline in a screen.
    ComponentId,
    ConditionId,
    RepetitionId,
    ScreenId,
    BrokerId,
    DatabaseId,
    RestApiId,
    EndpointId,
    TopicId,
    QueryId,
    RoleId,
    UserId,
}

///
/// Model
///
/// Per-kind arenas in declaration order. A handle's index is its position in
/// the matching arena, so arena order is the repository's declaration order.
///

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub(crate) webpage: Option<Webpage>,
    pub(crate) api: Option<Api>,
    pub(crate) websocket: Option<Websocket>,

    pub(crate) brokers: Vec<Broker>,
    pub(crate) databases: Vec<Database>,
    pub(crate) rest_apis: Vec<RestApi>,
    pub(crate) topics: Vec<Topic>,
    pub(crate) endpoints: Vec<Endpoint>,
    pub(crate) queries: Vec<Query>,
    pub(crate) entities: Vec<Entity>,
    pub(crate) components: Vec<Component>,
    pub(crate) conditions: Vec<Condition>,
    pub(crate) repetitions: Vec<Repetition>,
    pub(crate) screens: Vec<Screen>,
    pub(crate) roles: Vec<Role>,
    pub(crate) users: Vec<User>,
}

macro_rules! arena_accessors {
    ($($field:ident: $id:ident => $node:ident, $get:ident, $iter:ident;)*) => {
        impl Model {
            $(
                #[must_use]
                pub fn $get(&self, id: $id) -> &$node {
                    &self.$field[id.index()]
                }

                pub fn $iter(&self) -> impl ExactSizeIterator<Item = ($id, &$node)> + '_ {
                    self.$field
                        .iter()
                        .enumerate()
                        .map(|(index, node)| ($id::new(index), node))
                }
            )*
        }
    };
}

arena_accessors! {
    brokers: BrokerId => Broker, broker, brokers;
    databases: DatabaseId => Database, database, databases;
    rest_apis: RestApiId => RestApi, rest_api, rest_apis;
    topics: TopicId => Topic, topic, topics;
    endpoints: EndpointId => Endpoint, endpoint, endpoints;
    queries: QueryId => Query, query, queries;
    entities: EntityId => Entity, entity, entities;
    components: ComponentId => Component, component, components;
    conditions: ConditionId => Condition, condition, conditions;
    repetitions: RepetitionId => Repetition, repetition, repetitions;
    screens: ScreenId => Screen, screen, screens;
    roles: RoleId => Role, role, roles;
    users: UserId => User, user, users;
}

impl Model {
    #[must_use]
    pub const fn webpage(&self) -> Option<&Webpage> {
        self.webpage.as_ref()
    }

    #[must_use]
    pub const fn api(&self) -> Option<&Api> {
        self.api.as_ref()
    }

    #[must_use]
    pub const fn websocket(&self) -> Option<&Websocket> {
        self.websocket.as_ref()
    }

    /// Look up an entity by declared name, superseded entities included.
    #[must_use]
    pub fn entity_by_name(&self, name: &str) -> Option<(EntityId, &Entity)> {
        self.entities().find(|(_, entity)| entity.name == name)
    }

    #[must_use]
    pub fn component_by_name(&self, name: &str) -> Option<(ComponentId, &Component)> {
        self.components()
            .find(|(_, component)| component.name == name)
    }

    #[must_use]
    pub fn screen_by_name(&self, name: &str) -> Option<(ScreenId, &Screen)> {
        self.screens().find(|(_, screen)| screen.name == name)
    }
}
