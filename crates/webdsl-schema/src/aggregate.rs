//! Flattened per-kind listings for artifact emitters.
//!
//! Every sequence is in repository declaration order. Aggregation runs after
//! overload resolution, so it reads canonical entities directly; superseded
//! entities are left out unless `retain_superseded` asks for them.

use crate::model::{
    BrokerId, ComponentId, DatabaseId, EndpointId, EntityId, Model, QueryId, RestApiId, RoleId,
    ScreenId, TopicId, UserId,
};
use serde::Serialize;
use webdsl_config::OverloadConfig;

///
/// Aggregated
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregated {
    pub entities: Vec<EntityId>,
    pub components: Vec<ComponentId>,
    pub screens: Vec<ScreenId>,
    pub brokers: Vec<BrokerId>,
    pub databases: Vec<DatabaseId>,
    pub rest_apis: Vec<RestApiId>,
    pub rest_endpoints: Vec<EndpointId>,
    pub broker_topics: Vec<TopicId>,
    pub queries: Vec<QueryId>,
    pub roles: Vec<RoleId>,
    pub users: Vec<UserId>,
}

pub(crate) fn aggregate(model: &Model, config: &OverloadConfig) -> Aggregated {
    fn ids<I, N>(iter: impl Iterator<Item = (I, N)>) -> Vec<I> {
        iter.map(|(id, _)| id).collect()
    }

    Aggregated {
        entities: model
            .entities()
            .filter(|(_, entity)| config.retain_superseded || !entity.is_superseded())
            .map(|(id, _)| id)
            .collect(),
        components: ids(model.components()),
        screens: ids(model.screens()),
        brokers: ids(model.brokers()),
        databases: ids(model.databases()),
        rest_apis: ids(model.rest_apis()),
        rest_endpoints: ids(model.endpoints()),
        broker_topics: ids(model.topics()),
        queries: ids(model.queries()),
        roles: ids(model.roles()),
        users: ids(model.users()),
    }
}
