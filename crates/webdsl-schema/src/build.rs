//! The model build pipeline: load, link, resolve overloads, compile,
//! aggregate and validate.

use crate::{
    aggregate::{Aggregated, aggregate},
    compile::compile,
    error::Error,
    link::link,
    load::{FsLoader, SourceLoader, load_repository},
    model::{ComponentId, EntityId, Model, ScreenId},
    node::{Api, Component, Entity, Screen, ScreenElement, SourceRef, Webpage, Websocket},
    overload::{Redirects, Resolved, resolve_overloads},
    validate::validate_model,
};
use serde::Serialize;
use std::{collections::BTreeSet, path::Path};
use tracing::{debug, info, warn};
use webdsl_config::BuildConfig;

///
/// Builder
///

pub struct Builder<'a> {
    loader: &'a dyn SourceLoader,
    config: BuildConfig,
}

impl<'a> Builder<'a> {
    #[must_use]
    pub fn new(loader: &'a dyn SourceLoader) -> Self {
        Self {
            loader,
            config: BuildConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build a fresh model from `root`; nothing is shared between builds.
    pub fn build(&self, root: impl AsRef<Path>) -> Result<ResolvedModel, Error> {
        let root = root.as_ref();
        info!(root = %root.display(), "building model");

        let repo = load_repository(root, self.loader, &self.config.imports)?;
        debug!(files = repo.files.len(), "loaded repository");

        let linked = link(&repo)?;
        debug!(
            entities = linked.entities.len(),
            components = linked.model.components.len(),
            screens = linked.model.screens.len(),
            conditions = linked.conditions.len(),
            repetitions = linked.repetitions.len(),
            "linked repository"
        );

        let Resolved {
            mut model,
            conditions,
            repetitions,
            redirects,
        } = resolve_overloads(linked, &repo.sources)?;

        compile(&mut model, conditions, repetitions);
        let aggregated = aggregate(&model, &self.config.overload);

        if let Err(violations) = validate_model(&model) {
            warn!(violations = violations.len(), "model validation failed");
            return Err(violations.into());
        }

        info!(
            entities = aggregated.entities.len(),
            components = aggregated.components.len(),
            screens = aggregated.screens.len(),
            "model built"
        );

        Ok(ResolvedModel {
            model,
            aggregated,
            redirects,
        })
    }
}

/// Build `root` from the filesystem with default configuration.
pub fn build_model(root: impl AsRef<Path>) -> Result<ResolvedModel, Error> {
    Builder::new(&FsLoader).build(root)
}

///
/// ResolvedModel
///
/// Linked, overload-resolved, compiled and validated model. Read-only: every
/// accessor borrows, and nothing hands out mutable access.
///

#[derive(Debug, Serialize)]
pub struct ResolvedModel {
    model: Model,
    aggregated: Aggregated,
    redirects: Redirects,
}

impl ResolvedModel {
    #[must_use]
    pub const fn model(&self) -> &Model {
        &self.model
    }

    #[must_use]
    pub const fn aggregated(&self) -> &Aggregated {
        &self.aggregated
    }

    #[must_use]
    pub const fn redirects(&self) -> &Redirects {
        &self.redirects
    }

    #[must_use]
    pub const fn webpage(&self) -> Option<&Webpage> {
        self.model.webpage()
    }

    #[must_use]
    pub const fn api(&self) -> Option<&Api> {
        self.model.api()
    }

    #[must_use]
    pub const fn websocket(&self) -> Option<&Websocket> {
        self.model.websocket()
    }

    /// Aggregated entities in declaration order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.aggregated
            .entities
            .iter()
            .map(|&id| (id, self.model.entity(id)))
    }

    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &Component)> + '_ {
        self.aggregated
            .components
            .iter()
            .map(|&id| (id, self.model.component(id)))
    }

    pub fn screens(&self) -> impl Iterator<Item = (ScreenId, &Screen)> + '_ {
        self.aggregated
            .screens
            .iter()
            .map(|&id| (id, self.model.screen(id)))
    }

    /// Canonical entity for a declared name, following overloads.
    #[must_use]
    pub fn canonical(&self, name: &str) -> Option<(EntityId, &Entity)> {
        let (id, _) = self.model.entity_by_name(name)?;
        let id = self.redirects.canonical(id);

        Some((id, self.model.entity(id)))
    }

    /// Every entity a screen reads: bound components (inline or referenced),
    /// plus the entities of its conditions and repetitions and of the
    /// components they show.
    #[must_use]
    pub fn screen_entities(&self, screen: ScreenId) -> BTreeSet<EntityId> {
        let mut entities = BTreeSet::new();
        let component_entity = |id: ComponentId| self.model.component(id).entity;

        self.model.screen(screen).walk(&mut |element| match element {
            ScreenElement::Component(id) => entities.extend(component_entity(*id)),
            ScreenElement::Condition(id) => {
                let condition = self.model.condition(*id);
                entities.extend(condition.referenced_entities.iter().copied());
                entities.extend(component_entity(condition.then));
                for &other in &condition.otherwise {
                    entities.extend(component_entity(other));
                }
            }
            ScreenElement::Repetition(id) => {
                let repetition = self.model.repetition(*id);
                entities.extend(repetition.referenced_entities.iter().copied());
                entities.extend(component_entity(repetition.component));
                entities.extend(repetition.otherwise.and_then(component_entity));
            }
            ScreenElement::Row(_) | ScreenElement::Column(_) => {}
        });

        entities
    }

    /// One subscription descriptor per distinct (topic, broker) pair among
    /// broker-sourced entities; the first entity declared for a pair wins.
    #[must_use]
    pub fn topic_configs(&self) -> Vec<TopicConfig> {
        let mut seen = BTreeSet::new();
        let mut configs = Vec::new();

        for (_, entity) in self.entities() {
            let SourceRef::BrokerTopic(topic_id) = entity.source else {
                continue;
            };
            let topic = self.model.topic(topic_id);
            let broker = self.model.broker(topic.connection);
            if !seen.insert((topic.topic.clone(), broker.name.clone())) {
                continue;
            }

            configs.push(TopicConfig {
                entity: entity.name.clone(),
                topic: topic.topic.clone(),
                broker: broker.name.clone(),
                attributes: entity.attribute_names().map(str::to_string).collect(),
                strict: entity.strict,
                allowed_roles: topic
                    .allowed_roles
                    .iter()
                    .map(|&role| self.model.role(role).name.clone())
                    .collect(),
            });
        }

        configs
    }
}

///
/// TopicConfig
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicConfig {
    pub entity: String,
    pub topic: String,
    pub broker: String,
    pub attributes: Vec<String>,
    pub strict: bool,
    pub allowed_roles: Vec<String>,
}
