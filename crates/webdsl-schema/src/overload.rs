//! Overload resolution.
//!
//! `Entity B overloads: A` makes `B` the canonical replacement for `A`. Each
//! overloading entity is built after its target so it can inherit the
//! target's `source`, `attributes`, `strict` and `interval` when it leaves
//! them unset; chains therefore inherit transitively. The superseded entity
//! stays in the arena with `superseded_by` set, and every entity handle held
//! by a component, condition or repetition is redirected to the end of its
//! overload chain.
//!
//! Nodes refer to entities only through handles, so the rewrite is a flat pass
//! over the handle-holding nodes; there is no object graph to traverse and no
//! visited set to keep.

use crate::{
    error::OverloadTargetError,
    link::{ConditionDraft, Linked, NodeRef, PendingEntity, RepetitionDraft},
    model::{EntityId, Model},
    node::{Component, Entity, EntityPath},
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;
use webdsl_syntax::SourceMap;

///
/// Redirects
/// Superseded entity → canonical entity, already followed to the chain's end.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Redirects(BTreeMap<EntityId, EntityId>);

impl Redirects {
    /// Canonical handle for `entity`; itself when it was never superseded.
    #[must_use]
    pub fn canonical(&self, entity: EntityId) -> EntityId {
        self.0.get(&entity).copied().unwrap_or(entity)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, EntityId)> + '_ {
        self.0.iter().map(|(from, to)| (*from, *to))
    }

    fn redirect(&self, entity: &mut EntityId) {
        *entity = self.canonical(*entity);
    }
}

///
/// RewriteEntityRefs
/// Implemented by every node that holds entity handles.
///

pub(crate) trait RewriteEntityRefs {
    fn rewrite_entity_refs(&mut self, redirects: &Redirects);
}

impl RewriteEntityRefs for Component {
    fn rewrite_entity_refs(&mut self, redirects: &Redirects) {
        if let Some(entity) = &mut self.entity {
            redirects.redirect(entity);
        }
    }
}

impl RewriteEntityRefs for EntityPath {
    fn rewrite_entity_refs(&mut self, redirects: &Redirects) {
        redirects.redirect(&mut self.entity);
    }
}

impl RewriteEntityRefs for ConditionDraft {
    fn rewrite_entity_refs(&mut self, redirects: &Redirects) {
        self.expr
            .for_each_path_mut(&mut |path| path.rewrite_entity_refs(redirects));
    }
}

impl RewriteEntityRefs for RepetitionDraft {
    fn rewrite_entity_refs(&mut self, redirects: &Redirects) {
        self.item.rewrite_entity_refs(redirects);
        for path in [&mut self.data, &mut self.data_else].into_iter().flatten() {
            path.rewrite_entity_refs(redirects);
        }
        if let Some(condition) = &mut self.condition {
            condition.for_each_path_mut(&mut |path| path.rewrite_entity_refs(redirects));
        }
    }
}

impl<T: RewriteEntityRefs> RewriteEntityRefs for [T] {
    fn rewrite_entity_refs(&mut self, redirects: &Redirects) {
        for node in self {
            node.rewrite_entity_refs(redirects);
        }
    }
}

///
/// Resolved
/// Linked model with final entities and every entity handle canonical.
///

#[derive(Debug)]
pub(crate) struct Resolved {
    pub model: Model,
    pub conditions: Vec<ConditionDraft>,
    pub repetitions: Vec<RepetitionDraft>,
    pub redirects: Redirects,
}

pub(crate) fn resolve_overloads(
    linked: Linked,
    sources: &SourceMap,
) -> Result<Resolved, OverloadTargetError> {
    let Linked {
        mut model,
        entities: pending,
        mut conditions,
        mut repetitions,
        namespace,
    } = linked;

    // targets[i] is the entity `i` overloads
    let mut targets: Vec<Option<EntityId>> = vec![None; pending.len()];
    let mut overloaders: BTreeMap<EntityId, EntityId> = BTreeMap::new();

    for (index, entity) in pending.iter().enumerate() {
        let Some(target_name) = &entity.overloads else {
            continue;
        };
        let location = sources.location(target_name.span);

        let target = match namespace.get(target_name.as_str()).map(|r| r.node) {
            Some(NodeRef::Entity(target)) => target,
            Some(other) => {
                return Err(OverloadTargetError::NotEntity {
                    entity: entity.name.clone(),
                    target: target_name.name.clone(),
                    found: other.description(),
                    location,
                });
            }
            None => {
                return Err(OverloadTargetError::NotFound {
                    entity: entity.name.clone(),
                    target: target_name.name.clone(),
                    location,
                });
            }
        };

        let id = EntityId::new(index);
        if let Some(first) = overloaders.insert(target, id) {
            return Err(OverloadTargetError::Conflict {
                target: pending[target.index()].name.clone(),
                first: pending[first.index()].name.clone(),
                second: entity.name.clone(),
                location,
            });
        }
        targets[index] = Some(target);
    }

    check_cycles(&pending, &targets)?;

    let entities = build_entities(pending, &targets);
    let redirects = redirects(&entities);
    debug!(
        overloads = overloaders.len(),
        redirects = redirects.len(),
        "resolved entity overloads"
    );

    model.entities = entities;
    model.components.rewrite_entity_refs(&redirects);
    conditions.rewrite_entity_refs(&redirects);
    repetitions.rewrite_entity_refs(&redirects);

    Ok(Resolved {
        model,
        conditions,
        repetitions,
        redirects,
    })
}

// check_cycles
// every entity has at most one target, so a cycle is found by walking from
// each entity; the first entity reported is the cycle's lowest handle
fn check_cycles(
    pending: &[PendingEntity],
    targets: &[Option<EntityId>],
) -> Result<(), OverloadTargetError> {
    for start in 0..pending.len() {
        let mut chain = vec![start];
        let mut current = start;

        while let Some(next) = targets[current].map(EntityId::index) {
            if next == start {
                chain.push(start);
                return Err(OverloadTargetError::Cycle {
                    entities: chain.iter().map(|&i| pending[i].name.clone()).collect(),
                    location: pending[start].location.clone(),
                });
            }
            if chain.contains(&next) || chain.len() > pending.len() {
                // a cycle further down the chain, reported from its own start
                break;
            }
            chain.push(next);
            current = next;
        }
    }

    Ok(())
}

// build_entities
// targets are built before the entities that overload them
fn build_entities(pending: Vec<PendingEntity>, targets: &[Option<EntityId>]) -> Vec<Entity> {
    let mut built: Vec<Option<Entity>> = vec![None; pending.len()];

    for start in 0..pending.len() {
        // walk up to the first ancestor already built (or the chain's root)
        let mut chain = vec![start];
        while let Some(target) = targets[chain[chain.len() - 1]] {
            if built[target.index()].is_some() {
                break;
            }
            chain.push(target.index());
        }

        for &index in chain.iter().rev() {
            if built[index].is_some() {
                continue;
            }
            let target = targets[index];
            let inherited = target.and_then(|t| built[t.index()].as_ref());
            built[index] = Some(build_entity(&pending[index], target, inherited));
        }
    }

    let mut entities: Vec<Entity> = built.into_iter().flatten().collect();
    for index in 0..entities.len() {
        if let Some(target) = entities[index].overloads {
            entities[target.index()].superseded_by = Some(EntityId::new(index));
        }
    }

    entities
}

fn build_entity(
    pending: &PendingEntity,
    overloads: Option<EntityId>,
    inherited: Option<&Entity>,
) -> Entity {
    Entity {
        name: pending.name.clone(),
        description: pending.description.clone(),
        attributes: pending
            .attributes
            .clone()
            .or_else(|| inherited.map(|e| e.attributes.clone()))
            .unwrap_or_default(),
        strict: pending
            .strict
            .or_else(|| inherited.map(|e| e.strict))
            .unwrap_or_default(),
        interval: pending
            .interval
            .or_else(|| inherited.map(|e| e.interval))
            .unwrap_or_default(),
        source: pending
            .source
            .or_else(|| inherited.map(|e| e.source))
            .unwrap_or_default(),
        overloads,
        superseded_by: None,
        location: pending.location.clone(),
    }
}

// redirects
// superseded entity → last entity of its overload chain
fn redirects(entities: &[Entity]) -> Redirects {
    let mut map = BTreeMap::new();

    for (index, entity) in entities.iter().enumerate() {
        let Some(mut canonical) = entity.superseded_by else {
            continue;
        };
        while let Some(next) = entities[canonical.index()].superseded_by {
            canonical = next;
        }
        map.insert(EntityId::new(index), canonical);
    }

    Redirects(map)
}
