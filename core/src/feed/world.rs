use super::entity::Entity;
use super::event::EntityBatch;
use crate::prelude::EntityId;
use std::collections::BTreeMap;

/// Latest known snapshot of every object in the session.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: BTreeMap<EntityId, Entity>,
    offset: f64,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, batch: &EntityBatch) {
        if batch.reset {
            self.entities.clear();
        }
        for entity in batch.created.iter().chain(batch.updated.iter()) {
            self.entities.insert(entity.id, entity.clone());
        }
        for id in &batch.deleted {
            self.entities.remove(id);
        }
        self.offset = batch.offset;
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Server offset of the last applied batch.
    pub fn offset(&self) -> f64 {
        self.offset
    }
}
