use crate::prelude::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// User-assigned labels per entity, matched against profile labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityLabels {
    entities: BTreeMap<EntityId, BTreeSet<String>>,
}

impl EntityLabels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the label was already present.
    pub fn push_label(&mut self, entity_id: EntityId, label: impl Into<String>) -> bool {
        self.entities.entry(entity_id).or_default().insert(label.into())
    }

    pub fn pop_label(&mut self, entity_id: EntityId, label: &str) -> bool {
        self.entities
            .get_mut(&entity_id)
            .map(|labels| labels.remove(label))
            .unwrap_or(false)
    }

    pub fn labels(&self, entity_id: EntityId) -> Option<&BTreeSet<String>> {
        self.entities.get(&entity_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &BTreeSet<String>)> {
        self.entities.iter().map(|(id, labels)| (*id, labels))
    }
}
