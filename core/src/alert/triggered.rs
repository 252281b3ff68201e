use crate::prelude::EntityId;
use log::error;
use serde::Serialize;
use std::collections::BTreeMap;

/// Reference counts of entities currently targeted by at least one alert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TriggeredEntities {
    counts: BTreeMap<EntityId, u32>,
}

impl TriggeredEntities {
    pub fn increment(&mut self, id: EntityId) {
        *self.counts.entry(id).or_insert(0) += 1;
    }

    /// Returns false, and logs, when `id` had no outstanding count. That only
    /// happens when increments and decrements are mispaired.
    pub fn decrement(&mut self, id: EntityId) -> bool {
        match self.counts.get_mut(&id) {
            None => {
                error!("decrement for non-stored triggered entity {}", id);
                false
            }
            Some(count) if *count <= 1 => {
                self.counts.remove(&id);
                true
            }
            Some(count) => {
                *count -= 1;
                true
            }
        }
    }

    pub fn count(&self, id: EntityId) -> u32 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.counts.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, u32)> + '_ {
        self.counts.iter().map(|(id, count)| (*id, *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_up_and_removes_at_zero() {
        let mut triggered = TriggeredEntities::default();
        triggered.increment(7);
        triggered.increment(7);
        assert_eq!(triggered.count(7), 2);

        assert!(triggered.decrement(7));
        assert_eq!(triggered.count(7), 1);
        assert!(triggered.decrement(7));
        assert!(!triggered.contains(7));
        assert!(triggered.is_empty());
    }

    #[test]
    fn underflow_is_reported_and_ignored() {
        let mut triggered = TriggeredEntities::default();
        triggered.increment(1);
        assert!(!triggered.decrement(2));
        assert_eq!(triggered.count(1), 1);
        assert_eq!(triggered.len(), 1);
    }
}
