use super::clock::Clock;
use super::options::{ProfileRadii, TrackOptions, TrackOptionsUpdate};
use super::ping::{Track, TrackPing};
use crate::feed::EntityBatch;
use crate::prelude::{EngineError, EngineResult, EntityId, DEFAULT_NUM_PREVIOUS_PINGS};
use crate::telemetry::LogManager;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Immutable view of every track and its options.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrackState {
    pub tracks: BTreeMap<EntityId, Track>,
    pub options: BTreeMap<EntityId, TrackOptions>,
}

impl TrackState {
    pub fn track(&self, id: EntityId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    pub fn options(&self, id: EntityId) -> Option<&TrackOptions> {
        self.options.get(&id)
    }
}

/// Owns the ping histories. Every mutation builds a new [`TrackState`] and
/// swaps it in, so a snapshot handed out earlier is never modified.
pub struct TrackStore {
    state: Arc<TrackState>,
    num_previous_pings: usize,
    clock: Arc<dyn Clock>,
    logger: LogManager,
}

impl TrackStore {
    pub fn new(num_previous_pings: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(TrackState::default()),
            num_previous_pings,
            clock,
            logger: LogManager::new("tracks"),
        }
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::new(DEFAULT_NUM_PREVIOUS_PINGS, clock)
    }

    pub fn snapshot(&self) -> Arc<TrackState> {
        Arc::clone(&self.state)
    }

    pub fn num_previous_pings(&self) -> usize {
        self.num_previous_pings
    }

    pub fn set_num_previous_pings(&mut self, num_previous_pings: usize) {
        self.num_previous_pings = num_previous_pings;
    }

    pub fn ingest(&mut self, batch: &EntityBatch) {
        let now = self.clock.now_millis();
        let max_len = self.num_previous_pings + 1;
        let mut next = (*self.state).clone();

        if batch.reset {
            next.tracks.clear();
        }
        for entity in batch.created.iter().filter(|e| e.is_trackable()) {
            next.tracks
                .insert(entity.id, Track::new(TrackPing::capture(entity, now)));
        }
        for entity in batch.updated.iter().filter(|e| e.is_trackable()) {
            next.tracks
                .entry(entity.id)
                .or_default()
                .push(TrackPing::capture(entity, now), max_len);
        }
        for id in &batch.deleted {
            next.tracks.remove(id);
            next.options.remove(id);
        }

        self.logger.trace(&format!(
            "offset {} -> {} tracks, {} deleted",
            batch.offset,
            next.tracks.len(),
            batch.deleted.len()
        ));
        self.state = Arc::new(next);
    }

    pub fn set_track_options(
        &mut self,
        entity_id: EntityId,
        update: &TrackOptionsUpdate,
    ) -> EngineResult<()> {
        if let Some(value) = update
            .explicit_radii()
            .find(|radius| !radius.is_finite() || *radius < 0.0)
        {
            return Err(EngineError::InvalidRadius { entity_id, value });
        }

        let mut next = (*self.state).clone();
        next.options.entry(entity_id).or_default().merge(update);
        self.state = Arc::new(next);
        Ok(())
    }

    /// Merges a recomputed profile radius map. Entities without options only
    /// get an entry when their profiles supply a radius.
    pub fn apply_profile_radii(&mut self, radii: &BTreeMap<EntityId, ProfileRadii>) {
        let mut next = (*self.state).clone();
        for (entity_id, derived) in radii {
            if derived.is_empty() && !next.options.contains_key(entity_id) {
                continue;
            }
            let options = next.options.entry(*entity_id).or_default();
            options.profile_threat_radius = derived.threat_radius;
            options.profile_warning_radius = derived.warning_radius;
        }
        self.state = Arc::new(next);
    }
}
