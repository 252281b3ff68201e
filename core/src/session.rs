//! Owned state for one server session.
//!
//! `Session` is the single writer for the entity, track, profile and alert
//! stores. Readers take `Arc` snapshots, which later writes never touch.

use crate::alert::{AlertCue, AlertEngine, AlertKind, AlertPassSummary, AlertState, LogCue};
use crate::feed::{EntityBatch, EntityStore, SessionEvent};
use crate::prelude::{EngineConfig, EngineResult, EntityId};
use crate::profile::{EntityLabels, Profile, ProfileStore, ProfileUpdate};
use crate::schedule::PeriodicTask;
use crate::telemetry::{LogManager, MetricsRecorder};
use crate::track::{Clock, TrackOptionsUpdate, TrackState, TrackStore};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

pub type SharedSession = Arc<RwLock<Session>>;

pub struct Session {
    config: EngineConfig,
    entities: EntityStore,
    tracks: TrackStore,
    profiles: ProfileStore,
    labels: EntityLabels,
    alerts: AlertEngine,
    logger: LogManager,
}

impl Session {
    pub fn new(config: EngineConfig, clock: Arc<dyn Clock>, cue: Arc<dyn AlertCue>) -> Self {
        Self {
            tracks: TrackStore::new(config.num_previous_pings, clock),
            alerts: AlertEngine::new(cue, Arc::new(MetricsRecorder::new())),
            config,
            entities: EntityStore::new(),
            profiles: ProfileStore::new(),
            labels: EntityLabels::new(),
            logger: LogManager::new("session"),
        }
    }

    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(config, clock, Arc::new(LogCue::new()))
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Applies one feed event and returns its server offset.
    pub fn apply_event(&mut self, event: SessionEvent) -> f64 {
        if let SessionEvent::State { session_id, .. } = &event {
            self.logger.record(&format!("session state for {}", session_id));
        }
        let offset = event.offset();
        self.apply_batch(event.into_batch());
        offset
    }

    pub fn apply_batch(&mut self, batch: EntityBatch) {
        self.entities.apply(&batch);
        self.tracks.ingest(&batch);
        if batch.reset || !batch.created.is_empty() {
            self.refresh_profile_radii();
        }
    }

    pub fn set_track_options(
        &mut self,
        entity_id: EntityId,
        update: &TrackOptionsUpdate,
    ) -> EngineResult<()> {
        self.tracks.set_track_options(entity_id, update)
    }

    pub fn push_label(&mut self, entity_id: EntityId, label: &str) -> bool {
        let changed = self.labels.push_label(entity_id, label);
        if changed {
            self.refresh_profile_radii();
        }
        changed
    }

    pub fn pop_label(&mut self, entity_id: EntityId, label: &str) -> bool {
        let changed = self.labels.pop_label(entity_id, label);
        if changed {
            self.refresh_profile_radii();
        }
        changed
    }

    pub fn add_profile(&mut self, name: &str) -> bool {
        self.profiles.add_profile(name)
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> EngineResult<()> {
        self.profiles.update_profile(update)?;
        self.refresh_profile_radii();
        Ok(())
    }

    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        let removed = self.profiles.remove_profile(name);
        if removed.is_some() {
            self.refresh_profile_radii();
        }
        removed
    }

    pub fn set_profiles(&mut self, profiles: impl IntoIterator<Item = Profile>) {
        self.profiles = ProfileStore::from_profiles(profiles);
        self.refresh_profile_radii();
    }

    // Labels outlive deletion; only entities still in the world get radii.
    fn refresh_profile_radii(&mut self) {
        let mut radii = self.profiles.resolve_all(&self.labels);
        radii.retain(|entity_id, _| self.entities.get(*entity_id).is_some());
        self.tracks.apply_profile_radii(&radii);
    }

    /// One alert tick: clear pass, then check pass.
    pub fn run_alert_pass(&mut self) -> AlertPassSummary {
        let tracks = self.tracks.snapshot();
        self.alerts.tick(&self.entities, &tracks)
    }

    pub fn delete_alert(&mut self, owner: EntityId, kind: AlertKind, target: EntityId) -> bool {
        self.alerts.delete_alert(owner, kind, target)
    }

    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    pub fn tracks(&self) -> Arc<TrackState> {
        self.tracks.snapshot()
    }

    pub fn alerts(&self) -> Arc<AlertState> {
        self.alerts.snapshot()
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    pub fn labels(&self) -> &EntityLabels {
        &self.labels
    }

    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        self.alerts.metrics()
    }
}

/// Starts the recurring alert tick for a shared session.
pub fn spawn_alert_loop(session: &SharedSession) -> PeriodicTask {
    let (config, metrics) = {
        let guard = session.read().unwrap_or_else(PoisonError::into_inner);
        (guard.config().clone(), guard.metrics())
    };
    let shared = Arc::clone(session);

    PeriodicTask::spawn(
        "alert-loop",
        Duration::from_millis(config.alert_startup_delay_ms),
        Duration::from_millis(config.alert_interval_ms),
        metrics,
        move || {
            let mut guard = shared.write().unwrap_or_else(PoisonError::into_inner);
            guard.run_alert_pass();
            Ok(())
        },
    )
}
