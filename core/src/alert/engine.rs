use super::cue::{AlertCue, LogCue};
use super::kind::{Alert, AlertKind};
use super::triggered::TriggeredEntities;
use crate::feed::{Entity, EntityStore, TYPE_AIR};
use crate::geo::distance;
use crate::prelude::EntityId;
use crate::telemetry::{LogManager, MetricsRecorder};
use crate::track::TrackState;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Every active alert, keyed by owning entity, plus the triggered multiset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertState {
    pub alerts: BTreeMap<EntityId, Vec<Alert>>,
    pub triggered_entities: TriggeredEntities,
}

impl AlertState {
    pub fn alerts_for(&self, owner: EntityId) -> &[Alert] {
        self.alerts.get(&owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Appends `alert` unless the owner already carries the same
    /// `(kind, target)` pair. Returns whether anything changed.
    fn upsert(&mut self, owner: EntityId, alert: Alert) -> bool {
        let list = self.alerts.entry(owner).or_default();
        if list.contains(&alert) {
            return false;
        }
        list.push(alert);
        self.triggered_entities.increment(alert.target_entity_id);
        true
    }
}

/// Alerts raised and cleared by one pass, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertPassSummary {
    pub raised: Vec<(EntityId, Alert)>,
    pub cleared: Vec<(EntityId, Alert)>,
}

impl AlertPassSummary {
    pub fn is_empty(&self) -> bool {
        self.raised.is_empty() && self.cleared.is_empty()
    }

    fn absorb(&mut self, other: AlertPassSummary) {
        self.raised.extend(other.raised);
        self.cleared.extend(other.cleared);
    }
}

pub struct AlertEngine {
    state: Arc<AlertState>,
    cue: Arc<dyn AlertCue>,
    metrics: Arc<MetricsRecorder>,
    logger: LogManager,
}

impl AlertEngine {
    pub fn new(cue: Arc<dyn AlertCue>, metrics: Arc<MetricsRecorder>) -> Self {
        Self {
            state: Arc::new(AlertState::default()),
            cue,
            metrics,
            logger: LogManager::new("alerts"),
        }
    }

    pub fn snapshot(&self) -> Arc<AlertState> {
        Arc::clone(&self.state)
    }

    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        Arc::clone(&self.metrics)
    }

    /// Clear pass followed by check pass.
    pub fn tick(&mut self, entities: &EntityStore, tracks: &TrackState) -> AlertPassSummary {
        let mut summary = self.clear_pass(entities, tracks);
        summary.absorb(self.check_pass(entities, tracks));
        summary
    }

    pub fn check_pass(&mut self, entities: &EntityStore, tracks: &TrackState) -> AlertPassSummary {
        let mut next = (*self.state).clone();
        let mut summary = AlertPassSummary::default();

        for (owner_id, options) in &tracks.options {
            // a parked or barely-tracked owner raises nothing
            let owner_moving = tracks.track(*owner_id).is_some_and(|t| t.is_moving());
            if !options.is_armed() || !owner_moving {
                continue;
            }
            let Some(owner) = entities.get(*owner_id) else {
                continue;
            };
            if !owner.has_type(TYPE_AIR) {
                continue;
            }

            for (target_id, target_track) in &tracks.tracks {
                if target_id == owner_id {
                    continue;
                }
                let Some(target) = entities.get(*target_id) else {
                    continue;
                };
                if !target.is_trackable()
                    || target.coalition() == owner.coalition()
                    || !target_track.is_visible()
                {
                    continue;
                }

                let range = floored_range(owner, target);
                for kind in AlertKind::ALL {
                    let Some(radius) = options.effective_radius(kind) else {
                        continue;
                    };
                    let alert = Alert::new(kind, *target_id);
                    if range <= radius && next.upsert(*owner_id, alert) {
                        summary.raised.push((*owner_id, alert));
                    }
                }
            }
        }

        self.commit(next, &summary);
        for (owner, alert) in &summary.raised {
            if alert.kind == AlertKind::Threat {
                self.cue.threat_raised(*owner, alert.target_entity_id);
            }
        }
        summary
    }

    pub fn clear_pass(&mut self, entities: &EntityStore, tracks: &TrackState) -> AlertPassSummary {
        let mut next = (*self.state).clone();
        let mut cleared = Vec::new();

        next.alerts.retain(|owner_id, alerts| {
            let owner = entities
                .get(*owner_id)
                .filter(|_| tracks.track(*owner_id).is_some_and(|t| t.is_moving()));
            let Some(owner) = owner else {
                cleared.extend(alerts.iter().map(|alert| (*owner_id, *alert)));
                return false;
            };

            let options = tracks.options.get(owner_id);
            alerts.retain(|alert| {
                let radius = options.and_then(|o| o.effective_radius(alert.kind));
                let target = entities.get(alert.target_entity_id);
                let holds = match (radius, target) {
                    (Some(radius), Some(target)) => floored_range(owner, target) <= radius,
                    _ => false,
                };
                if !holds {
                    cleared.push((*owner_id, *alert));
                }
                holds
            });
            !alerts.is_empty()
        });

        for (_, alert) in &cleared {
            next.triggered_entities.decrement(alert.target_entity_id);
        }

        let summary = AlertPassSummary {
            raised: Vec::new(),
            cleared,
        };
        self.commit(next, &summary);
        summary
    }

    /// Manual dismissal, outside the periodic cycle.
    pub fn delete_alert(&mut self, owner: EntityId, kind: AlertKind, target: EntityId) -> bool {
        let alert = Alert::new(kind, target);
        let Some(position) = self
            .state
            .alerts
            .get(&owner)
            .and_then(|alerts| alerts.iter().position(|a| *a == alert))
        else {
            return false;
        };

        let mut next = (*self.state).clone();
        if let Some(alerts) = next.alerts.get_mut(&owner) {
            alerts.remove(position);
            if alerts.is_empty() {
                next.alerts.remove(&owner);
            }
        }
        next.triggered_entities.decrement(target);

        let summary = AlertPassSummary {
            raised: Vec::new(),
            cleared: vec![(owner, alert)],
        };
        self.commit(next, &summary);
        true
    }

    fn commit(&mut self, next: AlertState, summary: &AlertPassSummary) {
        for (owner, alert) in &summary.raised {
            self.logger.record(&format!(
                "raised {} on {} for target {}",
                alert.kind, owner, alert.target_entity_id
            ));
        }
        for (owner, alert) in &summary.cleared {
            self.logger.trace(&format!(
                "cleared {} on {} for target {}",
                alert.kind, owner, alert.target_entity_id
            ));
        }
        self.metrics.record_raised(summary.raised.len());
        self.metrics.record_cleared(summary.cleared.len());
        self.state = Arc::new(next);
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new(Arc::new(LogCue::new()), Arc::new(MetricsRecorder::new()))
    }
}

fn floored_range(owner: &Entity, target: &Entity) -> f64 {
    distance(owner.position(), target.position()).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::EntityBatch;
    use crate::geo::LatLon;
    use crate::track::{Track, TrackOptions, TrackPing};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ALLY: EntityId = 1;
    const BANDIT: EntityId = 2;

    struct CountingCue(Arc<AtomicUsize>);

    impl AlertCue for CountingCue {
        fn threat_raised(&self, _owner: EntityId, _target: EntityId) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn engine() -> (AlertEngine, Arc<AtomicUsize>) {
        let beeps = Arc::new(AtomicUsize::new(0));
        let engine = AlertEngine::new(
            Arc::new(CountingCue(beeps.clone())),
            Arc::new(MetricsRecorder::new()),
        );
        (engine, beeps)
    }

    fn air(id: EntityId, coalition: &str, lat: f64) -> Entity {
        Entity {
            id,
            types: vec!["Air".into(), "FixedWing".into()],
            properties: BTreeMap::from([("Coalition".to_string(), coalition.to_string())]),
            latitude: lat,
            longitude: 0.0,
            altitude: 5_000.0,
            heading: 90.0,
            created_at: None,
            updated_at: None,
        }
    }

    // Three pings, two minutes, six NM: 180 kt.
    fn fast_track(lat: f64) -> Track {
        let ping = |secs: i64, lon: f64| TrackPing {
            time: secs * 1000,
            position: LatLon::new(lat, lon),
            altitude: 5_000.0,
            heading: 90.0,
        };
        Track::from_pings(vec![ping(120, 0.0), ping(60, -0.05), ping(0, -0.1)])
    }

    fn world(entities: Vec<Entity>) -> EntityStore {
        let mut store = EntityStore::new();
        store.apply(&EntityBatch {
            reset: true,
            created: entities,
            ..Default::default()
        });
        store
    }

    fn tracks(ids: &[(EntityId, f64)], armed: TrackOptions) -> TrackState {
        TrackState {
            tracks: ids.iter().map(|(id, lat)| (*id, fast_track(*lat))).collect(),
            options: BTreeMap::from([(ALLY, armed)]),
        }
    }

    fn radii(warning: Option<f64>, threat: Option<f64>) -> TrackOptions {
        TrackOptions {
            warning_radius: warning,
            threat_radius: threat,
            ..Default::default()
        }
    }

    #[test]
    fn warning_raised_inside_radius() {
        let (mut engine, beeps) = engine();
        let entities = world(vec![air(ALLY, "Allies", 0.0), air(BANDIT, "Enemies", 8.0 / 60.0)]);
        let state = tracks(&[(ALLY, 0.0), (BANDIT, 8.0 / 60.0)], radii(Some(10.0), None));

        let summary = engine.check_pass(&entities, &state);
        assert_eq!(summary.raised, vec![(ALLY, Alert::new(AlertKind::Warning, BANDIT))]);

        let alerts = engine.snapshot();
        assert_eq!(alerts.alerts_for(ALLY), &[Alert::new(AlertKind::Warning, BANDIT)]);
        assert_eq!(alerts.triggered_entities.count(BANDIT), 1);
        assert_eq!(beeps.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn repeated_checks_do_not_duplicate_or_rebeep() {
        let (mut engine, beeps) = engine();
        let entities = world(vec![air(ALLY, "Allies", 0.0), air(BANDIT, "Enemies", 0.05)]);
        let state = tracks(&[(ALLY, 0.0), (BANDIT, 0.05)], radii(Some(20.0), Some(5.0)));

        engine.check_pass(&entities, &state);
        let second = engine.check_pass(&entities, &state);

        assert!(second.raised.is_empty());
        let alerts = engine.snapshot();
        assert_eq!(alerts.alerts_for(ALLY).len(), 2);
        assert_eq!(alerts.triggered_entities.count(BANDIT), 2);
        assert_eq!(beeps.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn same_coalition_and_invisible_targets_are_ignored() {
        let (mut engine, _) = engine();
        let friendly = 3;
        let entities = world(vec![
            air(ALLY, "Allies", 0.0),
            air(friendly, "Allies", 0.01),
            air(BANDIT, "Enemies", 0.02),
        ]);
        let mut state = tracks(&[(ALLY, 0.0), (friendly, 0.01)], radii(Some(10.0), Some(10.0)));
        // bandit has only a single ping, so it is not a live contact yet
        state.tracks.insert(
            BANDIT,
            Track::new(TrackPing {
                time: 0,
                position: LatLon::new(0.02, 0.0),
                altitude: 0.0,
                heading: 0.0,
            }),
        );

        assert!(engine.check_pass(&entities, &state).is_empty());
        assert!(engine.snapshot().alerts.is_empty());
    }

    #[test]
    fn unarmed_or_untracked_owner_raises_nothing() {
        let (mut engine, _) = engine();
        let entities = world(vec![air(ALLY, "Allies", 0.0), air(BANDIT, "Enemies", 0.01)]);

        let unarmed = tracks(&[(ALLY, 0.0), (BANDIT, 0.01)], TrackOptions::default());
        assert!(engine.check_pass(&entities, &unarmed).is_empty());

        let untracked = tracks(&[(BANDIT, 0.01)], radii(Some(10.0), None));
        assert!(engine.check_pass(&entities, &untracked).is_empty());
    }

    #[test]
    fn alert_cleared_when_target_departs() {
        let (mut engine, _) = engine();
        let armed = radii(None, Some(10.0));
        let close = world(vec![air(ALLY, "Allies", 0.0), air(BANDIT, "Enemies", 8.0 / 60.0)]);
        engine.check_pass(&close, &tracks(&[(ALLY, 0.0), (BANDIT, 8.0 / 60.0)], armed.clone()));
        assert_eq!(engine.snapshot().triggered_entities.count(BANDIT), 1);

        let far = world(vec![air(ALLY, "Allies", 0.0), air(BANDIT, "Enemies", 12.0 / 60.0)]);
        let summary = engine.clear_pass(&far, &tracks(&[(ALLY, 0.0), (BANDIT, 12.0 / 60.0)], armed));

        assert_eq!(summary.cleared, vec![(ALLY, Alert::new(AlertKind::Threat, BANDIT))]);
        let alerts = engine.snapshot();
        assert!(alerts.alerts_for(ALLY).is_empty());
        assert!(!alerts.triggered_entities.contains(BANDIT));
    }

    #[test]
    fn owner_without_track_loses_every_alert() {
        let (mut engine, _) = engine();
        let entities = world(vec![air(ALLY, "Allies", 0.0), air(BANDIT, "Enemies", 0.01)]);
        engine.check_pass(
            &entities,
            &tracks(&[(ALLY, 0.0), (BANDIT, 0.01)], radii(Some(10.0), Some(10.0))),
        );

        let orphaned = TrackState {
            tracks: BTreeMap::from([(BANDIT, fast_track(0.01))]),
            options: BTreeMap::new(),
        };
        let summary = engine.clear_pass(&entities, &orphaned);
        assert_eq!(summary.cleared.len(), 2);
        let alerts = engine.snapshot();
        assert!(!alerts.alerts.contains_key(&ALLY));
        assert!(alerts.triggered_entities.is_empty());
    }

    #[test]
    fn parked_owner_drops_alerts_while_target_stays_close() {
        let (mut engine, _) = engine();
        let armed = radii(Some(10.0), None);
        let entities = world(vec![air(ALLY, "Allies", 0.0), air(BANDIT, "Enemies", 0.05)]);
        engine.check_pass(&entities, &tracks(&[(ALLY, 0.0), (BANDIT, 0.05)], armed.clone()));
        assert_eq!(engine.snapshot().alerts_for(ALLY).len(), 1);

        let parked = |secs: i64| TrackPing {
            time: secs * 1000,
            position: LatLon::new(0.0, 0.0),
            altitude: 5_000.0,
            heading: 90.0,
        };
        let mut state = tracks(&[(BANDIT, 0.05)], armed);
        state.tracks.insert(
            ALLY,
            Track::from_pings(vec![parked(180), parked(120), parked(60), parked(0)]),
        );
        assert_eq!(state.track(ALLY).map(|t| t.estimated_speed()), Some(0.0));

        let summary = engine.tick(&entities, &state);
        assert_eq!(summary.cleared, vec![(ALLY, Alert::new(AlertKind::Warning, BANDIT))]);
        assert!(summary.raised.is_empty());
        let alerts = engine.snapshot();
        assert!(!alerts.alerts.contains_key(&ALLY));
        assert!(alerts.triggered_entities.is_empty());
    }

    #[test]
    fn vanished_target_is_cleared() {
        let (mut engine, _) = engine();
        let armed = radii(Some(10.0), None);
        let entities = world(vec![air(ALLY, "Allies", 0.0), air(BANDIT, "Enemies", 0.01)]);
        engine.check_pass(&entities, &tracks(&[(ALLY, 0.0), (BANDIT, 0.01)], armed.clone()));

        let without_bandit = world(vec![air(ALLY, "Allies", 0.0)]);
        engine.clear_pass(&without_bandit, &tracks(&[(ALLY, 0.0)], armed));
        assert!(engine.snapshot().triggered_entities.is_empty());
    }

    #[test]
    fn delete_alert_dismisses_one_entry() {
        let (mut engine, _) = engine();
        let entities = world(vec![air(ALLY, "Allies", 0.0), air(BANDIT, "Enemies", 0.01)]);
        engine.check_pass(
            &entities,
            &tracks(&[(ALLY, 0.0), (BANDIT, 0.01)], radii(Some(10.0), Some(10.0))),
        );

        assert!(engine.delete_alert(ALLY, AlertKind::Warning, BANDIT));
        assert!(!engine.delete_alert(ALLY, AlertKind::Warning, BANDIT));

        let alerts = engine.snapshot();
        assert_eq!(alerts.alerts_for(ALLY), &[Alert::new(AlertKind::Threat, BANDIT)]);
        assert_eq!(alerts.triggered_entities.count(BANDIT), 1);
    }

    #[test]
    fn snapshot_held_by_reader_is_untouched_by_passes() {
        let (mut engine, _) = engine();
        let entities = world(vec![air(ALLY, "Allies", 0.0), air(BANDIT, "Enemies", 0.01)]);
        let before = engine.snapshot();
        engine.tick(
            &entities,
            &tracks(&[(ALLY, 0.0), (BANDIT, 0.01)], radii(Some(10.0), None)),
        );
        assert!(before.alerts.is_empty());
        assert_eq!(engine.snapshot().alerts_for(ALLY).len(), 1);
        assert_eq!(engine.metrics().snapshot().alerts_raised, 1);
    }
}
