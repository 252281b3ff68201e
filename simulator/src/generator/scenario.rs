use crate::workflow::config::{ScenarioConfig, ScenarioEntity};
use rand::{rngs::StdRng, Rng, SeedableRng};
use sneakercore::feed::{Entity, SessionEvent};
use sneakercore::geo::{destination_point, project, LatLon};
use sneakercore::EntityId;

struct Actor {
    spec: ScenarioEntity,
    position: LatLon,
    altitude: f64,
    alive: bool,
}

/// Dead-reckons scripted entities and emits feed events, one per step.
pub struct ScenarioGenerator {
    rng: StdRng,
    actors: Vec<Actor>,
    session_id: String,
    step: u32,
    step_ms: u64,
    noise_m: f64,
}

impl ScenarioGenerator {
    pub fn new(config: &ScenarioConfig) -> Self {
        let actors = config
            .entities
            .iter()
            .map(|spec| Actor {
                position: LatLon::new(spec.latitude, spec.longitude),
                altitude: spec.altitude,
                spec: spec.clone(),
                alive: true,
            })
            .collect();

        Self {
            rng: StdRng::seed_from_u64(config.seed),
            actors,
            session_id: format!("sim-{}", config.seed),
            step: 0,
            step_ms: config.step_ms.max(1),
            noise_m: config.position_noise_m.max(0.0),
        }
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn offset(&self) -> f64 {
        self.step as f64 * self.step_ms as f64 / 1000.0
    }

    pub fn initial_event(&mut self) -> SessionEvent {
        let alive: Vec<usize> = (0..self.actors.len())
            .filter(|idx| self.actors[*idx].alive)
            .collect();
        let objects = alive.into_iter().map(|idx| self.observe(idx)).collect();
        SessionEvent::State {
            session_id: self.session_id.clone(),
            offset: self.offset(),
            objects: Some(objects),
        }
    }

    pub fn advance(&mut self) -> SessionEvent {
        self.step += 1;
        let seconds = self.step_ms as f64 / 1000.0;
        let mut updated = Vec::new();
        let mut deleted: Vec<EntityId> = Vec::new();

        for idx in 0..self.actors.len() {
            let step = self.step;
            let actor = &mut self.actors[idx];
            if !actor.alive {
                continue;
            }
            if actor.spec.lifetime_steps.is_some_and(|limit| step > limit) {
                actor.alive = false;
                deleted.push(actor.spec.id);
                continue;
            }
            actor.position = project(actor.position, actor.spec.heading, actor.spec.speed_kts, seconds);
            actor.altitude = (actor.altitude + actor.spec.climb_mps * seconds).max(0.0);
            updated.push(self.observe(idx));
        }

        SessionEvent::RadarSnapshot {
            offset: self.offset(),
            created: Vec::new(),
            updated,
            deleted,
        }
    }

    // Reported position scattered within the noise radius of the true one.
    fn observe(&mut self, idx: usize) -> Entity {
        let (position, altitude) = {
            let actor = &self.actors[idx];
            (actor.position, actor.altitude)
        };
        let reported = if self.noise_m > 0.0 {
            let bearing = self.rng.gen_range(0.0..360.0);
            let range = self.rng.gen_range(0.0..self.noise_m);
            destination_point(position.lat, position.lon, bearing, range)
        } else {
            position
        };
        self.actors[idx]
            .spec
            .to_entity(reported.lat, reported.lon, altitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::template::intercept_scenario;
    use sneakercore::geo::distance;

    #[test]
    fn initial_event_lists_every_entity() {
        let cfg = intercept_scenario();
        let mut generator = ScenarioGenerator::new(&cfg);
        match generator.initial_event() {
            SessionEvent::State { objects, offset, .. } => {
                assert_eq!(objects.map(|o| o.len()), Some(cfg.entities.len()));
                assert_eq!(offset, 0.0);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn advance_moves_entities_at_their_speed() {
        let mut cfg = intercept_scenario();
        cfg.position_noise_m = 0.0;
        cfg.step_ms = 60_000;
        let mut generator = ScenarioGenerator::new(&cfg);

        let SessionEvent::RadarSnapshot { updated, offset, .. } = generator.advance() else {
            panic!("expected radar snapshot");
        };
        assert_eq!(offset, 60.0);
        let lead = updated.iter().find(|e| e.id == 1).unwrap();
        let moved = distance(LatLon::new(42.0, 42.0), lead.position());
        // 420 kt for one minute
        assert!((moved - 7.0).abs() < 0.1, "moved {moved}");
    }

    #[test]
    fn expired_entities_are_deleted_once() {
        let mut cfg = intercept_scenario();
        for entity in &mut cfg.entities {
            entity.lifetime_steps = Some(1);
        }
        let mut generator = ScenarioGenerator::new(&cfg);
        generator.advance();

        let SessionEvent::RadarSnapshot { updated, deleted, .. } = generator.advance() else {
            panic!("expected radar snapshot");
        };
        assert!(updated.is_empty());
        assert_eq!(deleted.len(), cfg.entities.len());

        let SessionEvent::RadarSnapshot { deleted, .. } = generator.advance() else {
            panic!("expected radar snapshot");
        };
        assert!(deleted.is_empty());
    }

    #[test]
    fn same_seed_produces_same_feed() {
        let cfg = intercept_scenario();
        let mut a = ScenarioGenerator::new(&cfg);
        let mut b = ScenarioGenerator::new(&cfg);
        assert_eq!(a.advance(), b.advance());
    }
}
