use crate::workflow::config::{ScenarioConfig, ScenarioEntity};
use sneakercore::profile::Profile;
use sneakercore::EngineConfig;

fn aircraft(id: u64, name: &str, coalition: &str, latitude: f64, heading: f64) -> ScenarioEntity {
    ScenarioEntity {
        id,
        name: name.to_string(),
        coalition: coalition.to_string(),
        types: vec!["Air".to_string(), "FixedWing".to_string()],
        pilot: None,
        group: None,
        latitude,
        longitude: 42.0,
        altitude: 7_500.0,
        heading,
        speed_kts: 420.0,
        climb_mps: 0.0,
        labels: Vec::new(),
        warning_radius: None,
        threat_radius: None,
        lifetime_steps: None,
    }
}

/// Head-on intercept: a two-ship CAP against a bandit pair 45 NM north,
/// with ground and slow contacts that must never raise alerts.
pub fn intercept_scenario() -> ScenarioConfig {
    let mut lead = aircraft(1, "F-16C_50", "Allies", 42.0, 0.0);
    lead.pilot = Some("Viper 1-1".to_string());
    lead.group = Some("Viper 1".to_string());
    lead.labels = vec!["cap".to_string()];

    let mut wing = aircraft(2, "F-16C_50", "Allies", 41.98, 0.0);
    wing.longitude = 42.02;
    wing.pilot = Some("Viper 1-2".to_string());
    wing.group = Some("Viper 1".to_string());
    wing.threat_radius = Some(10.0);

    let bandit_lead = aircraft(11, "MiG-29A", "Enemies", 42.75, 180.0);
    let mut bandit_wing = aircraft(12, "MiG-29A", "Enemies", 42.77, 180.0);
    bandit_wing.longitude = 42.02;
    bandit_wing.climb_mps = -10.0;

    let mut helo = aircraft(13, "Mi-24P", "Enemies", 42.3, 90.0);
    helo.types = vec!["Air".to_string(), "Rotorcraft".to_string()];
    helo.speed_kts = 10.0;
    helo.altitude = 150.0;

    let mut chute = aircraft(14, "pilot_parachute", "Enemies", 42.2, 0.0);
    chute.types = vec!["Air".to_string(), "Parachutist".to_string()];
    chute.speed_kts = 8.0;
    chute.altitude = 1_200.0;
    chute.climb_mps = -5.0;
    chute.lifetime_steps = Some(60);

    let mut sam = aircraft(21, "SA-11 Buk LN 9A310M1", "Enemies", 42.4, 0.0);
    sam.types = vec!["Ground".to_string(), "AntiAircraft".to_string()];
    sam.speed_kts = 0.0;
    sam.altitude = 0.0;

    ScenarioConfig {
        engine: EngineConfig::default(),
        step_ms: 1_000,
        steps: 120,
        seed: 7,
        position_noise_m: 25.0,
        profiles: vec![Profile {
            name: "cap".to_string(),
            labels: vec!["cap".to_string()],
            default_threat_radius: Some(20.0),
            default_warning_radius: Some(40.0),
        }],
        entities: vec![lead, wing, bandit_lead, bandit_wing, helo, chute, sam],
    }
}
