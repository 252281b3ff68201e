use anyhow::Context;
use serde::{Deserialize, Serialize};
use sneakercore::feed::Entity;
use sneakercore::profile::Profile;
use sneakercore::{EngineConfig, EntityId};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// One scripted object in a scenario.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScenarioEntity {
    pub id: EntityId,
    pub name: String,
    pub coalition: String,
    #[serde(default = "default_types")]
    pub types: Vec<String>,
    #[serde(default)]
    pub pilot: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Metres.
    #[serde(default)]
    pub altitude: f64,
    #[serde(default)]
    pub heading: f64,
    #[serde(default)]
    pub speed_kts: f64,
    /// Metres per second, positive up.
    #[serde(default)]
    pub climb_mps: f64,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub warning_radius: Option<f64>,
    #[serde(default)]
    pub threat_radius: Option<f64>,
    /// Removed from the feed after this many steps.
    #[serde(default)]
    pub lifetime_steps: Option<u32>,
}

fn default_types() -> Vec<String> {
    vec!["Air".to_string(), "FixedWing".to_string()]
}

impl ScenarioEntity {
    pub fn to_entity(&self, latitude: f64, longitude: f64, altitude: f64) -> Entity {
        let mut properties = BTreeMap::from([
            ("Coalition".to_string(), self.coalition.clone()),
            ("Name".to_string(), self.name.clone()),
        ]);
        if let Some(pilot) = &self.pilot {
            properties.insert("Pilot".to_string(), pilot.clone());
        }
        if let Some(group) = &self.group {
            properties.insert("Group".to_string(), group.clone());
        }

        Entity {
            id: self.id,
            types: self.types.clone(),
            properties,
            latitude,
            longitude,
            altitude,
            heading: self.heading,
            created_at: None,
            updated_at: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    /// Feed period in milliseconds.
    #[serde(default = "default_step_ms")]
    pub step_ms: u64,
    #[serde(default = "default_steps")]
    pub steps: u32,
    #[serde(default)]
    pub seed: u64,
    /// Radius of the random scatter applied to reported positions.
    #[serde(default)]
    pub position_noise_m: f64,
    #[serde(default)]
    pub profiles: Vec<Profile>,
    pub entities: Vec<ScenarioEntity>,
}

fn default_step_ms() -> u64 {
    1_000
}

fn default_steps() -> u32 {
    120
}

impl ScenarioConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading scenario {}", path_ref.display()))?;
        let config: ScenarioConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing scenario {}", path_ref.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.step_ms > 0, "step_ms must be positive");
        let mut seen = std::collections::BTreeSet::new();
        for entity in &self.entities {
            anyhow::ensure!(seen.insert(entity.id), "duplicate entity id {}", entity.id);
        }
        Ok(())
    }

    /// Applies command-line overrides on top of a loaded or built-in scenario.
    pub fn with_overrides(
        mut self,
        num_previous_pings: Option<usize>,
        steps: Option<u32>,
        seed: Option<u64>,
    ) -> Self {
        if let Some(pings) = num_previous_pings {
            self.engine.num_previous_pings = pings;
        }
        if let Some(steps) = steps {
            self.steps = steps;
        }
        if let Some(seed) = seed {
            self.seed = seed;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SCENARIO: &str = r#"
step_ms: 2000
seed: 3
engine:
  num_previous_pings: 8
profiles:
  - name: cap
    labels: [cap]
    default_warning_radius: 40
entities:
  - id: 1
    name: F-15C
    coalition: Allies
    latitude: 42.0
    longitude: 41.0
    speed_kts: 400
    labels: [cap]
  - id: 2
    name: SA-11
    coalition: Enemies
    types: [Ground, SAM]
    latitude: 42.5
    longitude: 41.5
"#;

    #[test]
    fn scenario_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(SCENARIO.as_bytes()).unwrap();
        let path = temp.into_temp_path();
        let cfg = ScenarioConfig::load(&path).unwrap();

        assert_eq!(cfg.step_ms, 2000);
        assert_eq!(cfg.steps, 120);
        assert_eq!(cfg.engine.num_previous_pings, 8);
        assert_eq!(cfg.engine.alert_interval_ms, 1_000);
        assert_eq!(cfg.entities[0].types, vec!["Air", "FixedWing"]);
        assert_eq!(cfg.entities[1].types, vec!["Ground", "SAM"]);
        assert_eq!(cfg.profiles[0].default_warning_radius, Some(40.0));
    }

    #[test]
    fn scenario_rejects_duplicate_ids() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(SCENARIO.replace("id: 2", "id: 1").as_bytes())
            .unwrap();
        let path = temp.into_temp_path();
        assert!(ScenarioConfig::load(&path).is_err());
    }

    #[test]
    fn overrides_replace_loaded_values() {
        let cfg: ScenarioConfig = serde_yaml::from_str(SCENARIO).unwrap();
        let cfg = cfg.with_overrides(Some(4), Some(10), None);
        assert_eq!(cfg.engine.num_previous_pings, 4);
        assert_eq!(cfg.steps, 10);
        assert_eq!(cfg.seed, 3);
    }

    #[test]
    fn scenario_entity_carries_properties() {
        let cfg: ScenarioConfig = serde_yaml::from_str(SCENARIO).unwrap();
        let entity = cfg.entities[0].to_entity(1.0, 2.0, 3.0);
        assert_eq!(entity.name(), Some("F-15C"));
        assert!(entity.is_trackable());
        assert_eq!(entity.altitude, 3.0);
    }
}
