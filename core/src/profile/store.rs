use super::labels::EntityLabels;
use crate::prelude::{EngineError, EngineResult, EntityId};
use crate::track::ProfileRadii;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub default_threat_radius: Option<f64>,
    #[serde(default)]
    pub default_warning_radius: Option<f64>,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: Vec::new(),
            default_threat_radius: None,
            default_warning_radius: None,
        }
    }

    fn matches(&self, labels: &BTreeSet<String>) -> bool {
        self.labels.iter().any(|label| labels.contains(label))
    }
}

/// Partial update addressed by profile name. `Some(None)` clears a radius.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    pub name: String,
    pub labels: Option<Vec<String>>,
    pub default_threat_radius: Option<Option<f64>>,
    pub default_warning_radius: Option<Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileStore {
    profiles: BTreeMap<String, Profile>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_profiles(profiles: impl IntoIterator<Item = Profile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|profile| (profile.name.clone(), profile))
                .collect(),
        }
    }

    /// Adds an empty profile. Returns false if the name is taken.
    pub fn add_profile(&mut self, name: &str) -> bool {
        if self.profiles.contains_key(name) {
            return false;
        }
        self.profiles.insert(name.to_string(), Profile::new(name));
        true
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> EngineResult<()> {
        let profile = self
            .profiles
            .get_mut(&update.name)
            .ok_or_else(|| EngineError::UnknownProfile(update.name.clone()))?;
        if let Some(labels) = update.labels {
            profile.labels = labels;
        }
        if let Some(radius) = update.default_threat_radius {
            profile.default_threat_radius = radius;
        }
        if let Some(radius) = update.default_warning_radius {
            profile.default_warning_radius = radius;
        }
        Ok(())
    }

    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        self.profiles.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    /// Default radii for an entity carrying `labels`. Matching profiles are
    /// visited by name, descending, and the first value found wins per field.
    pub fn resolve(&self, labels: &BTreeSet<String>) -> ProfileRadii {
        self.profiles
            .values()
            .rev()
            .filter(|profile| profile.matches(labels))
            .fold(ProfileRadii::default(), |acc, profile| ProfileRadii {
                threat_radius: acc.threat_radius.or(profile.default_threat_radius),
                warning_radius: acc.warning_radius.or(profile.default_warning_radius),
            })
    }

    /// Recomputed radii for every labelled entity.
    pub fn resolve_all(&self, labels: &EntityLabels) -> BTreeMap<EntityId, ProfileRadii> {
        labels
            .iter()
            .map(|(entity_id, set)| (entity_id, self.resolve(set)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, labels: &[&str], threat: Option<f64>, warning: Option<f64>) -> Profile {
        Profile {
            name: name.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            default_threat_radius: threat,
            default_warning_radius: warning,
        }
    }

    fn set(labels: &[&str]) -> BTreeSet<String> {
        labels.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn later_names_win_per_field() {
        let store = ProfileStore::from_profiles([
            profile("alpha", &["cap"], Some(10.0), Some(40.0)),
            profile("bravo", &["cap"], Some(20.0), None),
            profile("charlie", &["awacs"], Some(99.0), Some(99.0)),
        ]);

        let radii = store.resolve(&set(&["cap"]));
        assert_eq!(radii.threat_radius, Some(20.0));
        assert_eq!(radii.warning_radius, Some(40.0));
    }

    #[test]
    fn unmatched_labels_resolve_to_nothing() {
        let store = ProfileStore::from_profiles([profile("alpha", &["cap"], Some(10.0), None)]);
        assert!(store.resolve(&set(&["strike"])).is_empty());
        assert!(store.resolve(&BTreeSet::new()).is_empty());
    }

    #[test]
    fn add_and_update_profiles() {
        let mut store = ProfileStore::new();
        assert!(store.add_profile("cap"));
        assert!(!store.add_profile("cap"));

        store
            .update_profile(ProfileUpdate {
                name: "cap".into(),
                labels: Some(vec!["barcap".into()]),
                default_warning_radius: Some(Some(30.0)),
                ..Default::default()
            })
            .unwrap();
        let cap = store.get("cap").unwrap();
        assert_eq!(cap.labels, vec!["barcap".to_string()]);
        assert_eq!(cap.default_warning_radius, Some(30.0));

        let err = store
            .update_profile(ProfileUpdate {
                name: "missing".into(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownProfile(name) if name == "missing"));
    }

    #[test]
    fn resolve_all_covers_labelled_entities() {
        let store = ProfileStore::from_profiles([profile("cap", &["cap"], Some(15.0), Some(30.0))]);
        let mut labels = EntityLabels::new();
        labels.push_label(1, "cap");
        labels.push_label(2, "tanker");

        let radii = store.resolve_all(&labels);
        assert_eq!(radii[&1].threat_radius, Some(15.0));
        assert!(radii[&2].is_empty());
    }
}
