use crate::alert::AlertKind;
use serde::{Deserialize, Serialize};

/// Per-entity alerting and display options. Radii are nautical miles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackOptions {
    pub warning_radius: Option<f64>,
    pub threat_radius: Option<f64>,
    pub profile_warning_radius: Option<f64>,
    pub profile_threat_radius: Option<f64>,
    pub watching: bool,
    pub hide_info: bool,
}

impl TrackOptions {
    /// Explicit radius when set, otherwise the profile default.
    pub fn effective_radius(&self, kind: AlertKind) -> Option<f64> {
        match kind {
            AlertKind::Warning => self.warning_radius.or(self.profile_warning_radius),
            AlertKind::Threat => self.threat_radius.or(self.profile_threat_radius),
        }
    }

    pub fn is_armed(&self) -> bool {
        self.effective_radius(AlertKind::Warning).is_some()
            || self.effective_radius(AlertKind::Threat).is_some()
    }

    pub fn merge(&mut self, update: &TrackOptionsUpdate) {
        if let Some(radius) = update.warning_radius {
            self.warning_radius = radius;
        }
        if let Some(radius) = update.threat_radius {
            self.threat_radius = radius;
        }
        if let Some(watching) = update.watching {
            self.watching = watching;
        }
        if let Some(hide_info) = update.hide_info {
            self.hide_info = hide_info;
        }
    }
}

/// Partial update for [`TrackOptions`]. An outer `None` leaves the field
/// untouched; `Some(None)` clears an explicit radius.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackOptionsUpdate {
    pub warning_radius: Option<Option<f64>>,
    pub threat_radius: Option<Option<f64>>,
    pub watching: Option<bool>,
    pub hide_info: Option<bool>,
}

impl TrackOptionsUpdate {
    pub fn radii(warning: Option<f64>, threat: Option<f64>) -> Self {
        Self {
            warning_radius: warning.map(Some),
            threat_radius: threat.map(Some),
            ..Default::default()
        }
    }

    pub(crate) fn explicit_radii(&self) -> impl Iterator<Item = f64> + '_ {
        [self.warning_radius, self.threat_radius]
            .into_iter()
            .flatten()
            .flatten()
    }
}

/// Profile-derived default radii for one entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileRadii {
    pub threat_radius: Option<f64>,
    pub warning_radius: Option<f64>,
}

impl ProfileRadii {
    pub fn is_empty(&self) -> bool {
        self.threat_radius.is_none() && self.warning_radius.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_radius_overrides_profile() {
        let opts = TrackOptions {
            warning_radius: Some(10.0),
            profile_warning_radius: Some(40.0),
            profile_threat_radius: Some(20.0),
            ..Default::default()
        };
        assert_eq!(opts.effective_radius(AlertKind::Warning), Some(10.0));
        assert_eq!(opts.effective_radius(AlertKind::Threat), Some(20.0));
        assert!(opts.is_armed());
        assert!(!TrackOptions::default().is_armed());
    }

    #[test]
    fn merge_is_shallow_and_can_clear() {
        let mut opts = TrackOptions {
            warning_radius: Some(10.0),
            threat_radius: Some(5.0),
            ..Default::default()
        };
        opts.merge(&TrackOptionsUpdate {
            threat_radius: Some(None),
            watching: Some(true),
            ..Default::default()
        });
        assert_eq!(opts.warning_radius, Some(10.0));
        assert_eq!(opts.threat_radius, None);
        assert!(opts.watching);
    }
}
