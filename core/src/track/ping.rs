use crate::feed::Entity;
use crate::geo::{distance, LatLon};
use serde::{Deserialize, Serialize};

/// Sentinel returned by the estimators when the history is too short.
pub const UNKNOWN_RATE: f64 = -1.0;
/// Pings required before a track counts as a live contact.
pub const MIN_VISIBLE_PINGS: usize = 3;
/// Speed floor below which a contact is treated as clutter.
pub const MIN_VISIBLE_SPEED_KTS: f64 = 25.0;

/// One kinematic sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPing {
    /// Wall-clock capture time in milliseconds.
    pub time: i64,
    pub position: LatLon,
    /// Metres.
    pub altitude: f64,
    pub heading: f64,
}

impl TrackPing {
    pub fn capture(entity: &Entity, time: i64) -> Self {
        Self {
            time,
            position: entity.position(),
            altitude: entity.altitude,
            heading: entity.heading,
        }
    }
}

/// Newest-first ping history for one entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Track {
    pings: Vec<TrackPing>,
}

impl Track {
    pub fn new(first: TrackPing) -> Self {
        Self { pings: vec![first] }
    }

    /// Builds a track from pings already ordered newest-first.
    pub fn from_pings(pings: Vec<TrackPing>) -> Self {
        Self { pings }
    }

    /// Prepends `ping` and keeps at most `max_len` entries.
    pub fn push(&mut self, ping: TrackPing, max_len: usize) {
        self.pings.insert(0, ping);
        self.pings.truncate(max_len.max(1));
    }

    pub fn pings(&self) -> &[TrackPing] {
        &self.pings
    }

    pub fn newest(&self) -> Option<&TrackPing> {
        self.pings.first()
    }

    pub fn oldest(&self) -> Option<&TrackPing> {
        self.pings.last()
    }

    pub fn len(&self) -> usize {
        self.pings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pings.is_empty()
    }

    /// Knots between the newest and oldest ping, or [`UNKNOWN_RATE`].
    pub fn estimated_speed(&self) -> f64 {
        match self.span() {
            Some((newest, oldest, seconds)) => {
                distance(newest.position, oldest.position) / seconds * 3600.0
            }
            None => UNKNOWN_RATE,
        }
    }

    /// Altitude change per minute between the newest and oldest ping, or
    /// [`UNKNOWN_RATE`]. Keeps the unit of the stored altitude.
    pub fn estimated_altitude_rate(&self) -> f64 {
        match self.span() {
            Some((newest, oldest, seconds)) => (newest.altitude - oldest.altitude) / seconds * 60.0,
            None => UNKNOWN_RATE,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.len() >= MIN_VISIBLE_PINGS && self.is_moving()
    }

    /// Estimated speed at or above the visibility floor. Unknown speed fails.
    pub fn is_moving(&self) -> bool {
        meets_speed_floor(self.estimated_speed())
    }

    // Zero elapsed time gives no usable rate.
    fn span(&self) -> Option<(&TrackPing, &TrackPing, f64)> {
        if self.pings.len() < 2 {
            return None;
        }
        let newest = self.newest()?;
        let oldest = self.oldest()?;
        let seconds = (newest.time - oldest.time) as f64 / 1000.0;
        if seconds <= 0.0 {
            return None;
        }
        Some((newest, oldest, seconds))
    }
}

pub(crate) fn meets_speed_floor(speed_kts: f64) -> bool {
    speed_kts >= MIN_VISIBLE_SPEED_KTS
}
