use super::geodesy::{bearing, cardinal, destination_point, distance, Cardinal, LatLon};
use super::METERS_PER_NM;
use serde::{Deserialize, Serialize};

/// Bearing/range/altitude picture of a target as seen from an owner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Braa {
    pub bearing: f64,
    pub range_nm: f64,
    pub altitude: f64,
    pub cardinal: Cardinal,
}

impl Braa {
    pub fn between(from: LatLon, to: LatLon, target_altitude: f64) -> Self {
        let bearing = bearing(from, to);
        Self {
            bearing,
            range_nm: distance(from, to),
            altitude: target_altitude,
            cardinal: cardinal(bearing),
        }
    }
}

/// Dead-reckons a position forward along `heading` at `speed_kts` for `seconds`.
pub fn project(position: LatLon, heading: f64, speed_kts: f64, seconds: f64) -> LatLon {
    let metres = speed_kts * METERS_PER_NM * seconds / 3600.0;
    destination_point(position.lat, position.lon, heading, metres)
}
