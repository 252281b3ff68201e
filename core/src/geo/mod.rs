//! Geodesy helpers shared by the track store, alert engine and dashboard.
//!
//! Two distance models live side by side: a spherical haversine used for the
//! coarse speed estimate and alert ranges, and Vincenty's direct formula on
//! the WGS-84 ellipsoid used where a precise destination point is needed.

pub mod braa;
pub mod geodesy;

pub use braa::{project, Braa};
pub use geodesy::{bearing, cardinal, destination_point, distance, Cardinal, LatLon};

/// Metres per nautical mile.
pub const METERS_PER_NM: f64 = 1852.0;
