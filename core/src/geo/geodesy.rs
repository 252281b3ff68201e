use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

const EARTH_RADIUS_KM: f64 = 6371.0;
const NM_PER_KM: f64 = 0.539957;

// WGS-84 ellipsoid
const WGS84_A: f64 = 6_378_137.0;
const WGS84_B: f64 = 6_356_752.3142;
const WGS84_F: f64 = 1.0 / 298.257223563;

const VINCENTY_TOLERANCE: f64 = 1e-12;
const VINCENTY_MAX_ITERATIONS: usize = 200;

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Great-circle (haversine) distance in nautical miles.
pub fn distance(from: LatLon, to: LatLon) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c * NM_PER_KM
}

/// Rhumb-line bearing from `from` to `to`, normalized into [0, 360).
pub fn bearing(from: LatLon, to: LatLon) -> f64 {
    let start_lat = from.lat.to_radians();
    let end_lat = to.lat.to_radians();
    let mut d_long = (to.lon - from.lon).to_radians();

    let d_phi = ((end_lat / 2.0 + PI / 4.0).tan() / (start_lat / 2.0 + PI / 4.0).tan()).ln();
    if d_long.abs() > PI {
        d_long = if d_long > 0.0 {
            -(2.0 * PI - d_long)
        } else {
            2.0 * PI + d_long
        };
    }

    (d_long.atan2(d_phi).to_degrees() + 360.0) % 360.0
}

/// Vincenty direct solution: the point reached by travelling `distance_m`
/// metres from (`lat`, `lon`) on an initial bearing of `bearing_deg`.
pub fn destination_point(lat: f64, lon: f64, bearing_deg: f64, distance_m: f64) -> LatLon {
    let alpha1 = bearing_deg.to_radians();
    let (sin_alpha1, cos_alpha1) = alpha1.sin_cos();

    let tan_u1 = (1.0 - WGS84_F) * lat.to_radians().tan();
    let cos_u1 = 1.0 / (1.0 + tan_u1 * tan_u1).sqrt();
    let sin_u1 = tan_u1 * cos_u1;
    let sigma1 = tan_u1.atan2(cos_alpha1);
    let sin_alpha = cos_u1 * sin_alpha1;
    let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
    let u_sq = cos_sq_alpha * (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_B * WGS84_B);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

    let mut sigma = distance_m / (WGS84_B * big_a);
    let mut sigma_prev = 2.0 * PI;
    let mut sin_sigma = 0.0;
    let mut cos_sigma = 0.0;
    let mut cos_2sigma_m = 0.0;

    let mut iterations = 0;
    while (sigma - sigma_prev).abs() > VINCENTY_TOLERANCE && iterations < VINCENTY_MAX_ITERATIONS {
        sin_sigma = sigma.sin();
        cos_sigma = sigma.cos();
        cos_2sigma_m = (2.0 * sigma1 + sigma).cos();

        let delta_sigma = big_b
            * sin_sigma
            * (cos_2sigma_m
                + big_b / 4.0
                    * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                        - big_b / 6.0
                            * cos_2sigma_m
                            * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                            * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));
        sigma_prev = sigma;
        sigma = distance_m / (WGS84_B * big_a) + delta_sigma;
        iterations += 1;
    }

    let tmp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
    let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
        .atan2((1.0 - WGS84_F) * (sin_alpha * sin_alpha + tmp * tmp).sqrt());
    let lambda = (sin_sigma * sin_alpha1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);
    let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
    let l = lambda
        - (1.0 - c)
            * WGS84_F
            * sin_alpha
            * (sigma
                + c * sin_sigma
                    * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

    LatLon::new(lat2.to_degrees(), lon + l.to_degrees())
}

/// Eight-point compass rose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinal {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Cardinal {
    const ALL: [Cardinal; 8] = [
        Cardinal::N,
        Cardinal::NE,
        Cardinal::E,
        Cardinal::SE,
        Cardinal::S,
        Cardinal::SW,
        Cardinal::W,
        Cardinal::NW,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cardinal::N => "N",
            Cardinal::NE => "NE",
            Cardinal::E => "E",
            Cardinal::SE => "SE",
            Cardinal::S => "S",
            Cardinal::SW => "SW",
            Cardinal::W => "W",
            Cardinal::NW => "NW",
        }
    }
}

impl fmt::Display for Cardinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rounds a bearing to the nearest of the eight compass points.
pub fn cardinal(bearing_deg: f64) -> Cardinal {
    let sector = 360.0 / 8.0;
    let offset = (bearing_deg + sector / 2.0).rem_euclid(360.0);
    let index = (offset / sector).floor() as usize;
    Cardinal::ALL[index.min(Cardinal::ALL.len() - 1)]
}
