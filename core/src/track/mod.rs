//! Bounded per-entity ping histories and the kinematics derived from them.

pub mod clock;
pub mod options;
pub mod ping;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use options::{ProfileRadii, TrackOptions, TrackOptionsUpdate};
pub use ping::{Track, TrackPing, MIN_VISIBLE_PINGS, MIN_VISIBLE_SPEED_KTS, UNKNOWN_RATE};
pub use store::{TrackState, TrackStore};
