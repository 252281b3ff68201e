//! Proximity alerts between opposing coalitions.
//!
//! The engine runs two passes per tick: a clear pass that drops alerts whose
//! condition no longer holds, then a check pass that raises new ones. Each
//! pass computes the next [`AlertState`] from a copy and replaces the old one
//! in a single step.

pub mod cue;
pub mod engine;
pub mod kind;
pub mod triggered;

pub use cue::{AlertCue, LogCue};
pub use engine::{AlertEngine, AlertPassSummary, AlertState};
pub use kind::{Alert, AlertKind};
pub use triggered::TriggeredEntities;
