//! Track and alert engine for the Sneaker GCI dashboard.
//!
//! Entity snapshots decoded from the server feed are folded into bounded
//! per-entity ping histories, from which speed and vertical rate are
//! estimated. A periodic alert pass compares every armed track against the
//! opposing coalition and maintains warning/threat alerts with their
//! triggered-entity bookkeeping.

pub mod alert;
pub mod feed;
pub mod geo;
pub mod prelude;
pub mod profile;
pub mod schedule;
pub mod session;
pub mod telemetry;
pub mod track;

pub use prelude::{EngineConfig, EngineError, EngineResult, EntityId};
pub use session::{Session, SharedSession};
