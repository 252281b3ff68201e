//! Decoded entity snapshots and session events delivered by the server feed.

pub mod entity;
pub mod event;
pub mod world;

pub use entity::{Coalition, Entity, TYPE_AIR, TYPE_PARACHUTIST};
pub use event::{EntityBatch, SessionEvent};
pub use world::EntityStore;
