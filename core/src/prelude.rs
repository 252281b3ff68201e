use serde::{Deserialize, Serialize};

/// Identifier assigned to every object by the server feed.
pub type EntityId = u64;

pub const DEFAULT_NUM_PREVIOUS_PINGS: usize = 16;
pub const DEFAULT_ALERT_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_ALERT_STARTUP_DELAY_MS: u64 = 5_000;

/// Shared configuration for the track store and alert loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of pings kept behind the newest one.
    pub num_previous_pings: usize,
    pub alert_interval_ms: u64,
    pub alert_startup_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            num_previous_pings: DEFAULT_NUM_PREVIOUS_PINGS,
            alert_interval_ms: DEFAULT_ALERT_INTERVAL_MS,
            alert_startup_delay_ms: DEFAULT_ALERT_STARTUP_DELAY_MS,
        }
    }
}

/// Common error type for engine operations.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("invalid radius for entity {entity_id}: {value}")]
    InvalidRadius { entity_id: EntityId, value: f64 },
    #[error("unknown profile: {0}")]
    UnknownProfile(String),
    #[error("failed to decode feed event: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
