use super::entity::Entity;
use crate::prelude::{EngineResult, EntityId};
use serde::{Deserialize, Serialize};

/// Events pushed by the server for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "e", content = "d")]
pub enum SessionEvent {
    /// Full world state, sent on connect.
    #[serde(rename = "SESSION_STATE")]
    State {
        session_id: String,
        offset: f64,
        #[serde(default)]
        objects: Option<Vec<Entity>>,
    },
    /// Incremental radar sweep.
    #[serde(rename = "SESSION_RADAR_SNAPSHOT")]
    RadarSnapshot {
        offset: f64,
        #[serde(default)]
        created: Vec<Entity>,
        #[serde(default)]
        updated: Vec<Entity>,
        #[serde(default)]
        deleted: Vec<EntityId>,
    },
}

impl SessionEvent {
    pub fn from_json(raw: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn offset(&self) -> f64 {
        match self {
            SessionEvent::State { offset, .. } | SessionEvent::RadarSnapshot { offset, .. } => {
                *offset
            }
        }
    }

    pub fn into_batch(self) -> EntityBatch {
        match self {
            SessionEvent::State {
                offset, objects, ..
            } => EntityBatch {
                offset,
                reset: true,
                created: objects.unwrap_or_default(),
                ..Default::default()
            },
            SessionEvent::RadarSnapshot {
                offset,
                created,
                updated,
                deleted,
            } => EntityBatch {
                offset,
                reset: false,
                created,
                updated,
                deleted,
            },
        }
    }
}

/// Normalized created/updated/deleted batch consumed by the stores.
///
/// `reset` marks a full-state batch: everything not in `created` is gone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityBatch {
    pub offset: f64,
    pub reset: bool,
    pub created: Vec<Entity>,
    pub updated: Vec<Entity>,
    pub deleted: Vec<EntityId>,
}

impl EntityBatch {
    pub fn is_empty(&self) -> bool {
        !self.reset && self.created.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_radar_snapshot() {
        let raw = r#"{"e": "SESSION_RADAR_SNAPSHOT", "d": {
            "offset": 12.5,
            "created": [],
            "updated": [{"id": 3, "types": ["Air"], "properties": {}, "latitude": 1.0, "longitude": 2.0,
                         "altitude": 100.0, "heading": 45.0}],
            "deleted": [9, 10]
        }}"#;
        let event = SessionEvent::from_json(raw).unwrap();
        assert_eq!(event.offset(), 12.5);

        let batch = event.into_batch();
        assert!(!batch.reset);
        assert_eq!(batch.updated.len(), 1);
        assert_eq!(batch.deleted, vec![9, 10]);
    }

    #[test]
    fn session_state_becomes_reset_batch() {
        let raw = r#"{"e": "SESSION_STATE", "d": {"session_id": "abc", "offset": 0}}"#;
        let batch = SessionEvent::from_json(raw).unwrap().into_batch();
        assert!(batch.reset);
        assert!(batch.created.is_empty());
        assert!(!batch.is_empty());
    }

    #[test]
    fn rejects_unknown_event_tag() {
        let raw = r#"{"e": "SESSION_BOGUS", "d": {}}"#;
        assert!(SessionEvent::from_json(raw).is_err());
    }
}
