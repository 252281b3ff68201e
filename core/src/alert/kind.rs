use crate::prelude::EntityId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Threat,
}

impl AlertKind {
    pub const ALL: [AlertKind; 2] = [AlertKind::Warning, AlertKind::Threat];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Warning => "warning",
            AlertKind::Threat => "threat",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The owning entity is inside its `kind` radius of `target_entity_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub target_entity_id: EntityId,
}

impl Alert {
    pub fn new(kind: AlertKind, target_entity_id: EntityId) -> Self {
        Self {
            kind,
            target_entity_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_lowercase_type_tag() {
        let json = serde_json::to_string(&Alert::new(AlertKind::Threat, 4)).unwrap();
        assert_eq!(json, r#"{"type":"threat","target_entity_id":4}"#);
    }
}
