use crate::geo::LatLon;
use crate::prelude::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const TYPE_AIR: &str = "Air";
pub const TYPE_PARACHUTIST: &str = "Parachutist";

/// Side an entity fights for, read from its `Coalition` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coalition {
    Allies,
    Enemies,
    Neutral,
}

impl Coalition {
    pub fn from_property(value: Option<&str>) -> Self {
        match value {
            Some("Allies") => Coalition::Allies,
            Some("Enemies") => Coalition::Enemies,
            _ => Coalition::Neutral,
        }
    }
}

/// One object as reported by the server, in its wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: f64,
    #[serde(default)]
    pub heading: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl Entity {
    pub fn position(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }

    pub fn has_type(&self, kind: &str) -> bool {
        self.types.iter().any(|t| t == kind)
    }

    /// Airborne and not a parachutist.
    pub fn is_trackable(&self) -> bool {
        self.has_type(TYPE_AIR) && !self.has_type(TYPE_PARACHUTIST)
    }

    pub fn coalition(&self) -> Coalition {
        Coalition::from_property(self.property("Coalition"))
    }

    pub fn name(&self) -> Option<&str> {
        self.property("Name")
    }

    pub fn pilot(&self) -> Option<&str> {
        self.property("Pilot")
    }

    pub fn group(&self) -> Option<&str> {
        self.property("Group")
    }

    fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}
