use indexmap::IndexMap;
use std::collections::HashMap;

/// A named subject (character, location, ...) belonging to exactly one type.
#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    pub entity_type: String,
    pub notes: String,
}

/// A titled occurrence with optional timing, role-tagged relationships to
/// entities, property values, and tags.
#[derive(Debug, Clone, Default)]
pub struct Event {
    pub title: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub lasts_days: Option<i64>,
    pub lasts_hours: Option<i64>,
    pub lasts_minutes: Option<i64>,
    /// role id -> entity id, in document order.
    pub relationships: IndexMap<String, String>,
    /// property id -> trimmed non-empty value, in document order.
    pub values: IndexMap<String, String>,
    pub tags: Vec<String>,
}

/// The in-memory project graph. Built once per run by the builder and
/// treated as read-only by every later stage.
#[derive(Debug, Default)]
pub struct Model {
    pub types: HashMap<String, String>,
    pub roles: HashMap<String, String>,
    pub properties: HashMap<String, String>,
    pub entities: IndexMap<String, Entity>,
    pub events: IndexMap<String, Event>,
    /// type id -> entity ids in document order.
    pub entities_by_type: IndexMap<String, Vec<String>>,
    /// id -> deduplicated, path-safe display label. Covers type indexes,
    /// entities, and events; every rendered title and link target resolves
    /// through this table.
    pub labels: HashMap<String, String>,
}

impl Model {
    pub fn label(&self, id: &str) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }
}
