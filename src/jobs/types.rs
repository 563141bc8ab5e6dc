use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names with meaning to the registry. Everything else in a job is
/// opaque weld-parameter data (wire, shieldingGas, arcLength, pulse, ...).
pub const ID: &str = "id";
pub const TITLE: &str = "title";
pub const MODE: &str = "mode";
pub const CURRENT: &str = "current";
pub const IS_ACTIVE: &str = "isActive";

/// Fields that must be present and non-empty when a job is created.
pub const REQUIRED_FIELDS: [&str; 3] = [TITLE, MODE, CURRENT];

/// A weld job profile.
///
/// Wraps the raw JSON `Map<String, Value>` so parameter fields the registry
/// does not know about pass through untouched and keep their order.
/// Typed accessors are provided for the fields the registry acts on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Job {
    data: Map<String, Value>,
}

impl Job {
    /// Construct a Job from an existing Map.
    pub fn from_map(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// Parse a job from a JSON object string.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let data: Map<String, Value> = serde_json::from_str(json)?;
        Ok(Self { data })
    }

    // --- Typed accessors ---

    pub fn id(&self) -> Option<&str> {
        self.data.get(ID)?.as_str()
    }

    pub fn title(&self) -> Option<&str> {
        self.data.get(TITLE)?.as_str()
    }

    pub fn mode(&self) -> Option<&str> {
        self.data.get(MODE)?.as_str()
    }

    /// Missing or non-boolean `isActive` reads as inactive.
    pub fn is_active(&self) -> bool {
        self.data
            .get(IS_ACTIVE)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    // --- Mutators ---

    pub(crate) fn set_id(&mut self, id: String) {
        self.data.insert(ID.to_string(), Value::String(id));
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.data.insert(IS_ACTIVE.to_string(), Value::Bool(active));
    }

    /// Overlay `payload` onto this job. Payload fields win, fields the payload
    /// does not mention are kept. `id` and `isActive` are never taken from the
    /// payload; activation goes through the registry.
    pub(crate) fn merge(&mut self, payload: &Map<String, Value>) {
        for (key, value) in payload {
            if key == ID || key == IS_ACTIVE {
                continue;
            }
            self.data.insert(key.clone(), value.clone());
        }
    }

    // --- Raw access ---

    pub fn raw(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn field_count(&self) -> usize {
        self.data.len()
    }
}

/// True when a required field carries something: not null, and not blank if
/// it is a string.
pub(crate) fn has_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}
