use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::UNAVAILABLE_STATES;

/// Snapshot of one external entity as seen by the state provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityState {
    pub state: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl EntityState {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// False for `unknown` / `unavailable`, which carry no signal.
    pub fn is_available(&self) -> bool {
        !UNAVAILABLE_STATES.contains(&self.state.trim().to_ascii_lowercase().as_str())
    }

    /// The state parsed as a number, if it is one.
    pub fn numeric_state(&self) -> Option<f64> {
        self.state.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// A numeric attribute, accepting JSON numbers and numeric strings.
    pub fn attribute_f64(&self, key: &str) -> Option<f64> {
        let value = match self.attributes.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }
}

/// Read-only lookup of external entity states by id.
///
/// Returning `None` means the entity does not exist or cannot be read right now.
/// Callers treat that exactly like an `unknown` state: no signal.
pub trait StateProvider: Send + Sync {
    fn get_state(&self, entity_id: &str) -> Option<EntityState>;

    /// Like [`get_state`](Self::get_state) but filters out unavailable/unknown states.
    fn get_available_state(&self, entity_id: &str) -> Option<EntityState> {
        self.get_state(entity_id).filter(EntityState::is_available)
    }
}
