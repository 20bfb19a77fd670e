//! Per-user working memory.
//!
//! The assistant keeps a free-form memory object per user and domain. Its
//! fields are not known ahead of time, so it is kept as an opaque,
//! insertion-ordered JSON object; the profile editor shows fields in the
//! order the backend wrote them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::errors::{CoreError, Result};
use crate::identifier::UserId;

/// Opaque memory blob: field name to arbitrary JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkingMemory {
    fields: IndexMap<String, JsonValue>,
}

impl WorkingMemory {
    /// Create empty memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a JSON object.
    ///
    /// `null` is treated as empty memory; any non-object value is rejected.
    pub fn from_json(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Null => Ok(Self::new()),
            JsonValue::Object(_) => Ok(serde_json::from_value(value)?),
            other => Err(CoreError::config(format!(
                "working memory must be a JSON object, got {other}"
            ))),
        }
    }

    /// Convert back to a JSON object.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Get a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.fields.get(field)
    }

    /// Set a field; existing fields keep their position.
    pub fn set(&mut self, field: impl Into<String>, value: JsonValue) -> Option<JsonValue> {
        self.fields.insert(field.into(), value)
    }

    /// Remove a field, preserving the order of the rest.
    pub fn remove(&mut self, field: &str) -> Option<JsonValue> {
        self.fields.shift_remove(field)
    }

    /// Field names in display order.
    pub fn field_order(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterate over fields in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Memory record for one user in one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMemory {
    /// Owner.
    pub user_id: UserId,
    /// Domain value.
    pub domain: String,
    /// The memory blob.
    #[serde(default)]
    pub working_memory: WorkingMemory,
}
