//! Manifest store: the target project's `package.json`, loaded once
//! and persisted at most once per run.
//!
//! Every reconciler reads and mutates the same in-memory instance, so
//! a change made by an earlier step is visible to every later step.
//! Keys the registry does not govern pass through untouched.

use crate::core::error::KindredError;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "package.json";

pub struct Manifest {
    path: PathBuf,
    value: Value,
    loaded: String,
}

impl Manifest {
    /// Load the project manifest; a missing file reads as an empty
    /// object so reconciliation can seed it from scratch.
    pub fn load(project_root: &Path) -> Result<Self, KindredError> {
        let path = project_root.join(MANIFEST_FILE);
        let value = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            let parsed: Value = serde_json::from_str(&raw)?;
            if !parsed.is_object() {
                return Err(KindredError::ValidationError(format!(
                    "{} must contain a JSON object",
                    path.display()
                )));
            }
            parsed
        } else {
            Value::Object(Map::new())
        };
        let loaded = serde_json::to_string(&value)?;
        Ok(Manifest {
            path,
            value,
            loaded,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.get(key)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        if let Some(object) = self.value.as_object_mut() {
            object.insert(key.to_string(), value);
        }
    }

    /// Governed map field as owned pairs; an absent or non-object
    /// field reads as empty.
    pub fn map_field(&self, key: &str) -> Map<String, Value> {
        match self.value.get(key) {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        }
    }

    /// Write the manifest back, pretty-printed, if its serialized form
    /// moved since load. Returns whether a write happened.
    pub fn persist_if_changed(&self) -> Result<bool, KindredError> {
        if serde_json::to_string(&self.value)? == self.loaded {
            return Ok(false);
        }
        let pretty = serde_json::to_string_pretty(&self.value)?;
        fs::write(&self.path, format!("{}\n", pretty))?;
        Ok(true)
    }
}
