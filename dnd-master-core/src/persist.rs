//! Party persistence, one party per scenario.
//!
//! The store lives in a single JSON file shaped as
//! `{"scenarios": {"<name>": <party payload>}}`. Files written before
//! scenarios existed hold a bare payload; those are upgraded on load and
//! filed under a caller-chosen scenario name.

use crate::party::PartyPayload;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::{info, warn};

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid party store format")]
    InvalidFormat,
}

/// All saved parties, keyed by scenario name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyStore {
    #[serde(default)]
    pub scenarios: BTreeMap<String, PartyPayload>,
    /// Top-level keys besides `scenarios`, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// How a store was read from its JSON form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreShape {
    Scenarios,
    /// A bare party payload, now filed under the legacy scenario.
    Legacy,
}

impl PartyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a store from parsed JSON, upgrading the legacy single-party shape.
    pub fn from_value(value: Value, legacy_key: &str) -> Result<(Self, StoreShape), PersistError> {
        let Value::Object(mut object) = value else {
            return Err(PersistError::InvalidFormat);
        };

        if let Some(Value::Object(_)) = object.get("scenarios") {
            let scenarios = object.remove("scenarios").unwrap_or_default();
            let scenarios = serde_json::from_value(scenarios)?;
            let store = Self {
                scenarios,
                extra: object,
            };
            return Ok((store, StoreShape::Scenarios));
        }

        if object.contains_key("party") {
            let payload: PartyPayload = serde_json::from_value(Value::Object(object))?;
            let mut store = Self::new();
            store.insert(legacy_key, payload);
            return Ok((store, StoreShape::Legacy));
        }

        Err(PersistError::InvalidFormat)
    }

    /// Parse a store from a JSON string.
    pub fn from_json(content: &str, legacy_key: &str) -> Result<(Self, StoreShape), PersistError> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value, legacy_key)
    }

    /// Load the store from `path`.
    ///
    /// A missing file is created holding an empty store. A legacy file is
    /// rewritten in the scenario-keyed shape.
    pub async fn load(path: impl AsRef<Path>, legacy_key: &str) -> Result<Self, PersistError> {
        let path = path.as_ref();

        if !fs::try_exists(path).await? {
            let store = Self::new();
            store.save(path).await?;
            info!(path = %path.display(), "created empty party store");
            return Ok(store);
        }

        let content = fs::read_to_string(path).await?;
        let (store, shape) = Self::from_json(&content, legacy_key)?;

        if shape == StoreShape::Legacy {
            info!(
                path = %path.display(),
                scenario = legacy_key,
                "upgraded legacy party file"
            );
            store.save(path).await?;
        }

        info!(
            path = %path.display(),
            scenarios = store.scenarios.len(),
            "party store loaded"
        );
        Ok(store)
    }

    /// Load the store, falling back to an empty one if the file is unusable.
    pub async fn load_or_default(path: impl AsRef<Path>, legacy_key: &str) -> Self {
        let path = path.as_ref();
        match Self::load(path, legacy_key).await {
            Ok(store) => store,
            Err(error) => {
                warn!(path = %path.display(), %error, "could not load party store");
                Self::new()
            }
        }
    }

    /// Save to a JSON file.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        info!(path = %path.display(), scenarios = self.scenarios.len(), "party store saved");
        Ok(())
    }

    pub fn get(&self, scenario: &str) -> Option<&PartyPayload> {
        self.scenarios.get(scenario)
    }

    /// Store the party for a scenario, replacing any previous one.
    pub fn insert(&mut self, scenario: impl Into<String>, payload: PartyPayload) -> Option<PartyPayload> {
        self.scenarios.insert(scenario.into(), payload)
    }

    pub fn remove(&mut self, scenario: &str) -> Option<PartyPayload> {
        self.scenarios.remove(scenario)
    }

    /// Scenario names in sorted order.
    pub fn scenario_names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }

    /// Whether the scenario has an initialized party.
    pub fn is_initialized(&self, scenario: &str) -> bool {
        self.get(scenario)
            .is_some_and(PartyPayload::is_party_initialized)
    }

    /// Whether any scenario has an initialized party.
    pub fn has_saved_party(&self) -> bool {
        self.scenarios.values().any(PartyPayload::is_party_initialized)
    }
}
