//! A single player character and its template rules.

use super::{MAX_HP, MAX_STAT, MIN_HP, MIN_STAT, STAT_KEYS};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use thiserror::Error;

/// Stat key to value.
pub type Stats = BTreeMap<String, i32>;

/// Build a full stat map from values in `str, dex, int, wit, charm` order.
pub fn stat_block(values: [i32; 5]) -> Stats {
    STAT_KEYS
        .iter()
        .zip(values)
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Writes template keys in `STAT_KEYS` order, then any others.
fn serialize_stats<S: Serializer>(stats: &Stats, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(stats.len()))?;
    for key in STAT_KEYS {
        if let Some(value) = stats.get(key) {
            map.serialize_entry(key, value)?;
        }
    }
    for (key, value) in stats {
        if !STAT_KEYS.contains(&key.as_str()) {
            map.serialize_entry(key, value)?;
        }
    }
    map.end()
}

/// A violated party or member rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartyError {
    #[error("Member {0} must be provided.")]
    MissingField(&'static str),

    #[error("Stats must include exactly the keys: {keys}", keys = STAT_KEYS.join(", "))]
    StatKeys,

    #[error("Stat '{key}' must be between {min} and {max}.", min = MIN_STAT, max = MAX_STAT)]
    StatOutOfRange { key: String, value: i32 },

    #[error("Member must have exactly 2 traits.")]
    TraitCount(usize),

    #[error("Trait descriptions cannot be empty.")]
    EmptyTrait,

    #[error("Member must have exactly 2 loadout items.")]
    LoadoutCount(usize),

    #[error("Loadout items cannot be empty.")]
    EmptyLoadoutItem,

    #[error("HP must be between {min} and {max}.", min = MIN_HP, max = MAX_HP)]
    HpOutOfRange(i32),

    #[error("Member must have 1 or 2 tags.")]
    TagCount(usize),

    #[error("Tags cannot be empty strings.")]
    EmptyTag,

    #[error("Party already has the maximum number of members.")]
    PartyFull,

    #[error("Member with id '{0}' already exists.")]
    DuplicateId(String),
}

/// A player character.
///
/// Fields are public and unchecked; [`PartyMember::validate`] enforces the
/// template before a party accepts the member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub concept: String,
    #[serde(serialize_with = "serialize_stats")]
    pub stats: Stats,
    pub traits: Vec<String>,
    pub loadout: Vec<String>,
    pub hp: i32,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PartyMember {
    /// Create a member with identity fields set and everything else empty.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<String>,
        concept: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            concept: concept.into(),
            stats: Stats::new(),
            traits: Vec::new(),
            loadout: Vec::new(),
            hp: 0,
            tags: Vec::new(),
        }
    }

    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_traits<I, S>(mut self, traits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.traits = traits.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_loadout<I, S>(mut self, loadout: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.loadout = loadout.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_hp(mut self, hp: i32) -> Self {
        self.hp = hp;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Check the member against the template, stopping at the first
    /// violated rule.
    pub fn validate(&self) -> Result<(), PartyError> {
        for (field, value) in [
            ("id", &self.id),
            ("name", &self.name),
            ("role", &self.role),
            ("concept", &self.concept),
        ] {
            if value.is_empty() {
                return Err(PartyError::MissingField(field));
            }
        }

        let keys_match = self.stats.len() == STAT_KEYS.len()
            && STAT_KEYS.iter().all(|key| self.stats.contains_key(*key));
        if !keys_match {
            return Err(PartyError::StatKeys);
        }

        for key in STAT_KEYS {
            let value = self.stats[key];
            if !(MIN_STAT..=MAX_STAT).contains(&value) {
                return Err(PartyError::StatOutOfRange {
                    key: key.to_string(),
                    value,
                });
            }
        }

        if self.traits.len() != 2 {
            return Err(PartyError::TraitCount(self.traits.len()));
        }
        if self.traits.iter().any(String::is_empty) {
            return Err(PartyError::EmptyTrait);
        }

        if self.loadout.len() != 2 {
            return Err(PartyError::LoadoutCount(self.loadout.len()));
        }
        if self.loadout.iter().any(String::is_empty) {
            return Err(PartyError::EmptyLoadoutItem);
        }

        if !(MIN_HP..=MAX_HP).contains(&self.hp) {
            return Err(PartyError::HpOutOfRange(self.hp));
        }

        if !(1..=2).contains(&self.tags.len()) {
            return Err(PartyError::TagCount(self.tags.len()));
        }
        if self.tags.iter().any(String::is_empty) {
            return Err(PartyError::EmptyTag);
        }

        Ok(())
    }
}
