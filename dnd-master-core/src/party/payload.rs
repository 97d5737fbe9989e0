//! The persisted party payload.
//!
//! Field names and nesting are the on-disk format shared with saved
//! scenario files, so they must not change.

use super::PartyMember;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which the opening scene text is stored.
pub const INITIAL_SCENE_KEY: &str = "initial_scene";

/// Flag the orchestration layer looks for to know a scenario has a party.
pub const PARTY_INITIALIZED_FLAG: &str = "party_initialized";

/// Owner and item of the starter kit granted on party creation.
pub const STARTER_KIT_OWNER: &str = "party";
pub const STARTER_KIT_ITEM: &str = "basic_kit";

/// Everything produced when a party is finalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyPayload {
    pub party: PartySection,
    #[serde(default)]
    pub state_delta: StateDelta,
    #[serde(default)]
    pub party_compact: Vec<String>,
    /// Keys other tools store next to the party, such as `initial_scene`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySection {
    pub max_size: usize,
    pub members: Vec<PartyMember>,
    pub resources: Resources,
    #[serde(default)]
    pub party_tags: Vec<String>,
}

/// Resources shared by the whole party.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub coin: u32,
    pub rations: u32,
}

/// State changes the caller should apply after the party is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDelta {
    #[serde(default)]
    pub flags: FlagChanges,
    #[serde(default)]
    pub inventory_add: Vec<InventoryGrant>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagChanges {
    #[serde(default)]
    pub set: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryGrant {
    pub owner: String,
    pub item_id: String,
}

impl StateDelta {
    /// The delta emitted for a freshly created party.
    pub fn party_created() -> Self {
        Self {
            flags: FlagChanges {
                set: vec![PARTY_INITIALIZED_FLAG.to_string()],
            },
            inventory_add: vec![InventoryGrant {
                owner: STARTER_KIT_OWNER.to_string(),
                item_id: STARTER_KIT_ITEM.to_string(),
            }],
        }
    }
}

impl PartyPayload {
    /// Whether the payload carries the party-initialized marker.
    pub fn is_party_initialized(&self) -> bool {
        self.state_delta
            .flags
            .set
            .iter()
            .any(|flag| flag == PARTY_INITIALIZED_FLAG)
    }

    pub fn members(&self) -> &[PartyMember] {
        &self.party.members
    }

    /// Opening scene text, when one has been stored.
    pub fn initial_scene(&self) -> Option<&str> {
        self.extra.get(INITIAL_SCENE_KEY).and_then(Value::as_str)
    }

    /// Copy stored keys from `previous` that this payload does not set itself.
    pub fn inherit_extra(&mut self, previous: &PartyPayload) {
        for (key, value) in &previous.extra {
            self.extra
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_created_delta() {
        let delta = StateDelta::party_created();
        assert_eq!(delta.flags.set, vec!["party_initialized"]);
        assert_eq!(delta.inventory_add.len(), 1);
        assert_eq!(delta.inventory_add[0].owner, "party");
        assert_eq!(delta.inventory_add[0].item_id, "basic_kit");
    }

    #[test]
    fn test_wire_shape() {
        let payload = PartyPayload {
            party: PartySection {
                max_size: 3,
                members: vec![],
                resources: Resources { coin: 4, rations: 1 },
                party_tags: vec!["heist".to_string()],
            },
            state_delta: StateDelta::party_created(),
            party_compact: vec![],
            extra: Map::new(),
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["party"]["max_size"], 3);
        assert_eq!(value["party"]["resources"]["coin"], 4);
        assert_eq!(value["party"]["resources"]["rations"], 1);
        assert_eq!(value["party"]["party_tags"][0], "heist");
        assert_eq!(value["state_delta"]["flags"]["set"][0], "party_initialized");
        assert_eq!(value["state_delta"]["inventory_add"][0]["item_id"], "basic_kit");
        assert!(value["party_compact"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_keys_kept() {
        let json = r#"{
            "party": {"max_size": 3, "members": [], "resources": {"coin": 0, "rations": 0}},
            "initial_scene": "Туман над гаванью",
            "notes": {"gm": 1}
        }"#;
        let payload: PartyPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.initial_scene(), Some("Туман над гаванью"));

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["initial_scene"], "Туман над гаванью");
        assert_eq!(value["notes"]["gm"], 1);
        assert!(value.get("extra").is_none());
    }

    #[test]
    fn test_inherit_extra_keeps_own_keys() {
        let mut previous: PartyPayload = serde_json::from_str(
            r#"{"party": {"max_size": 3, "members": [], "resources": {"coin": 0, "rations": 0}},
                "initial_scene": "old", "mood": "grim"}"#,
        )
        .unwrap();
        let mut next = previous.clone();
        next.extra.clear();
        next.extra.insert("mood".to_string(), Value::from("bright"));

        next.inherit_extra(&previous);
        assert_eq!(next.initial_scene(), Some("old"));
        assert_eq!(next.extra["mood"], "bright");

        previous.extra.clear();
        assert!(previous.initial_scene().is_none());
    }

    #[test]
    fn test_missing_delta_is_not_initialized() {
        let json = r#"{
            "party": {"max_size": 3, "members": [], "resources": {"coin": 0, "rations": 0}}
        }"#;
        let payload: PartyPayload = serde_json::from_str(json).unwrap();
        assert!(!payload.is_party_initialized());
        assert!(payload.party.party_tags.is_empty());
    }
}
