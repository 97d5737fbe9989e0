//! Assembling a party and building its payload.

use super::payload::{PartyPayload, PartySection, Resources, StateDelta};
use super::{
    compact_summary, generate_member_id, PartyError, PartyMember, MAX_MEMBERS, MAX_PARTY_TAGS,
};
use serde_json::Map;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Collects validated members and party-wide resources.
///
/// Needs exclusive access while adding members; share it behind a lock if
/// more than one caller builds the same party.
#[derive(Debug, Clone, Default)]
pub struct PartyBuilder {
    members: Vec<PartyMember>,
    coin: u32,
    rations: u32,
    party_tags: Vec<String>,
}

impl PartyBuilder {
    /// Create an empty party with no resources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shared coin and rations.
    pub fn with_resources(mut self, coin: u32, rations: u32) -> Self {
        self.coin = coin;
        self.rations = rations;
        self
    }

    /// Set the party tags. Empty tags are dropped and at most three kept.
    pub fn with_party_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_party_tags(tags);
        self
    }

    pub fn set_party_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.party_tags = tags
            .into_iter()
            .map(Into::into)
            .filter(|tag: &String| !tag.is_empty())
            .take(MAX_PARTY_TAGS)
            .collect();
    }

    pub fn coin(&self) -> u32 {
        self.coin
    }

    pub fn rations(&self) -> u32 {
        self.rations
    }

    pub fn party_tags(&self) -> &[String] {
        &self.party_tags
    }

    /// Members in the order they joined.
    pub fn members(&self) -> &[PartyMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= MAX_MEMBERS
    }

    /// Remove all members, keeping resources and tags.
    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// An unused id for a member with this name joining next.
    pub fn next_member_id(&self, name: &str) -> String {
        let existing: HashSet<String> = self.members.iter().map(|m| m.id.clone()).collect();
        generate_member_id(name, &existing, self.members.len() + 1)
    }

    /// Validate and append a member.
    ///
    /// The party is left untouched when any check fails.
    pub fn add_member(&mut self, member: PartyMember) -> Result<(), PartyError> {
        let result = self.check_member(&member);
        if let Err(error) = &result {
            warn!(member_id = %member.id, %error, "party member rejected");
            return result;
        }

        debug!(member_id = %member.id, name = %member.name, "party member added");
        self.members.push(member);
        Ok(())
    }

    fn check_member(&self, member: &PartyMember) -> Result<(), PartyError> {
        if self.is_full() {
            return Err(PartyError::PartyFull);
        }
        if self.members.iter().any(|existing| existing.id == member.id) {
            return Err(PartyError::DuplicateId(member.id.clone()));
        }
        member.validate()
    }

    /// Build the persisted payload for the current party.
    pub fn build_payload(&self) -> PartyPayload {
        PartyPayload {
            party: PartySection {
                max_size: MAX_MEMBERS,
                members: self.members.clone(),
                resources: Resources {
                    coin: self.coin,
                    rations: self.rations,
                },
                party_tags: self.party_tags.clone(),
            },
            state_delta: StateDelta::party_created(),
            party_compact: self.members.iter().map(compact_summary).collect(),
            extra: Map::new(),
        }
    }

    /// The payload as pretty-printed JSON.
    pub fn build_payload_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.build_payload())
    }
}
