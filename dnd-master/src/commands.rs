//! One-shot subcommands.

use std::path::Path;

use dnd_master_core::dice::DieSource;
use dnd_master_core::party::{PartyBuilder, PartyError, PartyMember, PartyPayload, Resources, Stats};
use dnd_master_core::{Config, DiceRoller, PartyStore, PersistError};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Persist(#[from] PersistError),

    #[error("Invalid party: {0}")]
    Party(#[from] PartyError),

    #[error("Could not read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid party draft: {0}")]
    Draft(#[from] serde_json::Error),

    #[error("No saved party for scenario '{0}'")]
    UnknownScenario(String),
}

pub fn roll<S: DieSource>(
    roller: &mut DiceRoller<S>,
    notations: &[String],
) -> Result<(), CommandError> {
    for notation in notations {
        println!("{}", roller.roll(notation));
    }
    Ok(())
}

pub fn check<S: DieSource>(
    roller: &mut DiceRoller<S>,
    modifier: i32,
    advantage: bool,
    disadvantage: bool,
) -> Result<(), CommandError> {
    println!(
        "{}",
        roller.ability_check_flags(modifier, advantage, disadvantage)
    );
    Ok(())
}

pub fn attack<S: DieSource>(roller: &mut DiceRoller<S>, bonus: i32) -> Result<(), CommandError> {
    println!("{}", roller.attack(bonus));
    Ok(())
}

pub fn damage<S: DieSource>(
    roller: &mut DiceRoller<S>,
    notation: &str,
    bonus: i32,
) -> Result<(), CommandError> {
    println!("{}", roller.damage(notation, bonus));
    Ok(())
}

pub fn initiative<S: DieSource>(roller: &mut DiceRoller<S>, dex: i32) -> Result<(), CommandError> {
    println!("{}", roller.initiative(dex));
    Ok(())
}

async fn load_store(config: &Config) -> Result<PartyStore, CommandError> {
    Ok(PartyStore::load(&config.party_state_path, &config.legacy_scenario).await?)
}

pub async fn party_list(config: &Config) -> Result<(), CommandError> {
    let store = load_store(config).await?;
    if store.scenarios.is_empty() {
        println!("No saved parties in {}", config.party_state_path.display());
        return Ok(());
    }
    for (name, payload) in &store.scenarios {
        println!("{name}: {} member(s)", payload.members().len());
    }
    Ok(())
}

pub async fn party_show(config: &Config, scenario: &str, json: bool) -> Result<(), CommandError> {
    let store = load_store(config).await?;
    let payload = store
        .get(scenario)
        .ok_or_else(|| CommandError::UnknownScenario(scenario.to_string()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(payload)?);
    } else {
        for line in describe_party(payload) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Human-readable lines for a saved party.
pub fn describe_party(payload: &PartyPayload) -> Vec<String> {
    let mut lines = payload.party_compact.clone();
    let resources = payload.party.resources;
    lines.push(format!(
        "Монеты: {}, пайки: {}",
        resources.coin, resources.rations
    ));
    if !payload.party.party_tags.is_empty() {
        lines.push(format!("Теги: {}", payload.party.party_tags.join(", ")));
    }
    if let Some(scene) = payload.initial_scene() {
        lines.push(format!("Сцена: {scene}"));
    }
    lines
}

pub async fn party_import(config: &Config, scenario: &str, file: &Path) -> Result<(), CommandError> {
    let content = tokio::fs::read_to_string(file)
        .await
        .map_err(|source| CommandError::Read {
            path: file.display().to_string(),
            source,
        })?;
    let draft: PartyDraft = serde_json::from_str(&content)?;
    let mut payload = draft.into_builder()?.build_payload();

    let mut store = load_store(config).await?;
    if let Some(previous) = store.get(scenario) {
        info!(scenario, "replacing saved party");
        payload.inherit_extra(previous);
    }
    let members = payload.members().len();
    store.insert(scenario, payload);
    store.save(&config.party_state_path).await?;

    println!("Saved {members} member(s) to scenario '{scenario}'");
    Ok(())
}

/// A party as a player fills it in. Ids are generated when omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PartyDraft {
    pub members: Vec<MemberDraft>,
    pub resources: Resources,
    pub party_tags: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MemberDraft {
    pub id: Option<String>,
    pub name: String,
    pub role: String,
    pub concept: String,
    pub stats: Stats,
    pub traits: Vec<String>,
    pub loadout: Vec<String>,
    pub hp: i32,
    pub tags: Vec<String>,
}

impl PartyDraft {
    /// Run every member through the party rules in order.
    pub fn into_builder(self) -> Result<PartyBuilder, PartyError> {
        let mut builder = PartyBuilder::new()
            .with_resources(self.resources.coin, self.resources.rations)
            .with_party_tags(self.party_tags);

        for draft in self.members {
            let id = match draft.id.filter(|id| !id.is_empty()) {
                Some(id) => id,
                None => builder.next_member_id(&draft.name),
            };
            let member = PartyMember {
                id,
                name: draft.name,
                role: draft.role,
                concept: draft.concept,
                stats: draft.stats,
                traits: draft.traits,
                loadout: draft.loadout,
                hp: draft.hp,
                tags: draft.tags,
            };
            builder.add_member(member)?;
        }
        Ok(builder)
    }
}
