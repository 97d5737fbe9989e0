//! Deterministic core of an AI-facilitated tabletop RPG.
//!
//! This crate provides:
//! - Dice notation parsing and rolling with critical/fumble detection
//! - Ability checks with advantage/disadvantage, attacks, damage and initiative
//! - The party model with its template validation and persisted payload
//! - A scenario-keyed party store
//!
//! # Quick Start
//!
//! ```ignore
//! use dnd_master_core::{DiceRoller, PartyBuilder, PartyMember, stat_block};
//!
//! let mut roller = DiceRoller::new();
//! println!("{}", roller.roll("2d6+3"));
//!
//! let mut party = PartyBuilder::new().with_resources(10, 3);
//! party.add_member(
//!     PartyMember::new("pc_mira", "Mira", "Scout", "Ex-smuggler")
//!         .with_stats(stat_block([1, 2, 0, 0, -1]))
//!         .with_traits(["wary", "curious"])
//!         .with_loadout(["short bow", "rope"])
//!         .with_hp(10)
//!         .with_tags(["scout"]),
//! )?;
//! println!("{}", party.build_payload_json()?);
//! ```

pub mod config;
pub mod dice;
pub mod party;
pub mod persist;
pub mod testing;

// Primary public API
pub use config::Config;
pub use dice::{Advantage, DiceError, DiceRoller, DiceSpec, DieType, RollOutcome};
pub use party::{stat_block, PartyBuilder, PartyError, PartyMember, PartyPayload};
pub use persist::{PartyStore, PersistError};
