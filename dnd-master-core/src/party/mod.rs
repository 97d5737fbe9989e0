//! Party model for a scenario: up to three player characters with shared
//! resources.
//!
//! Members are plain data until a [`PartyBuilder`] adopts them, at which
//! point every template rule is checked. The builder then produces the
//! [`PartyPayload`] that is persisted per scenario.

pub mod builder;
pub mod id;
pub mod member;
pub mod payload;
pub mod summary;

pub use builder::PartyBuilder;
pub use id::{generate_member_id, slugify};
pub use member::{stat_block, PartyError, PartyMember, Stats};
pub use payload::{
    FlagChanges, InventoryGrant, PartyPayload, PartySection, Resources, StateDelta,
    INITIAL_SCENE_KEY, PARTY_INITIALIZED_FLAG,
};
pub use summary::{compact_summary, key_stat};

/// Stat keys in priority order. Earlier keys win ties for the key stat.
pub const STAT_KEYS: [&str; 5] = ["str", "dex", "int", "wit", "charm"];

pub const MIN_STAT: i32 = -1;
pub const MAX_STAT: i32 = 3;
pub const MIN_HP: i32 = 8;
pub const MAX_HP: i32 = 14;

/// Maximum party size.
pub const MAX_MEMBERS: usize = 3;

/// Maximum number of party-level tags.
pub const MAX_PARTY_TAGS: usize = 3;
