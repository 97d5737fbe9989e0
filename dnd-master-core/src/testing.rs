//! Testing utilities.
//!
//! This module provides tools for deterministic tests:
//! - `FixedDice` for scripted die faces instead of a random generator
//! - `sample_member` for a member that passes every template rule

use crate::dice::DieSource;
use crate::party::{stat_block, PartyMember};
use std::collections::VecDeque;

/// A die source that returns scripted faces in order.
///
/// Panics when it runs out of faces or a face does not fit the die, so a
/// test notices when it rolled more (or different) dice than expected.
#[derive(Debug, Clone, Default)]
pub struct FixedDice {
    faces: VecDeque<u32>,
}

impl FixedDice {
    /// Create a source that will yield `faces` in order.
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
        }
    }

    /// Queue more faces after the current ones.
    pub fn push(&mut self, face: u32) {
        self.faces.push_back(face);
    }

    /// Number of faces not yet rolled.
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl DieSource for FixedDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        let face = self
            .faces
            .pop_front()
            .expect("FixedDice ran out of scripted faces");
        assert!(
            (1..=sides).contains(&face),
            "scripted face {face} does not fit a d{sides}"
        );
        face
    }
}

/// A member that satisfies every template rule.
pub fn sample_member(id: &str, name: &str) -> PartyMember {
    PartyMember::new(id, name, "Разведчица", "Бывшая контрабандистка с картой побережья")
        .with_stats(stat_block([1, 2, 0, 0, -1]))
        .with_traits(["осторожная", "любопытная"])
        .with_loadout(["короткий лук", "верёвка"])
        .with_hp(10)
        .with_tags(["scout"])
}
