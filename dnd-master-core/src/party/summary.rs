//! One-line member summaries for quick display.

use super::{PartyMember, Stats, STAT_KEYS};

/// The member's strongest stat.
///
/// Ties go to the key that comes first in [`STAT_KEYS`]. Missing keys count
/// as the lowest possible value.
pub fn key_stat(stats: &Stats) -> (&'static str, i32) {
    let value_of = |key: &str| stats.get(key).copied().unwrap_or(i32::MIN);

    STAT_KEYS
        .iter()
        .skip(1)
        .fold((STAT_KEYS[0], value_of(STAT_KEYS[0])), |best, &key| {
            let value = value_of(key);
            if value > best.1 {
                (key, value)
            } else {
                best
            }
        })
}

/// Render `{name}-{role} {KEY}{+value} HP{hp} - {loadout}; черты: {traits}`.
pub fn compact_summary(member: &PartyMember) -> String {
    let (key, value) = key_stat(&member.stats);
    format!(
        "{}-{} {}{:+} HP{} - {}; черты: {}",
        member.name,
        member.role,
        key.to_uppercase(),
        value,
        member.hp,
        member.loadout.join(", "),
        member.traits.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::party::stat_block;
    use crate::testing::sample_member;

    #[test]
    fn test_key_stat_highest() {
        assert_eq!(key_stat(&stat_block([0, 1, 3, 2, -1])), ("int", 3));
        assert_eq!(key_stat(&stat_block([-1, -1, -1, -1, 0])), ("charm", 0));
    }

    #[test]
    fn test_key_stat_tie_break() {
        assert_eq!(key_stat(&stat_block([2, 2, 0, 0, 0])), ("str", 2));
        assert_eq!(key_stat(&stat_block([0, 1, 0, 1, 1])), ("dex", 1));
        assert_eq!(key_stat(&stat_block([-1, -1, -1, -1, -1])), ("str", -1));
    }

    #[test]
    fn test_compact_summary() {
        let member = sample_member("pc_mira", "Mira")
            .with_stats(stat_block([2, 2, 0, 0, 0]))
            .with_hp(11)
            .with_loadout(["лук", "плащ"])
            .with_traits(["смелая", "упрямая"]);
        assert_eq!(
            compact_summary(&member),
            "Mira-Разведчица STR+2 HP11 - лук, плащ; черты: смелая, упрямая"
        );
    }

    #[test]
    fn test_compact_summary_zero_and_negative() {
        let member = sample_member("pc_a", "A").with_stats(stat_block([0, 0, 0, 0, 0]));
        assert!(compact_summary(&member).contains(" STR+0 "));

        let member = sample_member("pc_a", "A").with_stats(stat_block([-1, -1, -1, -1, -1]));
        assert!(compact_summary(&member).contains(" STR-1 "));
    }
}
