//! Try out dice rolling from the command line.

use dnd_master_core::dice::{Advantage, DiceRoller};

fn main() {
    println!("=== Testing Dice Rolling ===\n");

    let mut roller = DiceRoller::new();

    // Plain notation
    test_roll(&mut roller, "d20", "Basic d20");
    test_roll(&mut roller, "2d6", "Two d6");
    test_roll(&mut roller, "1d20+5", "d20 with modifier");
    test_roll(&mut roller, "2d6+3", "2d6 with modifier");
    test_roll(&mut roller, "8d6", "Fireball damage");
    test_roll(&mut roller, "1d7", "Unsupported die");

    // Composite rolls
    println!("d20+2 with advantage: {}", roller.ability_check(2, Advantage::Advantage));
    println!("d20-1 with disadvantage: {}", roller.ability_check(-1, Advantage::Disadvantage));
    println!("Attack +5: {}", roller.attack(5));
    println!("Longsword damage: {}", roller.damage("1d8", 3));
    println!("Initiative: {}", roller.initiative(2));

    println!("\n=== Done ===");
}

fn test_roll(roller: &mut DiceRoller, notation: &str, description: &str) {
    println!("Rolling {notation} ({description})... {}", roller.roll(notation));
}
