//! Basic example: Building, persisting and reading back weapon affix data
//!
//! This example demonstrates:
//! - Adding basic elements and initial modifiers
//! - Saving to JSON and restoring
//! - Resolving an attachment slot
//! - Computing derived shield values
//!
//! Run with `RUST_LOG=debug` to see the decode log lines.

use tracing_subscriber::EnvFilter;
use weapon_affix::element::{SOURCE_CONFIG, SOURCE_RANDOM};
use weapon_affix::*;

fn main() -> Result<(), AffixError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut data = WeaponData::new();

    println!("Adding basic elements:");
    data.add_basic_element("fire", SOURCE_RANDOM, 3);
    println!("  - fire (RANDOM, tier 3)");
    data.add_basic_element("holy", SOURCE_CONFIG, 1);
    println!("  - holy (CONFIG, tier 1)");

    println!("\nAdding initial modifiers:");
    data.add_initial_modifier(InitialModifierEntry::new(
        "generic.attack_damage",
        AttributeModifier::random("Searing edge", 4.0, Operation::AddValue),
    ));
    println!("  - generic.attack_damage +4");
    data.add_initial_modifier(InitialModifierEntry::new(
        "generic.attack_damage",
        AttributeModifier::random("Blessed", 0.25, Operation::AddMultipliedTotal),
    ));
    println!("  - generic.attack_damage x1.25");

    let json = data.to_json()?;
    println!("\n=== Persisted Record ===");
    println!("{}", json);

    let restored = WeaponData::from_json(&json)?;
    println!("\nRestored equal to original: {}", restored == data);

    let damage = restored.resolve_attachment("generic.attack_damage", 6.0);
    println!("Attack damage from base 6: {:.2}", damage);

    println!("\n=== Shield ===");
    println!("Coefficient (level 100, base 50): {:.4}", shield_coefficient(100, 50));
    println!("Coefficient (level 10, base 50): {}", shield_coefficient(10, 50));
    println!("Regen rate (max shield 400): {:.2}", shield_regen_rate(400.0));
    println!(
        "Regen delay (player, depleted): {} ticks",
        shield_regen_delay(true, true)
    );

    Ok(())
}
