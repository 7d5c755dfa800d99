//! # weapon_affix - Persistent Weapon Affix Data and Shield Calculators
//!
//! The data core of an equipment-affix game mod:
//! - **Affix data** attached to items (basic elements and initial
//!   attribute modifiers) with exact, ordered round-trip persistence
//! - **Shield calculators** deriving coefficient, regen rate and regen
//!   delay from plain entity inputs
//!
//! Host wiring (events, rendering, loot tables, commands) lives outside
//! this crate. The host hands in numbers and stores the records this
//! crate produces.
//!
//! ## Persisted Layout
//!
//! ```text
//! {
//!   "basic_elements":    [ { "key", "source", "tier" }, ... ],
//!   "initial_modifiers": [ { "attachment_key", "modifier_id", "modifier_name",
//!                            "amount", "operation" }, ... ]
//! }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use weapon_affix::*;
//!
//! let mut data = WeaponData::new();
//! data.add_basic_element("fire", element::SOURCE_RANDOM, 3);
//! data.add_initial_modifier(InitialModifierEntry::new(
//!     "generic.attack_damage",
//!     AttributeModifier::random("Searing edge", 0.1, Operation::AddMultipliedTotal),
//! ));
//!
//! let json = data.to_json().unwrap();
//! let restored = WeaponData::from_json(&json).unwrap();
//! assert_eq!(restored, data);
//!
//! assert_eq!(calculator::shield_regen_rate(1000.0), 65.0);
//! assert_eq!(calculator::shield_regen_delay(true, true), 120);
//! ```
//!
//! ## Modules
//!
//! - [`weapon_data`] - The `WeaponData` aggregate
//! - [`element`] - Basic elements
//! - [`modifier`] - Attribute modifiers and their application
//! - [`record`] - Persisted record tree and JSON codec
//! - [`calculator`] - Shield formulas
//! - [`registry`] - Element and attachment tables loaded from TOML
//! - [`key`] - Interned identifier type
//! - [`error`] - Error types

pub mod calculator;
pub mod element;
pub mod error;
pub mod key;
pub mod modifier;
pub mod record;
pub mod registry;
pub mod weapon_data;

pub use element::BasicEntry;
pub use error::{AffixError, MalformedKind, MalformedRecordError};
pub use key::AffixKey;
pub use modifier::{apply_modifiers, AttributeModifier, InitialModifierEntry, Operation};
pub use record::{Record, RecordMap};
pub use registry::{AffixRegistry, ElementDef};
pub use weapon_data::WeaponData;

pub use calculator::{shield_coefficient, shield_regen_delay, shield_regen_rate, TICKS_PER_SECOND};
