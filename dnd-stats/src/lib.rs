//! D&D 5e derived character statistics engine.
//!
//! This crate provides:
//! - Ability, proficiency, saving throw and skill math
//! - Armor class resolution from formula or category rules
//! - Weapon attack lines with stance and enchantment handling
//! - Encumbrance tiers and a generic modifier overlay
//! - A standard SRD item compendium and JSON loading
//!
//! # Quick Start
//!
//! ```
//! use dnd_stats::{derive_stats, items, Character, InventoryEntry, Modifier};
//!
//! let mut character = Character::new("Thorin");
//! character.ability_scores.strength = 16;
//! character.proficiencies.weapons.insert("Martial Weapons".to_string());
//! character.inventory.push(InventoryEntry::weapon("longsword").equipped());
//! character.inventory.push(InventoryEntry::armor("chain_mail").equipped());
//!
//! let modifiers = vec![Modifier::add("ac", 1.0).with_source("Ring of Protection")];
//! let stats = derive_stats(&character, &items::standard_compendium(), &modifiers);
//!
//! assert_eq!(stats.ac, 17);
//! assert_eq!(stats.weapon_attacks[0].attack_bonus, 5);
//! ```

pub mod ability;
pub mod armor;
pub mod attack;
pub mod bonus;
pub mod character;
pub mod compendium;
pub mod encumbrance;
pub mod engine;
pub mod items;
pub mod load;
pub mod modifiers;
pub mod progression;
pub mod testing;

// Primary public API
pub use character::{
    Ability, AbilityScores, Character, CharacterId, InventoryEntry, ItemKind, Proficiencies, Skill,
};
pub use compendium::{Armor, ArmorCategory, Compendium, CompendiumItem, Gear, Weapon};
pub use encumbrance::{Encumbrance, EncumbranceStatus};
pub use engine::{derive_stats, DerivedStats, EngineConfig, StatsEngine};
pub use load::LoadError;
pub use modifiers::{Modifier, ModifierKind, ModifierTarget};
