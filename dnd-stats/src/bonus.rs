//! Enchantment bonus extraction.
//!
//! A weapon attack can be enchanted from two independent places: `Bonus`
//! parameters on the weapon record's properties, and numeric keys in the
//! inventory entry's attachment bag. Both are summed.

use crate::ability::numeric_value;
use crate::character::InventoryEntry;
use crate::compendium::{PropertyParameter, Weapon};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::Add;

/// Shared bonus keys; the first one holding a number wins.
const SHARED_KEYS: &[&str] = &["magic_bonus", "bonus", "enhancement_bonus"];
const ATTACK_KEYS: &[&str] = &["attack_bonus", "to_hit_bonus", "hit_bonus"];
const DAMAGE_KEYS: &[&str] = &["damage_bonus", "dmg_bonus", "damage_mod"];

/// Attack and damage enchantment bonus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnchantmentBonus {
    pub attack: i32,
    pub damage: i32,
}

impl EnchantmentBonus {
    pub fn new(attack: i32, damage: i32) -> Self {
        Self { attack, damage }
    }

    /// Same bonus to attack and damage, like a +1 weapon.
    pub fn uniform(bonus: i32) -> Self {
        Self::new(bonus, bonus)
    }
}

impl Add for EnchantmentBonus {
    type Output = EnchantmentBonus;

    fn add(self, other: EnchantmentBonus) -> EnchantmentBonus {
        EnchantmentBonus {
            attack: self.attack.saturating_add(other.attack),
            damage: self.damage.saturating_add(other.damage),
        }
    }
}

impl std::iter::Sum for EnchantmentBonus {
    fn sum<I: Iterator<Item = EnchantmentBonus>>(iter: I) -> Self {
        iter.fold(EnchantmentBonus::default(), |total, bonus| total + bonus)
    }
}

/// Sum of every `Bonus` parameter on the weapon's properties.
///
/// Unparsed payloads contribute nothing.
pub fn property_bonus(weapon: &Weapon) -> EnchantmentBonus {
    weapon
        .properties
        .iter()
        .filter_map(|property| match property.parameter {
            Some(PropertyParameter::Bonus { attack, damage }) => {
                Some(EnchantmentBonus::new(attack, damage))
            }
            _ => None,
        })
        .sum()
}

fn first_number(bag: &Map<String, Value>, keys: &[&str]) -> Option<i32> {
    keys.iter()
        .filter_map(|key| bag.get(*key))
        .find_map(numeric_value)
}

/// Bonus stored on one inventory instance.
///
/// Attack is `shared + attack-specific`, damage is `shared +
/// damage-specific`, with missing terms counting as zero.
pub fn instance_bonus(bag: &Map<String, Value>) -> EnchantmentBonus {
    let shared = first_number(bag, SHARED_KEYS).unwrap_or(0);
    let attack = first_number(bag, ATTACK_KEYS).unwrap_or(0);
    let damage = first_number(bag, DAMAGE_KEYS).unwrap_or(0);
    EnchantmentBonus::new(shared.saturating_add(attack), shared.saturating_add(damage))
}

/// Everything that enchants one equipped weapon.
pub fn total_bonus(weapon: &Weapon, entry: &InventoryEntry) -> EnchantmentBonus {
    property_bonus(weapon) + instance_bonus(&entry.custom_data)
}
