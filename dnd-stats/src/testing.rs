//! Testing utilities for the stats engine.
//!
//! This module provides:
//! - Sample characters built on the standard compendium
//! - `CharacterFixture` for building characters in one expression
//! - Assertion helpers for derived stat blocks

use crate::character::{
    Ability, AbilityScores, Character, InventoryEntry, ItemKind, StorageLocation,
};
use crate::engine::DerivedStats;
use serde_json::Value;

// ============================================================================
// Fixture Builder
// ============================================================================

/// Builder for test characters.
#[derive(Debug, Clone)]
pub struct CharacterFixture {
    character: Character,
}

impl CharacterFixture {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            character: Character::new(name),
        }
    }

    pub fn level(mut self, level: i32) -> Self {
        self.character.level = level;
        self
    }

    pub fn scores(mut self, scores: AbilityScores) -> Self {
        self.character.ability_scores = scores;
        self
    }

    pub fn score(mut self, ability: Ability, value: i32) -> Self {
        self.character.ability_scores.set(ability, value);
        self
    }

    pub fn hit_die(mut self, die: i32) -> Self {
        self.character.hit_die = Some(die);
        self
    }

    pub fn spellcasting(mut self, ability: Ability) -> Self {
        self.character.spellcasting_ability = Some(ability);
        self
    }

    pub fn imperial(mut self) -> Self {
        self.character.use_metric = false;
        self
    }

    pub fn save(mut self, ability: Ability) -> Self {
        self.character.proficiencies.saving_throws.insert(ability);
        self
    }

    pub fn skill(mut self, tag: impl Into<String>) -> Self {
        self.character.proficiencies.skills.insert(tag.into());
        self
    }

    pub fn weapon_proficiency(mut self, tag: impl Into<String>) -> Self {
        self.character.proficiencies.weapons.insert(tag.into());
        self
    }

    pub fn armor_proficiency(mut self, tag: impl Into<String>) -> Self {
        self.character.proficiencies.armor.insert(tag.into());
        self
    }

    pub fn fighting_style(mut self, style: impl Into<String>) -> Self {
        self.character.fighting_styles.push(style.into());
        self
    }

    /// Add an equipped item.
    pub fn equip(self, item_id: impl Into<String>, kind: ItemKind) -> Self {
        self.entry(InventoryEntry::new(item_id, kind).equipped())
    }

    /// Add an equipped weapon with attachment flags, e.g.
    /// `[("is_offhand", json!(true))]`.
    pub fn equip_with(
        self,
        item_id: impl Into<String>,
        attachments: impl IntoIterator<Item = (&'static str, Value)>,
    ) -> Self {
        let entry = attachments.into_iter().fold(
            InventoryEntry::weapon(item_id).equipped(),
            |entry, (key, value)| entry.with_attachment(key, value),
        );
        self.entry(entry)
    }

    /// Add carried but unequipped items.
    pub fn carry(self, item_id: impl Into<String>, kind: ItemKind, quantity: u32) -> Self {
        self.entry(
            InventoryEntry::new(item_id, kind)
                .with_quantity(quantity)
                .in_location(StorageLocation::Backpack),
        )
    }

    pub fn entry(mut self, entry: InventoryEntry) -> Self {
        self.character.inventory.push(entry);
        self
    }

    pub fn build(self) -> Character {
        self.character
    }
}

// ============================================================================
// Sample Characters
// ============================================================================

/// Level 3 fighter in chain mail with a shield and a longsword.
pub fn create_sample_fighter(name: &str) -> Character {
    CharacterFixture::new(name)
        .level(3)
        .scores(AbilityScores::new(16, 14, 14, 10, 12, 8))
        .hit_die(10)
        .save(Ability::Strength)
        .save(Ability::Constitution)
        .skill("Athletics")
        .skill("Perception")
        .skill("Intimidation")
        .weapon_proficiency("Simple Weapons")
        .weapon_proficiency("Martial Weapons")
        .armor_proficiency("All Armor")
        .armor_proficiency("Shields")
        .equip("chain_mail", ItemKind::Armor)
        .equip("shield", ItemKind::Armor)
        .equip("longsword", ItemKind::Weapon)
        .carry("backpack", ItemKind::Gear, 1)
        .carry("rations", ItemKind::Gear, 5)
        .build()
}

/// Level 3 wizard, unarmored, with a quarterstaff.
pub fn create_sample_wizard(name: &str) -> Character {
    CharacterFixture::new(name)
        .level(3)
        .scores(AbilityScores::new(8, 14, 12, 16, 13, 10))
        .hit_die(6)
        .spellcasting(Ability::Intelligence)
        .save(Ability::Intelligence)
        .save(Ability::Wisdom)
        .skill("Arcana")
        .skill("History")
        .weapon_proficiency("Daggers")
        .weapon_proficiency("Darts")
        .weapon_proficiency("Slings")
        .weapon_proficiency("Quarterstaffs")
        .weapon_proficiency("Light Crossbows")
        .equip("quarterstaff", ItemKind::Weapon)
        .carry("dagger", ItemKind::Weapon, 1)
        .build()
}

/// Level 5 rogue fighting with a rapier and an offhand shortsword.
pub fn create_sample_rogue(name: &str) -> Character {
    CharacterFixture::new(name)
        .level(5)
        .scores(AbilityScores::new(10, 18, 12, 13, 10, 14))
        .hit_die(8)
        .save(Ability::Dexterity)
        .save(Ability::Intelligence)
        .skill("Stealth")
        .skill("Sleight of Hand")
        .skill("Perception")
        .skill("Deception")
        .weapon_proficiency("Simple Weapons")
        .weapon_proficiency("Hand Crossbows")
        .weapon_proficiency("Longswords")
        .weapon_proficiency("Rapiers")
        .weapon_proficiency("Shortswords")
        .armor_proficiency("Light Armor")
        .equip("leather_armor", ItemKind::Armor)
        .equip("rapier", ItemKind::Weapon)
        .equip_with("shortsword", [("is_offhand", Value::Bool(true))])
        .build()
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the attack for `weapon_id` has the given bonus and damage text.
#[track_caller]
pub fn assert_attack(stats: &DerivedStats, weapon_id: &str, attack_bonus: i32, damage: &str) {
    let Some(attack) = stats.weapon_attacks.iter().find(|a| a.weapon_id == weapon_id) else {
        panic!("Expected an attack with '{weapon_id}'");
    };
    assert_eq!(
        (attack.attack_bonus, attack.damage.as_str()),
        (attack_bonus, damage),
        "Unexpected attack line for '{weapon_id}'"
    );
}

/// Assert there is no attack for `weapon_id`.
#[track_caller]
pub fn assert_no_attack(stats: &DerivedStats, weapon_id: &str) {
    assert!(
        stats.weapon_attacks.iter().all(|a| a.weapon_id != weapon_id),
        "Expected no attack with '{weapon_id}'"
    );
}
