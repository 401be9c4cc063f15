//! Armor class resolution.
//!
//! Base AC comes from the first equipped body armor (formula first, then
//! category rules on a numeric base), or the unarmored default. The first
//! equipped shield adds its bonus on top.

use crate::ability::leading_integer;
use crate::character::{Ability, Character, ItemKind};
use crate::compendium::{Armor, ArmorCategory, Compendium};
use crate::engine::EngineConfig;
use serde::{Deserialize, Serialize};

/// Resolved armor class, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorClass {
    /// Armor (or unarmored) value including the dexterity term.
    pub base: i32,
    pub shield_bonus: i32,
    /// Compendium id of the armor that set `base`, if any.
    pub armor_id: Option<String>,
    /// Compendium id of the shield that counted, if any.
    pub shield_id: Option<String>,
}

impl ArmorClass {
    pub fn total(&self) -> i32 {
        self.base.saturating_add(self.shield_bonus)
    }
}

/// AC from a formula string such as `"11 + DEX"` or `"12 + DEX (max. 2)"`.
///
/// Shapes are checked in order: capped dexterity, uncapped dexterity, fixed
/// value. The base is the first integer in the formula, else `fallback`.
pub fn formula_ac(formula: &str, dex_mod: i32, fallback: i32) -> i32 {
    let base = leading_integer(formula).unwrap_or_else(|| {
        tracing::debug!(formula, fallback, "armor formula has no integer");
        fallback
    });

    let compact: String = formula
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    if !compact.contains("+dex") {
        return base;
    }

    let cap = compact
        .find("max.")
        .and_then(|idx| leading_integer(&compact[idx..]));
    match cap {
        Some(cap) => base.saturating_add(dex_mod.min(cap)),
        None => base.saturating_add(dex_mod),
    }
}

/// AC from a numeric base, applying dexterity by armor category.
pub fn category_ac(base_ac: i32, category: ArmorCategory, dex_mod: i32, medium_cap: i32) -> i32 {
    let dex_bonus = match category {
        ArmorCategory::Light | ArmorCategory::Unknown => dex_mod,
        ArmorCategory::Medium => dex_mod.min(medium_cap),
        ArmorCategory::Heavy | ArmorCategory::Shield => 0,
    };
    base_ac.saturating_add(dex_bonus)
}

/// Base AC an armor piece gives, or `None` when it carries neither a
/// formula nor a numeric base.
fn armor_base(armor: &Armor, dex_mod: i32, config: &EngineConfig) -> Option<i32> {
    if let Some(formula) = armor.ac_formula.as_deref().filter(|f| !f.trim().is_empty()) {
        return Some(formula_ac(formula, dex_mod, config.formula_fallback_ac));
    }
    armor
        .base_ac
        .map(|base| category_ac(base, armor.category, dex_mod, config.medium_armor_dex_cap))
}

/// Resolve AC from the character's equipped inventory.
///
/// Entries whose item id is not in the compendium are skipped.
pub fn resolve_armor_class(
    character: &Character,
    compendium: &Compendium,
    config: &EngineConfig,
) -> ArmorClass {
    let dex_mod = character.ability_scores.modifier(Ability::Dexterity);

    let mut body: Option<&Armor> = None;
    let mut shield: Option<&Armor> = None;

    for entry in character.equipped_items() {
        let Some(armor) = compendium.armor(&entry.item_id) else {
            if entry.kind == ItemKind::Armor {
                tracing::debug!(item_id = %entry.item_id, "equipped armor not in compendium");
            }
            continue;
        };

        if armor.is_shield() {
            if shield.is_none() {
                shield = Some(armor);
            } else {
                tracing::debug!(item_id = %armor.id, "ignoring additional equipped shield");
            }
        } else if body.is_none() {
            body = Some(armor);
        } else {
            tracing::debug!(item_id = %armor.id, "ignoring additional equipped armor");
        }
    }

    let unarmored = config.unarmored_base.saturating_add(dex_mod);
    let (base, armor_id) = match body {
        Some(armor) => match armor_base(armor, dex_mod, config) {
            Some(base) => (base, Some(armor.id.clone())),
            None => (unarmored, None),
        },
        None => (unarmored, None),
    };

    let shield_bonus = shield
        .map(|s| s.ac_bonus.or(s.base_ac).unwrap_or(config.default_shield_bonus))
        .unwrap_or(0);

    ArmorClass {
        base,
        shield_bonus,
        armor_id,
        shield_id: shield.map(|s| s.id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::InventoryEntry;
    use crate::compendium::Weapon;
    use crate::items::standard_compendium;

    fn character_with_dex(dex: i32) -> Character {
        let mut character = Character::new("Test");
        character.ability_scores.dexterity = dex;
        character
    }

    fn ac(character: &Character, compendium: &Compendium) -> i32 {
        resolve_armor_class(character, compendium, &EngineConfig::default()).total()
    }

    #[test]
    fn test_formula_shapes() {
        assert_eq!(formula_ac("11 + DEX", 2, 10), 13);
        assert_eq!(formula_ac("12 + DEX (max. 2)", 4, 10), 14);
        assert_eq!(formula_ac("12 + DEX (max. 2)", 1, 10), 13);
        assert_eq!(formula_ac("16", 3, 10), 16);
        assert_eq!(formula_ac("13+dex", -1, 10), 12);
    }

    #[test]
    fn test_formula_without_integer_falls_back() {
        assert_eq!(formula_ac("DEX", 2, 10), 10);
        assert_eq!(formula_ac("base + DEX", 2, 10), 12);
        assert_eq!(formula_ac("as plate", 2, 10), 10);
    }

    #[test]
    fn test_category_rules() {
        assert_eq!(category_ac(11, ArmorCategory::Light, 4, 2), 15);
        assert_eq!(category_ac(14, ArmorCategory::Medium, 4, 2), 16);
        assert_eq!(category_ac(14, ArmorCategory::Medium, -1, 2), 13);
        assert_eq!(category_ac(16, ArmorCategory::Heavy, 4, 2), 16);
    }

    #[test]
    fn test_unarmored() {
        let character = character_with_dex(14);
        assert_eq!(ac(&character, &Compendium::new()), 12);
    }

    #[test]
    fn test_formula_armor() {
        let mut character = character_with_dex(14);
        character
            .inventory
            .push(InventoryEntry::armor("leather_armor").equipped());
        assert_eq!(ac(&character, &standard_compendium()), 13);

        let mut character = character_with_dex(18);
        character
            .inventory
            .push(InventoryEntry::armor("hide_armor").equipped());
        assert_eq!(ac(&character, &standard_compendium()), 14);
    }

    #[test]
    fn test_heavy_armor_base_only() {
        let compendium: Compendium =
            vec![Armor::new("plate", "Plate", ArmorCategory::Heavy, 16)].into_iter().collect();
        for dex in [6, 10, 20] {
            let mut character = character_with_dex(dex);
            character.inventory.push(InventoryEntry::armor("plate").equipped());
            assert_eq!(ac(&character, &compendium), 16);
        }
    }

    #[test]
    fn test_formula_wins_over_base() {
        let compendium: Compendium = vec![Armor::new("odd", "Odd", ArmorCategory::Heavy, 16)
            .with_formula("12 + DEX")]
        .into_iter()
        .collect();
        let mut character = character_with_dex(14);
        character.inventory.push(InventoryEntry::armor("odd").equipped());
        assert_eq!(ac(&character, &compendium), 14);
    }

    #[test]
    fn test_shield_adds_bonus() {
        let mut character = character_with_dex(14);
        character.inventory.push(InventoryEntry::armor("shield").equipped());
        assert_eq!(ac(&character, &standard_compendium()), 14);

        character
            .inventory
            .push(InventoryEntry::armor("chain_mail").equipped());
        let resolved =
            resolve_armor_class(&character, &standard_compendium(), &EngineConfig::default());
        assert_eq!(resolved.base, 16);
        assert_eq!(resolved.shield_bonus, 2);
        assert_eq!(resolved.total(), 18);
        assert_eq!(resolved.armor_id.as_deref(), Some("chain_mail"));
        assert_eq!(resolved.shield_id.as_deref(), Some("shield"));
    }

    #[test]
    fn test_shield_without_bonus_uses_default() {
        let mut bare = Armor::shield("buckler", "Buckler", 0);
        bare.ac_bonus = None;
        let compendium: Compendium = vec![bare].into_iter().collect();

        let mut character = character_with_dex(10);
        character.inventory.push(InventoryEntry::armor("buckler").equipped());
        assert_eq!(ac(&character, &compendium), 12);
    }

    #[test]
    fn test_only_first_shield_counts() {
        let compendium: Compendium = vec![
            Armor::shield("shield", "Shield", 2),
            Armor::shield("tower", "Tower Shield", 3),
        ]
        .into_iter()
        .collect();

        let mut character = character_with_dex(10);
        character.inventory.push(InventoryEntry::armor("shield").equipped());
        character.inventory.push(InventoryEntry::armor("tower").equipped());
        assert_eq!(ac(&character, &compendium), 12);
    }

    #[test]
    fn test_unequipped_and_unresolved_items_ignored() {
        let mut character = character_with_dex(14);
        character.inventory.push(InventoryEntry::armor("plate_armor"));
        character.inventory.push(InventoryEntry::armor("mithral_mystery").equipped());
        assert_eq!(ac(&character, &standard_compendium()), 12);
    }

    #[test]
    fn test_armor_without_any_ac_data_is_unarmored() {
        let compendium: Compendium =
            vec![Armor::new("robe", "Robe", ArmorCategory::Light, 0).without_base_ac()]
                .into_iter()
                .collect();
        let mut character = character_with_dex(16);
        character.inventory.push(InventoryEntry::armor("robe").equipped());
        assert_eq!(ac(&character, &compendium), 13);

        // A weapon id in an armor slot resolves to nothing
        let weapons: Compendium = vec![Weapon::new("club", "Club", "simple", "1d4", "bludgeoning")]
            .into_iter()
            .collect();
        let mut character = character_with_dex(16);
        character.inventory.push(InventoryEntry::armor("club").equipped());
        assert_eq!(ac(&character, &weapons), 13);
    }
}
