//! Weapon attack resolution.
//!
//! Every equipped inventory entry that resolves to a weapon produces one
//! [`WeaponAttack`], in inventory order. Proficiency never removes an
//! attack from the list; it only drops the proficiency term.

use crate::bonus::{total_bonus, EnchantmentBonus};
use crate::character::{normalize_tag, Ability, Character, InventoryEntry, ItemKind};
use crate::compendium::{Compendium, Weapon};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

// ============================================================================
// Stance
// ============================================================================

/// How the weapon is held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    #[default]
    OneHanded,
    TwoHanded,
    Offhand,
}

/// Wielding stance of one equipped weapon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponStance {
    pub hand: Hand,
    pub two_weapon_fighting: bool,
}

fn flag(bag: &Map<String, Value>, key: &str) -> bool {
    match bag.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    }
}

impl WeaponStance {
    pub fn new(hand: Hand) -> Self {
        Self {
            hand,
            two_weapon_fighting: false,
        }
    }

    pub fn with_two_weapon_fighting(mut self) -> Self {
        self.two_weapon_fighting = true;
        self
    }

    /// Read the `is_offhand`, `two_handed` and `two_weapon_fighting` flags.
    ///
    /// A weapon flagged both two-handed and offhand is treated as two-handed.
    pub fn from_attachments(bag: &Map<String, Value>) -> Self {
        let hand = if flag(bag, "two_handed") {
            Hand::TwoHanded
        } else if flag(bag, "is_offhand") {
            Hand::Offhand
        } else {
            Hand::OneHanded
        };
        Self {
            hand,
            two_weapon_fighting: flag(bag, "two_weapon_fighting"),
        }
    }

    /// An offhand attack only adds its ability modifier to damage with
    /// two-weapon fighting.
    pub fn adds_ability_to_damage(&self) -> bool {
        self.hand != Hand::Offhand || self.two_weapon_fighting
    }
}

// ============================================================================
// Proficiency
// ============================================================================

/// Declared aliases of the weapon category vocabulary.
const CATEGORY_ALIASES: &[(&str, &[&str])] = &[
    (
        "simple",
        &[
            "simple",
            "simple weapon",
            "simple weapons",
            "einfache waffe",
            "einfache waffen",
        ],
    ),
    (
        "martial",
        &[
            "martial",
            "martial weapon",
            "martial weapons",
            "kriegswaffe",
            "kriegswaffen",
        ],
    ),
    (
        "ranged",
        &[
            "ranged",
            "ranged weapon",
            "ranged weapons",
            "fernkampfwaffe",
            "fernkampfwaffen",
        ],
    ),
    (
        "melee",
        &[
            "melee",
            "melee weapon",
            "melee weapons",
            "nahkampfwaffe",
            "nahkampfwaffen",
        ],
    ),
    (
        "thrown",
        &[
            "thrown",
            "thrown weapon",
            "thrown weapons",
            "wurfwaffe",
            "wurfwaffen",
        ],
    ),
    (
        "polearm",
        &[
            "polearm",
            "polearms",
            "stangenwaffe",
            "stangenwaffen",
        ],
    ),
];

/// Canonical form of a proficiency or weapon tag.
///
/// Normalizes the tag, maps declared category aliases onto their canonical
/// word, and otherwise drops a plural `s` so `"Longswords"` matches a
/// `"Longsword"`.
pub fn canonical_tag(tag: &str) -> String {
    let tag = normalize_tag(tag);
    if let Some((canonical, _)) = CATEGORY_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&tag.as_str()))
    {
        return canonical.to_string();
    }
    match tag.strip_suffix('s') {
        Some(singular) if !singular.is_empty() && !singular.ends_with('s') => singular.to_string(),
        _ => tag,
    }
}

/// Canonical tags a weapon can be matched by: its name, category,
/// category label and subtype, plus any category words inside a compound
/// label like `"Martial Melee Weapons"`.
pub fn weapon_tags(weapon: &Weapon) -> BTreeSet<String> {
    let sources = [
        Some(weapon.name.as_str()),
        Some(weapon.category.as_str()),
        weapon.category_label.as_deref(),
        weapon.subtype.as_deref(),
    ];

    let mut tags = BTreeSet::new();
    for source in sources.into_iter().flatten() {
        if source.trim().is_empty() {
            continue;
        }
        tags.insert(canonical_tag(source));
        for word in normalize_tag(source).split(' ') {
            let word = canonical_tag(word);
            if CATEGORY_ALIASES.iter().any(|(canonical, _)| *canonical == word) {
                tags.insert(word);
            }
        }
    }
    tags
}

/// Whether any weapon proficiency tag names this weapon.
pub fn is_proficient(proficiencies: &BTreeSet<String>, weapon: &Weapon) -> bool {
    let tags = weapon_tags(weapon);
    proficiencies
        .iter()
        .any(|tag| tags.contains(&canonical_tag(tag)))
}

// ============================================================================
// Attacks
// ============================================================================

/// Ability used for attack and damage rolls.
///
/// Ranged weapons use dexterity; finesse weapons use the better of
/// strength and dexterity (strength on a tie); everything else strength.
pub fn attack_ability(character: &Character, weapon: &Weapon) -> Ability {
    let scores = &character.ability_scores;
    if weapon.is_ranged() {
        Ability::Dexterity
    } else if weapon.is_finesse()
        && scores.modifier(Ability::Dexterity) > scores.modifier(Ability::Strength)
    {
        Ability::Dexterity
    } else {
        Ability::Strength
    }
}

/// One resolved weapon attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponAttack {
    pub weapon_id: String,
    pub name: String,
    pub ability: Ability,
    pub proficient: bool,
    pub stance: WeaponStance,
    pub attack_bonus: i32,
    /// Dice actually rolled, after the versatile switch.
    pub damage_dice: String,
    pub damage_modifier: i32,
    pub damage_type: String,
    /// Display form, e.g. `"1d8+3 slashing (1d10)"`.
    pub damage: String,
    /// Range labels followed by property names.
    pub properties: Vec<String>,
}

fn format_damage(dice: &str, modifier: i32, damage_type: &str, versatile: Option<&str>) -> String {
    let mut damage = match modifier {
        0 => dice.to_string(),
        m if m > 0 => format!("{dice}+{m}"),
        m => format!("{dice}{m}"),
    };
    if !damage_type.trim().is_empty() {
        damage.push(' ');
        damage.push_str(damage_type.trim());
    }
    if let Some(versatile) = versatile {
        damage.push_str(&format!(" ({versatile})"));
    }
    damage
}

fn property_labels(weapon: &Weapon) -> Vec<String> {
    weapon
        .effective_range()
        .into_iter()
        .chain(weapon.thrown_range)
        .map(|range| range.label())
        .chain(weapon.properties.iter().map(|p| p.name.clone()))
        .collect()
}

/// Resolve one equipped weapon for a character.
pub fn resolve_attack(
    character: &Character,
    weapon: &Weapon,
    entry: &InventoryEntry,
    proficiency_bonus: i32,
) -> WeaponAttack {
    let ability = attack_ability(character, weapon);
    let ability_mod = character.ability_scores.modifier(ability);
    let proficient = is_proficient(&character.proficiencies.weapons, weapon);

    let mut stance = WeaponStance::from_attachments(&entry.custom_data);
    if character.has_fighting_style("two weapon fighting") || character.has_fighting_style("twf") {
        stance.two_weapon_fighting = true;
    }

    let EnchantmentBonus { attack, damage } = total_bonus(weapon, entry);
    let proficiency = if proficient { proficiency_bonus } else { 0 };
    let damage_ability = if stance.adds_ability_to_damage() { ability_mod } else { 0 };
    let attack_bonus = ability_mod.saturating_add(proficiency).saturating_add(attack);
    let damage_modifier = damage_ability.saturating_add(damage);

    let versatile = weapon.versatile_dice();
    let (damage_dice, versatile_label) = match (versatile, stance.hand) {
        (Some(dice), Hand::TwoHanded) => (dice.to_string(), None),
        (label, _) => (weapon.damage_dice.clone(), label),
    };

    WeaponAttack {
        weapon_id: weapon.id.clone(),
        name: weapon.name.clone(),
        ability,
        proficient,
        stance,
        attack_bonus,
        damage: format_damage(&damage_dice, damage_modifier, &weapon.damage_type, versatile_label),
        damage_dice,
        damage_modifier,
        damage_type: weapon.damage_type.clone(),
        properties: property_labels(weapon),
    }
}

/// Resolve every equipped weapon, in inventory order.
///
/// Entries whose id does not resolve to a weapon are skipped.
pub fn resolve_attacks(
    character: &Character,
    compendium: &Compendium,
    proficiency_bonus: i32,
) -> Vec<WeaponAttack> {
    character
        .equipped_items()
        .filter_map(|entry| match compendium.weapon(&entry.item_id) {
            Some(weapon) => Some(resolve_attack(character, weapon, entry, proficiency_bonus)),
            None => {
                if entry.kind == ItemKind::Weapon {
                    tracing::debug!(item_id = %entry.item_id, "equipped weapon not in compendium");
                }
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compendium::{PropertyParameter, WeaponProperty};
    use crate::items::{get_weapon, standard_compendium};
    use serde_json::json;

    fn bag(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn profs(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    fn rogue() -> Character {
        let mut character = Character::new("Rogue");
        character.level = 5;
        character.ability_scores.strength = 10;
        character.ability_scores.dexterity = 18;
        character.proficiencies.weapons.insert("Simple Weapons".to_string());
        character.proficiencies.weapons.insert("Rapiers".to_string());
        character.proficiencies.weapons.insert("Shortswords".to_string());
        character
    }

    #[test]
    fn test_stance_from_attachments() {
        assert_eq!(WeaponStance::from_attachments(&Map::new()).hand, Hand::OneHanded);

        let offhand = WeaponStance::from_attachments(&bag(json!({ "is_offhand": true })));
        assert_eq!(offhand.hand, Hand::Offhand);
        assert!(!offhand.adds_ability_to_damage());

        let twf = WeaponStance::from_attachments(&bag(json!({
            "is_offhand": "true", "two_weapon_fighting": 1
        })));
        assert_eq!(twf, WeaponStance::new(Hand::Offhand).with_two_weapon_fighting());
        assert!(twf.adds_ability_to_damage());

        let both = WeaponStance::from_attachments(&bag(json!({
            "is_offhand": true, "two_handed": true
        })));
        assert_eq!(both.hand, Hand::TwoHanded);
    }

    #[test]
    fn test_canonical_tag() {
        assert_eq!(canonical_tag("Martial Weapons"), "martial");
        assert_eq!(canonical_tag("Kriegswaffen"), "martial");
        assert_eq!(canonical_tag(" simple "), "simple");
        assert_eq!(canonical_tag("Longswords"), "longsword");
        assert_eq!(canonical_tag("Light Crossbows"), "light crossbow");
        assert_eq!(canonical_tag("Dagger"), "dagger");
        assert_eq!(canonical_tag("Glass"), "glass");
    }

    #[test]
    fn test_proficiency_matching_is_exact() {
        let Some(longsword) = get_weapon("longsword") else {
            panic!("longsword missing");
        };
        assert!(is_proficient(&profs(&["Martial Weapons"]), &longsword));
        assert!(is_proficient(&profs(&["longswords"]), &longsword));
        assert!(!is_proficient(&profs(&["Simple Weapons"]), &longsword));
        // No substring matches
        assert!(!is_proficient(&profs(&["sword"]), &longsword));
        assert!(!is_proficient(&profs(&["long"]), &longsword));
    }

    #[test]
    fn test_compound_category_label() {
        let pike = Weapon::new("pike", "Pike", "Waffe", "1d10", "piercing")
            .with_category_label("Martial Melee Weapons");
        let profs: BTreeSet<String> = ["martial".to_string()].into_iter().collect();
        assert!(is_proficient(&profs, &pike));
    }

    #[test]
    fn test_finesse_attack_uses_dexterity() {
        let character = rogue();
        let Some(rapier) = get_weapon("rapier") else {
            panic!("rapier missing");
        };
        let entry = InventoryEntry::weapon("rapier").equipped();
        let attack = resolve_attack(&character, &rapier, &entry, 3);

        assert_eq!(attack.ability, Ability::Dexterity);
        assert!(attack.proficient);
        assert_eq!(attack.attack_bonus, 7);
        assert_eq!(attack.damage_modifier, 4);
        assert_eq!(attack.damage, "1d8+4 piercing");
    }

    #[test]
    fn test_finesse_tie_uses_strength() {
        let mut character = rogue();
        character.ability_scores.strength = 18;
        let Some(dagger) = get_weapon("dagger") else {
            panic!("dagger missing");
        };
        let attack = resolve_attack(&character, &dagger, &InventoryEntry::weapon("dagger"), 3);
        assert_eq!(attack.ability, Ability::Strength);
    }

    #[test]
    fn test_offhand_without_twf_drops_ability_damage() {
        let character = rogue();
        let Some(shortsword) = get_weapon("shortsword") else {
            panic!("shortsword missing");
        };
        let entry = InventoryEntry::weapon("shortsword")
            .equipped()
            .with_attachment("is_offhand", true);
        let attack = resolve_attack(&character, &shortsword, &entry, 3);

        assert_eq!(attack.attack_bonus, 7);
        assert_eq!(attack.damage_modifier, 0);
        assert_eq!(attack.damage, "1d6 piercing");
    }

    #[test]
    fn test_fighting_style_restores_offhand_damage() {
        let mut character = rogue();
        character.fighting_styles.push("Two-Weapon Fighting".to_string());
        let Some(shortsword) = get_weapon("shortsword") else {
            panic!("shortsword missing");
        };
        let entry = InventoryEntry::weapon("shortsword")
            .equipped()
            .with_attachment("is_offhand", true);
        let attack = resolve_attack(&character, &shortsword, &entry, 3);

        assert!(attack.stance.two_weapon_fighting);
        assert_eq!(attack.damage_modifier, 4);
    }

    #[test]
    fn test_enchanted_offhand_keeps_only_enchantment_damage() {
        let character = rogue();
        let Some(mut shortsword) = get_weapon("shortsword") else {
            panic!("shortsword missing");
        };
        shortsword.properties.push(
            WeaponProperty::new("magic", "+1")
                .with_parameter(PropertyParameter::Bonus { attack: 1, damage: 1 }),
        );
        let entry = InventoryEntry::weapon("shortsword")
            .equipped()
            .with_attachment("is_offhand", true)
            .with_attachment("magic_bonus", 1);
        let attack = resolve_attack(&character, &shortsword, &entry, 3);

        // DEX +4, proficiency +3, property +1, instance +1
        assert_eq!(attack.attack_bonus, 9);
        // Ability dropped, both enchantments kept
        assert_eq!(attack.damage_modifier, 2);
        assert_eq!(attack.damage, "1d6+2 piercing");
    }

    #[test]
    fn test_versatile_switch() {
        let mut character = Character::new("Fighter");
        character.ability_scores.strength = 16;
        let Some(longsword) = get_weapon("longsword") else {
            panic!("longsword missing");
        };

        let entry = InventoryEntry::weapon("longsword");
        let one_hand = resolve_attack(&character, &longsword, &entry, 2);
        assert_eq!(one_hand.damage_dice, "1d8");
        assert_eq!(one_hand.damage, "1d8+3 slashing (1d10)");

        let entry = InventoryEntry::weapon("longsword").with_attachment("two_handed", true);
        let two_hand = resolve_attack(&character, &longsword, &entry, 2);
        assert_eq!(two_hand.damage_dice, "1d10");
        assert_eq!(two_hand.damage, "1d10+3 slashing");
    }

    #[test]
    fn test_ranged_weapon_labels() {
        let character = rogue();
        let Some(shortbow) = get_weapon("shortbow") else {
            panic!("shortbow missing");
        };
        let attack = resolve_attack(&character, &shortbow, &InventoryEntry::weapon("shortbow"), 3);
        assert_eq!(attack.ability, Ability::Dexterity);
        assert_eq!(attack.properties[0], "24/96");
        assert!(attack.properties.contains(&"Ammunition".to_string()));

        let Some(dagger) = get_weapon("dagger") else {
            panic!("dagger missing");
        };
        let attack = resolve_attack(&character, &dagger, &InventoryEntry::weapon("dagger"), 3);
        assert_eq!(attack.properties, vec!["6/18", "Finesse", "Light", "Thrown"]);
    }

    #[test]
    fn test_range_label_from_parameter() {
        let sling = Weapon::new("sling", "Sling", "simple", "1d4", "bludgeoning")
            .with_properties(vec![WeaponProperty::new("ammunition", "Ammunition")
                .with_parameter(PropertyParameter::Range { normal: 9, max: 36 })]);
        let attack = resolve_attack(&rogue(), &sling, &InventoryEntry::weapon("sling"), 3);
        assert_eq!(attack.properties, vec!["9/36", "Ammunition"]);
    }

    #[test]
    fn test_unproficient_and_enchanted() {
        let mut character = Character::new("Wizard");
        character.ability_scores.strength = 8;
        let Some(greataxe) = get_weapon("greataxe") else {
            panic!("greataxe missing");
        };
        let entry = InventoryEntry::weapon("greataxe").with_attachment("magic_bonus", 1);
        let attack = resolve_attack(&character, &greataxe, &entry, 2);

        assert!(!attack.proficient);
        assert_eq!(attack.attack_bonus, 0);
        assert_eq!(attack.damage_modifier, 0);
        assert_eq!(attack.damage, "1d12 slashing");
    }

    #[test]
    fn test_resolve_attacks_in_inventory_order() {
        let mut character = rogue();
        character.inventory = vec![
            InventoryEntry::weapon("shortbow").equipped(),
            InventoryEntry::weapon("longsword"),
            InventoryEntry::weapon("vorpal_blade").equipped(),
            InventoryEntry::armor("leather_armor").equipped(),
            InventoryEntry::weapon("dagger").equipped(),
        ];
        let attacks = resolve_attacks(&character, &standard_compendium(), 3);
        let ids: Vec<&str> = attacks.iter().map(|a| a.weapon_id.as_str()).collect();
        assert_eq!(ids, vec!["shortbow", "dagger"]);
    }
}
