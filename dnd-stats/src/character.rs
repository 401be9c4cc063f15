//! Character snapshot types.
//!
//! A `Character` is the read-only input of the stats engine: ability
//! scores, level, proficiency tags, and an inventory of references into
//! the compendium. The engine never mutates it.

use crate::ability;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Tag Normalization
// ============================================================================

/// Normalize a free-form tag for comparison.
///
/// Lowercases, turns `-` and `_` into spaces, trims, and collapses runs of
/// whitespace, so `"Two-Weapon_Fighting "` becomes `"two weapon fighting"`.
pub fn normalize_tag(tag: &str) -> String {
    tag.to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Ability Scores
// ============================================================================

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ability {
    #[serde(rename = "str", alias = "strength", alias = "STR")]
    Strength,
    #[serde(rename = "dex", alias = "dexterity", alias = "DEX")]
    Dexterity,
    #[serde(rename = "con", alias = "constitution", alias = "CON")]
    Constitution,
    #[serde(rename = "int", alias = "intelligence", alias = "INT")]
    Intelligence,
    #[serde(rename = "wis", alias = "wisdom", alias = "WIS")]
    Wisdom,
    #[serde(rename = "cha", alias = "charisma", alias = "CHA")]
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }

    /// Parse an ability tag: abbreviation or full name, any case.
    pub fn from_tag(tag: &str) -> Option<Ability> {
        let tag = normalize_tag(tag);
        Ability::all()
            .into_iter()
            .find(|a| tag == a.abbreviation().to_lowercase() || tag == a.name().to_lowercase())
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Ability scores container.
///
/// Scores are nominally 1-30 but nothing here enforces that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    #[serde(rename = "str", alias = "strength")]
    pub strength: i32,
    #[serde(rename = "dex", alias = "dexterity")]
    pub dexterity: i32,
    #[serde(rename = "con", alias = "constitution")]
    pub constitution: i32,
    #[serde(rename = "int", alias = "intelligence")]
    pub intelligence: i32,
    #[serde(rename = "wis", alias = "wisdom")]
    pub wisdom: i32,
    #[serde(rename = "cha", alias = "charisma")]
    pub charisma: i32,
}

impl AbilityScores {
    pub fn new(str: i32, dex: i32, con: i32, int: i32, wis: i32, cha: i32) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    pub fn standard_array() -> Self {
        Self::new(15, 14, 13, 12, 10, 8)
    }

    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: i32) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        ability::modifier(self.get(ability))
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

// ============================================================================
// Skills
// ============================================================================

/// D&D 5e skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Skill {
    Athletics,
    Acrobatics,
    #[serde(rename = "Sleight of Hand")]
    SleightOfHand,
    Stealth,
    Arcana,
    History,
    Investigation,
    Nature,
    Religion,
    #[serde(rename = "Animal Handling")]
    AnimalHandling,
    Insight,
    Medicine,
    Perception,
    Survival,
    Deception,
    Intimidation,
    Performance,
    Persuasion,
}

impl Skill {
    /// The fixed governing ability of this skill.
    pub fn ability(&self) -> Ability {
        match self {
            Skill::Athletics => Ability::Strength,
            Skill::Acrobatics | Skill::SleightOfHand | Skill::Stealth => Ability::Dexterity,
            Skill::Arcana
            | Skill::History
            | Skill::Investigation
            | Skill::Nature
            | Skill::Religion => Ability::Intelligence,
            Skill::AnimalHandling
            | Skill::Insight
            | Skill::Medicine
            | Skill::Perception
            | Skill::Survival => Ability::Wisdom,
            Skill::Deception | Skill::Intimidation | Skill::Performance | Skill::Persuasion => {
                Ability::Charisma
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Skill::Athletics => "Athletics",
            Skill::Acrobatics => "Acrobatics",
            Skill::SleightOfHand => "Sleight of Hand",
            Skill::Stealth => "Stealth",
            Skill::Arcana => "Arcana",
            Skill::History => "History",
            Skill::Investigation => "Investigation",
            Skill::Nature => "Nature",
            Skill::Religion => "Religion",
            Skill::AnimalHandling => "Animal Handling",
            Skill::Insight => "Insight",
            Skill::Medicine => "Medicine",
            Skill::Perception => "Perception",
            Skill::Survival => "Survival",
            Skill::Deception => "Deception",
            Skill::Intimidation => "Intimidation",
            Skill::Performance => "Performance",
            Skill::Persuasion => "Persuasion",
        }
    }

    /// German sheet name, accepted as a proficiency tag alongside the English one.
    pub fn german_name(&self) -> &'static str {
        match self {
            Skill::Athletics => "Athletik",
            Skill::Acrobatics => "Akrobatik",
            Skill::SleightOfHand => "Fingerfertigkeit",
            Skill::Stealth => "Heimlichkeit",
            Skill::Arcana => "Arkana",
            Skill::History => "Geschichte",
            Skill::Investigation => "Nachforschen",
            Skill::Nature => "Naturkunde",
            Skill::Religion => "Religion",
            Skill::AnimalHandling => "Tierkunde",
            Skill::Insight => "Motiv erkennen",
            Skill::Medicine => "Heilkunde",
            Skill::Perception => "Wahrnehmung",
            Skill::Survival => "Überlebenskunst",
            Skill::Deception => "Täuschen",
            Skill::Intimidation => "Einschüchtern",
            Skill::Performance => "Auftreten",
            Skill::Persuasion => "Überzeugen",
        }
    }

    /// Other German spellings in circulation, from the translated handbook.
    pub fn german_aliases(&self) -> &'static [&'static str] {
        match self {
            Skill::Arcana => &["Arkane Kunde"],
            Skill::Investigation => &["Nachforschungen"],
            Skill::AnimalHandling => &["Mit Tieren umgehen"],
            _ => &[],
        }
    }

    pub fn all() -> [Skill; 18] {
        [
            Skill::Athletics,
            Skill::Acrobatics,
            Skill::SleightOfHand,
            Skill::Stealth,
            Skill::Arcana,
            Skill::History,
            Skill::Investigation,
            Skill::Nature,
            Skill::Religion,
            Skill::AnimalHandling,
            Skill::Insight,
            Skill::Medicine,
            Skill::Perception,
            Skill::Survival,
            Skill::Deception,
            Skill::Intimidation,
            Skill::Performance,
            Skill::Persuasion,
        ]
    }

    /// Whether a proficiency tag names this skill.
    pub fn matches_tag(&self, tag: &str) -> bool {
        let tag = normalize_tag(tag);
        std::iter::once(self.name())
            .chain(std::iter::once(self.german_name()))
            .chain(self.german_aliases().iter().copied())
            .any(|name| normalize_tag(name) == tag)
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Proficiencies
// ============================================================================

/// Proficiency tag sets.
///
/// Everything except saving throws is an opaque string tag; matching
/// against game vocabulary happens in the resolvers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proficiencies {
    #[serde(default)]
    pub skills: BTreeSet<String>,
    #[serde(default)]
    pub saving_throws: BTreeSet<Ability>,
    #[serde(default)]
    pub weapons: BTreeSet<String>,
    #[serde(default)]
    pub armor: BTreeSet<String>,
    #[serde(default)]
    pub tools: BTreeSet<String>,
    #[serde(default)]
    pub languages: BTreeSet<String>,
}

impl Proficiencies {
    pub fn has_skill(&self, skill: Skill) -> bool {
        self.skills.iter().any(|tag| skill.matches_tag(tag))
    }

    pub fn has_saving_throw(&self, ability: Ability) -> bool {
        self.saving_throws.contains(&ability)
    }
}

// ============================================================================
// Inventory
// ============================================================================

/// What kind of compendium record an inventory entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Weapon,
    Armor,
    Tool,
    Gear,
    MagicItem,
}

/// Whether the referenced record is core compendium data or a custom one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSource {
    #[default]
    Core,
    Custom,
}

/// Where a carried item is stored. Only relevant to weight bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageLocation {
    #[default]
    Body,
    Backpack,
    Mount,
    MagicContainer,
}

/// One inventory line: a compendium reference plus per-instance state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub item_id: String,
    pub kind: ItemKind,
    #[serde(default)]
    pub source: ItemSource,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default, alias = "is_equipped")]
    pub equipped: bool,
    #[serde(default)]
    pub location: StorageLocation,
    /// Open attachment bag: stance flags and instance-level magic bonuses.
    #[serde(default)]
    pub custom_data: Map<String, Value>,
}

fn default_quantity() -> u32 {
    1
}

impl InventoryEntry {
    pub fn new(item_id: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id: item_id.into(),
            kind,
            source: ItemSource::Core,
            quantity: 1,
            equipped: false,
            location: StorageLocation::Body,
            custom_data: Map::new(),
        }
    }

    pub fn weapon(item_id: impl Into<String>) -> Self {
        Self::new(item_id, ItemKind::Weapon)
    }

    pub fn armor(item_id: impl Into<String>) -> Self {
        Self::new(item_id, ItemKind::Armor)
    }

    pub fn equipped(mut self) -> Self {
        self.equipped = true;
        self
    }

    pub fn custom(mut self) -> Self {
        self.source = ItemSource::Custom;
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn in_location(mut self, location: StorageLocation) -> Self {
        self.location = location;
        self
    }

    /// Set one key of the attachment bag.
    pub fn with_attachment(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom_data.insert(key.into(), value.into());
        self
    }
}

// ============================================================================
// Character
// ============================================================================

/// Character snapshot handed to the stats engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    #[serde(default)]
    pub id: CharacterId,
    pub name: String,
    pub level: i32,
    #[serde(alias = "attributes")]
    pub ability_scores: AbilityScores,
    #[serde(default)]
    pub proficiencies: Proficiencies,
    #[serde(default)]
    pub inventory: Vec<InventoryEntry>,
    #[serde(default)]
    pub spellcasting_ability: Option<Ability>,
    #[serde(default = "default_use_metric")]
    pub use_metric: bool,
    /// Hit die size of the character's class (8 for a d8), if known.
    #[serde(default)]
    pub hit_die: Option<i32>,
    #[serde(default)]
    pub fighting_styles: Vec<String>,
}

fn default_use_metric() -> bool {
    true
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            level: 1,
            ability_scores: AbilityScores::default(),
            proficiencies: Proficiencies::default(),
            inventory: Vec::new(),
            spellcasting_ability: None,
            use_metric: true,
            hit_die: None,
            fighting_styles: Vec::new(),
        }
    }

    pub fn proficiency_bonus(&self) -> i32 {
        ability::proficiency_bonus(self.level)
    }

    pub fn equipped_items(&self) -> impl Iterator<Item = &InventoryEntry> {
        self.inventory.iter().filter(|entry| entry.equipped)
    }

    /// Whether the character has a fighting style, compared by normalized tag.
    pub fn has_fighting_style(&self, style: &str) -> bool {
        let wanted = normalize_tag(style);
        self.fighting_styles
            .iter()
            .any(|s| normalize_tag(s) == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ability_modifier() {
        let scores = AbilityScores::new(16, 14, 12, 10, 8, 6);
        assert_eq!(scores.modifier(Ability::Strength), 3);
        assert_eq!(scores.modifier(Ability::Dexterity), 2);
        assert_eq!(scores.modifier(Ability::Constitution), 1);
        assert_eq!(scores.modifier(Ability::Intelligence), 0);
        assert_eq!(scores.modifier(Ability::Wisdom), -1);
        assert_eq!(scores.modifier(Ability::Charisma), -2);
    }

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("  Martial   Weapons "), "martial weapons");
        assert_eq!(normalize_tag("Two-Weapon_Fighting"), "two weapon fighting");
        assert_eq!(normalize_tag(""), "");
    }

    #[test]
    fn test_ability_from_tag() {
        assert_eq!(Ability::from_tag("dex"), Some(Ability::Dexterity));
        assert_eq!(Ability::from_tag("Wisdom"), Some(Ability::Wisdom));
        assert_eq!(Ability::from_tag("CHA"), Some(Ability::Charisma));
        assert_eq!(Ability::from_tag("luck"), None);
    }

    #[test]
    fn test_skill_table() {
        assert_eq!(Skill::all().len(), 18);
        assert_eq!(Skill::Athletics.ability(), Ability::Strength);
        assert_eq!(Skill::Stealth.ability(), Ability::Dexterity);
        assert_eq!(Skill::Arcana.ability(), Ability::Intelligence);
        assert_eq!(Skill::Perception.ability(), Ability::Wisdom);
        assert_eq!(Skill::Persuasion.ability(), Ability::Charisma);
    }

    #[test]
    fn test_skill_matches_tag() {
        assert!(Skill::Perception.matches_tag("Perception"));
        assert!(Skill::Perception.matches_tag(" perception "));
        assert!(Skill::Perception.matches_tag("Wahrnehmung"));
        assert!(Skill::SleightOfHand.matches_tag("sleight_of_hand"));
        assert!(!Skill::Perception.matches_tag("Insight"));

        // Sheet spellings and handbook spellings both count
        assert!(Skill::Arcana.matches_tag("Arkana"));
        assert!(Skill::Arcana.matches_tag("Arkane Kunde"));
        assert!(Skill::AnimalHandling.matches_tag("Tierkunde"));
        assert!(Skill::AnimalHandling.matches_tag("mit tieren umgehen"));
        assert!(Skill::Investigation.matches_tag("Nachforschen"));
        assert!(Skill::Investigation.matches_tag("Nachforschungen"));
        assert!(!Skill::Nature.matches_tag("Tierkunde"));
    }

    #[test]
    fn test_german_sheet_skills_get_proficiency() {
        let mut character = Character::new("Gelehrte");
        character.ability_scores.intelligence = 14;
        character.ability_scores.wisdom = 14;
        for tag in ["Arkana", "Tierkunde", "Nachforschen"] {
            character.proficiencies.skills.insert(tag.to_string());
        }

        let skills = crate::progression::skills(&character, character.proficiency_bonus());
        assert_eq!(skills[&Skill::Arcana], 4);
        assert_eq!(skills[&Skill::AnimalHandling], 4);
        assert_eq!(skills[&Skill::Investigation], 4);
        assert_eq!(skills[&Skill::Nature], 2);
    }

    #[test]
    fn test_character_deserializes_with_defaults() {
        let character: Character = serde_json::from_value(json!({
            "name": "Mira",
            "level": 3,
            "attributes": { "str": 8, "dex": 16, "con": 12, "int": 10, "wis": 14, "cha": 10 },
            "proficiencies": { "saving_throws": ["dex", "int"], "skills": ["Stealth"] },
            "inventory": [
                { "item_id": "dagger", "kind": "weapon", "is_equipped": true,
                  "custom_data": { "is_offhand": true } }
            ]
        }))
        .expect("character should deserialize");

        assert_eq!(character.level, 3);
        assert_eq!(character.ability_scores.dexterity, 16);
        assert!(character.use_metric);
        assert!(character.proficiencies.has_saving_throw(Ability::Dexterity));
        assert!(character.proficiencies.has_skill(Skill::Stealth));

        let entry = &character.inventory[0];
        assert!(entry.equipped);
        assert_eq!(entry.quantity, 1);
        assert_eq!(entry.source, ItemSource::Core);
        assert_eq!(entry.location, StorageLocation::Body);
        assert_eq!(entry.custom_data["is_offhand"], json!(true));
    }

    #[test]
    fn test_inventory_entry_builder() {
        let entry = InventoryEntry::weapon("longsword")
            .equipped()
            .custom()
            .with_quantity(2)
            .in_location(StorageLocation::Backpack)
            .with_attachment("magic_bonus", 1);

        assert_eq!(entry.kind, ItemKind::Weapon);
        assert!(entry.equipped);
        assert_eq!(entry.source, ItemSource::Custom);
        assert_eq!(entry.quantity, 2);
        assert_eq!(entry.location, StorageLocation::Backpack);
        assert_eq!(entry.custom_data["magic_bonus"], json!(1));
    }

    #[test]
    fn test_fighting_style_lookup() {
        let mut character = Character::new("Test");
        character.fighting_styles.push("Two-Weapon Fighting".to_string());
        assert!(character.has_fighting_style("two_weapon_fighting"));
        assert!(!character.has_fighting_style("archery"));
    }
}
