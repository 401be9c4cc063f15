//! Compendium records the engine reads: weapons, armor, and plain gear.
//!
//! Weapon property payloads arrive either structured or as their JSON
//! text. They are decoded once, when a `WeaponProperty` is deserialized,
//! into a typed [`PropertyParameter`]; nothing downstream touches raw JSON.

use crate::ability::numeric_value;
use crate::character::{normalize_tag, ItemKind};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

// ============================================================================
// Weapon Properties
// ============================================================================

/// Typed payload of a parameterized weapon property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyParameter {
    /// Enchantment bonus to attack and damage rolls.
    Bonus { attack: i32, damage: i32 },
    /// Normal / maximum range.
    Range { normal: u32, max: u32 },
    /// Two-handed damage dice.
    Versatile { dice: String },
    /// Replacement or extra damage dice.
    Damage { dice: String },
    /// A known parameter type whose payload could not be read.
    Unparsed { kind: String, value: Value },
    /// Any parameter type the engine has no rules for.
    Other { kind: String, value: Value },
}

impl PropertyParameter {
    /// Decode a raw `(parameter_type, parameter_value)` pair.
    ///
    /// String payloads are first tried as JSON text, then used verbatim.
    pub fn parse(kind: &str, value: Option<&Value>) -> Self {
        let kind_tag = kind.trim().to_lowercase();
        let raw = value.cloned().unwrap_or(Value::Null);
        let decoded = decode_text(&raw);

        let parsed = match kind_tag.as_str() {
            "bonus" => parse_bonus(&decoded),
            "range" | "range+ammo" | "ammo+range" => parse_range(&decoded),
            "versatile" => parse_dice(&decoded).map(|dice| PropertyParameter::Versatile { dice }),
            "damage" => parse_dice(&decoded).map(|dice| PropertyParameter::Damage { dice }),
            _ => {
                return PropertyParameter::Other {
                    kind: kind.to_string(),
                    value: raw,
                }
            }
        };

        parsed.unwrap_or_else(|| {
            tracing::debug!(kind = %kind, payload = %raw, "unreadable weapon property parameter");
            PropertyParameter::Unparsed {
                kind: kind.to_string(),
                value: raw,
            }
        })
    }

    /// The `parameter_type` tag this payload serializes under.
    pub fn kind(&self) -> &str {
        match self {
            PropertyParameter::Bonus { .. } => "bonus",
            PropertyParameter::Range { .. } => "range",
            PropertyParameter::Versatile { .. } => "versatile",
            PropertyParameter::Damage { .. } => "damage",
            PropertyParameter::Unparsed { kind, .. } | PropertyParameter::Other { kind, .. } => {
                kind
            }
        }
    }

    /// Structured JSON form of the payload.
    pub fn to_value(&self) -> Value {
        match self {
            PropertyParameter::Bonus { attack, damage } => {
                json!({ "attack_bonus": attack, "damage_bonus": damage })
            }
            PropertyParameter::Range { normal, max } => json!({ "normal": normal, "max": max }),
            PropertyParameter::Versatile { dice } | PropertyParameter::Damage { dice } => {
                json!({ "dice": dice })
            }
            PropertyParameter::Unparsed { value, .. } | PropertyParameter::Other { value, .. } => {
                value.clone()
            }
        }
    }
}

fn decode_text(value: &Value) -> Value {
    match value {
        Value::String(text) => serde_json::from_str(text).unwrap_or_else(|_| value.clone()),
        other => other.clone(),
    }
}

fn parse_bonus(value: &Value) -> Option<PropertyParameter> {
    match value {
        Value::Object(record) => {
            let attack = record.get("attack_bonus").and_then(numeric_value);
            let damage = record.get("damage_bonus").and_then(numeric_value);
            // An attack bonus alone applies to damage as well.
            let (attack, damage) = match (attack, damage) {
                (Some(a), None) => (a, a),
                (a, d) => (a.unwrap_or(0), d.unwrap_or(0)),
            };
            Some(PropertyParameter::Bonus { attack, damage })
        }
        other => numeric_value(other).map(|bonus| PropertyParameter::Bonus {
            attack: bonus,
            damage: bonus,
        }),
    }
}

fn parse_range(value: &Value) -> Option<PropertyParameter> {
    match value {
        Value::Object(record) => {
            let normal = record.get("normal").and_then(numeric_value)?;
            let max = record
                .get("max")
                .or_else(|| record.get("long"))
                .and_then(numeric_value)
                .unwrap_or(normal);
            Some(PropertyParameter::Range {
                normal: u32::try_from(normal).ok()?,
                max: u32::try_from(max).ok()?,
            })
        }
        Value::String(text) => {
            let (normal, max) = text.split_once('/')?;
            Some(PropertyParameter::Range {
                normal: normal.trim().parse().ok()?,
                max: max.trim().parse().ok()?,
            })
        }
        _ => None,
    }
}

fn parse_dice(value: &Value) -> Option<String> {
    let dice = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Object(record) => ["dice", "damage", "versatile_damage"]
            .iter()
            .find_map(|key| record.get(*key).and_then(Value::as_str))?
            .trim()
            .to_string(),
        _ => return None,
    };
    (!dice.is_empty()).then_some(dice)
}

/// Wire shape of a weapon property as stored in the compendium.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawWeaponProperty {
    id: String,
    name: String,
    #[serde(default)]
    has_parameter: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parameter_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parameter_value: Option<Value>,
}

/// A rule-bearing weapon property such as Finesse or Versatile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawWeaponProperty", into = "RawWeaponProperty")]
pub struct WeaponProperty {
    pub id: String,
    pub name: String,
    pub parameter: Option<PropertyParameter>,
}

impl From<RawWeaponProperty> for WeaponProperty {
    fn from(raw: RawWeaponProperty) -> Self {
        let parameter = match (&raw.parameter_type, &raw.parameter_value) {
            (Some(kind), value) => Some(PropertyParameter::parse(kind, value.as_ref())),
            (None, Some(value)) if raw.has_parameter => {
                Some(PropertyParameter::parse("", Some(value)))
            }
            _ => None,
        };
        Self {
            id: raw.id,
            name: raw.name,
            parameter,
        }
    }
}

impl From<WeaponProperty> for RawWeaponProperty {
    fn from(property: WeaponProperty) -> Self {
        Self {
            has_parameter: property.parameter.is_some(),
            parameter_type: property
                .parameter
                .as_ref()
                .map(|p| p.kind().to_string())
                .filter(|kind| !kind.is_empty()),
            parameter_value: property.parameter.as_ref().map(PropertyParameter::to_value),
            id: property.id,
            name: property.name,
        }
    }
}

/// Declared aliases for the property keys the rules look at.
const PROPERTY_ALIASES: &[(&str, &[&str])] = &[
    ("finesse", &["finesse"]),
    ("ammunition", &["ammunition", "munition"]),
    ("versatile", &["versatile", "vielseitig"]),
    ("thrown", &["thrown", "wurfwaffe", "geworfen"]),
    ("two handed", &["two handed", "zweihändig"]),
    ("light", &["light", "leicht"]),
    ("heavy", &["heavy", "schwer"]),
];

impl WeaponProperty {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parameter: None,
        }
    }

    pub fn with_parameter(mut self, parameter: PropertyParameter) -> Self {
        self.parameter = Some(parameter);
        self
    }

    /// Whether this property is the rule `key` (e.g. `"finesse"`), by id or name.
    pub fn is(&self, key: &str) -> bool {
        let key = normalize_tag(key);
        let aliases: Vec<String> = PROPERTY_ALIASES
            .iter()
            .find(|(canonical, _)| *canonical == key)
            .map(|(_, aliases)| aliases.iter().map(|a| a.to_string()).collect())
            .unwrap_or_else(|| vec![key.clone()]);

        let id = normalize_tag(&self.id);
        let name = normalize_tag(&self.name);
        aliases.iter().any(|alias| *alias == id || *alias == name)
    }
}

// ============================================================================
// Weapons
// ============================================================================

/// Normal and maximum range of a ranged or thrown weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponRange {
    pub normal: u32,
    pub max: u32,
}

impl WeaponRange {
    /// Presentation label, `"<normal>/<max>"`.
    pub fn label(&self) -> String {
        format!("{}/{}", self.normal, self.max)
    }
}

/// Weapon compendium record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub category_label: Option<String>,
    #[serde(default, alias = "weapon_subtype")]
    pub subtype: Option<String>,
    pub damage_dice: String,
    #[serde(default)]
    pub damage_type: String,
    #[serde(default)]
    pub weight_kg: f64,
    #[serde(default)]
    pub properties: Vec<WeaponProperty>,
    #[serde(default)]
    pub versatile_damage: Option<String>,
    #[serde(default)]
    pub range: Option<WeaponRange>,
    #[serde(default)]
    pub thrown_range: Option<WeaponRange>,
}

const RANGED_SUBTYPES: &[&str] = &[
    "ranged",
    "ranged weapon",
    "ranged weapons",
    "fernkampfwaffe",
    "fernkampfwaffen",
];

impl Weapon {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        damage_dice: impl Into<String>,
        damage_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            category_label: None,
            subtype: None,
            damage_dice: damage_dice.into(),
            damage_type: damage_type.into(),
            weight_kg: 0.0,
            properties: Vec::new(),
            versatile_damage: None,
            range: None,
            thrown_range: None,
        }
    }

    pub fn with_weight(mut self, weight_kg: f64) -> Self {
        self.weight_kg = weight_kg;
        self
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn with_category_label(mut self, label: impl Into<String>) -> Self {
        self.category_label = Some(label.into());
        self
    }

    pub fn with_properties(mut self, properties: Vec<WeaponProperty>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_versatile(mut self, dice: impl Into<String>) -> Self {
        self.versatile_damage = Some(dice.into());
        self
    }

    pub fn with_range(mut self, normal: u32, max: u32) -> Self {
        self.range = Some(WeaponRange { normal, max });
        self
    }

    pub fn with_thrown_range(mut self, normal: u32, max: u32) -> Self {
        self.thrown_range = Some(WeaponRange { normal, max });
        self
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.iter().any(|p| p.is(key))
    }

    pub fn is_finesse(&self) -> bool {
        self.has_property("finesse")
    }

    /// Ranged weapons use dexterity: ammunition, or a ranged subtype.
    pub fn is_ranged(&self) -> bool {
        self.has_property("ammunition")
            || self
                .subtype
                .as_deref()
                .map(normalize_tag)
                .is_some_and(|s| RANGED_SUBTYPES.contains(&s.as_str()))
    }

    /// Two-handed damage dice, from the record field or a versatile parameter.
    pub fn versatile_dice(&self) -> Option<&str> {
        self.versatile_damage.as_deref().or_else(|| {
            self.properties.iter().find_map(|p| match &p.parameter {
                Some(PropertyParameter::Versatile { dice }) => Some(dice.as_str()),
                _ => None,
            })
        })
    }

    /// Range from the record field, falling back to a range parameter.
    pub fn effective_range(&self) -> Option<WeaponRange> {
        self.range.or_else(|| {
            self.properties.iter().find_map(|p| match p.parameter {
                Some(PropertyParameter::Range { normal, max }) => Some(WeaponRange { normal, max }),
                _ => None,
            })
        })
    }
}

// ============================================================================
// Armor
// ============================================================================

/// Armor category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmorCategory {
    #[serde(alias = "Light", alias = "leicht", alias = "light armor")]
    Light,
    #[serde(alias = "Medium", alias = "mittel", alias = "medium armor")]
    Medium,
    #[serde(alias = "Heavy", alias = "schwer", alias = "heavy armor")]
    Heavy,
    #[serde(alias = "Shield", alias = "schild")]
    Shield,
    /// Unrecognized category tag; dexterity applies in full.
    #[serde(other)]
    Unknown,
}

/// Armor compendium record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Armor {
    pub id: String,
    pub name: String,
    pub category: ArmorCategory,
    #[serde(default)]
    pub base_ac: Option<i32>,
    /// Formula such as `"11 + DEX"`, `"12 + DEX (max. 2)"`, or `"16"`.
    #[serde(default, alias = "formula")]
    pub ac_formula: Option<String>,
    /// Shield bonus; unset shields grant the default bonus.
    #[serde(default)]
    pub ac_bonus: Option<i32>,
    #[serde(default)]
    pub strength_requirement: Option<i32>,
    #[serde(default)]
    pub stealth_disadvantage: bool,
    #[serde(default)]
    pub weight_kg: f64,
}

impl Armor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: ArmorCategory,
        base_ac: i32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            base_ac: Some(base_ac),
            ac_formula: None,
            ac_bonus: None,
            strength_requirement: None,
            stealth_disadvantage: false,
            weight_kg: 0.0,
        }
    }

    pub fn shield(id: impl Into<String>, name: impl Into<String>, ac_bonus: i32) -> Self {
        Self {
            base_ac: None,
            ac_bonus: Some(ac_bonus),
            ..Self::new(id, name, ArmorCategory::Shield, 0)
        }
    }

    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.ac_formula = Some(formula.into());
        self
    }

    pub fn without_base_ac(mut self) -> Self {
        self.base_ac = None;
        self
    }

    pub fn with_weight(mut self, weight_kg: f64) -> Self {
        self.weight_kg = weight_kg;
        self
    }

    pub fn with_strength_requirement(mut self, str_req: i32) -> Self {
        self.strength_requirement = Some(str_req);
        self
    }

    pub fn with_stealth_disadvantage(mut self) -> Self {
        self.stealth_disadvantage = true;
        self
    }

    pub fn is_shield(&self) -> bool {
        self.category == ArmorCategory::Shield
    }
}

// ============================================================================
// Gear
// ============================================================================

/// Any other carried record; only its weight matters to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gear {
    pub id: String,
    pub name: String,
    #[serde(default = "default_gear_kind")]
    pub kind: ItemKind,
    #[serde(default)]
    pub weight_kg: f64,
}

fn default_gear_kind() -> ItemKind {
    ItemKind::Gear
}

impl Gear {
    pub fn new(id: impl Into<String>, name: impl Into<String>, weight_kg: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: ItemKind::Gear,
            weight_kg,
        }
    }
}

// ============================================================================
// Compendium
// ============================================================================

/// One compendium record, tagged by `"type"` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompendiumItem {
    Weapon(Weapon),
    Armor(Armor),
    Gear(Gear),
}

impl CompendiumItem {
    pub fn id(&self) -> &str {
        match self {
            CompendiumItem::Weapon(w) => &w.id,
            CompendiumItem::Armor(a) => &a.id,
            CompendiumItem::Gear(g) => &g.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CompendiumItem::Weapon(w) => &w.name,
            CompendiumItem::Armor(a) => &a.name,
            CompendiumItem::Gear(g) => &g.name,
        }
    }

    pub fn weight_kg(&self) -> f64 {
        match self {
            CompendiumItem::Weapon(w) => w.weight_kg,
            CompendiumItem::Armor(a) => a.weight_kg,
            CompendiumItem::Gear(g) => g.weight_kg,
        }
    }
}

impl From<Weapon> for CompendiumItem {
    fn from(weapon: Weapon) -> Self {
        CompendiumItem::Weapon(weapon)
    }
}

impl From<Armor> for CompendiumItem {
    fn from(armor: Armor) -> Self {
        CompendiumItem::Armor(armor)
    }
}

impl From<Gear> for CompendiumItem {
    fn from(gear: Gear) -> Self {
        CompendiumItem::Gear(gear)
    }
}

/// Item lookup set keyed by compendium id.
///
/// Incomplete compendiums are expected: lookups return `None` and the
/// resolvers skip the entry.
#[derive(Debug, Clone, Default)]
pub struct Compendium {
    items: HashMap<String, CompendiumItem>,
}

impl Compendium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record. A record with an already-known id replaces it.
    pub fn insert(&mut self, item: impl Into<CompendiumItem>) {
        let item = item.into();
        if let Some(previous) = self.items.insert(item.id().to_string(), item) {
            tracing::warn!(
                id = %previous.id(),
                "duplicate compendium id, keeping the later record"
            );
        }
    }

    pub fn get(&self, id: &str) -> Option<&CompendiumItem> {
        self.items.get(id)
    }

    pub fn weapon(&self, id: &str) -> Option<&Weapon> {
        match self.items.get(id)? {
            CompendiumItem::Weapon(w) => Some(w),
            _ => None,
        }
    }

    pub fn armor(&self, id: &str) -> Option<&Armor> {
        match self.items.get(id)? {
            CompendiumItem::Armor(a) => Some(a),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompendiumItem> {
        self.items.values()
    }

    /// Parse a JSON array of tagged compendium records.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let items: Vec<CompendiumItem> = serde_json::from_str(text)?;
        Ok(items.into_iter().collect())
    }
}

impl<I: Into<CompendiumItem>> FromIterator<I> for Compendium {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        let mut compendium = Compendium::new();
        for item in iter {
            compendium.insert(item);
        }
        compendium
    }
}

impl<I: Into<CompendiumItem>> Extend<I> for Compendium {
    fn extend<T: IntoIterator<Item = I>>(&mut self, iter: T) {
        for item in iter {
            self.insert(item);
        }
    }
}
