//! Standard D&D 5e item database.
//!
//! SRD weapons and armor with metric weights, usable as a ready-made
//! compendium. Ids are the lowercase snake_case item names.

use crate::compendium::{
    Armor, ArmorCategory, Compendium, CompendiumItem, Gear, PropertyParameter, Weapon,
    WeaponProperty,
};

/// Get a standard weapon by name.
pub fn get_weapon(name: &str) -> Option<Weapon> {
    let name_lower = name.to_lowercase();
    WEAPONS
        .iter()
        .find(|w| w.name.to_lowercase() == name_lower || w.id == name_lower)
        .cloned()
}

/// Get a standard armor piece by name.
pub fn get_armor(name: &str) -> Option<Armor> {
    let name_lower = name.to_lowercase();
    ARMORS
        .iter()
        .find(|a| a.name.to_lowercase() == name_lower || a.id == name_lower)
        .cloned()
}

/// Every standard weapon, armor piece and gear item in one lookup set.
pub fn standard_compendium() -> Compendium {
    WEAPONS
        .iter()
        .cloned()
        .map(CompendiumItem::from)
        .chain(ARMORS.iter().cloned().map(CompendiumItem::from))
        .chain(ADVENTURING_GEAR.iter().cloned().map(CompendiumItem::from))
        .collect()
}

fn finesse() -> WeaponProperty {
    WeaponProperty::new("finesse", "Finesse")
}

fn light() -> WeaponProperty {
    WeaponProperty::new("light", "Light")
}

fn heavy() -> WeaponProperty {
    WeaponProperty::new("heavy", "Heavy")
}

fn thrown() -> WeaponProperty {
    WeaponProperty::new("thrown", "Thrown")
}

fn two_handed() -> WeaponProperty {
    WeaponProperty::new("two_handed", "Two-Handed")
}

fn reach() -> WeaponProperty {
    WeaponProperty::new("reach", "Reach")
}

fn loading() -> WeaponProperty {
    WeaponProperty::new("loading", "Loading")
}

fn ammunition(normal: u32, max: u32) -> WeaponProperty {
    WeaponProperty::new("ammunition", "Ammunition")
        .with_parameter(PropertyParameter::Range { normal, max })
}

fn versatile(dice: &str) -> WeaponProperty {
    WeaponProperty::new("versatile", "Versatile").with_parameter(PropertyParameter::Versatile {
        dice: dice.to_string(),
    })
}

// ============================================================================
// Weapons
// ============================================================================

lazy_static::lazy_static! {
    /// Standard D&D 5e weapons.
    pub static ref WEAPONS: Vec<Weapon> = vec![
        // Simple Melee Weapons
        Weapon::new("club", "Club", "simple", "1d4", "bludgeoning")
            .with_subtype("melee")
            .with_weight(1.0)
            .with_properties(vec![light()]),
        Weapon::new("dagger", "Dagger", "simple", "1d4", "piercing")
            .with_subtype("melee")
            .with_weight(0.5)
            .with_properties(vec![finesse(), light(), thrown()])
            .with_thrown_range(6, 18),
        Weapon::new("greatclub", "Greatclub", "simple", "1d8", "bludgeoning")
            .with_subtype("melee")
            .with_weight(5.0)
            .with_properties(vec![two_handed()]),
        Weapon::new("handaxe", "Handaxe", "simple", "1d6", "slashing")
            .with_subtype("melee")
            .with_weight(1.0)
            .with_properties(vec![light(), thrown()])
            .with_thrown_range(6, 18),
        Weapon::new("javelin", "Javelin", "simple", "1d6", "piercing")
            .with_subtype("melee")
            .with_weight(1.0)
            .with_properties(vec![thrown()])
            .with_thrown_range(9, 36),
        Weapon::new("mace", "Mace", "simple", "1d6", "bludgeoning")
            .with_subtype("melee")
            .with_weight(2.0),
        Weapon::new("quarterstaff", "Quarterstaff", "simple", "1d6", "bludgeoning")
            .with_subtype("melee")
            .with_weight(2.0)
            .with_properties(vec![versatile("1d8")]),
        Weapon::new("spear", "Spear", "simple", "1d6", "piercing")
            .with_subtype("melee")
            .with_weight(1.5)
            .with_properties(vec![thrown(), versatile("1d8")])
            .with_thrown_range(6, 18),

        // Martial Melee Weapons
        Weapon::new("battleaxe", "Battleaxe", "martial", "1d8", "slashing")
            .with_subtype("melee")
            .with_weight(2.0)
            .with_properties(vec![versatile("1d10")]),
        Weapon::new("glaive", "Glaive", "martial", "1d10", "slashing")
            .with_subtype("polearm")
            .with_weight(3.0)
            .with_properties(vec![heavy(), reach(), two_handed()]),
        Weapon::new("greataxe", "Greataxe", "martial", "1d12", "slashing")
            .with_subtype("melee")
            .with_weight(3.5)
            .with_properties(vec![heavy(), two_handed()]),
        Weapon::new("greatsword", "Greatsword", "martial", "2d6", "slashing")
            .with_subtype("melee")
            .with_weight(3.0)
            .with_properties(vec![heavy(), two_handed()]),
        Weapon::new("longsword", "Longsword", "martial", "1d8", "slashing")
            .with_subtype("melee")
            .with_weight(1.5)
            .with_properties(vec![versatile("1d10")]),
        Weapon::new("rapier", "Rapier", "martial", "1d8", "piercing")
            .with_subtype("melee")
            .with_weight(1.0)
            .with_properties(vec![finesse()]),
        Weapon::new("scimitar", "Scimitar", "martial", "1d6", "slashing")
            .with_subtype("melee")
            .with_weight(1.5)
            .with_properties(vec![finesse(), light()]),
        Weapon::new("shortsword", "Shortsword", "martial", "1d6", "piercing")
            .with_subtype("melee")
            .with_weight(1.0)
            .with_properties(vec![finesse(), light()]),
        Weapon::new("warhammer", "Warhammer", "martial", "1d8", "bludgeoning")
            .with_subtype("melee")
            .with_weight(1.0)
            .with_properties(vec![versatile("1d10")]),

        // Simple Ranged Weapons
        Weapon::new("light_crossbow", "Light Crossbow", "simple", "1d8", "piercing")
            .with_subtype("ranged")
            .with_weight(2.5)
            .with_properties(vec![ammunition(24, 96), loading(), two_handed()])
            .with_range(24, 96),
        Weapon::new("shortbow", "Shortbow", "simple", "1d6", "piercing")
            .with_subtype("ranged")
            .with_weight(1.0)
            .with_properties(vec![ammunition(24, 96), two_handed()])
            .with_range(24, 96),

        // Martial Ranged Weapons
        Weapon::new("hand_crossbow", "Hand Crossbow", "martial", "1d6", "piercing")
            .with_subtype("ranged")
            .with_weight(1.5)
            .with_properties(vec![ammunition(9, 36), light(), loading()])
            .with_range(9, 36),
        Weapon::new("longbow", "Longbow", "martial", "1d8", "piercing")
            .with_subtype("ranged")
            .with_weight(1.0)
            .with_properties(vec![ammunition(45, 180), heavy(), two_handed()])
            .with_range(45, 180),
    ];

    /// Standard D&D 5e armor.
    pub static ref ARMORS: Vec<Armor> = vec![
        // Light Armor
        Armor::new("padded_armor", "Padded Armor", ArmorCategory::Light, 11)
            .with_formula("11 + DEX")
            .with_weight(4.0)
            .with_stealth_disadvantage(),
        Armor::new("leather_armor", "Leather Armor", ArmorCategory::Light, 11)
            .with_formula("11 + DEX")
            .with_weight(5.0),
        Armor::new("studded_leather", "Studded Leather", ArmorCategory::Light, 12)
            .with_formula("12 + DEX")
            .with_weight(6.5),

        // Medium Armor
        Armor::new("hide_armor", "Hide Armor", ArmorCategory::Medium, 12)
            .with_formula("12 + DEX (max. 2)")
            .with_weight(6.0),
        Armor::new("chain_shirt", "Chain Shirt", ArmorCategory::Medium, 13)
            .with_formula("13 + DEX (max. 2)")
            .with_weight(10.0),
        Armor::new("scale_mail", "Scale Mail", ArmorCategory::Medium, 14)
            .with_formula("14 + DEX (max. 2)")
            .with_weight(22.5)
            .with_stealth_disadvantage(),
        Armor::new("breastplate", "Breastplate", ArmorCategory::Medium, 14)
            .with_formula("14 + DEX (max. 2)")
            .with_weight(10.0),
        Armor::new("half_plate", "Half Plate", ArmorCategory::Medium, 15)
            .with_formula("15 + DEX (max. 2)")
            .with_weight(20.0)
            .with_stealth_disadvantage(),

        // Heavy Armor
        Armor::new("ring_mail", "Ring Mail", ArmorCategory::Heavy, 14)
            .with_formula("14")
            .with_weight(20.0)
            .with_stealth_disadvantage(),
        Armor::new("chain_mail", "Chain Mail", ArmorCategory::Heavy, 16)
            .with_formula("16")
            .with_weight(27.5)
            .with_strength_requirement(13)
            .with_stealth_disadvantage(),
        Armor::new("splint_armor", "Splint Armor", ArmorCategory::Heavy, 17)
            .with_formula("17")
            .with_weight(30.0)
            .with_strength_requirement(15)
            .with_stealth_disadvantage(),
        Armor::new("plate_armor", "Plate Armor", ArmorCategory::Heavy, 18)
            .with_formula("18")
            .with_weight(32.5)
            .with_strength_requirement(15)
            .with_stealth_disadvantage(),

        // Shield
        Armor::shield("shield", "Shield", 2).with_weight(3.0),
    ];

    /// Standard adventuring gear.
    pub static ref ADVENTURING_GEAR: Vec<Gear> = vec![
        Gear::new("backpack", "Backpack", 2.5),
        Gear::new("bedroll", "Bedroll", 3.5),
        Gear::new("rope_hempen", "Rope, Hempen (50 feet)", 5.0),
        Gear::new("torch", "Torch", 0.5),
        Gear::new("rations", "Rations (1 day)", 1.0),
        Gear::new("waterskin", "Waterskin", 2.5),
        Gear::new("tinderbox", "Tinderbox", 0.5),
        Gear::new("arrows", "Arrows (20)", 0.5),
    ];
}
