//! Derived statistics orchestration.
//!
//! [`StatsEngine`] composes the resolvers into one [`DerivedStats`]
//! snapshot. Every call is a full recomputation from the inputs; the
//! engine holds nothing but its configuration.

use crate::armor::resolve_armor_class;
use crate::attack::{resolve_attacks, WeaponAttack};
use crate::character::{Ability, Character, Skill};
use crate::compendium::Compendium;
use crate::encumbrance::{resolve_encumbrance, Encumbrance};
use crate::modifiers::{apply_modifiers, Modifier, ModifierTarget};
use crate::progression;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rule constants used by the resolvers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// AC without body armor, before dexterity.
    pub unarmored_base: i32,

    /// Bonus of a shield record that carries none.
    pub default_shield_bonus: i32,

    /// Dexterity cap of medium armor given only a numeric base.
    pub medium_armor_dex_cap: i32,

    /// Base AC of an armor formula with no number in it.
    pub formula_fallback_ac: i32,

    /// Carrying capacity in kilograms per strength point.
    pub metric_capacity_per_strength: f64,

    /// Carrying capacity in pounds per strength point, imperial mode.
    pub imperial_capacity_per_strength: f64,

    pub pounds_per_kilogram: f64,

    /// Push, drag or lift limit in kilograms per strength point.
    pub lift_per_strength: f64,

    pub passive_base: i32,

    pub spell_dc_base: i32,

    /// Hit die used when the character's class die is unknown.
    pub fallback_hit_die: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            unarmored_base: 10,
            default_shield_bonus: 2,
            medium_armor_dex_cap: 2,
            formula_fallback_ac: 10,
            metric_capacity_per_strength: 7.5,
            imperial_capacity_per_strength: 15.0,
            pounds_per_kilogram: 2.20462,
            lift_per_strength: 15.0,
            passive_base: 10,
            spell_dc_base: 8,
            fallback_hit_die: 10,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unarmored_base(mut self, base: i32) -> Self {
        self.unarmored_base = base;
        self
    }

    pub fn with_default_shield_bonus(mut self, bonus: i32) -> Self {
        self.default_shield_bonus = bonus;
        self
    }

    pub fn with_medium_armor_dex_cap(mut self, cap: i32) -> Self {
        self.medium_armor_dex_cap = cap;
        self
    }

    pub fn with_formula_fallback_ac(mut self, ac: i32) -> Self {
        self.formula_fallback_ac = ac;
        self
    }

    /// Set both capacity rates (kilograms and pounds per strength point).
    pub fn with_capacity_per_strength(mut self, metric_kg: f64, imperial_lb: f64) -> Self {
        self.metric_capacity_per_strength = metric_kg;
        self.imperial_capacity_per_strength = imperial_lb;
        self
    }

    pub fn with_lift_per_strength(mut self, kg: f64) -> Self {
        self.lift_per_strength = kg;
        self
    }

    pub fn with_passive_base(mut self, base: i32) -> Self {
        self.passive_base = base;
        self
    }

    pub fn with_spell_dc_base(mut self, base: i32) -> Self {
        self.spell_dc_base = base;
        self
    }

    pub fn with_fallback_hit_die(mut self, die: i32) -> Self {
        self.fallback_hit_die = die;
        self
    }
}

/// Every derived number for one character, after modifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub hp_max: i32,
    pub ac: i32,
    pub initiative: i32,
    pub proficiency_bonus: i32,
    pub saving_throws: BTreeMap<Ability, i32>,
    pub skills: BTreeMap<Skill, i32>,
    pub passive_perception: i32,
    pub spell_save_dc: i32,
    pub spell_attack_bonus: i32,
    pub encumbrance: Encumbrance,
    pub weapon_attacks: Vec<WeaponAttack>,
}

impl DerivedStats {
    /// The field a modifier target writes to.
    pub fn slot_mut(&mut self, target: ModifierTarget) -> &mut i32 {
        match target {
            ModifierTarget::ArmorClass => &mut self.ac,
            ModifierTarget::HpMax => &mut self.hp_max,
            ModifierTarget::Initiative => &mut self.initiative,
            ModifierTarget::PassivePerception => &mut self.passive_perception,
            ModifierTarget::SpellSaveDc => &mut self.spell_save_dc,
            ModifierTarget::SpellAttackBonus => &mut self.spell_attack_bonus,
        }
    }

    pub fn saving_throw(&self, ability: Ability) -> i32 {
        self.saving_throws.get(&ability).copied().unwrap_or(0)
    }

    pub fn skill(&self, skill: Skill) -> i32 {
        self.skills.get(&skill).copied().unwrap_or(0)
    }
}

/// The derived statistics engine.
#[derive(Debug, Clone, Default)]
pub struct StatsEngine {
    config: EngineConfig,
}

impl StatsEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute the full stat block.
    ///
    /// Never fails: items missing from the compendium, unreadable payloads
    /// and unknown modifier targets are skipped.
    pub fn derive(
        &self,
        character: &Character,
        compendium: &Compendium,
        modifiers: &[Modifier],
    ) -> DerivedStats {
        let config = &self.config;
        let proficiency_bonus = character.proficiency_bonus();
        let skills = progression::skills(character, proficiency_bonus);
        let spellcasting = progression::spellcasting(character, proficiency_bonus, config);

        let mut stats = DerivedStats {
            hp_max: progression::hit_points(character, config),
            ac: resolve_armor_class(character, compendium, config).total(),
            initiative: progression::initiative(character),
            proficiency_bonus,
            saving_throws: progression::saving_throws(character, proficiency_bonus),
            passive_perception: progression::passive_perception(character, &skills, config),
            skills,
            spell_save_dc: spellcasting.save_dc,
            spell_attack_bonus: spellcasting.attack_bonus,
            encumbrance: resolve_encumbrance(character, compendium, config),
            weapon_attacks: resolve_attacks(character, compendium, proficiency_bonus),
        };

        apply_modifiers(&mut stats, modifiers);

        tracing::debug!(
            character = %character.name,
            ac = stats.ac,
            hp_max = stats.hp_max,
            attacks = stats.weapon_attacks.len(),
            "derived stats"
        );
        stats
    }
}

/// Derive stats with the default rule constants.
pub fn derive_stats(
    character: &Character,
    compendium: &Compendium,
    modifiers: &[Modifier],
) -> DerivedStats {
    StatsEngine::default().derive(character, compendium, modifiers)
}
