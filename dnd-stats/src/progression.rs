//! Level-driven numbers: saving throws, skills, passive perception,
//! spellcasting, hit points and initiative.

use crate::character::{Ability, Character, Skill};
use crate::engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Saving throw bonus for every ability.
pub fn saving_throws(character: &Character, proficiency_bonus: i32) -> BTreeMap<Ability, i32> {
    Ability::all()
        .into_iter()
        .map(|ability| {
            let proficient = character.proficiencies.has_saving_throw(ability);
            let proficiency = if proficient { proficiency_bonus } else { 0 };
            let bonus = character
                .ability_scores
                .modifier(ability)
                .saturating_add(proficiency);
            (ability, bonus)
        })
        .collect()
}

/// Bonus for every skill, from its governing ability.
pub fn skills(character: &Character, proficiency_bonus: i32) -> BTreeMap<Skill, i32> {
    Skill::all()
        .into_iter()
        .map(|skill| {
            let proficient = character.proficiencies.has_skill(skill);
            let proficiency = if proficient { proficiency_bonus } else { 0 };
            let bonus = character
                .ability_scores
                .modifier(skill.ability())
                .saturating_add(proficiency);
            (skill, bonus)
        })
        .collect()
}

/// Passive perception: base plus the Perception bonus, or plus the raw
/// wisdom modifier when no Perception entry exists.
pub fn passive_perception(
    character: &Character,
    skills: &BTreeMap<Skill, i32>,
    config: &EngineConfig,
) -> i32 {
    let perception = skills
        .get(&Skill::Perception)
        .copied()
        .unwrap_or_else(|| character.ability_scores.modifier(Ability::Wisdom));
    config.passive_base.saturating_add(perception)
}

/// Spell save DC and spell attack bonus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spellcasting {
    pub save_dc: i32,
    pub attack_bonus: i32,
}

/// Spellcasting numbers; both zero without a spellcasting ability.
pub fn spellcasting(
    character: &Character,
    proficiency_bonus: i32,
    config: &EngineConfig,
) -> Spellcasting {
    match character.spellcasting_ability {
        Some(ability) => {
            let attack_bonus =
                proficiency_bonus.saturating_add(character.ability_scores.modifier(ability));
            Spellcasting {
                save_dc: config.spell_dc_base.saturating_add(attack_bonus),
                attack_bonus,
            }
        }
        None => Spellcasting::default(),
    }
}

/// Maximum hit points before modifiers.
///
/// First level takes the full die, every later level the fixed average
/// `die / 2 + 1`, each plus the constitution modifier. Out-of-range levels
/// and scores saturate at the `i32` bounds.
pub fn hit_points(character: &Character, config: &EngineConfig) -> i32 {
    let die = character.hit_die.unwrap_or(config.fallback_hit_die);
    let con = character.ability_scores.modifier(Ability::Constitution);
    let per_level = die.div_euclid(2).saturating_add(1).saturating_add(con);
    let later_levels = character.level.saturating_sub(1).saturating_mul(per_level);
    die.saturating_add(con).saturating_add(later_levels)
}

/// Initiative before modifiers.
pub fn initiative(character: &Character) -> i32 {
    character.ability_scores.modifier(Ability::Dexterity)
}
