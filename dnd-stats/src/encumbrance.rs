//! Carrying capacity and carried weight.
//!
//! All weights are kilograms. Imperial mode only changes how the capacity
//! is derived (15 lb per strength point, converted), not the unit.

use crate::character::{Ability, Character};
use crate::compendium::Compendium;
use crate::engine::EngineConfig;
use serde::{Deserialize, Serialize};

/// Encumbrance tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncumbranceStatus {
    Normal,
    Encumbered,
    HeavilyEncumbered,
}

/// Carrying capacity against carried weight, in kilograms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Encumbrance {
    pub max: f64,
    pub current: f64,
    /// Push, drag or lift limit.
    pub lift: f64,
}

impl Encumbrance {
    /// Tier of the carried weight.
    ///
    /// Exactly at the lift limit is still only encumbered.
    pub fn status(&self) -> EncumbranceStatus {
        if self.current > self.lift {
            EncumbranceStatus::HeavilyEncumbered
        } else if self.current > self.max {
            EncumbranceStatus::Encumbered
        } else {
            EncumbranceStatus::Normal
        }
    }
}

/// Carrying capacity for a strength score.
pub fn capacity(strength: i32, use_metric: bool, config: &EngineConfig) -> f64 {
    let strength = f64::from(strength);
    if use_metric {
        strength * config.metric_capacity_per_strength
    } else {
        strength * config.imperial_capacity_per_strength / config.pounds_per_kilogram
    }
}

/// Total carried weight; entries missing from the compendium weigh nothing.
pub fn carried_weight(character: &Character, compendium: &Compendium) -> f64 {
    character
        .inventory
        .iter()
        .map(|entry| match compendium.get(&entry.item_id) {
            Some(item) => item.weight_kg() * f64::from(entry.quantity),
            None => {
                tracing::debug!(
                    item_id = %entry.item_id,
                    "inventory item not in compendium, weight skipped"
                );
                0.0
            }
        })
        .sum()
}

pub fn resolve_encumbrance(
    character: &Character,
    compendium: &Compendium,
    config: &EngineConfig,
) -> Encumbrance {
    let strength = character.ability_scores.get(Ability::Strength);
    Encumbrance {
        max: capacity(strength, character.use_metric, config),
        current: carried_weight(character, compendium),
        lift: f64::from(strength) * config.lift_per_strength,
    }
}
