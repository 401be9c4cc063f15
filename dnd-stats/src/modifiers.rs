//! Generic numeric modifiers applied on top of the computed stats.
//!
//! Modifiers are applied strictly in list order, so a later `Override`
//! discards every earlier adjustment of the same target.

use crate::character::normalize_tag;
use crate::engine::DerivedStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How a modifier changes its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifierKind {
    #[serde(alias = "add")]
    Add,
    /// Multiplies the running value at its position in the list.
    #[serde(alias = "multiply")]
    Multiply,
    #[serde(alias = "override")]
    Override,
}

/// Derived stat a modifier can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierTarget {
    #[serde(rename = "ac")]
    ArmorClass,
    HpMax,
    Initiative,
    PassivePerception,
    SpellSaveDc,
    SpellAttackBonus,
}

impl ModifierTarget {
    pub fn all() -> [ModifierTarget; 6] {
        [
            ModifierTarget::ArmorClass,
            ModifierTarget::HpMax,
            ModifierTarget::Initiative,
            ModifierTarget::PassivePerception,
            ModifierTarget::SpellSaveDc,
            ModifierTarget::SpellAttackBonus,
        ]
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ModifierTarget::ArmorClass => "ac",
            ModifierTarget::HpMax => "hp_max",
            ModifierTarget::Initiative => "initiative",
            ModifierTarget::PassivePerception => "passive_perception",
            ModifierTarget::SpellSaveDc => "spell_save_dc",
            ModifierTarget::SpellAttackBonus => "spell_attack_bonus",
        }
    }

    /// Parse a target tag. Accepts the canonical tags in any case and with
    /// spaces or dashes, plus a few common spellings.
    pub fn parse(tag: &str) -> Option<ModifierTarget> {
        let tag = normalize_tag(tag);
        let target = match tag.as_str() {
            "armor class" | "armour class" => ModifierTarget::ArmorClass,
            "hp" | "max hp" | "hit points" => ModifierTarget::HpMax,
            "init" => ModifierTarget::Initiative,
            "spell dc" => ModifierTarget::SpellSaveDc,
            "spell attack" => ModifierTarget::SpellAttackBonus,
            _ => {
                return ModifierTarget::all()
                    .into_iter()
                    .find(|t| normalize_tag(t.tag()) == tag)
            }
        };
        Some(target)
    }
}

impl fmt::Display for ModifierTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A source-tagged numeric adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    #[serde(default)]
    pub source: String,
    pub target: String,
    #[serde(alias = "modifier_type")]
    pub kind: ModifierKind,
    pub value: f64,
    /// Free-form condition label. Never evaluated; the modifier always applies.
    #[serde(default)]
    pub condition: Option<String>,
}

impl Modifier {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        kind: ModifierKind,
        value: f64,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            value,
            condition: None,
        }
    }

    pub fn add(target: impl Into<String>, value: f64) -> Self {
        Self::new("", target, ModifierKind::Add, value)
    }

    pub fn multiply(target: impl Into<String>, value: f64) -> Self {
        Self::new("", target, ModifierKind::Multiply, value)
    }

    pub fn set(target: impl Into<String>, value: f64) -> Self {
        Self::new("", target, ModifierKind::Override, value)
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn resolved_target(&self) -> Option<ModifierTarget> {
        ModifierTarget::parse(&self.target)
    }

    fn apply(&self, running: f64) -> f64 {
        match self.kind {
            ModifierKind::Add => running + self.value,
            ModifierKind::Multiply => running * self.value,
            ModifierKind::Override => self.value,
        }
    }
}

/// Apply modifiers to `stats` in order.
///
/// Running values are kept fractional while the list is walked and floored
/// once at the end. Unknown targets are skipped.
pub fn apply_modifiers(stats: &mut DerivedStats, modifiers: &[Modifier]) {
    let mut running: BTreeMap<ModifierTarget, f64> = BTreeMap::new();

    for modifier in modifiers {
        let Some(target) = modifier.resolved_target() else {
            tracing::debug!(
                target_tag = %modifier.target,
                source = %modifier.source,
                "ignoring modifier with unknown target"
            );
            continue;
        };
        let current = running
            .get(&target)
            .copied()
            .unwrap_or_else(|| f64::from(*stats.slot_mut(target)));
        running.insert(target, modifier.apply(current));
    }

    for (target, value) in running {
        *stats.slot_mut(target) = value.floor() as i32;
    }
}
