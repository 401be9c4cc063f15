//! Ability score and proficiency math.
//!
//! Also holds the small numeric parsing helpers shared by the armor
//! formula reader and the enchantment bonus extractor.

use serde_json::Value;

/// Ability modifier for a raw score.
///
/// Uses floor division so odd scores below 10 round down:
/// 8-9 = -1, 10-11 = 0, 12-13 = +1, etc. Saturates instead of
/// overflowing on absurd scores.
pub fn modifier(score: i32) -> i32 {
    score.saturating_sub(10).div_euclid(2)
}

/// Proficiency bonus for a character level.
///
/// `2 + floor((level - 1) / 4)`. There is no upper clamp; callers that
/// want the level-20 cap of +6 clamp the level themselves.
pub fn proficiency_bonus(level: i32) -> i32 {
    level.saturating_sub(1).div_euclid(4).saturating_add(2)
}

/// First integer found anywhere in `text`.
///
/// A `-` directly in front of the digits makes the result negative.
/// Returns `None` when the text holds no digits or the number overflows.
pub fn leading_integer(text: &str) -> Option<i32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let value: i32 = digits.parse().ok()?;

    if text[..start].ends_with('-') {
        Some(-value)
    } else {
        Some(value)
    }
}

/// Read a JSON value as an integer.
///
/// Accepts numbers (fractions truncate toward zero) and numeric strings
/// such as `"2"`, `"+1"` or `" -1 "`. Anything else is `None`.
pub fn numeric_value(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .or_else(|| n.as_f64().map(|v| v.trunc() as i32)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .strip_prefix('+')
                .unwrap_or(trimmed)
                .parse::<i32>()
                .ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_modifier() {
        assert_eq!(modifier(10), 0);
        assert_eq!(modifier(11), 0);
        assert_eq!(modifier(14), 2);
        assert_eq!(modifier(20), 5);
        assert_eq!(modifier(30), 10);

        // Odd scores below 10 round down, not toward zero
        assert_eq!(modifier(9), -1);
        assert_eq!(modifier(8), -1);
        assert_eq!(modifier(7), -2);
        assert_eq!(modifier(1), -5);
    }

    #[test]
    fn test_proficiency_bonus() {
        assert_eq!(proficiency_bonus(1), 2);
        assert_eq!(proficiency_bonus(4), 2);
        assert_eq!(proficiency_bonus(5), 3);
        assert_eq!(proficiency_bonus(9), 4);
        assert_eq!(proficiency_bonus(13), 5);
        assert_eq!(proficiency_bonus(17), 6);
        assert_eq!(proficiency_bonus(20), 6);

        // No clamp past level 20
        assert_eq!(proficiency_bonus(21), 7);
    }

    #[test]
    fn test_extreme_inputs_saturate() {
        assert_eq!(modifier(i32::MIN), i32::MIN.div_euclid(2));
        assert_eq!(modifier(i32::MAX), (i32::MAX - 10).div_euclid(2));
        assert_eq!(proficiency_bonus(i32::MIN), i32::MIN.div_euclid(4) + 2);
        assert_eq!(proficiency_bonus(i32::MAX), (i32::MAX - 1) / 4 + 2);
    }

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer("11 + DEX"), Some(11));
        assert_eq!(leading_integer("12 + DEX (max. 2)"), Some(12));
        assert_eq!(leading_integer("18"), Some(18));
        assert_eq!(leading_integer("AC 13"), Some(13));
        assert_eq!(leading_integer("-1"), Some(-1));
        assert_eq!(leading_integer("DEX"), None);
        assert_eq!(leading_integer(""), None);
    }

    #[test]
    fn test_numeric_value() {
        assert_eq!(numeric_value(&json!(2)), Some(2));
        assert_eq!(numeric_value(&json!(-1)), Some(-1));
        assert_eq!(numeric_value(&json!(1.9)), Some(1));
        assert_eq!(numeric_value(&json!("+3")), Some(3));
        assert_eq!(numeric_value(&json!(" 2 ")), Some(2));
        assert_eq!(numeric_value(&json!("two")), None);
        assert_eq!(numeric_value(&json!(true)), None);
        assert_eq!(numeric_value(&json!(null)), None);
    }

    proptest! {
        #[test]
        fn prop_modifier_is_floor_half(score in -50i32..80) {
            let expected = ((score - 10) as f64 / 2.0).floor() as i32;
            prop_assert_eq!(modifier(score), expected);
        }

        #[test]
        fn prop_proficiency_bonus_formula(level in 1i32..100) {
            prop_assert_eq!(proficiency_bonus(level), 2 + (level - 1) / 4);
        }

        #[test]
        fn prop_proficiency_never_decreases(level in 1i32..100) {
            prop_assert!(proficiency_bonus(level + 1) >= proficiency_bonus(level));
        }
    }
}
