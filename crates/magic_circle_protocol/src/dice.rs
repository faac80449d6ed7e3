//! Structured dice roll data and the human-readable roll formatter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One die in a roll: either a numeric face count or an arbitrary
/// identifier for the die type (fate dice, custom symbol dice, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Die {
    Faces(u32),
    Tag(String),
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Die::Faces(n) => write!(f, "{n}"),
            Die::Tag(tag) => write!(f, "{tag}"),
        }
    }
}

impl From<u32> for Die {
    fn from(faces: u32) -> Self {
        Die::Faces(faces)
    }
}

impl From<&str> for Die {
    fn from(tag: &str) -> Self {
        Die::Tag(tag.to_string())
    }
}

/// A predetermined outcome: a summed number or an arbitrary identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RollValue {
    Number(i64),
    Text(String),
}

/// Information about one set of dice rolled.
///
/// The `kind` value is largely arbitrary and dependent on the system being
/// rolled, but consistent terminology lets frontends act on rolls:
/// `check`, `initiative`, `attack`, `damage`, `save`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollInfo {
    /// The kind of dice roll being communicated.
    pub kind: String,

    /// The types of all the individual dice to be rolled, in order.
    /// Duplicates are meaningful: `[20, 20]` is two d20s.
    pub dice: Vec<Die>,

    /// Modifier added to the total sum of the dice.
    #[serde(default)]
    pub modifier: i64,

    /// When a roll is predetermined, its total outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<RollValue>,

    /// When a roll is predetermined, the result of each die, parallel to
    /// `dice`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<RollValue>>,

    /// Display string appended verbatim to the formatted roll.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl RollInfo {
    /// A roll of the given kind with the given dice and no modifier.
    pub fn new(kind: impl Into<String>, dice: Vec<Die>) -> Self {
        Self {
            kind: kind.into(),
            dice,
            modifier: 0,
            total: None,
            results: None,
            suffix: None,
        }
    }
}

/// Formats a roll as a human-readable dice expression.
///
/// Dice are grouped by type in order of first appearance and each group is
/// rendered as `<count>d<type>`, so `[10, 20, 20, 10, 20]` becomes
/// `"2d10 3d20"`. When `include_suffix` is set and the roll carries a
/// suffix, it is appended verbatim with no separator.
///
/// Pure and infallible: an empty `dice` sequence yields an empty string.
pub fn to_dice_string(roll: &RollInfo, include_suffix: bool) -> String {
    let mut groups: Vec<(&Die, usize)> = Vec::new();
    for die in &roll.dice {
        match groups.iter_mut().find(|(kind, _)| *kind == die) {
            Some((_, count)) => *count += 1,
            None => groups.push((die, 1)),
        }
    }

    let mut out = groups
        .iter()
        .map(|(die, count)| format!("{count}d{die}"))
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end()
        .to_string();

    if include_suffix {
        if let Some(suffix) = &roll.suffix {
            out.push_str(suffix);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roll(dice: Vec<Die>, suffix: &str) -> RollInfo {
        RollInfo {
            suffix: Some(suffix.to_string()),
            ..RollInfo::new("test", dice)
        }
    }

    #[test]
    fn dice_1d20() {
        assert_eq!(to_dice_string(&roll(vec![20.into()], ""), true), "1d20");
    }

    #[test]
    fn dice_1d20_plus_2() {
        assert_eq!(to_dice_string(&roll(vec![20.into()], "+2"), true), "1d20+2");
    }

    #[test]
    fn dice_6d20() {
        let dice = vec![20.into(), 20.into(), 20.into(), 20.into(), 20.into(), 20.into()];
        assert_eq!(to_dice_string(&roll(dice, ""), true), "6d20");
    }

    #[test]
    fn dice_2d10_3d20() {
        let dice = vec![10.into(), 20.into(), 20.into(), 10.into(), 20.into()];
        assert_eq!(to_dice_string(&roll(dice, ""), true), "2d10 3d20");
    }

    #[test]
    fn suffix_can_be_excluded() {
        assert_eq!(to_dice_string(&roll(vec![20.into()], "+2"), false), "1d20");
    }

    #[test]
    fn tagged_dice_group_by_tag() {
        let dice = vec!["fate".into(), 6.into(), "fate".into()];
        assert_eq!(to_dice_string(&roll(dice, ""), true), "2dfate 1d6");
    }

    #[test]
    fn empty_dice_yield_empty_string() {
        assert_eq!(to_dice_string(&RollInfo::new("test", vec![]), true), "");
    }

    #[test]
    fn die_types_round_trip_untagged() {
        let roll = RollInfo {
            total: Some(RollValue::Number(17)),
            results: Some(vec![RollValue::Number(15), RollValue::Text("skull".to_string())]),
            ..RollInfo::new("damage", vec![20.into(), "skull".into()])
        };
        let wire = serde_json::to_value(&roll).expect("Failed to serialize roll");
        assert_eq!(wire["dice"], serde_json::json!([20, "skull"]));
        let back: RollInfo = serde_json::from_value(wire).expect("Failed to parse roll");
        assert_eq!(back, roll);
    }
}
