//! The per-subject metrics snapshot and its merge rule.
//!
//! Three different metric semantics live in one record and are combined
//! differently on update:
//!
//! - `flirt_level` / `charm_factor`: trailing averages of per-turn scores
//! - `witty_exchanges`: cumulative counter over the whole history
//! - `energy_level` / `connection_style`: instantaneous classifications,
//!   overwritten each turn

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One complete interaction metrics snapshot for a subject.
///
/// Serialized with camelCase keys and lowercase variant names; this is the
/// exact shape persisted inside the profile record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionMetrics {
    /// Intensity of flirtatious markers in the user's message (0-10).
    pub flirt_level: u8,

    /// Perceived charm of the companion's response (0-10).
    pub charm_factor: u8,

    /// Cumulative count of witty markers across the subject's history.
    /// Only ever increases.
    pub witty_exchanges: u64,

    /// Current mood classification, overwritten each turn.
    pub energy_level: EnergyLevel,

    /// Current relational-style classification, overwritten each turn.
    pub connection_style: ConnectionStyle,
}

/// Mood classification of the user's latest message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    Excited,
    Romantic,
    Intellectual,
    Playful,
    Chill,
}

/// Relational style read from the latest exchange as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStyle {
    Charming,
    Intellectual,
    Playful,
    Flirty,
    Supportive,
}

impl EnergyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excited => "excited",
            Self::Romantic => "romantic",
            Self::Intellectual => "intellectual",
            Self::Playful => "playful",
            Self::Chill => "chill",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "excited" => Some(Self::Excited),
            "romantic" => Some(Self::Romantic),
            "intellectual" => Some(Self::Intellectual),
            "playful" => Some(Self::Playful),
            "chill" => Some(Self::Chill),
            _ => None,
        }
    }
}

impl ConnectionStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Charming => "charming",
            Self::Intellectual => "intellectual",
            Self::Playful => "playful",
            Self::Flirty => "flirty",
            Self::Supportive => "supportive",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "charming" => Some(Self::Charming),
            "intellectual" => Some(Self::Intellectual),
            "playful" => Some(Self::Playful),
            "flirty" => Some(Self::Flirty),
            "supportive" => Some(Self::Supportive),
            _ => None,
        }
    }
}

/// Required keys of a stored metrics object. A record missing any of them
/// is never partially trusted: the whole value is discarded.
const REQUIRED_KEYS: &[&str] = &[
    "flirtLevel",
    "charmFactor",
    "wittyExchanges",
    "energyLevel",
    "connectionStyle",
];

impl InteractionMetrics {
    /// Leniently decode a stored raw value.
    ///
    /// Returns `None` for anything that is not a JSON object carrying all
    /// five metric keys. Numeric fields coerce the way loosely-typed
    /// profile data historically did (numeric strings parse, `true` reads
    /// as 1, everything else reads as 0) and are clamped into their
    /// documented ranges. Classification fields must hold a known variant
    /// name; an unrecognized value invalidates the whole record.
    pub fn from_stored(raw: &Value) -> Option<Self> {
        let obj = raw.as_object()?;
        if REQUIRED_KEYS.iter().any(|k| !obj.contains_key(*k)) {
            tracing::warn!("Stored metrics record is missing required fields; discarding");
            return None;
        }

        let energy_level = obj.get("energyLevel").and_then(Value::as_str);
        let connection_style = obj.get("connectionStyle").and_then(Value::as_str);
        let (Some(energy_level), Some(connection_style)) = (
            energy_level.and_then(EnergyLevel::from_name),
            connection_style.and_then(ConnectionStyle::from_name),
        ) else {
            tracing::warn!("Stored metrics record holds an unrecognized classification; discarding");
            return None;
        };

        Some(Self {
            flirt_level: coerce_score(&obj["flirtLevel"]),
            charm_factor: coerce_score(&obj["charmFactor"]),
            witty_exchanges: coerce_count(&obj["wittyExchanges"]),
            energy_level,
            connection_style,
        })
    }

    /// Combine a prior snapshot with a fresh per-turn analysis.
    ///
    /// Scores are averaged (round half up), the witty counter accumulates,
    /// classifications take the fresh turn's value unconditionally.
    pub fn merged_with(&self, fresh: &Self) -> Self {
        Self {
            flirt_level: average_half_up(self.flirt_level, fresh.flirt_level),
            charm_factor: average_half_up(self.charm_factor, fresh.charm_factor),
            witty_exchanges: self.witty_exchanges.saturating_add(fresh.witty_exchanges),
            energy_level: fresh.energy_level,
            connection_style: fresh.connection_style,
        }
    }
}

fn average_half_up(a: u8, b: u8) -> u8 {
    ((u16::from(a) + u16::from(b) + 1) / 2) as u8
}

/// Loose numeric coercion matching how the historical profile data read
/// numbers back: `Number(x) || 0` semantics.
fn loose_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(0.0)
            }
        }
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

fn coerce_score(value: &Value) -> u8 {
    loose_number(value).round().clamp(0.0, 10.0) as u8
}

fn coerce_count(value: &Value) -> u64 {
    loose_number(value).round().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> InteractionMetrics {
        InteractionMetrics {
            flirt_level: 4,
            charm_factor: 6,
            witty_exchanges: 3,
            energy_level: EnergyLevel::Chill,
            connection_style: ConnectionStyle::Supportive,
        }
    }

    #[test]
    fn test_wire_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "flirtLevel": 4,
                "charmFactor": 6,
                "wittyExchanges": 3,
                "energyLevel": "chill",
                "connectionStyle": "supportive",
            })
        );
    }

    #[test]
    fn test_merge_rule() {
        let fresh = InteractionMetrics {
            flirt_level: 8,
            charm_factor: 10,
            witty_exchanges: 1,
            energy_level: EnergyLevel::Excited,
            connection_style: ConnectionStyle::Flirty,
        };
        let merged = sample().merged_with(&fresh);
        assert_eq!(merged.flirt_level, 6);
        assert_eq!(merged.charm_factor, 8);
        assert_eq!(merged.witty_exchanges, 4);
        assert_eq!(merged.energy_level, EnergyLevel::Excited);
        assert_eq!(merged.connection_style, ConnectionStyle::Flirty);
    }

    #[test]
    fn test_merge_rounds_half_up() {
        let mut prior = sample();
        prior.flirt_level = 3;
        let mut fresh = sample();
        fresh.flirt_level = 4;
        // (3 + 4) / 2 = 3.5 rounds to 4
        assert_eq!(prior.merged_with(&fresh).flirt_level, 4);
    }

    #[test]
    fn test_from_stored_round_trip() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(InteractionMetrics::from_stored(&value), Some(sample()));
    }

    #[test]
    fn test_from_stored_missing_key_discards_record() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value.as_object_mut().unwrap().remove("wittyExchanges");
        assert_eq!(InteractionMetrics::from_stored(&value), None);
    }

    #[test]
    fn test_from_stored_rejects_non_objects() {
        assert_eq!(InteractionMetrics::from_stored(&Value::Null), None);
        assert_eq!(InteractionMetrics::from_stored(&json!("chill")), None);
        assert_eq!(InteractionMetrics::from_stored(&json!([1, 2, 3])), None);
    }

    #[test]
    fn test_from_stored_coerces_loose_numbers() {
        let value = json!({
            "flirtLevel": "7",
            "charmFactor": "not a number",
            "wittyExchanges": true,
            "energyLevel": "playful",
            "connectionStyle": "playful",
        });
        let parsed = InteractionMetrics::from_stored(&value).unwrap();
        assert_eq!(parsed.flirt_level, 7);
        assert_eq!(parsed.charm_factor, 0);
        assert_eq!(parsed.witty_exchanges, 1);
    }

    #[test]
    fn test_from_stored_clamps_out_of_range_scores() {
        let value = json!({
            "flirtLevel": 99,
            "charmFactor": -3,
            "wittyExchanges": -5,
            "energyLevel": "chill",
            "connectionStyle": "supportive",
        });
        let parsed = InteractionMetrics::from_stored(&value).unwrap();
        assert_eq!(parsed.flirt_level, 10);
        assert_eq!(parsed.charm_factor, 0);
        assert_eq!(parsed.witty_exchanges, 0);
    }

    #[test]
    fn test_from_stored_unknown_classification_discards_record() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["energyLevel"] = json!("euphoric");
        assert_eq!(InteractionMetrics::from_stored(&value), None);

        let mut value = serde_json::to_value(sample()).unwrap();
        value["connectionStyle"] = json!(7);
        assert_eq!(InteractionMetrics::from_stored(&value), None);
    }

    #[test]
    fn test_classification_names_round_trip() {
        for level in [
            EnergyLevel::Excited,
            EnergyLevel::Romantic,
            EnergyLevel::Intellectual,
            EnergyLevel::Playful,
            EnergyLevel::Chill,
        ] {
            assert_eq!(EnergyLevel::from_name(level.as_str()), Some(level));
        }
        for style in [
            ConnectionStyle::Charming,
            ConnectionStyle::Intellectual,
            ConnectionStyle::Playful,
            ConnectionStyle::Flirty,
            ConnectionStyle::Supportive,
        ] {
            assert_eq!(ConnectionStyle::from_name(style.as_str()), Some(style));
        }
    }
}
