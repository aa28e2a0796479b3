//! Session parameter normalization.
//!
//! User input arrives from CLI flags, the TOML config, or older stored
//! payloads, so every field may be a number, a numeric string, or missing.
//! [`normalize`] turns any of that into a consistent [`SessionConfig`]
//! without ever failing.

use serde::{Deserialize, Serialize};

pub const DEFAULT_FOCUS_DURATION_MIN: u32 = 90;
pub const DEFAULT_NO_BREAK_AT_START_MIN: u32 = 20;
pub const DEFAULT_NO_BREAK_AT_END_MIN: u32 = 15;
pub const DEFAULT_MIN_BREAK_INTERVAL_MIN: u32 = 10;
pub const DEFAULT_MAX_BREAK_INTERVAL_MIN: u32 = 30;

/// Validated session parameters, all in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub focus_duration_min: u32,
    pub no_break_at_start_min: u32,
    pub no_break_at_end_min: u32,
    pub min_break_interval_min: u32,
    /// Always `>= min_break_interval_min`.
    pub max_break_interval_min: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            focus_duration_min: DEFAULT_FOCUS_DURATION_MIN,
            no_break_at_start_min: DEFAULT_NO_BREAK_AT_START_MIN,
            no_break_at_end_min: DEFAULT_NO_BREAK_AT_END_MIN,
            min_break_interval_min: DEFAULT_MIN_BREAK_INTERVAL_MIN,
            max_break_interval_min: DEFAULT_MAX_BREAK_INTERVAL_MIN,
        }
    }
}

/// A raw numeric input: either a number or its textual form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Number(f64),
    Text(String),
}

impl ConfigValue {
    /// Parse to a finite float, or `None` if the value is not usable.
    ///
    /// A blank string reads as zero, so a cleared form field means "none".
    fn as_finite(&self) -> Option<f64> {
        let n = match self {
            ConfigValue::Number(n) => *n,
            ConfigValue::Text(s) if s.trim().is_empty() => 0.0,
            ConfigValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        n.is_finite().then_some(n)
    }
}

impl From<u32> for ConfigValue {
    fn from(n: u32) -> Self {
        ConfigValue::Number(n as f64)
    }
}

impl From<f64> for ConfigValue {
    fn from(n: f64) -> Self {
        ConfigValue::Number(n)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Text(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::Text(s)
    }
}

/// Partial, unvalidated session parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfigInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_duration_min: Option<ConfigValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_break_at_start_min: Option<ConfigValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_break_at_end_min: Option<ConfigValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_break_interval_min: Option<ConfigValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_break_interval_min: Option<ConfigValue>,
}

impl SessionConfigInput {
    /// Fill every field that is still missing from `fallback`.
    pub fn or(self, fallback: SessionConfigInput) -> Self {
        Self {
            focus_duration_min: self.focus_duration_min.or(fallback.focus_duration_min),
            no_break_at_start_min: self
                .no_break_at_start_min
                .or(fallback.no_break_at_start_min),
            no_break_at_end_min: self.no_break_at_end_min.or(fallback.no_break_at_end_min),
            min_break_interval_min: self
                .min_break_interval_min
                .or(fallback.min_break_interval_min),
            max_break_interval_min: self
                .max_break_interval_min
                .or(fallback.max_break_interval_min),
        }
    }
}

impl From<SessionConfig> for SessionConfigInput {
    fn from(cfg: SessionConfig) -> Self {
        Self {
            focus_duration_min: Some(cfg.focus_duration_min.into()),
            no_break_at_start_min: Some(cfg.no_break_at_start_min.into()),
            no_break_at_end_min: Some(cfg.no_break_at_end_min.into()),
            min_break_interval_min: Some(cfg.min_break_interval_min.into()),
            max_break_interval_min: Some(cfg.max_break_interval_min.into()),
        }
    }
}

fn parse_minutes(value: Option<&ConfigValue>, fallback: u32, min: u32) -> u32 {
    let Some(n) = value.and_then(ConfigValue::as_finite) else {
        return fallback;
    };
    // `as` saturates, so huge inputs land on u32::MAX instead of wrapping.
    (n.floor().max(min as f64)) as u32
}

/// Normalize raw input into a [`SessionConfig`]. Never fails.
pub fn normalize(input: &SessionConfigInput) -> SessionConfig {
    let focus_duration_min = parse_minutes(
        input.focus_duration_min.as_ref(),
        DEFAULT_FOCUS_DURATION_MIN,
        1,
    );
    let min_break_interval_min = parse_minutes(
        input.min_break_interval_min.as_ref(),
        DEFAULT_MIN_BREAK_INTERVAL_MIN,
        1,
    );
    let max_break_interval_min = parse_minutes(
        input.max_break_interval_min.as_ref(),
        DEFAULT_MAX_BREAK_INTERVAL_MIN,
        1,
    )
    .max(min_break_interval_min);

    SessionConfig {
        focus_duration_min,
        no_break_at_start_min: parse_minutes(
            input.no_break_at_start_min.as_ref(),
            DEFAULT_NO_BREAK_AT_START_MIN,
            0,
        ),
        no_break_at_end_min: parse_minutes(
            input.no_break_at_end_min.as_ref(),
            DEFAULT_NO_BREAK_AT_END_MIN,
            0,
        ),
        min_break_interval_min,
        max_break_interval_min,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_input_yields_defaults() {
        assert_eq!(normalize(&SessionConfigInput::default()), SessionConfig::default());
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let input = SessionConfigInput {
            focus_duration_min: Some(" 45 ".into()),
            no_break_at_start_min: Some("5.9".into()),
            ..Default::default()
        };
        let cfg = normalize(&input);
        assert_eq!(cfg.focus_duration_min, 45);
        assert_eq!(cfg.no_break_at_start_min, 5);
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let input = SessionConfigInput {
            focus_duration_min: Some("ninety".into()),
            no_break_at_end_min: Some("n/a".into()),
            min_break_interval_min: Some(f64::NAN.into()),
            max_break_interval_min: Some(f64::INFINITY.into()),
            ..Default::default()
        };
        assert_eq!(normalize(&input), SessionConfig::default());
    }

    #[test]
    fn blank_strings_read_as_zero_then_clamp() {
        let input = SessionConfigInput {
            focus_duration_min: Some("".into()),
            no_break_at_start_min: Some("   ".into()),
            no_break_at_end_min: Some("".into()),
            min_break_interval_min: Some(" ".into()),
            max_break_interval_min: Some("".into()),
        };
        let cfg = normalize(&input);
        assert_eq!(cfg.focus_duration_min, 1);
        assert_eq!(cfg.no_break_at_start_min, 0);
        assert_eq!(cfg.no_break_at_end_min, 0);
        assert_eq!(cfg.min_break_interval_min, 1);
        assert_eq!(cfg.max_break_interval_min, 1);
    }

    #[test]
    fn values_are_clamped_to_minimums() {
        let input = SessionConfigInput {
            focus_duration_min: Some((-5.0f64).into()),
            no_break_at_start_min: Some((-1.0f64).into()),
            no_break_at_end_min: Some("-3".into()),
            min_break_interval_min: Some(0u32.into()),
            max_break_interval_min: Some(0u32.into()),
        };
        let cfg = normalize(&input);
        assert_eq!(cfg.focus_duration_min, 1);
        assert_eq!(cfg.no_break_at_start_min, 0);
        assert_eq!(cfg.no_break_at_end_min, 0);
        assert_eq!(cfg.min_break_interval_min, 1);
        assert_eq!(cfg.max_break_interval_min, 1);
    }

    #[test]
    fn max_interval_raised_to_min_interval() {
        let input = SessionConfigInput {
            min_break_interval_min: Some(25u32.into()),
            max_break_interval_min: Some(12u32.into()),
            ..Default::default()
        };
        let cfg = normalize(&input);
        assert_eq!(cfg.min_break_interval_min, 25);
        assert_eq!(cfg.max_break_interval_min, 25);
    }

    #[test]
    fn or_prefers_present_fields() {
        let cli = SessionConfigInput {
            focus_duration_min: Some("60".into()),
            ..Default::default()
        };
        let merged = cli.or(SessionConfig::default().into());
        let cfg = normalize(&merged);
        assert_eq!(cfg.focus_duration_min, 60);
        assert_eq!(cfg.no_break_at_start_min, DEFAULT_NO_BREAK_AT_START_MIN);
    }

    #[test]
    fn input_deserializes_numbers_and_strings() {
        let input: SessionConfigInput =
            serde_json::from_str(r#"{"focusDurationMin": 50, "minBreakIntervalMin": "7"}"#)
                .unwrap();
        let cfg = normalize(&input);
        assert_eq!(cfg.focus_duration_min, 50);
        assert_eq!(cfg.min_break_interval_min, 7);
    }

    fn arb_value() -> impl Strategy<Value = Option<ConfigValue>> {
        prop_oneof![
            Just(None),
            (-1000.0f64..100_000.0).prop_map(|n| Some(ConfigValue::Number(n))),
            "[ -]?[0-9]{0,6}(\\.[0-9]{1,3})?".prop_map(|s| Some(ConfigValue::Text(s))),
            "[a-z]{1,8}".prop_map(|s| Some(ConfigValue::Text(s))),
        ]
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(
            a in arb_value(), b in arb_value(), c in arb_value(), d in arb_value(), e in arb_value()
        ) {
            let input = SessionConfigInput {
                focus_duration_min: a,
                no_break_at_start_min: b,
                no_break_at_end_min: c,
                min_break_interval_min: d,
                max_break_interval_min: e,
            };
            let once = normalize(&input);
            let twice = normalize(&once.into());
            prop_assert_eq!(once, twice);
            prop_assert!(once.focus_duration_min >= 1);
            prop_assert!(once.min_break_interval_min >= 1);
            prop_assert!(once.max_break_interval_min >= once.min_break_interval_min);
        }
    }
}
