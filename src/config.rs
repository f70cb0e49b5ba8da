use serde::Deserialize;

use crate::error::AlignmentError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    pub lexicon_path: String,
    pub lowercase: bool,
    pub cost: PhoneticCostConfig,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            lexicon_path: String::new(),
            lowercase: true,
            cost: PhoneticCostConfig::default(),
        }
    }
}

/// Cost weights for the phone-level pass.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhoneticCostConfig {
    pub substitution: f64,
    /// Substitution between two phones of the same confusion class.
    pub same_class_substitution: f64,
    /// Inserting or deleting a word/syllable boundary marker.
    pub marker_indel: f64,
}

impl PhoneticCostConfig {
    pub const DEFAULT_SUBSTITUTION: f64 = 1.0;
    pub const DEFAULT_SAME_CLASS_SUBSTITUTION: f64 = 0.5;
    pub const DEFAULT_MARKER_INDEL: f64 = 1.0;

    pub fn validate(&self) -> Result<(), AlignmentError> {
        for (name, value) in [
            ("substitution", self.substitution),
            ("same_class_substitution", self.same_class_substitution),
            ("marker_indel", self.marker_indel),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AlignmentError::configuration(
                    "phonetic cost",
                    format!("{name} must be finite and non-negative, got {value}"),
                ));
            }
        }
        let same_class = self.same_class_substitution;
        let max = self.substitution;
        if same_class <= 0.0 || same_class >= max {
            return Err(AlignmentError::configuration(
                "phonetic cost",
                format!("same_class_substitution must lie in (0, {max}), got {same_class}"),
            ));
        }
        Ok(())
    }
}

impl Default for PhoneticCostConfig {
    fn default() -> Self {
        Self {
            substitution: Self::DEFAULT_SUBSTITUTION,
            same_class_substitution: Self::DEFAULT_SAME_CLASS_SUBSTITUTION,
            marker_indel: Self::DEFAULT_MARKER_INDEL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_config_default() {
        let config = PowerConfig::default();
        assert!(config.lexicon_path.is_empty());
        assert!(config.lowercase);
        assert_eq!(config.cost, PhoneticCostConfig::default());
        assert!(config.cost.validate().is_ok());
    }

    #[test]
    fn power_config_from_partial_json() {
        let json = r#"{
            "lexicon_path": "lex/cmudict.json",
            "cost": { "same_class_substitution": 0.25 }
        }"#;
        let config: PowerConfig = serde_json::from_str(json).expect("valid config json");
        assert_eq!(config.lexicon_path, "lex/cmudict.json");
        assert!(config.lowercase);
        assert!((config.cost.same_class_substitution - 0.25).abs() < 1e-12);
        assert!((config.cost.substitution - 1.0).abs() < 1e-12);
    }

    #[test]
    fn same_class_cost_must_be_below_base() {
        let cost = PhoneticCostConfig {
            same_class_substitution: 1.0,
            ..PhoneticCostConfig::default()
        };
        assert!(cost.validate().unwrap_err().is_configuration());

        let cost = PhoneticCostConfig {
            same_class_substitution: 0.0,
            ..PhoneticCostConfig::default()
        };
        assert!(cost.validate().is_err());
    }

    #[test]
    fn non_finite_costs_rejected() {
        let cost = PhoneticCostConfig {
            marker_indel: f64::INFINITY,
            ..PhoneticCostConfig::default()
        };
        assert!(cost.validate().is_err());
    }
}
