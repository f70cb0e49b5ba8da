use std::sync::Arc;

use crate::alignment::cost::PhoneticCost;
use crate::alignment::phone_stream::PhoneSymbol;
use crate::config::PowerConfig;
use crate::error::AlignmentError;
use crate::lexicon::Lexicon;
use crate::pipeline::defaults::WhitespaceNormalizer;
use crate::pipeline::runtime::{PowerAligner, PowerAlignerParts};
use crate::pipeline::traits::{Normalizer, Pronouncer};

pub struct PowerAlignerBuilder {
    config: PowerConfig,
    normalizer: Option<Box<dyn Normalizer>>,
    pronouncer: Option<Arc<dyn Pronouncer>>,
    phonetic_cost: Option<PhoneticCost<PhoneSymbol>>,
}

impl PowerAlignerBuilder {
    pub fn new(config: PowerConfig) -> Self {
        Self {
            config,
            normalizer: None,
            pronouncer: None,
            phonetic_cost: None,
        }
    }

    pub fn with_normalizer(mut self, normalizer: Box<dyn Normalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Share an already loaded lexicon (or any other pronouncer) instead of
    /// reading `lexicon_path`.
    pub fn with_pronouncer(mut self, pronouncer: Arc<dyn Pronouncer>) -> Self {
        self.pronouncer = Some(pronouncer);
        self
    }

    pub fn with_phonetic_cost(mut self, phonetic_cost: PhoneticCost<PhoneSymbol>) -> Self {
        self.phonetic_cost = Some(phonetic_cost);
        self
    }

    pub fn build(self) -> Result<PowerAligner, AlignmentError> {
        let phonetic_cost = match self.phonetic_cost {
            Some(cost) => cost,
            None => PhoneticCost::english(self.config.cost)?,
        };

        let pronouncer = match self.pronouncer {
            Some(pronouncer) => pronouncer,
            None => {
                if self.config.lexicon_path.is_empty() {
                    return Err(AlignmentError::configuration(
                        "power aligner",
                        "lexicon_path is empty and no pronouncer was provided",
                    ));
                }
                let lexicon = Lexicon::from_path(&self.config.lexicon_path)?;
                Arc::new(lexicon) as Arc<dyn Pronouncer>
            }
        };

        Ok(PowerAligner::from_parts(PowerAlignerParts {
            lowercase: self.config.lowercase,
            normalizer: self
                .normalizer
                .unwrap_or_else(|| Box::new(WhitespaceNormalizer)),
            pronouncer,
            phonetic_cost,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhoneticCostConfig;
    use crate::types::{AlignmentInput, EditOp, Token};

    const LEXICON_JSON: &str = r#"{"an": "ae n", "on": "aa n", "a": "ax"}"#;

    struct UpperOnly;

    impl Normalizer for UpperOnly {
        fn normalize(&self, text: &str, _lowercase: bool) -> Vec<Token> {
            text.split_whitespace()
                .enumerate()
                .map(|(position, w)| Token {
                    surface: w.to_string(),
                    normalized: w.to_uppercase(),
                    position,
                })
                .collect()
        }
    }

    fn input(reference: &str, hypothesis: &str) -> AlignmentInput {
        AlignmentInput {
            reference: reference.to_string(),
            hypothesis: hypothesis.to_string(),
        }
    }

    #[test]
    fn build_loads_lexicon_from_path() {
        let path = std::env::temp_dir().join("power_align_builder_lexicon.json");
        std::fs::write(&path, LEXICON_JSON).expect("write lexicon");
        let config = PowerConfig {
            lexicon_path: path.to_string_lossy().to_string(),
            ..PowerConfig::default()
        };
        let aligner = PowerAlignerBuilder::new(config)
            .build()
            .expect("build should succeed");
        let out = aligner.align(&input("an apple", "on apple")).unwrap();
        assert_eq!(
            out.power_alignment.align(),
            [EditOp::Substitution, EditOp::Correct]
        );
        assert!(out.lookup_misses.is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn build_fails_without_lexicon() {
        let err = PowerAlignerBuilder::new(PowerConfig::default())
            .build()
            .err()
            .expect("missing lexicon must fail");
        assert!(err.is_configuration());

        let config = PowerConfig {
            lexicon_path: "/nonexistent/lexicon.json".to_string(),
            ..PowerConfig::default()
        };
        let err = PowerAlignerBuilder::new(config).build().err().unwrap();
        assert!(matches!(err, AlignmentError::Io { .. }));
    }

    #[test]
    fn build_rejects_invalid_cost_config() {
        let config = PowerConfig {
            cost: PhoneticCostConfig {
                same_class_substitution: 3.0,
                ..PhoneticCostConfig::default()
            },
            ..PowerConfig::default()
        };
        let lexicon = Arc::new(Lexicon::from_json_str(LEXICON_JSON).unwrap());
        let result = PowerAlignerBuilder::new(config)
            .with_pronouncer(lexicon)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn injected_normalizer_is_used() {
        let lexicon = Arc::new(Lexicon::from_json_str(LEXICON_JSON).unwrap());
        let aligner = PowerAlignerBuilder::new(PowerConfig::default())
            .with_pronouncer(lexicon)
            .with_normalizer(Box::new(UpperOnly))
            .build()
            .unwrap();
        let out = aligner.align(&input("An", "aN")).unwrap();
        assert_eq!(out.wer_alignment.align(), [EditOp::Correct]);
        assert_eq!(out.wer_alignment.s1(), ["An"]);
    }
}
