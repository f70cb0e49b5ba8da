use crate::alignment::normalize::normalize_transcript;
use crate::lexicon::{Lexicon, PronunciationLookup};
use crate::pipeline::traits::{Normalizer, Pronouncer};
use crate::types::Token;

pub struct WhitespaceNormalizer;

impl Normalizer for WhitespaceNormalizer {
    fn normalize(&self, text: &str, lowercase: bool) -> Vec<Token> {
        normalize_transcript(text, lowercase)
    }
}

impl Pronouncer for Lexicon {
    fn pronounce(&self, token: &Token) -> PronunciationLookup {
        self.lookup(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_normalizer_matches_free_function() {
        let normalizer = WhitespaceNormalizer;
        let tokens = normalizer.normalize("Yes We  asked", true);
        assert_eq!(tokens, normalize_transcript("Yes We  asked", true));
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn lexicon_pronouncer_delegates_to_lookup() {
        let lexicon = Lexicon::from_json_str(r#"{"ask": "ae s k"}"#).unwrap();
        let token = Token {
            surface: "Ask,".to_string(),
            normalized: "ask,".to_string(),
            position: 0,
        };
        let lookup = lexicon.pronounce(&token);
        assert!(!lookup.is_miss);
        assert_eq!(lookup, lexicon.lookup(&token));
    }
}
