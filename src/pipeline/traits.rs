use crate::lexicon::PronunciationLookup;
use crate::types::Token;

pub trait Normalizer: Send + Sync {
    fn normalize(&self, text: &str, lowercase: bool) -> Vec<Token>;
}

/// Source of pronunciations for the phonetic pass. Implementations never
/// fail: unknown words come back as an opaque fallback flagged as a miss.
pub trait Pronouncer: Send + Sync {
    fn pronounce(&self, token: &Token) -> PronunciationLookup;
}
