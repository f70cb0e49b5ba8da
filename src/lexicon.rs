use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde_json::Value;

use crate::alignment::normalize::compound_parts;
use crate::alignment::phone_stream::{
    PhoneSymbol, Pronunciation, SYLLABLE_BOUNDARY, WORD_BOUNDARY,
};
use crate::error::AlignmentError;
use crate::types::Token;

/// Pronunciation chosen for one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PronunciationLookup {
    pub pronunciation: Pronunciation,
    /// The word (or one of its compound parts) fell back to an opaque symbol.
    pub is_miss: bool,
}

impl PronunciationLookup {
    pub fn found(pronunciation: Pronunciation) -> Self {
        Self {
            pronunciation,
            is_miss: false,
        }
    }

    pub fn miss(pronunciation: Pronunciation) -> Self {
        Self {
            pronunciation,
            is_miss: true,
        }
    }
}

/// Read-only word → pronunciation table.
///
/// Keys are stored lowercase. Each word keeps every listed variant in file
/// order; the first one is canonical and is the only one used for alignment.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, Vec<Pronunciation>>,
}

impl Lexicon {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AlignmentError> {
        let path = path.as_ref();
        let data =
            std::fs::read_to_string(path).map_err(|e| AlignmentError::io("read lexicon", e))?;
        let lexicon = Self::from_json_str(&data)?;
        tracing::debug!(
            path = %path.display(),
            words = lexicon.len(),
            "lexicon: loaded"
        );
        Ok(lexicon)
    }

    /// Parse `{"word": "ph ph # ph", "other": ["variant", "variant"]}`.
    pub fn from_json_str(json: &str) -> Result<Self, AlignmentError> {
        // BTreeMap keeps merge order of case-variant keys stable.
        let raw: BTreeMap<String, Value> =
            serde_json::from_str(json).map_err(|e| AlignmentError::json("parse lexicon", e))?;

        let mut entries = Vec::with_capacity(raw.len());
        for (word, value) in raw {
            let variants = match value {
                Value::String(text) => vec![text],
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(text) => Ok(text),
                        other => Err(AlignmentError::configuration(
                            "lexicon entry",
                            format!("'{word}': expected a pronunciation string, got {other}"),
                        )),
                    })
                    .collect::<Result<Vec<_>, _>>()?,
                other => {
                    return Err(AlignmentError::configuration(
                        "lexicon entry",
                        format!("'{word}': expected a string or a list of strings, got {other}"),
                    ))
                }
            };
            entries.push((word, variants));
        }
        Self::from_entries(entries)
    }

    pub fn from_entries<I, K, V>(entries: I) -> Result<Self, AlignmentError>
    where
        I: IntoIterator<Item = (K, Vec<V>)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut table: HashMap<String, Vec<Pronunciation>> = HashMap::new();
        for (word, variants) in entries {
            let word = word.as_ref();
            if variants.is_empty() {
                return Err(AlignmentError::configuration(
                    "lexicon entry",
                    format!("'{word}' has no pronunciation variants"),
                ));
            }
            let parsed = variants
                .iter()
                .map(|v| parse_pronunciation(word, v.as_ref()))
                .collect::<Result<Vec<_>, _>>()?;
            let key = word.to_lowercase();
            if table.contains_key(&key) {
                tracing::debug!(word, key = key.as_str(), "lexicon: merging case variant");
            }
            table.entry(key).or_default().extend(parsed);
        }
        if table.is_empty() {
            tracing::warn!("lexicon: no entries; every word will fall back to an opaque symbol");
        }
        Ok(Self { entries: table })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(&word.to_lowercase())
    }

    pub fn variants(&self, word: &str) -> Option<&[Pronunciation]> {
        self.entries.get(&word.to_lowercase()).map(Vec::as_slice)
    }

    /// First-listed variant.
    pub fn canonical(&self, word: &str) -> Option<&Pronunciation> {
        self.variants(word).and_then(|v| v.first())
    }

    /// Pronounce a token: exact key, then compound/number parts, then an
    /// opaque symbol for the whole word.
    pub fn lookup(&self, token: &Token) -> PronunciationLookup {
        let key = token.lexicon_key();
        if let Some(pronunciation) = self.canonical(&key) {
            return PronunciationLookup::found(pronunciation.clone());
        }

        let parts = compound_parts(&key);
        let decomposed = match parts.as_slice() {
            [] => false,
            [single] => *single != key,
            _ => true,
        };
        if !decomposed {
            tracing::debug!(
                word = token.surface.as_str(),
                key = key.as_str(),
                "lexicon: miss"
            );
            return PronunciationLookup::miss(Pronunciation::opaque(&key));
        }

        let mut pronunciation = Pronunciation::new(Vec::new());
        let mut missing = Vec::new();
        for part in &parts {
            match self.canonical(part) {
                Some(found) => pronunciation.extend(found.clone()),
                None => {
                    pronunciation.extend(Pronunciation::opaque(part));
                    missing.push(part.as_str());
                }
            }
        }
        if missing.is_empty() {
            tracing::debug!(
                word = token.surface.as_str(),
                parts = ?parts,
                "lexicon: pronounced by parts"
            );
            PronunciationLookup::found(pronunciation)
        } else {
            tracing::debug!(
                word = token.surface.as_str(),
                missing = ?missing,
                "lexicon: miss on compound parts"
            );
            PronunciationLookup::miss(pronunciation)
        }
    }
}

fn parse_pronunciation(word: &str, text: &str) -> Result<Pronunciation, AlignmentError> {
    let mut syllables = Vec::new();
    for syllable in text.split(SYLLABLE_BOUNDARY) {
        let mut phones = Vec::new();
        for raw in syllable.split_whitespace() {
            let phone = raw
                .trim_end_matches(|c: char| c.is_ascii_digit())
                .to_lowercase();
            if phone.is_empty() || phone == WORD_BOUNDARY {
                return Err(AlignmentError::configuration(
                    "lexicon entry",
                    format!("'{word}': invalid phone '{raw}' in \"{text}\""),
                ));
            }
            phones.push(PhoneSymbol::Phone(phone));
        }
        if phones.is_empty() {
            return Err(AlignmentError::configuration(
                "lexicon entry",
                format!("'{word}': empty syllable in \"{text}\""),
            ));
        }
        syllables.push(phones);
    }
    Ok(Pronunciation::new(syllables))
}
