use std::fmt;

use serde::Serialize;

pub const WORD_BOUNDARY: &str = "|";
pub const SYLLABLE_BOUNDARY: &str = "#";

/// One symbol of a phone stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum PhoneSymbol {
    WordBoundary,
    SyllableBoundary,
    Phone(String),
    /// Stand-in for a word with no pronunciation; matches only itself.
    Opaque(String),
}

impl PhoneSymbol {
    /// Parse the textual form used in lexicon entries and fixtures.
    /// Empty strings are gap placeholders and yield `None`.
    pub fn parse(symbol: &str) -> Option<Self> {
        match symbol {
            "" => None,
            WORD_BOUNDARY => Some(Self::WordBoundary),
            SYLLABLE_BOUNDARY => Some(Self::SyllableBoundary),
            phone => Some(Self::Phone(phone.to_string())),
        }
    }

    pub fn phone(name: &str) -> Self {
        Self::Phone(name.to_string())
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, Self::WordBoundary | Self::SyllableBoundary)
    }
}

impl fmt::Display for PhoneSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WordBoundary => f.write_str(WORD_BOUNDARY),
            Self::SyllableBoundary => f.write_str(SYLLABLE_BOUNDARY),
            Self::Phone(p) | Self::Opaque(p) => f.write_str(p),
        }
    }
}

/// Phones of one pronunciation variant, grouped by syllable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pronunciation {
    syllables: Vec<Vec<PhoneSymbol>>,
}

impl Pronunciation {
    pub fn new(syllables: Vec<Vec<PhoneSymbol>>) -> Self {
        Self { syllables }
    }

    pub fn opaque(word: &str) -> Self {
        Self {
            syllables: vec![vec![PhoneSymbol::Opaque(word.to_string())]],
        }
    }

    pub fn syllables(&self) -> &[Vec<PhoneSymbol>] {
        &self.syllables
    }

    /// Append another pronunciation's syllables (compound words).
    pub fn extend(&mut self, other: Pronunciation) {
        self.syllables.extend(other.syllables);
    }

    pub fn phones(&self) -> impl Iterator<Item = &PhoneSymbol> {
        self.syllables.iter().flatten()
    }
}

impl fmt::Display for Pronunciation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .syllables
            .iter()
            .map(|syl| {
                syl.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join(" # ");
        f.write_str(&rendered)
    }
}

/// Flat phone sequence with injected boundary markers:
/// `| # syl # syl | # syl |`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhoneStream {
    symbols: Vec<PhoneSymbol>,
}

impl PhoneStream {
    /// Concatenate word pronunciations. Zero words give an empty stream.
    pub fn from_pronunciations<'a, I>(pronunciations: I) -> Self
    where
        I: IntoIterator<Item = &'a Pronunciation>,
    {
        let mut symbols = Vec::new();
        for pronunciation in pronunciations {
            if symbols.is_empty() {
                symbols.push(PhoneSymbol::WordBoundary);
            }
            for syllable in pronunciation.syllables() {
                symbols.push(PhoneSymbol::SyllableBoundary);
                symbols.extend(syllable.iter().cloned());
            }
            symbols.push(PhoneSymbol::WordBoundary);
        }
        Self { symbols }
    }

    /// Build from textual symbols, skipping empty gap placeholders.
    pub fn from_symbols<S: AsRef<str>>(symbols: &[S]) -> Self {
        Self {
            symbols: symbols
                .iter()
                .filter_map(|s| PhoneSymbol::parse(s.as_ref()))
                .collect(),
        }
    }

    pub fn symbols(&self) -> &[PhoneSymbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.symbols
            .iter()
            .filter(|s| **s == PhoneSymbol::WordBoundary)
            .count()
            .saturating_sub(1)
    }
}

impl fmt::Display for PhoneStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .symbols
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        f.write_str(&rendered)
    }
}
