use std::collections::HashSet;
use std::hash::Hash;

use crate::alignment::phone_stream::PhoneSymbol;
use crate::config::PhoneticCostConfig;
use crate::error::AlignmentError;

/// Edit costs for the alignment engine. `f64::INFINITY` forbids an edit.
pub trait CostModel<T> {
    fn substitution(&self, a: &T, b: &T) -> f64;
    fn insertion(&self, b: &T) -> f64;
    fn deletion(&self, a: &T) -> f64;
}

/// Classic Levenshtein weights: 0 for equal symbols, 1 for everything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformCost;

impl<T: PartialEq> CostModel<T> for UniformCost {
    fn substitution(&self, a: &T, b: &T) -> f64 {
        if a == b {
            0.0
        } else {
            1.0
        }
    }

    fn insertion(&self, _b: &T) -> f64 {
        1.0
    }

    fn deletion(&self, _a: &T) -> f64 {
        1.0
    }
}

/// Marker symbols that may only ever match an identical marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveSet<T: Eq + Hash>(HashSet<T>);

impl<T: Eq + Hash> ReserveSet<T> {
    pub fn new(markers: impl IntoIterator<Item = T>) -> Self {
        Self(markers.into_iter().collect())
    }

    pub fn contains(&self, symbol: &T) -> bool {
        self.0.contains(symbol)
    }
}

/// Disjoint confusion classes; the first class holding a symbol wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusiveSets<T: Eq + Hash>(Vec<HashSet<T>>);

impl<T: Eq + Hash> ExclusiveSets<T> {
    pub fn new(classes: impl IntoIterator<Item = HashSet<T>>) -> Self {
        Self(classes.into_iter().collect())
    }

    pub fn class_of(&self, symbol: &T) -> Option<usize> {
        self.0.iter().position(|class| class.contains(symbol))
    }

    pub fn same_class(&self, a: &T, b: &T) -> bool {
        match (self.class_of(a), self.class_of(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

const VOWELS: &[&str] = &[
    "aa", "ae", "ah", "ao", "aw", "ax", "axr", "ay", "eh", "er", "ey", "ih", "ix", "iy", "ow",
    "oy", "uh", "uw", "ux",
];
const STOPS: &[&str] = &["p", "b", "t", "d", "k", "g", "dx", "q"];
const FRICATIVES: &[&str] = &["f", "v", "th", "dh", "s", "z", "sh", "zh", "hh"];
const AFFRICATES: &[&str] = &["ch", "jh"];
const NASALS: &[&str] = &["m", "n", "ng", "em", "en", "eng", "nx"];
const APPROXIMANTS: &[&str] = &["l", "r", "w", "y", "el"];

/// Phone-level costs: reserved markers act as anchors and substitutions
/// inside a confusion class are cheaper than across classes.
#[derive(Debug, Clone)]
pub struct PhoneticCost<T: Eq + Hash> {
    reserve: ReserveSet<T>,
    exclusive: ExclusiveSets<T>,
    weights: PhoneticCostConfig,
}

impl<T: Eq + Hash> PhoneticCost<T> {
    pub fn new(
        reserve: ReserveSet<T>,
        exclusive: ExclusiveSets<T>,
        weights: PhoneticCostConfig,
    ) -> Result<Self, AlignmentError> {
        weights.validate()?;
        Ok(Self {
            reserve,
            exclusive,
            weights,
        })
    }

    pub fn reserve(&self) -> &ReserveSet<T> {
        &self.reserve
    }

    pub fn exclusive(&self) -> &ExclusiveSets<T> {
        &self.exclusive
    }

    pub fn weights(&self) -> PhoneticCostConfig {
        self.weights
    }

    fn indel(&self, symbol: &T) -> f64 {
        if self.reserve.contains(symbol) {
            self.weights.marker_indel
        } else {
            self.weights.substitution
        }
    }
}

impl PhoneticCost<PhoneSymbol> {
    /// ARPAbet confusion classes with word/syllable boundaries reserved.
    pub fn english(weights: PhoneticCostConfig) -> Result<Self, AlignmentError> {
        let classes = [VOWELS, STOPS, FRICATIVES, AFFRICATES, NASALS, APPROXIMANTS]
            .into_iter()
            .map(|class| class.iter().map(|p| PhoneSymbol::phone(p)).collect());
        Self::new(
            ReserveSet::new([PhoneSymbol::WordBoundary, PhoneSymbol::SyllableBoundary]),
            ExclusiveSets::new(classes),
            weights,
        )
    }
}

impl<T: Eq + Hash> CostModel<T> for PhoneticCost<T> {
    fn substitution(&self, a: &T, b: &T) -> f64 {
        if a == b {
            return 0.0;
        }
        if self.reserve.contains(a) || self.reserve.contains(b) {
            return f64::INFINITY;
        }
        if self.exclusive.same_class(a, b) {
            self.weights.same_class_substitution
        } else {
            self.weights.substitution
        }
    }

    fn insertion(&self, b: &T) -> f64 {
        self.indel(b)
    }

    fn deletion(&self, a: &T) -> f64 {
        self.indel(a)
    }
}
