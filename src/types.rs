use std::fmt;

use serde::Serialize;

use crate::error::AlignmentError;

#[derive(Debug, Clone)]
pub struct AlignmentInput {
    pub reference: String,
    pub hypothesis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentOutput {
    /// Strict 1:1 word alignment from the orthographic pass.
    pub wer_alignment: Alignment,
    /// `wer_alignment` with every error block re-aligned phonetically.
    pub power_alignment: Alignment,
    /// Normalized words that fell back to an opaque pronunciation.
    pub lookup_misses: Vec<String>,
}

/// One whitespace-delimited word of an input transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Verbatim text, punctuation and case preserved.
    pub surface: String,
    /// Case-folded when requested; punctuation is kept.
    pub normalized: String,
    /// Index of the word in its transcript.
    pub position: usize,
}

impl Token {
    /// Form used for orthographic equivalence: punctuation ignored.
    pub fn comparable(&self) -> String {
        let stripped: String = self
            .normalized
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        if stripped.is_empty() {
            self.normalized.clone()
        } else {
            stripped
        }
    }

    /// Lexicon key: lowercase, leading/trailing punctuation trimmed.
    /// Independent of the case-folding flag.
    pub fn lexicon_key(&self) -> String {
        let trimmed = self.surface.trim_matches(|c: char| !c.is_alphanumeric());
        if trimmed.is_empty() {
            self.surface.to_lowercase()
        } else {
            trimmed.to_lowercase()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EditOp {
    #[serde(rename = "C")]
    Correct,
    #[serde(rename = "S")]
    Substitution,
    /// Extra word on the hypothesis side.
    #[serde(rename = "I")]
    Insertion,
    /// Reference word missing from the hypothesis.
    #[serde(rename = "D")]
    Deletion,
}

impl EditOp {
    pub fn as_char(self) -> char {
        match self {
            Self::Correct => 'C',
            Self::Substitution => 'S',
            Self::Insertion => 'I',
            Self::Deletion => 'D',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(Self::Correct),
            'S' => Some(Self::Substitution),
            'I' => Some(Self::Insertion),
            'D' => Some(Self::Deletion),
            _ => None,
        }
    }

    pub fn is_error(self) -> bool {
        self != Self::Correct
    }
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Zero or more reference tokens paired with zero or more hypothesis tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignmentSlot {
    ref_tokens: Vec<Token>,
    hyp_tokens: Vec<Token>,
    op: EditOp,
}

impl AlignmentSlot {
    pub fn new(
        ref_tokens: Vec<Token>,
        hyp_tokens: Vec<Token>,
        op: EditOp,
    ) -> Result<Self, AlignmentError> {
        if ref_tokens.is_empty() && hyp_tokens.is_empty() {
            return Err(AlignmentError::invariant_violation(format!(
                "{op} slot has no reference and no hypothesis tokens"
            )));
        }
        let consistent = match op {
            EditOp::Correct | EditOp::Substitution => {
                !ref_tokens.is_empty() && !hyp_tokens.is_empty()
            }
            EditOp::Insertion => ref_tokens.is_empty(),
            EditOp::Deletion => hyp_tokens.is_empty(),
        };
        if !consistent {
            return Err(AlignmentError::invariant_violation(format!(
                "{op} slot with {} reference / {} hypothesis tokens",
                ref_tokens.len(),
                hyp_tokens.len()
            )));
        }
        Ok(Self {
            ref_tokens,
            hyp_tokens,
            op,
        })
    }

    pub fn ref_tokens(&self) -> &[Token] {
        &self.ref_tokens
    }

    pub fn hyp_tokens(&self) -> &[Token] {
        &self.hyp_tokens
    }

    pub fn op(&self) -> EditOp {
        self.op
    }

    pub fn ref_text(&self) -> String {
        join_surfaces(&self.ref_tokens)
    }

    pub fn hyp_text(&self) -> String {
        join_surfaces(&self.hyp_tokens)
    }
}

fn join_surfaces(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.surface.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Alignment {
    slots: Vec<AlignmentSlot>,
}

impl Alignment {
    pub fn new(slots: Vec<AlignmentSlot>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[AlignmentSlot] {
        &self.slots
    }

    pub fn into_slots(self) -> Vec<AlignmentSlot> {
        self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Per-slot reference text; empty string for an empty span.
    pub fn s1(&self) -> Vec<String> {
        self.slots.iter().map(AlignmentSlot::ref_text).collect()
    }

    /// Per-slot hypothesis text; empty string for an empty span.
    pub fn s2(&self) -> Vec<String> {
        self.slots.iter().map(AlignmentSlot::hyp_text).collect()
    }

    pub fn align(&self) -> Vec<EditOp> {
        self.slots.iter().map(AlignmentSlot::op).collect()
    }

    /// Reference transcript rebuilt from the slots.
    pub fn s1_string(&self) -> String {
        join_non_empty(self.s1())
    }

    /// Hypothesis transcript rebuilt from the slots.
    pub fn s2_string(&self) -> String {
        join_non_empty(self.s2())
    }

    pub fn error_counts(&self) -> ErrorCounts {
        let mut counts = ErrorCounts::default();
        for slot in &self.slots {
            counts.reference_tokens += slot.ref_tokens.len();
            match slot.op {
                EditOp::Correct => counts.correct += 1,
                EditOp::Substitution => counts.substitutions += 1,
                EditOp::Insertion => counts.insertions += 1,
                EditOp::Deletion => counts.deletions += 1,
            }
        }
        counts
    }
}

fn join_non_empty(parts: Vec<String>) -> String {
    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ref_row = String::from("REF:");
        let mut hyp_row = String::from("HYP:");
        let mut op_row = String::from("    ");
        for slot in &self.slots {
            let ref_text = placeholder_if_empty(slot.ref_text());
            let hyp_text = placeholder_if_empty(slot.hyp_text());
            let width = ref_text
                .chars()
                .count()
                .max(hyp_text.chars().count())
                .max(1);
            ref_row.push_str(&format!(" {ref_text:<width$}"));
            hyp_row.push_str(&format!(" {hyp_text:<width$}"));
            op_row.push_str(&format!(" {:<width$}", slot.op.as_char()));
        }
        writeln!(f, "{}", ref_row.trim_end())?;
        writeln!(f, "{}", hyp_row.trim_end())?;
        write!(f, "{}", op_row.trim_end())
    }
}

fn placeholder_if_empty(text: String) -> String {
    if text.is_empty() {
        "*".to_string()
    } else {
        text
    }
}

/// Slot-level tallies of one alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ErrorCounts {
    pub correct: usize,
    pub substitutions: usize,
    pub insertions: usize,
    pub deletions: usize,
    pub reference_tokens: usize,
}

impl ErrorCounts {
    pub fn errors(&self) -> usize {
        self.substitutions + self.insertions + self.deletions
    }

    /// Errors per reference token; `None` when the reference is empty.
    pub fn error_rate(&self) -> Option<f64> {
        if self.reference_tokens == 0 {
            None
        } else {
            Some(self.errors() as f64 / self.reference_tokens as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(surface: &str, position: usize) -> Token {
        Token {
            surface: surface.to_string(),
            normalized: surface.to_lowercase(),
            position,
        }
    }

    fn slot(ref_span: Vec<Token>, hyp_span: Vec<Token>, op: EditOp) -> AlignmentSlot {
        AlignmentSlot::new(ref_span, hyp_span, op).expect("spans agree with op")
    }

    #[test]
    fn comparable_ignores_punctuation() {
        assert_eq!(token("Antiserum,", 0).comparable(), "antiserum");
        assert_eq!(token("50-year-old", 0).comparable(), "50yearold");
        // Pure punctuation falls back to the normalized form.
        assert_eq!(token("--", 0).comparable(), "--");
    }

    #[test]
    fn lexicon_key_trims_edges_only() {
        assert_eq!(token("Dr.", 0).lexicon_key(), "dr");
        assert_eq!(token("'anti", 0).lexicon_key(), "anti");
        assert_eq!(token("50-year-old,", 0).lexicon_key(), "50-year-old");
        assert_eq!(token("...", 0).lexicon_key(), "...");
    }

    #[test]
    fn edit_op_char_round_trip() {
        for op in [
            EditOp::Correct,
            EditOp::Substitution,
            EditOp::Insertion,
            EditOp::Deletion,
        ] {
            assert_eq!(EditOp::from_char(op.as_char()), Some(op));
        }
        assert_eq!(EditOp::from_char('M'), None);
    }

    #[test]
    fn slot_rejects_empty_spans() {
        let err = AlignmentSlot::new(Vec::new(), Vec::new(), EditOp::Insertion).unwrap_err();
        assert!(matches!(err, AlignmentError::InvariantViolation { .. }));
    }

    #[test]
    fn slot_rejects_op_span_mismatch() {
        assert!(AlignmentSlot::new(vec![token("a", 0)], Vec::new(), EditOp::Correct).is_err());
        assert!(AlignmentSlot::new(vec![token("a", 0)], Vec::new(), EditOp::Insertion).is_err());
        assert!(AlignmentSlot::new(Vec::new(), vec![token("a", 0)], EditOp::Deletion).is_err());
    }

    #[test]
    fn views_and_reconstruction() {
        let alignment = Alignment::new(vec![
            slot(
                vec![token("They", 0)],
                vec![token("they", 0)],
                EditOp::Correct,
            ),
            slot(Vec::new(), vec![token("we", 1)], EditOp::Insertion),
            slot(
                vec![token("50-year-old", 1)],
                vec![token("fifty", 2), token("year", 3), token("old", 4)],
                EditOp::Substitution,
            ),
        ]);
        assert_eq!(alignment.s1(), ["They", "", "50-year-old"]);
        assert_eq!(alignment.s2(), ["they", "we", "fifty year old"]);
        assert_eq!(
            alignment.align(),
            [EditOp::Correct, EditOp::Insertion, EditOp::Substitution]
        );
        assert_eq!(alignment.s1_string(), "They 50-year-old");
        assert_eq!(alignment.s2_string(), "they we fifty year old");
    }

    #[test]
    fn error_counts_per_slot() {
        let alignment = Alignment::new(vec![
            slot(vec![token("a", 0)], Vec::new(), EditOp::Deletion),
            slot(vec![token("b", 1)], vec![token("b", 0)], EditOp::Correct),
            slot(
                vec![token("c", 2)],
                vec![token("d", 1)],
                EditOp::Substitution,
            ),
        ]);
        let counts = alignment.error_counts();
        assert_eq!(counts.correct, 1);
        assert_eq!(counts.deletions, 1);
        assert_eq!(counts.substitutions, 1);
        assert_eq!(counts.reference_tokens, 3);
        let rate = counts.error_rate().expect("non-empty reference");
        assert!((rate - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(Alignment::default().error_counts().error_rate(), None);
    }

    #[test]
    fn display_pads_columns() {
        let alignment = Alignment::new(vec![
            slot(
                vec![token("an", 0)],
                vec![token("on", 0)],
                EditOp::Substitution,
            ),
            slot(Vec::new(), vec![token("low", 1)], EditOp::Insertion),
        ]);
        let rendered = alignment.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines, ["REF: an *", "HYP: on low", "     S  I"]);
    }
}
