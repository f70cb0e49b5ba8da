use std::ops::Range;
use std::sync::Arc;

use crate::alignment::cost::{PhoneticCost, UniformCost};
use crate::alignment::levenshtein::Levenshtein;
use crate::alignment::phone_stream::{PhoneStream, PhoneSymbol, Pronunciation};
use crate::alignment::word_mapping::phone_align_to_word_align;
use crate::error::AlignmentError;
use crate::pipeline::traits::{Normalizer, Pronouncer};
use crate::types::{Alignment, AlignmentInput, AlignmentOutput, AlignmentSlot, EditOp, Token};

/// Word-level aligner with phonetic refinement of error regions.
///
/// Holds only immutable state; one instance can serve concurrent callers.
pub struct PowerAligner {
    lowercase: bool,
    normalizer: Box<dyn Normalizer>,
    pronouncer: Arc<dyn Pronouncer>,
    phonetic_cost: PhoneticCost<PhoneSymbol>,
}

pub(crate) struct PowerAlignerParts {
    pub lowercase: bool,
    pub normalizer: Box<dyn Normalizer>,
    pub pronouncer: Arc<dyn Pronouncer>,
    pub phonetic_cost: PhoneticCost<PhoneSymbol>,
}

impl PowerAligner {
    pub(crate) fn from_parts(parts: PowerAlignerParts) -> Self {
        Self {
            lowercase: parts.lowercase,
            normalizer: parts.normalizer,
            pronouncer: parts.pronouncer,
            phonetic_cost: parts.phonetic_cost,
        }
    }

    pub fn lowercase(&self) -> bool {
        self.lowercase
    }

    pub fn align(&self, input: &AlignmentInput) -> Result<AlignmentOutput, AlignmentError> {
        let ref_tokens = self.normalizer.normalize(&input.reference, self.lowercase);
        let hyp_tokens = self.normalizer.normalize(&input.hypothesis, self.lowercase);
        if ref_tokens.is_empty() && !hyp_tokens.is_empty() {
            tracing::warn!(
                hyp_words = hyp_tokens.len(),
                "power aligner: empty reference; every hypothesis word is an insertion"
            );
        }

        let wer_alignment = wer_align(&ref_tokens, &hyp_tokens)?;
        let pronouncer = self.pronouncer.as_ref();
        let (power_alignment, lookup_misses) =
            power_align(&wer_alignment, pronouncer, &self.phonetic_cost)?;

        let wer_counts = wer_alignment.error_counts();
        let power_counts = power_alignment.error_counts();
        tracing::debug!(
            ref_words = ref_tokens.len(),
            hyp_words = hyp_tokens.len(),
            wer_errors = wer_counts.errors(),
            power_errors = power_counts.errors(),
            lookup_misses = lookup_misses.len(),
            "power aligner: aligned"
        );

        Ok(AlignmentOutput {
            wer_alignment,
            power_alignment,
            lookup_misses,
        })
    }
}

/// Orthographic word alignment: strict 1:1 slots, tokens compared with
/// punctuation ignored.
pub fn wer_align(ref_tokens: &[Token], hyp_tokens: &[Token]) -> Result<Alignment, AlignmentError> {
    let ref_keys: Vec<String> = ref_tokens.iter().map(Token::comparable).collect();
    let hyp_keys: Vec<String> = hyp_tokens.iter().map(Token::comparable).collect();
    let lev = Levenshtein::align(&ref_keys, &hyp_keys, &UniformCost);

    let mut refs = ref_tokens.iter();
    let mut hyps = hyp_tokens.iter();
    let mut slots = Vec::with_capacity(lev.editops().len());
    for op in lev.editops().ops() {
        let (ref_span, hyp_span) = match op {
            EditOp::Correct | EditOp::Substitution => (
                vec![next_token(&mut refs, "reference")?],
                vec![next_token(&mut hyps, "hypothesis")?],
            ),
            EditOp::Deletion => (vec![next_token(&mut refs, "reference")?], Vec::new()),
            EditOp::Insertion => (Vec::new(), vec![next_token(&mut hyps, "hypothesis")?]),
        };
        slots.push(AlignmentSlot::new(ref_span, hyp_span, op)?);
    }
    Ok(Alignment::new(slots))
}

fn next_token<'a>(
    tokens: &mut impl Iterator<Item = &'a Token>,
    side: &str,
) -> Result<Token, AlignmentError> {
    tokens.next().cloned().ok_or_else(|| {
        AlignmentError::invariant_violation(format!("edit script overruns the {side} tokens"))
    })
}

/// Maximal runs of non-Correct slots.
pub fn error_blocks(alignment: &Alignment) -> Vec<Range<usize>> {
    let mut blocks = Vec::new();
    let mut start = None;
    for (i, slot) in alignment.slots().iter().enumerate() {
        match (slot.op().is_error(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                blocks.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        blocks.push(s..alignment.len());
    }
    blocks
}

/// Re-align every error block of `wer_alignment` phonetically and splice the
/// refined slots in place. Also returns the normalized words that had no
/// pronunciation, in first-seen order.
pub fn power_align(
    wer_alignment: &Alignment,
    pronouncer: &dyn Pronouncer,
    cost: &PhoneticCost<PhoneSymbol>,
) -> Result<(Alignment, Vec<String>), AlignmentError> {
    let slots = wer_alignment.slots();
    let mut out = Vec::with_capacity(slots.len());
    let mut misses = Vec::new();
    let mut cursor = 0;

    for block in error_blocks(wer_alignment) {
        out.extend_from_slice(&slots[cursor..block.start]);
        let refined = realign_block(&slots[block.clone()], pronouncer, cost, &mut misses)?;
        out.extend(refined.into_slots());
        cursor = block.end;
    }
    out.extend_from_slice(&slots[cursor..]);

    Ok((Alignment::new(out), misses))
}

fn realign_block(
    block: &[AlignmentSlot],
    pronouncer: &dyn Pronouncer,
    cost: &PhoneticCost<PhoneSymbol>,
    misses: &mut Vec<String>,
) -> Result<Alignment, AlignmentError> {
    let ref_words: Vec<Token> = block
        .iter()
        .flat_map(|slot| slot.ref_tokens().iter().cloned())
        .collect();
    let hyp_words: Vec<Token> = block
        .iter()
        .flat_map(|slot| slot.hyp_tokens().iter().cloned())
        .collect();

    let ref_phones = phone_stream(&ref_words, pronouncer, misses);
    let hyp_phones = phone_stream(&hyp_words, pronouncer, misses);
    let (refined, _) =
        phone_align_to_word_align(&ref_words, &hyp_words, &ref_phones, &hyp_phones, cost)?;

    tracing::debug!(
        reference = join_surfaces(&ref_words).as_str(),
        hypothesis = join_surfaces(&hyp_words).as_str(),
        wer_ops = %ops_string(block.iter().map(AlignmentSlot::op)),
        power_ops = %ops_string(refined.align()),
        "power aligner: re-aligned error block"
    );
    Ok(refined)
}

fn phone_stream(
    words: &[Token],
    pronouncer: &dyn Pronouncer,
    misses: &mut Vec<String>,
) -> PhoneStream {
    let pronunciations: Vec<Pronunciation> = words
        .iter()
        .map(|token| {
            let lookup = pronouncer.pronounce(token);
            if lookup.is_miss && !misses.contains(&token.normalized) {
                misses.push(token.normalized.clone());
            }
            lookup.pronunciation
        })
        .collect();
    PhoneStream::from_pronunciations(&pronunciations)
}

fn join_surfaces(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.surface.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn ops_string(ops: impl IntoIterator<Item = EditOp>) -> String {
    ops.into_iter().map(EditOp::as_char).collect()
}
