use crate::alignment::cost::CostModel;
use crate::alignment::levenshtein::{AlignedPair, ExpandedAlignment, Levenshtein};
use crate::alignment::phone_stream::{PhoneStream, PhoneSymbol};
use crate::error::AlignmentError;
use crate::types::{Alignment, AlignmentSlot, Token};

mod spans;

use spans::{PendingSlot, SideCursor, SideEffect};

/// Align two phone streams and lift the result back to word level.
///
/// `ref_phones`/`hyp_phones` must carry one closing word boundary per entry
/// of `ref_words`/`hyp_words`. The returned phone-level alignment is the one
/// the word slots were derived from.
pub fn phone_align_to_word_align<C>(
    ref_words: &[Token],
    hyp_words: &[Token],
    ref_phones: &PhoneStream,
    hyp_phones: &PhoneStream,
    cost: &C,
) -> Result<(Alignment, ExpandedAlignment<PhoneSymbol>), AlignmentError>
where
    C: CostModel<PhoneSymbol> + ?Sized,
{
    let lev = Levenshtein::align(ref_phones.symbols(), hyp_phones.symbols(), cost);
    tracing::debug!(
        ref_phones = %ref_phones,
        hyp_phones = %hyp_phones,
        distance = lev.distance(),
        "word_mapping: phone alignment"
    );
    let expanded = lev.expand_align();
    let alignment = map_expanded(ref_words, hyp_words, &expanded)?;
    Ok((alignment, expanded))
}

/// Walk a phone-level alignment and group it into word slots.
///
/// A slot is emitted once it holds at least one closed word and neither
/// side is in the middle of a word. Sides that fall out of lockstep keep
/// closing words into the same slot, which is how one reference word ends
/// up paired with several hypothesis words.
pub(crate) fn map_expanded(
    ref_words: &[Token],
    hyp_words: &[Token],
    expanded: &ExpandedAlignment<PhoneSymbol>,
) -> Result<Alignment, AlignmentError> {
    let mut ref_side = SideCursor::new("reference", ref_words);
    let mut hyp_side = SideCursor::new("hypothesis", hyp_words);
    let mut pending = PendingSlot::new();
    let mut slots = Vec::new();

    for (index, step) in expanded.steps().iter().enumerate() {
        let mut state = StepState {
            ref_side: &mut ref_side,
            hyp_side: &mut hyp_side,
            pending: &mut pending,
            slots: &mut slots,
        };
        process_step(index, step, &mut state)?;
    }

    ref_side.finish()?;
    hyp_side.finish()?;
    if pending.has_words() {
        return Err(AlignmentError::invariant_violation(
            "phone alignment ended with an unemitted word span",
        ));
    }
    Ok(Alignment::new(slots))
}

/// Mutable state updated by process_step.
struct StepState<'s, 'w> {
    ref_side: &'s mut SideCursor<'w>,
    hyp_side: &'s mut SideCursor<'w>,
    pending: &'s mut PendingSlot,
    slots: &'s mut Vec<AlignmentSlot>,
}

fn process_step(
    index: usize,
    step: &AlignedPair<PhoneSymbol>,
    state: &mut StepState<'_, '_>,
) -> Result<(), AlignmentError> {
    let (ref_effect, ref_closed) = state.ref_side.consume(step.a.as_ref())?;
    let (hyp_effect, hyp_closed) = state.hyp_side.consume(step.b.as_ref())?;

    if let Some(token) = ref_closed {
        state.pending.push_ref(token);
    }
    if let Some(token) = hyp_closed {
        state.pending.push_hyp(token);
    }
    // Boundaries that close nothing carry no word content.
    if ref_effect != SideEffect::Idle || hyp_effect != SideEffect::Idle {
        state.pending.record(step.op);
    }

    tracing::debug!(
        step = index,
        op = %step.op,
        ref_symbol = step.a.as_ref().map(ToString::to_string),
        hyp_symbol = step.b.as_ref().map(ToString::to_string),
        ref_effect = ?ref_effect,
        hyp_effect = ?hyp_effect,
        "word_mapping: phone step"
    );

    if state.pending.has_words() && !state.ref_side.is_open() && !state.hyp_side.is_open() {
        let slot = state.pending.take_slot()?;
        tracing::debug!(
            op = %slot.op(),
            reference = slot.ref_text().as_str(),
            hypothesis = slot.hyp_text().as_str(),
            "word_mapping: emitted slot"
        );
        state.slots.push(slot);
    }
    Ok(())
}
