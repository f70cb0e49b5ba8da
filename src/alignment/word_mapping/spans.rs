use crate::alignment::phone_stream::PhoneSymbol;
use crate::error::AlignmentError;
use crate::types::{AlignmentSlot, EditOp, Token};

/// What consuming one symbol did to a side's word tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SideEffect {
    /// Gap, or a marker read while no word is open.
    Idle,
    /// Phone, or syllable marker inside the current word.
    Inside,
    /// Word boundary that finished the current word.
    Closed,
}

/// Cursor into one side's word list.
pub(super) struct SideCursor<'a> {
    side: &'static str,
    words: &'a [Token],
    next: usize,
    open: bool,
}

impl<'a> SideCursor<'a> {
    pub(super) fn new(side: &'static str, words: &'a [Token]) -> Self {
        Self {
            side,
            words,
            next: 0,
            open: false,
        }
    }

    pub(super) fn is_open(&self) -> bool {
        self.open
    }

    /// Consume one aligned symbol. A closed word is returned so the caller
    /// can add it to the pending slot.
    pub(super) fn consume(
        &mut self,
        symbol: Option<&PhoneSymbol>,
    ) -> Result<(SideEffect, Option<&'a Token>), AlignmentError> {
        match symbol {
            None => Ok((SideEffect::Idle, None)),
            Some(PhoneSymbol::WordBoundary | PhoneSymbol::SyllableBoundary) if !self.open => {
                Ok((SideEffect::Idle, None))
            }
            Some(PhoneSymbol::WordBoundary) => {
                let word = self.words.get(self.next).ok_or_else(|| {
                    AlignmentError::invariant_violation(format!(
                        "{} word boundary closes word {} but only {} words exist",
                        self.side,
                        self.next + 1,
                        self.words.len()
                    ))
                })?;
                self.next += 1;
                self.open = false;
                Ok((SideEffect::Closed, Some(word)))
            }
            Some(PhoneSymbol::SyllableBoundary) => Ok((SideEffect::Inside, None)),
            // A word opens on its first phone, not on the syllable marker before it.
            Some(PhoneSymbol::Phone(_) | PhoneSymbol::Opaque(_)) => {
                self.open = true;
                Ok((SideEffect::Inside, None))
            }
        }
    }

    /// Every word consumed and none left open.
    pub(super) fn finish(&self) -> Result<(), AlignmentError> {
        if self.open {
            return Err(AlignmentError::invariant_violation(format!(
                "{} phone stream ended inside word {}",
                self.side,
                self.next + 1
            )));
        }
        if self.next != self.words.len() {
            return Err(AlignmentError::invariant_violation(format!(
                "{} phone stream closed {} of {} words",
                self.side,
                self.next,
                self.words.len()
            )));
        }
        Ok(())
    }
}

/// Word spans accumulated since the last emitted slot.
#[derive(Default)]
pub(super) struct PendingSlot {
    ref_span: Vec<Token>,
    hyp_span: Vec<Token>,
    all_correct: bool,
}

impl PendingSlot {
    pub(super) fn new() -> Self {
        Self {
            all_correct: true,
            ..Self::default()
        }
    }

    pub(super) fn record(&mut self, op: EditOp) {
        if op != EditOp::Correct {
            self.all_correct = false;
        }
    }

    pub(super) fn push_ref(&mut self, token: &Token) {
        self.ref_span.push(token.clone());
    }

    pub(super) fn push_hyp(&mut self, token: &Token) {
        self.hyp_span.push(token.clone());
    }

    pub(super) fn has_words(&self) -> bool {
        !self.ref_span.is_empty() || !self.hyp_span.is_empty()
    }

    pub(super) fn op(&self) -> EditOp {
        if self.ref_span.is_empty() {
            EditOp::Insertion
        } else if self.hyp_span.is_empty() {
            EditOp::Deletion
        } else if self.all_correct {
            EditOp::Correct
        } else {
            EditOp::Substitution
        }
    }

    /// Turn the pending spans into a slot and start a fresh one.
    pub(super) fn take_slot(&mut self) -> Result<AlignmentSlot, AlignmentError> {
        let op = self.op();
        let pending = std::mem::replace(self, Self::new());
        AlignmentSlot::new(pending.ref_span, pending.hyp_span, op)
    }
}
