use serde::Serialize;

use crate::alignment::cost::CostModel;
use crate::types::EditOp;

const STEP_DIAG: u8 = 0;
const STEP_DEL: u8 = 1;
const STEP_INS: u8 = 2;

/// `len` consecutive edits of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EditRun {
    pub op: EditOp,
    pub len: usize,
}

/// Run-length encoded edit script, left to right.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EditScript {
    runs: Vec<EditRun>,
}

impl EditScript {
    pub fn from_ops(ops: impl IntoIterator<Item = EditOp>) -> Self {
        let mut script = Self::default();
        for op in ops {
            script.push(op);
        }
        script
    }

    fn push(&mut self, op: EditOp) {
        match self.runs.last_mut() {
            Some(run) if run.op == op => run.len += 1,
            _ => self.runs.push(EditRun { op, len: 1 }),
        }
    }

    pub fn runs(&self) -> &[EditRun] {
        &self.runs
    }

    /// One op per backtrace step.
    pub fn ops(&self) -> impl Iterator<Item = EditOp> + '_ {
        self.runs
            .iter()
            .flat_map(|run| std::iter::repeat(run.op).take(run.len))
    }

    /// Number of backtrace steps.
    pub fn len(&self) -> usize {
        self.runs.iter().map(|run| run.len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// One backtrace step; `None` is the gap on the side that consumed nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignedPair<T> {
    pub op: EditOp,
    pub a: Option<T>,
    pub b: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpandedAlignment<T> {
    steps: Vec<AlignedPair<T>>,
}

impl<T> Default for ExpandedAlignment<T> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<T> ExpandedAlignment<T> {
    pub fn steps(&self) -> &[AlignedPair<T>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn s1(&self) -> Vec<Option<&T>> {
        self.steps.iter().map(|s| s.a.as_ref()).collect()
    }

    pub fn s2(&self) -> Vec<Option<&T>> {
        self.steps.iter().map(|s| s.b.as_ref()).collect()
    }

    pub fn align(&self) -> Vec<EditOp> {
        self.steps.iter().map(|s| s.op).collect()
    }
}

impl<T> FromIterator<AlignedPair<T>> for ExpandedAlignment<T> {
    fn from_iter<I: IntoIterator<Item = AlignedPair<T>>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

/// Minimum edit distance between two symbol sequences under a cost model.
///
/// Ties are broken deterministically during the backtrace, preferring the
/// diagonal (correct/substitution), then deletion, then insertion.
#[derive(Debug, Clone)]
pub struct Levenshtein<'a, T> {
    a: &'a [T],
    b: &'a [T],
    distance: f64,
    script: EditScript,
}

impl<'a, T: PartialEq + Clone> Levenshtein<'a, T> {
    pub fn align<C>(a: &'a [T], b: &'a [T], cost: &C) -> Self
    where
        C: CostModel<T> + ?Sized,
    {
        let n = a.len();
        let m = b.len();
        let width = m + 1;

        let mut prev = vec![0.0f64; width];
        let mut curr = vec![0.0f64; width];
        let mut bp = vec![STEP_DIAG; (n + 1) * width];

        for j in 1..=m {
            prev[j] = prev[j - 1] + cost.insertion(&b[j - 1]);
            bp[j] = STEP_INS;
        }

        for i in 1..=n {
            let row = i * width;
            curr[0] = prev[0] + cost.deletion(&a[i - 1]);
            bp[row] = STEP_DEL;
            for j in 1..=m {
                let diag = prev[j - 1] + cost.substitution(&a[i - 1], &b[j - 1]);
                let del = prev[j] + cost.deletion(&a[i - 1]);
                let ins = curr[j - 1] + cost.insertion(&b[j - 1]);
                let (best, step) = best_step(diag, del, ins);
                curr[j] = best;
                bp[row + j] = step;
            }
            std::mem::swap(&mut prev, &mut curr);
        }
        let distance = prev[m];

        let mut ops = Vec::with_capacity(n + m);
        let (mut i, mut j) = (n, m);
        while i > 0 || j > 0 {
            match bp[i * width + j] {
                STEP_DIAG => {
                    debug_assert!(i >= 1 && j >= 1);
                    ops.push(if a[i - 1] == b[j - 1] {
                        EditOp::Correct
                    } else {
                        EditOp::Substitution
                    });
                    i -= 1;
                    j -= 1;
                }
                STEP_DEL => {
                    ops.push(EditOp::Deletion);
                    i -= 1;
                }
                _ => {
                    ops.push(EditOp::Insertion);
                    j -= 1;
                }
            }
        }
        ops.reverse();

        Self {
            a,
            b,
            distance,
            script: EditScript::from_ops(ops),
        }
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Compact edit script.
    pub fn editops(&self) -> &EditScript {
        &self.script
    }

    /// Expand the edit script into one symbol pair per step.
    pub fn expand_align(&self) -> ExpandedAlignment<T> {
        let mut steps = Vec::with_capacity(self.script.len());
        let mut ai = self.a.iter();
        let mut bi = self.b.iter();
        for op in self.script.ops() {
            let (a, b) = match op {
                EditOp::Correct | EditOp::Substitution => (ai.next(), bi.next()),
                EditOp::Deletion => (ai.next(), None),
                EditOp::Insertion => (None, bi.next()),
            };
            steps.push(AlignedPair {
                op,
                a: a.cloned(),
                b: b.cloned(),
            });
        }
        ExpandedAlignment { steps }
    }
}

#[inline(always)]
fn best_step(diag: f64, del: f64, ins: f64) -> (f64, u8) {
    let mut best = diag;
    let mut step = STEP_DIAG;
    if del < best {
        best = del;
        step = STEP_DEL;
    }
    if ins < best {
        best = ins;
        step = STEP_INS;
    }
    (best, step)
}
