//! # Token Budget Rule
//!
//! Examples are appended one at a time to an accumulating batch.
//! The projected cost of a batch is:
//!
//! ```text
//! count * max(max_source_len, max_target_len + TARGET_MARKER_SLOTS)
//! ```
//!
//! An example which would push the projected cost over the budget
//! closes the current batch and starts the next one. An example
//! which alone exceeds the budget still forms a batch of one.

use crate::corpus::Example;

/// Extra target slots costed per row, for the sequence-start/end markers.
pub const TARGET_MARKER_SLOTS: usize = 2;

/// Running state of one accumulating batch.
///
/// Each value is owned by a single batch-construction call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BudgetAccumulator {
    count: usize,
    max_source_len: usize,
    max_target_len: usize,
}

impl BudgetAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of examples accumulated.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Has nothing been accumulated?
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The running max source length.
    pub fn max_source_len(&self) -> usize {
        self.max_source_len
    }

    /// The running max target length.
    pub fn max_target_len(&self) -> usize {
        self.max_target_len
    }

    /// The projected padded cost of the accumulated batch.
    pub fn cost(&self) -> usize {
        self.count * self.max_source_len.max(self.max_target_len + TARGET_MARKER_SLOTS)
    }

    /// The accumulator with one more example added.
    pub fn with_example(
        &self,
        source_len: usize,
        target_len: usize,
    ) -> Self {
        Self {
            count: self.count + 1,
            max_source_len: self.max_source_len.max(source_len),
            max_target_len: self.max_target_len.max(target_len),
        }
    }

    /// Can an example join without exceeding `budget`?
    ///
    /// An empty accumulator accepts anything.
    pub fn admits(
        &self,
        source_len: usize,
        target_len: usize,
        budget: usize,
    ) -> bool {
        self.is_empty() || self.with_example(source_len, target_len).cost() <= budget
    }

    /// Add an example.
    pub fn push(
        &mut self,
        source_len: usize,
        target_len: usize,
    ) {
        *self = self.with_example(source_len, target_len);
    }
}

/// Split an ordered run of examples into budgeted mini-batches.
///
/// ## Arguments
/// * `examples` - the example table.
/// * `order` - indices into `examples`, in batching order.
/// * `budget` - the token budget.
///
/// ## Returns
/// The mini-batches, as index lists; order is preserved, and no index is dropped.
pub fn split_by_budget(
    examples: &[Example],
    order: &[usize],
    budget: usize,
) -> Vec<Vec<usize>> {
    let mut batches = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut acc = BudgetAccumulator::new();

    for &idx in order {
        let (src, tgt) = examples[idx].length_key();
        if !acc.admits(src, tgt, budget) {
            batches.push(core::mem::take(&mut current));
            acc = BudgetAccumulator::new();
        }
        acc.push(src, tgt);
        current.push(idx);
    }
    if !current.is_empty() {
        batches.push(current);
    }

    batches
}
