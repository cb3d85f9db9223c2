//! # Dynamic Batching
//!
//! Groups variable-length [`crate::corpus::Example`]s into padded,
//! token-budgeted [`Batch`]es.
//!
//! * [`token_budget`] - the per-batch cost rule, and its [`BudgetAccumulator`].
//! * [`BatchPlanner`] - super-chunk sort/split/shuffle planning.
//! * [`BatchIter`] - lazy materialization of a [`BatchPlan`].
//! * [`make_batches`] - plan and iterate one pass.

pub mod batch;
pub mod batch_iter;
pub mod batch_planner;
pub mod token_budget;

#[doc(inline)]
pub use batch::{Batch, PaddedGrid};
#[doc(inline)]
pub use batch_iter::{BatchIter, make_batches};
#[doc(inline)]
pub use batch_planner::{BatchPlan, BatchPlanner};
#[doc(inline)]
pub use token_budget::{BudgetAccumulator, TARGET_MARKER_SLOTS, split_by_budget};
