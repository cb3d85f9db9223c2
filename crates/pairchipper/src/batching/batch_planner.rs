//! # Batch Planning
//!
//! Plans which examples form each mini-batch, and in which order the
//! mini-batches are produced. Plans are lists of example indices;
//! [`crate::batching::BatchIter`] materializes them lazily.
//!
//! ## Training Mode
//!
//! The examples are cut, in file order, into contiguous super-chunks of
//! ``chunk_factor * token_budget`` examples. Each super-chunk is sorted
//! by the sort key and split by the [`crate::batching::token_budget`] rule.
//! With shuffling on, the mini-batches of all super-chunks are then
//! permuted; the contents of a mini-batch never change.
//!
//! ## Evaluation Mode
//!
//! All examples are sorted once by the sort key, and split by the budget
//! rule. The order is fixed.

use rand::{Rng, seq::SliceRandom};

use crate::{
    batching::token_budget::split_by_budget,
    corpus::Example,
    errors::PCResult,
    options::PipelineOptions,
};

/// An ordered list of mini-batches, each a list of example indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchPlan {
    batches: Vec<Vec<usize>>,
}

impl From<Vec<Vec<usize>>> for BatchPlan {
    fn from(batches: Vec<Vec<usize>>) -> Self {
        Self { batches }
    }
}

impl BatchPlan {
    /// The planned mini-batches.
    pub fn batches(&self) -> &[Vec<usize>] {
        &self.batches
    }

    /// The number of mini-batches.
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    /// Is the plan empty?
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Release the mini-batches.
    pub fn into_batches(self) -> Vec<Vec<usize>> {
        self.batches
    }
}

/// Plans mini-batches for one pass over a set of examples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlanner {
    token_budget: usize,
    chunk_size: usize,
    training: bool,
    shuffle: bool,
}

impl BatchPlanner {
    /// Build a planner from pipeline options.
    pub fn from_options(options: &PipelineOptions) -> PCResult<Self> {
        options.validate()?;
        Ok(Self {
            token_budget: options.token_budget,
            chunk_size: options.chunk_size(),
            training: options.training,
            shuffle: options.shuffles(),
        })
    }

    /// The token budget.
    pub fn token_budget(&self) -> usize {
        self.token_budget
    }

    /// The number of examples per training super-chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Is this a training planner?
    pub fn is_training(&self) -> bool {
        self.training
    }

    /// Does this planner shuffle batch order?
    pub fn shuffles(&self) -> bool {
        self.shuffle
    }

    /// The sorted super-chunks, as index lists.
    ///
    /// In training mode, these are contiguous ``chunk_size`` runs of
    /// the examples, each stably sorted by `sort_key`. In evaluation mode,
    /// there is a single super-chunk holding every example.
    pub fn sorted_chunks<K, F>(
        &self,
        examples: &[Example],
        sort_key: F,
    ) -> Vec<Vec<usize>>
    where
        K: Ord,
        F: Fn(&Example) -> K,
    {
        if examples.is_empty() {
            return Vec::new();
        }

        let chunk_size = if self.training {
            self.chunk_size
        } else {
            examples.len()
        };

        (0..examples.len())
            .collect::<Vec<usize>>()
            .chunks(chunk_size)
            .map(|chunk| {
                let mut order = chunk.to_vec();
                order.sort_by_key(|&idx| sort_key(&examples[idx]));
                order
            })
            .collect()
    }

    /// Plan one pass over `examples`.
    ///
    /// ## Arguments
    /// * `examples` - the examples to batch.
    /// * `sort_key` - the length clustering key;
    ///   see [`crate::corpus::length_sort_key`].
    /// * `rng` - the shuffle source; unused unless shuffling.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn plan<K, F, R>(
        &self,
        examples: &[Example],
        sort_key: F,
        rng: &mut R,
    ) -> BatchPlan
    where
        K: Ord,
        F: Fn(&Example) -> K,
        R: Rng + ?Sized,
    {
        let chunks = self.sorted_chunks(examples, sort_key);
        let num_chunks = chunks.len();

        let mut batches: Vec<Vec<usize>> = chunks
            .iter()
            .flat_map(|order| split_by_budget(examples, order, self.token_budget))
            .collect();

        if self.shuffle {
            batches.shuffle(rng);
        }

        log::debug!(
            "Planned {} batches over {} examples ({} super-chunks, shuffle: {})",
            batches.len(),
            examples.len(),
            num_chunks,
            self.shuffle
        );

        batches.into()
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{batching::token_budget::BudgetAccumulator, corpus::length_sort_key};

    fn ex(
        src: usize,
        tgt: usize,
    ) -> Example {
        Example::new(vec!["s".to_string(); src], vec!["t".to_string(); tgt])
    }

    /// A corpus with lengths that vary widely.
    fn corpus(n: usize) -> Vec<Example> {
        (0..n).map(|i| ex((i * 7) % 13, (i * 5) % 11)).collect()
    }

    fn planner(options: PipelineOptions) -> BatchPlanner {
        BatchPlanner::from_options(&options).unwrap()
    }

    fn sorted_flat(plan: &BatchPlan) -> Vec<usize> {
        let mut flat: Vec<usize> = plan.batches().iter().flatten().copied().collect();
        flat.sort();
        flat
    }

    #[test]
    fn test_from_options() {
        let p = planner(
            PipelineOptions::training()
                .with_token_budget(10)
                .with_chunk_factor(3),
        );
        assert_eq!(p.token_budget(), 10);
        assert_eq!(p.chunk_size(), 30);
        assert!(p.is_training());
        assert!(p.shuffles());

        assert!(
            BatchPlanner::from_options(&PipelineOptions::default().with_token_budget(0)).is_err()
        );
    }

    #[test]
    fn test_evaluation_plan_is_sorted_and_fixed() {
        let examples = corpus(100);
        let p = planner(PipelineOptions::evaluation().with_token_budget(40));

        let mut rng = StdRng::seed_from_u64(1);
        let a = p.plan(&examples, length_sort_key, &mut rng);
        let mut rng = StdRng::seed_from_u64(2);
        let b = p.plan(&examples, length_sort_key, &mut rng);
        assert_eq!(a, b);

        let keys: Vec<(usize, usize)> = a
            .batches()
            .iter()
            .flatten()
            .map(|&idx| examples[idx].length_key())
            .collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));

        assert_eq!(sorted_flat(&a), (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_chunks_are_contiguous_and_sorted() {
        let examples = corpus(95);
        let p = planner(
            PipelineOptions::training()
                .with_token_budget(3)
                .with_chunk_factor(10),
        );

        let chunks = p.sorted_chunks(&examples, length_sort_key);
        assert_eq!(chunks.len(), 4);
        assert_eq!(
            chunks.iter().map(Vec::len).collect::<Vec<_>>(),
            vec![30, 30, 30, 5]
        );

        for (c, chunk) in chunks.iter().enumerate() {
            let mut members = chunk.clone();
            members.sort();
            assert_eq!(members, (c * 30..(c * 30 + chunk.len())).collect::<Vec<_>>());

            let keys: Vec<(usize, usize)> =
                chunk.iter().map(|&idx| examples[idx].length_key()).collect();
            assert!(keys.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_training_plan_seeded() {
        let examples = corpus(500);
        let p = planner(
            PipelineOptions::training()
                .with_token_budget(30)
                .with_chunk_factor(2),
        );

        let plan = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            p.plan(&examples, length_sort_key, &mut rng)
        };

        let a = plan(17);
        let b = plan(17);
        let c = plan(18);
        assert_eq!(a, b);
        assert_ne!(a, c);

        // Same membership, different order.
        let mut a_sets = a.clone().into_batches();
        let mut c_sets = c.into_batches();
        a_sets.sort();
        c_sets.sort();
        assert_eq!(a_sets, c_sets);

        assert_eq!(sorted_flat(&a), (0..500).collect::<Vec<_>>());

        for batch in a.batches() {
            let mut acc = BudgetAccumulator::new();
            for &idx in batch {
                acc.push(examples[idx].source_len(), examples[idx].target_len());
            }
            assert!(acc.cost() <= 30 || batch.len() == 1);
        }
    }

    #[test]
    fn test_training_without_shuffle_keeps_chunk_order() {
        let examples = corpus(200);
        let p = planner(
            PipelineOptions::training()
                .with_shuffle(false)
                .with_token_budget(20)
                .with_chunk_factor(2),
        );
        assert!(!p.shuffles());

        let mut rng = StdRng::seed_from_u64(0);
        let plan = p.plan(&examples, length_sort_key, &mut rng);

        let expected: Vec<Vec<usize>> = p
            .sorted_chunks(&examples, length_sort_key)
            .iter()
            .flat_map(|order| split_by_budget(&examples, order, 20))
            .collect();
        assert_eq!(plan.into_batches(), expected);
    }

    #[test]
    fn test_custom_sort_key() {
        let examples = corpus(40);
        let p = planner(PipelineOptions::evaluation().with_token_budget(1000));

        let mut rng = StdRng::seed_from_u64(0);
        let plan = p.plan(
            &examples,
            |e: &Example| core::cmp::Reverse(e.target_len()),
            &mut rng,
        );
        let lens: Vec<usize> = plan
            .batches()
            .iter()
            .flatten()
            .map(|&idx| examples[idx].target_len())
            .collect();
        assert!(lens.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_empty_examples() {
        let p = planner(PipelineOptions::training());
        let mut rng = StdRng::seed_from_u64(0);
        let plan = p.plan(&[], length_sort_key, &mut rng);
        assert!(plan.is_empty());
        assert_eq!(plan.len(), 0);
    }
}
