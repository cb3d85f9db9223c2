//! # Epoch Driver
//!
//! Each call to [`EpochDriver::epoch`] re-plans the corpus and returns a
//! lazy, finite, one-shot [`BatchIter`]. Training epochs are reshuffled
//! from the driver's seeded RNG; evaluation epochs are identical.

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    batching::{BatchIter, BatchPlanner, split_by_budget},
    corpus::{Corpus, Example, length_sort_key},
    errors::PCResult,
    options::PipelineOptions,
    types::TokenType,
};

/// A batching sort key function.
pub type SortKeyFn = fn(&Example) -> (usize, usize);

/// Produces the batch sequence of each epoch over a [`Corpus`].
#[derive(Debug, Clone)]
pub struct EpochDriver<T: TokenType> {
    corpus: Corpus<T>,
    options: PipelineOptions,
    planner: BatchPlanner,
    sort_key: SortKeyFn,
    rng: StdRng,
    epochs_started: usize,
}

impl<T: TokenType> EpochDriver<T> {
    /// Create a driver.
    ///
    /// The RNG is seeded from `options.seed`, or from the OS when unset.
    pub fn new(
        corpus: Corpus<T>,
        options: PipelineOptions,
    ) -> PCResult<Self> {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(corpus, options, rng)
    }

    /// Create a driver with a caller-supplied RNG.
    pub fn with_rng(
        corpus: Corpus<T>,
        options: PipelineOptions,
        rng: StdRng,
    ) -> PCResult<Self> {
        let planner = BatchPlanner::from_options(&options)?;
        Ok(Self {
            corpus,
            options,
            planner,
            sort_key: length_sort_key,
            rng,
            epochs_started: 0,
        })
    }

    /// Replace the sort key.
    pub fn with_sort_key(
        self,
        sort_key: SortKeyFn,
    ) -> Self {
        Self { sort_key, ..self }
    }

    /// The corpus.
    pub fn corpus(&self) -> &Corpus<T> {
        &self.corpus
    }

    /// The options.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// The number of epochs started so far.
    pub fn epochs_started(&self) -> usize {
        self.epochs_started
    }

    /// The number of batches (steps) per epoch.
    ///
    /// Shuffling permutes batches without changing them,
    /// so this is the same for every epoch.
    pub fn num_batches(&self) -> usize {
        let examples = self.corpus.examples();
        self.planner
            .sorted_chunks(examples, self.sort_key)
            .iter()
            .map(|order| split_by_budget(examples, order, self.planner.token_budget()).len())
            .sum()
    }

    /// Start a new epoch.
    pub fn epoch(&mut self) -> BatchIter<'_, T> {
        self.epochs_started += 1;

        let examples = self.corpus.examples();
        let plan = self.planner.plan(examples, self.sort_key, &mut self.rng);
        log::debug!("epoch {}: {} batches", self.epochs_started, plan.len());

        BatchIter::new(
            examples,
            self.corpus.source_vocab(),
            self.corpus.target_vocab(),
            plan,
        )
    }

    /// Run `f` over each of the configured number of epochs.
    ///
    /// ## Arguments
    /// * `f` - called with the 0-based epoch index and the epoch's batches.
    pub fn for_each_epoch<F>(
        &mut self,
        mut f: F,
    ) where
        F: FnMut(usize, BatchIter<'_, T>),
    {
        for idx in 0..self.options.epochs {
            f(idx, self.epoch());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{batching::Batch, corpus::CorpusLoader, normalize::SplitNormalizer};

    fn corpus() -> Corpus<u32> {
        let data: String = (0..300)
            .map(|i| {
                format!(
                    "{{\"listen\": \"{}\", \"reply\": \"{}\"}}\n",
                    vec!["w"; (i * 7) % 13].join(" "),
                    vec!["r"; (i * 3) % 9].join(" ")
                )
            })
            .collect();

        CorpusLoader::default()
            .with_normalizer(SplitNormalizer)
            .read_corpus(data.as_bytes())
            .unwrap()
    }

    fn indices(batches: &[Batch<u32>]) -> Vec<Vec<usize>> {
        batches.iter().map(|b| b.indices.clone()).collect()
    }

    #[test]
    fn test_training_epochs_are_seeded() {
        let options = PipelineOptions::training()
            .with_token_budget(40)
            .with_chunk_factor(2)
            .with_seed(42);

        let mut a = EpochDriver::new(corpus(), options.clone()).unwrap();
        let mut b = EpochDriver::new(corpus(), options.clone()).unwrap();

        let a1: Vec<Batch<u32>> = a.epoch().collect();
        let a2: Vec<Batch<u32>> = a.epoch().collect();
        let b1: Vec<Batch<u32>> = b.epoch().collect();
        let b2: Vec<Batch<u32>> = b.epoch().collect();

        assert_eq!(a1, b1);
        assert_eq!(a2, b2);
        assert_ne!(indices(&a1), indices(&a2));
        assert_eq!(a.epochs_started(), 2);

        assert_eq!(a1.len(), a.num_batches());
        assert_eq!(a2.len(), a.num_batches());

        let mut c = EpochDriver::new(corpus(), options.with_seed(43)).unwrap();
        let c1: Vec<Batch<u32>> = c.epoch().collect();
        let mut a_sets = indices(&a1);
        let mut c_sets = indices(&c1);
        assert_ne!(a_sets, c_sets);
        a_sets.sort();
        c_sets.sort();
        assert_eq!(a_sets, c_sets);
    }

    #[test]
    fn test_evaluation_epochs_are_identical() {
        let options = PipelineOptions::evaluation().with_token_budget(40);
        let mut driver = EpochDriver::new(corpus(), options).unwrap();

        let e1: Vec<Batch<u32>> = driver.epoch().collect();
        let e2: Vec<Batch<u32>> = driver.epoch().collect();
        assert_eq!(e1, e2);
        assert_eq!(e1.len(), driver.num_batches());

        let total: usize = e1.iter().map(Batch::len).sum();
        assert_eq!(total, driver.corpus().len());

        for batch in &e1 {
            assert!(batch.budget_cost() <= 40 || batch.len() == 1);
        }
    }

    #[test]
    fn test_partial_epoch_has_no_side_effects() {
        let options = PipelineOptions::evaluation().with_token_budget(40);
        let mut driver = EpochDriver::new(corpus(), options).unwrap();

        let first = driver.epoch().next();
        let full: Vec<Batch<u32>> = driver.epoch().collect();
        assert_eq!(first.as_ref(), full.first());
    }

    #[test]
    fn test_for_each_epoch() {
        let options = PipelineOptions::training()
            .with_token_budget(40)
            .with_epochs(3)
            .with_seed(1);
        let mut driver = EpochDriver::new(corpus(), options).unwrap();
        let steps = driver.num_batches();

        let mut seen = Vec::new();
        driver.for_each_epoch(|idx, batches| {
            seen.push((idx, batches.count()));
        });
        assert_eq!(seen, vec![(0, steps), (1, steps), (2, steps)]);
        assert_eq!(driver.epochs_started(), 3);
    }

    #[test]
    fn test_custom_sort_key() {
        fn by_target(example: &Example) -> (usize, usize) {
            (example.target_len(), example.source_len())
        }

        let options = PipelineOptions::evaluation().with_token_budget(1000);
        let mut driver = EpochDriver::new(corpus(), options)
            .unwrap()
            .with_sort_key(by_target);

        let batches: Vec<Batch<u32>> = driver.epoch().collect();
        let keys: Vec<(usize, usize)> = batches
            .iter()
            .flat_map(|b| b.indices.clone())
            .map(|idx| by_target(&driver.corpus().examples()[idx]))
            .collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_invalid_options() {
        let options = PipelineOptions::default().with_token_budget(0);
        assert!(EpochDriver::new(corpus(), options).is_err());
    }
}
