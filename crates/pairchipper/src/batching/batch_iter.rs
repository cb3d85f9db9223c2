//! # Lazy Batch Iteration

use core::iter::FusedIterator;

use rand::Rng;

use crate::{
    batching::{Batch, BatchPlan, BatchPlanner, PaddedGrid},
    corpus::Example,
    errors::PCResult,
    options::PipelineOptions,
    types::TokenType,
    vocab::Vocabulary,
};

/// Lazily materializes the [`Batch`]es of a [`BatchPlan`].
///
/// Each advance encodes and pads one planned mini-batch;
/// the iterator is exhausted when the plan is.
#[derive(Debug, Clone)]
pub struct BatchIter<'a, T: TokenType> {
    examples: &'a [Example],
    source_vocab: &'a Vocabulary<T>,
    target_vocab: &'a Vocabulary<T>,
    plan: BatchPlan,
    cursor: usize,
}

impl<'a, T: TokenType> BatchIter<'a, T> {
    /// Create an iterator over a plan.
    pub fn new(
        examples: &'a [Example],
        source_vocab: &'a Vocabulary<T>,
        target_vocab: &'a Vocabulary<T>,
        plan: BatchPlan,
    ) -> Self {
        Self {
            examples,
            source_vocab,
            target_vocab,
            plan,
            cursor: 0,
        }
    }

    /// The plan being materialized.
    pub fn plan(&self) -> &BatchPlan {
        &self.plan
    }

    /// Materialize one mini-batch.
    ///
    /// Only target rows carry sequence markers; source rows are the bare
    /// token ids, even when the source vocabulary defines markers.
    pub fn materialize(
        &self,
        indices: &[usize],
    ) -> Batch<T> {
        let mut source_rows = Vec::with_capacity(indices.len());
        let mut target_rows = Vec::with_capacity(indices.len());
        let mut source_unknowns = 0;
        let mut target_unknowns = 0;

        for &idx in indices {
            let example = &self.examples[idx];

            let (ids, unknowns) = self.source_vocab.encode_counting(&example.source);
            source_rows.push(ids);
            source_unknowns += unknowns;

            let (ids, unknowns) = self.target_vocab.encode_with_markers(&example.target);
            target_rows.push(ids);
            target_unknowns += unknowns;
        }

        Batch {
            indices: indices.to_vec(),
            source: PaddedGrid::from_rows(source_rows, self.source_vocab.pad_id()),
            target: PaddedGrid::from_rows(target_rows, self.target_vocab.pad_id()),
            target_markers: self.target_vocab.marker_len(),
            source_unknowns,
            target_unknowns,
        }
    }
}

impl<T: TokenType> Iterator for BatchIter<'_, T> {
    type Item = Batch<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let indices = self.plan.batches().get(self.cursor)?;
        let batch = self.materialize(indices);
        self.cursor += 1;
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.plan.len() - self.cursor;
        (remaining, Some(remaining))
    }
}

impl<T: TokenType> ExactSizeIterator for BatchIter<'_, T> {}

impl<T: TokenType> FusedIterator for BatchIter<'_, T> {}

/// Plan and lazily produce the batches of one pass over `examples`.
///
/// ## Arguments
/// * `examples` - the examples to batch.
/// * `source_vocab` / `target_vocab` - the frozen vocabularies.
/// * `options` - token budget, mode, and shuffle flag.
/// * `sort_key` - the length clustering key;
///   see [`crate::corpus::length_sort_key`].
/// * `rng` - the shuffle source.
///
/// ## Returns
/// An error only for unusable `options`.
pub fn make_batches<'a, T, K, F, R>(
    examples: &'a [Example],
    source_vocab: &'a Vocabulary<T>,
    target_vocab: &'a Vocabulary<T>,
    options: &PipelineOptions,
    sort_key: F,
    rng: &mut R,
) -> PCResult<BatchIter<'a, T>>
where
    T: TokenType,
    K: Ord,
    F: Fn(&Example) -> K,
    R: Rng + ?Sized,
{
    let plan = BatchPlanner::from_options(options)?.plan(examples, sort_key, rng);
    Ok(BatchIter::new(examples, source_vocab, target_vocab, plan))
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        corpus::{Corpus, CorpusLoader, SideConfig, length_sort_key},
        normalize::SplitNormalizer,
        vocab::SpecialTokens,
    };

    fn load(data: &str) -> Corpus<u32> {
        CorpusLoader::default()
            .with_normalizer(SplitNormalizer)
            .read_corpus(data.as_bytes())
            .unwrap()
    }

    const DATA: &str = r#"{"listen": "a b c", "reply": "x"}
{"listen": "a", "reply": "x y z w"}
{"listen": "", "reply": "y"}
{"listen": "b c", "reply": "z z"}
{"listen": "c c c c c", "reply": "w"}
"#;

    #[test]
    fn test_evaluation_batches() {
        let corpus = load(DATA);
        let options = PipelineOptions::evaluation().with_token_budget(12);
        let mut rng = StdRng::seed_from_u64(0);

        let iter = make_batches(
            corpus.examples(),
            corpus.source_vocab(),
            corpus.target_vocab(),
            &options,
            length_sort_key,
            &mut rng,
        )
        .unwrap();
        assert_eq!(iter.len(), iter.plan().len());

        let batches: Vec<Batch<u32>> = iter.collect();

        // Sorted by (source_len, target_len): 2, 1, 3, 0, 4.
        let order: Vec<usize> = batches.iter().flat_map(|b| b.indices.clone()).collect();
        assert_eq!(order, vec![2, 1, 3, 0, 4]);

        for batch in &batches {
            assert!(batch.budget_cost() <= 12 || batch.len() == 1);
            assert_eq!(batch.source.rows(), batch.len());
            assert_eq!(batch.target.rows(), batch.len());
        }

        // The empty-source example batches fine.
        let first = &batches[0];
        assert_eq!(first.indices[0], 2);
        assert_eq!(first.source.lengths()[0], 0);
    }

    #[test]
    fn test_materialize_pads_and_marks() {
        let corpus = load(DATA);
        let source_vocab = corpus.source_vocab();
        let target_vocab = corpus.target_vocab();
        let iter = BatchIter::new(
            corpus.examples(),
            source_vocab,
            target_vocab,
            BatchPlan::default(),
        );

        let batch = iter.materialize(&[0, 1]);
        assert_eq!(batch.source.width(), 3);
        assert_eq!(batch.target.width(), 4 + 2);
        assert_eq!(batch.target_markers, 2);

        let sos = target_vocab.sos_id().unwrap();
        let eos = target_vocab.eos_id().unwrap();
        let x = target_vocab.lookup_token("x").unwrap();
        assert_eq!(batch.target.row(0), &[sos, x, eos, 0, 0, 0]);

        let a = source_vocab.lookup_token("a").unwrap();
        assert_eq!(batch.source.row(1), &[a, 0, 0]);
        assert_eq!(source_vocab.decode(&batch.source.row(0)[..3]).unwrap(), vec!["a", "b", "c"]);

        assert_eq!(batch.source_unknowns, 0);
        assert_eq!(batch.target_unknowns, 0);
        // 2 * max(3, 4 + 2)
        assert_eq!(batch.budget_cost(), 12);
    }

    #[test]
    fn test_source_markers_stay_out_of_grid() {
        let loader = CorpusLoader::default()
            .with_normalizer(SplitNormalizer)
            .with_source(SideConfig::source().with_specials(SpecialTokens::target()));
        let corpus: Corpus<u32> = loader
            .read_corpus(
                r#"{"listen": "a b c d", "reply": "x"}
{"listen": "d c b a", "reply": "y"}
"#
                .as_bytes(),
            )
            .unwrap();
        assert_eq!(corpus.source_vocab().marker_len(), 2);

        let mut rng = StdRng::seed_from_u64(0);
        let batches: Vec<Batch<u32>> = make_batches(
            corpus.examples(),
            corpus.source_vocab(),
            corpus.target_vocab(),
            &PipelineOptions::evaluation().with_token_budget(8),
            length_sort_key,
            &mut rng,
        )
        .unwrap()
        .collect();

        // 2 * max(4, 1 + 2)
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].source.width(), 4);
        assert_eq!(batches[0].budget_cost(), 8);
        assert_eq!(
            corpus.source_vocab().decode(batches[0].source.row(0)).unwrap(),
            vec!["a", "b", "c", "d"]
        );
    }

    #[test]
    fn test_unknowns_are_counted() {
        let train = load(DATA);
        let test = CorpusLoader::default()
            .with_normalizer(SplitNormalizer)
            .read_corpus_with_vocabs(
                r#"{"listen": "a q", "reply": "x q q"}"#.as_bytes(),
                train.source_vocab().clone(),
                train.target_vocab().clone(),
            )
            .unwrap();

        let mut rng = StdRng::seed_from_u64(0);
        let batches: Vec<Batch<u32>> = make_batches(
            test.examples(),
            test.source_vocab(),
            test.target_vocab(),
            &PipelineOptions::evaluation(),
            length_sort_key,
            &mut rng,
        )
        .unwrap()
        .collect();

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].source_unknowns, 1);
        assert_eq!(batches[0].target_unknowns, 2);
        assert_eq!(
            batches[0].target.row(0)[2],
            test.target_vocab().unk_id()
        );
    }

    #[test]
    fn test_exhaustion() {
        let corpus = load(DATA);
        let mut rng = StdRng::seed_from_u64(0);
        let mut iter = make_batches(
            corpus.examples(),
            corpus.source_vocab(),
            corpus.target_vocab(),
            &PipelineOptions::training().with_token_budget(1),
            length_sort_key,
            &mut rng,
        )
        .unwrap();

        // Every example exceeds a budget of 1; each is its own batch.
        assert_eq!(iter.len(), 5);
        for _ in 0..5 {
            assert_eq!(iter.next().map(|b| b.len()), Some(1));
        }
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
        assert_eq!(iter.size_hint(), (0, Some(0)));
    }
}
