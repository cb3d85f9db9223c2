//! # Padded Batches

use serde::Serialize;

use crate::{batching::token_budget::TARGET_MARKER_SLOTS, types::TokenType};

/// A right-padded, row-major grid of token ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaddedGrid<T: TokenType> {
    ids: Vec<T>,
    rows: usize,
    width: usize,
    lengths: Vec<usize>,
}

impl<T: TokenType> PaddedGrid<T> {
    /// Pad `rows` to their common max length with `pad`.
    pub fn from_rows(
        rows: Vec<Vec<T>>,
        pad: T,
    ) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or_default();
        let lengths: Vec<usize> = rows.iter().map(Vec::len).collect();

        let mut ids = Vec::with_capacity(rows.len() * width);
        for row in &rows {
            ids.extend_from_slice(row);
            ids.resize(ids.len() + (width - row.len()), pad);
        }

        Self {
            ids,
            rows: rows.len(),
            width,
            lengths,
        }
    }

    /// The number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The padded row width; the batch-local max length.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The unpadded length of each row.
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// The flat row-major id buffer, ``rows * width`` long.
    pub fn as_slice(&self) -> &[T] {
        &self.ids
    }

    /// A padded row.
    ///
    /// ## Panics
    /// If `row >= self.rows()`.
    pub fn row(
        &self,
        row: usize,
    ) -> &[T] {
        let start = row * self.width;
        &self.ids[start..start + self.width]
    }

    /// Iterate over the padded rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        (0..self.rows).map(|r| self.row(r))
    }

    /// Copy out the padded rows.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.iter_rows().map(<[T]>::to_vec).collect()
    }

    /// The number of non-pad cells.
    pub fn real_tokens(&self) -> usize {
        self.lengths.iter().sum()
    }

    /// The number of cells, ``rows * width``.
    pub fn cells(&self) -> usize {
        self.rows * self.width
    }
}

/// One materialized mini-batch.
///
/// The target grid includes the sequence markers when the target
/// vocabulary defines them; the source grid never does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Batch<T: TokenType> {
    /// Indices of the batch's examples in the source corpus, in row order.
    pub indices: Vec<usize>,

    /// The padded source ids.
    pub source: PaddedGrid<T>,

    /// The padded target ids.
    pub target: PaddedGrid<T>,

    /// Marker slots included in each target row.
    pub target_markers: usize,

    /// Source tokens replaced by the unknown id.
    pub source_unknowns: usize,

    /// Target tokens replaced by the unknown id.
    pub target_unknowns: usize,
}

impl<T: TokenType> Batch<T> {
    /// The number of examples (rows).
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Is the batch empty?
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The padded source length.
    pub fn source_len(&self) -> usize {
        self.source.width()
    }

    /// The padded target length, markers included.
    pub fn target_len(&self) -> usize {
        self.target.width()
    }

    /// The batch's cost under the token-budget rule.
    ///
    /// ``rows * max(source_len, target_tokens + TARGET_MARKER_SLOTS)``,
    /// where `target_tokens` is the padded target length without markers.
    pub fn budget_cost(&self) -> usize {
        let target_tokens = self.target.width().saturating_sub(self.target_markers);
        self.len() * self.source.width().max(target_tokens + TARGET_MARKER_SLOTS)
    }

    /// The fraction of grid cells holding real tokens, over both sides.
    pub fn padding_efficiency(&self) -> f64 {
        let cells = self.source.cells() + self.target.cells();
        if cells == 0 {
            return 1.0;
        }
        (self.source.real_tokens() + self.target.real_tokens()) as f64 / cells as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_grid() {
        type T = u32;
        let grid: PaddedGrid<T> = PaddedGrid::from_rows(vec![vec![5, 6, 7], vec![8], vec![]], 0);

        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.lengths(), &[3, 1, 0]);
        assert_eq!(grid.as_slice(), &[5, 6, 7, 8, 0, 0, 0, 0, 0]);
        assert_eq!(grid.row(1), &[8, 0, 0]);
        assert_eq!(
            grid.to_rows(),
            vec![vec![5, 6, 7], vec![8, 0, 0], vec![0, 0, 0]]
        );
        assert_eq!(grid.real_tokens(), 4);
        assert_eq!(grid.cells(), 9);
    }

    #[test]
    fn test_empty_grid() {
        let grid: PaddedGrid<u16> = PaddedGrid::from_rows(vec![vec![], vec![]], 0);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.width(), 0);
        assert!(grid.as_slice().is_empty());
        assert_eq!(grid.iter_rows().count(), 2);
    }

    #[test]
    fn test_batch_cost() {
        type T = u32;
        let batch: Batch<T> = Batch {
            indices: vec![4, 9],
            source: PaddedGrid::from_rows(vec![vec![5, 6, 7], vec![8]], 0),
            target: PaddedGrid::from_rows(vec![vec![2, 4, 3], vec![2, 4, 5, 6, 3]], 0),
            target_markers: 2,
            source_unknowns: 0,
            target_unknowns: 1,
        };

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.source_len(), 3);
        assert_eq!(batch.target_len(), 5);
        // 2 * max(3, 3 + 2)
        assert_eq!(batch.budget_cost(), 10);
        // (4 + 8) / (6 + 10)
        assert!((batch.padding_efficiency() - 0.75).abs() < 1e-9);
    }
}
