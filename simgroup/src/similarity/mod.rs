//! Restricted sparse matrix product.
//!
//! [`TopNSimilarity`] multiplies a left fingerprint matrix by the transpose of
//! a right one and keeps, for every left row, at most `top_n` products that
//! reach `lower_bound`. The dense `n_left x n_right` product is never built:
//! each row is accumulated over the right rows that share at least one
//! column with it, then pruned before it is stored.

use std::cmp::Ordering;
use std::ops::Range;

use rayon::prelude::*;
use tracing::debug;

use crate::tfidf::CsrMatrix;

/// Sums this close to 1.0 are products of identical unit rows and are
/// reported as exactly 1.0.
const UNIT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
pub struct TopNSimilarity {
    top_n: usize,
    lower_bound: f64,
    n_chunks: usize,
}

impl TopNSimilarity {
    pub fn new(top_n: usize, lower_bound: f64) -> Self {
        assert!(top_n > 0, "top_n must be positive");
        TopNSimilarity {
            top_n,
            lower_bound,
            n_chunks: 1,
        }
    }

    /// Splits the left rows into `n_chunks` blocks that are computed in parallel.
    pub fn with_chunks(mut self, n_chunks: usize) -> Self {
        self.n_chunks = n_chunks.max(1);
        self
    }

    /// `R[i, j] = left_i . right_j` for the retained pairs, absent otherwise.
    ///
    /// The result has `left.n_rows()` rows and `right.n_rows()` columns.
    /// Both matrices must share their column layout.
    pub fn compute(&self, left: &CsrMatrix, right: &CsrMatrix) -> CsrMatrix {
        assert_eq!(left.n_cols(), right.n_cols(), "fingerprints must share a vocabulary");
        let right_t = right.transpose();
        let n_rows = left.n_rows();
        let chunk_size = (n_rows + self.n_chunks - 1) / self.n_chunks.max(1);
        if n_rows == 0 || self.n_chunks == 1 {
            return self.compute_rows(left, &right_t, 0..n_rows);
        }
        let chunks: Vec<Range<usize>> = (0..n_rows)
            .step_by(chunk_size)
            .map(|start| start..(start + chunk_size).min(n_rows))
            .collect();
        let blocks: Vec<CsrMatrix> = chunks
            .into_par_iter()
            .map(|rows| self.compute_rows(left, &right_t, rows))
            .collect();
        CsrMatrix::vstack(right.n_rows(), blocks)
    }

    /// Computes one block of rows against the transposed right matrix.
    pub fn compute_rows(&self, left: &CsrMatrix, right_t: &CsrMatrix, rows: Range<usize>) -> CsrMatrix {
        debug!(start = rows.start, end = rows.end, "computing similarity block");
        let n_right = right_t.n_cols();
        let mut accumulator = RowAccumulator::new(n_right);
        let mut candidates: Vec<(usize, f64)> = Vec::new();
        let mut block = CsrMatrix::with_capacity(n_right, rows.len(), rows.len() * self.top_n.min(4));
        for row in rows {
            let (cols, values) = left.row(row);
            for (&col, &weight) in cols.iter().zip(values.iter()) {
                let (right_rows, right_values) = right_t.row(col);
                for (&j, &right_weight) in right_rows.iter().zip(right_values.iter()) {
                    accumulator.add(j, weight * right_weight);
                }
            }
            accumulator.drain_into(self.lower_bound, &mut candidates);
            self.keep_top_n(&mut candidates);
            block.push_row(candidates.drain(..));
        }
        block
    }

    /// Keeps the `top_n` highest similarities. Equal similarities are ranked
    /// by ascending column, so the lowest column wins a tie at the cut-off.
    /// Leaves the survivors sorted by column.
    fn keep_top_n(&self, candidates: &mut Vec<(usize, f64)>) {
        if candidates.len() > self.top_n {
            candidates.select_nth_unstable_by(self.top_n - 1, rank);
            candidates.truncate(self.top_n);
        }
        candidates.sort_unstable_by_key(|&(col, _)| col);
    }
}

#[inline]
fn rank(a: &(usize, f64), b: &(usize, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
}

/// Dense scratch row reused across the rows of a block.
struct RowAccumulator {
    sums: Vec<f64>,
    seen: Vec<bool>,
    touched: Vec<usize>,
}

impl RowAccumulator {
    fn new(width: usize) -> Self {
        RowAccumulator {
            sums: vec![0.0; width],
            seen: vec![false; width],
            touched: Vec::new(),
        }
    }

    #[inline]
    fn add(&mut self, col: usize, value: f64) {
        if !self.seen[col] {
            self.seen[col] = true;
            self.touched.push(col);
        }
        self.sums[col] += value;
    }

    /// Moves every sum `>= lower_bound` into `out` and resets the scratch row.
    /// Sums within `UNIT_TOLERANCE` of 1.0, or above it, become 1.0.
    fn drain_into(&mut self, lower_bound: f64, out: &mut Vec<(usize, f64)>) {
        for col in self.touched.drain(..) {
            let sum = self.sums[col];
            let similarity = if sum >= 1.0 - UNIT_TOLERANCE { 1.0 } else { sum };
            if similarity >= lower_bound {
                out.push((col, similarity));
            }
            self.sums[col] = 0.0;
            self.seen[col] = false;
        }
    }
}
