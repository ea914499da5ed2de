//! TF-IDF fingerprints for tokenized strings.
//!
//! Weights follow the smoothed scheme `tf * (ln((1 + n) / (1 + df)) + 1)`
//! with raw term counts as `tf`, and every row is scaled to unit L2 norm, so
//! the dot product of two rows is their cosine similarity.

mod sparse;
mod vocabulary;

use itertools::Itertools;
use rayon::prelude::*;

pub use self::sparse::CsrMatrix;
pub use self::vocabulary::Vocabulary;

#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    vocabulary: Vocabulary,
    idf: Vec<f64>,
}

impl TfIdfVectorizer {
    /// Learns the vocabulary and document frequencies of `documents`.
    ///
    /// For two corpora pass the concatenation of both, so that they share
    /// one column layout and one set of IDF weights.
    pub fn fit(documents: &[Vec<String>]) -> Self {
        let vocabulary = Vocabulary::build(documents);
        let mut document_frequency = vec![0usize; vocabulary.len()];
        for tokens in documents {
            let columns = tokens
                .iter()
                .filter_map(|token| vocabulary.column(token))
                .sorted_unstable()
                .dedup();
            for col in columns {
                document_frequency[col] += 1;
            }
        }
        let n = documents.len() as f64;
        let idf = document_frequency
            .into_iter()
            .map(|df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();
        TfIdfVectorizer { vocabulary, idf }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Weighted, L2-normalized row for one document. Unknown tokens are ignored.
    pub fn transform_one(&self, tokens: &[String]) -> Vec<(usize, f64)> {
        let mut row: Vec<(usize, f64)> = tokens
            .iter()
            .filter_map(|token| self.vocabulary.column(token))
            .sorted_unstable()
            .dedup_with_count()
            .map(|(count, col)| (col, count as f64 * self.idf[col]))
            .collect();
        let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in row.iter_mut() {
                *w /= norm;
            }
        }
        row
    }

    /// Builds the fingerprint matrix of `documents`, one row per document.
    pub fn transform(&self, documents: &[Vec<String>]) -> CsrMatrix {
        let rows: Vec<Vec<(usize, f64)>> = documents
            .par_iter()
            .map(|tokens| self.transform_one(tokens))
            .collect();
        let nnz = rows.iter().map(Vec::len).sum();
        let mut matrix = CsrMatrix::with_capacity(self.vocabulary.len(), rows.len(), nnz);
        for row in rows {
            matrix.push_row(row);
        }
        matrix
    }
}
