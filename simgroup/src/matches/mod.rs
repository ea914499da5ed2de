mod store;

use crate::tfidf::CsrMatrix;

pub use self::store::MatchStore;

/// One explicit match between a left position and a right position.
///
/// In single-corpus mode both indices address the same corpus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchRecord {
    pub left: usize,
    pub right: usize,
    pub similarity: f64,
}

impl MatchRecord {
    pub fn new(left: usize, right: usize, similarity: f64) -> Self {
        MatchRecord {
            left,
            right,
            similarity,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.left == self.right
    }
}

/// Whether the right side is a second corpus or the left corpus matched against itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    SingleCorpus,
    TwoCorpora,
}

/// Turns the sparse similarity matrix into match records ordered by
/// `(left, right)`.
///
/// In single-corpus mode the diagonal is dropped, identity pairs are implicit,
/// and every pair is mirrored: `(i, j, s)` implies `(j, i, s)` even when `i`
/// only made the top-n cut of `j` and not the other way round.
pub fn reduce_matches(similarities: &CsrMatrix, mode: MatchMode) -> Vec<MatchRecord> {
    match mode {
        MatchMode::TwoCorpora => similarities
            .iter()
            .map(|(left, right, similarity)| MatchRecord::new(left, right, similarity))
            .collect(),
        MatchMode::SingleCorpus => {
            let mut store = MatchStore::new(mode);
            for (left, right, similarity) in similarities.iter() {
                if left != right {
                    store.insert(left, right, similarity);
                }
            }
            store.records().collect()
        }
    }
}
