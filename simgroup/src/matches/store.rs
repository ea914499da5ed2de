use std::collections::BTreeMap;

use crate::matches::{MatchMode, MatchRecord};

/// The live, editable set of match records.
///
/// Records are keyed by `(left, right)`, so a pair is stored at most once and
/// iteration is always ordered by left index, then right index. In
/// single-corpus mode every write is mirrored and identity pairs are never
/// stored.
///
/// Not synchronized: a store has a single writer.
#[derive(Debug, Clone)]
pub struct MatchStore {
    mode: MatchMode,
    records: BTreeMap<(usize, usize), f64>,
}

impl MatchStore {
    pub fn new(mode: MatchMode) -> Self {
        MatchStore {
            mode,
            records: BTreeMap::new(),
        }
    }

    pub fn from_records<I>(mode: MatchMode, records: I) -> Self
    where
        I: IntoIterator<Item = MatchRecord>,
    {
        let mut store = MatchStore::new(mode);
        for record in records {
            store.insert(record.left, record.right, record.similarity);
        }
        store
    }

    /// Writes a record and, in single-corpus mode, its mirror.
    /// Existing records for the pair are overwritten.
    ///
    /// Returns how many records did not exist before.
    pub fn insert(&mut self, left: usize, right: usize, similarity: f64) -> usize {
        match self.mode {
            MatchMode::TwoCorpora => self.insert_one(left, right, similarity),
            MatchMode::SingleCorpus if left == right => 0,
            MatchMode::SingleCorpus => {
                self.insert_one(left, right, similarity) + self.insert_one(right, left, similarity)
            }
        }
    }

    fn insert_one(&mut self, left: usize, right: usize, similarity: f64) -> usize {
        self.records.insert((left, right), similarity).is_none() as usize
    }

    /// Deletes a record and, in single-corpus mode, its mirror.
    ///
    /// Returns how many records were deleted.
    pub fn remove(&mut self, left: usize, right: usize) -> usize {
        let removed = self.records.remove(&(left, right)).is_some() as usize;
        match self.mode {
            MatchMode::SingleCorpus if left != right => {
                removed + self.records.remove(&(right, left)).is_some() as usize
            }
            _ => removed,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = MatchRecord> + '_ {
        self.records
            .iter()
            .map(|(&(left, right), &similarity)| MatchRecord::new(left, right, similarity))
    }
}
