use ahash::AHashMap;
use itertools::Itertools;

/// Maps each distinct n-gram to a matrix column.
///
/// Columns are assigned in lexicographic order of the n-grams, so the same
/// token set always produces the same column layout.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    columns: AHashMap<String, usize>,
}

impl Vocabulary {
    /// Builds the vocabulary over every token of every document.
    pub fn build<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = &'a Vec<String>>,
    {
        let columns = documents
            .into_iter()
            .flatten()
            .map(String::as_str)
            .sorted_unstable()
            .dedup()
            .enumerate()
            .map(|(col, term)| (term.to_owned(), col))
            .collect();
        Vocabulary { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, term: &str) -> Option<usize> {
        self.columns.get(term).copied()
    }
}
