use std::sync::Arc;

use itertools::Itertools;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::clustering::{connected_components, nearest_masters, Representative};
use crate::config::GrouperConfig;
use crate::corpus::{Corpus, Occurrences};
use crate::errors::{GrouperError, Result, Side};
use crate::matches::{reduce_matches, MatchMode, MatchRecord, MatchStore};
use crate::similarity::TopNSimilarity;
use crate::text::{NGramTokenizer, Normalizer};
use crate::tfidf::{CsrMatrix, TfIdfVectorizer};

/// One row of the match table, resolved to the matched strings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
    pub left: &'a str,
    pub right: &'a str,
    pub similarity: f64,
}

#[derive(Debug, Clone)]
enum FitState {
    NotFit,
    Fit(MatchStore),
}

/// Groups near-duplicate strings of one corpus, or matches the strings of a
/// duplicates corpus (right) against a master corpus (left).
///
/// A new grouper is not fit. [`fit`](StringGrouper::fit) vectorizes both
/// corpora and computes the match records; only then can matches and groups
/// be read or edited. Fitting again starts over and drops manual edits.
///
/// ```
/// use simgroup::{Corpus, StringGrouper};
///
/// let corpus = Corpus::new(["foooo", "bar", "baz", "foooob", "bar", "fooooc"]);
/// let grouper = StringGrouper::new(corpus).fitted().unwrap();
/// assert_eq!(
///     grouper.groups().unwrap(),
///     vec!["foooo", "bar", "baz", "foooo", "bar", "foooo"]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct StringGrouper {
    config: GrouperConfig,
    tokenizer: NGramTokenizer,
    left: Corpus,
    right: Option<Corpus>,
    state: FitState,
}

impl StringGrouper {
    /// Single-corpus grouper with the default configuration.
    pub fn new(corpus: Corpus) -> Self {
        Self::with_config(corpus, None, GrouperConfig::default())
    }

    /// Matches `duplicates` against `master` with the default configuration.
    pub fn with_duplicates(master: Corpus, duplicates: Corpus) -> Self {
        Self::with_config(master, Some(duplicates), GrouperConfig::default())
    }

    pub fn with_config(left: Corpus, right: Option<Corpus>, config: GrouperConfig) -> Self {
        let tokenizer = NGramTokenizer::with_pattern(config.ngram_size(), config.pattern().clone());
        StringGrouper {
            config,
            tokenizer,
            left,
            right,
            state: FitState::NotFit,
        }
    }

    /// Builds a grouper from values that may be missing. Fails on the first
    /// missing value of either side.
    pub fn from_optional<L, R, S>(left: L, right: Option<R>, config: GrouperConfig) -> Result<Self>
    where
        L: IntoIterator<Item = Option<S>>,
        R: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let left = Corpus::from_optional_side(left, Side::Left)?;
        let right = match right {
            Some(right) => Some(Corpus::from_optional_side(right, Side::Right)?),
            None => None,
        };
        Ok(Self::with_config(left, right, config))
    }

    /// Replaces the normalization applied before n-gram extraction.
    /// The grouper returns to the not-fit state.
    pub fn with_normalizer(mut self, normalizer: Arc<dyn Normalizer>) -> Self {
        self.tokenizer = NGramTokenizer::new(self.config.ngram_size(), normalizer);
        self.state = FitState::NotFit;
        self
    }

    pub fn config(&self) -> &GrouperConfig {
        &self.config
    }

    pub fn left(&self) -> &Corpus {
        &self.left
    }

    pub fn right(&self) -> Option<&Corpus> {
        self.right.as_ref()
    }

    pub fn mode(&self) -> MatchMode {
        match self.right {
            Some(_) => MatchMode::TwoCorpora,
            None => MatchMode::SingleCorpus,
        }
    }

    pub fn is_fit(&self) -> bool {
        matches!(self.state, FitState::Fit(_))
    }

    /// The n-grams a string is reduced to.
    pub fn n_grams(&self, text: &str) -> Vec<String> {
        self.tokenizer.tokenize(text)
    }

    /// TF-IDF fingerprints of the left and right corpora over a shared
    /// vocabulary. In single-corpus mode both matrices are the same.
    pub fn tf_idf_matrices(&self) -> (CsrMatrix, CsrMatrix) {
        let left_tokens = self.tokenize(&self.left);
        match &self.right {
            None => {
                let vectorizer = TfIdfVectorizer::fit(&left_tokens);
                debug!(vocabulary = vectorizer.vocabulary().len(), "built vocabulary");
                let left = vectorizer.transform(&left_tokens);
                (left.clone(), left)
            }
            Some(right) => {
                let right_tokens = self.tokenize(right);
                let joint: Vec<Vec<String>> = left_tokens.iter().chain(right_tokens.iter()).cloned().collect();
                let vectorizer = TfIdfVectorizer::fit(&joint);
                debug!(vocabulary = vectorizer.vocabulary().len(), "built vocabulary");
                (vectorizer.transform(&left_tokens), vectorizer.transform(&right_tokens))
            }
        }
    }

    fn tokenize(&self, corpus: &Corpus) -> Vec<Vec<String>> {
        corpus
            .as_slice()
            .par_iter()
            .map(|text| self.tokenizer.tokenize(text))
            .collect()
    }

    /// Runs vectorization, the top-n similarity product and match reduction.
    pub fn fit(&mut self) -> Result<&mut Self> {
        info!(
            left = self.left.len(),
            right = self.right.as_ref().map_or(0, Corpus::len),
            workers = self.config.number_of_workers(),
            "fitting string grouper"
        );
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.number_of_workers())
            .build()?;
        let store = pool.install(|| self.build_matches());
        info!(matches = store.len(), "string grouper fit");
        self.state = FitState::Fit(store);
        Ok(self)
    }

    /// Consuming variant of [`fit`](StringGrouper::fit).
    pub fn fitted(mut self) -> Result<Self> {
        self.fit()?;
        Ok(self)
    }

    fn build_matches(&self) -> MatchStore {
        let (left, right) = self.tf_idf_matrices();
        let engine = TopNSimilarity::new(self.config.max_n_matches(), self.config.min_similarity())
            .with_chunks(self.config.number_of_workers());
        let similarities = engine.compute(&left, &right);
        let mode = self.mode();
        MatchStore::from_records(mode, reduce_matches(&similarities, mode))
    }

    fn store(&self) -> Result<&MatchStore> {
        match &self.state {
            FitState::Fit(store) => Ok(store),
            FitState::NotFit => Err(GrouperError::NotFit),
        }
    }

    fn store_mut(&mut self) -> Result<&mut MatchStore> {
        match &mut self.state {
            FitState::Fit(store) => Ok(store),
            FitState::NotFit => Err(GrouperError::NotFit),
        }
    }

    fn right_side(&self) -> (&Corpus, Side) {
        match &self.right {
            Some(right) => (right, Side::Right),
            None => (&self.left, Side::Left),
        }
    }

    /// The explicit match records ordered by `(left, right)`. Identity pairs
    /// of single-corpus mode are implicit and not included.
    pub fn match_records(&self) -> Result<Vec<MatchRecord>> {
        Ok(self.store()?.records().collect())
    }

    /// The match table with strings in place of indices.
    pub fn matches(&self) -> Result<Vec<Match<'_>>> {
        let records = self.store()?.records();
        Ok(records.map(|record| self.resolve_match(record)).collect())
    }

    /// Like [`matches`](StringGrouper::matches), but in single-corpus mode
    /// every position also matches itself with similarity 1.0.
    pub fn matches_with_identity(&self) -> Result<Vec<Match<'_>>> {
        let store = self.store()?;
        let identities = match self.mode() {
            MatchMode::SingleCorpus => 0..self.left.len(),
            MatchMode::TwoCorpora => 0..0,
        };
        Ok(store
            .records()
            .chain(identities.map(|i| MatchRecord::new(i, i, 1.0)))
            .sorted_by_key(|record| (record.left, record.right))
            .map(|record| self.resolve_match(record))
            .collect())
    }

    fn resolve_match(&self, record: MatchRecord) -> Match<'_> {
        let (right, _) = self.right_side();
        Match {
            left: &self.left[record.left],
            right: &right[record.right],
            similarity: record.similarity,
        }
    }

    /// Where each position's representative comes from.
    ///
    /// Single-corpus mode: one entry per left position, the lowest index of
    /// its connected component. Two-corpus mode: one entry per right
    /// position, its most similar master, or itself when nothing matched.
    pub fn representatives(&self) -> Result<Vec<Representative>> {
        let store = self.store()?;
        match &self.right {
            None => Ok(connected_components(self.left.len(), store.records())
                .into_iter()
                .map(Representative::Left)
                .collect()),
            Some(right) => Ok(nearest_masters(right.len(), store.records(), self.config.tie_break())
                .into_iter()
                .enumerate()
                .map(|(j, master)| master.map_or(Representative::Right(j), Representative::Left))
                .collect()),
        }
    }

    /// The representative string of every position, in corpus order.
    pub fn groups(&self) -> Result<Vec<&str>> {
        let (right, _) = self.right_side();
        Ok(self
            .representatives()?
            .into_iter()
            .map(|representative| match representative {
                Representative::Left(i) => &self.left[i],
                Representative::Right(j) => &right[j],
            })
            .collect())
    }

    fn operand_occurrences(&self, left_value: &str, right_value: &str) -> Result<(Occurrences, Occurrences)> {
        let lefts = self.left.occurrences(left_value);
        if lefts.is_empty() {
            return Err(GrouperError::StringNotFound {
                side: Side::Left,
                value: left_value.to_string(),
            });
        }
        let (right, side) = self.right_side();
        let rights = right.occurrences(right_value);
        if rights.is_empty() {
            return Err(GrouperError::StringNotFound {
                side,
                value: right_value.to_string(),
            });
        }
        Ok((lefts, rights))
    }

    /// Adds a match with similarity 1.0 between every occurrence of
    /// `left_value` in the left corpus and every occurrence of `right_value`
    /// in the right corpus (the left corpus again in single-corpus mode,
    /// where the mirrored records are added too).
    ///
    /// Returns the number of records that did not exist before.
    pub fn add_match(&mut self, left_value: &str, right_value: &str) -> Result<usize> {
        let (lefts, rights) = self.operand_occurrences(left_value, right_value)?;
        let store = self.store_mut()?;
        let added = lefts
            .iter()
            .cartesian_product(rights.iter())
            .map(|(&left, &right)| store.insert(left, right, 1.0))
            .sum::<usize>();
        debug!(left = left_value, right = right_value, added, "added match");
        Ok(added)
    }

    /// Removes the matches between every occurrence of the two values, in
    /// both directions in single-corpus mode.
    ///
    /// Returns the number of records removed.
    pub fn remove_match(&mut self, left_value: &str, right_value: &str) -> Result<usize> {
        let (lefts, rights) = self.operand_occurrences(left_value, right_value)?;
        let store = self.store_mut()?;
        let removed = lefts
            .iter()
            .cartesian_product(rights.iter())
            .map(|(&left, &right)| store.remove(left, right))
            .sum::<usize>();
        debug!(left = left_value, right = right_value, removed, "removed match");
        Ok(removed)
    }
}

fn corpus_of<S: AsRef<str>>(strings: &[S]) -> Corpus {
    strings.iter().map(|s| s.as_ref().to_owned()).collect()
}

/// Groups `strings` and returns the representative of each one.
pub fn group_similar_strings<S: AsRef<str>>(strings: &[S], config: GrouperConfig) -> Result<Vec<String>> {
    let corpus = corpus_of(strings);
    let grouper = StringGrouper::with_config(corpus, None, config).fitted()?;
    let groups = grouper.groups()?;
    Ok(groups.into_iter().map(str::to_owned).collect())
}

/// All matches between `master` and `duplicates`, or within `master` when
/// there are no duplicates, as `(left, right, similarity)`.
pub fn match_strings<S: AsRef<str>>(
    master: &[S],
    duplicates: Option<&[S]>,
    config: GrouperConfig,
) -> Result<Vec<(String, String, f64)>> {
    let left = corpus_of(master);
    let right = duplicates.map(corpus_of);
    let grouper = StringGrouper::with_config(left, right, config).fitted()?;
    let matches = grouper.matches()?;
    Ok(matches
        .into_iter()
        .map(|m| (m.left.to_owned(), m.right.to_owned(), m.similarity))
        .collect())
}

/// For every duplicate, the most similar master string, or the duplicate
/// itself when none is similar enough.
pub fn match_most_similar<S: AsRef<str>>(
    master: &[S],
    duplicates: &[S],
    config: GrouperConfig,
) -> Result<Vec<String>> {
    let left = corpus_of(master);
    let right = corpus_of(duplicates);
    let grouper = StringGrouper::with_config(left, Some(right), config).fitted()?;
    let groups = grouper.groups()?;
    Ok(groups.into_iter().map(str::to_owned).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(strings: &[&str]) -> Corpus {
        Corpus::new(strings.iter().copied())
    }

    fn pairs(matches: &[Match<'_>]) -> Vec<(String, String)> {
        matches
            .iter()
            .map(|m| (m.left.to_string(), m.right.to_string()))
            .collect()
    }

    fn count(matches: &[Match<'_>], left: &str, right: &str) -> usize {
        matches.iter().filter(|m| m.left == left && m.right == right).count()
    }

    #[test]
    fn test_n_grams() {
        let grouper = StringGrouper::new(corpus(&["aa"]));
        let expected = vec!["McD", "cDo", "Don", "ona", "nal", "ald", "lds"];
        assert_eq!(grouper.n_grams("McDonalds"), expected);
    }

    #[test]
    fn test_build_matrix() {
        let grouper = StringGrouper::new(corpus(&["foo", "bar", "baz"]));
        let (master, dupe) = grouper.tf_idf_matrices();
        let expected = vec![vec![0., 0., 1.], vec![1., 0., 0.], vec![0., 1., 0.]];
        assert_eq!(master.to_dense(), expected);
        assert_eq!(dupe.to_dense(), expected);
    }

    #[test]
    fn test_build_matrix_master_and_duplicates() {
        let grouper = StringGrouper::with_duplicates(
            corpus(&["foo", "bar", "baz"]),
            corpus(&["foo", "bar", "bop"]),
        );
        let (master, dupe) = grouper.tf_idf_matrices();
        assert_eq!(
            master.to_dense(),
            vec![vec![0., 0., 0., 1.], vec![1., 0., 0., 0.], vec![0., 1., 0., 0.]]
        );
        assert_eq!(
            dupe.to_dense(),
            vec![vec![0., 0., 0., 1.], vec![1., 0., 0., 0.], vec![0., 0., 1., 0.]]
        );
    }

    #[test]
    fn test_build_matches_list() {
        let grouper = StringGrouper::with_duplicates(
            corpus(&["foo", "bar", "baz"]),
            corpus(&["foo", "bar", "bop"]),
        )
        .fitted()
        .unwrap();
        assert_eq!(
            grouper.match_records().unwrap(),
            vec![MatchRecord::new(0, 0, 1.0), MatchRecord::new(1, 1, 1.0)]
        );
    }

    #[test]
    fn test_get_matches_two_corpora() {
        let grouper = StringGrouper::with_duplicates(
            corpus(&["foo", "bar", "baz"]),
            corpus(&["foo", "bar", "bop"]),
        )
        .fitted()
        .unwrap();
        assert_eq!(
            grouper.matches().unwrap(),
            vec![
                Match { left: "foo", right: "foo", similarity: 1.0 },
                Match { left: "bar", right: "bar", similarity: 1.0 },
            ]
        );
    }

    #[test]
    fn test_no_cross_matches_without_overlap() {
        let grouper = StringGrouper::new(corpus(&["foo", "bar", "baz"])).fitted().unwrap();
        assert!(grouper.matches().unwrap().is_empty());
        let with_identity = grouper.matches_with_identity().unwrap();
        assert_eq!(
            pairs(&with_identity),
            vec![
                ("foo".to_string(), "foo".to_string()),
                ("bar".to_string(), "bar".to_string()),
                ("baz".to_string(), "baz".to_string()),
            ]
        );
        assert!(with_identity.iter().all(|m| m.similarity == 1.0));
    }

    #[test]
    fn test_get_matches_single() {
        let grouper = StringGrouper::new(corpus(&["foo", "bar", "baz", "foo"])).fitted().unwrap();
        assert_eq!(
            grouper.match_records().unwrap(),
            vec![MatchRecord::new(0, 3, 1.0), MatchRecord::new(3, 0, 1.0)]
        );
        let with_identity = grouper.matches_with_identity().unwrap();
        let lefts: Vec<_> = with_identity.iter().map(|m| m.left).collect();
        let rights: Vec<_> = with_identity.iter().map(|m| m.right).collect();
        assert_eq!(lefts, vec!["foo", "foo", "bar", "baz", "foo", "foo"]);
        assert_eq!(rights, vec!["foo", "foo", "bar", "baz", "foo", "foo"]);
        assert!(with_identity.iter().all(|m| m.similarity == 1.0));
    }

    #[test]
    fn test_get_groups_single_corpus() {
        let grouper = StringGrouper::new(corpus(&["foooo", "bar", "baz", "foooob"])).fitted().unwrap();
        assert_eq!(grouper.groups().unwrap(), vec!["foooo", "bar", "baz", "foooo"]);

        let grouper = StringGrouper::new(corpus(&["foooo", "bar", "baz", "foooob", "bar", "fooooc"]))
            .fitted()
            .unwrap();
        assert_eq!(
            grouper.groups().unwrap(),
            vec!["foooo", "bar", "baz", "foooo", "bar", "foooo"]
        );
        assert_eq!(
            grouper.representatives().unwrap(),
            vec![0, 1, 2, 0, 1, 0].into_iter().map(Representative::Left).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_get_groups_two_corpora() {
        let grouper = StringGrouper::with_duplicates(
            corpus(&["foooo", "bar", "baz"]),
            corpus(&["foooo", "bar", "baz", "foooob"]),
        )
        .fitted()
        .unwrap();
        assert_eq!(grouper.groups().unwrap(), vec!["foooo", "bar", "baz", "foooo"]);
    }

    #[test]
    fn test_get_groups_two_corpora_same_similarity() {
        let grouper = StringGrouper::with_duplicates(
            corpus(&["foooo", "bar", "baz", "foooo"]),
            corpus(&["foooo", "bar", "baz", "foooob"]),
        )
        .fitted()
        .unwrap();
        assert_eq!(grouper.groups().unwrap(), vec!["foooo", "bar", "baz", "foooo"]);
        let representatives = grouper.representatives().unwrap();
        assert_eq!(representatives[0], Representative::Left(0));
        assert_eq!(representatives[3], Representative::Left(0));
    }

    #[test]
    fn test_get_groups_two_corpora_no_match() {
        let grouper = StringGrouper::with_duplicates(
            corpus(&["foooo", "bar", "baz"]),
            corpus(&["foooo", "dooz", "bar", "baz", "foooob"]),
        )
        .fitted()
        .unwrap();
        assert_eq!(
            grouper.groups().unwrap(),
            vec!["foooo", "dooz", "bar", "baz", "foooo"]
        );
        assert_eq!(grouper.representatives().unwrap()[1], Representative::Right(1));
    }

    #[test]
    fn test_get_groups_raises_not_fit() {
        let mut grouper = StringGrouper::with_duplicates(
            corpus(&["foooo", "bar", "baz", "foooo"]),
            corpus(&["foooo", "bar", "baz", "foooob"]),
        );
        assert!(!grouper.is_fit());
        assert!(matches!(grouper.groups(), Err(GrouperError::NotFit)));
        assert!(matches!(grouper.matches(), Err(GrouperError::NotFit)));
        assert!(matches!(grouper.add_match("foooo", "bar"), Err(GrouperError::NotFit)));
        assert!(matches!(grouper.remove_match("foooo", "bar"), Err(GrouperError::NotFit)));
    }

    #[test]
    fn test_add_match_raises_if_string_not_present() {
        let master = corpus(&["foooo", "no match", "baz", "foooo"]);
        let dupes = corpus(&["foooo", "bar", "baz", "foooob"]);
        let mut single = StringGrouper::new(master.clone()).fitted().unwrap();
        let mut two = StringGrouper::with_duplicates(master, dupes).fitted().unwrap();

        for grouper in [&mut single, &mut two] {
            match grouper.add_match("doesnt exist", "baz") {
                Err(GrouperError::StringNotFound { side, value }) => {
                    assert_eq!(side, Side::Left);
                    assert_eq!(value, "doesnt exist");
                }
                other => panic!("unexpected {:?}", other),
            }
            assert!(matches!(
                grouper.add_match("baz", "doesnt exist"),
                Err(GrouperError::StringNotFound { .. })
            ));
        }
        assert!(matches!(
            two.add_match("baz", "no match"),
            Err(GrouperError::StringNotFound { side: Side::Right, .. })
        ));
    }

    #[test]
    fn test_remove_match_raises_if_string_not_present() {
        let master = corpus(&["foooo", "no match", "baz", "foooo"]);
        let dupes = corpus(&["foooo", "bar", "baz", "foooob"]);
        let mut single = StringGrouper::new(master.clone()).fitted().unwrap();
        let mut two = StringGrouper::with_duplicates(master, dupes).fitted().unwrap();

        for (grouper, right_side) in [(&mut single, Side::Left), (&mut two, Side::Right)] {
            let before = grouper.match_records().unwrap();
            match grouper.remove_match("doesnt exist", "baz") {
                Err(GrouperError::StringNotFound { side, value }) => {
                    assert_eq!(side, Side::Left);
                    assert_eq!(value, "doesnt exist");
                }
                other => panic!("unexpected {:?}", other),
            }
            match grouper.remove_match("baz", "doesnt exist") {
                Err(GrouperError::StringNotFound { side, value }) => {
                    assert_eq!(side, right_side);
                    assert_eq!(value, "doesnt exist");
                }
                other => panic!("unexpected {:?}", other),
            }
            assert_eq!(grouper.match_records().unwrap(), before);
        }
        assert!(matches!(
            two.remove_match("baz", "no match"),
            Err(GrouperError::StringNotFound { side: Side::Right, .. })
        ));
    }

    #[test]
    fn test_add_match_single_occurrence() {
        let master = corpus(&["foooo", "no match", "baz", "foooo"]);
        let dupes = corpus(&["foooo", "bar", "baz", "foooob"]);

        let mut single = StringGrouper::new(master.clone()).fitted().unwrap();
        let before = single.match_records().unwrap();
        assert_eq!(single.add_match("no match", "baz").unwrap(), 2);
        let matches = single.matches().unwrap();
        assert_eq!(count(&matches, "no match", "baz"), 1);
        assert_eq!(count(&matches, "baz", "no match"), 1);
        assert_eq!(matches.len(), before.len() + 2);
        assert_eq!(single.groups().unwrap(), vec!["foooo", "no match", "no match", "foooo"]);

        let mut two = StringGrouper::with_duplicates(master, dupes).fitted().unwrap();
        assert_eq!(two.add_match("no match", "bar").unwrap(), 1);
        let matches = two.matches().unwrap();
        assert_eq!(count(&matches, "no match", "bar"), 1);
        assert_eq!(two.groups().unwrap()[1], "no match");
    }

    #[test]
    fn test_add_match_multiple_occurrences() {
        let mut grouper = StringGrouper::with_duplicates(
            corpus(&["foooo", "no match", "baz", "foooo"]),
            corpus(&["foooo", "bar", "baz", "foooob"]),
        )
        .fitted()
        .unwrap();
        assert_eq!(grouper.add_match("foooo", "baz").unwrap(), 2);
        let matches = grouper.matches().unwrap();
        assert_eq!(count(&matches, "foooo", "baz"), 2);
    }

    #[test]
    fn test_add_then_remove_restores_matches() {
        let mut grouper = StringGrouper::new(corpus(&["foooo", "no match", "baz", "foooob", "baz"]))
            .fitted()
            .unwrap();
        let before = grouper.match_records().unwrap();
        assert_eq!(grouper.add_match("no match", "baz").unwrap(), 4);
        assert_eq!(grouper.remove_match("no match", "baz").unwrap(), 4);
        assert_eq!(grouper.match_records().unwrap(), before);
    }

    #[test]
    fn test_remove_match() {
        let master = corpus(&["foooo", "no match", "baz", "foooob"]);
        let dupes = corpus(&["foooo", "bar", "baz", "foooob"]);

        let mut single = StringGrouper::new(master.clone()).fitted().unwrap();
        assert_eq!(count(&single.matches().unwrap(), "foooo", "foooob"), 1);
        assert_eq!(single.remove_match("foooo", "foooob").unwrap(), 2);
        let matches = single.matches().unwrap();
        assert_eq!(count(&matches, "foooo", "foooob"), 0);
        assert_eq!(count(&matches, "foooob", "foooo"), 0);
        assert_eq!(single.groups().unwrap(), vec!["foooo", "no match", "baz", "foooob"]);

        let mut two = StringGrouper::with_duplicates(master, dupes).fitted().unwrap();
        assert_eq!(two.remove_match("foooo", "foooob").unwrap(), 1);
        assert_eq!(count(&two.matches().unwrap(), "foooo", "foooob"), 0);
        assert_eq!(two.remove_match("foooo", "foooob").unwrap(), 0);
    }

    #[test]
    fn test_exact_duplicates_score_one() {
        let strings = [
            "Acme Corporation International",
            "Acme Corporation International",
            "Globex Holdings Ltd",
            "Globex Holdings Ltd",
            "Initech Software Co",
            "Initech Software Co",
        ];
        let config = GrouperConfig::builder().min_similarity(1.0).build().unwrap();
        let grouper = StringGrouper::with_config(corpus(&strings), None, config)
            .fitted()
            .unwrap();
        assert_eq!(
            grouper.match_records().unwrap(),
            vec![
                MatchRecord::new(0, 1, 1.0),
                MatchRecord::new(1, 0, 1.0),
                MatchRecord::new(2, 3, 1.0),
                MatchRecord::new(3, 2, 1.0),
                MatchRecord::new(4, 5, 1.0),
                MatchRecord::new(5, 4, 1.0),
            ]
        );

        let grouper = StringGrouper::new(corpus(&strings)).fitted().unwrap();
        for record in grouper.match_records().unwrap() {
            if strings[record.left] == strings[record.right] {
                assert_eq!(record.similarity, 1.0);
            }
        }
        assert_eq!(
            grouper.groups().unwrap(),
            vec![strings[0], strings[0], strings[2], strings[2], strings[4], strings[4]]
        );
    }

    #[test]
    fn test_refit_discards_manual_edits() {
        let mut grouper = StringGrouper::new(corpus(&["foooo", "no match", "baz"])).fitted().unwrap();
        let fitted = grouper.match_records().unwrap();
        grouper.add_match("no match", "baz").unwrap();
        grouper.fit().unwrap();
        assert_eq!(grouper.match_records().unwrap(), fitted);
    }

    #[test]
    fn test_fit_properties_on_random_corpus() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(11);
        let bases = ["acme corp", "globex", "initech", "umbrella", "hooli"];
        let strings: Vec<String> = (0..120)
            .map(|_| {
                let mut chars: Vec<char> = bases[rng.gen_range(0..bases.len())].chars().collect();
                let position = rng.gen_range(0..chars.len());
                chars[position] = rng.gen_range(b'a'..=b'z') as char;
                chars.into_iter().collect()
            })
            .collect();
        let config = GrouperConfig::builder()
            .min_similarity(0.5)
            .max_n_matches(10)
            .number_of_workers(3)
            .build()
            .unwrap();

        let first = StringGrouper::with_config(Corpus::new(strings.clone()), None, config.clone())
            .fitted()
            .unwrap();
        let second = StringGrouper::with_config(Corpus::new(strings), None, config)
            .fitted()
            .unwrap();
        let records = first.match_records().unwrap();
        assert_eq!(records, second.match_records().unwrap());
        assert_eq!(first.groups().unwrap(), second.groups().unwrap());

        for record in &records {
            assert!(!record.is_identity());
            assert!(record.similarity >= 0.5 && record.similarity <= 1.0);
            assert!(records
                .iter()
                .any(|r| r.left == record.right && r.right == record.left && r.similarity == record.similarity));
        }
    }

    #[test]
    fn test_missing_values_are_rejected() {
        let config = GrouperConfig::default();
        let result = StringGrouper::from_optional(
            vec![Some("foo"), Some("bar")],
            Some(vec![Some("foo"), None]),
            config.clone(),
        );
        assert!(matches!(
            result,
            Err(GrouperError::MissingValue { side: Side::Right, index: 1 })
        ));
        let result = StringGrouper::from_optional(vec![Some("foo"), None], None::<Vec<Option<&str>>>, config);
        assert!(matches!(
            result,
            Err(GrouperError::MissingValue { side: Side::Left, index: 1 })
        ));
    }

    #[test]
    fn test_custom_normalizer() {
        let grouper = StringGrouper::new(corpus(&["ACME", "acme", "other"]))
            .with_normalizer(Arc::new(|s: &str| s.to_lowercase()))
            .fitted()
            .unwrap();
        assert_eq!(grouper.groups().unwrap(), vec!["ACME", "ACME", "other"]);
    }

    #[test]
    fn test_convenience_functions() {
        let config = GrouperConfig::builder().number_of_workers(2).build().unwrap();
        let groups = group_similar_strings(&["foooo", "bar", "foooob"], config.clone()).unwrap();
        assert_eq!(groups, vec!["foooo", "bar", "foooo"]);

        let master = ["foo", "bar", "baz"];
        let dupes = ["foo", "bar", "bop"];
        let matches = match_strings(&master, Some(&dupes[..]), config.clone()).unwrap();
        assert_eq!(
            matches,
            vec![
                ("foo".to_string(), "foo".to_string(), 1.0),
                ("bar".to_string(), "bar".to_string(), 1.0),
            ]
        );
        let nearest = match_most_similar(&master, &dupes, config).unwrap();
        assert_eq!(nearest, vec!["foo", "bar", "bop"]);
    }
}
