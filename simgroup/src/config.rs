use regex::Regex;

use crate::errors::{GrouperError, Result};

pub const DEFAULT_MIN_SIMILARITY: f64 = 0.8;
pub const DEFAULT_MAX_N_MATCHES: usize = 20;
pub const DEFAULT_NGRAM_SIZE: usize = 3;
/// Strips everything that is not a letter or a digit.
pub const DEFAULT_PATTERN: &str = r"[^\p{L}\p{N}]";

/// How equally similar master candidates are ranked when a duplicate is
/// assigned to its nearest master in two-corpus mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// The master with the lowest index wins.
    #[default]
    FirstOccurrence,
    /// The master with the highest index wins.
    LastOccurrence,
}

/// Immutable grouping configuration.
///
/// Every value is validated by [`GrouperConfigBuilder::build`]; there are no
/// setters afterwards.
///
/// ```
/// use simgroup::{GrouperConfig, DEFAULT_MAX_N_MATCHES};
///
/// let config = GrouperConfig::builder()
///     .min_similarity(0.1)
///     .number_of_workers(1)
///     .build()
///     .unwrap();
/// assert_eq!(config.min_similarity(), 0.1);
/// assert_eq!(config.max_n_matches(), DEFAULT_MAX_N_MATCHES);
///
/// assert!(GrouperConfig::builder().ngram_size(0).build().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct GrouperConfig {
    min_similarity: f64,
    max_n_matches: usize,
    ngram_size: usize,
    pattern: Regex,
    number_of_workers: usize,
    tie_break: TieBreak,
}

impl GrouperConfig {
    pub fn builder() -> GrouperConfigBuilder {
        GrouperConfigBuilder::default()
    }

    pub fn min_similarity(&self) -> f64 {
        self.min_similarity
    }

    pub fn max_n_matches(&self) -> usize {
        self.max_n_matches
    }

    pub fn ngram_size(&self) -> usize {
        self.ngram_size
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn number_of_workers(&self) -> usize {
        self.number_of_workers
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }
}

impl Default for GrouperConfig {
    fn default() -> Self {
        GrouperConfig {
            min_similarity: DEFAULT_MIN_SIMILARITY,
            max_n_matches: DEFAULT_MAX_N_MATCHES,
            ngram_size: DEFAULT_NGRAM_SIZE,
            pattern: Regex::new(DEFAULT_PATTERN).expect("default pattern compiles"),
            number_of_workers: default_number_of_workers(),
            tie_break: TieBreak::default(),
        }
    }
}

/// One worker per thread of the global rayon pool, which defaults to the host CPU count.
pub fn default_number_of_workers() -> usize {
    rayon::current_num_threads().max(1)
}

#[derive(Debug, Clone)]
pub struct GrouperConfigBuilder {
    min_similarity: f64,
    max_n_matches: usize,
    ngram_size: usize,
    pattern: String,
    number_of_workers: usize,
    tie_break: TieBreak,
}

impl Default for GrouperConfigBuilder {
    fn default() -> Self {
        GrouperConfigBuilder {
            min_similarity: DEFAULT_MIN_SIMILARITY,
            max_n_matches: DEFAULT_MAX_N_MATCHES,
            ngram_size: DEFAULT_NGRAM_SIZE,
            pattern: DEFAULT_PATTERN.to_string(),
            number_of_workers: default_number_of_workers(),
            tie_break: TieBreak::default(),
        }
    }
}

impl GrouperConfigBuilder {
    pub fn min_similarity(mut self, min_similarity: f64) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    pub fn max_n_matches(mut self, max_n_matches: usize) -> Self {
        self.max_n_matches = max_n_matches;
        self
    }

    pub fn ngram_size(mut self, ngram_size: usize) -> Self {
        self.ngram_size = ngram_size;
        self
    }

    pub fn pattern<S: Into<String>>(mut self, pattern: S) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn number_of_workers(mut self, number_of_workers: usize) -> Self {
        self.number_of_workers = number_of_workers;
        self
    }

    pub fn tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn build(self) -> Result<GrouperConfig> {
        if !self.min_similarity.is_finite()
            || self.min_similarity <= 0.0
            || self.min_similarity > 1.0
        {
            return Err(GrouperError::invalid_config(
                "min_similarity",
                self.min_similarity,
                "must be in (0, 1]",
            ));
        }
        if self.max_n_matches == 0 {
            return Err(GrouperError::invalid_config(
                "max_n_matches",
                self.max_n_matches,
                "must be at least 1",
            ));
        }
        if self.ngram_size == 0 {
            return Err(GrouperError::invalid_config(
                "ngram_size",
                self.ngram_size,
                "must be at least 1",
            ));
        }
        if self.number_of_workers == 0 {
            return Err(GrouperError::invalid_config(
                "number_of_workers",
                self.number_of_workers,
                "must be at least 1",
            ));
        }
        let pattern = Regex::new(&self.pattern)?;
        Ok(GrouperConfig {
            min_similarity: self.min_similarity,
            max_n_matches: self.max_n_matches,
            ngram_size: self.ngram_size,
            pattern,
            number_of_workers: self.number_of_workers,
            tie_break: self.tie_break,
        })
    }
}
