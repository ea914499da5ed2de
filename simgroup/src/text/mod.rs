mod ngrams;

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

pub use self::ngrams::{AsNGrams, NGrams};

/// Normalizes a string before it is cut into n-grams.
///
/// Any `Fn(&str) -> String` closure is a normalizer, so callers can plug in
/// their own cleaning policy.
pub trait Normalizer: Send + Sync {
    fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

/// Removes every match of a regular expression.
#[derive(Debug, Clone)]
pub struct PatternNormalizer {
    pattern: Regex,
}

impl PatternNormalizer {
    pub fn new(pattern: Regex) -> Self {
        PatternNormalizer { pattern }
    }
}

impl Normalizer for PatternNormalizer {
    fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(text, "")
    }
}

impl<F> Normalizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Owned(self(text))
    }
}

/// Turns a string into the ordered list of its character n-grams.
///
/// A normalized string shorter than `ngram_size` becomes a single token equal
/// to the whole normalized string. An empty normalized string has no tokens.
///
/// ```
/// use regex::Regex;
/// use simgroup::text::NGramTokenizer;
///
/// let tokenizer = NGramTokenizer::with_pattern(3, Regex::new(r"[^\p{L}\p{N}]").unwrap());
/// assert_eq!(tokenizer.tokenize("Mc-Don"), vec!["McD", "cDo", "Don"]);
/// assert_eq!(tokenizer.tokenize("a b"), vec!["ab"]);
/// assert!(tokenizer.tokenize(" - ").is_empty());
/// ```
#[derive(Clone)]
pub struct NGramTokenizer {
    ngram_size: usize,
    normalizer: Arc<dyn Normalizer>,
}

impl NGramTokenizer {
    pub fn new(ngram_size: usize, normalizer: Arc<dyn Normalizer>) -> Self {
        assert!(ngram_size > 0, "n-gram size must be positive");
        NGramTokenizer {
            ngram_size,
            normalizer,
        }
    }

    pub fn with_pattern(ngram_size: usize, pattern: Regex) -> Self {
        Self::new(ngram_size, Arc::new(PatternNormalizer::new(pattern)))
    }

    pub fn ngram_size(&self) -> usize {
        self.ngram_size
    }

    pub fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.normalizer.normalize(text)
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = self.normalizer.normalize(text);
        if normalized.is_empty() {
            return Vec::new();
        }
        if normalized.chars().count() < self.ngram_size {
            return vec![normalized.into_owned()];
        }
        normalized
            .as_ngrams(self.ngram_size)
            .map(str::to_owned)
            .collect()
    }
}

impl fmt::Debug for NGramTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NGramTokenizer")
            .field("ngram_size", &self.ngram_size)
            .finish_non_exhaustive()
    }
}
