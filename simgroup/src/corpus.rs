use std::ops::Index;
use std::slice::Iter;

use smallvec::SmallVec;

use crate::errors::{GrouperError, Result, Side};

/// Positions of one string value inside a corpus. Most values occur once or twice.
pub type Occurrences = SmallVec<[usize; 4]>;

/// An ordered, immutable collection of strings.
///
/// The position of a string is its identity: the same value may appear many
/// times and every occurrence is grouped independently.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Corpus {
    strings: Vec<String>,
}

impl Corpus {
    pub fn new<I, S>(strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Corpus {
            strings: strings.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a corpus from values that may be missing.
    ///
    /// Validation happens here, before anything is tokenized: the first
    /// `None` is reported together with its index.
    ///
    /// ```
    /// use simgroup::{Corpus, GrouperError};
    ///
    /// let corpus = Corpus::from_optional(vec![Some("foo"), Some("bar")]).unwrap();
    /// assert_eq!(corpus.len(), 2);
    ///
    /// let err = Corpus::from_optional(vec![Some("foo"), None]).unwrap_err();
    /// assert!(matches!(err, GrouperError::MissingValue { index: 1, .. }));
    /// ```
    pub fn from_optional<I, S>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self::from_optional_side(values, Side::Left)
    }

    pub(crate) fn from_optional_side<I, S>(values: I, side: Side) -> Result<Self>
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let strings = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| match value {
                Some(value) => Ok(value.into()),
                None => Err(GrouperError::MissingValue { side, index }),
            })
            .collect::<Result<Vec<String>>>()?;
        Ok(Corpus { strings })
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> Iter<'_, String> {
        self.strings.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.strings
    }

    /// Every position holding exactly `value`, in ascending order.
    pub fn occurrences(&self, value: &str) -> Occurrences {
        self.strings
            .iter()
            .enumerate()
            .filter(|(_, s)| s.as_str() == value)
            .map(|(i, _)| i)
            .collect()
    }
}

impl Index<usize> for Corpus {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.strings[index]
    }
}

impl From<Vec<String>> for Corpus {
    fn from(strings: Vec<String>) -> Self {
        Corpus { strings }
    }
}

impl<'a> From<&'a [&'a str]> for Corpus {
    fn from(strings: &'a [&'a str]) -> Self {
        Corpus::new(strings.iter().copied())
    }
}

impl<S: Into<String>> FromIterator<S> for Corpus {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Corpus::new(iter)
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a String;
    type IntoIter = Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.strings.iter()
    }
}
