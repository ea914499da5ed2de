/*!
This library groups near-duplicate strings by the cosine similarity of their
character n-gram TF-IDF fingerprints.

* a single corpus is grouped into connected components of similar strings,
  each labelled by its first member
* a duplicates corpus is matched against a master corpus, and every duplicate
  is mapped to its most similar master string

Similarities come from a sparse matrix product that keeps only the best
`max_n_matches` candidates per string above `min_similarity`, so the full
pairwise matrix is never materialized.

## Example

 ```
 use simgroup::{Corpus, GrouperConfig, StringGrouper};

 let companies = Corpus::new([
     "Acme Corporation",
     "ACME Corp.",
     "Acme Corporation Inc",
     "Globex",
     "Initech",
     "Acme Corporation.",
 ]);
 let config = GrouperConfig::builder().min_similarity(0.7).build().unwrap();
 let mut grouper = StringGrouper::with_config(companies, None, config);
 grouper.fit().unwrap();

 let groups = grouper.groups().unwrap();
 assert_eq!(groups[2], "Acme Corporation");
 assert_eq!(groups[3], "Globex");
 assert_eq!(groups[5], "Acme Corporation");

 // manual corrections on top of the computed matches
 grouper.add_match("Globex", "Initech").unwrap();
 assert_eq!(grouper.groups().unwrap()[4], "Globex");
 ```

## References
[[1] sparse_dot_topn](https://github.com/ing-bank/sparse_dot_topn)

[[2] Chapter 3, Mining of Massive Datasets](http://www.mmds.org)
 */

pub mod clustering;
pub mod config;
pub mod corpus;
pub mod errors;
pub mod grouper;
pub mod matches;
pub mod similarity;
pub mod text;
pub mod tfidf;

pub use crate::config::{
    GrouperConfig, GrouperConfigBuilder, TieBreak, DEFAULT_MAX_N_MATCHES, DEFAULT_MIN_SIMILARITY,
    DEFAULT_NGRAM_SIZE, DEFAULT_PATTERN,
};
pub use crate::corpus::Corpus;
pub use crate::errors::{GrouperError, Result, Side};
pub use crate::grouper::{group_similar_strings, match_most_similar, match_strings, Match, StringGrouper};
