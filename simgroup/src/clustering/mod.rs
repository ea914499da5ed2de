mod components;
mod nearest;

pub use self::components::{clean_groups, connected_components, UnionFind};
pub use self::nearest::nearest_masters;

/// Where the representative string of a position comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representative {
    /// A position in the left corpus.
    Left(usize),
    /// A position in the right corpus. Only used for unmatched duplicates,
    /// which represent themselves.
    Right(usize),
}
