//! Single-corpus grouping: connected components over the match graph,
//! labelled by their lowest member index.

use crate::matches::MatchRecord;

/// Disjoint sets over `0..n`. The root of every set is its lowest member.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        UnionFind {
            parent: (0..n).collect()
        }
    }

    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            // path halving
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merges the sets of `a` and `b`. The higher root is attached below the
    /// lower one. Returns false if they were already in one set.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a == root_b {
            return false;
        }
        let (low, high) = if root_a < root_b { (root_a, root_b) } else { (root_b, root_a) };
        self.parent[high] = low;
        true
    }

    /// One flat group id per index: the lowest index of its set.
    pub fn into_group_ids(self) -> Vec<usize> {
        clean_groups(&self.parent)
    }
}

/// Collapses chains of group ids into one flat id per group.
///
/// `group_ids[i]` names the row whose group `i` joined. That row may itself
/// point at another row, for example after two clusters were bridged. Every
/// chain is followed until it reaches a row that is its own group id. A chain
/// that loops back on itself resolves to the lowest id of the loop, and an id
/// outside `0..len` stops the chain at the last valid row.
///
/// Applying the function to its own output returns the output unchanged.
///
/// ```
/// use simgroup::clustering::clean_groups;
///
/// assert_eq!(clean_groups(&[0, 0, 1, 2]), vec![0, 0, 0, 0]);
/// assert_eq!(clean_groups(&[1, 0, 2]), vec![0, 0, 2]);
/// ```
pub fn clean_groups(group_ids: &[usize]) -> Vec<usize> {
    let n = group_ids.len();
    let mut resolved: Vec<Option<usize>> = vec![None; n];
    let mut on_path = vec![false; n];
    let mut path: Vec<usize> = Vec::new();

    for start in 0..n {
        if resolved[start].is_some() {
            continue;
        }
        let mut current = start;
        let root = loop {
            if let Some(root) = resolved[current] {
                break root;
            }
            if on_path[current] {
                let loop_start = path.iter().position(|&p| p == current).unwrap_or(0);
                break path[loop_start..].iter().copied().min().unwrap_or(current);
            }
            on_path[current] = true;
            path.push(current);
            let next = group_ids[current];
            if next == current || next >= n {
                break current;
            }
            current = next;
        };
        for p in path.drain(..) {
            on_path[p] = false;
            resolved[p] = Some(root);
        }
    }

    resolved
        .into_iter()
        .enumerate()
        .map(|(i, root)| root.unwrap_or(i))
        .collect()
}

/// Group id of every index in a corpus of `n` strings, given the match records
/// between them. Unmatched indices are their own group.
pub fn connected_components<I>(n: usize, records: I) -> Vec<usize>
where
    I: IntoIterator<Item = MatchRecord>,
{
    let mut components = UnionFind::new(n);
    for record in records {
        if record.left < n && record.right < n {
            components.union(record.left, record.right);
        }
    }
    components.into_group_ids()
}
