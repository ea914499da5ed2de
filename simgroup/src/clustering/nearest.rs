use crate::config::TieBreak;
use crate::matches::MatchRecord;

/// Two-corpus grouping: every right (duplicate) index is assigned to the left
/// (master) index it is most similar to.
///
/// Returns one entry per right index; `None` when nothing matched it.
/// Among masters with equal similarity `tie_break` decides.
pub fn nearest_masters<I>(n_right: usize, records: I, tie_break: TieBreak) -> Vec<Option<usize>>
where
    I: IntoIterator<Item = MatchRecord>,
{
    let mut best: Vec<Option<(usize, f64)>> = vec![None; n_right];
    for record in records {
        let slot = match best.get_mut(record.right) {
            Some(slot) => slot,
            None => continue,
        };
        let replace = match *slot {
            None => true,
            Some((left, similarity)) => {
                record.similarity > similarity
                    || (record.similarity == similarity && wins_tie(record.left, left, tie_break))
            }
        };
        if replace {
            *slot = Some((record.left, record.similarity));
        }
    }
    best.into_iter()
        .map(|slot| slot.map(|(left, _)| left))
        .collect()
}

#[inline]
fn wins_tie(candidate: usize, current: usize, tie_break: TieBreak) -> bool {
    match tie_break {
        TieBreak::FirstOccurrence => candidate < current,
        TieBreak::LastOccurrence => candidate > current,
    }
}
