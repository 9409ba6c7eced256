//! Partitioning and ordering helpers for bulk loading.

use std::cmp::Ordering;

#[cfg(feature = "rayon")]
use rayon::slice::ParallelSliceMut;

use crate::rtree::node::Entry;

/// Split `items` into groups of `len / m` with any remainder forming a final
/// short group, yielding at most `m + 1` groups (10 split by 3 gives
/// 3, 3, 3, 1).
pub(crate) fn split_by_m<T>(m: usize, items: Vec<T>) -> Vec<Vec<T>> {
    let per_group = items.len() / m;
    let mut num_groups = m;
    if items.len() % m != 0 {
        num_groups += 1;
    }

    let mut out = Vec::with_capacity(num_groups);
    let mut rest = items;
    for _ in 0..num_groups - 1 {
        let tail = rest.split_off(per_group);
        out.push(rest);
        rest = tail;
    }
    out.push(rest);
    out
}

/// Like [`split_by_m`], but a trailing group shorter than its predecessor is
/// merged into it, so the result has at most `s` parts and no runt.
pub(crate) fn split_in_s<T>(s: usize, items: Vec<T>) -> Vec<Vec<T>> {
    let mut split = split_by_m(s, items);
    if split.len() < 2 {
        return split;
    }

    if split[split.len() - 1].len() < split[split.len() - 2].len() {
        let last = split.pop().expect("checked len >= 2");
        split
            .last_mut()
            .expect("checked len >= 2")
            .extend(last);
    }
    split
}

/// Order entries by the lower bound of their cached box along `axis`.
pub(crate) fn sort_by_axis<F>(axis: usize, entries: &mut Vec<Entry<F>>) {
    #[cfg(feature = "rayon")]
    {
        // Sort promoted keys in parallel, then apply the permutation; this
        // keeps the entries themselves off the worker threads.
        let mut keyed: Vec<(f64, usize)> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.mbr.min_at(axis), i))
            .collect();
        keyed.par_sort_unstable_by(|a, b| axis_order(a.0, b.0));

        let mut slots: Vec<Option<Entry<F>>> = entries.drain(..).map(Some).collect();
        for &(_, i) in &keyed {
            entries.push(slots[i].take().expect("each slot moves exactly once"));
        }
    }

    #[cfg(not(feature = "rayon"))]
    entries.sort_by(|a, b| axis_order(a.mbr.min_at(axis), b.mbr.min_at(axis)));
}

fn axis_order(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mbr::Mbr;
    use crate::rtree::node::EntryKind;

    #[test]
    fn split_by_m_leaves_remainder_in_short_group() {
        let groups = split_by_m(3, (0..10).collect());
        let sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 3, 3, 1]);
        assert_eq!(groups.concat(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn split_by_m_exact_division() {
        let groups = split_by_m(3, (0..9).collect());
        let sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 3, 3]);
    }

    #[test]
    fn split_in_s_merges_trailing_runt() {
        let groups = split_in_s(3, (0..10).collect());
        let sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 3, 4]);
        assert_eq!(groups.concat(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn split_in_s_keeps_even_groups() {
        let groups = split_in_s(2, (0..8).collect());
        let sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 4]);
    }

    #[test]
    fn sort_by_axis_orders_entries() {
        let mut entries: Vec<Entry<u32>> = [5, 1, 4, 2]
            .iter()
            .map(|&x| Entry {
                mbr: Mbr::from_i32(&[x, 10 - x], &[1, 1]).unwrap(),
                kind: EntryKind::Feature(x as u32),
            })
            .collect();

        sort_by_axis(0, &mut entries);
        let xs: Vec<f64> = entries.iter().map(|e| e.mbr.min_at(0)).collect();
        assert_eq!(xs, vec![1.0, 2.0, 4.0, 5.0]);

        sort_by_axis(1, &mut entries);
        let ys: Vec<f64> = entries.iter().map(|e| e.mbr.min_at(1)).collect();
        assert_eq!(ys, vec![5.0, 6.0, 8.0, 9.0]);
    }
}
