//! Quadratic node splitting: pick the pair of entries that would waste the
//! most area together as seeds, then peel off the remaining entries one at a
//! time, most-constrained first.

use std::mem;

use crate::feature::Feature;
use crate::rtree::index::RTree;
use crate::rtree::node::{Entry, Node, NodeId};

impl<F: Feature> RTree<F> {
    /// Split an overflowing node into two groups of at least `half_fan`
    /// entries each. The left group keeps the identity (and parent link) of
    /// the original node; the returned id is the fresh right sibling.
    pub(crate) fn split_node(&mut self, n: NodeId) -> NodeId {
        let (seed_left, seed_right) = self.pick_seeds(n);
        let mut remaining = mem::take(&mut self.nodes[n].entries);
        // right index is the larger of the pair, so it is removed first
        let right_entry = remaining.remove(seed_right);
        let left_entry = remaining.remove(seed_left);

        let (parent, leaf, level) = {
            let node = &self.nodes[n];
            (node.parent, node.leaf, node.level)
        };
        let right = self.nodes.alloc(Node {
            parent,
            leaf,
            level,
            entries: Vec::new(),
        });

        self.push_entry(n, left_entry);
        self.push_entry(right, right_entry);

        while !remaining.is_empty() {
            let next = self.pick_next(n, right, &remaining);
            let still_left = remaining.len();
            let entry = remaining.remove(next);

            if still_left + self.nodes[n].entries.len() <= self.half_fan {
                self.push_entry(n, entry);
            } else if still_left + self.nodes[right].entries.len() <= self.half_fan {
                self.push_entry(right, entry);
            } else {
                self.assign_by_enlargement(entry, n, right);
            }
        }

        right
    }

    /// The pair of entries whose combined box wastes the most area over the
    /// sum of their own. Ties keep the first pair encountered.
    fn pick_seeds(&self, n: NodeId) -> (usize, usize) {
        let entries = &self.nodes[n].entries;
        let (mut left, mut right) = (0, 1);
        let mut max_wasted = f64::NEG_INFINITY;

        for (i, e1) in entries.iter().enumerate() {
            for (j, e2) in entries.iter().enumerate().skip(i + 1) {
                let wasted = e1.mbr.merge(&e2.mbr).size() - e1.mbr.size() - e2.mbr.size();
                if wasted > max_wasted {
                    max_wasted = wasted;
                    left = i;
                    right = j;
                }
            }
        }

        (left, right)
    }

    /// The remaining entry whose group preference is strongest: maximal
    /// difference between the enlargements the two groups would suffer.
    fn pick_next(&self, left: NodeId, right: NodeId, remaining: &[Entry<F>]) -> usize {
        let left_mbr = self.node_mbr(left);
        let right_mbr = self.node_mbr(right);
        let mut max_diff = f64::NEG_INFINITY;
        let mut next = 0;

        for (i, entry) in remaining.iter().enumerate() {
            let d1 = left_mbr.merge(&entry.mbr).size() - left_mbr.size();
            let d2 = right_mbr.merge(&entry.mbr).size() - right_mbr.size();
            let diff = (d1 - d2).abs();
            if diff > max_diff {
                max_diff = diff;
                next = i;
            }
        }

        next
    }

    /// Prefer the group needing less enlargement, then the smaller group by
    /// area, then by entry count, then the left group.
    fn assign_by_enlargement(&mut self, entry: Entry<F>, left: NodeId, right: NodeId) {
        let left_mbr = self.node_mbr(left);
        let right_mbr = self.node_mbr(right);
        let left_diff = left_mbr.merge(&entry.mbr).size() - left_mbr.size();
        let right_diff = right_mbr.merge(&entry.mbr).size() - right_mbr.size();

        let diff = left_diff - right_diff;
        if diff < 0.0 {
            return self.push_entry(left, entry);
        } else if diff > 0.0 {
            return self.push_entry(right, entry);
        }

        let diff = left_mbr.size() - right_mbr.size();
        if diff < 0.0 {
            return self.push_entry(left, entry);
        } else if diff > 0.0 {
            return self.push_entry(right, entry);
        }

        if self.nodes[left].entries.len() <= self.nodes[right].entries.len() {
            self.push_entry(left, entry);
        } else {
            self.push_entry(right, entry);
        }
    }
}
