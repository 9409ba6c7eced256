//! One-shot balanced construction: sort the seed entries along one axis,
//! carve the run into slabs sized for the target height, and recurse with
//! the sort axis rotating one step per level.

use crate::feature::Feature;
use crate::rtree::index::RTree;
use crate::rtree::node::{Entry, EntryKind, Node, NodeId};
use crate::rtree::util::{sort_by_axis, split_by_m, split_in_s};

impl<F: Feature> RTree<F> {
    /// Load `features` into an empty tree as a balanced structure of height
    /// `ceil(log_fan(n))`, without per-feature insertion cost.
    pub(crate) fn bulk_load(&mut self, features: Vec<F>) {
        let n = features.len();
        let mut entries: Vec<Entry<F>> = features
            .into_iter()
            .map(|f| Entry {
                mbr: f.mbr(),
                kind: EntryKind::Feature(f),
            })
            .collect();

        self.len = n;
        self.height = ((n as f64).ln() / (self.fan as f64).ln()).ceil() as usize;

        let root = self.root;
        self.nodes[root].leaf = false;
        self.nodes[root].level = self.height;

        // widest subtree a single root child can cover
        let max_subtree = (self.fan as f64).powi(self.height as i32 - 1);
        let slabs = ((n as f64 / max_subtree).ceil()).sqrt().floor() as usize;

        sort_by_axis(0, &mut entries);

        for part in split_in_s(slabs, entries) {
            let child = self.load_subtree(self.height - 1, part);
            self.nodes[child].parent = Some(root);
            let mbr = self.node_mbr(child);
            self.nodes[root].entries.push(Entry {
                mbr,
                kind: EntryKind::Child(child),
            });
        }
    }

    fn load_subtree(&mut self, level: usize, mut entries: Vec<Entry<F>>) -> NodeId {
        if entries.len() <= self.fan {
            return self.nodes.alloc(Node {
                parent: None,
                leaf: true,
                level,
                entries,
            });
        }

        sort_by_axis((self.height - level) % self.dim, &mut entries);

        let node = self.nodes.alloc(Node {
            parent: None,
            leaf: false,
            level,
            entries: Vec::with_capacity(self.fan),
        });

        for part in split_by_m(self.fan, entries) {
            let child = self.load_subtree(level - 1, part);
            self.nodes[child].parent = Some(node);
            let mbr = self.node_mbr(child);
            self.nodes[node].entries.push(Entry {
                mbr,
                kind: EntryKind::Child(child),
            });
        }

        node
    }
}
