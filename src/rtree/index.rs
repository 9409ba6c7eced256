use std::fmt;

use geo_traits::RectTrait;
use tinyvec::TinyVec;

use crate::error::{MbrIndexError, Result};
use crate::feature::Feature;
use crate::mbr::Mbr;
use crate::rtree::node::{Arena, Entry, EntryKind, Node, NodeId};

/// Leaves always live at this level; the root lives at `height`.
const LEAF_LEVEL: usize = 1;

/// A dynamic R-tree mapping `d`-dimensional bounding boxes to features.
///
/// The tree keeps every node between `fan / 2` and `fan` entries through
/// quadratic splitting on overflow and condensing on underflow, so box
/// intersection queries stay sublinear as the tree mutates. Construction
/// from a large seed set uses a one-shot balanced bulk load instead of
/// per-feature insertion.
///
/// All operations run on the caller's thread; wrap the tree in a lock if it
/// must be shared.
pub struct RTree<F: Feature> {
    pub(crate) dim: usize,
    pub(crate) fan: usize,
    pub(crate) half_fan: usize,
    pub(crate) nodes: Arena<F>,
    pub(crate) root: NodeId,
    pub(crate) len: usize,
    pub(crate) height: usize,
}

impl<F: Feature> RTree<F> {
    /// Create an empty tree over `dim`-dimensional boxes with at most `fan`
    /// entries per node.
    ///
    /// Panics if `dim` is zero or `fan` is less than 2; use
    /// [`RTree::try_new`] for a fallible variant.
    pub fn new(dim: usize, fan: usize) -> Self {
        assert!(dim >= 1, "dimension must be at least 1");
        assert!(fan >= 2, "fanout must be at least 2");

        let mut nodes = Arena::new();
        let root = nodes.alloc(Node {
            parent: None,
            leaf: true,
            level: LEAF_LEVEL,
            entries: Vec::new(),
        });

        Self {
            dim,
            fan,
            half_fan: fan / 2,
            nodes,
            root,
            len: 0,
            height: 1,
        }
    }

    /// Fallible twin of [`RTree::new`].
    pub fn try_new(dim: usize, fan: usize) -> Result<Self> {
        if dim < 1 {
            return Err(MbrIndexError::InvalidParameter(format!(
                "dimension must be at least 1, got {dim}"
            )));
        }
        if fan < 2 {
            return Err(MbrIndexError::InvalidParameter(format!(
                "fanout must be at least 2, got {fan}"
            )));
        }
        Ok(Self::new(dim, fan))
    }

    /// Build a tree holding `features`. Small seed sets (up to `fan`) are
    /// inserted one by one; larger ones are bulk loaded into a balanced tree.
    pub fn with_features(dim: usize, fan: usize, features: Vec<F>) -> Self {
        let mut tree = Self::new(dim, fan);
        if features.len() <= fan {
            for feature in features {
                tree.insert(feature);
            }
        } else {
            tree.bulk_load(features);
        }
        tree
    }

    /// The dimension of the indexed boxes.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The number of indexed features.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of levels from root to leaves, inclusive.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Index a feature under its current bounding box.
    pub fn insert(&mut self, feature: F) {
        let mbr = feature.mbr();
        self.insert_entry(
            Entry {
                mbr,
                kind: EntryKind::Feature(feature),
            },
            LEAF_LEVEL,
        );
        self.len += 1;
    }

    /// Remove the entry equal to `feature`, locating its leaf through the
    /// cached bounds. Returns `false`, leaving the tree untouched, when no
    /// equal feature is indexed.
    pub fn remove(&mut self, feature: &F) -> bool
    where
        F: PartialEq,
    {
        let target = feature.mbr();
        let Some(leaf) = self.find_leaf(self.root, &target, feature) else {
            return false;
        };

        let Some(pos) = self.nodes[leaf]
            .entries
            .iter()
            .position(|e| matches!(&e.kind, EntryKind::Feature(f) if f == feature))
        else {
            return false;
        };
        self.nodes[leaf].entries.remove(pos);

        self.condense_tree(leaf);

        self.len -= 1;

        // a root left with a single child hands its role to that child
        if !self.nodes[self.root].leaf && self.nodes[self.root].entries.len() == 1 {
            let child = self.nodes[self.root].entries[0].kind.child();
            let old_root = self.root;
            self.nodes.free(old_root);
            self.nodes[child].parent = None;
            self.root = child;
        }
        self.height = self.nodes[self.root].level;

        true
    }

    /// All features whose bounding box intersects `query`, in traversal
    /// order. A query of mismatched kind or dimension matches nothing.
    pub fn search(&self, query: &Mbr) -> Vec<&F> {
        let mut results = Vec::new();
        self.search_node(self.root, query, &mut results);
        results
    }

    /// [`RTree::search`] with the query given as any two-dimensional
    /// [`geo_traits::RectTrait`] rectangle.
    pub fn search_rect(&self, rect: &impl RectTrait<T = f64>) -> Vec<&F> {
        self.search(&Mbr::from_rect(rect))
    }

    fn search_node<'a>(&'a self, n: NodeId, query: &Mbr, out: &mut Vec<&'a F>) {
        for entry in &self.nodes[n].entries {
            if !query.intersects(&entry.mbr) {
                continue;
            }
            match &entry.kind {
                EntryKind::Child(child) => self.search_node(*child, query, out),
                EntryKind::Feature(feature) => out.push(feature),
            }
        }
    }

    /// Place `entry` into the node chosen at `level`, splitting and
    /// adjusting upward as needed. Level 1 targets the leaves; condensing
    /// re-inserts detached subtrees one level above where they lived.
    pub(crate) fn insert_entry(&mut self, entry: Entry<F>, level: usize) {
        let target = self.choose_node(&entry.mbr, level);
        if let EntryKind::Child(child) = &entry.kind {
            self.nodes[*child].parent = Some(target);
        }
        self.nodes[target].entries.push(entry);

        let mut split = None;
        if self.nodes[target].entries.len() > self.fan {
            split = Some(self.split_node(target));
        }

        if let Some(sibling) = self.adjust_tree(target, split) {
            self.grow_root(sibling);
        }
    }

    /// Descend from the root toward the node whose box needs the least
    /// enlargement, stopping at a leaf or at `level`.
    fn choose_node(&self, mbr: &Mbr, level: usize) -> NodeId {
        let mut n = self.root;
        loop {
            let node = &self.nodes[n];
            if node.leaf || node.level == level {
                return n;
            }

            let mut best: Option<(f64, f64, NodeId)> = None;
            for entry in &node.entries {
                let enlargement = entry.mbr.merge(mbr).size() - entry.mbr.size();
                let size = entry.mbr.size();
                let better = match best {
                    None => true,
                    Some((best_enlargement, best_size, _)) => {
                        enlargement < best_enlargement
                            || (enlargement == best_enlargement && size < best_size)
                    }
                };
                if better {
                    best = Some((enlargement, size, entry.kind.child()));
                }
            }

            n = best.expect("interior nodes hold at least one entry").2;
        }
    }

    /// Walk from `n` to the root refreshing the cached bounds on the path;
    /// append and propagate split siblings. Returns the sibling of the root
    /// if the split cascaded all the way up.
    fn adjust_tree(&mut self, mut n: NodeId, mut split: Option<NodeId>) -> Option<NodeId> {
        while n != self.root {
            let parent = self.nodes[n].parent.expect("non-root node has a parent");
            self.refresh_parent_entry(n);

            if let Some(sibling) = split.take() {
                let mbr = self.node_mbr(sibling);
                self.nodes[sibling].parent = Some(parent);
                self.nodes[parent].entries.push(Entry {
                    mbr,
                    kind: EntryKind::Child(sibling),
                });
                if self.nodes[parent].entries.len() > self.fan {
                    split = Some(self.split_node(parent));
                }
            }

            n = parent;
        }
        split
    }

    /// Replace the root with a new one holding the old root and its split
    /// sibling; the tree grows by one level.
    fn grow_root(&mut self, sibling: NodeId) {
        let old_root = self.root;
        self.height += 1;

        let old_mbr = self.node_mbr(old_root);
        let sibling_mbr = self.node_mbr(sibling);
        let new_root = self.nodes.alloc(Node {
            parent: None,
            leaf: false,
            level: self.height,
            entries: vec![
                Entry {
                    mbr: old_mbr,
                    kind: EntryKind::Child(old_root),
                },
                Entry {
                    mbr: sibling_mbr,
                    kind: EntryKind::Child(sibling),
                },
            ],
        });

        self.nodes[old_root].parent = Some(new_root);
        self.nodes[sibling].parent = Some(new_root);
        self.root = new_root;
    }

    /// The leaf holding an entry equal to `feature`, reached through
    /// interior boxes containing the feature's box.
    fn find_leaf(&self, n: NodeId, mbr: &Mbr, feature: &F) -> Option<NodeId>
    where
        F: PartialEq,
    {
        let node = &self.nodes[n];
        if node.leaf {
            return Some(n);
        }

        for entry in &node.entries {
            if !entry.mbr.contains(mbr) {
                continue;
            }
            if let Some(leaf) = self.find_leaf(entry.kind.child(), mbr, feature) {
                let matched = self.nodes[leaf]
                    .entries
                    .iter()
                    .any(|e| matches!(&e.kind, EntryKind::Feature(f) if f == feature));
                if matched {
                    return Some(leaf);
                }
            }
        }

        None
    }

    /// Walk from a shrunken leaf to the root: detach nodes that fell under
    /// `half_fan` entries and re-insert their surviving subtrees at their
    /// original depth, refreshing cached bounds everywhere else.
    fn condense_tree(&mut self, mut n: NodeId) {
        let mut orphans: TinyVec<[NodeId; 8]> = TinyVec::new();

        while n != self.root {
            let parent = self.nodes[n].parent.expect("non-root node has a parent");

            if self.nodes[n].entries.len() < self.half_fan {
                self.nodes[parent]
                    .entries
                    .retain(|e| !matches!(&e.kind, EntryKind::Child(id) if *id == n));
                if self.nodes[n].entries.is_empty() {
                    self.nodes.free(n);
                } else {
                    orphans.push(n);
                }
            } else {
                self.refresh_parent_entry(n);
            }

            n = parent;
        }

        for orphan in orphans {
            let mbr = self.node_mbr(orphan);
            let level = self.nodes[orphan].level;
            self.insert_entry(
                Entry {
                    mbr,
                    kind: EntryKind::Child(orphan),
                },
                level + 1,
            );
        }
    }

    /// Recompute the tight bound of `n` into its parent's entry.
    fn refresh_parent_entry(&mut self, n: NodeId) {
        let parent = self.nodes[n].parent.expect("non-root node has a parent");
        let mbr = self.node_mbr(n);
        let entry = self.nodes[parent]
            .entries
            .iter_mut()
            .find(|e| matches!(&e.kind, EntryKind::Child(id) if *id == n))
            .expect("parent holds an entry for each child");
        entry.mbr = mbr;
    }

    /// The union of all cached boxes in `n`.
    pub(crate) fn node_mbr(&self, n: NodeId) -> Mbr {
        Mbr::merge_all(self.nodes[n].entries.iter().map(|e| &e.mbr))
            .expect("covered nodes hold at least one entry")
    }

    /// Move `entry` into `group`, rewiring the child's parent link when the
    /// entry carries a subtree.
    pub(crate) fn push_entry(&mut self, group: NodeId, entry: Entry<F>) {
        if let EntryKind::Child(child) = &entry.kind {
            self.nodes[*child].parent = Some(group);
        }
        self.nodes[group].entries.push(entry);
    }
}

impl<F: Feature> fmt::Debug for RTree<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RTree")
            .field("dim", &self.dim)
            .field("fan", &self.fan)
            .field("len", &self.len)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
