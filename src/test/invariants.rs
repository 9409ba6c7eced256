//! Structural checks walked over the whole tree after mutations.

use crate::feature::Feature;
use crate::mbr::Mbr;
use crate::rtree::node::{EntryKind, NodeId};
use crate::rtree::RTree;

/// Assert the structural invariants of `tree`.
///
/// `allow_underfull` relaxes the minimum-occupancy check: condensing
/// re-inserts detached subtrees wholesale, so nodes below half occupancy can
/// legitimately survive a removal.
pub(crate) fn check_tree<F: Feature>(tree: &RTree<F>, allow_underfull: bool) {
    assert!(tree.nodes[tree.root].parent.is_none(), "root has no parent");
    assert_eq!(
        tree.height,
        tree.nodes[tree.root].level,
        "height tracks the root level"
    );

    let mut leaf_entries = 0;
    walk(tree, tree.root, allow_underfull, &mut leaf_entries);
    assert_eq!(leaf_entries, tree.len(), "len counts the leaf entries");
}

fn walk<F: Feature>(
    tree: &RTree<F>,
    n: NodeId,
    allow_underfull: bool,
    leaf_entries: &mut usize,
) {
    let node = &tree.nodes[n];

    assert!(
        node.entries.len() <= tree.fan,
        "node holds at most fan entries"
    );
    if n != tree.root && !allow_underfull {
        assert!(
            node.entries.len() >= tree.half_fan,
            "non-root node holds at least half_fan entries"
        );
    }

    if node.leaf {
        assert_eq!(node.level, 1, "leaves live at level 1");
        for entry in &node.entries {
            assert!(matches!(entry.kind, EntryKind::Feature(_)));
        }
        *leaf_entries += node.entries.len();
        return;
    }

    for entry in &node.entries {
        let child = entry.kind.child();
        assert_eq!(
            tree.nodes[child].parent,
            Some(n),
            "child back-link points at its parent"
        );
        assert_eq!(
            tree.nodes[child].level + 1,
            node.level,
            "levels decrease by one per step down"
        );

        let tight: Mbr = tree.node_mbr(child);
        assert_eq!(entry.mbr, tight, "cached bound stays tight");

        walk(tree, child, allow_underfull, leaf_entries);
    }
}

mod test {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::check_tree;
    use crate::rtree::RTree;
    use crate::test::features::{rect_box, RectFeature};

    #[test]
    fn invariants_hold_through_random_inserts() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tree = RTree::new(2, 4);

        for id in 0..300 {
            let mins = [rng.gen_range(-500..500), rng.gen_range(-500..500)];
            let spans = [rng.gen_range(0..40), rng.gen_range(0..40)];
            tree.insert(RectFeature::new(id, &mins, &spans));
            if id % 25 == 0 {
                check_tree(&tree, false);
            }
        }
        check_tree(&tree, false);
        assert_eq!(tree.len(), 300);

        let all = tree.search(&rect_box(&[-600, -600], &[1200, 1200]));
        assert_eq!(all.len(), 300);
    }

    #[test]
    fn invariants_hold_through_interleaved_removals() {
        let mut rng = StdRng::seed_from_u64(11);
        let features: Vec<RectFeature> = (0..200)
            .map(|id| {
                let mins = [rng.gen_range(-100..100), rng.gen_range(-100..100)];
                RectFeature::new(id, &mins, &[3, 3])
            })
            .collect();

        let mut tree = RTree::new(2, 4);
        for feature in &features {
            tree.insert(feature.clone());
        }

        for (i, feature) in features.iter().enumerate() {
            assert!(tree.remove(feature), "feature {i} present");
            if i % 20 == 0 {
                check_tree(&tree, true);
            }
        }
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
        check_tree(&tree, true);
    }
}
