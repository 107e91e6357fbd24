//! The inside tree: a forest of six 4-ary tries, one per S2 face.
//!
//! A node reached from face `f` by following child positions `p1..pk`
//! stands for exactly the level-k cell with that address. Values are
//! attached to the node of the cell they were inserted at, never pushed
//! down to children. Nodes are created lazily along insertion paths, so a
//! missing child means nothing was ever inserted at or below that cell.
//!
//! ```text
//!            faces[0]  faces[1]  ...  faces[5]
//!               │
//!      ┌──────┬─┴────┬──────┐
//!      0      1      2      3      level 1
//!      │             │
//!     ...           ...            level k ≤ 30
//! ```
//!
//! Queries:
//! - [`InsideTree::stab`]: values on the root-to-cell path (regions that
//!   contain the cell).
//! - [`InsideTree::mask`]: values at the cell and everywhere beneath it
//!   (regions nested inside the cell).

use crate::cell::{CellAddress, CHILD_COUNT, FACE_COUNT, MAX_LEVEL};
use crate::dedup::ResultSet;
use std::hash::Hash;

/// A trie node covering one cell.
#[derive(Debug, Clone)]
struct Node<V> {
    children: [Option<Box<Node<V>>>; CHILD_COUNT],
    values: Vec<V>,
}

impl<V> Node<V> {
    fn new() -> Self {
        Self {
            children: [None, None, None, None],
            values: Vec::new(),
        }
    }

    fn child(&self, pos: usize) -> Option<&Node<V>> {
        self.children[pos].as_deref()
    }

    fn child_or_insert(&mut self, pos: usize) -> &mut Node<V> {
        self.children[pos].get_or_insert_with(|| Box::new(Node::new()))
    }

    /// Populated children.
    fn sub_nodes(&self) -> impl Iterator<Item = &Node<V>> {
        self.children.iter().filter_map(|c| c.as_deref())
    }
}

/// Shape statistics for a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Nodes below the face roots.
    pub node_count: u64,

    /// Values stored across all nodes, duplicates included.
    pub value_count: u64,

    /// Deepest populated level.
    pub max_depth: u8,
}

/// Cell trie mapping S2 cells to payload values.
///
/// Append-only: values can be inserted but never removed.
#[derive(Debug, Clone)]
pub struct InsideTree<V> {
    faces: [Node<V>; FACE_COUNT],
}

impl<V> InsideTree<V> {
    /// Create an empty tree with six empty face roots.
    pub fn new() -> Self {
        Self {
            faces: std::array::from_fn(|_| Node::new()),
        }
    }

    /// Attach `value` to `cell`, creating any missing nodes on the way.
    ///
    /// No deduplication happens here; inserting an equal value twice stores
    /// it twice and the duplicate collapses at query time.
    pub fn insert<C: CellAddress>(&mut self, cell: &C, value: V) {
        let mut node = &mut self.faces[cell.face()];
        for level in 1..=cell.level() {
            node = node.child_or_insert(cell.child_position(level));
        }
        node.values.push(value);
    }

    /// Attach a clone of `value` to every cell of a covering.
    pub fn insert_covering<C, I>(&mut self, cells: I, value: V)
    where
        C: CellAddress,
        I: IntoIterator<Item = C>,
        V: Clone,
    {
        for cell in cells {
            self.insert(&cell, value.clone());
        }
    }

    /// Whether no value has ever been inserted.
    pub fn is_empty(&self) -> bool {
        self.faces
            .iter()
            .all(|root| root.values.is_empty() && root.sub_nodes().next().is_none())
    }

    /// Walk the whole tree and report its shape.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        let mut stack: Vec<(&Node<V>, u8)> = self.faces.iter().map(|root| (root, 0)).collect();

        while let Some((node, depth)) = stack.pop() {
            if depth > 0 {
                stats.node_count += 1;
            }
            stats.value_count += node.values.len() as u64;
            stats.max_depth = stats.max_depth.max(depth);
            stack.extend(node.sub_nodes().map(|child| (child, depth + 1)));
        }

        stats
    }

    /// Node at `cell`, if an insertion ever reached it.
    fn find<C: CellAddress>(&self, cell: &C) -> Option<&Node<V>> {
        let mut node = &self.faces[cell.face()];
        for level in 1..=cell.level() {
            node = node.child(cell.child_position(level))?;
        }
        Some(node)
    }
}

impl<V: Eq + Hash> InsideTree<V> {
    /// Values inserted at `cell` or any of its ancestors, borrowed.
    ///
    /// Values are collected before each descent, so the walk runs to one
    /// level past the cell for the cell's own node to be collected. Nothing
    /// below the cell is ever collected. The walk stops at the first missing
    /// child.
    pub fn stab_refs<C: CellAddress>(&self, cell: &C) -> Vec<&V> {
        self.stab_set(cell).into_refs()
    }

    /// Values inserted at `cell` or beneath it, borrowed.
    ///
    /// Values held by proper ancestors of `cell` are not included.
    pub fn mask_refs<C: CellAddress>(&self, cell: &C) -> Vec<&V> {
        self.mask_set(cell).into_refs()
    }

    fn stab_set<C: CellAddress>(&self, cell: &C) -> ResultSet<'_, V> {
        let mut found = ResultSet::new();
        let mut node = &self.faces[cell.face()];

        for level in 1..=cell.level() + 1 {
            found.extend(&node.values);
            // leaf cells have no children
            if level > MAX_LEVEL {
                break;
            }
            match node.child(cell.child_position(level)) {
                Some(child) => node = child,
                None => break,
            }
        }

        found
    }

    fn mask_set<C: CellAddress>(&self, cell: &C) -> ResultSet<'_, V> {
        let mut found = ResultSet::new();
        let Some(start) = self.find(cell) else {
            return found;
        };

        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            found.extend(&node.values);
            stack.extend(node.sub_nodes());
        }

        found
    }
}

impl<V: Eq + Hash + Clone> InsideTree<V> {
    /// Distinct values whose regions contain `cell`.
    ///
    /// Meant for point lookups: pass the leaf cell of a lat/lng to get every
    /// region whose covering includes it. Order is unspecified.
    pub fn stab<C: CellAddress>(&self, cell: &C) -> Vec<V> {
        self.stab_set(cell).into_values()
    }

    /// Distinct values inserted at `cell` or nested beneath it.
    ///
    /// A level-0 cell returns everything ever inserted on that face. Order is
    /// unspecified.
    pub fn mask<C: CellAddress>(&self, cell: &C) -> Vec<V> {
        self.mask_set(cell).into_values()
    }
}

impl<V> Default for InsideTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::covering::{cell_for_point as leaf, cell_for_point_at_level as cell_at};
    use s2::cellid::CellID;

    /// Child position an S2 cell projects into one level below itself.
    const CANONICAL_CHILD: usize = 2;

    /// Cell addressed by an explicit face and position list.
    struct Path {
        face: usize,
        positions: Vec<usize>,
    }

    impl Path {
        fn new(face: usize, positions: &[usize]) -> Self {
            Self {
                face,
                positions: positions.to_vec(),
            }
        }
    }

    impl CellAddress for Path {
        fn face(&self) -> usize {
            self.face
        }

        fn level(&self) -> u8 {
            self.positions.len() as u8
        }

        fn child_position(&self, level: u8) -> usize {
            let level = level as usize;
            match level.checked_sub(self.positions.len()) {
                Some(0) | None => self.positions[level - 1],
                Some(1) => CANONICAL_CHILD,
                Some(_) => 0,
            }
        }
    }

    fn sorted<T: Ord>(mut v: Vec<T>) -> Vec<T> {
        v.sort();
        v
    }

    #[test]
    fn test_new_tree_is_empty() {
        let tree: InsideTree<u32> = InsideTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.stats(), TreeStats::default());

        let cell = leaf(48.846043, 2.336943);
        assert!(tree.stab(&cell).is_empty());
        assert!(tree.mask(&cell).is_empty());
    }

    #[test]
    fn test_insert_creates_path() {
        let mut tree = InsideTree::new();
        tree.insert(&cell_at(48.846043, 2.336943, 15), 41);

        assert!(!tree.is_empty());
        let stats = tree.stats();
        assert_eq!(stats.node_count, 15);
        assert_eq!(stats.value_count, 1);
        assert_eq!(stats.max_depth, 15);
    }

    #[test]
    fn test_insert_shares_common_prefix() {
        let mut tree = InsideTree::new();
        let a = cell_at(48.846043, 2.336943, 15);
        tree.insert(&a, 1);
        tree.insert(&a, 2);
        // same path, no new nodes
        assert_eq!(tree.stats().node_count, 15);

        tree.insert(&a.parent(10), 3);
        assert_eq!(tree.stats().node_count, 15);
        assert_eq!(tree.stats().value_count, 3);
    }

    #[test]
    fn test_insert_at_face_root() {
        let mut tree = InsideTree::new();
        let point = leaf(48.846043, 2.336943);
        let face = CellID::from_face(CellAddress::face(&point) as u64);
        tree.insert(&face, "face");

        assert_eq!(tree.stats().node_count, 0);
        assert!(!tree.is_empty());

        // every cell on the face is contained by the face
        assert_eq!(tree.stab(&point), vec!["face"]);
        assert_eq!(tree.stab(&point.parent(12)), vec!["face"]);
        assert_eq!(tree.mask(&face), vec!["face"]);
    }

    #[test]
    fn test_stab_same_level() {
        let mut tree = InsideTree::new();
        let cid = cell_at(48.846043, 2.336943, 15);
        tree.insert(&cid, 41);

        assert_eq!(tree.stab(&cid), vec![41]);
    }

    #[test]
    fn test_stab_collects_ancestors() {
        let mut tree = InsideTree::new();
        let cid = cell_at(48.846043, 2.336943, 15);
        tree.insert(&cid, 41);
        tree.insert(&cid.parent(8), 8);
        tree.insert(&cid.parent(3), 3);

        assert_eq!(sorted(tree.stab(&cid)), vec![3, 8, 41]);
        assert_eq!(sorted(tree.stab(&leaf(48.846043, 2.336943))), vec![3, 8, 41]);
    }

    #[test]
    fn test_stab_coarser_misses_finer_insert() {
        let mut tree = InsideTree::new();
        let cid = cell_at(48.846043, 2.336943, 15);
        tree.insert(&cid, 41);

        assert!(tree.stab(&cid.parent(10)).is_empty());
    }

    #[test]
    fn test_stab_excludes_children_of_cell() {
        let cell = Path::new(1, &[3, 1, 0]);

        let mut tree = InsideTree::new();
        tree.insert(&Path::new(1, &[3, 1, 0, CANONICAL_CHILD]), "canonical child");
        tree.insert(&Path::new(1, &[3, 1, 0, 1]), "other child");
        assert!(tree.stab(&cell).is_empty());

        tree.insert(&cell, "cell");
        assert_eq!(tree.stab(&cell), vec!["cell"]);
    }

    #[test]
    fn test_stab_stops_at_missing_child() {
        let mut tree = InsideTree::new();
        tree.insert(&Path::new(4, &[2]), "level 1");
        tree.insert(&Path::new(4, &[2, 2, 2, 2]), "level 4");

        // diverges from the populated path at level 2
        assert_eq!(tree.stab(&Path::new(4, &[2, 3, 2, 2])), vec!["level 1"]);
        assert_eq!(
            sorted(tree.stab(&Path::new(4, &[2, 2, 2, 2]))),
            vec!["level 1", "level 4"]
        );
    }

    #[test]
    fn test_stab_leaf_cell_stops_at_max_level() {
        let mut tree = InsideTree::new();
        let cell = leaf(-33.8688, 151.2093);
        tree.insert(&cell, 7);
        tree.insert(&cell.parent(29), 6);

        assert_eq!(sorted(tree.stab(&cell)), vec![6, 7]);
    }

    #[test]
    fn test_stab_other_face_is_empty() {
        let mut tree = InsideTree::new();
        let paris = cell_at(48.846043, 2.336943, 15);
        tree.insert(&paris, 41);

        let sydney = leaf(-33.8688, 151.2093);
        assert_ne!(CellAddress::face(&paris), CellAddress::face(&sydney));
        assert!(tree.stab(&sydney).is_empty());
    }

    #[test]
    fn test_mask_includes_descendants_excludes_ancestors() {
        let mut tree = InsideTree::new();
        let region = cell_at(48.846043, 2.336943, 12);
        tree.insert(&region.parent(5), "ancestor");
        tree.insert(&region, "self");
        tree.insert(&cell_at(48.846043, 2.336943, 20), "descendant");

        assert_eq!(
            sorted(tree.mask(&region)),
            vec!["descendant", "self"]
        );
    }

    #[test]
    fn test_mask_unvisited_region_is_empty() {
        let mut tree = InsideTree::new();
        tree.insert(&cell_at(48.846043, 2.336943, 15), 41);

        assert!(tree.mask(&cell_at(-33.8688, 151.2093, 10)).is_empty());

        let mut paths = InsideTree::new();
        paths.insert(&Path::new(0, &[1, 2, 3]), "populated");
        // sibling of a populated cell
        assert!(paths.mask(&Path::new(0, &[1, 2, 0])).is_empty());
        // below a populated cell
        assert!(paths.mask(&Path::new(0, &[1, 2, 3, 0])).is_empty());
        assert_eq!(paths.mask(&Path::new(0, &[1])), vec!["populated"]);
    }

    #[test]
    fn test_mask_face_returns_everything_on_face() {
        let mut tree = InsideTree::new();
        let a = cell_at(48.846043, 2.336943, 15);
        let b = cell_at(48.843366, 2.334117, 15);
        tree.insert(&a, 41);
        tree.insert(&b, 42);
        tree.insert(&a.parent(2), 2);

        let face = CellID::from_face(CellAddress::face(&a) as u64);
        assert_eq!(sorted(tree.mask(&face)), vec![2, 41, 42]);
    }

    #[test]
    fn test_duplicates_collapse_in_results() {
        let mut tree = InsideTree::new();
        let cid = cell_at(48.846043, 2.336943, 15);
        tree.insert(&cid, 41);
        tree.insert(&cid, 41);
        tree.insert(&cid.parent(9), 41);

        assert_eq!(tree.stab(&cid), vec![41]);
        assert_eq!(tree.mask(&cid.parent(9)), vec![41]);
        assert_eq!(tree.stats().value_count, 3);
    }

    #[test]
    fn test_insert_covering_clones_value() {
        let mut tree = InsideTree::new();
        let a = cell_at(48.846043, 2.336943, 15);
        let b = cell_at(48.843366, 2.334117, 15);
        tree.insert_covering([a, b], "building".to_string());

        assert_eq!(tree.stab(&a), vec!["building".to_string()]);
        assert_eq!(tree.stab(&b), vec!["building".to_string()]);
        assert_eq!(tree.mask(&a.parent(10)).len(), 1);
    }

    #[test]
    fn test_refs_borrow_from_tree() {
        let mut tree = InsideTree::new();
        let cid = cell_at(48.846043, 2.336943, 15);
        tree.insert(&cid, "a".to_string());

        let refs = tree.stab_refs(&cid);
        assert_eq!(refs, vec![&"a".to_string()]);
        let refs = tree.mask_refs(&cid);
        assert_eq!(refs.len(), 1);
    }
}
