//! Arena-backed skip list ordered by title.
//!
//! Records live in a `Vec` owned by the list; forward links are indices
//! into it. The header is a fixed array of links with no payload. Level 0
//! chains every record in ascending title order, each higher tier chains
//! the subset of records whose level reaches it.

use crate::record::{Record, RecordId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stacks_common::MAX_LEVEL;

/// Draw a skip height: count fair-coin successes, capped at `MAX_LEVEL - 1`.
pub fn random_level<R: Rng + ?Sized>(rng: &mut R) -> usize {
    let mut level = 0;
    while level < MAX_LEVEL - 1 && rng.gen_bool(0.5) {
        level += 1;
    }
    level
}

#[derive(Debug)]
struct Node {
    record: Record,
    /// `forward[l]` is the next node at tier `l`; length is `record.level + 1`.
    forward: Vec<Option<usize>>,
}

/// A probabilistic multi-level index over [`Record`]s.
///
/// Records enter only through [`crate::Catalog`], which validates them:
///
/// ```compile_fail
/// use stacks_catalog::{Record, SkipList};
/// let mut list = SkipList::new();
/// list.insert(Record::new("Alpha".into(), "Anon".into(), vec![], 0));
/// ```
#[derive(Debug)]
pub struct SkipList {
    nodes: Vec<Node>,
    head: [Option<usize>; MAX_LEVEL],
    max_level: usize,
    rng: StdRng,
}

impl Default for SkipList {
    fn default() -> Self {
        Self::new()
    }
}

impl SkipList {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Use a caller-supplied coin source (seed it for reproducible heights).
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            nodes: Vec::new(),
            head: [None; MAX_LEVEL],
            max_level: 0,
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Highest tier any record has reached. Never shrinks.
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Link following `at` on `level`; `None` for `at` means the header.
    pub(crate) fn next(&self, at: Option<usize>, level: usize) -> Option<usize> {
        match at {
            None => self.head[level],
            Some(idx) => self.nodes[idx].forward[level],
        }
    }

    fn set_next(&mut self, at: Option<usize>, level: usize, to: Option<usize>) {
        match at {
            None => self.head[level] = to,
            Some(idx) => self.nodes[idx].forward[level] = to,
        }
    }

    pub(crate) fn title_at(&self, idx: usize) -> &str {
        &self.nodes[idx].record.title
    }

    /// Splice `record` in at a freshly drawn height. Callers validate the
    /// record first; see [`crate::Catalog::add`].
    pub(crate) fn insert(&mut self, record: Record) -> RecordId {
        let level = random_level(&mut self.rng);
        self.insert_at_level(record, level)
    }

    /// Splice `record` in with a fixed height.
    pub(crate) fn insert_at_level(&mut self, mut record: Record, level: usize) -> RecordId {
        debug_assert!(level < MAX_LEVEL);

        // Last node before the insertion point on each tier; `None` is the header.
        let mut update: [Option<usize>; MAX_LEVEL] = [None; MAX_LEVEL];
        let mut x = None;
        for lvl in (0..=self.max_level).rev() {
            while let Some(n) = self.next(x, lvl) {
                if self.nodes[n].record.title < record.title {
                    x = Some(n);
                } else {
                    break;
                }
            }
            update[lvl] = x;
        }

        if level > self.max_level {
            self.max_level = level;
        }

        let idx = self.nodes.len();
        let forward = (0..=level).map(|lvl| self.next(update[lvl], lvl)).collect();
        record.level = level;
        self.nodes.push(Node { record, forward });
        for (lvl, &prev) in update.iter().enumerate().take(level + 1) {
            self.set_next(prev, lvl, Some(idx));
        }

        RecordId(idx)
    }

    /// The last node whose title is strictly less than `title`, found by
    /// descending from the top tier. `None` means the header.
    pub(crate) fn predecessor(&self, title: &str) -> Option<usize> {
        let mut x = None;
        for lvl in (0..=self.max_level).rev() {
            while let Some(n) = self.next(x, lvl) {
                if self.title_at(n) < title {
                    x = Some(n);
                } else {
                    break;
                }
            }
        }
        x
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.nodes.get(id.0).map(|n| &n.record)
    }

    /// Mutable access for in-place state changes. Title and genres stay
    /// read-only outside this crate.
    pub fn get_mut(&mut self, id: RecordId) -> Option<&mut Record> {
        self.nodes.get_mut(id.0).map(|n| &mut n.record)
    }

    /// Level-0 traversal in title order.
    pub fn iter(&self) -> Iter<'_> {
        self.iter_level(0)
    }

    /// Traversal of a single tier's chain.
    pub fn iter_level(&self, level: usize) -> Iter<'_> {
        Iter {
            list: self,
            level,
            cursor: self.head.get(level).copied().flatten(),
        }
    }

    /// Number of records linked into `level`.
    pub fn level_len(&self, level: usize) -> usize {
        self.iter_level(level).count()
    }

    /// Visit every record mutably in level-0 order.
    pub fn for_each_mut<F: FnMut(&mut Record)>(&mut self, mut visit: F) {
        let mut cursor = self.head[0];
        while let Some(idx) = cursor {
            visit(&mut self.nodes[idx].record);
            cursor = self.nodes[idx].forward[0];
        }
    }

    /// `histogram[k]` is the number of records whose level is at least `k`.
    pub fn height_histogram(&self) -> Vec<usize> {
        let mut histogram = vec![0usize; self.max_level + 1];
        for node in &self.nodes {
            for slot in histogram.iter_mut().take(node.record.level + 1) {
                *slot += 1;
            }
        }
        histogram
    }
}

/// Iterator over one tier of a [`SkipList`].
#[derive(Debug)]
pub struct Iter<'a> {
    list: &'a SkipList,
    level: usize,
    cursor: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (RecordId, &'a Record);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = &self.list.nodes[idx];
        self.cursor = node.forward[self.level];
        Some((RecordId(idx), &node.record))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use stacks_common::Status;

    fn rec(title: &str) -> Record {
        Record::new(title.into(), "Anon".into(), vec!["Fiction".into()], 0)
    }

    fn seeded() -> SkipList {
        SkipList::with_rng(StdRng::seed_from_u64(7))
    }

    fn titles(list: &SkipList, level: usize) -> Vec<String> {
        list.iter_level(level)
            .map(|(_, r)| r.title.clone())
            .collect()
    }

    fn assert_ordered(list: &SkipList) {
        for level in 0..=list.max_level() {
            let chain = titles(list, level);
            for pair in chain.windows(2) {
                assert!(
                    pair[0] < pair[1],
                    "level {}: '{}' should precede '{}'",
                    level,
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    #[test]
    fn test_random_level_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10_000 {
            assert!(random_level(&mut rng) < MAX_LEVEL);
        }
    }

    #[test]
    fn test_empty_list() {
        let list = seeded();
        assert!(list.is_empty());
        assert_eq!(list.max_level(), 0);
        assert_eq!(list.iter().count(), 0);
        assert_eq!(list.predecessor("anything"), None);
    }

    #[test]
    fn test_insert_keeps_level0_sorted() {
        let mut list = seeded();
        for t in ["Mango", "Apple", "Kiwi", "Banana", "Zucchini", "Cherry"] {
            list.insert(rec(t));
        }
        assert_eq!(list.len(), 6);
        assert_eq!(
            titles(&list, 0),
            vec!["Apple", "Banana", "Cherry", "Kiwi", "Mango", "Zucchini"]
        );
    }

    #[test]
    fn test_every_level_is_strictly_increasing() {
        let mut list = seeded();
        let mut keys: Vec<u32> = (0..2_000).collect();
        keys.shuffle(&mut StdRng::seed_from_u64(99));
        for k in keys {
            list.insert(rec(&format!("title-{:06}", k)));
        }
        assert_eq!(list.len(), 2_000);
        assert_ordered(&list);
    }

    #[test]
    fn test_levels_have_no_gaps() {
        let mut list = seeded();
        for i in 0..500 {
            list.insert(rec(&format!("book {:04}", i)));
        }
        for level in 1..=list.max_level() {
            for (id, record) in list.iter_level(level) {
                assert!(record.level() >= level);
                // Present on every lower tier too.
                for lower in 0..level {
                    assert!(list.iter_level(lower).any(|(other, _)| other == id));
                }
            }
        }
    }

    #[test]
    fn test_max_level_covers_every_record() {
        let mut list = seeded();
        for i in 0..1_000 {
            list.insert(rec(&format!("{:05}", i)));
        }
        let highest = list.iter().map(|(_, r)| r.level()).max().unwrap();
        assert_eq!(list.max_level(), highest);
    }

    #[test]
    fn test_fixed_level_splicing() {
        let mut list = seeded();
        list.insert_at_level(rec("B"), 3);
        list.insert_at_level(rec("D"), 1);
        list.insert_at_level(rec("A"), 0);
        list.insert_at_level(rec("C"), 2);

        assert_eq!(list.max_level(), 3);
        assert_eq!(titles(&list, 0), vec!["A", "B", "C", "D"]);
        assert_eq!(titles(&list, 1), vec!["B", "C", "D"]);
        assert_eq!(titles(&list, 2), vec!["B", "C"]);
        assert_eq!(titles(&list, 3), vec!["B"]);
        assert_eq!(list.level_len(4), 0);
        assert_eq!(list.height_histogram(), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_predecessor() {
        let mut list = seeded();
        for t in ["Alpha", "Beta", "Gamma"] {
            list.insert(rec(t));
        }
        assert_eq!(list.predecessor("Alpha"), None);
        let pred = list.predecessor("Beta").unwrap();
        assert_eq!(list.title_at(pred), "Alpha");
        let pred = list.predecessor("Zeta").unwrap();
        assert_eq!(list.title_at(pred), "Gamma");
    }

    #[test]
    fn test_duplicate_titles_are_tolerated() {
        let mut list = seeded();
        let first = list.insert(rec("Same"));
        let second = list.insert(rec("Same"));
        assert_eq!(list.len(), 2);
        // Strict less-than descent places the newer duplicate first.
        let order: Vec<RecordId> = list.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![second, first]);
    }

    #[test]
    fn test_for_each_mut_visits_all_in_order() {
        let mut list = seeded();
        for t in ["c", "a", "b"] {
            list.insert(rec(t));
        }
        let mut seen = Vec::new();
        list.for_each_mut(|r| {
            r.status = Status::Borrowed;
            seen.push(r.title.clone());
        });
        assert_eq!(seen, vec!["a", "b", "c"]);
        assert!(list.iter().all(|(_, r)| r.status == Status::Borrowed));
    }

    #[test]
    fn test_height_distribution_is_geometric() {
        let mut list = seeded();
        let n = 20_000;
        for i in 0..n {
            list.insert(rec(&format!("{:06}", i)));
        }
        let histogram = list.height_histogram();
        assert_eq!(histogram[0], n);
        for (k, &reached) in histogram.iter().enumerate().take(5).skip(1) {
            let observed = reached as f64 / n as f64;
            let expected = 0.5f64.powi(k as i32);
            assert!(
                (observed - expected).abs() < expected * 0.15,
                "level {}: observed {:.4}, expected {:.4}",
                k,
                observed,
                expected
            );
        }
    }
}
