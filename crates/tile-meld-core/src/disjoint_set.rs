//! Union-find over dense indices `0..n`.

/// Disjoint-set forest with path compression and union by rank.
#[derive(Clone, Debug)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    /// `n` singleton sets, one per index.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of the set containing `i`.
    pub fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = i;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merge the sets containing `a` and `b`.
    ///
    /// Returns `false` if they were already the same set.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] = self.rank[ra].saturating_add(1);
            }
        }
        true
    }

    pub fn same_set(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Current partition. Groups are ordered by their smallest member and
    /// members are ascending.
    pub fn groups(&mut self) -> Vec<Vec<usize>> {
        let n = self.len();
        let mut slot_of_root: Vec<Option<usize>> = vec![None; n];
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for i in 0..n {
            let root = self.find(i);
            let slot = *slot_of_root[root].get_or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(i);
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_as_singletons() {
        let mut ds = DisjointSet::new(4);
        assert_eq!(ds.groups(), vec![vec![0], vec![1], vec![2], vec![3]]);
        assert!(!ds.same_set(0, 1));
    }

    #[test]
    fn union_is_transitive() {
        let mut ds = DisjointSet::new(6);
        assert!(ds.union(0, 3));
        assert!(ds.union(3, 5));
        assert!(!ds.union(5, 0));
        assert!(ds.union(1, 2));
        assert!(ds.same_set(0, 5));
        assert!(!ds.same_set(0, 1));
        assert_eq!(ds.groups(), vec![vec![0, 3, 5], vec![1, 2], vec![4]]);
    }

    #[test]
    fn long_chain_compresses() {
        let n = 1000;
        let mut ds = DisjointSet::new(n);
        for i in 1..n {
            ds.union(i - 1, i);
        }
        let root = ds.find(n - 1);
        assert!((0..n).all(|i| ds.find(i) == root));
        assert_eq!(ds.groups().len(), 1);
    }

    #[test]
    fn empty_set_has_no_groups() {
        let mut ds = DisjointSet::new(0);
        assert!(ds.is_empty());
        assert!(ds.groups().is_empty());
    }
}
