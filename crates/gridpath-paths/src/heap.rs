//! Indexed binary min-heap used as the open set of the best-first searches.
//!
//! Entries are node indices keyed by `f`. A parallel position array maps
//! every node index to its heap slot, so an existing entry can be found
//! and its key lowered in O(log n).

/// Position value of a node that is not in the heap.
const ABSENT: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
struct HeapItem {
    node: usize,
    key: f32,
}

/// Binary min-heap over node indices `0..capacity` with decrease-key.
#[derive(Debug, Clone)]
pub struct IndexedHeap {
    heap: Vec<HeapItem>,
    pos: Vec<usize>,
}

impl IndexedHeap {
    /// Create an empty heap able to hold node indices `0..capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: Vec::new(),
            pos: vec![ABSENT; capacity],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Whether `node` is currently queued.
    #[inline]
    pub fn contains(&self, node: usize) -> bool {
        self.pos.get(node).is_some_and(|&p| p != ABSENT)
    }

    /// Current key of `node`, if queued.
    pub fn key(&self, node: usize) -> Option<f32> {
        match self.pos.get(node) {
            Some(&p) if p != ABSENT => Some(self.heap[p].key),
            _ => None,
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        for item in &self.heap {
            self.pos[item.node] = ABSENT;
        }
        self.heap.clear();
    }

    /// Insert `node` with `key`.
    ///
    /// Indices outside the capacity are ignored. A node that is already
    /// queued is routed through [`push_or_decrease`](Self::push_or_decrease)
    /// so it never appears twice.
    pub fn push(&mut self, node: usize, key: f32) {
        if node >= self.pos.len() {
            return;
        }
        if self.pos[node] != ABSENT {
            self.push_or_decrease(node, key);
            return;
        }
        self.heap.push(HeapItem { node, key });
        let i = self.heap.len() - 1;
        self.pos[node] = i;
        self.sift_up(i);
    }

    /// Remove and return the node with the smallest key.
    pub fn pop_min(&mut self) -> Option<usize> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let best = self.heap.pop()?;
        self.pos[best.node] = ABSENT;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(best.node)
    }

    /// Insert `node`, or lower its key if it is queued with a larger one.
    ///
    /// Keys are never raised: a queued node with a key `<= new_key` is
    /// left untouched.
    pub fn push_or_decrease(&mut self, node: usize, new_key: f32) {
        let Some(&p) = self.pos.get(node) else {
            return;
        };
        if p == ABSENT {
            self.push(node, new_key);
        } else if new_key < self.heap[p].key {
            self.heap[p].key = new_key;
            self.sift_up(p);
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        self.pos[self.heap[a].node] = a;
        self.pos[self.heap[b].node] = b;
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.heap[i].key < self.heap[parent].key {
                self.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;
            if left < n && self.heap[left].key < self.heap[smallest].key {
                smallest = left;
            }
            if right < n && self.heap[right].key < self.heap[smallest].key {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.swap(i, smallest);
            i = smallest;
        }
    }

    /// Verify the heap property and the position index.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        for (i, item) in self.heap.iter().enumerate() {
            assert_eq!(self.pos[item.node], i, "position index out of sync");
            for child in [2 * i + 1, 2 * i + 2] {
                if child < self.heap.len() {
                    assert!(self.heap[i].key <= self.heap[child].key, "heap order violated");
                }
            }
        }
        let queued = self.pos.iter().filter(|&&p| p != ABSENT).count();
        assert_eq!(queued, self.heap.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn pop_on_empty_returns_none() {
        let mut h = IndexedHeap::new(4);
        assert!(h.is_empty());
        assert_eq!(h.pop_min(), None);
    }

    #[test]
    fn pops_in_key_order() {
        let mut h = IndexedHeap::new(6);
        for (node, key) in [(0, 5.0), (1, 1.0), (2, 3.0), (3, 4.0), (4, 2.0)] {
            h.push(node, key);
            h.check_invariants();
        }
        let order: Vec<_> = std::iter::from_fn(|| h.pop_min()).collect();
        assert_eq!(order, vec![1, 4, 2, 3, 0]);
    }

    #[test]
    fn decrease_key_moves_entry_up() {
        let mut h = IndexedHeap::new(4);
        h.push(0, 1.0);
        h.push(1, 2.0);
        h.push(2, 3.0);
        h.push_or_decrease(2, 0.5);
        h.check_invariants();
        assert_eq!(h.key(2), Some(0.5));
        assert_eq!(h.pop_min(), Some(2));
    }

    #[test]
    fn push_or_decrease_never_increases() {
        let mut h = IndexedHeap::new(4);
        h.push(0, 1.0);
        h.push_or_decrease(0, 9.0);
        assert_eq!(h.key(0), Some(1.0));
        assert_eq!(h.len(), 1);
        // Absent nodes are inserted.
        h.push_or_decrease(3, 2.0);
        assert!(h.contains(3));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn duplicate_push_keeps_single_entry() {
        let mut h = IndexedHeap::new(2);
        h.push(1, 4.0);
        h.push(1, 2.0);
        assert_eq!(h.len(), 1);
        assert_eq!(h.key(1), Some(2.0));
        h.check_invariants();
    }

    #[test]
    fn out_of_range_nodes_are_ignored() {
        let mut h = IndexedHeap::new(2);
        h.push(7, 1.0);
        h.push_or_decrease(9, 1.0);
        assert!(h.is_empty());
        assert!(!h.contains(7));
        assert_eq!(h.key(7), None);
    }

    #[test]
    fn clear_resets_positions() {
        let mut h = IndexedHeap::new(3);
        h.push(0, 1.0);
        h.push(2, 1.0);
        h.clear();
        assert!(h.is_empty());
        assert!(!h.contains(0));
        h.push(0, 3.0);
        h.check_invariants();
    }

    #[test]
    fn random_operations_keep_heap_sorted() {
        let mut rng = rand::rng();
        let n = 200;
        let mut h = IndexedHeap::new(n);
        let mut keys = vec![f32::INFINITY; n];
        for _ in 0..1000 {
            let node = rng.random_range(0..n);
            let key: f32 = rng.random_range(0.0..100.0);
            h.push_or_decrease(node, key);
            keys[node] = keys[node].min(key);
            assert_eq!(h.key(node), Some(keys[node]));
            if rng.random_range(0..4u32) == 0 {
                if let Some(popped) = h.pop_min() {
                    keys[popped] = f32::INFINITY;
                }
            }
            h.check_invariants();
        }
        let mut last = f32::NEG_INFINITY;
        while let Some(node) = h.pop_min() {
            assert!(keys[node] >= last);
            last = keys[node];
        }
    }
}
