//! Recency Index Module
//!
//! Doubly linked list of keys stored in a slot arena and linked by index,
//! giving O(1) move-to-front, O(1) removal and O(1) pop of the least
//! recently used key.
//!
//! ```text
//!   head (MRU) ─► [n3] ◄──► [n1] ◄──► [n0] ◄── tail (LRU)
//! ```

// == Node Handle ==
/// Stable handle to a node in the index.
///
/// Valid until the node is removed; the slot may then be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node {
    key: String,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency Index ==
/// Tracks key access order for LRU eviction.
///
/// - Front = Most recently used
/// - Back = Least recently used
#[derive(Debug, Default)]
pub struct RecencyIndex {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl RecencyIndex {
    // == Constructor ==
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty index with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    // == Push Front ==
    /// Inserts a key at the most-recently-used position.
    pub fn push_front(&mut self, key: String) -> NodeId {
        let node = Node {
            key,
            prev: None,
            next: self.head,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        match self.head {
            Some(old_head) => self.node_mut(old_head).prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.len += 1;
        NodeId(idx)
    }

    // == Touch ==
    /// Moves an existing node to the front.
    ///
    /// Returns false if `id` does not refer to a live node.
    pub fn touch(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if self.head == Some(id.0) {
            return true;
        }
        self.detach(id.0);
        self.attach_front(id.0);
        true
    }

    // == Remove ==
    /// Unlinks a node and returns its key.
    pub fn remove(&mut self, id: NodeId) -> Option<String> {
        if !self.contains(id) {
            return None;
        }
        self.detach(id.0);
        let node = self.slots[id.0].take()?;
        self.free.push(id.0);
        self.len -= 1;
        Some(node.key)
    }

    // == Pop Back ==
    /// Removes and returns the least recently used key.
    pub fn pop_back(&mut self) -> Option<String> {
        let tail = self.tail?;
        self.remove(NodeId(tail))
    }

    /// Returns true if `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id.0), Some(Some(_)))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Iteration ==
    /// Iterates keys from most to least recently used.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            index: self,
            current: self.head,
        }
    }

    fn node(&self, idx: usize) -> &Node {
        self.slots[idx]
            .as_ref()
            .unwrap_or_else(|| unreachable!("recency link points at free slot {idx}"))
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node {
        self.slots[idx]
            .as_mut()
            .unwrap_or_else(|| unreachable!("recency link points at free slot {idx}"))
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.node(idx);
            (node.prev, node.next)
        };

        match prev {
            Some(p) => self.node_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev = prev,
            None => self.tail = prev,
        }

        let node = self.node_mut(idx);
        node.prev = None;
        node.next = None;
    }

    fn attach_front(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let node = self.node_mut(idx);
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(h) => self.node_mut(h).prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    #[cfg(test)]
    fn validate_links(&self) {
        let mut count = 0;
        let mut prev = None;
        let mut current = self.head;
        while let Some(idx) = current {
            let node = self.node(idx);
            assert_eq!(node.prev, prev);
            prev = Some(idx);
            current = node.next;
            count += 1;
            assert!(count <= self.len);
        }
        assert_eq!(self.tail, prev);
        assert_eq!(count, self.len);
    }
}

/// Iterator over keys from front (MRU) to back (LRU).
pub struct Iter<'a> {
    index: &'a RecencyIndex,
    current: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.current?;
        let node = self.index.node(idx);
        self.current = node.next;
        Some(node.key.as_str())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn keys(index: &RecencyIndex) -> Vec<&str> {
        index.iter().collect()
    }

    #[test]
    fn test_new_is_empty() {
        let index = RecencyIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.iter().next(), None);
        index.validate_links();
    }

    #[test]
    fn test_push_front_orders_mru_first() {
        let mut index = RecencyIndex::new();
        index.push_front("a".to_string());
        index.push_front("b".to_string());
        index.push_front("c".to_string());

        assert_eq!(keys(&index), vec!["c", "b", "a"]);
        assert_eq!(index.pop_back(), Some("a".to_string()));
        assert_eq!(keys(&index), vec!["c", "b"]);
        index.validate_links();
    }

    #[test]
    fn test_touch_moves_to_front() {
        let mut index = RecencyIndex::new();
        let a = index.push_front("a".to_string());
        index.push_front("b".to_string());
        index.push_front("c".to_string());

        assert!(index.touch(a));

        assert_eq!(keys(&index), vec!["a", "c", "b"]);
        assert_eq!(index.pop_back(), Some("b".to_string()));
        index.validate_links();
    }

    #[test]
    fn test_touch_head_and_tail() {
        let mut index = RecencyIndex::new();
        let a = index.push_front("a".to_string());
        let b = index.push_front("b".to_string());

        assert!(index.touch(b));
        assert_eq!(keys(&index), vec!["b", "a"]);
        assert!(index.touch(a));
        assert_eq!(keys(&index), vec!["a", "b"]);
        index.validate_links();
    }

    #[test]
    fn test_remove_middle() {
        let mut index = RecencyIndex::new();
        index.push_front("a".to_string());
        let b = index.push_front("b".to_string());
        index.push_front("c".to_string());

        assert_eq!(index.remove(b), Some("b".to_string()));
        assert_eq!(index.len(), 2);
        assert!(!index.contains(b));
        assert_eq!(keys(&index), vec!["c", "a"]);
        index.validate_links();
    }

    #[test]
    fn test_stale_handle_is_rejected() {
        let mut index = RecencyIndex::new();
        let a = index.push_front("a".to_string());
        index.remove(a);

        assert!(!index.touch(a));
        assert_eq!(index.remove(a), None);
    }

    #[test]
    fn test_pop_back_drains_in_lru_order() {
        let mut index = RecencyIndex::new();
        for key in ["a", "b", "c", "d"] {
            index.push_front(key.to_string());
        }

        assert_eq!(index.pop_back(), Some("a".to_string()));
        assert_eq!(index.pop_back(), Some("b".to_string()));
        assert_eq!(index.pop_back(), Some("c".to_string()));
        assert_eq!(index.pop_back(), Some("d".to_string()));
        assert_eq!(index.pop_back(), None);
        index.validate_links();
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut index = RecencyIndex::with_capacity(2);
        let a = index.push_front("a".to_string());
        index.push_front("b".to_string());
        index.remove(a);
        let c = index.push_front("c".to_string());

        assert_eq!(c, a);
        assert!(index.contains(c));
        assert_eq!(keys(&index), vec!["c", "b"]);
        index.validate_links();
    }
}
