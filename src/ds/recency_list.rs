//! Doubly linked recency list backed by a [`NodeArena`].
//!
//! Nodes live in the arena and link to each other by [`NodeId`], so callers
//! can hold a stable handle to a node and later splice it to the front or
//! remove it in O(1) without any pointer aliasing. The front is the most
//! recently used position; the back is the least recently used.
//!
//! ```text
//!   arena (NodeArena<Node<T>>)
//!   ┌────────┬─────────────────────────────────────────────┐
//!   │ NodeId │ Node { value, prev, next }                  │
//!   ├────────┼─────────────────────────────────────────────┤
//!   │ id_1   │ { value: A, prev: None, next: Some(id_2) }  │
//!   │ id_2   │ { value: B, prev: Some(id_1), next: id_3 }  │
//!   │ id_3   │ { value: C, prev: Some(id_2), next: None }  │
//!   └────────┴─────────────────────────────────────────────┘
//!
//!   head (MRU) ─► [id_1] ◄──► [id_2] ◄──► [id_3] ◄── tail (LRU)
//! ```
//!
//! All mutators are O(1): `push_front`, `move_to_front`, `pop_back`,
//! `remove`. `debug_validate` walks the links in debug/test builds.

use crate::ds::node_arena::{NodeArena, NodeId};

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

/// Recency-ordered doubly linked list with stable [`NodeId`] handles.
#[derive(Debug)]
pub struct RecencyList<T> {
    arena: NodeArena<Node<T>>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

impl<T> RecencyList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            head: None,
            tail: None,
        }
    }

    /// Creates an empty list with reserved node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: NodeArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    /// Returns the number of nodes in the list.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns `true` if `id` is currently a node in this list.
    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id)
    }

    /// Returns the value at the front (most recent), if any.
    pub fn front(&self) -> Option<&T> {
        self.head
            .and_then(|id| self.arena.get(id).map(|node| &node.value))
    }

    /// Returns the value at the back (least recent), if any.
    pub fn back(&self) -> Option<&T> {
        self.tail
            .and_then(|id| self.arena.get(id).map(|node| &node.value))
    }

    /// Returns the handle of the back node, if any.
    pub fn back_id(&self) -> Option<NodeId> {
        self.tail
    }

    /// Returns the value for a node handle, if present.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.arena.get(id).map(|node| &node.value)
    }

    /// Returns a mutable reference to a node value, if present.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.arena.get_mut(id).map(|node| &mut node.value)
    }

    /// Inserts a new node at the front and returns its handle.
    pub fn push_front(&mut self, value: T) -> NodeId {
        let id = self.arena.insert(Node {
            value,
            prev: None,
            next: self.head,
        });
        if let Some(head) = self.head {
            if let Some(node) = self.arena.get_mut(head) {
                node.prev = Some(id);
            }
        } else {
            self.tail = Some(id);
        }
        self.head = Some(id);
        id
    }

    /// Removes and returns the back (least recent) value.
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.tail?;
        self.detach(id)?;
        self.arena.remove(id).map(|node| node.value)
    }

    /// Removes the node `id` from the list and returns its value.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        self.detach(id)?;
        self.arena.remove(id).map(|node| node.value)
    }

    /// Moves an existing node to the front; returns `false` if `id` is not
    /// present. A pure splice: the node is relinked, never reallocated.
    pub fn move_to_front(&mut self, id: NodeId) -> bool {
        if !self.arena.contains(id) {
            return false;
        }
        if Some(id) == self.head {
            return true;
        }
        self.detach(id);
        self.attach_front(id);
        true
    }

    /// Clears the list and frees all nodes.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    /// Returns an iterator from front (most recent) to back.
    pub fn iter(&self) -> RecencyIter<'_, T> {
        RecencyIter {
            list: self,
            current: self.head,
        }
    }

    fn detach(&mut self, id: NodeId) -> Option<()> {
        let (prev, next) = {
            let node = self.arena.get(id)?;
            (node.prev, node.next)
        };

        if let Some(prev_id) = prev {
            if let Some(prev_node) = self.arena.get_mut(prev_id) {
                prev_node.next = next;
            }
        } else {
            self.head = next;
        }

        if let Some(next_id) = next {
            if let Some(next_node) = self.arena.get_mut(next_id) {
                next_node.prev = prev;
            }
        } else {
            self.tail = prev;
        }

        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = None;
        }

        Some(())
    }

    fn attach_front(&mut self, id: NodeId) -> Option<()> {
        let old_head = self.head;
        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = old_head;
        } else {
            return None;
        }
        if let Some(old_head) = old_head {
            if let Some(head_node) = self.arena.get_mut(old_head) {
                head_node.prev = Some(id);
            }
        } else {
            self.tail = Some(id);
        }
        self.head = Some(id);
        Some(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate(&self) {
        if self.head.is_none() || self.tail.is_none() {
            assert!(self.head.is_none());
            assert!(self.tail.is_none());
            assert_eq!(self.len(), 0);
            return;
        }

        let mut seen = std::collections::HashSet::new();
        let mut count = 0usize;
        let mut current = self.head;
        let mut prev = None;

        while let Some(id) = current {
            assert!(seen.insert(id), "cycle in recency list");
            let node = self.arena.get(id).expect("linked node missing");
            assert_eq!(node.prev, prev);
            if node.next.is_none() {
                assert_eq!(self.tail, Some(id));
            }
            prev = Some(id);
            current = node.next;
            count += 1;
            assert!(count <= self.len());
        }

        assert_eq!(count, self.len());
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over values from front to back.
pub struct RecencyIter<'a, T> {
    list: &'a RecencyList<T>,
    current: Option<NodeId>,
}

impl<'a, T> Iterator for RecencyIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        Some(&node.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_front_orders_most_recent_first() {
        let mut list = RecencyList::new();
        list.push_front(1);
        list.push_front(2);
        list.push_front(3);

        let values: Vec<_> = list.iter().copied().collect();
        assert_eq!(values, vec![3, 2, 1]);
        assert_eq!(list.front(), Some(&3));
        assert_eq!(list.back(), Some(&1));
    }

    #[test]
    fn move_to_front_splices_without_removal() {
        let mut list = RecencyList::new();
        let a = list.push_front("a");
        let b = list.push_front("b");
        let c = list.push_front("c");

        assert!(list.move_to_front(a));
        let values: Vec<_> = list.iter().copied().collect();
        assert_eq!(values, vec!["a", "c", "b"]);
        assert_eq!(list.len(), 3);

        // Front node is a no-op move
        assert!(list.move_to_front(a));
        assert_eq!(list.front(), Some(&"a"));

        assert!(list.contains(b));
        assert!(list.contains(c));
        list.debug_validate();
    }

    #[test]
    fn pop_back_evicts_least_recent() {
        let mut list = RecencyList::new();
        list.push_front("old");
        list.push_front("new");

        assert_eq!(list.pop_back(), Some("old"));
        assert_eq!(list.pop_back(), Some("new"));
        assert_eq!(list.pop_back(), None);
        assert!(list.is_empty());
    }

    #[test]
    fn remove_middle_and_ends() {
        let mut list = RecencyList::new();
        let a = list.push_front("a");
        let b = list.push_front("b");
        let c = list.push_front("c");

        assert_eq!(list.remove(b), Some("b"));
        let values: Vec<_> = list.iter().copied().collect();
        assert_eq!(values, vec!["c", "a"]);

        assert_eq!(list.remove(c), Some("c"));
        assert_eq!(list.front(), Some(&"a"));
        assert_eq!(list.back(), Some(&"a"));

        assert_eq!(list.remove(a), Some("a"));
        assert!(list.is_empty());
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        list.debug_validate();
    }

    #[test]
    fn removed_handle_is_invalid() {
        let mut list = RecencyList::new();
        let id = list.push_front(1);
        list.remove(id);

        assert!(!list.contains(id));
        assert!(!list.move_to_front(id));
        assert_eq!(list.remove(id), None);
        assert_eq!(list.get(id), None);
    }

    #[test]
    fn get_mut_updates_value_in_place() {
        let mut list = RecencyList::new();
        let id = list.push_front(10);
        if let Some(value) = list.get_mut(id) {
            *value = 20;
        }
        assert_eq!(list.get(id), Some(&20));
    }

    #[test]
    fn clear_resets_state() {
        let mut list = RecencyList::new();
        list.push_front(1);
        list.push_front(2);
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.pop_back(), None);
        list.debug_validate();
    }

    #[test]
    fn validate_after_mixed_operations() {
        let mut list = RecencyList::new();
        let a = list.push_front(1);
        let b = list.push_front(2);
        list.push_front(3);
        list.move_to_front(a);
        list.remove(b);
        list.pop_back();
        list.debug_validate();
        assert_eq!(list.len(), 1);
    }
}
