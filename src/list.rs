use core::fmt;

/// Stable handle to a node stored in a [`List`].
///
/// A handle stays valid until its node is removed. Slots of removed nodes are
/// reused, so a handle must not be kept after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    #[cfg(test)]
    fn index(self) -> usize {
        self.0
    }
}

/// A node in the doubly linked list.
///
/// Contains a value and the handles of the previous and next nodes.
struct Node<T> {
    val: T,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

/// A doubly linked list whose nodes live in a slot arena.
///
/// Nodes are linked by [`NodeId`] rather than by pointer, so the list owns every
/// node outright and callers (such as a key index) only ever hold plain handles.
/// All positional operations are O(1); iteration is O(n).
///
/// ```text
///   slots: [ Some(B) | None | Some(A) | Some(C) ]      free: [1]
///
///   head ─► [2:A] ◄──► [0:B] ◄──► [3:C] ◄── tail
/// ```
pub(crate) struct List<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl<T> List<T> {
    /// Creates an empty list with room for `cap` nodes before reallocating.
    pub(crate) fn with_capacity(cap: usize) -> List<T> {
        List {
            slots: Vec::with_capacity(cap),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Returns the current number of items in the list.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list contains no items.
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub(crate) fn front(&self) -> Option<NodeId> {
        self.head
    }

    #[inline]
    pub(crate) fn back(&self) -> Option<NodeId> {
        self.tail
    }

    /// Returns true if `id` refers to a live node.
    #[inline]
    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(|node| &node.val)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_mut(id).map(|node| &mut node.val)
    }

    /// Returns the handle of the node following `id`.
    pub(crate) fn next_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.next)
    }

    /// Adds a value to the front of the list and returns its handle.
    pub(crate) fn push_front(&mut self, v: T) -> NodeId {
        let id = self.alloc(Node {
            val: v,
            prev: None,
            next: None,
        });
        self.attach_front(id);
        self.len += 1;
        id
    }

    /// Removes the node `id` and returns its value.
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<T> {
        self.detach(id)?;
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        self.len -= 1;
        Some(node.val)
    }

    /// Removes the last item from the list.
    pub(crate) fn remove_last(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.remove(tail)
    }

    /// Moves a node to the front of the list; returns `false` if `id` is not live.
    pub(crate) fn move_to_front(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if self.head == Some(id) {
            return true;
        }
        self.detach(id);
        self.attach_front(id);
        true
    }

    /// Moves a node to the back of the list; returns `false` if `id` is not live.
    pub(crate) fn move_to_back(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if self.tail == Some(id) {
            return true;
        }
        self.detach(id);
        self.attach_back(id);
        true
    }

    /// Moves `id` so that it sits immediately before `mark`.
    ///
    /// Moving a node before itself is a no-op. Returns `false` if either handle
    /// is not live.
    pub(crate) fn move_before(&mut self, id: NodeId, mark: NodeId) -> bool {
        if !self.contains(id) || !self.contains(mark) {
            return false;
        }
        if id == mark || self.next_of(id) == Some(mark) {
            return true;
        }
        self.detach(id);
        self.attach_before(id, mark);
        true
    }

    /// Iterates front to back, yielding each node's handle and value.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
            remaining: self.len,
        }
    }

    /// Clears the list, removing all entries.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Walks the links from head to tail and checks that they agree with `len`.
    pub(crate) fn verify_links(&self) -> Result<(), String> {
        let mut count = 0usize;
        let mut prev = None;
        let mut current = self.head;
        while let Some(id) = current {
            let node = self
                .node(id)
                .ok_or_else(|| format!("link to vacant slot {}", id.0))?;
            if node.prev != prev {
                return Err(format!("slot {} has a stale back link", id.0));
            }
            count += 1;
            if count > self.len {
                return Err(format!("walked {} nodes but len is {}", count, self.len));
            }
            prev = Some(id);
            current = node.next;
        }
        if prev != self.tail {
            return Err("tail does not match the last reachable node".to_string());
        }
        if count != self.len {
            return Err(format!("walked {} nodes but len is {}", count, self.len));
        }
        Ok(())
    }

    #[inline]
    fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    fn alloc(&mut self, node: Node<T>) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Unlinks a node from its neighbours without freeing its slot.
    fn detach(&mut self, id: NodeId) -> Option<()> {
        let (prev, next) = {
            let node = self.node(id)?;
            (node.prev, node.next)
        };

        match prev {
            Some(prev_id) => {
                if let Some(prev_node) = self.node_mut(prev_id) {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_id) => {
                if let Some(next_node) = self.node_mut(next_id) {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = None;
        }
        Some(())
    }

    fn attach_front(&mut self, id: NodeId) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(head) => {
                if let Some(head_node) = self.node_mut(head) {
                    head_node.prev = Some(id);
                }
            }
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    fn attach_back(&mut self, id: NodeId) {
        let old_tail = self.tail;
        if let Some(node) = self.node_mut(id) {
            node.next = None;
            node.prev = old_tail;
        }
        match old_tail {
            Some(tail) => {
                if let Some(tail_node) = self.node_mut(tail) {
                    tail_node.next = Some(id);
                }
            }
            None => self.head = Some(id),
        }
        self.tail = Some(id);
    }

    /// Links a detached node in front of `mark`.
    fn attach_before(&mut self, id: NodeId, mark: NodeId) {
        let prev = self.node(mark).and_then(|node| node.prev);
        if let Some(node) = self.node_mut(id) {
            node.prev = prev;
            node.next = Some(mark);
        }
        if let Some(mark_node) = self.node_mut(mark) {
            mark_node.prev = Some(id);
        }
        match prev {
            Some(prev_id) => {
                if let Some(prev_node) = self.node_mut(prev_id) {
                    prev_node.next = Some(id);
                }
            }
            None => self.head = Some(id),
        }
    }
}

/// Front-to-back iterator over a [`List`].
pub(crate) struct Iter<'a, T> {
    list: &'a List<T>,
    current: Option<NodeId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.current?;
        let node = self.list.node(id)?;
        self.current = node.next;
        self.remaining -= 1;
        Some((id, &node.val))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl<T> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("length", &self.len)
            .field("slots", &self.slots.len())
            .finish()
    }
}
