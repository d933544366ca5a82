//! Node (C2) and Node Pool (C3).
//!
//! Grounded on the `SPS_t`/`SPSPool_t` shapes in
//! `examples/original_source/sk459204/parallel/main.c` (a slot holding a
//! closure, a parent link, and a refcount, recycled through a free
//! list) and on the teacher's index-handle idiom in
//! `frontier/no_dup.rs`'s `NodeId`/recycle bin. The pool's
//! `parking_lot::Mutex` guards only slot storage (closure, parent link,
//! free list) — exactly `SPSPool_t::mutex`'s job in the source, which
//! never touches `parent_to`. The refcount itself is the source's
//! `atomic_int parent_to`, ported as a freestanding `AtomicUsize` shared
//! via the handle's `Arc` so increment/decrement never take the pool's
//! mutex at all.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::sumset::Sumset;

/// A stable handle into a [`NodePool`], carrying its own lock-free
/// refcount. Indices, unlike addresses, don't change meaning when the
/// backing storage grows; the `Arc<AtomicUsize>` is the handle's share
/// of the node's `parent_to` counter, cloned out once at allocation
/// time so later refcount operations never resolve through the pool.
#[derive(Debug, Clone)]
pub struct NodeHandle {
    index: usize,
    refcount: Arc<AtomicUsize>,
}

impl NodeHandle {
    /// Atomically adds `by` to this node's refcount, mirroring the
    /// source's `atomic_fetch_add(&a->parent_to, by)`.
    pub fn increment(&self, by: usize) {
        self.refcount.fetch_add(by, Ordering::AcqRel);
    }

    /// Atomically decrements by one, testing the prior value the way
    /// `check_if_free` does: `atomic_fetch_sub(&a->parent_to, 1) == 1`.
    /// Returns `true` iff this decrement is the one that brought the
    /// count to zero, i.e. the caller now owns the only reference and
    /// must reclaim the node.
    pub(crate) fn release_one(&self) -> bool {
        let prior = self.refcount.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(prior >= 1, "node refcount underflow: double release of a handle");
        prior == 1
    }
}

impl PartialEq for NodeHandle {
    /// Handle identity is the slot index; two clones of the same handle
    /// (sharing the same `Arc`) always compare equal, and so would two
    /// handles that happened to carry separately-allocated `Arc`s but
    /// the same index — which never occurs, since a slot is recycled
    /// only after every outstanding handle to it has been released.
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for NodeHandle {}

impl Hash for NodeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

struct Slot {
    sumset: Sumset,
    parent: Option<NodeHandle>,
    next_free: Option<usize>,
}

struct PoolInner {
    slots: Vec<Slot>,
    free_head: Option<usize>,
}

impl PoolInner {
    fn link_free_range(&mut self, start: usize, end: usize) {
        for i in start..end {
            self.slots[i].next_free = Some(i + 1);
        }
        if end > start {
            self.slots[end - 1].next_free = None;
        }
        self.free_head = Some(start);
    }
}

/// Mutex-protected slab allocator for pool-backed search-tree nodes.
/// The mutex's only job is slot storage and the free list; refcount
/// operations live on [`NodeHandle`] and never touch it.
pub struct NodePool {
    inner: Mutex<PoolInner>,
}

impl NodePool {
    pub fn new(initial_capacity: usize) -> Self {
        let capacity = initial_capacity.max(1);
        let mut slots = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            slots.push(Slot { sumset: Sumset::default(), parent: None, next_free: None });
        }
        let mut inner = PoolInner { slots, free_head: None };
        inner.link_free_range(0, capacity);
        NodePool { inner: Mutex::new(inner) }
    }

    /// Allocates a node, growing the slab (doubling) if the free list is
    /// exhausted. The returned handle owns a freshly minted
    /// `AtomicUsize` seeded with `refcount` — never a recycled one, so
    /// a reused slot starts every new tenant's count from scratch.
    pub fn alloc(&self, sumset: Sumset, parent: Option<NodeHandle>, refcount: usize) -> NodeHandle {
        let mut inner = self.inner.lock();
        if inner.free_head.is_none() {
            let old_len = inner.slots.len();
            let new_len = old_len * 2;
            inner.slots.reserve(new_len - old_len);
            for _ in old_len..new_len {
                inner.slots.push(Slot { sumset: Sumset::default(), parent: None, next_free: None });
            }
            inner.link_free_range(old_len, new_len);
        }

        let index = inner.free_head.expect("free list replenished above");
        inner.free_head = inner.slots[index].next_free;
        inner.slots[index] = Slot { sumset, parent, next_free: None };
        NodeHandle { index, refcount: Arc::new(AtomicUsize::new(refcount)) }
    }

    /// Returns a slot to the free list. Only ever called by the
    /// reclaimer once a handle's refcount has hit zero. Returns the
    /// node's parent handle so the reclaimer can continue the cascade.
    pub(crate) fn free(&self, handle: &NodeHandle) -> Option<NodeHandle> {
        let mut inner = self.inner.lock();
        let parent = inner.slots[handle.index].parent.clone();
        inner.slots[handle.index].next_free = inner.free_head;
        inner.free_head = Some(handle.index);
        parent
    }

    /// A clone of the node's closure. Cloned rather than borrowed under
    /// the lock so callers can do CPU work (e.g. enumerating admissible
    /// elements) without holding the pool mutex.
    pub fn sumset(&self, handle: &NodeHandle) -> Sumset {
        self.inner.lock().slots[handle.index].sumset.clone()
    }

    pub fn sum(&self, handle: &NodeHandle) -> usize {
        self.inner.lock().slots[handle.index].sumset.sum()
    }

    pub fn parent(&self, handle: &NodeHandle) -> Option<NodeHandle> {
        self.inner.lock().slots[handle.index].parent.clone()
    }

    /// Reconstructs the ordered element list from the seed through
    /// `handle`, by walking the parent chain: every node above a root
    /// was created by adding exactly one element to its parent, so the
    /// chain of `last()` values, read root-to-leaf, is the sequence of
    /// elements chosen since the seed.
    pub fn elements(&self, handle: &NodeHandle, seed: &[usize]) -> Vec<usize> {
        let mut added = Vec::new();
        let mut current = handle.clone();
        loop {
            let inner = self.inner.lock();
            let slot = &inner.slots[current.index];
            match slot.parent.clone() {
                Some(parent) => {
                    added.push(slot.sumset.last());
                    drop(inner);
                    current = parent;
                }
                None => break,
            }
        }
        added.reverse();
        let mut elements = seed.to_vec();
        elements.extend(added);
        elements
    }

    /// Number of slots currently on the free list. Used by tests to
    /// confirm no node leaks: at a quiescent point with no outstanding
    /// pairs, this must equal the slab's total length.
    #[cfg(test)]
    pub fn free_count(&self) -> usize {
        let inner = self.inner.lock();
        let mut count = 0;
        let mut cur = inner.free_head;
        while let Some(i) = cur {
            count += 1;
            cur = inner.slots[i].next_free;
        }
        count
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.inner.lock().slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_and_free_round_trip_restores_free_count() {
        let pool = NodePool::new(4);
        assert_eq!(pool.free_count(), 4);

        let h = pool.alloc(Sumset::empty(8), None, 1);
        assert_eq!(pool.free_count(), 3);

        assert!(h.release_one());
        pool.free(&h);
        assert_eq!(pool.free_count(), 4);
    }

    #[test]
    fn grows_when_exhausted() {
        let pool = NodePool::new(2);
        let _a = pool.alloc(Sumset::empty(8), None, 1);
        let _b = pool.alloc(Sumset::empty(8), None, 1);
        assert_eq!(pool.free_count(), 0);
        let _c = pool.alloc(Sumset::empty(8), None, 1);
        assert!(pool.capacity() > 2);
    }

    #[test]
    fn elements_walks_parent_chain_in_order() {
        let pool = NodePool::new(4);
        let root = pool.alloc(Sumset::seeded(8, &[1]), None, 1);
        let child = pool.alloc(pool.sumset(&root).add(3), Some(root.clone()), 1);
        let grandchild = pool.alloc(pool.sumset(&child).add(2), Some(child.clone()), 1);

        assert_eq!(pool.elements(&grandchild, &[1]), vec![1, 3, 2]);
    }

    #[test]
    fn increment_and_release_share_the_same_atomic_across_clones() {
        let pool = NodePool::new(4);
        let h = pool.alloc(Sumset::empty(8), None, 1);
        let h2 = h.clone();

        h.increment(2); // refcount now 3
        assert!(!h2.release_one()); // -> 2, observed via the cloned handle
        assert!(!h.release_one()); // -> 1
        assert!(h.release_one()); // -> 0, reclaim due
    }
}
