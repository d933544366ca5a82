//! Reclaimer (C5).
//!
//! Grounded on `check_if_free`/`check_sumset_reference_count` in both
//! `examples/original_source/sk459204/parallel/main.c` and
//! `.../nonrecursive/main.c`; rewritten as an iterative loop instead of
//! the source's recursion, per the design note ("convert this to an
//! iterative loop so that a deep parent chain cannot overflow the
//! stack").

use crate::node::{NodeHandle, NodePool};

/// Releases one reference to `handle`. Each step's decrement is a bare
/// atomic fetch-subtract on the handle itself (no pool mutex involved);
/// only once a node's refcount has actually hit zero does the cascade
/// touch the pool, to return the slot to the free list and look up the
/// parent to continue up the chain.
pub fn release(pool: &NodePool, handle: NodeHandle) {
    let mut current = Some(handle);
    while let Some(h) = current {
        current = if h.release_one() { pool.free(&h) } else { None };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sumset::Sumset;

    #[test]
    fn release_frees_only_at_zero_refcount() {
        let pool = NodePool::new(4);
        let h = pool.alloc(Sumset::empty(8), None, 2);
        release(&pool, h.clone());
        assert_eq!(pool.free_count(), 3); // still held once more

        release(&pool, h);
        assert_eq!(pool.free_count(), 4);
    }

    #[test]
    fn release_cascades_up_the_parent_chain() {
        let pool = NodePool::new(4);
        let root = pool.alloc(Sumset::empty(8), None, 1);
        let child = pool.alloc(pool.sumset(&root).add(1), Some(root), 1);

        release(&pool, child);
        assert_eq!(pool.free_count(), 4);
    }

    #[test]
    fn release_does_not_cascade_while_parent_still_referenced() {
        let pool = NodePool::new(4);
        let root = pool.alloc(Sumset::empty(8), None, 2); // two children will reference it
        let child_a = pool.alloc(pool.sumset(&root).add(1), Some(root.clone()), 1);
        let _child_b = pool.alloc(pool.sumset(&root).add(2), Some(root), 1);

        release(&pool, child_a);
        // root still has one outstanding reference from child_b.
        assert_eq!(pool.free_count(), 1);
    }
}
