//! Branch Deque (C4): the shared pool of not-yet-processed node pairs,
//! plus the termination oracle.
//!
//! Grounded on `BranchPool_t`/`give_away_branch`/`take_new_branch` in
//! `examples/original_source/sk459204/parallel/main.c`, restructured
//! around the teacher's `Shared { critical: Mutex<Critical>, monitor:
//! Condvar }` shape from `solver/barrier.rs`.

use parking_lot::{Condvar, Mutex};

use crate::node::NodeHandle;

/// A pair of node handles awaiting a worker.
pub type Pair = (NodeHandle, NodeHandle);

struct Inner {
    stack: Vec<Pair>,
    waiting: usize,
    finished: bool,
}

/// A LIFO of branch-and-bound work items shared across all worker
/// threads, with a built-in termination oracle: the last worker to
/// find the deque empty, with every other worker already waiting,
/// declares the search finished and wakes everyone else up.
pub struct BranchDeque {
    inner: Mutex<Inner>,
    monitor: Condvar,
    total_workers: usize,
}

impl BranchDeque {
    pub fn new(total_workers: usize, initial_capacity: usize) -> Self {
        BranchDeque {
            inner: Mutex::new(Inner {
                stack: Vec::with_capacity(initial_capacity),
                waiting: 0,
                finished: false,
            }),
            monitor: Condvar::new(),
            total_workers: total_workers.max(1),
        }
    }

    pub fn push(&self, pair: Pair) {
        let mut inner = self.inner.lock();
        inner.stack.push(pair);
        self.monitor.notify_one();
    }

    /// Blocks until either a pair is available or every other worker is
    /// already waiting, in which case the search is finished and `None`
    /// is returned to every worker (this one included).
    pub fn pop(&self) -> Option<Pair> {
        let mut inner = self.inner.lock();
        loop {
            if let Some(pair) = inner.stack.pop() {
                return Some(pair);
            }
            if inner.finished {
                return None;
            }
            if inner.waiting == self.total_workers - 1 {
                inner.finished = true;
                self.monitor.notify_all();
                return None;
            }
            inner.waiting += 1;
            self.monitor.wait(&mut inner);
            inner.waiting -= 1;
        }
    }

    pub fn size(&self) -> usize {
        self.inner.lock().stack.len()
    }
}
