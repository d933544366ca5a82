//! Worker (C6).
//!
//! Grounded on `branch_split`/`recursive_solv`/`thread_calculations`
//! from `examples/original_source/sk459204/parallel/main.c`, and on the
//! teacher's acquire-classify-act-release worker loop in
//! `solver/barrier.rs`'s `BarrierParallelSolver::maximize`. Dual-mode
//! expansion (publish vs. recurse) is dispatched from one classify step
//! per spec.md's design note on factoring admissible-child enumeration.

use log::{debug, trace};

use crate::deque::BranchDeque;
use crate::node::{NodeHandle, NodePool};
use crate::reclaim::release;
use crate::solution::Solution;
use crate::sumset::Sumset;

/// What a normalized `(a, b)` pair turns out to be once classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// `s(a) ∩ s(b) = {0}`: still extendable, produces children.
    Branch,
    /// `sum(a) == sum(b)` and `|s(a) ∩ s(b)| == 2`: a candidate answer.
    Solution,
    /// Neither: this pair cannot lead anywhere useful.
    Dead,
}

/// Classifies an already-normalized pair (`a.sum() <= b.sum()`).
pub fn classify(a: &Sumset, b: &Sumset) -> Classification {
    if a.intersection_trivial(b) {
        Classification::Branch
    } else if a.sum() == b.sum() && a.intersection_size(b) == 2 {
        Classification::Solution
    } else {
        Classification::Dead
    }
}

/// Enumerates the admissible extensions of `a` against `b` (elements
/// `i` in `[a.last(), d]` not already reachable in `b`), invoking `sink`
/// for each one with the extended closure. Shared by both split and
/// recurse expansion so the admissibility rule is defined in one place,
/// per spec.md's design note.
fn for_each_admissible(d: usize, a: &Sumset, b: &Sumset, mut sink: impl FnMut(usize, Sumset)) {
    for i in a.last()..=d {
        if !b.contains(i) {
            sink(i, a.add(i));
        }
    }
}

/// A worker thread: pops pairs from the shared deque until the deque's
/// termination oracle fires, classifying and expanding each one.
pub struct Worker<'a> {
    pool: &'a NodePool,
    deque: &'a BranchDeque,
    d: usize,
    total_workers: usize,
    seed_a: &'a [usize],
    seed_b: &'a [usize],
    best: Solution,
}

impl<'a> Worker<'a> {
    pub fn new(
        pool: &'a NodePool,
        deque: &'a BranchDeque,
        d: usize,
        total_workers: usize,
        seed_a: &'a [usize],
        seed_b: &'a [usize],
    ) -> Self {
        Worker { pool, deque, d, total_workers, seed_a, seed_b, best: Solution::none() }
    }

    pub fn run(&mut self) {
        while let Some((a, b)) = self.deque.pop() {
            self.process(a, b);
        }
        debug!("worker observed termination, local best sum {}", self.best.sum());
    }

    pub fn into_best(self) -> Solution {
        self.best
    }

    fn process(&mut self, a: NodeHandle, b: NodeHandle) {
        let (a, b) = if self.pool.sum(&a) > self.pool.sum(&b) { (b, a) } else { (a, b) };
        let a_set = self.pool.sumset(&a);
        let b_set = self.pool.sumset(&b);

        match classify(&a_set, &b_set) {
            Classification::Solution => self.record_solution(&a, &b, a_set.sum()),
            Classification::Branch => {
                if self.deque.size() < self.total_workers.saturating_sub(1) {
                    trace!("splitting pair at sum {}/{}", a_set.sum(), b_set.sum());
                    self.split_expand(&a, &a_set, &b, &b_set);
                } else {
                    trace!("recursing pair at sum {}/{}", a_set.sum(), b_set.sum());
                    self.recurse_expand(&a, &a_set, &b, &b_set);
                }
            }
            Classification::Dead => {}
        }

        release(self.pool, a);
        release(self.pool, b);
    }

    /// Publishes every admissible child of `a` (paired with `b`, shared
    /// unchanged) onto the shared deque, bumping refcounts the way
    /// `branch_split` does: once per child for `a` (the child's parent
    /// link) and once per child for `b` (shared directly by the new
    /// pair). Each increment/push clones the handle — a cheap `Arc`
    /// bump, not a pool access.
    fn split_expand(&mut self, a: &NodeHandle, a_set: &Sumset, b: &NodeHandle, b_set: &Sumset) {
        for_each_admissible(self.d, a_set, b_set, |_, child_set| {
            let child = self.pool.alloc(child_set, Some(a.clone()), 1);
            a.increment(1);
            b.increment(1);
            self.deque.push((child, b.clone()));
        });
    }

    /// Explores every admissible child of `a` against `b` in-process,
    /// recursing on the Rust call stack with no pool allocation and no
    /// deque publication — this is the private fallback once the shared
    /// deque is already deep enough to keep every worker busy.
    fn recurse_expand(&mut self, a: &NodeHandle, a_set: &Sumset, b: &NodeHandle, b_set: &Sumset) {
        let mut a_path = self.pool.elements(a, self.seed_a);
        let mut b_path = self.pool.elements(b, self.seed_b);
        recurse(self.d, a_set, &mut a_path, b_set, &mut b_path, &mut self.best);
    }

    fn record_solution(&mut self, a: &NodeHandle, b: &NodeHandle, sum: usize) {
        if sum > self.best.sum() {
            let a_elements = self.pool.elements(a, self.seed_a);
            let b_elements = self.pool.elements(b, self.seed_b);
            self.best.offer(sum, a_elements, b_elements);
        }
    }
}

/// Private, stack-only recursive exploration. Normalizes by rebinding
/// references rather than recursing with swapped arguments, so a
/// `sum(a) > sum(b)` pair never doubles the remaining stack depth.
fn recurse(
    d: usize,
    a: &Sumset,
    a_path: &mut Vec<usize>,
    b: &Sumset,
    b_path: &mut Vec<usize>,
    best: &mut Solution,
) {
    let (a, a_path, b, b_path) = if a.sum() > b.sum() { (b, b_path, a, a_path) } else { (a, a_path, b, b_path) };

    match classify(a, b) {
        Classification::Solution => {
            best.offer(a.sum(), a_path.clone(), b_path.clone());
        }
        Classification::Branch => {
            for_each_admissible(d, a, b, |i, child| {
                a_path.push(i);
                recurse(d, &child, a_path, b, b_path, best);
                a_path.pop();
            });
        }
        Classification::Dead => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_branch_when_intersection_trivial() {
        let a = Sumset::empty(8).add(3);
        let b = Sumset::empty(8).add(5);
        assert_eq!(classify(&a, &b), Classification::Branch);
    }

    #[test]
    fn classify_dead_when_neither_branch_nor_solution() {
        let a = Sumset::empty(8).add(2).add(3); // {0,2,3,5}
        let b = Sumset::empty(8).add(5); // {0,5}
        assert_eq!(classify(&a, &b), Classification::Dead);
    }

    #[test]
    fn classify_solution_on_equal_sum_two_way_intersection() {
        // a = {1,2} -> sum 3, reachable {0,1,2,3}; b = {3} -> sum 3, reachable {0,3}
        let a = Sumset::empty(8).add(1).add(2);
        let b = Sumset::empty(8).add(3);
        assert_eq!(classify(&a, &b), Classification::Solution);
    }

    #[test]
    fn recurse_finds_calibration_solution() {
        // t=1, d=8, A0={}, B0={1} -> sum=31 (spec.md's worked example).
        let a0 = Sumset::seeded(8, &[]);
        let b0 = Sumset::seeded(8, &[1]);
        let mut a_path = vec![];
        let mut b_path = vec![1];
        let mut best = Solution::none();
        recurse(8, &a0, &mut a_path, &b0, &mut b_path, &mut best);
        assert_eq!(best.sum(), 31);
    }
}
