//! Seeded random allocate/free driver.
//!
//! A [`Workload`] draws a deterministic stream of [`Op`]s from a ChaCha8
//! generator, applies them to a heap, and keeps every live allocation
//! stamped so that a block overwritten by a neighbour is caught at free
//! time. The same seed always produces the same sequence.

use indexmap::IndexMap;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wordheap_arena::{Heap, HeapError, HeapPtr};

use crate::fixtures::{check_stamp, stamp};

/// One step of a workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Request a block of this many words.
    Allocate(u16),
    /// Free the live allocation at this index (taken modulo the live count).
    Free(usize),
}

/// Counters accumulated while running a workload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkloadStats {
    pub allocations: usize,
    pub failures: usize,
    pub frees: usize,
}

/// Deterministic allocate/free driver.
pub struct Workload {
    rng: ChaCha8Rng,
    /// Live allocations in allocation order, with the tag each was stamped with.
    live: IndexMap<HeapPtr, u8>,
    next_tag: u8,
    stats: WorkloadStats,
}

impl Workload {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            live: IndexMap::new(),
            next_tag: 1,
            stats: WorkloadStats::default(),
        }
    }

    /// Draw the next op. `free_percent` of draws free something when
    /// anything is live; the rest request `0..=max_words` words.
    pub fn next_op(&mut self, max_words: u16, free_percent: u32) -> Op {
        let roll = self.rng.next_u32() % 100;
        if !self.live.is_empty() && roll < free_percent {
            Op::Free(self.rng.next_u32() as usize)
        } else {
            let words = self.rng.next_u32() % (u32::from(max_words) + 1);
            Op::Allocate(words as u16)
        }
    }

    /// Apply one op. Running out of memory is counted, not returned.
    ///
    /// Panics if a live block's stamp was disturbed before it is freed.
    pub fn apply(&mut self, heap: &mut Heap, op: Op) -> Result<(), HeapError> {
        match op {
            Op::Allocate(words) => match heap.allocate(words) {
                Ok(ptr) => {
                    let tag = self.next_tag;
                    self.next_tag = self.next_tag.wrapping_add(1);
                    stamp(heap, ptr, tag);
                    self.live.insert(ptr, tag);
                    self.stats.allocations += 1;
                }
                Err(HeapError::OutOfMemory { .. }) => self.stats.failures += 1,
                Err(e) => return Err(e),
            },
            Op::Free(index) => {
                if self.live.is_empty() {
                    return Ok(());
                }
                let index = index % self.live.len();
                if let Some((ptr, tag)) = self.live.swap_remove_index(index) {
                    assert!(check_stamp(heap, ptr, tag), "payload of {ptr} was overwritten");
                    heap.free(ptr)?;
                    self.stats.frees += 1;
                }
            }
        }
        Ok(())
    }

    /// Draw and apply `ops` ops.
    pub fn run(
        &mut self,
        heap: &mut Heap,
        ops: usize,
        max_words: u16,
        free_percent: u32,
    ) -> Result<WorkloadStats, HeapError> {
        for _ in 0..ops {
            let op = self.next_op(max_words, free_percent);
            self.apply(heap, op)?;
        }
        Ok(self.stats)
    }

    /// Free every live allocation, oldest first.
    pub fn drain(&mut self, heap: &mut Heap) -> Result<(), HeapError> {
        for (ptr, tag) in std::mem::take(&mut self.live) {
            assert!(check_stamp(heap, ptr, tag), "payload of {ptr} was overwritten");
            heap.free(ptr)?;
            self.stats.frees += 1;
        }
        Ok(())
    }

    /// Pointers currently live, in allocation order.
    pub fn live(&self) -> impl Iterator<Item = HeapPtr> + '_ {
        self.live.keys().copied()
    }

    pub fn stats(&self) -> WorkloadStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_invariants, assert_pristine, heap_with_words};

    #[test]
    fn same_seed_same_ops() {
        let mut a = Workload::new(7);
        let mut b = Workload::new(7);
        for _ in 0..50 {
            assert_eq!(a.next_op(20, 0), b.next_op(20, 0));
        }
    }

    #[test]
    fn run_then_drain_restores_the_heap() {
        let mut heap = heap_with_words(512);
        let mut workload = Workload::new(42);
        let stats = workload.run(&mut heap, 500, 24, 40).unwrap();
        assert!(stats.allocations > 0);
        assert_invariants(&heap);
        workload.drain(&mut heap).unwrap();
        assert_eq!(workload.live().count(), 0);
        assert_pristine(&heap);
    }
}
