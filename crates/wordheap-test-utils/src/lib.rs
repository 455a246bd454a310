//! Test utilities for wordheap development.
//!
//! Provides structural assertions recomputed independently of
//! [`Heap::validate`], a compact [`layout`] snapshot for comparing block
//! chains, payload stamping in [`fixtures`], and a seeded random
//! allocate/free driver in [`workload`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod workload;

use smallvec::SmallVec;
use wordheap_arena::header::HEADER_BYTES;
use wordheap_arena::{BlockInfo, Header, Heap};

pub use fixtures::{allocate_all, check_stamp, heap_with_words, stamp};
pub use workload::{Op, Workload, WorkloadStats};

/// `(length_words, occupied)` for every block, in address order.
pub type Layout = SmallVec<[(u16, bool); 8]>;

/// Snapshot the block chain. Panics if the chain cannot be walked.
pub fn layout(heap: &Heap) -> Layout {
    heap.blocks()
        .map(|b| {
            let b = b.unwrap_or_else(|e| panic!("block chain is damaged: {e}"));
            (b.length_words, b.occupied)
        })
        .collect()
}

/// Assert every structural invariant of the arena.
///
/// The checks are done here from the raw walk rather than delegated, then
/// cross-checked against [`Heap::validate`].
pub fn assert_invariants(heap: &Heap) {
    let blocks: Vec<BlockInfo> = heap
        .blocks()
        .collect::<Result<_, _>>()
        .unwrap_or_else(|e| panic!("block chain is damaged: {e}"));

    let mut expected_offset = 0;
    for b in &blocks {
        assert_eq!(b.offset, expected_offset, "gap or overlap before {b}");
        expected_offset = b.end();
    }

    let total: usize = blocks.iter().map(BlockInfo::total_bytes).sum();
    assert_eq!(
        total + HEADER_BYTES,
        heap.capacity(),
        "blocks plus sentinel must tile the arena"
    );

    for pair in blocks.windows(2) {
        assert!(
            pair[0].occupied || pair[1].occupied,
            "adjacent free blocks: {} and {}",
            pair[0],
            pair[1]
        );
    }

    let tail = &heap.as_bytes()[heap.capacity() - HEADER_BYTES..];
    assert_eq!(tail, &Header::SENTINEL.encode()[..], "sentinel missing");
    assert_eq!(heap.validate(), Ok(()));
}

/// Assert the heap is back to the state `initialize` leaves it in.
pub fn assert_pristine(heap: &Heap) {
    let words = heap.config().initial_free_words() as u16;
    assert_eq!(layout(heap).as_slice(), &[(words, false)], "heap layout");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_of_fresh_heap() {
        let heap = heap_with_words(10);
        assert_eq!(layout(&heap).as_slice(), &[(10, false)]);
        assert_invariants(&heap);
        assert_pristine(&heap);
    }

    #[test]
    fn layout_tracks_splits() {
        let mut heap = heap_with_words(16);
        allocate_all(&mut heap, &[4, 4]);
        assert_eq!(layout(&heap).as_slice(), &[(4, true), (4, true), (4, false)]);
        assert_invariants(&heap);
    }

    #[test]
    #[should_panic(expected = "heap layout")]
    fn pristine_check_rejects_live_blocks() {
        let mut heap = heap_with_words(16);
        allocate_all(&mut heap, &[1]);
        assert_pristine(&heap);
    }
}
