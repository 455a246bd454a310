//! Heap construction shortcuts and payload stamping.
//!
//! Stamping writes a tag-derived byte pattern over a block's payload so a
//! later [`check_stamp`] can prove no other allocation wrote into it.

use wordheap_arena::{Heap, HeapConfig, HeapPtr};

/// A heap whose initial free block holds exactly `words` words.
pub fn heap_with_words(words: u16) -> Heap {
    Heap::new(HeapConfig::for_payload_words(words))
        .unwrap_or_else(|e| panic!("invalid test heap of {words} words: {e}"))
}

/// Allocate each size in turn. Panics if any allocation fails.
pub fn allocate_all(heap: &mut Heap, sizes: &[u16]) -> Vec<HeapPtr> {
    sizes
        .iter()
        .map(|&words| {
            heap.allocate(words)
                .unwrap_or_else(|e| panic!("allocate({words}) failed: {e}"))
        })
        .collect()
}

fn pattern(tag: u8, index: usize) -> u8 {
    tag.wrapping_add((index as u8).wrapping_mul(31))
}

/// Overwrite the payload of `ptr` with the pattern for `tag`.
pub fn stamp(heap: &mut Heap, ptr: HeapPtr, tag: u8) {
    let payload = heap
        .payload_mut(ptr)
        .unwrap_or_else(|e| panic!("stamp {ptr}: {e}"));
    for (i, byte) in payload.iter_mut().enumerate() {
        *byte = pattern(tag, i);
    }
}

/// Whether the payload of `ptr` still holds the pattern for `tag`.
pub fn check_stamp(heap: &Heap, ptr: HeapPtr, tag: u8) -> bool {
    heap.payload(ptr)
        .map(|payload| payload.iter().enumerate().all(|(i, &b)| b == pattern(tag, i)))
        .unwrap_or(false)
}
