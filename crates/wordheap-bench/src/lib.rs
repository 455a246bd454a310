//! Benchmark profiles and utilities for the Wordheap allocator.
//!
//! - [`reference_profile`]: a 16 KiB arena with small mixed requests
//! - [`stress_profile`]: the largest arena a 16-bit length field allows
//! - [`fragmented_heap`]: a heap whose free space is scattered in holes
//! - [`request_sizes`]: deterministic request sizes from a seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::error::Error;

use wordheap_arena::{Heap, HeapConfig, HeapError, HeapPtr};

/// Parameters for a churn benchmark.
#[derive(Clone, Debug)]
pub struct Profile {
    /// Heap configuration.
    pub config: HeapConfig,
    /// Largest single request, in words.
    pub max_request_words: u16,
    /// Chance, in percent, that a step frees instead of allocating.
    pub free_percent: u32,
    /// Steps per iteration.
    pub ops: usize,
}

/// 16 KiB arena, requests up to 32 words, 40% frees.
pub fn reference_profile() -> Profile {
    Profile {
        config: HeapConfig::default(),
        max_request_words: 32,
        free_percent: 40,
        ops: 1_000,
    }
}

/// Maximum arena, requests up to 512 words, 45% frees.
pub fn stress_profile() -> Profile {
    Profile {
        config: HeapConfig::new(HeapConfig::MAX_CAPACITY),
        max_request_words: 512,
        free_percent: 45,
        ops: 10_000,
    }
}

/// Deterministic request sizes in `0..=max_words`.
pub fn request_sizes(n: usize, max_words: u16, seed: u64) -> Vec<u16> {
    let span = u64::from(max_words) + 1;
    (0..n as u64)
        .map(|i| {
            let mixed = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add(i.wrapping_mul(1442695040888963407));
            ((mixed >> 33) % span) as u16
        })
        .collect()
}

/// Build a heap of `holes` free blocks of `hole_words`, each followed by a
/// live `pin_words` block, with the remaining space free at the end.
///
/// First-fit requests larger than
/// `hole_words` must walk past every hole.
pub fn fragmented_heap(
    holes: usize,
    hole_words: u16,
    pin_words: u16,
    tail_words: u16,
) -> Result<Heap, Box<dyn Error>> {
    let block_bytes = |words: u16| 4 + 2 * usize::from(words);
    let capacity = holes * (block_bytes(hole_words) + block_bytes(pin_words))
        + block_bytes(tail_words)
        + 4;
    let mut heap = Heap::new(HeapConfig::new(capacity))?;

    let mut doomed = Vec::with_capacity(holes);
    for _ in 0..holes {
        doomed.push(heap.allocate(hole_words)?);
        heap.allocate(pin_words)?;
    }
    for p in doomed {
        heap.free(p)?;
    }
    Ok(heap)
}

/// Free every pointer in `live`, emptying it.
pub fn release_all(heap: &mut Heap, live: &mut Vec<HeapPtr>) -> Result<(), HeapError> {
    for p in live.drain(..) {
        heap.free(p)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_profile_validates() {
        reference_profile().config.validate().unwrap();
    }

    #[test]
    fn stress_profile_validates() {
        stress_profile().config.validate().unwrap();
    }

    #[test]
    fn request_sizes_deterministic_and_bounded() {
        let a = request_sizes(500, 24, 42);
        let b = request_sizes(500, 24, 42);
        assert_eq!(a, b);
        assert!(a.iter().all(|&w| w <= 24));
        assert_ne!(a, request_sizes(500, 24, 43));
    }

    #[test]
    fn fragmented_heap_has_expected_holes() {
        let heap = fragmented_heap(10, 4, 1, 64).unwrap();
        let stats = heap.stats().unwrap();
        assert_eq!(stats.free_blocks, 11);
        assert_eq!(stats.occupied_blocks, 10);
        assert_eq!(stats.largest_free_words, 64);
        heap.validate().unwrap();
    }
}
