//! Read-only views of the block chain: iteration, statistics, and
//! structural validation.

use std::fmt;

use crate::error::{CorruptReason, HeapError};
use crate::header::{Header, HEADER_BYTES};
use crate::heap::Heap;
use crate::ptr::BlockInfo;

/// Iterator over the blocks of a [`Heap`] in address order.
///
/// The sentinel is not yielded. A damaged header ends the iteration with
/// one `Err` item.
pub struct Blocks<'a> {
    heap: &'a Heap,
    cursor: usize,
    done: bool,
}

impl Iterator for Blocks<'_> {
    type Item = Result<BlockInfo, HeapError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.cursor >= self.heap.sentinel_offset() {
            return None;
        }
        let step = self.heap.read_header(self.cursor).and_then(|header| {
            let end = self.heap.block_end(self.cursor, header)?;
            Ok((header, end))
        });
        match step {
            Ok((header, end)) => {
                let info = BlockInfo {
                    offset: self.cursor,
                    length_words: header.length_words,
                    occupied: header.occupied,
                    ptr: self.heap.ptr_at(self.cursor),
                };
                self.cursor = end;
                Some(Ok(info))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Usage summary of a heap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeapStats {
    /// Arena size in bytes.
    pub capacity: usize,
    /// Number of blocks, excluding the sentinel.
    pub blocks: usize,
    /// Number of occupied blocks.
    pub occupied_blocks: usize,
    /// Number of free blocks.
    pub free_blocks: usize,
    /// Payload words held by occupied blocks.
    pub used_words: usize,
    /// Payload words held by free blocks.
    pub free_words: usize,
    /// Payload words of the largest free block: the biggest request that
    /// can currently succeed.
    pub largest_free_words: u16,
    /// Bytes spent on headers, sentinel included.
    pub overhead_bytes: usize,
}

impl fmt::Display for HeapStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} blocks ({} used, {} free), {} used words, {} free words, largest free {}",
            self.blocks,
            self.occupied_blocks,
            self.free_blocks,
            self.used_words,
            self.free_words,
            self.largest_free_words
        )
    }
}

impl Heap {
    /// Walk the block chain from the start of the arena.
    pub fn blocks(&self) -> Blocks<'_> {
        Blocks {
            heap: self,
            cursor: 0,
            done: false,
        }
    }

    /// Collect usage statistics in one walk.
    pub fn stats(&self) -> Result<HeapStats, HeapError> {
        let mut stats = HeapStats {
            capacity: self.capacity(),
            overhead_bytes: HEADER_BYTES,
            ..HeapStats::default()
        };
        for block in self.blocks() {
            let block = block?;
            stats.blocks += 1;
            stats.overhead_bytes += HEADER_BYTES;
            if block.occupied {
                stats.occupied_blocks += 1;
                stats.used_words += block.length_words as usize;
            } else {
                stats.free_blocks += 1;
                stats.free_words += block.length_words as usize;
                stats.largest_free_words = stats.largest_free_words.max(block.length_words);
            }
        }
        Ok(stats)
    }

    /// Check the arena's structural invariants.
    ///
    /// - blocks tile the arena exactly, from offset 0 to the sentinel;
    /// - the sentinel is in place;
    /// - no two adjacent blocks are both free.
    pub fn validate(&self) -> Result<(), HeapError> {
        let mut accounted = 0;
        let mut prev_free = false;
        for block in self.blocks() {
            let block = block?;
            if !block.occupied && prev_free {
                return Err(HeapError::AdjacentFree {
                    offset: block.offset,
                });
            }
            prev_free = !block.occupied;
            accounted += block.total_bytes();
        }

        let sentinel = self.sentinel_offset();
        if self.read_header(sentinel)? != Header::SENTINEL {
            return Err(HeapError::Corrupt {
                offset: sentinel,
                reason: CorruptReason::MissingSentinel,
            });
        }
        if accounted + HEADER_BYTES != self.capacity() {
            return Err(HeapError::Corrupt {
                offset: accounted,
                reason: CorruptReason::Overrun {
                    end: accounted + HEADER_BYTES,
                },
            });
        }
        Ok(())
    }
}
