//! The first-fit heap: initialization, allocation, and deallocation.
//!
//! A [`Heap`] owns one fixed-size byte buffer. Blocks are laid end to end
//! from offset 0, each introduced by a 4-byte [`Header`], and the chain is
//! terminated by a sentinel header in the last four bytes:
//!
//! ```text
//! ┌────┬──────────┬────┬────────────────────┬────┬─────┬────┐
//! │ H  │ payload  │ H  │      payload       │ H  │ ... │ S  │
//! └────┴──────────┴────┴────────────────────┴────┴─────┴────┘
//! 0                                                   capacity-4
//! ```
//!
//! There is no side table. Every operation is a linear walk of the chain.

use std::fmt;

use log::{debug, trace, warn};

use crate::config::{ConfigError, HeapConfig};
use crate::error::{CorruptReason, HeapError};
use crate::header::{words_for_bytes, Header, HEADER_BYTES, HEADER_WORDS, WORD_BYTES};
use crate::ptr::HeapPtr;

/// A fixed-capacity first-fit heap with in-band block headers.
///
/// Allocation scans from the lowest address and takes the first free block
/// that fits, splitting off the remainder when there is room for another
/// header. Freeing merges the block with every free neighbour on both
/// sides, so the arena never holds two adjacent free blocks.
///
/// All mutating operations take `&mut self`; callers that need to share a
/// heap provide their own serialization.
pub struct Heap {
    /// Backing storage. Sized to `config.capacity` at creation, never resized.
    data: Vec<u8>,
    config: HeapConfig,
}

impl fmt::Debug for Heap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heap")
            .field("capacity", &self.data.len())
            .field("base_address", &format_args!("{:#010x}", self.config.base_address))
            .finish_non_exhaustive()
    }
}

impl Heap {
    /// Create a heap and lay down its initial free block.
    pub fn new(config: HeapConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut heap = Self {
            data: vec![0; config.capacity],
            config,
        };
        heap.initialize();
        Ok(heap)
    }

    /// Reset the arena to a single free block followed by the sentinel.
    ///
    /// This is destructive: every pointer handed out before the call becomes
    /// invalid, and the heap cannot tell. Making sure nobody still holds one
    /// is the caller's responsibility.
    pub fn initialize(&mut self) {
        let free_words = self.config.initial_free_words() as u16;
        let sentinel = self.sentinel_offset();
        self.write_header(0, Header::free(free_words));
        self.write_header(sentinel, Header::SENTINEL);
        if self.config.zero_fill {
            self.data[HEADER_BYTES..sentinel].fill(0);
        }
        debug!(
            "heap at {:#010x} initialized: {} bytes, {free_words} free words",
            self.config.base_address, self.config.capacity
        );
    }

    /// Allocate a block of `words` payload words.
    ///
    /// First fit: the lowest-addressed free block with at least `words` words
    /// is used. If what is left over can hold another header it is split off
    /// as a new free block; otherwise the whole block is handed out and the
    /// spare word stays inside it.
    ///
    /// `words == 0` is allowed and yields a valid, non-null pointer to an
    /// empty payload.
    pub fn allocate(&mut self, words: u16) -> Result<HeapPtr, HeapError> {
        let sentinel = self.sentinel_offset();
        let mut cursor = 0;
        let mut largest_free_words = 0;

        while cursor < sentinel {
            let header = self.read_header(cursor)?;
            let next = self.block_end(cursor, header)?;

            if !header.occupied {
                if header.length_words >= words {
                    let taken = self.claim(cursor, header, words);
                    let ptr = self.ptr_at(cursor);
                    trace!("allocate({words}) -> {ptr} ({taken} words)");
                    return Ok(ptr);
                }
                largest_free_words = largest_free_words.max(header.length_words);
            }
            cursor = next;
        }

        debug!("allocate({words}) failed: largest free block is {largest_free_words} words");
        Err(HeapError::OutOfMemory {
            requested_words: words,
            largest_free_words,
        })
    }

    /// Allocate room for `bytes` bytes, rounded up to whole words.
    pub fn allocate_bytes(&mut self, bytes: usize) -> Result<HeapPtr, HeapError> {
        let words = u16::try_from(words_for_bytes(bytes))
            .map_err(|_| HeapError::RequestTooLarge { bytes })?;
        self.allocate(words)
    }

    /// Return a block to the heap.
    ///
    /// [`HeapPtr::NULL`] is ignored. Any other pointer must be one returned
    /// by [`allocate`](Heap::allocate) on this heap and not freed since;
    /// anything else is reported as an error and leaves the arena as it was.
    ///
    /// The freed block absorbs every free block that directly follows it,
    /// and is itself absorbed by its predecessor if that one is free. The
    /// predecessor is found by walking from the start of the arena.
    pub fn free(&mut self, ptr: HeapPtr) -> Result<(), HeapError> {
        if ptr.is_null() {
            return Ok(());
        }
        let target = self.header_offset(ptr).ok_or_else(|| {
            warn!("free({ptr}): pointer outside the arena");
            HeapError::InvalidPointer { addr: ptr.addr() }
        })?;

        // Locate the block and its physical predecessor in one pass.
        let mut cursor = 0;
        let mut prev: Option<(usize, Header)> = None;
        while cursor < target {
            let header = self.read_header(cursor)?;
            let next = self.block_end(cursor, header)?;
            prev = Some((cursor, header));
            cursor = next;
        }
        if cursor != target {
            warn!("free({ptr}): not the start of a block");
            return Err(HeapError::InvalidPointer { addr: ptr.addr() });
        }

        let mut header = self.read_header(target)?;
        self.block_end(target, header)?;
        if !header.occupied {
            warn!("free({ptr}): block is already free");
            return Err(HeapError::DoubleFree { addr: ptr.addr() });
        }
        header.occupied = false;

        let sentinel = self.sentinel_offset();
        let mut next = self.block_end(target, header)?;
        while next < sentinel {
            let neighbour = self.read_header(next)?;
            if neighbour.occupied {
                break;
            }
            header.length_words = merged_words(next, header, neighbour)?;
            trace!("free({ptr}): absorbed free block at {next}");
            next = self.block_end(target, header)?;
        }

        // Written even when absorbed below, so a stale pointer reads as free.
        self.write_header(target, header);
        if let Some((offset, before)) = prev.filter(|(_, before)| !before.occupied) {
            let merged = Header::free(merged_words(target, before, header)?);
            self.write_header(offset, merged);
            trace!("free({ptr}): merged into free block at {offset}");
        }
        Ok(())
    }

    /// The payload bytes of an allocated block.
    ///
    /// Checks only that `ptr` lies inside the arena and that the header in
    /// front of it reads as an occupied block. A stale pointer into the
    /// middle of a live block can pass that check.
    pub fn payload(&self, ptr: HeapPtr) -> Result<&[u8], HeapError> {
        let (offset, header) = self.occupied_block(ptr)?;
        let start = offset + HEADER_BYTES;
        Ok(&self.data[start..start + header.payload_bytes()])
    }

    /// Mutable access to the payload bytes of an allocated block.
    ///
    /// Subject to the same checks as [`payload`](Heap::payload).
    pub fn payload_mut(&mut self, ptr: HeapPtr) -> Result<&mut [u8], HeapError> {
        let (offset, header) = self.occupied_block(ptr)?;
        let start = offset + HEADER_BYTES;
        Ok(&mut self.data[start..start + header.payload_bytes()])
    }

    /// Arena size in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Address of the arena's first byte.
    pub fn base_address(&self) -> u32 {
        self.config.base_address
    }

    /// The configuration this heap was built with.
    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    /// Raw arena bytes, headers included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    // ── internals ──────────────────────────────────────────────────

    pub(crate) fn sentinel_offset(&self) -> usize {
        self.data.len() - HEADER_BYTES
    }

    pub(crate) fn ptr_at(&self, header_offset: usize) -> HeapPtr {
        // Config validation keeps base + capacity within u32.
        HeapPtr::from_addr(self.config.base_address + (header_offset + HEADER_BYTES) as u32)
    }

    pub(crate) fn read_header(&self, offset: usize) -> Result<Header, HeapError> {
        let bytes: [u8; HEADER_BYTES] = self
            .data
            .get(offset..offset + HEADER_BYTES)
            .and_then(|s| s.try_into().ok())
            .ok_or(HeapError::Corrupt {
                offset,
                reason: CorruptReason::Overrun {
                    end: offset + HEADER_BYTES,
                },
            })?;
        Header::decode(bytes).map_err(|e| HeapError::Corrupt {
            offset,
            reason: e.into(),
        })
    }

    /// Offset just past the block at `offset`, which must not run into the
    /// sentinel.
    pub(crate) fn block_end(&self, offset: usize, header: Header) -> Result<usize, HeapError> {
        let end = offset + header.block_bytes();
        if end > self.sentinel_offset() {
            return Err(HeapError::Corrupt {
                offset,
                reason: CorruptReason::Overrun { end },
            });
        }
        Ok(end)
    }

    #[cfg(test)]
    pub(crate) fn raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn write_header(&mut self, offset: usize, header: Header) {
        self.data[offset..offset + HEADER_BYTES].copy_from_slice(&header.encode());
    }

    /// Mark the free block at `offset` occupied, splitting off the tail when
    /// it can hold a header. Returns the payload words handed out.
    fn claim(&mut self, offset: usize, header: Header, words: u16) -> u16 {
        let remainder_bytes = (header.length_words - words) as usize * WORD_BYTES;
        let taken = if remainder_bytes >= HEADER_BYTES {
            let rest = offset + HEADER_BYTES + words as usize * WORD_BYTES;
            let rest_words = ((remainder_bytes - HEADER_BYTES) / WORD_BYTES) as u16;
            self.write_header(offset, Header::occupied(words));
            self.write_header(rest, Header::free(rest_words));
            words
        } else {
            self.write_header(offset, Header::occupied(header.length_words));
            header.length_words
        };
        if self.config.zero_fill {
            let start = offset + HEADER_BYTES;
            self.data[start..start + taken as usize * WORD_BYTES].fill(0);
        }
        taken
    }

    /// Header offset for a payload pointer, if it could name a block at all.
    fn header_offset(&self, ptr: HeapPtr) -> Option<usize> {
        let payload = ptr.addr().checked_sub(self.config.base_address)? as usize;
        let offset = payload.checked_sub(HEADER_BYTES)?;
        (offset % WORD_BYTES == 0 && offset < self.sentinel_offset()).then_some(offset)
    }

    fn occupied_block(&self, ptr: HeapPtr) -> Result<(usize, Header), HeapError> {
        let offset = self
            .header_offset(ptr)
            .ok_or(HeapError::InvalidPointer { addr: ptr.addr() })?;
        let header = self.read_header(offset)?;
        self.block_end(offset, header)?;
        if !header.occupied {
            return Err(HeapError::NotAllocated { addr: ptr.addr() });
        }
        Ok((offset, header))
    }
}

/// Length of `first` after absorbing the block that follows it, header
/// included. `offset` is where the absorbed header sat, for error reporting.
fn merged_words(offset: usize, first: Header, second: Header) -> Result<u16, HeapError> {
    first
        .length_words
        .checked_add(HEADER_WORDS)
        .and_then(|w| w.checked_add(second.length_words))
        .ok_or(HeapError::Corrupt {
            offset,
            reason: CorruptReason::LengthOverflow,
        })
}
