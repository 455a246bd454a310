//! Payload pointers and block descriptors.
//!
//! A [`HeapPtr`] is the address a caller holds for an allocation: the
//! heap's base address plus the byte offset of the payload. It is a plain
//! value; it does not borrow the heap.

use std::fmt;

use crate::header::{HEADER_BYTES, WORD_BYTES};

/// Address of an allocation's payload.
///
/// `HeapPtr::NULL` never names a live block and is accepted by
/// [`Heap::free`](crate::Heap::free) as a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeapPtr(u32);

impl HeapPtr {
    /// The null pointer.
    pub const NULL: HeapPtr = HeapPtr(0);

    /// Wrap a raw address.
    pub const fn from_addr(addr: u32) -> Self {
        Self(addr)
    }

    /// The raw address.
    pub const fn addr(self) -> u32 {
        self.0
    }

    /// Whether this is [`HeapPtr::NULL`].
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// The address `bytes` further on, or `None` on overflow.
    pub fn checked_add(self, bytes: u32) -> Option<HeapPtr> {
        self.0.checked_add(bytes).map(HeapPtr)
    }
}

impl fmt::Display for HeapPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl From<HeapPtr> for u32 {
    fn from(p: HeapPtr) -> Self {
        p.0
    }
}

/// One block as seen by a walk over the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockInfo {
    /// Byte offset of the block's header within the arena.
    pub offset: usize,
    /// Payload length in words.
    pub length_words: u16,
    /// Whether the block is handed out.
    pub occupied: bool,
    /// Address of the payload.
    pub ptr: HeapPtr,
}

impl BlockInfo {
    /// Header plus payload, in bytes.
    pub fn total_bytes(&self) -> usize {
        HEADER_BYTES + self.length_words as usize * WORD_BYTES
    }

    /// Byte offset one past the block's last payload byte.
    pub fn end(&self) -> usize {
        self.offset + self.total_bytes()
    }
}

impl fmt::Display for BlockInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.occupied { "used" } else { "free" };
        write!(
            f,
            "Block(off={}, words={}, {state})",
            self.offset, self.length_words
        )
    }
}
