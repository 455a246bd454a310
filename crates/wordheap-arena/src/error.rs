//! Heap error types.

use std::error::Error;
use std::fmt;

use crate::header::HeaderError;

/// Errors that can occur during heap operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeapError {
    /// No free block is large enough for the request. Covers both an
    /// exhausted arena and one whose free space is too fragmented.
    OutOfMemory {
        /// Number of words requested.
        requested_words: u16,
        /// Payload size of the largest free block seen during the scan.
        largest_free_words: u16,
    },
    /// A byte-sized request whose word count does not fit in a header.
    RequestTooLarge {
        /// Number of bytes requested.
        bytes: usize,
    },
    /// The pointer is not the payload start of any block in this heap.
    InvalidPointer {
        /// The offending address.
        addr: u32,
    },
    /// The pointer names a block that is already free.
    DoubleFree {
        /// The offending address.
        addr: u32,
    },
    /// Payload access through a pointer whose block is free.
    NotAllocated {
        /// The offending address.
        addr: u32,
    },
    /// The block chain is damaged at `offset`.
    Corrupt {
        /// Byte offset of the damaged header within the arena.
        offset: usize,
        /// What was wrong with it.
        reason: CorruptReason,
    },
    /// Two physically adjacent blocks are both free.
    AdjacentFree {
        /// Byte offset of the second of the two free blocks.
        offset: usize,
    },
}

/// Detail for [`HeapError::Corrupt`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CorruptReason {
    /// The header's flag field is not a valid encoding.
    BadFlag {
        /// The raw flag value found.
        value: u16,
    },
    /// The block extends past the sentinel.
    Overrun {
        /// Byte offset one past the block's last payload byte.
        end: usize,
    },
    /// The header at the arena's logical end is not the sentinel.
    MissingSentinel,
    /// Merging two blocks would exceed the 16-bit length field.
    LengthOverflow,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory {
                requested_words,
                largest_free_words,
            } => {
                write!(
                    f,
                    "out of memory: requested {requested_words} words, largest free block {largest_free_words} words"
                )
            }
            Self::RequestTooLarge { bytes } => {
                write!(f, "request of {bytes} bytes exceeds the maximum block size")
            }
            Self::InvalidPointer { addr } => {
                write!(f, "{addr:#010x} is not a block in this heap")
            }
            Self::DoubleFree { addr } => write!(f, "double free of {addr:#010x}"),
            Self::NotAllocated { addr } => write!(f, "block at {addr:#010x} is not allocated"),
            Self::Corrupt { offset, reason } => {
                write!(f, "heap corrupt at offset {offset}: {reason}")
            }
            Self::AdjacentFree { offset } => {
                write!(f, "free block at offset {offset} follows another free block")
            }
        }
    }
}

impl fmt::Display for CorruptReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadFlag { value } => write!(f, "bad occupied flag {value:#06x}"),
            Self::Overrun { end } => write!(f, "block runs past the sentinel to offset {end}"),
            Self::MissingSentinel => write!(f, "sentinel missing"),
            Self::LengthOverflow => write!(f, "merged block length overflows 16 bits"),
        }
    }
}

impl Error for HeapError {}

impl From<HeaderError> for CorruptReason {
    fn from(e: HeaderError) -> Self {
        match e {
            HeaderError::BadFlag { value } => Self::BadFlag { value },
        }
    }
}
