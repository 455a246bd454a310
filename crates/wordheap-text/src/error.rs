//! String helper error types.

use std::error::Error;
use std::fmt;

use wordheap_arena::HeapError;

/// Errors from the string helpers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextError {
    /// The underlying heap operation failed.
    Heap(HeapError),
    /// The bytes to store contain a NUL before their end.
    InteriorNul {
        /// Index of the first NUL byte.
        index: usize,
    },
    /// The block holds no terminating NUL.
    Unterminated {
        /// Address of the block.
        addr: u32,
    },
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heap(e) => write!(f, "heap: {e}"),
            Self::InteriorNul { index } => write!(f, "interior NUL byte at index {index}"),
            Self::Unterminated { addr } => {
                write!(f, "block at {addr:#010x} holds no NUL terminator")
            }
        }
    }
}

impl Error for TextError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Heap(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HeapError> for TextError {
    fn from(e: HeapError) -> Self {
        Self::Heap(e)
    }
}
