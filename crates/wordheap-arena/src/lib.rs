//! Fixed-arena first-fit allocation with in-band block headers.
//!
//! A [`Heap`] manages one contiguous byte buffer whose size is fixed at
//! construction. Allocations are carved out of that buffer in place: every
//! block carries a 4-byte header (payload length in 16-bit words, plus an
//! occupied flag) and there is no other bookkeeping structure.
//!
//! # Layout
//!
//! ```text
//! Heap
//! ├── HeapConfig (capacity, base address, zero-fill)
//! └── Vec<u8> arena
//!     ├── Block × n   [Header | payload]  contiguous, no gaps
//!     └── Sentinel    zero-length header in the last 4 bytes
//! ```
//!
//! # Operations
//!
//! - **initialize**: one free block spanning the arena, then the sentinel.
//!   Runs inside [`Heap::new`]; calling it again discards every allocation.
//! - **allocate**: first fit from the lowest address; the unused tail of
//!   the chosen block is split off when it can hold a header.
//! - **free**: marks the block free, absorbs free blocks that follow it,
//!   then merges into a free predecessor found by rescanning from the start.
//!
//! Free blocks are never left adjacent to each other, and the blocks plus
//! the sentinel always tile the arena exactly. [`Heap::validate`] checks
//! both.
//!
//! ```rust
//! use wordheap_arena::{Heap, HeapConfig};
//!
//! let mut heap = Heap::new(HeapConfig::for_payload_words(64)).unwrap();
//! let p = heap.allocate(10).unwrap();
//! heap.payload_mut(p).unwrap()[0] = 0x2a;
//! assert!(heap.allocate(2000).is_err());
//! heap.free(p).unwrap();
//! assert_eq!(heap.stats().unwrap().free_words, 64);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod header;
pub mod heap;
pub mod inspect;
pub mod ptr;

// Public re-exports for the primary API surface.
pub use config::{ConfigError, HeapConfig};
pub use error::{CorruptReason, HeapError};
pub use header::{words_for_bytes, Header};
pub use heap::Heap;
pub use inspect::{Blocks, HeapStats};
pub use ptr::{BlockInfo, HeapPtr};
