//! Wordheap: a first-fit, word-granular heap living inside one fixed byte arena.
//!
//! This is the top-level facade crate that re-exports the public API of the
//! Wordheap sub-crates. For most users, adding `wordheap` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use wordheap::prelude::*;
//!
//! let mut heap = Heap::new(HeapConfig::for_payload_words(64)).unwrap();
//!
//! let a = heap.allocate(5).unwrap();
//! let b = heap.allocate(5).unwrap();
//! heap.free(a).unwrap();
//! heap.free(b).unwrap();
//! assert_eq!(heap.stats().unwrap().free_blocks, 1);
//!
//! let greeting = wordheap::text::store(&mut heap, b"hello").unwrap();
//! assert_eq!(wordheap::text::length(&heap, greeting), Ok(5));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `wordheap-arena` | `Heap`, configuration, headers, inspection |
//! | [`text`] | `wordheap-text` | NUL-terminated strings stored in the heap |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// The allocator itself (`wordheap-arena`).
///
/// [`arena::Heap`] owns the arena; [`arena::HeapConfig`] sizes and places
/// it. Block headers are described by [`arena::Header`].
pub use wordheap_arena as arena;

/// String helpers built on the allocator (`wordheap-text`).
pub use wordheap_text as text;

/// Common imports for typical Wordheap usage.
///
/// ```rust
/// use wordheap::prelude::*;
/// ```
pub mod prelude {
    pub use wordheap_arena::{BlockInfo, Heap, HeapConfig, HeapPtr, HeapStats};

    // Errors
    pub use wordheap_arena::{ConfigError, HeapError};
    pub use wordheap_text::TextError;
}
