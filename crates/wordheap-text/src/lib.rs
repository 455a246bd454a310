//! NUL-terminated byte strings stored in a [`Heap`](wordheap_arena::Heap).
//!
//! These helpers are clients of the allocator's byte-oriented contract:
//! each string occupies one block sized `ceil((len + 1) / 2)` words, holds
//! its bytes followed by a single `0`, and is released with
//! [`Heap::free`](wordheap_arena::Heap::free) like any other block.
//!
//! ```rust
//! use wordheap_arena::{Heap, HeapConfig};
//! use wordheap_text as text;
//!
//! let mut heap = Heap::new(HeapConfig::for_payload_words(64)).unwrap();
//! let score = text::decimal(&mut heap, -120).unwrap();
//! let label = text::store(&mut heap, b"score: ").unwrap();
//! let line = text::concat(&mut heap, label, score).unwrap();
//! assert_eq!(text::read(&heap, line).unwrap(), b"score: -120");
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod decimal;
pub mod error;
pub mod string;

pub use decimal::decimal;
pub use error::TextError;
pub use string::{compare, concat, find, length, read, store};
