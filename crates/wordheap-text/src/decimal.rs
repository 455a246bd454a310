//! Integer to decimal string conversion.

use wordheap_arena::{Heap, HeapPtr};

use crate::error::TextError;
use crate::string::store;

/// Store the base-10 form of `value`, with a leading `-` when negative.
pub fn decimal(heap: &mut Heap, value: i32) -> Result<HeapPtr, TextError> {
    // Longest form is "-2147483648".
    let mut buf = [0u8; 11];
    let mut start = buf.len();
    let mut magnitude = value.unsigned_abs();
    loop {
        start -= 1;
        buf[start] = b'0' + (magnitude % 10) as u8;
        magnitude /= 10;
        if magnitude == 0 {
            break;
        }
    }
    if value < 0 {
        start -= 1;
        buf[start] = b'-';
    }
    store(heap, &buf[start..])
}
