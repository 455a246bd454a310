//! Store, read, measure, compare, search, and join heap strings.

use std::cmp::Ordering;

use log::trace;
use wordheap_arena::{Heap, HeapPtr};

use crate::error::TextError;

/// Copy `bytes` into a new block and terminate it.
pub fn store(heap: &mut Heap, bytes: &[u8]) -> Result<HeapPtr, TextError> {
    if let Some(index) = bytes.iter().position(|&b| b == 0) {
        return Err(TextError::InteriorNul { index });
    }
    let ptr = heap.allocate_bytes(bytes.len() + 1)?;
    let payload = heap.payload_mut(ptr)?;
    payload[..bytes.len()].copy_from_slice(bytes);
    payload[bytes.len()] = 0;
    trace!("stored {} bytes at {ptr}", bytes.len());
    Ok(ptr)
}

/// The string's bytes, without the terminator.
pub fn read(heap: &Heap, ptr: HeapPtr) -> Result<&[u8], TextError> {
    let payload = heap.payload(ptr)?;
    let end = payload
        .iter()
        .position(|&b| b == 0)
        .ok_or(TextError::Unterminated { addr: ptr.addr() })?;
    Ok(&payload[..end])
}

/// Length in bytes, without the terminator.
pub fn length(heap: &Heap, ptr: HeapPtr) -> Result<usize, TextError> {
    read(heap, ptr).map(<[u8]>::len)
}

/// Bytewise comparison; a proper prefix orders first.
pub fn compare(heap: &Heap, a: HeapPtr, b: HeapPtr) -> Result<Ordering, TextError> {
    Ok(read(heap, a)?.cmp(read(heap, b)?))
}

/// Index of the first occurrence of `needle` in `haystack`.
///
/// An empty needle matches at 0.
pub fn find(heap: &Heap, haystack: HeapPtr, needle: HeapPtr) -> Result<Option<usize>, TextError> {
    let hay = read(heap, haystack)?;
    let needle = read(heap, needle)?;
    if needle.is_empty() {
        return Ok(Some(0));
    }
    Ok(hay.windows(needle.len()).position(|w| w == needle))
}

/// A new string holding `a` followed by `b`. The inputs are left alone.
pub fn concat(heap: &mut Heap, a: HeapPtr, b: HeapPtr) -> Result<HeapPtr, TextError> {
    let mut joined = Vec::with_capacity(length(heap, a)? + length(heap, b)?);
    joined.extend_from_slice(read(heap, a)?);
    joined.extend_from_slice(read(heap, b)?);
    store(heap, &joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordheap_arena::{HeapConfig, HeapError};

    fn heap() -> Heap {
        Heap::new(HeapConfig::for_payload_words(128)).unwrap()
    }

    #[test]
    fn store_sizes_the_block_for_the_terminator() {
        let mut h = heap();
        let even = store(&mut h, b"abcd").unwrap();
        let odd = store(&mut h, b"abc").unwrap();
        assert_eq!(h.payload(even).unwrap().len(), 6);
        assert_eq!(h.payload(odd).unwrap().len(), 4);
        assert_eq!(read(&h, even).unwrap(), b"abcd");
        assert_eq!(read(&h, odd).unwrap(), b"abc");
    }

    #[test]
    fn empty_string_takes_one_word() {
        let mut h = heap();
        let p = store(&mut h, b"").unwrap();
        assert_eq!(h.payload(p).unwrap(), &[0, 0]);
        assert_eq!(length(&h, p), Ok(0));
    }

    #[test]
    fn interior_nul_is_rejected_before_allocating() {
        let mut h = heap();
        assert_eq!(store(&mut h, b"ab\0cd"), Err(TextError::InteriorNul { index: 2 }));
        assert_eq!(h.stats().unwrap().occupied_blocks, 0);
    }

    #[test]
    fn unterminated_block_is_reported() {
        let mut h = heap();
        let p = h.allocate(2).unwrap();
        h.payload_mut(p).unwrap().copy_from_slice(b"wxyz");
        assert_eq!(read(&h, p), Err(TextError::Unterminated { addr: p.addr() }));
    }

    #[test]
    fn compare_orders_bytewise() {
        let mut h = heap();
        let apple = store(&mut h, b"apple").unwrap();
        let app = store(&mut h, b"app").unwrap();
        let banana = store(&mut h, b"banana").unwrap();
        assert_eq!(compare(&h, app, apple), Ok(Ordering::Less));
        assert_eq!(compare(&h, banana, apple), Ok(Ordering::Greater));
        assert_eq!(compare(&h, apple, apple), Ok(Ordering::Equal));
    }

    #[test]
    fn find_locates_first_match() {
        let mut h = heap();
        let hay = store(&mut h, b"abcabc").unwrap();
        let bc = store(&mut h, b"bc").unwrap();
        let zz = store(&mut h, b"zz").unwrap();
        let empty = store(&mut h, b"").unwrap();
        assert_eq!(find(&h, hay, bc), Ok(Some(1)));
        assert_eq!(find(&h, hay, zz), Ok(None));
        assert_eq!(find(&h, hay, empty), Ok(Some(0)));
        assert_eq!(find(&h, bc, hay), Ok(None));
    }

    #[test]
    fn concat_leaves_inputs_intact() {
        let mut h = heap();
        let a = store(&mut h, b"foo").unwrap();
        let b = store(&mut h, b"bar").unwrap();
        let ab = concat(&mut h, a, b).unwrap();
        assert_eq!(read(&h, ab).unwrap(), b"foobar");
        assert_eq!(read(&h, a).unwrap(), b"foo");
        assert_eq!(read(&h, b).unwrap(), b"bar");
    }

    #[test]
    fn concat_reports_exhaustion() {
        let mut h = Heap::new(HeapConfig::for_payload_words(12)).unwrap();
        let a = store(&mut h, b"12345").unwrap();
        let b = store(&mut h, b"67").unwrap();
        assert!(matches!(
            concat(&mut h, a, b),
            Err(TextError::Heap(HeapError::OutOfMemory { .. }))
        ));
    }

    #[test]
    fn freed_string_is_no_longer_readable() {
        let mut h = heap();
        let a = store(&mut h, b"gone").unwrap();
        h.free(a).unwrap();
        assert_eq!(
            read(&h, a),
            Err(TextError::Heap(HeapError::NotAllocated { addr: a.addr() }))
        );
    }
}
