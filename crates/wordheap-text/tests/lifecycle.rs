use wordheap_test_utils::{assert_invariants, assert_pristine, heap_with_words};
use wordheap_text::{concat, decimal, find, length, read, store, TextError};

#[test]
fn building_a_report_line_then_releasing_everything() {
    let mut heap = heap_with_words(96);
    let mut owned = Vec::new();

    let mut line = store(&mut heap, b"totals:").unwrap();
    owned.push(line);
    for value in [12, -3, 450] {
        let sep = store(&mut heap, b" ").unwrap();
        let num = decimal(&mut heap, value).unwrap();
        let with_sep = concat(&mut heap, line, sep).unwrap();
        line = concat(&mut heap, with_sep, num).unwrap();
        owned.extend([sep, num, with_sep, line]);
        assert_invariants(&heap);
    }

    assert_eq!(read(&heap, line).unwrap(), b"totals: 12 -3 450");
    assert_eq!(length(&heap, line), Ok(17));
    let needle = store(&mut heap, b"-3").unwrap();
    assert_eq!(find(&heap, line, needle), Ok(Some(11)));
    owned.push(needle);

    for p in owned {
        heap.free(p).unwrap();
    }
    assert_pristine(&heap);
}

#[test]
fn exhaustion_surfaces_as_a_heap_error() {
    let mut heap = heap_with_words(4);
    store(&mut heap, b"abcdef").unwrap();
    assert!(matches!(store(&mut heap, b"x"), Err(TextError::Heap(_))));
    assert_invariants(&heap);
}
