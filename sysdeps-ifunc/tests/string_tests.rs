//! String primitive tests
//!
//! Every variant the host can run must behave exactly like the baseline.

use proptest::prelude::*;
use sysdeps_ifunc::string::{self, MemccpyFn, MemchrFn, MEMCCPY_TABLE, MEMCHR_TABLE};
use sysdeps_ifunc::{host_caps, Selected};

fn runnable_memchr() -> Vec<Selected<MemchrFn>> {
    let caps = host_caps();
    MEMCHR_TABLE
        .candidates
        .iter()
        .filter(|c| c.is_selectable(caps))
        .filter_map(|c| c.func.map(|func| Selected::new(c.name, func)))
        .collect()
}

fn runnable_memccpy() -> Vec<Selected<MemccpyFn>> {
    let caps = host_caps();
    MEMCCPY_TABLE
        .candidates
        .iter()
        .filter(|c| c.is_selectable(caps))
        .filter_map(|c| c.func.map(|func| Selected::new(c.name, func)))
        .collect()
}

#[test]
fn test_baseline_always_runnable() {
    assert_eq!(runnable_memchr().last().map(|s| s.name), Some("generic"));
    assert_eq!(runnable_memccpy().last().map(|s| s.name), Some("c"));
}

#[test]
fn test_bound_variant_is_most_preferred_runnable() {
    assert_eq!(
        string::memchr_binding().selected_name(),
        runnable_memchr()[0].name
    );
    assert_eq!(
        string::memccpy_binding().selected_name(),
        runnable_memccpy()[0].name
    );
}

#[test]
fn test_memchr_entry_point() {
    let text = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit";
    assert_eq!(string::memchr(text, b','), Some(26));
    assert_eq!(string::memchr(text, b'Z'), None);
    assert_eq!(string::memchr(&[], 0), None);
}

#[test]
fn test_memccpy_entry_point() {
    let mut dst = [0u8; 64];
    let src = b"user:password:uid";
    assert_eq!(string::memccpy(&mut dst, src, b':'), Some(5));
    assert_eq!(&dst[..5], b"user:");
    assert_eq!(dst[5], 0);

    let mut short = [0u8; 4];
    assert_eq!(string::memccpy(&mut short, src, b'!'), None);
    assert_eq!(&short, b"user");
}

#[test]
fn test_memccpy_terminator_past_destination() {
    let mut dst = [0u8; 3];
    assert_eq!(string::memccpy(&mut dst, b"abcd:", b':'), None);
    assert_eq!(&dst, b"abc");
}

proptest! {
    #[test]
    fn prop_memchr_variants_agree(
        haystack in proptest::collection::vec(any::<u8>(), 0..300),
        needle in any::<u8>(),
    ) {
        let expected = haystack.iter().position(|&b| b == needle);
        for variant in runnable_memchr() {
            prop_assert_eq!((variant.func)(&haystack, needle), expected, "variant {}", variant.name);
        }
    }

    #[test]
    fn prop_memccpy_variants_agree(
        src in proptest::collection::vec(any::<u8>(), 0..200),
        dst_len in 0usize..200,
        c in any::<u8>(),
    ) {
        let mut expected = vec![0xa5u8; dst_len];
        let expected_ret = runnable_memccpy().last().map(|baseline| (baseline.func)(&mut expected, &src, c)).unwrap();

        for variant in runnable_memccpy() {
            let mut dst = vec![0xa5u8; dst_len];
            let ret = (variant.func)(&mut dst, &src, c);
            prop_assert_eq!(ret, expected_ret, "variant {}", variant.name);
            prop_assert_eq!(&dst, &expected, "variant {}", variant.name);
        }
    }
}
