//! Portable byte-at-a-time kernels

/// Find the first `needle` in `haystack`
pub(crate) fn memchr(haystack: &[u8], needle: u8) -> Option<usize> {
    haystack.iter().position(|&b| b == needle)
}

/// Copy bytes from `src` to `dst` up to and including the first `c`
pub(crate) fn memccpy(dst: &mut [u8], src: &[u8], c: u8) -> Option<usize> {
    for (i, (d, &s)) in dst.iter_mut().zip(src).enumerate() {
        *d = s;
        if s == c {
            return Some(i + 1);
        }
    }
    None
}
