//! NEON kernels

use core::arch::aarch64::*;

use super::{copy_through, generic};

pub(crate) fn memchr_neon(haystack: &[u8], needle: u8) -> Option<usize> {
    // SAFETY: selected only when NEON was detected.
    unsafe { memchr_neon_impl(haystack, needle) }
}

pub(crate) fn memccpy_neon(dst: &mut [u8], src: &[u8], c: u8) -> Option<usize> {
    let src = &src[..dst.len().min(src.len())];
    copy_through(dst, src, memchr_neon(src, c))
}

#[target_feature(enable = "neon")]
unsafe fn memchr_neon_impl(haystack: &[u8], needle: u8) -> Option<usize> {
    const LANES: usize = 16;

    let mut chunks = haystack.chunks_exact(LANES);
    let mut offset = 0;
    unsafe {
        let splat = vdupq_n_u8(needle);
        for chunk in &mut chunks {
            let block = vld1q_u8(chunk.as_ptr());
            // Any lane equal to the needle leaves 0xff in the comparison.
            if vmaxvq_u8(vceqq_u8(block, splat)) != 0 {
                return generic::memchr(chunk, needle).map(|i| offset + i);
            }
            offset += LANES;
        }
    }
    generic::memchr(chunks.remainder(), needle).map(|i| offset + i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neon_matches_generic() {
        for len in [0, 1, 15, 16, 17, 32, 50] {
            let mut bytes = vec![0u8; len];
            assert_eq!(memchr_neon(&bytes, 7), None);
            for at in 0..len {
                bytes.fill(0);
                bytes[at] = 7;
                assert_eq!(memchr_neon(&bytes, 7), Some(at));
            }
        }
    }
}
