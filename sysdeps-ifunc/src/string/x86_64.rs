//! SSE2 and AVX2 kernels
//!
//! Each kernel compares one vector of bytes against a splatted needle and
//! turns the comparison into a bit mask; the lowest set bit is the first
//! match. The tail shorter than one vector falls back to the portable loop.
//!
//! The safe wrappers are only reachable through candidates whose
//! requirements name the enabled feature.

use core::arch::x86_64::*;

use super::{copy_through, generic};

pub(crate) fn memchr_sse2(haystack: &[u8], needle: u8) -> Option<usize> {
    // SAFETY: selected only when SSE2 was detected.
    unsafe { memchr_sse2_impl(haystack, needle) }
}

pub(crate) fn memchr_avx2(haystack: &[u8], needle: u8) -> Option<usize> {
    // SAFETY: selected only when AVX2 was detected.
    unsafe { memchr_avx2_impl(haystack, needle) }
}

pub(crate) fn memccpy_sse2(dst: &mut [u8], src: &[u8], c: u8) -> Option<usize> {
    let src = &src[..dst.len().min(src.len())];
    copy_through(dst, src, memchr_sse2(src, c))
}

#[target_feature(enable = "sse2")]
unsafe fn memchr_sse2_impl(haystack: &[u8], needle: u8) -> Option<usize> {
    const LANES: usize = 16;

    let mut chunks = haystack.chunks_exact(LANES);
    let mut offset = 0;
    unsafe {
        let splat = _mm_set1_epi8(needle as i8);
        for chunk in &mut chunks {
            // Unaligned load of exactly LANES bytes.
            let block = _mm_loadu_si128(chunk.as_ptr().cast::<__m128i>());
            let mask = _mm_movemask_epi8(_mm_cmpeq_epi8(block, splat)) as u32;
            if mask != 0 {
                return Some(offset + mask.trailing_zeros() as usize);
            }
            offset += LANES;
        }
    }
    generic::memchr(chunks.remainder(), needle).map(|i| offset + i)
}

#[target_feature(enable = "avx2")]
unsafe fn memchr_avx2_impl(haystack: &[u8], needle: u8) -> Option<usize> {
    const LANES: usize = 32;

    let mut chunks = haystack.chunks_exact(LANES);
    let mut offset = 0;
    unsafe {
        let splat = _mm256_set1_epi8(needle as i8);
        for chunk in &mut chunks {
            let block = _mm256_loadu_si256(chunk.as_ptr().cast::<__m256i>());
            let mask = _mm256_movemask_epi8(_mm256_cmpeq_epi8(block, splat)) as u32;
            if mask != 0 {
                return Some(offset + mask.trailing_zeros() as usize);
            }
            offset += LANES;
        }
    }
    // The tail is shorter than 32 bytes; SSE2 is implied by AVX2.
    unsafe { memchr_sse2_impl(chunks.remainder(), needle) }.map(|i| offset + i)
}
