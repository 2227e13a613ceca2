//! Memory and string primitives with ISA variants
//!
//! Each primitive has a constant candidate table and a process-wide binding.
//! Slots for variants not built on the current target are `None`, so the
//! tables have the same shape everywhere.
//!
//! | operation | candidates, most preferred first |
//! |-----------|----------------------------------|
//! | `memchr`  | `x86_64/avx2`, `x86_64/sse2`, `aarch64/neon`, `s390x/vx`, `generic` |
//! | `memccpy` | `z13/vx`, `x86_64/sse2`, `aarch64/neon`, `c` |
//!
//! The s390x vector variants are placeholders: there are no stable s390x
//! vector intrinsics to write them with, so those slots are always empty.

use static_assertions::const_assert;
use sysdeps_api::{HwCaps, Result};

use crate::binding::Binding;
use crate::candidate::{Candidate, CandidateTable};
use crate::registry;

pub(crate) mod generic;

#[cfg(target_arch = "x86_64")]
mod x86_64;

#[cfg(target_arch = "aarch64")]
mod aarch64;

/// Signature of `memchr` implementations
pub type MemchrFn = fn(&[u8], u8) -> Option<usize>;

/// Signature of `memccpy` implementations
pub type MemccpyFn = fn(&mut [u8], &[u8], u8) -> Option<usize>;

#[cfg(target_arch = "x86_64")]
const MEMCHR_AVX2: Option<MemchrFn> = Some(x86_64::memchr_avx2);
#[cfg(not(target_arch = "x86_64"))]
const MEMCHR_AVX2: Option<MemchrFn> = None;

#[cfg(target_arch = "x86_64")]
const MEMCHR_SSE2: Option<MemchrFn> = Some(x86_64::memchr_sse2);
#[cfg(not(target_arch = "x86_64"))]
const MEMCHR_SSE2: Option<MemchrFn> = None;

#[cfg(target_arch = "aarch64")]
const MEMCHR_NEON: Option<MemchrFn> = Some(aarch64::memchr_neon);
#[cfg(not(target_arch = "aarch64"))]
const MEMCHR_NEON: Option<MemchrFn> = None;

#[cfg(target_arch = "x86_64")]
const MEMCCPY_SSE2: Option<MemccpyFn> = Some(x86_64::memccpy_sse2);
#[cfg(not(target_arch = "x86_64"))]
const MEMCCPY_SSE2: Option<MemccpyFn> = None;

#[cfg(target_arch = "aarch64")]
const MEMCCPY_NEON: Option<MemccpyFn> = Some(aarch64::memccpy_neon);
#[cfg(not(target_arch = "aarch64"))]
const MEMCCPY_NEON: Option<MemccpyFn> = None;

const MEMCHR_CANDIDATES: &[Candidate<MemchrFn>] = crate::candidates![
    "x86_64/avx2" => HwCaps::AVX2 => MEMCHR_AVX2,
    "x86_64/sse2" => HwCaps::SSE2 => MEMCHR_SSE2,
    "aarch64/neon" => HwCaps::NEON => MEMCHR_NEON,
    "s390x/vx" => HwCaps::VX => None,
    "generic" => HwCaps::empty() => Some(generic::memchr as MemchrFn),
];

const MEMCCPY_CANDIDATES: &[Candidate<MemccpyFn>] = crate::candidates![
    "z13/vx" => HwCaps::VX => None,
    "x86_64/sse2" => HwCaps::SSE2 => MEMCCPY_SSE2,
    "aarch64/neon" => HwCaps::NEON => MEMCCPY_NEON,
    "c" => HwCaps::empty() => Some(generic::memccpy as MemccpyFn),
];

/// Candidate table for `memchr`
pub const MEMCHR_TABLE: CandidateTable<MemchrFn> = CandidateTable::new("memchr", MEMCHR_CANDIDATES);

/// Candidate table for `memccpy`
pub const MEMCCPY_TABLE: CandidateTable<MemccpyFn> = CandidateTable::new("memccpy", MEMCCPY_CANDIDATES);

const_assert!(MEMCHR_TABLE.is_well_formed());
const_assert!(MEMCCPY_TABLE.is_well_formed());

static MEMCHR: Binding<MemchrFn> = Binding::new(MEMCHR_TABLE);
static MEMCCPY: Binding<MemccpyFn> = Binding::new(MEMCCPY_TABLE);

/// Returns the index of the first `needle` in `haystack`
#[inline]
pub fn memchr(haystack: &[u8], needle: u8) -> Option<usize> {
    (MEMCHR.func())(haystack, needle)
}

/// Copy from `src` into `dst` up to and including the first `c`.
///
/// At most `min(dst.len(), src.len())` bytes are copied. Returns the number
/// of bytes copied when `c` was found, `None` when it was not (in which case
/// every byte in range was copied).
#[inline]
pub fn memccpy(dst: &mut [u8], src: &[u8], c: u8) -> Option<usize> {
    (MEMCCPY.func())(dst, src, c)
}

/// The process-wide `memchr` binding
pub fn memchr_binding() -> &'static Binding<MemchrFn> {
    &MEMCHR
}

/// The process-wide `memccpy` binding
pub fn memccpy_binding() -> &'static Binding<MemccpyFn> {
    &MEMCCPY
}

/// Validate the built-in tables and register their bindings
pub fn register_builtin() -> Result<()> {
    MEMCHR_TABLE.validate()?;
    MEMCCPY_TABLE.validate()?;
    registry::register(&MEMCHR)?;
    registry::register(&MEMCCPY)
}

/// Copy `src[..len]` where `len` covers the match at `found`, or all of `src`.
/// `src` must already be trimmed to the copy bound.
#[cfg_attr(not(any(target_arch = "x86_64", target_arch = "aarch64")), allow(dead_code))]
fn copy_through(dst: &mut [u8], src: &[u8], found: Option<usize>) -> Option<usize> {
    let len = found.map_or(src.len(), |i| i + 1);
    dst[..len].copy_from_slice(&src[..len]);
    found.map(|i| i + 1)
}
