//! Dispatcher tests against the running kernel

#![cfg(target_os = "linux")]

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::os::fd::AsRawFd;
use std::path::PathBuf;

use sysdeps_api::core::traits::AttemptProbe;
use sysdeps_api::{Errno, Error, ErrorClass, Fd, KernelProbe};
use sysdeps_syscalls::*;

const CONTENT: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A file in the temp directory, removed on drop
struct TempFile {
    path: PathBuf,
    file: File,
}

impl TempFile {
    fn new(name: &str, content: &[u8]) -> Self {
        let path = std::env::temp_dir().join(format!("sysdeps-{}-{}", std::process::id(), name));
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .unwrap();
        file.write_all(content).unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();
        Self { path, file }
    }

    fn fd(&self) -> Fd {
        self.file.as_raw_fd()
    }

    fn position(&mut self) -> u64 {
        self.file.stream_position().unwrap()
    }

    fn contents(&self) -> Vec<u8> {
        fs::read(&self.path).unwrap()
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// A kernel without `preadv2`/`pwritev2`: the modern calls report ENOSYS,
/// the older primitives run for real.
struct OldKernel;

impl RawIo for OldKernel {
    fn preadv2(&self, _fd: Fd, _bufs: &mut [IoSliceMut<'_>], _offset: i64, _flags: RwfFlags) -> RawResult {
        Err(Errno::ENOSYS)
    }

    fn readv(&self, fd: Fd, bufs: &mut [IoSliceMut<'_>]) -> RawResult {
        LinuxRawIo.readv(fd, bufs)
    }

    fn preadv(&self, fd: Fd, bufs: &mut [IoSliceMut<'_>], offset: i64) -> RawResult {
        LinuxRawIo.preadv(fd, bufs, offset)
    }

    fn pwritev2(&self, _fd: Fd, _bufs: &[IoSlice<'_>], _offset: i64, _flags: RwfFlags) -> RawResult {
        Err(Errno::ENOSYS)
    }

    fn writev(&self, fd: Fd, bufs: &[IoSlice<'_>]) -> RawResult {
        LinuxRawIo.writev(fd, bufs)
    }

    fn pwritev(&self, fd: Fd, bufs: &[IoSlice<'_>], offset: i64) -> RawResult {
        LinuxRawIo.pwritev(fd, bufs, offset)
    }
}

#[test]
fn test_scatter_read_at_offset() {
    let mut file = TempFile::new("scatter", CONTENT);
    let mut head = [0u8; 4];
    let mut tail = [0u8; 6];
    let mut bufs = [IoSliceMut::new(&mut head), IoSliceMut::new(&mut tail)];

    let n = default_dispatcher()
        .preadv2(file.fd(), &mut bufs, Offset::At(10), RwfFlags::empty())
        .unwrap();
    assert_eq!(n, 10);
    assert_eq!(&head, b"abcd");
    assert_eq!(&tail, b"efghij");
    assert_eq!(file.position(), 0);
}

#[test]
fn test_read_at_current_position_advances() {
    let mut file = TempFile::new("current", CONTENT);
    let mut buf = [0u8; 5];

    for expected in [b"01234", b"56789"] {
        let mut bufs = [IoSliceMut::new(&mut buf)];
        let n = default_dispatcher()
            .preadv2(file.fd(), &mut bufs, Offset::Current, RwfFlags::empty())
            .unwrap();
        assert_eq!(n, 5);
        assert_eq!(&buf, expected);
    }
    assert_eq!(file.position(), 10);
}

#[test]
fn test_gather_write() {
    let file = TempFile::new("gather", CONTENT);
    let bufs = [IoSlice::new(b"AB"), IoSlice::new(b"CD")];

    let n = default_dispatcher()
        .pwritev2(file.fd(), &bufs, Offset::At(2), RwfFlags::empty())
        .unwrap();
    assert_eq!(n, 4);
    assert_eq!(&file.contents()[..8], b"01ABCD67");
}

#[test]
fn test_bad_descriptor_verbatim() {
    let mut buf = [0u8; 1];
    let mut bufs = [IoSliceMut::new(&mut buf)];
    let err = default_dispatcher()
        .preadv2(-1, &mut bufs, Offset::Current, RwfFlags::empty())
        .unwrap_err();
    assert_eq!(err, Error::Os(Errno::EBADF));
    assert_eq!(err.class(), ErrorClass::Runtime);
}

#[test]
fn test_negative_explicit_offset_rejected_by_kernel() {
    let file = TempFile::new("negative", CONTENT);
    let mut buf = [0u8; 1];
    let mut bufs = [IoSliceMut::new(&mut buf)];
    let err = default_dispatcher()
        .preadv2(file.fd(), &mut bufs, Offset::At(-5), RwfFlags::empty())
        .unwrap_err();
    assert_eq!(err, Error::Os(Errno::EINVAL));
}

#[test]
fn test_unknown_flag_is_not_supported() {
    let file = TempFile::new("unknown-flag", CONTENT);
    let mut buf = [0u8; 1];
    let mut bufs = [IoSliceMut::new(&mut buf)];
    let err = default_dispatcher()
        .preadv2(file.fd(), &mut bufs, Offset::At(0), RwfFlags::from_bits_retain(0x4000_0000))
        .unwrap_err();
    // A kernel with preadv2 rejects unknown RWF bits with EOPNOTSUPP; one
    // without it reaches the fallback, which rejects any flag the same way.
    assert_eq!(err.errno(), Errno::ENOTSUP);
}

#[test]
fn test_old_kernel_current_offset_uses_readv() {
    let mut file = TempFile::new("old-current", CONTENT);
    let dispatcher = Dispatcher::new(OldKernel, AttemptProbe);
    let mut buf = [0u8; 3];
    let mut bufs = [IoSliceMut::new(&mut buf)];

    let dispatch = dispatcher.perform_read(file.fd(), &mut bufs, Offset::Current, RwfFlags::empty());
    assert_eq!(dispatch.route, Some(Route::Positionless));
    assert_eq!(dispatch.result, Ok(3));
    assert_eq!(&buf, b"012");
    assert_eq!(file.position(), 3);
}

#[test]
fn test_old_kernel_explicit_offset_uses_preadv() {
    let mut file = TempFile::new("old-explicit", CONTENT);
    let dispatcher = Dispatcher::new(OldKernel, AttemptProbe);
    let mut buf = [0u8; 3];
    let mut bufs = [IoSliceMut::new(&mut buf)];

    let dispatch = dispatcher.perform_read(file.fd(), &mut bufs, Offset::At(100), RwfFlags::empty());
    assert_eq!(dispatch.route, Some(Route::Positional));
    assert_eq!(dispatch.result, Ok(0));

    let dispatch = dispatcher.perform_read(file.fd(), &mut bufs, Offset::At(33), RwfFlags::empty());
    assert_eq!(dispatch.result, Ok(3));
    assert_eq!(&buf, b"xyz");
    assert_eq!(file.position(), 0);
}

#[test]
fn test_old_kernel_flags_leave_file_untouched() {
    let file = TempFile::new("old-flags", CONTENT);
    let dispatcher = Dispatcher::new(OldKernel, AttemptProbe);
    let bufs = [IoSlice::new(b"XXXX")];

    let dispatch = dispatcher.perform_write(file.fd(), &bufs, Offset::At(0), RwfFlags::DSYNC);
    assert_eq!(dispatch.route, None);
    assert_eq!(dispatch.result.unwrap_err().errno(), Errno::ENOTSUP);
    assert_eq!(file.contents(), CONTENT);
}

#[test]
fn test_old_kernel_write_at_current_position() {
    let mut file = TempFile::new("old-writev", CONTENT);
    file.file.seek(SeekFrom::Start(4)).unwrap();
    let dispatcher = Dispatcher::new(OldKernel, AttemptProbe);
    let bufs = [IoSlice::new(b"--")];

    assert_eq!(dispatcher.pwritev2(file.fd(), &bufs, Offset::Current, RwfFlags::empty()), Ok(2));
    assert_eq!(file.position(), 6);

    let mut reread = String::new();
    File::open(&file.path).unwrap().read_to_string(&mut reread).unwrap();
    assert!(reread.starts_with("0123--6789"));
}

#[test]
fn test_kernel_probe_agrees_with_dispatch() {
    let probe = LinuxKernelProbe;
    let available = probe.has_syscall(sysdeps_api::Sysno::Preadv2);
    let file = TempFile::new("probe", CONTENT);
    let mut buf = [0u8; 2];
    let mut bufs = [IoSliceMut::new(&mut buf)];

    let dispatch = default_dispatcher().perform_read(file.fd(), &mut bufs, Offset::At(0), RwfFlags::empty());
    assert_eq!(dispatch.result, Ok(2));
    match available {
        sysdeps_api::Availability::Present => assert_eq!(dispatch.route, Some(Route::Modern)),
        _ => assert_eq!(dispatch.route, Some(Route::Positional)),
    }
}
