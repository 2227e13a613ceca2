//! End-to-end tests through the public entry points

use proptest::prelude::*;
use sysdeps::*;

#[test]
fn test_resolution_is_stable() {
    init().unwrap();
    for op in registered_operations() {
        let first = resolve(op).unwrap();
        assert_eq!(resolve(op).unwrap(), first);
    }
}

#[test]
fn test_mask_rejected_after_detection() {
    let _ = host_caps();
    let err = set_hwcap_mask(HwCapMask::disabling(HwCaps::AVX2)).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Configuration);
}

#[test]
fn test_memccpy_stops_after_terminator() {
    let mut dst = [b'.'; 12];
    assert_eq!(memccpy(&mut dst, b"path/to/file", b'/'), Some(5));
    assert_eq!(&dst, b"path/.......");
    assert_eq!(memccpy(&mut dst, b"nothing", b'/'), None);
    assert_eq!(&dst[..7], b"nothing");
}

#[cfg(target_os = "linux")]
mod io {
    use std::fs::{self, OpenOptions};
    use std::io::{Seek, SeekFrom, Write};
    use std::os::fd::AsRawFd;

    use super::*;

    #[test]
    fn test_write_then_read_back() {
        let path = std::env::temp_dir().join(format!("sysdeps-facade-{}", std::process::id()));
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .unwrap();
        file.write_all(b"----------").unwrap();
        let fd = file.as_raw_fd();

        let out = [IoSlice::new(b"he"), IoSlice::new(b"llo")];
        assert_eq!(pwritev2(fd, &out, 3, 0), Ok(5));

        let mut a = [0u8; 3];
        let mut b = [0u8; 5];
        let mut bufs = [IoSliceMut::new(&mut a), IoSliceMut::new(&mut b)];
        assert_eq!(preadv2(fd, &mut bufs, 1, 0), Ok(8));
        assert_eq!(&a, b"--h");
        assert_eq!(&b, b"ello-");

        file.seek(SeekFrom::Start(8)).unwrap();
        let mut tail = [0u8; 4];
        let mut bufs = [IoSliceMut::new(&mut tail)];
        assert_eq!(preadv2(fd, &mut bufs, -1, 0), Ok(2));
        assert_eq!(&tail[..2], b"--");

        drop(file);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_bad_descriptor_is_reported() {
        let mut buf = [0u8; 2];
        let mut bufs = [IoSliceMut::new(&mut buf)];
        assert_eq!(preadv2(-1, &mut bufs, 0, 0), Err(Error::Os(Errno::EBADF)));
    }
}

proptest! {
    #[test]
    fn prop_memchr_matches_position(haystack in proptest::collection::vec(any::<u8>(), 0..512), needle: u8) {
        prop_assert_eq!(memchr(&haystack, needle), haystack.iter().position(|&b| b == needle));
    }
}
