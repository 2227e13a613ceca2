//! The syscall fallback dispatcher
//!
//! Each request runs a small state machine:
//!
//! ```text
//! AttemptModern --ENOSYS--> AttemptFallback --flags ok--> older primitive
//!       |                          |
//!       +--other error--> Failed <-+--flags rejected (ENOTSUP)
//! ```
//!
//! The modern call's availability is cached per family: it starts as the
//! kernel probe's answer and drops to absent the first time the kernel
//! reports `ENOSYS`, after which requests go straight to the fallback
//! check. The flag check itself is per request and never cached.

use spin::Once;
use sysdeps_api::sync::{AtomicBool, AtomicUsize, Ordering};
use sysdeps_api::{sys_info, sys_trace};
use sysdeps_api::{Availability, Error, Fd, KernelProbe, Result, Sysno};

use crate::cancel::{cancellation_point, Cancellation, NeverCancel};
use crate::core::flags::RwfFlags;
use crate::core::offset::Offset;
use crate::core::traits::{RawIo, RawResult};
use crate::policy::{FallbackPolicy, Route};
use crate::uio::{IoSlice, IoSliceMut};

/// States of one dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Issue the modern syscall with the full flag set
    AttemptModern,
    /// The modern syscall is absent; consult the fallback policy
    AttemptFallback,
    /// Terminal failure
    Failed(Error),
}

/// What a dispatch did and what it produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    /// The primitive whose outcome is `result`, or `None` when the request
    /// was rejected before any primitive could serve it
    pub route: Option<Route>,
    /// Byte count or error
    pub result: Result<usize>,
}

/// Modern-call availability for one syscall family
struct FamilyState {
    probed: Once<Availability>,
    absent: AtomicBool,
}

impl FamilyState {
    const fn new() -> Self {
        Self {
            probed: Once::new(),
            absent: AtomicBool::new(false),
        }
    }

    fn availability<P: KernelProbe>(&self, probe: &P, modern: Sysno) -> Availability {
        if self.absent.load(Ordering::Acquire) {
            return Availability::Absent;
        }
        *self.probed.call_once(|| {
            let answer = probe.has_syscall(modern);
            if answer == Availability::Absent {
                sys_info!("kernel probe reports {} absent; using fallbacks", modern);
            }
            answer
        })
    }

    fn mark_absent(&self, modern: Sysno) {
        if !self.absent.swap(true, Ordering::AcqRel) {
            sys_info!("{} returned ENOSYS; using fallbacks", modern);
        }
    }
}

/// Counters of dispatch outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchStats {
    /// Requests served by the modern syscall
    pub modern: usize,
    /// Requests served by the position-less older primitive
    pub positionless: usize,
    /// Requests served by the positional older primitive
    pub positional: usize,
    /// Requests rejected because the fallback cannot honor their flags
    pub unsupported: usize,
}

struct StatCounters {
    modern: AtomicUsize,
    positionless: AtomicUsize,
    positional: AtomicUsize,
    unsupported: AtomicUsize,
}

impl StatCounters {
    const fn new() -> Self {
        Self {
            modern: AtomicUsize::new(0),
            positionless: AtomicUsize::new(0),
            positional: AtomicUsize::new(0),
            unsupported: AtomicUsize::new(0),
        }
    }

    fn record(&self, route: Route) {
        let counter = match route {
            Route::Modern => &self.modern,
            Route::Positionless => &self.positionless,
            Route::Positional => &self.positional,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> DispatchStats {
        DispatchStats {
            modern: self.modern.load(Ordering::Relaxed),
            positionless: self.positionless.load(Ordering::Relaxed),
            positional: self.positional.load(Ordering::Relaxed),
            unsupported: self.unsupported.load(Ordering::Relaxed),
        }
    }
}

/// Dispatches `preadv2`/`pwritev2` requests, falling back on old kernels
pub struct Dispatcher<R, P, C = NeverCancel> {
    raw: R,
    probe: P,
    cancel: C,
    read: FamilyState,
    write: FamilyState,
    stats: StatCounters,
}

impl<R: RawIo, P: KernelProbe> Dispatcher<R, P, NeverCancel> {
    /// Create a dispatcher over a raw backend and a kernel probe
    pub const fn new(raw: R, probe: P) -> Self {
        Self {
            raw,
            probe,
            cancel: NeverCancel,
            read: FamilyState::new(),
            write: FamilyState::new(),
            stats: StatCounters::new(),
        }
    }
}

impl<R: RawIo, P: KernelProbe, C: Cancellation> Dispatcher<R, P, C> {
    /// Replace the cancellation source
    pub fn with_cancellation<D: Cancellation>(self, cancel: D) -> Dispatcher<R, P, D> {
        Dispatcher {
            raw: self.raw,
            probe: self.probe,
            cancel,
            read: self.read,
            write: self.write,
            stats: self.stats,
        }
    }

    /// Vectored read with per-call flags
    pub fn preadv2(&self, fd: Fd, bufs: &mut [IoSliceMut<'_>], offset: Offset, flags: RwfFlags) -> Result<usize> {
        self.perform_read(fd, bufs, offset, flags).result
    }

    /// Vectored write with per-call flags
    pub fn pwritev2(&self, fd: Fd, bufs: &[IoSlice<'_>], offset: Offset, flags: RwfFlags) -> Result<usize> {
        self.perform_write(fd, bufs, offset, flags).result
    }

    /// Run a read request and report the route taken
    pub fn perform_read(&self, fd: Fd, bufs: &mut [IoSliceMut<'_>], offset: Offset, flags: RwfFlags) -> Dispatch {
        let raw = &self.raw;
        self.run(&FallbackPolicy::PREADV2, &self.read, offset, flags, |route| match route {
            Route::Modern => raw.preadv2(fd, bufs, offset.raw(), flags),
            Route::Positionless => raw.readv(fd, bufs),
            Route::Positional => raw.preadv(fd, bufs, offset.raw()),
        })
    }

    /// Run a write request and report the route taken
    pub fn perform_write(&self, fd: Fd, bufs: &[IoSlice<'_>], offset: Offset, flags: RwfFlags) -> Dispatch {
        let raw = &self.raw;
        self.run(&FallbackPolicy::PWRITEV2, &self.write, offset, flags, |route| match route {
            Route::Modern => raw.pwritev2(fd, bufs, offset.raw(), flags),
            Route::Positionless => raw.writev(fd, bufs),
            Route::Positional => raw.pwritev(fd, bufs, offset.raw()),
        })
    }

    /// What the dispatcher currently believes about a family's modern call
    pub fn modern_availability(&self, policy: &FallbackPolicy) -> Availability {
        if policy.modern == FallbackPolicy::PWRITEV2.modern {
            self.write.availability(&self.probe, policy.modern)
        } else {
            self.read.availability(&self.probe, policy.modern)
        }
    }

    /// Snapshot of the outcome counters
    pub fn stats(&self) -> DispatchStats {
        self.stats.snapshot()
    }

    /// The raw backend
    pub fn raw(&self) -> &R {
        &self.raw
    }

    fn run<I>(&self, policy: &FallbackPolicy, family: &FamilyState, offset: Offset, flags: RwfFlags, mut issue: I) -> Dispatch
    where
        I: FnMut(Route) -> RawResult,
    {
        let mut state = if family.availability(&self.probe, policy.modern).worth_attempting() {
            DispatchState::AttemptModern
        } else {
            DispatchState::AttemptFallback
        };
        let mut route = None;

        loop {
            sys_trace!("{}: {:?}", policy.family, state);
            match state {
                DispatchState::AttemptModern => {
                    route = Some(Route::Modern);
                    match cancellation_point(&self.cancel, || issue(Route::Modern)) {
                        Err(err) if err.is_not_implemented() => {
                            family.mark_absent(policy.modern);
                            state = DispatchState::AttemptFallback;
                        }
                        Err(err) => state = DispatchState::Failed(err),
                        Ok(n) => {
                            self.stats.record(Route::Modern);
                            return Dispatch { route, result: Ok(n) };
                        }
                    }
                }
                DispatchState::AttemptFallback => {
                    if let Err(err) = policy.check(flags) {
                        self.stats.unsupported.fetch_add(1, Ordering::Relaxed);
                        route = None;
                        state = DispatchState::Failed(err);
                        continue;
                    }
                    let fallback = policy.route(offset);
                    route = Some(fallback);
                    sys_trace!("{}: falling back to {}", policy.family, policy.sysno(fallback));
                    let result = cancellation_point(&self.cancel, || issue(fallback));
                    if result.is_ok() {
                        self.stats.record(fallback);
                    }
                    return Dispatch { route, result };
                }
                DispatchState::Failed(err) => return Dispatch { route, result: Err(err) },
            }
        }
    }
}
