//! In-flight request tracking and graceful-shutdown coordination.
//!
//! The coordinator pairs a one-way `accepting` flag with an in-flight
//! counter. Handlers ask for admission before doing any work; shutdown flips
//! the flag and then polls the counter until every admitted request has
//! finished. Lock-free atomics are deliberate: contention is high-frequency
//! and short-lived, and the only cross-task state is the flag/counter pair.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::time::Duration;

/// Tracks whether new requests may be admitted and how many are in flight.
///
/// `accepting` transitions true→false exactly once per process lifetime and
/// never back; `in_flight` never observes a negative value because decrements
/// only happen through [`AdmissionGuard`] drops.
#[derive(Debug)]
pub struct DrainCoordinator {
    accepting: AtomicBool,
    in_flight: AtomicI32,
}

impl Default for DrainCoordinator {
    fn default() -> Self {
        Self {
            accepting: AtomicBool::new(true),
            in_flight: AtomicI32::new(0),
        }
    }
}

impl DrainCoordinator {
    /// Create a coordinator that is accepting work with nothing in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask to admit one request.
    ///
    /// Returns `None` without touching the counter once the service has
    /// stopped accepting. Otherwise increments the in-flight count and
    /// returns a guard whose drop releases the slot, so every exit path of a
    /// handler pays the counter back.
    pub fn try_enter(&self) -> Option<AdmissionGuard<'_>> {
        if !self.accepting.load(Ordering::SeqCst) {
            return None;
        }
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        Some(AdmissionGuard { coordinator: self })
    }

    /// Stop admitting new requests. Idempotent; already-admitted requests
    /// keep running until their guards drop.
    pub fn stop_accepting(&self) {
        self.accepting.store(false, Ordering::SeqCst);
    }

    /// True while the service still admits new requests.
    pub fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::SeqCst)
    }

    /// Number of requests currently executing.
    pub fn in_flight(&self) -> i32 {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Block until every in-flight request has finished.
    ///
    /// Polls the counter, yielding to the runtime between checks rather than
    /// busy-spinning. Returns immediately when the counter is already zero.
    /// There is no timeout: a handler that never completes stalls the
    /// shutdown sequence, which is the documented behaviour.
    pub async fn drain(&self, poll_interval: Duration) {
        loop {
            if self.in_flight() == 0 {
                return;
            }
            if poll_interval.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(poll_interval).await;
            }
        }
    }
}

/// RAII admission slot; dropping it decrements the in-flight counter.
#[derive(Debug)]
pub struct AdmissionGuard<'a> {
    coordinator: &'a DrainCoordinator,
}

impl Drop for AdmissionGuard<'_> {
    fn drop(&mut self) {
        self.coordinator.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
