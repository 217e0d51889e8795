//! One-at-a-time admission for conversation-mutating operations.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, MutexGuard};

/// FIFO gate: waiters are admitted in arrival order and a permit is released on drop,
/// including when the holder fails or is cancelled.
#[derive(Debug, Default)]
pub struct SerializationGate {
    lock: Mutex<()>,
    queued: AtomicUsize,
}

#[derive(Debug)]
pub struct GatePermit<'a> {
    _guard: MutexGuard<'a, ()>,
    waited: Duration,
}

impl GatePermit<'_> {
    pub fn waited(&self) -> Duration {
        self.waited
    }
}

impl SerializationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self) -> GatePermit<'_> {
        let started = Instant::now();
        let _slot = QueueSlot::enter(&self.queued);
        let guard = self.lock.lock().await;

        GatePermit {
            _guard: guard,
            waited: started.elapsed(),
        }
    }

    pub fn try_acquire(&self) -> Option<GatePermit<'_>> {
        self.lock.try_lock().ok().map(|guard| GatePermit {
            _guard: guard,
            waited: Duration::ZERO,
        })
    }

    /// Callers currently waiting for a permit, not counting the holder.
    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::Acquire)
    }

    pub fn is_held(&self) -> bool {
        self.lock.try_lock().is_err()
    }
}

struct QueueSlot<'a>(&'a AtomicUsize);

impl<'a> QueueSlot<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(counter)
    }
}

impl Drop for QueueSlot<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}
