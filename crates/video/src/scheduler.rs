//! Deferred-work scheduler.
//!
//! Slide settling waits out the transition before touching playback. The
//! scheduler holds those deferred closures in submission order; the host
//! drives them by advancing time, which keeps the timing observable in
//! tests instead of racing a wall clock.

use parking_lot::Mutex;
use std::time::Duration;

type Deferred = Box<dyn FnOnce() + Send>;

struct Entry {
    due: Duration,
    work: Deferred,
}

/// A virtual-time queue of deferred closures.
#[derive(Default)]
pub struct Scheduler {
    state: Mutex<SchedulerState>,
}

#[derive(Default)]
struct SchedulerState {
    now: Duration,
    entries: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `work` to run once `delay` has elapsed.
    pub fn defer(&self, delay: Duration, work: Deferred) {
        let mut state = self.state.lock();
        let due = state.now + delay;
        state.entries.push(Entry { due, work });
    }

    /// Advance virtual time and run everything that came due, in
    /// submission order. Work queued by running entries lands in the next
    /// advance.
    pub fn advance(&self, delta: Duration) {
        let due: Vec<Deferred> = {
            let mut state = self.state.lock();
            state.now += delta;
            let now = state.now;
            let mut ready = Vec::new();
            let mut remaining = Vec::new();
            for entry in state.entries.drain(..) {
                if entry.due <= now {
                    ready.push(entry.work);
                } else {
                    remaining.push(entry);
                }
            }
            state.entries = remaining;
            ready
        };
        for work in due {
            work();
        }
    }

    /// Run every queued closure regardless of its deadline.
    pub fn run_all(&self) {
        loop {
            let due: Vec<Deferred> = {
                let mut state = self.state.lock();
                state.entries.drain(..).map(|e| e.work).collect()
            };
            if due.is_empty() {
                return;
            }
            for work in due {
                work();
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.state.lock().entries.len()
    }
}
