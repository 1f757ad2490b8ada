use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// A lightweight binary semaphore built on Mutex and Condvar.
///
/// Provides the signaling the queue and the blocking write path need;
/// nothing more.
#[derive(Debug, Default)]
pub struct SemaphoreLite {
    mutex: Mutex<bool>,
    cond_var: Condvar,
}

impl SemaphoreLite {
    pub fn new() -> Self {
        SemaphoreLite {
            mutex: Mutex::new(false),
            cond_var: Condvar::new(),
        }
    }

    /// Signals all waiting threads.
    pub fn signal(&self) {
        let mut guard = self.mutex.lock();
        *guard = true;
        self.cond_var.notify_all();
    }

    /// Waits until signaled.
    pub fn wait(&self) {
        let mut guard = self.mutex.lock();
        while !*guard {
            self.cond_var.wait(&mut guard);
        }
        *guard = false;
    }

    /// Waits until signaled or the timeout elapses. Returns `true` if
    /// signaled.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let mut guard = self.mutex.lock();
        while !*guard {
            if self.cond_var.wait_for(&mut guard, duration).timed_out() {
                return false;
            }
        }
        *guard = false;
        true
    }
}
