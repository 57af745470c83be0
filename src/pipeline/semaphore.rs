//! Counting semaphore bounding the number of concurrent workers of a stage.
use std::sync::{Condvar, Mutex, PoisonError};

pub struct Semaphore {
    permits: Mutex<usize>,
    cond: Condvar,
}

/// Releases its permit on drop.
pub struct Permit<'a>(&'a Semaphore);

impl Semaphore {
    pub fn new(permits: usize) -> Self {
        Self {
            permits: Mutex::new(permits),
            cond: Condvar::new(),
        }
    }

    /// Block until a permit is available, then take it.
    pub fn acquire(&self) -> Permit<'_> {
        let mut permits = self.permits.lock().unwrap_or_else(PoisonError::into_inner);
        while *permits == 0 {
            permits = self
                .cond
                .wait(permits)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *permits -= 1;
        Permit(self)
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        let mut permits = self.0.permits.lock().unwrap_or_else(PoisonError::into_inner);
        *permits += 1;
        self.0.cond.notify_one();
    }
}
