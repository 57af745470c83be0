//! Run-wide failure state.
//!
//! The first fatal error is kept, and the cancellation channel is closed so that
//! the discovery stage stops walking. Stages check [Shutdown::is_requested]
//! before dispatching new work, and drain their input otherwise.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crossbeam_channel::Sender;
use log::{debug, error};

use crate::error::Error;

pub struct Shutdown {
    requested: AtomicBool,
    error: Mutex<Option<Error>>,
    cancel: Mutex<Option<Sender<()>>>,
}

impl Shutdown {
    /// `cancel` is never sent on: dropping it is the signal.
    pub fn new(cancel: Sender<()>) -> Self {
        Self {
            requested: AtomicBool::new(false),
            error: Mutex::new(None),
            cancel: Mutex::new(Some(cancel)),
        }
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Record a fatal error and stop the run.
    ///
    /// Only the first error is kept, later ones are usually consequences of it.
    pub fn fail(&self, e: Error) {
        self.requested.store(true, Ordering::SeqCst);

        let mut slot = self.error.lock().unwrap_or_else(PoisonError::into_inner);
        match *slot {
            None => {
                error!("{}", e);
                *slot = Some(e);
            }
            Some(_) => debug!("already stopping, ignoring: {}", e),
        }
        drop(slot);

        self.cancel();
    }

    /// Close the cancellation channel. Closing twice is a no-op.
    pub fn cancel(&self) {
        self.requested.store(true, Ordering::SeqCst);
        let sender = self
            .cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if sender.is_some() {
            debug!("cancelling run");
        }
    }

    /// First recorded error, if any.
    pub fn into_result(self) -> Result<(), Error> {
        match self.error.into_inner().unwrap_or_else(PoisonError::into_inner) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
