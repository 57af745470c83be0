//! Bounded worker pools.
use std::thread;

use crossbeam_channel::Receiver;

use super::semaphore::Semaphore;
use super::shutdown::Shutdown;
use crate::error::Error;

/// Run `work` on each item received on `items`, with at most `workers` items in flight.
///
/// Each item is handled on its own thread, spawned once a permit is available.
/// The first error stops the run through `shutdown`. Once stopping, remaining items are
/// received and dropped without being worked on, so that upstream stages never block.
///
/// Returns when `items` is disconnected and every worker is done.
pub fn for_each_bounded<T, F>(items: Receiver<T>, workers: usize, shutdown: &Shutdown, work: F)
where
    T: Send,
    F: Fn(T) -> Result<(), Error> + Sync,
{
    let semaphore = Semaphore::new(workers.max(1));
    let work = &work;

    thread::scope(|s| {
        for item in items.iter() {
            if shutdown.is_requested() {
                continue;
            }

            let permit = semaphore.acquire();
            s.spawn(move || {
                let _permit = permit;
                if let Err(e) = work(item) {
                    shutdown.fail(e);
                }
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crossbeam_channel::bounded;

    use super::*;

    #[test]
    fn works_on_every_item() {
        let (cancel, _) = bounded(0);
        let shutdown = Shutdown::new(cancel);
        let (tx, rx) = bounded(4);
        let sum = AtomicUsize::new(0);

        thread::scope(|s| {
            s.spawn(move || {
                for i in 1..=100 {
                    tx.send(i).unwrap();
                }
            });
            for_each_bounded(rx, 8, &shutdown, |i| {
                sum.fetch_add(i, Ordering::SeqCst);
                Ok(())
            });
        });

        assert_eq!(sum.load(Ordering::SeqCst), 5050);
        assert!(shutdown.into_result().is_ok());
    }

    #[test]
    fn drains_after_failure() {
        let (cancel, _) = bounded(0);
        let shutdown = Shutdown::new(cancel);
        let (tx, rx) = bounded(1);

        thread::scope(|s| {
            // would block forever if items stopped being received
            s.spawn(move || {
                for i in 0..1000 {
                    tx.send(i).unwrap();
                }
            });
            for_each_bounded(rx, 1, &shutdown, |i| {
                if i == 3 {
                    Err(Error::Custom("boom".to_string()))
                } else {
                    Ok(())
                }
            });
        });

        assert!(matches!(shutdown.into_result(), Err(Error::Custom(_))));
    }
}
