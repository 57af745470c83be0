//! Discovery stage: walk the source tree and send regular file paths downstream.
use std::{
    path::{Path, PathBuf},
    thread::{self, JoinHandle},
};

use crossbeam_channel::{bounded, select, Receiver, TryRecvError};
use log::{debug, info};
use walkdir::WalkDir;

use crate::error::Error;

/// Pending traversal. Check it once the path channel is drained.
pub struct Walk {
    handle: JoinHandle<Result<usize, Error>>,
}

impl Walk {
    /// Wait for the traversal to end, returning the number of emitted paths.
    ///
    /// # Errors
    /// [Error::Cancelled] if the walk was cancelled, [Error::Walk] on traversal failures.
    pub fn wait(self) -> Result<usize, Error> {
        self.handle
            .join()
            .unwrap_or_else(|_| Err(Error::Custom("discovery thread panicked".to_string())))
    }
}

/// Walk `root` on a new thread, sending every regular file path on the returned channel.
///
/// Directories, symlinks and other non-regular entries are skipped.
/// The walk stops with [Error::Cancelled] as soon as `cancel` is disconnected.
pub fn walk(root: &Path, cancel: Receiver<()>, capacity: usize) -> (Receiver<PathBuf>, Walk) {
    let (paths, rx) = bounded(capacity);
    let root = root.to_path_buf();

    let handle = thread::spawn(move || -> Result<usize, Error> {
        let mut found = 0;
        for entry in WalkDir::new(&root) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            // both branches may be ready at once, do not leave it to select
            if cancel.try_recv() == Err(TryRecvError::Disconnected) {
                return Err(Error::Cancelled);
            }

            let path = entry.into_path();
            debug!("found {:?}", path);
            select! {
                send(paths, path) -> res => {
                    if res.is_err() {
                        // nobody listens anymore
                        return Err(Error::Cancelled);
                    }
                }
                recv(cancel) -> _ => return Err(Error::Cancelled),
            }
            found += 1;
        }

        info!("discovered {} files in {:?}", found, root);
        Ok(found)
    });

    (rx, Walk { handle })
}
