//! Owned scratch files.
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::error::Error;

/// Path to an intermediate file that is removed from disk when dropped.
///
/// Stages call [ScratchFile::remove] once the file is consumed so that removal
/// errors are reported; dropping is the fallback on every other exit path.
#[derive(Debug)]
pub struct ScratchFile {
    path: Option<PathBuf>,
}

impl ScratchFile {
    /// Take ownership of the file at `path`. The file does not need to exist yet.
    pub fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    pub fn path(&self) -> &Path {
        // path is only taken by remove, which consumes self.
        self.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// Remove the file now.
    pub fn remove(mut self) -> Result<(), Error> {
        if let Some(path) = self.path.take() {
            debug!("removing {:?}", path);
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            match fs::remove_file(&path) {
                Ok(()) => debug!("cleaned up {:?}", path),
                Err(e) if e.kind() == ErrorKind::NotFound => (),
                Err(e) => warn!("could not clean up {:?}: {}", path, e),
            }
        }
    }
}
