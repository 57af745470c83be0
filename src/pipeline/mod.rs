//! Pipelines.
//!
//! The classification pipeline is made of four stages connected by bounded channels:
//! [discovery], [extract], [identify] and [merge].
//! [Goclassy] wires them together.
use crate::error::Error;

mod config;
pub mod discovery;
pub mod extract;
mod goclassy;
pub mod identify;
pub mod merge;
mod pool;
mod semaphore;
mod shutdown;

pub use config::{Config, MIN_LINE_LENGTH, THRESHOLD};
pub use goclassy::{Goclassy, Summary};

/// A runnable pipeline, generic over what the run reports back.
pub trait Pipeline<T> {
    fn run(&self) -> Result<T, Error>;
}
