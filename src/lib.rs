//! # goclassy
//!
//! Line-level language classification of Common Crawl WET shards.
//!
//! Compressed shards are decompressed, their lines identified by an external
//! oracle (fastText by default), and reliably identified paragraphs are appended
//! to one file per language.
//!
//! ```no_run
//! use std::path::PathBuf;
//! use goclassy::pipeline::{Config, Goclassy, Pipeline};
//!
//! let mut config = Config::new(PathBuf::from("shards"));
//! config.create_dirs = true;
//! let summary = Goclassy::new(config).run()?;
//! println!("{} lines written", summary.written);
//! # Ok::<(), goclassy::error::Error>(())
//! ```
pub mod error;
pub mod identifiers;
pub mod io;
pub mod lang;
pub mod pipeline;
pub mod shard;
