//! Shard/WET utils.
//!
//! [record] holds the WARC framing parser, and [wet::Wet] implements [Iterator]
//! over the [record::Record]s of a decompressed shard, taking care of the
//! block terminators between records.
pub mod record;
pub mod wet;

pub use record::{read_record, Record};
pub use wet::Wet;
