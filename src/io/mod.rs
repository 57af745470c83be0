/*!
# IO utilities

Scratch files of the intermediate stages and thread-safe language shards.
!*/
mod langfiles;
mod scratch;

pub use langfiles::LangFiles;
pub use scratch::ScratchFile;
