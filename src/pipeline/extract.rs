//! Extraction stage: decompress a gzipped shard into the extraction directory.
use flate2::read::MultiGzDecoder;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Error;
use crate::io::ScratchFile;

/// Destination of the decompressed `file`: `.../result/0.txt.gz` becomes `dst_dir/0.txt`.
pub fn artifact_path(file: &Path, dst_dir: &Path) -> Result<PathBuf, Error> {
    let stem = file
        .file_stem()
        .ok_or_else(|| Error::Custom(format!("no file name: {:?}", file)))?;
    Ok(dst_dir.join(stem))
}

/// Decompress `file` (every gzip member of it) into `dst_dir`.
///
/// The destination must not exist: two sources with the same name would
/// otherwise silently share an artifact.
/// The returned [ScratchFile] owns the artifact.
pub fn extract(file: &Path, dst_dir: &Path) -> Result<ScratchFile, Error> {
    let src = File::open(file)?;
    let dst = artifact_path(file, dst_dir)?;

    let out = OpenOptions::new().write(true).create_new(true).open(&dst)?;
    // owned from now on, removed if anything below fails
    let artifact = ScratchFile::new(dst);

    let mut gzd = MultiGzDecoder::new(BufReader::new(src));
    let mut out = BufWriter::new(out);
    let bytes = std::io::copy(&mut gzd, &mut out)?;
    out.flush()?;

    debug!(
        "decompressed {:?} into {:?} ({} bytes)",
        file,
        artifact.path(),
        bytes
    );
    Ok(artifact)
}
