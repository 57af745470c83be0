//! Line identification stage.
//!
//! Each artifact is split into records and lines. Lines that are long enough
//! are written to a *clean* file and, at the same time, to the oracle,
//! whose answers are stored verbatim in a *predictions* file.
//! Line `n` of the clean file is answered by line `n` of the predictions file.
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use log::{debug, info};

use crate::error::Error;
use crate::identifiers::Oracle;
use crate::io::ScratchFile;
use crate::shard::Wet;

/// Clean lines and their predictions, line for line.
#[derive(Debug)]
pub struct Identified {
    pub clean: ScratchFile,
    pub predictions: ScratchFile,
    pub lines: usize,
}

/// Lines of a record body that are sent to the oracle, line break included:
/// valid utf-8 and strictly more than `min_length` chars long, counting the line break.
///
/// Only `\n`-terminated lines are candidates: an unterminated tail is dropped.
/// We use chars(), that gives Unicode scalar values, not graphemes.
pub fn candidate_lines(body: &[u8], min_length: usize) -> impl Iterator<Item = &str> {
    body.split_inclusive(|b| *b == b'\n')
        .filter(|line| line.ends_with(b"\n"))
        .filter_map(|line| std::str::from_utf8(line).ok())
        .filter(move |line| line.chars().count() > min_length)
}

/// Write the candidate lines of every record both to `clean` and `oracle`.
///
/// Returns the number of written lines.
pub fn feed<R, C, O>(
    records: Wet<R>,
    clean: &mut C,
    oracle: &mut O,
    min_length: usize,
) -> Result<usize, Error>
where
    R: BufRead,
    C: Write,
    O: Write,
{
    let mut fed = 0;
    for record in records {
        let record = record?;
        for line in candidate_lines(record.body(), min_length) {
            clean.write_all(line.as_bytes())?;
            oracle.write_all(line.as_bytes())?;
            fed += 1;
        }
    }
    clean.flush()?;
    Ok(fed)
}

/// Identify the lines of `artifact`, writing clean lines and predictions into `tmp_dir`.
///
/// The artifact is removed once consumed. On error, every file created here is removed too.
pub fn identify(
    artifact: ScratchFile,
    tmp_dir: &Path,
    oracle: &Oracle,
    min_length: usize,
) -> Result<Identified, Error> {
    let name = artifact
        .path()
        .file_name()
        .ok_or_else(|| Error::Custom(format!("no file name: {:?}", artifact.path())))?
        .to_string_lossy()
        .into_owned();

    info!("identifying {:?}", artifact.path());

    let records = Wet::from_path(artifact.path())?;

    let clean = ScratchFile::new(tmp_dir.join(format!("{}_clean.txt", name)));
    let mut clean_writer = BufWriter::new(File::create(clean.path())?);

    let predictions = ScratchFile::new(tmp_dir.join(format!("{}_tag.txt", name)));
    let mut predictions_writer = BufWriter::new(File::create(predictions.path())?);

    let lines = oracle
        .run(
            move |stdin| feed(records, &mut clean_writer, stdin, min_length),
            &mut predictions_writer,
        )
        .map_err(|e| e.at(artifact.path()))?;
    drop(predictions_writer);

    debug!("{:?}: {} lines sent to the oracle", artifact.path(), lines);
    artifact.remove()?;

    Ok(Identified {
        clean,
        predictions,
        lines,
    })
}
