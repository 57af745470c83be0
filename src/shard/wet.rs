use std::{fs::File, io::BufReader, path::Path};

use crate::error::Error;
use std::io::BufRead;

use super::record::{read_record, skip_terminator, Record};

/// Wet/Shard instance, generic over reader type.
///
/// Iterates over the records of a *decompressed* shard,
/// consuming the block terminator after each record.
/// Iteration stops after the first error.
pub struct Wet<T> {
    reader: T,
    done: bool,
}

/// Wet reader over a decompressed file.
impl Wet<BufReader<File>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<T: BufRead> Wet<T> {
    pub fn new(reader: T) -> Self {
        Self {
            reader,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for Wet<R> {
    type Item = Result<Record, Error>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let next = read_record(&mut self.reader)
            .and_then(|record| match record {
                Some(r) => skip_terminator(&mut self.reader).map(|_| Some(r)),
                None => Ok(None),
            })
            .transpose();

        if !matches!(next, Some(Ok(_))) {
            self.done = true;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::Wet;

    fn shard(bodies: &[&str]) -> String {
        bodies
            .iter()
            .map(|b| {
                format!(
                    "WARC/1.0\r\nWARC-Type: conversion\r\nContent-Length: {}\r\n\r\n{}\r\n\r\n",
                    b.len(),
                    b
                )
            })
            .collect()
    }

    #[test]
    fn record_count() {
        let bodies = ["", "hello world\n", "second\nrecord\n", ""];
        let wet = Wet::new(Cursor::new(shard(&bodies)));
        let records: Vec<_> = wet.collect::<Result<_, _>>().unwrap();

        assert_eq!(records.len(), bodies.len());
        for (record, body) in records.iter().zip(bodies.iter()) {
            assert_eq!(record.body(), body.as_bytes());
        }
    }

    #[test]
    fn missing_final_terminator() {
        let mut raw = shard(&["abc", "def"]);
        raw.truncate(raw.len() - 4);
        let wet = Wet::new(Cursor::new(raw));
        assert_eq!(wet.filter(|r| r.is_ok()).count(), 2);
    }

    #[test]
    fn stops_after_error() {
        let mut raw = shard(&["abc"]);
        raw.push_str("WARC/1.0\r\nContent-Length: -1\r\n\r\n");
        raw.push_str(&shard(&["def"]));

        let results: Vec<_> = Wet::new(Cursor::new(raw)).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].as_ref().unwrap_err().is_format());
    }
}
