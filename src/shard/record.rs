//! WARC record parsing.
//!
//! ```text
//! warc-record  = header CRLF
//!                block CRLF CRLF
//! ```
//!
//! [read_record] reads the header and exactly `Content-Length` bytes of block.
//! It does **not** consume the trailing `CRLF CRLF`: this is up to the caller
//! (see [crate::shard::Wet], which does it through [skip_terminator]).
use std::io::{BufRead, Read};

use crate::error::Error;

/// Version line every record has to start with.
pub const WARC_VERSION: &str = "WARC/1.0\r\n";
const CRLF: &[u8] = b"\r\n";
const CONTENT_LENGTH: &str = "content-length";

/// Raw record: verbatim header bytes and a body of exactly `Content-Length` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    header: Vec<u8>,
    body: Vec<u8>,
}

impl Record {
    /// Header block, version line included, without the terminating blank line.
    ///
    /// Kept as bytes: only the `Content-Length` value has to be text.
    pub fn header(&self) -> &[u8] {
        &self.header
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Read one record from `reader`.
///
/// Returns `Ok(None)` when the reader is exhausted before a new record begins.
///
/// # Errors
/// [Error::Format] on a bad version line, a missing, duplicate, negative or non-numeric
/// `Content-Length`, a header cut by the end of the stream or a truncated body.
pub fn read_record<R: BufRead>(reader: &mut R) -> Result<Option<Record>, Error> {
    let mut line = Vec::new();
    if reader.read_until(b'\n', &mut line)? == 0 {
        return Ok(None);
    }

    if line != WARC_VERSION.as_bytes() {
        return Err(Error::Format(format!(
            "warc version expected, '{}' found",
            String::from_utf8_lossy(&line).trim_end()
        )));
    }

    let mut header = line.clone();
    let mut content_length = None;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Err(Error::Format(format!(
                "header finished unexpectedly: {}",
                String::from_utf8_lossy(&header)
            )));
        }
        if line == CRLF {
            break;
        }

        if let Some(value) = content_length_value(&line) {
            if content_length.is_some() {
                return Err(Error::Format(
                    "exactly one content-length should be present in a WARC header".to_string(),
                ));
            }
            content_length = Some(parse_content_length(value)?);
        }

        header.extend_from_slice(&line);
    }

    let content_length = content_length.ok_or_else(|| {
        Error::Format(format!(
            "exactly one content-length should be present in a WARC header. WARC header: {}",
            String::from_utf8_lossy(&header)
        ))
    })?;

    if content_length == 0 {
        return Ok(Some(Record {
            header,
            body: Vec::new(),
        }));
    }

    // take + read_to_end loops over short reads and stops at the end of stream,
    // which leaves us to check for truncation.
    let mut body = Vec::with_capacity(content_length.min(1 << 20));
    reader
        .by_ref()
        .take(content_length as u64)
        .read_to_end(&mut body)?;

    if body.len() < content_length {
        return Err(Error::Format(format!(
            "record truncated: Content-Length {}, got {}",
            content_length,
            body.len()
        )));
    }

    Ok(Some(Record { header, body }))
}

/// Consume the two line breaks that close a record block.
///
/// The end of the stream is accepted in place of either of them.
/// Anything else means the declared `Content-Length` does not match the block,
/// and reading on would start the next record in the middle of this one.
pub fn skip_terminator<R: BufRead>(reader: &mut R) -> Result<(), Error> {
    let mut line = Vec::with_capacity(2);
    for _ in 0..2 {
        line.clear();
        reader.read_until(b'\n', &mut line)?;
        if !(line.is_empty() || line == CRLF || line == b"\n") {
            return Err(Error::Format(format!(
                "record terminator expected, '{}' found",
                String::from_utf8_lossy(&line).trim_end()
            )));
        }
    }
    Ok(())
}

/// Returns the raw value if `field` is a `Content-Length` header (key is case-insensitive).
fn content_length_value(field: &[u8]) -> Option<&[u8]> {
    let colon = field.iter().position(|b| *b == b':')?;
    let (key, value) = field.split_at(colon);
    key.eq_ignore_ascii_case(CONTENT_LENGTH.as_bytes())
        .then(|| &value[1..])
}

fn parse_content_length(value: &[u8]) -> Result<usize, Error> {
    let value = String::from_utf8_lossy(value);
    // field value may be preceded by any amount of linear whitespace
    let value = value.trim();
    let length: i64 = value
        .parse()
        .map_err(|e| Error::Format(format!("invalid content-length '{}': {}", value, e)))?;

    usize::try_from(length)
        .map_err(|_| Error::Format(format!("content-length should be non-negative, got {}", length)))
}
