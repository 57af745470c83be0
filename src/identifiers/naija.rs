//! Nigerian Pidgin keyword scorer.
//!
//! Answers with the oracle protocol (one `__label__naija <prob>` line per input line),
//! so that it can stand in for fastText in the pipeline.
use std::io::{BufRead, Write};

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Error;

pub const LABEL: &str = "naija";
const MATCH_PROB: f32 = 0.95;
const NO_MATCH_PROB: f32 = 0.38;

lazy_static! {
    static ref KEYWORDS: Regex = Regex::new(
        r"(?i)(\B|^)(anoda|comot|dem|dey|di|dia|don\s|doti|everitin|im|na|pickin|pickins|pikin|pesin|waka|wetin|wen|wan|wella|wey|wuna|sey)(\B|$)"
    )
    .expect("invalid pidgin pattern");
}

/// Confidence that `line` is Nigerian Pidgin.
///
/// `line` is matched as read, line break included: a keyword ending the line is
/// followed by `\n`, which is neither a non-boundary nor the end of text.
pub fn score(line: &str) -> f32 {
    if KEYWORDS.is_match(line) {
        MATCH_PROB
    } else {
        NO_MATCH_PROB
    }
}

/// Score every `\n`-terminated line of `input`, writing one answer per line to `output`.
///
/// An unterminated last line is not answered.
pub fn run<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<(), Error> {
    let mut line = String::new();
    while input.read_line(&mut line)? > 0 && line.ends_with('\n') {
        writeln!(output, "__label__{} {}", LABEL, score(&line))?;
        line.clear();
    }
    output.flush()?;
    Ok(())
}
