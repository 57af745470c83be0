//! Merge-and-shard stage.
//!
//! Clean lines and predictions are read in lock-step. Lines whose confidence
//! is above the threshold are grouped into [ParagraphRun]s of consecutive lines of
//! the same language, and each run is appended to its language file in one piece.
use std::fs::File;
use std::io::{BufRead, BufReader};

use itertools::{EitherOrBoth, Itertools};
use log::debug;

use super::identify::Identified;
use crate::error::Error;
use crate::identifiers::Identification;
use crate::io::LangFiles;

/// Consecutive lines identified as the same language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphRun {
    lang: String,
    lines: Vec<String>,
}

impl ParagraphRun {
    fn new(lang: &str, line: String) -> Self {
        Self {
            lang: lang.to_string(),
            lines: vec![line],
        }
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Builds [ParagraphRun]s out of a stream of identified lines.
///
/// The first line always starts a new run.
#[derive(Debug, Default)]
pub struct Paragraphs {
    current: Option<ParagraphRun>,
}

impl Paragraphs {
    /// Add a line, returning the previous run if `lang` ends it.
    pub fn push(&mut self, lang: &str, line: String) -> Option<ParagraphRun> {
        if let Some(run) = self.current.as_mut().filter(|run| run.lang == lang) {
            run.lines.push(line);
            return None;
        }
        self.current.replace(ParagraphRun::new(lang, line))
    }

    /// Take the pending run, if any.
    pub fn finish(&mut self) -> Option<ParagraphRun> {
        self.current.take()
    }
}

/// Counts of a single merge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    /// clean lines read
    pub lines: usize,
    /// lines above the threshold
    pub retained: usize,
    /// lines written to language files (lower than retained when deduplicating)
    pub written: usize,
    /// runs written (fully duplicated runs are not)
    pub runs: usize,
}

impl MergeStats {
    fn write_run(&mut self, langfiles: &LangFiles, run: ParagraphRun) -> Result<(), Error> {
        let written = langfiles.append(run.lang(), run.lines())?;
        if written > 0 {
            self.written += written;
            self.runs += 1;
        }
        Ok(())
    }
}

/// Pair clean lines with their predictions and write retained runs into `langfiles`.
///
/// # Errors
/// [Error::Alignment] when one stream is longer than the other or when
/// a prediction can't be parsed.
pub fn merge<C, P>(
    clean: C,
    predictions: P,
    langfiles: &LangFiles,
    threshold: f32,
) -> Result<MergeStats, Error>
where
    C: BufRead,
    P: BufRead,
{
    let mut stats = MergeStats::default();
    let mut paragraphs = Paragraphs::default();

    // clean lines are split on `\n` only, so that they reach the shards verbatim.
    let clean = clean.split(b'\n');
    for (idx, pair) in clean.zip_longest(predictions.lines()).enumerate() {
        let (line, prediction) = match pair {
            EitherOrBoth::Both(line, prediction) => (clean_line(line?, idx)?, prediction?),
            EitherOrBoth::Left(_) => {
                return Err(Error::Alignment(format!(
                    "no prediction for clean line {}",
                    idx + 1
                )))
            }
            EitherOrBoth::Right(_) => {
                return Err(Error::Alignment(format!(
                    "prediction {} has no clean line",
                    idx + 1
                )))
            }
        };

        let id: Identification = prediction.parse()?;
        stats.lines += 1;
        if !id.is_reliable(threshold) {
            continue;
        }
        stats.retained += 1;

        if let Some(run) = paragraphs.push(id.lang(), line) {
            stats.write_run(langfiles, run)?;
        }
    }

    if let Some(run) = paragraphs.finish() {
        stats.write_run(langfiles, run)?;
    }

    Ok(stats)
}

fn clean_line(line: Vec<u8>, idx: usize) -> Result<String, Error> {
    String::from_utf8(line)
        .map_err(|e| Error::Custom(format!("clean line {} is not valid utf-8: {}", idx + 1, e)))
}

/// Merge an [Identified] pair, removing its files once consumed.
pub fn merge_and_shard(
    identified: Identified,
    langfiles: &LangFiles,
    threshold: f32,
) -> Result<MergeStats, Error> {
    let clean = BufReader::new(File::open(identified.clean.path())?);
    let predictions = BufReader::new(File::open(identified.predictions.path())?);

    let stats = merge(clean, predictions, langfiles, threshold)
        .map_err(|e| e.at(identified.clean.path()))?;
    debug!("{:?}: {:?}", identified.clean.path(), stats);

    identified.clean.remove()?;
    identified.predictions.remove()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;

    use tempfile::{tempdir, TempDir};

    use super::*;
    use crate::io::ScratchFile;
    use crate::lang::Vocabulary;

    fn langfiles() -> (TempDir, LangFiles) {
        let dst = tempdir().unwrap();
        let lf = LangFiles::new(dst.path(), &Vocabulary::new(["en", "fr"]), false).unwrap();
        (dst, lf)
    }

    fn read(dst: &TempDir, lang: &str) -> String {
        fs::read_to_string(dst.path().join(format!("{}.txt", lang))).unwrap()
    }

    #[test]
    fn runs() {
        let mut p = Paragraphs::default();
        assert_eq!(p.push("en", "a".into()), None);
        assert_eq!(p.push("en", "b".into()), None);
        let run = p.push("fr", "c".into()).unwrap();
        assert_eq!(run.lang(), "en");
        assert_eq!(run.lines(), ["a", "b"]);

        let run = p.finish().unwrap();
        assert_eq!(run.lang(), "fr");
        assert_eq!(run.lines(), ["c"]);
        assert_eq!(p.finish(), None);
    }

    #[test]
    fn same_lang_single_run() {
        let (dst, lf) = langfiles();
        let clean = "hello world...\nhello again...\n";
        let predictions = "__label__en 0.95\n__label__en 0.95\n";

        let stats = merge(Cursor::new(clean), Cursor::new(predictions), &lf, 0.8).unwrap();
        lf.close().unwrap();

        assert_eq!(stats.runs, 1);
        assert_eq!(read(&dst, "en"), "hello world...\nhello again...\n\n");
    }

    #[test]
    fn language_switch() {
        let (dst, lf) = langfiles();
        let clean = "one\ntwo\ntrois\nfour\n";
        let predictions = "__label__en 0.9\n__label__en 0.9\n__label__fr 0.9\n__label__en 0.9\n";

        let stats = merge(Cursor::new(clean), Cursor::new(predictions), &lf, 0.8).unwrap();
        lf.close().unwrap();

        assert_eq!(stats.runs, 3);
        assert_eq!(read(&dst, "en"), "one\ntwo\n\nfour\n\n");
        assert_eq!(read(&dst, "fr"), "trois\n\n");
    }

    #[test]
    fn threshold() {
        let (dst, lf) = langfiles();
        let clean = "kept\nexactly\nlow\nkept too\n";
        let predictions = "__label__en 0.81\n__label__en 0.8\n__label__fr 0.2\n__label__en 1.00001\n";

        let stats = merge(Cursor::new(clean), Cursor::new(predictions), &lf, 0.8).unwrap();
        lf.close().unwrap();

        assert_eq!(stats.lines, 4);
        assert_eq!(stats.retained, 2);
        // discarded lines do not break runs
        assert_eq!(stats.runs, 1);
        assert_eq!(read(&dst, "en"), "kept\nkept too\n\n");
        assert_eq!(read(&dst, "fr"), "");
    }

    #[test]
    fn carriage_return_kept() {
        let (dst, lf) = langfiles();
        let clean = "windows line\r\nunix line\n";
        let predictions = "__label__en 0.9\r\n__label__en 0.9\n";

        merge(Cursor::new(clean), Cursor::new(predictions), &lf, 0.8).unwrap();
        lf.close().unwrap();

        assert_eq!(read(&dst, "en"), "windows line\r\nunix line\n\n");
    }

    #[test]
    fn nothing_retained() {
        let (dst, lf) = langfiles();
        let stats = merge(Cursor::new("a\n"), Cursor::new("__label__en 0.1\n"), &lf, 0.8).unwrap();
        lf.close().unwrap();

        assert_eq!(stats.runs, 0);
        assert_eq!(read(&dst, "en"), "");
    }

    #[test]
    fn short_predictions() {
        let (_dst, lf) = langfiles();
        let err = merge(
            Cursor::new("a\nb\nc\n"),
            Cursor::new("__label__en 0.9\n__label__en 0.9\n"),
            &lf,
            0.8,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Alignment(_)));
    }

    #[test]
    fn long_predictions() {
        let (_dst, lf) = langfiles();
        let err = merge(
            Cursor::new("a\n"),
            Cursor::new("__label__en 0.9\n__label__en 0.9\n"),
            &lf,
            0.8,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Alignment(_)));
    }

    #[test]
    fn unparsable_prediction() {
        let (_dst, lf) = langfiles();
        let err = merge(Cursor::new("a\n"), Cursor::new("garbage\n"), &lf, 0.8).unwrap_err();
        assert!(matches!(err, Error::Alignment(_)));
    }

    #[test]
    fn unknown_language() {
        let (_dst, lf) = langfiles();
        let err = merge(Cursor::new("a\n"), Cursor::new("__label__de 0.9\n"), &lf, 0.8).unwrap_err();
        assert!(matches!(err, Error::UnknownLang(_)));
    }

    #[test]
    fn removes_files() {
        let (dst, lf) = langfiles();
        let tmp = tempdir().unwrap();
        let clean = tmp.path().join("0.txt_clean.txt");
        let predictions = tmp.path().join("0.txt_tag.txt");
        fs::write(&clean, "bonjour\n").unwrap();
        fs::write(&predictions, "__label__fr 0.99\n").unwrap();

        let identified = Identified {
            clean: ScratchFile::new(clean.clone()),
            predictions: ScratchFile::new(predictions.clone()),
            lines: 1,
        };
        merge_and_shard(identified, &lf, 0.8).unwrap();
        lf.close().unwrap();

        assert!(!clean.exists());
        assert!(!predictions.exists());
        assert_eq!(read(&dst, "fr"), "bonjour\n\n");
    }
}
