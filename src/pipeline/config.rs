//! Pipeline configuration.
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::Error;
use crate::identifiers::Oracle;
use crate::lang::Vocabulary;

pub const MIN_LINE_LENGTH: usize = 100;
pub const THRESHOLD: f32 = 0.8;

#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the compressed shards tree.
    pub src: PathBuf,
    /// Decompressed shards.
    pub extract_dir: PathBuf,
    /// Clean lines and predictions.
    pub tmp_dir: PathBuf,
    /// Language files.
    pub dst: PathBuf,
    pub oracle: Oracle,
    /// Lines need strictly more chars than this to be identified, line break included.
    pub min_line_length: usize,
    /// Predictions need a strictly higher confidence than this to be kept.
    pub threshold: f32,
    pub extract_workers: usize,
    pub identify_workers: usize,
    pub merge_workers: usize,
    pub path_capacity: usize,
    pub artifact_capacity: usize,
    pub pair_capacity: usize,
    pub langs: Vocabulary,
    /// Skip lines already written to the same language file.
    pub dedup: bool,
    /// Skip malformed shards instead of stopping the run.
    pub isolate_format_errors: bool,
    /// Create missing working and destination directories.
    pub create_dirs: bool,
}

impl Config {
    /// Default configuration, using `data/`, `tmp/` and `classified/` relative to
    /// the working directory.
    pub fn new(src: PathBuf) -> Self {
        Self {
            src,
            extract_dir: PathBuf::from("data"),
            tmp_dir: PathBuf::from("tmp"),
            dst: PathBuf::from("classified"),
            oracle: Oracle::default(),
            min_line_length: MIN_LINE_LENGTH,
            threshold: THRESHOLD,
            extract_workers: 20,
            identify_workers: 10,
            merge_workers: 5,
            path_capacity: 20,
            artifact_capacity: 50,
            pair_capacity: 100,
            langs: Vocabulary::default(),
            dedup: false,
            isolate_format_errors: false,
            create_dirs: false,
        }
    }

    /// Check that the source exists and that working directories are there,
    /// creating the latter if [Config::create_dirs] is set.
    pub fn check_dirs(&self) -> Result<(), Error> {
        if !self.src.exists() {
            return Err(Error::Custom(format!(
                "source does not exist: {:?}",
                self.src
            )));
        }

        for dir in [&self.extract_dir, &self.tmp_dir, &self.dst] {
            Self::check_dir(dir, self.create_dirs)?;
        }
        Ok(())
    }

    fn check_dir(dir: &Path, create: bool) -> Result<(), Error> {
        if dir.is_dir() {
            return Ok(());
        }
        if create && !dir.exists() {
            warn!("{:?} does not exist. Creating", dir);
            std::fs::create_dir_all(dir)?;
            return Ok(());
        }
        Err(Error::Custom(format!("{:?} has to be a directory", dir)))
    }
}
