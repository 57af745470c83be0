//! Line-level classification pipeline.
//!
//! # Processing
//! 1. Shards are discovered by walking the source tree.
//! 1. Each shard is decompressed into the extraction directory.
//! 1. Long enough lines of each record are sent to the oracle, and both lines and
//!    predictions are kept in the temporary directory.
//! 1. Lines and predictions are merged back, and reliably identified paragraphs
//!    are appended to their language file.
//!
//! Stages are connected by bounded channels and run their workers concurrently.
//! Intermediate files are removed as soon as they are consumed.
//! The first error stops the whole run.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crossbeam_channel::bounded;
use log::{error, info, warn};

use super::config::Config;
use super::discovery::walk;
use super::extract::extract;
use super::identify::identify;
use super::merge::{merge_and_shard, MergeStats};
use super::pool::for_each_bounded;
use super::shutdown::Shutdown;
use super::Pipeline;
use crate::error::Error;
use crate::io::LangFiles;

/// What a run went through.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// discovered shards
    pub files: usize,
    /// shards that went through the oracle
    pub identified: usize,
    /// malformed shards that were skipped
    pub skipped: usize,
    /// lines sent to the oracle
    pub lines: usize,
    /// lines above the confidence threshold
    pub retained: usize,
    /// lines written to language files
    pub written: usize,
    /// paragraph runs written
    pub runs: usize,
}

#[derive(Default)]
struct Counters {
    files: AtomicUsize,
    identified: AtomicUsize,
    skipped: AtomicUsize,
    lines: AtomicUsize,
    retained: AtomicUsize,
    written: AtomicUsize,
    runs: AtomicUsize,
}

impl Counters {
    fn add_merge(&self, stats: &MergeStats) {
        self.retained.fetch_add(stats.retained, Ordering::Relaxed);
        self.written.fetch_add(stats.written, Ordering::Relaxed);
        self.runs.fetch_add(stats.runs, Ordering::Relaxed);
    }

    fn summary(&self) -> Summary {
        Summary {
            files: self.files.load(Ordering::Relaxed),
            identified: self.identified.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            lines: self.lines.load(Ordering::Relaxed),
            retained: self.retained.load(Ordering::Relaxed),
            written: self.written.load(Ordering::Relaxed),
            runs: self.runs.load(Ordering::Relaxed),
        }
    }
}

pub struct Goclassy {
    config: Config,
}

impl Goclassy {
    pub fn new(config: Config) -> Self {
        if config.isolate_format_errors {
            warn!("Malformed shards will be skipped: the corpus may be incomplete.");
        }
        Self { config }
    }
}

impl Pipeline<Summary> for Goclassy {
    fn run(&self) -> Result<Summary, Error> {
        let config = &self.config;
        config.check_dirs()?;

        // opened before anything is read, closed once every worker is done.
        let langfiles = LangFiles::new(&config.dst, &config.langs, config.dedup)?;

        let (cancel, cancelled) = bounded(0);
        let shutdown = Shutdown::new(cancel);
        let counters = Counters::default();

        let (paths, walking) = walk(&config.src, cancelled, config.path_capacity);
        let (artifacts_tx, artifacts_rx) = bounded(config.artifact_capacity);
        let (identified_tx, identified_rx) = bounded(config.pair_capacity);

        thread::scope(|s| {
            let (shutdown, counters, langfiles) = (&shutdown, &counters, &langfiles);

            // line identification
            s.spawn(move || {
                for_each_bounded(artifacts_rx, config.identify_workers, shutdown, |artifact| {
                    let result = identify(
                        artifact,
                        &config.tmp_dir,
                        &config.oracle,
                        config.min_line_length,
                    );

                    match result {
                        Ok(identified) => {
                            counters.identified.fetch_add(1, Ordering::Relaxed);
                            counters.lines.fetch_add(identified.lines, Ordering::Relaxed);
                            identified_tx
                                .send(identified)
                                .map_err(|_| Error::Custom("merge stage is gone".to_string()))
                        }
                        Err(e) if e.is_format() && config.isolate_format_errors => {
                            warn!("skipping malformed shard: {}", e);
                            counters.skipped.fetch_add(1, Ordering::Relaxed);
                            Ok(())
                        }
                        Err(e) => Err(e),
                    }
                });
                info!("identification done");
                // identified_tx is dropped here, ending the merge stage
            });

            // merge and shard
            s.spawn(move || {
                for_each_bounded(identified_rx, config.merge_workers, shutdown, |identified| {
                    let stats = merge_and_shard(identified, langfiles, config.threshold)?;
                    counters.add_merge(&stats);
                    Ok(())
                });
                info!("merge done");
            });

            // extraction
            for_each_bounded(paths, config.extract_workers, shutdown, |path| {
                counters.files.fetch_add(1, Ordering::Relaxed);
                let artifact = extract(&path, &config.extract_dir).map_err(|e| {
                    error!("could not extract {:?}", path);
                    e
                })?;
                artifacts_tx
                    .send(artifact)
                    .map_err(|_| Error::Custom("identification stage is gone".to_string()))
            });

            // every path has been received: check whether the walk failed.
            if let Err(e) = walking.wait() {
                shutdown.fail(e);
            }
            drop(artifacts_tx);
            info!("extraction done");
        });

        shutdown.into_result()?;
        langfiles.close()?;

        let summary = counters.summary();
        info!(
            "{} files, {} lines identified, {} retained, {} written in {} paragraphs",
            summary.files, summary.lines, summary.retained, summary.written, summary.runs
        );
        Ok(summary)
    }
}
