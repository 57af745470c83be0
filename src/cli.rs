//! Command line arguments and parameters management/parsing.
use std::convert::TryFrom;
use std::path::PathBuf;

use structopt::StructOpt;

use goclassy::error::Error;
use goclassy::identifiers::Oracle;
use goclassy::pipeline::Config;

#[derive(Debug, StructOpt)]
#[structopt(name = "goclassy", about = "line-level language classification of WET shards.")]
/// Holds every command that is callable by the `goclassy` command.
pub enum Goclassy {
    #[structopt(about = "Run pipeline")]
    Pipeline(Pipeline),
    #[structopt(about = "Nigerian Pidgin scorer, usable as an oracle (reads stdin)")]
    Naija(Naija),
}

#[derive(Debug, StructOpt)]
/// Pipeline command and parameters.
///
/// ```sh
/// goclassy-pipeline 0.1.0
/// Run pipeline
///
/// USAGE:
///     goclassy pipeline [FLAGS] [OPTIONS] <src>
///
/// FLAGS:
///         --create-dirs              create missing working directories
///         --dedup                    skip lines already written to a language file
///     -h, --help                     Prints help information
///         --isolate-format-errors    skip malformed shards instead of stopping
///     -V, --version                  Prints version information
///
/// ARGS:
///     <src>    source (contains n.txt.gz)
/// ```
pub struct Pipeline {
    #[structopt(parse(from_os_str), help = "source (contains n.txt.gz)")]
    pub src: PathBuf,
    #[structopt(
        parse(from_os_str),
        long = "extract-dir",
        help = "decompressed shards location",
        default_value = "data"
    )]
    pub extract_dir: PathBuf,
    #[structopt(
        parse(from_os_str),
        long = "tmp-dir",
        help = "clean lines and predictions location",
        default_value = "tmp"
    )]
    pub tmp_dir: PathBuf,
    #[structopt(
        parse(from_os_str),
        long = "dst",
        help = "language files location",
        default_value = "classified"
    )]
    pub dst: PathBuf,
    #[structopt(
        long = "oracle",
        help = "identification command line",
        default_value = "fastText/fasttext predict-prob fastText/lid.176.bin -"
    )]
    pub oracle: String,
    #[structopt(
        long = "min-length",
        help = "lines need more chars than this (line break included) to be identified",
        default_value = "100"
    )]
    pub min_length: usize,
    #[structopt(
        long = "threshold",
        help = "predictions need a higher confidence than this to be kept",
        default_value = "0.8"
    )]
    pub threshold: f32,
    #[structopt(short = "e", help = "concurrent extractions", default_value = "20")]
    pub extract_workers: usize,
    #[structopt(short = "i", help = "concurrent identifications", default_value = "10")]
    pub identify_workers: usize,
    #[structopt(short = "m", help = "concurrent merges", default_value = "5")]
    pub merge_workers: usize,
    #[structopt(long = "lang", help = "additional language code (repeatable)")]
    pub langs: Vec<String>,
    #[structopt(long = "dedup", help = "skip lines already written to a language file")]
    pub dedup: bool,
    #[structopt(
        long = "isolate-format-errors",
        help = "skip malformed shards instead of stopping"
    )]
    pub isolate_format_errors: bool,
    #[structopt(long = "create-dirs", help = "create missing working directories")]
    pub create_dirs: bool,
}

impl TryFrom<Pipeline> for Config {
    type Error = Error;

    fn try_from(p: Pipeline) -> Result<Self, Self::Error> {
        let mut config = Config::new(p.src);
        config.extract_dir = p.extract_dir;
        config.tmp_dir = p.tmp_dir;
        config.dst = p.dst;
        config.oracle = Oracle::from_command_line(&p.oracle)?;
        config.min_line_length = p.min_length;
        config.threshold = p.threshold;
        config.extract_workers = p.extract_workers;
        config.identify_workers = p.identify_workers;
        config.merge_workers = p.merge_workers;
        config.langs.extend(p.langs);
        config.dedup = p.dedup;
        config.isolate_format_errors = p.isolate_format_errors;
        config.create_dirs = p.create_dirs;
        Ok(config)
    }
}

#[derive(Debug, StructOpt)]
/// Scores stdin lines, answering `__label__naija <prob>` for each.
pub struct Naija {}
