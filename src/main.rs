//! # goclassy
//!
//! Line-level language classification of Common Crawl WET shards.
//!
//! ```sh
//! goclassy 0.1.0
//! line-level language classification of WET shards.
//!
//! USAGE:
//!     goclassy <SUBCOMMAND>
//!
//! SUBCOMMANDS:
//!     help        Prints this message or the help of the given subcommand(s)
//!     naija       Nigerian Pidgin scorer, usable as an oracle (reads stdin)
//!     pipeline    Run pipeline
//! ```
use std::convert::TryFrom;
use std::io::{self, BufWriter};

use structopt::StructOpt;

use goclassy::error::Error;
use goclassy::identifiers::naija;
use goclassy::pipeline::{Config, Goclassy, Pipeline};

#[macro_use]
extern crate log;

mod cli;

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = cli::Goclassy::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::Goclassy::Pipeline(p) => {
            let config = Config::try_from(p)?;
            Goclassy::new(config).run()?;
        }
        cli::Goclassy::Naija(_) => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            naija::run(stdin.lock(), BufWriter::new(stdout.lock()))?;
        }
    };
    Ok(())
}
