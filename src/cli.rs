//! Command-line configuration.
//!
//! Grounded on the teacher's `xputils::Args`, a `structopt`-derived enum
//! of subcommands; trimmed down to this crate's single `solve` entry
//! point.

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "dmultisets", about = "Parallel branch-and-bound search for disjoint-closure multiset pairs")]
pub enum Opt {
    /// Reads a problem instance and prints its best solution.
    Solve {
        /// Path to the input file, or `-` to read stdin.
        #[structopt(short, long)]
        input: String,

        /// Overrides the worker count read from the input file's first
        /// line. Falls back to the number of logical CPUs if neither
        /// this flag nor the input file gives a usable (nonzero) value.
        #[structopt(short = "T", long)]
        threads: Option<usize>,

        /// Increases log verbosity; repeatable.
        #[structopt(short, long, parse(from_occurrences))]
        verbose: u8,

        /// Decreases log verbosity; repeatable.
        #[structopt(short, long, parse(from_occurrences))]
        quiet: u8,
    },
}

impl Opt {
    /// The effective `log` filter level implied by this invocation's
    /// verbosity flags, with `info` as the baseline.
    pub fn log_level(&self) -> log::LevelFilter {
        use log::LevelFilter::*;
        let Opt::Solve { verbose, quiet, .. } = self;
        let shift = *verbose as i8 - *quiet as i8;
        let levels = [Off, Error, Warn, Info, Debug, Trace];
        let base = 3; // Info
        let index = (base + shift).clamp(0, levels.len() as i8 - 1) as usize;
        levels[index]
    }
}
