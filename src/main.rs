use std::fs::File;
use std::io::{self, BufReader};

use anyhow::{Context, Result};
use dmultisets::cli::Opt;
use dmultisets::io::{print_solution, read_input};
use dmultisets::Orchestrator;
use log::info;
use structopt::StructOpt;

fn main() -> Result<()> {
    let opt = Opt::from_args();

    env_logger::Builder::new().filter_level(opt.log_level()).init();

    let Opt::Solve { input, threads, .. } = &opt;

    let instance = if input == "-" {
        read_input(BufReader::new(io::stdin().lock())).context("reading instance from stdin")?
    } else {
        let file = File::open(input).with_context(|| format!("opening input file {input}"))?;
        read_input(BufReader::new(file)).with_context(|| format!("parsing input file {input}"))?
    };

    let worker_count = match threads.filter(|&n| n > 0) {
        Some(n) => n,
        None if instance.t > 0 => instance.t,
        None => num_cpus::get().max(1),
    };

    info!("resolved worker count: {worker_count}");

    let orchestrator = Orchestrator::new(instance.d, worker_count);
    let solution = orchestrator.solve(&instance.a_seed, &instance.b_seed)?;

    print_solution(io::stdout().lock(), &solution).context("writing solution")?;
    Ok(())
}
