//! Deviation Test Binary
//!
//! Runs every round of a budgeted deviation test against the reference
//! annealing scenario and writes `{run}_results.tsv` and
//! `{run}_deviations.txt` under the output directory.
//!
//! Options: --config, --run, --rounds, --seed, --workers, --parallel, --checkpoint, --print-config

use clap::Parser;
use deviant::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Budgeted deviation test of an empirical equilibrium", long_about = None)]
struct Args {
    /// JSON configuration; omitted fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    run: Option<String>,
    #[arg(long)]
    rounds: Option<usize>,
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(short, long)]
    workers: Option<usize>,
    /// One worker per available core
    #[arg(long, conflicts_with = "workers")]
    parallel: bool,
    #[arg(long)]
    checkpoint: bool,
    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    fn config(self) -> anyhow::Result<Config> {
        let mut config = match self.config {
            Some(ref path) => Config::load(path)?,
            None => Config::default(),
        };
        config.run = self.run.unwrap_or(config.run);
        config.rounds = self.rounds.unwrap_or(config.rounds);
        config.output = self.output.unwrap_or(config.output);
        config.seed = self.seed.or(config.seed);
        config.workers = match self.parallel {
            true => num_cpus::get(),
            false => self.workers.unwrap_or(config.workers),
        };
        config.checkpoint |= self.checkpoint;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let print = args.print_config;
    let config = args.config()?;
    if print {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }
    log()?;
    let outcomes = Reference::reference(config).run()?;
    let confirmed = outcomes.iter().filter(|o| o.confirmed).count();
    log::info!("{:<32}{} of {}", "confirmed   rounds", confirmed, outcomes.len());
    Ok(())
}
