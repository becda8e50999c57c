mod opt;

use std::path::PathBuf;

use crate::opt::parse_compr;

use anyhow::{Context, Result};
use calo_sim::compression::Compression;
use calo_sim::generator::{ProcessType, ToyGenerator};
use calo_sim::progress_bar::{Progress, ProgressBar};
use calo_sim::writer::EventWriter;
use calo_sim::{GIT_BRANCH, GIT_REV, VERSION};
use clap::Parser;
use env_logger::Env;
use log::{debug, error, info};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

/// Generate toy scattering events
#[derive(Debug, Parser)]
#[clap(about, author, version)]
struct Opt {
    /// Hard process: 0 = dijet, 1 = W pair, 2 = top pair, 3 = Higgs
    process: u32,

    /// Output file
    outfile: PathBuf,

    /// Number of events to generate
    events: u64,

    /// Random number generator seed
    #[clap(long, default_value = "0")]
    seed: u64,

    #[clap(short = 'c', long, value_parser = parse_compr,
           help = "Compress output file.
Possible settings are 'bzip2', 'gzip', 'lz4', 'zstd'.
Compression levels can be set with algorithm_level e.g. 'zstd_5'.
Maximum levels are 'gzip_9', 'lz4_16', 'zstd_19'.")]
    compression: Option<Compression>,

    #[clap(short, long, default_value = "Info",
           help = "Verbosity level.
Possible values with increasing amount of output are
'off', 'error', 'warn', 'info', 'debug', 'trace'.")]
    loglevel: String,
}

fn main() -> Result<()> {
    let args = argfile::expand_args_from(
        std::env::args_os(),
        argfile::parse_fromfile,
        argfile::PREFIX,
    )
    .with_context(|| "Failed to read argument file")?;
    let opt = Opt::parse_from(args);

    let env = Env::default().filter_or("CALO_LOG", &opt.loglevel);
    env_logger::init_from_env(env);

    if let (Some(rev), Some(branch)) = (GIT_REV, GIT_BRANCH) {
        info!("calo-generate {VERSION} rev {rev} ({branch})");
    } else {
        info!("calo-generate {VERSION}");
    }

    debug!("settings: {:#?}", opt);

    let process = match ProcessType::from_index(opt.process) {
        Some(process) => process,
        None => {
            error!("Unknown process type: {}", opt.process);
            return Ok(());
        }
    };

    let rng = Xoshiro256Plus::seed_from_u64(opt.seed);
    let mut generator = ToyGenerator::new(process, rng);
    let mut writer = EventWriter::try_new(&opt.outfile, opt.compression)
        .with_context(|| format!("Failed to create {:?}", opt.outfile))?;

    info!("Generating {} {process} events", opt.events);
    let progress = ProgressBar::new(opt.events, "events generated:");
    for id in 0..opt.events {
        let event = generator.generate(id as usize);
        writer.write(&event)?;
        progress.inc(1);
    }
    progress.finish();
    writer.finish()?;

    info!("Wrote {} events to {:?}", opt.events, opt.outfile);
    info!("done");
    Ok(())
}
