mod opt;

use std::path::PathBuf;

use crate::opt::parse_compr;

use anyhow::{Context, Result};
use calo_sim::analysis::JetInput;
use calo_sim::cluster::JetAlgorithm;
use calo_sim::compression::Compression;
use calo_sim::file::File;
use calo_sim::prelude::*;
use calo_sim::substructure::{
    DEFAULT_TRIM_MAX_SUBJETS, DEFAULT_TRIM_PT_FRACTION, DEFAULT_TRIM_RADIUS,
};
use calo_sim::{GIT_BRANCH, GIT_REV, VERSION};
use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

#[derive(Debug, Copy, Clone, Parser)]
struct JetDefinitionOpt {
    /// Jet algorithm.
    #[clap(
        short = 'a',
        long,
        default_value = "anti-kt",
        help = "Jet algorithm.\nPossible settings are 'anti-kt', 'kt', 'Cambridge-Aachen'."
    )]
    jetalgorithm: JetAlgorithm,
    /// Jet radius parameter.
    #[clap(short = 'R', long, default_value = "1.0")]
    jetradius: f64,
    #[clap(short = 'p', long, default_value = "5.0")]
    /// Minimum jet transverse momentum in GeV.
    jetpt: f64,
}

impl From<JetDefinitionOpt> for JetDefinition {
    fn from(j: JetDefinitionOpt) -> Self {
        Self {
            algorithm: j.jetalgorithm,
            radius: j.jetradius,
            min_pt: j.jetpt,
        }
    }
}

#[derive(Debug, Copy, Clone, Parser)]
struct PileupOpt {
    /// Mean number of pileup vertices.
    #[clap(long, default_value = "10.0")]
    pileupvertices: f64,

    /// Number of particles produced at each pileup vertex.
    #[clap(long, default_value = "5")]
    pileupmultiplicity: u32,

    /// Standard deviation of the pileup momentum components in GeV.
    #[clap(long, default_value = "5.0")]
    pileupspread: f64,
}

/// Analyze toy scattering events
#[derive(Debug, Parser)]
#[clap(about, author, version)]
struct Opt {
    /// Input event file
    infile: PathBuf,

    /// Output file
    outfile: PathBuf,

    #[clap(flatten)]
    jet_def: JetDefinitionOpt,

    #[clap(flatten)]
    pileup: PileupOpt,

    /// Particle collection used for jet clustering
    #[clap(long, default_value = "raw",
           help = "Particle collection used for jet clustering.
Possible settings are 'raw', 'calo', 'calo-pileup'.")]
    jet_input: JetInput,

    /// Record substructure variables of the leading jet
    #[clap(long)]
    substructure: bool,

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
        info!("calo-analyze {VERSION} rev {rev} ({branch})");
    } else {
        info!("calo-analyze {VERSION}");
    }

    debug!("settings: {:#?}", opt);

    let infile = File::open(&opt.infile)
        .with_context(|| format!("Failed to open {:?}", opt.infile))?;
    let reader = FileReader::new(infile)
        .with_context(|| format!("Failed to read {:?}", opt.infile))?;

    let rng = Xoshiro256Plus::seed_from_u64(opt.seed);
    let pileup = PileupGenerator::with_params(
        rng,
        opt.pileup.pileupvertices,
        opt.pileup.pileupmultiplicity,
        opt.pileup.pileupspread,
    )?;

    let trim_def = opt.substructure.then(|| TrimDefinition {
        radius: DEFAULT_TRIM_RADIUS,
        pt_fraction: DEFAULT_TRIM_PT_FRACTION,
        max_subjets: DEFAULT_TRIM_MAX_SUBJETS,
    });

    let writer = FileWriter::builder()
        .filename(opt.outfile.clone())
        .compression(opt.compression)
        .build();

    let mut analysis = AnalysisBuilder {
        reader,
        pileup: Some(pileup),
        jet_def: opt.jet_def.into(),
        jet_input: opt.jet_input,
        trim_def,
        writer,
    }
    .build();
    analysis.run()?;

    info!("Wrote analysis output to {:?}", opt.outfile);
    info!("done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_collection_is_the_default() {
        let opt =
            Opt::try_parse_from(["calo-analyze", "in.dat", "out.yaml"])
                .unwrap();
        assert_eq!(opt.jet_input, JetInput::Raw);
    }
}
