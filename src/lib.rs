//! `calo-sim` is a toy collider analysis chain: events are overlaid
//! with soft pileup, deposited onto an idealized calorimeter grid,
//! clustered into jets and summarized in a per-run record.
//!
//! # How to use
//!
//! The `calo-generate` binary produces toy event samples and
//! `calo-analyze` runs the analysis chain over them.
//!
//! ## Most relevant modules
//!
//! - [prelude] exports a list of the most relevant classes and objects
//! - [analysis] contains the main class and lists the steps that are
//!   performed for each event
//! - [generator] produces toy hard-scattering events
//! - [pileup] overlays soft vertices onto an event
//! - [calorimeter] discretizes particles onto the detector grid
//! - [cluster] and [substructure] for jets and jet shapes
//! - [reader] and [writer] for the event file format
//! - [storage] for the run output
//!

/// The analysis pipeline
pub mod analysis;
/// Calorimeter discretization
pub mod calorimeter;
/// Jet clustering helpers
pub mod cluster;
/// Output compression
pub mod compression;
/// Scattering event class
pub mod event;
/// Thin wrapper around [std::fs::File]
pub mod file;
/// Four-vector class
pub mod four_vector;
/// Toy hard-scattering event generation
pub mod generator;
/// One-dimensional counting histograms
pub mod histogram;
/// Pileup overlay generation
pub mod pileup;
/// Most important exports
pub mod prelude;
/// Progress bar
pub mod progress_bar;
/// Event readers
pub mod reader;
/// Run output records and their serialization
pub mod storage;
/// Jet substructure observables
pub mod substructure;
/// Common traits
pub mod traits;
/// Event writer
pub mod writer;

mod parsing;

use lazy_static::lazy_static;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
lazy_static! {
    pub static ref VERSION_MAJOR: u32 =
        env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap();
    pub static ref VERSION_MINOR: u32 =
        env!("CARGO_PKG_VERSION_MINOR").parse().unwrap();
    pub static ref VERSION_PATCH: u32 =
        env!("CARGO_PKG_VERSION_PATCH").parse().unwrap();
}
pub const GIT_REV: Option<&str> = option_env!("VERGEN_GIT_SHA");
pub const GIT_BRANCH: Option<&str> = option_env!("VERGEN_GIT_BRANCH");
