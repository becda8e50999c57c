use std::{io::BufWriter, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use typed_builder::TypedBuilder;

use crate::{
    compression::{compress_writer, Compression},
    file::File,
    four_vector::FourVector,
    histogram::Histogram,
    traits::WriteRun,
};

/// The analysis output for a single event
///
/// Starts out empty and is filled exactly once; a fresh record is
/// constructed for every event so nothing can leak between events.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct EventRecord {
    /// Number of pileup vertices overlaid onto the event
    pub n_vertices: u32,
    /// Transverse momenta of all retained jets, hardest first
    pub jet_pt: Vec<f64>,
    /// Pseudorapidities of all retained jets
    pub jet_eta: Vec<f64>,
    /// Azimuthal angles of all retained jets
    pub jet_phi: Vec<f64>,
    /// Invariant masses of all retained jets
    pub jet_m: Vec<f64>,
    /// Substructure of the leading jet, if enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leading_shapes: Option<JetShapes>,
}

impl EventRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the kinematics of one jet
    pub fn add_jet(&mut self, jet: &FourVector) {
        self.jet_pt.push(jet.pt().into());
        self.jet_eta.push(jet.eta().into());
        self.jet_phi.push(jet.phi().into());
        self.jet_m.push(jet.m().into());
    }

    /// Number of retained jets
    pub fn njets(&self) -> usize {
        self.jet_pt.len()
    }
}

/// Shape variables of the leading jet
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct JetShapes {
    /// 1-subjettiness with unnormalized measure
    pub tau1: f64,
    /// 2-subjettiness with unnormalized measure
    pub tau2: f64,
    /// Transverse momentum of the trimmed jet
    pub trimmed_pt: f64,
    /// Invariant mass of the trimmed jet
    pub trimmed_m: f64,
}

/// Leading-jet summary histograms accumulated over the whole run
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct JetHistograms {
    pub pt: Histogram,
    pub eta: Histogram,
    pub phi: Histogram,
    pub m: Histogram,
}

impl JetHistograms {
    pub fn new() -> Self {
        // the binning constants are valid axis definitions
        Self {
            pt: Histogram::new("j1_pt", 1000, 0., 1000.).unwrap(),
            eta: Histogram::new("j1_eta", 80, -4., 4.).unwrap(),
            phi: Histogram::new("j1_phi", 80, -4., 4.).unwrap(),
            m: Histogram::new("j1_m", 1000, 0., 1000.).unwrap(),
        }
    }

    /// Record the leading jet of one event
    pub fn fill(&mut self, jet: &FourVector) {
        self.pt.fill(jet.pt().into());
        self.eta.fill(jet.eta().into());
        self.phi.fill(jet.phi().into());
        self.m.fill(jet.m().into());
    }
}

impl Default for JetHistograms {
    fn default() -> Self {
        Self::new()
    }
}

/// The accumulated output of an analysis run
///
/// Appended to once per event and flushed to persistent storage
/// exactly once, after the event loop has completed.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct RunRecord {
    pub events: Vec<EventRecord>,
    pub histograms: JetHistograms,
}

impl RunRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the record for one event
    pub fn push(&mut self, record: EventRecord) {
        self.events.push(record);
    }
}

/// Writer persisting a [RunRecord] to a (potentially compressed) YAML
/// file
#[derive(Debug, TypedBuilder)]
pub struct FileWriter {
    filename: PathBuf,
    #[builder(default)]
    compression: Option<Compression>,
}

impl WriteRun for FileWriter {
    type Error = WriteError;

    fn write(&mut self, run: &RunRecord) -> Result<(), Self::Error> {
        let out = File::create(&self.filename)?;
        let out = BufWriter::new(out);
        let out = compress_writer(out, self.compression)?;
        serde_yaml::to_writer(out, run)?;
        Ok(())
    }
}

/// Error writing the run output
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to write output file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to serialize run record: {0}")]
    SerializeError(#[from] serde_yaml::Error),
}
