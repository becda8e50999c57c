pub use crate::{
    analysis::{Analysis, AnalysisBuilder, JetInput},
    cluster::JetDefinition,
    generator::{ProcessType, ToyGenerator},
    pileup::PileupGenerator,
    reader::FileReader,
    storage::{FileWriter, RunRecord},
    substructure::TrimDefinition,
    writer::EventWriter,
};
