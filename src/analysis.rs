use std::fmt::{self, Display};
use std::str::FromStr;

use jetty::PseudoJet;
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::Display as StrumDisplay;
use thiserror::Error;

use crate::calorimeter::discretize;
use crate::cluster::{cluster_jets, JetDefinition};
use crate::event::Event;
use crate::four_vector::FourVector;
use crate::pileup::PileupGenerator;
use crate::storage::{EventRecord, JetShapes, RunRecord};
use crate::substructure::{
    constituents, n_subjettiness, trim, wta_kt_axes, TrimDefinition,
};
use crate::traits::WriteRun;

/// Which particle collection is fed into jet clustering
#[derive(
    Deserialize,
    Serialize,
    Copy,
    Clone,
    Debug,
    Default,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    StrumDisplay,
)]
#[strum(serialize_all = "lowercase")]
pub enum JetInput {
    /// The particles as delivered by the generation stage
    #[default]
    Raw,
    /// Calorimeter deposits of the raw particles
    Calo,
    /// Calorimeter deposits of the pileup-augmented particles
    #[strum(serialize = "calo-pileup")]
    CaloPileup,
}

/// Placeholder for an unknown jet input choice
#[derive(Debug, Clone, Error)]
pub struct UnknownJetInput(String);

impl Display for UnknownJetInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown jet input: {}", self.0)
    }
}

impl FromStr for JetInput {
    type Err = UnknownJetInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(Self::Raw),
            "calo" => Ok(Self::Calo),
            "calo-pileup" | "calo_pileup" => Ok(Self::CaloPileup),
            _ => Err(UnknownJetInput(s.to_string())),
        }
    }
}

/// Builder for an [Analysis]
pub struct AnalysisBuilder<R, G, W> {
    /// Source of input events
    pub reader: R,
    /// Pileup overlay; `None` disables the overlay entirely
    pub pileup: Option<PileupGenerator<G>>,
    /// Jet definition passed to the clustering library
    pub jet_def: JetDefinition,
    /// Collection used for jet clustering
    pub jet_input: JetInput,
    /// Substructure configuration; `None` skips shape variables
    pub trim_def: Option<TrimDefinition>,
    /// Destination of the accumulated run output
    pub writer: W,
}

impl<R, G, W> AnalysisBuilder<R, G, W> {
    pub fn build(self) -> Analysis<R, G, W> {
        Analysis {
            reader: self.reader,
            pileup: self.pileup,
            jet_def: self.jet_def,
            jet_input: self.jet_input,
            trim_def: self.trim_def,
            writer: self.writer,
        }
    }
}

/// The analysis pipeline
///
/// For each input event the following steps are performed in order:
///
/// 1. Start a fresh, empty [EventRecord]
/// 2. Ingest the final-state particles of the event
/// 3. Overlay pileup onto a copy, leaving the raw collection intact
/// 4. Discretize both collections onto the calorimeter grid
/// 5. Cluster the configured collection into jets
/// 6. Extract the kinematics of every retained jet, fill the
///    leading-jet histograms and optional shape variables
/// 7. Append the record to the run output
///
/// After the last event the run output is flushed exactly once.
pub struct Analysis<R, G, W> {
    reader: R,
    pileup: Option<PileupGenerator<G>>,
    jet_def: JetDefinition,
    jet_input: JetInput,
    trim_def: Option<TrimDefinition>,
    writer: W,
}

impl<R, G, W> From<AnalysisBuilder<R, G, W>> for Analysis<R, G, W> {
    fn from(b: AnalysisBuilder<R, G, W>) -> Self {
        b.build()
    }
}

/// Analysis run error
#[derive(Debug, Error)]
pub enum AnalysisError<E1, E2> {
    #[error("Failed to read event: {0}")]
    ReadError(E1),
    #[error("Failed to write run output: {0}")]
    WriteError(E2),
}

impl<R, G, W, E> Analysis<R, G, W>
where
    R: Iterator<Item = Result<Event, E>>,
    G: Rng,
    W: WriteRun,
{
    /// Run the analysis over all input events
    ///
    /// An event without jets is not an error: its record is appended
    /// with empty jet arrays and the loop continues. Only reading and
    /// the final write can fail.
    pub fn run(&mut self) -> Result<(), AnalysisError<E, W::Error>> {
        use AnalysisError::*;

        let mut run = RunRecord::new();
        // the reader is exhausted one event at a time; no event data
        // survives an iteration except the accumulated output
        while let Some(event) = self.reader.next() {
            let event = event.map_err(ReadError)?;
            if event.id() % 100 == 0 {
                info!("Analyzing event {}", event.id());
            }
            self.process(event, &mut run);
        }
        info!("Analyzed {} events", run.events.len());
        self.writer.write(&run).map_err(WriteError)
    }

    fn process(&mut self, event: Event, run: &mut RunRecord) {
        let mut record = EventRecord::new();

        let id = event.id();
        let raw: Vec<FourVector> =
            event.into_particles().into_iter().map(|p| p.p).collect();

        let mut augmented = raw.clone();
        if let Some(pileup) = self.pileup.as_mut() {
            let overlay = pileup.overlay();
            record.n_vertices = overlay.vertices;
            augmented.extend(overlay.particles);
        }

        let deposits = discretize(&raw);
        let deposits_augmented = discretize(&augmented);
        if deposits_augmented.dropped > 0 {
            debug!(
                "event {id}: dropped {} particles outside calorimeter acceptance",
                deposits_augmented.dropped
            );
        }

        let chosen: &[FourVector] = match self.jet_input {
            JetInput::Raw => &raw,
            JetInput::Calo => &deposits.cells,
            JetInput::CaloPileup => &deposits_augmented.cells,
        };
        let jets: Vec<FourVector> = cluster_jets(
            chosen.iter().map(PseudoJet::from).collect(),
            &self.jet_def,
        )
        .into_iter()
        .map(FourVector::from)
        .collect();

        for jet in &jets {
            record.add_jet(jet);
        }
        if let Some(leading) = jets.first() {
            run.histograms.fill(leading);
            if let Some(trim_def) = self.trim_def.as_ref() {
                record.leading_shapes = Some(leading_shapes(
                    leading,
                    chosen,
                    self.jet_def.radius,
                    trim_def,
                ));
            }
        }
        run.push(record);
    }
}

/// Shape variables of the leading jet
///
/// The jet constituents are taken to be the input particles within the
/// clustering radius of the jet axis.
fn leading_shapes(
    jet: &FourVector,
    particles: &[FourVector],
    radius: f64,
    trim_def: &TrimDefinition,
) -> JetShapes {
    let cons = constituents(jet, particles, radius);
    let tau1 = n_subjettiness(&wta_kt_axes(1, &cons), &cons);
    let tau2 = n_subjettiness(&wta_kt_axes(2, &cons), &cons);
    let trimmed = trim(jet, &cons, trim_def);
    JetShapes {
        tau1: tau1.into(),
        tau2: tau2.into(),
        trimmed_pt: trimmed.pt().into(),
        trimmed_m: trimmed.m().into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Particle;

    use std::cell::RefCell;
    use std::convert::Infallible;
    use std::rc::Rc;

    use noisy_float::prelude::*;
    use particle_id::ParticleID;
    use rand_xoshiro::Xoshiro256Plus;

    #[derive(Clone, Default)]
    struct SharedWriter(Rc<RefCell<RunRecord>>);

    impl WriteRun for SharedWriter {
        type Error = Infallible;

        fn write(&mut self, run: &RunRecord) -> Result<(), Self::Error> {
            *self.0.borrow_mut() = run.clone();
            Ok(())
        }
    }

    fn run_analysis(
        events: Vec<Event>,
        jet_input: JetInput,
        trim_def: Option<TrimDefinition>,
    ) -> RunRecord {
        let writer = SharedWriter::default();
        let output = writer.clone();
        let mut analysis = AnalysisBuilder::<_, Xoshiro256Plus, _> {
            reader: events.into_iter().map(Ok::<_, Infallible>),
            pileup: None,
            jet_def: JetDefinition::default(),
            jet_input,
            trim_def,
            writer,
        }
        .build();
        analysis.run().unwrap();
        let run = output.0.borrow().clone();
        run
    }

    fn single_particle_event(id: usize, pt: f64) -> Event {
        Event::new(
            id,
            vec![Particle::from_pt_eta_phi_m(
                ParticleID::new(211),
                n64(pt),
                n64(0.),
                n64(0.),
                n64(0.),
            )],
        )
    }

    #[test]
    fn single_particle_single_jet() {
        // a single hard particle at the grid center survives
        // discretization and clustering almost unchanged
        let run = run_analysis(
            vec![single_particle_event(0, 100.)],
            JetInput::Calo,
            None,
        );
        assert_eq!(run.events.len(), 1);
        let record = &run.events[0];
        assert_eq!(record.njets(), 1);
        assert!((record.jet_pt[0] - 100.).abs() < 1.);
        assert_eq!(run.histograms.pt.entries(), 1);
    }

    #[test]
    fn empty_event_still_recorded() {
        let run =
            run_analysis(vec![Event::new(0, vec![])], JetInput::Calo, None);
        assert_eq!(run.events.len(), 1);
        let record = &run.events[0];
        assert_eq!(record.njets(), 0);
        assert!(record.jet_eta.is_empty());
        assert_eq!(run.histograms.pt.entries(), 0);
    }

    #[test]
    fn no_leakage_between_events() {
        // the record of an empty event stays empty even right after
        // an event with jets
        let run = run_analysis(
            vec![single_particle_event(0, 100.), Event::new(1, vec![])],
            JetInput::Raw,
            None,
        );
        assert_eq!(run.events.len(), 2);
        assert_eq!(run.events[0].njets(), 1);
        assert_eq!(run.events[1].njets(), 0);
    }

    #[test]
    fn shapes_only_when_enabled() {
        let events = vec![single_particle_event(0, 100.)];
        let without = run_analysis(events.clone(), JetInput::Raw, None);
        assert!(without.events[0].leading_shapes.is_none());

        let with = run_analysis(
            events,
            JetInput::Raw,
            Some(TrimDefinition::default()),
        );
        let shapes = with.events[0].leading_shapes.as_ref().unwrap();
        // a single on-axis constituent has vanishing subjettiness and
        // trims to itself
        assert!(shapes.tau1 < 1e-9);
        assert!((shapes.trimmed_pt - 100.).abs() < 1e-6);
    }

    #[test]
    fn jet_input_names_round_trip() {
        for input in
            [JetInput::Raw, JetInput::Calo, JetInput::CaloPileup]
        {
            assert_eq!(input.to_string().parse::<JetInput>().unwrap(), input);
        }
    }

    #[test]
    fn pileup_vertices_recorded() {
        use rand::SeedableRng;

        let writer = SharedWriter::default();
        let output = writer.clone();
        let pileup = PileupGenerator::new(Xoshiro256Plus::seed_from_u64(3));
        let mut analysis = AnalysisBuilder {
            reader: vec![single_particle_event(0, 100.)]
                .into_iter()
                .map(Ok::<_, Infallible>),
            pileup: Some(pileup),
            jet_def: JetDefinition::default(),
            jet_input: JetInput::Raw,
            trim_def: None,
            writer,
        }
        .build();
        analysis.run().unwrap();

        let mut reference =
            PileupGenerator::new(Xoshiro256Plus::seed_from_u64(3));
        let expected = reference.overlay().vertices;
        assert_eq!(output.0.borrow().events[0].n_vertices, expected);
    }
}
