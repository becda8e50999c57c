//! Toy hard-process generation
//!
//! The real matrix-element generator is an external collaborator; this
//! module provides a simple stand-in behind the same interface. Each
//! event consists of two back-to-back partons at a process-dependent
//! scale, fragmented into a random number of approximately collinear
//! hadron-like particles.

use log::trace;
use noisy_float::prelude::*;
use particle_id::ParticleID;
use rand::Rng;
use rand_distr::{Distribution, Exp1, Normal, Poisson};
use strum::Display;

use crate::event::{Event, Particle};

const TWO_PI: f64 = 2. * std::f64::consts::PI;
const PION_MASS: f64 = 0.139;

/// The hard processes of the generation stage
#[derive(Copy, Clone, Debug, Display, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum ProcessType {
    /// QCD dijet production
    Dijet,
    /// W boson pair production
    WPair,
    /// Top quark pair production
    TopPair,
    /// Higgs production
    Higgs,
}

impl ProcessType {
    /// The process selected by the given command-line index, if any
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::Dijet),
            1 => Some(Self::WPair),
            2 => Some(Self::TopPair),
            3 => Some(Self::Higgs),
            _ => None,
        }
    }

    /// Characteristic scale of the hard system
    fn hard_scale(self) -> f64 {
        match self {
            Self::Dijet => 200.,
            Self::WPair => 160.8,
            Self::TopPair => 346.,
            Self::Higgs => 125.,
        }
    }
}

/// Toy event generator
///
/// Owns its random number generator; with a fixed seed the generated
/// event stream is reproducible.
#[derive(Clone, Debug)]
pub struct ToyGenerator<R> {
    process: ProcessType,
    fragments: Poisson<f64>,
    eta_spread: Normal<f64>,
    smear: Normal<f64>,
    rng: R,
}

impl<R> ToyGenerator<R> {
    pub fn new(process: ProcessType, rng: R) -> Self {
        // fixed fragmentation parameters, valid by construction
        Self {
            process,
            fragments: Poisson::new(8.).unwrap(),
            eta_spread: Normal::new(0., 1.2).unwrap(),
            smear: Normal::new(0., 0.08).unwrap(),
            rng,
        }
    }
}

impl<R: Rng> ToyGenerator<R> {
    /// Generate the next event
    pub fn generate(&mut self, id: usize) -> Event {
        let pt_hard = self.process.hard_scale() / 2.;
        let phi = self.rng.gen_range(0.0..TWO_PI);
        let eta1 = self.eta_spread.sample(&mut self.rng);
        let eta2 = self.eta_spread.sample(&mut self.rng);

        let mut particles = Vec::new();
        self.fragment(pt_hard, eta1, phi, &mut particles);
        self.fragment(pt_hard, eta2, phi + std::f64::consts::PI, &mut particles);
        trace!("generated event {id} with {} particles", particles.len());
        Event::new(id, particles)
    }

    /// Split a parton into collinear hadron-like particles
    fn fragment(
        &mut self,
        pt: f64,
        eta: f64,
        phi: f64,
        particles: &mut Vec<Particle>,
    ) {
        let nfrag = 1 + self.fragments.sample(&mut self.rng) as usize;
        let weights: Vec<f64> =
            (0..nfrag).map(|_| self.rng.sample::<f64, _>(Exp1)).collect();
        let norm: f64 = weights.iter().sum();
        for (n, w) in weights.into_iter().enumerate() {
            let (id, mass) = match n % 3 {
                0 => (ParticleID::new(211), PION_MASS),
                1 => (ParticleID::new(-211), PION_MASS),
                _ => (ParticleID::new(22), 0.),
            };
            let frag_pt = pt * w / norm;
            let frag_eta = eta + self.smear.sample(&mut self.rng);
            let frag_phi = (phi + self.smear.sample(&mut self.rng))
                .rem_euclid(TWO_PI);
            particles.push(Particle::from_pt_eta_phi_m(
                id,
                n64(frag_pt),
                n64(frag_eta),
                n64(frag_phi),
                n64(mass),
            ));
        }
    }
}
