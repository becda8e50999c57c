use jetty::PseudoJet;
use noisy_float::prelude::*;
use particle_id::ParticleID;
use serde::{Deserialize, Serialize};

use crate::four_vector::FourVector;

/// A final-state particle
///
/// Immutable once constructed. Ownership stays with the collection
/// holding it for the duration of one event.
#[derive(
    Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy,
)]
pub struct Particle {
    /// Particle species
    pub id: ParticleID,
    /// Four-momentum
    pub p: FourVector,
}

impl Particle {
    /// Construct a particle from species id and kinematic variables
    pub fn from_pt_eta_phi_m(
        id: ParticleID,
        pt: N64,
        eta: N64,
        phi: N64,
        m: N64,
    ) -> Self {
        Self {
            id,
            p: FourVector::from_pt_eta_phi_m(pt, eta, phi, m),
        }
    }
}

impl From<&Particle> for PseudoJet {
    fn from(p: &Particle) -> Self {
        (&p.p).into()
    }
}

/// A single collision event as delivered by the generation stage
///
/// An `Event` lives for exactly one iteration of the analysis loop.
/// It is constructed fresh for every event so no per-event state can
/// leak into the next iteration.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Default)]
pub struct Event {
    id: usize,
    particles: Vec<Particle>,
}

impl Event {
    pub fn new(id: usize, particles: Vec<Particle>) -> Self {
        Self { id, particles }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// The final-state particles in generator order
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn into_particles(self) -> Vec<Particle> {
        self.particles
    }
}
