use log::trace;
use noisy_float::prelude::*;
use rand::Rng;
use rand_distr::{Distribution, Normal, Poisson};
use thiserror::Error;

use crate::four_vector::FourVector;

/// Default mean number of pileup vertices per event
pub const DEFAULT_MEAN_VERTICES: f64 = 10.;
/// Default number of pileup particles per vertex
pub const DEFAULT_PARTICLES_PER_VERTEX: u32 = 5;
/// Default standard deviation of each pileup momentum component
pub const DEFAULT_MOMENTUM_SPREAD: f64 = 5.;

/// Generator for pileup particles from unrelated overlapping collisions
///
/// The generator owns its random number generator. The sequence of
/// draws advances monotonically across events, so reproducing a run
/// requires a fixed seed.
#[derive(Clone, Debug)]
pub struct PileupGenerator<R> {
    vertices: Poisson<f64>,
    momentum: Normal<f64>,
    particles_per_vertex: u32,
    rng: R,
}

/// The pileup overlaid onto a single event
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct PileupOverlay {
    /// Number of pileup vertices
    pub vertices: u32,
    /// Massless pileup particle momenta, `vertices` times the
    /// per-vertex multiplicity in total
    pub particles: Vec<FourVector>,
}

impl<R> PileupGenerator<R> {
    /// Construct a generator with the default occupancy settings
    pub fn new(rng: R) -> Self {
        // the defaults are valid distribution parameters
        Self::with_params(
            rng,
            DEFAULT_MEAN_VERTICES,
            DEFAULT_PARTICLES_PER_VERTEX,
            DEFAULT_MOMENTUM_SPREAD,
        )
        .unwrap()
    }

    /// Construct a generator with the given mean vertex count,
    /// per-vertex multiplicity and momentum spread
    pub fn with_params(
        rng: R,
        mean_vertices: f64,
        particles_per_vertex: u32,
        momentum_spread: f64,
    ) -> Result<Self, PileupParamError> {
        let vertices = Poisson::new(mean_vertices)
            .map_err(|_| PileupParamError::MeanVertices(mean_vertices))?;
        let momentum = Normal::new(0., momentum_spread)
            .map_err(|_| PileupParamError::MomentumSpread(momentum_spread))?;
        Ok(Self {
            vertices,
            momentum,
            particles_per_vertex,
            rng,
        })
    }
}

impl<R: Rng> PileupGenerator<R> {
    /// Generate the pileup for one event
    ///
    /// Draws the vertex count from a Poisson distribution and then,
    /// for each pileup particle, three independent Gaussian momentum
    /// components. The particles are massless, `e = |p|`.
    pub fn overlay(&mut self) -> PileupOverlay {
        let vertices = self.vertices.sample(&mut self.rng) as u32;
        let nparticles = vertices * self.particles_per_vertex;
        let particles = (0..nparticles)
            .map(|_| {
                let px = n64(self.momentum.sample(&mut self.rng));
                let py = n64(self.momentum.sample(&mut self.rng));
                let pz = n64(self.momentum.sample(&mut self.rng));
                let e = (px * px + py * py + pz * pz).sqrt();
                FourVector::from([e, px, py, pz])
            })
            .collect();
        trace!("pileup: {vertices} vertices, {nparticles} particles");
        PileupOverlay {
            vertices,
            particles,
        }
    }
}

/// Invalid pileup distribution parameter
#[derive(Debug, Clone, Copy, Error)]
pub enum PileupParamError {
    #[error("Invalid mean number of pileup vertices: {0}")]
    MeanVertices(f64),
    #[error("Invalid pileup momentum spread: {0}")]
    MomentumSpread(f64),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    fn seeded(seed: u64) -> PileupGenerator<Xoshiro256Plus> {
        PileupGenerator::new(Xoshiro256Plus::seed_from_u64(seed))
    }

    #[test]
    fn particle_count() {
        let mut gen = seeded(0);
        for _ in 0..20 {
            let overlay = gen.overlay();
            assert_eq!(
                overlay.particles.len(),
                (overlay.vertices * DEFAULT_PARTICLES_PER_VERTEX) as usize
            );
        }
    }

    #[test]
    fn reproducible_given_seed() {
        let mut first = seeded(42);
        let mut second = seeded(42);
        for _ in 0..10 {
            assert_eq!(first.overlay(), second.overlay());
        }
    }

    #[test]
    fn massless_on_shell() {
        let mut gen = seeded(1);
        let overlay = gen.overlay();
        for p in &overlay.particles {
            assert!(p.m() < 1e-6);
        }
    }

    #[test]
    fn bad_params_rejected() {
        let rng = Xoshiro256Plus::seed_from_u64(0);
        assert!(PileupGenerator::with_params(rng, -1., 5, 5.).is_err());
    }
}
