//! Jet substructure refinements
//!
//! N-subjettiness with an unnormalized energy measure and jet trimming
//! by a secondary low-radius kt pass. Both consume a single jet and
//! the particles it was built from; neither alters the clustering
//! contract itself.
//!
//! The clustering backend reports jets without their constituent
//! lists, so constituents are recovered as the input particles within
//! the clustering radius of the jet axis.

use itertools::Itertools;
use jetty::{kt_f, Cluster, PseudoJet};
use noisy_float::prelude::*;
use serde::{Deserialize, Serialize};

use crate::four_vector::FourVector;

/// Default radius of the secondary trimming kt pass
pub const DEFAULT_TRIM_RADIUS: f64 = 0.2;
/// Default minimum subjet momentum fraction for trimming
pub const DEFAULT_TRIM_PT_FRACTION: f64 = 0.05;
/// Default number of hardest subjets kept by trimming
pub const DEFAULT_TRIM_MAX_SUBJETS: usize = 2;

/// Trimming configuration
///
/// Following [arXiv:0912.1342](https://arxiv.org/abs/0912.1342): the
/// jet constituents are re-clustered with the kt algorithm at a small
/// radius and only the hardest subjets above a momentum fraction of
/// the parent jet are kept.
#[derive(Deserialize, Serialize, Debug, Copy, Clone)]
pub struct TrimDefinition {
    /// Radius of the secondary kt pass
    pub radius: f64,
    /// Minimum subjet momentum as a fraction of the parent jet
    pub pt_fraction: f64,
    /// Number of hardest surviving subjets to keep
    pub max_subjets: usize,
}

impl Default for TrimDefinition {
    fn default() -> Self {
        Self {
            radius: DEFAULT_TRIM_RADIUS,
            pt_fraction: DEFAULT_TRIM_PT_FRACTION,
            max_subjets: DEFAULT_TRIM_MAX_SUBJETS,
        }
    }
}

/// Angular distance \sqrt{Δη² + Δφ²} between two momenta
pub fn delta_r(a: &FourVector, b: &FourVector) -> N64 {
    let deta = a.eta() - b.eta();
    let mut dphi = (a.phi() - b.phi()).abs();
    if dphi > std::f64::consts::PI {
        dphi = -dphi + 2. * std::f64::consts::PI;
    }
    (deta * deta + dphi * dphi).sqrt()
}

/// The constituents of `jet`: all `particles` within `radius` of the
/// jet axis
pub fn constituents(
    jet: &FourVector,
    particles: &[FourVector],
    radius: f64,
) -> Vec<FourVector> {
    particles
        .iter()
        .copied()
        .filter(|p| delta_r(p, jet) < radius)
        .collect()
}

/// Find `n` subjet axes by one-pass winner-take-all kt recombination
///
/// Proto-axes are merged pairwise in order of ascending kt distance.
/// Each merge keeps the direction of the harder axis and adds the
/// transverse momenta, so the result is a set of massless axes.
pub fn wta_kt_axes(n: usize, constituents: &[FourVector]) -> Vec<FourVector> {
    let mut axes: Vec<FourVector> = constituents.to_vec();
    while axes.len() > n {
        let closest = (0..axes.len())
            .tuple_combinations()
            .min_by_key(|&(i, j)| {
                let dij = delta_r(&axes[i], &axes[j]);
                axes[i].pt().min(axes[j].pt()).powi(2) * dij * dij
            });
        let Some((i, j)) = closest else { break };
        let (hard, soft) = if axes[i].pt() >= axes[j].pt() {
            (i, j)
        } else {
            (j, i)
        };
        axes[hard] = FourVector::from_pt_eta_phi_m(
            axes[i].pt() + axes[j].pt(),
            axes[hard].eta(),
            axes[hard].phi(),
            n64(0.),
        );
        axes.swap_remove(soft);
    }
    axes
}

/// N-subjettiness τ_N with the unnormalized measure
///
/// τ_N = Σ_i pt_i · min_k ΔR(i, axis_k), summed over the given
/// constituents. Returns zero when there are no axes.
pub fn n_subjettiness(axes: &[FourVector], constituents: &[FourVector]) -> N64 {
    constituents
        .iter()
        .map(|p| {
            axes.iter()
                .map(|axis| delta_r(p, axis))
                .min()
                .unwrap_or_default()
                * p.pt()
        })
        .sum()
}

/// Trim a jet
///
/// Re-clusters the constituents according to the trim definition and
/// returns the summed momentum of the kept subjets. A jet whose
/// subjets all fail the momentum-fraction cut trims to zero.
pub fn trim(
    jet: &FourVector,
    constituents: &[FourVector],
    trim_def: &TrimDefinition,
) -> FourVector {
    let min_pt = n64(trim_def.pt_fraction) * jet.pt();
    let minpt2 = min_pt * min_pt;
    let particles: Vec<PseudoJet> =
        constituents.iter().map(PseudoJet::from).collect();
    let mut subjets =
        particles.cluster_if(kt_f(trim_def.radius), |j| j.pt2() > minpt2);
    subjets.sort_unstable_by(|a, b| b.pt2().cmp(&a.pt2()));
    subjets
        .into_iter()
        .take(trim_def.max_subjets)
        .map(FourVector::from)
        .fold(FourVector::new(), |acc, p| acc + p)
}
