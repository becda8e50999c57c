use std::{
    fmt::{self, Display},
    str::FromStr,
};

use jetty::{anti_kt_f, cambridge_aachen_f, kt_f, Cluster, PseudoJet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default jet radius parameter
pub const DEFAULT_JET_RADIUS: f64 = 1.;
/// Default minimum jet transverse momentum
pub const DEFAULT_JET_MIN_PT: f64 = 5.;

/// Jet clustering algorithms
#[derive(Deserialize, Serialize, Debug, Copy, Clone)]
pub enum JetAlgorithm {
    /// The [anti-kt](https://arxiv.org/abs/0802.1189) algorithm
    AntiKt,
    /// The [Cambridge](https://arxiv.org/abs/hep-ph/9707323)/[Aachen](https://arxiv.org/abs/hep-ph/9907280) algorithm
    CambridgeAachen,
    /// The [kt](https://arxiv.org/abs/hep-ph/9305266) algorithm
    Kt,
}

/// Definition of a jet
#[derive(Deserialize, Serialize, Debug, Copy, Clone)]
pub struct JetDefinition {
    /// Jet algorithm
    pub algorithm: JetAlgorithm,
    /// Jet radius parameter
    pub radius: f64,
    /// Minimum jet transverse momentum
    pub min_pt: f64,
}

impl Default for JetDefinition {
    fn default() -> Self {
        Self {
            algorithm: JetAlgorithm::AntiKt,
            radius: DEFAULT_JET_RADIUS,
            min_pt: DEFAULT_JET_MIN_PT,
        }
    }
}

/// Placeholder for an unknown jet algorithm
#[derive(Debug, Clone, Error)]
pub struct UnknownJetAlgorithm(String);

impl Display for UnknownJetAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown jet algorithm: {}", self.0)
    }
}

impl FromStr for JetAlgorithm {
    type Err = UnknownJetAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anti_kt" | "antikt" | "anti-kt" => Ok(Self::AntiKt),
            "kt" => Ok(Self::Kt),
            "Cambridge/Aachen" | "Cambridge-Aachen" | "Cambridge_Aachen"
            | "cambridge/aachen" | "cambridge-aachen" | "cambridge_aachen" => {
                Ok(Self::CambridgeAachen)
            }
            _ => Err(UnknownJetAlgorithm(s.to_string())),
        }
    }
}

/// Cluster the given particles into inclusive jets
///
/// Returns all jets above the minimum transverse momentum of the jet
/// definition, ordered by descending transverse momentum.
pub fn cluster_jets(
    particles: Vec<PseudoJet>,
    jet_def: &JetDefinition,
) -> Vec<PseudoJet> {
    let minpt2 = jet_def.min_pt * jet_def.min_pt;
    let cut = |jet: PseudoJet| jet.pt2() > minpt2;
    let r = jet_def.radius;
    let mut jets = match jet_def.algorithm {
        JetAlgorithm::AntiKt => particles.cluster_if(anti_kt_f(r), cut),
        JetAlgorithm::Kt => particles.cluster_if(kt_f(r), cut),
        JetAlgorithm::CambridgeAachen => {
            particles.cluster_if(cambridge_aachen_f(r), cut)
        }
    };
    jets.sort_unstable_by(|a, b| b.pt2().cmp(&a.pt2()));
    jets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::four_vector::FourVector;
    use noisy_float::prelude::*;

    fn massless(pt: f64, eta: f64, phi: f64) -> PseudoJet {
        FourVector::from_pt_eta_phi_m(n64(pt), n64(eta), n64(phi), n64(0.))
            .into()
    }

    #[test]
    fn no_particles_no_jets() {
        let jets = cluster_jets(vec![], &JetDefinition::default());
        assert!(jets.is_empty());
    }

    #[test]
    fn single_hard_particle() {
        let jets =
            cluster_jets(vec![massless(100., 0., 0.)], &JetDefinition::default());
        assert_eq!(jets.len(), 1);
        assert!((jets[0].pt() - 100.).abs() < 1e-9);
    }

    #[test]
    fn min_pt_cut() {
        // a particle below the threshold yields no jet
        let jets =
            cluster_jets(vec![massless(1., 0., 0.)], &JetDefinition::default());
        assert!(jets.is_empty());
    }

    #[test]
    fn jets_ordered_by_pt() {
        let particles = vec![
            massless(30., 2., 0.5),
            massless(80., -1., 3.),
            massless(50., 0.5, 5.),
        ];
        let jets = cluster_jets(particles, &JetDefinition::default());
        assert_eq!(jets.len(), 3);
        assert!(jets[0].pt() >= jets[1].pt());
        assert!(jets[1].pt() >= jets[2].pt());
    }
}
