use jetty::PseudoJet;
use noisy_float::prelude::*;
use serde::{Deserialize, Serialize};

/// A basic four-vector
///
/// The zero component is the energy component. The remainder are the
/// spatial components, with the third axis along the beam.
#[derive(
    Deserialize,
    Serialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Debug,
    Clone,
    Copy,
    Default,
)]
pub struct FourVector {
    pt: N64,
    p: [N64; 4],
}

impl FourVector {
    /// Construct a new four-vector with all components zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a four-vector from transverse momentum,
    /// pseudorapidity, azimuthal angle and invariant mass
    pub fn from_pt_eta_phi_m(pt: N64, eta: N64, phi: N64, m: N64) -> Self {
        let px = pt * phi.cos();
        let py = pt * phi.sin();
        let pz = pt * eta.sinh();
        let e = (m * m + px * px + py * py + pz * pz).sqrt();
        [e, px, py, pz].into()
    }

    /// The energy component
    pub fn e(&self) -> N64 {
        self.p[0]
    }

    /// The momentum component along the first transverse axis
    pub fn px(&self) -> N64 {
        self.p[1]
    }

    /// The momentum component along the second transverse axis
    pub fn py(&self) -> N64 {
        self.p[2]
    }

    /// The momentum component along the beam axis
    pub fn pz(&self) -> N64 {
        self.p[3]
    }

    /// The scalar transverse momentum
    pub fn pt(&self) -> N64 {
        self.pt
    }

    /// The pseudorapidity
    ///
    /// Returns zero for a vector with vanishing spatial part.
    pub fn eta(&self) -> N64 {
        let p = self.spatial_norm();
        if p == 0. {
            return n64(0.);
        }
        // -ln(tan(θ/2)), written to stay finite for finite pt
        ((p + self.pz().abs()) / self.pt.max(n64(f64::MIN_POSITIVE))).ln()
            * n64(self.pz().raw().signum())
    }

    /// The azimuthal angle, normalized to [0, 2π)
    pub fn phi(&self) -> N64 {
        let phi = self.py().raw().atan2(self.px().raw());
        if phi < 0. {
            n64(phi + 2. * std::f64::consts::PI)
        } else {
            n64(phi)
        }
    }

    /// The spatial norm \sqrt{\sum v_i^2} with i = 1,2,3
    pub fn spatial_norm(&self) -> N64 {
        self.spatial_norm_sq().sqrt()
    }

    /// The square \sum v_i^2 with i = 1,2,3 of the spatial norm
    pub fn spatial_norm_sq(&self) -> N64 {
        self.p.iter().skip(1).map(|e| *e * *e).sum()
    }

    /// The invariant mass \sqrt{v_0^2 - \sum v_i^2} with i = 1,2,3
    ///
    /// Small negative mass squares from rounding are clamped to zero.
    pub fn m(&self) -> N64 {
        self.m_sq().max(n64(0.)).sqrt()
    }

    /// The invariant mass square v_0^2 - \sum v_i^2 with i = 1,2,3
    pub fn m_sq(&self) -> N64 {
        self.p[0] * self.p[0] - self.spatial_norm_sq()
    }

    const fn len() -> usize {
        4
    }

    fn update_pt(&mut self) {
        self.pt = (self.p[1] * self.p[1] + self.p[2] * self.p[2]).sqrt();
    }
}

impl std::convert::From<[N64; 4]> for FourVector {
    fn from(p: [N64; 4]) -> FourVector {
        let mut res = FourVector {
            p,
            pt: std::default::Default::default(),
        };
        res.update_pt();
        res
    }
}

impl std::ops::Index<usize> for FourVector {
    type Output = N64;

    fn index(&self, i: usize) -> &Self::Output {
        &self.p[i]
    }
}

impl std::ops::AddAssign for FourVector {
    fn add_assign(&mut self, rhs: FourVector) {
        for i in 0..Self::len() {
            self.p[i] += rhs[i]
        }
        self.update_pt();
    }
}

impl std::ops::SubAssign for FourVector {
    fn sub_assign(&mut self, rhs: FourVector) {
        for i in 0..Self::len() {
            self.p[i] -= rhs[i]
        }
        self.update_pt();
    }
}

impl std::ops::Add for FourVector {
    type Output = Self;

    fn add(mut self, rhs: FourVector) -> Self::Output {
        self += rhs;
        self
    }
}

impl std::ops::Sub for FourVector {
    type Output = Self;

    fn sub(mut self, rhs: FourVector) -> Self::Output {
        self -= rhs;
        self
    }
}

impl From<PseudoJet> for FourVector {
    fn from(p: PseudoJet) -> Self {
        [p.e(), p.px(), p.py(), p.pz()].into()
    }
}

impl From<FourVector> for PseudoJet {
    fn from(p: FourVector) -> Self {
        (&p).into()
    }
}

impl From<&FourVector> for PseudoJet {
    fn from(p: &FourVector) -> Self {
        [p[0], p[1], p[2], p[3]].into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinematics_round_trip() {
        let p = FourVector::from_pt_eta_phi_m(
            n64(100.),
            n64(1.3),
            n64(2.1),
            n64(0.),
        );
        assert!((p.pt() - 100.).abs() < 1e-9);
        assert!((p.eta() - 1.3).abs() < 1e-9);
        assert!((p.phi() - 2.1).abs() < 1e-9);
        assert!(p.m() < 1e-6);
    }

    #[test]
    fn phi_normalized() {
        // a vector pointing along negative y has phi = 3π/2
        let p = FourVector::from([n64(1.), n64(0.), n64(-1.), n64(0.)]);
        assert!((p.phi() - 1.5 * std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn massive_sum() {
        let p1 = FourVector::from_pt_eta_phi_m(
            n64(40.),
            n64(0.5),
            n64(0.),
            n64(0.),
        );
        let p2 = FourVector::from_pt_eta_phi_m(
            n64(40.),
            n64(-0.5),
            n64(std::f64::consts::PI),
            n64(0.),
        );
        let sum = p1 + p2;
        assert!(sum.pt() < 1e-9);
        assert!(sum.m() > 0.);
    }
}
