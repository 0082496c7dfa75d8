use noisy_float::prelude::*;

use crate::btag::TaggedJets;
use crate::four_vector::FourVector;
use crate::preselection::Roles;

/// Everything the analysis channels need to know about one event
///
/// Built from scratch for every event that passes the preselection.
#[derive(Clone, Debug, PartialEq)]
pub struct EventContext {
    pub weight: N64,
    /// Selected jets with their b tags, by decreasing transverse momentum
    pub jets: TaggedJets,
    pub roles: Roles,
    pub met_4v: FourVector,
    /// Missing transverse momentum
    pub met: N64,
    /// Di-lepton invariant mass
    pub m_ll: N64,
    /// Transverse mass of the di-lepton + missing momentum system
    pub m_trans_ll_met: N64,
    /// Invariant mass of the positive lepton and its neutrino
    pub m_w_plus: Option<N64>,
    /// Invariant mass of the negative lepton and its neutrino
    pub m_w_minus: Option<N64>,
}

impl EventContext {
    pub fn new(weight: N64, jets: TaggedJets, roles: Roles, met_4v: FourVector) -> Self {
        let p_plus = roles.lepton_plus.momentum();
        let p_minus = roles.lepton_minus.momentum();
        let p_ll = p_plus + p_minus;
        let m_ll = p_ll.m();
        let m_trans_ll_met = transverse_mass(&p_ll, &met_4v);
        let m_w_plus = roles.nu_plus.map(|nu| (p_plus + nu.p).m());
        let m_w_minus = roles.nu_minus.map(|nu| (p_minus + nu.p).m());
        Self {
            weight,
            jets,
            roles,
            met: met_4v.pt(),
            met_4v,
            m_ll,
            m_trans_ll_met,
            m_w_plus,
            m_w_minus,
        }
    }

    /// Transverse momenta of the leading and subleading lepton
    pub fn lepton_pts(&self) -> (N64, N64) {
        let pt_plus = self.roles.lepton_plus.momentum().pt();
        let pt_minus = self.roles.lepton_minus.momentum().pt();
        if pt_plus > pt_minus {
            (pt_plus, pt_minus)
        } else {
            (pt_minus, pt_plus)
        }
    }
}

/// Transverse mass of a visible system and missing momentum
///
/// m_T^2 = (E_T + |p_T^miss|)^2 - |p_T + p_T^miss|^2 with
/// E_T = \sqrt{p_T^2 + m^2} of the visible system
pub fn transverse_mass(visible: &FourVector, missing: &FourVector) -> N64 {
    let m_sq = std::cmp::max(visible.m_sq(), n64(0.));
    let et_vis = (visible.pt() * visible.pt() + m_sq).sqrt();
    let et_miss = missing.pt();
    let [px_vis, py_vis] = visible.pt_vec();
    let [px_miss, py_miss] = missing.pt_vec();
    let px = px_vis + px_miss;
    let py = py_vis + py_miss;
    let mt_sq = (et_vis + et_miss) * (et_vis + et_miss) - px * px - py * py;
    std::cmp::max(mt_sq, n64(0.)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::PI;

    use particle_id::ParticleID;

    use crate::particle::{DressedLepton, Particle};

    fn lepton(id: i32, charge: i32, pt: f64, phi: f64) -> DressedLepton {
        let p = FourVector::from_pt_eta_phi_m(pt, 0., phi, 0.);
        DressedLepton::bare(Particle::new(ParticleID::new(id), charge, p))
    }

    #[test]
    fn transverse_mass_w() {
        // massless lepton and neutrino back to back: m_T = 2 p_T
        let l = FourVector::from_pt_eta_phi_m(40., 0.3, 0., 0.);
        let nu = FourVector::from_pt_eta_phi_m(40., 0., PI, 0.);
        assert!((transverse_mass(&l, &nu).raw() - 80.).abs() < 1e-9);
        // collinear: m_T = 0
        let nu = FourVector::from_pt_eta_phi_m(40., 0., 0., 0.);
        assert!(transverse_mass(&l, &nu).raw().abs() < 1e-4);
    }

    #[test]
    fn derived_quantities() {
        let roles = Roles {
            lepton_plus: lepton(-13, 1, 40., PI / 2.),
            lepton_minus: lepton(11, -1, 30., -PI / 2.),
            nu_plus: Some(Particle::new(
                ParticleID::new(14),
                0,
                FourVector::from_pt_eta_phi_m(40., 0., -PI / 2., 0.),
            )),
            nu_minus: None,
            bjet_plus: None,
            bjet_minus: None,
        };
        let met = FourVector::from_pt_eta_phi_m(60., 0., 0., 0.);
        let ctx = EventContext::new(n64(1.), TaggedJets::default(), roles, met);
        assert!((ctx.met.raw() - 60.).abs() < 1e-9);
        // back-to-back leptons: m_ll^2 = 4 pt1 pt2
        assert!((ctx.m_ll.raw() - 4800f64.sqrt()).abs() < 1e-6);
        assert!((ctx.m_trans_ll_met.raw() - 13200f64.sqrt()).abs() < 1e-6);
        assert!((ctx.m_w_plus.unwrap().raw() - 80.).abs() < 1e-6);
        assert_eq!(ctx.m_w_minus, None);
        let (pt1, pt2) = ctx.lepton_pts();
        assert!((pt1.raw() - 40.).abs() < 1e-9);
        assert!((pt2.raw() - 30.).abs() < 1e-9);
    }
}
