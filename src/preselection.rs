use std::cmp::Reverse;

use log::debug;
use thiserror::Error;

use crate::btag::TaggedJets;
use crate::particle::{DressedLepton, Jet, Particle};
use crate::selection::IsolatedLeptons;

/// Reason for rejecting an event in the preselection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Veto {
    #[error("Need exactly one isolated electron and one isolated muon, found {electrons} electrons and {muons} muons")]
    LeptonMultiplicity { electrons: usize, muons: usize },
    #[error("Electron and muon charges {0} and {1} are not opposite")]
    LeptonCharges(i32, i32),
}

/// Assignment of physics objects to their role in the decay
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Roles {
    pub lepton_plus: DressedLepton,
    pub lepton_minus: DressedLepton,
    /// Neutrino from the same W decay as `lepton_plus`
    pub nu_plus: Option<Particle>,
    /// Neutrino from the same W decay as `lepton_minus`
    pub nu_minus: Option<Particle>,
    /// Central b jet tagged by a positively charged b hadron
    pub bjet_plus: Option<Jet>,
    /// Central b jet tagged by a negatively charged b hadron
    pub bjet_minus: Option<Jet>,
}

/// Require one electron and one muon with opposite charges and assign roles
pub fn preselect(
    leptons: &IsolatedLeptons,
    neutrinos: &[Particle],
    jets: &TaggedJets,
) -> Result<Roles, Veto> {
    let (electron, muon) = match (leptons.electrons.as_slice(), leptons.muons.as_slice()) {
        ([electron], [muon]) => (electron, muon),
        (electrons, muons) => {
            return Err(Veto::LeptonMultiplicity {
                electrons: electrons.len(),
                muons: muons.len(),
            })
        }
    };
    if electron.charge() * muon.charge() != -1 {
        return Err(Veto::LeptonCharges(electron.charge(), muon.charge()));
    }
    let (lepton_plus, lepton_minus) = if electron.charge() > 0 {
        (electron.clone(), muon.clone())
    } else {
        (muon.clone(), electron.clone())
    };

    // Only the leading neutrino is ever considered
    let mut neutrinos = neutrinos.to_vec();
    neutrinos.sort_by_key(|nu| Reverse(nu.p.pt()));
    let leading_nu = neutrinos.first();
    let nu_plus = leading_nu
        .filter(|nu| nu.pid.id() + lepton_plus.pid().id() == 1)
        .copied();
    let nu_minus = leading_nu
        .filter(|nu| nu.pid.id() + lepton_minus.pid().id() == -1)
        .copied();

    // Same for the b jets: only the first central b jet is checked
    let leading_b = jets.central_b().next();
    let bjet_plus = leading_b
        .filter(|(_, b)| b.charge > 0)
        .map(|(jet, _)| *jet);
    let bjet_minus = leading_b
        .filter(|(_, b)| b.charge < 0)
        .map(|(jet, _)| *jet);

    debug!(
        "lepton roles assigned, neutrinos: {}/{}, b jets: {}/{}",
        nu_plus.is_some(),
        nu_minus.is_some(),
        bjet_plus.is_some(),
        bjet_minus.is_some()
    );
    Ok(Roles {
        lepton_plus,
        lepton_minus,
        nu_plus,
        nu_minus,
        bjet_plus,
        bjet_minus,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use particle_id::ParticleID;

    use crate::config::ObjectCuts;
    use crate::four_vector::FourVector;

    fn lepton(id: i32, charge: i32, pt: f64) -> DressedLepton {
        let p = FourVector::from_pt_eta_phi_m(pt, 0., 0., 0.);
        DressedLepton::bare(Particle::new(ParticleID::new(id), charge, p))
    }

    fn neutrino(id: i32, pt: f64) -> Particle {
        let p = FourVector::from_pt_eta_phi_m(pt, 1., 1., 0.);
        Particle::new(ParticleID::new(id), 0, p)
    }

    fn tagged_jets(b_charges: &[i32]) -> TaggedJets {
        let mut jets = Vec::new();
        let mut b_hadrons = Vec::new();
        for (i, &charge) in b_charges.iter().enumerate() {
            let phi = i as f64;
            let p = FourVector::from_pt_eta_phi_m(100. - i as f64, 0., phi, 0.);
            jets.push(Jet::new(p));
            let p = FourVector::from_pt_eta_phi_m(20., 0., phi + 0.05, 5.);
            b_hadrons.push(Particle::new(ParticleID::new(521 * charge), charge, p));
        }
        TaggedJets::new(jets, b_hadrons, &ObjectCuts::default())
    }

    #[test]
    fn lepton_multiplicity() {
        let no_jets = TaggedJets::default();
        let leptons = IsolatedLeptons {
            electrons: vec![lepton(11, -1, 30.)],
            muons: vec![],
        };
        assert_eq!(
            preselect(&leptons, &[], &no_jets),
            Err(Veto::LeptonMultiplicity { electrons: 1, muons: 0 })
        );
        let leptons = IsolatedLeptons {
            electrons: vec![lepton(11, -1, 30.)],
            muons: vec![lepton(-13, 1, 40.), lepton(13, -1, 35.)],
        };
        assert!(preselect(&leptons, &[], &no_jets).is_err());
    }

    #[test]
    fn same_sign() {
        let leptons = IsolatedLeptons {
            electrons: vec![lepton(-11, 1, 30.)],
            muons: vec![lepton(-13, 1, 40.)],
        };
        assert_eq!(
            preselect(&leptons, &[], &TaggedJets::default()),
            Err(Veto::LeptonCharges(1, 1))
        );
    }

    #[test]
    fn lepton_roles() {
        let mu_plus = lepton(-13, 1, 40.);
        let e_minus = lepton(11, -1, 30.);
        let leptons = IsolatedLeptons {
            electrons: vec![e_minus.clone()],
            muons: vec![mu_plus.clone()],
        };
        let roles = preselect(&leptons, &[], &TaggedJets::default()).unwrap();
        assert_eq!(roles.lepton_plus, mu_plus);
        assert_eq!(roles.lepton_minus, e_minus);
        assert_eq!(roles.nu_plus, None);
        assert_eq!(roles.bjet_plus, None);

        let e_plus = lepton(-11, 1, 30.);
        let mu_minus = lepton(13, -1, 40.);
        let leptons = IsolatedLeptons {
            electrons: vec![e_plus.clone()],
            muons: vec![mu_minus.clone()],
        };
        let roles = preselect(&leptons, &[], &TaggedJets::default()).unwrap();
        assert_eq!(roles.lepton_plus, e_plus);
        assert_eq!(roles.lepton_minus, mu_minus);
    }

    #[test]
    fn neutrino_roles() {
        let leptons = IsolatedLeptons {
            electrons: vec![lepton(11, -1, 30.)],
            muons: vec![lepton(-13, 1, 40.)],
        };
        let jets = TaggedJets::default();
        // nu_mu pairs with mu+
        let nu_mu = neutrino(14, 50.);
        let nu_e_bar = neutrino(-12, 20.);
        let roles = preselect(&leptons, &[nu_e_bar, nu_mu], &jets).unwrap();
        assert_eq!(roles.nu_plus, Some(nu_mu));
        // only the leading neutrino is considered
        assert_eq!(roles.nu_minus, None);

        let roles = preselect(&leptons, &[neutrino(-12, 60.), nu_mu], &jets).unwrap();
        assert_eq!(roles.nu_plus, None);
        assert_eq!(roles.nu_minus, Some(neutrino(-12, 60.)));
    }

    #[test]
    fn bjet_roles() {
        let leptons = IsolatedLeptons {
            electrons: vec![lepton(11, -1, 30.)],
            muons: vec![lepton(-13, 1, 40.)],
        };
        let jets = tagged_jets(&[1, -1]);
        assert_eq!(jets.central_b().count(), 2);
        let roles = preselect(&leptons, &[], &jets).unwrap();
        assert_eq!(roles.bjet_plus, Some(jets.jets()[0]));
        // the second central b jet is never looked at
        assert_eq!(roles.bjet_minus, None);

        let jets = tagged_jets(&[-1, 1]);
        let roles = preselect(&leptons, &[], &jets).unwrap();
        assert_eq!(roles.bjet_plus, None);
        assert_eq!(roles.bjet_minus, Some(jets.jets()[0]));
    }
}
