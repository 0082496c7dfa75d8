use std::cmp::Reverse;

use log::trace;
use noisy_float::prelude::*;

use crate::config::ObjectCuts;
use crate::event::Event;
use crate::particle::{DressedLepton, Jet, Particle, UnstableParticle};

/// Isolated leptons of one event, by flavour
///
/// The order is the order of the input collections.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IsolatedLeptons {
    pub electrons: Vec<DressedLepton>,
    pub muons: Vec<DressedLepton>,
}

impl IsolatedLeptons {
    /// All isolated leptons, electrons first
    pub fn iter(&self) -> impl Iterator<Item = &DressedLepton> {
        self.electrons.iter().chain(self.muons.iter())
    }
}

/// Objects passing the selection cuts
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectedObjects {
    pub leptons: IsolatedLeptons,
    /// Jets after overlap removal, ordered by decreasing transverse momentum
    pub jets: Vec<Jet>,
    /// Unstable particles above the b hadron transverse momentum threshold
    pub unstable: Vec<UnstableParticle>,
}

/// Selection of leptons, jets, and unstable particles
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ObjectSelector {
    cuts: ObjectCuts,
}

impl ObjectSelector {
    pub fn new(cuts: ObjectCuts) -> Self {
        Self { cuts }
    }

    /// Apply all object selection steps to an event
    pub fn select(&self, event: &Event) -> SelectedObjects {
        let electrons = self
            .accepted_leptons(&event.electrons)
            .filter(|l| self.is_isolated(l, &event.visible))
            .cloned()
            .collect();
        let muons = self
            .accepted_leptons(&event.muons)
            .filter(|l| self.is_isolated(l, &event.visible))
            .cloned()
            .collect();
        let leptons = IsolatedLeptons { electrons, muons };
        let jets = self.select_jets(&event.jets, &leptons);
        let unstable = self.select_unstable(&event.unstable).cloned().collect();
        SelectedObjects {
            leptons,
            jets,
            unstable,
        }
    }

    /// Dressed leptons passing the pseudorapidity and transverse momentum cuts
    pub fn accepted_leptons<'a>(
        &'a self,
        leptons: &'a [DressedLepton],
    ) -> impl Iterator<Item = &'a DressedLepton> + 'a {
        leptons.iter().filter(|l| {
            let p = l.momentum();
            p.eta().abs() < self.cuts.lepton_etamax
                && p.pt() > self.cuts.lepton_ptmin
        })
    }

    /// The scalar transverse momentum sum of visible particles in a
    /// cone around `lepton`
    ///
    /// The lepton's own constituents contribute to the sum.
    pub fn cone_pt(&self, lepton: &DressedLepton, visible: &[Particle]) -> N64 {
        let p = lepton.momentum();
        visible
            .iter()
            .filter(|v| p.delta_r(&v.p) < self.cuts.lepton_iso_dr)
            .map(|v| v.p.pt())
            .sum()
    }

    /// Whether the cone transverse momentum exceeds the lepton's own by
    /// less than the allowed fraction
    pub fn is_isolated(&self, lepton: &DressedLepton, visible: &[Particle]) -> bool {
        let cone_pt = self.cone_pt(lepton, visible);
        let max = n64(1. + self.cuts.lepton_iso_frac) * lepton.momentum().pt();
        let isolated = cone_pt < max;
        trace!(
            "lepton {} with cone pt {cone_pt} (max {max}) isolated: {isolated}",
            lepton.pid().id()
        );
        isolated
    }

    /// Jets passing the kinematic cuts that don't overlap with any isolated lepton
    ///
    /// The result is ordered by decreasing transverse momentum.
    pub fn select_jets(&self, jets: &[Jet], leptons: &IsolatedLeptons) -> Vec<Jet> {
        let mut jets: Vec<_> = jets
            .iter()
            .filter(|j| j.momentum().pt() > self.cuts.jet_ptmin)
            .copied()
            .collect();
        jets.sort_by_key(|j| Reverse(j.momentum().pt()));
        jets.retain(|j| {
            let p = j.momentum();
            if p.rap().abs() > self.cuts.jet_etamax {
                return false;
            }
            let overlap = leptons.iter().any(|l| {
                l.constituent_lepton().p.delta_r(&p)
                    <= self.cuts.lepton_jet_isolation_dr
            });
            if overlap {
                trace!("removing jet {p:?} overlapping with a lepton");
            }
            !overlap
        });
        jets
    }

    /// Unstable particles considered in the b hadron search
    pub fn select_unstable<'a>(
        &'a self,
        unstable: &'a [UnstableParticle],
    ) -> impl Iterator<Item = &'a UnstableParticle> + 'a {
        unstable
            .iter()
            .filter(|u| u.particle.p.pt() > self.cuts.bhad_ptmin)
    }
}
