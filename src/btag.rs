use log::{trace, warn};
use noisy_float::prelude::*;
use particle_id::ParticleID;
use thiserror::Error;

use crate::config::ObjectCuts;
use crate::particle::{has_bottom, Jet, Particle, UnstableParticle};

/// An unstable particle without decay information
#[derive(Debug, Clone, Error)]
#[error("No decay vertex for unstable particle with id {}", .pid.id())]
pub struct MissingDecayVertex {
    pub pid: ParticleID,
}

/// Whether `u` is a b hadron at the end of its decay chain
///
/// b hadrons decaying into other b hadrons are intermediate states and
/// are rejected. So is a b hadron without any decay products.
pub fn is_final_b_hadron(u: &UnstableParticle) -> Result<bool, MissingDecayVertex> {
    if !has_bottom(u.particle.pid) {
        return Ok(false);
    }
    let children = u.children.as_ref().ok_or(MissingDecayVertex {
        pid: u.particle.pid,
    })?;
    Ok(!children.is_empty() && !children.iter().any(|&c| has_bottom(c)))
}

/// Final b hadrons among the given unstable particles
///
/// Candidates without decay vertex are skipped.
pub fn b_hadrons<'a>(
    unstable: impl IntoIterator<Item = &'a UnstableParticle>,
) -> Vec<Particle> {
    unstable
        .into_iter()
        .filter(|u| match is_final_b_hadron(u) {
            Ok(is_b) => is_b,
            Err(err) => {
                warn!("Skipping b hadron candidate: {err}");
                false
            }
        })
        .map(|u| u.particle)
        .collect()
}

/// Classification of a jet
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum JetTag {
    /// Central jet tagged by the b hadron with the given index
    CentralB(usize),
    /// Forward jet tagged by the b hadron with the given index
    ForwardB(usize),
    Light,
}

impl JetTag {
    /// Index of the tagging b hadron
    pub fn b_hadron(&self) -> Option<usize> {
        match self {
            Self::CentralB(idx) | Self::ForwardB(idx) => Some(*idx),
            Self::Light => None,
        }
    }
}

/// Jets together with their b tags
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaggedJets {
    jets: Vec<Jet>,
    tags: Vec<JetTag>,
    b_hadrons: Vec<Particle>,
}

impl TaggedJets {
    /// Tag `jets` by associating them with `b_hadrons`
    ///
    /// Jets are treated in the given order. Each jet takes the nearest
    /// b hadron that hasn't been claimed by an earlier jet. If that b
    /// hadron is close enough, the jet is tagged and the b hadron
    /// can't be used again.
    pub fn new(jets: Vec<Jet>, b_hadrons: Vec<Particle>, cuts: &ObjectCuts) -> Self {
        let mut claimed = vec![false; b_hadrons.len()];
        let mut tags = Vec::with_capacity(jets.len());
        for jet in &jets {
            let p = jet.momentum();
            let nearest = b_hadrons
                .iter()
                .enumerate()
                .filter(|(idx, _)| !claimed[*idx])
                .map(|(idx, b)| (idx, b.p.delta_r(&p)))
                .min_by_key(|(_, dr)| *dr);
            let tag = match nearest {
                Some((idx, dr)) if dr < cuts.bhad_jet_dr => {
                    claimed[idx] = true;
                    if p.rap().abs() < cuts.bjet_central_rapmax {
                        JetTag::CentralB(idx)
                    } else {
                        JetTag::ForwardB(idx)
                    }
                }
                _ => JetTag::Light,
            };
            trace!("jet with pt {} tagged as {tag:?}", p.pt());
            tags.push(tag);
        }
        Self {
            jets,
            tags,
            b_hadrons,
        }
    }

    /// All jets in their original order
    pub fn jets(&self) -> &[Jet] {
        &self.jets
    }

    pub fn tags(&self) -> &[JetTag] {
        &self.tags
    }

    pub fn b_hadrons(&self) -> &[Particle] {
        &self.b_hadrons
    }

    pub fn len(&self) -> usize {
        self.jets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jets.is_empty()
    }

    /// Jets together with their tags
    pub fn iter(&self) -> impl Iterator<Item = (&Jet, JetTag)> {
        self.jets.iter().zip(self.tags.iter().copied())
    }

    /// Central b jets with their b hadrons
    pub fn central_b(&self) -> impl Iterator<Item = (&Jet, &Particle)> {
        self.iter().filter_map(|(jet, tag)| match tag {
            JetTag::CentralB(idx) => Some((jet, &self.b_hadrons[idx])),
            _ => None,
        })
    }

    /// Forward b jets with their b hadrons
    pub fn forward_b(&self) -> impl Iterator<Item = (&Jet, &Particle)> {
        self.iter().filter_map(|(jet, tag)| match tag {
            JetTag::ForwardB(idx) => Some((jet, &self.b_hadrons[idx])),
            _ => None,
        })
    }

    pub fn light(&self) -> impl Iterator<Item = &Jet> {
        self.iter()
            .filter(|(_, tag)| *tag == JetTag::Light)
            .map(|(jet, _)| jet)
    }

    /// Whether the jet at position `idx` is a central b jet
    pub fn is_central_b(&self, idx: usize) -> bool {
        matches!(self.tags.get(idx), Some(JetTag::CentralB(_)))
    }

    /// The distance between the jet at `jet` and the b hadron at `b_hadron`
    pub fn delta_r(&self, jet: usize, b_hadron: usize) -> N64 {
        self.jets[jet].momentum().delta_r(&self.b_hadrons[b_hadron].p)
    }
}
