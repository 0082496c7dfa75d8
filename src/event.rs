use noisy_float::prelude::*;
use serde::{Deserialize, Serialize};

use crate::four_vector::FourVector;
use crate::particle::{DressedLepton, Jet, Particle, UnstableParticle};

/// Reconstructed objects of a single scattering event
///
/// These are the inputs to the analysis: everything upstream, e.g.
/// jet clustering and lepton dressing, has already happened.
#[derive(Deserialize, Serialize, Clone, PartialEq, Eq, Debug)]
pub struct Event {
    #[serde(default)]
    pub(crate) id: Option<usize>,
    #[serde(default = "unit_weight")]
    pub weight: N64,
    /// Final-state particles except neutrinos
    #[serde(default)]
    pub visible: Vec<Particle>,
    /// Leading neutrinos
    #[serde(default)]
    pub neutrinos: Vec<Particle>,
    /// Dressed electrons
    #[serde(default)]
    pub electrons: Vec<DressedLepton>,
    /// Dressed muons
    #[serde(default)]
    pub muons: Vec<DressedLepton>,
    #[serde(default)]
    pub jets: Vec<Jet>,
    #[serde(default)]
    pub missing_momentum: FourVector,
    /// Unstable particles for b hadron identification
    #[serde(default)]
    pub unstable: Vec<UnstableParticle>,
}

fn unit_weight() -> N64 {
    n64(1.)
}

impl Default for Event {
    fn default() -> Self {
        Self {
            id: None,
            weight: unit_weight(),
            visible: Vec::new(),
            neutrinos: Vec::new(),
            electrons: Vec::new(),
            muons: Vec::new(),
            jets: Vec::new(),
            missing_momentum: FourVector::new(),
            unstable: Vec::new(),
        }
    }
}

impl Event {
    /// An empty event with unit weight
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<usize> {
        self.id
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EventBuilder {
    event: Event,
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBuilder {
    pub fn new() -> Self {
        Self {
            event: Event::new(),
        }
    }

    pub fn id(&mut self, id: usize) -> &mut Self {
        self.event.id = Some(id);
        self
    }

    pub fn weight(&mut self, weight: N64) -> &mut Self {
        self.event.weight = weight;
        self
    }

    pub fn add_visible(&mut self, p: Particle) -> &mut Self {
        self.event.visible.push(p);
        self
    }

    pub fn add_neutrino(&mut self, p: Particle) -> &mut Self {
        self.event.neutrinos.push(p);
        self
    }

    /// Add a dressed electron
    ///
    /// The bare electron is also added to the visible final state.
    pub fn add_electron(&mut self, l: DressedLepton) -> &mut Self {
        self.add_dressed_visible(&l);
        self.event.electrons.push(l);
        self
    }

    /// Add a dressed muon
    ///
    /// The bare muon is also added to the visible final state.
    pub fn add_muon(&mut self, l: DressedLepton) -> &mut Self {
        self.add_dressed_visible(&l);
        self.event.muons.push(l);
        self
    }

    fn add_dressed_visible(&mut self, l: &DressedLepton) {
        self.event.visible.push(l.lepton);
        self.event.visible.extend_from_slice(&l.photons);
    }

    pub fn add_jet(&mut self, jet: Jet) -> &mut Self {
        self.event.jets.push(jet);
        self
    }

    pub fn missing_momentum(&mut self, p: FourVector) -> &mut Self {
        self.event.missing_momentum = p;
        self
    }

    pub fn add_unstable(&mut self, p: UnstableParticle) -> &mut Self {
        self.event.unstable.push(p);
        self
    }

    pub fn build(&self) -> Event {
        self.event.clone()
    }
}

impl From<EventBuilder> for Event {
    fn from(b: EventBuilder) -> Self {
        b.event
    }
}
