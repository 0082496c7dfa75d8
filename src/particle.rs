use particle_id::ParticleID;
use particle_id::sm_elementary_particles::bottom;
use serde::{Deserialize, Serialize};

use crate::four_vector::FourVector;

/// A particle as produced by the event generator
#[derive(Deserialize, Serialize, Copy, Clone, PartialEq, Eq, Debug)]
pub struct Particle {
    /// PDG particle id
    pub pid: ParticleID,
    /// Electric charge in units of the positron charge
    #[serde(default)]
    pub charge: i32,
    /// Four-momentum
    pub p: FourVector,
}

impl Particle {
    pub fn new(pid: ParticleID, charge: i32, p: FourVector) -> Self {
        Self { pid, charge, p }
    }

    pub fn momentum(&self) -> FourVector {
        self.p
    }
}

/// A charged lepton together with the photons clustered into it
#[derive(Deserialize, Serialize, Clone, PartialEq, Eq, Debug)]
pub struct DressedLepton {
    /// The bare lepton
    pub lepton: Particle,
    /// Photons absorbed into the lepton
    #[serde(default)]
    pub photons: Vec<Particle>,
}

impl DressedLepton {
    /// A lepton without any photons
    pub fn bare(lepton: Particle) -> Self {
        Self { lepton, photons: Vec::new() }
    }

    /// The combined momentum of the lepton and its photons
    pub fn momentum(&self) -> FourVector {
        self.lepton.p + self.photons.iter().map(|p| p.p).sum::<FourVector>()
    }

    /// The undressed lepton
    pub fn constituent_lepton(&self) -> &Particle {
        &self.lepton
    }

    pub fn pid(&self) -> ParticleID {
        self.lepton.pid
    }

    pub fn charge(&self) -> i32 {
        self.lepton.charge
    }
}

/// A clustered jet
#[derive(Deserialize, Serialize, Copy, Clone, PartialEq, Eq, Debug)]
#[serde(transparent)]
pub struct Jet {
    p: FourVector,
}

impl Jet {
    pub fn new(p: FourVector) -> Self {
        Self { p }
    }

    pub fn momentum(&self) -> FourVector {
        self.p
    }
}

impl From<FourVector> for Jet {
    fn from(p: FourVector) -> Self {
        Self::new(p)
    }
}

/// An unstable particle with its direct decay products
///
/// `children` is `None` if the event record does not contain the decay
/// vertex of the particle.
#[derive(Deserialize, Serialize, Clone, PartialEq, Eq, Debug)]
pub struct UnstableParticle {
    #[serde(flatten)]
    pub particle: Particle,
    #[serde(default)]
    pub children: Option<Vec<ParticleID>>,
}

impl UnstableParticle {
    pub fn new(particle: Particle, children: Option<Vec<ParticleID>>) -> Self {
        Self { particle, children }
    }
}

/// Whether the particle with the given id contains a bottom quark
///
/// Follows the PDG numbering scheme: the bottom quark itself, or a
/// hadron with `5` among its quark digits.
pub fn has_bottom(id: ParticleID) -> bool {
    let id = id.id().abs();
    if id == bottom.id() {
        return true;
    }
    // fundamental particles and nuclei/special codes
    if id < 100 || id >= 10_000_000 {
        return false;
    }
    let n_q3 = (id / 10) % 10;
    let n_q2 = (id / 100) % 10;
    let n_q1 = (id / 1000) % 10;
    [n_q1, n_q2, n_q3].contains(&bottom.id())
}
