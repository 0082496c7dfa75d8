use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::channel::ChannelKind;

/// Full analysis configuration
///
/// Every field has a default, so a configuration file only has to
/// list the settings that differ.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Cuts on physics objects
    pub objects: ObjectCuts,
    /// Cuts for the weak boson fusion channel
    pub wbf: WbfCuts,
    /// Channels to analyse, in this order
    pub channels: Vec<ChannelKind>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            objects: Default::default(),
            wbf: Default::default(),
            channels: ChannelKind::ALL.to_vec(),
        }
    }
}

impl AnalysisConfig {
    /// Read the configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|err| ConfigError::Io(path.display().to_string(), err))?;
        serde_yaml::from_reader(file)
            .map_err(|err| ConfigError::Yaml(path.display().to_string(), err))
    }
}

/// Error reading an analysis configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration from {0}: {1}")]
    Io(String, std::io::Error),
    #[error("Failed to parse configuration in {0}: {1}")]
    Yaml(String, serde_yaml::Error),
}

/// Object selection cuts
///
/// Momenta are in GeV.
#[derive(Deserialize, Serialize, Copy, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ObjectCuts {
    /// Maximum absolute pseudorapidity of dressed leptons
    pub lepton_etamax: f64,
    /// Minimum transverse momentum of dressed leptons
    pub lepton_ptmin: f64,
    /// Maximum absolute rapidity of jets
    pub jet_etamax: f64,
    /// Minimum transverse momentum of jets
    pub jet_ptmin: f64,
    /// Jets closer than this to an isolated lepton are removed
    #[serde(rename = "lepton_jet_isolation_dR")]
    pub lepton_jet_isolation_dr: f64,
    /// Radius of the lepton isolation cone
    #[serde(rename = "lepton_iso_dR")]
    pub lepton_iso_dr: f64,
    /// Maximum fraction of additional transverse momentum in the
    /// lepton isolation cone
    pub lepton_iso_frac: f64,
    /// Minimum transverse momentum of b hadrons
    pub bhad_ptmin: f64,
    /// Maximum distance between a b hadron and the jet it tags
    #[serde(rename = "bhad_jet_dR")]
    pub bhad_jet_dr: f64,
    /// Maximum absolute rapidity of central b jets
    pub bjet_central_rapmax: f64,
}

impl Default for ObjectCuts {
    fn default() -> Self {
        Self {
            lepton_etamax: 2.4,
            lepton_ptmin: 25.,
            jet_etamax: 4.5,
            jet_ptmin: 25.,
            lepton_jet_isolation_dr: 0.4,
            lepton_iso_dr: 0.4,
            lepton_iso_frac: 0.1,
            bhad_ptmin: 5.,
            bhad_jet_dr: 0.4,
            bjet_central_rapmax: 2.4,
        }
    }
}

/// Cuts for the weak boson fusion channel
///
/// Masses and momenta are in GeV.
#[derive(Deserialize, Serialize, Copy, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WbfCuts {
    /// Minimum invariant mass of the two tag jets
    #[serde(rename = "massJJ_min")]
    pub mass_jj_min: f64,
    /// Minimum pseudorapidity separation of the two tag jets
    #[serde(rename = "deltayJJ_min")]
    pub delta_y_jj_min: f64,
    /// Minimum transverse mass of the di-lepton + missing momentum system
    #[serde(rename = "m_trans_llMET_min")]
    pub m_trans_ll_met_min: f64,
    /// Minimum di-lepton invariant mass
    pub m_ll_min: f64,
    /// Minimum transverse momentum of the leading lepton
    pub ptlep1_min: f64,
    /// Minimum transverse momentum of the subleading lepton
    pub ptlep2_min: f64,
    /// Minimum missing transverse momentum
    #[serde(rename = "MET_min")]
    pub met_min: f64,
    /// Reject events where one of the tag jets is a central b jet
    pub veto_tagged_jets: bool,
}

impl Default for WbfCuts {
    fn default() -> Self {
        Self {
            mass_jj_min: 500.,
            delta_y_jj_min: 3.,
            m_trans_ll_met_min: 50.,
            m_ll_min: 10.,
            ptlep1_min: 25.,
            ptlep2_min: 25.,
            met_min: 20.,
            veto_tagged_jets: false,
        }
    }
}
