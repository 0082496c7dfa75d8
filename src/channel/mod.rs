//! Analysis channels
//!
//! Each channel books its own histograms and runs its own sequence of
//! cuts on events that passed the common preselection. Channels don't
//! share any state.
mod pending;
mod wbf;

pub use pending::{BaselineLeptons, Hh, Ww};
pub use wbf::Wbf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::config::AnalysisConfig;
use crate::context::EventContext;
use crate::histogram::{BinningError, Histograms};

/// A signal region with its own histograms and cuts
pub trait Channel {
    /// Short channel name, used as histogram name suffix
    fn name(&self) -> &'static str;

    /// Book the channel histograms
    fn book(&mut self, histos: &mut Histograms) -> Result<(), BinningError>;

    /// Apply the channel cuts to an event and fill histograms
    fn analyze(&self, event: &EventContext, histos: &mut Histograms);
}

/// Known analysis channels
#[derive(
    Deserialize, Serialize, Display, EnumString, Copy, Clone, Debug, PartialEq, Eq, Hash,
)]
pub enum ChannelKind {
    #[serde(rename = "WW")]
    #[strum(to_string = "WW", serialize = "ww")]
    Ww,
    /// Weak boson fusion
    #[serde(rename = "WBF")]
    #[strum(to_string = "WBF", serialize = "wbf")]
    Wbf,
    #[serde(rename = "HH")]
    #[strum(to_string = "HH", serialize = "hh")]
    Hh,
    /// Baseline leptons
    #[serde(rename = "BL")]
    #[strum(to_string = "BL", serialize = "bl")]
    Bl,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 4] = [Self::Ww, Self::Wbf, Self::Hh, Self::Bl];

    /// Construct the channel handler
    pub fn make_channel(self, config: &AnalysisConfig) -> Box<dyn Channel + Send + Sync> {
        match self {
            Self::Ww => Box::new(Ww::default()),
            Self::Wbf => Box::new(Wbf::new(config.wbf)),
            Self::Hh => Box::new(Hh::default()),
            Self::Bl => Box::new(BaselineLeptons::default()),
        }
    }
}
