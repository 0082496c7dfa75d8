use log::trace;

use crate::channel::Channel;
use crate::context::EventContext;
use crate::histogram::{BinningError, Histograms};

macro_rules! placeholder_channel {
    ($(#[$meta:meta])* $ty:ident, $name:literal) => {
        $(#[$meta])*
        ///
        /// This channel doesn't apply any cuts yet and books no histograms.
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
        pub struct $ty {}

        impl Channel for $ty {
            fn name(&self) -> &'static str {
                $name
            }

            fn book(&mut self, _histos: &mut Histograms) -> Result<(), BinningError> {
                Ok(())
            }

            fn analyze(&self, event: &EventContext, _histos: &mut Histograms) {
                trace!("Skipping {} analysis of event with weight {}", $name, event.weight);
            }
        }
    };
}

placeholder_channel!(
    /// Di-boson production with leptonic W decays
    Ww,
    "WW"
);

placeholder_channel!(
    /// Higgs boson pair production
    Hh,
    "HH"
);

placeholder_channel!(
    /// Baseline lepton selection
    BaselineLeptons,
    "BL"
);
