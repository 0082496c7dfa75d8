use noisy_float::prelude::Float;
use log::{debug, warn};

use crate::channel::Channel;
use crate::config::WbfCuts;
use crate::context::EventContext;
use crate::histogram::{BinningError, HistoId, Histograms};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct WbfHistos {
    cuts: HistoId,
    njets_before: HistoId,
    njets_after: HistoId,
}

/// Weak boson fusion channel
///
/// Requires two tag jets in opposite hemispheres with a large
/// invariant mass and rapidity gap, followed by cuts on the leptons
/// and the missing transverse momentum.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Wbf {
    cuts: WbfCuts,
    histos: Option<WbfHistos>,
}

impl Wbf {
    pub fn new(cuts: WbfCuts) -> Self {
        Self { cuts, histos: None }
    }

    fn passes_tag_jet_cuts(&self, event: &EventContext) -> bool {
        let jets = event.jets.jets();
        let [j0, j1, ..] = jets else {
            return false;
        };
        let (p0, p1) = (j0.momentum(), j1.momentum());
        let (y0, y1) = (p0.eta(), p1.eta());
        let mass_jj = (p0 + p1).m();
        debug!("WBF tag jets: eta {y0}, {y1}, mass {mass_jj}");
        y0 * y1 <= 0.
            && (y0 - y1).abs() >= self.cuts.delta_y_jj_min
            && mass_jj >= self.cuts.mass_jj_min
    }

    fn passes_lepton_met_cuts(&self, event: &EventContext) -> bool {
        if event.m_trans_ll_met < self.cuts.m_trans_ll_met_min
            || event.m_ll < self.cuts.m_ll_min
        {
            return false;
        }
        let (pt_lep1, pt_lep2) = event.lepton_pts();
        pt_lep1 >= self.cuts.ptlep1_min
            && pt_lep2 >= self.cuts.ptlep2_min
            && event.met >= self.cuts.met_min
    }

    fn has_tagged_tag_jet(&self, event: &EventContext) -> bool {
        event.jets.is_central_b(0) || event.jets.is_central_b(1)
    }
}

impl Channel for Wbf {
    fn name(&self) -> &'static str {
        "WBF"
    }

    fn book(&mut self, histos: &mut Histograms) -> Result<(), BinningError> {
        self.histos = Some(WbfHistos {
            cuts: histos.book("cuts_WBF", 5, -0.5, 4.5)?,
            njets_before: histos.book("njets_before_WBF", 10, -0.5, 9.5)?,
            njets_after: histos.book("njets_after_WBF", 10, -0.5, 9.5)?,
        });
        Ok(())
    }

    fn analyze(&self, event: &EventContext, histos: &mut Histograms) {
        let Some(h) = self.histos else {
            warn!("WBF histograms have not been booked");
            return;
        };
        let weight = event.weight.raw();
        let njets = event.jets.len() as f64;
        histos.fill(h.njets_before, njets, weight);

        if !self.passes_tag_jet_cuts(event) {
            return;
        }
        histos.fill(h.cuts, 2., weight);

        if !self.passes_lepton_met_cuts(event) {
            return;
        }
        histos.fill(h.cuts, 3., weight);
        histos.fill(h.njets_after, njets, weight);

        if !self.cuts.veto_tagged_jets || self.has_tagged_tag_jet(event) {
            return;
        }
        histos.fill(h.cuts, 4., weight);
    }
}
