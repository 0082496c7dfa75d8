use log::{debug, info, trace};
use rayon::prelude::*;
use typed_builder::TypedBuilder;

use crate::btag::{b_hadrons, TaggedJets};
use crate::channel::Channel;
use crate::config::AnalysisConfig;
use crate::context::EventContext;
use crate::event::Event;
use crate::histogram::{BinningError, Histograms, MergeError};
use crate::preselection::{preselect, Veto};
use crate::selection::ObjectSelector;
use crate::traits::Progress;

/// The WW + b jets analysis
///
/// Events go through the object selection, b hadron identification,
/// jet classification, and the preselection. Events passing the
/// preselection are handed to every configured channel.
///
/// # Example
///
/// ```
/// use wwbb::prelude::*;
///
/// let mut analysis = WWbb::builder().config(AnalysisConfig::default()).build();
/// let mut histos = Histograms::new();
/// analysis.book(&mut histos).unwrap();
/// let res = analysis.analyze(&EventBuilder::new().build(), &mut histos);
/// assert!(res.is_err());
/// ```
#[derive(TypedBuilder)]
pub struct WWbb {
    #[builder(default)]
    config: AnalysisConfig,
    #[builder(setter(skip), default = ObjectSelector::new(config.objects))]
    selector: ObjectSelector,
    #[builder(
        setter(skip),
        default = config.channels.iter().map(|c| c.make_channel(&config)).collect::<Vec<_>>()
    )]
    channels: Vec<Box<dyn Channel + Send + Sync>>,
}

/// Accumulated analysis output
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    pub histos: Histograms,
    /// Number of analysed events
    pub nevents: usize,
    /// Number of events passing the preselection
    pub naccepted: usize,
}

impl Summary {
    /// Combine with the output of another analysis run
    pub fn merge(mut self, other: Self) -> Result<Self, MergeError> {
        self.histos.merge(&other.histos)?;
        self.nevents += other.nevents;
        self.naccepted += other.naccepted;
        Ok(self)
    }
}

impl WWbb {
    pub fn new(config: AnalysisConfig) -> Self {
        Self::builder().config(config).build()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Names of the active channels
    pub fn channel_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.channels.iter().map(|c| c.name())
    }

    /// Book the histograms of all channels
    pub fn book(&mut self, histos: &mut Histograms) -> Result<(), BinningError> {
        for channel in &mut self.channels {
            debug!("Booking histograms for channel {}", channel.name());
            channel.book(histos)?;
        }
        Ok(())
    }

    /// Analyse a single event
    ///
    /// Returns the reason if the event fails the preselection. In that
    /// case no histogram is filled.
    pub fn analyze(&self, event: &Event, histos: &mut Histograms) -> Result<(), Veto> {
        let selected = self.selector.select(event);
        let b_hadrons = b_hadrons(&selected.unstable);
        trace!("{} b hadrons", b_hadrons.len());
        let jets = TaggedJets::new(selected.jets, b_hadrons, &self.config.objects);
        let roles = preselect(&selected.leptons, &event.neutrinos, &jets).map_err(|veto| {
            debug!("Event {:?} vetoed: {veto}", event.id());
            veto
        })?;
        let ctx = EventContext::new(event.weight, jets, roles, event.missing_momentum);
        for channel in &self.channels {
            channel.analyze(&ctx, histos);
        }
        Ok(())
    }

    /// Analyse events in parallel
    ///
    /// Each worker fills its own empty copy of `booked`. The partial
    /// results are merged at the end.
    pub fn analyze_par<'a, I, P>(
        &self,
        events: I,
        booked: &Histograms,
        progress: &P,
    ) -> Result<Summary, MergeError>
    where
        I: IntoParallelIterator<Item = &'a Event>,
        P: Progress + Sync,
    {
        let empty = || Summary {
            histos: booked.cleared(),
            ..Default::default()
        };
        events
            .into_par_iter()
            .fold(empty, |mut summary, event| {
                summary.nevents += 1;
                if self.analyze(event, &mut summary.histos).is_ok() {
                    summary.naccepted += 1;
                }
                progress.inc(1);
                summary
            })
            .map(Ok::<_, MergeError>)
            .reduce(|| Ok(empty()), |a, b| a?.merge(b?))
    }

    /// Log an overview of the analysis results
    pub fn finalize(&self, summary: &Summary) {
        info!(
            "{} of {} events passed the preselection",
            summary.naccepted, summary.nevents
        );
        for histo in &summary.histos {
            info!(
                "{}: {} entries, integral {}",
                histo.name(),
                histo.entries(),
                histo.integral()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::PI;

    use noisy_float::prelude::*;
    use particle_id::ParticleID;

    use crate::channel::ChannelKind;
    use crate::config::WbfCuts;
    use crate::event::EventBuilder;
    use crate::four_vector::FourVector;
    use crate::particle::{DressedLepton, Particle, UnstableParticle};
    use crate::progress_bar::NO_PROGRESS;

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn lepton(id: i32, charge: i32, pt: f64, phi: f64) -> DressedLepton {
        let p = FourVector::from_pt_eta_phi_m(pt, 0., phi, 0.);
        DressedLepton::bare(Particle::new(ParticleID::new(id), charge, p))
    }

    fn wbf_event(electron_charge: i32, njets: usize) -> EventBuilder {
        let mut ev = EventBuilder::new();
        ev.weight(n64(2.))
            .add_muon(lepton(-13, 1, 40., PI / 2.))
            .add_electron(lepton(-11 * electron_charge, electron_charge, 30., -PI / 2.))
            .missing_momentum(FourVector::from_pt_eta_phi_m(60., 0., 0., 0.));
        let jets = [(-2., 0.), (2., PI)];
        for (eta, phi) in jets.into_iter().take(njets) {
            ev.add_jet(FourVector::from_pt_eta_phi_m(80., eta, phi, 0.).into());
        }
        ev
    }

    fn b_hadron(children: Option<Vec<i32>>) -> UnstableParticle {
        let p = FourVector::from_pt_eta_phi_m(20., -2., 0.1, 5.279);
        UnstableParticle::new(
            Particle::new(ParticleID::new(521), 1, p),
            children.map(|c| c.into_iter().map(ParticleID::new).collect()),
        )
    }

    fn booked(config: AnalysisConfig) -> (WWbb, Histograms) {
        let mut analysis = WWbb::new(config);
        let mut histos = Histograms::new();
        analysis.book(&mut histos).unwrap();
        (analysis, histos)
    }

    #[test]
    fn wbf_signal_event() {
        log_init();
        let (analysis, mut histos) = booked(AnalysisConfig::default());
        assert_eq!(
            analysis.channel_names().collect::<Vec<_>>(),
            ["WW", "WBF", "HH", "BL"]
        );
        let event = wbf_event(-1, 2).build();
        assert_eq!(analysis.analyze(&event, &mut histos), Ok(()));

        let cuts = histos.by_name("cuts_WBF").unwrap();
        assert_eq!(cuts.bin_at(2.), 2.);
        assert_eq!(cuts.bin_at(3.), 2.);
        assert_eq!(cuts.bin_at(4.), 0.);
        assert_eq!(histos.by_name("njets_before_WBF").unwrap().bin_at(2.), 2.);
        assert_eq!(histos.by_name("njets_after_WBF").unwrap().bin_at(2.), 2.);
    }

    #[test]
    fn single_jet() {
        log_init();
        let (analysis, mut histos) = booked(AnalysisConfig::default());
        assert_eq!(analysis.analyze(&wbf_event(-1, 1).build(), &mut histos), Ok(()));
        let njets = histos.by_name("njets_before_WBF").unwrap();
        assert_eq!(njets.bin_at(1.), 2.);
        assert_eq!(njets.integral(), 2.);
        assert_eq!(histos.by_name("cuts_WBF").unwrap().integral(), 0.);
        assert_eq!(histos.by_name("njets_after_WBF").unwrap().integral(), 0.);
    }

    #[test]
    fn same_sign_leptons() {
        log_init();
        let (analysis, mut histos) = booked(AnalysisConfig::default());
        let res = analysis.analyze(&wbf_event(1, 2).build(), &mut histos);
        assert_eq!(res, Err(Veto::LeptonCharges(1, 1)));
        assert!(histos.iter().all(|h| h.entries() == 0));
    }

    #[test]
    fn non_isolated_lepton() {
        log_init();
        let (analysis, mut histos) = booked(AnalysisConfig::default());
        let mut ev = wbf_event(-1, 2);
        // hadronic activity next to the muon
        ev.add_visible(Particle::new(
            ParticleID::new(211),
            1,
            FourVector::from_pt_eta_phi_m(10., 0.1, PI / 2., 0.),
        ));
        let res = analysis.analyze(&ev.build(), &mut histos);
        assert_eq!(
            res,
            Err(Veto::LeptonMultiplicity {
                electrons: 1,
                muons: 0
            })
        );
    }

    #[test]
    fn b_jet_veto() {
        log_init();
        let config = AnalysisConfig {
            wbf: WbfCuts {
                veto_tagged_jets: true,
                ..Default::default()
            },
            channels: vec![ChannelKind::Wbf],
            ..Default::default()
        };
        let (analysis, mut histos) = booked(config);
        assert_eq!(histos.len(), 3);

        let mut ev = wbf_event(-1, 2);
        ev.add_unstable(b_hadron(Some(vec![-421, 211])));
        analysis.analyze(&ev.build(), &mut histos).unwrap();
        let cuts = histos.by_name("cuts_WBF").unwrap();
        assert_eq!(cuts.bin_at(3.), 2.);
        assert_eq!(cuts.bin_at(4.), 0.);

        // b hadrons without decay vertex are ignored
        let mut ev = wbf_event(-1, 2);
        ev.add_unstable(b_hadron(None));
        analysis.analyze(&ev.build(), &mut histos).unwrap();
        let cuts = histos.by_name("cuts_WBF").unwrap();
        assert_eq!(cuts.bin_at(3.), 4.);
        assert_eq!(cuts.bin_at(4.), 2.);
    }

    #[test]
    fn parallel_analysis() {
        log_init();
        let (analysis, booked) = booked(AnalysisConfig::default());
        let events: Vec<_> = (0..100)
            .map(|i| wbf_event(if i % 3 == 0 { 1 } else { -1 }, 1 + i % 2).build())
            .collect();

        let mut sequential = booked.cleared();
        let mut naccepted = 0;
        for event in &events {
            if analysis.analyze(event, &mut sequential).is_ok() {
                naccepted += 1;
            }
        }
        let summary = analysis.analyze_par(&events, &booked, &NO_PROGRESS).unwrap();
        assert_eq!(summary.nevents, 100);
        assert_eq!(summary.naccepted, naccepted);
        assert_eq!(summary.histos, sequential);
        analysis.finalize(&summary);
    }

    #[test]
    fn unbooked_histograms() {
        log_init();
        let mut analysis = WWbb::new(AnalysisConfig::default());
        let mut booked = Histograms::new();
        analysis.book(&mut booked).unwrap();

        let mut unbooked = Histograms::new();
        let event = wbf_event(-1, 2).build();
        assert_eq!(analysis.analyze(&event, &mut unbooked), Ok(()));
        assert!(unbooked.is_empty());

        let summary = analysis
            .analyze_par(&[event], &Histograms::new(), &NO_PROGRESS)
            .unwrap();
        assert_eq!(summary.naccepted, 1);
        assert!(summary.histos.is_empty());
    }
}
