//! `wwbb` is an event selection for final states with two W bosons
//! and b jets in hadron collider events.
//!
//! Every event passes through the same stages:
//!
//! 1. Selection of isolated dressed leptons, jets, and b hadron
//!    candidates ([selection])
//! 2. Identification of b hadrons at the end of their decay chain and
//!    association with jets ([btag])
//! 3. Preselection of events with one electron and one muon of
//!    opposite charge, and assignment of the physics objects to their
//!    roles in the decay ([preselection])
//! 4. Channel-specific cut flows filling histograms ([channel])
//!
//! # How to use
//!
//! The [analysis::WWbb] type drives all stages. Book the histograms,
//! then analyse events one by one or in parallel:
//!
//! ```
//! use wwbb::prelude::*;
//!
//! let mut analysis = WWbb::new(AnalysisConfig::default());
//! let mut booked = Histograms::new();
//! analysis.book(&mut booked).unwrap();
//!
//! let events = vec![EventBuilder::new().build()];
//! let summary = analysis.analyze_par(&events, &booked, &NO_PROGRESS).unwrap();
//! assert_eq!(summary.nevents, 1);
//! assert_eq!(summary.naccepted, 0);
//! ```
//!
//! Events can be read from YAML files with [reader::EventReader].

/// Analysis driver
pub mod analysis;
/// b hadron identification and jet classification
pub mod btag;
pub mod channel;
/// Analysis settings
pub mod config;
/// Per-event derived quantities
pub mod context;
/// Input event format
pub mod event;
/// Four-vector class
pub mod four_vector;
/// Histogram output
pub mod histogram;
/// Particles, leptons, and jets
pub mod particle;
/// Most important exports
pub mod prelude;
/// Lepton multiplicity and charge requirements
pub mod preselection;
/// Progress bar
pub mod progress_bar;
/// Event readers
pub mod reader;
/// Object selection
pub mod selection;
/// Common traits
pub mod traits;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_REV: Option<&str> = option_env!("VERGEN_GIT_SHA");
pub const GIT_BRANCH: Option<&str> = option_env!("VERGEN_GIT_BRANCH");
