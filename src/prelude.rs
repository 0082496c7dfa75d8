pub use crate::{
    analysis::{Summary, WWbb},
    channel::ChannelKind,
    config::AnalysisConfig,
    event::{Event, EventBuilder},
    four_vector::FourVector,
    histogram::Histograms,
    progress_bar::{ProgressBar, NO_PROGRESS},
    reader::EventReader,
    traits::Progress,
};
