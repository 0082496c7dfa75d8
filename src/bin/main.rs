mod opt;

use std::fs::File;
use std::io::BufWriter;

use crate::opt::Opt;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use itertools::Itertools;
use log::{debug, info};
use wwbb::prelude::*;
use wwbb::{GIT_BRANCH, GIT_REV, VERSION};

fn main() -> Result<()> {
    let args = argfile::expand_args_from(
        std::env::args_os(),
        argfile::parse_fromfile,
        argfile::PREFIX,
    )
    .with_context(|| "Failed to read argument file")?;
    let opt = Opt::parse_from(args);

    let env = Env::default().filter_or("WWBB_LOG", &opt.loglevel);
    env_logger::init_from_env(env);

    rayon::ThreadPoolBuilder::new()
        .num_threads(opt.threads)
        .build_global()?;

    if let (Some(rev), Some(branch)) = (GIT_REV, GIT_BRANCH) {
        info!("wwbb {VERSION} rev {rev} ({branch})");
    } else {
        info!("wwbb {VERSION}");
    }
    debug!("settings: {:#?}", opt);

    let config = match &opt.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    debug!("analysis configuration: {config:#?}");

    let mut analysis = WWbb::new(config);
    info!("Channels: {}", analysis.channel_names().join(", "));
    let mut booked = Histograms::new();
    analysis.book(&mut booked)?;

    let mut summary = Summary {
        histos: booked.cleared(),
        ..Default::default()
    };
    for infile in &opt.infiles {
        info!("Reading events from {infile:?}");
        let events: Vec<_> = EventReader::from_file(infile)?
            .collect::<Result<_, _>>()
            .with_context(|| format!("Failed to read events from {infile:?}"))?;
        let progress = ProgressBar::new(events.len() as u64, "events analysed:");
        let partial = analysis.analyze_par(&events, &booked, &progress)?;
        progress.finish();
        summary = summary.merge(partial)?;
    }
    analysis.finalize(&summary);

    info!("Writing histograms to {:?}", opt.outfile);
    let out = File::create(&opt.outfile)
        .with_context(|| format!("Failed to create {:?}", opt.outfile))?;
    serde_yaml::to_writer(BufWriter::new(out), &summary.histos)?;
    info!("done");
    Ok(())
}
