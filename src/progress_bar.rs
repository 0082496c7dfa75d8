use log::LevelFilter;

use crate::traits::Progress;

/// Progress bar for the event loop
///
/// Only shown at the `info` log level. Draws an `indicatif` bar on an
/// interactive terminal and a plain `logbar` otherwise. Logging is
/// switched off while a bar is shown.
pub enum ProgressBar {
    Hidden,
    Terminal(indicatif::ProgressBar),
    Log(logbar::ProgressBar),
}

/// Don't show any progress indicator
pub const NO_PROGRESS: ProgressBar = ProgressBar::Hidden;

impl ProgressBar {
    /// A new progress bar for `len` events
    pub fn new(len: u64, message: &str) -> Self {
        if log::max_level() != LevelFilter::Info {
            return Self::Hidden;
        }
        let bar = if console::Term::stderr().features().is_attended() {
            let bar = indicatif::ProgressBar::new(len);
            match indicatif::ProgressStyle::default_bar()
                .template("{bar:60.cyan/cyan} {msg} {pos}/{len} [{elapsed}]")
            {
                Ok(style) => bar.set_style(style),
                Err(err) => log::warn!("Failed to set progress bar style: {err}"),
            }
            bar.set_message(message.to_owned());
            Self::Terminal(bar)
        } else {
            eprintln!("{message}");
            let style = logbar::Style::new().indicator('█');
            Self::Log(logbar::ProgressBar::with_style(len as usize, style))
        };
        // the bar would be overwritten by log output
        log::set_max_level(LevelFilter::Off);
        bar
    }
}

impl Progress for ProgressBar {
    fn inc(&self, i: u64) {
        match self {
            Self::Hidden => {}
            Self::Terminal(bar) => bar.inc(i),
            Self::Log(bar) => bar.inc(i as usize),
        }
    }

    fn finish(&self) {
        match self {
            Self::Hidden => return,
            Self::Terminal(bar) => bar.finish(),
            Self::Log(bar) => bar.finish(),
        }
        log::set_max_level(LevelFilter::Info);
    }
}
