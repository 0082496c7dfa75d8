use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[clap(about, author, version)]
pub(crate) struct Opt {
    /// Analysis configuration file in YAML format.
    ///
    /// Settings not given in the file take their default values.
    #[clap(long, short, value_parser)]
    pub(crate) config: Option<PathBuf>,

    /// Output file for the histograms.
    #[clap(long, short, default_value = "wwbb.yml", value_parser)]
    pub(crate) outfile: PathBuf,

    #[clap(
        short,
        long,
        default_value_t,
        help = "Number of threads.

If set to 0, a default number of threads is chosen.
The default can be set with the `RAYON_NUM_THREADS` environment
variable."
    )]
    pub(crate) threads: usize,

    /// Verbosity level
    #[clap(
        short,
        long,
        default_value = "Info",
        help = "Verbosity level.
Possible values with increasing amount of output are
'off', 'error', 'warn', 'info', 'debug', 'trace'.\n"
    )]
    pub(crate) loglevel: String,

    /// Input event files in YAML format, optionally compressed
    #[clap(name = "INFILES", value_parser, required = true)]
    pub(crate) infiles: Vec<PathBuf>,
}
