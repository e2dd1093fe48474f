use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "specmatch",
    about = "Identify which known audio samples contributed to a recording via spectral fingerprints"
)]
pub struct Cli {
    /// Sample audio files to fingerprint (WAV/PCM); at least two
    #[arg(short, long, num_args = 1.., required = true)]
    pub samples: Vec<PathBuf>,

    /// Query audio files to compare against the samples
    #[arg(short, long, num_args = 0..)]
    pub query: Vec<PathBuf>,

    /// Limit displayed matches per query (0 = show all)
    #[arg(long, default_value_t = 0)]
    pub top: usize,

    /// Emit results as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Print the raw spectrum of a loaded file (sample or query) and exit
    #[arg(long, value_name = "FILE_ID")]
    pub dump_spectrum: Option<String>,

    /// Print the unique (baseline-subtracted) spectrum of a sample and exit
    #[arg(long, value_name = "SAMPLE_ID")]
    pub dump_unique: Option<String>,

    /// Config file path (default: ./specmatch.toml or the user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,
}
