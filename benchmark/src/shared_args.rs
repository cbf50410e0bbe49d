//! Command-line arguments for the image generator

use std::path::PathBuf;

use clap::Parser;

use crate::constants::RANDOM_SEED;
use crate::generate::GenerateConfig;

/// Generate synthetic ground-truth images as a multi-extension FITS file
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct GenerateArgs {
    /// Output label: names `output/{label}_{md5}.fits` and `latest_filenames/latest_{label}.txt`
    #[arg(long, default_value = "galsim_benchmarks")]
    pub label: String,

    /// Directory under which `output/` and `latest_filenames/` are written
    #[arg(long, default_value = ".")]
    pub output_root: PathBuf,

    /// Base random seed; case i uses seed + i
    #[arg(long, default_value_t = RANDOM_SEED)]
    pub seed: u64,

    /// Render only the named case (repeatable); all cases when omitted
    #[arg(long = "case", value_name = "NAME")]
    pub cases: Vec<String>,

    /// List the available test cases and exit
    #[arg(long, default_value_t = false)]
    pub list: bool,

    /// Disable the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

impl GenerateArgs {
    pub fn to_config(&self) -> GenerateConfig {
        GenerateConfig {
            output_root: self.output_root.clone(),
            base_seed: self.seed,
            show_progress: !self.no_progress,
        }
    }
}
