//! Command-line argument parsing.

use clap::Parser;

use tesserwave::geometry::PatternId;
use tesserwave::params::timing::DEFAULT_TRANSITION_MS;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Tesserwave")]
#[command(about = "Audio-reactive 4D polytope visualizer", long_about = None)]
pub struct Args {
    /// Initial world preset
    #[arg(long, value_name = "NAME", default_value = "hypercube_lattice")]
    pub world: String,

    /// Polytope pattern: tesseract, hypertetrahedra, tesseract_fold
    #[arg(long, value_name = "PATTERN", default_value = "tesseract")]
    pub pattern: String,

    /// Seed for the low-energy jitter source
    #[arg(long, value_name = "SEED", default_value = "42")]
    pub seed: u64,

    /// World transition length (milliseconds)
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_TRANSITION_MS)]
    pub transition_ms: f64,
}

impl Args {
    /// Parse the pattern argument, falling back to the tesseract
    pub fn parse_pattern(&self) -> PatternId {
        match self.pattern.parse::<PatternId>() {
            Ok(pattern) => pattern,
            Err(e) => {
                eprintln!("Warning: {}, using tesseract", e);
                PatternId::Tesseract
            }
        }
    }
}
