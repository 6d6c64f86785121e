use std::path::PathBuf;

use clap::Parser;

/// Default multiplier applied to the median bond length.
pub const DEFAULT_THRESHOLD: f64 = 3.0;

/// Default number of bases per line in the corrected FASTA.
pub const DEFAULT_FASTA_LINE_WIDTH: usize = 60;

// ---------------------------------------------------------------------------
// Parameters struct
// ---------------------------------------------------------------------------

/// flipcontig command-line parameters.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "flipcontig",
    about = "Detect flipped contigs in a 3D genome structure and invert them in the structure and the sequence",
    version
)]
pub struct Parameters {
    // ── Input ───────────────────────────────────────────────────────────
    /// PDB file containing the 3D structure of the genome
    #[arg(long = "pdb")]
    pub pdb: PathBuf,

    /// FASTA file containing the sequence of the genome
    #[arg(long = "fasta")]
    pub fasta: PathBuf,

    /// Hi-C resolution (bases per bead)
    #[arg(long = "resolution")]
    pub resolution: u64,

    // ── Output ──────────────────────────────────────────────────────────
    /// Output PDB file containing the fixed 3D structure of the genome
    #[arg(long = "output-pdb")]
    pub output_pdb: PathBuf,

    /// Output FASTA file containing the fixed sequence of the genome
    #[arg(long = "output-fasta")]
    pub output_fasta: PathBuf,

    /// Bases per line in the output FASTA; 0 writes each sequence on one line
    #[arg(long = "fasta-line-width", default_value_t = DEFAULT_FASTA_LINE_WIDTH)]
    pub fasta_line_width: usize,

    // ── Detection ───────────────────────────────────────────────────────
    /// Threshold to detect flipped contigs (multiple of the median bead distance)
    #[arg(long = "threshold", default_value_t = DEFAULT_THRESHOLD, allow_hyphen_values = true)]
    pub threshold: f64,

    /// Directory receiving per-chromosome bead distance tables (chr_<n>.tsv)
    #[arg(long = "distances-dir")]
    pub distances_dir: Option<PathBuf>,
}

impl Parameters {
    /// Validate parameter values that clap alone cannot enforce.
    pub fn validate(&self) -> Result<(), crate::error::Error> {
        if self.resolution == 0 {
            return Err(crate::error::Error::Parameter(
                "--resolution must be >= 1".into(),
            ));
        }

        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(crate::error::Error::Parameter(format!(
                "--threshold must be a positive number, got {}",
                self.threshold
            )));
        }

        if self.pdb == self.output_pdb {
            return Err(crate::error::Error::Parameter(
                "--output-pdb must differ from --pdb".into(),
            ));
        }

        if self.fasta == self.output_fasta {
            return Err(crate::error::Error::Parameter(
                "--output-fasta must differ from --fasta".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
