pub mod error;
pub mod params;

pub mod detect;
pub mod genome;
pub mod io;
pub mod stats;
pub mod structure;

use log::info;

use crate::detect::{detect_inversions, MedianRatioDetector};
use crate::genome::flip::flip_sequences;
use crate::genome::Genome;
use crate::params::Parameters;
use crate::stats::FlipStats;
use crate::structure::flip::flip_structure;
use crate::structure::pdb::{read_pdb, write_pdb};

/// Top-level pipeline. Called from `main()` after CLI parsing.
///
/// Reads the sequence and the structure, detects inverted contigs, and
/// writes the structure and the sequence with every contig flipped back.
pub fn run(params: &Parameters) -> anyhow::Result<()> {
    params.validate()?;

    info!("flipcontig v{}", env!("CARGO_PKG_VERSION"));
    info!("resolution: {}", params.resolution);
    info!("threshold: {}", params.threshold);

    let genome = Genome::from_fasta(&params.fasta)?;
    let structure = read_pdb(&params.pdb)?;

    let mut detector = MedianRatioDetector::new(params.threshold);
    if let Some(dir) = &params.distances_dir {
        std::fs::create_dir_all(dir).map_err(|e| error::Error::io(e, dir))?;
        info!("Writing bead distance tables to {}", dir.display());
        detector = detector.with_distances_dir(dir);
    }

    let inversions = detect_inversions(&structure, &genome, params.resolution, &detector)?;

    let mut stats = FlipStats::new();
    stats.record_detection(&inversions);

    let fixed_structure = flip_structure(&structure, &inversions)?;
    stats.record_structures(&structure, &fixed_structure);
    write_pdb(&fixed_structure, &params.output_pdb)?;

    let fixed_genome = flip_sequences(&genome, &inversions, params.resolution)?;
    stats.record_sequences(&genome, &fixed_genome, &inversions, params.resolution);
    fixed_genome.write_fasta(&params.output_fasta, params.fasta_line_width)?;

    stats.print_summary();
    info!("Flip complete!");
    Ok(())
}
