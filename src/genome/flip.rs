/// Reverse inverted contigs in the chromosome sequences
use std::ops::Range;

use log::{info, warn};

use crate::detect::DetectionResult;
use crate::error::Error;
use crate::genome::Genome;

/// Base range covered by beads `start_bead..=end_bead` at `resolution`.
///
/// Bead `i` maps to base `i × resolution`; the range is
/// `[start_bead × resolution, end_bead × resolution]` inclusive, clipped to
/// `seq_len` because the last bin of a chromosome is usually short.
pub fn base_range(start_bead: u64, end_bead: u64, resolution: u64, seq_len: usize) -> Range<usize> {
    let len = seq_len as u64;
    let start = start_bead.saturating_mul(resolution).min(len);
    let end = end_bead
        .saturating_mul(resolution)
        .saturating_add(1)
        .min(len)
        .max(start);
    start as usize..end as usize
}

/// Return a copy of `genome` with the bases of every detected span reversed.
///
/// Chromosome `i` of the detection result is FASTA record `i` (1-based).
/// Records without spans are copied unchanged.
pub fn flip_sequences(genome: &Genome, inversions: &DetectionResult, resolution: u64) -> Result<Genome, Error> {
    let mut flipped = genome.clone();
    let n_chromosomes = genome.n_chr();

    for (chrom, chrom_inversions) in inversions.iter() {
        if chrom_inversions.spans.is_empty() {
            continue;
        }

        let record = flipped
            .chromosome_mut(chrom)
            .ok_or(Error::ChromosomeOutOfRange {
                index: chrom,
                n_chromosomes,
            })?;

        for span in &chrom_inversions.spans {
            let (start_bead, end_bead) = span.bead_range(chrom_inversions.first_atom);
            let nominal_end = end_bead.saturating_mul(resolution);
            let range = base_range(start_bead, end_bead, resolution, record.len());

            info!(
                "Sequence of chromosome {} ({}): flip inverted contig between base {} and {}",
                chrom,
                record.name,
                start_bead * resolution,
                nominal_end
            );

            if nominal_end >= record.len() as u64 {
                warn!(
                    "Chromosome {} ({}): contig end {} is past the sequence end, flipping up to base {}",
                    chrom,
                    record.name,
                    nominal_end,
                    range.end.saturating_sub(1)
                );
            }

            record.sequence[range].reverse();
        }
    }

    Ok(flipped)
}
