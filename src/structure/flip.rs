/// Reverse inverted contigs in the bead table
use crate::detect::DetectionResult;
use crate::error::Error;
use crate::structure::Structure;
use log::info;

/// Return a copy of `structure` with every detected span reversed in place.
///
/// Spans are applied in detection order, each located by (chromosome, serial)
/// in the table as left by the previous reversals, so spans of one chromosome
/// must not overlap. Positions are renumbered afterwards; serials, residue
/// numbers and coordinates are untouched.
pub fn flip_structure(structure: &Structure, inversions: &DetectionResult) -> Result<Structure, Error> {
    info!("Number of beads read from structure: {}", structure.len());

    let mut flipped = structure.clone();

    for (chrom, chrom_inversions) in inversions.iter() {
        for span in &chrom_inversions.spans {
            info!(
                "Structure of chromosome {}: flip contig between beads {} and {}",
                chrom, span.start, span.end
            );

            let start = flipped
                .position_of(chrom, span.start)
                .ok_or(Error::BoundaryNotFound {
                    chromosome: chrom,
                    atom: span.start,
                })?;
            let end = flipped
                .position_of(chrom, span.end)
                .ok_or(Error::BoundaryNotFound {
                    chromosome: chrom,
                    atom: span.end,
                })?;

            if start > end {
                return Err(Error::InvalidSpan {
                    chromosome: chrom,
                    start: span.start,
                    end: span.end,
                });
            }

            flipped.atoms[start..=end].reverse();
        }
    }

    flipped.reindex();
    Ok(flipped)
}
