// Inverted contig detection
//
// A contig placed backwards in the 3D structure keeps its internal bonds at
// the usual length, but the two bonds joining it to its neighbours become
// abnormally long. Detectors flag those boundary beads per chromosome and
// turn them into inclusive spans of atom serials.

pub mod distance;
pub mod median_ratio;
pub mod report;

use std::collections::BTreeMap;

use log::{info, warn};

use crate::error::Error;
use crate::genome::Genome;
use crate::structure::{AtomRecord, Structure};

pub use median_ratio::MedianRatioDetector;

/// Inclusive run of beads, by atom serial, whose orientation is reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InversionSpan {
    pub start: u64,
    pub end: u64,
}

impl InversionSpan {
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(start <= end, "span start {start} after end {end}");
        Self { start, end }
    }

    /// Checked constructor for spans built from detector output.
    pub fn try_new(chromosome: u32, start: u64, end: u64) -> Result<Self, Error> {
        if start > end {
            return Err(Error::InvalidSpan {
                chromosome,
                start,
                end,
            });
        }
        Ok(Self { start, end })
    }

    /// Number of beads covered.
    pub fn bead_count(&self) -> u64 {
        (self.end + 1).saturating_sub(self.start)
    }

    /// 1-based bead indices within the chromosome whose first bead has serial `first_atom`.
    pub fn bead_range(&self, first_atom: u64) -> (u64, u64) {
        (
            self.start - first_atom + 1,
            self.end - first_atom + 1,
        )
    }
}

/// Spans detected on one chromosome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChromosomeInversions {
    /// Serial of the chromosome's first bead, anchoring bead indices.
    pub first_atom: u64,
    /// Spans in detection order along the chromosome (may be empty).
    pub spans: Vec<InversionSpan>,
}

impl ChromosomeInversions {
    pub fn new(first_atom: u64, spans: Vec<InversionSpan>) -> Self {
        Self { first_atom, spans }
    }
}

/// Detection outcome for a whole run, keyed by 1-based chromosome index.
///
/// Every scanned chromosome has an entry, including those without spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionResult {
    chromosomes: BTreeMap<u32, ChromosomeInversions>,
}

impl DetectionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, chromosome: u32, inversions: ChromosomeInversions) {
        self.chromosomes.insert(chromosome, inversions);
    }

    pub fn get(&self, chromosome: u32) -> Option<&ChromosomeInversions> {
        self.chromosomes.get(&chromosome)
    }

    /// Spans of a chromosome; empty if the chromosome was not scanned.
    pub fn spans(&self, chromosome: u32) -> &[InversionSpan] {
        self.chromosomes
            .get(&chromosome)
            .map(|c| c.spans.as_slice())
            .unwrap_or(&[])
    }

    /// Chromosomes in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &ChromosomeInversions)> {
        self.chromosomes.iter().map(|(&chrom, inv)| (chrom, inv))
    }

    /// Number of chromosomes scanned.
    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    pub fn total_spans(&self) -> usize {
        self.chromosomes.values().map(|c| c.spans.len()).sum()
    }

    /// Beads covered by all spans.
    pub fn total_beads(&self) -> u64 {
        self.chromosomes
            .values()
            .flat_map(|c| c.spans.iter())
            .map(InversionSpan::bead_count)
            .sum()
    }
}

/// Strategy that finds inverted spans in one chromosome's ordered beads.
pub trait InversionDetector {
    fn detect(&self, chromosome: u32, beads: &[&AtomRecord]) -> Result<Vec<InversionSpan>, Error>;
}

/// Validate the structure against the genome and run `detector` on every chromosome.
///
/// Fails when the bead count differs from the count implied by the sequence
/// lengths and `resolution`, or when a residue number has no FASTA record.
pub fn detect_inversions<D: InversionDetector + ?Sized>(
    structure: &Structure,
    genome: &Genome,
    resolution: u64,
    detector: &D,
) -> Result<DetectionResult, Error> {
    info!("Number of beads read from structure: {}", structure.len());

    let expected = genome.total_expected_beads(resolution);
    info!(
        "Number of expected beads deduced from sequence and Hi-C resolution: {}",
        expected
    );

    if structure.len() as u64 != expected {
        return Err(Error::BeadCountMismatch {
            path: structure.path.clone(),
            found: structure.len(),
            expected,
        });
    }

    let by_chromosome = structure.beads_by_chromosome();
    let mut result = DetectionResult::new();

    for (chrom, beads) in &by_chromosome {
        let chrom = *chrom;
        let expected_beads =
            genome
                .expected_beads(chrom, resolution)
                .ok_or(Error::ChromosomeOutOfRange {
                    index: chrom,
                    n_chromosomes: genome.n_chr(),
                })?;

        info!("Looking for inverted contigs in chromosome {}", chrom);

        if beads.len() as u64 != expected_beads {
            warn!(
                "Chromosome {} has {} beads but its sequence implies {}",
                chrom,
                beads.len(),
                expected_beads
            );
        }

        let spans = detector.detect(chrom, beads)?;
        for span in &spans {
            info!(
                "Chromosome {}: found inverted contig between bead {} and bead {}",
                chrom, span.start, span.end
            );
        }

        let first_atom = beads.iter().map(|b| b.serial).min().unwrap_or(1);
        result.insert(chrom, ChromosomeInversions::new(first_atom, spans));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Chromosome;

    /// Detector that reports a fixed span for one chromosome.
    struct FixedDetector {
        chromosome: u32,
        span: InversionSpan,
    }

    impl InversionDetector for FixedDetector {
        fn detect(&self, chromosome: u32, _beads: &[&AtomRecord]) -> Result<Vec<InversionSpan>, Error> {
            if chromosome == self.chromosome {
                Ok(vec![self.span])
            } else {
                Ok(Vec::new())
            }
        }
    }

    fn structure(layout: &[(u32, usize)]) -> Structure {
        let mut atoms = Vec::new();
        for &(chrom, n) in layout {
            for _ in 0..n {
                let serial = atoms.len() as u64 + 1;
                atoms.push(AtomRecord::bead(serial, chrom, [serial as f64, 0.0, 0.0]));
            }
        }
        Structure::from_atoms(atoms)
    }

    fn genome(lengths: &[usize]) -> Genome {
        Genome::new(
            lengths
                .iter()
                .enumerate()
                .map(|(i, &len)| Chromosome::new(format!("chr{}", i + 1), vec![b'A'; len]))
                .collect(),
        )
    }

    #[test]
    fn span_geometry() {
        let span = InversionSpan::new(14, 17);
        assert_eq!(span.bead_count(), 4);
        assert_eq!(span.bead_range(1), (14, 17));
        assert_eq!(span.bead_range(11), (4, 7));
    }

    #[test]
    fn checked_span_rejects_reversed_bounds() {
        assert_eq!(InversionSpan::try_new(1, 5, 5).unwrap().bead_count(), 1);
        let err = InversionSpan::try_new(3, 9, 8).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSpan {
                chromosome: 3,
                start: 9,
                end: 8
            }
        ));
    }

    #[test]
    fn every_chromosome_gets_an_entry() {
        let detector = FixedDetector {
            chromosome: 2,
            span: InversionSpan::new(6, 7),
        };
        let result =
            detect_inversions(&structure(&[(1, 4), (2, 5)]), &genome(&[40, 45]), 10, &detector)
                .unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.spans(1).is_empty());
        assert_eq!(result.spans(2), &[InversionSpan::new(6, 7)]);
        assert_eq!(result.get(2).unwrap().first_atom, 5);
        assert_eq!(result.total_spans(), 1);
        assert_eq!(result.total_beads(), 2);
        assert_eq!(
            result.iter().map(|(chrom, _)| chrom).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn bead_count_mismatch_is_fatal() {
        let detector = FixedDetector {
            chromosome: 1,
            span: InversionSpan::new(1, 1),
        };
        let err = detect_inversions(&structure(&[(1, 4)]), &genome(&[50]), 10, &detector)
            .unwrap_err();
        match err {
            Error::BeadCountMismatch {
                found, expected, ..
            } => {
                assert_eq!(found, 4);
                assert_eq!(expected, 5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn residue_without_sequence_is_fatal() {
        let detector = FixedDetector {
            chromosome: 1,
            span: InversionSpan::new(1, 1),
        };
        // Totals agree (3 + 3 beads) but residue 3 has no FASTA record.
        let err = detect_inversions(&structure(&[(1, 3), (3, 3)]), &genome(&[30, 30]), 10, &detector)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ChromosomeOutOfRange {
                index: 3,
                n_chromosomes: 2
            }
        ));
    }
}
