/// Run statistics tracking and reporting
use log::{info, warn};

use crate::detect::DetectionResult;
use crate::genome::flip::base_range;
use crate::genome::Genome;
use crate::structure::Structure;

/// Tracks what a detection/flip run found and changed
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct FlipStats {
    /// Chromosomes scanned by the detector
    pub chromosomes_scanned: usize,
    /// Chromosomes with at least one inverted contig
    pub chromosomes_with_inversions: usize,
    /// Inverted contigs detected
    pub spans_detected: usize,
    /// Beads inside inverted contigs
    pub beads_flipped: u64,
    /// Bases inside inverted contigs (after clipping to sequence ends)
    pub bases_flipped: u64,
    pub beads_in: usize,
    pub beads_out: usize,
    pub bases_in: u64,
    pub bases_out: u64,
}

impl FlipStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the detector's findings.
    pub fn record_detection(&mut self, inversions: &DetectionResult) {
        self.chromosomes_scanned = inversions.len();
        self.chromosomes_with_inversions = inversions
            .iter()
            .filter(|(_, c)| !c.spans.is_empty())
            .count();
        self.spans_detected = inversions.total_spans();
        self.beads_flipped = inversions.total_beads();
    }

    /// Record bead totals before and after the structure flip.
    pub fn record_structures(&mut self, before: &Structure, after: &Structure) {
        self.beads_in = before.len();
        self.beads_out = after.len();
    }

    /// Record base totals before and after the sequence flip.
    pub fn record_sequences(
        &mut self,
        before: &Genome,
        after: &Genome,
        inversions: &DetectionResult,
        resolution: u64,
    ) {
        self.bases_in = before.total_bases();
        self.bases_out = after.total_bases();
        self.bases_flipped = inversions
            .iter()
            .filter_map(|(chrom, c)| before.chromosome(chrom).map(|record| (record, c)))
            .flat_map(|(record, c)| {
                c.spans.iter().map(move |span| {
                    let (start, end) = span.bead_range(c.first_atom);
                    base_range(start, end, resolution, record.len()).len() as u64
                })
            })
            .sum();
    }

    /// Whether bead and base totals are unchanged by the flip.
    pub fn counts_preserved(&self) -> bool {
        self.beads_in == self.beads_out && self.bases_in == self.bases_out
    }

    /// Percentage of beads that were flipped
    pub fn flipped_bead_percent(&self) -> f64 {
        if self.beads_in == 0 {
            0.0
        } else {
            100.0 * self.beads_flipped as f64 / self.beads_in as f64
        }
    }

    /// Print summary statistics to log
    pub fn print_summary(&self) {
        info!("=== Flip Summary ===");
        info!("Chromosomes scanned: {}", self.chromosomes_scanned);
        info!(
            "Chromosomes with inverted contigs: {}",
            self.chromosomes_with_inversions
        );
        info!("Inverted contigs: {}", self.spans_detected);
        info!(
            "Beads flipped: {} of {} ({:.2}%)",
            self.beads_flipped,
            self.beads_in,
            self.flipped_bead_percent()
        );
        info!("Bases flipped: {} of {}", self.bases_flipped, self.bases_in);

        if !self.counts_preserved() {
            warn!(
                "Output totals differ from input: {} -> {} beads, {} -> {} bases",
                self.beads_in, self.beads_out, self.bases_in, self.bases_out
            );
        }
    }
}
