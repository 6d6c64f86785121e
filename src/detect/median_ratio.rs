// Median bond length ratio detector
//
// Flags every bead whose outgoing bond is longer than `threshold` times the
// chromosome's median bond, then pairs the flags in serial order: flags
// (a, b) bound the inverted contig a+1..=b.

use std::path::PathBuf;

use log::{debug, info, warn};

use crate::detect::distance::{bond_distances, median};
use crate::detect::report::{distance_table_path, write_distance_table};
use crate::detect::{InversionDetector, InversionSpan};
use crate::error::Error;
use crate::params::DEFAULT_THRESHOLD;
use crate::structure::AtomRecord;

/// Everything computed while scanning one chromosome.
#[derive(Debug, Clone, PartialEq)]
pub struct BondScan {
    /// Outgoing bond length per bead (last bead: 0.0).
    pub distances: Vec<f64>,
    /// Median of the finite bond lengths.
    pub median: Option<f64>,
    /// Bond length above which a bead is flagged; `None` when the median is not positive.
    pub cutoff: Option<f64>,
    /// Serials of flagged beads, ascending.
    pub flagged: Vec<u64>,
    pub spans: Vec<InversionSpan>,
    /// Last flag, left over when the flag count is odd.
    pub unpaired: Option<u64>,
}

/// Default detector: bonds longer than `threshold × median` mark contig boundaries.
#[derive(Debug, Clone)]
pub struct MedianRatioDetector {
    threshold: f64,
    distances_dir: Option<PathBuf>,
}

impl Default for MedianRatioDetector {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl MedianRatioDetector {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            distances_dir: None,
        }
    }

    /// Also write a `chr_<n>.tsv` distance table per chromosome into `dir`.
    pub fn with_distances_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.distances_dir = Some(dir.into());
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Measure bonds, flag boundary beads and pair them into spans.
    pub fn scan(&self, chromosome: u32, beads: &[&AtomRecord]) -> Result<BondScan, Error> {
        let coords: Vec<[f64; 3]> = beads.iter().map(|b| b.coords()).collect();
        let distances = bond_distances(&coords);
        let median = median(&distances);
        let cutoff = median.filter(|&m| m > 0.0).map(|m| self.threshold * m);

        let flagged = match cutoff {
            Some(cutoff) => flag_boundaries(beads, &distances, cutoff),
            None => Vec::new(),
        };
        let (spans, unpaired) = pair_boundaries(chromosome, &flagged)?;

        Ok(BondScan {
            distances,
            median,
            cutoff,
            flagged,
            spans,
            unpaired,
        })
    }
}

impl InversionDetector for MedianRatioDetector {
    fn detect(&self, chromosome: u32, beads: &[&AtomRecord]) -> Result<Vec<InversionSpan>, Error> {
        let scan = self.scan(chromosome, beads)?;

        let non_finite = scan.distances.iter().filter(|d| !d.is_finite()).count();
        if non_finite > 0 {
            warn!(
                "Chromosome {}: {} bead distances involve non-finite coordinates and are ignored",
                chromosome, non_finite
            );
        }

        match scan.median {
            Some(m) => info!("Median distance between beads: {:.2}", m),
            None => info!("Chromosome {}: no measurable distance between beads", chromosome),
        }

        if let Some(cutoff) = scan.cutoff {
            debug!(
                "Chromosome {}: distance cutoff {:.3}, flagged beads {:?}",
                chromosome, cutoff, scan.flagged
            );
        }

        if let Some(extra) = scan.unpaired {
            warn!(
                "Chromosome {}: odd number of inversion limits found {:?}",
                chromosome, scan.flagged
            );
            warn!(
                "Chromosome {}: this might lead to a wrong detection of inverted contigs (bead {} left unpaired)",
                chromosome, extra
            );
        }

        if let Some(dir) = &self.distances_dir {
            let path = distance_table_path(dir, chromosome);
            write_distance_table(&path, beads, &scan.distances)?;
        }

        Ok(scan.spans)
    }
}

/// Serials (ascending) of beads whose outgoing bond exceeds `cutoff`.
pub fn flag_boundaries(beads: &[&AtomRecord], distances: &[f64], cutoff: f64) -> Vec<u64> {
    let mut flagged: Vec<u64> = beads
        .iter()
        .zip(distances)
        .filter(|&(_, &d)| d > cutoff)
        .map(|(bead, _)| bead.serial)
        .collect();
    flagged.sort_unstable();
    flagged
}

/// Pair consecutive flags into spans `(flag[2k] + 1, flag[2k + 1])`.
///
/// With an odd count the last flag cannot be paired and is returned separately.
/// A pair that does not bound at least one bead (repeated serials) is an error.
pub fn pair_boundaries(chromosome: u32, flagged: &[u64]) -> Result<(Vec<InversionSpan>, Option<u64>), Error> {
    let spans = flagged
        .chunks_exact(2)
        .map(|pair| InversionSpan::try_new(chromosome, pair[0] + 1, pair[1]))
        .collect::<Result<Vec<_>, _>>()?;
    let unpaired = if flagged.len() % 2 == 1 {
        flagged.last().copied()
    } else {
        None
    };
    Ok((spans, unpaired))
}
