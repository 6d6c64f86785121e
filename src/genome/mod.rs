pub mod fasta;
pub mod flip;

use std::path::Path;

use crate::error::Error;

pub use fasta::Chromosome;
use fasta::{parse_fasta, write_fasta};

/// The linear genome: chromosome records in FASTA order.
///
/// Chromosome `i` (1-based, as used for residue numbers in the structure)
/// is `chromosomes[i - 1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Genome {
    pub chromosomes: Vec<Chromosome>,
}

impl Genome {
    pub fn new(chromosomes: Vec<Chromosome>) -> Self {
        Self { chromosomes }
    }

    /// Load a genome from a FASTA file.
    pub fn from_fasta(path: &Path) -> Result<Self, Error> {
        log::info!("Reading {}", path.display());
        let chromosomes = parse_fasta(path)?;

        for chrom in &chromosomes {
            log::info!(
                "Found chromosome {} with {} bases",
                chrom.name,
                chrom.len()
            );
        }

        Ok(Self { chromosomes })
    }

    /// Write the genome to a FASTA file, keeping record order and headers.
    pub fn write_fasta(&self, path: &Path, line_width: usize) -> Result<(), Error> {
        log::info!("Writing {}", path.display());
        write_fasta(path, &self.chromosomes, line_width)
    }

    /// Number of chromosomes.
    pub fn n_chr(&self) -> usize {
        self.chromosomes.len()
    }

    /// Chromosome by 1-based index.
    pub fn chromosome(&self, index: u32) -> Option<&Chromosome> {
        let slot = (index as usize).checked_sub(1)?;
        self.chromosomes.get(slot)
    }

    /// Mutable chromosome by 1-based index.
    pub fn chromosome_mut(&mut self, index: u32) -> Option<&mut Chromosome> {
        let slot = (index as usize).checked_sub(1)?;
        self.chromosomes.get_mut(slot)
    }

    /// Chromosome names, in FASTA order.
    pub fn chr_names(&self) -> Vec<&str> {
        self.chromosomes.iter().map(|c| c.name.as_str()).collect()
    }

    /// Chromosome lengths in bases, in FASTA order.
    pub fn chr_lengths(&self) -> Vec<u64> {
        self.chromosomes.iter().map(|c| c.len() as u64).collect()
    }

    /// Total number of bases over all chromosomes.
    pub fn total_bases(&self) -> u64 {
        self.chromosomes.iter().map(|c| c.len() as u64).sum()
    }

    /// Beads expected for a chromosome at the given resolution: `ceil(length / resolution)`.
    pub fn expected_beads(&self, index: u32, resolution: u64) -> Option<u64> {
        self.chromosome(index)
            .map(|c| (c.len() as u64).div_ceil(resolution))
    }

    /// Beads expected for the whole genome at the given resolution.
    pub fn total_expected_beads(&self, resolution: u64) -> u64 {
        self.chr_lengths()
            .iter()
            .map(|len| len.div_ceil(resolution))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn two_chromosomes() -> Genome {
        Genome::new(vec![
            Chromosome::new("chrI", vec![b'A'; 25]),
            Chromosome::new("chrII", vec![b'C'; 30]),
        ])
    }

    #[test]
    fn one_based_lookup() {
        let genome = two_chromosomes();
        assert!(genome.chromosome(0).is_none());
        assert_eq!(genome.chromosome(1).unwrap().name, "chrI");
        assert_eq!(genome.chromosome(2).unwrap().name, "chrII");
        assert!(genome.chromosome(3).is_none());
        assert_eq!(genome.chr_names(), vec!["chrI", "chrII"]);
        assert_eq!(genome.chr_lengths(), vec![25, 30]);
        assert_eq!(genome.n_chr(), 2);
    }

    #[test]
    fn expected_beads_round_up() {
        let genome = two_chromosomes();
        // 25 bases at resolution 10 -> 3 beads, last bin holds 5 bases
        assert_eq!(genome.expected_beads(1, 10), Some(3));
        assert_eq!(genome.expected_beads(2, 10), Some(3));
        assert_eq!(genome.expected_beads(3, 10), None);
        assert_eq!(genome.total_expected_beads(10), 6);
        assert_eq!(genome.total_expected_beads(1), 55);
        assert_eq!(genome.total_bases(), 55);
    }

    #[test]
    fn from_fasta_keeps_order() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, ">chrB").unwrap();
        writeln!(file, "ACGT").unwrap();
        writeln!(file, ">chrA").unwrap();
        writeln!(file, "GG").unwrap();

        let genome = Genome::from_fasta(file.path()).unwrap();
        assert_eq!(genome.chr_names(), vec!["chrB", "chrA"]);
        assert_eq!(genome.chr_lengths(), vec![4, 2]);
    }
}
