use std::path::PathBuf;

/// Errors that can occur in flipcontig.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    Parameter(String),

    #[error("I/O error: {source} ({path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("FASTA parsing error: {0}")]
    Fasta(String),

    #[error("PDB parsing error: {0}")]
    Pdb(String),

    #[error(
        "cannot process structure {path} because it contains {count} missing residue numbers (chromosomes)"
    )]
    MissingResidueNumber { path: PathBuf, count: usize },

    #[error("chromosome {index} has no matching sequence record ({n_chromosomes} records in FASTA)")]
    ChromosomeOutOfRange { index: u32, n_chromosomes: usize },

    #[error("cannot process structure {path} because it contains {found} beads instead of {expected}")]
    BeadCountMismatch {
        path: PathBuf,
        found: usize,
        expected: u64,
    },

    #[error("chromosome {chromosome}: bead {atom} not found in structure")]
    BoundaryNotFound { chromosome: u32, atom: u64 },

    #[error("chromosome {chromosome}: span {start}-{end} boundaries are out of order")]
    InvalidSpan { chromosome: u32, start: u64, end: u64 },
}

impl Error {
    /// Convenience for wrapping an `io::Error` with a path context.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            source: err,
            path: PathBuf::from("<unknown>"),
        }
    }
}
