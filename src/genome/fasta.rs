use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::path::Path;

use crate::error::Error;
use crate::io::{create_writer, open_reader};

/// A single chromosome from a FASTA file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chromosome {
    pub name: String,
    /// Header text after the name, if any.
    pub description: Option<String>,
    pub sequence: Vec<u8>,
}

impl Chromosome {
    pub fn new(name: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sequence: sequence.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Parse a FASTA file (plain or gzipped) into chromosomes, in file order.
///
/// - The name is the header text up to the first whitespace
/// - Control characters and spaces inside sequence lines are skipped
/// - Bases are kept verbatim (case preserved, no encoding)
pub fn parse_fasta(path: &Path) -> Result<Vec<Chromosome>, Error> {
    let reader = open_reader(path)?;
    parse_fasta_reader(reader, path)
}

/// Parse FASTA records from any buffered reader; `path` is only used in messages.
pub fn parse_fasta_reader<R: BufRead>(reader: R, path: &Path) -> Result<Vec<Chromosome>, Error> {
    let mut chromosomes = Vec::new();
    let mut seen = HashSet::new();
    let mut current: Option<Chromosome> = None;

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|e| Error::io(e, path))?;

        if line.trim().is_empty() {
            continue;
        }

        if let Some(stripped) = line.strip_prefix('>') {
            if let Some(chrom) = current.take() {
                chromosomes.push(chrom);
            }

            let mut parts = stripped.trim().splitn(2, char::is_whitespace);
            let name = parts
                .next()
                .filter(|name| !name.is_empty())
                .ok_or_else(|| {
                    Error::Fasta(format!(
                        "empty chromosome name at {}:{}",
                        path.display(),
                        line_num + 1
                    ))
                })?
                .to_string();

            if !seen.insert(name.clone()) {
                return Err(Error::Fasta(format!(
                    "duplicate chromosome name '{}' at {}:{}",
                    name,
                    path.display(),
                    line_num + 1
                )));
            }

            let description = parts
                .next()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string);

            current = Some(Chromosome {
                name,
                description,
                sequence: Vec::new(),
            });
        } else {
            let chrom = current.as_mut().ok_or_else(|| {
                Error::Fasta(format!(
                    "sequence data before first header at {}:{}",
                    path.display(),
                    line_num + 1
                ))
            })?;

            chrom
                .sequence
                .extend(line.bytes().filter(|&byte| byte > b' '));
        }
    }

    if let Some(chrom) = current {
        chromosomes.push(chrom);
    }

    if chromosomes.is_empty() {
        return Err(Error::Fasta(format!(
            "no chromosomes found in {}",
            path.display()
        )));
    }

    Ok(chromosomes)
}

/// Write chromosomes to a FASTA file, wrapping sequences at `line_width`
/// bases (0 = one line per sequence).
pub fn write_fasta(path: &Path, chromosomes: &[Chromosome], line_width: usize) -> Result<(), Error> {
    let mut writer = create_writer(path)?;
    write_fasta_records(&mut writer, chromosomes, line_width)
        .and_then(|()| writer.finish())
        .map_err(|e| Error::io(e, path))
}

fn write_fasta_records<W: Write>(
    writer: &mut W,
    chromosomes: &[Chromosome],
    line_width: usize,
) -> std::io::Result<()> {
    for chrom in chromosomes {
        match &chrom.description {
            Some(description) => writeln!(writer, ">{} {}", chrom.name, description)?,
            None => writeln!(writer, ">{}", chrom.name)?,
        }

        if line_width == 0 {
            writer.write_all(&chrom.sequence)?;
            writeln!(writer)?;
            continue;
        }

        for chunk in chrom.sequence.chunks(line_width) {
            writer.write_all(chunk)?;
            writeln!(writer)?;
        }
    }
    writer.flush()
}
