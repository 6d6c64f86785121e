/// PDB reading and writing for bead structures
///
/// Only `ATOM` records are interpreted (fixed columns, 0-based ranges):
/// - 0..6 record name, 6..11 serial, 12..16 atom name, 16 altLoc
/// - 17..20 residue name, 21 chain, 22..26 residue number (chromosome), 26 iCode
/// - 30..38 / 38..46 / 46..54 x, y, z (`nan` allowed)
/// - 54..60 occupancy, 60..66 B-factor, 72..76 segment, 76..78 element, 78..80 charge
///
/// Every other line is carried through verbatim and keeps its place relative
/// to the bead table: before the first bead, between two table positions, or
/// after the last bead.
///
/// Serials above 99999 and residue numbers above 9999 do not fit their
/// columns and are refused when writing.
use crate::error::Error;
use crate::io::{create_writer, open_reader};
use crate::structure::{AtomRecord, Structure};
use std::io::{BufRead, Write};
use std::path::Path;

/// Largest atom serial that fits columns 7-11.
pub const MAX_SERIAL: u64 = 99_999;
/// Largest residue number (chromosome index) that fits columns 23-26.
pub const MAX_RESIDUE_NUMBER: u32 = 9_999;

/// Read a PDB file (plain or gzipped).
pub fn read_pdb(path: &Path) -> Result<Structure, Error> {
    log::info!("Reading {}", path.display());
    let reader = open_reader(path)?;
    parse_pdb_reader(reader, path)
}

/// Parse PDB content from any buffered reader; `path` is recorded and used in messages.
pub fn parse_pdb_reader<R: BufRead>(reader: R, path: &Path) -> Result<Structure, Error> {
    let mut header = Vec::new();
    let mut atoms = Vec::new();
    let mut separators = Vec::new();
    let mut missing_residues = 0;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::io(e, path))?;

        if !is_atom_record(&line) {
            if atoms.is_empty() && missing_residues == 0 {
                header.push(line);
            } else {
                separators.push((atoms.len(), line));
            }
            continue;
        }

        match parse_atom_line(&line) {
            Ok(Some(mut atom)) => {
                atom.line_idx = atoms.len();
                atoms.push(atom);
            }
            Ok(None) => missing_residues += 1,
            Err(msg) => {
                return Err(Error::Pdb(format!(
                    "{} at {}:{}",
                    msg,
                    path.display(),
                    line_num + 1
                )))
            }
        }
    }

    if missing_residues > 0 {
        return Err(Error::MissingResidueNumber {
            path: path.to_path_buf(),
            count: missing_residues,
        });
    }

    if atoms.is_empty() {
        return Err(Error::Pdb(format!(
            "no ATOM records found in {}",
            path.display()
        )));
    }

    let n_atoms = atoms.len();
    let split = separators.partition_point(|(anchor, _)| *anchor < n_atoms);
    let trailer = separators.split_off(split).into_iter().map(|(_, line)| line).collect();

    Ok(Structure {
        path: path.to_path_buf(),
        header,
        atoms,
        separators,
        trailer,
    })
}

fn is_atom_record(line: &str) -> bool {
    line.starts_with("ATOM")
}

/// Fixed-column slice, tolerant of short lines.
fn field(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("")
}

fn parse_number<T: std::str::FromStr>(line: &str, start: usize, end: usize, what: &str) -> Result<T, String> {
    let raw = field(line, start, end).trim();
    raw.parse::<T>()
        .map_err(|_| format!("invalid {} '{}'", what, raw))
}

/// Parse one ATOM line. `Ok(None)` means the residue number column is blank.
fn parse_atom_line(line: &str) -> Result<Option<AtomRecord>, String> {
    let serial = parse_number::<u64>(line, 6, 11, "atom serial")?;

    if field(line, 22, 26).trim().is_empty() {
        return Ok(None);
    }
    let residue_number = parse_number::<u32>(line, 22, 26, "residue number")?;
    if residue_number == 0 {
        return Err("residue number 0 does not name a chromosome".to_string());
    }

    let x = parse_number::<f64>(line, 30, 38, "x coordinate")?;
    let y = parse_number::<f64>(line, 38, 46, "y coordinate")?;
    let z = parse_number::<f64>(line, 46, 54, "z coordinate")?;

    Ok(Some(AtomRecord {
        line_idx: 0,
        serial,
        atom_name: field(line, 12, 16).to_string(),
        alt_loc: field(line, 16, 17).trim().to_string(),
        residue_name: field(line, 17, 20).trim().to_string(),
        chain_id: field(line, 21, 22).trim().to_string(),
        residue_number,
        insertion: field(line, 26, 27).trim().to_string(),
        x,
        y,
        z,
        occupancy: field(line, 54, 60).trim().to_string(),
        b_factor: field(line, 60, 66).trim().to_string(),
        segment_id: field(line, 72, 76).trim().to_string(),
        element: field(line, 76, 78).trim().to_string(),
        charge: field(line, 78, 80).trim().to_string(),
    }))
}

fn format_coord(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{:.3}", value)
    }
}

impl AtomRecord {
    /// Render the record as a fixed-column PDB `ATOM` line (no trailing blanks).
    pub fn to_pdb_line(&self) -> String {
        let line = format!(
            "{:<6}{:>5} {:<4}{:1}{:>3} {:1}{:>4}{:1}   {:>8}{:>8}{:>8}{:>6}{:>6}      {:<4}{:>2}{:<2}",
            "ATOM",
            self.serial,
            self.atom_name,
            self.alt_loc,
            self.residue_name,
            self.chain_id,
            self.residue_number,
            self.insertion,
            format_coord(self.x),
            format_coord(self.y),
            format_coord(self.z),
            self.occupancy,
            self.b_factor,
            self.segment_id,
            self.element,
            self.charge,
        );
        line.trim_end().to_string()
    }
}

/// Refuse beads whose serial or residue number would overflow its column.
fn check_columns(atom: &AtomRecord) -> Result<(), Error> {
    if atom.serial > MAX_SERIAL || atom.residue_number > MAX_RESIDUE_NUMBER {
        return Err(Error::Pdb(format!(
            "bead {} on chromosome {} does not fit the PDB columns (serial <= {}, residue number <= {})",
            atom.serial, atom.residue_number, MAX_SERIAL, MAX_RESIDUE_NUMBER
        )));
    }
    Ok(())
}

/// Write a structure as PDB: header lines, ATOM records in table order with
/// their separators, trailer lines.
pub fn write_pdb(structure: &Structure, path: &Path) -> Result<(), Error> {
    structure.atoms.iter().try_for_each(check_columns)?;

    log::info!("Writing {}", path.display());
    let mut writer = create_writer(path)?;
    write_pdb_records(&mut writer, structure)
        .and_then(|()| writer.finish())
        .map_err(|e| Error::io(e, path))
}

fn write_pdb_records<W: Write>(writer: &mut W, structure: &Structure) -> std::io::Result<()> {
    for line in &structure.header {
        writeln!(writer, "{}", line)?;
    }
    let mut separators = structure.separators.iter().peekable();
    for (idx, atom) in structure.atoms.iter().enumerate() {
        while let Some((_, line)) = separators.next_if(|(anchor, _)| *anchor <= idx) {
            writeln!(writer, "{}", line)?;
        }
        writeln!(writer, "{}", atom.to_pdb_line())?;
    }
    for (_, line) in separators {
        writeln!(writer, "{}", line)?;
    }
    for line in &structure.trailer {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    const LINE: &str =
        "ATOM      1  CA  ALA A   1      11.104   6.134  -6.504  1.00  0.00           C";

    fn parse(content: &str) -> Result<Structure, Error> {
        parse_pdb_reader(Cursor::new(content), Path::new("test.pdb"))
    }

    #[test]
    fn parse_fixed_columns() {
        let atom = parse_atom_line(LINE).unwrap().unwrap();
        assert_eq!(atom.serial, 1);
        assert_eq!(atom.atom_name, " CA ");
        assert_eq!(atom.residue_name, "ALA");
        assert_eq!(atom.chain_id, "A");
        assert_eq!(atom.residue_number, 1);
        assert!((atom.x - 11.104).abs() < 1e-9);
        assert!((atom.y - 6.134).abs() < 1e-9);
        assert!((atom.z + 6.504).abs() < 1e-9);
        assert_eq!(atom.occupancy, "1.00");
        assert_eq!(atom.b_factor, "0.00");
        assert_eq!(atom.element, "C");
    }

    #[test]
    fn render_matches_input_columns() {
        let atom = parse_atom_line(LINE).unwrap().unwrap();
        assert_eq!(atom.to_pdb_line(), LINE);
    }

    #[test]
    fn nan_coordinates_survive() {
        let line = "ATOM     12  CA   CA A   2       1.000  -2.500     nan  1.00 75.00";
        let atom = parse_atom_line(line).unwrap().unwrap();
        assert!(atom.z.is_nan());
        assert_eq!(atom.to_pdb_line(), line);
    }

    #[test]
    fn header_and_trailer_are_kept() {
        let content = format!(
            "HEADER    genome\n{}\nTER\nCONECT    1    2\nEND\n",
            LINE
        );
        let structure = parse(&content).unwrap();
        assert_eq!(structure.header, vec!["HEADER    genome".to_string()]);
        assert_eq!(structure.len(), 1);
        assert_eq!(
            structure.trailer,
            vec!["TER".to_string(), "CONECT    1    2".to_string(), "END".to_string()]
        );
        assert_eq!(structure.path, Path::new("test.pdb"));
    }

    #[test]
    fn residue_name_is_right_justified() {
        let atom = AtomRecord::bead(7, 3, [0.0, 0.0, 0.0]);
        let line = atom.to_pdb_line();
        assert_eq!(&line[17..20], " CA");
        assert_eq!(parse_atom_line(&line).unwrap().unwrap().to_pdb_line(), line);
    }

    #[test]
    fn separators_stay_between_chromosomes() {
        let first = AtomRecord::bead(1, 1, [0.0, 0.0, 0.0]).to_pdb_line();
        let second = AtomRecord::bead(2, 1, [1.0, 0.0, 0.0]).to_pdb_line();
        let third = AtomRecord::bead(3, 2, [5.0, 0.0, 0.0]).to_pdb_line();
        let content = format!(
            "HEADER    genome\nMODEL        1\n{}\n{}\nTER\n{}\nTER\nENDMDL\nEND\n",
            first, second, third
        );

        let structure = parse(&content).unwrap();
        assert_eq!(structure.header, vec!["HEADER    genome", "MODEL        1"]);
        assert_eq!(structure.separators, vec![(2, "TER".to_string())]);
        assert_eq!(structure.trailer, vec!["TER", "ENDMDL", "END"]);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("models.pdb");
        write_pdb(&structure, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn oversized_columns_are_refused() {
        let dir = TempDir::new().unwrap();

        let path = dir.path().join("limit.pdb");
        let fits = Structure::from_atoms(vec![AtomRecord::bead(
            MAX_SERIAL,
            MAX_RESIDUE_NUMBER,
            [1.0, 2.0, 3.0],
        )]);
        write_pdb(&fits, &path).unwrap();
        let back = read_pdb(&path).unwrap();
        assert_eq!(back.atoms[0].serial, MAX_SERIAL);
        assert_eq!(back.atoms[0].residue_number, MAX_RESIDUE_NUMBER);

        let path = dir.path().join("serial.pdb");
        let too_many_beads =
            Structure::from_atoms(vec![AtomRecord::bead(123_456, 1, [1.0, 2.0, 3.0])]);
        let err = write_pdb(&too_many_beads, &path).unwrap_err();
        assert!(matches!(err, Error::Pdb(_)));
        assert!(err.to_string().contains("bead 123456 on chromosome 1"));
        assert!(!path.exists());

        let path = dir.path().join("residue.pdb");
        let too_many_chromosomes =
            Structure::from_atoms(vec![AtomRecord::bead(1, 10_000, [1.0, 2.0, 3.0])]);
        assert!(write_pdb(&too_many_chromosomes, &path).is_err());
    }

    #[test]
    fn blank_residue_number_is_fatal() {
        let blank = LINE.replace("A   1 ", "A     ");
        let content = format!("{}\n{}\n", LINE, blank);
        let err = parse(&content).unwrap_err();
        assert!(matches!(err, Error::MissingResidueNumber { count: 1, .. }));
        assert!(err.to_string().contains("missing residue numbers"));
    }

    #[test]
    fn bad_coordinate_names_line() {
        let broken = LINE.replace("11.104", "11.1x4");
        let err = parse(&format!("REMARK\n{}\n", broken)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("x coordinate"));
        assert!(msg.contains("test.pdb:2"));
    }

    #[test]
    fn no_atoms_is_an_error() {
        let err = parse("HEADER only\nEND\n").unwrap_err();
        assert!(err.to_string().contains("no ATOM records"));
    }

    #[test]
    fn write_then_read_preserves_structure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("beads.pdb.gz");
        let mut structure = Structure::from_atoms(vec![
            AtomRecord::bead(1, 1, [0.0, 1.5, -2.25]),
            AtomRecord::bead(2, 1, [1.0, f64::NAN, 0.0]),
            AtomRecord::bead(3, 2, [2.0, 0.0, 0.125]),
        ]);
        structure.trailer.push("END".to_string());

        write_pdb(&structure, &path).unwrap();
        let back = read_pdb(&path).unwrap();

        assert_eq!(back.len(), 3);
        assert_eq!(back.trailer, vec!["END".to_string()]);
        for (a, b) in structure.atoms.iter().zip(&back.atoms) {
            assert_eq!(a.to_pdb_line(), b.to_pdb_line());
            assert_eq!(a.residue_number, b.residue_number);
            assert_eq!(a.line_idx, b.line_idx);
        }
        assert!(back.atoms[1].y.is_nan());
    }
}
