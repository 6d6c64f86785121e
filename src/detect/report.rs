/// Per-chromosome bead distance table (diagnostic output)
///
/// Format (6 tab-separated columns, one header line, one row per bead):
/// 1. residue_number (chromosome index)
/// 2. atom_number (bead serial)
/// 3-5. x_coord, y_coord, z_coord
/// 6. distance to the next bead (0 for the last bead)
use crate::error::Error;
use crate::io::create_writer;
use crate::structure::AtomRecord;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Table path for a chromosome inside `dir`.
pub fn distance_table_path(dir: &Path, chromosome: u32) -> PathBuf {
    dir.join(format!("chr_{}.tsv", chromosome))
}

/// Write the distance table for one chromosome's beads.
pub fn write_distance_table(path: &Path, beads: &[&AtomRecord], distances: &[f64]) -> Result<(), Error> {
    let mut writer = create_writer(path)?;
    write_rows(&mut writer, beads, distances)
        .and_then(|()| writer.finish())
        .map_err(|e| Error::io(e, path))
}

fn write_rows<W: Write>(writer: &mut W, beads: &[&AtomRecord], distances: &[f64]) -> std::io::Result<()> {
    writeln!(
        writer,
        "residue_number\tatom_number\tx_coord\ty_coord\tz_coord\tdistance"
    )?;
    for (bead, distance) in beads.iter().zip(distances) {
        writeln!(
            writer,
            "{}\t{}\t{:.3}\t{:.3}\t{:.3}\t{:.4}",
            bead.residue_number, bead.serial, bead.x, bead.y, bead.z, distance
        )?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_path() {
        assert_eq!(
            distance_table_path(Path::new("/tmp/out"), 12),
            PathBuf::from("/tmp/out/chr_12.tsv")
        );
    }

    #[test]
    fn rows_follow_beads() {
        let a = AtomRecord::bead(7, 2, [0.0, 0.0, 0.0]);
        let b = AtomRecord::bead(8, 2, [3.0, 4.0, 0.0]);
        let mut out = Vec::new();

        write_rows(&mut out, &[&a, &b], &[5.0, 0.0]).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("residue_number\tatom_number"));
        assert_eq!(lines[1], "2\t7\t0.000\t0.000\t0.000\t5.0000");
        assert_eq!(lines[2], "2\t8\t3.000\t4.000\t0.000\t0.0000");
    }
}
