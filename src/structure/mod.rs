pub mod flip;
pub mod pdb;

use std::collections::BTreeMap;
use std::path::PathBuf;

/// One bead of the 3D genome, stored as a PDB `ATOM` record.
///
/// The residue number is the 1-based chromosome index and the atom serial is
/// the bead's identity; both survive reordering. `line_idx` is only the
/// position of the record in the table.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    pub line_idx: usize,
    pub serial: u64,
    pub atom_name: String,
    pub alt_loc: String,
    pub residue_name: String,
    pub chain_id: String,
    pub residue_number: u32,
    pub insertion: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub occupancy: String,
    pub b_factor: String,
    pub segment_id: String,
    pub element: String,
    pub charge: String,
}

impl AtomRecord {
    /// A bare bead record with default naming columns.
    pub fn bead(serial: u64, residue_number: u32, coords: [f64; 3]) -> Self {
        Self {
            line_idx: 0,
            serial,
            atom_name: " CA ".to_string(),
            alt_loc: String::new(),
            residue_name: "CA".to_string(),
            chain_id: "A".to_string(),
            residue_number,
            insertion: String::new(),
            x: coords[0],
            y: coords[1],
            z: coords[2],
            occupancy: "1.00".to_string(),
            b_factor: "75.00".to_string(),
            segment_id: String::new(),
            element: String::new(),
            charge: String::new(),
        }
    }

    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// A 3D genome structure: bead records plus the non-ATOM lines around them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    /// File the structure was read from (empty when built in memory).
    pub path: PathBuf,
    /// Lines before the first ATOM record.
    pub header: Vec<String>,
    pub atoms: Vec<AtomRecord>,
    /// Non-ATOM lines between ATOM records (TER, MODEL, ...), keyed by the
    /// number of beads written before them. Flips reorder beads, not these.
    pub separators: Vec<(usize, String)>,
    /// Non-ATOM lines after the last ATOM record (CONECT, END, ...).
    pub trailer: Vec<String>,
}

impl Structure {
    /// Build an in-memory structure from bead records, numbering their positions.
    pub fn from_atoms(atoms: Vec<AtomRecord>) -> Self {
        let mut structure = Self {
            atoms,
            ..Self::default()
        };
        structure.reindex();
        structure
    }

    /// Number of beads.
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Beads grouped by chromosome, ascending chromosome index, table order within each.
    pub fn beads_by_chromosome(&self) -> BTreeMap<u32, Vec<&AtomRecord>> {
        let mut groups: BTreeMap<u32, Vec<&AtomRecord>> = BTreeMap::new();
        for atom in &self.atoms {
            groups.entry(atom.residue_number).or_default().push(atom);
        }
        groups
    }

    /// Current table position of the bead with `serial` on `chromosome`.
    pub fn position_of(&self, chromosome: u32, serial: u64) -> Option<usize> {
        self.atoms
            .iter()
            .position(|a| a.residue_number == chromosome && a.serial == serial)
    }

    /// Reassign `line_idx` to the current table order.
    pub fn reindex(&mut self) {
        for (idx, atom) in self.atoms.iter_mut().enumerate() {
            atom.line_idx = idx;
        }
    }

    /// Coordinates in table order.
    pub fn coordinates(&self) -> Vec<[f64; 3]> {
        self.atoms.iter().map(AtomRecord::coords).collect()
    }
}
