#![allow(dead_code)]

use coarsen::core::forcefield::ForceFieldCollection;
use coarsen::core::models::builder::MoleculeBuilder;
use coarsen::core::models::molecule::Molecule;
use coarsen::core::models::system::System;
use nalgebra::Point3;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const UNIVERSAL: &str = r#"
[blocks.ALA]
atoms = ["N", "CA", "C", "O", "CB"]
edges = [["N", "CA"], ["CA", "C"], ["C", "O"], ["CA", "CB"]]

[blocks.GLY]
atoms = ["N", "CA", "C", "O"]
edges = [["N", "CA"], ["CA", "C"], ["C", "O"]]

[[links]]
name = "peptide-bond"
features = ["scfix"]
atoms = ["C", "+N"]
edges = [["C", "+N"]]
"#;

/// Writes a data directory with one `universal` force field and loads it.
pub fn force_fields() -> (TempDir, ForceFieldCollection) {
    let root = tempfile::tempdir().unwrap();
    let universal = root.path().join("universal");
    fs::create_dir(&universal).unwrap();
    fs::write(universal.join("aminoacids.toml"), UNIVERSAL).unwrap();
    let collection = ForceFieldCollection::load(root.path()).unwrap();
    (root, collection)
}

/// Distance between consecutive residues along x, in nm.
pub const RESIDUE_STEP: f64 = 0.43;

/// Adds one residue laid out in the xy plane so that only the peptide C-N
/// pair is close enough to bond across residues.
///
/// Atom serials are `10 * number + k`, with `k` the position in the residue.
pub fn add_residue(builder: &mut MoleculeBuilder, chain: &str, number: i64, name: &str, origin: Point3<f64>) {
    let mut layout = vec![
        ("N", "N", 0.0, 0.0),
        ("CA", "C", 0.15, 0.0),
        ("C", "C", 0.30, 0.0),
        ("O", "O", 0.30, 0.15),
    ];
    if name == "ALA" {
        layout.push(("CB", "C", 0.15, -0.15));
    }
    builder.start_chain(chain).start_residue(number, name);
    for (k, (atom_name, element, dx, dy)) in layout.into_iter().enumerate() {
        builder.add_atom(
            10 * number as usize + k,
            atom_name,
            Some(element),
            Some(Point3::new(origin.x + dx, origin.y + dy, origin.z)),
        );
    }
}

/// A single residue at `origin`, as a structure reader would deliver it.
pub fn residue(chain: &str, number: i64, name: &str, origin: Point3<f64>) -> Molecule {
    let mut builder = MoleculeBuilder::new();
    add_residue(&mut builder, chain, number, name, origin);
    builder.build()
}

/// An ALA-GLY-ALA chain: 13 bonds once fully bonded.
pub fn tripeptide(chain: &str, y: f64) -> Molecule {
    let mut builder = MoleculeBuilder::new();
    for (i, name) in ["ALA", "GLY", "ALA"].iter().enumerate() {
        let origin = Point3::new(i as f64 * RESIDUE_STEP, y, 0.0);
        add_residue(&mut builder, chain, i as i64 + 1, name, origin);
    }
    builder.build()
}

/// Bonds of a system described by atom labels, independent of atom ids.
pub fn bond_labels(system: &System) -> BTreeSet<(String, String)> {
    system
        .molecules()
        .iter()
        .flat_map(|molecule| {
            molecule.bonds_iter().map(move |bond| {
                let a = molecule.atom(bond.atom1_id).unwrap().to_string();
                let b = molecule.atom(bond.atom2_id).unwrap().to_string();
                if a < b { (a, b) } else { (b, a) }
            })
        })
        .collect()
}

/// An in-memory sink for captured log output.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
