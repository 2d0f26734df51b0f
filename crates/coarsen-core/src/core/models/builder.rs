use super::atom::Atom;
use super::ids::AtomId;
use super::molecule::Molecule;
use nalgebra::Point3;
use std::collections::HashMap;

/// Incrementally assembles a [`Molecule`] the way structure readers see it:
/// chain by chain, residue by residue, atom by atom.
///
/// Atoms are addressed by their serial number while building; bonds between
/// unknown serials are ignored.
pub struct MoleculeBuilder {
    molecule: Molecule,

    // --- Builder-specific state ---
    serial_map: HashMap<usize, AtomId>,
    current_chain: String,
    current_residue: Option<(i64, String)>,
}

impl Default for MoleculeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MoleculeBuilder {
    pub fn new() -> Self {
        Self {
            molecule: Molecule::new(),
            serial_map: HashMap::new(),
            current_chain: String::new(),
            current_residue: None,
        }
    }

    pub fn start_chain(&mut self, chain: &str) -> &mut Self {
        self.current_chain = chain.to_string();
        self.current_residue = None;
        self
    }

    pub fn start_residue(&mut self, number: i64, name: &str) -> &mut Self {
        self.current_residue = Some((number, name.to_string()));
        self
    }

    /// Adds an atom to the current residue.
    ///
    /// Atoms added before any residue was started land in residue 0 with an
    /// empty name.
    pub fn add_atom(
        &mut self,
        serial: usize,
        name: &str,
        element: Option<&str>,
        position: Option<Point3<f64>>,
    ) -> &mut Self {
        let (number, residue_name) = self
            .current_residue
            .clone()
            .unwrap_or((0, String::new()));

        let mut atom = Atom::new(name, &residue_name, number, &self.current_chain);
        atom.element = element.map(str::to_string);
        if let Some(position) = position {
            atom = atom.with_position(position);
        }

        let id = self.molecule.add_atom(atom);
        self.serial_map.insert(serial, id);
        self
    }

    pub fn add_bond(&mut self, serial1: usize, serial2: usize) -> &mut Self {
        if let (Some(&id1), Some(&id2)) = (self.serial_map.get(&serial1), self.serial_map.get(&serial2)) {
            let distance = match (self.molecule.position(id1), self.molecule.position(id2)) {
                (Some(p1), Some(p2)) => Some(nalgebra::distance(&p1, &p2)),
                _ => None,
            };
            self.molecule.add_bond(id1, id2, distance);
        }
        self
    }

    pub fn atom_id(&self, serial: usize) -> Option<AtomId> {
        self.serial_map.get(&serial).copied()
    }

    pub fn build(self) -> Molecule {
        self.molecule
    }
}
