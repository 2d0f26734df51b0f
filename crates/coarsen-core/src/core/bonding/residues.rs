use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::residue::ResidueKey;
use std::collections::BTreeMap;

/// Groups the atoms of a molecule by exact residue key.
///
/// Atom ids within a group are in ascending order; groups are ordered by key.
pub fn collect_residues(molecule: &Molecule) -> BTreeMap<ResidueKey, Vec<AtomId>> {
    let mut residues: BTreeMap<ResidueKey, Vec<AtomId>> = BTreeMap::new();
    for (id, atom) in molecule.atoms_iter() {
        residues.entry(atom.residue_key()).or_default().push(id);
    }
    residues
}
