use super::NonEdges;
use crate::core::forcefield::{ForceField, ForceFieldError};
use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::ordered_pair;
use std::collections::HashMap;
use thiserror::Error;

/// Why a residue could not be bonded from atom names.
#[derive(Debug, Error)]
pub enum NameMatchError {
    #[error("{0}")]
    Lookup(#[from] ForceFieldError),
    #[error("residue has multiple atoms with atom name {0}")]
    DuplicateAtomName(String),
    #[error("no force field is assigned to the molecule")]
    NoForceField,
}

/// The outcome of bonding one residue from its reference block.
#[derive(Debug, Default)]
pub struct NameMatch {
    pub bonds_added: usize,
    pub non_edges: NonEdges,
}

/// Adds the edges of the reference block to the atoms of one residue.
///
/// Every block edge whose two atom names are present in the residue becomes
/// a bond, with the measured distance when both atoms have coordinates.
/// Every block non-edge whose two names are present is returned as a pair
/// of atom ids that must never be bonded by distance.
///
/// # Errors
///
/// Returns an error, leaving the molecule untouched, if the residue name has
/// no block or if two atoms of the residue share an atom name.
pub fn bonds_from_names(
    molecule: &mut Molecule,
    residue_name: &str,
    atom_ids: &[AtomId],
    force_field: &ForceField,
) -> Result<NameMatch, NameMatchError> {
    let block = force_field.get_block(residue_name)?;

    let (edges, non_edges) = {
        let mut by_name: HashMap<&str, AtomId> = HashMap::with_capacity(atom_ids.len());
        for &id in atom_ids {
            let Some(atom) = molecule.atom(id) else {
                continue;
            };
            if atom.name.is_empty() {
                continue;
            }
            if by_name.insert(atom.name.as_str(), id).is_some() {
                return Err(NameMatchError::DuplicateAtomName(atom.name.clone()));
            }
        }

        let edges: Vec<(AtomId, AtomId)> = block
            .edges()
            .filter_map(|(a, b)| Some((*by_name.get(a)?, *by_name.get(b)?)))
            .collect();
        let non_edges: NonEdges = block
            .non_edges()
            .filter_map(|(a, b)| Some(ordered_pair(*by_name.get(a)?, *by_name.get(b)?)))
            .collect();
        (edges, non_edges)
    };

    let mut bonds_added = 0;
    for (id1, id2) in edges {
        let distance = match (molecule.position(id1), molecule.position(id2)) {
            (Some(p1), Some(p2)) => Some(nalgebra::distance(&p1, &p2)),
            _ => None,
        };
        if !molecule.has_bond(id1, id2) {
            bonds_added += 1;
        }
        molecule.add_bond(id1, id2, distance);
    }

    Ok(NameMatch {
        bonds_added,
        non_edges,
    })
}
