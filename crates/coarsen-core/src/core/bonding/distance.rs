use super::NonEdges;
use super::radii::{max_vdw_radius, vdw_radius};
use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::ordered_pair;
use crate::core::spatial::SpatialIndex;
use nalgebra::Point3;
use tracing::debug;

/// Bonds atoms of a molecule that are close enough given their elements.
///
/// Only atoms with coordinates and an element of known radius take part;
/// others are silently left out. Two eligible atoms are bonded when their
/// distance is at most `0.5 * (r1 + r2) * fudge`, unless they are already
/// bonded or the pair is a known non-edge. Edges are only ever added.
///
/// # Return
///
/// The number of bonds added.
pub fn bonds_from_distance(molecule: &mut Molecule, non_edges: &NonEdges, fudge: f64) -> usize {
    let mut ids: Vec<AtomId> = Vec::new();
    let mut radii: Vec<f64> = Vec::new();
    let mut positions: Vec<Point3<f64>> = Vec::new();
    for (id, atom) in molecule.atoms_iter() {
        let Some(radius) = atom.element.as_deref().and_then(vdw_radius) else {
            continue;
        };
        let Some(position) = molecule.position(id) else {
            continue;
        };
        ids.push(id);
        radii.push(radius);
        positions.push(position);
    }

    if ids.is_empty() {
        return 0;
    }

    let index = SpatialIndex::new(&positions);
    let cutoff = max_vdw_radius() * fudge;

    let mut added = 0;
    for pair in index.pairs_within(cutoff) {
        let (id1, id2) = (ids[pair.first], ids[pair.second]);
        if non_edges.contains(&ordered_pair(id1, id2)) || molecule.has_bond(id1, id2) {
            continue;
        }
        let bond_distance = 0.5 * (radii[pair.first] + radii[pair.second]);
        if pair.distance <= bond_distance * fudge {
            if let (Some(atom1), Some(atom2)) = (molecule.atom(id1), molecule.atom(id2)) {
                debug!("Guessed bond between {} and {} based on distance.", atom1, atom2);
            }
            molecule.add_bond(id1, id2, Some(pair.distance));
            added += 1;
        }
    }
    added
}
