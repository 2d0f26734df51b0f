//! # Bonding Module
//!
//! Infers the bonds of a molecule that comes out of a structure reader
//! without any.
//!
//! ## Overview
//!
//! Bond inference combines two sources of truth:
//!
//! - **Atom names** ([`names`]) - each residue is matched against the reference
//!   block of the same name; block edges become bonds and block non-edges
//!   become *known non-edges*.
//! - **Geometry** ([`distance`]) - a single pass over the whole molecule bonds
//!   close atoms based on their van der Waals radii ([`radii`]), using a
//!   spatial index. It repairs residues that could not be matched by name and
//!   discovers bonds between residues, but never bonds a known non-edge.
//!
//! Residues are grouped by exact key ([`residues`]). Lookup failures are
//! recovered per residue with a warning; they never abort the inference.

pub mod distance;
pub mod names;
pub mod radii;
pub mod residues;

use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use names::{NameMatchError, bonds_from_names};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{instrument, warn};

/// Atom pairs, ordered by id, that must not be bonded by geometry.
pub type NonEdges = HashSet<(AtomId, AtomId)>;

/// Switches controlling bond inference.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct BondingOptions {
    /// Add bonds from the reference blocks of the force field.
    pub allow_name: bool,
    /// Add bonds from inter-atomic distances.
    pub allow_dist: bool,
    /// Scale applied to every distance threshold.
    pub fudge: f64,
}

impl Default for BondingOptions {
    fn default() -> Self {
        Self {
            allow_name: true,
            allow_dist: true,
            fudge: 1.0,
        }
    }
}

/// What a bond inference run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BondingReport {
    pub name_bonds: usize,
    pub distance_bonds: usize,
    /// Residues that could not be bonded from atom names.
    pub unmatched_residues: usize,
}

/// Adds bonds to a molecule from atom names, then from distances.
///
/// Name matching uses the force field attached to the molecule. A residue
/// whose name has no block, or that holds two atoms with the same name, is
/// left to the distance criterion and a warning is emitted. The distance
/// pass runs once over the whole molecule and skips the non-edges declared
/// by the blocks that did match. Bonds are only added, so running the
/// inference again changes nothing.
#[instrument(skip_all, name = "make_bonds", fields(atoms = molecule.atom_count()))]
pub fn make_bonds(molecule: &mut Molecule, options: &BondingOptions) -> BondingReport {
    let mut report = BondingReport::default();
    let mut non_edges = NonEdges::new();

    if options.allow_name {
        let force_field = molecule.force_field().cloned();
        for (key, atom_ids) in residues::collect_residues(molecule) {
            let outcome = match force_field.as_deref() {
                Some(force_field) => {
                    bonds_from_names(molecule, &key.residue_name, &atom_ids, force_field)
                }
                None => Err(NameMatchError::NoForceField),
            };
            match outcome {
                Ok(matched) => {
                    report.name_bonds += matched.bonds_added;
                    non_edges.extend(matched.non_edges);
                }
                Err(error) => {
                    report.unmatched_residues += 1;
                    if options.allow_dist {
                        warn!(
                            "Can't add bonds based on atom names for residue {key} because {error}. \
                             Falling back to distance criteria."
                        );
                    } else {
                        warn!("Can't add bonds based on atom names for residue {key} because {error}.");
                    }
                }
            }
        }
    }

    if options.allow_dist {
        report.distance_bonds =
            distance::bonds_from_distance(molecule, &non_edges, options.fudge);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::{Block, ForceField};
    use crate::core::models::atom::Atom;
    use nalgebra::Point3;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn universal() -> Arc<ForceField> {
        // A two-atom residue whose atoms are declared unbonded.
        let mut split = Block::new("SPL");
        split.add_atom("C1");
        split.add_atom("C2");
        let mut ethane = Block::new("ETH");
        ethane.add_atom("C1");
        ethane.add_atom("C2");
        ethane.add_edge("C1", "C2").unwrap();

        let mut force_field = ForceField::new("universal");
        force_field.add_block(split);
        force_field.add_block(ethane);
        Arc::new(force_field)
    }

    fn atom(name: &str, residue: &str, number: i64, x: f64) -> Atom {
        Atom::new(name, residue, number, "A")
            .with_element("C")
            .with_position(Point3::new(x, 0.0, 0.0))
    }

    fn edge_set(molecule: &Molecule) -> BTreeSet<(AtomId, AtomId)> {
        molecule.bonds_iter().map(|bond| bond.key()).collect()
    }

    #[test]
    fn block_non_edges_override_geometry() {
        let mut molecule = Molecule::new();
        let c1 = molecule.add_atom(atom("C1", "SPL", 1, 0.0));
        let c2 = molecule.add_atom(atom("C2", "SPL", 1, 0.1));
        molecule.set_force_field(Some(universal()));

        let report = make_bonds(&mut molecule, &BondingOptions::default());

        assert!(!molecule.has_bond(c1, c2));
        assert_eq!(report.distance_bonds, 0);
    }

    #[test]
    fn block_edges_bond_atoms_regardless_of_distance() {
        let mut molecule = Molecule::new();
        let c1 = molecule.add_atom(atom("C1", "ETH", 1, 0.0));
        let c2 = molecule.add_atom(atom("C2", "ETH", 1, 5.0));
        molecule.set_force_field(Some(universal()));

        let report = make_bonds(&mut molecule, &BondingOptions::default());

        assert!(molecule.has_bond(c1, c2));
        assert_eq!(report.name_bonds, 1);
    }

    #[test]
    fn inter_residue_bonds_come_from_geometry() {
        let mut molecule = Molecule::new();
        let a1 = molecule.add_atom(atom("C1", "ETH", 1, 0.0));
        let a2 = molecule.add_atom(atom("C2", "ETH", 1, 0.15));
        let b1 = molecule.add_atom(atom("C1", "ETH", 2, 0.30));
        let b2 = molecule.add_atom(atom("C2", "ETH", 2, 0.45));
        molecule.set_force_field(Some(universal()));

        let report = make_bonds(&mut molecule, &BondingOptions::default());

        assert!(molecule.has_bond(a1, a2));
        assert!(molecule.has_bond(b1, b2));
        assert!(molecule.has_bond(a2, b1));
        assert_eq!(report.name_bonds, 2);
        assert_eq!(report.distance_bonds, 1);
    }

    #[test]
    fn unknown_residues_fall_back_to_geometry() {
        let mut molecule = Molecule::new();
        let c1 = molecule.add_atom(atom("C1", "UNK", 1, 0.0));
        let c2 = molecule.add_atom(atom("C2", "UNK", 1, 0.15));
        molecule.set_force_field(Some(universal()));

        let report = make_bonds(&mut molecule, &BondingOptions::default());

        assert!(molecule.has_bond(c1, c2));
        assert_eq!(report.unmatched_residues, 1);
        assert_eq!(report.distance_bonds, 1);
    }

    #[test]
    fn ambiguous_residues_fall_back_to_geometry() {
        let mut molecule = Molecule::new();
        let c1 = molecule.add_atom(atom("C1", "SPL", 1, 0.0));
        let dup = molecule.add_atom(atom("C1", "SPL", 1, 0.15));
        molecule.set_force_field(Some(universal()));

        let report = make_bonds(&mut molecule, &BondingOptions::default());

        assert_eq!(report.unmatched_residues, 1);
        assert!(molecule.has_bond(c1, dup));
    }

    #[test]
    fn missing_force_field_falls_back_to_geometry() {
        let mut molecule = Molecule::new();
        let c1 = molecule.add_atom(atom("C1", "SPL", 1, 0.0));
        let c2 = molecule.add_atom(atom("C2", "SPL", 1, 0.1));

        let report = make_bonds(&mut molecule, &BondingOptions::default());

        assert!(molecule.has_bond(c1, c2));
        assert_eq!(report.unmatched_residues, 1);
    }

    #[test]
    fn switches_disable_each_source() {
        let build = || {
            let mut molecule = Molecule::new();
            molecule.add_atom(atom("C1", "ETH", 1, 0.0));
            molecule.add_atom(atom("C2", "ETH", 1, 5.0));
            molecule.add_atom(atom("C1", "UNK", 2, 5.1));
            molecule.set_force_field(Some(universal()));
            molecule
        };

        let mut names_only = build();
        make_bonds(
            &mut names_only,
            &BondingOptions {
                allow_dist: false,
                ..BondingOptions::default()
            },
        );
        assert_eq!(edge_set(&names_only), [(AtomId(0), AtomId(1))].into_iter().collect());

        let mut geometry_only = build();
        make_bonds(
            &mut geometry_only,
            &BondingOptions {
                allow_name: false,
                ..BondingOptions::default()
            },
        );
        assert_eq!(edge_set(&geometry_only), [(AtomId(1), AtomId(2))].into_iter().collect());
    }

    #[test]
    fn running_twice_is_idempotent() {
        let mut molecule = Molecule::new();
        for (i, residue) in ["ETH", "UNK", "SPL", "ETH"].iter().enumerate() {
            let x = i as f64 * 0.3;
            molecule.add_atom(atom("C1", residue, i as i64, x));
            molecule.add_atom(atom("C2", residue, i as i64, x + 0.15));
        }
        molecule.set_force_field(Some(universal()));

        make_bonds(&mut molecule, &BondingOptions::default());
        let once = edge_set(&molecule);
        let second = make_bonds(&mut molecule, &BondingOptions::default());

        assert_eq!(edge_set(&molecule), once);
        assert_eq!(second.distance_bonds, 0);
        assert_eq!(second.name_bonds, 0);
    }
}
