//! Fusing molecules into one graph and splitting it back along bonds.
//!
//! Bond inference on the sequential path needs to see every molecule at
//! once to discover bonds between them. [`fuse`] builds the disjoint union
//! of the molecules, renumbering atoms while remembering where each atom
//! came from; [`split`] re-derives molecule boundaries from the connected
//! components of the residue-contracted graph.

use crate::core::bonding::residues::collect_residues;
use crate::core::models::atom::Position;
use crate::core::models::ids::AtomId;
use crate::core::models::molecule::{Molecule, MoleculeMeta, MoleculeParts};
use crate::core::models::topology::Bond;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// A fused graph with enough bookkeeping to split it again.
#[derive(Debug)]
pub struct FusedGraph {
    pub molecule: Molecule,
    /// Metadata of the input molecules, by input position.
    origins: Vec<MoleculeMeta>,
    /// Input position of the molecule each fused atom came from.
    origin_of: BTreeMap<AtomId, usize>,
}

impl FusedGraph {
    pub fn origin_count(&self) -> usize {
        self.origins.len()
    }

    pub fn origin_of(&self, id: AtomId) -> Option<usize> {
        self.origin_of.get(&id).copied()
    }
}

/// Builds the disjoint union of `molecules`.
///
/// Atoms are renumbered consecutively in input order, so atom ids of the
/// fused graph are unique. Aliased positions and interaction atoms follow the
/// renumbering. An alias to an atom its molecule does not have becomes an
/// unknown position, and an interaction naming such an atom is dropped; both
/// are logged. Every atom is tagged with the input position of its molecule
/// so residue keys stay distinct across molecules.
pub fn fuse(molecules: Vec<Molecule>) -> FusedGraph {
    let mut atoms = BTreeMap::new();
    let mut bonds = Vec::new();
    let mut interactions: BTreeMap<String, Vec<_>> = BTreeMap::new();
    let mut origins = Vec::with_capacity(molecules.len());
    let mut origin_of = BTreeMap::new();
    let mut next_id = AtomId(0);

    for (index, molecule) in molecules.into_iter().enumerate() {
        let parts = molecule.into_parts();

        let mut id_map: HashMap<AtomId, AtomId> = HashMap::with_capacity(parts.atoms.len());
        for &old_id in parts.atoms.keys() {
            id_map.insert(old_id, next_id);
            next_id = next_id.next();
        }
        let remap = |id: AtomId| id_map.get(&id).copied();

        for (old_id, mut atom) in parts.atoms {
            if let Position::Aliased(target) = atom.position {
                atom.position = match remap(target) {
                    Some(new_target) => Position::Aliased(new_target),
                    None => {
                        warn!(
                            "Atom {} of molecule {} shares the position of missing atom {}; its position is now unknown.",
                            atom, index, target
                        );
                        Position::Unknown
                    }
                };
            }
            atom.molecule_index = Some(index);
            let new_id = id_map[&old_id];
            origin_of.insert(new_id, index);
            atoms.insert(new_id, atom);
        }
        for bond in parts.bonds {
            if let (Some(atom1), Some(atom2)) = (remap(bond.atom1_id), remap(bond.atom2_id)) {
                bonds.push(Bond::new(atom1, atom2, bond.distance));
            }
        }
        for (kind, list) in parts.interactions {
            let fused = interactions.entry(kind.clone()).or_default();
            for interaction in &list {
                match interaction.remapped(remap) {
                    Some(remapped) => fused.push(remapped),
                    None => warn!(
                        "Dropping a {} interaction of molecule {} that names atoms the molecule does not have.",
                        kind, index
                    ),
                }
            }
        }
        origins.push(parts.meta);
    }

    let molecule = Molecule::from_parts(MoleculeParts {
        atoms,
        bonds,
        interactions,
        meta: MoleculeMeta::default(),
    });

    FusedGraph {
        molecule,
        origins,
        origin_of,
    }
}

/// Disjoint sets over `0..len` with path compression and union by rank.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    pub fn find(&mut self, element: usize) -> usize {
        let mut root = element;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = element;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    pub fn union(&mut self, a: usize, b: usize) {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a == root_b {
            return;
        }
        match self.rank[root_a].cmp(&self.rank[root_b]) {
            std::cmp::Ordering::Less => self.parent[root_a] = root_b,
            std::cmp::Ordering::Greater => self.parent[root_b] = root_a,
            std::cmp::Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] += 1;
            }
        }
    }
}

/// Splits a fused graph into its connected components.
///
/// Atoms of one residue always land in the same output molecule, even when
/// no bond connects them. Output molecules are ordered by their lowest atom
/// id and keep the fused atom ids. Each one takes the metadata of the input
/// molecule its lowest atom came from, and the interactions whose first
/// atom it owns. An aliased position whose target ends up in another
/// molecule is replaced by the resolved coordinates.
pub fn split(fused: FusedGraph) -> Vec<Molecule> {
    let FusedGraph {
        molecule,
        origins,
        origin_of,
    } = fused;

    let ids = molecule.atom_ids();
    if ids.is_empty() {
        return Vec::new();
    }
    let dense: HashMap<AtomId, usize> = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    let mut sets = UnionFind::new(ids.len());
    for members in collect_residues(&molecule).values() {
        for pair in members.windows(2) {
            sets.union(dense[&pair[0]], dense[&pair[1]]);
        }
    }
    for bond in molecule.bonds_iter() {
        if let (Some(&a), Some(&b)) = (dense.get(&bond.atom1_id), dense.get(&bond.atom2_id)) {
            sets.union(a, b);
        }
    }

    // Ids are ascending, so components are numbered by their lowest atom.
    let mut component_of_root: HashMap<usize, usize> = HashMap::new();
    let mut component_of: HashMap<AtomId, usize> = HashMap::with_capacity(ids.len());
    let mut lowest: Vec<AtomId> = Vec::new();
    for (i, &id) in ids.iter().enumerate() {
        let root = sets.find(i);
        let component = *component_of_root.entry(root).or_insert_with(|| {
            lowest.push(id);
            lowest.len() - 1
        });
        component_of.insert(id, component);
    }

    let resolved: HashMap<AtomId, _> = ids
        .iter()
        .filter_map(|&id| {
            let target = molecule.atom(id)?.position.alias_target()?;
            (component_of.get(&target) != component_of.get(&id))
                .then(|| (id, molecule.position(id)))
        })
        .collect();

    let mut pieces: Vec<MoleculeParts> = lowest
        .iter()
        .map(|id| MoleculeParts {
            meta: origin_of
                .get(id)
                .and_then(|&origin| origins.get(origin))
                .cloned()
                .unwrap_or_default(),
            ..MoleculeParts::default()
        })
        .collect();

    let parts = molecule.into_parts();
    for (id, mut atom) in parts.atoms {
        if let Some(position) = resolved.get(&id) {
            atom.position = position.map_or(Position::Unknown, Position::Absolute);
        }
        pieces[component_of[&id]].atoms.insert(id, atom);
    }
    for bond in parts.bonds {
        if let Some(&component) = component_of.get(&bond.atom1_id) {
            pieces[component].bonds.push(bond);
        }
    }
    for (kind, list) in parts.interactions {
        for interaction in list {
            let component = interaction
                .atoms()
                .first()
                .and_then(|id| component_of.get(id))
                .copied()
                .unwrap_or(0);
            pieces[component]
                .interactions
                .entry(kind.clone())
                .or_default()
                .push(interaction);
        }
    }

    pieces.into_iter().map(Molecule::from_parts).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::topology::Interaction;
    use nalgebra::Point3;

    fn chain_molecule(chain: &str, residues: &[(i64, &str)], moltype: &str) -> Molecule {
        let mut molecule = Molecule::new();
        let mut previous = None;
        for (i, &(number, name)) in residues.iter().enumerate() {
            let id = molecule.add_atom(
                Atom::new(name, "ALA", number, chain)
                    .with_position(Point3::new(i as f64, 0.0, 0.0)),
            );
            if let Some(previous) = previous {
                molecule.add_bond(previous, id, None);
            }
            previous = Some(id);
        }
        molecule.meta.moltype = Some(moltype.to_string());
        molecule
    }

    #[test]
    fn union_find_merges_transitively() {
        let mut sets = UnionFind::new(5);
        sets.union(0, 1);
        sets.union(3, 4);
        sets.union(1, 4);
        assert_eq!(sets.find(0), sets.find(3));
        assert_ne!(sets.find(0), sets.find(2));
    }

    #[test]
    fn fuse_renumbers_and_remaps_everything() {
        let first = chain_molecule("A", &[(1, "BB"), (2, "BB")], "a");
        let mut second = chain_molecule("B", &[(1, "BB"), (1, "SC1")], "b");
        let site = second.add_atom(Atom::new("CA", "ALA", 1, "B"));
        second.atom_mut(site).unwrap().position = Position::Aliased(AtomId(0));
        second.add_interaction(
            "virtual_sitesn",
            Interaction::new(vec![site, AtomId(0)], vec!["1".to_string()], BTreeMap::new()),
        );

        let fused = fuse(vec![first, second]);

        assert_eq!(fused.origin_count(), 2);
        assert_eq!(fused.molecule.atom_count(), 5);
        assert!(fused.molecule.has_bond(AtomId(0), AtomId(1)));
        assert!(fused.molecule.has_bond(AtomId(2), AtomId(3)));
        assert_eq!(fused.molecule.atom(AtomId(4)).unwrap().position, Position::Aliased(AtomId(2)));
        assert_eq!(
            fused.molecule.interactions("virtual_sitesn")[0].atoms(),
            &[AtomId(4), AtomId(2)]
        );
        assert_eq!(fused.origin_of(AtomId(3)), Some(1));
        assert_eq!(fused.molecule.atom(AtomId(3)).unwrap().molecule_index, Some(1));
    }

    #[test]
    fn references_to_atoms_outside_the_molecule_are_not_carried_over() {
        let first = chain_molecule("A", &[(1, "BB"), (2, "BB"), (3, "BB")], "a");
        let mut second = chain_molecule("B", &[(1, "BB")], "b");
        // Id 2 does not exist in `second` but will exist in the fused graph.
        let site = second.add_atom(Atom::new("CA", "ALA", 1, "B"));
        second.atom_mut(site).unwrap().position = Position::Aliased(AtomId(2));
        second.add_interaction(
            "virtual_sitesn",
            Interaction::new(vec![site, AtomId(2)], vec!["1".to_string()], BTreeMap::new()),
        );
        second.add_interaction(
            "virtual_sitesn",
            Interaction::new(vec![site, AtomId(0)], vec!["1".to_string()], BTreeMap::new()),
        );

        let fused = fuse(vec![first, second]);

        assert_eq!(fused.molecule.atom(AtomId(4)).unwrap().position, Position::Unknown);
        let kept = fused.molecule.interactions("virtual_sitesn");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].atoms(), &[AtomId(4), AtomId(3)]);
    }

    #[test]
    fn split_without_new_bonds_restores_molecules() {
        let molecules = vec![
            chain_molecule("A", &[(1, "BB"), (2, "BB")], "a"),
            chain_molecule("B", &[(1, "BB"), (2, "BB"), (3, "BB")], "b"),
        ];

        let split = split(fuse(molecules));

        assert_eq!(split.len(), 2);
        assert_eq!(split[0].atom_count(), 2);
        assert_eq!(split[1].atom_count(), 3);
        assert_eq!(split[0].meta.moltype.as_deref(), Some("a"));
        assert_eq!(split[1].meta.moltype.as_deref(), Some("b"));
    }

    #[test]
    fn bonds_across_molecules_merge_them() {
        let molecules = vec![
            chain_molecule("A", &[(1, "BB")], "a"),
            chain_molecule("B", &[(1, "BB")], "b"),
            chain_molecule("C", &[(1, "BB")], "c"),
        ];
        let mut fused = fuse(molecules);
        fused.molecule.add_bond(AtomId(0), AtomId(2), None);

        let split = split(fused);

        assert_eq!(split.len(), 2);
        assert_eq!(split[0].atom_ids(), vec![AtomId(0), AtomId(2)]);
        assert_eq!(split[0].meta.moltype.as_deref(), Some("a"));
        assert_eq!(split[1].atom_ids(), vec![AtomId(1)]);
        assert_eq!(split[1].meta.moltype.as_deref(), Some("b"));
    }

    #[test]
    fn residues_are_never_split_across_molecules() {
        // Residue 2 has two atoms with no bond between them.
        let mut molecule = Molecule::new();
        molecule.add_atom(Atom::new("BB", "ALA", 1, "A"));
        molecule.add_atom(Atom::new("BB", "GLY", 2, "A"));
        molecule.add_atom(Atom::new("SC1", "GLY", 2, "A"));
        molecule.add_atom(Atom::new("BB", "LYS", 3, "A"));

        let split = split(fuse(vec![molecule]));

        assert_eq!(split.len(), 3);
        for piece in &split {
            let residues = collect_residues(piece);
            for (key, members) in residues {
                let total = split
                    .iter()
                    .flat_map(|m| m.atoms_iter())
                    .filter(|(_, atom)| atom.residue_key() == key)
                    .count();
                assert_eq!(members.len(), total);
            }
        }
        assert_eq!(split[1].atom_count(), 2);
    }

    #[test]
    fn split_never_yields_more_molecules_than_were_fused_without_bond_removal() {
        let molecules: Vec<_> = (0..4)
            .map(|i| chain_molecule(&i.to_string(), &[(1, "BB"), (2, "BB")], "x"))
            .collect();
        let mut fused = fuse(molecules);
        fused.molecule.add_bond(AtomId(1), AtomId(2), None);
        fused.molecule.add_bond(AtomId(5), AtomId(6), None);

        assert_eq!(split(fused).len(), 2);
    }

    #[test]
    fn interactions_follow_their_first_atom_and_aliases_are_materialized() {
        let mut molecule = Molecule::new();
        let bb = molecule.add_atom(
            Atom::new("BB", "ALA", 1, "A").with_position(Point3::new(1.0, 2.0, 3.0)),
        );
        let mut site = Atom::new("CA", "ALA", 7, "Z");
        site.position = Position::Aliased(bb);
        let site = molecule.add_atom(site);
        molecule.add_interaction(
            "virtual_sitesn",
            Interaction::new(vec![site, bb], vec!["1".to_string()], BTreeMap::new()),
        );

        let split = split(fuse(vec![molecule]));

        assert_eq!(split.len(), 2);
        assert!(split[0].interactions("virtual_sitesn").is_empty());
        assert_eq!(split[1].interactions("virtual_sitesn").len(), 1);
        assert_eq!(
            split[1].atom(site).unwrap().position,
            Position::Absolute(Point3::new(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn empty_input_fuses_and_splits_to_nothing() {
        let fused = fuse(Vec::new());
        assert!(fused.molecule.is_empty());
        assert!(split(fused).is_empty());
    }
}
