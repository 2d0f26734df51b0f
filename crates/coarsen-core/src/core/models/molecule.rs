use super::atom::{Atom, Position};
use super::attribute::Attribute;
use super::ids::AtomId;
use super::topology::{Bond, Interaction, ordered_pair};
use crate::core::forcefield::ForceField;
use nalgebra::Point3;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Molecule-level metadata consumed by later stages and the topology writer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoleculeMeta {
    /// The molecule type name, assigned before augmentation passes run.
    pub moltype: Option<String>,
    /// Lines to append after a topology section, keyed by section name.
    pub post_section_lines: BTreeMap<String, Vec<String>>,
    /// Anything else attached by readers or passes.
    pub extra: BTreeMap<String, Attribute>,
}

/// The owned pieces of a molecule, used when graphs are fused or split.
#[derive(Debug, Default)]
pub struct MoleculeParts {
    pub atoms: BTreeMap<AtomId, Atom>,
    pub bonds: Vec<Bond>,
    pub interactions: BTreeMap<String, Vec<Interaction>>,
    pub meta: MoleculeMeta,
}

/// A mutable attributed graph: atoms are nodes, bonds are edges.
///
/// Every bond references two existing atoms, and removing an atom removes
/// its bonds. Atom ids are unique within the molecule.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    /// Atoms keyed by id; iteration follows id order.
    atoms: BTreeMap<AtomId, Atom>,
    /// Bonds keyed by their ordered atom pair.
    bonds: BTreeMap<(AtomId, AtomId), Bond>,
    /// Cached adjacency, kept in sync with `bonds`.
    adjacency: BTreeMap<AtomId, BTreeSet<AtomId>>,
    /// Interactions grouped by kind (e.g. "bonds", "virtual_sitesn").
    interactions: BTreeMap<String, Vec<Interaction>>,
    /// Metadata mapping of the molecule.
    pub meta: MoleculeMeta,
    /// The force field shared by the whole system.
    force_field: Option<Arc<ForceField>>,
}

impl Molecule {
    /// Creates a new, empty molecule.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(&id)
    }

    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(&id)
    }

    /// Returns an iterator over all atoms in id order.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter().map(|(&id, atom)| (id, atom))
    }

    pub fn atoms_iter_mut(&mut self) -> impl Iterator<Item = (AtomId, &mut Atom)> {
        self.atoms.iter_mut().map(|(&id, atom)| (id, atom))
    }

    pub fn atom_ids(&self) -> Vec<AtomId> {
        self.atoms.keys().copied().collect()
    }

    pub fn contains_atom(&self, id: AtomId) -> bool {
        self.atoms.contains_key(&id)
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Returns the id following the largest id in use.
    pub fn next_atom_id(&self) -> AtomId {
        self.atoms
            .keys()
            .next_back()
            .map_or(AtomId(0), |id| id.next())
    }

    /// Appends an atom under a fresh id and returns that id.
    pub fn add_atom(&mut self, atom: Atom) -> AtomId {
        let id = self.next_atom_id();
        self.atoms.insert(id, atom);
        self.adjacency.insert(id, BTreeSet::new());
        id
    }

    /// Inserts an atom under a caller-chosen id.
    ///
    /// # Return
    ///
    /// Returns `None` if the id is already taken, leaving the molecule unchanged.
    pub fn insert_atom(&mut self, id: AtomId, atom: Atom) -> Option<()> {
        if self.atoms.contains_key(&id) {
            return None;
        }
        self.atoms.insert(id, atom);
        self.adjacency.insert(id, BTreeSet::new());
        Some(())
    }

    /// Removes an atom together with its bonds.
    ///
    /// Atoms whose position aliased the removed atom receive a copy of its
    /// coordinates. Interactions naming the removed atom are dropped; the
    /// kinds they belonged to are kept, possibly empty.
    ///
    /// # Return
    ///
    /// Returns `Some(Atom)` if the atom existed, otherwise `None`.
    pub fn remove_atom(&mut self, id: AtomId) -> Option<Atom> {
        let resolved = self.position(id);
        let atom = self.atoms.remove(&id)?;

        let neighbors = self.adjacency.remove(&id).unwrap_or_default();
        for neighbor in neighbors {
            self.bonds.remove(&ordered_pair(id, neighbor));
            if let Some(adjacent) = self.adjacency.get_mut(&neighbor) {
                adjacent.remove(&id);
            }
        }

        for other in self.atoms.values_mut() {
            if other.position.alias_target() == Some(id) {
                other.position = resolved.map_or(Position::Unknown, Position::Absolute);
            }
        }
        for list in self.interactions.values_mut() {
            list.retain(|interaction| !interaction.involves(id));
        }

        Some(atom)
    }

    /// Adds a bond between two atoms.
    ///
    /// Adding a bond that already exists only refreshes its stored distance,
    /// so the operation is idempotent.
    ///
    /// # Return
    ///
    /// Returns `None` if either atom is missing or both ids are the same.
    pub fn add_bond(&mut self, atom1_id: AtomId, atom2_id: AtomId, distance: Option<f64>) -> Option<()> {
        if atom1_id == atom2_id
            || !self.atoms.contains_key(&atom1_id)
            || !self.atoms.contains_key(&atom2_id)
        {
            return None;
        }

        let bond = Bond::new(atom1_id, atom2_id, distance);
        self.bonds.insert(bond.key(), bond);
        self.adjacency.entry(atom1_id).or_default().insert(atom2_id);
        self.adjacency.entry(atom2_id).or_default().insert(atom1_id);
        Some(())
    }

    pub fn has_bond(&self, atom1_id: AtomId, atom2_id: AtomId) -> bool {
        self.bonds.contains_key(&ordered_pair(atom1_id, atom2_id))
    }

    pub fn bond(&self, atom1_id: AtomId, atom2_id: AtomId) -> Option<&Bond> {
        self.bonds.get(&ordered_pair(atom1_id, atom2_id))
    }

    /// Returns an iterator over all bonds, ordered by their atom pair.
    pub fn bonds_iter(&self) -> impl Iterator<Item = &Bond> {
        self.bonds.values()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Returns the bonded neighbors of an atom in id order.
    pub fn neighbors(&self, id: AtomId) -> impl Iterator<Item = AtomId> + '_ {
        self.adjacency.get(&id).into_iter().flatten().copied()
    }

    /// Resolves the coordinates of an atom, following aliases.
    ///
    /// # Return
    ///
    /// Returns `None` if the atom does not exist, has no coordinates, or the
    /// alias chain is broken.
    pub fn position(&self, id: AtomId) -> Option<Point3<f64>> {
        let mut current = id;
        for _ in 0..=self.atoms.len() {
            match self.atoms.get(&current)?.position {
                Position::Absolute(point) => return Some(point),
                Position::Aliased(target) => current = target,
                Position::Unknown => return None,
            }
        }
        None
    }

    pub fn interactions(&self, kind: &str) -> &[Interaction] {
        self.interactions
            .get(kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn interactions_iter(&self) -> impl Iterator<Item = (&str, &[Interaction])> {
        self.interactions
            .iter()
            .map(|(kind, list)| (kind.as_str(), list.as_slice()))
    }

    pub fn add_interaction(&mut self, kind: &str, interaction: Interaction) {
        self.interactions
            .entry(kind.to_string())
            .or_default()
            .push(interaction);
    }

    /// Appends interactions of one kind, creating the kind even when `items` is empty.
    pub fn extend_interactions(&mut self, kind: &str, items: impl IntoIterator<Item = Interaction>) {
        self.interactions
            .entry(kind.to_string())
            .or_default()
            .extend(items);
    }

    pub fn has_interaction_kind(&self, kind: &str) -> bool {
        self.interactions.contains_key(kind)
    }

    pub fn force_field(&self) -> Option<&Arc<ForceField>> {
        self.force_field.as_ref()
    }

    pub fn set_force_field(&mut self, force_field: Option<Arc<ForceField>>) {
        self.force_field = force_field;
    }

    /// Consumes the molecule and hands out its owned pieces.
    ///
    /// The force field reference is dropped; the owner reassigns it.
    pub fn into_parts(self) -> MoleculeParts {
        MoleculeParts {
            atoms: self.atoms,
            bonds: self.bonds.into_values().collect(),
            interactions: self.interactions,
            meta: self.meta,
        }
    }

    /// Rebuilds a molecule from owned pieces.
    ///
    /// Bonds referencing atoms absent from `parts.atoms` are discarded.
    pub fn from_parts(parts: MoleculeParts) -> Self {
        let mut molecule = Self {
            adjacency: parts.atoms.keys().map(|&id| (id, BTreeSet::new())).collect(),
            atoms: parts.atoms,
            bonds: BTreeMap::new(),
            interactions: parts.interactions,
            meta: parts.meta,
            force_field: None,
        };
        for bond in parts.bonds {
            molecule.add_bond(bond.atom1_id, bond.atom2_id, bond.distance);
        }
        molecule
    }
}
