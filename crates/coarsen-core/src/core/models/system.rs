use super::molecule::Molecule;
use crate::core::forcefield::ForceField;
use itertools::Itertools;
use std::sync::Arc;

/// An ordered collection of molecules sharing one force field.
///
/// The order of the molecules is significant: it is the order in which a
/// topology writer lists them, and the order stages preserve.
#[derive(Debug, Clone, Default)]
pub struct System {
    molecules: Vec<Molecule>,
    force_field: Option<Arc<ForceField>>,
}

impl System {
    /// Creates a new, empty system without a force field.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_molecules(molecules: Vec<Molecule>) -> Self {
        Self {
            molecules,
            force_field: None,
        }
    }

    pub fn molecules(&self) -> &[Molecule] {
        &self.molecules
    }

    pub fn molecules_mut(&mut self) -> &mut [Molecule] {
        &mut self.molecules
    }

    /// Appends a molecule, handing it the system force field.
    pub fn push_molecule(&mut self, mut molecule: Molecule) {
        molecule.set_force_field(self.force_field.clone());
        self.molecules.push(molecule);
    }

    /// Moves every molecule out of the system, leaving it empty.
    pub fn take_molecules(&mut self) -> Vec<Molecule> {
        std::mem::take(&mut self.molecules)
    }

    /// Installs a new list of molecules and propagates the force field to them.
    pub fn replace_molecules(&mut self, molecules: Vec<Molecule>) {
        self.molecules = molecules;
        self.propagate_force_field();
    }

    pub fn force_field(&self) -> Option<&Arc<ForceField>> {
        self.force_field.as_ref()
    }

    /// Assigns the force field at system level; every molecule receives it.
    pub fn set_force_field(&mut self, force_field: Option<Arc<ForceField>>) {
        self.force_field = force_field;
        self.propagate_force_field();
    }

    fn propagate_force_field(&mut self) {
        for molecule in &mut self.molecules {
            molecule.set_force_field(self.force_field.clone());
        }
    }

    pub fn atom_count(&self) -> usize {
        self.molecules.iter().map(Molecule::atom_count).sum()
    }

    pub fn bond_count(&self) -> usize {
        self.molecules.iter().map(Molecule::bond_count).sum()
    }

    /// Groups consecutive molecules by type name and counts them.
    ///
    /// This is the index a topology writer emits: molecule types with their
    /// multiplicities, in the original order. Molecules without a type name
    /// are grouped under `None`.
    pub fn moltype_counts(&self) -> Vec<(Option<&str>, usize)> {
        self.molecules
            .iter()
            .chunk_by(|molecule| molecule.meta.moltype.as_deref())
            .into_iter()
            .map(|(moltype, group)| (moltype, group.count()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;

    fn molecule_of_type(moltype: &str) -> Molecule {
        let mut molecule = Molecule::new();
        molecule.add_atom(Atom::new("BB", "ALA", 1, "A"));
        molecule.meta.moltype = Some(moltype.to_string());
        molecule
    }

    #[test]
    fn setting_force_field_propagates_to_molecules() {
        let mut system = System::with_molecules(vec![Molecule::new(), Molecule::new()]);
        let force_field = Arc::new(ForceField::new("martini"));

        system.set_force_field(Some(force_field.clone()));

        assert!(Arc::ptr_eq(system.force_field().unwrap(), &force_field));
        for molecule in system.molecules() {
            assert!(Arc::ptr_eq(molecule.force_field().unwrap(), &force_field));
        }
    }

    #[test]
    fn pushed_and_replaced_molecules_receive_force_field() {
        let mut system = System::new();
        system.set_force_field(Some(Arc::new(ForceField::new("universal"))));

        system.push_molecule(Molecule::new());
        assert!(system.molecules()[0].force_field().is_some());

        let taken = system.take_molecules();
        assert!(system.molecules().is_empty());
        let stripped: Vec<_> = taken
            .into_iter()
            .map(|mut molecule| {
                molecule.set_force_field(None);
                molecule
            })
            .collect();

        system.replace_molecules(stripped);
        assert!(system.molecules()[0].force_field().is_some());
    }

    #[test]
    fn moltype_counts_groups_consecutive_runs_in_order() {
        let system = System::with_molecules(vec![
            molecule_of_type("protein"),
            molecule_of_type("protein"),
            molecule_of_type("water"),
            molecule_of_type("protein"),
            Molecule::new(),
        ]);

        assert_eq!(
            system.moltype_counts(),
            vec![
                (Some("protein"), 2),
                (Some("water"), 1),
                (Some("protein"), 1),
                (None, 1),
            ]
        );
    }

    #[test]
    fn counts_sum_over_molecules() {
        let system = System::with_molecules(vec![molecule_of_type("a"), molecule_of_type("b")]);
        assert_eq!(system.atom_count(), 2);
        assert_eq!(system.bond_count(), 0);
    }
}
