use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::system::System;
use crate::engine::config::DEFAULT_MOLTYPE_PREFIX;
use crate::engine::error::EngineError;
use crate::engine::executor::Executor;
use crate::engine::processor::{Processor, Scope, apply_per_molecule};
use crate::engine::progress::ProgressReporter;
use std::collections::HashMap;
use tracing::{debug, info};

/// Assigns molecule type names to the molecules that lack one.
///
/// With deduplication (the default), molecules that are topologically
/// identical share one name and names are numbered per distinct type, in
/// order of first appearance. Without it, each unnamed molecule is named
/// after its position in the system. Names already present are kept.
#[derive(Debug, Clone)]
pub struct NameMoleculeTypes {
    prefix: String,
    deduplicate: bool,
}

impl Default for NameMoleculeTypes {
    fn default() -> Self {
        Self::new(DEFAULT_MOLTYPE_PREFIX)
    }
}

impl NameMoleculeTypes {
    pub const NAME: &'static str = "name-moltypes";

    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            deduplicate: true,
        }
    }

    pub fn with_deduplication(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }

    fn type_name(&self, index: usize) -> String {
        format!("{}_{}", self.prefix, index)
    }
}

impl Processor for NameMoleculeTypes {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn scope(&self) -> Scope {
        if self.deduplicate {
            Scope::System
        } else {
            Scope::Molecule
        }
    }

    fn run_molecule(&self, index: usize, mut molecule: Molecule) -> Result<Molecule, EngineError> {
        if molecule.meta.moltype.is_none() {
            molecule.meta.moltype = Some(self.type_name(index));
        }
        Ok(molecule)
    }

    fn run_system(
        &self,
        system: &mut System,
        executor: &Executor,
        reporter: &ProgressReporter,
    ) -> Result<(), EngineError> {
        if !self.deduplicate {
            return apply_per_molecule(self, system, executor, reporter);
        }

        let mut known: HashMap<MoleculeSignature, String> = HashMap::new();
        for molecule in system.molecules_mut() {
            if molecule.meta.moltype.is_some() {
                continue;
            }
            let next_index = known.len();
            let name = known
                .entry(MoleculeSignature::of(molecule))
                .or_insert_with(|| self.type_name(next_index))
                .clone();
            debug!(moltype = %name, atoms = molecule.atom_count(), "Assigned molecule type.");
            molecule.meta.moltype = Some(name);
        }
        info!("{} distinct molecule types named", known.len());
        Ok(())
    }
}

/// What two molecules must share to be written as one molecule type.
///
/// Atom ids are replaced by their rank so that renumbered copies compare
/// equal. Coordinates do not take part.
#[derive(Debug, PartialEq, Eq, Hash)]
struct MoleculeSignature {
    atoms: Vec<AtomSignature>,
    bonds: Vec<(usize, usize)>,
    interactions: Vec<(String, Vec<usize>, Vec<String>)>,
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct AtomSignature {
    name: String,
    element: Option<String>,
    residue_name: String,
    residue_number: i64,
    atom_type: Option<String>,
    charge_bits: Option<u64>,
    charge_group: Option<u32>,
}

impl MoleculeSignature {
    fn of(molecule: &Molecule) -> Self {
        let rank: HashMap<AtomId, usize> = molecule
            .atom_ids()
            .into_iter()
            .enumerate()
            .map(|(i, id)| (id, i))
            .collect();
        let rank_of = |id: &AtomId| rank.get(id).copied().unwrap_or(usize::MAX);

        let atoms = molecule
            .atoms_iter()
            .map(|(_, atom)| AtomSignature {
                name: atom.name.clone(),
                element: atom.element.clone(),
                residue_name: atom.residue_name.clone(),
                residue_number: atom.residue_number,
                atom_type: atom.atom_type.clone(),
                charge_bits: atom.charge.map(f64::to_bits),
                charge_group: atom.charge_group,
            })
            .collect();
        let bonds = molecule
            .bonds_iter()
            .map(|bond| (rank_of(&bond.atom1_id), rank_of(&bond.atom2_id)))
            .collect();
        let interactions = molecule
            .interactions_iter()
            .flat_map(|(kind, list)| {
                list.iter().map(move |interaction| {
                    (
                        kind.to_string(),
                        interaction.atoms().iter().map(rank_of).collect(),
                        interaction.parameters().to_vec(),
                    )
                })
            })
            .collect();

        Self {
            atoms,
            bonds,
            interactions,
        }
    }
}
