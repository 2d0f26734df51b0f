use crate::core::bonding::{BondingOptions, make_bonds};
use crate::core::models::molecule::Molecule;
use crate::core::models::system::System;
use crate::engine::error::EngineError;
use crate::engine::executor::Executor;
use crate::engine::partition;
use crate::engine::processor::{Processor, Scope, apply_per_molecule};
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

/// Infers the bonds of every molecule of a system.
///
/// On a sequential executor the molecules are fused first, so bonds between
/// molecules are found and molecules are re-split along the new bonds. On a
/// worker pool each molecule is bonded on its own and the molecule list is
/// left as is; bonds between molecules are then never discovered.
#[derive(Debug, Clone, Default)]
pub struct MakeBonds {
    options: BondingOptions,
}

impl MakeBonds {
    pub const NAME: &'static str = "make-bonds";

    pub fn new(options: BondingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BondingOptions {
        &self.options
    }

    fn run_fused(&self, system: &mut System, reporter: &ProgressReporter) -> Result<(), EngineError> {
        let molecules = system.take_molecules();
        reporter.report(Progress::Message(format!(
            "Fusing {} molecules before guessing bonds",
            molecules.len()
        )));

        let mut fused = partition::fuse(molecules);
        fused.molecule.set_force_field(system.force_field().cloned());
        make_bonds(&mut fused.molecule, &self.options);

        system.replace_molecules(partition::split(fused));
        Ok(())
    }
}

impl Processor for MakeBonds {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn scope(&self) -> Scope {
        Scope::System
    }

    fn run_molecule(&self, _index: usize, mut molecule: Molecule) -> Result<Molecule, EngineError> {
        make_bonds(&mut molecule, &self.options);
        Ok(molecule)
    }

    #[instrument(skip_all, name = "make_bonds_stage")]
    fn run_system(
        &self,
        system: &mut System,
        executor: &Executor,
        reporter: &ProgressReporter,
    ) -> Result<(), EngineError> {
        if executor.is_parallel() {
            apply_per_molecule(self, system, executor, reporter)?;
        } else {
            self.run_fused(system, reporter)?;
        }
        info!("{} molecules after guessing bonds", system.molecules().len());
        Ok(())
    }
}
