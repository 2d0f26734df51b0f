use super::error::EngineError;
use super::executor::Executor;
use super::progress::{Progress, ProgressReporter};
use crate::core::models::molecule::Molecule;
use crate::core::models::system::System;

/// How much of the system a processor needs to see at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Molecules are independent; the pipeline may dispatch them to workers.
    Molecule,
    /// The processor drives the whole system itself.
    System,
}

/// A graph transformation applied as one pipeline stage.
///
/// Implementors transform a single molecule in [`Processor::run_molecule`].
/// Processors with [`Scope::System`] also override [`Processor::run_system`]
/// when they need to look across molecules.
pub trait Processor: Send + Sync {
    /// A short name used in logs and progress events.
    fn name(&self) -> &'static str;

    fn scope(&self) -> Scope {
        Scope::Molecule
    }

    /// Transforms one molecule; `index` is its position in the system.
    fn run_molecule(&self, index: usize, molecule: Molecule) -> Result<Molecule, EngineError>;

    /// Transforms the whole system.
    ///
    /// The default applies [`Processor::run_molecule`] to every molecule
    /// through the executor, keeping the input order.
    fn run_system(
        &self,
        system: &mut System,
        executor: &Executor,
        reporter: &ProgressReporter,
    ) -> Result<(), EngineError> {
        apply_per_molecule(self, system, executor, reporter)
    }
}

/// Runs `processor` on each molecule of `system` independently.
pub fn apply_per_molecule<P: Processor + ?Sized>(
    processor: &P,
    system: &mut System,
    executor: &Executor,
    reporter: &ProgressReporter,
) -> Result<(), EngineError> {
    let molecules = system.take_molecules();
    reporter.report(Progress::MoleculesStart {
        total: molecules.len() as u64,
    });

    let processed = executor.map_molecules(molecules, |index, molecule| {
        let result = processor.run_molecule(index, molecule);
        reporter.report(Progress::MoleculeProcessed);
        result
    })?;

    reporter.report(Progress::MoleculesFinish);
    system.replace_molecules(processed);
    Ok(())
}
