use crate::core::forcefield::ForceFieldCollection;
use crate::core::models::system::System;
use crate::engine::config::PipelineConfig;
use crate::engine::error::EngineError;
use crate::engine::executor::Executor;
use crate::engine::pipeline::Pipeline;
use crate::engine::processors::{MakeBonds, NameMoleculeTypes, VirtualGoSites};
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareSummary {
    pub force_field: String,
    pub molecules_in: usize,
    pub molecules_out: usize,
    pub bonds: usize,
    /// Molecule type names with their multiplicities, in system order.
    pub moltypes: Vec<(String, usize)>,
}

/// Builds the stages described by `config`, in execution order.
pub fn build_pipeline(config: &PipelineConfig) -> Result<Pipeline, EngineError> {
    let executor = Executor::new(config.workers)?;
    let mut pipeline = Pipeline::new(executor)
        .with_stage(MakeBonds::new(config.bonding))
        .with_stage(NameMoleculeTypes::new(&config.moltype_prefix));
    if let Some(virtual_sites) = &config.virtual_sites {
        pipeline.push(Box::new(VirtualGoSites::new(virtual_sites.clone())));
    }
    Ok(pipeline)
}

/// Prepares a system read from a structure file for topology writing.
///
/// Resolves the configured force field, assigns it to the system, infers
/// bonds, names molecule types and, when configured, adds virtual Go sites.
///
/// # Errors
///
/// Fails if the force field is unknown, if the worker pool cannot be
/// created, or if any stage fails. Unknown residues are not errors.
#[instrument(skip_all, name = "prepare_workflow", fields(force_field = %config.force_field))]
pub fn run(
    system: &mut System,
    force_fields: &ForceFieldCollection,
    config: &PipelineConfig,
    reporter: &ProgressReporter,
) -> Result<PrepareSummary, EngineError> {
    reporter.report(Progress::StageStart {
        name: "Preparation",
    });
    let force_field = force_fields.get(&config.force_field)?;
    system.set_force_field(Some(force_field));
    let pipeline = build_pipeline(config)?;
    let molecules_in = system.molecules().len();
    info!(
        molecules = molecules_in,
        atoms = system.atom_count(),
        stages = ?pipeline.stage_names(),
        "Starting preparation."
    );
    reporter.report(Progress::StageFinish);

    pipeline.run(system, reporter)?;

    let summary = PrepareSummary {
        force_field: config.force_field.clone(),
        molecules_in,
        molecules_out: system.molecules().len(),
        bonds: system.bond_count(),
        moltypes: system
            .moltype_counts()
            .into_iter()
            .map(|(name, count)| (name.unwrap_or_default().to_string(), count))
            .collect(),
    };
    info!(
        "Preparation complete: {} molecules, {} bonds.",
        summary.molecules_out, summary.bonds
    );
    Ok(summary)
}
