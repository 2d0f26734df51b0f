use super::error::EngineError;
use super::executor::Executor;
use super::processor::{Processor, Scope, apply_per_molecule};
use super::progress::{Progress, ProgressReporter};
use crate::core::models::system::System;
use tracing::{info, instrument};

/// An ordered list of processors sharing one executor.
pub struct Pipeline {
    stages: Vec<Box<dyn Processor>>,
    executor: Executor,
}

impl Pipeline {
    pub fn new(executor: Executor) -> Self {
        Self {
            stages: Vec::new(),
            executor,
        }
    }

    pub fn with_stage(mut self, stage: impl Processor + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn push(&mut self, stage: Box<dyn Processor>) {
        self.stages.push(stage);
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Runs every stage on `system`, in order.
    ///
    /// Per-molecule stages are dispatched through the executor; system-wide
    /// stages drive the system themselves. The first failing stage aborts
    /// the run.
    #[instrument(skip_all, name = "pipeline", fields(stages = self.stages.len()))]
    pub fn run(&self, system: &mut System, reporter: &ProgressReporter) -> Result<(), EngineError> {
        for stage in &self.stages {
            reporter.report(Progress::StageStart { name: stage.name() });
            info!(stage = stage.name(), molecules = system.molecules().len(), "Running stage.");

            match stage.scope() {
                Scope::Molecule => {
                    apply_per_molecule(stage.as_ref(), system, &self.executor, reporter)?
                }
                Scope::System => stage.run_system(system, &self.executor, reporter)?,
            }

            reporter.report(Progress::StageFinish);
        }
        Ok(())
    }
}
