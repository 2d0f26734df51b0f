use thiserror::Error;

use super::config::ConfigError;
use crate::core::forcefield::ForceFieldError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Force field error: {source}")]
    ForceField {
        #[from]
        source: ForceFieldError,
    },

    #[error("Molecule {index} has no molecule type name; stage '{stage}' requires one")]
    MissingMoleculeType { stage: &'static str, index: usize },

    #[error("Stage '{stage}' requires a force field but none is assigned to the system")]
    MissingForceField { stage: &'static str },

    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    #[error("Internal logic error: {0}")]
    Internal(String),
}
