use super::error::EngineError;
use crate::core::models::molecule::Molecule;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::trace;
#[cfg(not(feature = "parallel"))]
use tracing::warn;

/// Dispatches independent per-molecule work, sequentially or on a bounded
/// worker pool.
///
/// Each molecule is moved into exactly one task, so no two workers ever
/// touch the same molecule. Results come back in input order whatever the
/// completion order was.
pub struct Executor {
    workers: usize,
    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
}

impl Executor {
    /// Creates an executor with the given degree of parallelism.
    ///
    /// A degree of 1 or less runs everything on the calling thread. Without
    /// the `parallel` feature every degree runs sequentially.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::WorkerPool`] if the worker threads cannot be spawned.
    pub fn new(workers: usize) -> Result<Self, EngineError> {
        #[cfg(feature = "parallel")]
        {
            let pool = if workers > 1 {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|index| format!("coarsen-worker-{index}"))
                    .build()
                    .map_err(|e| EngineError::WorkerPool(e.to_string()))?;
                Some(pool)
            } else {
                None
            };
            Ok(Self { workers, pool })
        }

        #[cfg(not(feature = "parallel"))]
        {
            if workers > 1 {
                warn!(
                    workers,
                    "Built without the 'parallel' feature; molecules are processed sequentially."
                );
            }
            Ok(Self { workers })
        }
    }

    pub fn sequential() -> Self {
        Self {
            workers: 1,
            #[cfg(feature = "parallel")]
            pool: None,
        }
    }

    /// The configured degree of parallelism.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Whether work is actually dispatched to a worker pool.
    pub fn is_parallel(&self) -> bool {
        #[cfg(feature = "parallel")]
        {
            self.pool.is_some()
        }
        #[cfg(not(feature = "parallel"))]
        {
            false
        }
    }

    /// Applies `task` to every molecule and collects the results in input order.
    ///
    /// The task receives the position of the molecule in the input. The first
    /// error aborts the map; remaining molecules may or may not have been
    /// processed.
    pub fn map_molecules<F>(&self, molecules: Vec<Molecule>, task: F) -> Result<Vec<Molecule>, EngineError>
    where
        F: Fn(usize, Molecule) -> Result<Molecule, EngineError> + Send + Sync,
    {
        trace!(molecules = molecules.len(), parallel = self.is_parallel(), "Dispatching molecules.");

        #[cfg(feature = "parallel")]
        if let Some(pool) = &self.pool {
            return pool.install(|| {
                molecules
                    .into_par_iter()
                    .enumerate()
                    .map(|(index, molecule)| task(index, molecule))
                    .collect()
            });
        }

        molecules
            .into_iter()
            .enumerate()
            .map(|(index, molecule)| task(index, molecule))
            .collect()
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::sequential()
    }
}
