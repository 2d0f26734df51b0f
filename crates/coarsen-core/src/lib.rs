//! # Coarsen Core Library
//!
//! Force-field driven bond inference and graph transformations that turn an
//! atomistic molecular structure into a coarse-grained one.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Molecule`, `System`),
//!   the force-field repository of reference blocks and links, the k-d tree
//!   spatial index, and the bond-inference algorithms.
//!
//! - **[`engine`]: The Execution Model.** Processors are composable graph
//!   transformations acting on one molecule or on a whole system. The engine
//!   runs them in order, either sequentially or on a bounded worker pool, and
//!   owns the fuse/split logic that lets bond inference see bonds between
//!   molecules.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures that resolve
//!   the force field, assemble the pipeline from a configuration, and run it.

pub mod core;
pub mod engine;
pub mod workflows;
