//! # Engine Module
//!
//! The execution model that applies ordered graph transformations to a
//! system of molecules.
//!
//! ## Overview
//!
//! A [`processor::Processor`] is one pipeline stage. Each stage declares a
//! [`processor::Scope`]: per-molecule stages are handed one molecule at a
//! time and may run on a worker pool, while system-wide stages see every
//! molecule at once. A [`pipeline::Pipeline`] runs its stages in order over
//! one [`executor::Executor`], which decides between sequential execution
//! and a bounded pool of worker threads.
//!
//! Bond inference is the one built-in system-wide stage: on the sequential
//! path it fuses all molecules ([`partition`]) so bonds between molecules
//! can be found, then splits the graph again along its connected
//! components.
//!
//! ## Key Components
//!
//! - [`config`] - Pipeline configuration, from a builder or a TOML file
//! - [`executor`] - Sequential or worker-pool dispatch of molecules
//! - [`processor`] - The stage contract and the per-molecule driver
//! - [`partition`] - Fusing molecules and splitting them by residue-contracted components
//! - [`processors`] - Built-in stages (bond inference, type naming, virtual Go sites)
//! - [`pipeline`] - Ordered execution of stages with progress reporting
//! - [`progress`] - Callback based progress events
//! - [`error`] - The error type shared by every stage

pub mod config;
pub mod error;
pub mod executor;
pub mod partition;
pub mod pipeline;
pub mod processor;
pub mod processors;
pub mod progress;
