//! # Workflows Module
//!
//! High-level entry points tying the [`crate::core`] and [`crate::engine`]
//! layers together.
//!
//! ## Overview
//!
//! A workflow takes a system as produced by a structure reader, the loaded
//! force fields and a [`crate::engine::config::PipelineConfig`], and runs the
//! whole procedure: force-field resolution, pipeline assembly and execution,
//! and a summary of the result for the caller or a topology writer.
//!
//! - **Preparation Workflow** ([`prepare`]) - Bond inference, molecule type
//!   naming and optional virtual Go sites.
//!
//! ## Usage
//!
//! ```ignore
//! use coarsen::core::forcefield::ForceFieldCollection;
//! use coarsen::engine::config::PipelineConfig;
//! use coarsen::engine::progress::ProgressReporter;
//! use coarsen::workflows::prepare;
//!
//! let force_fields = ForceFieldCollection::load(Path::new("data/force_fields"))?;
//! let config = PipelineConfig::load(Path::new("pipeline.toml"))?;
//! let summary = prepare::run(&mut system, &force_fields, &config, &ProgressReporter::new())?;
//! ```

pub mod prepare;
