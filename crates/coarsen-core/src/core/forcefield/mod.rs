//! # Force Field Module
//!
//! The repository of reference topologies the transformation passes consult.
//!
//! ## Overview
//!
//! A [`ForceField`] maps residue names to reference [`Block`]s and holds an
//! ordered list of [`Link`] rules. Blocks drive name-based bond inference;
//! links declare *features* that later stages query. Force fields are read
//! from directories through a [`ParserRegistry`] that dispatches files to
//! format-specific parsers by extension, so the passes never depend on a file
//! format.
//!
//! ## Key Components
//!
//! - [`block`] - Reference residue graphs and their known non-edges
//! - [`link`] - Rewrite rules tagged with features
//! - [`repository`] - `ForceField` and the name-keyed `ForceFieldCollection`
//! - [`parser`] - The pluggable parser trait and registry
//! - [`toml_format`] - The built-in TOML force-field format
//!
//! ## Usage
//!
//! ```ignore
//! use coarsen::core::forcefield::ForceFieldCollection;
//!
//! let force_fields = ForceFieldCollection::load(Path::new("data/force_fields"))?;
//! let universal = force_fields.get("universal")?;
//! let alanine = universal.get_block("ALA")?;
//! ```

pub mod block;
pub mod error;
pub mod link;
pub mod parser;
pub mod repository;
pub mod toml_format;

pub use block::Block;
pub use error::ForceFieldError;
pub use link::Link;
pub use parser::{ForceFieldParser, ParserRegistry};
pub use repository::{ForceField, ForceFieldCollection};
