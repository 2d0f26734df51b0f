//! # Core Module
//!
//! The stateless foundation of the library: molecular graphs, the force-field
//! repository, spatial queries, and the bond-inference algorithms.
//!
//! ## Overview
//!
//! Nothing in this module knows about pipelines or worker pools. Every
//! operation takes the data it works on explicitly, which lets the
//! [`crate::engine`] layer decide whether a molecule is processed alone, in
//! parallel with its siblings, or as part of a fused graph.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, bonds, interactions, molecules and systems
//! - **Reference Topologies** ([`forcefield`]) - Blocks and links keyed by residue name
//! - **Spatial Queries** ([`spatial`]) - A k-d tree answering all-pairs-within-radius queries
//! - **Bond Inference** ([`bonding`]) - Name matching against blocks with a distance fallback

pub mod bonding;
pub mod forcefield;
pub mod models;
pub mod spatial;
