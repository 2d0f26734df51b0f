//! # Core Models Module
//!
//! Data structures representing molecular graphs.
//!
//! ## Overview
//!
//! A [`system::System`] owns an ordered list of [`molecule::Molecule`] graphs and
//! the force field they share. Molecules are mutable attributed graphs: atoms
//! are nodes keyed by [`ids::AtomId`], bonds are undirected edges, and typed
//! interactions plus a metadata mapping travel along for the topology writer.
//!
//! ## Key Components
//!
//! - [`atom`] - Atom attributes, including aliased positions for virtual sites
//! - [`attribute`] - Sidecar values for force-field specific extras
//! - [`topology`] - Bonds and interaction records
//! - [`residue`] - The exact residue key used for grouping atoms
//! - [`molecule`] - The molecular graph and its metadata
//! - [`system`] - The ordered set of molecules
//! - [`builder`] - Incremental construction as done by structure readers
//!
//! ## Usage
//!
//! ```ignore
//! use coarsen::core::models::{atom::Atom, molecule::Molecule};
//! use nalgebra::Point3;
//!
//! let mut molecule = Molecule::new();
//! let n = molecule.add_atom(Atom::new("N", "GLY", 1, "A").with_element("N"));
//! let ca = molecule.add_atom(
//!     Atom::new("CA", "GLY", 1, "A").with_position(Point3::new(0.147, 0.0, 0.0)),
//! );
//! molecule.add_bond(n, ca, None);
//! ```

pub mod atom;
pub mod attribute;
pub mod builder;
pub mod ids;
pub mod molecule;
pub mod residue;
pub mod system;
pub mod topology;
