use super::attribute::Attribute;
use super::ids::AtomId;
use super::residue::ResidueKey;
use nalgebra::{Point3, Vector3};
use std::collections::BTreeMap;
use std::fmt;

/// Where an atom's coordinates come from.
///
/// Virtual sites do not own coordinates; they refer to the atom they sit on
/// so that moving the source atom moves the site as well. The reference is
/// scoped to the owning molecule and is rewritten whenever atoms are
/// renumbered or removed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Position {
    /// Coordinates in nanometers.
    Absolute(Point3<f64>),
    /// Shares the coordinates of another atom of the same molecule.
    Aliased(AtomId),
    /// No coordinates are known (e.g. reference topologies).
    #[default]
    Unknown,
}

impl Position {
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    pub fn alias_target(&self) -> Option<AtomId> {
        match self {
            Self::Aliased(target) => Some(*target),
            _ => None,
        }
    }
}

impl From<Point3<f64>> for Position {
    fn from(point: Point3<f64>) -> Self {
        Self::Absolute(point)
    }
}

/// A node of a molecular graph.
///
/// The fields read by the transformation passes are typed; anything else a
/// reader or a force field attaches goes into `extra`.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The atom name (e.g. "CA", "BB").
    pub name: String,
    /// The chemical element symbol, if known.
    pub element: Option<String>,
    /// The name of the residue the atom belongs to.
    pub residue_name: String,
    /// The residue number as found in the input structure.
    pub residue_number: i64,
    /// The chain identifier; empty when the input has no chains.
    pub chain: String,
    /// The coordinates of the atom.
    pub position: Position,
    /// The velocity in nm/ps, when the input provides one.
    pub velocity: Option<Vector3<f64>>,
    /// The partial charge in elementary charge units.
    pub charge: Option<f64>,
    /// The charge group (exclusion group) the atom belongs to.
    pub charge_group: Option<u32>,
    /// Index of the molecule the atom came from, set before molecules are fused.
    pub molecule_index: Option<usize>,
    /// The force field particle type.
    pub atom_type: Option<String>,
    /// Force-field specific attributes the core does not interpret.
    pub extra: BTreeMap<String, Attribute>,
}

impl Atom {
    /// Creates a new `Atom` with the residue information every reader provides.
    ///
    /// All optional attributes start empty and the position is unknown.
    ///
    /// # Arguments
    ///
    /// * `name` - The atom name.
    /// * `residue_name` - The name of the parent residue.
    /// * `residue_number` - The number of the parent residue.
    /// * `chain` - The chain identifier.
    pub fn new(name: &str, residue_name: &str, residue_number: i64, chain: &str) -> Self {
        Self {
            name: name.to_string(),
            element: None,
            residue_name: residue_name.to_string(),
            residue_number,
            chain: chain.to_string(),
            position: Position::Unknown,
            velocity: None,
            charge: None,
            charge_group: None,
            molecule_index: None,
            atom_type: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_element(mut self, element: &str) -> Self {
        self.element = Some(element.to_string());
        self
    }

    pub fn with_position(mut self, position: Point3<f64>) -> Self {
        self.position = Position::Absolute(position);
        self
    }

    /// Returns the key identifying the exact residue instance of this atom.
    pub fn residue_key(&self) -> ResidueKey {
        ResidueKey {
            molecule_index: self.molecule_index,
            chain: self.chain.clone(),
            residue_number: self.residue_number,
            residue_name: self.residue_name.clone(),
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}{}:{}",
            self.chain, self.residue_name, self.residue_number, self.name
        )
    }
}
