use super::attribute::Attribute;
use super::ids::AtomId;
use std::collections::BTreeMap;

/// Returns the pair with the smaller identifier first.
pub fn ordered_pair(a: AtomId, b: AtomId) -> (AtomId, AtomId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// An undirected edge of a molecular graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bond {
    pub atom1_id: AtomId, // always the smaller id
    pub atom2_id: AtomId,
    /// Measured length in nm; `None` when either atom had no coordinates.
    pub distance: Option<f64>,
}

impl Bond {
    pub fn new(atom1_id: AtomId, atom2_id: AtomId, distance: Option<f64>) -> Self {
        let (atom1_id, atom2_id) = ordered_pair(atom1_id, atom2_id);
        Self {
            atom1_id,
            atom2_id,
            distance,
        }
    }

    pub fn key(&self) -> (AtomId, AtomId) {
        (self.atom1_id, self.atom2_id)
    }

    pub fn contains(&self, atom_id: AtomId) -> bool {
        self.atom1_id == atom_id || self.atom2_id == atom_id
    }
}

/// A topological term between atoms (bond, angle, virtual site, ...).
///
/// The order of the atoms is significant. Interactions are immutable once
/// created; renumbering produces a new record.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    atoms: Vec<AtomId>,
    parameters: Vec<String>,
    meta: BTreeMap<String, Attribute>,
}

impl Interaction {
    pub fn new(
        atoms: Vec<AtomId>,
        parameters: Vec<String>,
        meta: BTreeMap<String, Attribute>,
    ) -> Self {
        Self {
            atoms,
            parameters,
            meta,
        }
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn meta(&self) -> &BTreeMap<String, Attribute> {
        &self.meta
    }

    pub fn involves(&self, id: AtomId) -> bool {
        self.atoms.contains(&id)
    }

    /// Returns a copy of the interaction with every atom id passed through `map`.
    ///
    /// Returns `None` as soon as `map` has no image for one of the atoms.
    pub fn remapped(&self, map: impl FnMut(AtomId) -> Option<AtomId>) -> Option<Self> {
        Some(Self {
            atoms: self.atoms.iter().copied().map(map).collect::<Option<_>>()?,
            parameters: self.parameters.clone(),
            meta: self.meta.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bond_new_orders_atom_ids() {
        let bond = Bond::new(AtomId(5), AtomId(2), Some(0.15));
        assert_eq!(bond.atom1_id, AtomId(2));
        assert_eq!(bond.atom2_id, AtomId(5));
        assert_eq!(bond.key(), (AtomId(2), AtomId(5)));
        assert_eq!(bond.distance, Some(0.15));
    }

    #[test]
    fn bond_contains_returns_true_for_both_atoms() {
        let bond = Bond::new(AtomId(10), AtomId(20), None);
        assert!(bond.contains(AtomId(10)));
        assert!(bond.contains(AtomId(20)));
        assert!(!bond.contains(AtomId(30)));
    }

    #[test]
    fn ordered_pair_is_symmetric() {
        assert_eq!(ordered_pair(AtomId(1), AtomId(9)), ordered_pair(AtomId(9), AtomId(1)));
    }

    #[test]
    fn interaction_preserves_atom_order() {
        let interaction = Interaction::new(
            vec![AtomId(9), AtomId(3)],
            vec!["1".to_string()],
            BTreeMap::new(),
        );
        assert_eq!(interaction.atoms(), &[AtomId(9), AtomId(3)]);
        assert_eq!(interaction.parameters(), &["1".to_string()]);
    }

    #[test]
    fn remapped_interaction_keeps_parameters_and_meta() {
        let mut meta = BTreeMap::new();
        meta.insert("go_vs".to_string(), Attribute::Bool(true));
        let interaction = Interaction::new(vec![AtomId(0), AtomId(1)], vec!["1".into()], meta);

        let shifted = interaction.remapped(|id| Some(AtomId(id.0 + 100))).unwrap();

        assert_eq!(shifted.atoms(), &[AtomId(100), AtomId(101)]);
        assert_eq!(shifted.parameters(), interaction.parameters());
        assert_eq!(shifted.meta(), interaction.meta());
        assert_eq!(interaction.atoms(), &[AtomId(0), AtomId(1)]);
    }

    #[test]
    fn remapping_fails_when_an_atom_has_no_image() {
        let interaction = Interaction::new(vec![AtomId(0), AtomId(7)], Vec::new(), BTreeMap::new());

        assert!(interaction.remapped(|id| (id.0 < 5).then_some(id)).is_none());
        assert!(interaction.involves(AtomId(7)));
        assert!(!interaction.involves(AtomId(1)));
    }
}
