use itertools::Itertools;
use std::collections::BTreeSet;

/// The reference topology of one residue.
///
/// A block only knows atom names and which of them are bonded. Its edges are
/// ground truth: every edge is added to matching residues, and every pair of
/// block atoms that is *not* an edge is known never to be bonded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    name: String,
    atoms: Vec<String>,
    edges: BTreeSet<(usize, usize)>,
}

impl Block {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds an atom name to the block; adding a known name is a no-op.
    ///
    /// # Return
    ///
    /// The index of the atom within the block.
    pub fn add_atom(&mut self, name: &str) -> usize {
        match self.index_of(name) {
            Some(index) => index,
            None => {
                self.atoms.push(name.to_string());
                self.atoms.len() - 1
            }
        }
    }

    /// Adds an edge between two atom names already present in the block.
    ///
    /// # Return
    ///
    /// Returns `None` if either name is unknown or both names are the same.
    pub fn add_edge(&mut self, first: &str, second: &str) -> Option<()> {
        let a = self.index_of(first)?;
        let b = self.index_of(second)?;
        if a == b {
            return None;
        }
        self.edges.insert((a.min(b), a.max(b)));
        Some(())
    }

    pub fn atom_names(&self) -> &[String] {
        &self.atoms
    }

    pub fn contains_atom(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn has_edge(&self, first: &str, second: &str) -> bool {
        match (self.index_of(first), self.index_of(second)) {
            (Some(a), Some(b)) => self.edges.contains(&(a.min(b), a.max(b))),
            _ => false,
        }
    }

    /// Returns the bonded pairs of atom names.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges
            .iter()
            .map(|&(a, b)| (self.atoms[a].as_str(), self.atoms[b].as_str()))
    }

    /// Returns every pair of atom names that is not bonded in the block.
    pub fn non_edges(&self) -> impl Iterator<Item = (&str, &str)> {
        (0..self.atoms.len())
            .tuple_combinations()
            .filter(|pair| !self.edges.contains(pair))
            .map(|(a, b)| (self.atoms[a].as_str(), self.atoms[b].as_str()))
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.atoms.iter().position(|atom| atom == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alanine() -> Block {
        let mut block = Block::new("ALA");
        for name in ["N", "CA", "C", "O", "CB"] {
            block.add_atom(name);
        }
        block.add_edge("N", "CA").unwrap();
        block.add_edge("CA", "C").unwrap();
        block.add_edge("C", "O").unwrap();
        block.add_edge("CB", "CA").unwrap();
        block
    }

    #[test]
    fn add_atom_is_idempotent() {
        let mut block = alanine();
        assert_eq!(block.add_atom("CA"), 1);
        assert_eq!(block.atom_names().len(), 5);
    }

    #[test]
    fn add_edge_rejects_unknown_and_self_edges() {
        let mut block = alanine();
        assert!(block.add_edge("N", "XX").is_none());
        assert!(block.add_edge("N", "N").is_none());
    }

    #[test]
    fn edges_are_symmetric() {
        let block = alanine();
        assert!(block.has_edge("CA", "CB"));
        assert!(block.has_edge("CB", "CA"));
        assert!(!block.has_edge("N", "C"));
        assert!(!block.has_edge("N", "missing"));
        assert_eq!(block.edges().count(), 4);
    }

    #[test]
    fn non_edges_complete_the_pair_set() {
        let block = alanine();
        let non_edges: Vec<_> = block.non_edges().collect();

        // 5 atoms give 10 pairs, 4 of which are edges.
        assert_eq!(non_edges.len(), 6);
        assert!(non_edges.contains(&("N", "C")));
        assert!(non_edges.contains(&("O", "CB")));
        assert!(!non_edges.contains(&("N", "CA")));
    }
}
