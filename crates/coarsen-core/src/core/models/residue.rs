use std::fmt;

/// Identifies one exact residue instance.
///
/// Two atoms belong to the same residue only when every component matches;
/// atoms that differ in chain or originating molecule are never grouped even
/// when their residue name and number coincide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueKey {
    pub molecule_index: Option<usize>,
    pub chain: String,
    pub residue_number: i64,
    pub residue_name: String,
}

impl fmt::Display for ResidueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}{}",
            self.chain, self.residue_name, self.residue_number
        )
    }
}
