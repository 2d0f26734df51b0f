use std::fmt;

/// Identifier of an atom, unique within the molecule that owns it.
///
/// Identifiers are plain ordinals so that fused graphs can be renumbered
/// deterministically and split molecules can be ordered by their lowest atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AtomId(pub usize);

impl AtomId {
    pub fn index(self) -> usize {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<usize> for AtomId {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
