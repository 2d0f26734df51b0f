use std::collections::BTreeSet;

/// A declarative graph-rewrite rule spanning residues.
///
/// Links are applied by stages outside the bond-inference core; the
/// repository only needs to answer which features they declare.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    pub name: Option<String>,
    pub features: BTreeSet<String>,
    pub atoms: Vec<String>,
    pub edges: Vec<(String, String)>,
}

impl Link {
    pub fn new(name: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn with_feature(mut self, feature: &str) -> Self {
        self.features.insert(feature.to_string());
        self
    }
}
