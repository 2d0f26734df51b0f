use super::block::Block;
use super::error::ForceFieldError;
use super::link::Link;
use super::parser::ForceFieldParser;
use super::repository::ForceField;
use crate::core::models::attribute::Attribute;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct FileForceField {
    #[serde(default)]
    blocks: BTreeMap<String, FileBlock>,
    #[serde(default)]
    links: Vec<FileLink>,
    #[serde(default)]
    modifications: Vec<FileLink>,
    #[serde(default, rename = "renamed-residues")]
    renamed_residues: BTreeMap<String, String>,
    #[serde(default)]
    variables: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileBlock {
    atoms: Vec<String>,
    #[serde(default)]
    edges: Vec<(String, String)>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileLink {
    name: Option<String>,
    #[serde(default)]
    features: Vec<String>,
    #[serde(default)]
    atoms: Vec<String>,
    #[serde(default)]
    edges: Vec<(String, String)>,
}

/// Reads force fields written as TOML tables of blocks and an array of links.
///
/// ```toml
/// [blocks.ALA]
/// atoms = ["N", "CA", "C", "O", "CB"]
/// edges = [["N", "CA"], ["CA", "C"], ["C", "O"], ["CA", "CB"]]
///
/// [[links]]
/// name = "peptide-bond"
/// features = ["scfix"]
/// atoms = ["C", "+N"]
/// edges = [["C", "+N"]]
///
/// [[modifications]]
/// name = "C-ter"
/// atoms = ["C", "OXT"]
/// edges = [["C", "OXT"]]
///
/// [renamed-residues]
/// HSD = "HIS"
///
/// [variables]
/// elastic_network_bond_type = 6
/// ```
pub struct TomlParser;

impl FileLink {
    fn into_link(self, path: &Path) -> Result<Link, ForceFieldError> {
        for (first, second) in &self.edges {
            if !self.atoms.contains(first) || !self.atoms.contains(second) {
                return Err(ForceFieldError::Format {
                    path: path.to_string_lossy().to_string(),
                    message: format!("edge {first}-{second} references an undeclared atom"),
                });
            }
        }
        Ok(Link {
            name: self.name,
            features: self.features.into_iter().collect(),
            atoms: self.atoms,
            edges: self.edges,
        })
    }
}

fn attribute_from(value: toml::Value) -> Attribute {
    match value {
        toml::Value::Boolean(value) => Attribute::Bool(value),
        toml::Value::Integer(value) => Attribute::Integer(value),
        toml::Value::Float(value) => Attribute::Float(value),
        toml::Value::String(value) => Attribute::Text(value),
        other => Attribute::Text(other.to_string()),
    }
}

impl ForceFieldParser for TomlParser {
    fn extension(&self) -> &'static str {
        "toml"
    }

    fn parse(
        &self,
        content: &str,
        path: &Path,
        force_field: &mut ForceField,
    ) -> Result<(), ForceFieldError> {
        let path_str = || path.to_string_lossy().to_string();
        let file: FileForceField = toml::from_str(content).map_err(|e| ForceFieldError::Toml {
            path: path_str(),
            source: e,
        })?;

        for (name, file_block) in file.blocks {
            let mut block = Block::new(&name);
            for atom in &file_block.atoms {
                block.add_atom(atom);
            }
            for (first, second) in &file_block.edges {
                block.add_edge(first, second).ok_or_else(|| ForceFieldError::Format {
                    path: path_str(),
                    message: format!("block {name} has an invalid edge {first}-{second}"),
                })?;
            }
            force_field.add_block(block);
        }

        for file_link in file.links {
            force_field.add_link(file_link.into_link(path)?);
        }
        for file_modification in file.modifications {
            force_field.add_modification(file_modification.into_link(path)?);
        }
        for (from, to) in &file.renamed_residues {
            force_field.rename_residue(from, to);
        }
        for (name, value) in file.variables {
            force_field.set_variable(&name, attribute_from(value));
        }

        Ok(())
    }
}
