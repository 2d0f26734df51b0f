use super::block::Block;
use super::error::ForceFieldError;
use super::link::Link;
use super::parser::ParserRegistry;
use crate::core::models::attribute::Attribute;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// A named repository of reference blocks and link rules.
///
/// Besides blocks and links, parsers may record modifications (rules with
/// the same shape as links), residue renames and free-form variables. The
/// bonding passes do not read those; they are kept for later stages.
///
/// Once a pipeline starts, a force field is only read, and it is shared
/// between molecules (and worker threads) through an [`Arc`].
#[derive(Debug, Clone, Default)]
pub struct ForceField {
    name: String,
    blocks: HashMap<String, Block>,
    links: Vec<Link>,
    modifications: Vec<Link>,
    renamed_residues: BTreeMap<String, String>,
    variables: BTreeMap<String, Attribute>,
}

impl ForceField {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Loads a force field from a directory, naming it after the directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or one of its files cannot be read
    /// or parsed.
    pub fn load(directory: &Path, registry: &ParserRegistry) -> Result<Self, ForceFieldError> {
        let name = directory
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let mut force_field = Self::new(&name);
        force_field.read_from(directory, registry)?;
        Ok(force_field)
    }

    /// Populates or updates the force field from the files of a directory.
    ///
    /// Blocks, renames and variables with a known name are replaced; links
    /// and modifications are appended.
    pub fn read_from(&mut self, directory: &Path, registry: &ParserRegistry) -> Result<(), ForceFieldError> {
        for file in registry.files_in(directory)? {
            debug!(force_field = %self.name, file = %file.display(), "Reading force field file.");
            registry.read_file(&file, self)?;
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_block(&mut self, block: Block) {
        self.blocks.insert(block.name().to_string(), block);
    }

    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }

    pub fn add_modification(&mut self, modification: Link) {
        self.modifications.push(modification);
    }

    pub fn rename_residue(&mut self, from: &str, to: &str) {
        self.renamed_residues.insert(from.to_string(), to.to_string());
    }

    pub fn set_variable(&mut self, name: &str, value: Attribute) {
        self.variables.insert(name.to_string(), value);
    }

    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks.get(name)
    }

    /// Looks up the block for a residue name.
    ///
    /// # Errors
    ///
    /// Returns [`ForceFieldError::BlockNotFound`] if no block has that name.
    pub fn get_block(&self, name: &str) -> Result<&Block, ForceFieldError> {
        self.blocks
            .get(name)
            .ok_or_else(|| ForceFieldError::BlockNotFound {
                block: name.to_string(),
                force_field: self.name.clone(),
            })
    }

    pub fn blocks_iter(&self) -> impl Iterator<Item = (&str, &Block)> {
        self.blocks.iter().map(|(name, block)| (name.as_str(), block))
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn modifications(&self) -> &[Link] {
        &self.modifications
    }

    pub fn renamed_residue(&self, name: &str) -> Option<&str> {
        self.renamed_residues.get(name).map(String::as_str)
    }

    pub fn renamed_residues(&self) -> &BTreeMap<String, String> {
        &self.renamed_residues
    }

    pub fn variable(&self, name: &str) -> Option<&Attribute> {
        self.variables.get(name)
    }

    pub fn variables(&self) -> &BTreeMap<String, Attribute> {
        &self.variables
    }

    /// The union of the features declared by the links.
    pub fn features(&self) -> BTreeSet<&str> {
        self.links
            .iter()
            .flat_map(|link| link.features.iter().map(String::as_str))
            .collect()
    }

    pub fn has_feature(&self, feature: &str) -> bool {
        self.links.iter().any(|link| link.features.contains(feature))
    }
}

/// All force fields found under a data directory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ForceFieldCollection {
    force_fields: BTreeMap<String, Arc<ForceField>>,
}

impl ForceFieldCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every force field under `directory` with the built-in parsers.
    pub fn load(directory: &Path) -> Result<Self, ForceFieldError> {
        let mut collection = Self::new();
        collection.read_from(directory, &ParserRegistry::default())?;
        Ok(collection)
    }

    /// Reads or updates the force fields found under `directory`.
    ///
    /// Every sub-directory holding at least one recognized file is a force
    /// field named after the sub-directory. Sub-directories are visited in
    /// sorted order, and a name that is already known is updated in place
    /// rather than replaced, so repeated loads merge.
    ///
    /// # Errors
    ///
    /// Returns the first I/O or parsing error; force fields read before the
    /// failure stay in the collection.
    pub fn read_from(&mut self, directory: &Path, registry: &ParserRegistry) -> Result<(), ForceFieldError> {
        let io_error = |source| ForceFieldError::Io {
            path: directory.to_string_lossy().to_string(),
            source,
        };
        let mut candidates = Vec::new();
        for entry in std::fs::read_dir(directory).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.is_dir() {
                candidates.push(path);
            }
        }
        candidates.sort();

        for path in candidates {
            if registry.files_in(&path)?.is_empty() {
                continue;
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            match self.force_fields.get_mut(&name) {
                Some(existing) => Arc::make_mut(existing).read_from(&path, registry)?,
                None => {
                    let force_field = ForceField::load(&path, registry)?;
                    self.force_fields.insert(name, Arc::new(force_field));
                }
            }
        }
        Ok(())
    }

    pub fn insert(&mut self, force_field: ForceField) {
        self.force_fields
            .insert(force_field.name().to_string(), Arc::new(force_field));
    }

    /// Returns a shared handle to a force field.
    ///
    /// # Errors
    ///
    /// Returns [`ForceFieldError::UnknownForceField`] if the name is not known.
    pub fn get(&self, name: &str) -> Result<Arc<ForceField>, ForceFieldError> {
        self.force_fields
            .get(name)
            .cloned()
            .ok_or_else(|| ForceFieldError::UnknownForceField {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.force_fields.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.force_fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.force_fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.force_fields.is_empty()
    }
}
