use super::error::ForceFieldError;
use super::repository::ForceField;
use super::toml_format::TomlParser;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Reads one force-field file format into a [`ForceField`].
///
/// Parsers add to the instance they receive; they never clear it, so that
/// several files (and several loads) accumulate.
pub trait ForceFieldParser: Send + Sync {
    /// The file extension handled by this parser, without the dot.
    fn extension(&self) -> &'static str;

    /// Parses `content`, read from `path`, into `force_field`.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is malformed. The force field may be
    /// partially updated when an error is returned and must be discarded.
    fn parse(
        &self,
        content: &str,
        path: &Path,
        force_field: &mut ForceField,
    ) -> Result<(), ForceFieldError>;
}

/// Dispatches force-field files to parsers by extension.
pub struct ParserRegistry {
    parsers: BTreeMap<&'static str, Box<dyn ForceFieldParser>>,
}

impl Default for ParserRegistry {
    /// A registry knowing the built-in TOML format.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(TomlParser));
        registry
    }
}

impl ParserRegistry {
    pub fn empty() -> Self {
        Self {
            parsers: BTreeMap::new(),
        }
    }

    /// Registers a parser, replacing any parser for the same extension.
    pub fn register(&mut self, parser: Box<dyn ForceFieldParser>) {
        self.parsers.insert(parser.extension(), parser);
    }

    pub fn parser_for(&self, path: &Path) -> Option<&dyn ForceFieldParser> {
        let extension = path.extension()?.to_str()?;
        self.parsers.get(extension).map(Box::as_ref)
    }

    /// Lists the recognized force-field files of a directory, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn files_in(&self, directory: &Path) -> Result<Vec<PathBuf>, ForceFieldError> {
        let io_error = |source| ForceFieldError::Io {
            path: directory.to_string_lossy().to_string(),
            source,
        };
        let mut files = Vec::new();
        for entry in std::fs::read_dir(directory).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.is_file() && self.parser_for(&path).is_some() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Reads a single file into `force_field` with the matching parser.
    ///
    /// # Errors
    ///
    /// Returns [`ForceFieldError::Format`] if no parser handles the file, or
    /// the I/O or parsing error encountered.
    pub fn read_file(&self, path: &Path, force_field: &mut ForceField) -> Result<(), ForceFieldError> {
        let parser = self.parser_for(path).ok_or_else(|| ForceFieldError::Format {
            path: path.to_string_lossy().to_string(),
            message: "no parser registered for this file extension".to_string(),
        })?;
        let content = std::fs::read_to_string(path).map_err(|e| ForceFieldError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        parser.parse(&content, path, force_field)
    }
}
