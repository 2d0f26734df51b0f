use crate::core::bonding::BondingOptions;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_MOLTYPE_PREFIX: &str = "molecule";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{parameter}': {message}")]
    InvalidValue {
        parameter: &'static str,
        message: String,
    },

    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration '{path}': {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings of the virtual-site augmentation pass.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct VirtualSiteConfig {
    /// Topology sections that receive an include line.
    pub sections: Vec<String>,
    /// Atom name of the backbone beads a site is placed on.
    pub backbone: String,
    /// Atom name given to the virtual sites.
    pub atom_name: String,
    /// Charge given to the virtual sites.
    pub charge: f64,
}

impl Default for VirtualSiteConfig {
    fn default() -> Self {
        Self {
            sections: vec!["exclusions".to_string()],
            backbone: "BB".to_string(),
            atom_name: "CA".to_string(),
            charge: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Name of the force field, looked up in the loaded collection.
    pub force_field: String,
    /// Degree of parallelism; 1 or less runs sequentially.
    pub workers: usize,
    pub bonding: BondingOptions,
    pub moltype_prefix: String,
    /// Augmentation with virtual sites; skipped when `None`.
    pub virtual_sites: Option<VirtualSiteConfig>,
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }

    /// Reads a pipeline configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, and a parsing
    /// or validation error if its content is not a valid configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let origin = path.to_string_lossy().to_string();
        debug!(path = %origin, "Loading pipeline configuration.");
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: origin.clone(),
            source,
        })?;
        Self::parse(&content, origin)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<string>".to_string())
    }

    fn parse(content: &str, origin: String) -> Result<Self, ConfigError> {
        let file: FilePipelineConfig =
            toml::from_str(content).map_err(|source| ConfigError::Toml {
                path: origin,
                source,
            })?;
        file.into_builder().build()
    }
}

#[derive(Default)]
pub struct PipelineConfigBuilder {
    force_field: Option<String>,
    workers: Option<usize>,
    bonding: Option<BondingOptions>,
    moltype_prefix: Option<String>,
    virtual_sites: Option<VirtualSiteConfig>,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn force_field(mut self, name: &str) -> Self {
        self.force_field = Some(name.to_string());
        self
    }
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }
    pub fn bonding(mut self, bonding: BondingOptions) -> Self {
        self.bonding = Some(bonding);
        self
    }
    pub fn moltype_prefix(mut self, prefix: &str) -> Self {
        self.moltype_prefix = Some(prefix.to_string());
        self
    }
    pub fn virtual_sites(mut self, config: VirtualSiteConfig) -> Self {
        self.virtual_sites = Some(config);
        self
    }

    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let bonding = self.bonding.unwrap_or_default();
        if !bonding.fudge.is_finite() || bonding.fudge <= 0.0 {
            return Err(ConfigError::InvalidValue {
                parameter: "fudge",
                message: format!("expected a positive number, got {}", bonding.fudge),
            });
        }

        let moltype_prefix = self
            .moltype_prefix
            .unwrap_or_else(|| DEFAULT_MOLTYPE_PREFIX.to_string());
        if moltype_prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                parameter: "moltype_prefix",
                message: "must not be empty".to_string(),
            });
        }

        if let Some(virtual_sites) = &self.virtual_sites {
            if virtual_sites.backbone.is_empty() {
                return Err(ConfigError::InvalidValue {
                    parameter: "virtual_sites.backbone",
                    message: "must not be empty".to_string(),
                });
            }
        }

        Ok(PipelineConfig {
            force_field: self
                .force_field
                .ok_or(ConfigError::MissingParameter("force_field"))?,
            workers: self.workers.unwrap_or(1),
            bonding,
            moltype_prefix,
            virtual_sites: self.virtual_sites,
        })
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct FilePipelineConfig {
    force_field: Option<String>,
    workers: Option<usize>,
    bonding: Option<BondingOptions>,
    moltype_prefix: Option<String>,
    virtual_sites: Option<VirtualSiteConfig>,
}

impl FilePipelineConfig {
    fn into_builder(self) -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            force_field: self.force_field,
            workers: self.workers,
            bonding: self.bonding,
            moltype_prefix: self.moltype_prefix,
            virtual_sites: self.virtual_sites,
        }
    }
}
