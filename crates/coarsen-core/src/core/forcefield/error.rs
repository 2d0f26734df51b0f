use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForceFieldError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Malformed force field file '{path}': {message}")]
    Format { path: String, message: String },
    #[error("Residue {block} is not known to force field {force_field}")]
    BlockNotFound { block: String, force_field: String },
    #[error("Unknown force field \"{name}\"")]
    UnknownForceField { name: String },
}
