use serde_json::Value;
use thiserror::Error;

/// Errors raised while turning untyped configuration into a field mapping.
///
/// These are setup errors: a mapping that decodes successfully never fails
/// at projection time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("incorrect spec for field '{field}': must be a path or a (path, transformer) pair, got {spec}")]
    MalformedSpec { field: String, spec: Value },

    #[error("incorrect path key for field '{field}': must be a string or an integer, got {key}")]
    MalformedKey { field: String, key: Value },

    #[error("unknown transformer '{name}' for field '{field}'")]
    UnknownTransformer { field: String, name: String },

    #[error("field mapping must be a JSON object, got {found}")]
    NotAMapping { found: Value },
}

impl ConfigError {
    /// The output field this error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::MalformedSpec { field, .. }
            | ConfigError::MalformedKey { field, .. }
            | ConfigError::UnknownTransformer { field, .. } => Some(field),
            ConfigError::NotAMapping { .. } => None,
        }
    }
}
