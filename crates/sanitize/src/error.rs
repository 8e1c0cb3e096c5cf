use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterError {
    /// The filter was applied to a text or comment node. Only the document envelope and elements
    /// can be filtered; "not allow-listed" is reported as `Ok(None)`, never as an error.
    NotATagNode { kind: &'static str },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::NotATagNode { kind } => {
                write!(f, "allow-list filter applied to a {kind} node, expected a tag node")
            }
        }
    }
}

impl std::error::Error for FilterError {}

/// A value the normalizer could not decode. The filter logs it and screens the raw value instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizationError {
    pub message: String,
}

impl fmt::Display for NormalizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attribute value normalization failed: {}", self.message)
    }
}

impl std::error::Error for NormalizationError {}

impl From<html::CharacterReferenceError> for NormalizationError {
    fn from(err: html::CharacterReferenceError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    EmptyElementName {
        index: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read allow-list config {}: {source}", path.display())
            }
            ConfigError::Parse(err) => write!(f, "failed to parse allow-list config: {err}"),
            ConfigError::EmptyElementName { index } => {
                write!(f, "allow-list element #{index} has an empty name")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(err) => Some(err),
            ConfigError::EmptyElementName { .. } => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}
