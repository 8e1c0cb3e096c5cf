use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider has nothing to work from, such as a tag cloud without a corpus.
    Unavailable { provider: String, reason: String },
    /// The document cannot be handled by this provider.
    InvalidDocument { provider: String, reason: String },
}

impl ProviderError {
    pub fn provider(&self) -> &str {
        match self {
            ProviderError::Unavailable { provider, .. }
            | ProviderError::InvalidDocument { provider, .. } => provider,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Unavailable { provider, reason } => {
                write!(f, "tag provider '{provider}' is unavailable: {reason}")
            }
            ProviderError::InvalidDocument { provider, reason } => {
                write!(f, "tag provider '{provider}' rejected the document: {reason}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    InvalidWeight {
        index: usize,
        weight: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read suggester config {}: {source}", path.display())
            }
            ConfigError::Parse(err) => write!(f, "failed to parse suggester config: {err}"),
            ConfigError::InvalidWeight { index, weight } => write!(
                f,
                "provider #{index} has weight {weight}, expected a finite non-negative number"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(err) => Some(err),
            ConfigError::InvalidWeight { .. } => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}
