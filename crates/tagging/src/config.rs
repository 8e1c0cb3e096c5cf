//! TOML suggester configuration.
//!
//! ```toml
//! limit = 10
//!
//! [[provider]]
//! kind = "keyword"
//! weight = 1.0
//! min_length = 4
//! title_weight = 2.0
//! stop_words = ["hippo"]
//!
//! [[provider]]
//! kind = "tag_cloud"
//! weight = 0.5
//!
//! [[provider]]
//! kind = "static"
//! name = "editorial"
//! weight = 0.25
//! tags = [{ name = "news", score = 2.0 }]
//! ```
//!
//! Without any `[[provider]]` table the keyword and tag cloud providers are used with weight 1.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::collection::TagCollection;
use crate::error::ConfigError;
use crate::provider::{
    DEFAULT_MIN_TERM_LENGTH, DEFAULT_TITLE_WEIGHT, DocumentRef, KeywordProvider, StaticProvider,
    TagCloudProvider, TagProvider,
};
use crate::suggester::{DEFAULT_LIMIT, TagSuggester};
use crate::tag::Tag;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_weight() -> f64 {
    1.0
}

fn default_min_length() -> usize {
    DEFAULT_MIN_TERM_LENGTH
}

fn default_title_weight() -> f64 {
    DEFAULT_TITLE_WEIGHT
}

fn default_static_name() -> String {
    "static".to_string()
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SuggesterConfig {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default, rename = "provider")]
    pub providers: Vec<ProviderConfig>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderConfig {
    Keyword {
        #[serde(default = "default_weight")]
        weight: f64,
        #[serde(default = "default_min_length")]
        min_length: usize,
        #[serde(default = "default_title_weight")]
        title_weight: f64,
        #[serde(default)]
        stop_words: Vec<String>,
    },
    TagCloud {
        #[serde(default = "default_weight")]
        weight: f64,
    },
    Static {
        #[serde(default = "default_weight")]
        weight: f64,
        #[serde(default = "default_static_name")]
        name: String,
        #[serde(default)]
        tags: Vec<Tag>,
    },
}

impl ProviderConfig {
    pub fn weight(&self) -> f64 {
        match self {
            ProviderConfig::Keyword { weight, .. }
            | ProviderConfig::TagCloud { weight }
            | ProviderConfig::Static { weight, .. } => *weight,
        }
    }

    fn build(&self, corpus: &[DocumentRef]) -> Box<dyn TagProvider> {
        match self {
            ProviderConfig::Keyword {
                min_length,
                title_weight,
                stop_words,
                ..
            } => Box::new(
                KeywordProvider::new()
                    .min_length(*min_length)
                    .title_weight(*title_weight)
                    .stop_words(stop_words),
            ),
            ProviderConfig::TagCloud { .. } => Box::new(TagCloudProvider::from_documents(corpus)),
            ProviderConfig::Static { name, tags, .. } => Box::new(StaticProvider::new(
                name.clone(),
                tags.iter().cloned().collect::<TagCollection>(),
            )),
        }
    }
}

impl Default for SuggesterConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            providers: Vec::new(),
        }
    }
}

impl SuggesterConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SuggesterConfig = toml::from_str(content)?;
        for (index, provider) in config.providers.iter().enumerate() {
            let weight = provider.weight();
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidWeight { index, weight });
            }
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Builds the suggester; tag cloud providers count tags over `corpus`.
    pub fn build(&self, corpus: &[DocumentRef]) -> TagSuggester {
        let mut suggester = TagSuggester::new().limit(self.limit);
        if self.providers.is_empty() {
            suggester.register(Box::new(KeywordProvider::new()), default_weight());
            suggester.register(
                Box::new(TagCloudProvider::from_documents(corpus)),
                default_weight(),
            );
            return suggester;
        }
        for provider in &self.providers {
            suggester.register(provider.build(corpus), provider.weight());
        }
        suggester
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = SuggesterConfig::from_toml_str("").unwrap();
        assert_eq!(config, SuggesterConfig::default());
        assert_eq!(config.build(&[]).provider_count(), 2);
    }

    #[test]
    fn providers_and_options_are_read() {
        let config = SuggesterConfig::from_toml_str(
            r#"
            limit = 3

            [[provider]]
            kind = "keyword"
            min_length = 5
            stop_words = ["hippo"]

            [[provider]]
            kind = "tag_cloud"
            weight = 0.5

            [[provider]]
            kind = "static"
            name = "editorial"
            tags = [{ name = "news", score = 2.0 }, { name = "events" }]
            "#,
        )
        .unwrap();
        assert_eq!(config.limit, 3);
        assert_eq!(config.providers.len(), 3);
        assert_eq!(
            config.providers[0],
            ProviderConfig::Keyword {
                weight: 1.0,
                min_length: 5,
                title_weight: DEFAULT_TITLE_WEIGHT,
                stop_words: vec!["hippo".to_string()],
            }
        );
        assert_eq!(config.providers[1].weight(), 0.5);
        assert_eq!(config.build(&[]).provider_count(), 3);
    }

    #[test]
    fn negative_weight_is_rejected() {
        let err = SuggesterConfig::from_toml_str(
            r#"
            [[provider]]
            kind = "tag_cloud"
            weight = -1.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWeight { index: 0, .. }));
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let err = SuggesterConfig::from_toml_str(
            r#"
            [[provider]]
            kind = "magic"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = SuggesterConfig::load(Path::new("/nonexistent/suggest.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/suggest.toml"));
    }
}
