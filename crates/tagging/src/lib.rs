//! Tag suggestion.
//!
//! [`TagCollection`] is a scored multiset of [`Tag`]s with merge-with-accumulation,
//! normalization to a 0..=100 scale and top-N extraction. [`TagSuggester`] runs a set of
//! [`TagProvider`]s for a document and combines their collections.

mod collection;
mod config;
mod error;
mod provider;
mod suggester;
mod tag;

pub use crate::collection::{DEFAULT_MULTIPLIER, NORMALIZED_MAX, TagCollection};
pub use crate::config::{ProviderConfig, SuggesterConfig};
pub use crate::error::{ConfigError, ProviderError};
pub use crate::provider::{
    DocumentRef, KeywordProvider, StaticProvider, TagCloudProvider, TagProvider,
};
pub use crate::suggester::{DEFAULT_LIMIT, TagSuggester};
pub use crate::tag::{DEFAULT_SCORE, Tag};
