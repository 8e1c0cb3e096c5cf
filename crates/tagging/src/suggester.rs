use log::{debug, warn};

use crate::collection::TagCollection;
use crate::provider::{DocumentRef, TagProvider};

pub const DEFAULT_LIMIT: usize = 10;

struct WeightedProvider {
    provider: Box<dyn TagProvider>,
    weight: f64,
}

/// Combines the suggestions of several providers into one ranked collection.
///
/// Each provider's collection is merged with its weight as multiplier, so providers are
/// compared on the normalized scale rather than on their raw scores.
pub struct TagSuggester {
    providers: Vec<WeightedProvider>,
    limit: usize,
}

impl Default for TagSuggester {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TagSuggester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let providers: Vec<(&str, f64)> = self
            .providers
            .iter()
            .map(|p| (p.provider.name(), p.weight))
            .collect();
        f.debug_struct("TagSuggester")
            .field("providers", &providers)
            .field("limit", &self.limit)
            .finish()
    }
}

impl TagSuggester {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_provider(mut self, provider: impl TagProvider + 'static, weight: f64) -> Self {
        self.register(Box::new(provider), weight);
        self
    }

    pub fn register(&mut self, provider: Box<dyn TagProvider>, weight: f64) {
        self.providers.push(WeightedProvider { provider, weight });
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Suggested tags for `document`, best first, without the tags it already has.
    ///
    /// A provider that fails is logged and left out; the others still contribute.
    pub fn suggest(&self, document: &DocumentRef) -> TagCollection {
        let mut merged = TagCollection::new();
        for entry in &self.providers {
            let name = entry.provider.name();
            match entry.provider.suggest(document) {
                Ok(tags) => {
                    debug!(
                        "tag provider '{name}' suggested {} tags for '{}'",
                        tags.len(),
                        document.id
                    );
                    merged.add_all(&tags.with_multiplier(entry.weight));
                }
                Err(err) => warn!("skipping tag provider for '{}': {err}", document.id),
            }
        }
        for assigned in &document.tags {
            merged.remove(assigned);
        }
        merged.normalize_scores();
        merged.top(self.limit)
    }
}
