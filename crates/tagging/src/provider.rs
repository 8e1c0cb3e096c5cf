use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::collection::TagCollection;
use crate::error::ProviderError;
use crate::tag::Tag;

/// The document a suggestion is made for.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct DocumentRef {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Tags already assigned to the document.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl DocumentRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }
}

/// A source of tag suggestions for a document.
pub trait TagProvider: Send + Sync {
    fn name(&self) -> &str;

    fn suggest(&self, document: &DocumentRef) -> Result<TagCollection, ProviderError>;
}

pub const DEFAULT_MIN_TERM_LENGTH: usize = 4;
pub const DEFAULT_TITLE_WEIGHT: f64 = 2.0;

const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "also", "because", "been", "before", "being", "below",
    "between", "both", "could", "does", "doing", "down", "during", "each", "from", "further",
    "have", "having", "here", "into", "itself", "just", "more", "most", "once", "only", "other",
    "over", "same", "should", "some", "such", "than", "that", "their", "them", "then", "there",
    "these", "they", "this", "those", "through", "under", "until", "very", "were", "what",
    "when", "where", "which", "while", "will", "with", "would", "your",
];

/// Term frequency over a document's title and body.
///
/// Terms are lower-cased runs of alphanumeric characters. Terms shorter than the minimum
/// length, stop words, and numbers are ignored. A title occurrence counts `title_weight`,
/// a body occurrence counts one.
#[derive(Clone, Debug)]
pub struct KeywordProvider {
    min_length: usize,
    title_weight: f64,
    stop_words: HashSet<String>,
}

impl Default for KeywordProvider {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_TERM_LENGTH,
            title_weight: DEFAULT_TITLE_WEIGHT,
            stop_words: STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl KeywordProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn title_weight(mut self, title_weight: f64) -> Self {
        self.title_weight = title_weight;
        self
    }

    /// Adds stop words on top of the built-in list.
    pub fn stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stop_words
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    fn is_keyword(&self, term: &str) -> bool {
        term.chars().count() >= self.min_length
            && !term.chars().all(|c| c.is_numeric())
            && !self.stop_words.contains(term)
    }

    fn count_terms(&self, text: &str, weight: f64, tags: &mut TagCollection) {
        for term in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
        {
            if self.is_keyword(&term) {
                tags.add(Tag::with_score(term, weight));
            }
        }
    }
}

impl TagProvider for KeywordProvider {
    fn name(&self) -> &str {
        "keyword"
    }

    fn suggest(&self, document: &DocumentRef) -> Result<TagCollection, ProviderError> {
        if document.title.trim().is_empty() && document.body.trim().is_empty() {
            return Err(ProviderError::InvalidDocument {
                provider: self.name().to_string(),
                reason: format!("document '{}' has no text", document.id),
            });
        }
        let mut tags = TagCollection::new();
        self.count_terms(&document.title, self.title_weight, &mut tags);
        self.count_terms(&document.body, 1.0, &mut tags);
        Ok(tags)
    }
}

/// Tags in use across a corpus, scored by how many documents carry them.
#[derive(Clone, Debug, Default)]
pub struct TagCloudProvider {
    counts: HashMap<String, usize>,
}

impl TagCloudProvider {
    pub fn from_documents<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = &'a DocumentRef>,
    {
        let mut counts = HashMap::new();
        for document in documents {
            let unique: HashSet<&str> = document.tags.iter().map(String::as_str).collect();
            for tag in unique {
                *counts.entry(tag.to_string()).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl TagProvider for TagCloudProvider {
    fn name(&self) -> &str {
        "tag_cloud"
    }

    fn suggest(&self, document: &DocumentRef) -> Result<TagCollection, ProviderError> {
        if self.counts.is_empty() {
            return Err(ProviderError::Unavailable {
                provider: self.name().to_string(),
                reason: "no tagged documents in the corpus".to_string(),
            });
        }
        Ok(self
            .counts
            .iter()
            .filter(|(name, _)| !document.has_tag(name))
            .map(|(name, count)| Tag::with_score(name.clone(), *count as f64))
            .collect())
    }
}

/// Always suggests the same configured tags.
#[derive(Clone, Debug)]
pub struct StaticProvider {
    name: String,
    tags: TagCollection,
}

impl StaticProvider {
    pub fn new(name: impl Into<String>, tags: TagCollection) -> Self {
        Self {
            name: name.into(),
            tags,
        }
    }
}

impl TagProvider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn suggest(&self, _document: &DocumentRef) -> Result<TagCollection, ProviderError> {
        Ok(self.tags.clone())
    }
}
