use std::collections::HashMap;
use std::collections::hash_map;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::tag::Tag;

pub const DEFAULT_MULTIPLIER: f64 = 1.0;
pub const NORMALIZED_MAX: f64 = 100.0;

/// A deduplicated multiset of tags keyed by name.
///
/// Adding a tag that is already present accumulates its score. The `multiplier` only matters
/// when this collection is merged into another one with [`TagCollection::add_all`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "CollectionRepr", into = "CollectionRepr")]
pub struct TagCollection {
    tags: HashMap<String, Tag>,
    multiplier: f64,
}

impl Default for TagCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl TagCollection {
    pub fn new() -> Self {
        Self {
            tags: HashMap::new(),
            multiplier: DEFAULT_MULTIPLIER,
        }
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn set_multiplier(&mut self, multiplier: f64) {
        self.multiplier = multiplier;
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.tags.get(name)
    }

    pub fn score(&self, name: &str) -> Option<f64> {
        self.tags.get(name).map(Tag::score)
    }

    pub fn remove(&mut self, name: &str) -> Option<Tag> {
        self.tags.remove(name)
    }

    /// Tags in no particular order.
    pub fn iter(&self) -> hash_map::Values<'_, String, Tag> {
        self.tags.values()
    }

    /// Inserts `tag`, or adds its score to the tag already stored under the same name.
    /// Returns `true` when the name was new.
    pub fn add(&mut self, tag: Tag) -> bool {
        match self.tags.entry(tag.name().to_string()) {
            hash_map::Entry::Occupied(mut entry) => {
                entry.get_mut().add_score(tag.score());
                false
            }
            hash_map::Entry::Vacant(entry) => {
                entry.insert(tag);
                true
            }
        }
    }

    /// Merges `other` into `self`: a copy of `other` is normalized to the 0..=100 scale,
    /// scaled by `other`'s multiplier and added tag by tag in ascending name order.
    /// `other` itself is left untouched.
    pub fn add_all(&mut self, other: &TagCollection) {
        let mut incoming = other.clone();
        incoming.normalize_scores();
        let mut tags: Vec<Tag> = incoming.tags.into_values().collect();
        tags.sort_by(|a, b| a.name().cmp(b.name()));
        for mut tag in tags {
            tag.scale(other.multiplier);
            self.add(tag);
        }
    }

    /// Rescales every score so the highest becomes exactly 100, keeping ratios.
    ///
    /// An empty collection is left alone. So is a collection whose highest score is zero,
    /// negative or not finite: there is nothing meaningful to scale by.
    pub fn normalize_scores(&mut self) {
        let Some(highest) = self.tags.values().map(Tag::score).reduce(f64::max) else {
            return;
        };
        if !highest.is_finite() || highest <= 0.0 {
            debug!(
                "skipping tag score normalization: highest score is {highest} over {} tags",
                self.tags.len()
            );
            return;
        }
        for tag in self.tags.values_mut() {
            tag.rescale(highest, NORMALIZED_MAX);
        }
    }

    /// Tags sorted by [`Tag::rank_cmp`].
    pub fn ranked(&self) -> Vec<&Tag> {
        let mut tags: Vec<&Tag> = self.tags.values().collect();
        tags.sort_by(|a, b| a.rank_cmp(b));
        tags
    }

    /// A new collection holding copies of at most `limit` of the best ranked tags.
    pub fn top(&self, limit: usize) -> TagCollection {
        self.ranked().into_iter().take(limit).cloned().collect()
    }
}

impl FromIterator<Tag> for TagCollection {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut collection = TagCollection::new();
        collection.extend(iter);
        collection
    }
}

impl Extend<Tag> for TagCollection {
    fn extend<I: IntoIterator<Item = Tag>>(&mut self, iter: I) {
        for tag in iter {
            self.add(tag);
        }
    }
}

impl IntoIterator for TagCollection {
    type Item = Tag;
    type IntoIter = hash_map::IntoValues<String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.into_values()
    }
}

/// Wire form: tags as a ranked list so the output is stable.
#[derive(Clone, Serialize, Deserialize)]
struct CollectionRepr {
    #[serde(default = "default_multiplier")]
    multiplier: f64,
    #[serde(default)]
    tags: Vec<Tag>,
}

fn default_multiplier() -> f64 {
    DEFAULT_MULTIPLIER
}

impl From<CollectionRepr> for TagCollection {
    fn from(repr: CollectionRepr) -> Self {
        let mut collection: TagCollection = repr.tags.into_iter().collect();
        collection.multiplier = repr.multiplier;
        collection
    }
}

impl From<TagCollection> for CollectionRepr {
    fn from(collection: TagCollection) -> Self {
        CollectionRepr {
            multiplier: collection.multiplier,
            tags: collection.ranked().into_iter().cloned().collect(),
        }
    }
}
