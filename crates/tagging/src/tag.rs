use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

pub const DEFAULT_SCORE: f64 = 1.0;

fn default_score() -> f64 {
    DEFAULT_SCORE
}

/// A scored label.
///
/// Equality and hashing look at the name only, so a tag is a key first and a score second.
/// Ranking is a separate comparison, see [`Tag::rank_cmp`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tag {
    name: String,
    #[serde(default = "default_score")]
    score: f64,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_score(name, DEFAULT_SCORE)
    }

    pub fn with_score(name: impl Into<String>, score: f64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub(crate) fn add_score(&mut self, delta: f64) {
        self.score += delta;
    }

    pub(crate) fn scale(&mut self, factor: f64) {
        self.score *= factor;
    }

    /// Maps `highest` onto `max`. Dividing first keeps the top score exact: `highest / highest`
    /// is exactly one.
    pub(crate) fn rescale(&mut self, highest: f64, max: f64) {
        self.score = self.score / highest * max;
    }

    /// Ranking order: a tag with the same name is `Equal` whatever the scores, otherwise the
    /// higher score comes first and equal scores fall back to reverse name order.
    ///
    /// Not consistent with a total order over `(name, score)`; only use it to sort tags that
    /// already have distinct names.
    pub fn rank_cmp(&self, other: &Tag) -> Ordering {
        if self.name == other.name {
            return Ordering::Equal;
        }
        match other.score.total_cmp(&self.score) {
            Ordering::Equal => other.name.cmp(&self.name),
            ord => ord,
        }
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn new_tag_has_default_score() {
        let tag = Tag::new("rust");
        assert_eq!(tag.name(), "rust");
        assert_eq!(tag.score(), DEFAULT_SCORE);
    }

    #[test]
    fn same_name_ranks_equal_whatever_the_score() {
        let a = Tag::with_score("x", 1.0);
        let b = Tag::with_score("x", 50.0);
        assert_eq!(a.rank_cmp(&b), Ordering::Equal);
        assert_eq!(b.rank_cmp(&a), Ordering::Equal);
    }

    #[test]
    fn higher_score_ranks_first() {
        let low = Tag::with_score("a", 1.0);
        let high = Tag::with_score("b", 2.0);
        assert_eq!(high.rank_cmp(&low), Ordering::Less);
        assert_eq!(low.rank_cmp(&high), Ordering::Greater);
    }

    #[test]
    fn equal_scores_rank_in_reverse_name_order() {
        let b = Tag::with_score("b", 9.0);
        let c = Tag::with_score("c", 9.0);
        assert_eq!(c.rank_cmp(&b), Ordering::Less);
        assert_eq!(b.rank_cmp(&c), Ordering::Greater);
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_ne!(Tag::new("Rust"), Tag::new("rust"));
    }

    #[test]
    fn equality_and_hash_ignore_score() {
        assert_eq!(Tag::with_score("x", 1.0), Tag::with_score("x", 2.0));
        let set: HashSet<Tag> = [Tag::with_score("x", 1.0), Tag::with_score("x", 3.0)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn missing_score_deserializes_to_default() {
        let tag: Tag = serde_json::from_str(r#"{"name":"cms"}"#).unwrap();
        assert_eq!(tag.score(), DEFAULT_SCORE);
    }
}
