//! Allow-list filtering of a parsed tag tree.
//!
//! Rules, per node:
//! - an element whose name is not registered is dropped together with its subtree;
//! - a registered element keeps only its allowed attributes. Kept values that start with
//!   `javascript:` or `data:` (after trimming, decoding character references, lower-casing and
//!   removing whitespace and control characters) are replaced by the empty string, depending on
//!   the element's flags;
//! - an `<a target="_blank">` gets `rel` forced to `noopener noreferrer` plus its other tokens;
//! - the document envelope has no name; it is never dropped and its children are filtered;
//! - text and comment children are kept.
//!
//! Names are matched case-sensitively against the registry, which holds the lower-case names the
//! tokenizer produces.

use std::collections::HashMap;
use std::fmt;

use html::Node;

use crate::element::Element;
use crate::error::FilterError;
use crate::normalizer::{CharacterReferenceNormalizer, ValueNormalizer};

const JAVASCRIPT_SCHEME: &str = "javascript:";
const DATA_SCHEME: &str = "data:";
const NOOPENER: &str = "noopener";
const NOREFERRER: &str = "noreferrer";

pub struct AllowlistFilter {
    elements: HashMap<String, Element>,
    normalizer: Box<dyn ValueNormalizer>,
}

/// Historical name of [`AllowlistFilter`].
pub type WhitelistFilter = AllowlistFilter;

impl AllowlistFilter {
    /// An empty registry: every element is dropped until something is registered.
    pub fn new() -> Self {
        Self {
            elements: HashMap::new(),
            normalizer: Box::new(CharacterReferenceNormalizer),
        }
    }

    pub fn with_elements(elements: impl IntoIterator<Item = Element>) -> Self {
        let mut filter = Self::new();
        for element in elements {
            filter.register(element);
        }
        filter
    }

    pub fn with_normalizer(mut self, normalizer: impl ValueNormalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    /// Register an element. An existing definition with the same name is replaced entirely and
    /// returned; its attributes are not merged into the new one.
    pub fn register(&mut self, element: Element) -> Option<Element> {
        let replaced = self.elements.insert(element.name().to_string(), element);
        if let Some(previous) = &replaced {
            log::warn!(
                target: "sanitize.filter",
                "allow-list element <{}> registered twice; the later definition replaces the earlier one",
                previous.name()
            );
        }
        replaced
    }

    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements.get(name)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Filter `node` and its subtree.
    ///
    /// Returns `Ok(None)` when `node` itself is an element that is not allow-listed; the caller
    /// drops it. Fails only when `node` is not a tag node at all.
    pub fn apply(&self, node: Node) -> Result<Option<Node>, FilterError> {
        match node {
            Node::Text { .. } => Err(FilterError::NotATagNode { kind: "text" }),
            Node::Comment { .. } => Err(FilterError::NotATagNode { kind: "comment" }),
            tag => Ok(self.filter_node(tag)),
        }
    }

    fn filter_node(&self, node: Node) -> Option<Node> {
        match node {
            Node::Document { doctype, children } => Some(Node::Document {
                doctype,
                children: self.filter_children(children),
            }),
            Node::Element {
                name,
                attributes,
                children,
            } => {
                let Some(element) = self.elements.get(&name) else {
                    log::debug!(target: "sanitize.filter", "pruning <{name}> and its subtree");
                    return None;
                };
                let attributes = self.filter_attributes(element, attributes);
                Some(Node::Element {
                    name,
                    attributes,
                    children: self.filter_children(children),
                })
            }
            leaf => Some(leaf),
        }
    }

    fn filter_children(&self, children: Vec<Node>) -> Vec<Node> {
        children
            .into_iter()
            .filter_map(|child| self.filter_node(child))
            .collect()
    }

    fn filter_attributes(
        &self,
        element: &Element,
        attributes: Vec<(String, Option<String>)>,
    ) -> Vec<(String, Option<String>)> {
        let mut kept = Vec::with_capacity(attributes.len());
        for (key, value) in attributes {
            if !element.allows_attribute(&key) {
                log::trace!(
                    target: "sanitize.filter",
                    "dropping attribute {key} on <{}>",
                    element.name()
                );
                continue;
            }
            let value = value.map(|value| self.screen_value(element, &key, value));
            kept.push((key, value));
        }

        if element.secure_target_blank_links()
            && element.name() == "a"
            && opens_new_browsing_context(&kept)
        {
            secure_rel(&mut kept);
        }
        kept
    }

    fn screen_value(&self, element: &Element, key: &str, value: String) -> String {
        let cleaned = self.scheme_probe(&value);
        let unsafe_scheme = (element.omit_js_protocol() && cleaned.starts_with(JAVASCRIPT_SCHEME))
            || (element.omit_data_protocol() && cleaned.starts_with(DATA_SCHEME));
        if unsafe_scheme {
            log::debug!(
                target: "sanitize.filter",
                "blanking {key} on <{}>: unsafe URL scheme",
                element.name()
            );
            return String::new();
        }
        value
    }

    /// The form of `value` used only for scheme comparison.
    fn scheme_probe(&self, value: &str) -> String {
        let trimmed = value.trim();
        let decoded = match self.normalizer.normalize(trimmed) {
            Ok(decoded) => decoded,
            Err(err) => {
                log::warn!(target: "sanitize.filter", "{err}; screening the raw value");
                trimmed.to_string()
            }
        };
        decoded
            .chars()
            .filter(|c| !c.is_whitespace() && !c.is_control())
            .flat_map(char::to_lowercase)
            .collect()
    }
}

impl Default for AllowlistFilter {
    fn default() -> Self {
        Self::with_elements(crate::defaults::default_allowlist())
    }
}

impl fmt::Debug for AllowlistFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.elements.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("AllowlistFilter")
            .field("elements", &names)
            .finish_non_exhaustive()
    }
}

fn opens_new_browsing_context(attributes: &[(String, Option<String>)]) -> bool {
    attributes.iter().any(|(key, value)| {
        key == "target"
            && value
                .as_deref()
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("_blank"))
    })
}

/// Force `rel` to `noopener noreferrer` followed by the other tokens it already had.
fn secure_rel(attributes: &mut Vec<(String, Option<String>)>) {
    let rel = {
        let existing = attributes
            .iter()
            .find(|(key, _)| key == "rel")
            .and_then(|(_, value)| value.as_deref())
            .unwrap_or("");
        let mut tokens = vec![NOOPENER, NOREFERRER];
        tokens.extend(existing.split_whitespace().filter(|token| {
            !token.eq_ignore_ascii_case(NOOPENER) && !token.eq_ignore_ascii_case(NOREFERRER)
        }));
        tokens.join(" ")
    };

    match attributes.iter_mut().find(|(key, _)| key == "rel") {
        Some((_, value)) => *value = Some(rel),
        None => attributes.push(("rel".to_string(), Some(rel))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NormalizationError;

    fn anchor(attributes: &[(&str, &str)]) -> Node {
        attributes
            .iter()
            .fold(Node::element("a"), |node, (k, v)| node.with_attribute(*k, *v))
    }

    fn filtered_attributes(filter: &AllowlistFilter, node: Node) -> Vec<(String, Option<String>)> {
        let node = filter.apply(node).unwrap().expect("element is allow-listed");
        node.attributes().to_vec()
    }

    fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, Option<String>)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string())))
            .collect()
    }

    #[test]
    fn unregistered_element_is_pruned_with_subtree() {
        let filter = AllowlistFilter::with_elements([Element::bare("div"), Element::bare("p")]);
        let tree = Node::document(vec![
            Node::element("div")
                .with_child(Node::text("before"))
                .with_child(
                    Node::element("script")
                        .with_child(Node::element("p").with_child(Node::text("inner"))),
                )
                .with_child(Node::element("p").with_child(Node::text("after"))),
        ]);

        let out = filter.apply(tree).unwrap().unwrap();
        assert!(out.find_element("script").is_none());
        assert_eq!(out.element_count(), 2);
        assert_eq!(out.text_content(), "beforeafter");
    }

    #[test]
    fn unregistered_root_element_filters_to_none() {
        let filter = AllowlistFilter::with_elements([Element::bare("p")]);
        assert_eq!(filter.apply(Node::element("iframe")), Ok(None));
    }

    #[test]
    fn document_envelope_passes_even_with_empty_registry() {
        let filter = AllowlistFilter::new();
        let tree = Node::document(vec![Node::text("t"), Node::element("b")]);
        assert_eq!(
            filter.apply(tree),
            Ok(Some(Node::document(vec![Node::text("t")])))
        );
    }

    #[test]
    fn leaf_roots_are_rejected() {
        let filter = AllowlistFilter::default();
        assert_eq!(
            filter.apply(Node::text("x")),
            Err(FilterError::NotATagNode { kind: "text" })
        );
        assert_eq!(
            filter.apply(Node::Comment { text: "x".into() }),
            Err(FilterError::NotATagNode { kind: "comment" })
        );
    }

    #[test]
    fn disallowed_attributes_are_dropped() {
        let filter = AllowlistFilter::with_elements([Element::create("a", ["href"])]);
        let out = filtered_attributes(&filter, anchor(&[("href", "x"), ("onclick", "y")]));
        assert_eq!(out, attrs(&[("href", "x")]));
    }

    #[test]
    fn valueless_attributes_are_kept_untouched() {
        let filter = AllowlistFilter::with_elements([Element::create("input", ["disabled"])]);
        let node = Node::Element {
            name: "input".into(),
            attributes: vec![("disabled".into(), None)],
            children: Vec::new(),
        };
        assert_eq!(
            filtered_attributes(&filter, node),
            vec![("disabled".to_string(), None)]
        );
    }

    #[test]
    fn javascript_scheme_is_blanked_case_insensitively() {
        let filter = AllowlistFilter::with_elements([
            Element::create("a", ["href"]).set_omit_js_protocol(true)
        ]);
        let out = filtered_attributes(&filter, anchor(&[("href", "JavaScript:alert(1)")]));
        assert_eq!(out, attrs(&[("href", "")]));
    }

    #[test]
    fn whitespace_inside_scheme_does_not_hide_it() {
        let filter = AllowlistFilter::with_elements([Element::create("a", ["href"])]);
        for value in [
            "java\tscript:alert(1)",
            "  javascript:alert(1)",
            "java\nscript :alert(1)",
            "java\u{0}script:alert(1)",
        ] {
            let out = filtered_attributes(&filter, anchor(&[("href", value)]));
            assert_eq!(out, attrs(&[("href", "")]), "value {value:?}");
        }
    }

    #[test]
    fn character_references_do_not_hide_scheme() {
        let filter = AllowlistFilter::with_elements([Element::create("a", ["href"])]);
        for value in [
            "&#106;avascript:alert(1)",
            "&#x6A;avascript&colon;alert(1)",
            "java&Tab;script:alert(1)",
        ] {
            let out = filtered_attributes(&filter, anchor(&[("href", value)]));
            assert_eq!(out, attrs(&[("href", "")]), "value {value:?}");
        }
    }

    #[test]
    fn data_scheme_is_blanked_on_any_kept_attribute() {
        let filter = AllowlistFilter::with_elements([Element::create("img", ["src", "alt"])]);
        let node = Node::element("img")
            .with_attribute("src", "DATA:image/svg+xml;base64,PHN2Zz4=")
            .with_attribute("alt", "data: sheet");
        assert_eq!(
            filtered_attributes(&filter, node),
            attrs(&[("src", ""), ("alt", "")])
        );
    }

    #[test]
    fn scheme_flags_can_be_disabled() {
        let filter = AllowlistFilter::with_elements([Element::create("img", ["src"])
            .set_omit_data_protocol(false)
            .set_omit_js_protocol(false)]);
        let data = "data:image/png;base64,AAAA";
        let out = filtered_attributes(&filter, Node::element("img").with_attribute("src", data));
        assert_eq!(out, attrs(&[("src", data)]));
        let js = "javascript:void(0)";
        let out = filtered_attributes(&filter, Node::element("img").with_attribute("src", js));
        assert_eq!(out, attrs(&[("src", js)]));
    }

    #[test]
    fn kept_value_is_the_original_spelling() {
        let filter = AllowlistFilter::with_elements([Element::create("a", ["href"])]);
        let out = filtered_attributes(&filter, anchor(&[("href", " HTTP://Example.COM/A ")]));
        assert_eq!(out, attrs(&[("href", " HTTP://Example.COM/A ")]));
    }

    #[test]
    fn target_blank_gets_secure_rel_before_existing_tokens() {
        let filter =
            AllowlistFilter::with_elements([Element::create("a", ["href", "target", "rel"])]);
        let out = filtered_attributes(
            &filter,
            anchor(&[("href", "http://x"), ("target", "_blank"), ("rel", "nofollow")]),
        );
        assert_eq!(
            out,
            attrs(&[
                ("href", "http://x"),
                ("target", "_blank"),
                ("rel", "noopener noreferrer nofollow"),
            ])
        );
    }

    #[test]
    fn secure_rel_does_not_duplicate_tokens() {
        let filter =
            AllowlistFilter::with_elements([Element::create("a", ["href", "target", "rel"])]);
        let out = filtered_attributes(
            &filter,
            anchor(&[("target", "_BLANK"), ("rel", "external NoReferrer  noopener tag")]),
        );
        assert_eq!(
            out,
            attrs(&[("target", "_BLANK"), ("rel", "noopener noreferrer external tag")])
        );
    }

    #[test]
    fn secure_rel_is_added_even_when_rel_is_not_allowed() {
        let filter = AllowlistFilter::with_elements([Element::create("a", ["href", "target"])]);
        let out = filtered_attributes(
            &filter,
            anchor(&[("href", "/x"), ("target", "_blank"), ("rel", "opener")]),
        );
        assert_eq!(
            out,
            attrs(&[
                ("href", "/x"),
                ("target", "_blank"),
                ("rel", "noopener noreferrer"),
            ])
        );
    }

    #[test]
    fn target_blank_hardening_needs_target_to_survive() {
        let filter = AllowlistFilter::with_elements([Element::create("a", ["href"])]);
        let out = filtered_attributes(&filter, anchor(&[("href", "/x"), ("target", "_blank")]));
        assert_eq!(out, attrs(&[("href", "/x")]));
    }

    #[test]
    fn target_blank_hardening_can_be_disabled_and_only_applies_to_anchors() {
        let filter = AllowlistFilter::with_elements([
            Element::create("a", ["target"]).set_secure_target_blank_links(false),
            Element::create("form", ["target"]),
        ]);
        let out = filtered_attributes(&filter, anchor(&[("target", "_blank")]));
        assert_eq!(out, attrs(&[("target", "_blank")]));

        let form = Node::element("form").with_attribute("target", "_blank");
        assert_eq!(filtered_attributes(&filter, form), attrs(&[("target", "_blank")]));
    }

    #[test]
    fn other_targets_are_not_hardened() {
        let filter = AllowlistFilter::with_elements([Element::create("a", ["target"])]);
        let out = filtered_attributes(&filter, anchor(&[("target", "_self")]));
        assert_eq!(out, attrs(&[("target", "_self")]));
    }

    #[test]
    fn re_registration_replaces_previous_definition() {
        let mut filter = AllowlistFilter::new();
        assert!(filter.register(Element::create("a", ["href", "title"])).is_none());
        let replaced = filter.register(Element::create("a", ["name"]));
        assert_eq!(replaced, Some(Element::create("a", ["href", "title"])));
        assert_eq!(filter.len(), 1);

        let out = filtered_attributes(
            &filter,
            anchor(&[("href", "/x"), ("title", "t"), ("name", "n")]),
        );
        assert_eq!(out, attrs(&[("name", "n")]));
    }

    #[test]
    fn names_are_matched_case_sensitively() {
        let filter = AllowlistFilter::with_elements([Element::create("a", ["href"])]);
        assert_eq!(filter.apply(Node::element("A")), Ok(None));
        let out = filtered_attributes(&filter, anchor(&[("HREF", "/x")]));
        assert!(out.is_empty());
    }

    struct FailingNormalizer;

    impl ValueNormalizer for FailingNormalizer {
        fn normalize(&self, _value: &str) -> Result<String, NormalizationError> {
            Err(NormalizationError {
                message: "always fails".to_string(),
            })
        }
    }

    #[test]
    fn normalization_failure_falls_back_to_raw_value() {
        let filter = AllowlistFilter::with_elements([Element::create("a", ["href", "title"])])
            .with_normalizer(FailingNormalizer);
        let out = filtered_attributes(
            &filter,
            anchor(&[("href", " JAVA script:x"), ("title", "&#106;avascript:x")]),
        );
        // The raw value is still trimmed, lower-cased and whitespace-stripped; references stay.
        assert_eq!(out, attrs(&[("href", ""), ("title", "&#106;avascript:x")]));
    }

    #[test]
    fn invalid_reference_in_value_does_not_abort_the_walk() {
        let filter = AllowlistFilter::with_elements([
            Element::create("a", ["href"]),
            Element::bare("p"),
        ]);
        let tree = Node::document(vec![
            anchor(&[("href", "javascript:&#xD800;")]),
            Node::element("p").with_child(Node::text("still here")),
        ]);
        let out = filter.apply(tree).unwrap().unwrap();
        assert_eq!(out.children()[0].attribute("href"), Some(""));
        assert_eq!(out.text_content(), "still here");
    }

    #[test]
    fn filter_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AllowlistFilter>();
        assert_send_sync::<WhitelistFilter>();
    }
}
