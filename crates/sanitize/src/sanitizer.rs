use html::Node;

use crate::error::FilterError;
use crate::filter::AllowlistFilter;

/// Parse, filter, and serialize in one call.
#[derive(Debug)]
pub struct HtmlSanitizer {
    filter: AllowlistFilter,
    omit_comments: bool,
}

impl HtmlSanitizer {
    pub fn new(filter: AllowlistFilter) -> Self {
        Self {
            filter,
            omit_comments: true,
        }
    }

    pub fn omit_comments(mut self, omit: bool) -> Self {
        self.omit_comments = omit;
        self
    }

    pub fn filter(&self) -> &AllowlistFilter {
        &self.filter
    }

    /// Sanitize an already parsed tree. `Ok(None)` means the root element itself was dropped.
    ///
    /// The output is a content fragment, so a document's doctype is removed.
    pub fn clean_tree(&self, tree: Node) -> Result<Option<Node>, FilterError> {
        let Some(mut tree) = self.filter.apply(tree)? else {
            return Ok(None);
        };
        if let Node::Document { doctype, .. } = &mut tree {
            *doctype = None;
        }
        if self.omit_comments {
            strip_comments(&mut tree);
        }
        Ok(Some(tree))
    }

    pub fn clean(&self, input: &str) -> Result<String, FilterError> {
        let tree = self.clean_tree(html::parse(input))?;
        Ok(tree.as_ref().map(html::to_html).unwrap_or_default())
    }
}

impl Default for HtmlSanitizer {
    fn default() -> Self {
        Self::new(AllowlistFilter::default())
    }
}

fn strip_comments(node: &mut Node) {
    if let Some(children) = node.children_mut() {
        children.retain(|child| !matches!(child, Node::Comment { .. }));
        for child in children {
            strip_comments(child);
        }
    }
}
