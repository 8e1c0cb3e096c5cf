#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Doctype(String),
    StartTag {
        name: String,
        attributes: Vec<(String, Option<String>)>,
        self_closing: bool,
    },
    EndTag(String),
    Comment(String),
    Text(String),
}

/// A parsed HTML tree.
///
/// `Document` is the nameless envelope around the parsed content. Elements keep their
/// attributes in source order; an attribute without `=` has a `None` value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Document {
        doctype: Option<String>,
        children: Vec<Node>,
    },
    Element {
        name: String,
        attributes: Vec<(String, Option<String>)>,
        children: Vec<Node>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

impl Node {
    pub fn document(children: Vec<Node>) -> Self {
        Node::Document {
            doctype: None,
            children,
        }
    }

    pub fn element(name: impl Into<String>) -> Self {
        Node::Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    /// Builder-style attribute append, mostly useful for constructing trees in tests.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Node::Element { attributes, .. } = &mut self {
            attributes.push((key.into(), Some(value.into())));
        }
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        if let Some(children) = self.children_mut() {
            children.push(child);
        }
        self
    }

    /// Tag name of an element. `None` for the document envelope and for leaves.
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Node::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Whether this node can hold children (document envelope or element).
    pub fn is_tag(&self) -> bool {
        matches!(self, Node::Document { .. } | Node::Element { .. })
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        match self {
            Node::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == key)
                .and_then(|(_, v)| v.as_deref()),
            _ => None,
        }
    }

    pub fn attributes(&self) -> &[(String, Option<String>)] {
        match self {
            Node::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document { children, .. } | Node::Element { children, .. } => children,
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Document { children, .. } => Some(children),
            Node::Element { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Depth-first search for the first element with the given tag name.
    pub fn find_element(&self, tag: &str) -> Option<&Node> {
        if self.tag_name() == Some(tag) {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find_element(tag))
    }

    /// Number of elements in this subtree, including `self`.
    pub fn element_count(&self) -> usize {
        let own = usize::from(matches!(self, Node::Element { .. }));
        own + self.children().iter().map(Node::element_count).sum::<usize>()
    }

    /// Concatenated text content of this subtree.
    pub fn text_content(&self) -> String {
        fn walk(node: &Node, out: &mut String) {
            match node {
                Node::Text { text } => out.push_str(text),
                Node::Comment { .. } => {}
                _ => {
                    for c in node.children() {
                        walk(c, out);
                    }
                }
            }
        }
        let mut out = String::new();
        walk(self, &mut out);
        out
    }
}
