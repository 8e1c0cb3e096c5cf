use crate::types::{Node, Token};

/// Deepest element nesting the builder produces. A start tag opened below this depth becomes an
/// empty element and its content lands next to it, so later recursive walks stay shallow.
pub const MAX_NESTING_DEPTH: usize = 512;

/// Build a tree from a token stream.
///
/// Elements are kept on an open-element stack and attached to their parent when they close. An
/// end tag closes the nearest open element with the same name (and everything opened after it);
/// an end tag with no matching open element is ignored. Elements still open at the end of input
/// are closed implicitly. Nesting is capped at [`MAX_NESTING_DEPTH`].
pub fn build_dom(tokens: Vec<Token>) -> Node {
    let mut builder = TreeBuilder::default();
    for token in tokens {
        builder.push(token);
    }
    builder.finish()
}

#[derive(Default)]
struct TreeBuilder {
    doctype: Option<String>,
    root: Vec<Node>,
    open: Vec<Node>,
    flattened: usize,
}

impl TreeBuilder {
    fn push(&mut self, token: Token) {
        match token {
            Token::Doctype(doctype) => {
                self.doctype.get_or_insert(doctype);
            }
            Token::Comment(text) => self.append(Node::Comment { text }),
            Token::Text(text) => {
                if !text.is_empty() {
                    self.append(Node::Text { text });
                }
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let element = Node::Element {
                    name,
                    attributes,
                    children: Vec::new(),
                };
                if self_closing {
                    self.append(element);
                } else if self.open.len() >= MAX_NESTING_DEPTH {
                    self.flattened += 1;
                    self.append(element);
                } else {
                    self.open.push(element);
                }
            }
            Token::EndTag(name) => {
                let Some(depth) = self
                    .open
                    .iter()
                    .rposition(|node| node.tag_name() == Some(name.as_str()))
                else {
                    log::trace!(target: "html.dom_builder", "ignoring stray end tag </{name}>");
                    return;
                };
                while self.open.len() > depth {
                    self.close_current();
                }
            }
        }
    }

    fn append(&mut self, node: Node) {
        let siblings = match self.open.last_mut() {
            Some(Node::Element { children, .. }) => children,
            _ => &mut self.root,
        };
        // Adjacent text (split by an ignored end tag) merges into one node.
        if let (Node::Text { text }, Some(Node::Text { text: last })) = (&node, siblings.last_mut())
        {
            last.push_str(text);
            return;
        }
        siblings.push(node);
    }

    fn close_current(&mut self) {
        if let Some(node) = self.open.pop() {
            self.append(node);
        }
    }

    fn finish(mut self) -> Node {
        while !self.open.is_empty() {
            self.close_current();
        }
        if self.flattened > 0 {
            log::debug!(
                target: "html.dom_builder",
                "flattened {} elements nested deeper than {MAX_NESTING_DEPTH}",
                self.flattened
            );
        }
        Node::Document {
            doctype: self.doctype,
            children: self.root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize;

    #[test]
    fn build_dom_nests_elements() {
        let dom = build_dom(tokenize("<div><p>a<b>b</b></p>c</div>"));
        let expected = Node::document(vec![
            Node::element("div")
                .with_child(
                    Node::element("p")
                        .with_child(Node::text("a"))
                        .with_child(Node::element("b").with_child(Node::text("b"))),
                )
                .with_child(Node::text("c")),
        ]);
        assert_eq!(dom, expected);
    }

    #[test]
    fn end_tag_closes_intervening_elements() {
        let dom = build_dom(tokenize("<div><span><i>x</div>y"));
        let div = &dom.children()[0];
        assert_eq!(div.tag_name(), Some("div"));
        assert_eq!(dom.children()[1], Node::text("y"));
        assert_eq!(div.text_content(), "x");
    }

    #[test]
    fn stray_end_tag_is_ignored() {
        let dom = build_dom(tokenize("<p>a</b>b</p>"));
        assert_eq!(
            dom,
            Node::document(vec![Node::element("p").with_child(Node::text("ab"))])
        );
    }

    #[test]
    fn unclosed_elements_close_at_end_of_input() {
        let dom = build_dom(tokenize("<!doctype html><ul><li>one<li>two"));
        let Node::Document { doctype, children } = &dom else {
            panic!("expected document root");
        };
        assert_eq!(doctype.as_deref(), Some("html"));
        assert_eq!(children.len(), 1);
        assert_eq!(dom.element_count(), 3);
        assert_eq!(dom.text_content(), "onetwo");
    }

    #[test]
    fn build_dom_caps_nesting_depth() {
        let depth = 2_000;
        let mut tokens = Vec::with_capacity(depth + 1);
        for _ in 0..depth {
            tokens.push(Token::StartTag {
                name: "div".to_string(),
                attributes: Vec::new(),
                self_closing: false,
            });
        }
        tokens.push(Token::Text("deep".to_string()));
        let dom = build_dom(tokens);

        let mut innermost = &dom;
        for _ in 0..MAX_NESTING_DEPTH {
            innermost = &innermost.children()[0];
            assert_eq!(innermost.tag_name(), Some("div"));
        }
        // Elements past the cap are empty siblings inside the innermost open element.
        let children = innermost.children();
        assert_eq!(children.len(), depth - MAX_NESTING_DEPTH + 1);
        assert!(children[..children.len() - 1]
            .iter()
            .all(|c| c.tag_name() == Some("div") && c.children().is_empty()));
        assert_eq!(children.last(), Some(&Node::text("deep")));
        assert_eq!(dom.element_count(), depth);
        assert_eq!(dom.text_content(), "deep");
    }
}
