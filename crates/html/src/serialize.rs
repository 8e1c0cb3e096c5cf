//! HTML serialization of a [`Node`] tree.
//!
//! Text is escaped (`&`, `<`, `>`), attribute values are escaped and always double-quoted, and the
//! bodies of raw text elements are written verbatim unless they hold something a browser would
//! read as their close tag. Void elements get no end tag. Comment text is rewritten so that it
//! cannot end the comment early.

use crate::Node;
use crate::tokenizer::{find_raw_text_close, is_raw_text_element, is_void_element};

pub fn to_html(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, None, &mut out);
    out
}

/// `raw_text` names the enclosing raw text element, if any.
fn write_node(node: &Node, raw_text: Option<&str>, out: &mut String) {
    match node {
        Node::Document { doctype, children } => {
            if let Some(doctype) = doctype {
                out.push_str("<!DOCTYPE ");
                out.push_str(doctype);
                out.push('>');
            }
            for c in children {
                write_node(c, None, out);
            }
        }
        Node::Element {
            name,
            attributes,
            children,
        } => {
            out.push('<');
            out.push_str(name);
            for (key, value) in attributes {
                out.push(' ');
                out.push_str(key);
                if let Some(value) = value {
                    out.push_str("=\"");
                    escape_into(value, true, out);
                    out.push('"');
                }
            }
            out.push('>');
            if is_void_element(name) {
                return;
            }
            let raw = is_raw_text_element(name).then_some(name.as_str());
            for c in children {
                write_node(c, raw, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        Node::Text { text } => match raw_text {
            Some(name) if find_raw_text_close(text.as_bytes(), name).is_none() => {
                out.push_str(text)
            }
            _ => escape_into(text, false, out),
        },
        Node::Comment { text } => {
            out.push_str("<!--");
            write_comment_text(text, out);
            out.push_str("-->");
        }
    }
}

/// A leading `>` or `-` would close `<!--` right away, and any `--` could start a close
/// sequence, so a space goes in front of the former and between the dashes of the latter.
fn write_comment_text(text: &str, out: &mut String) {
    if text.starts_with(['>', '-']) {
        out.push(' ');
    }
    let mut previous = None;
    for ch in text.chars() {
        if ch == '-' && previous == Some('-') {
            out.push(' ');
        }
        out.push(ch);
        previous = Some(ch);
    }
}

fn escape_into(s: &str, attribute: bool, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
