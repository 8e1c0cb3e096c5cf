use crate::element::Element;

const GLOBAL: &[&str] = &["class", "id", "lang", "dir", "title"];

fn with_global(name: &str, extra: &[&str]) -> Element {
    Element::create(name, GLOBAL.iter().chain(extra).copied())
}

/// Built-in allow-list for rich text: block structure, inline formatting, lists, tables, links,
/// and images. Every entry keeps the default scheme and link flags.
pub fn default_allowlist() -> Vec<Element> {
    let mut elements = Vec::new();

    for name in [
        "p", "div", "span", "h1", "h2", "h3", "h4", "h5", "h6", "pre", "code", "b", "strong", "i",
        "em", "u", "s", "strike", "sub", "sup", "small", "abbr", "ul", "dl", "dt", "dd", "li",
        "caption", "thead", "tbody", "tfoot", "tr", "figure", "figcaption",
    ] {
        elements.push(with_global(name, &[]));
    }

    elements.push(Element::bare("br"));
    elements.push(Element::bare("hr"));
    elements.push(with_global("blockquote", &["cite"]));
    elements.push(with_global("q", &["cite"]));
    elements.push(with_global("ol", &["start", "type", "reversed"]));
    elements.push(with_global("table", &["summary"]));
    elements.push(with_global("th", &["colspan", "rowspan", "scope"]));
    elements.push(with_global("td", &["colspan", "rowspan"]));
    elements.push(with_global("a", &["href", "name", "target", "rel"]));
    elements.push(with_global("img", &["src", "alt", "width", "height"]));

    elements
}
