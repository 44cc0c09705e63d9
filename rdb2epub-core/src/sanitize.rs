//! HTML to XHTML normalization
//!
//! Article bodies come from arbitrary web pages. They are wrapped in a
//! minimal document, cleaned by the html5ever tree builder (which recovers
//! from malformed markup the way browsers do) and serialized back as
//! pretty-printed XHTML that namespace-strict readers accept.

use crate::error::ParseError;
use ego_tree::NodeRef;
use scraper::{Html, Node};

/// XHTML namespace declared on the root element
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Elements serialized without content (`<br />`)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements that start on their own line when pretty-printing
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "caption", "col", "colgroup", "dd",
    "details", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1",
    "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup", "hr", "html", "li", "link",
    "main", "meta", "nav", "noscript", "ol", "p", "pre", "script", "section", "style",
    "summary", "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "ul",
];

/// Spaces per nesting level
const INDENT: usize = 2;

/// Normalizes article HTML into a standalone XHTML document
#[derive(Debug, Clone)]
pub struct HtmlSanitizer;

impl Default for HtmlSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlSanitizer {
    pub fn new() -> Self {
        Self
    }

    /// Wrap `body` in an XHTML envelope titled `title` and clean it
    pub fn sanitize(&self, title: &str, body: &str) -> Result<String, ParseError> {
        let envelope = format!(
            "<html>\n<head>\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>",
            escape_text(title),
            body
        );

        let document = Html::parse_document(&envelope);
        if !document.errors.is_empty() {
            tracing::debug!(
                errors = document.errors.len(),
                "recovered from malformed markup"
            );
        }

        let root = document
            .tree
            .root()
            .children()
            .find(|node| matches!(node.value(), Node::Element(el) if el.name() == "html"))
            .ok_or_else(|| ParseError::MalformedContent("document has no root element".into()))?;

        let mut out = String::from(XML_DECLARATION);
        self.write_node(root, 0, false, &mut out)?;
        out.push('\n');

        Ok(declare_namespace(&out))
    }

    fn write_node(
        &self,
        node: NodeRef<'_, Node>,
        depth: usize,
        in_pre: bool,
        out: &mut String,
    ) -> Result<(), ParseError> {
        match node.value() {
            Node::Text(text) => {
                check_xml_chars(text)?;
                out.push_str(&escape_text(text));
            }
            Node::Element(element) => {
                let name = element.name();
                if !is_xml_name(name) {
                    // keep the content, lose the tag
                    tracing::debug!(element = name, "unwrapping element with invalid name");
                    for child in node.children() {
                        self.write_node(child, depth, in_pre, out)?;
                    }
                    return Ok(());
                }
                if !in_pre && is_block(name) {
                    self.newline(depth, out);
                }

                out.push('<');
                out.push_str(name);
                for (attr, value) in element.attrs() {
                    if !is_xml_name(attr) {
                        tracing::debug!(element = name, attribute = attr, "dropping attribute");
                        continue;
                    }
                    check_xml_chars(value)?;
                    out.push(' ');
                    out.push_str(attr);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }

                if VOID_ELEMENTS.contains(&name) {
                    out.push_str(" />");
                    return Ok(());
                }
                out.push('>');

                let verbatim = in_pre || name == "pre";
                let has_blocks = !verbatim
                    && node.children().any(|child| {
                        matches!(child.value(), Node::Element(el) if is_block(el.name()))
                    });

                for child in node.children() {
                    if has_blocks {
                        if let Node::Text(text) = child.value() {
                            if text.trim().is_empty() {
                                continue;
                            }
                        }
                    }
                    self.write_node(child, depth + 1, verbatim, out)?;
                }

                if has_blocks {
                    self.newline(depth, out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            // comments, doctypes and processing instructions are dropped
            _ => {}
        }
        Ok(())
    }

    fn newline(&self, depth: usize, out: &mut String) {
        if !out.is_empty() {
            out.push('\n');
        }
        out.extend(std::iter::repeat(' ').take(depth * INDENT));
    }
}

/// Give the bare `<html>` root the XHTML namespace
pub fn declare_namespace(xhtml: &str) -> String {
    let with_namespace = format!("<html xmlns=\"{XHTML_NAMESPACE}\">");
    if xhtml.contains("<html>") {
        xhtml.replacen("<html>", &with_namespace, 1)
    } else if !xhtml.contains("<html xmlns=") {
        xhtml.replacen("<html ", &format!("<html xmlns=\"{XHTML_NAMESPACE}\" "), 1)
    } else {
        xhtml.to_string()
    }
}

/// Escape text content
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value (double-quoted)
pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

fn is_block(name: &str) -> bool {
    BLOCK_ELEMENTS.contains(&name)
}

/// Unprefixed XML name check (an NCName). Prefixed names would need a
/// namespace declaration the document does not carry.
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Reject characters that XML 1.0 cannot carry
fn check_xml_chars(s: &str) -> Result<(), ParseError> {
    match s.chars().find(|&c| {
        matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
    }) {
        Some(c) => Err(ParseError::InvalidHtml(format!(
            "character U+{:04X} cannot be represented in XHTML",
            c as u32
        ))),
        None => Ok(()),
    }
}
