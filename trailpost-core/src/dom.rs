//! In-memory HTML document that content is bound into.
//!
//! Templates are parsed with `scraper` (html5ever) and copied into a small
//! mutable arena. Lookups by element id return `Option`: a template without
//! the element simply has nothing to bind.

use ego_tree::NodeRef;
use scraper::{Html, Node as HtmlNode};

type NodeId = usize;

const ROOT: NodeId = 0;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Children of these are written back without escaping. html5ever tokenizes
/// their content as raw text; `noscript` included since scripting is enabled.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe",
    "noembed",
    "noframes",
    "noscript",
    "plaintext",
    "script",
    "style",
    "xmp",
];

#[derive(Debug, Clone)]
enum NodeData {
    Document,
    Doctype(String),
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct ElementData {
    name: String,
    attrs: Vec<(String, String)>,
}

impl ElementData {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    children: Vec<NodeId>,
}

/// A parsed page
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<Node>,
}

impl Dom {
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let mut dom = Dom {
            nodes: vec![Node {
                data: NodeData::Document,
                children: Vec::new(),
            }],
        };
        let children = dom.import_children(parsed.tree.root());
        dom.nodes[ROOT].children = children;
        dom
    }

    /// Look up an element by its `id` attribute (first in document order)
    pub fn element(&self, id: &str) -> Option<ElementView<'_>> {
        let node = self.find(|el| el.attr("id") == Some(id))?;
        Some(ElementView { dom: self, node })
    }

    pub fn element_mut(&mut self, id: &str) -> Option<ElementMut<'_>> {
        let node = self.find(|el| el.attr("id") == Some(id))?;
        Some(ElementMut { dom: self, node })
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.find(|el| el.attr("id") == Some(id)).is_some()
    }

    /// Text of the document-level `<title>`
    pub fn title(&self) -> Option<String> {
        let node = self.find(|el| el.name == "title")?;
        Some(self.text_of(node))
    }

    /// Set the document-level title, creating `<title>` in `<head>` if needed
    pub fn set_title(&mut self, title: &str) {
        let node = match self.find(|el| el.name == "title") {
            Some(node) => node,
            None => {
                let Some(head) = self.find(|el| el.name == "head") else {
                    tracing::debug!("Template has no <head>; title not set");
                    return;
                };
                let node = self.push(NodeData::Element(ElementData {
                    name: "title".to_string(),
                    attrs: Vec::new(),
                }));
                self.nodes[head].children.push(node);
                node
            }
        };
        self.replace_with_text(node, title);
    }

    /// Serialize the document back to HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_node(ROOT, &mut out, false);
        out
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node {
            data,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    fn import_children(&mut self, parent: NodeRef<'_, HtmlNode>) -> Vec<NodeId> {
        parent
            .children()
            .filter_map(|child| self.import(child))
            .collect()
    }

    fn import(&mut self, node: NodeRef<'_, HtmlNode>) -> Option<NodeId> {
        let data = match node.value() {
            HtmlNode::Doctype(doctype) => NodeData::Doctype(doctype.name().to_string()),
            HtmlNode::Element(element) => NodeData::Element(ElementData {
                name: element.name().to_string(),
                attrs: element
                    .attrs()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }),
            HtmlNode::Text(text) => NodeData::Text(String::from(&**text)),
            HtmlNode::Comment(comment) => NodeData::Comment(String::from(&**comment)),
            _ => return None,
        };

        let id = self.push(data);
        let children = self.import_children(node);
        self.nodes[id].children = children;
        Some(id)
    }

    /// Parse markup in body context and return the new top-level nodes
    fn import_fragment(&mut self, html: &str) -> Vec<NodeId> {
        let parsed = Html::parse_fragment(html);
        let root = parsed.tree.root();
        let container = root
            .children()
            .find(|c| matches!(c.value(), HtmlNode::Element(e) if e.name() == "html"))
            .unwrap_or(root);
        self.import_children(container)
    }

    /// Pre-order search over elements reachable from the root
    fn find<F>(&self, mut pred: F) -> Option<NodeId>
    where
        F: FnMut(&ElementData) -> bool,
    {
        let mut stack = vec![ROOT];
        while let Some(node) = stack.pop() {
            if let NodeData::Element(el) = &self.nodes[node].data {
                if pred(el) {
                    return Some(node);
                }
            }
            stack.extend(self.nodes[node].children.iter().rev());
        }
        None
    }

    fn element_data(&self, node: NodeId) -> &ElementData {
        match &self.nodes[node].data {
            NodeData::Element(el) => el,
            _ => unreachable!("element handles only point at elements"),
        }
    }

    fn element_data_mut(&mut self, node: NodeId) -> &mut ElementData {
        match &mut self.nodes[node].data {
            NodeData::Element(el) => el,
            _ => unreachable!("element handles only point at elements"),
        }
    }

    fn replace_with_text(&mut self, node: NodeId, text: &str) {
        let children = if text.is_empty() {
            Vec::new()
        } else {
            vec![self.push(NodeData::Text(text.to_string()))]
        };
        self.nodes[node].children = children;
    }

    fn text_of(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node].data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Comment(_) | NodeData::Doctype(_) => {}
            NodeData::Document | NodeData::Element(_) => {
                for &child in &self.nodes[node].children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    fn write_children(&self, node: NodeId, out: &mut String, raw_text: bool) {
        for &child in &self.nodes[node].children {
            self.write_node(child, out, raw_text);
        }
    }

    fn write_node(&self, node: NodeId, out: &mut String, raw_text: bool) {
        match &self.nodes[node].data {
            NodeData::Document => self.write_children(node, out, false),
            NodeData::Doctype(name) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(name);
                out.push('>');
            }
            NodeData::Text(text) if raw_text => out.push_str(text),
            NodeData::Text(text) => escape_text(text, out),
            NodeData::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(&el.name);
                for (name, value) in &el.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_attr(value, out);
                    out.push('"');
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&el.name.as_str()) {
                    return;
                }

                let raw = RAW_TEXT_ELEMENTS.contains(&el.name.as_str());
                self.write_children(node, out, raw);

                out.push_str("</");
                out.push_str(&el.name);
                out.push('>');
            }
        }
    }
}

/// Read-only handle to an element
#[derive(Clone, Copy)]
pub struct ElementView<'a> {
    dom: &'a Dom,
    node: NodeId,
}

impl ElementView<'_> {
    pub fn tag_name(&self) -> &str {
        &self.dom.element_data(self.node).name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.dom.element_data(self.node).attr(name)
    }

    /// Concatenated text of all descendants
    pub fn text(&self) -> String {
        self.dom.text_of(self.node)
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        let raw = RAW_TEXT_ELEMENTS.contains(&self.tag_name());
        self.dom.write_children(self.node, &mut out, raw);
        out
    }
}

/// Mutable handle to an element
pub struct ElementMut<'a> {
    dom: &'a mut Dom,
    node: NodeId,
}

impl ElementMut<'_> {
    pub fn tag_name(&self) -> &str {
        &self.dom.element_data(self.node).name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.dom.element_data(self.node).attr(name)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        let el = self.dom.element_data_mut(self.node);
        match el.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => el.attrs.push((name.to_string(), value.to_string())),
        }
    }

    /// Set one inline style property, keeping the others
    pub fn set_style(&mut self, property: &str, value: &str) {
        let current = self.attr("style").unwrap_or("");
        let mut decls: Vec<(String, String)> = split_declarations(current)
            .into_iter()
            .filter_map(|decl| {
                let (name, val) = decl.split_once(':')?;
                let name = name.trim();
                (!name.is_empty()).then(|| (name.to_string(), val.trim().to_string()))
            })
            .collect();

        match decls
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(property))
        {
            Some((_, val)) => *val = value.to_string(),
            None => decls.push((property.to_string(), value.to_string())),
        }

        let style = decls
            .iter()
            .map(|(name, val)| format!("{}: {}", name, val))
            .collect::<Vec<_>>()
            .join("; ");
        self.set_attr("style", &style);
    }

    /// Replace the content with plain text
    pub fn set_text(&mut self, text: &str) {
        self.dom.replace_with_text(self.node, text);
    }

    /// Replace the content with parsed markup
    pub fn set_inner_html(&mut self, html: &str) {
        let children = self.dom.import_fragment(html);
        self.dom.nodes[self.node].children = children;
    }

    pub fn text(&self) -> String {
        self.dom.text_of(self.node)
    }
}

/// Split an inline style on `;`, ignoring any inside parentheses or quotes
fn split_declarations(style: &str) -> Vec<&str> {
    let mut decls = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in style.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                decls.push(&style[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    decls.push(&style[start..]);
    decls
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}
