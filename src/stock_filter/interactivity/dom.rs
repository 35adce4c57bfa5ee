//! Element tree the interactivity runtime walks.
//!
//! [`parse_fragment`] hydrates server markup into the tree. It is a tolerant
//! tag scanner, not a full HTML parser: it understands void elements, quoted
//! and unquoted attributes, comments and character references, which covers
//! everything the block renderers emit.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)<!--.*?-->|<(/)?([A-Za-z][A-Za-z0-9:-]*)((?:\s+[^\s"'>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?)*)\s*(/)?>"#,
    )
    .expect("Invalid tag regex pattern")
});

static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("Invalid attribute regex pattern")
});

static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("Invalid entity regex pattern")
});

/// Index path from a root element to a descendant, counting child nodes.
pub type NodePath = Vec<usize>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Whitespace-collapsed text content of the subtree.
    pub fn text(&self) -> String {
        let mut raw = String::new();
        collect_text(self, &mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Element at `path`, or `None` if the path leaves the tree or lands on text.
    pub fn at(&self, path: &[usize]) -> Option<&Element> {
        let mut current = self;
        for &index in path {
            match current.children.get(index)? {
                Node::Element(el) => current = el,
                Node::Text(_) => return None,
            }
        }
        Some(current)
    }

    /// The elements from `self` down to the one at `path`, inclusive.
    pub fn ancestry(&self, path: &[usize]) -> Option<Vec<&Element>> {
        let mut chain = vec![self];
        let mut current = self;
        for &index in path {
            match current.children.get(index)? {
                Node::Element(el) => {
                    chain.push(el);
                    current = el;
                }
                Node::Text(_) => return None,
            }
        }
        Some(chain)
    }

    /// Depth-first path of the first element matching `pred`.
    pub fn find(&self, pred: impl Fn(&Element) -> bool) -> Option<NodePath> {
        self.find_all(pred).into_iter().next()
    }

    /// Depth-first paths of every element matching `pred`.
    pub fn find_all(&self, pred: impl Fn(&Element) -> bool) -> Vec<NodePath> {
        let mut found = Vec::new();
        let mut path = Vec::new();
        walk(self, &pred, &mut path, &mut found);
        found
    }

    /// Elements matching `pred`, in document order.
    pub fn select(&self, pred: impl Fn(&Element) -> bool) -> Vec<&Element> {
        self.find_all(pred)
            .iter()
            .filter_map(|path| self.at(path))
            .collect()
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            Node::Text(text) => {
                out.push(' ');
                out.push_str(text);
            }
            Node::Element(el) => collect_text(el, out),
        }
    }
}

fn walk(
    element: &Element,
    pred: &impl Fn(&Element) -> bool,
    path: &mut Vec<usize>,
    found: &mut Vec<NodePath>,
) {
    if pred(element) {
        found.push(path.clone());
    }
    for (index, child) in element.children.iter().enumerate() {
        if let Node::Element(el) = child {
            path.push(index);
            walk(el, pred, path, found);
            path.pop();
        }
    }
}

/// Hydrates a markup fragment into a tree under a synthetic `#fragment` root.
///
/// Whitespace-only text is dropped. Stray closing tags are ignored and
/// unclosed elements are closed at the end of input.
pub fn parse_fragment(markup: &str) -> Element {
    let mut stack: Vec<Element> = vec![Element::new("#fragment")];
    let mut last_end = 0;

    for caps in TAG_RE.captures_iter(markup) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_text(&mut stack, &markup[last_end..whole.start()]);
        last_end = whole.end();

        let Some(tag) = caps.get(2) else {
            // comment
            continue;
        };
        let tag = tag.as_str().to_ascii_lowercase();

        if caps.get(1).is_some() {
            close_element(&mut stack, &tag);
            continue;
        }

        let mut element = Element::new(tag.clone());
        if let Some(attrs) = caps.get(3) {
            element.attributes = parse_attributes(attrs.as_str());
        }

        let self_closing = caps.get(4).is_some() || VOID_ELEMENTS.contains(&tag.as_str());
        if self_closing {
            append(&mut stack, element);
        } else {
            stack.push(element);
        }
    }
    push_text(&mut stack, &markup[last_end..]);

    while stack.len() > 1 {
        if let Some(open) = stack.pop() {
            append(&mut stack, open);
        }
    }
    stack.pop().unwrap_or_else(|| Element::new("#fragment"))
}

fn parse_attributes(raw: &str) -> Vec<(String, String)> {
    ATTR_RE
        .captures_iter(raw)
        .map(|caps| {
            let name = caps[1].to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| decode_entities(m.as_str()))
                .unwrap_or_default();
            (name, value)
        })
        .collect()
}

fn push_text(stack: &mut [Element], raw: &str) {
    if raw.trim().is_empty() {
        return;
    }
    if let Some(top) = stack.last_mut() {
        top.children.push(Node::Text(decode_entities(raw)));
    }
}

fn append(stack: &mut [Element], element: Element) {
    if let Some(top) = stack.last_mut() {
        top.children.push(Node::Element(element));
    }
}

fn close_element(stack: &mut Vec<Element>, tag: &str) {
    let Some(open_index) = stack.iter().rposition(|el| el.tag == tag) else {
        tracing::debug!(tag, "ignoring stray closing tag");
        return;
    };
    if open_index == 0 {
        return;
    }
    while stack.len() > open_index {
        if let Some(closed) = stack.pop() {
            append(stack, closed);
        }
    }
}

/// Replaces character references with the characters they stand for.
///
/// Unknown named references are left untouched.
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    ENTITY_RE
        .replace_all(raw, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    _ => None,
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
