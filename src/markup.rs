//! Element tree for the editable region.
//!
//! The region is kept as a small tree of elements and text nodes. It is
//! serialized the way a browser serializes `innerHTML`, and loaded content is
//! read back with a lenient parser that never fails: stray end tags are
//! dropped, unclosed elements are closed at the end of input and unknown
//! entities are kept as literal text.

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "div",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "ol",
    "p",
    "pre",
    "section",
    "ul",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

#[derive(Clone, Debug, PartialEq, Eq)]
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

    pub fn with_class(mut self, class: &str) -> Self {
        self.set_attribute("class", class);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children = vec![Node::Text(text.into())];
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        if let Some(entry) = self.attributes.iter_mut().find(|(key, _)| key == name) {
            entry.1 = value.to_string();
        } else {
            self.attributes.push((name.to_string(), value.to_string()));
        }
    }

    pub fn is_void(&self) -> bool {
        VOID_TAGS.contains(&self.tag.as_str())
    }

    pub fn is_block(&self) -> bool {
        BLOCK_TAGS.contains(&self.tag.as_str())
    }

    /// Heading level for `h1`..`h6`.
    pub fn heading_level(&self) -> Option<u8> {
        let digit = self.tag.strip_prefix('h')?;
        match digit.parse::<u8>() {
            Ok(level @ 1..=6) => Some(level),
            _ => None,
        }
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    /// Number of characters this node contributes to the region's text.
    ///
    /// A line break counts as one character; other void elements count as
    /// zero.
    pub fn text_len(&self) -> usize {
        match self {
            Node::Text(text) => text.chars().count(),
            Node::Element(element) if element.tag == "br" => 1,
            Node::Element(element) => text_len(&element.children),
        }
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text_content(&mut out);
        out
    }

    fn push_text_content(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) if element.tag == "br" => out.push('\n'),
            Node::Element(element) => {
                for child in &element.children {
                    child.push_text_content(out);
                }
            }
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

pub fn text_len(nodes: &[Node]) -> usize {
    nodes.iter().map(Node::text_len).sum()
}

pub fn text_content(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.push_text_content(&mut out);
    }
    out
}

pub fn char_to_byte_idx(text: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    for (count, (byte_idx, _)) in text.char_indices().enumerate() {
        if count == char_idx {
            return byte_idx;
        }
    }
    text.len()
}

/// Merges adjacent text nodes and drops empty ones, recursively.
pub fn normalize(nodes: &mut Vec<Node>) {
    let mut merged: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes.drain(..) {
        match node {
            Node::Text(text) if text.is_empty() => {}
            Node::Text(text) => {
                if let Some(Node::Text(previous)) = merged.last_mut() {
                    previous.push_str(&text);
                } else {
                    merged.push(Node::Text(text));
                }
            }
            Node::Element(mut element) => {
                normalize(&mut element.children);
                merged.push(Node::Element(element));
            }
        }
    }
    *nodes = merged;
}

pub fn serialize(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => escape_text(text, out),
        Node::Element(element) => {
            out.push('<');
            out.push_str(&element.tag);
            for (name, value) in &element.attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_attribute(value, out);
                out.push('"');
            }
            out.push('>');
            if element.is_void() {
                return;
            }
            for child in &element.children {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(&element.tag);
            out.push('>');
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

pub fn parse(input: &str) -> Vec<Node> {
    let mut parser = Parser {
        input,
        pos: 0,
        root: Vec::new(),
        stack: Vec::new(),
        text: String::new(),
    };
    parser.run();
    parser.finish()
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    root: Vec<Node>,
    stack: Vec<Element>,
    text: String,
}

impl Parser<'_> {
    fn run(&mut self) {
        while self.pos < self.input.len() {
            let rest = &self.input[self.pos..];
            if let Some(comment) = rest.strip_prefix("<!--") {
                self.flush_text();
                self.pos = match comment.find("-->") {
                    Some(end) => self.pos + 4 + end + 3,
                    None => self.input.len(),
                };
            } else if rest.starts_with("</") {
                match rest.find('>') {
                    Some(end) => {
                        let name = rest[2..end].trim().to_ascii_lowercase();
                        self.flush_text();
                        self.close(&name);
                        self.pos += end + 1;
                    }
                    None => {
                        self.text.push_str(rest);
                        self.pos = self.input.len();
                    }
                }
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.flush_text();
                self.pos = match rest.find('>') {
                    Some(end) => self.pos + end + 1,
                    None => self.input.len(),
                };
            } else if rest.starts_with('<')
                && rest[1..].starts_with(|ch: char| ch.is_ascii_alphabetic())
            {
                match parse_start_tag(rest) {
                    Some((element, self_closing, consumed)) => {
                        self.flush_text();
                        self.open(element, self_closing);
                        self.pos += consumed;
                    }
                    None => {
                        self.text.push('<');
                        self.pos += 1;
                    }
                }
            } else {
                let first = rest.chars().next().map_or(1, char::len_utf8);
                let end = rest[first..]
                    .find('<')
                    .map(|idx| idx + first)
                    .unwrap_or(rest.len());
                decode_entities_into(&rest[..end], &mut self.text);
                self.pos += end;
            }
        }
    }

    fn append(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root.push(node),
        }
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.append(Node::Text(text));
        }
    }

    fn open(&mut self, element: Element, self_closing: bool) {
        if self_closing || element.is_void() {
            self.append(Node::Element(element));
        } else {
            self.stack.push(element);
        }
    }

    fn close(&mut self, name: &str) {
        let Some(idx) = self.stack.iter().rposition(|element| element.tag == name) else {
            return;
        };
        while self.stack.len() > idx {
            if let Some(element) = self.stack.pop() {
                self.append(Node::Element(element));
            }
        }
    }

    fn finish(mut self) -> Vec<Node> {
        self.flush_text();
        while let Some(element) = self.stack.pop() {
            self.append(Node::Element(element));
        }
        normalize(&mut self.root);
        self.root
    }
}

fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b':')
}

fn parse_start_tag(src: &str) -> Option<(Element, bool, usize)> {
    let bytes = src.as_bytes();
    let mut idx = 1;
    while idx < bytes.len() && is_name_byte(bytes[idx]) {
        idx += 1;
    }
    let mut element = Element::new(src[1..idx].to_ascii_lowercase());

    loop {
        while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
            idx += 1;
        }
        if idx >= bytes.len() {
            return None;
        }
        match bytes[idx] {
            b'>' => return Some((element, false, idx + 1)),
            b'/' => {
                idx += 1;
                if bytes.get(idx) == Some(&b'>') {
                    return Some((element, true, idx + 1));
                }
            }
            _ => {
                let start = idx;
                while idx < bytes.len()
                    && !bytes[idx].is_ascii_whitespace()
                    && !matches!(bytes[idx], b'=' | b'>' | b'/')
                {
                    idx += 1;
                }
                let name = src[start..idx].to_ascii_lowercase();
                while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
                    idx += 1;
                }
                let mut value = String::new();
                if bytes.get(idx) == Some(&b'=') {
                    idx += 1;
                    while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
                        idx += 1;
                    }
                    match bytes.get(idx) {
                        Some(&quote) if quote == b'"' || quote == b'\'' => {
                            let close = src[idx + 1..].find(quote as char)?;
                            decode_entities_into(&src[idx + 1..idx + 1 + close], &mut value);
                            idx += close + 2;
                        }
                        Some(_) => {
                            let start = idx;
                            while idx < bytes.len()
                                && !bytes[idx].is_ascii_whitespace()
                                && bytes[idx] != b'>'
                            {
                                idx += 1;
                            }
                            decode_entities_into(&src[start..idx], &mut value);
                        }
                        None => return None,
                    }
                }
                if !name.is_empty() {
                    element.attributes.push((name, value));
                }
            }
        }
    }
}

fn decode_entities_into(raw: &str, out: &mut String) {
    out.push_str(&html_escape::decode_html_entities(raw));
}

#[cfg(test)]
#[path = "markup_tests.rs"]
mod markup_tests;
