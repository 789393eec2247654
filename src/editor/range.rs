use crate::markup::{Element, Node, char_to_byte_idx};

/// Half-open range of character offsets into the region's text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn collapsed(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    pub(crate) fn clamp(self, max: usize) -> Self {
        Self {
            start: self.start.min(max),
            end: self.end.min(max),
        }
    }
}

/// Position between two children of some element in the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct InsertionPoint {
    pub path: Vec<usize>,
    pub index: usize,
}

/// Finds the deepest element whose text covers `range`.
///
/// Returns the child-index path to that element (empty for the root list)
/// and the text offset at which its content starts.
pub(crate) fn container_path(nodes: &[Node], range: TextRange) -> (Vec<usize>, usize) {
    let mut path = Vec::new();
    let mut base = 0;
    let mut current = nodes;

    'descend: loop {
        let mut pos = base;
        for (idx, node) in current.iter().enumerate() {
            let len = node.text_len();
            if let Node::Element(element) = node
                && !element.is_void()
                && len > 0
                && covers(element, pos, len, range)
            {
                path.push(idx);
                base = pos;
                current = &element.children;
                continue 'descend;
            }
            pos += len;
        }
        break;
    }

    (path, base)
}

// A caret sitting exactly on the edge of a heading belongs outside of it.
fn covers(element: &Element, pos: usize, len: usize, range: TextRange) -> bool {
    if range.is_collapsed() && element.heading_level().is_some() {
        pos < range.start && range.start < pos + len
    } else {
        pos <= range.start && range.end <= pos + len
    }
}

pub(crate) fn children_at_mut<'a>(
    nodes: &'a mut Vec<Node>,
    path: &[usize],
) -> Option<&'a mut Vec<Node>> {
    let mut current = nodes;
    for &idx in path {
        match current.get_mut(idx) {
            Some(Node::Element(element)) => current = &mut element.children,
            _ => return None,
        }
    }
    Some(current)
}

/// Splits `children` so that `at` falls on a child boundary and returns the
/// index of the first child after that boundary.
///
/// A text node is cut in two; an element is cut into two shallow copies that
/// share tag and attributes, the way a DOM range splits partially selected
/// nodes.
pub(crate) fn split_children_at(children: &mut Vec<Node>, at: usize) -> usize {
    let mut pos = 0;
    for idx in 0..children.len() {
        if at <= pos {
            return idx;
        }
        let len = children[idx].text_len();
        if at < pos + len {
            let node = children.remove(idx);
            let (left, right) = split_node(node, at - pos);
            children.insert(idx, right);
            children.insert(idx, left);
            return idx + 1;
        }
        pos += len;
    }
    children.len()
}

fn split_node(node: Node, at: usize) -> (Node, Node) {
    match node {
        Node::Text(mut text) => {
            let byte_idx = char_to_byte_idx(&text, at);
            let right = text.split_off(byte_idx);
            (Node::Text(text), Node::Text(right))
        }
        Node::Element(mut element) => {
            let idx = split_children_at(&mut element.children, at);
            let right_children = element.children.split_off(idx);
            let right = Element {
                tag: element.tag.clone(),
                attributes: element.attributes.clone(),
                children: right_children,
            };
            (Node::Element(element), Node::Element(right))
        }
    }
}

/// Removes the content covered by `range` and returns it together with the
/// point where it used to be.
pub(crate) fn extract_range(
    nodes: &mut Vec<Node>,
    range: TextRange,
) -> Option<(Vec<Node>, InsertionPoint)> {
    let (path, base) = container_path(nodes, range);
    let children = children_at_mut(nodes, &path)?;
    let start_idx = split_children_at(children, range.start - base);
    let end_idx = split_children_at(children, range.end - base);
    let extracted: Vec<Node> = children.drain(start_idx..end_idx).collect();
    Some((
        extracted,
        InsertionPoint {
            path,
            index: start_idx,
        },
    ))
}

/// Removes the element at `path` if an extraction left it without content,
/// then its parent if that is now empty too, and so on up the path.
pub(crate) fn remove_emptied_containers(nodes: &mut Vec<Node>, path: &[usize]) {
    for depth in (1..=path.len()).rev() {
        let Some(siblings) = children_at_mut(nodes, &path[..depth - 1]) else {
            return;
        };
        let idx = path[depth - 1];
        let emptied = matches!(
            siblings.get(idx),
            Some(Node::Element(element)) if !element.is_void() && element.children.is_empty()
        );
        if !emptied {
            return;
        }
        siblings.remove(idx);
    }
}

/// Splits the tree at `at` and returns the resulting insertion point.
pub(crate) fn point_at(nodes: &mut Vec<Node>, at: usize) -> Option<InsertionPoint> {
    let (path, base) = container_path(nodes, TextRange::collapsed(at));
    let children = children_at_mut(nodes, &path)?;
    let index = split_children_at(children, at - base);
    Some(InsertionPoint { path, index })
}

/// Inserts `node` at `point`, handing it back when the point is stale.
pub(crate) fn insert_at(
    nodes: &mut Vec<Node>,
    point: &InsertionPoint,
    node: Node,
) -> Result<(), Node> {
    let Some(children) = children_at_mut(nodes, &point.path) else {
        return Err(node);
    };
    let index = point.index.min(children.len());
    children.insert(index, node);
    Ok(())
}

/// Text covered by `range`. Line breaks take up an offset but add no text.
pub(crate) fn text_in_range(nodes: &[Node], range: TextRange) -> String {
    let mut out = String::new();
    collect_text(nodes, range, &mut 0, &mut out);
    out
}

fn collect_text(nodes: &[Node], range: TextRange, pos: &mut usize, out: &mut String) {
    for node in nodes {
        if *pos >= range.end {
            return;
        }
        let len = node.text_len();
        let node_end = *pos + len;
        if node_end <= range.start {
            *pos = node_end;
            continue;
        }
        match node {
            Node::Text(text) => {
                let from = range.start.saturating_sub(*pos);
                let to = (range.end - *pos).min(len);
                let start = char_to_byte_idx(text, from);
                let end = char_to_byte_idx(text, to);
                out.push_str(&text[start..end]);
                *pos = node_end;
            }
            Node::Element(element) if element.is_void() => *pos = node_end,
            Node::Element(element) => collect_text(&element.children, range, pos, out),
        }
    }
}
