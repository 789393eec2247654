use log::debug;

use super::range::{
    InsertionPoint, TextRange, children_at_mut, extract_range, insert_at, point_at,
    remove_emptied_containers, text_in_range,
};
use super::selection::SelectionHost;
use crate::markup::{self, Element, Node};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub focus: usize,
}

impl Selection {
    pub fn new(anchor: usize, focus: usize) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(at: usize) -> Self {
        Self {
            anchor: at,
            focus: at,
        }
    }

    pub fn range(&self) -> TextRange {
        TextRange::new(self.anchor, self.focus)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// The editable region: an element tree plus the current selection.
#[derive(Clone, Debug, Default)]
pub struct Region {
    nodes: Vec<Node>,
    selection: Option<Selection>,
    // Where the last extraction happened, so the next insertion lands in the
    // same container even if that container is now empty.
    pending_point: Option<(usize, InsertionPoint)>,
}

impl Region {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_markup(markup: &str) -> Self {
        Self::from_nodes(markup::parse(markup))
    }

    pub fn from_nodes(mut nodes: Vec<Node>) -> Self {
        markup::normalize(&mut nodes);
        Self {
            nodes,
            selection: None,
            pending_point: None,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn to_markup(&self) -> String {
        markup::serialize(&self.nodes)
    }

    /// Replaces the whole content. Any selection is dropped.
    pub fn set_markup(&mut self, markup: &str) {
        *self = Self::from_markup(markup);
    }

    pub fn text_len(&self) -> usize {
        markup::text_len(&self.nodes)
    }

    pub fn text_content(&self) -> String {
        markup::text_content(&self.nodes)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn select(&mut self, anchor: usize, focus: usize) {
        let len = self.text_len();
        self.selection = Some(Selection::new(anchor.min(len), focus.min(len)));
        self.settle();
    }

    pub fn collapse_to(&mut self, at: usize) {
        self.select(at, at);
    }

    pub fn insert_text(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let at = self.take_insertion_offset();
        let Some(point) = point_at(&mut self.nodes, at) else {
            return false;
        };
        let Some(children) = children_at_mut(&mut self.nodes, &point.path) else {
            return false;
        };
        let idx = point.index;
        if idx > 0
            && let Some(Node::Text(previous)) = children.get_mut(idx - 1)
        {
            previous.push_str(text);
        } else if let Some(Node::Text(next)) = children.get_mut(idx) {
            next.insert_str(0, text);
        } else {
            children.insert(idx, Node::text(text));
        }
        self.selection = Some(Selection::collapsed(at + text.chars().count()));
        self.settle();
        true
    }

    pub fn insert_line_break(&mut self) -> bool {
        let at = self.take_insertion_offset();
        let Some(point) = point_at(&mut self.nodes, at) else {
            return false;
        };
        if let Err(node) = insert_at(&mut self.nodes, &point, Element::new("br").into()) {
            self.nodes.push(node);
        }
        self.selection = Some(Selection::collapsed(at + 1));
        self.settle();
        true
    }

    pub fn delete_backward(&mut self) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };
        if !selection.is_collapsed() {
            return self.delete_range(selection.range());
        }
        let caret = selection.focus.min(self.text_len());
        if caret == 0 {
            return false;
        }
        self.delete_range(TextRange::new(caret - 1, caret))
    }

    pub fn delete_forward(&mut self) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };
        if !selection.is_collapsed() {
            return self.delete_range(selection.range());
        }
        let caret = selection.focus;
        if caret >= self.text_len() {
            return false;
        }
        self.delete_range(TextRange::new(caret, caret + 1))
    }

    pub fn delete_range(&mut self, range: TextRange) -> bool {
        let range = range.clamp(self.text_len());
        if range.is_collapsed() {
            return false;
        }
        let Some((removed, point)) = extract_range(&mut self.nodes, range) else {
            return false;
        };
        debug!(
            "deleted {} characters at {}",
            markup::text_len(&removed),
            range.start
        );
        remove_emptied_containers(&mut self.nodes, &point.path);
        self.selection = Some(Selection::collapsed(range.start));
        self.settle();
        true
    }

    fn take_insertion_offset(&mut self) -> usize {
        match self.selection {
            Some(selection) => {
                let range = selection.range().clamp(self.text_len());
                if !range.is_collapsed() {
                    self.delete_range(range);
                }
                range.start
            }
            None => self.text_len(),
        }
    }

    fn settle(&mut self) {
        self.pending_point = None;
        markup::normalize(&mut self.nodes);
    }
}

impl SelectionHost for Region {
    fn selected_text(&self) -> Option<String> {
        let selection = self.selection?;
        let range = selection.range().clamp(self.text_len());
        Some(text_in_range(&self.nodes, range))
    }

    fn extract_selection(&mut self) -> Option<Vec<Node>> {
        let selection = self.selection?;
        let range = selection.range().clamp(self.text_len());
        let (extracted, point) = extract_range(&mut self.nodes, range)?;
        self.selection = Some(Selection::collapsed(range.start));
        self.pending_point = Some((range.start, point));
        Some(extracted)
    }

    fn insert_at_selection_or_append(&mut self, node: Node) {
        let len = node.text_len();
        match self.selection {
            Some(selection) => {
                let at = selection.range().start.min(self.text_len());
                let point = match self.pending_point.take() {
                    Some((offset, point)) if offset == at => Some(point),
                    _ => point_at(&mut self.nodes, at),
                };
                let result = match point {
                    Some(point) => insert_at(&mut self.nodes, &point, node),
                    None => Err(node),
                };
                if let Err(node) = result {
                    self.nodes.push(node);
                }
                self.selection = Some(Selection::collapsed(at + len));
            }
            None => self.nodes.push(node),
        }
        self.settle();
    }

    fn clear_selection(&mut self) {
        self.selection = None;
        self.settle();
    }
}
