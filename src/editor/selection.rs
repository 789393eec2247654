use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::markup::Node;

/// The surface the mutation logic needs from whatever holds the selection.
///
/// `Region` implements this over the in-memory element tree; tests can
/// provide a fake.
pub trait SelectionHost {
    /// Text of the current selection, or `None` when no range exists.
    fn selected_text(&self) -> Option<String>;

    /// Removes the selected content and hands it back. The selection
    /// collapses to where the content used to start.
    fn extract_selection(&mut self) -> Option<Vec<Node>>;

    /// Inserts `node` at the start of the selection, or appends it to the
    /// end of the region when no range exists.
    fn insert_at_selection_or_append(&mut self, node: Node);

    fn clear_selection(&mut self);

    /// Replaces the selected content with `node`. Returns `false` and leaves
    /// the host untouched when no range exists.
    fn replace_selection_with(&mut self, node: Node) -> bool {
        if self.extract_selection().is_none() {
            return false;
        }
        self.insert_at_selection_or_append(node);
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleClass {
    Highlight,
    Circle,
}

impl StyleClass {
    pub const ALL: [StyleClass; 2] = [StyleClass::Highlight, StyleClass::Circle];

    pub fn as_str(self) -> &'static str {
        match self {
            StyleClass::Highlight => "highlight",
            StyleClass::Circle => "circle",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StyleClass::Highlight => "Highlight",
            StyleClass::Circle => "Circle",
        }
    }
}

impl fmt::Display for StyleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown style class `{0}`")]
pub struct UnknownStyleClass(pub String);

impl FromStr for StyleClass {
    type Err = UnknownStyleClass;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        StyleClass::ALL
            .into_iter()
            .find(|class| class.as_str() == value)
            .ok_or_else(|| UnknownStyleClass(value.to_string()))
    }
}
