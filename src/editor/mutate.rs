use log::debug;

use super::selection::{SelectionHost, StyleClass};
use crate::markup::{Element, Node};
use crate::prompt::PromptOutcome;

pub const HEADLINE_TAG: &str = "h2";
pub const HEADLINE_PLACEHOLDER: &str = "Headline";

fn headline(text: String) -> Node {
    Element::new(HEADLINE_TAG).with_text(text).into()
}

/// Turns the selection into a headline, or appends a placeholder headline
/// when there is no selection at all.
pub fn insert_headline<H: SelectionHost + ?Sized>(host: &mut H) {
    match host.selected_text() {
        Some(text) => {
            let text = if text.is_empty() {
                HEADLINE_PLACEHOLDER.to_string()
            } else {
                text
            };
            debug!("replacing selection with headline {text:?}");
            host.replace_selection_with(headline(text));
        }
        None => {
            debug!("no selection, appending headline");
            host.insert_at_selection_or_append(headline(HEADLINE_PLACEHOLDER.to_string()));
        }
    }
}

/// Moves the selected content into a `span` carrying `class`.
///
/// Returns `false` without touching the host when no selection exists.
pub fn wrap_selection<H: SelectionHost + ?Sized>(host: &mut H, class: StyleClass) -> bool {
    let Some(contents) = host.extract_selection() else {
        return false;
    };
    debug!("wrapping {} node(s) in .{class}", contents.len());
    let span = Element::new("span")
        .with_class(class.as_str())
        .with_children(contents);
    host.insert_at_selection_or_append(span.into());
    host.clear_selection();
    true
}

pub fn add_side_note(side_notes: &mut Vec<String>, input: PromptOutcome) -> bool {
    let Some(text) = input.into_text() else {
        return false;
    };
    side_notes.push(text);
    true
}
