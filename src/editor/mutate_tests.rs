use super::*;
use crate::markup::{Element, Node, serialize};
use crate::prompt::PromptOutcome;

/// Selection over whole top-level nodes, recording what was asked of it.
#[derive(Default)]
struct FakeHost {
    nodes: Vec<Node>,
    selection: Option<(usize, usize)>,
    calls: Vec<&'static str>,
}

impl FakeHost {
    fn with_texts(texts: &[&str]) -> Self {
        Self {
            nodes: texts.iter().map(|text| Node::text(*text)).collect(),
            ..Self::default()
        }
    }

    fn selecting(mut self, start: usize, end: usize) -> Self {
        self.selection = Some((start, end));
        self
    }

    fn markup(&self) -> String {
        serialize(&self.nodes)
    }
}

impl SelectionHost for FakeHost {
    fn selected_text(&self) -> Option<String> {
        let (start, end) = self.selection?;
        Some(crate::markup::text_content(&self.nodes[start..end]))
    }

    fn extract_selection(&mut self) -> Option<Vec<Node>> {
        let (start, end) = self.selection?;
        self.calls.push("extract");
        self.selection = Some((start, start));
        Some(self.nodes.drain(start..end).collect())
    }

    fn insert_at_selection_or_append(&mut self, node: Node) {
        self.calls.push("insert");
        match self.selection {
            Some((start, _)) => {
                self.nodes.insert(start, node);
                self.selection = Some((start + 1, start + 1));
            }
            None => self.nodes.push(node),
        }
    }

    fn clear_selection(&mut self) {
        self.calls.push("clear");
        self.selection = None;
    }
}

fn count_headings(nodes: &[Node]) -> usize {
    nodes
        .iter()
        .filter_map(Node::as_element)
        .map(|element| {
            usize::from(element.tag == HEADLINE_TAG) + count_headings(&element.children)
        })
        .sum()
}

#[test]
fn wrap_moves_selected_content_into_one_styled_span() {
    let mut host = FakeHost::with_texts(&["before ", "picked", " after"]).selecting(1, 2);
    assert!(wrap_selection(&mut host, StyleClass::Highlight));

    assert_eq!(
        host.markup(),
        "before <span class=\"highlight\">picked</span> after"
    );
    assert_eq!(host.markup().matches("picked").count(), 1);
    assert_eq!(host.calls, ["extract", "insert", "clear"]);
    assert_eq!(host.selection, None);
}

#[test]
fn wrap_keeps_everything_outside_the_selection() {
    let mut host = FakeHost::with_texts(&["one", "two", "three", "four"]).selecting(1, 3);
    wrap_selection(&mut host, StyleClass::Circle);

    assert_eq!(host.nodes.len(), 3);
    assert_eq!(host.nodes[0], Node::text("one"));
    assert_eq!(host.nodes[2], Node::text("four"));
    let span = host.nodes[1].as_element().unwrap();
    assert_eq!(span.attribute("class"), Some("circle"));
    assert_eq!(span.children, vec![Node::text("two"), Node::text("three")]);
}

#[test]
fn wrap_without_selection_does_nothing() {
    let mut host = FakeHost::with_texts(&["text"]);
    assert!(!wrap_selection(&mut host, StyleClass::Highlight));
    assert_eq!(host.markup(), "text");
    assert!(host.calls.is_empty());
}

#[test]
fn headline_takes_the_selected_text() {
    let mut host = FakeHost::with_texts(&["a", "Big news", "b"]).selecting(1, 2);
    insert_headline(&mut host);

    assert_eq!(host.markup(), "a<h2>Big news</h2>b");
    assert_eq!(count_headings(&host.nodes), 1);
}

#[test]
fn headline_flattens_selected_markup_to_text() {
    let bold = Element::new("b").with_text("bold");
    let mut host = FakeHost {
        nodes: vec![Node::text("x"), bold.into(), Node::text(" y")],
        ..FakeHost::default()
    }
    .selecting(1, 3);
    insert_headline(&mut host);

    assert_eq!(host.markup(), "x<h2>bold y</h2>");
}

#[test]
fn headline_for_empty_selection_uses_placeholder() {
    let mut host = FakeHost::with_texts(&["a", "b"]).selecting(1, 1);
    insert_headline(&mut host);

    assert_eq!(host.markup(), "a<h2>Headline</h2>b");
    assert_eq!(count_headings(&host.nodes), 1);
}

#[test]
fn headline_without_selection_is_appended_with_placeholder() {
    let mut host = FakeHost::with_texts(&["a", "b"]);
    insert_headline(&mut host);

    assert_eq!(host.markup(), "ab<h2>Headline</h2>");
    assert_eq!(host.calls, ["insert"]);
}

#[test]
fn side_note_is_appended_in_order() {
    let mut notes = vec!["first".to_string()];
    assert!(add_side_note(
        &mut notes,
        PromptOutcome::Submitted("Remember milk".to_string())
    ));
    assert_eq!(notes, ["first", "Remember milk"]);
}

#[test]
fn cancelled_or_empty_side_note_is_ignored() {
    let mut notes = vec!["first".to_string()];
    assert!(!add_side_note(&mut notes, PromptOutcome::Cancelled));
    assert!(!add_side_note(&mut notes, PromptOutcome::Submitted(String::new())));
    assert_eq!(notes, ["first"]);
}

#[test]
fn style_classes_parse_from_their_names() {
    assert_eq!("circle".parse::<StyleClass>(), Ok(StyleClass::Circle));
    assert_eq!(
        "bold".parse::<StyleClass>(),
        Err(UnknownStyleClass("bold".to_string()))
    );
    assert_eq!(StyleClass::Highlight.to_string(), "highlight");
}
