use super::*;

fn span(class: &str, text: &str) -> Node {
    Node::Element(Element::new("span").with_class(class).with_text(text))
}

#[test]
fn serialize_escapes_text_and_attributes() {
    let nodes = vec![
        Node::text("a < b & c"),
        Node::Element(
            Element::new("span")
                .with_class("say \"hi\"")
                .with_text("x"),
        ),
    ];
    assert_eq!(
        serialize(&nodes),
        "a &lt; b &amp; c<span class=\"say &quot;hi&quot;\">x</span>"
    );
}

#[test]
fn serialize_writes_void_elements_without_end_tag() {
    let nodes = vec![
        Node::text("one"),
        Node::Element(Element::new("br")),
        Node::text("two"),
    ];
    assert_eq!(serialize(&nodes), "one<br>two");
}

#[test]
fn parse_reads_nested_elements_and_attributes() {
    let nodes = parse("<p>Hello <span class=\"highlight\">world</span>!</p>");
    assert_eq!(
        nodes,
        vec![Node::Element(Element::new("p").with_children(vec![
            Node::text("Hello "),
            span("highlight", "world"),
            Node::text("!"),
        ]))]
    );
}

#[test]
fn parse_then_serialize_keeps_markup() {
    let markup = "<h2>Title</h2><p>some <span class=\"circle\">circled</span> text<br>next</p>";
    assert_eq!(serialize(&parse(markup)), markup);
}

#[test]
fn parse_decodes_entities() {
    let nodes = parse("fish &amp; chips &lt;3 &#65;&#x42; &nbsp;&bogus; &");
    assert_eq!(nodes, vec![Node::text("fish & chips <3 AB \u{a0}&bogus; &")]);
}

#[test]
fn named_entities_keep_their_characters_through_a_round_trip() {
    let nodes = parse("<p>&copy; 2024 &mdash; caf&eacute; &hellip;</p>");
    assert_eq!(text_content(&nodes), "© 2024 — café …");

    let saved = serialize(&nodes);
    assert_eq!(saved, "<p>© 2024 — café …</p>");
    assert_eq!(parse(&saved), nodes);
}

#[test]
fn named_entities_in_attributes_are_decoded() {
    let nodes = parse("<a title=\"caf&eacute; &amp; more\">x</a>");
    assert_eq!(
        serialize(&nodes),
        "<a title=\"café &amp; more\">x</a>"
    );
}

#[test]
fn parse_closes_unclosed_elements() {
    let nodes = parse("<p><b>bold");
    assert_eq!(
        nodes,
        vec![Node::Element(Element::new("p").with_children(vec![Node::Element(
            Element::new("b").with_text("bold")
        )]))]
    );
}

#[test]
fn parse_ignores_stray_end_tags_and_comments() {
    let nodes = parse("a</i><!-- note -->b</p>");
    assert_eq!(nodes, vec![Node::text("ab")]);
}

#[test]
fn parse_keeps_lone_angle_brackets_as_text() {
    let nodes = parse("1 < 2 and <3");
    assert_eq!(nodes, vec![Node::text("1 < 2 and <3")]);
}

#[test]
fn parse_accepts_unquoted_and_single_quoted_attributes() {
    let nodes = parse("<span class=circle data-x='1'>o</span>");
    let element = nodes[0].as_element().unwrap();
    assert_eq!(element.attribute("class"), Some("circle"));
    assert_eq!(element.attribute("data-x"), Some("1"));
}

#[test]
fn parse_lowercases_tag_names() {
    let nodes = parse("<H2>Loud</H2>");
    let element = nodes[0].as_element().unwrap();
    assert_eq!(element.tag, "h2");
    assert_eq!(element.heading_level(), Some(2));
}

#[test]
fn text_len_counts_line_breaks_once() {
    let nodes = parse("ab<br>cd<img src=\"x.png\">");
    assert_eq!(text_len(&nodes), 5);
    assert_eq!(text_content(&nodes), "ab\ncd");
}

#[test]
fn normalize_merges_adjacent_text() {
    let mut nodes = vec![
        Node::text("a"),
        Node::text(""),
        Node::text("b"),
        Node::Element(Element::new("b").with_children(vec![Node::text("c"), Node::text("d")])),
    ];
    normalize(&mut nodes);
    assert_eq!(
        nodes,
        vec![
            Node::text("ab"),
            Node::Element(Element::new("b").with_text("cd")),
        ]
    );
}

#[test]
fn text_may_start_with_a_multibyte_character() {
    let nodes = parse("<b>x</b>über <i>ö</i>");
    assert_eq!(serialize(&nodes), "<b>x</b>über <i>ö</i>");
    assert_eq!(text_len(&nodes), 7);
}
