use std::mem;

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

use crate::editor::{StyleClass, TextRange};
use crate::markup::{Element, Node};
use crate::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorVisualPosition {
    pub line: usize,
    pub column: u16,
}

#[derive(Debug)]
pub struct RenderResult {
    pub lines: Vec<Line<'static>>,
    pub cursor: Option<CursorVisualPosition>,
    pub total_lines: usize,
    /// Screen position of every caret offset, in layout order.
    pub positions: Vec<(usize, CursorVisualPosition)>,
}

impl RenderResult {
    pub fn position_of(&self, offset: usize) -> Option<CursorVisualPosition> {
        self.positions
            .iter()
            .find(|(at, _)| *at == offset)
            .map(|(_, position)| *position)
    }

    /// The caret offset on `line` closest to `column` without passing it.
    pub fn offset_near(&self, line: usize, column: u16) -> Option<usize> {
        let on_line = || self.positions.iter().filter(move |(_, pos)| pos.line == line);
        on_line()
            .filter(|(_, pos)| pos.column <= column)
            .max_by_key(|(_, pos)| pos.column)
            .or_else(|| on_line().min_by_key(|(_, pos)| pos.column))
            .map(|(offset, _)| *offset)
    }

    /// Offset one visual line above or below `offset`, skipping lines that
    /// hold no caret positions.
    pub fn vertical_target(&self, offset: usize, down: bool) -> Option<usize> {
        let current = self.position_of(offset)?;
        let mut line = current.line;
        loop {
            line = if down {
                line + 1
            } else {
                line.checked_sub(1)?
            };
            if line >= self.total_lines {
                return None;
            }
            if let Some(target) = self.offset_near(line, current.column) {
                return Some(target);
            }
        }
    }
}

pub fn render_region(
    nodes: &[Node],
    width: usize,
    selection: Option<TextRange>,
    caret: Option<usize>,
    theme: &Theme,
) -> RenderResult {
    let mut renderer = Renderer::new(width.max(1), selection, theme);
    renderer.render_nodes(nodes, Style::default());
    renderer.finish(caret)
}

struct Renderer<'a> {
    wrap_width: usize,
    theme: &'a Theme,
    selection: Option<TextRange>,
    lines: Vec<Line<'static>>,
    current_line_index: usize,
    fragments: Vec<FragmentItem>,
    token: Option<TokenBuilder>,
    first_prefix: String,
    continuation_prefix: String,
    // A blank line goes in front of the next output.
    separate: bool,
    offset: usize,
    positions: Vec<(usize, CursorVisualPosition)>,
}

impl<'a> Renderer<'a> {
    fn new(wrap_width: usize, selection: Option<TextRange>, theme: &'a Theme) -> Self {
        Self {
            wrap_width,
            theme,
            selection: selection.filter(|range| !range.is_collapsed()),
            lines: Vec::new(),
            current_line_index: 0,
            fragments: Vec::new(),
            token: None,
            first_prefix: String::new(),
            continuation_prefix: String::new(),
            separate: false,
            offset: 0,
            positions: Vec::new(),
        }
    }

    fn render_nodes(&mut self, nodes: &[Node], style: Style) {
        for node in nodes {
            self.render_node(node, style);
        }
    }

    fn render_node(&mut self, node: &Node, style: Style) {
        match node {
            Node::Text(text) => self.push_text(text, style),
            Node::Element(element) => self.render_element(element, style),
        }
    }

    fn render_element(&mut self, element: &Element, style: Style) {
        match element.tag.as_str() {
            "br" => {
                self.push_position_marker(style);
                self.fragments.push(FragmentItem::LineBreak);
                self.offset += 1;
                return;
            }
            "hr" => {
                self.start_block();
                let rule = underline_string(self.wrap_width, '-');
                self.push_plain_line(&rule);
                self.separate = true;
                return;
            }
            _ if element.is_void() => return,
            _ => {}
        }

        let style = self.merge_style(style, element);
        if let Some(level) = element.heading_level() {
            self.render_heading(element, style, level);
            return;
        }
        match element.tag.as_str() {
            "ul" | "ol" => self.render_list(element, style),
            "li" => self.render_list_item(element, style, "• "),
            "blockquote" => self.render_quote(element, style),
            _ if element.is_block() => {
                self.start_block();
                self.render_nodes(&element.children, style);
                self.end_block();
            }
            _ => self.render_nodes(&element.children, style),
        }
    }

    fn render_heading(&mut self, element: &Element, style: Style, level: u8) {
        self.start_block();
        self.render_nodes(&element.children, style);
        let before = self.lines.len();
        self.flush_inline();
        if self.lines.len() > before && level > 1 {
            let width = self.lines.last().map(|line| line_width(line)).unwrap_or(0);
            let underline_char = if level == 2 { '=' } else { '-' };
            let underline = underline_string(width, underline_char);
            self.push_plain_line(&underline);
        }
        if !self.lines.is_empty() {
            self.separate = true;
        }
    }

    fn render_list(&mut self, element: &Element, style: Style) {
        let ordered = element.tag == "ol";
        self.start_block();
        let mut number = 0;
        for child in &element.children {
            match child.as_element().filter(|item| item.tag == "li") {
                Some(item) => {
                    number += 1;
                    let marker = if ordered {
                        format!("{number}. ")
                    } else {
                        "• ".to_string()
                    };
                    let item_style = self.merge_style(style, item);
                    self.render_list_item(item, item_style, &marker);
                }
                None => self.render_node(child, style),
            }
        }
        self.end_block();
    }

    fn render_list_item(&mut self, item: &Element, style: Style, marker: &str) {
        self.start_block();
        let saved = (
            self.first_prefix.clone(),
            self.continuation_prefix.clone(),
        );
        self.first_prefix = format!("{}{}", saved.1, marker);
        self.continuation_prefix = format!("{}{}", saved.1, " ".repeat(visible_width(marker)));
        self.render_nodes(&item.children, style);
        self.end_block();
        (self.first_prefix, self.continuation_prefix) = saved;
    }

    fn render_quote(&mut self, element: &Element, style: Style) {
        self.start_block();
        let saved = (
            self.first_prefix.clone(),
            self.continuation_prefix.clone(),
        );
        self.first_prefix = format!("{}| ", saved.1);
        self.continuation_prefix = self.first_prefix.clone();
        self.render_nodes(&element.children, style);
        self.end_block();
        (self.first_prefix, self.continuation_prefix) = saved;
    }

    fn merge_style(&self, base: Style, element: &Element) -> Style {
        let mut style = base;
        let classes = element.attribute("class").unwrap_or_default();
        for class in classes.split_ascii_whitespace() {
            match class.parse::<StyleClass>() {
                Ok(StyleClass::Highlight) => style = style.patch(self.theme.highlight_style()),
                Ok(StyleClass::Circle) => style = style.patch(self.theme.circle_style()),
                Err(_) => {}
            }
        }
        match element.tag.as_str() {
            "b" | "strong" => style.add_modifier(Modifier::BOLD),
            "i" | "em" => style.add_modifier(Modifier::ITALIC),
            "u" => style.add_modifier(Modifier::UNDERLINED),
            "s" | "del" | "strike" => style.add_modifier(Modifier::CROSSED_OUT),
            "code" => style.patch(self.theme.code_style()),
            "a" => style.patch(self.theme.link_style()),
            "mark" => style.patch(self.theme.highlight_style()),
            _ if element.heading_level().is_some() => style.patch(self.theme.headline_style()),
            _ => style,
        }
    }

    fn push_text(&mut self, text: &str, style: Style) {
        for ch in text.chars() {
            let display = match ch {
                '\n' | '\r' | '\t' => ' ',
                other => other,
            };
            let char_style = match self.selection {
                Some(range) if range.contains(self.offset) => {
                    style.patch(self.theme.selection_style())
                }
                _ => style,
            };
            let is_whitespace = display.is_whitespace();
            let matches = self
                .token
                .as_ref()
                .map(|existing| existing.matches(is_whitespace, char_style))
                .unwrap_or(false);
            if !matches {
                self.finish_token();
                self.token = Some(TokenBuilder::new(char_style, is_whitespace));
            }
            if let Some(token) = self.token.as_mut() {
                token.mark_position(self.offset);
                token.push_char(display);
            }
            self.offset += 1;
        }
    }

    fn finish_token(&mut self) {
        if let Some(token) = self.token.take() {
            self.fragments.push(FragmentItem::Token(token.finish()));
        }
    }

    /// Records a caret position for the current offset without adding text.
    fn push_position_marker(&mut self, style: Style) {
        self.finish_token();
        self.fragments.push(FragmentItem::Token(Fragment {
            text: String::new(),
            style,
            kind: FragmentKind::Word,
            width: 0,
            events: vec![TextEvent {
                column: 0,
                offset: self.offset,
            }],
        }));
    }

    fn start_block(&mut self) {
        self.flush_inline();
        if !self.lines.is_empty() {
            self.separate = true;
        }
    }

    // The caret at the very end of a block stays on the block's last line.
    fn end_block(&mut self) {
        self.finish_token();
        if !self.fragments.is_empty() {
            self.push_position_marker(Style::default());
        }
        self.flush_inline();
        if !self.lines.is_empty() {
            self.separate = true;
        }
    }

    fn flush_inline(&mut self) {
        self.finish_token();
        if self.fragments.is_empty() {
            return;
        }
        if self.separate {
            self.push_blank_line();
        }
        let fragments = mem::take(&mut self.fragments);
        let lines = wrap_fragments(
            &fragments,
            &self.first_prefix,
            &self.continuation_prefix,
            self.wrap_width,
        );
        self.consume_lines(lines);
        self.first_prefix = self.continuation_prefix.clone();
    }

    fn push_blank_line(&mut self) {
        self.lines.push(Line::from(""));
        self.current_line_index += 1;
        self.separate = false;
    }

    fn push_plain_line(&mut self, content: &str) {
        if self.separate {
            self.push_blank_line();
        }
        let span = Span::raw(content.to_string());
        self.lines.push(Line::from(vec![span]));
        self.current_line_index += 1;
    }

    fn consume_lines(&mut self, outputs: Vec<LineOutput>) {
        for output in outputs {
            let spans: Vec<Span<'static>> = output
                .spans
                .into_iter()
                .map(|segment| Span::styled(segment.text, segment.style))
                .collect();
            for event in output.events {
                let position = CursorVisualPosition {
                    line: self.current_line_index,
                    column: event.column,
                };
                self.positions.push((event.offset, position));
            }
            self.lines.push(Line::from(spans));
            self.current_line_index += 1;
        }
    }

    fn finish(mut self, caret: Option<usize>) -> RenderResult {
        self.finish_token();
        let end_recorded = self.fragments.is_empty()
            && self
                .positions
                .last()
                .is_some_and(|(offset, _)| *offset == self.offset);
        if !end_recorded {
            self.push_position_marker(Style::default());
        }
        self.flush_inline();
        if self.lines.is_empty() {
            self.lines.push(Line::from(""));
        }
        let total_lines = self.lines.len();
        let mut result = RenderResult {
            lines: self.lines,
            cursor: None,
            total_lines,
            positions: self.positions,
        };
        result.cursor = caret.and_then(|offset| result.position_of(offset));
        result
    }
}

#[derive(Clone)]
struct LineSegment {
    text: String,
    style: Style,
}

#[derive(Clone)]
struct LineOutput {
    spans: Vec<LineSegment>,
    events: Vec<LocatedEvent>,
}

#[derive(Clone, Copy)]
struct LocatedEvent {
    column: u16,
    offset: usize,
}

#[derive(Clone)]
struct Fragment {
    text: String,
    style: Style,
    kind: FragmentKind,
    width: usize,
    events: Vec<TextEvent>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FragmentKind {
    Word,
    Whitespace,
}

#[derive(Clone)]
enum FragmentItem {
    Token(Fragment),
    LineBreak,
}

/// A caret offset sitting `column` cells into its fragment.
#[derive(Clone, Copy)]
struct TextEvent {
    column: usize,
    offset: usize,
}

struct TokenBuilder {
    text: String,
    style: Style,
    kind: FragmentKind,
    width: usize,
    events: Vec<TextEvent>,
}

impl TokenBuilder {
    fn new(style: Style, is_whitespace: bool) -> Self {
        Self {
            text: String::new(),
            style,
            kind: if is_whitespace {
                FragmentKind::Whitespace
            } else {
                FragmentKind::Word
            },
            width: 0,
            events: Vec::new(),
        }
    }

    fn matches(&self, is_whitespace: bool, style: Style) -> bool {
        let kind_matches = matches!(
            (self.kind, is_whitespace),
            (FragmentKind::Whitespace, true) | (FragmentKind::Word, false)
        );
        kind_matches && self.style == style
    }

    fn mark_position(&mut self, offset: usize) {
        self.events.push(TextEvent {
            column: self.width,
            offset,
        });
    }

    fn push_char(&mut self, ch: char) {
        self.text.push(ch);
        self.width += UnicodeWidthChar::width(ch).unwrap_or(0);
    }

    fn finish(self) -> Fragment {
        Fragment {
            text: self.text,
            style: self.style,
            kind: self.kind,
            width: self.width,
            events: self.events,
        }
    }
}

fn wrap_fragments(
    fragments: &[FragmentItem],
    first_prefix: &str,
    continuation_prefix: &str,
    width: usize,
) -> Vec<LineOutput> {
    let mut outputs = Vec::new();
    let mut builder = LineBuilder::new(first_prefix.to_string());
    let mut pending_whitespace: Vec<Fragment> = Vec::new();

    for fragment in fragments {
        match fragment {
            FragmentItem::LineBreak => {
                builder.consume_pending(&mut pending_whitespace);
                outputs.push(builder.build_line());
                builder = LineBuilder::new(continuation_prefix.to_string());
            }
            FragmentItem::Token(token) => match token.kind {
                FragmentKind::Whitespace => {
                    pending_whitespace.push(token.clone());
                }
                FragmentKind::Word => {
                    let whitespace_width: usize =
                        pending_whitespace.iter().map(|item| item.width).sum();
                    if token.width > 0
                        && builder.current_width() > builder.prefix_width
                        && builder.current_width() + whitespace_width + token.width > width
                    {
                        builder.consume_pending(&mut pending_whitespace);
                        outputs.push(builder.build_line());
                        builder = LineBuilder::new(continuation_prefix.to_string());
                    }

                    builder.append_with_pending(token.clone(), &mut pending_whitespace);
                }
            },
        }
    }

    builder.consume_pending(&mut pending_whitespace);
    outputs.push(builder.build_line());
    outputs
}

struct LineBuilder {
    segments: Vec<LineSegment>,
    events: Vec<LocatedEvent>,
    width: usize,
    prefix_width: usize,
}

impl LineBuilder {
    fn new(prefix: String) -> Self {
        let prefix_width = visible_width(&prefix);
        let mut segments = Vec::new();
        if !prefix.is_empty() {
            segments.push(LineSegment {
                text: prefix,
                style: Style::default(),
            });
        }
        Self {
            segments,
            events: Vec::new(),
            width: prefix_width,
            prefix_width,
        }
    }

    fn current_width(&self) -> usize {
        self.width
    }

    fn append_with_pending(&mut self, token: Fragment, pending_whitespace: &mut Vec<Fragment>) {
        self.consume_pending(pending_whitespace);
        self.append_token(token);
    }

    fn consume_pending(&mut self, pending_whitespace: &mut Vec<Fragment>) {
        for fragment in pending_whitespace.drain(..) {
            self.append_token(fragment);
        }
    }

    fn append_token(&mut self, fragment: Fragment) {
        let start = self.width;
        if !fragment.text.is_empty() {
            self.segments.push(LineSegment {
                text: fragment.text,
                style: fragment.style,
            });
            self.width += fragment.width;
        }

        for event in fragment.events {
            self.events.push(LocatedEvent {
                column: (start + event.column) as u16,
                offset: event.offset,
            });
        }
    }

    fn build_line(mut self) -> LineOutput {
        if self.segments.is_empty() {
            self.segments.push(LineSegment {
                text: String::new(),
                style: Style::default(),
            });
        }
        LineOutput {
            spans: self.segments,
            events: self.events,
        }
    }
}

pub fn visible_width(text: &str) -> usize {
    text.chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

fn line_width(line: &Line<'_>) -> usize {
    line.spans
        .iter()
        .map(|span| visible_width(span.content.as_ref()))
        .sum()
}

fn underline_string(width: usize, ch: char) -> String {
    std::iter::repeat_n(ch, width.max(1)).collect()
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;
