//! Inline Markdown (`**bold**`, `*italic*`, `` `code` ``) to ratatui lines.
//!
//! Block-level syntax that sneaks into a text field (a leading `#`, a `1.`
//! marker, a quote) is kept as literal text so nothing the author wrote is lost.

use std::borrow::Cow;
use std::mem;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::theme::Palette;

/// Render inline-formatted text. Paragraph breaks and hard breaks start new lines;
/// soft breaks become spaces. Never fails: unparseable input comes back as text.
#[must_use]
pub fn inline_lines(text: &str, base: Style, palette: &Palette) -> Vec<Line<'static>> {
    let mut renderer = InlineRenderer::new(base, palette);
    let options = Options::ENABLE_STRIKETHROUGH;
    for event in Parser::new_ext(text, options) {
        renderer.handle_event(event);
    }
    renderer.finish()
}

/// [`inline_lines`] flattened into one line of spans.
#[must_use]
pub fn inline_spans(text: &str, base: Style, palette: &Palette) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, line) in inline_lines(text, base, palette).into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" ", base));
        }
        spans.extend(line.spans);
    }
    spans
}

struct InlineRenderer {
    base: Style,
    code_style: Style,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    // Counters, not flags: `***x***` nests strong inside emphasis.
    bold: usize,
    italic: usize,
    strike: usize,
    link: usize,
    list_stack: Vec<Option<u64>>,
}

impl InlineRenderer {
    fn new(base: Style, palette: &Palette) -> Self {
        Self {
            base,
            code_style: Style::default()
                .fg(palette.peach)
                .add_modifier(Modifier::BOLD),
            lines: Vec::new(),
            current: Vec::new(),
            bold: 0,
            italic: 0,
            strike: 0,
            link: 0,
            list_stack: Vec::new(),
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                self.push_text(&text);
            }
            Event::Code(code) => {
                let code = strip_controls(&code).into_owned();
                self.current.push(Span::styled(code, self.code_style));
            }
            Event::SoftBreak => self.current.push(Span::styled(" ", self.base)),
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.push_text("---");
                self.flush_line();
            }
            Event::TaskListMarker(done) => {
                self.push_text(if done { "[x] " } else { "[ ] " });
            }
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag) {
        match tag {
            Tag::Strong => self.bold += 1,
            Tag::Emphasis => self.italic += 1,
            Tag::Strikethrough => self.strike += 1,
            Tag::Link { .. } => self.link += 1,
            Tag::Heading { level, .. } => {
                self.push_text(&format!("{} ", "#".repeat(heading_depth(level))));
            }
            Tag::BlockQuote(_) => self.push_text("> "),
            Tag::List(start) => {
                self.flush_line();
                self.list_stack.push(start);
            }
            Tag::Item => {
                let marker = match self.list_stack.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "- ".to_string(),
                };
                self.push_text(&marker);
            }
            Tag::CodeBlock(_) => self.flush_line(),
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Strong => self.bold = self.bold.saturating_sub(1),
            TagEnd::Emphasis => self.italic = self.italic.saturating_sub(1),
            TagEnd::Strikethrough => self.strike = self.strike.saturating_sub(1),
            TagEnd::Link => self.link = self.link.saturating_sub(1),
            TagEnd::List(_) => {
                self.list_stack.pop();
            }
            TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::CodeBlock => {
                self.flush_line();
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        let style = self.current_style();
        let text = strip_controls(text);
        let mut parts = text.split('\n').peekable();
        while let Some(part) = parts.next() {
            if !part.is_empty() {
                self.current.push(Span::styled(part.to_string(), style));
            }
            if parts.peek().is_some() {
                self.flush_line();
            }
        }
    }

    fn current_style(&self) -> Style {
        let mut style = self.base;
        if self.bold > 0 {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic > 0 {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.strike > 0 {
            style = style.add_modifier(Modifier::CROSSED_OUT);
        }
        if self.link > 0 {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        style
    }

    fn flush_line(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(Line::from(mem::take(&mut self.current)));
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush_line();
        self.lines
    }
}

/// Remove control characters other than newlines. Borrowed when nothing changes.
#[must_use]
pub fn strip_controls(text: &str) -> Cow<'_, str> {
    if text.chars().any(|c| c.is_control() && c != '\n') {
        Cow::Owned(
            text.chars()
                .filter(|&c| !c.is_control() || c == '\n')
                .collect(),
        )
    } else {
        Cow::Borrowed(text)
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
