//! Conversation rendering for the viewport.
//!
//! [`render_conversation`] is pure: the same conversation and width always
//! produce the same lines, so the controller calls it on every refresh.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

use crate::core::conversation::Conversation;
use crate::core::message::{Message, Role};
use crate::utils::text_wrapping::wrap_spans;

/// Columns reserved around message bodies.
pub const BODY_MARGIN: u16 = 8;

pub fn body_width(width: u16) -> usize {
    usize::from(width.saturating_sub(BODY_MARGIN).max(1))
}

pub fn render_conversation(conversation: &Conversation, width: u16) -> Vec<Line<'static>> {
    let width = body_width(width);
    let mut lines = Vec::new();
    for message in conversation {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.extend(render_message(message, width));
    }
    lines
}

fn alignment_for(role: Role) -> Alignment {
    match role {
        Role::System => Alignment::Center,
        Role::User => Alignment::Right,
        Role::Assistant => Alignment::Left,
    }
}

fn header_style(role: Role) -> Style {
    let color = match role {
        Role::System => Color::DarkGray,
        Role::User => Color::Cyan,
        Role::Assistant => Color::Green,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn render_message(message: &Message, width: usize) -> Vec<Line<'static>> {
    let alignment = alignment_for(message.role);
    let mut lines = vec![Line::from(Span::styled(
        message.role.as_str().to_string(),
        header_style(message.role),
    ))];

    let body = match message.role {
        Role::Assistant => MarkdownRenderer::new(width).render(&message.content),
        Role::System => plain_lines(
            &message.content,
            Style::default().add_modifier(Modifier::ITALIC),
            width,
        ),
        Role::User => plain_lines(&message.content, Style::default(), width),
    };
    lines.extend(body);

    lines
        .into_iter()
        .map(|line| line.alignment(alignment))
        .collect()
}

fn plain_lines(text: &str, style: Style, width: usize) -> Vec<Line<'static>> {
    text.lines()
        .flat_map(|line| wrap_spans(&[Span::styled(line.to_string(), style)], width))
        .map(Line::from)
        .collect()
}

#[derive(Clone, Copy)]
enum ListKind {
    Unordered,
    Ordered(u64),
}

fn code_block_style() -> Style {
    Style::default().fg(Color::Yellow)
}

fn inline_code_style() -> Style {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
}

fn heading_style(level: HeadingLevel) -> Style {
    let style = Style::default().add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => style.add_modifier(Modifier::UNDERLINED),
        _ => style,
    }
}

/// Event-driven markdown to lines conversion for assistant messages.
struct MarkdownRenderer {
    width: usize,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    list_stack: Vec<ListKind>,
    in_code_block: bool,
}

impl MarkdownRenderer {
    fn new(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
            spans: Vec::new(),
            style_stack: Vec::new(),
            list_stack: Vec::new(),
            in_code_block: false,
        }
    }

    fn current_style(&self) -> Style {
        self.style_stack.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, modifier: Modifier) {
        let style = self.current_style().add_modifier(modifier);
        self.style_stack.push(style);
    }

    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let indent = "  ".repeat(self.list_stack.len().saturating_sub(1));
        let spans = std::mem::take(&mut self.spans);
        let width = self.width.saturating_sub(indent.len()).max(1);
        for wrapped in wrap_spans(&spans, width) {
            let mut line = Vec::with_capacity(wrapped.len() + 1);
            if !indent.is_empty() {
                line.push(Span::raw(indent.clone()));
            }
            line.extend(wrapped);
            self.lines.push(Line::from(line));
        }
    }

    fn blank_line(&mut self) {
        if self.lines.last().is_some_and(|line| !line.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    fn push_code(&mut self, text: &str) {
        for line in text.lines() {
            for wrapped in wrap_code_line(line, self.width) {
                self.lines
                    .push(Line::from(Span::styled(wrapped, code_block_style())));
            }
        }
    }

    fn render(mut self, content: &str) -> Vec<Line<'static>> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        for event in Parser::new_ext(content, options) {
            match event {
                Event::Start(tag) => self.start(tag),
                Event::End(tag) => self.end(tag),
                Event::Text(text) => {
                    if self.in_code_block {
                        self.push_code(&text);
                    } else {
                        let style = self.current_style();
                        self.spans.push(Span::styled(text.into_string(), style));
                    }
                }
                Event::Code(code) => {
                    self.spans
                        .push(Span::styled(code.into_string(), inline_code_style()));
                }
                Event::SoftBreak | Event::HardBreak => self.flush(),
                Event::Rule => {
                    self.flush();
                    self.lines.push(Line::from(Span::styled(
                        "─".repeat(self.width.min(40)),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                Event::TaskListMarker(checked) => {
                    let marker = if checked { "[x] " } else { "[ ] " };
                    self.spans.push(Span::raw(marker));
                }
                Event::Html(html) | Event::InlineHtml(html) => {
                    let style = self.current_style();
                    self.spans.push(Span::styled(html.into_string(), style));
                }
                _ => {}
            }
        }
        self.flush();
        while self.lines.last().is_some_and(|line| line.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {}
            Tag::Heading { level, .. } => {
                self.flush();
                self.style_stack.push(heading_style(level));
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.style_stack
                    .push(self.current_style().fg(Color::DarkGray));
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                self.in_code_block = true;
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        self.lines.push(Line::from(Span::styled(
                            lang.into_string(),
                            Style::default().fg(Color::DarkGray),
                        )));
                    }
                }
            }
            Tag::List(start) => {
                self.flush();
                self.list_stack.push(match start {
                    Some(n) => ListKind::Ordered(n),
                    None => ListKind::Unordered,
                });
            }
            Tag::Item => {
                self.flush();
                let marker = match self.list_stack.last_mut() {
                    Some(ListKind::Ordered(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "- ".to_string(),
                };
                self.spans.push(Span::styled(marker, Style::default().fg(Color::Cyan)));
            }
            Tag::Emphasis => self.push_style(Modifier::ITALIC),
            Tag::Strong => self.push_style(Modifier::BOLD),
            Tag::Strikethrough => self.push_style(Modifier::CROSSED_OUT),
            Tag::Link { .. } => self.push_style(Modifier::UNDERLINED),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush();
                if self.list_stack.is_empty() {
                    self.lines.push(Line::default());
                }
            }
            TagEnd::Heading(_) => {
                self.flush();
                self.style_stack.pop();
                self.lines.push(Line::default());
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.style_stack.pop();
                self.blank_line();
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.lines.push(Line::default());
            }
            TagEnd::List(_) => {
                self.flush();
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.blank_line();
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.style_stack.pop();
            }
            _ => {}
        }
    }
}

/// Code keeps its spacing, so it is broken by columns only.
fn wrap_code_line(line: &str, width: usize) -> Vec<String> {
    let mut rows = vec![String::new()];
    let mut row_width = 0usize;
    for ch in line.chars() {
        let cw = ch.width().unwrap_or(0);
        if row_width + cw > width && row_width > 0 {
            rows.push(String::new());
            row_width = 0;
        }
        if let Some(row) = rows.last_mut() {
            row.push(ch);
        }
        row_width += cw;
    }
    rows
}
