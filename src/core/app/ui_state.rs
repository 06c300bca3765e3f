//! The interactive surfaces the controller drives: the prompt editor and the
//! conversation viewport. The snippet list lives in [`Session`](super::Session)
//! because actions read and replace it.

use ratatui::crossterm::event::KeyEvent;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use tui_textarea::{CursorMove, Input, Key, TextArea};

pub const MAX_WIDTH: u16 = 120;
pub const MIN_HEIGHT: u16 = 6;
pub const INITIAL_WIDTH: u16 = 30;
pub const INITIAL_VIEWPORT_HEIGHT: u16 = 5;
/// Rows below the viewport: status line, prompt, and a spacer.
pub const CHROME_HEIGHT: u16 = 3;
pub const PROMPT_CHAR_LIMIT: usize = 280;

/// Single-line prompt editor. While editing is suspended it ignores input and
/// shows the last submitted text as a placeholder.
pub struct PromptEditor {
    textarea: TextArea<'static>,
    editing: bool,
}

impl Default for PromptEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptEditor {
    pub fn new() -> Self {
        let mut editor = Self {
            textarea: TextArea::default(),
            editing: true,
        };
        editor.configure();
        editor
    }

    fn configure(&mut self) {
        self.textarea.set_cursor_line_style(Style::default());
        self.textarea
            .set_placeholder_style(Style::default().add_modifier(Modifier::DIM));
        self.apply_cursor_style();
    }

    fn apply_cursor_style(&mut self) {
        let cursor = if self.editing {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        self.textarea.set_cursor_style(cursor);
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Take the current text, clear the editor, show the text as placeholder
    /// and suspend editing until [`resume`](Self::resume).
    pub fn commit(&mut self) -> String {
        let text = self.text();
        self.textarea = TextArea::default();
        self.configure();
        self.textarea.set_placeholder_text(text.clone());
        self.editing = false;
        self.apply_cursor_style();
        text
    }

    pub fn resume(&mut self) {
        self.textarea.set_placeholder_text(String::new());
        self.editing = true;
        self.apply_cursor_style();
    }

    /// Returns whether the key changed the text.
    pub fn input(&mut self, key: KeyEvent) -> bool {
        if !self.editing {
            return false;
        }
        let input = Input::from(key);
        match input.key {
            Key::Enter => return false,
            Key::Char('m') | Key::Char('j') if input.ctrl => return false,
            Key::Char(_) if !input.ctrl && !input.alt => {
                if self.text().chars().count() >= PROMPT_CHAR_LIMIT {
                    return false;
                }
            }
            _ => {}
        }
        self.textarea.input(input)
    }

    #[cfg(test)]
    pub fn set_text(&mut self, text: &str) {
        self.textarea = TextArea::from([text.to_string()]);
        self.textarea.move_cursor(CursorMove::End);
        self.configure();
    }
}

/// Scrollable, pre-wrapped view of the rendered conversation.
#[derive(Debug, Default)]
pub struct Viewport {
    lines: Vec<Line<'static>>,
    offset: usize,
    height: u16,
}

impl Viewport {
    pub fn new(height: u16) -> Self {
        Self {
            lines: Vec::new(),
            offset: 0,
            height,
        }
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn set_height(&mut self, height: u16) {
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn set_content(&mut self, lines: Vec<Line<'static>>) {
        self.lines = lines;
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(usize::from(self.height))
    }

    pub fn goto_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = (self.offset + lines).min(self.max_offset());
    }

    pub fn page_up(&mut self) {
        self.scroll_up(usize::from(self.height.max(1)));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(usize::from(self.height.max(1)));
    }

    pub fn visible_lines(&self) -> &[Line<'static>] {
        let end = (self.offset + usize::from(self.height)).min(self.lines.len());
        &self.lines[self.offset.min(end)..end]
    }
}

pub struct UiState {
    pub prompt: PromptEditor,
    pub viewport: Viewport,
    pub width: u16,
    pub height: u16,
    pub exit_requested: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        Self {
            prompt: PromptEditor::new(),
            viewport: Viewport::new(INITIAL_VIEWPORT_HEIGHT),
            width: INITIAL_WIDTH,
            height: INITIAL_VIEWPORT_HEIGHT + CHROME_HEIGHT,
            exit_requested: false,
        }
    }

    /// Clamp terminal geometry: width to at most [`MAX_WIDTH`], height to at
    /// least [`MIN_HEIGHT`].
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width.min(MAX_WIDTH);
        self.height = height.max(MIN_HEIGHT);
        self.viewport
            .set_height(self.height.saturating_sub(CHROME_HEIGHT));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn numbered_lines(count: usize) -> Vec<Line<'static>> {
        (0..count).map(|i| Line::from(format!("line {i}"))).collect()
    }

    #[test]
    fn typing_updates_text() {
        let mut prompt = PromptEditor::new();
        assert!(prompt.input(key(KeyCode::Char('h'))));
        assert!(prompt.input(key(KeyCode::Char('i'))));
        assert_eq!(prompt.text(), "hi");
    }

    #[test]
    fn enter_never_inserts_newline() {
        let mut prompt = PromptEditor::new();
        prompt.set_text("one");
        assert!(!prompt.input(key(KeyCode::Enter)));
        assert!(!prompt.input(KeyEvent::new(KeyCode::Char('m'), KeyModifiers::CONTROL)));
        assert_eq!(prompt.textarea().lines().len(), 1);
    }

    #[test]
    fn commit_clears_and_suspends_until_resumed() {
        let mut prompt = PromptEditor::new();
        prompt.set_text("question");
        assert_eq!(prompt.commit(), "question");
        assert_eq!(prompt.text(), "");
        assert!(!prompt.is_editing());

        assert!(!prompt.input(key(KeyCode::Char('x'))));
        assert_eq!(prompt.text(), "");

        prompt.resume();
        assert!(prompt.input(key(KeyCode::Char('x'))));
        assert_eq!(prompt.text(), "x");
    }

    #[test]
    fn character_limit_is_enforced() {
        let mut prompt = PromptEditor::new();
        prompt.set_text(&"a".repeat(PROMPT_CHAR_LIMIT));
        assert!(!prompt.input(key(KeyCode::Char('b'))));
        assert_eq!(prompt.text().chars().count(), PROMPT_CHAR_LIMIT);
        assert!(prompt.input(key(KeyCode::Backspace)));
        assert_eq!(prompt.text().chars().count(), PROMPT_CHAR_LIMIT - 1);
        assert!(prompt.input(key(KeyCode::Char('b'))));
        assert!(prompt.text().ends_with('b'));
    }

    #[test]
    fn viewport_scrolls_within_bounds() {
        let mut viewport = Viewport::new(3);
        viewport.set_content(numbered_lines(10));
        viewport.goto_bottom();
        assert_eq!(viewport.offset(), 7);
        assert_eq!(viewport.visible_lines().len(), 3);

        viewport.scroll_down(5);
        assert_eq!(viewport.offset(), 7);
        viewport.page_up();
        assert_eq!(viewport.offset(), 4);
        viewport.scroll_up(10);
        assert_eq!(viewport.offset(), 0);
    }

    #[test]
    fn short_content_never_scrolls() {
        let mut viewport = Viewport::new(10);
        viewport.set_content(numbered_lines(2));
        viewport.goto_bottom();
        assert_eq!(viewport.offset(), 0);
        assert_eq!(viewport.visible_lines().len(), 2);
    }

    #[test]
    fn resize_clamps_geometry() {
        let mut ui = UiState::new();
        assert_eq!(ui.width, INITIAL_WIDTH);

        ui.resize(12, 13);
        assert_eq!((ui.width, ui.height), (12, 13));
        assert_eq!(ui.viewport.height(), 10);

        ui.resize(1312, 1);
        assert_eq!((ui.width, ui.height), (MAX_WIDTH, MIN_HEIGHT));
        assert_eq!(ui.viewport.height(), 3);
    }
}
