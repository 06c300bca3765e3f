use crate::core::app::{App, Mode};
use crate::core::app::ui_state::CHROME_HEIGHT;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Horizontal inset of the conversation inside the viewport.
const VIEWPORT_INSET: u16 = 4;

pub fn ui(f: &mut Frame, app: &App) {
    let area = f.area();
    let area = Rect {
        width: area.width.min(app.ui.width),
        ..area
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(CHROME_HEIGHT - 2),
        ])
        .split(area);

    match app.session.mode {
        Mode::Chat => render_viewport(f, app, chunks[0]),
        Mode::CodeSelection => render_selection(f, app, chunks[0]),
    }

    let status = Paragraph::new(Line::from(Span::styled(
        app.session.status_line().to_string(),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )))
    .alignment(Alignment::Center);
    f.render_widget(status, chunks[1]);

    render_prompt(f, app, chunks[2]);
}

fn render_viewport(f: &mut Frame, app: &App, area: Rect) {
    let inner = area.inner(Margin {
        horizontal: VIEWPORT_INSET,
        vertical: 0,
    });
    let lines = app.ui.viewport.visible_lines().to_vec();
    f.render_widget(Paragraph::new(lines), inner);
}

fn render_selection(f: &mut Frame, app: &App, area: Rect) {
    let selection = &app.session.selection;
    let items: Vec<ListItem> = selection
        .snippets()
        .iter()
        .map(|snippet| {
            let preview = snippet.text.lines().next().unwrap_or_default().to_string();
            ListItem::new(vec![
                Line::from(Span::styled(
                    snippet.title(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(preview, Style::default().fg(Color::DarkGray))),
            ])
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(selection.selected_index());
    f.render_stateful_widget(list, area, &mut state);
}

fn render_prompt(f: &mut Frame, app: &App, area: Rect) {
    let marker = app.session.status().prompt_marker();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(marker.width() as u16),
            Constraint::Min(0),
        ])
        .split(area);

    f.render_widget(Paragraph::new(marker), chunks[0]);
    f.render_widget(app.ui.prompt.textarea(), chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::{apply_action, AppAction};
    use crate::core::conversation::Conversation;
    use crate::core::message::Message;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn draw(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn chat_frame_shows_conversation_status_and_marker() {
        let mut app = App::new(Conversation::from(vec![
            Message::user("ping"),
            Message::assistant("pong"),
        ]));
        apply_action(&mut app, AppAction::Resize { width: 40, height: 12 });
        apply_action(&mut app, AppAction::Refresh);

        let screen = draw(&app, 40, 12);
        assert!(screen.contains("pong"));
        assert!(screen.contains("Enter to send, Ctrl+D to quit"));
        assert!(screen.lines().any(|line| line.starts_with("> ")));
    }

    #[test]
    fn selection_frame_lists_snippets() {
        let mut app = App::new(Conversation::from(vec![Message::assistant(
            "```\nls\n```\n```\npwd\n```",
        )]));
        app.session.enter_selection();

        let screen = draw(&app, 40, 12);
        assert!(screen.contains("Code snippet 1"));
        assert!(screen.contains("Code snippet 2"));
        assert!(screen.contains("pwd"));
    }

    #[test]
    fn selection_frame_keeps_the_prompt_row() {
        let mut app = App::new(Conversation::from(vec![Message::assistant(
            "```\nls\n```\n```\npwd\n```",
        )]));
        app.ui.prompt.set_text("draft");
        app.session.enter_selection();

        let screen = draw(&app, 40, 12);
        let prompt_row = screen.lines().nth(10).unwrap_or_default();
        assert!(prompt_row.starts_with("> draft"));
    }
}
