//! Main chat event loop and UI rendering
//!
//! This module contains the main event loop that handles user input, renders the UI,
//! and runs fetches and commands for the interactive session.

mod event_loop;
mod executors;
mod keybindings;
mod lifecycle;

use ratatui::crossterm::event::Event;

pub use event_loop::run_chat;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}
