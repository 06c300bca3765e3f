//! gptcli is a terminal client for asking chat models questions and pulling
//! the code out of their answers.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation model, the completion client with its
//!   response cache, configuration, and the interactive session controller.
//! - [`ui`] renders the terminal interface and runs the event loop that feeds
//!   key presses and async results to the controller.
//! - [`commands`] implements the colon commands for copying and picking code.
//! - [`api`] defines the chat completion payloads.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which answers one-shot questions and starts
//! [`ui::chat_loop`] for interactive sessions.

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod logging;
pub mod ui;
pub mod utils;
