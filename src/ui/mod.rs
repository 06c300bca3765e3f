//! Terminal UI layer for interactive chat sessions.
//!
//! The UI module owns rendering, layout, keyboard handling, and loop control
//! for the text user interface.
//!
//! Key submodules include:
//! - [`chat_loop`]: the main interaction loop that turns key presses into
//!   controller actions and runs the commands they produce.
//! - [`renderer`]: frame layout for the viewport, snippet list, status line,
//!   and prompt.
//! - [`transcript`]: conversation to styled lines.
//!
//! Ownership boundary: this layer presents and captures interaction state, while
//! [`crate::core`] owns the session state machine and backend coordination.

pub mod chat_loop;
pub mod renderer;
pub mod transcript;
