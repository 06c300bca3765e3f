//! Event polling, dispatching, and UI rendering loop.
//!
//! Terminal input is read on its own task and queued as [`UiEvent`]s. The
//! loop turns those into [`AppAction`]s, applies queued actions to the
//! [`App`] one at a time, hands resulting commands to the executors, and
//! redraws when something changed.

use std::{
    error::Error,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::executors::ExecutorContext;
use super::keybindings::action_for_key;
use super::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use super::UiEvent;
use crate::core::app::{
    apply_actions, App, AppAction, AppActionDispatcher, AppCommand, INITIAL_REFRESH_DELAY,
};
use crate::core::client::ChatClient;
use crate::core::conversation::Conversation;
use crate::ui::renderer::ui;
use crate::utils::clipboard::Clipboard;

fn try_draw_frame(
    app: &App,
    terminal: &mut ChatTerminal,
    request_redraw: &mut bool,
    last_draw: &mut Instant,
    frame_duration: Duration,
) -> io::Result<()> {
    if !*request_redraw {
        return Ok(());
    }

    let now = Instant::now();
    if now.duration_since(*last_draw) < frame_duration {
        return Ok(());
    }

    terminal.draw(|f| ui(f, app))?;
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

/// Turn queued terminal events into actions. Returns whether any arrived.
fn process_ui_events(
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    dispatcher: &AppActionDispatcher,
) -> bool {
    let mut events_processed = false;
    while let Ok(ev) = event_rx.try_recv() {
        events_processed = true;
        match ev {
            UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                dispatcher.dispatch(action_for_key(key));
            }
            UiEvent::Crossterm(Event::Resize(width, height)) => {
                dispatcher.dispatch(AppAction::Resize { width, height });
            }
            UiEvent::Crossterm(_) => {}
        }
    }
    events_processed
}

fn drain_action_queue(
    app: &mut App,
    executor: &ExecutorContext,
    action_rx: &mut mpsc::UnboundedReceiver<AppAction>,
) -> bool {
    let mut pending = Vec::new();
    while let Ok(action) = action_rx.try_recv() {
        pending.push(action);
    }

    if pending.is_empty() {
        return false;
    }

    for command in apply_actions(app, pending) {
        executor.execute(command);
    }
    true
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

/// Run the interactive session until the user quits. Returns the final
/// conversation.
pub async fn run_chat(
    conversation: Conversation,
    client: Arc<ChatClient>,
    clipboard: Arc<dyn Clipboard>,
) -> Result<Conversation, Box<dyn Error>> {
    let mut app = App::new(conversation);

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppAction>();
    let dispatcher = AppActionDispatcher::new(action_tx);
    let executor = ExecutorContext::new(dispatcher.clone(), client, clipboard);

    let mut terminal = setup_terminal()?;
    info!("interactive session started");

    if let Ok(size) = terminal.size() {
        dispatcher.dispatch(AppAction::Resize {
            width: size.width,
            height: size.height,
        });
    }
    executor.execute(AppCommand::Refresh {
        delay: INITIAL_REFRESH_DELAY,
    });

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    const MAX_FPS: u64 = 60;
    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;

    let result: Result<(), Box<dyn Error>> = loop {
        if app.should_quit() {
            break Ok(());
        }

        if let Err(err) = try_draw_frame(
            &app,
            &mut terminal,
            &mut request_redraw,
            &mut last_draw,
            frame_duration,
        ) {
            break Err(err.into());
        }

        let events_processed = process_ui_events(&mut event_rx, &dispatcher);
        let actions_applied = drain_action_queue(&mut app, &executor, &mut action_rx);
        if events_processed || actions_applied {
            request_redraw = true;
        }

        if !events_processed && !actions_applied && !request_redraw {
            tokio::time::sleep(Duration::from_millis(16)).await;
        } else {
            tokio::task::yield_now().await;
        }
    };

    event_reader_handle.abort();
    restore_terminal(&mut terminal)?;
    debug!(messages = app.session.conversation.len(), "interactive session ended");

    result.map(|()| app.session.conversation)
}
