//! Main chat event loop
//!
//! The loop owns the shared [`App`]. Terminal input is read on a separate
//! task and forwarded as [`UiEvent`]s; key presses become [`AppAction`]s that
//! are queued on the dispatcher together with results from background tasks.
//! Each iteration drains that queue through [`apply_actions`], hands the
//! resulting [`AppCommand`](crate::core::app::AppCommand)s to the
//! [`CommandExecutor`], and redraws when something changed.

mod executors;
mod keybindings;
mod lifecycle;
mod setup;

use std::{
    error::Error,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use ratatui::layout::Size;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::auth::AuthManager;
use crate::core::app::{
    apply_actions, App, AppAction, AppActionContext, AppActionDispatcher, AppActionEnvelope,
};
use crate::ui::renderer::ui;

pub use executors::{CommandExecutor, Services};
use keybindings::map_key;
use lifecycle::{restore_terminal, setup_terminal, SharedTerminal};
use setup::bootstrap_app;

const MAX_FPS: u64 = 60;
/// Redraw cadence while a spinner or the mic indicator is animating.
const ANIMATION_FRAME: Duration = Duration::from_millis(80);

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

/// Shared, lockable handle to the app state.
#[derive(Clone)]
pub struct AppHandle {
    inner: Arc<Mutex<App>>,
}

impl AppHandle {
    pub fn new(inner: Arc<Mutex<App>>) -> Self {
        Self { inner }
    }

    pub async fn read<R>(&self, f: impl FnOnce(&App) -> R) -> R {
        let guard = self.inner.lock().await;
        f(&guard)
    }

    pub async fn update<R>(&self, f: impl FnOnce(&mut App) -> R) -> R {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }
}

async fn current_terminal_size(terminal: &SharedTerminal) -> Size {
    let terminal_guard = terminal.lock().await;
    terminal_guard.size().unwrap_or_default()
}

async fn try_draw_frame(
    app: &AppHandle,
    terminal: &SharedTerminal,
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

    let mut terminal_guard = terminal.lock().await;
    app.update(|app| terminal_guard.draw(|f| ui(f, app)).map(|_| ()))
        .await?;
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

/// Turns pending terminal events into queued actions. Returns whether any
/// event was seen.
fn process_ui_events(
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    dispatcher: &AppActionDispatcher,
    ctx: AppActionContext,
) -> bool {
    let mut processed = false;
    while let Ok(UiEvent::Crossterm(ev)) = event_rx.try_recv() {
        processed = true;
        match ev {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if let Some(action) = map_key(key) {
                    dispatcher.dispatch_many([action], ctx);
                }
            }
            Event::Paste(text) => dispatcher.dispatch_many([AppAction::InsertText { text }], ctx),
            _ => {}
        }
    }
    processed
}

/// Applies every queued action and runs the commands they produced.
/// Returns whether anything was applied.
async fn drain_action_queue(
    app: &AppHandle,
    executor: &CommandExecutor,
    action_rx: &mut mpsc::UnboundedReceiver<AppActionEnvelope>,
) -> bool {
    let mut pending = Vec::new();
    while let Ok(envelope) = action_rx.try_recv() {
        pending.push(envelope);
    }

    if pending.is_empty() {
        return false;
    }

    let commands = app.update(|app| apply_actions(app, pending)).await;
    for command in commands {
        executor.execute(command);
    }
    true
}

fn spawn_event_reader(
    event_tx: mpsc::UnboundedSender<UiEvent>,
    cancel_token: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while !cancel_token.is_cancelled() {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

async fn run_event_loop(
    app: &AppHandle,
    terminal: &SharedTerminal,
    dispatcher: &AppActionDispatcher,
    executor: &CommandExecutor,
    action_rx: &mut mpsc::UnboundedReceiver<AppActionEnvelope>,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
) -> Result<(), Box<dyn Error>> {
    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut last_animation_frame = Instant::now();
    let mut request_redraw = true;

    loop {
        if app.read(|app| app.ui.exit_requested).await {
            return Ok(());
        }

        try_draw_frame(
            app,
            terminal,
            &mut request_redraw,
            &mut last_draw,
            frame_duration,
        )
        .await?;

        let term_size = current_terminal_size(terminal).await;
        let ctx = AppActionContext {
            term_width: term_size.width,
            term_height: term_size.height,
        };

        let events_processed = process_ui_events(event_rx, dispatcher, ctx);
        if events_processed {
            request_redraw = true;
        }

        let notice_due = app
            .read(|app| {
                app.ui
                    .notice
                    .as_ref()
                    .is_some_and(|notice| notice.is_expired(Instant::now()))
            })
            .await;
        if notice_due {
            dispatcher.dispatch_many([AppAction::ExpireNotice], ctx);
        }

        if drain_action_queue(app, executor, action_rx).await {
            request_redraw = true;
        }

        let animating = app
            .read(|app| app.session.pending_request() || app.session.listening())
            .await;
        if animating && last_animation_frame.elapsed() >= ANIMATION_FRAME {
            last_animation_frame = Instant::now();
            request_redraw = true;
        }

        if !events_processed && !request_redraw {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    }
}

pub async fn run_chat(
    model: Option<String>,
    auth_manager: &AuthManager,
) -> Result<(), Box<dyn Error>> {
    let (app, services) = bootstrap_app(model.as_deref(), auth_manager)?;
    let app = AppHandle::new(Arc::new(Mutex::new(app)));

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppActionEnvelope>();
    let dispatcher = AppActionDispatcher::new(action_tx);
    let cancel_token = CancellationToken::new();
    let executor = CommandExecutor::new(services, dispatcher.clone(), cancel_token.clone());

    let terminal = setup_terminal()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx, cancel_token.clone());

    let result = run_event_loop(
        &app,
        &terminal,
        &dispatcher,
        &executor,
        &mut action_rx,
        &mut event_rx,
    )
    .await;

    cancel_token.cancel();
    event_reader_handle.abort();
    let restored = restore_terminal(&terminal).await;

    let saved = app.read(|app| app.session.saved_conversations().len()).await;
    info!(saved_conversations = saved, "Chat session ended");

    result.and(restored)
}
