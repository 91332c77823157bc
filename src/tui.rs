use std::io::{self, Stdout, Write};
use std::sync::Arc;

use anyhow::Result;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::app::{App, Effect, Msg};
use crate::executor::CommandExecutor;
use crate::render;

/// Raw mode plus alternate screen for as long as it lives.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Carries out effects requested by the app.
struct Runtime {
    tx: UnboundedSender<Msg>,
    cancel: CancellationToken,
    executor: Arc<CommandExecutor>,
}

impl Runtime {
    /// Returns `false` once the app asked to quit.
    fn perform(&self, effect: Effect, app: &App) -> Result<bool> {
        match effect {
            Effect::Execute => {
                let tx = self.tx.clone();
                let executor = Arc::clone(&self.executor);
                let cancel = self.cancel.child_token();
                tokio::spawn(async move {
                    let exec = executor.execute(cancel).await;
                    let _ = tx.send(Msg::ExecResult(exec));
                });
            }
            Effect::ScheduleTick(delay) => {
                let tx = self.tx.clone();
                let cancel = self.cancel.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {
                            let _ = tx.send(Msg::Tick);
                        }
                        _ = cancel.cancelled() => {}
                    }
                });
            }
            Effect::Notify => {
                // OSC 9 desktop notification
                let mut stdout = io::stdout();
                write!(stdout, "\x1b]9;{}\x07", app.i18n.t("notification"))?;
                stdout.flush()?;
            }
            Effect::SetTitle(title) => {
                execute!(io::stdout(), SetTitle(title))?;
            }
            Effect::Quit => return Ok(false),
        }
        Ok(true)
    }
}

/// Runs the interactive session until the user quits.
pub async fn run(app: App, executor: CommandExecutor) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let cancel = CancellationToken::new();
    let result = event_loop(&mut terminal, app, executor, cancel.clone()).await;
    cancel.cancel();
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut app: App,
    executor: CommandExecutor,
    cancel: CancellationToken,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let runtime = Runtime {
        tx,
        cancel,
        executor: Arc::new(executor),
    };
    let mut events = EventStream::new();

    let (width, height) = terminal::size()?;
    let mut effects = app.init();
    effects.extend(app.update(Msg::Resize { width, height }));

    loop {
        for effect in effects.drain(..) {
            if !runtime.perform(effect, &app)? {
                info!("quit requested");
                return Ok(());
            }
        }

        terminal.draw(|frame| render::draw(frame, &app))?;

        let msg = tokio::select! {
            Some(msg) = rx.recv() => msg,
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => Msg::Key(key),
                Some(Ok(Event::Resize(width, height))) => Msg::Resize { width, height },
                Some(Ok(_)) => continue,
                Some(Err(err)) => return Err(err.into()),
                None => {
                    debug!("terminal event stream closed");
                    return Ok(());
                }
            },
        };

        effects = app.update(msg);
    }
}
