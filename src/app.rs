use std::time::Duration;

use crossterm::event::KeyEvent;
use tracing::{debug, info};

use crate::differ::Highlighter;
use crate::i18n::I18n;
use crate::mode::{handle_global_key, Action, GlobalAction, Mode};
use crate::scrollview::Scrollview;
use crate::session::Session;
use crate::storage::Execution;
use crate::theme::Theme;

/// Startup settings, already merged from config file and command line.
#[derive(Debug, Clone)]
pub struct Options {
    pub command: String,
    pub interval: Duration,
    pub max_history: usize,
    pub diff: bool,
    pub status_bar: bool,
    pub notify: bool,
    pub scrollbars: bool,
    pub timestamp_format: String,
}

/// Everything that can happen to the app, processed one at a time.
#[derive(Debug)]
pub enum Msg {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    Tick,
    ExecResult(Execution),
}

/// Work the runtime performs on the app's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the command once in the background and deliver `Msg::ExecResult`.
    Execute,
    /// Deliver `Msg::Tick` after the delay.
    ScheduleTick(Duration),
    Notify,
    SetTitle(String),
    Quit,
}

pub struct App {
    // Core
    pub(crate) session: Session,
    pub(crate) theme: Theme,
    pub(crate) i18n: I18n,

    // View state
    pub(crate) history_index: Option<usize>, // selected history entry, None while empty
    pub(crate) viewport: Scrollview,
    pub(crate) mode: Mode,

    // Options
    pub(crate) diff: bool,
    pub(crate) status_bar: bool,
    pub(crate) notify: bool,
    pub(crate) paused: bool,
    pub(crate) timestamp_format: String,

    // Runtime
    pub(crate) executing: bool,
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) ready: bool,
}

impl App {
    pub fn new(options: Options, theme: Theme, i18n: I18n) -> Self {
        let mut viewport = Scrollview::new(0, 0);
        viewport.set_show_scrollbar(options.scrollbars);

        Self {
            session: Session::new(&options.command, options.interval, options.max_history),
            theme,
            i18n,
            history_index: None,
            viewport,
            mode: Mode::View,
            diff: options.diff,
            status_bar: options.status_bar,
            notify: options.notify,
            paused: false,
            timestamp_format: options.timestamp_format,
            executing: false,
            width: 0,
            height: 0,
            ready: false,
        }
    }

    /// Effects to run once before the first event.
    pub fn init(&self) -> Vec<Effect> {
        vec![
            Effect::SetTitle(self.i18n.t_format("window_title", &[&self.session.command])),
            Effect::ScheduleTick(Duration::ZERO),
        ]
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::Key(key) => self.handle_key(&key),
            Msg::Resize { width, height } => {
                self.handle_resize(usize::from(width), usize::from(height));
                Vec::new()
            }
            Msg::Tick => self.handle_tick(),
            Msg::ExecResult(exec) => self.handle_exec_result(exec),
        }
    }

    /// True when the selection tracks the newest entry.
    pub fn is_following(&self) -> bool {
        match self.session.last_index() {
            None => true,
            Some(last) => self.history_index == Some(last),
        }
    }

    pub fn bottom_bar_visible(&self) -> bool {
        self.status_bar || self.mode == Mode::Picker
    }

    fn handle_tick(&mut self) -> Vec<Effect> {
        if self.paused {
            return vec![Effect::ScheduleTick(self.session.interval)];
        }
        if self.executing {
            return Vec::new();
        }
        self.executing = true;
        vec![Effect::Execute]
    }

    // Global keys first, then the current mode.
    fn handle_key(&mut self, key: &KeyEvent) -> Vec<Effect> {
        if let Some(action) = handle_global_key(key) {
            return self.apply_global_action(action);
        }
        if let Some(action) = self.mode.handle_key(key) {
            self.apply_action(action);
        }
        Vec::new()
    }

    fn apply_global_action(&mut self, action: GlobalAction) -> Vec<Effect> {
        match action {
            GlobalAction::Quit => return vec![Effect::Quit],
            GlobalAction::Escape => {
                self.set_mode(Mode::View);
                if let Some(last) = self.session.last_index() {
                    self.history_index = Some(last);
                }
                self.refresh_content();
            }
            GlobalAction::ToggleDiff => {
                self.diff = !self.diff;
                self.refresh_content();
            }
            GlobalAction::ToggleStatusBar => {
                self.status_bar = !self.status_bar;
                self.resize_viewport();
            }
            GlobalAction::TogglePause => {
                self.paused = !self.paused;
                info!(paused = self.paused, "pause toggled");
            }
        }
        Vec::new()
    }

    fn apply_action(&mut self, action: Action) {
        match action {
            Action::ScrollUp(lines) => self.viewport.scroll_up(lines),
            Action::ScrollDown(lines) => self.viewport.scroll_down(lines),
            Action::ScrollLeft => self.viewport.scroll_left(),
            Action::ScrollRight => self.viewport.scroll_right(),
            Action::PageUp => self.viewport.page_up(),
            Action::PageDown => self.viewport.page_down(),
            Action::ScrollLeftPage => self.viewport.scroll_left_page(),
            Action::ScrollRightPage => self.viewport.scroll_right_page(),
            Action::GotoTop => self.viewport.goto_top(),
            Action::GotoBottom => self.viewport.goto_bottom(),
            Action::GotoLeftEdge => self.viewport.goto_left_edge(),
            Action::GotoRightEdge => self.viewport.goto_right_edge(),
            Action::SwitchMode(mode) => {
                // No picker without history
                if mode == Mode::Picker && self.session.is_empty() {
                    return;
                }
                self.set_mode(mode);
            }
            Action::MoveCursor(delta) => {
                let current = self.history_index.unwrap_or(0) as isize;
                self.move_cursor(current + delta);
            }
            Action::GotoFirstCursor => self.move_cursor(0),
            Action::GotoLastCursor => self.move_cursor(self.session.len() as isize - 1),
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!(from = ?self.mode, to = ?mode, "mode change");
        }
        self.mode = mode;
        self.resize_viewport();
    }

    fn move_cursor(&mut self, target: isize) {
        let Some(last) = self.session.last_index() else {
            return;
        };
        let index = target.clamp(0, last as isize) as usize;
        self.history_index = Some(index);
        self.refresh_content();
    }

    fn handle_resize(&mut self, width: usize, height: usize) {
        debug!(width, height, "resize");
        self.width = width;
        self.height = height;
        self.ready = true;
        self.resize_viewport();
    }

    fn handle_exec_result(&mut self, exec: Execution) -> Vec<Effect> {
        self.executing = false;
        info!(exit_code = exec.exit_code, duration_ms = exec.duration_ms, "execution finished");

        let was_following = self.is_following();
        let len_before = self.session.len();
        let stored = self.session.record_if_changed(exec);
        if stored {
            if was_following {
                self.history_index = self.session.last_index();
            } else if self.session.len() == len_before {
                // The oldest entry was evicted; keep pointing at the same execution.
                self.history_index = self.history_index.map(|i| i.saturating_sub(1));
            }
        }

        self.refresh_content();

        let mut effects = Vec::new();
        if self.notify && stored && self.session.len() > 1 {
            effects.push(Effect::Notify);
        }
        effects.push(Effect::ScheduleTick(self.session.interval));
        effects
    }

    /// Recomputes the displayed text for the selected entry.
    fn refresh_content(&mut self) {
        let Some(index) = self.history_index else {
            return;
        };
        let Some(exec) = self.session.get(index) else {
            return;
        };

        let mut output = exec.output();

        if self.diff && index > 0 {
            if let Some(prev) = self.session.get(index - 1) {
                let (highlighted, changed) =
                    Highlighter::new(&self.theme).highlight(&prev.output(), &output);
                debug!(index, changed, "diff highlighted");
                output = highlighted;
            }
        }

        if exec.failed() {
            let mut note = self.i18n.t_format("exit_code", &[&exec.exit_code.to_string()]);
            if let Some(err) = &exec.error {
                note = format!("{note} ({err})");
            }
            let note = self.theme.mark_error(&note);
            if output.is_empty() {
                output = note;
            } else {
                output = format!("{output}\n{note}");
            }
        }

        self.viewport.set_content(&output);
    }

    fn resize_viewport(&mut self) {
        let reserved = usize::from(self.bottom_bar_visible());
        self.viewport
            .set_size(self.width, self.height.saturating_sub(reserved));
    }
}
