use crossterm::event::KeyEvent;

use crate::keys::{self, KeyBinding};

/// Interaction mode. The set is closed: every consumer matches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Watching output (initial mode).
    View,
    /// Browsing execution history.
    Picker,
}

/// Actions available in every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    Quit,
    /// Back to view mode, following the latest execution.
    Escape,
    ToggleDiff,
    ToggleStatusBar,
    TogglePause,
}

/// Mode-specific intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ScrollUp(usize),
    ScrollDown(usize),
    ScrollLeft,
    ScrollRight,
    PageUp,
    PageDown,
    ScrollLeftPage,
    ScrollRightPage,
    GotoTop,
    GotoBottom,
    GotoLeftEdge,
    GotoRightEdge,
    SwitchMode(Mode),
    MoveCursor(isize),
    GotoFirstCursor,
    GotoLastCursor,
}

/// Keys that work in all modes. Checked before the mode gets the event.
pub fn handle_global_key(event: &KeyEvent) -> Option<GlobalAction> {
    if keys::QUIT.matches(event) {
        Some(GlobalAction::Quit)
    } else if keys::ESCAPE.matches(event) {
        Some(GlobalAction::Escape)
    } else if keys::TOGGLE_DIFF.matches(event) {
        Some(GlobalAction::ToggleDiff)
    } else if keys::TOGGLE_BAR.matches(event) {
        Some(GlobalAction::ToggleStatusBar)
    } else if keys::PAUSE.matches(event) {
        Some(GlobalAction::TogglePause)
    } else {
        None
    }
}

const VIEW_HELP: &[KeyBinding] = &[keys::QUIT, keys::TOGGLE_DIFF, keys::PAUSE, keys::PICKER];
const PICKER_HELP: &[KeyBinding] = &[keys::NAV_LEFT, keys::NAV_RIGHT, keys::CONFIRM, keys::ESCAPE];

impl Mode {
    /// Bindings worth listing in the status bar.
    pub fn short_help(&self) -> &'static [KeyBinding] {
        match self {
            Mode::View => VIEW_HELP,
            Mode::Picker => PICKER_HELP,
        }
    }

    /// Maps a key to this mode's intent, `None` when the key means nothing here.
    pub fn handle_key(&self, event: &KeyEvent) -> Option<Action> {
        match self {
            Mode::View => view_key(event),
            Mode::Picker => picker_key(event),
        }
    }
}

fn view_key(event: &KeyEvent) -> Option<Action> {
    let action = if keys::PICKER.matches(event) {
        Action::SwitchMode(Mode::Picker)
    } else if keys::UP.matches(event) {
        Action::ScrollUp(1)
    } else if keys::DOWN.matches(event) {
        Action::ScrollDown(1)
    } else if keys::NAV_LEFT.matches(event) {
        Action::ScrollLeft
    } else if keys::NAV_RIGHT.matches(event) {
        Action::ScrollRight
    } else if keys::PAGE_UP.matches(event) {
        Action::PageUp
    } else if keys::PAGE_DOWN.matches(event) {
        Action::PageDown
    } else if keys::PAGE_LEFT.matches(event) {
        Action::ScrollLeftPage
    } else if keys::PAGE_RIGHT.matches(event) {
        Action::ScrollRightPage
    } else if keys::HOME.matches(event) {
        Action::GotoLeftEdge
    } else if keys::END.matches(event) {
        Action::GotoRightEdge
    } else if keys::TOP.matches(event) {
        Action::GotoTop
    } else if keys::BOTTOM.matches(event) {
        Action::GotoBottom
    } else {
        return None;
    };
    Some(action)
}

fn picker_key(event: &KeyEvent) -> Option<Action> {
    let action = if keys::CONFIRM.matches(event) {
        Action::SwitchMode(Mode::View)
    } else if keys::NAV_LEFT.matches(event) {
        Action::MoveCursor(-1)
    } else if keys::NAV_RIGHT.matches(event) {
        Action::MoveCursor(1)
    } else if keys::HOME.matches(event) || keys::PAGE_LEFT.matches(event) {
        Action::GotoFirstCursor
    } else if keys::END.matches(event) || keys::PAGE_RIGHT.matches(event) {
        Action::GotoLastCursor
    } else {
        return None;
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn global_keys_are_mode_independent() {
        assert_eq!(handle_global_key(&key(KeyCode::Char('q'))), Some(GlobalAction::Quit));
        assert_eq!(handle_global_key(&key(KeyCode::Esc)), Some(GlobalAction::Escape));
        assert_eq!(handle_global_key(&key(KeyCode::Char('d'))), Some(GlobalAction::ToggleDiff));
        assert_eq!(handle_global_key(&key(KeyCode::Char('t'))), Some(GlobalAction::ToggleStatusBar));
        assert_eq!(handle_global_key(&key(KeyCode::Char('p'))), Some(GlobalAction::TogglePause));
        assert_eq!(handle_global_key(&key(KeyCode::Char('j'))), None);
    }

    #[test]
    fn same_key_means_different_things_per_mode() {
        let left = key(KeyCode::Left);
        assert_eq!(Mode::View.handle_key(&left), Some(Action::ScrollLeft));
        assert_eq!(Mode::Picker.handle_key(&left), Some(Action::MoveCursor(-1)));

        let b = key(KeyCode::Char('b'));
        assert_eq!(Mode::View.handle_key(&b), Some(Action::SwitchMode(Mode::Picker)));
        assert_eq!(Mode::Picker.handle_key(&b), Some(Action::SwitchMode(Mode::View)));

        let end = key(KeyCode::End);
        assert_eq!(Mode::View.handle_key(&end), Some(Action::GotoRightEdge));
        assert_eq!(Mode::Picker.handle_key(&end), Some(Action::GotoLastCursor));
    }

    #[test]
    fn vertical_scrolling_is_view_only() {
        assert_eq!(Mode::View.handle_key(&key(KeyCode::Down)), Some(Action::ScrollDown(1)));
        assert_eq!(Mode::Picker.handle_key(&key(KeyCode::Down)), None);
        assert_eq!(
            Mode::View.handle_key(&KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            Some(Action::GotoBottom)
        );
    }

    #[test]
    fn every_listed_binding_has_help() {
        for mode in [Mode::View, Mode::Picker] {
            assert!(mode.short_help().iter().all(|b| b.help.is_some()));
        }
    }
}
