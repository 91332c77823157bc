use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key chord: code plus exact modifiers. Shift is ignored for characters
/// since it is already part of the character itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

const fn plain(code: KeyCode) -> Chord {
    Chord { code, modifiers: KeyModifiers::NONE }
}

const fn ch(c: char) -> Chord {
    plain(KeyCode::Char(c))
}

const fn ctrl(c: char) -> Chord {
    Chord { code: KeyCode::Char(c), modifiers: KeyModifiers::CONTROL }
}

const fn shift(code: KeyCode) -> Chord {
    Chord { code, modifiers: KeyModifiers::SHIFT }
}

/// Keys that trigger one action, with optional help text.
///
/// `help` is `(key label, i18n key of the description)`; bindings without
/// help are never listed.
#[derive(Debug, Clone, Copy)]
pub struct KeyBinding {
    pub keys: &'static [Chord],
    pub help: Option<(&'static str, &'static str)>,
}

impl KeyBinding {
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let mut modifiers = event.modifiers;
        if matches!(event.code, KeyCode::Char(_)) {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        self.keys
            .iter()
            .any(|k| k.code == event.code && k.modifiers == modifiers)
    }
}

// Shared between view and picker mode.
pub const NAV_LEFT: KeyBinding = KeyBinding {
    keys: &[plain(KeyCode::Left), ch('h')],
    help: Some(("←/h", "help_left")),
};
pub const NAV_RIGHT: KeyBinding = KeyBinding {
    keys: &[plain(KeyCode::Right), ch('l')],
    help: Some(("→/l", "help_right")),
};

// Global, checked before any mode-specific binding.
pub const QUIT: KeyBinding = KeyBinding {
    keys: &[ch('q'), ctrl('c')],
    help: Some(("q", "help_quit")),
};
pub const ESCAPE: KeyBinding = KeyBinding {
    keys: &[plain(KeyCode::Esc)],
    help: Some(("esc", "help_back")),
};
pub const TOGGLE_DIFF: KeyBinding = KeyBinding {
    keys: &[ch('d')],
    help: Some(("d", "help_diff")),
};
pub const TOGGLE_BAR: KeyBinding = KeyBinding {
    keys: &[ch('t')],
    help: Some(("t", "help_status")),
};
pub const PAUSE: KeyBinding = KeyBinding {
    keys: &[ch('p')],
    help: Some(("p", "help_pause")),
};

// View mode.
pub const UP: KeyBinding = KeyBinding {
    keys: &[plain(KeyCode::Up), ch('k')],
    help: Some(("↑/k", "help_up")),
};
pub const DOWN: KeyBinding = KeyBinding {
    keys: &[plain(KeyCode::Down), ch('j')],
    help: Some(("↓/j", "help_down")),
};
pub const PAGE_UP: KeyBinding = KeyBinding {
    keys: &[plain(KeyCode::PageUp)],
    help: Some(("pgup", "help_page_up")),
};
pub const PAGE_DOWN: KeyBinding = KeyBinding {
    keys: &[plain(KeyCode::PageDown)],
    help: Some(("pgdn", "help_page_down")),
};
pub const PAGE_LEFT: KeyBinding = KeyBinding {
    keys: &[shift(KeyCode::Left)],
    help: None,
};
pub const PAGE_RIGHT: KeyBinding = KeyBinding {
    keys: &[shift(KeyCode::Right)],
    help: None,
};
pub const HOME: KeyBinding = KeyBinding {
    keys: &[plain(KeyCode::Home)],
    help: Some(("home", "help_left_edge")),
};
pub const END: KeyBinding = KeyBinding {
    keys: &[plain(KeyCode::End)],
    help: Some(("end", "help_right_edge")),
};
pub const TOP: KeyBinding = KeyBinding {
    keys: &[ch('g')],
    help: Some(("g", "help_top")),
};
pub const BOTTOM: KeyBinding = KeyBinding {
    keys: &[ch('G')],
    help: Some(("G", "help_bottom")),
};
pub const PICKER: KeyBinding = KeyBinding {
    keys: &[ch('b')],
    help: Some(("b", "help_browse")),
};

// Picker mode.
pub const CONFIRM: KeyBinding = KeyBinding {
    keys: &[plain(KeyCode::Enter), ch('b')],
    help: Some(("enter", "help_confirm")),
};
