use crossterm::style::{Attribute, Color as TermColor, ContentStyle, SetAttribute};
use ratatui::style::{Color, Modifier, Style};

const COLOR_DIM: Color = Color::Rgb(0x88, 0x88, 0x88);
const COLOR_BRIGHT: Color = Color::Rgb(0xff, 0xff, 0xff);
const COLOR_BG: Color = Color::Rgb(0x1e, 0x1e, 0x1e);

/// Styles and glyphs used to draw the UI.
///
/// `insert` and `error` are embedded into content text as SGR escapes, the
/// rest style widget chrome directly.
#[derive(Debug, Clone)]
pub struct Theme {
    pub insert: ContentStyle,
    pub insert_underline: bool, // keeps changes visible when colors are disabled
    pub error: ContentStyle,
    pub status_bar: Style,
    pub picker_item: Style,
    pub picker_selected: Style,
    pub track: Style,
    pub thumb: Style,
    pub v_track: char,
    pub v_thumb: char,
    pub h_track: char,
    pub h_thumb: char,
}

impl Default for Theme {
    fn default() -> Self {
        let mut insert = ContentStyle::new();
        insert.background_color = Some(TermColor::Rgb { r: 0x2e, g: 0x7d, b: 0x32 });

        let mut error = ContentStyle::new();
        error.foreground_color = Some(TermColor::Rgb { r: 0xff, g: 0x55, b: 0x55 });
        error.attributes.set(Attribute::Bold);

        Self {
            insert,
            insert_underline: true,
            error,
            status_bar: Style::default().fg(COLOR_DIM).bg(COLOR_BG),
            picker_item: Style::default().fg(COLOR_DIM).bg(COLOR_BG),
            picker_selected: Style::default()
                .fg(COLOR_BRIGHT)
                .bg(COLOR_BG)
                .add_modifier(Modifier::BOLD),
            track: Style::default().fg(COLOR_DIM),
            thumb: Style::default().fg(COLOR_BRIGHT),
            v_track: '│',
            v_thumb: '┃',
            h_track: '─',
            h_thumb: '━',
        }
    }
}

impl Theme {
    /// Theme without any colors or attributes. Marked text renders as-is.
    pub fn plain() -> Self {
        Self {
            insert: ContentStyle::new(),
            insert_underline: false,
            error: ContentStyle::new(),
            status_bar: Style::default(),
            picker_item: Style::default(),
            picker_selected: Style::default(),
            track: Style::default(),
            thumb: Style::default(),
            ..Self::default()
        }
    }

    /// Underline is switched off on its own afterwards, so styles from
    /// the surrounding output survive the marker.
    pub fn mark_insert(&self, text: &str) -> String {
        let marked = self.insert.apply(text).to_string();
        if !self.insert_underline {
            return marked;
        }
        format!(
            "{}{marked}{}",
            SetAttribute(Attribute::Underlined),
            SetAttribute(Attribute::NoUnderline)
        )
    }

    pub fn mark_error(&self, text: &str) -> String {
        self.error.apply(text).to_string()
    }
}
