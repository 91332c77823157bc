use ansi_to_tui::IntoText;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

const TAB_WIDTH: usize = 8;

/// Parses one line of output, interpreting SGR escapes as styles and
/// expanding tabs to the next tab stop.
pub fn parse_line(raw: &str) -> Line<'static> {
    let spans: Vec<Span<'static>> = if raw.contains('\x1b') {
        match raw.into_text() {
            Ok(text) => text.lines.into_iter().flat_map(|line| line.spans).collect(),
            Err(_) => vec![Span::raw(raw.to_string())],
        }
    } else {
        vec![Span::raw(raw.to_string())]
    };
    expand_tabs(spans)
}

fn expand_tabs(spans: Vec<Span<'static>>) -> Line<'static> {
    if !spans.iter().any(|s| s.content.contains('\t')) {
        return Line::from(spans);
    }
    let mut col = 0;
    let expanded = spans
        .into_iter()
        .map(|span| {
            let mut content = String::with_capacity(span.content.len());
            for ch in span.content.chars() {
                if ch == '\t' {
                    let pad = TAB_WIDTH - col % TAB_WIDTH;
                    content.extend(std::iter::repeat(' ').take(pad));
                    col += pad;
                } else {
                    content.push(ch);
                    col += ch.width().unwrap_or(0);
                }
            }
            Span::styled(content, span.style)
        })
        .collect::<Vec<_>>();
    Line::from(expanded)
}

/// Display width of a parsed line.
pub fn line_width(line: &Line<'_>) -> usize {
    line.spans
        .iter()
        .flat_map(|s| s.content.chars())
        .map(|ch| ch.width().unwrap_or(0))
        .sum()
}

/// Text content with every escape sequence removed, lines kept.
#[cfg(test)]
pub fn strip_markup(text: &str) -> String {
    text.split('\n')
        .map(|raw| {
            parse_line(raw)
                .spans
                .iter()
                .map(|s| s.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cuts the columns `[x, x + width)` out of `line`, padding with spaces so
/// the result is exactly `width` columns wide. Wide characters cut by
/// either edge are replaced by spaces.
pub fn slice_columns(line: &Line<'static>, x: usize, width: usize) -> Line<'static> {
    let end = x + width;
    let mut col = 0;
    let mut used = 0;
    let mut spans = Vec::new();

    for span in &line.spans {
        if col >= end {
            break;
        }
        let mut content = String::new();
        for ch in span.content.chars() {
            let w = ch.width().unwrap_or(0);
            let next = col + w;
            if next <= x {
                // left of the window
            } else if col >= end {
                break;
            } else if col >= x && next <= end {
                content.push(ch);
                used += w;
            } else {
                let visible = next.min(end) - col.max(x);
                content.extend(std::iter::repeat(' ').take(visible));
                used += visible;
            }
            col = next;
        }
        if !content.is_empty() {
            spans.push(Span::styled(content, span.style));
        }
    }

    if used < width {
        spans.push(Span::raw(" ".repeat(width - used)));
    }
    Line::from(spans)
}

/// Fixed-size window over parsed lines.
///
/// Vertical position is absolute. Horizontal position can only be moved
/// relative to where it is, so callers that need to know the column keep
/// their own count.
#[derive(Debug, Default)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
    y_offset: usize,
    x_offset: usize,
    lines: Vec<Line<'static>>,
    longest: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn set_content(&mut self, lines: Vec<Line<'static>>) {
        self.longest = lines.iter().map(line_width).max().unwrap_or(0);
        self.lines = lines;
    }

    pub fn y_offset(&self) -> usize {
        self.y_offset
    }

    pub fn max_y_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.height)
    }

    pub fn set_y_offset(&mut self, offset: usize) {
        self.y_offset = offset.min(self.max_y_offset());
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.set_y_offset(self.y_offset.saturating_sub(n));
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.set_y_offset(self.y_offset.saturating_add(n));
    }

    pub fn scroll_left(&mut self, n: usize) {
        self.x_offset = self.x_offset.saturating_sub(n);
    }

    pub fn scroll_right(&mut self, n: usize) {
        let max = self.longest.saturating_sub(self.width);
        self.x_offset = self.x_offset.saturating_add(n).min(max);
    }

    /// Visible rows, each exactly `width` columns, padded to `height` rows.
    pub fn view(&self) -> Vec<Line<'static>> {
        let mut rows: Vec<Line<'static>> = self
            .lines
            .iter()
            .skip(self.y_offset)
            .take(self.height)
            .map(|line| slice_columns(line, self.x_offset, self.width))
            .collect();
        while rows.len() < self.height {
            rows.push(Line::raw(" ".repeat(self.width)));
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn escapes_do_not_count_towards_width() {
        let line = parse_line("ab\x1b[31mcd\x1b[0m");
        assert_eq!(line_width(&line), 4);
        assert_eq!(plain(&line), "abcd");
    }

    #[test]
    fn tabs_expand_to_tab_stops() {
        assert_eq!(plain(&parse_line("a\tb")), format!("a{}b", " ".repeat(7)));
        assert_eq!(line_width(&parse_line("\t")), 8);
    }

    #[test]
    fn wide_characters_are_two_columns() {
        assert_eq!(line_width(&parse_line("日本")), 4);
    }

    #[test]
    fn slicing_pads_and_cuts() {
        let line = parse_line("abcdef");
        assert_eq!(plain(&slice_columns(&line, 2, 3)), "cde");
        assert_eq!(plain(&slice_columns(&line, 4, 5)), "ef   ");
        assert_eq!(plain(&slice_columns(&line, 10, 2)), "  ");
    }

    #[test]
    fn slicing_through_a_wide_character_leaves_blanks() {
        let line = parse_line("a日b");
        assert_eq!(plain(&slice_columns(&line, 2, 2)), " b");
        assert_eq!(plain(&slice_columns(&line, 0, 2)), "a ");
    }

    #[test]
    fn strip_markup_keeps_lines() {
        assert_eq!(strip_markup("a\x1b[1mb\x1b[0m\n\nc"), "ab\n\nc");
    }

    #[test]
    fn horizontal_scrolling_is_relative_and_bounded() {
        let mut vp = Viewport::new(3, 2);
        vp.set_content(vec![parse_line("abcdef"), parse_line("xy")]);
        vp.scroll_right(100);
        assert_eq!(plain(&vp.view()[0]), "def");
        vp.scroll_left(1);
        assert_eq!(plain(&vp.view()[0]), "cde");
        vp.scroll_left(100);
        assert_eq!(plain(&vp.view()[1]), "xy ");
    }

    #[test]
    fn view_pads_missing_rows() {
        let mut vp = Viewport::new(2, 3);
        vp.set_content(vec![parse_line("a")]);
        let rows = vp.view();
        assert_eq!(rows.len(), 3);
        assert_eq!(plain(&rows[2]), "  ");
    }

    #[test]
    fn vertical_offset_is_clamped() {
        let mut vp = Viewport::new(1, 2);
        vp.set_content((0..5).map(|i| parse_line(&i.to_string())).collect());
        vp.scroll_down(10);
        assert_eq!(vp.y_offset(), 3);
        vp.scroll_up(1);
        assert_eq!(vp.y_offset(), 2);
        vp.scroll_up(10);
        assert_eq!(vp.y_offset(), 0);
    }
}
