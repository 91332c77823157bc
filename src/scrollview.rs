use ratatui::text::{Line, Span, Text};

use crate::theme::Theme;
use crate::viewport::{line_width, parse_line, Viewport};

/// Start and size of a scrollbar thumb.
///
/// `offset` is the scroll position, `visible` the track length and `total`
/// the content length along the same axis. The thumb always fits the
/// track and is at least one cell long unless the track itself is empty.
pub fn scrollbar_thumb(offset: usize, visible: usize, total: usize) -> (usize, usize) {
    if visible == 0 {
        return (0, 0);
    }
    let size = (visible * visible / total.max(1)).clamp(1, visible);
    let start = offset * (visible - size) / total.saturating_sub(visible).max(1);
    (start.min(visible - size), size)
}

/// A fixed-size window over multi-line, variable-width text with
/// proportional scrollbars on both axes.
#[derive(Debug)]
pub struct Scrollview {
    viewport: Viewport,
    x_offset: usize,    // the inner viewport only scrolls horizontally by relative steps
    content: String,    // raw content
    line_count: usize,  // cached number of lines
    max_width: usize,   // cached widest line
    show_bar: bool,     // scrollbars enabled
    total_width: usize, // requested width, scrollbars included
    total_height: usize,
    needs_v_bar: bool,
    needs_h_bar: bool,
}

impl Scrollview {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            x_offset: 0,
            content: String::new(),
            line_count: 0,
            max_width: 0,
            show_bar: true,
            total_width: width,
            total_height: height,
            needs_v_bar: false,
            needs_h_bar: false,
        }
    }

    /// Replaces the content, keeping the scroll position where it still fits.
    pub fn set_content(&mut self, content: &str) {
        if self.content == content {
            return;
        }
        self.content = content.to_string();

        let lines: Vec<Line<'static>> = if content.is_empty() {
            Vec::new()
        } else {
            content.split('\n').map(parse_line).collect()
        };
        self.line_count = lines.len();
        self.max_width = lines.iter().map(line_width).max().unwrap_or(0);
        self.viewport.set_content(lines);

        self.relayout();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Updates the requested dimensions; content is left as is.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.total_width = width;
        self.total_height = height;
        self.relayout();
    }

    pub fn set_show_scrollbar(&mut self, show: bool) {
        self.show_bar = show;
        self.relayout();
    }

    /// Decides which bars are needed, reserves their space and clamps both
    /// offsets into the new bounds.
    ///
    /// Bar needs are judged against the requested size in a single pass, so
    /// a column taken by the vertical bar never triggers a horizontal bar.
    fn relayout(&mut self) {
        self.needs_v_bar = self.show_bar && self.line_count > self.total_height;
        self.needs_h_bar = self.show_bar && self.max_width > self.total_width;

        self.viewport.width = self.total_width.saturating_sub(usize::from(self.needs_v_bar));
        self.viewport.height = self.total_height.saturating_sub(usize::from(self.needs_h_bar));

        let y = self.viewport.y_offset();
        self.viewport.set_y_offset(y);

        self.x_offset = self.x_offset.min(self.max_x_offset());
        self.viewport.scroll_left(self.viewport.width + self.max_width);
        if self.x_offset > 0 {
            self.viewport.scroll_right(self.x_offset);
        }
    }

    fn max_x_offset(&self) -> usize {
        self.max_width.saturating_sub(self.viewport.width)
    }

    pub fn width(&self) -> usize {
        self.viewport.width
    }

    pub fn height(&self) -> usize {
        self.viewport.height
    }

    pub fn y_offset(&self) -> usize {
        self.viewport.y_offset()
    }

    pub fn x_offset(&self) -> usize {
        self.x_offset
    }

    #[cfg(test)]
    pub fn total_line_count(&self) -> usize {
        self.line_count
    }

    pub fn max_width(&self) -> usize {
        self.max_width
    }

    #[cfg(test)]
    pub fn needs_v_bar(&self) -> bool {
        self.needs_v_bar
    }

    #[cfg(test)]
    pub fn needs_h_bar(&self) -> bool {
        self.needs_h_bar
    }

    #[cfg(test)]
    pub fn at_top(&self) -> bool {
        self.viewport.y_offset() == 0
    }

    #[cfg(test)]
    pub fn at_bottom(&self) -> bool {
        self.viewport.y_offset() >= self.viewport.max_y_offset()
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.viewport.scroll_up(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.viewport.scroll_down(lines);
    }

    pub fn page_up(&mut self) {
        self.viewport.scroll_up(self.viewport.height);
    }

    pub fn page_down(&mut self) {
        self.viewport.scroll_down(self.viewport.height);
    }

    pub fn goto_top(&mut self) {
        self.viewport.set_y_offset(0);
    }

    pub fn goto_bottom(&mut self) {
        self.viewport.set_y_offset(self.viewport.max_y_offset());
    }

    /// Scrolls one column left.
    pub fn scroll_left(&mut self) {
        if self.x_offset > 0 {
            self.x_offset -= 1;
            self.viewport.scroll_left(1);
        }
    }

    /// Scrolls one column right.
    pub fn scroll_right(&mut self) {
        if self.x_offset < self.max_x_offset() {
            self.x_offset += 1;
            self.viewport.scroll_right(1);
        }
    }

    pub fn scroll_left_page(&mut self) {
        let scroll = self.x_offset.min(self.viewport.width);
        self.x_offset -= scroll;
        self.viewport.scroll_left(scroll);
    }

    pub fn scroll_right_page(&mut self) {
        let scroll = self
            .viewport
            .width
            .min(self.max_x_offset().saturating_sub(self.x_offset));
        self.x_offset += scroll;
        self.viewport.scroll_right(scroll);
    }

    pub fn goto_left_edge(&mut self) {
        self.viewport.scroll_left(self.x_offset);
        self.x_offset = 0;
    }

    pub fn goto_right_edge(&mut self) {
        let xmax = self.max_x_offset();
        if self.x_offset < xmax {
            self.viewport.scroll_right(xmax - self.x_offset);
            self.x_offset = xmax;
        }
    }

    /// Renders the visible window with its scrollbars.
    pub fn view(&self, theme: &Theme) -> Text<'static> {
        let mut rows = self.viewport.view();

        if self.needs_v_bar {
            let (start, size) =
                scrollbar_thumb(self.viewport.y_offset(), rows.len(), self.line_count);
            for (i, row) in rows.iter_mut().enumerate() {
                let span = if i >= start && i < start + size {
                    Span::styled(theme.v_thumb.to_string(), theme.thumb)
                } else {
                    Span::styled(theme.v_track.to_string(), theme.track)
                };
                row.spans.push(span);
            }
        }

        if self.needs_h_bar && self.viewport.width > 0 {
            let width = self.viewport.width;
            let (start, size) = scrollbar_thumb(self.x_offset, width, self.max_width);
            let repeat = |ch: char, n: usize| ch.to_string().repeat(n);
            let mut bar = vec![
                Span::styled(repeat(theme.h_track, start), theme.track),
                Span::styled(repeat(theme.h_thumb, size), theme.thumb),
                Span::styled(repeat(theme.h_track, width - start - size), theme.track),
            ];
            // Corner cell stays empty when both bars are shown.
            if self.needs_v_bar {
                bar.push(Span::raw(" "));
            }
            rows.push(Line::from(bar));
        }

        Text::from(rows)
    }
}
