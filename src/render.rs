use std::fmt::Write as _;

use chrono::{DateTime, Local};
use ratatui::layout::{Constraint, Layout};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::App;
use crate::mode::Mode;

const BAR_PADDING: usize = 1; // blank cells at both ends of the bottom bar
const ITEM_SPACING: usize = 2; // gap between picker timestamps
const ARROW_WIDTH: usize = 2; // "◀ " or " ▶"
const FALLBACK_TIMESTAMP_FORMAT: &str = "%H:%M:%S";

pub fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    if !app.ready {
        frame.render_widget(Paragraph::new(app.i18n.t("initializing")), area);
        return;
    }

    let width = usize::from(area.width);
    let bar = match app.mode {
        Mode::Picker => Some(picker_line(app, width)),
        Mode::View if app.status_bar => Some(status_line(app, width)),
        Mode::View => None,
    };

    let content_area = match bar {
        Some(bar) => {
            let [content_area, bar_area] =
                Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
            frame.render_widget(Paragraph::new(bar).style(app.theme.status_bar), bar_area);
            content_area
        }
        None => area,
    };

    frame.render_widget(Paragraph::new(app.viewport.view(&app.theme)), content_area);
}

/// `[command]  [timestamp][indicator]  [help]`, timestamp centered.
fn status_line(app: &App, width: usize) -> Line<'static> {
    let timestamp = selected_timestamp(app);
    let indicator = format!(" {}", indicator(app));
    let help = format!(" {}", help_text(app));

    let (left_width, right_width) = three_columns(width, timestamp.width());
    let right_width = right_width.saturating_sub(indicator.width());

    Line::from(vec![
        Span::raw(" ".repeat(BAR_PADDING)),
        Span::raw(fit_left(&app.session.command, left_width)),
        Span::raw(timestamp),
        Span::raw(indicator),
        Span::raw(fit_right(&help, right_width)),
        Span::raw(" ".repeat(BAR_PADDING)),
    ])
}

/// Timestamps of neighbouring entries around the selected one, with arrows
/// when more entries are hidden on either side.
fn picker_line(app: &App, width: usize) -> Line<'static> {
    let history = app.session.history();
    let Some(last) = app.session.last_index() else {
        return Line::default();
    };
    let index = app.history_index.unwrap_or(last).min(last);

    let stamp = |i: usize| format_timestamp(&history[i].timestamp, &app.timestamp_format);
    let selected = stamp(index);
    let item_width = selected.width() + ITEM_SPACING;
    let (left_width, right_width) = three_columns(width, selected.width());

    let mut left_items = Vec::new();
    let mut space = left_width.saturating_sub(ARROW_WIDTH);
    let mut i = index;
    while i > 0 && space >= item_width {
        i -= 1;
        left_items.push(stamp(i));
        space -= item_width;
    }

    let mut right_items = Vec::new();
    let mut space = right_width.saturating_sub(ARROW_WIDTH);
    let mut i = index + 1;
    while i <= last && space >= item_width {
        right_items.push(stamp(i));
        space -= item_width;
        i += 1;
    }

    let left_arrow = if index > left_items.len() { "◀ " } else { "  " };
    let right_arrow = if index + right_items.len() < last { " ▶" } else { "  " };

    // Oldest first, each followed by the gap.
    let gap = " ".repeat(ITEM_SPACING);
    let left: String = left_items.iter().rev().map(|s| format!("{s}{gap}")).collect();
    let right: String = right_items.iter().map(|s| format!("{gap}{s}")).collect();

    let left = format!(
        "{left_arrow}{}",
        fit_right(&left, left_width.saturating_sub(ARROW_WIDTH))
    );
    let right = format!(
        "{}{right_arrow}",
        fit_left(&right, right_width.saturating_sub(ARROW_WIDTH))
    );

    Line::from(vec![
        Span::raw(" ".repeat(BAR_PADDING)),
        Span::styled(left, app.theme.picker_item),
        Span::styled(selected, app.theme.picker_selected),
        Span::styled(right, app.theme.picker_item),
        Span::raw(" ".repeat(BAR_PADDING)),
    ])
}

/// Left and right widths that center `center` cells inside the padded bar.
fn three_columns(width: usize, center: usize) -> (usize, usize) {
    let content = width.saturating_sub(2 * BAR_PADDING);
    let left = content.saturating_sub(center) / 2;
    let right = content.saturating_sub(left + center);
    (left, right)
}

fn selected_timestamp(app: &App) -> String {
    app.history_index
        .and_then(|i| app.session.get(i))
        .map(|exec| format_timestamp(&exec.timestamp, &app.timestamp_format))
        .unwrap_or_default()
}

fn indicator(app: &App) -> &'static str {
    if !app.is_following() {
        "⎌"
    } else if app.paused {
        "⏸"
    } else if app.executing {
        "*"
    } else {
        "·"
    }
}

fn help_text(app: &App) -> String {
    app.mode
        .short_help()
        .iter()
        .filter_map(|binding| binding.help)
        .map(|(label, key)| format!("{label} {}", app.i18n.t(key)))
        .collect::<Vec<_>>()
        .join(" • ")
}

fn format_timestamp(timestamp: &DateTime<Local>, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", timestamp.format(format)).is_err() {
        out = timestamp.format(FALLBACK_TIMESTAMP_FORMAT).to_string();
    }
    out
}

/// Longest prefix of `text` that fits in `width` columns.
fn truncate(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (i, ch) in text.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            return &text[..i];
        }
        used += w;
    }
    text
}

fn fit_left(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    format!("{text}{}", " ".repeat(width.saturating_sub(text.width())))
}

fn fit_right(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    format!("{}{text}", " ".repeat(width.saturating_sub(text.width())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Msg, Options};
    use crate::i18n::I18n;
    use crate::storage::Execution;
    use crate::theme::Theme;
    use chrono::TimeZone;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Duration;

    fn app() -> App {
        let options = Options {
            command: "echo".to_string(),
            interval: Duration::from_secs(1),
            max_history: 1000,
            diff: true,
            status_bar: true,
            notify: true,
            scrollbars: true,
            timestamp_format: "%H:%M:%S".to_string(),
        };
        App::new(options, Theme::plain(), I18n::new("en"))
    }

    fn record(app: &mut App, second: u32) {
        let mut exec = Execution::with_output(&second.to_string());
        exec.timestamp = Local.with_ymd_and_hms(2024, 1, 1, 12, 0, second).unwrap();
        app.update(Msg::Tick);
        app.update(Msg::ExecResult(exec));
    }

    fn press(app: &mut App, code: KeyCode) {
        app.update(Msg::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn status_line_centers_the_timestamp() {
        let mut app = app();
        record(&mut app, 0);
        let line = text(&status_line(&app, 60));
        assert_eq!(line.width(), 60);
        assert!(line.starts_with(" echo "));
        // (58 - 8) / 2 columns of command before the timestamp
        assert_eq!(line.find("12:00:00 ·"), Some(1 + 25));
    }

    #[test]
    fn status_line_shows_help_when_wide_enough() {
        let mut app = app();
        record(&mut app, 0);
        let line = text(&status_line(&app, 100));
        assert_eq!(line.width(), 100);
        assert!(line.ends_with("q quit • d diff • p pause • b browse "));
    }

    #[test]
    fn indicator_reflects_state() {
        let mut app = app();
        assert_eq!(indicator(&app), "·");

        app.update(Msg::Tick);
        assert_eq!(indicator(&app), "*");
        app.update(Msg::ExecResult(Execution::with_output("a")));

        press(&mut app, KeyCode::Char('p'));
        assert_eq!(indicator(&app), "⏸");

        record(&mut app, 1);
        press(&mut app, KeyCode::Char('b'));
        press(&mut app, KeyCode::Left);
        assert_eq!(indicator(&app), "⎌");
    }

    #[test]
    fn picker_line_shows_neighbours() {
        let mut app = app();
        for second in 0..5 {
            record(&mut app, second);
        }
        press(&mut app, KeyCode::Char('b'));
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);

        let line = text(&picker_line(&app, 80));
        assert_eq!(line.width(), 80);
        assert!(line.contains("12:00:00  12:00:01  12:00:02  12:00:03  12:00:04"));
        assert!(!line.contains('◀') && !line.contains('▶'));
    }

    #[test]
    fn picker_line_marks_hidden_entries() {
        let mut app = app();
        for second in 0..5 {
            record(&mut app, second);
        }
        press(&mut app, KeyCode::Char('b'));
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);

        let line = text(&picker_line(&app, 30));
        assert_eq!(line.width(), 30);
        assert!(line.contains("12:00:02"));
        assert!(!line.contains("12:00:01"));
        assert!(line.contains('◀') && line.contains('▶'));
    }

    #[test]
    fn fitting_truncates_and_pads_by_display_width() {
        assert_eq!(fit_left("abcdef", 4), "abcd");
        assert_eq!(fit_left("ab", 4), "ab  ");
        assert_eq!(fit_right("ab", 4), "  ab");
        assert_eq!(fit_left("日本語", 5), "日本 ");
        assert_eq!(fit_left("anything", 0), "");
    }

    #[test]
    fn bad_timestamp_format_falls_back() {
        let ts = Local.with_ymd_and_hms(2024, 1, 1, 12, 34, 56).unwrap();
        assert_eq!(format_timestamp(&ts, "%H:%M"), "12:34");
        assert_eq!(format_timestamp(&ts, "%Q"), "12:34:56");
    }

    #[test]
    fn draws_placeholder_before_first_resize() {
        let app = app();
        let mut terminal = Terminal::new(TestBackend::new(20, 3)).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();
        let first_row: String = terminal.backend().buffer().content[..20]
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert_eq!(first_row.trim_end(), "Initializing...");
    }

    #[test]
    fn draws_content_above_status_bar() {
        let mut app = app();
        app.update(Msg::Resize { width: 30, height: 4 });
        record(&mut app, 0);
        let mut terminal = Terminal::new(TestBackend::new(30, 4)).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();

        let rows: Vec<String> = terminal
            .backend()
            .buffer()
            .content
            .chunks(30)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect();
        assert_eq!(rows[0].trim_end(), "0");
        assert!(rows[3].contains("12:00:00"));
    }
}
