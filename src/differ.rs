use crate::theme::Theme;
use similar::{ChangeTag, TextDiff};

/// Marks characters of a newer output that differ from the previous one.
///
/// Lines are paired by position, not realigned: inserting or removing a
/// whole line shifts every following pair. That trade-off suits commands
/// whose output keeps its shape and only changes values.
pub struct Highlighter<'a> {
    theme: &'a Theme,
}

impl<'a> Highlighter<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    /// Returns `new_text` with inserted characters marked, and whether any
    /// line differed. Deleted characters never appear in the result.
    pub fn highlight(&self, old_text: &str, new_text: &str) -> (String, bool) {
        if old_text == new_text {
            return (new_text.to_string(), false);
        }

        let old_lines: Vec<&str> = old_text.split('\n').collect();
        let mut result = String::with_capacity(new_text.len());
        let mut changed = false;

        for (i, new_line) in new_text.split('\n').enumerate() {
            if i > 0 {
                result.push('\n');
            }

            let old_line = old_lines.get(i).copied().unwrap_or("");
            if old_line == new_line {
                result.push_str(new_line);
                continue;
            }

            changed = true;
            self.highlight_line(old_line, new_line, &mut result);
        }

        (result, changed)
    }

    fn highlight_line(&self, old_line: &str, new_line: &str, out: &mut String) {
        let old_tokens = tokenize(old_line);
        let new_tokens = tokenize(new_line);
        let diff = TextDiff::configure().diff_slices(&old_tokens[..], &new_tokens[..]);

        let mut run = String::new();
        let mut run_tag = ChangeTag::Equal;
        for change in diff.iter_all_changes() {
            let tag = change.tag();
            if tag == ChangeTag::Delete {
                continue;
            }
            let token = change.value();
            // Escape sequences from the output pass through unmarked.
            if is_escape(token) {
                self.flush_run(run_tag, &run, out);
                run.clear();
                out.push_str(token);
                continue;
            }
            if tag != run_tag {
                self.flush_run(run_tag, &run, out);
                run.clear();
                run_tag = tag;
            }
            run.push_str(token);
        }
        self.flush_run(run_tag, &run, out);
    }

    fn flush_run(&self, tag: ChangeTag, run: &str, out: &mut String) {
        if run.is_empty() {
            return;
        }
        match tag {
            ChangeTag::Insert => out.push_str(&self.theme.mark_insert(run)),
            ChangeTag::Equal => out.push_str(run),
            ChangeTag::Delete => {}
        }
    }
}

/// Splits a line into diff tokens: one per character, except that a whole
/// CSI escape sequence (`ESC [ ... final`) is a single token.
fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = line;
    while let Some(ch) = rest.chars().next() {
        let len = if ch == '\x1b' {
            escape_len(rest)
        } else {
            ch.len_utf8()
        };
        let (token, tail) = rest.split_at(len);
        tokens.push(token);
        rest = tail;
    }
    tokens
}

// Byte length of the escape sequence at the start of `s`.
fn escape_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    if bytes.get(1) != Some(&b'[') {
        return 1;
    }
    match bytes[2..].iter().position(|b| (0x40..=0x7e).contains(b)) {
        Some(i) => i + 3,
        None => s.len(),
    }
}

fn is_escape(token: &str) -> bool {
    token.starts_with('\x1b')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::strip_markup;

    fn marked() -> Theme {
        Theme::default()
    }

    #[test]
    fn identical_texts_are_returned_untouched() {
        let theme = marked();
        let h = Highlighter::new(&theme);
        for text in ["", "a", "x=1\ny=2", "\n\n", "日本語\tz"] {
            assert_eq!(h.highlight(text, text), (text.to_string(), false));
        }
    }

    #[test]
    fn changed_value_is_marked_and_deleted_value_dropped() {
        let theme = marked();
        let h = Highlighter::new(&theme);
        let (out, changed) = h.highlight("x=1\ny=2", "x=9\ny=2");
        assert!(changed);
        assert_eq!(out, format!("x={}\ny=2", theme.mark_insert("9")));
        assert!(!strip_markup(&out).contains('1'));
    }

    #[test]
    fn missing_old_lines_count_as_empty() {
        let theme = marked();
        let h = Highlighter::new(&theme);
        let (out, changed) = h.highlight("a", "a\nb");
        assert!(changed);
        assert_eq!(out, format!("a\n{}", theme.mark_insert("b")));
    }

    #[test]
    fn surplus_old_lines_are_ignored() {
        let theme = marked();
        let h = Highlighter::new(&theme);
        let (out, changed) = h.highlight("a\nb\nc", "a");
        assert!(!changed);
        assert_eq!(out, "a");
    }

    #[test]
    fn escape_sequences_are_never_split_or_marked() {
        let theme = marked();
        let h = Highlighter::new(&theme);

        let (out, changed) = h.highlight("\x1b[31mready\x1b[0m", "\x1b[32mready\x1b[0m");
        assert!(changed);
        assert_eq!(out, "\x1b[32mready\x1b[0m");
        assert_eq!(strip_markup(&out), "ready");

        let (out, _) = h.highlight("\x1b[31mx=1\x1b[0m", "\x1b[31mx=9\x1b[0m");
        assert_eq!(out, format!("\x1b[31mx={}\x1b[0m", theme.mark_insert("9")));
        assert_eq!(strip_markup(&out), "x=9");
    }

    #[test]
    fn tokens_keep_escapes_whole() {
        assert_eq!(tokenize("a\x1b[1;31mb"), vec!["a", "\x1b[1;31m", "b"]);
        assert_eq!(tokenize("日\x1b"), vec!["日", "\x1b"]);
        assert_eq!(tokenize("\x1b[12"), vec!["\x1b[12"]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn plain_theme_reproduces_new_text() {
        let theme = Theme::plain();
        let h = Highlighter::new(&theme);
        let (out, changed) = h.highlight("load 0.51 0.40", "load 0.73 0.42");
        assert!(changed);
        assert_eq!(out, "load 0.73 0.42");
    }

    #[test]
    fn stripped_result_always_equals_new_text() {
        let theme = marked();
        let h = Highlighter::new(&theme);
        let samples = [
            "", "a", "abc", "abc\ndef", "x=1\ny=2", "x=10\ny=2\nz", "héllo wörld", "12:00:01",
            "line\n\nline", "→ ok", "a b c d",
        ];
        for old in samples {
            for new in samples {
                let (out, _) = h.highlight(old, new);
                assert_eq!(strip_markup(&out), new, "old={old:?} new={new:?}");
            }
        }
    }
}
