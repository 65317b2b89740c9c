//! CLI theme and styling.

use colored::Colorize;

/// CLI theme configuration.
pub(crate) struct Theme;

impl Theme {
    /// Format a success message.
    pub(crate) fn success(text: &str) -> String {
        format!("{} {}", "✓".green(), text)
    }

    /// Format an error message.
    pub(crate) fn error(text: &str) -> String {
        format!("{} {}", "✗".red(), text.red())
    }

    /// Format a warning message.
    pub(crate) fn warning(text: &str) -> String {
        format!("{} {}", "!".yellow(), text.yellow())
    }

    /// Format a dimmed message.
    pub(crate) fn dimmed(text: &str) -> String {
        format!("{}", text.dimmed())
    }

    /// Format a key-value pair for display in approval boxes.
    pub(crate) fn kv(key: &str, value: &str) -> String {
        format!("{}: {}", key.bold(), value)
    }

    /// Draw a yellow box around an approval request.
    pub(crate) fn approval_box(title: &str, content: &str) -> String {
        const WIDTH: usize = 60;
        let inner = WIDTH.saturating_sub(2);
        let top = format!("╭{}╮", "─".repeat(inner));
        let bottom = format!("╰{}╯", "─".repeat(inner));
        let empty = format!("│{:w$}│", "", w = inner);

        let pad_line = |text: &str| -> String {
            let visible_len = strip_ansi(text).chars().count();
            let padding = WIDTH.saturating_sub(4).saturating_sub(visible_len);
            format!("│ {text}{:p$} │", "", p = padding)
        };

        let mut lines = vec![
            top.yellow().to_string(),
            pad_line(&title.bold().to_string()),
            empty.yellow().to_string(),
        ];
        lines.extend(content.lines().map(pad_line));
        lines.push(bottom.yellow().to_string());
        lines.join("\n")
    }
}

/// Strip ANSI escape codes from a string for visible-length calculation.
fn strip_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_escape = false;
    for c in s.chars() {
        if in_escape {
            if c.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if c == '\x1b' {
            in_escape = true;
        } else {
            result.push(c);
        }
    }
    result
}
