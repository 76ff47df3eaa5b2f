//! Operator-facing narration.
//!
//! Every message is printed to stdout and mirrored to the session log
//! through the [`SESSION_TARGET`] tracing target.

use crossterm::style::{Color, Stylize};
use zenflow_ask::SESSION_TARGET;

/// Prefix written before narrated messages.
pub const ARROWS: &str = "-----> ";

/// Indentation for continuation lines.
pub const INDENT: &str = "       ";

/// How a message is decorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogStyle {
    /// Prefix the message with seven spaces.
    pub indent: bool,
    /// Prefix the message with `-----> `.
    pub arrows: bool,
    /// Foreground colour; `None` prints plain text.
    pub color: Option<Color>,
}

impl Default for LogStyle {
    fn default() -> Self {
        Self {
            indent: false,
            arrows: true,
            color: Some(Color::Cyan),
        }
    }
}

impl LogStyle {
    /// Red arrows, used for rejections and failures.
    pub fn error() -> Self {
        Self {
            color: Some(Color::Red),
            ..Self::default()
        }
    }

    /// Yellow without arrows, used to echo commands.
    pub fn command() -> Self {
        Self {
            arrows: false,
            color: Some(Color::Yellow),
            ..Self::default()
        }
    }

    /// Indents the message.
    #[must_use]
    pub fn indented(mut self) -> Self {
        self.indent = true;
        self
    }

    /// Drops the colour.
    #[must_use]
    pub fn plain(mut self) -> Self {
        self.color = None;
        self
    }
}

/// Formats a message without colour.
pub fn format_line(message: &str, style: LogStyle) -> String {
    let mut line = String::new();
    if style.indent {
        line.push_str(INDENT);
    }
    if style.arrows {
        line.push_str(ARROWS);
    }
    line.push_str(message);
    line
}

/// Narrates a message with the default cyan arrow style.
pub fn say(message: &str) {
    say_with(message, LogStyle::default());
}

/// Narrates a message in red.
pub fn error(message: &str) {
    say_with(message, LogStyle::error());
}

/// Narrates a message with an explicit style.
pub fn say_with(message: &str, style: LogStyle) {
    let line = format_line(message, style);
    tracing::info!(target: SESSION_TARGET, "{line}");
    match style.color {
        Some(color) => println!("{}", line.with(color)),
        None => println!("{line}"),
    }
}

/// Writes to the session log only.
pub fn to_file(message: &str) {
    tracing::info!(target: SESSION_TARGET, "{message}");
}
