use std::str::FromStr;

use derive_more::Display;
use snafu::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Key {
    #[display("tab")]
    Tab,
    #[display("shift+tab")]
    BackTab,
    #[display("up")]
    Up,
    #[display("down")]
    Down,
    #[display("left")]
    Left,
    #[display("right")]
    Right,
    #[display("home")]
    Home,
    #[display("end")]
    End,
    #[display("pageup")]
    PageUp,
    #[display("pagedown")]
    PageDown,
    #[display("enter")]
    Enter,
    #[display("esc")]
    Escape,
    #[display("backspace")]
    Backspace,
    #[display("char:{_0}")]
    Char(char),
}

/// A discrete input handled by a report session.
#[derive(Debug, Clone, Copy, PartialEq, Display)]
pub enum Event {
    #[display("{_0}")]
    Key(Key),
    /// The file list container was measured at a new content height.
    #[display("resize:{height}")]
    Resize { height: f64 },
}

impl From<Key> for Event {
    fn from(key: Key) -> Self {
        Event::Key(key)
    }
}

impl Event {
    /// Parses one line of an event script. Blank lines and `#` comments yield
    /// nothing; `type:TEXT` expands into one character event per char.
    pub fn parse_line(line: &str) -> Result<Vec<Event>, EventParseError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Vec::new());
        }
        if let Some(text) = line.strip_prefix("type:") {
            return Ok(text.chars().map(|c| Event::Key(Key::Char(c))).collect());
        }
        line.parse().map(|event| vec![event])
    }
}

impl FromStr for Event {
    type Err = EventParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if let Some(height) = token.strip_prefix("resize:") {
            let height = height
                .trim()
                .parse::<f64>()
                .ok()
                .context(InvalidHeightSnafu { value: height })?;
            return Ok(Event::Resize { height });
        }
        if let Some(rest) = token.strip_prefix("char:") {
            let mut chars = rest.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Key::Char(c).into()),
                _ => UnknownTokenSnafu { token }.fail(),
            };
        }

        let key = match token.to_ascii_lowercase().as_str() {
            "tab" => Key::Tab,
            "shift+tab" | "backtab" => Key::BackTab,
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "home" => Key::Home,
            "end" => Key::End,
            "pageup" | "pgup" => Key::PageUp,
            "pagedown" | "pgdn" => Key::PageDown,
            "enter" | "return" => Key::Enter,
            "esc" | "escape" => Key::Escape,
            "backspace" => Key::Backspace,
            "space" => Key::Char(' '),
            _ => {
                let mut chars = token.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => return UnknownTokenSnafu { token }.fail(),
                }
            }
        };
        Ok(key.into())
    }
}

#[derive(Debug, Snafu)]
pub enum EventParseError {
    #[snafu(display("Unknown key token '{}'", token))]
    UnknownToken { token: String },
    #[snafu(display("Invalid resize height '{}'", value))]
    InvalidHeight { value: String },
}
