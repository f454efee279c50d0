use std::borrow::Cow;

use derive_more::Display;

use crate::view::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum CommandView {
    #[default]
    #[display("Pretty")]
    Pretty,
    #[display("Original")]
    Original,
}

impl CommandView {
    fn toggled(self) -> Self {
        match self {
            CommandView::Pretty => CommandView::Original,
            CommandView::Original => CommandView::Pretty,
        }
    }
}

/// Modal viewer for the command that created a layer. While it is open it
/// receives every key, zone switching included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDialog {
    layer_index: usize,
    command: String,
    view: CommandView,
}

impl CommandDialog {
    pub fn new(layer_index: usize, command: impl Into<String>) -> Self {
        Self {
            layer_index,
            command: command.into(),
            view: CommandView::default(),
        }
    }

    pub fn layer_index(&self) -> usize {
        self.layer_index
    }

    pub fn view(&self) -> CommandView {
        self.view
    }

    pub fn title(&self) -> String {
        format!("Layer {} Command", self.layer_index + 1)
    }

    pub fn text(&self) -> Cow<'_, str> {
        match self.view {
            CommandView::Original => Cow::Borrowed(&self.command),
            CommandView::Pretty => Cow::Owned(prettify_command(&self.command)),
        }
    }

    /// Returns `None` once the dialog is dismissed.
    pub fn reduce(mut self, key: Key) -> Option<Self> {
        match key {
            Key::Escape => return None,
            Key::Tab | Key::BackTab | Key::Left | Key::Right => self.view = self.view.toggled(),
            _ => {}
        }
        Some(self)
    }
}

/// Each run of tabs becomes a single line break.
fn prettify_command(command: &str) -> String {
    let mut pretty = String::with_capacity(command.len());
    let mut in_tabs = false;
    for c in command.chars() {
        if c == '\t' {
            if !in_tabs {
                pretty.push('\n');
            }
            in_tabs = true;
        } else {
            pretty.push(c);
            in_tabs = false;
        }
    }
    pretty
}
