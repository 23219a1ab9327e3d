//! Slash-command parsing and responses.

mod responder;

pub use responder::*;

/// A slash command resolved from its free-form text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    List,
    Rollback(Option<String>),
}

impl Command {
    /// Resolve `text` as typed after the slash command. Unknown input gets help.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let (name, argument) = match text.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim())),
            None => (text, None),
        };

        match name.to_ascii_lowercase().as_str() {
            "list" => Command::List,
            "rollback" => Command::Rollback(
                argument
                    .filter(|arg| !arg.is_empty())
                    .map(str::to_string),
            ),
            _ => Command::Help,
        }
    }
}
