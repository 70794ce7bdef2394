//! Slash-command interpreter
//!
//! Classifies raw chat input into a typed message before it is validated,
//! authorized and stored.

use rand::Rng;

use super::dice::{roll_notation, DEFAULT_NOTATION};
use crate::entities::MessageType;

/// Reply to `/help`
pub const HELP_TEXT: &str = "Available commands: /me [action], /roll [XdY], /help";

/// Input classified into a message type and content, ready for validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedMessage {
    pub message_type: MessageType,
    pub content: String,
}

impl PreparedMessage {
    fn new(message_type: MessageType, content: impl Into<String>) -> Self {
        Self {
            message_type,
            content: content.into(),
        }
    }

    /// True when the input was a slash command
    #[inline]
    pub fn is_command_output(&self) -> bool {
        !matches!(self.message_type, MessageType::Chat)
    }
}

/// Interpret input using the thread-local RNG for dice
pub fn interpret(raw: &str) -> PreparedMessage {
    interpret_with_rng(raw, &mut rand::thread_rng())
}

/// Interpret input with a caller-supplied RNG
pub fn interpret_with_rng<R: Rng + ?Sized>(raw: &str, rng: &mut R) -> PreparedMessage {
    let Some(command_line) = raw.strip_prefix('/') else {
        return PreparedMessage::new(MessageType::Chat, raw.trim());
    };

    let mut parts = command_line.split(' ');
    let token = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match token.to_lowercase().as_str() {
        "me" => PreparedMessage::new(MessageType::Action, args.join(" ")),
        "roll" => {
            let notation = args
                .first()
                .copied()
                .filter(|a| !a.is_empty())
                .unwrap_or(DEFAULT_NOTATION);
            let result = roll_notation(notation, rng);
            PreparedMessage::new(MessageType::DiceRoll, format!("{notation} = {result}"))
        }
        "help" => PreparedMessage::new(MessageType::System, HELP_TEXT),
        _ => PreparedMessage::new(
            MessageType::System,
            format!("Unknown command: /{token}. Type /help for available commands."),
        ),
    }
}
