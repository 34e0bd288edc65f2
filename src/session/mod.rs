
use std::fmt;

use tracing::debug;

use crate::Result;
use crate::pipeline::{Pipeline, Reply};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("You"),
            Self::Assistant => f.write_str("Bot"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// Append-only transcript for one interactive session.
///
/// The caller owns the session: create it when a chat starts and drop it
/// when the chat ends. Nothing is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatSession {
    turns: Vec<ChatTurn>,
}

impl ChatSession {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer one user message and record both sides of the exchange.
    ///
    /// Blank input is ignored. If the pipeline fails, nothing is recorded
    /// and the error is returned so the caller can report it.
    #[inline]
    pub fn handle_turn(&mut self, pipeline: &dyn Pipeline, input: &str) -> Result<Option<Reply>> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        let reply = pipeline.respond(input)?;

        self.turns.push(ChatTurn {
            role: Role::User,
            content: input.to_string(),
        });
        self.turns.push(ChatTurn {
            role: Role::Assistant,
            content: reply.text.clone(),
        });
        debug!("Session now holds {} turns", self.turns.len());

        Ok(Some(reply))
    }

    #[inline]
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    #[inline]
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
