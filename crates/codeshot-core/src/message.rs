use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A unit of conversational content exchanged with the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    /// Named attachments referenced from `text`, keyed by embed id.
    #[serde(default)]
    pub embeds: BTreeMap<String, Embed>,
}

/// An attachment carried alongside a message, e.g. an image URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub content_type: String,
    pub uri: String,
}

/// An inbound request for a single Func invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentQuery {
    pub message: Message,
    /// Bearer credential of the user on whose behalf the agent runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// The uniform envelope every Func result is normalized into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub message: Message,
}

impl Message {
    /// Create a plain text message with no embeds.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            embeds: BTreeMap::new(),
        }
    }

    /// Attach an embed under `key`, replacing any previous one.
    pub fn with_embed(mut self, key: impl Into<String>, embed: Embed) -> Self {
        self.embeds.insert(key.into(), embed);
        self
    }
}

impl AgentQuery {
    pub fn new(message: Message) -> Self {
        Self {
            message,
            access_token: None,
            session_id: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

impl AgentResponse {
    pub fn new(message: Message) -> Self {
        Self { message }
    }

    /// Shorthand for a response wrapping a plain text message.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Message::new(text))
    }
}

impl From<Message> for AgentResponse {
    fn from(message: Message) -> Self {
        Self::new(message)
    }
}
