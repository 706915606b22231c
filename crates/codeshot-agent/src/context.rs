use std::time::Duration;

use codeshot_config::CodeShotConfig;
use codeshot_core::{AgentQuery, CodeShotError, Message, Result};
use codeshot_storage::UserStorage;

/// Where user storage lives and how long a round trip may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSettings {
    pub url: String,
    pub timeout: Duration,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self::from_config(&CodeShotConfig::default())
    }
}

impl StorageSettings {
    pub fn from_config(config: &CodeShotConfig) -> Self {
        Self {
            url: config.storage_url(),
            timeout: Duration::from_secs(config.storage.timeout_secs),
        }
    }
}

/// Everything a Func gets for one invocation.
///
/// Built fresh per request. Storage clients made from it carry that
/// request's credential and must not outlive it.
#[derive(Debug, Clone)]
pub struct FuncContext {
    query: AgentQuery,
    agent_id: Option<String>,
    storage: StorageSettings,
}

impl FuncContext {
    pub fn new(query: AgentQuery, agent_id: Option<String>, storage: StorageSettings) -> Self {
        Self {
            query,
            agent_id,
            storage,
        }
    }

    pub fn query(&self) -> &AgentQuery {
        &self.query
    }

    pub fn message(&self) -> &Message {
        &self.query.message
    }

    /// Text of the triggering message.
    pub fn text(&self) -> &str {
        &self.query.message.text
    }

    pub fn agent_id(&self) -> Option<&str> {
        self.agent_id.as_deref()
    }

    /// Open the calling user's storage for this agent.
    pub fn user_storage(&self) -> Result<UserStorage> {
        let token = self
            .query
            .access_token
            .as_deref()
            .ok_or(CodeShotError::MissingCredential)?;
        let agent_id = self.agent_id.as_deref().ok_or_else(|| {
            CodeShotError::Config("user storage requires agent.agent_id to be set".into())
        })?;
        UserStorage::new(&self.storage.url, agent_id, token, self.storage.timeout)
    }
}
