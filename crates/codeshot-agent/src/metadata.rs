use serde::Serialize;

use codeshot_core::Result;

use crate::fewshot::{FewShots, strip_few_shot};
use crate::validate::validate_agent_spec;

/// The agent description published on handshake.
///
/// Only [`AgentMetadata::new`] builds one, and it validates before returning,
/// so every instance is well-formed. Fields are read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentMetadata {
    base_prompt: String,
    few_shots: Vec<String>,
    conversational: bool,
}

impl AgentMetadata {
    /// Normalize the few-shots (split a block, strip every example) and
    /// validate the result.
    pub fn new(base_prompt: impl Into<String>, few_shots: impl Into<FewShots>) -> Result<Self> {
        let base_prompt = base_prompt.into();
        let few_shots: Vec<String> = few_shots
            .into()
            .into_list()
            .iter()
            .map(|shot| strip_few_shot(shot))
            .collect();
        validate_agent_spec(&base_prompt, &few_shots)?;
        Ok(Self {
            base_prompt,
            few_shots,
            conversational: false,
        })
    }

    pub fn with_conversational(mut self, conversational: bool) -> Self {
        self.conversational = conversational;
        self
    }

    pub fn base_prompt(&self) -> &str {
        &self.base_prompt
    }

    pub fn few_shots(&self) -> &[String] {
        &self.few_shots
    }

    pub fn conversational(&self) -> bool {
        self.conversational
    }
}
