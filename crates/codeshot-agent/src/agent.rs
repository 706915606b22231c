use tracing::info;

use codeshot_config::CodeShotConfig;
use codeshot_core::{AgentQuery, AgentResponse, Result};

use crate::context::StorageSettings;
use crate::dispatch::Dispatcher;
use crate::fewshot::FewShots;
use crate::metadata::AgentMetadata;
use crate::registry::{Func, FuncRegistry};

/// A few-shot agent: its published metadata plus the Funcs it can run.
///
/// Funcs are registered during setup; once the agent is shared with a server
/// it is only read.
pub struct CodeShotAgent {
    metadata: AgentMetadata,
    dispatcher: Dispatcher,
}

impl CodeShotAgent {
    /// Build an agent, validating the prompt and few-shots up front.
    pub fn new(base_prompt: impl Into<String>, few_shots: impl Into<FewShots>) -> Result<Self> {
        let metadata = AgentMetadata::new(base_prompt, few_shots)?;
        Ok(Self {
            metadata,
            dispatcher: Dispatcher::new(FuncRegistry::new()),
        })
    }

    /// Build from the `[agent]`, `[platform]` and `[storage]` sections.
    pub fn from_config(config: &CodeShotConfig) -> Result<Self> {
        let agent = &config.agent;
        let few_shots: FewShots = agent
            .few_shots
            .clone()
            .map(FewShots::from)
            .unwrap_or(FewShots::List(Vec::new()));
        let built = Self::new(agent.base_prompt.clone(), few_shots)?
            .with_conversational(agent.conversational)
            .with_agent_id(agent.agent_id.clone())
            .with_storage(StorageSettings::from_config(config));
        info!(
            agent_id = built.agent_id().unwrap_or("-"),
            few_shots = built.metadata.few_shots().len(),
            "agent built from config"
        );
        Ok(built)
    }

    pub fn with_agent_id(mut self, agent_id: Option<String>) -> Self {
        self.dispatcher = self.dispatcher.with_agent_id(agent_id);
        self
    }

    pub fn with_storage(mut self, storage: StorageSettings) -> Self {
        self.dispatcher = self.dispatcher.with_storage(storage);
        self
    }

    pub fn with_conversational(mut self, conversational: bool) -> Self {
        self.metadata = self.metadata.with_conversational(conversational);
        self
    }

    pub fn agent_id(&self) -> Option<&str> {
        self.dispatcher.agent_id()
    }

    /// The document served on handshake.
    pub fn metadata(&self) -> &AgentMetadata {
        &self.metadata
    }

    pub fn registry(&self) -> &FuncRegistry {
        self.dispatcher.registry()
    }

    pub fn register(&mut self, func: impl Func + 'static) -> Result<()> {
        self.dispatcher.registry_mut().register(func)
    }

    pub fn register_as(&mut self, name: &str, func: impl Func + 'static) -> Result<()> {
        self.dispatcher.registry_mut().register_as(name, func)
    }

    pub fn register_hidden(&mut self, name: &str, func: impl Func + 'static) -> Result<()> {
        self.dispatcher.registry_mut().register_hidden(name, func)
    }

    pub async fn dispatch(&self, func_name: &str, query: AgentQuery) -> Result<AgentResponse> {
        self.dispatcher.dispatch(func_name, query).await
    }
}
