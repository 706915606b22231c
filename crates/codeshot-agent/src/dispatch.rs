use serde_json::Value;
use tracing::{debug, warn};

use codeshot_core::{AgentQuery, AgentResponse, CodeShotError, FuncOutput, Message, Result};

use crate::context::{FuncContext, StorageSettings};
use crate::registry::FuncRegistry;

/// Resolves a Func by name, runs it, and normalizes what it returns.
pub struct Dispatcher {
    registry: FuncRegistry,
    agent_id: Option<String>,
    storage: StorageSettings,
}

impl Dispatcher {
    pub fn new(registry: FuncRegistry) -> Self {
        Self {
            registry,
            agent_id: None,
            storage: StorageSettings::default(),
        }
    }

    pub fn with_agent_id(mut self, agent_id: Option<String>) -> Self {
        self.agent_id = agent_id;
        self
    }

    pub fn with_storage(mut self, storage: StorageSettings) -> Self {
        self.storage = storage;
        self
    }

    pub fn registry(&self) -> &FuncRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FuncRegistry {
        &mut self.registry
    }

    pub fn agent_id(&self) -> Option<&str> {
        self.agent_id.as_deref()
    }

    /// Invoke `func_name` with `query`.
    ///
    /// Unknown names are not-found, hidden ones forbidden. The Func runs to
    /// completion on the calling task and its own errors come back untouched.
    pub async fn dispatch(&self, func_name: &str, query: AgentQuery) -> Result<AgentResponse> {
        let entry = match self.registry.lookup(func_name) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(func = %func_name, "dispatch to unknown func");
                return Err(e);
            }
        };
        if !entry.is_exposed() {
            warn!(func = %func_name, "dispatch to hidden func refused");
            return Err(CodeShotError::FuncForbidden(func_name.to_string()));
        }

        debug!(func = %func_name, "dispatching");
        let ctx = FuncContext::new(query, self.agent_id.clone(), self.storage.clone());
        let output = entry.func().call(ctx).await?;
        normalize(func_name, output)
    }
}

/// Turn a Func's output into a response.
///
/// Text becomes a message, a message is wrapped, a response passes through
/// as is. Of the dynamic values only strings count as text; any other JSON
/// value is a type mismatch naming the Func.
pub fn normalize(func_name: &str, output: FuncOutput) -> Result<AgentResponse> {
    match output {
        FuncOutput::Text(text) | FuncOutput::Json(Value::String(text)) => {
            Ok(AgentResponse::new(Message::new(text)))
        }
        FuncOutput::Message(message) => Ok(AgentResponse::new(message)),
        FuncOutput::Response(response) => Ok(response),
        other @ FuncOutput::Json(_) => Err(CodeShotError::TypeMismatch {
            func: func_name.to_string(),
            type_name: other.type_name().to_string(),
        }),
    }
}
