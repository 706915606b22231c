use serde_json::Value;

use crate::message::{AgentResponse, Message};

/// What a Func hands back to the dispatcher.
///
/// Only text, a [`Message`], or a finished [`AgentResponse`] can be turned into a
/// response. `Json` exists for handlers that produce dynamically typed values
/// (bridged scripts, remote calls): a JSON string is accepted as text, anything
/// else is rejected as a type mismatch when the dispatcher normalizes it.
#[derive(Debug, Clone, PartialEq)]
pub enum FuncOutput {
    Text(String),
    Message(Message),
    Response(AgentResponse),
    Json(Value),
}

impl FuncOutput {
    /// Type name used in type-mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            FuncOutput::Text(_) => "str",
            FuncOutput::Message(_) => "Message",
            FuncOutput::Response(_) => "AgentResponse",
            FuncOutput::Json(v) => json_type_name(v),
        }
    }
}

/// Name of the JSON kind of `value`, distinguishing integers from floats.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

impl From<String> for FuncOutput {
    fn from(text: String) -> Self {
        FuncOutput::Text(text)
    }
}

impl From<&str> for FuncOutput {
    fn from(text: &str) -> Self {
        FuncOutput::Text(text.to_string())
    }
}

impl From<Message> for FuncOutput {
    fn from(message: Message) -> Self {
        FuncOutput::Message(message)
    }
}

impl From<AgentResponse> for FuncOutput {
    fn from(response: AgentResponse) -> Self {
        FuncOutput::Response(response)
    }
}

impl From<Value> for FuncOutput {
    fn from(value: Value) -> Self {
        FuncOutput::Json(value)
    }
}
