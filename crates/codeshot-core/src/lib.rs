//! # codeshot-core
//!
//! Core types for the CodeShot agent runtime: the message envelopes exchanged
//! with the orchestrator, the value a Func hands back, and the error type every
//! other crate in the workspace returns.

pub mod error;
pub mod message;
pub mod output;

pub use error::{CodeShotError, Result};
pub use message::{AgentQuery, AgentResponse, Embed, Message};
pub use output::FuncOutput;
