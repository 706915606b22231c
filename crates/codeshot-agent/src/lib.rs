//! # codeshot-agent
//!
//! A CodeShot agent is a base prompt, a list of few-shot examples, and a set
//! of Funcs the examples may call:
//!
//! ```text
//! Q: Flip a coin
//! Ask Func[coin]: flip
//! Func[coin] says: heads
//! A: It's heads!
//! ```
//!
//! The orchestrator decides when to call a Func; this crate only validates
//! the examples, keeps the name → Func table, and turns each call's output
//! into an [`AgentResponse`](codeshot_core::AgentResponse).

pub mod agent;
pub mod context;
pub mod dispatch;
pub mod fewshot;
pub mod metadata;
pub mod registry;
pub mod validate;

pub use agent::CodeShotAgent;
pub use context::{FuncContext, StorageSettings};
pub use dispatch::{Dispatcher, normalize};
pub use fewshot::{FewShots, split_few_shots, strip_few_shot};
pub use metadata::AgentMetadata;
pub use registry::{FnFunc, Func, FuncEntry, FuncRegistry, func_fn};
pub use validate::{LineKind, classify_line, validate_agent_spec};
