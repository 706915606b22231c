//! # codeshot-config
//!
//! Configuration system for the CodeShot runtime. Reads from `codeshot.toml`
//! and environment variables, in that precedence order, then validates the
//! result before anything starts serving.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::CodeShotConfig;
pub use schema::{
    AgentConfig, ConfigWarning, FewShotsValue, LoggingConfig, PlatformConfig, ServerConfig,
    StorageConfig, WarningSeverity,
};
