use thiserror::Error;

/// Unified error type for the entire CodeShot runtime.
#[derive(Error, Debug)]
pub enum CodeShotError {
    // ── Configuration errors ───────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    #[error("config validation failed: {field}: {reason}")]
    ConfigValidation { field: String, reason: String },

    // ── Func registration errors ───────────────────────────────
    #[error("Function names may only be alphanumerics, got {0:?}")]
    InvalidFuncName(String),

    #[error("Func[{0}] is already registered with agent")]
    DuplicateFunc(String),

    // ── Dispatch errors ────────────────────────────────────────
    #[error("Func[{0}] doesn't exist")]
    FuncNotFound(String),

    #[error("Func[{0}] is not allowed to be called")]
    FuncForbidden(String),

    #[error("Func[{func}] returned unexpected output of type {type_name}")]
    TypeMismatch { func: String, type_name: String },

    // ── Storage errors ─────────────────────────────────────────
    #[error("codec error: {0}")]
    Codec(String),

    #[error("Key {0} not found")]
    KeyNotFound(String),

    #[error("storage write failed: {key}: HTTP {status}")]
    StorageWrite { key: String, status: u16 },

    #[error("storage request failed: {url}: HTTP {status}")]
    StorageStatus { url: String, status: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("query carries no access token")]
    MissingCredential,

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CodeShotError {
    /// Whether this error was raised while validating static agent configuration.
    /// Such errors are fatal: the agent never starts serving.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CodeShotError::Config(_)
                | CodeShotError::ConfigValidation { .. }
                | CodeShotError::InvalidFuncName(_)
                | CodeShotError::DuplicateFunc(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CodeShotError>;
