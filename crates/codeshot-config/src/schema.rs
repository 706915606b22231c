use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Root configuration — maps to `codeshot.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeShotConfig {
    pub agent: AgentConfig,
    pub server: ServerConfig,
    pub platform: PlatformConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

// ── Agent ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Qualified agent id (`username/handle`). Scopes user storage and the
    /// refresh ping; optional for purely local serving.
    pub agent_id: Option<String>,
    /// What this agent does, how it does it, and its personality.
    pub base_prompt: String,
    /// Few-shot examples, either one block separated by blank lines or a list.
    pub few_shots: Option<FewShotsValue>,
    /// File holding the few-shot block. Relative paths resolve against the
    /// directory of the config file. Mutually exclusive with `few_shots`.
    pub few_shots_file: Option<PathBuf>,
    /// Whether the orchestrator should keep conversation history for this agent.
    pub conversational: bool,
}

/// Few-shots as written in TOML: a single multi-line string or an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FewShotsValue {
    Text(String),
    List(Vec<String>),
}

// ── Server ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP listen address.
    pub listen: String,
    /// Ping the platform's refresh endpoint once the server is up, so it
    /// re-fetches the prompt and few-shots.
    pub refresh_on_start: bool,
    /// Enable permissive CORS.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8181".into(),
            refresh_on_start: true,
            cors: false,
        }
    }
}

// ── Platform ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Base platform URL; service URLs are derived from it.
    pub api_url: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            api_url: "https://app.fixie.ai".into(),
        }
    }
}

impl PlatformConfig {
    /// The user storage service, `{api_url}/api/userstorage`.
    pub fn user_storage_url(&self) -> String {
        format!("{}/api/userstorage", self.api_url.trim_end_matches('/'))
    }

    /// The refresh endpoint pinged when an agent comes alive.
    pub fn refresh_url(&self) -> String {
        format!("{}/api/refresh", self.api_url.trim_end_matches('/'))
    }
}

// ── Storage ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the user storage URL derived from `platform.api_url`.
    pub url: Option<String>,
    /// Per-request timeout for storage round trips, in seconds.
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: 30,
        }
    }
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Output format: "pretty", "json", "compact".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl CodeShotConfig {
    /// Effective user storage base URL.
    pub fn storage_url(&self) -> String {
        match self.storage.url {
            Some(ref url) => url.trim_end_matches('/').to_string(),
            None => self.platform.user_storage_url(),
        }
    }
}

// ── Validation ─────────────────────────────────────────────────

/// A single config validation issue.
#[derive(Debug)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub severity: WarningSeverity,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            WarningSeverity::Error => "error",
            WarningSeverity::Warning => "warning",
            WarningSeverity::Info => "info",
        };
        write!(f, "{}: {}: {}", label, self.field, self.message)?;
        if let Some(ref h) = self.hint {
            write!(f, " (hint: {})", h)?;
        }
        Ok(())
    }
}

impl CodeShotConfig {
    /// Validate the config and return a list of warnings/errors.
    /// Returns `Err` with all messages joined if any severity is Error.
    ///
    /// Prompt and few-shot structure is checked later, when the agent is built.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, String> {
        let mut warnings = Vec::new();

        // ── Agent ───
        if self.agent.base_prompt.trim().is_empty() {
            warnings.push(ConfigWarning {
                field: "agent.base_prompt".into(),
                message: "base prompt is empty; the agent cannot be served".into(),
                severity: WarningSeverity::Warning,
                hint: Some("Describe what the agent does and how it does it".into()),
            });
        }
        if self.agent.few_shots.is_some() && self.agent.few_shots_file.is_some() {
            warnings.push(ConfigWarning {
                field: "agent.few_shots".into(),
                message: "both few_shots and few_shots_file are set".into(),
                severity: WarningSeverity::Error,
                hint: Some("Keep the examples inline or in a file, not both".into()),
            });
        }
        if let Some(ref id) = self.agent.agent_id {
            if id.trim().is_empty() || id.contains(char::is_whitespace) {
                warnings.push(ConfigWarning {
                    field: "agent.agent_id".into(),
                    message: format!("agent id {:?} is not a valid handle", id),
                    severity: WarningSeverity::Error,
                    hint: Some("Use the qualified form 'username/handle'".into()),
                });
            }
        } else if self.server.refresh_on_start {
            warnings.push(ConfigWarning {
                field: "server.refresh_on_start".into(),
                message: "no agent.agent_id set, the refresh ping will be skipped".into(),
                severity: WarningSeverity::Info,
                hint: None,
            });
        }

        // ── Server ───
        if self.server.listen.parse::<SocketAddr>().is_err() {
            warnings.push(ConfigWarning {
                field: "server.listen".into(),
                message: format!("'{}' is not a socket address", self.server.listen),
                severity: WarningSeverity::Error,
                hint: Some("Use host:port, e.g. '0.0.0.0:8181'".into()),
            });
        }

        // ── Platform / storage URLs ───
        if let Err(e) = url::Url::parse(&self.platform.api_url) {
            warnings.push(ConfigWarning {
                field: "platform.api_url".into(),
                message: format!("invalid URL '{}': {}", self.platform.api_url, e),
                severity: WarningSeverity::Error,
                hint: None,
            });
        }
        if let Some(ref storage_url) = self.storage.url {
            if let Err(e) = url::Url::parse(storage_url) {
                warnings.push(ConfigWarning {
                    field: "storage.url".into(),
                    message: format!("invalid URL '{}': {}", storage_url, e),
                    severity: WarningSeverity::Error,
                    hint: None,
                });
            }
        }
        if self.storage.timeout_secs == 0 {
            warnings.push(ConfigWarning {
                field: "storage.timeout_secs".into(),
                message: "timeout must be greater than zero".into(),
                severity: WarningSeverity::Error,
                hint: Some("The default is 30 seconds".into()),
            });
        }

        // ── Logging ───
        if !matches!(self.logging.format.as_str(), "pretty" | "json" | "compact") {
            warnings.push(ConfigWarning {
                field: "logging.format".into(),
                message: format!("unknown log format '{}', using pretty", self.logging.format),
                severity: WarningSeverity::Warning,
                hint: Some("One of: pretty, json, compact".into()),
            });
        }

        let errors: Vec<String> = warnings
            .iter()
            .filter(|w| w.severity == WarningSeverity::Error)
            .map(|w| w.to_string())
            .collect();
        if !errors.is_empty() {
            return Err(errors.join("\n"));
        }

        Ok(warnings)
    }
}
