use std::path::{Path, PathBuf};
use tracing::{info, warn};

use codeshot_core::{CodeShotError, Result};

use crate::schema::{CodeShotConfig, FewShotsValue};

/// Loads the CodeShot configuration once at startup.
///
/// Agent metadata is immutable after construction, so unlike a long-running
/// daemon config there is no reload path.
pub struct ConfigLoader {
    config: CodeShotConfig,
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Resolve the config path: explicit path > CODESHOT_CONFIG env >
    /// ./codeshot.toml > ~/.codeshot/codeshot.toml
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var("CODESHOT_CONFIG") {
            return PathBuf::from(p);
        }
        let local = PathBuf::from("codeshot.toml");
        if local.exists() {
            return local;
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".codeshot")
            .join("codeshot.toml")
    }

    /// Load the config from disk, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = Self::resolve_path(path);
        let config = if config_path.exists() {
            info!(?config_path, "loading configuration");
            let raw = std::fs::read_to_string(&config_path)?;
            Self::parse(&raw, &config_path)?
        } else {
            warn!(?config_path, "config file not found, using defaults");
            CodeShotConfig::default()
        };

        let config = Self::apply_env_overrides(config);

        // Validate config — log warnings, fail on errors
        match config.validate() {
            Ok(warnings) => {
                for w in &warnings {
                    warn!("{}", w);
                }
            }
            Err(e) => {
                return Err(CodeShotError::Config(e));
            }
        }

        let base_dir = config_path.parent().unwrap_or(Path::new("."));
        let config = Self::resolve_few_shots_file(config, base_dir)?;

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Parse TOML text into a config, naming `origin` in the error.
    pub fn parse(raw: &str, origin: &Path) -> Result<CodeShotConfig> {
        toml::from_str::<CodeShotConfig>(raw).map_err(|e| {
            CodeShotError::Config(format!("failed to parse {}: {}", origin.display(), e))
        })
    }

    /// Get a snapshot of the loaded config.
    pub fn get(&self) -> CodeShotConfig {
        self.config.clone()
    }

    /// Path the config was resolved from (it may not exist).
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Apply env var overrides (CODESHOT_API_URL, CODESHOT_LISTEN, etc.)
    fn apply_env_overrides(mut config: CodeShotConfig) -> CodeShotConfig {
        if let Ok(v) = std::env::var("CODESHOT_API_URL") {
            config.platform.api_url = v;
        }
        if let Ok(v) = std::env::var("CODESHOT_STORAGE_URL") {
            config.storage.url = Some(v);
        }
        if let Ok(v) = std::env::var("CODESHOT_LISTEN") {
            config.server.listen = v;
        }
        if let Ok(v) = std::env::var("CODESHOT_LOG_LEVEL") {
            config.logging.level = v;
        }
        // Agent id: config file takes priority, env is the fallback.
        if config.agent.agent_id.is_none() {
            if let Ok(v) = std::env::var("CODESHOT_AGENT_ID") {
                config.agent.agent_id = Some(v);
            }
        }
        config
    }

    /// Inline the contents of `agent.few_shots_file`, resolved against `base_dir`.
    pub fn resolve_few_shots_file(
        mut config: CodeShotConfig,
        base_dir: &Path,
    ) -> Result<CodeShotConfig> {
        let Some(file) = config.agent.few_shots_file.clone() else {
            return Ok(config);
        };
        let path = if file.is_absolute() {
            file
        } else {
            base_dir.join(file)
        };
        let text = std::fs::read_to_string(&path).map_err(|e| {
            CodeShotError::ConfigValidation {
                field: "agent.few_shots_file".into(),
                reason: format!("failed to read {}: {}", path.display(), e),
            }
        })?;
        info!(path = ?path, "loaded few-shots file");
        config.agent.few_shots = Some(FewShotsValue::Text(text));
        Ok(config)
    }
}
