use clap::{Parser, Subcommand};
use std::path::PathBuf;

use codeshot_agent::{AgentMetadata, CodeShotAgent};
use codeshot_config::{CodeShotConfig, ConfigLoader};
use codeshot_core::{CodeShotError, Result};

pub mod demo;
mod serve;
mod storage;

/// CodeShot — host few-shot agents and the Funcs they call
#[derive(Parser)]
#[command(name = "codeshot", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to codeshot.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the configured agent with the built-in demo Funcs
    Serve {
        /// Address to listen on (overrides server.listen)
        #[arg(short = 'L', long)]
        listen: Option<String>,
    },
    /// Check the base prompt and few-shots without serving
    Validate,
    /// Print the handshake document
    Handshake {
        /// Print YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },
    /// Read and write a user's storage for the configured agent
    Storage {
        /// The user's access token
        #[arg(long, env = "CODESHOT_ACCESS_TOKEN", hide_env_values = true)]
        token: String,
        #[command(subcommand)]
        action: StorageAction,
    },
    /// Show current configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum StorageAction {
    /// Print the value stored under a key
    Get { key: String },
    /// Store a value; JSON is stored as parsed, anything else as a string
    Set { key: String, value: String },
    /// Remove a key
    Delete { key: String },
    /// Check whether a key exists
    Exists { key: String },
    /// List all keys
    List,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        // Load config first so we can use it for log format
        let config_loader = ConfigLoader::load(self.config.as_deref())?;
        let config = config_loader.get();

        // Resolve log level: --verbose > --quiet > --log-level > config
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            self.log_level
                .as_deref()
                .unwrap_or(config.logging.level.as_str())
        };

        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
        if config.logging.format == "json" {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_target(true)
                .init();
        } else if config.logging.format == "compact" {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .compact()
                .with_target(false)
                .init();
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
        }

        match self.command {
            Commands::Serve { listen } => serve::cmd_serve(config, listen).await,
            Commands::Validate => Self::cmd_validate(&config),
            Commands::Handshake { yaml } => Self::cmd_handshake(&config, yaml),
            Commands::Storage { token, action } => {
                storage::cmd_storage(&config, &token, action).await
            }
            Commands::Config { json } => Self::cmd_config(&config, json),
        }
    }

    fn cmd_validate(config: &CodeShotConfig) -> Result<()> {
        let metadata = metadata_from_config(config)?;
        println!(
            "Agent is valid: {} few-shot(s), conversational: {}",
            metadata.few_shots().len(),
            metadata.conversational()
        );
        Ok(())
    }

    fn cmd_handshake(config: &CodeShotConfig, yaml: bool) -> Result<()> {
        let metadata = metadata_from_config(config)?;
        if yaml {
            let doc = serde_yaml::to_string(&metadata)
                .map_err(|e| CodeShotError::Other(e.into()))?;
            print!("{doc}");
        } else {
            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }
        Ok(())
    }

    fn cmd_config(config: &CodeShotConfig, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(config).map_err(|e| CodeShotError::Config(e.to_string()))?
            );
        }
        Ok(())
    }
}

fn metadata_from_config(config: &CodeShotConfig) -> Result<AgentMetadata> {
    Ok(CodeShotAgent::from_config(config)?.metadata().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_storage_subcommand() {
        let cli = Cli::try_parse_from([
            "codeshot", "storage", "--token", "tok", "set", "greeting", "\"hi\"",
        ])
        .unwrap();
        match cli.command {
            Commands::Storage {
                token,
                action: StorageAction::Set { key, value },
            } => {
                assert_eq!(token, "tok");
                assert_eq!(key, "greeting");
                assert_eq!(value, "\"hi\"");
            }
            _ => panic!("expected storage set"),
        }
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["codeshot", "-v", "-q", "validate"]).is_err());
    }

    #[test]
    fn metadata_follows_config() {
        let mut config = CodeShotConfig::default();
        config.agent.base_prompt = "I toss coins.".into();
        config.agent.few_shots = Some(codeshot_config::FewShotsValue::Text(
            "Q: Toss\nFunc[coin] says: heads\nA: Heads!".into(),
        ));
        config.agent.conversational = true;
        let metadata = metadata_from_config(&config).unwrap();
        assert_eq!(metadata.few_shots().len(), 1);
        assert!(metadata.conversational());

        config.agent.base_prompt.clear();
        assert!(metadata_from_config(&config).is_err());
    }

    #[test]
    fn sample_config_builds_an_agent_with_demo_funcs() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../demos/codeshot.toml");
        let config = ConfigLoader::load(Some(&path)).unwrap().get();
        let mut agent = CodeShotAgent::from_config(&config).unwrap();
        demo::register_demo_funcs(&mut agent).unwrap();
        assert_eq!(agent.metadata().few_shots().len(), 4);
        assert_eq!(
            agent.registry().exposed_names(),
            vec!["coin", "genrand", "recall", "remember"]
        );
    }
}
