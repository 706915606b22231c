use std::time::Duration;

use codeshot_config::CodeShotConfig;
use codeshot_core::{CodeShotError, Result};
use codeshot_storage::{StorageValue, UserStorage, decode, to_json_string};

use super::StorageAction;

pub(super) async fn cmd_storage(
    config: &CodeShotConfig,
    token: &str,
    action: StorageAction,
) -> Result<()> {
    let agent_id = config.agent.agent_id.as_deref().ok_or_else(|| {
        CodeShotError::Config("agent.agent_id must be set to use user storage".into())
    })?;
    let storage = UserStorage::new(
        &config.storage_url(),
        agent_id,
        token,
        Duration::from_secs(config.storage.timeout_secs),
    )?;

    match action {
        StorageAction::Get { key } => {
            let value = storage.get(&key).await?;
            println!("{}", to_json_string(&value)?);
        }
        StorageAction::Set { key, value } => {
            storage.set(&key, &parse_value(&value)?).await?;
            println!("Stored {key}");
        }
        StorageAction::Delete { key } => {
            storage.delete(&key).await?;
            println!("Deleted {key}");
        }
        StorageAction::Exists { key } => {
            println!("{}", storage.contains(&key).await?);
        }
        StorageAction::List => {
            for key in storage.keys().await? {
                println!("{key}");
            }
        }
    }
    Ok(())
}

/// Command-line values: valid JSON is decoded (so byte markers become bytes),
/// anything else is taken as a plain string.
fn parse_value(raw: &str) -> Result<StorageValue> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => decode(&json),
        Err(_) => Ok(StorageValue::from(raw)),
    }
}
