use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use codeshot_core::{CodeShotError, Result};

use crate::codec::{StorageValue, from_json_string, to_json_string};

/// Client for one user's storage, scoped to one agent.
///
/// Built per request from that request's access token and never shared
/// between requests: the bearer credential is baked into the client's default
/// headers. Every method is a single round trip with no caching or retry.
pub struct UserStorage {
    client: reqwest::Client,
    /// `{storage_url}/{agent_id}`; item keys are pushed onto it as one segment.
    collection: Url,
    agent_id: String,
}

/// Item body as exchanged with the storage service: the encoded value,
/// serialized to JSON text.
#[derive(Serialize, Deserialize)]
struct StoredItem {
    data: String,
}

/// One entry of the collection listing; other fields are ignored.
#[derive(Deserialize)]
struct KeyEntry {
    key: String,
}

impl UserStorage {
    pub fn new(
        storage_url: &str,
        agent_id: &str,
        access_token: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .map_err(|e| CodeShotError::Transport(format!("invalid access token: {e}")))?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| CodeShotError::Transport(e.to_string()))?;

        let mut collection = Url::parse(storage_url)
            .map_err(|e| CodeShotError::Config(format!("invalid storage url {storage_url:?}: {e}")))?;
        collection
            .path_segments_mut()
            .map_err(|_| CodeShotError::Config(format!("storage url {storage_url:?} cannot be a base")))?
            .pop_if_empty()
            .extend(agent_id.split('/'));

        Ok(Self {
            client,
            collection,
            agent_id: agent_id.to_string(),
        })
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// The key is percent-encoded, so `#`, `?` and `/` stay inside it.
    fn item_url(&self, key: &str) -> Url {
        let mut url = self.collection.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(key);
        }
        url
    }

    /// Fetch the value stored under `key`. Any non-success status means the
    /// key is not there.
    pub async fn get(&self, key: &str) -> Result<StorageValue> {
        let resp = self
            .client
            .get(self.item_url(key))
            .send()
            .await
            .map_err(transport)?;

        if !resp.status().is_success() {
            debug!(key, status = %resp.status(), "storage get missed");
            return Err(CodeShotError::KeyNotFound(key.to_string()));
        }

        let item: StoredItem = resp.json().await.map_err(transport)?;
        from_json_string(&item.data)
    }

    /// Store `value` under `key`, replacing what was there.
    pub async fn set(&self, key: &str, value: &StorageValue) -> Result<()> {
        let body = StoredItem {
            data: to_json_string(value)?,
        };
        let resp = self
            .client
            .post(self.item_url(key))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            warn!(key, %status, "storage write rejected");
            return Err(CodeShotError::StorageWrite {
                key: key.to_string(),
                status: status.as_u16(),
            });
        }
        debug!(key, "stored value");
        Ok(())
    }

    /// Whether `key` exists.
    ///
    /// Any HTTP error status reads as "absent", including auth failures.
    /// Failing to reach the service at all is still an error.
    pub async fn contains(&self, key: &str) -> Result<bool> {
        let resp = self
            .client
            .head(self.item_url(key))
            .send()
            .await
            .map_err(transport)?;
        Ok(resp.status().is_success())
    }

    /// Remove `key`. Any non-success status means the key was not there.
    pub async fn delete(&self, key: &str) -> Result<()> {
        let resp = self
            .client
            .delete(self.item_url(key))
            .send()
            .await
            .map_err(transport)?;

        if !resp.status().is_success() {
            debug!(key, status = %resp.status(), "storage delete missed");
            return Err(CodeShotError::KeyNotFound(key.to_string()));
        }
        Ok(())
    }

    /// All keys, in the order the service lists them.
    pub async fn keys(&self) -> Result<Vec<String>> {
        let url = self.collection.clone();
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CodeShotError::StorageStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let entries: Vec<KeyEntry> = resp.json().await.map_err(transport)?;
        Ok(entries.into_iter().map(|e| e.key).collect())
    }

    /// Number of stored keys.
    pub async fn len(&self) -> Result<usize> {
        Ok(self.keys().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

fn transport(e: reqwest::Error) -> CodeShotError {
    CodeShotError::Transport(e.to_string())
}
