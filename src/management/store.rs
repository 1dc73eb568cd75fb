use std::{io::ErrorKind, path::PathBuf};

use crate::{Result, error::NmfError, types::Token};

/// Persists the single token record to durable storage.
///
/// The location is an explicit constructor argument rather than a hidden
/// constant so tests can redirect storage; production passes
/// [`crate::config::token_cache_path`].
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        TokenStore { path }
    }

    /// Loads the persisted record.
    ///
    /// Returns `Ok(None)` when no record exists (never authenticated) and
    /// `Err(Storage)` when a record exists but cannot be parsed: corrupt
    /// state must not be mistaken for a fresh install.
    pub async fn load(&self) -> Result<Option<Token>> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(NmfError::Storage(e.to_string())),
        };

        let token = serde_json::from_str(&content).map_err(|e| {
            NmfError::Storage(format!(
                "{} is not a valid token record: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(Some(token))
    }

    /// Writes the record atomically: serialize to a temporary sibling file,
    /// then rename over the destination. A crash mid-write leaves the prior
    /// record (or no record) intact, never a truncated one.
    pub async fn save(&self, token: &Token) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| NmfError::Storage(e.to_string()))?;
        }

        let json =
            serde_json::to_string_pretty(token).map_err(|e| NmfError::Storage(e.to_string()))?;

        let mut tmp = self.path.clone();
        tmp.set_extension("json.tmp");
        async_fs::write(&tmp, json)
            .await
            .map_err(|e| NmfError::Storage(e.to_string()))?;
        async_fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| NmfError::Storage(e.to_string()))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
