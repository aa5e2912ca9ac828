//! Codeforces handle links
//!
//! Maps chat user ids to verified Codeforces handles, and keeps the verification
//! requests that are still waiting for a compile-error submission. Both maps are
//! mirrored to small JSON files after every change.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{
    config::StorageConfig,
    error::AppResult,
    models::{ProblemId, UserId},
};

/// A handle waiting to be proven by a compilation error on `problem`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingVerification {
    pub handle: String,
    pub problem: ProblemId,
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct StoreData {
    handles: HashMap<UserId, String>,
    pending: HashMap<UserId, PendingVerification>,
}

/// File-backed handle registry
#[derive(Debug)]
pub struct HandleStore {
    data: RwLock<StoreData>,
    user_data_file: PathBuf,
    pending_auth_file: PathBuf,
}

impl HandleStore {
    /// Load both files; a missing file starts empty
    pub async fn load(config: &StorageConfig) -> AppResult<Self> {
        let handles: HashMap<UserId, String> = read_json(&config.user_data_file).await?;
        let pending: HashMap<UserId, PendingVerification> =
            read_json(&config.pending_auth_file).await?;

        info!(
            linked = handles.len(),
            pending = pending.len(),
            "Loaded handle store"
        );

        Ok(Self {
            data: RwLock::new(StoreData { handles, pending }),
            user_data_file: config.user_data_file.clone(),
            pending_auth_file: config.pending_auth_file.clone(),
        })
    }

    pub async fn handle_for(&self, user: UserId) -> Option<String> {
        self.data.read().await.handles.get(&user).cloned()
    }

    pub async fn pending_for(&self, user: UserId) -> Option<PendingVerification> {
        self.data.read().await.pending.get(&user).cloned()
    }

    /// Record (or replace) a verification request
    pub async fn add_pending(&self, user: UserId, request: PendingVerification) -> AppResult<()> {
        let mut data = self.data.write().await;
        let mut pending = data.pending.clone();
        pending.insert(user, request);

        write_json(&self.pending_auth_file, &pending).await?;
        data.pending = pending;
        Ok(())
    }

    /// Link the pending handle and drop the request in one step.
    ///
    /// Memory is only updated once both files are written.
    pub async fn complete_verification(&self, user: UserId) -> AppResult<Option<String>> {
        let mut data = self.data.write().await;
        let Some(request) = data.pending.get(&user).cloned() else {
            return Ok(None);
        };

        let mut handles = data.handles.clone();
        handles.insert(user, request.handle.clone());
        let mut pending = data.pending.clone();
        pending.remove(&user);

        write_json(&self.user_data_file, &handles).await?;
        write_json(&self.pending_auth_file, &pending).await?;

        data.handles = handles;
        data.pending = pending;
        debug!(user_id = %user, handle = %request.handle, "Linked handle");
        Ok(Some(request.handle))
    }
}

async fn read_json<T: DeserializeOwned + Default>(path: &Path) -> AppResult<T> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let bytes = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}
