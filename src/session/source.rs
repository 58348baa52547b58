//! Permission sources
//!
//! A source produces the raw permission payload for a session. The auth
//! service that issues permissions at login plugs in behind this trait.

use anyhow::Result;
use async_trait::async_trait;

use crate::permissions::RawPermissions;

use super::storage::SessionStorage;

/// Trait for anything that can supply a session's permissions
#[async_trait]
pub trait PermissionSource: Send + Sync {
    /// Fetch the current permission payload
    async fn fetch(&self) -> Result<RawPermissions>;

    /// Source name for logging and session metadata
    fn name(&self) -> &str;
}

/// Source that always returns the same payload
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    payload: RawPermissions,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, payload: RawPermissions) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

#[async_trait]
impl PermissionSource for StaticSource {
    async fn fetch(&self) -> Result<RawPermissions> {
        Ok(self.payload.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Source that reads a session's cached payload from storage
#[derive(Debug, Clone)]
pub struct StoredSource {
    storage: SessionStorage,
    session_id: String,
}

impl StoredSource {
    pub fn new(storage: SessionStorage, session_id: impl Into<String>) -> Self {
        Self {
            storage,
            session_id: session_id.into(),
        }
    }
}

#[async_trait]
impl PermissionSource for StoredSource {
    async fn fetch(&self) -> Result<RawPermissions> {
        let payload = match self.storage.load_permissions(&self.session_id)? {
            Some(value) => serde_json::from_value(value)?,
            None => RawPermissions::Missing,
        };
        Ok(payload)
    }

    fn name(&self) -> &str {
        "stored"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{PermissionRecord, PermissionSet};
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_static_source() {
        let payload: RawPermissions = serde_json::from_value(json!(["CREATE_BILLING"])).unwrap();
        let source = StaticSource::new("fixture", payload);

        assert_eq!(source.name(), "fixture");
        let set = source.fetch().await.unwrap().into_set();
        assert!(set.has_permission("CREATE_BILLING"));
    }

    #[tokio::test]
    async fn test_stored_source() {
        let temp = TempDir::new().unwrap();
        let storage = SessionStorage::with_dir(temp.path());
        storage
            .save_permissions(
                "s1",
                &PermissionSet::from_records(vec![PermissionRecord::new("a1", "View Units")]),
            )
            .unwrap();

        let set = StoredSource::new(storage.clone(), "s1")
            .fetch()
            .await
            .unwrap()
            .into_set();
        assert!(set.has_permission("View Units"));

        let missing = StoredSource::new(storage, "s2").fetch().await.unwrap();
        assert_eq!(missing, RawPermissions::Missing);
    }
}
