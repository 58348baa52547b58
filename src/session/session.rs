//! Permission session management
//!
//! `PermissionSession` owns the current user's permission set and hands out
//! immutable snapshots to readers. The set is only ever replaced whole, so a
//! snapshot taken at the start of a render pass stays consistent for the
//! whole pass even if a role change lands midway.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::{AccessError, AccessResult};
use crate::permissions::{PermissionRecord, PermissionResolver, PermissionSet};

use super::metadata::SessionMetadata;
use super::source::PermissionSource;
use super::storage::SessionStorage;

/// A session's permission cache with load/replace/clear lifecycle
#[derive(Debug)]
pub struct PermissionSession {
    /// Session ID (fixed for the session's lifetime)
    session_id: String,

    /// Session metadata (user, counts, timestamps)
    metadata: RwLock<SessionMetadata>,

    /// Current snapshot
    snapshot: RwLock<Arc<PermissionSet>>,

    /// Bumped on every replace or clear
    revision: AtomicU64,

    /// Resolution policy for the convenience checks
    resolver: PermissionResolver,

    /// Storage backend for persistence (in-memory only when None)
    storage: Option<SessionStorage>,
}

impl PermissionSession {
    /// Create an in-memory session with an empty permission set
    pub fn new(session_id: impl Into<String>) -> Self {
        Self::from_parts(SessionMetadata::new(session_id), PermissionSet::empty(), None)
    }

    /// Create a new session backed by storage
    ///
    /// The metadata is persisted immediately.
    pub fn with_storage(metadata: SessionMetadata, storage: SessionStorage) -> AccessResult<Self> {
        storage.save_metadata(&metadata)?;
        Ok(Self::from_parts(metadata, PermissionSet::empty(), Some(storage)))
    }

    /// Restore a session from its on-disk cache
    ///
    /// A missing session is an error. A missing or unreadable permission
    /// cache restores as an empty set, so the session denies everything
    /// until the next login.
    pub fn restore(session_id: &str, storage: SessionStorage) -> AccessResult<Self> {
        let metadata = storage.load_metadata(session_id)?;

        let permissions = match storage.load_permissions(session_id) {
            Ok(Some(value)) => match crate::permissions::normalize_value(value) {
                Ok(set) => set,
                Err(e) => {
                    tracing::warn!(session_id, error = %e, "Discarding malformed permission cache");
                    PermissionSet::empty()
                }
            },
            Ok(None) => PermissionSet::empty(),
            Err(e) => {
                tracing::warn!(session_id, error = %e, "Failed to read permission cache");
                PermissionSet::empty()
            }
        };

        tracing::info!(
            session_id,
            count = permissions.len(),
            "Restored permission session"
        );

        Ok(Self::from_parts(metadata, permissions, Some(storage)))
    }

    fn from_parts(
        metadata: SessionMetadata,
        permissions: PermissionSet,
        storage: Option<SessionStorage>,
    ) -> Self {
        Self {
            session_id: metadata.session_id.clone(),
            metadata: RwLock::new(metadata),
            snapshot: RwLock::new(Arc::new(permissions)),
            revision: AtomicU64::new(0),
            resolver: PermissionResolver::default(),
            storage,
        }
    }

    /// Set the resolution policy
    pub fn with_resolver(mut self, resolver: PermissionResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Load permissions from a source and make them current
    ///
    /// If the source fails, the current snapshot is left untouched.
    pub async fn login(&self, source: &dyn PermissionSource) -> AccessResult<Arc<PermissionSet>> {
        tracing::info!(
            session_id = %self.session_id,
            source = source.name(),
            "Loading permissions"
        );

        let raw = source
            .fetch()
            .await
            .map_err(|e| AccessError::Source(format!("{}: {}", source.name(), e)))?;

        self.install(raw.into_set(), Some(source.name()))
    }

    /// Replace the whole permission set (e.g. after a role change)
    ///
    /// The in-memory snapshot is swapped before persisting, so it is current
    /// even if the returned error reports a storage failure. In that case the
    /// on-disk cache is removed so a later restore cannot bring back the
    /// previous grants.
    pub fn replace(&self, permissions: PermissionSet) -> AccessResult<Arc<PermissionSet>> {
        self.install(permissions, None)
    }

    /// Drop all permissions (logout)
    pub fn clear(&self) -> AccessResult<()> {
        // Metadata write lock serializes writers across swap and persist
        let mut metadata = self.metadata_mut();

        self.swap(Arc::new(PermissionSet::empty()));
        metadata.record_load(0, None);
        tracing::info!(session_id = %self.session_id, "Cleared permissions");

        if let Some(storage) = &self.storage {
            storage.clear_permissions(&self.session_id)?;
            storage.save_metadata(&metadata)?;
        }
        Ok(())
    }

    fn install(
        &self,
        permissions: PermissionSet,
        source: Option<&str>,
    ) -> AccessResult<Arc<PermissionSet>> {
        let snapshot = Arc::new(permissions);

        // Held until the cache on disk matches memory
        let mut metadata = self.metadata_mut();

        let revision = self.swap(snapshot.clone());
        metadata.record_load(snapshot.len(), source);

        tracing::info!(
            session_id = %self.session_id,
            count = snapshot.len(),
            revision,
            "Installed permission set"
        );

        if let Some(storage) = &self.storage {
            if let Err(e) = storage.save_permissions(&self.session_id, &snapshot) {
                tracing::warn!(
                    session_id = %self.session_id,
                    error = %e,
                    "Failed to persist permissions, dropping cached set"
                );
                if let Err(clear_err) = storage.clear_permissions(&self.session_id) {
                    tracing::warn!(
                        session_id = %self.session_id,
                        error = %clear_err,
                        "Failed to drop cached permissions"
                    );
                }
                return Err(e);
            }
            storage.save_metadata(&metadata)?;
        }

        Ok(snapshot)
    }

    fn swap(&self, snapshot: Arc<PermissionSet>) -> u64 {
        let mut current = self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = snapshot;
        self.revision.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Current permission snapshot
    pub fn snapshot(&self) -> Arc<PermissionSet> {
        self.snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Check a query against the current snapshot
    pub fn has_permission(&self, query: &str) -> bool {
        self.resolver.has_permission(query, &self.snapshot())
    }

    /// Check that at least one query is granted by the current snapshot
    pub fn has_any_permission<I, S>(&self, queries: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.resolver.has_any_permission(queries, &self.snapshot())
    }

    /// Records in the current snapshot whose id or name contains `substring`
    pub fn find_matching(&self, substring: &str) -> Vec<PermissionRecord> {
        self.snapshot()
            .find_matching(substring)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Number of replace/clear operations so far
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// Get the session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Copy of the current metadata
    pub fn metadata(&self) -> SessionMetadata {
        self.metadata_ref().clone()
    }

    /// Resolution policy in use
    pub fn resolver(&self) -> PermissionResolver {
        self.resolver
    }

    /// Storage backend, if any
    pub fn storage(&self) -> Option<&SessionStorage> {
        self.storage.as_ref()
    }

    fn metadata_ref(&self) -> RwLockReadGuard<'_, SessionMetadata> {
        self.metadata
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn metadata_mut(&self) -> RwLockWriteGuard<'_, SessionMetadata> {
        self.metadata
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
