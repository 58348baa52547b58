//! Session management for permission caches
//!
//! This module provides `PermissionSession`, which owns a user's permission
//! set for the lifetime of a session: it is populated at login or restored
//! from the on-disk cache, replaced wholesale on role change, and cleared on
//! logout. Readers receive immutable snapshots instead of reaching into
//! shared storage.

pub mod metadata;
pub mod session;
pub mod source;
pub mod storage;

pub use metadata::SessionMetadata;
pub use session::PermissionSession;
pub use source::{PermissionSource, StaticSource, StoredSource};
pub use storage::SessionStorage;
