//! Session storage helpers
//!
//! Handles reading and writing cached permission sessions to disk.

use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::{AccessError, AccessResult};
use crate::permissions::PermissionSet;

use super::metadata::SessionMetadata;

/// Default directory for session storage
const SESSIONS_DIR: &str = "sessions";

/// Session storage manager
#[derive(Debug, Clone)]
pub struct SessionStorage {
    base_dir: PathBuf,
}

impl SessionStorage {
    /// Create a new session storage with the default directory
    pub fn new() -> Self {
        Self {
            base_dir: PathBuf::from(SESSIONS_DIR),
        }
    }

    /// Create a new session storage with a custom directory
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: dir.into(),
        }
    }

    /// Check that a session ID names a single directory under the base
    pub fn validate_session_id(session_id: &str) -> AccessResult<()> {
        let valid = !session_id.is_empty()
            && session_id != "."
            && session_id != ".."
            && !session_id.contains(['/', '\\', '\0'])
            && !session_id.contains("..");
        if valid {
            Ok(())
        } else {
            Err(AccessError::InvalidSessionId(session_id.to_string()))
        }
    }

    /// Get the directory path for a session
    pub fn session_dir(&self, session_id: &str) -> PathBuf {
        self.base_dir.join(session_id)
    }

    /// Get the metadata file path for a session
    pub fn metadata_path(&self, session_id: &str) -> PathBuf {
        self.session_dir(session_id).join("metadata.json")
    }

    /// Get the permissions file path for a session
    pub fn permissions_path(&self, session_id: &str) -> PathBuf {
        self.session_dir(session_id).join("permissions.json")
    }

    /// Create the session directory if it doesn't exist
    pub fn ensure_session_dir(&self, session_id: &str) -> AccessResult<PathBuf> {
        Self::validate_session_id(session_id)?;
        let dir = self.session_dir(session_id);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(dir)
    }

    /// Save session metadata
    pub fn save_metadata(&self, metadata: &SessionMetadata) -> AccessResult<()> {
        self.ensure_session_dir(&metadata.session_id)?;
        let path = self.metadata_path(&metadata.session_id);

        let file = File::create(&path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, metadata)?;

        Ok(())
    }

    /// Load session metadata
    pub fn load_metadata(&self, session_id: &str) -> AccessResult<SessionMetadata> {
        Self::validate_session_id(session_id)?;
        let path = self.metadata_path(session_id);

        if !path.exists() {
            return Err(AccessError::SessionNotFound(session_id.to_string()));
        }

        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let metadata: SessionMetadata = serde_json::from_reader(reader)?;

        Ok(metadata)
    }

    /// Save the permission set (overwrites any existing cache)
    ///
    /// Writes to a temporary file and renames it so readers never observe a
    /// half-written set.
    pub fn save_permissions(&self, session_id: &str, permissions: &PermissionSet) -> AccessResult<()> {
        self.ensure_session_dir(session_id)?;
        let path = self.permissions_path(session_id);
        let tmp = path.with_extension("json.tmp");

        let file = File::create(&tmp)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, permissions)?;
        writer.flush()?;
        drop(writer);

        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Load the raw cached permission payload
    ///
    /// Returns `None` when nothing is cached. The payload is returned
    /// unparsed so callers can normalize older shapes.
    pub fn load_permissions(&self, session_id: &str) -> AccessResult<Option<Value>> {
        Self::validate_session_id(session_id)?;
        let path = self.permissions_path(session_id);

        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let value: Value = serde_json::from_reader(reader)?;

        Ok(Some(value))
    }

    /// Remove the cached permission payload, keeping the metadata
    pub fn clear_permissions(&self, session_id: &str) -> AccessResult<()> {
        Self::validate_session_id(session_id)?;
        let path = self.permissions_path(session_id);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Check if a session exists
    pub fn session_exists(&self, session_id: &str) -> bool {
        Self::validate_session_id(session_id).is_ok() && self.metadata_path(session_id).exists()
    }

    /// List all session IDs
    pub fn list_sessions(&self) -> AccessResult<Vec<String>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut sessions = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                if let Some(name_str) = path.file_name().and_then(|n| n.to_str()) {
                    // Only directories with a metadata file count
                    if self.metadata_path(name_str).exists() {
                        sessions.push(name_str.to_string());
                    }
                }
            }
        }

        sessions.sort();
        Ok(sessions)
    }

    /// Delete a session
    pub fn delete_session(&self, session_id: &str) -> AccessResult<()> {
        Self::validate_session_id(session_id)?;
        let dir = self.session_dir(session_id);
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        Ok(())
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl Default for SessionStorage {
    fn default() -> Self {
        Self::new()
    }
}
