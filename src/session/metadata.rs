//! Session metadata types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// Metadata for a cached permission session
///
/// This is persisted separately from the permission payload for quick access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetadata {
    // --- Identity ---
    /// Unique session ID
    pub session_id: String,

    /// User the session belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    // --- Permission cache ---
    /// Number of records in the last loaded permission set
    #[serde(default)]
    pub permission_count: usize,

    /// Name of the source that last populated the permissions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    // --- Timestamps ---
    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// When the session was last updated
    pub updated_at: DateTime<Utc>,

    // --- Custom Metadata ---
    /// Extensible metadata
    #[serde(default)]
    pub custom: HashMap<String, Value>,
}

impl SessionMetadata {
    /// Create new metadata for a session
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            user_id: None,
            permission_count: 0,
            source: None,
            created_at: now,
            updated_at: now,
            custom: HashMap::new(),
        }
    }

    /// Create metadata with a freshly generated session ID
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// Set the owning user
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Update the updated_at timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Record a permission load
    pub fn record_load(&mut self, count: usize, source: Option<&str>) {
        self.permission_count = count;
        self.source = source.map(str::to_string);
        self.touch();
    }

    /// Set custom metadata
    pub fn set_custom(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.custom.insert(key.into(), value.into());
        self.touch();
    }

    /// Get custom metadata
    pub fn get_custom(&self, key: &str) -> Option<&Value> {
        self.custom.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metadata() {
        let meta = SessionMetadata::new("session_123").with_user("resident-42");

        assert_eq!(meta.session_id, "session_123");
        assert_eq!(meta.user_id.as_deref(), Some("resident-42"));
        assert_eq!(meta.permission_count, 0);
        assert!(meta.source.is_none());
    }

    #[test]
    fn test_generate_unique_ids() {
        let a = SessionMetadata::generate();
        let b = SessionMetadata::generate();
        assert_ne!(a.session_id, b.session_id);
        assert!(Uuid::parse_str(&a.session_id).is_ok());
    }

    #[test]
    fn test_record_load() {
        let mut meta = SessionMetadata::new("session");
        let before = meta.updated_at;

        meta.record_load(5, Some("login"));

        assert_eq!(meta.permission_count, 5);
        assert_eq!(meta.source.as_deref(), Some("login"));
        assert!(meta.updated_at >= before);
    }

    #[test]
    fn test_custom_metadata() {
        let mut meta = SessionMetadata::new("session");

        meta.set_custom("role", "manager");
        meta.set_custom("building", serde_json::json!(7));

        assert_eq!(
            meta.get_custom("role").and_then(|v| v.as_str()),
            Some("manager")
        );
        assert_eq!(
            meta.get_custom("building").and_then(|v| v.as_i64()),
            Some(7)
        );
    }

    #[test]
    fn test_optional_fields_skipped_when_none() {
        let meta = SessionMetadata::new("session");
        let json = serde_json::to_string(&meta).unwrap();

        assert!(!json.contains("user_id"));
        assert!(!json.contains("\"source\""));

        let loaded: SessionMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.session_id, "session");
    }
}
