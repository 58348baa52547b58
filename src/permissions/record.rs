//! Permission record type

use serde::{Deserialize, Serialize};

/// One grantable capability held by a session
///
/// `id` is the canonical identifier (a UUID, or a symbolic constant such as
/// `UPDATE_ANNOUNCEMENT` for older grants). `name` is the human-readable or
/// legacy name. Either may be absent in cached payloads; an absent field
/// never matches a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRecord {
    /// Stable identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Human-readable or legacy symbolic name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Verb the permission grants (e.g. "update")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Resource the permission applies to (e.g. "announcement")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    /// Whether the permission is built into the platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_system: Option<bool>,
}

impl PermissionRecord {
    /// Create a record with both an id and a name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Create a record from a legacy plain-string grant
    ///
    /// Older sessions stored bare strings; the string serves as both id and
    /// name so either lookup finds it.
    pub fn from_legacy(value: impl Into<String>) -> Self {
        let value = value.into();
        Self::new(value.clone(), value)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_system(mut self, is_system: bool) -> Self {
        self.is_system = Some(is_system);
        self
    }

    /// Identifier, if present
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Name, if present
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the id equals `query` exactly
    pub fn id_matches(&self, query: &str) -> bool {
        self.id() == Some(query)
    }

    /// Whether the name equals `query` exactly
    pub fn name_matches(&self, query: &str) -> bool {
        self.name() == Some(query)
    }

    /// Label for listings: the name, then the id, then a placeholder
    pub fn label(&self) -> &str {
        self.name().or_else(|| self.id()).unwrap_or("<unnamed>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_and_accessors() {
        let record = PermissionRecord::new("e5f6g7h8", "Assign Property")
            .with_action("assign")
            .with_resource("property")
            .with_system(false);

        assert_eq!(record.id(), Some("e5f6g7h8"));
        assert_eq!(record.name(), Some("Assign Property"));
        assert!(record.id_matches("e5f6g7h8"));
        assert!(record.name_matches("Assign Property"));
        assert!(!record.name_matches("assign property"));
        assert_eq!(record.label(), "Assign Property");
    }

    #[test]
    fn test_from_legacy_sets_both_fields() {
        let record = PermissionRecord::from_legacy("UPDATE_ANNOUNCEMENT");
        assert!(record.id_matches("UPDATE_ANNOUNCEMENT"));
        assert!(record.name_matches("UPDATE_ANNOUNCEMENT"));
    }

    #[test]
    fn test_deserialize_dashboard_shape() {
        let record: PermissionRecord = serde_json::from_value(json!({
            "id": "CREATE_BILLING",
            "name": "Create Billing",
            "description": "Issue invoices",
            "action": "create",
            "resource": "billing",
            "isSystem": true
        }))
        .unwrap();

        assert_eq!(record.id(), Some("CREATE_BILLING"));
        assert_eq!(record.is_system, Some(true));
        assert_eq!(record.resource.as_deref(), Some("billing"));
    }

    #[test]
    fn test_missing_fields_are_none() {
        let record: PermissionRecord = serde_json::from_value(json!({ "name": null })).unwrap();
        assert!(record.id().is_none());
        assert!(record.name().is_none());
        assert!(!record.id_matches(""));
        assert_eq!(record.label(), "<unnamed>");
    }

    #[test]
    fn test_serialize_skips_absent_metadata() {
        let json = serde_json::to_string(&PermissionRecord::new("X", "X")).unwrap();
        assert_eq!(json, r#"{"id":"X","name":"X"}"#);
    }
}
