//! Normalization of cached permission payloads
//!
//! Stored sessions carry permissions in several shapes: bare strings,
//! `{id, name}` pairs, full metadata records, or any of those wrapped in a
//! `{"permissions": [...]}` envelope. Everything is converted to
//! [`PermissionSet`] here, at the loading boundary, so the resolver only ever
//! sees one shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::record::PermissionRecord;
use super::set::PermissionSet;
use crate::core::{AccessError, AccessResult};

/// One element of a cached permission list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPermission {
    /// Bare string from the oldest session format
    Legacy(String),
    /// Object with some subset of the record fields
    Record(Map<String, Value>),
    /// Anything else; dropped during normalization
    Unrecognized(Value),
}

impl RawPermission {
    /// Convert to a record, or `None` when nothing usable is present
    pub fn into_record(self) -> Option<PermissionRecord> {
        match self {
            RawPermission::Legacy(value) => Some(PermissionRecord::from_legacy(value)),
            RawPermission::Record(map) => {
                let record = PermissionRecord {
                    id: string_field(&map, "id"),
                    name: string_field(&map, "name"),
                    description: string_field(&map, "description"),
                    action: string_field(&map, "action"),
                    resource: string_field(&map, "resource"),
                    is_system: map
                        .get("isSystem")
                        .or_else(|| map.get("is_system"))
                        .and_then(Value::as_bool),
                };
                Some(record)
            }
            RawPermission::Unrecognized(value) => {
                tracing::warn!(%value, "Dropping unrecognized permission entry");
                None
            }
        }
    }
}

/// A cached permission payload in any supported shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPermissions {
    /// `null`: nothing cached
    Missing,
    /// A plain list
    List(Vec<RawPermission>),
    /// An auth response envelope
    Envelope { permissions: Vec<RawPermission> },
}

impl RawPermissions {
    /// Wrap already-normalized records
    pub fn from_records(records: impl IntoIterator<Item = PermissionRecord>) -> AccessResult<Self> {
        let entries = records
            .into_iter()
            .map(|record| -> AccessResult<RawPermission> {
                Ok(match serde_json::to_value(record)? {
                    Value::Object(map) => RawPermission::Record(map),
                    other => RawPermission::Unrecognized(other),
                })
            })
            .collect::<AccessResult<Vec<_>>>()?;
        Ok(RawPermissions::List(entries))
    }

    /// Normalize into a permission set
    ///
    /// Entries that carry nothing usable are dropped; the rest keep their
    /// order.
    pub fn into_set(self) -> PermissionSet {
        let entries = match self {
            RawPermissions::Missing => return PermissionSet::empty(),
            RawPermissions::List(entries) => entries,
            RawPermissions::Envelope { permissions } => permissions,
        };

        entries
            .into_iter()
            .filter_map(RawPermission::into_record)
            .collect()
    }
}

/// Normalize a JSON value holding a cached payload
pub fn normalize_value(value: Value) -> AccessResult<PermissionSet> {
    let raw: RawPermissions = serde_json::from_value(value)
        .map_err(|e| AccessError::malformed(format!("unsupported permission payload: {}", e)))?;
    Ok(raw.into_set())
}

/// Normalize a JSON document holding a cached payload
pub fn normalize_json(json: &str) -> AccessResult<PermissionSet> {
    let value: Value = serde_json::from_str(json)?;
    normalize_value(value)
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
