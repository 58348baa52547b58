//! Immutable permission set snapshot

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Deref;
use std::sync::Arc;

use super::record::PermissionRecord;
use super::resolver;

/// Ordered, immutable collection of permission records
///
/// Clones share the same backing storage. A set is never edited after it is
/// built; a role change or logout produces a new set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionSet {
    records: Arc<[PermissionRecord]>,
}

impl Default for PermissionSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl PermissionSet {
    /// The empty set (logged out or not yet loaded)
    pub fn empty() -> Self {
        Self {
            records: Arc::from(Vec::new()),
        }
    }

    /// Build a set from records, keeping their order and any duplicates
    pub fn from_records(records: Vec<PermissionRecord>) -> Self {
        Self {
            records: Arc::from(records),
        }
    }

    /// All records in order
    pub fn records(&self) -> &[PermissionRecord] {
        &self.records
    }

    pub fn has_permission(&self, query: &str) -> bool {
        resolver::has_permission(query, &self.records)
    }

    pub fn has_any_permission<I, S>(&self, queries: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        resolver::has_any_permission(queries, &self.records)
    }

    pub fn has_all_permissions<I, S>(&self, queries: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        resolver::has_all_permissions(queries, &self.records)
    }

    pub fn find_matching(&self, substring: &str) -> Vec<&PermissionRecord> {
        resolver::find_matching_permissions(substring, &self.records)
    }
}

impl Deref for PermissionSet {
    type Target = [PermissionRecord];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

impl AsRef<[PermissionRecord]> for PermissionSet {
    fn as_ref(&self) -> &[PermissionRecord] {
        &self.records
    }
}

impl From<Vec<PermissionRecord>> for PermissionSet {
    fn from(records: Vec<PermissionRecord>) -> Self {
        Self::from_records(records)
    }
}

impl FromIterator<PermissionRecord> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = PermissionRecord>>(iter: T) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<PermissionRecord>::deserialize(deserializer)?;
        Ok(Self::from_records(records))
    }
}
