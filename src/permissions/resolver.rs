//! Permission resolution
//!
//! Resolution is a pure, exact, case-sensitive scan over a snapshot. The
//! canonical check compares record ids. Sessions cached before ids were
//! introduced still carry grants under their names, so [`has_permission`]
//! also compares names. It runs both comparisons on every record and never
//! guesses from the query's format, because legacy ids were often plain
//! symbolic strings indistinguishable from names.
//!
//! Nothing here fails: an empty set, an empty query, or a record missing a
//! field all resolve to "not granted".

use regex::Regex;

use super::record::PermissionRecord;

/// Whether any record's `id` equals `query`
pub fn has_permission_id(query: &str, permissions: &[PermissionRecord]) -> bool {
    !query.is_empty() && permissions.iter().any(|r| r.id_matches(query))
}

/// Whether any record's legacy `name` equals `query`
pub fn has_legacy_name(query: &str, permissions: &[PermissionRecord]) -> bool {
    !query.is_empty() && permissions.iter().any(|r| r.name_matches(query))
}

/// Whether the permission set grants `query` by id or by legacy name
pub fn has_permission(query: &str, permissions: &[PermissionRecord]) -> bool {
    let granted = has_permission_id(query, permissions) || has_legacy_name(query, permissions);
    tracing::debug!(query, granted, "Resolved permission");
    granted
}

/// Whether at least one of `queries` is granted
///
/// Call sites pass an id and a human name for the same capability together;
/// the resolver does not infer that they are equivalent.
pub fn has_any_permission<I, S>(queries: I, permissions: &[PermissionRecord]) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    queries
        .into_iter()
        .any(|q| has_permission(q.as_ref(), permissions))
}

/// Whether every one of `queries` is granted
///
/// An empty query list is not granted.
pub fn has_all_permissions<I, S>(queries: I, permissions: &[PermissionRecord]) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = false;
    for query in queries {
        seen = true;
        if !has_permission(query.as_ref(), permissions) {
            return false;
        }
    }
    seen
}

/// Records whose id or name contains `substring` (case-sensitive), in order
///
/// Diagnostics only; access decisions go through [`has_permission`].
pub fn find_matching_permissions<'a>(
    substring: &str,
    permissions: &'a [PermissionRecord],
) -> Vec<&'a PermissionRecord> {
    permissions
        .iter()
        .filter(|r| {
            r.id().is_some_and(|id| id.contains(substring))
                || r.name().is_some_and(|name| name.contains(substring))
        })
        .collect()
}

/// Records whose id or name matches `pattern`, in order
pub fn find_matching_permissions_regex<'a>(
    pattern: &Regex,
    permissions: &'a [PermissionRecord],
) -> Vec<&'a PermissionRecord> {
    permissions
        .iter()
        .filter(|r| {
            r.id().is_some_and(|id| pattern.is_match(id))
                || r.name().is_some_and(|name| pattern.is_match(name))
        })
        .collect()
}

/// Resolution policy
///
/// The free functions always honour legacy names. This carries the switch
/// that lets deployments turn the name path off once every cached session
/// has an id-based permission set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionResolver {
    legacy_name_matching: bool,
}

impl Default for PermissionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionResolver {
    /// Resolver that matches ids and legacy names
    pub fn new() -> Self {
        Self {
            legacy_name_matching: true,
        }
    }

    /// Resolver that only matches ids
    pub fn id_only() -> Self {
        Self {
            legacy_name_matching: false,
        }
    }

    /// Enable or disable legacy name matching
    pub fn with_legacy_name_matching(mut self, enabled: bool) -> Self {
        self.legacy_name_matching = enabled;
        self
    }

    /// Whether legacy name matching is enabled
    pub fn legacy_name_matching(&self) -> bool {
        self.legacy_name_matching
    }

    /// Check a single query under this policy
    pub fn has_permission(&self, query: &str, permissions: &[PermissionRecord]) -> bool {
        if self.legacy_name_matching {
            has_permission(query, permissions)
        } else {
            has_permission_id(query, permissions)
        }
    }

    /// Check that at least one query is granted under this policy
    pub fn has_any_permission<I, S>(&self, queries: I, permissions: &[PermissionRecord]) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        queries
            .into_iter()
            .any(|q| self.has_permission(q.as_ref(), permissions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSIGN_ID: &str = "e5f6g7h8-i9j0-1234-efgh-ij5678901234";

    fn sample() -> Vec<PermissionRecord> {
        vec![
            PermissionRecord::new(ASSIGN_ID, "Assign Property"),
            PermissionRecord::new("UPDATE_ANNOUNCEMENT", "Update Announcement"),
            PermissionRecord::from_legacy("CREATE_BILLING"),
        ]
    }

    #[test]
    fn test_every_id_and_name_resolves() {
        let set = sample();
        for record in &set {
            assert!(has_permission(record.id().unwrap(), &set));
            assert!(has_permission(record.name().unwrap(), &set));
        }
    }

    #[test]
    fn test_unknown_query_denied() {
        let set = sample();
        assert!(!has_permission("Remove Property", &set));
        assert!(!has_permission("DELETE_UNIT", &set));
    }

    #[test]
    fn test_empty_set_denies_everything() {
        assert!(!has_permission("CREATE_BILLING", &[]));
        assert!(!has_permission("Assign Property", &[]));
        assert!(!has_any_permission(["A", "B"], &[]));
        assert!(find_matching_permissions("A", &[]).is_empty());
    }

    #[test]
    fn test_empty_query_denied() {
        let set = vec![PermissionRecord::new("", "")];
        assert!(!has_permission("", &set));
        assert!(!has_permission_id("", &set));
    }

    #[test]
    fn test_repeated_calls_agree() {
        let set = sample();
        let first = has_permission("Assign Property", &set);
        for _ in 0..3 {
            assert_eq!(has_permission("Assign Property", &set), first);
        }
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let set = vec![PermissionRecord::from_legacy("UPDATE_ANNOUNCEMENT")];
        assert!(!has_permission("update_announcement", &set));
        assert!(has_permission("UPDATE_ANNOUNCEMENT", &set));
    }

    #[test]
    fn test_matching_is_exact_not_substring() {
        let set = vec![PermissionRecord::from_legacy("UPDATE_ANNOUNCEMENT")];
        assert!(!has_permission("UPDATE", &set));
        assert!(!has_permission("UPDATE_ANNOUNCEMENTS", &set));
    }

    #[test]
    fn test_duplicates_are_harmless() {
        let one = vec![PermissionRecord::from_legacy("X")];
        let two = vec![PermissionRecord::from_legacy("X"), PermissionRecord::from_legacy("X")];
        assert_eq!(has_permission("X", &one), has_permission("X", &two));
        assert!(has_permission("X", &two));
    }

    #[test]
    fn test_uuid_and_name_scenario() {
        let set = vec![PermissionRecord::new(ASSIGN_ID, "Assign Property")];
        assert!(has_permission("Assign Property", &set));
        assert!(has_permission(ASSIGN_ID, &set));
        assert!(!has_permission("Remove Property", &set));
    }

    #[test]
    fn test_malformed_record_does_not_mask_others() {
        let set = vec![
            PermissionRecord::default(),
            PermissionRecord {
                name: Some("View Units".into()),
                ..PermissionRecord::default()
            },
            PermissionRecord::from_legacy("CREATE_BILLING"),
        ];
        assert!(has_permission("View Units", &set));
        assert!(!has_permission_id("View Units", &set));
        assert!(has_permission("CREATE_BILLING", &set));
    }

    #[test]
    fn test_id_and_name_paths_are_separate() {
        let set = vec![PermissionRecord::new("UPDATE_ANNOUNCEMENT", "Update Announcement")];
        assert!(has_permission_id("UPDATE_ANNOUNCEMENT", &set));
        assert!(!has_permission_id("Update Announcement", &set));
        assert!(has_legacy_name("Update Announcement", &set));
        assert!(!has_legacy_name("UPDATE_ANNOUNCEMENT", &set));
    }

    #[test]
    fn test_has_any_permission() {
        let by_id = vec![PermissionRecord::new("UPDATE_ANNOUNCEMENT", "something else")];
        let by_name = vec![PermissionRecord::new("a1b2", "Update Announcement")];
        let neither = vec![PermissionRecord::new("a1b2", "Delete Announcement")];
        let queries = ["UPDATE_ANNOUNCEMENT", "Update Announcement"];

        assert!(has_any_permission(queries, &by_id));
        assert!(has_any_permission(queries, &by_name));
        assert!(!has_any_permission(queries, &neither));
        assert!(!has_any_permission(Vec::<String>::new(), &by_id));
    }

    #[test]
    fn test_has_all_permissions() {
        let set = sample();
        assert!(has_all_permissions(["Assign Property", "CREATE_BILLING"], &set));
        assert!(!has_all_permissions(["Assign Property", "DELETE_UNIT"], &set));
        assert!(!has_all_permissions(Vec::<&str>::new(), &set));
    }

    #[test]
    fn test_find_matching_permissions() {
        let set = sample();

        let announcement = find_matching_permissions("ANNOUNCEMENT", &set);
        assert_eq!(announcement.len(), 1);
        assert_eq!(announcement[0].id(), Some("UPDATE_ANNOUNCEMENT"));

        let property = find_matching_permissions("Property", &set);
        assert_eq!(property.len(), 1);
        assert_eq!(property[0].id(), Some(ASSIGN_ID));

        assert!(find_matching_permissions("property", &set).is_empty());
    }

    #[test]
    fn test_find_matching_preserves_order() {
        let set = sample();
        let hits = find_matching_permissions("E", &set);
        let ids: Vec<_> = hits.iter().map(|r| r.id().unwrap()).collect();
        assert_eq!(ids, vec!["UPDATE_ANNOUNCEMENT", "CREATE_BILLING"]);
    }

    #[test]
    fn test_find_matching_regex() {
        let set = sample();
        let pattern = Regex::new(r"^(CREATE|UPDATE)_").unwrap();
        let hits = find_matching_permissions_regex(&pattern, &set);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_resolver_policy() {
        let set = vec![PermissionRecord::new("a1b2", "Update Announcement")];

        let legacy = PermissionResolver::new();
        assert!(legacy.has_permission("Update Announcement", &set));
        assert!(legacy.has_permission("a1b2", &set));

        let strict = PermissionResolver::id_only();
        assert!(!strict.has_permission("Update Announcement", &set));
        assert!(strict.has_permission("a1b2", &set));
        assert!(strict.has_any_permission(["Update Announcement", "a1b2"], &set));
    }
}
