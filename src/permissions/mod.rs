//! Permission resolution for the facility dashboard
//!
//! A session holds a [`PermissionSet`]: an ordered, immutable list of
//! [`PermissionRecord`]s, each with an `id` and a legacy `name`. UI code asks
//! whether a capability is granted:
//!
//! - [`has_permission`]: exact, case-sensitive match on id **or** name
//! - [`has_permission_id`]: canonical id-only check
//! - [`has_any_permission`]: at least one of several queries matches
//! - [`find_matching_permissions`]: substring scan for diagnostics
//!
//! Missing or empty sets deny everything.
//!
//! ## Example
//!
//! ```rust
//! use facility_access::permissions::{has_permission, PermissionRecord, PermissionSet};
//!
//! let set = PermissionSet::from_records(vec![
//!     PermissionRecord::new("e5f6g7h8-i9j0-1234-efgh-ij5678901234", "Assign Property"),
//! ]);
//!
//! assert!(has_permission("Assign Property", &set));
//! assert!(!has_permission("Remove Property", &set));
//! ```

pub mod catalog;
mod normalize;
mod record;
mod resolver;
mod set;

pub use catalog::Capability;
pub use normalize::{normalize_json, normalize_value, RawPermission, RawPermissions};
pub use record::PermissionRecord;
pub use resolver::{
    find_matching_permissions, find_matching_permissions_regex, has_all_permissions,
    has_any_permission, has_legacy_name, has_permission, has_permission_id, PermissionResolver,
};
pub use set::PermissionSet;
