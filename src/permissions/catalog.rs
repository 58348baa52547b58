//! Known dashboard capabilities
//!
//! Call sites gate an action on both the symbolic id and the human name of a
//! capability, because sessions cached before ids existed only carry the
//! name. Each [`Capability`] pairs the two so the gate is written once.
//!
//! ```ignore
//! use facility_access::permissions::catalog;
//!
//! if session.has_any_permission(catalog::UPDATE_ANNOUNCEMENT.queries()) {
//!     // show the Edit button
//! }
//! ```

/// A capability known by id and by legacy name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    pub id: &'static str,
    pub name: &'static str,
}

impl Capability {
    pub const fn new(id: &'static str, name: &'static str) -> Self {
        Self { id, name }
    }

    /// Queries for `has_any_permission`: id first, then name
    pub const fn queries(&self) -> [&'static str; 2] {
        [self.id, self.name]
    }
}

// =============================================================================
// Announcements
// =============================================================================

pub const CREATE_ANNOUNCEMENT: Capability =
    Capability::new("CREATE_ANNOUNCEMENT", "Create Announcement");
pub const UPDATE_ANNOUNCEMENT: Capability =
    Capability::new("UPDATE_ANNOUNCEMENT", "Update Announcement");
pub const DELETE_ANNOUNCEMENT: Capability =
    Capability::new("DELETE_ANNOUNCEMENT", "Delete Announcement");

// =============================================================================
// Billing
// =============================================================================

pub const CREATE_BILLING: Capability = Capability::new("CREATE_BILLING", "Create Billing");
pub const VIEW_BILLING: Capability = Capability::new("VIEW_BILLING", "View Billing");

// =============================================================================
// Maintenance
// =============================================================================

pub const CREATE_TICKET: Capability = Capability::new("CREATE_TICKET", "Create Ticket");
pub const UPDATE_TICKET: Capability = Capability::new("UPDATE_TICKET", "Update Ticket");

// =============================================================================
// Residents, units and staff
// =============================================================================

pub const VIEW_RESIDENTS: Capability = Capability::new("VIEW_RESIDENTS", "View Residents");
pub const MANAGE_UNITS: Capability = Capability::new("MANAGE_UNITS", "Manage Units");
pub const MANAGE_STAFF: Capability = Capability::new("MANAGE_STAFF", "Manage Staff");
pub const ASSIGN_PROPERTY: Capability = Capability::new("ASSIGN_PROPERTY", "Assign Property");
pub const REMOVE_PROPERTY: Capability = Capability::new("REMOVE_PROPERTY", "Remove Property");

// =============================================================================
// Roles
// =============================================================================

pub const MANAGE_PERMISSIONS: Capability =
    Capability::new("MANAGE_PERMISSIONS", "Manage Permissions");

/// Every capability in this catalog
pub const ALL: &[Capability] = &[
    CREATE_ANNOUNCEMENT,
    UPDATE_ANNOUNCEMENT,
    DELETE_ANNOUNCEMENT,
    CREATE_BILLING,
    VIEW_BILLING,
    CREATE_TICKET,
    UPDATE_TICKET,
    VIEW_RESIDENTS,
    MANAGE_UNITS,
    MANAGE_STAFF,
    ASSIGN_PROPERTY,
    REMOVE_PROPERTY,
    MANAGE_PERMISSIONS,
];

/// Look up a capability by id or name
pub fn lookup(query: &str) -> Option<&'static Capability> {
    ALL.iter().find(|c| c.id == query || c.name == query)
}
