pub mod core;
pub mod permissions;
pub mod session;

// Optional components
pub mod logging;

pub use crate::core::{AccessConfig, AccessError, AccessResult};
pub use crate::permissions::{
    has_any_permission, has_permission, PermissionRecord, PermissionResolver, PermissionSet,
};
pub use crate::session::{PermissionSession, SessionStorage};
