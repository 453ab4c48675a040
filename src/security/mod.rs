//! Access control for exports.
//!
//! Only the role→category permission table lives here; authentication is the
//! bot layer's job.

mod permissions;

pub use permissions::RolePermissions;
