//! Role-derived permissions and navigation surface for the community portal.
//!
//! # Purpose
//! Maps the single role held by an identity (chairman, treasurer, supervisor
//! or resident) to the capabilities it may exercise and the tabs it may see.
//!
//! # How it fits
//! Screens ask this crate before rendering gated tabs or actions. The data
//! gateway never consults it; the two are composed only by the application
//! root.
//!
//! # Key invariants
//! - Every function is total, pure and performs no I/O.
//! - Unknown or absent roles resolve to no permissions and a `home`-only tab bar.
//!
//! # Examples
//! ```rust
//! use hoa_authz::{Role, Tab, visible_tabs};
//!
//! assert_eq!(
//!     visible_tabs(Some(Role::Resident)),
//!     vec![Tab::Home, Tab::Directory, Tab::Vendors]
//! );
//! ```

mod errors;
mod permission;
mod role;
mod surface;

pub use errors::{AuthzError, AuthzResult};
pub use permission::{Permission, granted, has_permission, permissions_for_role};
pub use role::Role;
pub use surface::{RoleSurface, Tab, is_committee_member, visible_tabs};
