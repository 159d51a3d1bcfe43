//! Capability gates and the role → permission table.
//!
//! # Purpose
//! Defines the closed set of capabilities checked before a screen renders or
//! runs an action, and the exhaustive grant table for each [`Role`].
//!
//! # Key invariants
//! - Grants are declared explicitly per role. No permission implies another
//!   and nothing is derived at runtime.
//! - An absent role holds no permissions.
//!
//! # Examples
//! ```rust
//! use hoa_authz::{Permission, Role, has_permission};
//!
//! assert!(has_permission(Some(Role::Treasurer), Permission::SendReminders));
//! assert!(!has_permission(Some(Role::Resident), Permission::EditResidents));
//! assert!(!has_permission(None, Permission::ViewVendors));
//! ```
use crate::{AuthzError, AuthzResult, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    ViewDashboard,
    ViewResidents,
    EditResidents,
    DeleteResidents,
    ViewPayments,
    EditPayments,
    SendReminders,
    ViewVendors,
    EditVendors,
    UploadInvoices,
    ViewRepairs,
    EditRepairs,
    AccessSettings,
    ManageAdmins,
}

impl Permission {
    pub const ALL: [Permission; 14] = [
        Permission::ViewDashboard,
        Permission::ViewResidents,
        Permission::EditResidents,
        Permission::DeleteResidents,
        Permission::ViewPayments,
        Permission::EditPayments,
        Permission::SendReminders,
        Permission::ViewVendors,
        Permission::EditVendors,
        Permission::UploadInvoices,
        Permission::ViewRepairs,
        Permission::EditRepairs,
        Permission::AccessSettings,
        Permission::ManageAdmins,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::ViewDashboard => "view-dashboard",
            Permission::ViewResidents => "view-residents",
            Permission::EditResidents => "edit-residents",
            Permission::DeleteResidents => "delete-residents",
            Permission::ViewPayments => "view-payments",
            Permission::EditPayments => "edit-payments",
            Permission::SendReminders => "send-reminders",
            Permission::ViewVendors => "view-vendors",
            Permission::EditVendors => "edit-vendors",
            Permission::UploadInvoices => "upload-invoices",
            Permission::ViewRepairs => "view-repairs",
            Permission::EditRepairs => "edit-repairs",
            Permission::AccessSettings => "access-settings",
            Permission::ManageAdmins => "manage-admins",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = AuthzError;

    fn from_str(value: &str) -> AuthzResult<Self> {
        Permission::ALL
            .into_iter()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AuthzError::InvalidPermission(value.to_string()))
    }
}

const CHAIRMAN: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::ViewResidents,
    Permission::EditResidents,
    Permission::DeleteResidents,
    Permission::ViewPayments,
    Permission::EditPayments,
    Permission::SendReminders,
    Permission::ViewVendors,
    Permission::EditVendors,
    Permission::UploadInvoices,
    Permission::ViewRepairs,
    Permission::EditRepairs,
    Permission::AccessSettings,
    Permission::ManageAdmins,
];

const TREASURER: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::ViewResidents,
    Permission::ViewPayments,
    Permission::EditPayments,
    Permission::SendReminders,
    Permission::ViewVendors,
    Permission::EditVendors,
    Permission::UploadInvoices,
    Permission::ViewRepairs,
];

const SUPERVISOR: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::ViewResidents,
    Permission::ViewPayments,
    Permission::ViewVendors,
    Permission::ViewRepairs,
];

const RESIDENT: &[Permission] = &[Permission::ViewVendors];

/// Static grant list for a role, in table order.
pub fn granted(role: Role) -> &'static [Permission] {
    match role {
        Role::Chairman => CHAIRMAN,
        Role::Treasurer => TREASURER,
        Role::Supervisor => SUPERVISOR,
        Role::Resident => RESIDENT,
    }
}

/// Permission set held by `role`. Empty when the role is absent.
pub fn permissions_for_role(role: Option<Role>) -> BTreeSet<Permission> {
    role.map(|role| granted(role).iter().copied().collect())
        .unwrap_or_default()
}

pub fn has_permission(role: Option<Role>, permission: Permission) -> bool {
    match role {
        Some(role) => granted(role).contains(&permission),
        None => false,
    }
}
