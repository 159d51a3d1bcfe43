//! Navigation surface derived from a role.
//!
//! # Purpose
//! Computes which tabs a role sees and caches the full derivation so screens
//! never re-evaluate permission checks while rendering.
//!
//! # Key invariants
//! - Tab order is fixed: home, directory, residents, vendors, settings. Tabs a
//!   role may not see are skipped; the rest never move.
//! - An absent role sees only `home`.
use crate::permission::{has_permission, permissions_for_role};
use crate::{AuthzError, AuthzResult, Permission, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Home,
    Directory,
    Residents,
    Vendors,
    Settings,
}

impl Tab {
    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Home => "home",
            Tab::Directory => "directory",
            Tab::Residents => "residents",
            Tab::Vendors => "vendors",
            Tab::Settings => "settings",
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tab {
    type Err = AuthzError;

    fn from_str(value: &str) -> AuthzResult<Self> {
        match value {
            "home" => Ok(Tab::Home),
            "directory" => Ok(Tab::Directory),
            "residents" => Ok(Tab::Residents),
            "vendors" => Ok(Tab::Vendors),
            "settings" => Ok(Tab::Settings),
            other => Err(AuthzError::InvalidTab(other.to_string())),
        }
    }
}

/// Ordered tab bar for `role`.
pub fn visible_tabs(role: Option<Role>) -> Vec<Tab> {
    if role.is_none() {
        return vec![Tab::Home];
    }
    let mut tabs = vec![Tab::Home, Tab::Directory];
    if has_permission(role, Permission::ViewResidents) {
        tabs.push(Tab::Residents);
    }
    tabs.push(Tab::Vendors);
    if has_permission(role, Permission::AccessSettings) {
        tabs.push(Tab::Settings);
    }
    tabs
}

pub fn is_committee_member(role: Option<Role>) -> bool {
    role.is_some_and(Role::is_committee)
}

/// Everything a screen needs to know about the active role, derived once.
///
/// Rebuild it with [`RoleSurface::derive`] whenever the role changes; reads
/// afterwards are plain lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSurface {
    pub role: Option<Role>,
    pub permissions: BTreeSet<Permission>,
    pub tabs: Vec<Tab>,
    pub committee: bool,
}

impl RoleSurface {
    pub fn derive(role: Option<Role>) -> Self {
        Self {
            role,
            permissions: permissions_for_role(role),
            tabs: visible_tabs(role),
            committee: is_committee_member(role),
        }
    }

    pub fn allows(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn shows(&self, tab: Tab) -> bool {
        self.tabs.contains(&tab)
    }
}

impl Default for RoleSurface {
    fn default() -> Self {
        Self::derive(None)
    }
}
