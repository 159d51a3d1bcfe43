//! Administrative roles.
//!
//! # Purpose
//! Defines the closed set of roles an authenticated identity can hold inside a
//! community.
//!
//! # Key invariants
//! - Exactly four roles exist; anything else is "no role".
//! - Canonical labels are lowercase English words. Documents written by older
//!   clients carry the committee titles in Traditional Chinese, which
//!   are accepted as aliases on input and never produced on output.
use crate::{AuthzError, AuthzResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[serde(alias = "主委")]
    Chairman,
    #[serde(alias = "財委")]
    Treasurer,
    #[serde(alias = "監委")]
    Supervisor,
    #[serde(alias = "住戶")]
    Resident,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Chairman,
        Role::Treasurer,
        Role::Supervisor,
        Role::Resident,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Chairman => "chairman",
            Role::Treasurer => "treasurer",
            Role::Supervisor => "supervisor",
            Role::Resident => "resident",
        }
    }

    /// Parse a stored role label, treating anything unrecognized as absent.
    pub fn parse_lenient(value: &str) -> Option<Role> {
        value.parse().ok()
    }

    /// Chairman, treasurer and supervisor sit on the management committee.
    pub fn is_committee(self) -> bool {
        !matches!(self, Role::Resident)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = AuthzError;

    fn from_str(value: &str) -> AuthzResult<Self> {
        match value.trim() {
            "chairman" | "主委" => Ok(Role::Chairman),
            "treasurer" | "財委" => Ok(Role::Treasurer),
            "supervisor" | "監委" => Ok(Role::Supervisor),
            "resident" | "住戶" => Ok(Role::Resident),
            other => Err(AuthzError::InvalidRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Role;
    use crate::AuthzError;

    #[test]
    fn role_string_roundtrip() {
        for role in Role::ALL {
            let as_str = role.as_str();
            assert_eq!(as_str.parse::<Role>().ok(), Some(role));
            assert_eq!(role.to_string(), as_str);
        }
    }

    #[test]
    fn legacy_labels_parse_to_roles() {
        assert_eq!("主委".parse::<Role>().ok(), Some(Role::Chairman));
        assert_eq!("財委".parse::<Role>().ok(), Some(Role::Treasurer));
        assert_eq!("監委".parse::<Role>().ok(), Some(Role::Supervisor));
        assert_eq!("住戶".parse::<Role>().ok(), Some(Role::Resident));
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert_eq!(
            "janitor".parse::<Role>(),
            Err(AuthzError::InvalidRole("janitor".to_string()))
        );
        assert_eq!(Role::parse_lenient(""), None);
    }

    #[test]
    fn serde_accepts_aliases_and_writes_canonical() {
        let role: Role = serde_json::from_str("\"財委\"").expect("alias");
        assert_eq!(role, Role::Treasurer);
        assert_eq!(
            serde_json::to_string(&Role::Treasurer).expect("serialize"),
            "\"treasurer\""
        );
    }

    #[test]
    fn committee_membership() {
        assert!(Role::Chairman.is_committee());
        assert!(Role::Treasurer.is_committee());
        assert!(Role::Supervisor.is_committee());
        assert!(!Role::Resident.is_committee());
    }
}
