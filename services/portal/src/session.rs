//! Signed-in identity and its role.
//!
//! The role comes from the resident roster: the first resident whose chat user
//! id or handle equals the identity's user id supplies it. The derived
//! [`RoleSurface`] is cached and rebuilt only when the role changes.
use crate::gateway::DataGateway;
use hoa_authz::{Permission, Role, RoleSurface, Tab};
use tracing::{info, warn};

/// Identity supplied by the login collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegistrationStatus {
    #[default]
    Unknown,
    Registered,
    Unregistered,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    identity: Option<Identity>,
    resident_id: Option<String>,
    registration: RegistrationStatus,
    surface: RoleSurface,
}

impl Session {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            ..Self::default()
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.surface.role
    }

    pub fn resident_id(&self) -> Option<&str> {
        self.resident_id.as_deref()
    }

    pub fn registration(&self) -> RegistrationStatus {
        self.registration
    }

    pub fn surface(&self) -> &RoleSurface {
        &self.surface
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.surface.allows(permission)
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.surface.tabs
    }

    pub fn is_committee_member(&self) -> bool {
        self.surface.committee
    }

    /// Look the identity up in the resident roster and adopt its role.
    ///
    /// A roster that cannot be read does not block the user: the session
    /// falls back to the plain resident role and stays unregistered.
    pub async fn detect_role(&mut self, gateway: &DataGateway) -> RegistrationStatus {
        let Some(user_id) = self.identity.as_ref().map(|identity| identity.user_id.clone()) else {
            self.resident_id = None;
            self.set_role(None);
            self.registration = RegistrationStatus::Unregistered;
            return self.registration;
        };
        match gateway.residents().list().await {
            Ok(residents) => match residents.iter().find(|resident| resident.answers_to(&user_id)) {
                Some(resident) => {
                    info!(resident_id = %resident.id, role = ?resident.role, "identity matched a resident");
                    self.resident_id = Some(resident.id.clone());
                    self.set_role(resident.role);
                    self.registration = RegistrationStatus::Registered;
                }
                None => {
                    self.resident_id = None;
                    self.set_role(None);
                    self.registration = RegistrationStatus::Unregistered;
                }
            },
            Err(err) => {
                warn!(error = %err, "role detection failed, defaulting to resident");
                self.resident_id = None;
                self.set_role(Some(Role::Resident));
                self.registration = RegistrationStatus::Unregistered;
            }
        }
        self.registration
    }

    /// Force a role, for demos and tests.
    pub fn override_role(&mut self, role: Role) {
        self.set_role(Some(role));
        self.registration = RegistrationStatus::Registered;
    }

    fn set_role(&mut self, role: Option<Role>) {
        if self.surface.role != role {
            self.surface = RoleSurface::derive(role);
        }
    }
}
