//! Onboarding wizard for identities not yet on a resident roster.
//!
//! # Flow
//! `SelectCommunity → (CreateCommunity →) PersonalInfo → Confirm → Completed`.
//!
//! # Key invariants
//! - A failed submission leaves the wizard on `Confirm` with the error kept
//!   for display.
//! - A free-text unit label wins over the floor/unit pickers.
use crate::gateway::{DataGateway, GatewayError};
use crate::model::{
    Community, CommunityPatch, DEFAULT_MONTHLY_FEE, NewCommunity, NewResident, Resident,
};
use crate::session::Session;
use chrono::{Local, Utc};
use hoa_authz::Role;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnboardingStep {
    #[default]
    SelectCommunity,
    CreateCommunity,
    PersonalInfo,
    Confirm,
    Completed,
}

#[derive(Debug, Error)]
pub enum OnboardingError {
    #[error("no community selected")]
    MissingCommunity,
    #[error("no unit entered")]
    MissingUnit,
    #[error("sign in before registering")]
    MissingIdentity,
    #[error("community {0} is required")]
    InvalidCommunity(&'static str),
    #[error("not available on the {0:?} step")]
    WrongStep(OnboardingStep),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Fields of the "create a community" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommunityForm {
    pub name: String,
    pub address: String,
    pub floors: Option<u32>,
    pub units_per_floor: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct Onboarding {
    step: OnboardingStep,
    communities: Vec<Community>,
    keyword: String,
    community: Option<Community>,
    floor: String,
    unit_number: String,
    unit: String,
    is_chairman: bool,
    submit_error: Option<String>,
}

impl Onboarding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    pub fn community(&self) -> Option<&Community> {
        self.community.as_ref()
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Load the community list; a failed read leaves it empty.
    pub async fn load_communities(&mut self, gateway: &DataGateway) -> usize {
        self.communities = gateway.communities().fetch_all().await;
        self.communities.len()
    }

    pub fn search(&mut self, keyword: impl Into<String>) {
        self.keyword = keyword.into();
    }

    pub fn matching_communities(&self) -> Vec<&Community> {
        self.communities
            .iter()
            .filter(|community| community.matches(&self.keyword))
            .collect()
    }

    pub fn select_community(&mut self, community: Community) -> Result<(), OnboardingError> {
        self.expect_step(OnboardingStep::SelectCommunity)?;
        self.adopt(community);
        Ok(())
    }

    pub fn start_new_community(&mut self) -> Result<(), OnboardingError> {
        self.expect_step(OnboardingStep::SelectCommunity)?;
        self.step = OnboardingStep::CreateCommunity;
        Ok(())
    }

    /// Create a community from the form and continue with it selected.
    pub async fn create_community(
        &mut self,
        gateway: &DataGateway,
        session: &Session,
        form: CommunityForm,
    ) -> Result<Community, OnboardingError> {
        self.expect_step(OnboardingStep::CreateCommunity)?;
        let name = form.name.trim();
        let address = form.address.trim();
        if name.is_empty() {
            return Err(OnboardingError::InvalidCommunity("name"));
        }
        if address.is_empty() {
            return Err(OnboardingError::InvalidCommunity("address"));
        }
        let draft = NewCommunity {
            name: name.to_string(),
            address: address.to_string(),
            total_units: 0,
            monthly_fee: DEFAULT_MONTHLY_FEE,
            floors: form.floors.filter(|floors| *floors > 0),
            units_per_floor: form.units_per_floor.filter(|units| *units > 0),
            created_by: session.identity().map(|identity| identity.user_id.clone()),
            created_at: Some(Utc::now()),
        };
        let community = gateway.communities().create(&draft).await?;
        info!(community_id = %community.id, "community created during onboarding");
        self.communities.push(community.clone());
        self.adopt(community.clone());
        Ok(community)
    }

    /// `B1` then `1F..=nF`; empty when the floor count is unknown.
    pub fn floor_options(&self) -> Vec<String> {
        match self.community.as_ref().and_then(|community| community.floors) {
            Some(floors) if floors > 0 => std::iter::once("B1".to_string())
                .chain((1..=floors).map(|floor| format!("{floor}F")))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn unit_options(&self) -> Vec<String> {
        match self
            .community
            .as_ref()
            .and_then(|community| community.units_per_floor)
        {
            Some(units) if units > 0 => (1..=units).map(|unit| unit.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    pub fn set_floor(&mut self, floor: impl Into<String>) {
        self.floor = floor.into();
        self.unit.clear();
    }

    pub fn set_unit_number(&mut self, unit_number: impl Into<String>) {
        self.unit_number = unit_number.into();
        self.unit.clear();
    }

    /// Free-text unit, e.g. `3F-1` or `A-12`.
    pub fn set_unit_label(&mut self, unit: impl Into<String>) {
        self.unit = unit.into();
    }

    pub fn set_chairman(&mut self, is_chairman: bool) {
        self.is_chairman = is_chairman;
    }

    /// The unit the resident will be registered under, if one is entered.
    pub fn unit_label(&self) -> Option<String> {
        let free_text = self.unit.trim();
        if !free_text.is_empty() {
            return Some(free_text.to_string());
        }
        if !self.floor.is_empty() && !self.unit_number.is_empty() {
            return Some(format!("{}-{}", self.floor, self.unit_number));
        }
        None
    }

    pub fn go_to_confirm(&mut self) -> Result<(), OnboardingError> {
        self.expect_step(OnboardingStep::PersonalInfo)?;
        let unit = self.unit_label().ok_or(OnboardingError::MissingUnit)?;
        self.unit = unit;
        self.step = OnboardingStep::Confirm;
        Ok(())
    }

    /// Register the signed-in identity as a resident of the chosen community.
    ///
    /// On success the community's unit count is bumped, residents are
    /// refetched and the session's role is detected again.
    pub async fn submit(
        &mut self,
        gateway: &DataGateway,
        session: &mut Session,
    ) -> Result<Resident, OnboardingError> {
        self.expect_step(OnboardingStep::Confirm)?;
        self.submit_error = None;
        match self.register(gateway, session).await {
            Ok(resident) => {
                self.step = OnboardingStep::Completed;
                Ok(resident)
            }
            Err(err) => {
                self.submit_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    async fn register(
        &mut self,
        gateway: &DataGateway,
        session: &mut Session,
    ) -> Result<Resident, OnboardingError> {
        let community = self
            .community
            .clone()
            .ok_or(OnboardingError::MissingCommunity)?;
        let identity = session
            .identity()
            .cloned()
            .ok_or(OnboardingError::MissingIdentity)?;
        let unit = self.unit_label().ok_or(OnboardingError::MissingUnit)?;

        let draft = NewResident {
            community_id: Some(community.id.clone()),
            unit,
            name: identity.display_name.clone(),
            phone: String::new(),
            chat_handle: None,
            chat_user_id: Some(identity.user_id.clone()),
            role: if self.is_chairman {
                Role::Chairman
            } else {
                Role::Resident
            },
            move_in_date: Local::now().date_naive(),
            payment_history: Vec::new(),
        };
        let resident = gateway.residents().create(&draft).await?;

        let total_units = community.total_units + 1;
        gateway
            .communities()
            .update(
                &community.id,
                &CommunityPatch {
                    total_units: Some(total_units),
                    ..CommunityPatch::default()
                },
            )
            .await?;
        if let Some(selected) = self.community.as_mut() {
            selected.total_units = total_units;
        }

        gateway.residents().fetch_all().await;
        session.detect_role(gateway).await;
        info!(resident_id = %resident.id, community_id = %community.id, "resident registered");
        Ok(resident)
    }

    /// Return to the previous step.
    pub fn back(&mut self) {
        self.step = match self.step {
            OnboardingStep::CreateCommunity | OnboardingStep::PersonalInfo => {
                OnboardingStep::SelectCommunity
            }
            OnboardingStep::Confirm => OnboardingStep::PersonalInfo,
            step @ (OnboardingStep::SelectCommunity | OnboardingStep::Completed) => step,
        };
    }

    fn adopt(&mut self, community: Community) {
        self.community = Some(community);
        self.floor.clear();
        self.unit_number.clear();
        self.unit.clear();
        self.step = OnboardingStep::PersonalInfo;
    }

    fn expect_step(&self, expected: OnboardingStep) -> Result<(), OnboardingError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(OnboardingError::WrongStep(self.step))
        }
    }
}
