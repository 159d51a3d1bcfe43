//! Permission-gated mutations.
//!
//! [`Portal`] is the application-root state: it owns the gateway and the
//! session and is handed to screens by reference. Every mutating action is
//! checked against the session's cached [`RoleSurface`](hoa_authz::RoleSurface)
//! before the gateway is touched; a denied action issues no store call.
//! Reads go straight to [`Portal::gateway`].
use crate::gateway::{DataGateway, GatewayError};
use crate::model::{
    Invoice, Meeting, MeetingPatch, NewInvoice, NewMeeting, NewRepairTicket, NewResident,
    NewVendor, PaymentRecord, RepairPatch, RepairTicket, Resident, ResidentPatch, ServiceRecord,
    Vendor, VendorPatch,
};
use crate::session::{Identity, RegistrationStatus, Session};
use hoa_authz::Permission;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("the current role lacks the {0} permission")]
    Forbidden(Permission),
    #[error("only committee members may do this")]
    CommitteeOnly,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub type ActionResult<T> = Result<T, ActionError>;

pub struct Portal {
    gateway: DataGateway,
    session: Session,
}

impl Portal {
    pub fn new(gateway: DataGateway, session: Session) -> Self {
        Self { gateway, session }
    }

    pub fn gateway(&self) -> &DataGateway {
        &self.gateway
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Load the four entity collections and detect the session's role.
    pub async fn start(&mut self) -> RegistrationStatus {
        let (_, status) = tokio::join!(
            self.gateway.initialize(),
            self.session.detect_role(&self.gateway)
        );
        status
    }

    pub async fn sign_in(&mut self, identity: Identity) -> RegistrationStatus {
        self.session = Session::new(identity);
        self.session.detect_role(&self.gateway).await
    }

    fn require(&self, permission: Permission) -> ActionResult<()> {
        if self.session.can(permission) {
            Ok(())
        } else {
            warn!(%permission, role = ?self.session.role(), "action denied");
            Err(ActionError::Forbidden(permission))
        }
    }

    fn require_committee(&self) -> ActionResult<()> {
        if self.session.is_committee_member() {
            Ok(())
        } else {
            warn!(role = ?self.session.role(), "committee action denied");
            Err(ActionError::CommitteeOnly)
        }
    }

    pub async fn create_resident(&self, draft: &NewResident) -> ActionResult<Resident> {
        self.require(Permission::EditResidents)?;
        Ok(self.gateway.residents().create(draft).await?)
    }

    pub async fn update_resident(&self, id: &str, patch: &ResidentPatch) -> ActionResult<()> {
        self.require(Permission::EditResidents)?;
        Ok(self.gateway.residents().update(id, patch).await?)
    }

    pub async fn delete_resident(&self, id: &str) -> ActionResult<()> {
        self.require(Permission::DeleteResidents)?;
        Ok(self.gateway.residents().delete(id).await?)
    }

    pub async fn record_payment(
        &self,
        resident_id: &str,
        record: PaymentRecord,
    ) -> ActionResult<Vec<PaymentRecord>> {
        self.require(Permission::EditPayments)?;
        Ok(self.gateway.record_payment(resident_id, record).await?)
    }

    pub async fn create_vendor(&self, draft: &NewVendor) -> ActionResult<Vendor> {
        self.require(Permission::EditVendors)?;
        Ok(self.gateway.vendors().create(draft).await?)
    }

    pub async fn update_vendor(&self, id: &str, patch: &VendorPatch) -> ActionResult<()> {
        self.require(Permission::EditVendors)?;
        Ok(self.gateway.vendors().update(id, patch).await?)
    }

    pub async fn delete_vendor(&self, id: &str) -> ActionResult<()> {
        self.require(Permission::EditVendors)?;
        Ok(self.gateway.vendors().delete(id).await?)
    }

    pub async fn add_invoice(&self, vendor_id: &str, invoice: NewInvoice) -> ActionResult<Invoice> {
        self.require(Permission::UploadInvoices)?;
        Ok(self.gateway.add_invoice(vendor_id, invoice).await?)
    }

    pub async fn add_service_record(
        &self,
        vendor_id: &str,
        record: ServiceRecord,
    ) -> ActionResult<()> {
        self.require(Permission::EditVendors)?;
        Ok(self.gateway.add_service_record(vendor_id, record).await?)
    }

    pub async fn create_repair(&self, draft: &NewRepairTicket) -> ActionResult<RepairTicket> {
        self.require(Permission::EditRepairs)?;
        Ok(self.gateway.repairs().create(draft).await?)
    }

    pub async fn update_repair(&self, id: &str, patch: &RepairPatch) -> ActionResult<()> {
        self.require(Permission::EditRepairs)?;
        Ok(self.gateway.repairs().update(id, patch).await?)
    }

    pub async fn delete_repair(&self, id: &str) -> ActionResult<()> {
        self.require(Permission::EditRepairs)?;
        Ok(self.gateway.repairs().delete(id).await?)
    }

    pub async fn create_meeting(&self, draft: &NewMeeting) -> ActionResult<Meeting> {
        self.require_committee()?;
        Ok(self.gateway.meetings().create(draft).await?)
    }

    pub async fn update_meeting(&self, id: &str, patch: &MeetingPatch) -> ActionResult<()> {
        self.require_committee()?;
        Ok(self.gateway.meetings().update(id, patch).await?)
    }

    pub async fn delete_meeting(&self, id: &str) -> ActionResult<()> {
        self.require_committee()?;
        Ok(self.gateway.meetings().delete(id).await?)
    }
}
