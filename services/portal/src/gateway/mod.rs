//! Data access gateway.
//!
//! # Purpose
//! Mediates every entity read and write between screens and the document
//! store. One policy is shared by all collections:
//! - reads degrade to an empty collection plus a recorded error,
//! - writes record the error and return it to the caller,
//! - successful writes update the local cache without a refetch.
//!
//! # Modes
//! The mode is fixed at construction. [`DataMode::Mock`] serves the fixture
//! data from an in-memory store with no time ceiling. [`DataMode::Remote`]
//! delegates to an injected [`DocumentStore`] and bounds every call with
//! [`GatewayTimeouts`].
//!
//! # Examples
//! ```rust,no_run
//! use portal::gateway::DataGateway;
//!
//! async fn show() {
//!     let gateway = DataGateway::mock();
//!     gateway.initialize().await;
//!     let residents = gateway.residents().records().await;
//!     assert_eq!(residents.len(), 5);
//! }
//! ```
mod collection;
mod error;
mod status;

pub use collection::{EntityCollection, FetchPhase};
pub use error::{GatewayError, GatewayResult};
pub use status::GatewayStatus;

use crate::config::PortalConfig;
use crate::model::{
    Community, Invoice, Meeting, NewInvoice, PaymentRecord, RepairStatus, RepairTicket, Resident,
    ResidentPatch, ServiceRecord, Vendor, VendorPatch, upsert_payment,
};
use crate::store::memory::InMemoryStore;
use crate::store::postgres::PostgresStore;
use crate::store::{DocumentStore, synthesize_id};
use anyhow::Context;
use collection::Backend;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const INVOICE_ID_PREFIX: &str = "INV";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    Mock,
    Remote,
}

/// Per-operation ceilings applied in remote mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayTimeouts {
    pub read: Duration,
    pub write: Duration,
}

impl Default for GatewayTimeouts {
    fn default() -> Self {
        Self {
            read: Duration::from_secs(15),
            write: Duration::from_secs(10),
        }
    }
}

pub struct DataGateway {
    mode: DataMode,
    backend: Backend,
    communities: EntityCollection<Community>,
    residents: EntityCollection<Resident>,
    vendors: EntityCollection<Vendor>,
    repairs: EntityCollection<RepairTicket>,
    meetings: EntityCollection<Meeting>,
}

impl DataGateway {
    /// Gateway over the fixture data.
    pub fn mock() -> Self {
        Self::mock_with(InMemoryStore::seeded())
    }

    /// Mock-mode gateway over a caller-provided in-memory store.
    pub fn mock_with(store: InMemoryStore) -> Self {
        Self::build(DataMode::Mock, Arc::new(store), None, None)
    }

    pub fn remote(store: Arc<dyn DocumentStore>, timeouts: GatewayTimeouts) -> Self {
        Self::build(DataMode::Remote, store, Some(timeouts), None)
    }

    /// Remote mode when Postgres is configured, mock mode otherwise.
    pub async fn from_config(config: &PortalConfig) -> anyhow::Result<Self> {
        let gateway = match &config.postgres {
            Some(pg) => {
                let store = PostgresStore::connect(pg)
                    .await
                    .context("connect postgres document store")?;
                Self::remote(
                    Arc::new(store),
                    GatewayTimeouts {
                        read: config.read_timeout(),
                        write: config.write_timeout(),
                    },
                )
            }
            None => Self::mock(),
        };
        info!(
            mode = ?gateway.mode,
            backend = gateway.backend.store.backend_name(),
            "data gateway ready"
        );
        Ok(match &config.community_id {
            Some(community_id) => gateway.with_community_scope(community_id.clone()),
            None => gateway,
        })
    }

    /// Restrict fetched records to one community. Caches start empty.
    pub fn with_community_scope(self, community_id: impl Into<String>) -> Self {
        Self::build(
            self.mode,
            self.backend.store,
            self.backend.timeouts,
            Some(community_id.into()),
        )
    }

    fn build(
        mode: DataMode,
        store: Arc<dyn DocumentStore>,
        timeouts: Option<GatewayTimeouts>,
        scope: Option<String>,
    ) -> Self {
        let backend = Backend {
            store,
            timeouts,
            status: Arc::new(GatewayStatus::default()),
            scope,
        };
        Self {
            mode,
            communities: EntityCollection::new(backend.clone()),
            residents: EntityCollection::new(backend.clone()),
            vendors: EntityCollection::new(backend.clone()),
            repairs: EntityCollection::new(backend.clone()),
            meetings: EntityCollection::new(backend.clone()),
            backend,
        }
    }

    pub fn mode(&self) -> DataMode {
        self.mode
    }

    pub fn timeouts(&self) -> Option<GatewayTimeouts> {
        self.backend.timeouts
    }

    pub fn community_scope(&self) -> Option<&str> {
        self.backend.scope.as_deref()
    }

    pub fn status(&self) -> &GatewayStatus {
        &self.backend.status
    }

    pub fn is_loading(&self) -> bool {
        self.backend.status.is_loading()
    }

    pub fn last_error(&self) -> Option<String> {
        self.backend.status.last_error()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.store.backend_name()
    }

    pub async fn health_check(&self) -> GatewayResult<()> {
        self.backend
            .store
            .health_check()
            .await
            .map_err(|err| GatewayError::RemoteFailure(format!("{err:#}")))
    }

    pub fn communities(&self) -> &EntityCollection<Community> {
        &self.communities
    }

    pub fn residents(&self) -> &EntityCollection<Resident> {
        &self.residents
    }

    pub fn vendors(&self) -> &EntityCollection<Vendor> {
        &self.vendors
    }

    pub fn repairs(&self) -> &EntityCollection<RepairTicket> {
        &self.repairs
    }

    pub fn meetings(&self) -> &EntityCollection<Meeting> {
        &self.meetings
    }

    /// Fetch residents, vendors, repairs and meetings concurrently.
    ///
    /// Each fetch settles independently; one failing leaves the others intact.
    pub async fn initialize(&self) {
        tokio::join!(
            self.residents.fetch_all(),
            self.vendors.fetch_all(),
            self.repairs.fetch_all(),
            self.meetings.fetch_all(),
        );
    }

    /// Upsert a monthly payment into a resident's history and persist it.
    ///
    /// Returns the history that was written.
    pub async fn record_payment(
        &self,
        resident_id: &str,
        record: PaymentRecord,
    ) -> GatewayResult<Vec<PaymentRecord>> {
        let resident = self.residents.get(resident_id).await?;
        let mut history = resident.payment_history;
        upsert_payment(&mut history, record);
        self.residents
            .update(
                resident_id,
                &ResidentPatch {
                    payment_history: Some(history.clone()),
                    ..ResidentPatch::default()
                },
            )
            .await?;
        Ok(history)
    }

    /// Append an invoice with a freshly synthesized id to a vendor.
    pub async fn add_invoice(&self, vendor_id: &str, invoice: NewInvoice) -> GatewayResult<Invoice> {
        let vendor = self.vendors.get(vendor_id).await?;
        let invoice = invoice.with_id(synthesize_id(INVOICE_ID_PREFIX));
        let mut invoices = vendor.invoices;
        invoices.push(invoice.clone());
        self.vendors
            .update(
                vendor_id,
                &VendorPatch {
                    invoices: Some(invoices),
                    ..VendorPatch::default()
                },
            )
            .await?;
        Ok(invoice)
    }

    pub async fn add_service_record(
        &self,
        vendor_id: &str,
        record: ServiceRecord,
    ) -> GatewayResult<()> {
        let vendor = self.vendors.get(vendor_id).await?;
        let mut service_records = vendor.service_records;
        service_records.push(record);
        self.vendors
            .update(
                vendor_id,
                &VendorPatch {
                    service_records: Some(service_records),
                    ..VendorPatch::default()
                },
            )
            .await
    }

    /// Cached residents with no settled payment for the month.
    pub async fn unpaid_residents(&self, year: i32, month: u32) -> Vec<Resident> {
        self.residents
            .records()
            .await
            .into_iter()
            .filter(|resident| resident.is_unpaid(year, month))
            .collect()
    }

    pub async fn repairs_with_status(&self, status: RepairStatus) -> Vec<RepairTicket> {
        self.repairs
            .records()
            .await
            .into_iter()
            .filter(|ticket| ticket.status == status)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ceilings() {
        let timeouts = GatewayTimeouts::default();
        assert_eq!(timeouts.read, Duration::from_secs(15));
        assert_eq!(timeouts.write, Duration::from_secs(10));
    }

    #[test]
    fn mock_mode_has_no_ceiling() {
        let gateway = DataGateway::mock();
        assert_eq!(gateway.mode(), DataMode::Mock);
        assert_eq!(gateway.timeouts(), None);
        assert_eq!(gateway.backend_name(), "memory");
    }

    #[tokio::test]
    async fn scope_keeps_matching_community() {
        let gateway = DataGateway::mock().with_community_scope("C999");
        assert!(gateway.residents().fetch_all().await.is_empty());
        let gateway = DataGateway::mock().with_community_scope("C001");
        assert_eq!(gateway.residents().fetch_all().await.len(), 5);
    }

    #[tokio::test]
    async fn listings_follow_entity_order() {
        let gateway = DataGateway::mock();
        gateway.initialize().await;
        let units: Vec<String> = gateway
            .residents()
            .records()
            .await
            .into_iter()
            .map(|resident| resident.unit)
            .collect();
        assert_eq!(units, vec!["2F-1", "3F-1", "4F-2", "5F-2", "7F-1"]);
        let repairs: Vec<String> = gateway
            .repairs()
            .records()
            .await
            .into_iter()
            .map(|ticket| ticket.id)
            .collect();
        assert_eq!(repairs, vec!["RP003", "RP002", "RP001"]);
    }
}
