//! Community portal data model.
//!
//! # Purpose
//! Defines the entity records kept in the document store, their create drafts
//! and partial-update patches, and the [`Entity`] trait the gateway uses to
//! treat all collections through one policy.
//!
//! # Notes
//! Documents are exchanged with the store as JSON objects. Patches merge
//! shallowly: a field present in the patch replaces the stored field wholesale.
mod community;
mod meeting;
mod repair;
mod resident;
mod vendor;

pub use community::{Community, CommunityPatch, DEFAULT_MONTHLY_FEE, NewCommunity};
pub use meeting::{Meeting, MeetingPatch, NewMeeting};
pub use repair::{NewRepairTicket, RepairPatch, RepairPriority, RepairStatus, RepairTicket};
pub use resident::{NewResident, PaymentRecord, Resident, ResidentPatch, upsert_payment};
pub use vendor::{Invoice, NewInvoice, NewVendor, ServiceRecord, Vendor, VendorPatch};

use crate::store::{Collection, Document};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde::ser::Error as _;
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// A record type stored in one document collection.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;

    /// Create payload: every field except the identifier.
    type Draft: Serialize + Send + Sync;
    /// Partial update: only the fields present are written.
    type Patch: Serialize + Send + Sync;

    fn id(&self) -> &str;
    fn community_id(&self) -> Option<&str>;
    /// Order in which listings are presented.
    fn listing_order(a: &Self, b: &Self) -> Ordering;
}

pub(crate) type Fields = Map<String, Value>;

pub(crate) fn to_fields<T: Serialize>(value: &T) -> Result<Fields, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        other => Err(serde_json::Error::custom(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

pub(crate) fn from_document<E: Entity>(document: Document) -> Result<E, serde_json::Error> {
    let Document { id, mut fields } = document;
    fields.insert("id".to_string(), Value::String(id));
    serde_json::from_value(Value::Object(fields))
}

pub(crate) fn merge_fields(target: &mut Fields, patch: Fields) {
    for (key, value) in patch {
        target.insert(key, value);
    }
}

/// Apply a shallow patch to a cached record.
pub(crate) fn apply_patch<E: Entity>(record: &E, patch: &Fields) -> Result<E, serde_json::Error> {
    let mut fields = to_fields(record)?;
    merge_fields(&mut fields, patch.clone());
    serde_json::from_value(Value::Object(fields))
}
