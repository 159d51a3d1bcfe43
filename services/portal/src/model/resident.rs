//! Resident records and monthly fee payments.
//!
//! # Key invariants
//! - A resident's payment history holds at most one record per `(year, month)`.
//!   Recording a payment for a month already present replaces that record in
//!   place; otherwise it is appended.
use super::Entity;
use crate::store::Collection;
use chrono::NaiveDate;
use hoa_authz::Role;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub year: i32,
    pub month: u32,
    pub paid: bool,
    pub amount: u32,
    #[serde(default)]
    pub paid_date: Option<NaiveDate>,
}

impl PaymentRecord {
    pub fn is_for(&self, year: i32, month: u32) -> bool {
        self.year == year && self.month == month
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_id: Option<String>,
    pub unit: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(rename = "lineId", default, skip_serializing_if = "Option::is_none")]
    pub chat_handle: Option<String>,
    #[serde(rename = "lineUserId", default, skip_serializing_if = "Option::is_none")]
    pub chat_user_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_role",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<Role>,
    pub move_in_date: NaiveDate,
    #[serde(default)]
    pub payment_history: Vec<PaymentRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResident {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community_id: Option<String>,
    pub unit: String,
    pub name: String,
    pub phone: String,
    #[serde(rename = "lineId", skip_serializing_if = "Option::is_none")]
    pub chat_handle: Option<String>,
    #[serde(rename = "lineUserId", skip_serializing_if = "Option::is_none")]
    pub chat_user_id: Option<String>,
    pub role: Role,
    pub move_in_date: NaiveDate,
    pub payment_history: Vec<PaymentRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "lineId", skip_serializing_if = "Option::is_none")]
    pub chat_handle: Option<Option<String>>,
    #[serde(rename = "lineUserId", skip_serializing_if = "Option::is_none")]
    pub chat_user_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_in_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_history: Option<Vec<PaymentRecord>>,
}

// Stored role labels outside the known set mean "no role", not a broken document.
fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let label: Option<String> = Option::deserialize(deserializer)?;
    Ok(label.as_deref().and_then(Role::parse_lenient))
}

/// Replace the record for the same `(year, month)` or append a new one.
pub fn upsert_payment(history: &mut Vec<PaymentRecord>, record: PaymentRecord) {
    match history
        .iter_mut()
        .find(|existing| existing.is_for(record.year, record.month))
    {
        Some(existing) => *existing = record,
        None => history.push(record),
    }
}

impl Resident {
    pub fn payment_for(&self, year: i32, month: u32) -> Option<&PaymentRecord> {
        self.payment_history
            .iter()
            .find(|record| record.is_for(year, month))
    }

    /// No record for the month, or a record that is not settled.
    pub fn is_unpaid(&self, year: i32, month: u32) -> bool {
        !self
            .payment_for(year, month)
            .is_some_and(|record| record.paid)
    }

    pub fn answers_to(&self, user_id: &str) -> bool {
        self.chat_user_id.as_deref() == Some(user_id) || self.chat_handle.as_deref() == Some(user_id)
    }
}

impl Entity for Resident {
    const COLLECTION: Collection = Collection::Residents;
    type Draft = NewResident;
    type Patch = ResidentPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn community_id(&self) -> Option<&str> {
        self.community_id.as_deref()
    }

    fn listing_order(a: &Self, b: &Self) -> Ordering {
        a.unit.cmp(&b.unit)
    }
}
