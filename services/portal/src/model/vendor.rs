//! Vendor records with their invoices and service history.
use super::Entity;
use crate::store::Collection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub date: NaiveDate,
    pub amount: u32,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub date: NaiveDate,
    pub amount: u32,
    pub description: String,
    pub image: Option<String>,
}

impl NewInvoice {
    pub fn with_id(self, id: String) -> Invoice {
        Invoice {
            id,
            date: self.date,
            amount: self.amount,
            description: self.description,
            image: self.image,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: String,
    pub workers: u32,
    pub duration: String,
    pub description: String,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_id: Option<String>,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub phone: String,
    #[serde(rename = "lineId", default, skip_serializing_if = "Option::is_none")]
    pub chat_handle: Option<String>,
    #[serde(default)]
    pub contract_start: Option<NaiveDate>,
    #[serde(default)]
    pub contract_end: Option<NaiveDate>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub service_records: Vec<ServiceRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVendor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community_id: Option<String>,
    pub name: String,
    pub category: String,
    pub contact: String,
    pub phone: String,
    #[serde(rename = "lineId", skip_serializing_if = "Option::is_none")]
    pub chat_handle: Option<String>,
    pub contract_start: Option<NaiveDate>,
    pub contract_end: Option<NaiveDate>,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub invoices: Vec<Invoice>,
    pub service_records: Vec<ServiceRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "lineId", skip_serializing_if = "Option::is_none")]
    pub chat_handle: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_start: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_end: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoices: Option<Vec<Invoice>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_records: Option<Vec<ServiceRecord>>,
}

impl Entity for Vendor {
    const COLLECTION: Collection = Collection::Vendors;
    type Draft = NewVendor;
    type Patch = VendorPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn community_id(&self) -> Option<&str> {
        self.community_id.as_deref()
    }

    fn listing_order(a: &Self, b: &Self) -> Ordering {
        a.name.cmp(&b.name)
    }
}
