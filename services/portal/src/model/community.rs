//! Community records.
//!
//! # Purpose
//! A community is the building or estate every other record is scoped to.
//! Residents join one during onboarding.
use super::Entity;
use crate::store::Collection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const DEFAULT_MONTHLY_FEE: u32 = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub total_units: u32,
    #[serde(default = "default_monthly_fee")]
    pub monthly_fee: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floors: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units_per_floor: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommunity {
    pub name: String,
    pub address: String,
    pub total_units: u32,
    pub monthly_fee: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floors: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units_per_floor: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_units: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_fee: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floors: Option<Option<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units_per_floor: Option<Option<u32>>,
}

fn default_monthly_fee() -> u32 {
    DEFAULT_MONTHLY_FEE
}

impl Community {
    /// Case-sensitive substring search over name and address.
    pub fn matches(&self, keyword: &str) -> bool {
        self.name.contains(keyword) || self.address.contains(keyword)
    }
}

impl Entity for Community {
    const COLLECTION: Collection = Collection::Communities;
    type Draft = NewCommunity;
    type Patch = CommunityPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn community_id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn listing_order(a: &Self, b: &Self) -> Ordering {
        a.name.cmp(&b.name)
    }
}
