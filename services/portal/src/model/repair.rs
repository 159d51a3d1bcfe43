//! Repair tickets.
//!
//! `assigned_vendor` and `reported_by` are loose identifiers; nothing checks
//! that the vendor or resident they name exists.
use super::Entity;
use crate::store::Collection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairTicket {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub reported_by: String,
    pub reported_date: NaiveDate,
    #[serde(default)]
    pub status: RepairStatus,
    #[serde(default)]
    pub priority: RepairPriority,
    #[serde(default)]
    pub assigned_vendor: Option<String>,
    #[serde(default)]
    pub completed_date: Option<NaiveDate>,
    #[serde(default)]
    pub cost: Option<u32>,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRepairTicket {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community_id: Option<String>,
    pub title: String,
    pub description: String,
    pub reported_by: String,
    pub reported_date: NaiveDate,
    pub status: RepairStatus,
    pub priority: RepairPriority,
    pub assigned_vendor: Option<String>,
    pub completed_date: Option<NaiveDate>,
    pub cost: Option<u32>,
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RepairStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<RepairPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_vendor: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Option<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
}

impl Entity for RepairTicket {
    const COLLECTION: Collection = Collection::Repairs;
    type Draft = NewRepairTicket;
    type Patch = RepairPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn community_id(&self) -> Option<&str> {
        self.community_id.as_deref()
    }

    // Newest report first.
    fn listing_order(a: &Self, b: &Self) -> Ordering {
        b.reported_date.cmp(&a.reported_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_status_defaults_to_pending() {
        let ticket: RepairTicket = serde_json::from_value(serde_json::json!({
            "id": "RP9",
            "title": "Gate sticks",
            "reportedBy": "R005",
            "reportedDate": "2024-06-01"
        }))
        .expect("decode");
        assert_eq!(ticket.status, RepairStatus::Pending);
        assert_eq!(ticket.assigned_vendor, None);
    }

    #[test]
    fn status_labels_are_snake_case() {
        let rendered = serde_json::to_string(&RepairStatus::InProgress).expect("serialize");
        assert_eq!(rendered, "\"in_progress\"");
    }
}
