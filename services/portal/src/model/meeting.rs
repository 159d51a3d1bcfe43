//! Committee meeting minutes.
use super::Entity;
use crate::store::Collection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_id: Option<String>,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default)]
    pub absentees: Vec<String>,
    #[serde(default)]
    pub has_audio: bool,
    #[serde(default)]
    pub has_transcript: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub resolutions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeeting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community_id: Option<String>,
    pub title: String,
    pub date: NaiveDate,
    pub time: String,
    pub duration: String,
    pub location: String,
    pub attendees: Vec<String>,
    pub absentees: Vec<String>,
    pub has_audio: bool,
    pub has_transcript: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub resolutions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absentees: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_audio: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_transcript: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolutions: Option<Vec<String>>,
}

impl Entity for Meeting {
    const COLLECTION: Collection = Collection::Meetings;
    type Draft = NewMeeting;
    type Patch = MeetingPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn community_id(&self) -> Option<&str> {
        self.community_id.as_deref()
    }

    // Most recent meeting first.
    fn listing_order(a: &Self, b: &Self) -> Ordering {
        b.date.cmp(&a.date)
    }
}
