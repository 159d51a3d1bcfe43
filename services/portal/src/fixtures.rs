//! Seed data for mock mode.
//!
//! Loaded by [`InMemoryStore::seeded`](crate::store::memory::InMemoryStore::seeded).
//! Shapes match the stored document layout of each entity.
use crate::store::{Collection, Document};
use serde_json::{Value, json};

pub const COMMUNITY_ID: &str = "C001";

/// Every fixture document, tagged with its collection.
pub fn seed_documents() -> Vec<(Collection, Document)> {
    let mut documents = Vec::new();
    let groups = [
        (Collection::Communities, communities()),
        (Collection::Residents, residents()),
        (Collection::Vendors, vendors()),
        (Collection::Repairs, repairs()),
        (Collection::Meetings, meetings()),
    ];
    for (collection, values) in groups {
        documents.extend(
            values
                .into_iter()
                .filter_map(into_document)
                .map(|document| (collection, document)),
        );
    }
    documents
}

fn into_document(value: Value) -> Option<Document> {
    let Value::Object(mut fields) = value else {
        return None;
    };
    let id = match fields.remove("id") {
        Some(Value::String(id)) => id,
        _ => return None,
    };
    Some(Document { id, fields })
}

fn payments(settled: &[(u32, Option<&str>)]) -> Value {
    Value::Array(
        settled
            .iter()
            .map(|(month, paid_date)| {
                json!({
                    "year": 2024,
                    "month": month,
                    "paid": paid_date.is_some(),
                    "amount": 2000,
                    "paidDate": paid_date,
                })
            })
            .collect(),
    )
}

fn communities() -> Vec<Value> {
    vec![json!({
        "id": COMMUNITY_ID,
        "name": "Maple Court",
        "address": "88 Renai Road, Da'an District, Taipei",
        "totalUnits": 5,
        "monthlyFee": 2000,
        "floors": 7,
        "unitsPerFloor": 2,
    })]
}

fn residents() -> Vec<Value> {
    vec![
        json!({
            "id": "R001",
            "communityId": COMMUNITY_ID,
            "unit": "3F-1",
            "name": "Wang Da-ming",
            "phone": "0912-345-678",
            "lineId": "wang.daming",
            "role": "chairman",
            "moveInDate": "2019-03-15",
            "paymentHistory": payments(&[
                (1, Some("2024-01-05")),
                (2, Some("2024-02-03")),
                (3, Some("2024-03-08")),
                (4, None),
                (5, None),
            ]),
        }),
        json!({
            "id": "R002",
            "communityId": COMMUNITY_ID,
            "unit": "5F-2",
            "name": "Lee Hsiao-hua",
            "phone": "0923-456-789",
            "lineId": "lee.xiaohua",
            "role": "treasurer",
            "moveInDate": "2020-06-01",
            "paymentHistory": payments(&[
                (1, Some("2024-01-10")),
                (2, Some("2024-02-12")),
                (3, Some("2024-03-05")),
                (4, Some("2024-04-08")),
                (5, Some("2024-05-02")),
            ]),
        }),
        json!({
            "id": "R003",
            "communityId": COMMUNITY_ID,
            "unit": "2F-1",
            "name": "Chang Mei-ling",
            "phone": "0934-567-890",
            "lineId": "zhang.meiling",
            "role": "resident",
            "moveInDate": "2021-01-20",
            "paymentHistory": payments(&[
                (1, Some("2024-01-15")),
                (2, None),
                (3, None),
                (4, None),
                (5, None),
            ]),
        }),
        json!({
            "id": "R004",
            "communityId": COMMUNITY_ID,
            "unit": "7F-1",
            "name": "Chen Chien-hung",
            "phone": "0945-678-901",
            "lineId": "chen.jianhong",
            "role": "supervisor",
            "moveInDate": "2018-09-10",
            "paymentHistory": payments(&[
                (1, Some("2024-01-03")),
                (2, Some("2024-02-01")),
                (3, Some("2024-03-02")),
                (4, Some("2024-04-05")),
                (5, Some("2024-05-01")),
            ]),
        }),
        json!({
            "id": "R005",
            "communityId": COMMUNITY_ID,
            "unit": "4F-2",
            "name": "Lin Chih-ling",
            "phone": "0956-789-012",
            "lineId": "lin.zhiling",
            "role": "resident",
            "moveInDate": "2022-04-01",
            "paymentHistory": payments(&[
                (1, Some("2024-01-20")),
                (2, Some("2024-02-18")),
                (3, Some("2024-03-22")),
                (4, None),
                (5, None),
            ]),
        }),
    ]
}

fn vendors() -> Vec<Value> {
    vec![
        json!({
            "id": "V001",
            "communityId": COMMUNITY_ID,
            "name": "Everlift Elevators",
            "category": "elevator maintenance",
            "contact": "Manager Chen",
            "phone": "02-2345-6789",
            "lineId": "everlift",
            "contractStart": "2023-01-01",
            "contractEnd": "2025-12-31",
            "rating": 4.5,
            "notes": "Monthly service visit, quick to respond",
            "invoices": [
                { "id": "INV001", "date": "2024-03-15", "amount": 5000, "description": "March maintenance", "image": null },
                { "id": "INV002", "date": "2024-04-15", "amount": 5000, "description": "April maintenance", "image": null },
            ],
            "serviceRecords": [
                { "date": "2024-04-20", "type": "emergency repair", "workers": 2, "duration": "2h", "description": "Elevator noise", "photos": [] },
                { "date": "2024-03-15", "type": "scheduled maintenance", "workers": 1, "duration": "1h", "description": "Routine service", "photos": [] },
            ],
        }),
        json!({
            "id": "V002",
            "communityId": COMMUNITY_ID,
            "name": "Da'an Cleaning",
            "category": "cleaning",
            "contact": "Ms. Lin",
            "phone": "02-3456-7890",
            "lineId": "daan.clean",
            "contractStart": "2024-01-01",
            "contractEnd": "2024-12-31",
            "rating": 4.0,
            "notes": "Common areas every Tuesday and Friday",
            "invoices": [
                { "id": "INV003", "date": "2024-04-30", "amount": 8000, "description": "April cleaning", "image": null },
            ],
            "serviceRecords": [
                { "date": "2024-05-03", "type": "routine cleaning", "workers": 2, "duration": "3h", "description": "Common area cleaning", "photos": [] },
            ],
        }),
        json!({
            "id": "V003",
            "communityId": COMMUNITY_ID,
            "name": "Taipei Plumbing",
            "category": "plumbing and electrical",
            "contact": "Master Chang",
            "phone": "0922-333-444",
            "lineId": "taipei.plumber",
            "contractStart": null,
            "contractEnd": null,
            "rating": 4.8,
            "notes": "On call, fair pricing",
            "invoices": [],
            "serviceRecords": [
                { "date": "2024-04-10", "type": "repair", "workers": 1, "duration": "1.5h", "description": "Basement pipe leak", "photos": [] },
            ],
        }),
    ]
}

fn repairs() -> Vec<Value> {
    vec![
        json!({
            "id": "RP001",
            "communityId": COMMUNITY_ID,
            "title": "Elevator noise",
            "description": "Grinding sound while the car moves",
            "reportedBy": "R001",
            "reportedDate": "2024-05-01",
            "status": "completed",
            "priority": "high",
            "assignedVendor": "V001",
            "completedDate": "2024-05-03",
            "cost": 3500,
            "photos": [],
        }),
        json!({
            "id": "RP002",
            "communityId": COMMUNITY_ID,
            "title": "Basement leak",
            "description": "Ceiling seepage in the B1 car park",
            "reportedBy": "R002",
            "reportedDate": "2024-05-05",
            "status": "in_progress",
            "priority": "high",
            "assignedVendor": "V003",
            "completedDate": null,
            "cost": null,
            "photos": [],
        }),
        json!({
            "id": "RP003",
            "communityId": COMMUNITY_ID,
            "title": "Lobby bulbs",
            "description": "Two lobby lights are out",
            "reportedBy": "R003",
            "reportedDate": "2024-05-08",
            "status": "pending",
            "priority": "low",
            "assignedVendor": null,
            "completedDate": null,
            "cost": null,
            "photos": [],
        }),
    ]
}

fn meetings() -> Vec<Value> {
    vec![
        json!({
            "id": "M001",
            "communityId": COMMUNITY_ID,
            "title": "Committee meeting, term 3 session 5",
            "date": "2024-05-01",
            "time": "19:30",
            "duration": "1:45:00",
            "location": "Community meeting room",
            "attendees": ["Wang Da-ming", "Lee Hsiao-hua", "Chen Chien-hung"],
            "absentees": ["Chang Mei-ling"],
            "hasAudio": true,
            "hasTranscript": true,
            "transcript": "Chair: Good evening, tonight we cover...",
            "summary": "Elevator repair, cleaning contract renewal and fee adjustment.",
            "resolutions": [
                "Elevator repair approved with a budget of 35,000",
                "Cleaning contract renewed for one year at the same price",
                "Fee adjustment deferred to the owners' assembly",
            ],
        }),
        json!({
            "id": "M002",
            "communityId": COMMUNITY_ID,
            "title": "Committee meeting, term 3 session 4",
            "date": "2024-04-03",
            "time": "19:30",
            "duration": "1:20:00",
            "location": "Community meeting room",
            "attendees": ["Wang Da-ming", "Lee Hsiao-hua", "Chen Chien-hung", "Chang Mei-ling"],
            "absentees": [],
            "hasAudio": true,
            "hasTranscript": true,
            "transcript": "...",
            "summary": "Holiday decorations and common-area disinfection.",
            "resolutions": [
                "Holiday decoration budget of 10,000",
                "Full disinfection scheduled for month end",
            ],
        }),
    ]
}
