mod common;

use common::ScriptedStore;
use portal::gateway::{DataGateway, DataMode, FetchPhase, GatewayError, GatewayTimeouts};
use portal::model::{NewVendor, VendorPatch};
use portal::store::Collection;
use portal::store::memory::InMemoryStore;
use std::sync::Arc;
use std::time::Duration;

fn remote(store: &Arc<ScriptedStore>) -> DataGateway {
    DataGateway::remote(store.clone(), GatewayTimeouts::default())
}

fn new_vendor() -> NewVendor {
    NewVendor {
        community_id: Some("C001".into()),
        name: "Northside Plumbing".into(),
        category: "plumbing".into(),
        contact: "Mr. Ho".into(),
        phone: "02-5555-0101".into(),
        chat_handle: None,
        contract_start: None,
        contract_end: None,
        rating: 4.2,
        notes: None,
        invoices: Vec::new(),
        service_records: Vec::new(),
    }
}

#[tokio::test]
async fn created_vendor_is_cached_under_server_id() {
    let store = ScriptedStore::new(InMemoryStore::new());
    store.script(|script| script.next_id = Some("V123".into()));
    let gateway = remote(&store);
    assert_eq!(gateway.mode(), DataMode::Remote);

    let created = gateway.vendors().create(&new_vendor()).await.expect("create");
    assert_eq!(created.id, "V123");

    let cached = gateway.vendors().records().await;
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].id, "V123");
    assert_eq!(cached[0].name, "Northside Plumbing");
    assert_eq!(cached[0].rating, 4.2);
    assert_eq!(store.reads(), 0);
}

#[tokio::test(start_paused = true)]
async fn hung_fetch_settles_empty_with_timeout() {
    let store = ScriptedStore::seeded();
    let gateway = remote(&store);
    gateway.residents().fetch_all().await;
    assert_eq!(gateway.residents().records().await.len(), 5);

    store.script(|script| script.hang_reads = true);
    let started = tokio::time::Instant::now();
    let residents = gateway.residents().fetch_all().await;

    assert!(residents.is_empty());
    assert!(gateway.residents().records().await.is_empty());
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(15) && waited < Duration::from_secs(16));
    match gateway.residents().phase().await {
        FetchPhase::Failed(GatewayError::Timeout { label, after }) => {
            assert_eq!(label, "read residents");
            assert_eq!(after, Duration::from_secs(15));
        }
        other => panic!("unexpected phase {other:?}"),
    }
    assert_eq!(
        gateway.last_error().as_deref(),
        Some("read residents timed out after 15s")
    );
    assert!(!gateway.is_loading());
}

#[tokio::test(start_paused = true)]
async fn hung_write_times_out_on_the_shorter_ceiling() {
    let store = ScriptedStore::seeded();
    let gateway = remote(&store);
    gateway.vendors().fetch_all().await;
    store.script(|script| script.hang_writes = true);

    let started = tokio::time::Instant::now();
    let err = gateway
        .vendors()
        .update(
            "V001",
            &VendorPatch {
                rating: Some(1.0),
                ..VendorPatch::default()
            },
        )
        .await
        .expect_err("timeout");
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(10) && waited < Duration::from_secs(11));
    assert_eq!(
        err,
        GatewayError::Timeout {
            label: "update vendor V001".into(),
            after: Duration::from_secs(10),
        }
    );
    let cached = gateway.vendors().cached("V001").await.expect("cached");
    assert_eq!(cached.rating, 4.5);
}

#[tokio::test(start_paused = true)]
async fn late_response_is_never_applied() {
    let store = ScriptedStore::seeded();
    store.script(|script| script.read_delay = Some(Duration::from_secs(20)));
    let gateway = remote(&store);

    assert!(gateway.repairs().fetch_all().await.is_empty());
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(gateway.repairs().records().await.is_empty());
    assert!(matches!(
        gateway.repairs().phase().await,
        FetchPhase::Failed(GatewayError::Timeout { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn custom_ceilings_apply() {
    let store = ScriptedStore::seeded();
    store.script(|script| script.hang_reads = true);
    let gateway = DataGateway::remote(
        store.clone(),
        GatewayTimeouts {
            read: Duration::from_millis(250),
            write: Duration::from_millis(100),
        },
    );
    let err = gateway.meetings().get("M001").await.expect_err("timeout");
    assert_eq!(
        err,
        GatewayError::Timeout {
            label: "read meeting M001".into(),
            after: Duration::from_millis(250),
        }
    );
}

#[tokio::test]
async fn remote_failure_message_passes_through() {
    let store = ScriptedStore::seeded();
    store.script(|script| script.fail_writes = Some("quota exceeded".into()));
    let gateway = remote(&store);
    gateway.vendors().fetch_all().await;

    let err = gateway
        .vendors()
        .create(&new_vendor())
        .await
        .expect_err("rejected");
    assert_eq!(err, GatewayError::RemoteFailure("quota exceeded".into()));
    assert_eq!(
        gateway.last_error().as_deref(),
        Some("remote store failure: quota exceeded")
    );
    assert_eq!(gateway.vendors().records().await.len(), 3);
}

#[tokio::test]
async fn one_failed_fetch_leaves_the_others_loaded() {
    let store = ScriptedStore::seeded();
    store.script(|script| {
        script.fail_reads = Some((vec![Collection::Vendors], "vendors offline".into()));
    });
    let gateway = remote(&store);
    gateway.initialize().await;

    assert_eq!(gateway.residents().records().await.len(), 5);
    assert_eq!(gateway.repairs().records().await.len(), 3);
    assert_eq!(gateway.meetings().records().await.len(), 2);
    assert!(gateway.vendors().records().await.is_empty());
    assert_eq!(
        gateway.vendors().phase().await,
        FetchPhase::Failed(GatewayError::RemoteFailure("vendors offline".into()))
    );
}

#[tokio::test]
async fn list_propagates_errors_and_leaves_cache() {
    let store = ScriptedStore::seeded();
    let gateway = remote(&store);
    gateway.residents().fetch_all().await;
    store.script(|script| {
        script.fail_reads = Some((vec![Collection::Residents], "unavailable".into()));
    });

    let err = gateway.residents().list().await.expect_err("list fails");
    assert_eq!(err, GatewayError::RemoteFailure("unavailable".into()));
    assert_eq!(gateway.residents().records().await.len(), 5);
    assert_eq!(gateway.residents().phase().await, FetchPhase::Loaded);
}

#[tokio::test(start_paused = true)]
async fn in_flight_operations_report_loading() {
    let store = ScriptedStore::seeded();
    store.script(|script| script.read_delay = Some(Duration::from_secs(1)));
    let gateway = Arc::new(remote(&store));

    let background = {
        let gateway = gateway.clone();
        tokio::spawn(async move { gateway.meetings().fetch_all().await.len() })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(gateway.is_loading());
    assert_eq!(gateway.meetings().phase().await, FetchPhase::Loading);

    assert_eq!(background.await.expect("join"), 2);
    assert!(!gateway.is_loading());
}
