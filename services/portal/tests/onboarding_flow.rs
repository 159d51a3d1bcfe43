mod common;

use chrono::Local;
use common::ScriptedStore;
use hoa_authz::Role;
use portal::gateway::{DataGateway, GatewayError, GatewayTimeouts};
use portal::onboarding::{CommunityForm, Onboarding, OnboardingError, OnboardingStep};
use portal::{Identity, RegistrationStatus, Session};

fn newcomer() -> Session {
    Session::new(Identity {
        user_id: "U-newcomer".into(),
        display_name: "Kao Pei-yu".into(),
    })
}

#[tokio::test]
async fn newcomer_joins_existing_community() {
    let gateway = DataGateway::mock();
    let mut session = newcomer();
    assert_eq!(
        session.detect_role(&gateway).await,
        RegistrationStatus::Unregistered
    );

    let mut wizard = Onboarding::new();
    assert_eq!(wizard.load_communities(&gateway).await, 1);
    wizard.search("Renai");
    let community = wizard
        .matching_communities()
        .first()
        .map(|community| (*community).clone())
        .expect("match by address");
    wizard.search("Nowhere");
    assert!(wizard.matching_communities().is_empty());

    wizard.select_community(community).expect("select");
    assert_eq!(wizard.floor_options().len(), 8);
    wizard.set_floor("6F");
    wizard.set_unit_number("2");
    wizard.go_to_confirm().expect("confirm");

    let resident = wizard.submit(&gateway, &mut session).await.expect("submit");
    assert_eq!(wizard.step(), OnboardingStep::Completed);
    assert_eq!(resident.unit, "6F-2");
    assert_eq!(resident.name, "Kao Pei-yu");
    assert_eq!(resident.role, Some(Role::Resident));
    assert_eq!(resident.chat_user_id.as_deref(), Some("U-newcomer"));
    assert_eq!(resident.move_in_date, Local::now().date_naive());
    assert!(resident.payment_history.is_empty());

    assert_eq!(session.registration(), RegistrationStatus::Registered);
    assert_eq!(session.resident_id(), Some(resident.id.as_str()));
    assert_eq!(gateway.residents().records().await.len(), 6);

    let stored = gateway.communities().get("C001").await.expect("community");
    assert_eq!(stored.total_units, 6);
    assert_eq!(wizard.community().map(|c| c.total_units), Some(6));
}

#[tokio::test]
async fn founder_creates_community_as_chairman() {
    let gateway = DataGateway::mock();
    let mut session = newcomer();
    let mut wizard = Onboarding::new();
    wizard.load_communities(&gateway).await;
    wizard.start_new_community().expect("start");

    let err = wizard
        .create_community(
            &gateway,
            &session,
            CommunityForm {
                name: "   ".into(),
                address: "5 Harbor Rd".into(),
                ..CommunityForm::default()
            },
        )
        .await
        .expect_err("blank name");
    assert!(matches!(err, OnboardingError::InvalidCommunity("name")));
    assert_eq!(wizard.step(), OnboardingStep::CreateCommunity);

    let community = wizard
        .create_community(
            &gateway,
            &session,
            CommunityForm {
                name: " Harbor Lights ".into(),
                address: "5 Harbor Rd".into(),
                floors: Some(12),
                units_per_floor: Some(4),
            },
        )
        .await
        .expect("create");
    assert!(community.id.starts_with('C'));
    assert_eq!(community.name, "Harbor Lights");
    assert_eq!(community.total_units, 0);
    assert_eq!(community.monthly_fee, 2000);
    assert_eq!(community.created_by.as_deref(), Some("U-newcomer"));
    assert_eq!(wizard.step(), OnboardingStep::PersonalInfo);
    assert_eq!(wizard.unit_options(), vec!["1", "2", "3", "4"]);

    wizard.set_unit_label("12F-4");
    wizard.set_chairman(true);
    wizard.go_to_confirm().expect("confirm");
    let resident = wizard.submit(&gateway, &mut session).await.expect("submit");
    assert_eq!(resident.role, Some(Role::Chairman));
    assert_eq!(resident.community_id.as_deref(), Some(community.id.as_str()));
    assert_eq!(session.role(), Some(Role::Chairman));
    assert_eq!(session.tabs().len(), 5);
}

#[tokio::test]
async fn failed_submission_stays_on_confirm() {
    let store = ScriptedStore::seeded();
    let gateway = DataGateway::remote(store.clone(), GatewayTimeouts::default());
    let mut session = newcomer();
    let mut wizard = Onboarding::new();
    wizard.load_communities(&gateway).await;
    let community = wizard.matching_communities()[0].clone();
    wizard.select_community(community).expect("select");
    wizard.set_unit_label("B1-1");
    wizard.go_to_confirm().expect("confirm");

    store.script(|script| script.fail_writes = Some("write rejected".into()));
    let err = wizard
        .submit(&gateway, &mut session)
        .await
        .expect_err("rejected");
    assert!(matches!(
        err,
        OnboardingError::Gateway(GatewayError::RemoteFailure(ref message)) if message == "write rejected"
    ));
    assert_eq!(wizard.step(), OnboardingStep::Confirm);
    assert_eq!(
        wizard.submit_error(),
        Some("remote store failure: write rejected")
    );
    assert_eq!(session.registration(), RegistrationStatus::Unknown);

    store.script(|script| script.fail_writes = None);
    wizard.submit(&gateway, &mut session).await.expect("retry");
    assert_eq!(wizard.step(), OnboardingStep::Completed);
    assert_eq!(wizard.submit_error(), None);
}

#[tokio::test]
async fn anonymous_session_cannot_register() {
    let gateway = DataGateway::mock();
    let mut session = Session::anonymous();
    let mut wizard = Onboarding::new();
    wizard.load_communities(&gateway).await;
    let community = wizard.matching_communities()[0].clone();
    wizard.select_community(community).expect("select");
    wizard.set_unit_label("2F-2");
    wizard.go_to_confirm().expect("confirm");
    assert!(matches!(
        wizard.submit(&gateway, &mut session).await,
        Err(OnboardingError::MissingIdentity)
    ));
    assert_eq!(wizard.step(), OnboardingStep::Confirm);
}
