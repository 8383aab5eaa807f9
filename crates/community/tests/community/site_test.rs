use std::sync::Arc;

use axum::http::{header, StatusCode};
use community::{app, infra::backend::Error, GiveawayStore};
use mockall::{predicate::eq, Sequence};
use reqwest_middleware::reqwest::StatusCode as BackendStatus;
use time::{format_description::well_known::Rfc3339, Duration, OffsetDateTime};
use tower::ServiceExt;

use crate::helpers::{
    body_text, get, giveaway, post_form, session_cookie, test_state, MockBackendClient,
};

fn from_now(offset: Duration) -> String {
    (OffsetDateTime::now_utc() + offset).format(&Rfc3339).unwrap()
}

const FILLED_FORM: &str = "title=Nitro+Drop&description=One+month&prize=Discord+Nitro\
&endDate=2030-01-01T00%3A00&entryRequirement=Join+the+server";

#[tokio::test]
async fn test_home_page_renders_with_fallback_stats() {
    let state = test_state(GiveawayStore::new(), Arc::new(MockBackendClient::new()));
    let router = app(state.clone(), vec![]);

    let response = router
        .clone()
        .oneshot(get("/", Some("community_session=not-a-session")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router.oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    // reading the page hands out no session
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert!(state.sessions.is_empty());

    let html = body_text(response).await;
    assert!(html.contains("Welcome to RBC Community"));
    assert!(html.contains("No active giveaways at the moment"));
    assert!(html.contains("500+"));
    assert!(html.contains(r#"hx-trigger="every 30s""#));
}

#[tokio::test]
async fn test_active_fragment_hides_ended_giveaways() {
    let store = GiveawayStore::new();
    store
        .replace(vec![
            giveaway("1", "Still Running", &from_now(Duration::days(2))),
            giveaway("2", "Long Gone", &from_now(-Duration::days(2))),
            giveaway("3", "Bad Date", "someday"),
        ])
        .await;
    let state = test_state(store, Arc::new(MockBackendClient::new()));
    let router = app(state, vec![]);

    let response = router.oneshot(get("/giveaways/active", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Still Running"));
    assert!(!html.contains("Long Gone"));
    assert!(!html.contains("Bad Date"));
}

#[tokio::test]
async fn test_wrong_password_shows_alert_and_no_panel() {
    let mut backend = MockBackendClient::new();
    backend
        .expect_login()
        .with(eq("guess"))
        .times(1)
        .returning(|_| {
            Err(Error::Rejected {
                status: BackendStatus::UNAUTHORIZED,
                body: String::new(),
            })
        });
    let router = app(test_state(GiveawayStore::new(), Arc::new(backend)), vec![]);

    let response = router
        .clone()
        .oneshot(post_form("/admin/login/open", None, ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    let cookie = session_cookie(&response);

    let html = body_text(router.clone().oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains(r#"id="adminLoginModal" class="modal is-active""#));

    router
        .clone()
        .oneshot(post_form("/admin/login", Some(&cookie), "password=guess"))
        .await
        .unwrap();

    let html = body_text(router.clone().oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("Invalid admin password!"));
    assert!(html.contains(r#"id="adminPanelModal" class="modal""#));

    router
        .clone()
        .oneshot(post_form("/alert/dismiss", Some(&cookie), ""))
        .await
        .unwrap();
    let html = body_text(router.oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(!html.contains("Invalid admin password!"));
}

#[tokio::test]
async fn test_admin_adds_giveaway_then_sees_it_listed() {
    let end = from_now(Duration::days(3));
    let listed = vec![giveaway("new", "Nitro Drop", &end)];

    let mut backend = MockBackendClient::new();
    let mut seq = Sequence::new();
    backend
        .expect_login()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    backend
        .expect_create_giveaway()
        .withf(|form| form.title == "Nitro Drop" && form.end_date == "2030-01-01T00:00")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    backend
        .expect_list_giveaways()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move || Ok(listed.clone()));

    let store = GiveawayStore::new();
    let router = app(test_state(store.clone(), Arc::new(backend)), vec![]);

    let response = router
        .clone()
        .oneshot(post_form("/admin/login/open", None, ""))
        .await
        .unwrap();
    let cookie = session_cookie(&response);
    router
        .clone()
        .oneshot(post_form("/admin/login", Some(&cookie), "password=letmein"))
        .await
        .unwrap();

    let response = router
        .clone()
        .oneshot(post_form("/admin/giveaways", Some(&cookie), FILLED_FORM))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = body_text(router.oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("Giveaway added successfully!"));
    assert!(html.contains(r#"id="adminPanelModal" class="modal is-active""#));
    assert!(html.contains("/admin/giveaways/new/delete"));
    assert_eq!(store.all().await.len(), 1);
}

#[tokio::test]
async fn test_visitor_cannot_reach_admin_operations() {
    let mut backend = MockBackendClient::new();
    backend.expect_create_giveaway().never();
    backend.expect_delete_giveaway().never();
    let router = app(test_state(GiveawayStore::new(), Arc::new(backend)), vec![]);

    let response = router
        .clone()
        .oneshot(post_form("/admin/giveaways", None, FILLED_FORM))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookie = session_cookie(&response);

    router
        .clone()
        .oneshot(post_form("/admin/giveaways/1/delete", Some(&cookie), ""))
        .await
        .unwrap();
    let response = router
        .oneshot(post_form("/admin/delete/confirm", Some(&cookie), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_delete_runs_only_after_confirmation() {
    let end = from_now(Duration::days(1));
    let remaining = vec![giveaway("2", "Second", &end)];

    let mut backend = MockBackendClient::new();
    backend.expect_login().returning(|_| Ok(()));
    backend
        .expect_delete_giveaway()
        .with(eq("1"))
        .times(1)
        .returning(|_| Ok(()));
    backend
        .expect_list_giveaways()
        .times(1)
        .returning(move || Ok(remaining.clone()));

    let store = GiveawayStore::new();
    store
        .replace(vec![giveaway("1", "First", &end), giveaway("2", "Second", &end)])
        .await;
    let router = app(test_state(store.clone(), Arc::new(backend)), vec![]);

    let response = router
        .clone()
        .oneshot(post_form("/admin/login/open", None, ""))
        .await
        .unwrap();
    let cookie = session_cookie(&response);
    router
        .clone()
        .oneshot(post_form("/admin/login", Some(&cookie), "password=letmein"))
        .await
        .unwrap();

    // asking shows the confirmation, cancelling drops it
    router
        .clone()
        .oneshot(post_form("/admin/giveaways/1/delete", Some(&cookie), ""))
        .await
        .unwrap();
    let html = body_text(router.clone().oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains(r#"id="confirmDeleteModal" class="modal is-active""#));
    router
        .clone()
        .oneshot(post_form("/admin/delete/cancel", Some(&cookie), ""))
        .await
        .unwrap();
    assert_eq!(store.all().await.len(), 2);

    router
        .clone()
        .oneshot(post_form("/admin/giveaways/1/delete", Some(&cookie), ""))
        .await
        .unwrap();
    router
        .clone()
        .oneshot(post_form("/admin/delete/confirm", Some(&cookie), ""))
        .await
        .unwrap();

    let html = body_text(router.oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("Giveaway deleted successfully!"));
    assert_eq!(store.all().await.len(), 1);
}

#[tokio::test]
async fn test_delete_reaches_backend_with_slashed_id() {
    let mut backend = MockBackendClient::new();
    backend.expect_login().returning(|_| Ok(()));
    backend
        .expect_delete_giveaway()
        .with(eq("a/b"))
        .times(1)
        .returning(|_| Ok(()));
    backend
        .expect_list_giveaways()
        .times(1)
        .returning(|| Ok(vec![]));

    let store = GiveawayStore::new();
    store
        .replace(vec![giveaway("a/b", "Slashed", &from_now(Duration::days(1)))])
        .await;
    let router = app(test_state(store.clone(), Arc::new(backend)), vec![]);

    let response = router
        .clone()
        .oneshot(post_form("/admin/login/open", None, ""))
        .await
        .unwrap();
    let cookie = session_cookie(&response);
    router
        .clone()
        .oneshot(post_form("/admin/login", Some(&cookie), "password=letmein"))
        .await
        .unwrap();

    let html = body_text(router.clone().oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("/admin/giveaways/a%2Fb/delete"));

    let response = router
        .clone()
        .oneshot(post_form("/admin/giveaways/a%2Fb/delete", Some(&cookie), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    router
        .clone()
        .oneshot(post_form("/admin/delete/confirm", Some(&cookie), ""))
        .await
        .unwrap();

    let html = body_text(router.oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("Giveaway deleted successfully!"));
    assert!(store.all().await.is_empty());
}

#[tokio::test]
async fn test_form_draft_survives_for_htmx_callers() {
    let mut backend = MockBackendClient::new();
    backend.expect_login().returning(|_| Ok(()));
    let router = app(test_state(GiveawayStore::new(), Arc::new(backend)), vec![]);

    let response = router
        .clone()
        .oneshot(post_form("/admin/login/open", None, ""))
        .await
        .unwrap();
    let cookie = session_cookie(&response);
    router
        .clone()
        .oneshot(post_form("/admin/login", Some(&cookie), "password=letmein"))
        .await
        .unwrap();

    let mut request = post_form("/admin/form", Some(&cookie), "title=Draft+Title&prize=");
    request
        .headers_mut()
        .insert("hx-request", "true".parse().unwrap());
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let html = body_text(router.oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains(r#"value="Draft Title""#));
}

#[tokio::test]
async fn test_health_and_static_assets() {
    let router = app(
        test_state(GiveawayStore::new(), Arc::new(MockBackendClient::new())),
        vec![],
    );

    let response = router
        .clone()
        .oneshot(get("/api/v1/health_check", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router.clone().oneshot(get("/ui/styles.css", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/css; charset=utf-8"
    );

    let response = router.oneshot(get("/ui/missing.css", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
