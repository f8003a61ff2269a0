mod support;

use std::time::Duration;

use serde_json::json;
use sysfree_client::guard::GuardDecision;
use sysfree_client::http::{LOGIN_PATH, REFRESH_PATH};
use sysfree_client::services::auth::PROFILE_PATH;
use sysfree_client::session::{LOGIN_ERROR, PROFILE_UPDATE_ERROR, SESSION_EXPIRED_ERROR, USER_INFO_ERROR};
use sysfree_core::domain::{SessionStatus, StorageKey};
use sysfree_core::ports::TokenStore;
use sysfree_core::wire::ApiRequest;
use support::{app, jwt, ok, profile, status, unauthorized, ScriptedTransport};

fn assert_cleared(tokens: &dyn TokenStore) {
    for key in StorageKey::ALL {
        assert_eq!(tokens.get(key), None, "{} should be cleared", key.as_str());
    }
}

//=========================================================================================
// Initialization
//=========================================================================================

#[tokio::test]
async fn no_token_means_anonymous_without_network() {
    let transport = ScriptedTransport::new(|_| unauthorized());
    let (state, _) = app(transport.clone());

    assert!(state.session.loading());
    state.session.initialize().await;

    assert_eq!(state.session.status(), SessionStatus::Anonymous);
    assert!(!state.session.loading());
    assert!(transport.seen().is_empty());
}

#[tokio::test]
async fn expired_token_without_refresh_ends_anonymous_and_cleared() {
    let transport = ScriptedTransport::new(|_| unauthorized());
    let (state, tokens) = app(transport.clone());
    tokens.set(StorageKey::AccessToken, &jwt(-3600)).unwrap();
    tokens.set(StorageKey::User, "{}").unwrap();

    state.session.initialize().await;

    assert_eq!(state.session.status(), SessionStatus::Anonymous);
    assert_eq!(state.session.current_user(), None);
    assert_eq!(state.session.error(), None);
    assert_cleared(tokens.as_ref());
    assert!(transport.seen().is_empty());
}

#[tokio::test]
async fn expired_token_is_refreshed_before_loading_profile() {
    let transport = ScriptedTransport::new(|request| match request.path.as_str() {
        REFRESH_PATH => ok(json!({ "access": "fresh" })),
        PROFILE_PATH if request.bearer.as_deref() == Some("fresh") => ok(profile()),
        _ => unauthorized(),
    });
    let (state, tokens) = app(transport.clone());
    tokens.set(StorageKey::AccessToken, &jwt(-60)).unwrap();
    tokens.set(StorageKey::RefreshToken, "refresh").unwrap();

    state.session.initialize().await;

    assert_eq!(state.session.status(), SessionStatus::Authenticated);
    assert_eq!(state.session.current_user().unwrap().email, "ana@example.com");
    assert_eq!(tokens.get(StorageKey::AccessToken).as_deref(), Some("fresh"));
    assert_eq!(transport.calls_to(REFRESH_PATH), 1);
}

#[tokio::test]
async fn rejected_refresh_expires_the_session() {
    let transport = ScriptedTransport::new(|_| unauthorized());
    let (state, tokens) = app(transport.clone());
    tokens.set(StorageKey::AccessToken, &jwt(-60)).unwrap();
    tokens.set(StorageKey::RefreshToken, "refresh").unwrap();

    state.session.initialize().await;

    assert_eq!(state.session.status(), SessionStatus::Anonymous);
    assert_eq!(state.session.error().as_deref(), Some(SESSION_EXPIRED_ERROR));
    assert_cleared(tokens.as_ref());
    assert_eq!(transport.calls_to(PROFILE_PATH), 0);
}

#[tokio::test]
async fn profile_failure_clears_tokens() {
    let transport = ScriptedTransport::new(|_| status(500, json!({})));
    let (state, tokens) = app(transport.clone());
    tokens.set(StorageKey::AccessToken, &jwt(3600)).unwrap();
    tokens.set(StorageKey::RefreshToken, "refresh").unwrap();

    state.session.initialize().await;

    assert_eq!(state.session.status(), SessionStatus::Anonymous);
    assert_eq!(state.session.error().as_deref(), Some(USER_INFO_ERROR));
    assert_cleared(tokens.as_ref());
}

#[tokio::test]
async fn undecodable_token_ends_in_error_state() {
    let transport = ScriptedTransport::new(|_| ok(profile()));
    let (state, tokens) = app(transport.clone());
    tokens.set(StorageKey::AccessToken, "not-a-jwt").unwrap();

    state.session.initialize().await;

    assert_eq!(state.session.status(), SessionStatus::Error);
    assert!(!state.session.loading());
    assert_eq!(state.session.current_user(), None);
    assert!(transport.seen().is_empty());
}

#[tokio::test]
async fn initialization_runs_once() {
    let transport = ScriptedTransport::new(|_| ok(profile()));
    let (state, tokens) = app(transport.clone());
    tokens.set(StorageKey::AccessToken, &jwt(3600)).unwrap();

    state.session.initialize().await;
    state.session.initialize().await;

    assert_eq!(state.session.status(), SessionStatus::Authenticated);
    assert_eq!(transport.calls_to(PROFILE_PATH), 1);
}

//=========================================================================================
// Login, logout and profile updates
//=========================================================================================

#[tokio::test]
async fn login_persists_tokens_and_loads_profile() {
    let transport = ScriptedTransport::new(|request| match request.path.as_str() {
        LOGIN_PATH => ok(json!({ "access": "a1", "refresh": "r1" })),
        PROFILE_PATH => ok(profile()),
        _ => status(404, json!({})),
    });
    let (state, tokens) = app(transport.clone());
    state.session.initialize().await;

    let user = state.session.login("ana@example.com", "secret").await.unwrap();

    assert_eq!(user.display_name(), "Ana Vera");
    assert_eq!(state.session.status(), SessionStatus::Authenticated);
    assert_eq!(tokens.get(StorageKey::AccessToken).as_deref(), Some("a1"));
    assert_eq!(tokens.get(StorageKey::RefreshToken).as_deref(), Some("r1"));
    assert!(tokens.get(StorageKey::User).unwrap().contains("ana@example.com"));

    let login = &transport.seen()[0];
    assert_eq!(login.body, Some(json!({ "email": "ana@example.com", "password": "secret" })));
    assert_eq!(transport.seen()[1].bearer.as_deref(), Some("a1"));
}

#[tokio::test]
async fn login_failure_surfaces_server_detail() {
    let transport = ScriptedTransport::new(|_| {
        status(401, json!({ "detail": "No active account found with the given credentials" }))
    });
    let (state, tokens) = app(transport.clone());
    state.session.initialize().await;

    let err = state.session.login("ana@example.com", "wrong").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(
        state.session.error().as_deref(),
        Some("No active account found with the given credentials")
    );
    assert_eq!(state.session.status(), SessionStatus::Anonymous);
    assert_eq!(transport.calls_to(REFRESH_PATH), 0);
    assert_eq!(state.navigator.count(), 0);
    assert_eq!(tokens.get(StorageKey::AccessToken), None);
}

#[tokio::test]
async fn login_failure_without_detail_uses_generic_message() {
    let transport = ScriptedTransport::new(|_| status(502, json!("bad gateway")));
    let (state, _) = app(transport);
    state.session.initialize().await;

    assert!(state.session.login("ana@example.com", "secret").await.is_err());
    assert_eq!(state.session.error().as_deref(), Some(LOGIN_ERROR));
}

#[tokio::test]
async fn logout_forgets_everything() {
    let transport = ScriptedTransport::new(|_| ok(profile()));
    let (state, tokens) = app(transport);
    tokens.set(StorageKey::AccessToken, &jwt(3600)).unwrap();
    tokens.set(StorageKey::RefreshToken, "refresh").unwrap();
    state.session.initialize().await;
    assert!(state.session.snapshot().is_authenticated());

    state.session.logout();

    assert_eq!(state.session.status(), SessionStatus::Anonymous);
    assert_eq!(state.session.current_user(), None);
    assert_cleared(tokens.as_ref());
}

#[tokio::test]
async fn profile_update_replaces_user_or_reports_error() {
    let transport = ScriptedTransport::new(|request| match request.body.as_ref() {
        Some(body) if body["nombres"] == "" => status(400, json!({ "nombres": ["This field may not be blank."] })),
        Some(body) => {
            let mut updated = profile();
            updated["nombres"] = body["nombres"].clone();
            ok(updated)
        }
        None => ok(profile()),
    });
    let (state, tokens) = app(transport);
    tokens.set(StorageKey::AccessToken, &jwt(3600)).unwrap();
    state.session.initialize().await;

    let user = state.session.update_profile(&json!({ "nombres": "Ana Maria" })).await.unwrap();
    assert_eq!(user.first_names, "Ana Maria");
    assert_eq!(state.session.current_user().unwrap().first_names, "Ana Maria");

    assert!(state.session.update_profile(&json!({ "nombres": "" })).await.is_err());
    assert_eq!(state.session.error().as_deref(), Some(PROFILE_UPDATE_ERROR));
    assert_eq!(state.session.current_user().unwrap().first_names, "Ana Maria");
}

//=========================================================================================
// Guard and forced logout
//=========================================================================================

#[tokio::test]
async fn guard_waits_for_initialization() {
    let transport = ScriptedTransport::new(|_| ok(profile()));
    let (state, tokens) = app(transport);
    tokens.set(StorageKey::AccessToken, &jwt(3600)).unwrap();

    assert_eq!(state.guard.decide(&state.session.snapshot()), GuardDecision::Pending);

    let session = state.session.clone();
    let init = tokio::spawn(async move { session.initialize().await });
    let decision = state.guard.resolve(&state.session).await;
    init.await.unwrap();

    match decision {
        GuardDecision::Allow(user) => assert_eq!(user.id, 7),
        other => panic!("expected access, got {other:?}"),
    }
}

#[tokio::test]
async fn guard_initializes_the_session_when_nobody_did() {
    let transport = ScriptedTransport::new(|_| ok(profile()));
    let (state, tokens) = app(transport.clone());
    tokens.set(StorageKey::AccessToken, &jwt(3600)).unwrap();

    let decision = tokio::time::timeout(Duration::from_secs(1), state.guard.resolve(&state.session))
        .await
        .expect("guard never resolved");

    assert!(matches!(decision, GuardDecision::Allow(_)));
    assert_eq!(transport.calls_to(PROFILE_PATH), 1);
}

#[tokio::test]
async fn guard_redirects_anonymous_users_to_login() {
    let transport = ScriptedTransport::new(|_| unauthorized());
    let (state, _) = app(transport);
    state.session.initialize().await;

    assert_eq!(
        state.guard.resolve(&state.session).await,
        GuardDecision::Redirect { to: "/login".to_string() }
    );
}

#[tokio::test]
async fn forced_redirect_logs_the_session_out() {
    let transport = ScriptedTransport::new(|request| match request.path.as_str() {
        PROFILE_PATH => ok(profile()),
        _ => unauthorized(),
    });
    let (state, tokens) = app(transport);
    tokens.set(StorageKey::AccessToken, &jwt(3600)).unwrap();
    state.session.initialize().await;
    let watcher = state.watch_forced_logouts();

    // No refresh token is stored, so the 401 cannot be recovered.
    let err = state.http.send(ApiRequest::get("/api/ventas/ventas/")).await.unwrap_err();
    assert!(err.is_unauthorized());

    let mut session = state.session.subscribe();
    tokio::time::timeout(
        Duration::from_secs(1),
        session.wait_for(|s| s.status == SessionStatus::Anonymous),
    )
    .await
    .expect("session was not logged out")
    .unwrap();

    state.shutdown.cancel();
    watcher.await.unwrap();
}
