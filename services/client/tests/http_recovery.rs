mod support;

use serde_json::json;
use sysfree_client::http::REFRESH_PATH;
use sysfree_core::domain::StorageKey;
use sysfree_core::ports::TokenStore;
use sysfree_core::wire::ApiRequest;
use support::{app, ok, status, unauthorized, ScriptedTransport};

const SALES: &str = "/api/ventas/ventas/";

#[tokio::test]
async fn expired_access_token_is_refreshed_and_request_retried() {
    let transport = ScriptedTransport::new(|request| match request.path.as_str() {
        REFRESH_PATH => ok(json!({ "access": "new" })),
        _ if request.bearer.as_deref() == Some("new") => ok(json!({ "results": [], "count": 0 })),
        _ => unauthorized(),
    });
    let (state, tokens) = app(transport.clone());
    tokens.set(StorageKey::AccessToken, "old").unwrap();
    tokens.set(StorageKey::RefreshToken, "refresh").unwrap();

    let response = state.http.send(ApiRequest::get(SALES)).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(transport.calls_to(REFRESH_PATH), 1);
    assert_eq!(transport.calls_to(SALES), 2);
    assert_eq!(tokens.get(StorageKey::AccessToken).as_deref(), Some("new"));

    let refresh = &transport.seen()[1];
    assert_eq!(refresh.body, Some(json!({ "refresh": "refresh" })));
    assert_eq!(refresh.bearer, None);
    assert_eq!(state.navigator.count(), 0);
}

#[tokio::test]
async fn request_is_retried_at_most_once() {
    let transport = ScriptedTransport::new(|request| match request.path.as_str() {
        REFRESH_PATH => ok(json!({ "access": "still-bad" })),
        _ => unauthorized(),
    });
    let (state, tokens) = app(transport.clone());
    tokens.set(StorageKey::AccessToken, "old").unwrap();
    tokens.set(StorageKey::RefreshToken, "refresh").unwrap();

    let err = state.http.send(ApiRequest::get(SALES)).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(transport.calls_to(SALES), 2);
    assert_eq!(transport.calls_to(REFRESH_PATH), 1);
    let retried = &transport.seen()[2];
    assert_eq!(retried.bearer.as_deref(), Some("still-bad"));
    assert!(retried.retried);
}

#[tokio::test]
async fn failed_refresh_tears_the_session_down() {
    let transport = ScriptedTransport::new(|request| match request.path.as_str() {
        REFRESH_PATH => status(401, json!({ "detail": "Token is blacklisted" })),
        _ => unauthorized(),
    });
    let (state, tokens) = app(transport.clone());
    tokens.set(StorageKey::AccessToken, "old").unwrap();
    tokens.set(StorageKey::RefreshToken, "refresh").unwrap();
    tokens.set(StorageKey::User, "{}").unwrap();

    let err = state.http.send(ApiRequest::get(SALES)).await.unwrap_err();

    assert_eq!(err.detail(), Some("Token is blacklisted"));
    assert_eq!(transport.calls_to(SALES), 1);
    for key in StorageKey::ALL {
        assert_eq!(tokens.get(key), None);
    }
    assert_eq!(state.navigator.count(), 1);
}

#[tokio::test]
async fn concurrent_rejections_share_one_refresh() {
    let transport = ScriptedTransport::new(|request| match request.path.as_str() {
        REFRESH_PATH => ok(json!({ "access": "new" })),
        _ if request.bearer.as_deref() == Some("new") => ok(json!({})),
        _ => unauthorized(),
    });
    let (state, tokens) = app(transport.clone());
    tokens.set(StorageKey::AccessToken, "old").unwrap();
    tokens.set(StorageKey::RefreshToken, "refresh").unwrap();

    let (sales, customers) = tokio::join!(
        state.http.send(ApiRequest::get(SALES)),
        state.http.send(ApiRequest::get("/api/clientes/clientes/")),
    );

    assert!(sales.is_ok());
    assert!(customers.is_ok());
    assert_eq!(transport.calls_to(REFRESH_PATH), 1);
    assert_eq!(state.navigator.count(), 0);
}

#[tokio::test]
async fn services_go_through_the_same_pipeline() {
    let transport = ScriptedTransport::new(|request| {
        assert_eq!(request.bearer.as_deref(), Some("token"));
        match request.path.as_str() {
            "/api/ventas/ventas/15/registrar_pago/" => ok(json!({ "id": 99, "monto": "20.00" })),
            "/api/tienda/carrito/" => ok(json!({ "items": [] })),
            _ => status(404, json!({ "detail": "Not found." })),
        }
    });
    let (state, tokens) = app(transport.clone());
    tokens.set(StorageKey::AccessToken, "token").unwrap();

    let payment = state
        .api
        .sales()
        .register_payment(15, &json!({ "metodo": "efectivo", "monto": 20 }))
        .await
        .unwrap();
    assert_eq!(payment["id"], 99);

    state.api.storefront().empty_cart().await.unwrap();

    let missing = state.api.inventory().products().get(404).await.unwrap_err();
    assert_eq!(missing.status(), Some(404));
    assert_eq!(missing.detail(), Some("Not found."));
}
