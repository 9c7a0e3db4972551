/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use ccom_types::error::GENERIC_FAILURE_MESSAGE;
use ccom_types::requests::{CallbackRequest, ContactRequest};
use contact_client::{FormsClient, FormsError, SubmitState};
use serde_json::{json, Value};
use tokio::sync::Notify;

#[derive(Default)]
struct Site {
    received: Mutex<Vec<Value>>,
    release: Notify,
}

async fn contact(
    State(site): State<Arc<Site>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if body.get("formulaId").is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "code": "MISSING_FORMULA",
                "message": "Formule manquante dans la demande."
            })),
        );
    }
    site.received.lock().unwrap().push(body);
    (StatusCode::OK, Json(json!({ "success": true })))
}

async fn bad_gateway() -> (StatusCode, &'static str) {
    (StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>")
}

async fn held_callback(State(site): State<Arc<Site>>) -> Json<Value> {
    site.release.notified().await;
    Json(json!({ "success": true }))
}

async fn serve(app: Router<Arc<Site>>) -> (FormsClient, Arc<Site>) {
    let site = Arc::new(Site::default());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}/", listener.local_addr().unwrap());
    let app = app.with_state(site.clone());
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    (FormsClient::new(&base), site)
}

fn contact_request() -> ContactRequest {
    serde_json::from_value(json!({
        "formulaId": "cpro",
        "formulaLabel": "C'Pro",
        "entries": [{ "id": "email", "label": "Email", "value": "jeanne@ccom.fr" }]
    }))
    .unwrap()
}

fn callback_request() -> CallbackRequest {
    CallbackRequest {
        name: Some("Léa".to_string()),
        phone: Some("0601020304".to_string()),
    }
}

#[tokio::test]
async fn test_contact_is_posted_as_json() {
    let (client, site) = serve(Router::new().route("/api/contact", post(contact))).await;
    let button = SubmitState::new();

    client.send_contact(&button, &contact_request()).await.unwrap();

    assert!(!button.is_submitting());
    let received = site.received.lock().unwrap();
    assert_eq!(received[0]["formulaId"], "cpro");
    assert_eq!(received[0]["entries"][0]["value"], "jeanne@ccom.fr");
}

#[tokio::test]
async fn test_rejection_carries_server_message() {
    let (client, _site) = serve(Router::new().route("/api/contact", post(contact))).await;
    let button = SubmitState::new();

    let err = client
        .send_contact(&button, &ContactRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, FormsError::Rejected { status: 400, .. }));
    assert_eq!(err.code(), Some("MISSING_FORMULA"));
    assert_eq!(err.user_message(), "Formule manquante dans la demande.");
    assert!(!button.is_submitting());
}

#[tokio::test]
async fn test_non_json_failure_uses_generic_message() {
    let (client, _site) = serve(Router::new().route("/api/callback", post(bad_gateway))).await;

    let err = client.submit_callback(&callback_request()).await.unwrap_err();

    assert!(matches!(err, FormsError::ServerError { status: 502, .. }));
    assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
}

#[tokio::test]
async fn test_network_failure_re_enables_button() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = FormsClient::new(&format!("http://{addr}"));
    let button = SubmitState::new();
    let err = client
        .send_callback(&button, &callback_request())
        .await
        .unwrap_err();

    assert!(matches!(err, FormsError::Network(_)));
    assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    assert!(!button.is_submitting());
}

#[tokio::test]
async fn test_second_submit_while_in_flight_is_refused() {
    let (client, site) = serve(Router::new().route("/api/callback", post(held_callback))).await;
    let button = SubmitState::new();

    let in_flight = {
        let client = client.clone();
        let button = button.clone();
        tokio::spawn(async move { client.send_callback(&button, &callback_request()).await })
    };
    while !button.is_submitting() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let err = client
        .send_callback(&button, &callback_request())
        .await
        .unwrap_err();
    assert!(matches!(err, FormsError::Busy));
    assert!(button.is_submitting());

    site.release.notify_one();
    in_flight.await.unwrap().unwrap();
    assert!(!button.is_submitting());
}
