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

//! Google Sheets backend against an in-process stand-in for the token and
//! values endpoints.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use ccom_types::requests::SubmittedField;
use contact_api::config::ServiceAccountConfig;
use contact_api::sheets::google::{GoogleSheets, SHEETS_SCOPE};
use contact_api::sheets::{CallbackSubmission, ContactSubmission, SheetBackend, SheetError};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::{json, Value};

const ACCESS_TOKEN: &str = "ya29.test-token";

#[derive(Default)]
struct FakeGoogle {
    token_calls: AtomicUsize,
    fail_appends: AtomicBool,
    headers: Mutex<HashMap<String, Vec<String>>>,
    appends: Mutex<Vec<(String, Vec<Vec<String>>)>>,
    public_pem: String,
    token_uri: Mutex<String>,
}

#[derive(Debug, Deserialize)]
struct Assertion {
    iss: String,
    scope: String,
}

async fn token(
    State(fake): State<Arc<FakeGoogle>>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    fake.token_calls.fetch_add(1, Ordering::SeqCst);
    if form.get("grant_type").map(String::as_str)
        != Some("urn:ietf:params:oauth:grant-type:jwt-bearer")
    {
        return Err(StatusCode::BAD_REQUEST);
    }

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[fake.token_uri.lock().unwrap().clone()]);
    let key = DecodingKey::from_rsa_pem(fake.public_pem.as_bytes()).unwrap();
    let claims = decode::<Assertion>(&form["assertion"], &key, &validation)
        .map_err(|_| StatusCode::UNAUTHORIZED)?
        .claims;
    assert_eq!(claims.iss, "forms@ccom.iam.gserviceaccount.com");
    assert_eq!(claims.scope, SHEETS_SCOPE);

    Ok(Json(json!({
        "access_token": ACCESS_TOKEN,
        "expires_in": 3599,
        "token_type": "Bearer"
    })))
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {ACCESS_TOKEN}"))
}

/// `'Sheet name'!1:1` or `'Sheet name':append` to `Sheet name`.
fn sheet_name(range: &str) -> String {
    let quoted = range.split(['!', ':']).next().unwrap_or_default();
    quoted.trim_matches('\'').replace("''", "'")
}

async fn read_values(
    State(fake): State<Arc<FakeGoogle>>,
    Path((spreadsheet, range)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    assert_eq!(spreadsheet, "sheet-123");
    let stored = fake.headers.lock().unwrap();
    Ok(Json(match stored.get(&sheet_name(&range)) {
        Some(row) => json!({ "range": range, "values": [row] }),
        None => json!({ "range": range }),
    }))
}

async fn append_values(
    State(fake): State<Arc<FakeGoogle>>,
    Path((_spreadsheet, range)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    if fake.fail_appends.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    assert!(range.ends_with(":append"));

    let rows: Vec<Vec<String>> = serde_json::from_value(body["values"].clone()).unwrap();
    let sheet = sheet_name(&range);
    fake.headers
        .lock()
        .unwrap()
        .entry(sheet.clone())
        .or_insert_with(|| rows[0].clone());
    fake.appends.lock().unwrap().push((sheet, rows));
    Ok(Json(json!({ "spreadsheetId": "sheet-123" })))
}

fn keypair() -> (String, String) {
    use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey};
    use rsa::RsaPrivateKey;

    let mut rng = rand::thread_rng();
    let private_key = RsaPrivateKey::new(&mut rng, 2048).unwrap();
    let private_pem = private_key
        .to_pkcs8_pem(rsa::pkcs8::LineEnding::LF)
        .unwrap()
        .to_string();
    let public_pem = private_key
        .to_public_key()
        .to_public_key_pem(rsa::pkcs8::LineEnding::LF)
        .unwrap();
    (private_pem, public_pem)
}

async fn start() -> (GoogleSheets, Arc<FakeGoogle>) {
    let (private_pem, public_pem) = keypair();
    let fake = Arc::new(FakeGoogle {
        public_pem,
        ..FakeGoogle::default()
    });

    let app = Router::new()
        .route("/token", post(token))
        .route(
            "/v4/spreadsheets/{spreadsheet}/values/{range}",
            get(read_values).post(append_values),
        )
        .with_state(fake.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    let token_uri = format!("{base}/token");
    *fake.token_uri.lock().unwrap() = token_uri.clone();

    let sheets = GoogleSheets::new(
        reqwest::Client::new(),
        ServiceAccountConfig {
            client_email: "forms@ccom.iam.gserviceaccount.com".to_string(),
            private_key: private_pem,
            token_uri,
            api_base: format!("{base}/v4"),
            spreadsheet_id: "sheet-123".to_string(),
            contact_sheet: "Feuille 1".to_string(),
            callback_sheet: "Rappel".to_string(),
        },
    );
    (sheets, fake)
}

fn contact(fields: &[(&str, &str)]) -> ContactSubmission {
    ContactSubmission {
        timestamp: "05/03/2025 09:30".to_string(),
        formula_id: "cpro".to_string(),
        formula_label: None,
        fields: fields
            .iter()
            .map(|(key, value)| SubmittedField {
                key: key.to_string(),
                value: value.to_string(),
            })
            .collect(),
        entries: None,
    }
}

#[tokio::test]
async fn test_first_contact_writes_header_row_then_follows_it() {
    let (sheets, fake) = start().await;

    sheets
        .append_contact(&contact(&[("nom", "Jeanne"), ("email", "j@d.fr")]))
        .await
        .unwrap();
    sheets
        .append_contact(&contact(&[("email", "a@b.fr"), ("videos", "2")]))
        .await
        .unwrap();

    let appends = fake.appends.lock().unwrap();
    assert_eq!(appends.len(), 2);
    assert_eq!(appends[0].0, "Feuille 1");
    assert_eq!(
        appends[0].1,
        vec![
            vec!["Date Demande", "Formule", "nom", "email"],
            vec!["05/03/2025 09:30", "cpro", "Jeanne", "j@d.fr"],
        ]
    );
    assert_eq!(
        appends[1].1,
        vec![vec!["05/03/2025 09:30", "cpro", "", "a@b.fr"]]
    );

    assert_eq!(fake.token_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_callback_row_goes_to_callback_sheet() {
    let (sheets, fake) = start().await;

    sheets
        .append_callback(&CallbackSubmission {
            timestamp: "05/03/2025 09:30".to_string(),
            name: "Léa".to_string(),
            phone: "0601020304".to_string(),
        })
        .await
        .unwrap();

    let appends = fake.appends.lock().unwrap();
    assert_eq!(appends[0].0, "Rappel");
    assert_eq!(
        appends[0].1,
        vec![vec!["05/03/2025 09:30", "Léa", "0601020304"]]
    );
}

#[tokio::test]
async fn test_upstream_error_surfaces_status() {
    let (sheets, fake) = start().await;
    fake.fail_appends.store(true, Ordering::SeqCst);

    let err = sheets
        .append_callback(&CallbackSubmission {
            timestamp: "05/03/2025 09:30".to_string(),
            name: "Léa".to_string(),
            phone: "0601".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, SheetError::Status { status: 500, .. }));
}
