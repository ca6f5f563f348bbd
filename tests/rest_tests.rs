// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use fintrack::models::{Transaction, TransactionPatch, TxKind, User};
use fintrack::store::rest::{RestStore, Session, api_error, transactions_query};
use fintrack::store::{RemoteStore, StoreError, TxQuery};
use uuid::Uuid;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn session(expires_at: i64) -> Session {
    Session {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        expires_at,
        user: User {
            id: Uuid::nil(),
            email: Some("me@example.com".to_string()),
            full_name: None,
        },
    }
}

fn pairs(q: &TxQuery) -> String {
    transactions_query(q)
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

#[test]
fn window_query_matches_postgrest_filters() {
    let q = TxQuery::window(date("2024-09-01"), date("2025-02-28"));
    assert_eq!(
        pairs(&q),
        "select=*&date=gte.2024-09-01&date=lte.2025-02-28&order=date.asc"
    );
}

#[test]
fn ledger_query_orders_descending_with_limit() {
    let q = TxQuery::ledger().with_limit(Some(20));
    assert_eq!(pairs(&q), "select=*&order=date.desc&limit=20");
}

#[test]
fn api_error_reads_known_message_fields() {
    let e = api_error(400, r#"{"code":"22P02","message":"invalid input syntax"}"#);
    assert!(matches!(
        e,
        StoreError::Api { status: 400, ref message } if message == "invalid input syntax"
    ));

    let e = api_error(
        400,
        r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
    );
    assert_eq!(e.to_string(), "Invalid login credentials (HTTP 400)");

    let e = api_error(422, r#"{"msg":"Password should be at least 6 characters"}"#);
    assert_eq!(
        e.to_string(),
        "Password should be at least 6 characters (HTTP 422)"
    );
}

#[test]
fn api_error_falls_back_to_body_or_status() {
    assert_eq!(
        api_error(502, "  Bad Gateway \n").to_string(),
        "Bad Gateway (HTTP 502)"
    );
    assert_eq!(
        api_error(500, "").to_string(),
        "request failed with status 500 (HTTP 500)"
    );
}

#[test]
fn session_refresh_margin() {
    let s = session(1_000);
    assert!(!s.expires_soon(900));
    assert!(s.expires_soon(940));
    assert!(s.expires_soon(2_000));
}

#[test]
fn session_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");
    assert_eq!(Session::load(&path).unwrap(), None);

    let s = session(1_700_000_000);
    s.save(&path).unwrap();
    assert_eq!(Session::load(&path).unwrap(), Some(s));
}

#[test]
fn store_without_session_reports_signed_out() {
    let store = RestStore::new("https://example.invalid/", "anon", None).unwrap();
    assert_eq!(store.current_user().unwrap(), None);
    assert!(matches!(
        store.select_transactions(&TxQuery::ledger()),
        Err(StoreError::NotSignedIn)
    ));
    assert!(matches!(
        store.delete_transaction(Uuid::nil()),
        Err(StoreError::NotSignedIn)
    ));
}

#[test]
fn sign_out_without_session_clears_session_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let store =
        RestStore::with_session_file("https://example.invalid", "anon", path.clone()).unwrap();
    store.sign_out().unwrap();
    assert!(!path.exists());
    assert_eq!(store.session(), None);
}

#[test]
fn rows_decode_from_postgrest_json() {
    let body = r#"[{
        "id": "8d6b2f7e-0c4e-4b8a-9a57-0a3d1f6c2e11",
        "user_id": "00000000-0000-0000-0000-000000000000",
        "amount": 42.5,
        "type": "expense",
        "category": null,
        "description": null,
        "date": "2025-01-20",
        "recurring": null,
        "created_at": "2025-01-20T10:00:00+00:00"
    }]"#;
    let rows: Vec<Transaction> = serde_json::from_str(body).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, TxKind::Expense);
    assert_eq!(rows[0].amount, "42.5".parse().unwrap());
    assert_eq!(rows[0].category, None);
    assert_eq!(rows[0].description, "");
    assert!(!rows[0].recurring);
}

#[test]
fn patch_serializes_only_set_fields() {
    let patch = TransactionPatch {
        kind: Some(TxKind::Income),
        recurring: Some(false),
        ..Default::default()
    };
    assert_eq!(
        serde_json::to_value(&patch).unwrap(),
        serde_json::json!({ "type": "income", "recurring": false })
    );
}
