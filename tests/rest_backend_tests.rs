// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fluxo::backend::{Auth, RestBackend, TableStore};
use fluxo::config::RemoteConfig;
use fluxo::data::{Entity, MutationKind, TransactionQuery, query_transactions, upsert_alert_settings};
use fluxo::error::Error;
use fluxo::models::{AlertSettings, TransactionKind};
use mockito::{Matcher, Server};
use reqwest::blocking::Client;
use serde_json::json;
use tempfile::tempdir;

fn anonymous(server: &Server) -> RestBackend {
    RestBackend::new(Client::new(), &server.url(), "anon")
}

fn token_body() -> String {
    json!({
        "access_token": "tok",
        "refresh_token": "ref",
        "user": { "id": "u1", "email": "ana@fluxo.app" },
    })
    .to_string()
}

#[test]
fn select_sends_range_and_reads_the_total() {
    let mut server = Server::new();
    let m = server
        .mock("GET", "/rest/v1/transactions")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "*".into()),
            Matcher::UrlEncoded("order".into(), "created_at.desc".into()),
            Matcher::UrlEncoded("description".into(), "ilike.%mercado%".into()),
        ]))
        .match_header("apikey", "anon")
        .match_header("authorization", "Bearer anon")
        .match_header("range-unit", "items")
        .match_header("range", "0-1")
        .match_header("prefer", "count=exact")
        .with_status(206)
        .with_header("content-range", "0-1/5")
        .with_body(
            json!([
                { "id": "t1", "description": "Mercado", "subtitle": null, "amount": "-50",
                  "type": "expense", "category": "Casa", "created_at": "2025-04-02T10:00:00Z" },
                { "id": "t2", "description": "Mercado Sul", "subtitle": null, "amount": -12.5,
                  "type": "expense", "category": null, "created_at": "2025-04-01T10:00:00Z" },
            ])
            .to_string(),
        )
        .create();

    let backend = anonymous(&server);
    let q = TransactionQuery {
        page: 1,
        page_size: 2,
        search: Some("mercado".into()),
        ..TransactionQuery::default()
    };
    let page = query_transactions(&backend, &q).unwrap();
    m.assert();
    assert_eq!(page.count, 5);
    assert_eq!(page.page_count(2), 3);
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0].amount, -50.0);
    assert_eq!(page.data[0].kind, TransactionKind::Expense);
    assert_eq!(page.data[1].category, None);
}

#[test]
fn range_not_satisfiable_is_an_empty_page_with_the_count() {
    let mut server = Server::new();
    let m = server
        .mock("GET", "/rest/v1/transactions")
        .match_query(Matcher::Any)
        .match_header("range", "30-39")
        .with_status(416)
        .with_header("content-range", "*/23")
        .with_body(r#"{"message":"Requested range not satisfiable"}"#)
        .create();

    let backend = anonymous(&server);
    let q = TransactionQuery {
        page: 4,
        page_size: 10,
        ..TransactionQuery::default()
    };
    let page = query_transactions(&backend, &q).unwrap();
    m.assert();
    assert!(page.data.is_empty());
    assert_eq!(page.count, 23);
}

#[test]
fn rejected_writes_carry_status_and_message() {
    let mut server = Server::new();
    let _conflict = server
        .mock("POST", "/rest/v1/goals")
        .match_header("prefer", "return=representation")
        .with_status(409)
        .with_body(r#"{"code":"23505","message":"duplicate key value"}"#)
        .create();
    let _gateway = server
        .mock("DELETE", "/rest/v1/goals")
        .match_query(Matcher::UrlEncoded("id".into(), "eq.g1".into()))
        .with_status(502)
        .with_body("Bad gateway")
        .create();

    let backend = anonymous(&server);
    match backend.insert("goals", json!({ "title": "Viagem" })) {
        Err(Error::Remote { status, message }) => {
            assert_eq!(status, 409);
            assert_eq!(message, "duplicate key value");
        }
        other => panic!("expected a remote error, got {:?}", other),
    }
    match backend.delete("goals", "g1") {
        Err(Error::Remote { status, message }) => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad gateway");
        }
        other => panic!("expected a remote error, got {:?}", other),
    }
}

#[test]
fn upsert_merges_on_the_conflict_column() {
    let mut server = Server::new();
    let _login = server
        .mock("POST", "/auth/v1/token")
        .match_query(Matcher::UrlEncoded("grant_type".into(), "password".into()))
        .with_status(200)
        .with_body(token_body())
        .create();
    let _user = server
        .mock("GET", "/auth/v1/user")
        .match_header("authorization", "Bearer tok")
        .with_status(200)
        .with_body(r#"{"id":"u1","email":"ana@fluxo.app"}"#)
        .create();
    let upsert = server
        .mock("POST", "/rest/v1/alert_settings")
        .match_query(Matcher::UrlEncoded("on_conflict".into(), "user_id".into()))
        .match_header("authorization", "Bearer tok")
        .match_header("prefer", "resolution=merge-duplicates,return=representation")
        .match_body(Matcher::PartialJson(json!({
            "user_id": "u1",
            "limit_percent": 80.0,
            "subscriptions_budget": 150.0,
        })))
        .with_status(201)
        .with_body(r#"[{"id":"a1","user_id":"u1","limit_percent":80,"subscriptions_budget":150}]"#)
        .create();

    let backend = anonymous(&server);
    backend.sign_in("ana@fluxo.app", "secret").unwrap();
    let settings = AlertSettings {
        limit_percent: 80.0,
        subscriptions_budget: 150.0,
    };
    let mutation = upsert_alert_settings(&backend, &settings).unwrap();
    upsert.assert();
    assert_eq!(mutation.entity, Entity::AlertSettings);
    assert_eq!(mutation.kind, MutationKind::Upserted);
    assert_eq!(mutation.id.as_deref(), Some("a1"));
}

#[test]
fn session_file_follows_sign_in_and_sign_out() {
    let mut server = Server::new();
    let dir = tempdir().unwrap();
    let path = dir.path().join("fluxo").join("session.json");
    let config = RemoteConfig {
        url: server.url(),
        anon_key: "anon".into(),
    };

    let _login = server
        .mock("POST", "/auth/v1/token")
        .match_query(Matcher::UrlEncoded("grant_type".into(), "password".into()))
        .match_header("apikey", "anon")
        .match_body(Matcher::PartialJson(json!({ "email": "ana@fluxo.app" })))
        .with_status(200)
        .with_body(token_body())
        .create();
    let backend = RestBackend::from_config(&config, Some(path.clone())).unwrap();
    let user = backend.sign_in("ana@fluxo.app", "secret").unwrap();
    assert_eq!(user.id, "u1");

    let stored = std::fs::read_to_string(&path).unwrap();
    assert!(stored.contains("\"access_token\": \"tok\""));
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    // A fresh handle picks the token up from disk.
    let me = server
        .mock("GET", "/auth/v1/user")
        .match_header("authorization", "Bearer tok")
        .with_status(200)
        .with_body(r#"{"id":"u1","email":"ana@fluxo.app"}"#)
        .create();
    let reopened = RestBackend::from_config(&config, Some(path.clone())).unwrap();
    assert_eq!(reopened.current_user().unwrap().map(|u| u.id).as_deref(), Some("u1"));
    me.assert();

    let logout = server
        .mock("POST", "/auth/v1/logout")
        .match_header("authorization", "Bearer tok")
        .with_status(204)
        .create();
    reopened.sign_out().unwrap();
    logout.assert();
    assert!(!path.exists());
    assert!(reopened.current_user().unwrap().is_none());
}

#[test]
fn expired_session_reads_as_signed_out() {
    let mut server = Server::new();
    let _login = server
        .mock("POST", "/auth/v1/token")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(token_body())
        .create();
    let _expired = server
        .mock("GET", "/auth/v1/user")
        .with_status(401)
        .with_body(r#"{"msg":"JWT expired"}"#)
        .create();

    let backend = anonymous(&server);
    backend.sign_in("ana@fluxo.app", "secret").unwrap();
    assert!(backend.current_user().unwrap().is_none());
    assert!(matches!(
        upsert_alert_settings(&backend, &AlertSettings::default()),
        Err(Error::NotAuthenticated)
    ));
}
