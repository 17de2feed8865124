// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{Auth, Filter, Query, Row, Selection, TableStore, User};
use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use crate::utils::http_client;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: User,
}

impl Session {
    fn load(path: &PathBuf) -> Option<Session> {
        let raw = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!("ignoring unreadable session at {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Hosted backend client: PostgREST-style tables under `/rest/v1`, GoTrue-style
/// auth under `/auth/v1`.
pub struct RestBackend {
    client: Client,
    base_url: String,
    api_key: String,
    session: RwLock<Option<Session>>,
    session_path: Option<PathBuf>,
}

impl RestBackend {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            session: RwLock::new(None),
            session_path: None,
        }
    }

    pub fn from_config(config: &RemoteConfig, session_path: Option<PathBuf>) -> Result<Self> {
        let mut backend = Self::new(http_client()?, &config.url, &config.anon_key);
        if let Some(path) = session_path {
            let session = Session::load(&path);
            backend.session = RwLock::new(session);
            backend.session_path = Some(path);
        }
        Ok(backend)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn bearer(&self) -> String {
        let guard = self.session.read().unwrap_or_else(|p| p.into_inner());
        match guard.as_ref() {
            Some(s) => s.access_token.clone(),
            None => self.api_key.clone(),
        }
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.api_key)
            .bearer_auth(self.bearer())
    }

    fn store_session(&self, session: Option<Session>) -> Result<()> {
        if let Some(path) = &self.session_path {
            match &session {
                Some(s) => {
                    if let Some(dir) = path.parent() {
                        fs::create_dir_all(dir)?;
                    }
                    write_private(path, serde_json::to_string_pretty(s)?.as_bytes())?;
                }
                None => {
                    if path.exists() {
                        fs::remove_file(path)?;
                    }
                }
            }
        }
        *self.session.write().unwrap_or_else(|p| p.into_inner()) = session;
        Ok(())
    }
}

/// Writes the session file readable by its owner only, since it holds the bearer token.
fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    let mut opts = OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let mut file = opts.open(path)?;
    // `mode` only applies on creation; tighten a file left by older builds.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents)?;
    Ok(())
}

/// Turns a non-success response into `Error::Remote`, keeping the backend's message.
fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|k| v.get(*k).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or(body);
    tracing::debug!(status = status.as_u16(), %message, "backend rejected request");
    Err(Error::Remote {
        status: status.as_u16(),
        message,
    })
}

/// Total from a `Content-Range` header such as `0-9/42` or `*/42`.
pub fn parse_content_range(header: &str) -> Option<u64> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

fn filter_param(f: &Filter) -> (String, String) {
    let op = match f {
        Filter::Ilike(..) => "ilike",
        Filter::Gte(..) => "gte",
        Filter::Lte(..) => "lte",
        Filter::Eq(..) => "eq",
    };
    (f.column().to_string(), format!("{}.{}", op, f.value()))
}

fn first_row(v: Value) -> Result<Row> {
    match v {
        Value::Array(items) => match items.into_iter().next() {
            Some(Value::Object(row)) => Ok(row),
            _ => Ok(Row::new()),
        },
        Value::Object(row) => Ok(row),
        _ => Ok(Row::new()),
    }
}

impl TableStore for RestBackend {
    fn select(&self, table: &str, query: &Query) -> Result<Selection> {
        let mut params: Vec<(String, String)> = vec![("select".into(), "*".into())];
        params.extend(query.filters.iter().map(filter_param));
        if let Some((col, asc)) = &query.order {
            let dir = if *asc { "asc" } else { "desc" };
            params.push(("order".into(), format!("{}.{}", col, dir)));
        }

        let mut req = self.authorized(self.client.get(self.table_url(table)).query(&params));
        if let Some((from, to)) = query.range {
            req = req
                .header("Range-Unit", "items")
                .header("Range", format!("{}-{}", from, to));
        }
        if query.count {
            req = req.header("Prefer", "count=exact");
        }

        let resp = req.send()?;
        let count = resp
            .headers()
            .get("content-range")
            .and_then(|h| h.to_str().ok())
            .and_then(parse_content_range);

        // Asking for a page past the end is not an error for callers.
        if resp.status() == StatusCode::RANGE_NOT_SATISFIABLE {
            tracing::debug!(table, ?count, "requested range past the end");
            return Ok(Selection {
                rows: Vec::new(),
                count: count.or(Some(0)),
            });
        }

        let rows: Vec<Row> = check(resp)?.json()?;
        tracing::debug!(table, rows = rows.len(), ?count, "select");
        Ok(Selection {
            rows,
            count: if query.count { count } else { None },
        })
    }

    fn insert(&self, table: &str, row: Value) -> Result<Row> {
        let resp = self
            .authorized(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&row)
            .send()?;
        first_row(check(resp)?.json()?)
    }

    fn update(&self, table: &str, id: &str, patch: Value) -> Result<()> {
        let resp = self
            .authorized(self.client.patch(self.table_url(table)))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=minimal")
            .json(&patch)
            .send()?;
        check(resp)?;
        Ok(())
    }

    fn delete(&self, table: &str, id: &str) -> Result<()> {
        let resp = self
            .authorized(self.client.delete(self.table_url(table)))
            .query(&[("id", format!("eq.{}", id))])
            .send()?;
        check(resp)?;
        Ok(())
    }

    fn upsert(&self, table: &str, row: Value, on_conflict: &str) -> Result<Row> {
        let resp = self
            .authorized(self.client.post(self.table_url(table)))
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&row)
            .send()?;
        first_row(check(resp)?.json()?)
    }

    fn current_user(&self) -> Result<Option<User>> {
        let has_session = self
            .session
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .is_some();
        if !has_session {
            return Ok(None);
        }
        let resp = self
            .authorized(self.client.get(self.auth_url("user")))
            .send()?;
        if matches!(
            resp.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            tracing::info!("stored session is no longer valid");
            return Ok(None);
        }
        Ok(Some(check(resp)?.json()?))
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: User,
}

impl Auth for RestBackend {
    fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let resp = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()?;
        let token: TokenResponse = check(resp)?.json()?;
        let user = token.user.clone();
        self.store_session(Some(Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            user: token.user,
        }))?;
        tracing::info!(user = %user.id, "signed in");
        Ok(user)
    }

    fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<Option<User>> {
        // The profile row is created server-side from `full_name` in the metadata.
        let resp = self
            .client
            .post(self.auth_url("signup"))
            .header("apikey", &self.api_key)
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "full_name": full_name },
            }))
            .send()?;
        let body: Value = check(resp)?.json()?;
        if body.get("access_token").is_some() {
            let token: TokenResponse = serde_json::from_value(body)?;
            let user = token.user.clone();
            self.store_session(Some(Session {
                access_token: token.access_token,
                refresh_token: token.refresh_token,
                user: token.user,
            }))?;
            return Ok(Some(user));
        }
        tracing::info!(email, "sign-up pending e-mail confirmation");
        Ok(None)
    }

    fn sign_out(&self) -> Result<()> {
        let has_session = self
            .session
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .is_some();
        if has_session {
            let resp = self
                .authorized(self.client.post(self.auth_url("logout")))
                .send()?;
            // An expired token is as good as signed out.
            if resp.status() != StatusCode::UNAUTHORIZED {
                check(resp)?;
            }
        }
        self.store_session(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_range_total() {
        assert_eq!(parse_content_range("0-9/42"), Some(42));
        assert_eq!(parse_content_range("*/7"), Some(7));
        assert_eq!(parse_content_range("0-9/*"), None);
        assert_eq!(parse_content_range("garbage"), None);
    }

    #[test]
    fn filters_encode_as_operator_params() {
        let f = Filter::Ilike("description".into(), "%mercado%".into());
        assert_eq!(
            filter_param(&f),
            ("description".to_string(), "ilike.%mercado%".to_string())
        );
        let f = Filter::Gte("created_at".into(), "2025-01-01".into());
        assert_eq!(filter_param(&f).1, "gte.2025-01-01");
    }

    #[test]
    fn first_row_accepts_array_or_object() {
        let row = first_row(json!([{ "id": "a" }])).unwrap();
        assert_eq!(row.get("id"), Some(&json!("a")));
        let row = first_row(json!({ "id": "b" })).unwrap();
        assert_eq!(row.get("id"), Some(&json!("b")));
        assert!(first_row(json!([])).unwrap().is_empty());
    }

    #[test]
    fn anonymous_backend_has_no_user() {
        let backend = RestBackend::new(Client::new(), "http://localhost:54321/", "anon");
        assert_eq!(backend.table_url("goals"), "http://localhost:54321/rest/v1/goals");
        assert!(backend.current_user().unwrap().is_none());
    }
}
