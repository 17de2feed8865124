// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Table-oriented access to the finance backend.
//!
//! Everything above this module talks to a [`TableStore`]: a hosted backend
//! over HTTP ([`RestBackend`]) or the embedded SQLite mirror of the same
//! tables ([`SqliteStore`]). Handles are built once and passed down.

pub mod rest;
pub mod sqlite;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::Config;
use crate::error::Result;

pub use rest::RestBackend;
pub use sqlite::SqliteStore;

pub type Row = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Case-insensitive pattern match, `%` as wildcard.
    Ilike(String, String),
    Gte(String, String),
    Lte(String, String),
    Eq(String, String),
}

impl Filter {
    pub fn column(&self) -> &str {
        match self {
            Filter::Ilike(c, _) | Filter::Gte(c, _) | Filter::Lte(c, _) | Filter::Eq(c, _) => c,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Filter::Ilike(_, v) | Filter::Gte(_, v) | Filter::Lte(_, v) | Filter::Eq(_, v) => v,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Option<(String, bool)>,
    /// Inclusive row range, zero based.
    pub range: Option<(u64, u64)>,
    pub count: bool,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ilike(mut self, column: &str, pattern: impl Into<String>) -> Self {
        self.filters
            .push(Filter::Ilike(column.to_string(), pattern.into()));
        self
    }

    pub fn gte(mut self, column: &str, value: impl Into<String>) -> Self {
        self.filters.push(Filter::Gte(column.to_string(), value.into()));
        self
    }

    pub fn lte(mut self, column: &str, value: impl Into<String>) -> Self {
        self.filters.push(Filter::Lte(column.to_string(), value.into()));
        self
    }

    pub fn eq(mut self, column: &str, value: impl Into<String>) -> Self {
        self.filters.push(Filter::Eq(column.to_string(), value.into()));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some((column.to_string(), ascending));
        self
    }

    pub fn range(mut self, from: u64, to: u64) -> Self {
        self.range = Some((from, to));
        self
    }

    pub fn exact_count(mut self) -> Self {
        self.count = true;
        self
    }
}

/// Rows returned by a select, plus the server-side total when one was asked for.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub rows: Vec<Row>,
    pub count: Option<u64>,
}

impl Selection {
    pub fn decode<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        self.rows
            .into_iter()
            .map(|r| serde_json::from_value(Value::Object(r)).map_err(Into::into))
            .collect()
    }
}

/// Row-level CRUD surface. Each call is one remote operation; failures are
/// returned as-is and never retried.
pub trait TableStore: Send + Sync {
    fn select(&self, table: &str, query: &Query) -> Result<Selection>;

    /// Inserts one row and returns it as stored (with generated id and timestamps).
    fn insert(&self, table: &str, row: Value) -> Result<Row>;

    fn update(&self, table: &str, id: &str, patch: Value) -> Result<()>;

    fn delete(&self, table: &str, id: &str) -> Result<()>;

    fn upsert(&self, table: &str, row: Value, on_conflict: &str) -> Result<Row>;

    fn current_user(&self) -> Result<Option<User>>;
}

pub trait Auth {
    fn sign_in(&self, email: &str, password: &str) -> Result<User>;

    /// Returns `None` when the account still needs e-mail confirmation.
    fn sign_up(&self, email: &str, password: &str, full_name: Option<&str>)
    -> Result<Option<User>>;

    fn sign_out(&self) -> Result<()>;
}

/// The backend chosen by configuration.
pub enum Backend {
    Remote(RestBackend),
    Local(SqliteStore),
}

impl Backend {
    pub fn connect(config: &Config) -> Result<Self> {
        match &config.remote {
            Some(remote) => {
                tracing::debug!(url = %remote.url, "using hosted backend");
                Ok(Backend::Remote(RestBackend::from_config(
                    remote,
                    Some(crate::db::session_path()?),
                )?))
            }
            None => {
                tracing::debug!("no backend url configured; using local store");
                let conn = crate::db::open_or_init()?;
                let user = User {
                    id: config.local.user_id.clone(),
                    email: config.local.email.clone(),
                };
                SqliteStore::new(conn)?.with_user(user).map(Backend::Local)
            }
        }
    }

    pub fn store(&self) -> &dyn TableStore {
        match self {
            Backend::Remote(b) => b,
            Backend::Local(s) => s,
        }
    }

    pub fn auth(&self) -> Option<&dyn Auth> {
        match self {
            Backend::Remote(b) => Some(b),
            Backend::Local(_) => None,
        }
    }
}
