// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::{Mutex, MutexGuard, RwLock};

use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, params, params_from_iter};
use serde_json::{Number, Value};

use super::{Filter, Query, Row, Selection, TableStore, User};
use crate::db::init_schema;
use crate::error::{Error, Result};

const TABLES: &[&str] = &[
    "profiles",
    "transactions",
    "credit_cards",
    "goals",
    "planned_expenses",
    "investment_allocations",
    "investment_returns",
    "alert_settings",
];

static IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").unwrap());

/// Embedded store with the hosted tables' shape. Rows are scoped to the
/// signed-in user the way the hosted row-level policies scope them.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    user: RwLock<Option<User>>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            user: RwLock::new(None),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    /// Signs `user` in and makes sure their profile row exists.
    pub fn with_user(self, user: User) -> Result<Self> {
        self.set_user(Some(user))?;
        Ok(self)
    }

    pub fn set_user(&self, user: Option<User>) -> Result<()> {
        if let Some(u) = &user {
            self.lock().execute(
                "INSERT OR IGNORE INTO profiles(id, email) VALUES (?1, ?2)",
                params![u.id, u.email],
            )?;
        }
        *self.user.write().unwrap_or_else(|p| p.into_inner()) = user;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn user_id(&self) -> Option<String> {
        self.user
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .as_ref()
            .map(|u| u.id.clone())
    }
}

fn owner_column(table: &str) -> &'static str {
    if table == "profiles" { "id" } else { "user_id" }
}

fn check_table(table: &str) -> Result<()> {
    if TABLES.contains(&table) {
        Ok(())
    } else {
        Err(Error::Remote {
            status: 404,
            message: format!("relation \"public.{}\" does not exist", table),
        })
    }
}

fn check_column(column: &str) -> Result<()> {
    if IDENT.is_match(column) {
        Ok(())
    } else {
        Err(Error::Remote {
            status: 400,
            message: format!("invalid column name '{}'", column),
        })
    }
}

fn rls_violation(table: &str) -> Error {
    Error::Remote {
        status: 403,
        message: format!(
            "new row violates row-level security policy for table \"{}\"",
            table
        ),
    }
}

fn to_sql(v: &Value) -> SqlValue {
    match v {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(*b as i64),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map(SqlValue::Real).unwrap_or(SqlValue::Null),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn to_json(v: ValueRef<'_>) -> Value {
    match v {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(_) => Value::Null,
    }
}

fn object(table: &str, row: Value) -> Result<Row> {
    match row {
        Value::Object(map) => {
            for k in map.keys() {
                check_column(k)?;
            }
            Ok(map)
        }
        _ => Err(Error::Remote {
            status: 400,
            message: format!("expected a JSON object for {}", table),
        }),
    }
}

/// WHERE clause and parameters for the filters plus the owner scope.
fn where_clause(owner: &str, user: &str, filters: &[Filter]) -> Result<(String, Vec<SqlValue>)> {
    let mut sql = format!(" WHERE {}=?", owner);
    let mut binds = vec![SqlValue::Text(user.to_string())];
    for f in filters {
        check_column(f.column())?;
        let clause = match f {
            Filter::Ilike(c, _) => format!(" AND lower({}) LIKE lower(?)", c),
            Filter::Gte(c, _) => format!(" AND {}>=?", c),
            Filter::Lte(c, _) => format!(" AND {}<=?", c),
            Filter::Eq(c, _) => format!(" AND {}=?", c),
        };
        sql.push_str(&clause);
        binds.push(SqlValue::Text(f.value().to_string()));
    }
    Ok((sql, binds))
}

fn read_rows(stmt: &mut rusqlite::Statement<'_>, binds: &[SqlValue]) -> Result<Vec<Row>> {
    let names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
    let mut cur = stmt.query(params_from_iter(binds.iter()))?;
    let mut out = Vec::new();
    while let Some(r) = cur.next()? {
        let mut row = Row::new();
        for (i, name) in names.iter().enumerate() {
            row.insert(name.clone(), to_json(r.get_ref(i)?));
        }
        out.push(row);
    }
    Ok(out)
}

impl TableStore for SqliteStore {
    fn select(&self, table: &str, query: &Query) -> Result<Selection> {
        check_table(table)?;
        // Anonymous callers see nothing, as with the hosted policies.
        let Some(user) = self.user_id() else {
            return Ok(Selection {
                rows: Vec::new(),
                count: query.count.then_some(0),
            });
        };
        let (clause, binds) = where_clause(owner_column(table), &user, &query.filters)?;
        let conn = self.lock();

        let count = if query.count {
            let sql = format!("SELECT COUNT(*) FROM {}{}", table, clause);
            let n: i64 = conn.query_row(&sql, params_from_iter(binds.iter()), |r| r.get(0))?;
            Some(n.max(0) as u64)
        } else {
            None
        };

        let mut sql = format!("SELECT * FROM {}{}", table, clause);
        if let Some((col, asc)) = &query.order {
            check_column(col)?;
            let dir = if *asc { "ASC" } else { "DESC" };
            sql.push_str(&format!(" ORDER BY {} {}, rowid {}", col, dir, dir));
        }
        if let Some((from, to)) = query.range {
            // SQLite offsets are signed; anything larger is past the last row.
            let Ok(offset) = i64::try_from(from) else {
                return Ok(Selection { rows: Vec::new(), count });
            };
            let limit = i64::try_from(to.saturating_sub(from))
                .map_or(i64::MAX, |n| n.saturating_add(1));
            sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));
        }

        let mut stmt = conn.prepare(&sql)?;
        let rows = read_rows(&mut stmt, &binds)?;
        tracing::trace!(table, rows = rows.len(), ?count, "local select");
        Ok(Selection { rows, count })
    }

    fn insert(&self, table: &str, row: Value) -> Result<Row> {
        check_table(table)?;
        let row = object(table, row)?;
        let owner = owner_column(table);
        match (self.user_id(), row.get(owner).and_then(Value::as_str)) {
            (Some(u), Some(o)) if u == o => {}
            _ => return Err(rls_violation(table)),
        }

        let cols: Vec<&str> = row.keys().map(String::as_str).collect();
        let marks = vec!["?"; cols.len()].join(",");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
            table,
            cols.join(","),
            marks
        );
        let binds: Vec<SqlValue> = row.values().map(to_sql).collect();
        let conn = self.lock();
        let mut stmt = conn.prepare(&sql)?;
        let mut stored = read_rows(&mut stmt, &binds)?;
        tracing::debug!(table, "local insert");
        Ok(stored.pop().unwrap_or_default())
    }

    fn update(&self, table: &str, id: &str, patch: Value) -> Result<()> {
        check_table(table)?;
        let patch = object(table, patch)?;
        let Some(user) = self.user_id() else {
            return Ok(());
        };
        if patch.is_empty() {
            return Ok(());
        }
        let sets: Vec<String> = patch.keys().map(|k| format!("{}=?", k)).collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id=? AND {}=?",
            table,
            sets.join(","),
            owner_column(table)
        );
        let mut binds: Vec<SqlValue> = patch.values().map(to_sql).collect();
        binds.push(SqlValue::Text(id.to_string()));
        binds.push(SqlValue::Text(user));
        let n = self.lock().execute(&sql, params_from_iter(binds.iter()))?;
        tracing::debug!(table, id, affected = n, "local update");
        Ok(())
    }

    fn delete(&self, table: &str, id: &str) -> Result<()> {
        check_table(table)?;
        let Some(user) = self.user_id() else {
            return Ok(());
        };
        let sql = format!("DELETE FROM {} WHERE id=?1 AND {}=?2", table, owner_column(table));
        let n = self.lock().execute(&sql, params![id, user])?;
        tracing::debug!(table, id, affected = n, "local delete");
        Ok(())
    }

    fn upsert(&self, table: &str, row: Value, on_conflict: &str) -> Result<Row> {
        check_table(table)?;
        check_column(on_conflict)?;
        let row = object(table, row)?;
        let owner = owner_column(table);
        match (self.user_id(), row.get(owner).and_then(Value::as_str)) {
            (Some(u), Some(o)) if u == o => {}
            _ => return Err(rls_violation(table)),
        }

        let cols: Vec<&str> = row.keys().map(String::as_str).collect();
        let marks = vec!["?"; cols.len()].join(",");
        let updates: Vec<String> = cols
            .iter()
            .filter(|c| **c != on_conflict)
            .map(|c| format!("{}=excluded.{}", c, c))
            .collect();
        // The existing row must already belong to the caller.
        let action = if updates.is_empty() {
            "NOTHING".to_string()
        } else {
            format!(
                "UPDATE SET {} WHERE {}.{}=excluded.{}",
                updates.join(","),
                table,
                owner,
                owner
            )
        };
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT({}) DO {} RETURNING *",
            table,
            cols.join(","),
            marks,
            on_conflict,
            action
        );
        let binds: Vec<SqlValue> = row.values().map(to_sql).collect();
        let conn = self.lock();
        let mut stmt = conn.prepare(&sql)?;
        let mut stored = read_rows(&mut stmt, &binds)?;
        if stored.is_empty() && !updates.is_empty() {
            tracing::debug!(table, on_conflict, "upsert hit a row owned by someone else");
            return Err(rls_violation(table));
        }
        tracing::debug!(table, on_conflict, "local upsert");
        Ok(stored.pop().unwrap_or_default())
    }

    fn current_user(&self) -> Result<Option<User>> {
        Ok(self.user.read().unwrap_or_else(|p| p.into_inner()).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory()
            .unwrap()
            .with_user(User {
                id: "u1".into(),
                email: Some("ana@example.com".into()),
            })
            .unwrap()
    }

    #[test]
    fn insert_fills_id_and_timestamp() {
        let s = store();
        let row = s
            .insert(
                "goals",
                json!({ "user_id": "u1", "title": "Viagem", "target_amount": 1000, "current_amount": 250 }),
            )
            .unwrap();
        assert!(row.get("id").and_then(Value::as_str).is_some());
        assert!(row.get("created_at").and_then(Value::as_str).is_some());
        assert_eq!(row.get("title"), Some(&json!("Viagem")));
    }

    #[test]
    fn rows_of_other_users_are_invisible() {
        let s = store();
        s.insert(
            "goals",
            json!({ "user_id": "u1", "title": "Mine", "target_amount": 10 }),
        )
        .unwrap();
        s.set_user(Some(User { id: "u2".into(), email: None })).unwrap();
        let sel = s.select("goals", &Query::new().exact_count()).unwrap();
        assert!(sel.rows.is_empty());
        assert_eq!(sel.count, Some(0));
    }

    #[test]
    fn insert_for_someone_else_is_rejected() {
        let s = store();
        let err = s
            .insert(
                "goals",
                json!({ "user_id": "u2", "title": "Nope", "target_amount": 10 }),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Remote { status: 403, .. }));
    }

    #[test]
    fn upsert_cannot_take_over_another_users_row() {
        let s = store();
        let mine = s
            .upsert(
                "investment_allocations",
                json!({ "user_id": "u1", "label": "Mine", "percent": 40, "style": "alt" }),
                "id",
            )
            .unwrap();
        let id = mine.get("id").and_then(Value::as_str).unwrap().to_string();

        s.set_user(Some(User { id: "u2".into(), email: None })).unwrap();
        let err = s
            .upsert(
                "investment_allocations",
                json!({ "id": id, "user_id": "u2", "label": "Stolen", "percent": 1, "style": "alt" }),
                "id",
            )
            .unwrap_err();
        assert!(matches!(err, Error::Remote { status: 403, .. }));
        assert!(s.select("investment_allocations", &Query::new()).unwrap().rows.is_empty());

        s.set_user(Some(User { id: "u1".into(), email: None })).unwrap();
        let sel = s.select("investment_allocations", &Query::new()).unwrap();
        assert_eq!(sel.rows.len(), 1);
        assert_eq!(sel.rows[0].get("label"), Some(&json!("Mine")));
    }

    #[test]
    fn range_beyond_signed_offsets_is_an_empty_page() {
        let s = store();
        s.insert("goals", json!({ "user_id": "u1", "title": "A", "target_amount": 10 }))
            .unwrap();
        let q = Query::new().range(1 << 63, u64::MAX).exact_count();
        let sel = s.select("goals", &q).unwrap();
        assert!(sel.rows.is_empty());
        assert_eq!(sel.count, Some(1));
    }

    #[test]
    fn unknown_table_and_bad_column_are_rejected() {
        let s = store();
        assert!(s.select("users", &Query::new()).is_err());
        let q = Query::new().eq("title; DROP TABLE goals", "x");
        assert!(s.select("goals", &q).is_err());
    }

    #[test]
    fn upsert_on_user_id_updates_in_place() {
        let s = store();
        let row = json!({ "user_id": "u1", "limit_percent": 80, "subscriptions_budget": 150 });
        s.upsert("alert_settings", row, "user_id").unwrap();
        let row = json!({ "user_id": "u1", "limit_percent": 60, "subscriptions_budget": 150 });
        s.upsert("alert_settings", row, "user_id").unwrap();
        let sel = s.select("alert_settings", &Query::new()).unwrap();
        assert_eq!(sel.rows.len(), 1);
        assert_eq!(sel.rows[0].get("limit_percent"), Some(&json!(60.0)));
    }
}
