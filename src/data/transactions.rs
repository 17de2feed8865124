// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use serde::Serialize;

use super::{Entity, Mutation, MutationKind, owned_row, require_user, row_id};
use crate::backend::{Query, TableStore};
use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::Result;
use crate::mapping::TransactionRow;
use crate::models::{Transaction, TransactionInput};

const TABLE: &str = "transactions";

/// Filters and page for the statement listing. Pages start at 1.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    pub page: u64,
    pub page_size: u64,
    pub search: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    /// Inclusive: the whole end day matches.
    pub end_date: Option<NaiveDate>,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            category: None,
            start_date: None,
            end_date: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionPage {
    pub data: Vec<Transaction>,
    /// Matching rows server-side, across all pages.
    pub count: u64,
}

impl TransactionPage {
    pub fn page_count(&self, page_size: u64) -> u64 {
        crate::views::summary::page_count(self.count, page_size)
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn fetch_transactions(store: &dyn TableStore) -> Result<Vec<Transaction>> {
    let rows: Vec<TransactionRow> = store
        .select(TABLE, &Query::new().order("created_at", false))?
        .decode()?;
    Ok(rows.into_iter().map(Transaction::from).collect())
}

pub fn query_transactions(store: &dyn TableStore, q: &TransactionQuery) -> Result<TransactionPage> {
    let page = q.page.max(1);
    let page_size = q.page_size.max(1);
    // Saturates so a huge page number still asks for rows past the end.
    let from = (page - 1).saturating_mul(page_size);
    let to = from.saturating_add(page_size - 1);

    let mut query = Query::new()
        .order("created_at", false)
        .range(from, to)
        .exact_count();
    if let Some(search) = non_empty(&q.search) {
        query = query.ilike("description", format!("%{}%", search));
    }
    if let Some(category) = non_empty(&q.category) {
        query = query.ilike("category", format!("%{}%", category));
    }
    if let Some(start) = q.start_date {
        query = query.gte("created_at", start.format("%Y-%m-%d").to_string());
    }
    if let Some(end) = q.end_date {
        query = query.lte("created_at", format!("{}T23:59:59.999Z", end.format("%Y-%m-%d")));
    }

    let selection = store.select(TABLE, &query)?;
    let count = selection.count.unwrap_or(0);
    let rows: Vec<TransactionRow> = selection.decode()?;
    tracing::debug!(page, page_size, count, "queried transactions");
    Ok(TransactionPage {
        data: rows.into_iter().map(Transaction::from).collect(),
        count,
    })
}

pub fn create_transaction(store: &dyn TableStore, input: &TransactionInput) -> Result<Mutation> {
    let user_id = require_user(store)?;
    let row = store.insert(TABLE, owned_row(input, &user_id)?)?;
    Ok(Mutation::new(
        Entity::Transaction,
        MutationKind::Created,
        row_id(&row),
    ))
}

pub fn update_transaction(
    store: &dyn TableStore,
    id: &str,
    input: &TransactionInput,
) -> Result<Mutation> {
    store.update(TABLE, id, serde_json::to_value(input)?)?;
    Ok(Mutation::new(
        Entity::Transaction,
        MutationKind::Updated,
        Some(id.to_string()),
    ))
}

pub fn delete_transaction(store: &dyn TableStore, id: &str) -> Result<Mutation> {
    store.delete(TABLE, id)?;
    Ok(Mutation::new(
        Entity::Transaction,
        MutationKind::Deleted,
        Some(id.to_string()),
    ))
}
