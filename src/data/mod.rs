// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One function per remote operation. Nothing here catches or retries:
//! the store's error is returned to the caller unchanged.
//!
//! Mutations return a [`Mutation`] describing what changed so the caller can
//! choose to reload, patch or ignore.

pub mod alerts;
pub mod cards;
pub mod goals;
pub mod investments;
pub mod planned;
pub mod profile;
pub mod transactions;

use serde::Serialize;
use serde_json::Value;

use crate::backend::{Row, TableStore};
use crate::error::{Error, Result};

pub use alerts::{fetch_alert_settings, upsert_alert_settings};
pub use cards::{create_credit_card, delete_credit_card, fetch_credit_cards, update_credit_card};
pub use goals::{create_goal, delete_goal, fetch_goals, update_goal};
pub use investments::{
    delete_investment_allocation, delete_investment_return, fetch_investment_allocations,
    fetch_investment_returns, upsert_investment_allocation, upsert_investment_return,
};
pub use planned::{
    create_planned_expense, delete_planned_expense, fetch_planned_expenses,
    update_planned_expense,
};
pub use profile::{fetch_profile, update_profile};
pub use transactions::{
    TransactionPage, TransactionQuery, create_transaction, delete_transaction,
    fetch_transactions, query_transactions, update_transaction,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Transaction,
    CreditCard,
    Goal,
    PlannedExpense,
    InvestmentAllocation,
    InvestmentReturn,
    Profile,
    AlertSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    Created,
    Updated,
    Upserted,
    Deleted,
}

/// What a successful write changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mutation {
    pub entity: Entity,
    pub kind: MutationKind,
    pub id: Option<String>,
}

impl Mutation {
    pub fn new(entity: Entity, kind: MutationKind, id: Option<String>) -> Self {
        Self { entity, kind, id }
    }
}

/// Id of the signed-in user; writes that attach ownership need one.
pub fn require_user(store: &dyn TableStore) -> Result<String> {
    match store.current_user()? {
        Some(u) => Ok(u.id),
        None => Err(Error::NotAuthenticated),
    }
}

/// Serializes a payload and stamps the owner column on it.
pub(crate) fn owned_row<T: Serialize>(payload: &T, user_id: &str) -> Result<Value> {
    let mut v = serde_json::to_value(payload)?;
    if let Value::Object(map) = &mut v {
        map.insert("user_id".into(), Value::String(user_id.to_string()));
    }
    Ok(v)
}

pub(crate) fn row_id(row: &Row) -> Option<String> {
    row.get("id").and_then(Value::as_str).map(str::to_string)
}
