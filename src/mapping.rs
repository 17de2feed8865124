// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Backend row shapes and their conversion into view models.
//!
//! Conversions never fail: nullable columns become `None`, numeric columns
//! accept numbers or numeric strings, and anything unparseable becomes `NaN`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::{
    AlertSettings, BarStyle, CardStyle, CreditCard, Goal, InvestmentAllocation, InvestmentReturn,
    PlannedExpense, Profile, Transaction, TransactionKind,
};

/// Numeric coercion for wire values. Null and empty strings are zero.
pub fn coerce_number(v: &Value) -> f64 {
    match v {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) if s.trim().is_empty() => 0.0,
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Null => 0.0,
        _ => f64::NAN,
    }
}

fn numeric<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(coerce_number(&v))
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRow {
    pub id: String,
    pub description: String,
    pub subtitle: Option<String>,
    #[serde(deserialize_with = "numeric", default)]
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreditCardRow {
    pub id: String,
    pub name: String,
    pub holder_name: String,
    pub last_digits: String,
    #[serde(deserialize_with = "numeric", default)]
    pub limit_amount: f64,
    #[serde(deserialize_with = "numeric", default)]
    pub available_amount: f64,
    pub style: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoalRow {
    pub id: String,
    pub title: String,
    #[serde(deserialize_with = "numeric", default)]
    pub target_amount: f64,
    #[serde(deserialize_with = "numeric", default)]
    pub current_amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRow {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertSettingsRow {
    #[serde(deserialize_with = "numeric", default)]
    pub limit_percent: f64,
    #[serde(deserialize_with = "numeric", default)]
    pub subscriptions_budget: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlannedExpenseRow {
    pub id: String,
    pub title: String,
    #[serde(deserialize_with = "numeric", default)]
    pub amount: f64,
    pub frequency: String,
}

/// Shared by `investment_allocations` and `investment_returns`.
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioRow {
    pub id: String,
    pub label: String,
    #[serde(deserialize_with = "numeric", default)]
    pub percent: f64,
    pub style: Option<String>,
}

/// `current / target * 100`, or 0 when the target is zero or not a number.
pub fn goal_progress(current: f64, target: f64) -> f64 {
    if target == 0.0 || target.is_nan() {
        0.0
    } else {
        current / target * 100.0
    }
}

impl From<TransactionRow> for Transaction {
    fn from(row: TransactionRow) -> Self {
        Transaction {
            id: row.id,
            description: row.description,
            subtitle: row.subtitle,
            amount: row.amount,
            kind: row.kind,
            category: row.category,
            created_at: row.created_at,
        }
    }
}

impl From<CreditCardRow> for CreditCard {
    fn from(row: CreditCardRow) -> Self {
        CreditCard {
            id: row.id,
            name: row.name,
            holder_name: row.holder_name,
            last_digits: row.last_digits,
            limit_amount: row.limit_amount,
            available_amount: row.available_amount,
            style: CardStyle::from_wire(row.style.as_deref()),
        }
    }
}

impl From<GoalRow> for Goal {
    fn from(row: GoalRow) -> Self {
        Goal {
            progress: goal_progress(row.current_amount, row.target_amount),
            id: row.id,
            title: row.title,
            current_amount: row.current_amount,
            target_amount: row.target_amount,
            style: BarStyle::Default,
        }
    }
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            name: row.name,
            email: row.email,
            avatar_url: row.avatar_url,
        }
    }
}

impl From<AlertSettingsRow> for AlertSettings {
    fn from(row: AlertSettingsRow) -> Self {
        AlertSettings {
            limit_percent: row.limit_percent,
            subscriptions_budget: row.subscriptions_budget,
        }
    }
}

impl From<PlannedExpenseRow> for PlannedExpense {
    fn from(row: PlannedExpenseRow) -> Self {
        PlannedExpense {
            id: row.id,
            title: row.title,
            amount: row.amount,
            frequency: row.frequency,
        }
    }
}

impl From<PortfolioRow> for InvestmentAllocation {
    fn from(row: PortfolioRow) -> Self {
        InvestmentAllocation {
            id: row.id,
            label: row.label,
            percent: row.percent,
            style: BarStyle::from_wire(row.style.as_deref()),
        }
    }
}

impl From<PortfolioRow> for InvestmentReturn {
    fn from(row: PortfolioRow) -> Self {
        InvestmentReturn {
            id: row.id,
            label: row.label,
            percent: row.percent,
            style: BarStyle::from_wire(row.style.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_strings_and_garbage() {
        assert_eq!(coerce_number(&json!("12.5")), 12.5);
        assert_eq!(coerce_number(&json!(3)), 3.0);
        assert_eq!(coerce_number(&Value::Null), 0.0);
        assert!(coerce_number(&json!("doze")).is_nan());
        assert!(coerce_number(&json!([1])).is_nan());
    }

    #[test]
    fn goal_progress_handles_zero_target() {
        let row: GoalRow = serde_json::from_value(json!({
            "id": "g1", "title": "Reserva", "target_amount": 0, "current_amount": 500
        }))
        .unwrap();
        assert_eq!(Goal::from(row).progress, 0.0);

        let row: GoalRow = serde_json::from_value(json!({
            "id": "g2", "title": "Viagem", "target_amount": "8000", "current_amount": 5600
        }))
        .unwrap();
        let goal = Goal::from(row);
        assert!((goal.progress - 70.0).abs() < 1e-9);
        assert_eq!(goal.target_amount, 8000.0);
    }

    #[test]
    fn malformed_numbers_become_nan() {
        let row: CreditCardRow = serde_json::from_value(json!({
            "id": "c1", "name": "Prime", "holder_name": "Ana", "last_digits": "6420",
            "limit_amount": "n/a", "available_amount": 100, "style": null
        }))
        .unwrap();
        let card = CreditCard::from(row);
        assert!(card.limit_amount.is_nan());
        assert_eq!(card.style, CardStyle::Default);
    }

    #[test]
    fn nullable_text_becomes_none() {
        let row: TransactionRow = serde_json::from_value(json!({
            "id": "t1", "description": "Salario", "subtitle": null, "amount": 4200,
            "type": "income", "category": null, "created_at": "2025-01-05T10:00:00Z"
        }))
        .unwrap();
        let tx = Transaction::from(row);
        assert_eq!(tx.subtitle, None);
        assert_eq!(tx.category, None);
        assert_eq!(tx.kind, TransactionKind::Income);
    }
}
