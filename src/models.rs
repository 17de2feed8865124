// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(format!("unknown transaction type '{}'", other)),
        }
    }
}

/// Card face variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStyle {
    #[default]
    Default,
    Alt,
    Dark,
}

impl CardStyle {
    pub const ALL: [&'static str; 3] = ["default", "alt", "dark"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CardStyle::Default => "default",
            CardStyle::Alt => "alt",
            CardStyle::Dark => "dark",
        }
    }

    /// Unknown or missing values fall back to `Default`.
    pub fn from_wire(s: Option<&str>) -> Self {
        match s {
            Some("alt") => CardStyle::Alt,
            Some("dark") => CardStyle::Dark,
            _ => CardStyle::Default,
        }
    }
}

/// Progress-bar variant used by goals and investment rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarStyle {
    #[default]
    Default,
    Alt,
    Soft,
}

impl BarStyle {
    pub const ALL: [&'static str; 3] = ["default", "alt", "soft"];

    pub fn as_str(&self) -> &'static str {
        match self {
            BarStyle::Default => "default",
            BarStyle::Alt => "alt",
            BarStyle::Soft => "soft",
        }
    }

    pub fn from_wire(s: Option<&str>) -> Self {
        match s {
            Some("alt") => BarStyle::Alt,
            Some("soft") => BarStyle::Soft,
            _ => BarStyle::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Signed; expenses are expected to be negative.
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCard {
    pub id: String,
    pub name: String,
    pub holder_name: String,
    pub last_digits: String,
    pub limit_amount: f64,
    pub available_amount: f64,
    pub style: CardStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub current_amount: f64,
    pub target_amount: f64,
    /// Percentage, derived from the amounts when mapped.
    pub progress: f64,
    pub style: BarStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedExpense {
    pub id: String,
    pub title: String,
    pub amount: f64,
    /// Free-text label such as "mes".
    pub frequency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentAllocation {
    pub id: String,
    pub label: String,
    pub percent: f64,
    #[serde(default)]
    pub style: BarStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentReturn {
    pub id: String,
    pub label: String,
    pub percent: f64,
    #[serde(default)]
    pub style: BarStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSettings {
    pub limit_percent: f64,
    pub subscriptions_budget: f64,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            limit_percent: 70.0,
            subscriptions_budget: 210.0,
        }
    }
}

// Mutation payloads. Field names are the backend column names.

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionInput {
    pub description: String,
    pub subtitle: Option<String>,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditCardInput {
    pub name: String,
    pub holder_name: String,
    pub last_digits: String,
    pub limit_amount: f64,
    pub available_amount: f64,
    pub style: CardStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalInput {
    pub title: String,
    pub target_amount: f64,
    pub current_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedExpenseInput {
    pub title: String,
    pub amount: f64,
    pub frequency: String,
}

/// Allocation or return row; `id: None` inserts a new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioEntryInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    pub percent: f64,
    pub style: BarStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
}
