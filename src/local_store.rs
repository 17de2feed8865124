// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Offline key-value persistence: one JSON document per fixed key.
//! Reads fall back to built-in defaults when a key is missing or unreadable.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::models::{AlertSettings, BarStyle, InvestmentAllocation, InvestmentReturn, PlannedExpense};

pub const ALERTS: &str = "alerts";
pub const PLANNED_EXPENSES: &str = "planned_expenses";
pub const INVESTMENT_ALLOCATIONS: &str = "investment_allocations";
pub const INVESTMENT_RETURNS: &str = "investment_returns";

/// Anything stored in a keyed list.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for PlannedExpense {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for InvestmentAllocation {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for InvestmentReturn {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Replaces the entry with the same id, or appends.
pub fn with_id<T: Keyed>(mut list: Vec<T>, item: T) -> Vec<T> {
    match list.iter().position(|e| e.key() == item.key()) {
        Some(i) => list[i] = item,
        None => list.push(item),
    }
    list
}

pub fn default_planned_expenses() -> Vec<PlannedExpense> {
    [("1", "Casa propria", 1200.0), ("2", "Carro", 900.0), ("3", "Curso", 350.0)]
        .into_iter()
        .map(|(id, title, amount)| PlannedExpense {
            id: id.into(),
            title: title.into(),
            amount,
            frequency: "mes".into(),
        })
        .collect()
}

pub fn default_allocations() -> Vec<InvestmentAllocation> {
    [
        ("1", "Renda fixa", 45.0, BarStyle::Default),
        ("2", "Fundos imobiliarios", 28.0, BarStyle::Alt),
        ("3", "Acoes", 27.0, BarStyle::Soft),
    ]
    .into_iter()
    .map(|(id, label, percent, style)| InvestmentAllocation {
        id: id.into(),
        label: label.into(),
        percent,
        style,
    })
    .collect()
}

pub fn default_returns() -> Vec<InvestmentReturn> {
    [
        ("1", "12 meses", 14.2, BarStyle::Default),
        ("2", "24 meses", 22.9, BarStyle::Soft),
    ]
    .into_iter()
    .map(|(id, label, percent, style)| InvestmentReturn {
        id: id.into(),
        label: label.into(),
        percent,
        style,
    })
    .collect()
}

pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::new(crate::db::local_store_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    pub fn read_json<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let path = self.path(key);
        let raw = match fs::read_to_string(&path) {
            Ok(r) if !r.trim().is_empty() => r,
            _ => return fallback,
        };
        match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key, "unreadable local value, using defaults: {}", e);
                fallback
            }
        }
    }

    pub fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), serde_json::to_string(value)?)?;
        Ok(())
    }

    pub fn alert_settings(&self) -> AlertSettings {
        self.read_json(ALERTS, AlertSettings::default())
    }

    pub fn save_alert_settings(&self, settings: &AlertSettings) -> Result<()> {
        self.write_json(ALERTS, settings)
    }

    pub fn planned_expenses(&self) -> Vec<PlannedExpense> {
        self.read_json(PLANNED_EXPENSES, default_planned_expenses())
    }

    pub fn upsert_planned_expense(&self, item: PlannedExpense) -> Result<()> {
        self.write_json(PLANNED_EXPENSES, &with_id(self.planned_expenses(), item))
    }

    pub fn delete_planned_expense(&self, id: &str) -> Result<()> {
        let list: Vec<_> = self
            .planned_expenses()
            .into_iter()
            .filter(|e| e.id != id)
            .collect();
        self.write_json(PLANNED_EXPENSES, &list)
    }

    pub fn investment_allocations(&self) -> Vec<InvestmentAllocation> {
        self.read_json(INVESTMENT_ALLOCATIONS, default_allocations())
    }

    pub fn upsert_investment_allocation(&self, item: InvestmentAllocation) -> Result<()> {
        self.write_json(
            INVESTMENT_ALLOCATIONS,
            &with_id(self.investment_allocations(), item),
        )
    }

    pub fn delete_investment_allocation(&self, id: &str) -> Result<()> {
        let list: Vec<_> = self
            .investment_allocations()
            .into_iter()
            .filter(|e| e.id != id)
            .collect();
        self.write_json(INVESTMENT_ALLOCATIONS, &list)
    }

    pub fn investment_returns(&self) -> Vec<InvestmentReturn> {
        self.read_json(INVESTMENT_RETURNS, default_returns())
    }

    pub fn upsert_investment_return(&self, item: InvestmentReturn) -> Result<()> {
        self.write_json(INVESTMENT_RETURNS, &with_id(self.investment_returns(), item))
    }

    pub fn delete_investment_return(&self, id: &str) -> Result<()> {
        let list: Vec<_> = self
            .investment_returns()
            .into_iter()
            .filter(|e| e.id != id)
            .collect();
        self.write_json(INVESTMENT_RETURNS, &list)
    }
}
