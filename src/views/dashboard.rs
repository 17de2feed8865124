// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::thread;

use serde::Serialize;

use super::summary::{
    Totals, average_progress, bar_width, budget_ratio, limit_alert, overall_utilisation,
    subscription_spend, totals,
};
use super::{Container, day_of, settle};
use crate::backend::TableStore;
use crate::data::{
    Entity, fetch_alert_settings, fetch_credit_cards, fetch_goals, fetch_transactions,
};
use crate::models::{AlertSettings, CreditCard, Goal, Transaction};
use crate::utils::{fmt_money, fmt_percent, pretty_table};

pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Dashboard {
    pub transactions: Vec<Transaction>,
    pub cards: Vec<CreditCard>,
    pub goals: Vec<Goal>,
    pub alerts: AlertSettings,
}

impl Dashboard {
    pub fn totals(&self) -> Totals {
        totals(&self.transactions)
    }

    /// Newest first, as loaded.
    pub fn recent(&self) -> &[Transaction] {
        &self.transactions[..self.transactions.len().min(RECENT_LIMIT)]
    }

    pub fn utilisation(&self) -> f64 {
        overall_utilisation(&self.cards)
    }

    pub fn limit_alert(&self) -> bool {
        limit_alert(self.utilisation(), &self.alerts)
    }

    pub fn subscription_spend(&self) -> f64 {
        subscription_spend(&self.transactions)
    }

    pub fn subscriptions_ratio(&self) -> f64 {
        budget_ratio(self.subscription_spend(), self.alerts.subscriptions_budget)
    }

    pub fn average_goal_progress(&self) -> f64 {
        average_progress(&self.goals)
    }
}

impl Container for Dashboard {
    fn watches(&self, entity: Entity) -> bool {
        matches!(
            entity,
            Entity::Transaction | Entity::CreditCard | Entity::Goal | Entity::AlertSettings
        )
    }

    fn load(&mut self, store: &dyn TableStore) {
        thread::scope(|s| {
            let transactions = s.spawn(|| fetch_transactions(store));
            let cards = s.spawn(|| fetch_credit_cards(store));
            let goals = s.spawn(|| fetch_goals(store));
            let alerts = s.spawn(|| fetch_alert_settings(store));
            settle("transactions", transactions.join(), &mut self.transactions);
            settle("credit cards", cards.join(), &mut self.cards);
            settle("goals", goals.join(), &mut self.goals);
            settle("alert settings", alerts.join(), &mut self.alerts);
        });
    }

    fn render(&self) -> String {
        let t = self.totals();
        let overview = pretty_table(
            &["Saldo", "Entradas", "Saidas", "Uso do limite", "Assinaturas"],
            vec![vec![
                fmt_money(t.balance),
                fmt_money(t.income),
                fmt_money(t.expense),
                format!(
                    "{}{}",
                    fmt_percent(self.utilisation()),
                    if self.limit_alert() { " (alerta)" } else { "" }
                ),
                format!(
                    "{} / {}",
                    fmt_money(self.subscription_spend()),
                    fmt_money(self.alerts.subscriptions_budget)
                ),
            ]],
        );
        let recent = pretty_table(
            &["Data", "Descricao", "Categoria", "Valor"],
            self.recent()
                .iter()
                .map(|t| {
                    vec![
                        day_of(&t.created_at)
                            .unwrap_or(t.created_at.as_str())
                            .to_string(),
                        t.description.clone(),
                        t.category.clone().unwrap_or_default(),
                        fmt_money(t.amount),
                    ]
                })
                .collect(),
        );
        let goals = pretty_table(
            &["Meta", "Progresso"],
            self.goals
                .iter()
                .map(|g| vec![g.title.clone(), fmt_percent(bar_width(g.progress))])
                .collect(),
        );
        format!(
            "Resumo\n{}\n\nMovimentacoes recentes\n{}\n\nMetas (media {})\n{}",
            overview,
            recent,
            fmt_percent(self.average_goal_progress()),
            goals
        )
    }
}
