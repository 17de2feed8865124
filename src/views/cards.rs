// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;
use std::thread;

use serde::Serialize;

use super::summary::{
    budget_ratio, card_utilisation, limit_alert, overall_utilisation, subscription_spend,
};
use super::{Container, settle, submit_with};
use crate::backend::TableStore;
use crate::data::{
    Entity, Mutation, create_credit_card, delete_credit_card, fetch_alert_settings,
    fetch_credit_cards, fetch_transactions, update_credit_card,
};
use crate::error::{Error, Result};
use crate::forms::{Field, FieldKind, FormSpec, FormValues};
use crate::modal::Modal;
use crate::models::{AlertSettings, CardStyle, CreditCard, CreditCardInput, Transaction};
use crate::utils::{fmt_money, fmt_percent, pretty_table};

pub fn card_form(existing: Option<&CreditCard>) -> FormSpec {
    let spec = FormSpec::form(if existing.is_some() {
        "Editar cartao"
    } else {
        "Novo cartao"
    })
    .describe("Revise limites e consumos atuais.")
    .field(Field::new("name", "Nome", FieldKind::text()).required().placeholder("Fluxo Prime"))
    .field(Field::new("holder_name", "Titular", FieldKind::text()).required())
    .field(
        Field::new(
            "last_digits",
            "Final",
            FieldKind::Text {
                pattern: Some(r"^\d{4}$".into()),
            },
        )
        .required()
        .placeholder("1289"),
    )
    .field(Field::new("limit_amount", "Limite", FieldKind::Number).required())
    .field(Field::new("available_amount", "Disponivel", FieldKind::Number).required())
    .field(Field::new("style", "Estilo", FieldKind::select(&CardStyle::ALL)));

    match existing {
        Some(c) => spec
            .initial("name", &c.name)
            .initial("holder_name", &c.holder_name)
            .initial("last_digits", &c.last_digits)
            .initial("limit_amount", c.limit_amount)
            .initial("available_amount", c.available_amount)
            .initial("style", c.style.as_str()),
        None => spec.initial("style", CardStyle::Default.as_str()),
    }
}

impl TryFrom<&FormValues> for CreditCardInput {
    type Error = Error;

    fn try_from(v: &FormValues) -> Result<Self> {
        Ok(CreditCardInput {
            name: v.required_text("name")?,
            holder_name: v.required_text("holder_name")?,
            last_digits: v.required_text("last_digits")?,
            limit_amount: v.required_number("limit_amount")?,
            available_amount: v.required_number("available_amount")?,
            style: CardStyle::from_wire(v.text("style").as_deref()),
        })
    }
}

pub fn submit_card(
    store: &dyn TableStore,
    modal: &mut Modal,
    raw: &BTreeMap<String, String>,
    editing: Option<&str>,
) -> Result<Mutation> {
    submit_with(
        modal,
        raw,
        editing,
        |input: &CreditCardInput| create_credit_card(store, input),
        |id, input| update_credit_card(store, id, input),
    )
}

/// Cartoes: cards, their limit usage and the alert panel.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Cards {
    pub cards: Vec<CreditCard>,
    pub alerts: AlertSettings,
    pub transactions: Vec<Transaction>,
}

impl Cards {
    pub fn find(&self, id: &str) -> Option<&CreditCard> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn utilisation(&self) -> f64 {
        overall_utilisation(&self.cards)
    }

    pub fn limit_alert(&self) -> bool {
        limit_alert(self.utilisation(), &self.alerts)
    }

    pub fn subscriptions_ratio(&self) -> f64 {
        budget_ratio(
            subscription_spend(&self.transactions),
            self.alerts.subscriptions_budget,
        )
    }

    pub fn delete(&self, store: &dyn TableStore, id: &str) -> Result<Mutation> {
        delete_credit_card(store, id)
    }
}

impl Container for Cards {
    fn watches(&self, entity: Entity) -> bool {
        matches!(
            entity,
            Entity::CreditCard | Entity::AlertSettings | Entity::Transaction
        )
    }

    fn load(&mut self, store: &dyn TableStore) {
        thread::scope(|s| {
            let cards = s.spawn(|| fetch_credit_cards(store));
            let alerts = s.spawn(|| fetch_alert_settings(store));
            let transactions = s.spawn(|| fetch_transactions(store));
            settle("credit cards", cards.join(), &mut self.cards);
            settle("alert settings", alerts.join(), &mut self.alerts);
            settle("transactions", transactions.join(), &mut self.transactions);
        });
    }

    fn render(&self) -> String {
        let rows = self
            .cards
            .iter()
            .map(|c| {
                vec![
                    c.id.clone(),
                    c.name.clone(),
                    c.holder_name.clone(),
                    format!("**** {}", c.last_digits),
                    fmt_money(c.limit_amount),
                    fmt_money(c.available_amount),
                    fmt_percent(card_utilisation(c)),
                    c.style.as_str().to_string(),
                ]
            })
            .collect();
        let alert = if self.limit_alert() { " (alerta)" } else { "" };
        format!(
            "Cartoes\n{}\nUso do limite {}{} | meta {}\nAssinaturas {} de {} ({})",
            pretty_table(
                &["Id", "Nome", "Titular", "Final", "Limite", "Disponivel", "Uso", "Estilo"],
                rows
            ),
            fmt_percent(self.utilisation()),
            alert,
            fmt_percent(self.alerts.limit_percent),
            fmt_money(subscription_spend(&self.transactions)),
            fmt_money(self.alerts.subscriptions_budget),
            fmt_percent(self.subscriptions_ratio()),
        )
    }
}
