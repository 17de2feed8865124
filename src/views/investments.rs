// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;
use std::thread;

use serde::Serialize;

use super::summary::{allocation_total, bar_width};
use super::{Container, settle, submit_with};
use crate::backend::TableStore;
use crate::data::{
    Entity, Mutation, delete_investment_allocation, delete_investment_return,
    fetch_investment_allocations, fetch_investment_returns, upsert_investment_allocation,
    upsert_investment_return,
};
use crate::error::{Error, Result};
use crate::forms::{Field, FieldKind, FormSpec, FormValues};
use crate::modal::Modal;
use crate::models::{BarStyle, InvestmentAllocation, InvestmentReturn, PortfolioEntryInput};
use crate::utils::{fmt_percent, pretty_table};

/// Which of the two portfolio lists a form writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortfolioList {
    Allocations,
    Returns,
}

impl PortfolioList {
    fn noun(&self) -> &'static str {
        match self {
            PortfolioList::Allocations => "alocacao",
            PortfolioList::Returns => "rentabilidade",
        }
    }
}

pub fn entry_form(list: PortfolioList, existing: Option<(&str, f64, BarStyle)>) -> FormSpec {
    let title = match existing {
        Some(_) => format!("Editar {}", list.noun()),
        None => format!("Nova {}", list.noun()),
    };
    let spec = FormSpec::form(&title)
        .field(
            Field::new("label", "Rotulo", FieldKind::text())
                .required()
                .placeholder("Renda fixa"),
        )
        .field(Field::new("percent", "Percentual", FieldKind::Number).required())
        .field(Field::new("style", "Estilo", FieldKind::select(&BarStyle::ALL)));

    match existing {
        Some((label, percent, style)) => spec
            .initial("label", label)
            .initial("percent", percent)
            .initial("style", style.as_str()),
        None => spec.initial("style", BarStyle::Default.as_str()),
    }
}

impl TryFrom<&FormValues> for PortfolioEntryInput {
    type Error = Error;

    fn try_from(v: &FormValues) -> Result<Self> {
        Ok(PortfolioEntryInput {
            id: None,
            label: v.required_text("label")?,
            percent: v.required_number("percent")?,
            style: BarStyle::from_wire(v.text("style").as_deref()),
        })
    }
}

/// Both create and edit go through upsert; editing carries the row id.
pub fn submit_entry(
    store: &dyn TableStore,
    list: PortfolioList,
    modal: &mut Modal,
    raw: &BTreeMap<String, String>,
    editing: Option<&str>,
) -> Result<Mutation> {
    let write = |input: &PortfolioEntryInput| match list {
        PortfolioList::Allocations => upsert_investment_allocation(store, input),
        PortfolioList::Returns => upsert_investment_return(store, input),
    };
    submit_with(modal, raw, editing, write, |id, input: &PortfolioEntryInput| {
        let input = PortfolioEntryInput {
            id: Some(id.to_string()),
            ..input.clone()
        };
        write(&input)
    })
}

/// Investimentos: allocation mix and historical returns.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Investments {
    pub allocations: Vec<InvestmentAllocation>,
    pub returns: Vec<InvestmentReturn>,
}

impl Investments {
    pub fn allocation_total(&self) -> f64 {
        allocation_total(&self.allocations)
    }

    pub fn find_allocation(&self, id: &str) -> Option<&InvestmentAllocation> {
        self.allocations.iter().find(|a| a.id == id)
    }

    pub fn find_return(&self, id: &str) -> Option<&InvestmentReturn> {
        self.returns.iter().find(|r| r.id == id)
    }

    pub fn delete(&self, store: &dyn TableStore, list: PortfolioList, id: &str) -> Result<Mutation> {
        match list {
            PortfolioList::Allocations => delete_investment_allocation(store, id),
            PortfolioList::Returns => delete_investment_return(store, id),
        }
    }
}

impl Container for Investments {
    fn watches(&self, entity: Entity) -> bool {
        matches!(
            entity,
            Entity::InvestmentAllocation | Entity::InvestmentReturn
        )
    }

    fn load(&mut self, store: &dyn TableStore) {
        thread::scope(|s| {
            let allocations = s.spawn(|| fetch_investment_allocations(store));
            let returns = s.spawn(|| fetch_investment_returns(store));
            settle("investment allocations", allocations.join(), &mut self.allocations);
            settle("investment returns", returns.join(), &mut self.returns);
        });
    }

    fn render(&self) -> String {
        let row = |id: &str, label: &str, percent: f64, style: BarStyle| {
            vec![
                id.to_string(),
                label.to_string(),
                fmt_percent(percent),
                format!("{:.0}", bar_width(percent)),
                style.as_str().to_string(),
            ]
        };
        let headers = ["Id", "Rotulo", "Percentual", "Barra", "Estilo"];
        format!(
            "Alocacao\n{}\nTotal alocado {}\n\nRentabilidade\n{}",
            pretty_table(
                &headers,
                self.allocations
                    .iter()
                    .map(|a| row(&a.id, &a.label, a.percent, a.style))
                    .collect()
            ),
            fmt_percent(self.allocation_total()),
            pretty_table(
                &headers,
                self.returns
                    .iter()
                    .map(|r| row(&r.id, &r.label, r.percent, r.style))
                    .collect()
            ),
        )
    }
}
