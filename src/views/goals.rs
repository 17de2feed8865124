// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;
use std::thread;

use serde::Serialize;

use super::summary::{average_progress, bar_width, planned_total};
use super::{Container, settle, submit_with};
use crate::backend::TableStore;
use crate::data::{
    Entity, Mutation, create_goal, create_planned_expense, delete_goal, delete_planned_expense,
    fetch_goals, fetch_planned_expenses, update_goal, update_planned_expense,
};
use crate::error::{Error, Result};
use crate::forms::{Field, FieldKind, FormSpec, FormValues};
use crate::modal::Modal;
use crate::models::{Goal, GoalInput, PlannedExpense, PlannedExpenseInput};
use crate::utils::{fmt_money, fmt_percent, pretty_table};

pub fn goal_form(existing: Option<&Goal>) -> FormSpec {
    let spec = FormSpec::form(if existing.is_some() {
        "Editar meta"
    } else {
        "Nova meta"
    })
    .describe("Defina quanto quer juntar.")
    .field(
        Field::new("title", "Titulo", FieldKind::text())
            .required()
            .placeholder("Reserva de emergencia"),
    )
    .field(Field::new("target_amount", "Valor alvo", FieldKind::Number).required())
    .field(Field::new("current_amount", "Valor atual", FieldKind::Number));

    match existing {
        Some(g) => spec
            .initial("title", &g.title)
            .initial("target_amount", g.target_amount)
            .initial("current_amount", g.current_amount),
        None => spec.initial("current_amount", 0),
    }
}

impl TryFrom<&FormValues> for GoalInput {
    type Error = Error;

    fn try_from(v: &FormValues) -> Result<Self> {
        Ok(GoalInput {
            title: v.required_text("title")?,
            target_amount: v.required_number("target_amount")?,
            current_amount: v.number("current_amount").unwrap_or(0.0),
        })
    }
}

pub fn planned_form(existing: Option<&PlannedExpense>) -> FormSpec {
    let spec = FormSpec::form(if existing.is_some() {
        "Editar gasto planejado"
    } else {
        "Novo gasto planejado"
    })
    .field(Field::new("title", "Titulo", FieldKind::text()).required())
    .field(Field::new("amount", "Valor", FieldKind::Number).required())
    .field(Field::new("frequency", "Frequencia", FieldKind::text()).placeholder("mes"));

    match existing {
        Some(p) => spec
            .initial("title", &p.title)
            .initial("amount", p.amount)
            .initial("frequency", &p.frequency),
        None => spec.initial("frequency", "mes"),
    }
}

impl TryFrom<&FormValues> for PlannedExpenseInput {
    type Error = Error;

    fn try_from(v: &FormValues) -> Result<Self> {
        Ok(PlannedExpenseInput {
            title: v.required_text("title")?,
            amount: v.required_number("amount")?,
            frequency: v.text("frequency").unwrap_or_else(|| "mes".to_string()),
        })
    }
}

pub fn submit_goal(
    store: &dyn TableStore,
    modal: &mut Modal,
    raw: &BTreeMap<String, String>,
    editing: Option<&str>,
) -> Result<Mutation> {
    submit_with(
        modal,
        raw,
        editing,
        |input: &GoalInput| create_goal(store, input),
        |id, input| update_goal(store, id, input),
    )
}

pub fn submit_planned(
    store: &dyn TableStore,
    modal: &mut Modal,
    raw: &BTreeMap<String, String>,
    editing: Option<&str>,
) -> Result<Mutation> {
    submit_with(
        modal,
        raw,
        editing,
        |input: &PlannedExpenseInput| create_planned_expense(store, input),
        |id, input| update_planned_expense(store, id, input),
    )
}

/// Metas: savings goals plus the planned monthly expenses.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Goals {
    pub goals: Vec<Goal>,
    pub planned: Vec<PlannedExpense>,
}

impl Goals {
    pub fn find_goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn find_planned(&self, id: &str) -> Option<&PlannedExpense> {
        self.planned.iter().find(|p| p.id == id)
    }

    pub fn average_progress(&self) -> f64 {
        average_progress(&self.goals)
    }

    pub fn planned_total(&self) -> f64 {
        planned_total(&self.planned)
    }

    pub fn delete_goal(&self, store: &dyn TableStore, id: &str) -> Result<Mutation> {
        delete_goal(store, id)
    }

    pub fn delete_planned(&self, store: &dyn TableStore, id: &str) -> Result<Mutation> {
        delete_planned_expense(store, id)
    }
}

impl Container for Goals {
    fn watches(&self, entity: Entity) -> bool {
        matches!(entity, Entity::Goal | Entity::PlannedExpense)
    }

    fn load(&mut self, store: &dyn TableStore) {
        thread::scope(|s| {
            let goals = s.spawn(|| fetch_goals(store));
            let planned = s.spawn(|| fetch_planned_expenses(store));
            settle("goals", goals.join(), &mut self.goals);
            settle("planned expenses", planned.join(), &mut self.planned);
        });
    }

    fn render(&self) -> String {
        let goals = self
            .goals
            .iter()
            .map(|g| {
                vec![
                    g.id.clone(),
                    g.title.clone(),
                    fmt_money(g.current_amount),
                    fmt_money(g.target_amount),
                    fmt_percent(bar_width(g.progress)),
                    g.style.as_str().to_string(),
                ]
            })
            .collect();
        let planned = self
            .planned
            .iter()
            .map(|p| {
                vec![
                    p.id.clone(),
                    p.title.clone(),
                    fmt_money(p.amount),
                    p.frequency.clone(),
                ]
            })
            .collect();
        format!(
            "Metas\n{}\nProgresso medio {}\n\nGastos planejados\n{}\nTotal {}",
            pretty_table(&["Id", "Titulo", "Atual", "Alvo", "Progresso", "Estilo"], goals),
            fmt_percent(self.average_progress()),
            pretty_table(&["Id", "Titulo", "Valor", "Frequencia"], planned),
            fmt_money(self.planned_total()),
        )
    }
}
