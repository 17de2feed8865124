// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Entity, Mutation, MutationKind, owned_row, require_user, row_id};
use crate::backend::{Query, TableStore};
use crate::error::Result;
use crate::mapping::PlannedExpenseRow;
use crate::models::{PlannedExpense, PlannedExpenseInput};

const TABLE: &str = "planned_expenses";

pub fn fetch_planned_expenses(store: &dyn TableStore) -> Result<Vec<PlannedExpense>> {
    let rows: Vec<PlannedExpenseRow> = store.select(TABLE, &Query::new())?.decode()?;
    Ok(rows.into_iter().map(PlannedExpense::from).collect())
}

pub fn create_planned_expense(
    store: &dyn TableStore,
    input: &PlannedExpenseInput,
) -> Result<Mutation> {
    let user_id = require_user(store)?;
    let row = store.insert(TABLE, owned_row(input, &user_id)?)?;
    Ok(Mutation::new(
        Entity::PlannedExpense,
        MutationKind::Created,
        row_id(&row),
    ))
}

pub fn update_planned_expense(
    store: &dyn TableStore,
    id: &str,
    input: &PlannedExpenseInput,
) -> Result<Mutation> {
    store.update(TABLE, id, serde_json::to_value(input)?)?;
    Ok(Mutation::new(
        Entity::PlannedExpense,
        MutationKind::Updated,
        Some(id.to_string()),
    ))
}

pub fn delete_planned_expense(store: &dyn TableStore, id: &str) -> Result<Mutation> {
    store.delete(TABLE, id)?;
    Ok(Mutation::new(
        Entity::PlannedExpense,
        MutationKind::Deleted,
        Some(id.to_string()),
    ))
}
