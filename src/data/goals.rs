// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Entity, Mutation, MutationKind, owned_row, require_user, row_id};
use crate::backend::{Query, TableStore};
use crate::error::Result;
use crate::mapping::GoalRow;
use crate::models::{Goal, GoalInput};

const TABLE: &str = "goals";

pub fn fetch_goals(store: &dyn TableStore) -> Result<Vec<Goal>> {
    let rows: Vec<GoalRow> = store.select(TABLE, &Query::new())?.decode()?;
    Ok(rows.into_iter().map(Goal::from).collect())
}

pub fn create_goal(store: &dyn TableStore, input: &GoalInput) -> Result<Mutation> {
    let user_id = require_user(store)?;
    let row = store.insert(TABLE, owned_row(input, &user_id)?)?;
    Ok(Mutation::new(Entity::Goal, MutationKind::Created, row_id(&row)))
}

pub fn update_goal(store: &dyn TableStore, id: &str, input: &GoalInput) -> Result<Mutation> {
    store.update(TABLE, id, serde_json::to_value(input)?)?;
    Ok(Mutation::new(
        Entity::Goal,
        MutationKind::Updated,
        Some(id.to_string()),
    ))
}

pub fn delete_goal(store: &dyn TableStore, id: &str) -> Result<Mutation> {
    store.delete(TABLE, id)?;
    Ok(Mutation::new(
        Entity::Goal,
        MutationKind::Deleted,
        Some(id.to_string()),
    ))
}
