// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Allocations and returns share a row shape and are written by upsert on `id`.

use super::{Entity, Mutation, MutationKind, owned_row, require_user, row_id};
use crate::backend::{Query, TableStore};
use crate::error::Result;
use crate::mapping::PortfolioRow;
use crate::models::{InvestmentAllocation, InvestmentReturn, PortfolioEntryInput};

const ALLOCATIONS: &str = "investment_allocations";
const RETURNS: &str = "investment_returns";

fn upsert_entry(
    store: &dyn TableStore,
    table: &str,
    entity: Entity,
    input: &PortfolioEntryInput,
) -> Result<Mutation> {
    let user_id = require_user(store)?;
    let row = store.upsert(table, owned_row(input, &user_id)?, "id")?;
    Ok(Mutation::new(
        entity,
        MutationKind::Upserted,
        row_id(&row).or_else(|| input.id.clone()),
    ))
}

pub fn fetch_investment_allocations(store: &dyn TableStore) -> Result<Vec<InvestmentAllocation>> {
    let rows: Vec<PortfolioRow> = store.select(ALLOCATIONS, &Query::new())?.decode()?;
    Ok(rows.into_iter().map(InvestmentAllocation::from).collect())
}

pub fn upsert_investment_allocation(
    store: &dyn TableStore,
    input: &PortfolioEntryInput,
) -> Result<Mutation> {
    upsert_entry(store, ALLOCATIONS, Entity::InvestmentAllocation, input)
}

pub fn delete_investment_allocation(store: &dyn TableStore, id: &str) -> Result<Mutation> {
    store.delete(ALLOCATIONS, id)?;
    Ok(Mutation::new(
        Entity::InvestmentAllocation,
        MutationKind::Deleted,
        Some(id.to_string()),
    ))
}

pub fn fetch_investment_returns(store: &dyn TableStore) -> Result<Vec<InvestmentReturn>> {
    let rows: Vec<PortfolioRow> = store.select(RETURNS, &Query::new())?.decode()?;
    Ok(rows.into_iter().map(InvestmentReturn::from).collect())
}

pub fn upsert_investment_return(
    store: &dyn TableStore,
    input: &PortfolioEntryInput,
) -> Result<Mutation> {
    upsert_entry(store, RETURNS, Entity::InvestmentReturn, input)
}

pub fn delete_investment_return(store: &dyn TableStore, id: &str) -> Result<Mutation> {
    store.delete(RETURNS, id)?;
    Ok(Mutation::new(
        Entity::InvestmentReturn,
        MutationKind::Deleted,
        Some(id.to_string()),
    ))
}
