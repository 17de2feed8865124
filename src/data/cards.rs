// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Entity, Mutation, MutationKind, owned_row, require_user, row_id};
use crate::backend::{Query, TableStore};
use crate::error::Result;
use crate::mapping::CreditCardRow;
use crate::models::{CreditCard, CreditCardInput};

const TABLE: &str = "credit_cards";

pub fn fetch_credit_cards(store: &dyn TableStore) -> Result<Vec<CreditCard>> {
    let rows: Vec<CreditCardRow> = store.select(TABLE, &Query::new())?.decode()?;
    Ok(rows.into_iter().map(CreditCard::from).collect())
}

pub fn create_credit_card(store: &dyn TableStore, input: &CreditCardInput) -> Result<Mutation> {
    let user_id = require_user(store)?;
    let row = store.insert(TABLE, owned_row(input, &user_id)?)?;
    Ok(Mutation::new(
        Entity::CreditCard,
        MutationKind::Created,
        row_id(&row),
    ))
}

pub fn update_credit_card(
    store: &dyn TableStore,
    id: &str,
    input: &CreditCardInput,
) -> Result<Mutation> {
    store.update(TABLE, id, serde_json::to_value(input)?)?;
    Ok(Mutation::new(
        Entity::CreditCard,
        MutationKind::Updated,
        Some(id.to_string()),
    ))
}

pub fn delete_credit_card(store: &dyn TableStore, id: &str) -> Result<Mutation> {
    store.delete(TABLE, id)?;
    Ok(Mutation::new(
        Entity::CreditCard,
        MutationKind::Deleted,
        Some(id.to_string()),
    ))
}
