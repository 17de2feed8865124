// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Entity, Mutation, MutationKind};
use crate::backend::{Query, TableStore};
use crate::error::{Error, Result};
use crate::mapping::ProfileRow;
use crate::models::{Profile, ProfileUpdate};

const TABLE: &str = "profiles";

/// Exactly one profile per user; a missing row is an error.
pub fn fetch_profile(store: &dyn TableStore, user_id: &str) -> Result<Profile> {
    let rows: Vec<ProfileRow> = store
        .select(TABLE, &Query::new().eq("id", user_id))?
        .decode()?;
    let mut rows = rows.into_iter();
    match (rows.next(), rows.next()) {
        (Some(row), None) => Ok(Profile::from(row)),
        (None, _) => Err(Error::NotFound(TABLE.into())),
        (Some(_), Some(_)) => Err(Error::Remote {
            status: 406,
            message: "JSON object requested, multiple (or no) rows returned".into(),
        }),
    }
}

pub fn update_profile(store: &dyn TableStore, id: &str, update: &ProfileUpdate) -> Result<Mutation> {
    store.update(TABLE, id, serde_json::to_value(update)?)?;
    Ok(Mutation::new(
        Entity::Profile,
        MutationKind::Updated,
        Some(id.to_string()),
    ))
}
