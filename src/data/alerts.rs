// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Entity, Mutation, MutationKind, owned_row, require_user, row_id};
use crate::backend::{Query, TableStore};
use crate::error::Result;
use crate::mapping::AlertSettingsRow;
use crate::models::AlertSettings;

const TABLE: &str = "alert_settings";

/// At most one row per user; without one the defaults apply.
pub fn fetch_alert_settings(store: &dyn TableStore) -> Result<AlertSettings> {
    let user_id = require_user(store)?;
    let rows: Vec<AlertSettingsRow> = store
        .select(TABLE, &Query::new().eq("user_id", user_id))?
        .decode()?;
    Ok(rows
        .into_iter()
        .next()
        .map(AlertSettings::from)
        .unwrap_or_default())
}

pub fn upsert_alert_settings(store: &dyn TableStore, settings: &AlertSettings) -> Result<Mutation> {
    let user_id = require_user(store)?;
    let payload = serde_json::json!({
        "limit_percent": settings.limit_percent,
        "subscriptions_budget": settings.subscriptions_budget,
    });
    let row = store.upsert(TABLE, owned_row(&payload, &user_id)?, "user_id")?;
    Ok(Mutation::new(
        Entity::AlertSettings,
        MutationKind::Upserted,
        row_id(&row),
    ))
}
