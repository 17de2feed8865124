// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Page-level containers.
//!
//! A container owns the loaded state for its page. `load` issues its reads
//! in parallel and keeps the previous value of any slice whose read fails;
//! failures are logged, never shown. Mutations come back as
//! [`Mutation`] events and [`Container::apply`] decides what to reload.

pub mod cards;
pub mod dashboard;
pub mod goals;
pub mod investments;
pub mod settings;
pub mod statement;
pub mod summary;

use std::collections::BTreeMap;
use std::thread;

use crate::backend::TableStore;
use crate::data::{Entity, Mutation};
use crate::error::{Error, Result};
use crate::forms::FormValues;
use crate::modal::Modal;

pub use cards::Cards;
pub use dashboard::Dashboard;
pub use goals::Goals;
pub use investments::Investments;
pub use settings::Settings;
pub use statement::Statement;

pub trait Container {
    /// Entities whose changes are visible on this page.
    fn watches(&self, entity: Entity) -> bool;

    fn load(&mut self, store: &dyn TableStore);

    /// Full reload when the mutation touches this page; no in-place patching.
    fn apply(&mut self, store: &dyn TableStore, mutation: &Mutation) {
        if self.watches(mutation.entity) {
            tracing::debug!(?mutation, "reloading after mutation");
            self.load(store);
        }
    }

    fn render(&self) -> String;
}

/// Stores a finished read into `slot`, or logs and keeps the old value.
pub(crate) fn settle<T>(what: &str, joined: thread::Result<Result<T>>, slot: &mut T) {
    match joined {
        Ok(Ok(v)) => *slot = v,
        Ok(Err(e)) => tracing::warn!("failed to load {}: {}", what, e),
        Err(_) => tracing::warn!("loader for {} panicked", what),
    }
}

/// Runs a create-or-update form submission through `modal`.
pub fn submit_with<I, C, U>(
    modal: &mut Modal,
    raw: &BTreeMap<String, String>,
    editing: Option<&str>,
    create: C,
    update: U,
) -> Result<Mutation>
where
    I: for<'a> TryFrom<&'a FormValues, Error = Error>,
    C: FnOnce(&I) -> Result<Mutation>,
    U: FnOnce(&str, &I) -> Result<Mutation>,
{
    modal.submit(raw, |values| {
        let input = I::try_from(&values)?;
        match editing {
            Some(id) => update(id, &input),
            None => create(&input),
        }
    })
}

/// `YYYY-MM-DD` prefix of a timestamp, if it has one.
pub(crate) fn day_of(timestamp: &str) -> Option<&str> {
    timestamp
        .get(..10)
        .filter(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").is_ok())
}
