// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod cards;
pub mod dashboard;
pub mod exporter;
pub mod goals;
pub mod investments;
pub mod local;
pub mod planned;
pub mod settings;
pub mod transactions;

use std::collections::BTreeMap;

use anyhow::{Context, Result};

use crate::data::Mutation;
use crate::forms::{FormSpec, raw_values};
use crate::modal::Modal;

pub(crate) fn required<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a String> {
    m.get_one::<String>(name)
        .with_context(|| format!("missing --{}", name))
}

pub(crate) fn set_values(m: &clap::ArgMatches) -> Result<BTreeMap<String, String>> {
    Ok(raw_values(m.get_many::<String>("set").into_iter().flatten())?)
}

/// Prints the form for `--show-form`, otherwise submits `--set` values through
/// a modal. `None` means nothing was written.
pub(crate) fn run_form<F>(spec: FormSpec, m: &clap::ArgMatches, submit: F) -> Result<Option<Mutation>>
where
    F: FnOnce(&mut Modal, &BTreeMap<String, String>) -> crate::error::Result<Mutation>,
{
    if m.get_flag("show-form") {
        println!("{}", spec.render());
        return Ok(None);
    }
    let raw = set_values(m)?;
    let title = spec.title.clone();
    let mut modal = Modal::open(spec);
    let mutation = submit(&mut modal, &raw).with_context(|| format!("{} failed", title))?;
    Ok(Some(mutation))
}

pub(crate) fn report(mutation: &Mutation) {
    println!(
        "{:?} {:?} {}",
        mutation.kind,
        mutation.entity,
        mutation.id.as_deref().unwrap_or("")
    );
}
