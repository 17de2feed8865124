// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use super::{report, required, run_form};
use crate::backend::TableStore;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use crate::views::goals::{planned_form, submit_planned};
use crate::views::{Container, Goals};

pub fn handle(store: &dyn TableStore, m: &clap::ArgMatches) -> Result<()> {
    let mut page = Goals::default();
    match m.subcommand() {
        Some(("list", sub)) => {
            page.load(store);
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &page.planned)? {
                let rows = page
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
                println!("{}", pretty_table(&["Id", "Title", "Amount", "Frequency"], rows));
                println!("Total: {}", fmt_money(page.planned_total()));
            }
        }
        Some(("add", sub)) => {
            if let Some(mutation) = run_form(planned_form(None), sub, |modal, raw| {
                submit_planned(store, modal, raw, None)
            })? {
                report(&mutation);
            }
        }
        Some(("edit", sub)) => {
            let id = required(sub, "id")?;
            page.load(store);
            let existing = page
                .find_planned(id)
                .with_context(|| format!("Planned expense '{}' not found", id))?;
            if let Some(mutation) = run_form(planned_form(Some(existing)), sub, |modal, raw| {
                submit_planned(store, modal, raw, Some(id.as_str()))
            })? {
                report(&mutation);
            }
        }
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            report(&page.delete_planned(store, id)?);
        }
        _ => {}
    }
    Ok(())
}
