// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use super::{report, required, run_form};
use crate::backend::TableStore;
use crate::utils::maybe_print_json;
use crate::views::goals::{goal_form, submit_goal};
use crate::views::{Container, Goals};

pub fn handle(store: &dyn TableStore, m: &clap::ArgMatches) -> Result<()> {
    let mut page = Goals::default();
    match m.subcommand() {
        Some(("list", sub)) => {
            page.load(store);
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &page.goals)? {
                println!("{}", page.render());
            }
        }
        Some(("add", sub)) => {
            if let Some(mutation) =
                run_form(goal_form(None), sub, |modal, raw| submit_goal(store, modal, raw, None))?
            {
                report(&mutation);
            }
        }
        Some(("edit", sub)) => {
            let id = required(sub, "id")?;
            page.load(store);
            let existing = page
                .find_goal(id)
                .with_context(|| format!("Goal '{}' not found", id))?;
            if let Some(mutation) = run_form(goal_form(Some(existing)), sub, |modal, raw| {
                submit_goal(store, modal, raw, Some(id.as_str()))
            })? {
                report(&mutation);
            }
        }
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            report(&page.delete_goal(store, id)?);
        }
        _ => {}
    }
    Ok(())
}
