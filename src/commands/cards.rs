// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use super::{report, required, run_form};
use crate::backend::TableStore;
use crate::utils::maybe_print_json;
use crate::views::cards::{card_form, submit_card};
use crate::views::{Cards, Container};

pub fn handle(store: &dyn TableStore, m: &clap::ArgMatches) -> Result<()> {
    let mut page = Cards::default();
    match m.subcommand() {
        Some(("list", sub)) => {
            page.load(store);
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &page.cards)? {
                println!("{}", page.render());
            }
        }
        Some(("add", sub)) => {
            if let Some(mutation) =
                run_form(card_form(None), sub, |modal, raw| submit_card(store, modal, raw, None))?
            {
                report(&mutation);
            }
        }
        Some(("edit", sub)) => {
            let id = required(sub, "id")?;
            page.load(store);
            let existing = page
                .find(id)
                .with_context(|| format!("Card '{}' not found", id))?;
            if let Some(mutation) = run_form(card_form(Some(existing)), sub, |modal, raw| {
                submit_card(store, modal, raw, Some(id.as_str()))
            })? {
                report(&mutation);
            }
        }
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            report(&page.delete(store, id)?);
        }
        _ => {}
    }
    Ok(())
}
