// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use serde_json::json;

use super::{report, required, run_form};
use crate::backend::TableStore;
use crate::utils::maybe_print_json;
use crate::views::investments::{PortfolioList, entry_form, submit_entry};
use crate::views::{Container, Investments};

pub fn handle(store: &dyn TableStore, m: &clap::ArgMatches) -> Result<()> {
    let mut page = Investments::default();
    match m.subcommand() {
        Some(("list", sub)) => {
            page.load(store);
            let out = json!({ "allocations": page.allocations, "returns": page.returns });
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &out)? {
                println!("{}", page.render());
            }
        }
        Some(("alloc-set", sub)) => set(store, &mut page, PortfolioList::Allocations, sub)?,
        Some(("return-set", sub)) => set(store, &mut page, PortfolioList::Returns, sub)?,
        Some(("alloc-rm", sub)) => {
            report(&page.delete(store, PortfolioList::Allocations, required(sub, "id")?)?);
        }
        Some(("return-rm", sub)) => {
            report(&page.delete(store, PortfolioList::Returns, required(sub, "id")?)?);
        }
        _ => {}
    }
    Ok(())
}

/// Without an id a new entry is added; with one, that entry is replaced.
fn set(
    store: &dyn TableStore,
    page: &mut Investments,
    list: PortfolioList,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = sub.get_one::<String>("id").map(String::as_str);
    let existing = match id {
        Some(id) => {
            page.load(store);
            let entry = match list {
                PortfolioList::Allocations => page
                    .find_allocation(id)
                    .map(|a| (a.label.as_str(), a.percent, a.style)),
                PortfolioList::Returns => page
                    .find_return(id)
                    .map(|r| (r.label.as_str(), r.percent, r.style)),
            };
            Some(entry.with_context(|| format!("Entry '{}' not found", id))?)
        }
        None => None,
    };
    if let Some(mutation) = run_form(entry_form(list, existing), sub, |modal, raw| {
        submit_entry(store, list, modal, raw, id)
    })? {
        report(&mutation);
    }
    Ok(())
}
