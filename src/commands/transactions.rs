// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use super::{exporter, report, required, run_form};
use crate::backend::TableStore;
use crate::data::{TransactionQuery, fetch_transactions};
use crate::utils::{maybe_print_json, parse_date};
use crate::views::statement::{submit_transaction, transaction_form};
use crate::views::{Container, Statement};

pub fn handle(store: &dyn TableStore, page_size: u64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(store, page_size, sub)?,
        Some(("add", sub)) => {
            if let Some(mutation) = run_form(transaction_form(None), sub, |modal, raw| {
                submit_transaction(store, modal, raw, None)
            })? {
                report(&mutation);
            }
        }
        Some(("edit", sub)) => {
            let id = required(sub, "id")?;
            let all = fetch_transactions(store)?;
            let existing = all
                .iter()
                .find(|t| &t.id == id)
                .with_context(|| format!("Transaction '{}' not found", id))?;
            if let Some(mutation) = run_form(transaction_form(Some(existing)), sub, |modal, raw| {
                submit_transaction(store, modal, raw, Some(id.as_str()))
            })? {
                report(&mutation);
            }
        }
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            report(&Statement::default().delete(store, id)?);
        }
        Some(("export", sub)) => exporter::handle(store, page_size, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(store: &dyn TableStore, page_size: u64, sub: &clap::ArgMatches) -> Result<()> {
    let mut statement = Statement::with_query(query_from(sub, page_size)?);
    statement.load(store);
    if !maybe_print_json(
        sub.get_flag("json"),
        sub.get_flag("jsonl"),
        statement.transactions(),
    )? {
        println!("{}", statement.render());
    }
    Ok(())
}

/// Filter and paging flags shared by `tx list` and `tx export`.
pub(crate) fn query_from(sub: &clap::ArgMatches, page_size: u64) -> Result<TransactionQuery> {
    let date = |name: &str| -> Result<_> {
        sub.get_one::<String>(name)
            .map(|s| parse_date(s))
            .transpose()
    };
    Ok(TransactionQuery {
        page: sub.get_one::<u64>("page").copied().unwrap_or(1),
        page_size: sub
            .get_one::<u64>("page-size")
            .copied()
            .unwrap_or(page_size),
        search: sub.get_one::<String>("search").cloned(),
        category: sub.get_one::<String>("category").cloned(),
        start_date: date("from")?,
        end_date: date("to")?,
    })
}
