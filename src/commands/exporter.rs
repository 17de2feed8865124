// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::{Context, Result};

use super::required;
use super::transactions::query_from;
use crate::backend::TableStore;
use crate::data::{fetch_transactions, query_transactions};
use crate::export::{ExportFormat, export_transactions};

/// `tx export`: the current statement page by default, every row with `--all`.
pub fn handle(store: &dyn TableStore, page_size: u64, sub: &clap::ArgMatches) -> Result<()> {
    let format: ExportFormat = required(sub, "format")?.parse()?;
    let out = required(sub, "out")?;

    let rows = if sub.get_flag("all") {
        fetch_transactions(store)?
    } else {
        query_transactions(store, &query_from(sub, page_size)?)?.data
    };

    export_transactions(&rows, Path::new(out), format)
        .with_context(|| format!("Failed to export to {}", out))?;
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}
