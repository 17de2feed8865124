// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::backend::TableStore;
use crate::utils::maybe_print_json;
use crate::views::{Container, Dashboard};

pub fn handle(store: &dyn TableStore, m: &clap::ArgMatches) -> Result<()> {
    let mut page = Dashboard::default();
    page.load(store);
    if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &page)? {
        println!("{}", page.render());
    }
    Ok(())
}
