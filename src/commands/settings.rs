// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::{report, run_form};
use crate::backend::TableStore;
use crate::utils::maybe_print_json;
use crate::views::settings::{alerts_form, profile_form, submit_alerts, submit_profile};
use crate::views::{Container, Settings};

pub fn handle(store: &dyn TableStore, m: &clap::ArgMatches) -> Result<()> {
    let mut page = Settings::default();
    page.load(store);
    match m.subcommand() {
        Some(("show", sub)) => {
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &page)? {
                println!("{}", page.render());
            }
        }
        Some(("alerts", sub)) => {
            if let Some(mutation) = run_form(alerts_form(&page.alerts), sub, |modal, raw| {
                submit_alerts(store, modal, raw)
            })? {
                report(&mutation);
            }
        }
        Some(("profile", sub)) => {
            let user_id = page.user_id()?;
            if let Some(mutation) = run_form(profile_form(page.profile.as_ref()), sub, |modal, raw| {
                submit_profile(store, modal, raw, user_id)
            })? {
                report(&mutation);
            }
        }
        _ => {}
    }
    Ok(())
}
