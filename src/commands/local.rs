// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::{required, set_values};
use crate::forms::{FormSpec, FormValues};
use crate::local_store::LocalStore;
use crate::models::{
    AlertSettings, BarStyle, InvestmentAllocation, InvestmentReturn, PlannedExpense,
    PlannedExpenseInput, PortfolioEntryInput,
};
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, pretty_table};
use crate::views::goals::planned_form;
use crate::views::investments::{PortfolioList, entry_form};
use crate::views::settings::alerts_form;

pub fn handle(local: &LocalStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("alerts", sub)) => alerts(local, sub),
        Some(("planned", sub)) => planned(local, sub),
        Some(("allocations", sub)) => portfolio(local, PortfolioList::Allocations, sub),
        Some(("returns", sub)) => portfolio(local, PortfolioList::Returns, sub),
        _ => Ok(()),
    }
}

/// Parsed `--set` values, or `None` after printing the form for `--show-form`.
fn fill(spec: FormSpec, sub: &clap::ArgMatches) -> Result<Option<FormValues>> {
    if sub.get_flag("show-form") {
        println!("{}", spec.render());
        return Ok(None);
    }
    Ok(Some(spec.parse(&set_values(sub)?)?))
}

fn new_id() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

fn alerts(local: &LocalStore, sub: &clap::ArgMatches) -> Result<()> {
    let current = local.alert_settings();
    if sub.get_many::<String>("set").is_none() && !sub.get_flag("show-form") {
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &current)? {
            println!(
                "Limit alert at {}; subscriptions budget {}",
                fmt_percent(current.limit_percent),
                fmt_money(current.subscriptions_budget)
            );
        }
        return Ok(());
    }
    if let Some(v) = fill(alerts_form(&current), sub)? {
        let settings = AlertSettings {
            limit_percent: v.required_number("limit_percent")?,
            subscriptions_budget: v.required_number("subscriptions_budget")?,
        };
        local.save_alert_settings(&settings)?;
        println!("Saved local alert settings");
    }
    Ok(())
}

fn planned(local: &LocalStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let list = local.planned_expenses();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &list)? {
                let rows = list
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
            }
        }
        Some(("set", sub)) => {
            let id = sub.get_one::<String>("id");
            let list = local.planned_expenses();
            let existing = id.and_then(|id| list.iter().find(|p| &p.id == id));
            if let Some(v) = fill(planned_form(existing), sub)? {
                let input = PlannedExpenseInput::try_from(&v)?;
                let id = id.cloned().unwrap_or_else(new_id);
                local.upsert_planned_expense(PlannedExpense {
                    id: id.clone(),
                    title: input.title,
                    amount: input.amount,
                    frequency: input.frequency,
                })?;
                println!("Saved planned expense {}", id);
            }
        }
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            local.delete_planned_expense(id)?;
            println!("Removed planned expense {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn portfolio(local: &LocalStore, list: PortfolioList, m: &clap::ArgMatches) -> Result<()> {
    let entries: Vec<(String, String, f64, BarStyle)> = match list {
        PortfolioList::Allocations => local
            .investment_allocations()
            .into_iter()
            .map(|a| (a.id, a.label, a.percent, a.style))
            .collect(),
        PortfolioList::Returns => local
            .investment_returns()
            .into_iter()
            .map(|r| (r.id, r.label, r.percent, r.style))
            .collect(),
    };
    match m.subcommand() {
        Some(("list", sub)) => {
            let json = match list {
                PortfolioList::Allocations => serde_json::to_value(local.investment_allocations())?,
                PortfolioList::Returns => serde_json::to_value(local.investment_returns())?,
            };
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &json)? {
                let rows = entries
                    .iter()
                    .map(|(id, label, percent, style)| {
                        vec![
                            id.clone(),
                            label.clone(),
                            fmt_percent(*percent),
                            style.as_str().to_string(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Id", "Label", "Percent", "Style"], rows));
            }
        }
        Some(("set", sub)) => {
            let id = sub.get_one::<String>("id");
            let existing = id.and_then(|id| {
                entries
                    .iter()
                    .find(|e| &e.0 == id)
                    .map(|(_, label, percent, style)| (label.as_str(), *percent, *style))
            });
            if let Some(v) = fill(entry_form(list, existing), sub)? {
                let input = PortfolioEntryInput::try_from(&v)?;
                let id = id.cloned().unwrap_or_else(new_id);
                match list {
                    PortfolioList::Allocations => {
                        local.upsert_investment_allocation(InvestmentAllocation {
                            id: id.clone(),
                            label: input.label,
                            percent: input.percent,
                            style: input.style,
                        })?
                    }
                    PortfolioList::Returns => local.upsert_investment_return(InvestmentReturn {
                        id: id.clone(),
                        label: input.label,
                        percent: input.percent,
                        style: input.style,
                    })?,
                }
                println!("Saved entry {}", id);
            }
        }
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            match list {
                PortfolioList::Allocations => local.delete_investment_allocation(id)?,
                PortfolioList::Returns => local.delete_investment_return(id)?,
            }
            println!("Removed entry {}", id);
        }
        _ => {}
    }
    Ok(())
}
