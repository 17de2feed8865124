// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fluxo::cli;
use fluxo::commands::local;
use fluxo::local_store::{self, LocalStore};
use fluxo::models::{AlertSettings, BarStyle, InvestmentReturn, PlannedExpense};
use tempfile::tempdir;

#[test]
fn missing_keys_fall_back_to_defaults() {
    let dir = tempdir().unwrap();
    let store = LocalStore::new(dir.path());
    assert_eq!(store.alert_settings(), AlertSettings::default());

    let planned = store.planned_expenses();
    let titles: Vec<&str> = planned.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["Casa propria", "Carro", "Curso"]);
    assert!(planned.iter().all(|p| p.frequency == "mes"));

    let allocations = store.investment_allocations();
    assert_eq!(allocations.iter().map(|a| a.percent).sum::<f64>(), 100.0);
    assert_eq!(allocations[1].style, BarStyle::Alt);

    let returns = store.investment_returns();
    assert_eq!(returns.len(), 2);
    assert_eq!(returns[1].percent, 22.9);
}

#[test]
fn unreadable_values_fall_back_too() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join(format!("{}.json", local_store::ALERTS)),
        "{ not json",
    )
    .unwrap();
    let store = LocalStore::new(dir.path());
    assert_eq!(store.alert_settings(), AlertSettings::default());

    let saved = AlertSettings {
        limit_percent: 60.0,
        subscriptions_budget: 300.0,
    };
    store.save_alert_settings(&saved).unwrap();
    assert_eq!(store.alert_settings(), saved);
}

#[test]
fn upsert_replaces_by_id_or_appends() {
    let dir = tempdir().unwrap();
    let store = LocalStore::new(dir.path().join("nested"));

    store
        .upsert_planned_expense(PlannedExpense {
            id: "2".into(),
            title: "Carro novo".into(),
            amount: 1100.0,
            frequency: "mes".into(),
        })
        .unwrap();
    store
        .upsert_planned_expense(PlannedExpense {
            id: "9".into(),
            title: "Viagem".into(),
            amount: 400.0,
            frequency: "ano".into(),
        })
        .unwrap();
    let list = store.planned_expenses();
    assert_eq!(list.len(), 4);
    assert_eq!(list[1].title, "Carro novo");
    assert_eq!(list[3].id, "9");

    store.delete_planned_expense("1").unwrap();
    let ids: Vec<String> = store.planned_expenses().into_iter().map(|p| p.id).collect();
    assert_eq!(ids, ["2", "3", "9"]);

    store
        .upsert_investment_return(InvestmentReturn {
            id: "1".into(),
            label: "12 meses".into(),
            percent: 15.0,
            style: BarStyle::Default,
        })
        .unwrap();
    assert_eq!(store.investment_returns()[0].percent, 15.0);
    store.delete_investment_allocation("3").unwrap();
    assert_eq!(store.investment_allocations().len(), 2);
}

#[test]
fn local_set_via_cli_keeps_other_fields() {
    let dir = tempdir().unwrap();
    let store = LocalStore::new(dir.path());
    let matches = cli::build_cli().get_matches_from([
        "fluxo",
        "local",
        "allocations",
        "set",
        "--id",
        "2",
        "--set",
        "percent=30",
    ]);
    let Some(("local", local_m)) = matches.subcommand() else {
        panic!("no local subcommand");
    };
    local::handle(&store, local_m).unwrap();

    let allocations = store.investment_allocations();
    assert_eq!(allocations.len(), 3);
    assert_eq!(allocations[1].label, "Fundos imobiliarios");
    assert_eq!(allocations[1].percent, 30.0);
    assert_eq!(allocations[1].style, BarStyle::Alt);
}
