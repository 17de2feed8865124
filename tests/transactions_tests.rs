// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use fluxo::backend::{SqliteStore, TableStore, User};
use fluxo::commands::transactions;
use fluxo::data::{
    MutationKind, TransactionQuery, create_transaction, delete_transaction, fetch_transactions,
    query_transactions, update_transaction,
};
use fluxo::error::Error;
use fluxo::models::{TransactionInput, TransactionKind};
use fluxo::{cli, data};

fn store() -> SqliteStore {
    SqliteStore::open_in_memory()
        .unwrap()
        .with_user(User {
            id: "u1".into(),
            email: Some("ana@fluxo.app".into()),
        })
        .unwrap()
}

fn input(description: &str, amount: f64, kind: TransactionKind) -> TransactionInput {
    TransactionInput {
        description: description.into(),
        subtitle: None,
        amount,
        kind,
        category: None,
        created_at: None,
    }
}

fn dated(description: &str, amount: f64, category: &str, day: &str) -> TransactionInput {
    TransactionInput {
        category: Some(category.into()),
        created_at: Some(format!("{}T12:00:00Z", day)),
        ..input(
            description,
            amount,
            if amount < 0.0 {
                TransactionKind::Expense
            } else {
                TransactionKind::Income
            },
        )
    }
}

#[test]
fn created_expense_is_fetched_back() {
    let s = store();
    let m = create_transaction(&s, &input("Mercado", -50.0, TransactionKind::Expense)).unwrap();
    assert_eq!(m.kind, MutationKind::Created);
    assert!(m.id.is_some());

    let all = fetch_transactions(&s).unwrap();
    assert_eq!(all.len(), 1);
    let t = &all[0];
    assert_eq!(t.description, "Mercado");
    assert_eq!(t.amount, -50.0);
    assert_eq!(t.kind, TransactionKind::Expense);
    assert_eq!(Some(&t.id), m.id.as_ref());
    assert!(!t.created_at.is_empty());
}

#[test]
fn newest_first_and_update_then_delete() {
    let s = store();
    create_transaction(&s, &dated("Salario", 4200.0, "Renda", "2025-01-05")).unwrap();
    let m = create_transaction(&s, &dated("Uber", -38.9, "Transporte", "2025-01-20")).unwrap();
    let id = m.id.unwrap();

    let all = fetch_transactions(&s).unwrap();
    assert_eq!(all[0].description, "Uber");

    update_transaction(&s, &id, &dated("Uber Eats", -42.0, "Delivery", "2025-01-20")).unwrap();
    let all = fetch_transactions(&s).unwrap();
    let t = all.iter().find(|t| t.id == id).unwrap();
    assert_eq!(t.description, "Uber Eats");
    assert_eq!(t.category.as_deref(), Some("Delivery"));

    delete_transaction(&s, &id).unwrap();
    assert!(fetch_transactions(&s).unwrap().iter().all(|t| t.id != id));
}

#[test]
fn pages_cover_the_count_and_past_the_end_is_empty() {
    let s = store();
    for i in 0..23 {
        create_transaction(&s, &input(&format!("Item {}", i), -1.0, TransactionKind::Expense))
            .unwrap();
    }
    let mut q = TransactionQuery {
        page_size: 10,
        ..TransactionQuery::default()
    };
    let first = query_transactions(&s, &q).unwrap();
    assert_eq!(first.count, 23);
    assert_eq!(first.data.len(), 10);
    assert_eq!(first.page_count(10), 3);

    q.page = 3;
    assert_eq!(query_transactions(&s, &q).unwrap().data.len(), 3);

    q.page = 4;
    let past = query_transactions(&s, &q).unwrap();
    assert!(past.data.is_empty());
    assert_eq!(past.count, 23);
}

#[test]
fn huge_page_numbers_are_empty_pages() {
    let s = store();
    for i in 0..3 {
        create_transaction(&s, &input(&format!("Item {}", i), -1.0, TransactionKind::Expense))
            .unwrap();
    }
    for page in [u64::MAX, 1 << 60] {
        let q = TransactionQuery {
            page,
            page_size: 10,
            ..TransactionQuery::default()
        };
        let past = query_transactions(&s, &q).unwrap();
        assert!(past.data.is_empty());
        assert_eq!(past.count, 3);
    }
}

#[test]
fn filters_combine_search_category_and_inclusive_dates() {
    let s = store();
    create_transaction(&s, &dated("Mercado Central", -320.4, "Alimentacao", "2025-02-01")).unwrap();
    create_transaction(&s, &dated("Mercado Livre", -99.0, "Compras", "2025-02-10")).unwrap();
    create_transaction(&s, &dated("Netflix", -39.9, "Assinaturas", "2025-02-10")).unwrap();
    create_transaction(&s, &dated("Freelance", 980.0, "Renda", "2025-03-01")).unwrap();

    let q = TransactionQuery {
        search: Some("mercado".into()),
        ..TransactionQuery::default()
    };
    assert_eq!(query_transactions(&s, &q).unwrap().count, 2);

    // Search looks at descriptions only.
    let q = TransactionQuery {
        search: Some("renda".into()),
        ..TransactionQuery::default()
    };
    assert_eq!(query_transactions(&s, &q).unwrap().count, 0);

    let q = TransactionQuery {
        category: Some("assin".into()),
        ..TransactionQuery::default()
    };
    let page = query_transactions(&s, &q).unwrap();
    assert_eq!(page.data[0].description, "Netflix");

    let q = TransactionQuery {
        start_date: NaiveDate::from_ymd_opt(2025, 2, 2),
        end_date: NaiveDate::from_ymd_opt(2025, 2, 10),
        ..TransactionQuery::default()
    };
    assert_eq!(query_transactions(&s, &q).unwrap().count, 2);
}

#[test]
fn writes_without_a_session_are_rejected() {
    let s = SqliteStore::open_in_memory().unwrap();
    let err = create_transaction(&s, &input("Mercado", -50.0, TransactionKind::Expense))
        .unwrap_err();
    assert!(matches!(err, Error::NotAuthenticated));
    assert_eq!(err.to_string(), "Usuario nao autenticado.");
    assert!(data::require_user(&s).is_err());
    assert!(s.current_user().unwrap().is_none());
}

#[test]
fn tx_add_via_cli_records_the_form_values() {
    let s = store();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "fluxo",
        "tx",
        "add",
        "--set",
        "description=Padaria",
        "--set",
        "amount=-12,50",
        "--set",
        "category=Alimentacao",
        "--set",
        "date=2025-04-02",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(&s, 10, tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }
    let all = fetch_transactions(&s).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].amount, -12.5);
    assert_eq!(all[0].kind, TransactionKind::Expense);
    assert!(all[0].created_at.starts_with("2025-04-02"));
}

#[test]
fn tx_add_with_a_bad_amount_writes_nothing() {
    let s = store();
    let matches = cli::build_cli().get_matches_from([
        "fluxo",
        "tx",
        "add",
        "--set",
        "description=Padaria",
        "--set",
        "amount=doze",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    assert!(transactions::handle(&s, 10, tx_m).is_err());
    assert!(fetch_transactions(&s).unwrap().is_empty());
}
