// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{FakeRemote, draft, lunch, offline_store, store_with};
use edenwallet::models::Ledger;
use edenwallet::store::LedgerStore;
use edenwallet::{cli, commands::transactions};
use rust_decimal::Decimal;

async fn seeded() -> LedgerStore {
    let store = offline_store();
    for (date, cat, sub) in [
        ("2025-01-01", "Food", "Cafe"),
        ("2025-01-02", "Transport", "Fuel"),
        ("2025-02-03", "Food", "Hawker"),
    ] {
        store
            .create_transaction(draft(date, -1000, 2, cat, sub), Ledger::Personal)
            .await;
    }
    store
}

fn tx_sub(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["edenwallet", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("tx", tx_m)) => tx_m.clone(),
        _ => panic!("no tx subcommand"),
    }
}

fn list_sub(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["list"];
    argv.extend_from_slice(args);
    match tx_sub(&argv).subcommand() {
        Some(("list", list_m)) => list_m.clone(),
        _ => panic!("no list subcommand"),
    }
}

#[tokio::test]
async fn list_limit_respected() {
    let store = seeded().await;
    let rows = transactions::query_rows(&store, Ledger::Personal, &list_sub(&["--limit", "2"]))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date.to_string(), "2025-02-03");
}

#[tokio::test]
async fn list_filters_by_month_and_category() {
    let store = seeded().await;
    let rows =
        transactions::query_rows(&store, Ledger::Personal, &list_sub(&["--month", "2025-01"]))
            .await
            .unwrap();
    assert_eq!(rows.len(), 2);

    let rows = transactions::query_rows(
        &store,
        Ledger::Personal,
        &list_sub(&["--category", "Food", "--month", "2025-01"]),
    )
    .await
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].sub_category, "Cafe");

    assert!(
        transactions::query_rows(&store, Ledger::Personal, &list_sub(&["--month", "Jan"]))
            .await
            .is_err()
    );
}

#[tokio::test]
async fn add_uses_ledger_default_label() {
    let store = offline_store();
    let m = tx_sub(&[
        "add",
        "--date",
        "2024-01-05",
        "--amount",
        "15.50",
        "--category",
        "Food",
        "--sub",
        "Hawker",
        "--remarks",
        "lunch",
    ]);
    transactions::handle(&store, Ledger::Joint, &m).await.unwrap();

    let rows = store.list_transactions(Ledger::Joint).await;
    assert_eq!(rows.len(), 1);
    assert!(rows[0].matches_draft(&lunch()));
    assert!(store.list_transactions(Ledger::Personal).await.is_empty());
}

#[tokio::test]
async fn add_rejects_unknown_category() {
    let store = offline_store();
    let m = tx_sub(&[
        "add", "--date", "2024-01-05", "--amount", "-3", "--category", "Pets",
    ]);
    assert!(transactions::handle(&store, Ledger::Personal, &m).await.is_err());
    assert!(store.list_transactions(Ledger::Personal).await.is_empty());
}

#[tokio::test]
async fn edit_replaces_the_original() {
    let remote = FakeRemote::new();
    let store = store_with(&remote);
    store.create_transaction(lunch(), Ledger::Personal).await;
    let id = store.list_transactions(Ledger::Personal).await[0].id.clone();

    let m = tx_sub(&["edit", "--id", &id, "--amount", "18.00", "--sub", "Cafe"]);
    transactions::handle(&store, Ledger::Personal, &m).await.unwrap();

    let rows = store.list_transactions(Ledger::Personal).await;
    assert_eq!(rows.len(), 1);
    assert_ne!(rows[0].id, id);
    assert_eq!(rows[0].amount, Decimal::new(1800, 2));
    assert_eq!(rows[0].sub_category, "Cafe");
    assert_eq!(rows[0].remarks, "lunch");
    assert_eq!(remote.row_count(), 1);
}

#[tokio::test]
async fn rm_deletes_by_id() {
    let store = seeded().await;
    let id = store.list_transactions(Ledger::Personal).await[1].id.clone();
    let m = tx_sub(&["rm", "--id", &id]);
    transactions::handle(&store, Ledger::Personal, &m).await.unwrap();
    let rows = store.list_transactions(Ledger::Personal).await;
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|t| t.id != id));
}
