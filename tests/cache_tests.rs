// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::lunch;
use edenwallet::cache::{
    LocalCache, OUTBOX_NAMESPACE, SETTINGS_NAMESPACE, TRANSACTIONS_NAMESPACE, ledger_key,
};
use edenwallet::db;
use edenwallet::models::{Ledger, Outbox, Transaction};
use edenwallet::settings::WorkspaceSettings;

fn cache() -> LocalCache {
    LocalCache::new(db::open_in_memory().unwrap())
}

#[test]
fn keys_are_namespaced_per_ledger() {
    assert_eq!(
        ledger_key(TRANSACTIONS_NAMESPACE, Ledger::Personal),
        "eden_wallet_data_Personal"
    );
    assert_eq!(
        ledger_key(SETTINGS_NAMESPACE, Ledger::Joint),
        "eden_wallet_settings_Joint"
    );
}

#[test]
fn transactions_persist_per_ledger() {
    let c = cache();
    let tx = Transaction::from_draft("t1", Ledger::Joint, lunch());
    c.write_transactions(Ledger::Joint, std::slice::from_ref(&tx))
        .unwrap();
    assert_eq!(c.read_transactions(Ledger::Joint).unwrap(), vec![tx]);
    assert!(c.read_transactions(Ledger::Personal).unwrap().is_empty());
}

#[test]
fn corrupt_entries_read_as_empty() {
    let c = cache();
    c.put(&ledger_key(TRANSACTIONS_NAMESPACE, Ledger::Personal), "{not json")
        .unwrap();
    c.put(&ledger_key(SETTINGS_NAMESPACE, Ledger::Personal), "[1,2,3]")
        .unwrap();
    assert!(c.read_transactions(Ledger::Personal).unwrap().is_empty());
    assert_eq!(c.read_settings(Ledger::Personal).unwrap(), None);
}

#[test]
fn invalid_settings_read_as_absent() {
    let c = cache();
    let mut s = WorkspaceSettings::default();
    s.default_account_type = "GONE".into();
    c.write_settings(Ledger::Joint, &s).unwrap();
    assert_eq!(c.read_settings(Ledger::Joint).unwrap(), None);

    c.write_settings(Ledger::Joint, &WorkspaceSettings::default())
        .unwrap();
    assert_eq!(
        c.read_settings(Ledger::Joint).unwrap(),
        Some(WorkspaceSettings::default())
    );
}

#[test]
fn empty_outbox_removes_its_key() {
    let c = cache();
    let key = ledger_key(OUTBOX_NAMESPACE, Ledger::Personal);
    let outbox = Outbox {
        deletes: vec!["srv-9".into()],
        ..Outbox::default()
    };
    c.write_outbox(Ledger::Personal, &outbox).unwrap();
    assert!(c.get(&key).unwrap().is_some());
    assert_eq!(c.read_outbox(Ledger::Personal).unwrap(), outbox);

    c.write_outbox(Ledger::Personal, &Outbox::default()).unwrap();
    assert_eq!(c.get(&key).unwrap(), None);
    assert!(c.read_outbox(Ledger::Personal).unwrap().is_empty());
}

#[test]
fn put_overwrites_and_remove_deletes() {
    let c = cache();
    c.put("remote_url", "https://a.supabase.co").unwrap();
    c.put("remote_url", "https://b.supabase.co").unwrap();
    assert_eq!(
        c.get("remote_url").unwrap().as_deref(),
        Some("https://b.supabase.co")
    );
    c.remove("remote_url").unwrap();
    assert_eq!(c.get("remote_url").unwrap(), None);
}
