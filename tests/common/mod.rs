// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use edenwallet::cache::LocalCache;
use edenwallet::config::DEFAULT_OWNER_ID;
use edenwallet::db;
use edenwallet::errors::{Result, StoreError};
use edenwallet::models::{Ledger, NewTransaction, Transaction};
use edenwallet::remote::RemoteStore;
use edenwallet::settings::WorkspaceSettings;
use edenwallet::store::LedgerStore;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// In-process stand-in for the PostgREST backend, with a failure switch.
#[derive(Default)]
pub struct FakeRemote {
    rows: Mutex<Vec<(String, Transaction)>>,
    settings: Mutex<HashMap<(String, Ledger), WorkspaceSettings>>,
    failing: AtomicBool,
    failing_writes: AtomicBool,
    next_id: AtomicU64,
}

impl FakeRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Reads keep working while every write fails.
    pub fn set_failing_writes(&self, failing: bool) {
        self.failing_writes.store(failing, Ordering::SeqCst);
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn put_settings(&self, ledger: Ledger, settings: WorkspaceSettings) {
        self.settings
            .lock()
            .unwrap()
            .insert((DEFAULT_OWNER_ID.to_string(), ledger), settings);
    }

    pub fn stored_settings(&self, ledger: Ledger) -> Option<WorkspaceSettings> {
        self.settings
            .lock()
            .unwrap()
            .get(&(DEFAULT_OWNER_ID.to_string(), ledger))
            .cloned()
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::api(503, "service unavailable"))
        } else {
            Ok(())
        }
    }

    fn check_write(&self) -> Result<()> {
        self.check()?;
        if self.failing_writes.load(Ordering::SeqCst) {
            Err(StoreError::api(503, "writes unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteStore for FakeRemote {
    async fn list_transactions(&self, owner: &str, ledger: Ledger) -> Result<Vec<Transaction>> {
        self.check()?;
        let mut out: Vec<Transaction> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(o, t)| o == owner && t.ledger == ledger)
            .map(|(_, t)| t.clone())
            .collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(out)
    }

    async fn insert_transaction(
        &self,
        owner: &str,
        ledger: Ledger,
        draft: &NewTransaction,
    ) -> Result<()> {
        self.check_write()?;
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let tx = Transaction::from_draft(format!("srv-{}", n), ledger, draft.clone());
        self.rows.lock().unwrap().push((owner.to_string(), tx));
        Ok(())
    }

    async fn delete_transaction(&self, owner: &str, id: &str) -> Result<()> {
        self.check_write()?;
        self.rows
            .lock()
            .unwrap()
            .retain(|(o, t)| !(o == owner && t.id == id));
        Ok(())
    }

    async fn fetch_settings(
        &self,
        owner: &str,
        ledger: Ledger,
    ) -> Result<Option<WorkspaceSettings>> {
        self.check()?;
        Ok(self
            .settings
            .lock()
            .unwrap()
            .get(&(owner.to_string(), ledger))
            .cloned())
    }

    async fn upsert_settings(
        &self,
        owner: &str,
        ledger: Ledger,
        settings: &WorkspaceSettings,
    ) -> Result<()> {
        self.check_write()?;
        self.settings
            .lock()
            .unwrap()
            .insert((owner.to_string(), ledger), settings.clone());
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.check()
    }
}

pub fn offline_store() -> LedgerStore {
    let cache = LocalCache::new(db::open_in_memory().unwrap());
    LedgerStore::new(cache, None, DEFAULT_OWNER_ID)
}

pub fn store_with(remote: &Arc<FakeRemote>) -> LedgerStore {
    let cache = LocalCache::new(db::open_in_memory().unwrap());
    let remote: Arc<dyn RemoteStore> = remote.clone();
    LedgerStore::new(cache, Some(remote), DEFAULT_OWNER_ID)
}

pub fn draft(date: &str, amount: i64, scale: u32, category: &str, sub: &str) -> NewTransaction {
    NewTransaction {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        amount: Decimal::new(amount, scale),
        spending_category: category.to_string(),
        sub_category: sub.to_string(),
        account_type: "OWN_EXPENSE".to_string(),
        remarks: String::new(),
    }
}

pub fn lunch() -> NewTransaction {
    NewTransaction {
        remarks: "lunch".to_string(),
        ..draft("2024-01-05", 1550, 2, "Food", "Hawker")
    }
}
