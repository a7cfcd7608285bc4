// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local key-value tier backed by the `kv` table.
//!
//! Entity lists and settings documents are stored as JSON under
//! `"<namespace>_<ledger>"` keys. A value that fails to parse is reported as
//! empty rather than as an error.

use crate::errors::{Result, StoreError};
use crate::models::{Ledger, Outbox, Transaction};
use crate::settings::WorkspaceSettings;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

pub const TRANSACTIONS_NAMESPACE: &str = "eden_wallet_data";
pub const SETTINGS_NAMESPACE: &str = "eden_wallet_settings";
pub const OUTBOX_NAMESPACE: &str = "eden_wallet_outbox";

pub fn ledger_key(namespace: &str, ledger: Ledger) -> String {
    format!("{}_{}", namespace, ledger.as_str())
}

pub struct LocalCache {
    conn: Mutex<Connection>,
}

impl LocalCache {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let v = conn
            .query_row("SELECT value FROM kv WHERE key=?1", params![key], |r| {
                r.get(0)
            })
            .optional()?;
        Ok(v)
    }

    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO kv(key, value, updated_at) VALUES(?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=excluded.updated_at",
            params![key, value, chrono::Utc::now()],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM kv WHERE key=?1", params![key])?;
        Ok(())
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                warn!("Ignoring unreadable cache entry '{}': {}", key, e);
                Ok(None)
            }
        }
    }

    fn put_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.put(key, &raw)
    }

    pub fn read_transactions(&self, ledger: Ledger) -> Result<Vec<Transaction>> {
        Ok(self
            .get_json(&ledger_key(TRANSACTIONS_NAMESPACE, ledger))?
            .unwrap_or_default())
    }

    pub fn write_transactions(&self, ledger: Ledger, txs: &[Transaction]) -> Result<()> {
        self.put_json(&ledger_key(TRANSACTIONS_NAMESPACE, ledger), txs)
    }

    /// Cached settings for a ledger; a document that no longer satisfies the
    /// settings invariants reads as absent.
    pub fn read_settings(&self, ledger: Ledger) -> Result<Option<WorkspaceSettings>> {
        let key = ledger_key(SETTINGS_NAMESPACE, ledger);
        let settings: Option<WorkspaceSettings> = self.get_json(&key)?;
        Ok(settings.filter(|s| match s.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!("Ignoring invalid cached settings '{}': {}", key, e);
                false
            }
        }))
    }

    pub fn write_settings(&self, ledger: Ledger, settings: &WorkspaceSettings) -> Result<()> {
        self.put_json(&ledger_key(SETTINGS_NAMESPACE, ledger), settings)
    }

    pub fn read_outbox(&self, ledger: Ledger) -> Result<Outbox> {
        Ok(self
            .get_json(&ledger_key(OUTBOX_NAMESPACE, ledger))?
            .unwrap_or_default())
    }

    pub fn write_outbox(&self, ledger: Ledger, outbox: &Outbox) -> Result<()> {
        let key = ledger_key(OUTBOX_NAMESPACE, ledger);
        if outbox.is_empty() {
            self.remove(&key)
        } else {
            self.put_json(&key, outbox)
        }
    }
}
