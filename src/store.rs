// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Two-tier persistence facade.
//!
//! The local cache is the source of truth for the running session; the
//! remote, when configured, is tried first and mirrored best-effort. No
//! operation here returns a remote or cache failure to the caller: failures
//! are logged, recorded in [`StoreStatus`], and answered from the local tier.
//! Writes that miss a configured remote are queued in the ledger's outbox
//! and replayed by [`LedgerStore::reconcile`].

use crate::cache::LocalCache;
use crate::config::ResolvedConfig;
use crate::errors::{Result, SettingsError, StoreError};
use crate::models::{Ledger, NewTransaction, Outbox, Transaction};
use crate::remote::{PostgrestStore, RemoteStore};
use crate::settings::WorkspaceSettings;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStatus {
    pub remote_configured: bool,
    /// The most recent remote call failed and results came from the cache.
    pub degraded: bool,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// No remote is configured, nothing was attempted.
    pub skipped: bool,
    pub pushed: usize,
    pub deleted: usize,
    pub settings_pushed: bool,
    /// Outbox entries still waiting after this pass.
    pub remaining: usize,
}

/// Serializes cache read-modify-write sequences per ledger.
#[derive(Default)]
struct LedgerLocks {
    personal: tokio::sync::Mutex<()>,
    joint: tokio::sync::Mutex<()>,
}

impl LedgerLocks {
    fn get(&self, ledger: Ledger) -> &tokio::sync::Mutex<()> {
        match ledger {
            Ledger::Personal => &self.personal,
            Ledger::Joint => &self.joint,
        }
    }
}

pub struct LedgerStore {
    local: LocalCache,
    remote: Option<Arc<dyn RemoteStore>>,
    owner_id: String,
    locks: LedgerLocks,
    status: Mutex<StoreStatus>,
}

/// Remote rows plus local creates not yet pushed, minus deletes not yet
/// applied remotely, newest date first. Pending creates lead within a date.
fn merge_pending(rows: Vec<Transaction>, outbox: &Outbox) -> Vec<Transaction> {
    let mut merged = outbox.creates.clone();
    merged.extend(
        rows.into_iter()
            .filter(|t| !outbox.deletes.contains(&t.id))
            .filter(|t| !outbox.creates.iter().any(|c| c.id == t.id)),
    );
    merged.sort_by(|a, b| b.date.cmp(&a.date));
    merged
}

/// What the remote said about a ledger's settings document.
enum RemoteSettings {
    Found(WorkspaceSettings),
    Absent,
    Unavailable,
}

impl LedgerStore {
    /// `remote: None` runs the store on the local tier only.
    pub fn new(
        local: LocalCache,
        remote: Option<Arc<dyn RemoteStore>>,
        owner_id: impl Into<String>,
    ) -> Self {
        let status = StoreStatus {
            remote_configured: remote.is_some(),
            ..StoreStatus::default()
        };
        Self {
            local,
            remote,
            owner_id: owner_id.into(),
            locks: LedgerLocks::default(),
            status: Mutex::new(status),
        }
    }

    pub fn from_config(local: LocalCache, config: &ResolvedConfig) -> Self {
        let remote: Option<Arc<dyn RemoteStore>> = match &config.remote {
            Some(rc) => match PostgrestStore::new(rc) {
                Ok(store) => {
                    debug!("Remote configured from {} ({})", rc.source, rc.url);
                    Some(Arc::new(store))
                }
                Err(e) => {
                    warn!("Remote disabled, could not build client: {}", e);
                    None
                }
            },
            None => {
                debug!("Remote not configured, using local cache only");
                None
            }
        };
        Self::new(local, remote, config.owner_id.clone())
    }

    pub fn local(&self) -> &LocalCache {
        &self.local
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn remote_configured(&self) -> bool {
        self.remote.is_some()
    }

    pub fn status(&self) -> StoreStatus {
        match self.status.lock() {
            Ok(s) => s.clone(),
            Err(_) => StoreStatus {
                remote_configured: self.remote_configured(),
                degraded: true,
                last_error: Some(StoreError::LockPoisoned.to_string()),
            },
        }
    }

    fn mark_ok(&self) {
        if let Ok(mut s) = self.status.lock() {
            s.degraded = false;
            s.last_error = None;
        }
    }

    fn mark_failed(&self, op: &str, err: &StoreError) {
        warn!("Remote {} failed, falling back to local cache: {}", op, err);
        if let Ok(mut s) = self.status.lock() {
            s.degraded = true;
            s.last_error = Some(format!("{}: {}", op, err));
        }
    }

    fn read_local(&self, ledger: Ledger) -> Vec<Transaction> {
        self.local.read_transactions(ledger).unwrap_or_else(|e| {
            error!("Local cache read failed for {} ledger: {}", ledger, e);
            Vec::new()
        })
    }

    fn read_local_settings(&self, ledger: Ledger) -> Option<WorkspaceSettings> {
        self.local.read_settings(ledger).unwrap_or_else(|e| {
            error!("Local settings read failed for {} ledger: {}", ledger, e);
            None
        })
    }

    fn read_outbox(&self, ledger: Ledger) -> Outbox {
        self.local.read_outbox(ledger).unwrap_or_else(|e| {
            warn!("Outbox read failed for {} ledger: {}", ledger, e);
            Outbox::default()
        })
    }

    /// Transactions for a ledger, newest first. Never fails; may be stale.
    pub async fn list_transactions(&self, ledger: Ledger) -> Vec<Transaction> {
        if let Some(remote) = &self.remote {
            match remote.list_transactions(&self.owner_id, ledger).await {
                Ok(rows) => {
                    self.mark_ok();
                    let _guard = self.locks.get(ledger).lock().await;
                    let merged = merge_pending(rows, &self.read_outbox(ledger));
                    if let Err(e) = self.local.write_transactions(ledger, &merged) {
                        warn!("Could not refresh local cache for {} ledger: {}", ledger, e);
                    }
                    return merged;
                }
                Err(e) => self.mark_failed("list transactions", &e),
            }
        }
        let _guard = self.locks.get(ledger).lock().await;
        self.read_local(ledger)
    }

    /// Records a transaction. Returns `false` only when the local fallback
    /// write fails as well.
    pub async fn create_transaction(&self, draft: NewTransaction, ledger: Ledger) -> bool {
        let mut queue = false;
        if let Some(remote) = &self.remote {
            match remote
                .insert_transaction(&self.owner_id, ledger, &draft)
                .await
            {
                Ok(()) => {
                    self.mark_ok();
                    return true;
                }
                Err(e) => {
                    self.mark_failed("create transaction", &e);
                    queue = true;
                }
            }
        }

        let tx = Transaction::from_draft(Uuid::new_v4().to_string(), ledger, draft);
        let id = tx.id.clone();
        let _guard = self.locks.get(ledger).lock().await;
        match self.prepend_local(ledger, tx, queue) {
            Ok(()) => {
                debug!("Stored transaction {} locally in {} ledger", id, ledger);
                true
            }
            Err(e) => {
                error!(
                    "Transaction lost, both tiers failed for {} ledger: {}",
                    ledger, e
                );
                false
            }
        }
    }

    fn prepend_local(&self, ledger: Ledger, tx: Transaction, queue: bool) -> Result<()> {
        let mut current = self.local.read_transactions(ledger)?;
        current.insert(0, tx.clone());
        self.local.write_transactions(ledger, &current)?;
        if queue {
            let mut outbox = self.local.read_outbox(ledger)?;
            outbox.creates.insert(0, tx);
            self.local.write_outbox(ledger, &outbox)?;
        }
        Ok(())
    }

    /// Deletes a transaction from both tiers. The local removal happens even
    /// when the remote call fails.
    pub async fn delete_transaction(&self, id: &str, ledger: Ledger) -> bool {
        let mut remote_failed = false;
        if let Some(remote) = &self.remote {
            match remote.delete_transaction(&self.owner_id, id).await {
                Ok(()) => self.mark_ok(),
                Err(e) => {
                    self.mark_failed("delete transaction", &e);
                    remote_failed = true;
                }
            }
        }

        let _guard = self.locks.get(ledger).lock().await;
        match self.remove_local(ledger, id, remote_failed) {
            Ok(()) => true,
            Err(e) => {
                error!(
                    "Could not remove transaction {} from {} ledger cache: {}",
                    id, ledger, e
                );
                false
            }
        }
    }

    fn remove_local(&self, ledger: Ledger, id: &str, remote_failed: bool) -> Result<()> {
        let mut current = self.local.read_transactions(ledger)?;
        current.retain(|t| t.id != id);
        self.local.write_transactions(ledger, &current)?;

        let mut outbox = self.local.read_outbox(ledger)?;
        let original = outbox.clone();
        let before = outbox.creates.len();
        outbox.creates.retain(|t| t.id != id);
        let was_pending = outbox.creates.len() != before;
        if remote_failed && !was_pending {
            if !outbox.deletes.iter().any(|d| d == id) {
                outbox.deletes.push(id.to_string());
            }
        } else if !remote_failed {
            outbox.deletes.retain(|d| d != id);
        }
        if outbox != original {
            self.local.write_outbox(ledger, &outbox)?;
        }
        Ok(())
    }

    /// Settings for a ledger, or `None` when neither tier has any. Callers
    /// seed defaults (see [`LedgerStore::load_or_seed_settings`]).
    pub async fn get_settings(&self, ledger: Ledger) -> Option<WorkspaceSettings> {
        let fetched = self.fetch_remote_settings(ledger).await;
        self.settle_settings(ledger, fetched).await
    }

    /// Mirrors a remote document into the cache unless unsynced local edits
    /// exist; otherwise answers from the cache.
    async fn settle_settings(
        &self,
        ledger: Ledger,
        fetched: RemoteSettings,
    ) -> Option<WorkspaceSettings> {
        let _guard = self.locks.get(ledger).lock().await;
        let RemoteSettings::Found(settings) = fetched else {
            return self.read_local_settings(ledger);
        };
        if self.read_outbox(ledger).settings_dirty {
            if let Some(local) = self.read_local_settings(ledger) {
                debug!("Keeping unsynced local settings for {} ledger", ledger);
                return Some(local);
            }
        }
        if let Err(e) = self.local.write_settings(ledger, &settings) {
            warn!("Could not mirror settings for {} ledger: {}", ledger, e);
        }
        Some(settings)
    }

    async fn fetch_remote_settings(&self, ledger: Ledger) -> RemoteSettings {
        let Some(remote) = &self.remote else {
            return RemoteSettings::Unavailable;
        };
        match remote.fetch_settings(&self.owner_id, ledger).await {
            Ok(Some(settings)) => {
                self.mark_ok();
                RemoteSettings::Found(settings)
            }
            Ok(None) => {
                self.mark_ok();
                debug!("No remote settings for {} ledger", ledger);
                RemoteSettings::Absent
            }
            Err(e) => {
                self.mark_failed("fetch settings", &e);
                RemoteSettings::Unavailable
            }
        }
    }

    /// Writes settings locally, then upserts them remotely. Only a document
    /// that breaks the settings invariants is refused.
    pub async fn save_settings(
        &self,
        settings: &WorkspaceSettings,
        ledger: Ledger,
    ) -> std::result::Result<(), SettingsError> {
        settings.validate()?;
        {
            let _guard = self.locks.get(ledger).lock().await;
            if let Err(e) = self.local.write_settings(ledger, settings) {
                error!("Could not cache settings for {} ledger: {}", ledger, e);
            }
        }

        if let Some(remote) = &self.remote {
            let dirty = match remote
                .upsert_settings(&self.owner_id, ledger, settings)
                .await
            {
                Ok(()) => {
                    self.mark_ok();
                    false
                }
                Err(e) => {
                    self.mark_failed("save settings", &e);
                    true
                }
            };
            let _guard = self.locks.get(ledger).lock().await;
            if let Err(e) = self.set_settings_dirty(ledger, dirty) {
                warn!("Could not update outbox for {} ledger: {}", ledger, e);
            }
        }
        Ok(())
    }

    fn set_settings_dirty(&self, ledger: Ledger, dirty: bool) -> Result<()> {
        let mut outbox = self.local.read_outbox(ledger)?;
        if outbox.settings_dirty != dirty {
            outbox.settings_dirty = dirty;
            self.local.write_outbox(ledger, &outbox)?;
        }
        Ok(())
    }

    /// Settings for a ledger, seeding the defaults when neither tier has
    /// any. The remote is seeded only when it answered that it has no
    /// document. A seed never marks the settings dirty.
    pub async fn load_or_seed_settings(&self, ledger: Ledger) -> WorkspaceSettings {
        let fetched = self.fetch_remote_settings(ledger).await;
        let remote_absent = matches!(fetched, RemoteSettings::Absent);
        if let Some(settings) = self.settle_settings(ledger, fetched).await {
            return settings;
        }

        info!("Seeding default settings for {} ledger", ledger);
        let defaults = WorkspaceSettings::default();
        {
            let _guard = self.locks.get(ledger).lock().await;
            if let Err(e) = self.local.write_settings(ledger, &defaults) {
                error!("Could not cache default settings for {} ledger: {}", ledger, e);
            }
        }
        if let (true, Some(remote)) = (remote_absent, &self.remote) {
            match remote.upsert_settings(&self.owner_id, ledger, &defaults).await {
                Ok(()) => self.mark_ok(),
                Err(e) => self.mark_failed("seed settings", &e),
            }
        }
        defaults
    }

    /// Replays the ledger's outbox against the remote, then refreshes the
    /// local cache from it.
    pub async fn reconcile(&self, ledger: Ledger) -> ReconcileReport {
        let Some(remote) = &self.remote else {
            return ReconcileReport {
                skipped: true,
                ..ReconcileReport::default()
            };
        };

        let (outbox, local_settings) = {
            let _guard = self.locks.get(ledger).lock().await;
            (self.read_outbox(ledger), self.read_local_settings(ledger))
        };

        let mut done_deletes = Vec::new();
        for id in &outbox.deletes {
            match remote.delete_transaction(&self.owner_id, id).await {
                Ok(()) => done_deletes.push(id.clone()),
                Err(e) => self.mark_failed("replay delete", &e),
            }
        }

        // Oldest first, so remote insertion order follows local order.
        let mut done_creates = Vec::new();
        for tx in outbox.creates.iter().rev() {
            match remote
                .insert_transaction(&self.owner_id, ledger, &tx.to_draft())
                .await
            {
                Ok(()) => done_creates.push(tx.id.clone()),
                Err(e) => self.mark_failed("replay create", &e),
            }
        }

        let mut settings_pushed = false;
        if outbox.settings_dirty {
            if let Some(settings) = &local_settings {
                match remote
                    .upsert_settings(&self.owner_id, ledger, settings)
                    .await
                {
                    Ok(()) => settings_pushed = true,
                    Err(e) => self.mark_failed("replay settings", &e),
                }
            }
        }

        let mut report = ReconcileReport {
            skipped: false,
            pushed: done_creates.len(),
            deleted: done_deletes.len(),
            settings_pushed,
            remaining: 0,
        };
        {
            let _guard = self.locks.get(ledger).lock().await;
            let mut current = self.read_outbox(ledger);
            current.deletes.retain(|id| !done_deletes.contains(id));
            current.creates.retain(|t| !done_creates.contains(&t.id));
            if settings_pushed {
                current.settings_dirty = false;
            }
            report.remaining = current.creates.len()
                + current.deletes.len()
                + usize::from(current.settings_dirty);
            if let Err(e) = self.local.write_outbox(ledger, &current) {
                warn!("Could not update outbox for {} ledger: {}", ledger, e);
            }
        }

        info!(
            "Reconciled {} ledger: {} pushed, {} deleted, {} remaining",
            ledger, report.pushed, report.deleted, report.remaining
        );
        let replay_error = self.status().last_error;
        let _ = self.list_transactions(ledger).await;
        if report.remaining > 0 {
            self.keep_degraded(replay_error);
        }
        report
    }

    /// Re-flags the store after a refresh succeeded while outbox entries
    /// are still waiting.
    fn keep_degraded(&self, replay_error: Option<String>) {
        if let Ok(mut s) = self.status.lock() {
            s.degraded = true;
            if s.last_error.is_none() {
                s.last_error =
                    Some(replay_error.unwrap_or_else(|| "outbox entries still queued".to_string()));
            }
        }
    }

    /// Round trip to the remote; errors when none is configured.
    pub async fn test_connection(&self) -> Result<()> {
        let remote = self
            .remote
            .as_ref()
            .ok_or_else(|| StoreError::config("remote is not configured"))?;
        match remote.ping().await {
            Ok(()) => {
                self.mark_ok();
                Ok(())
            }
            Err(e) => {
                self.mark_failed("connection test", &e);
                Err(e)
            }
        }
    }
}
