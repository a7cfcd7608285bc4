// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{self, SettingsLayout};
use crate::store::LedgerStore;
use crate::utils::{maybe_print_json, pretty_table, required_arg};
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RemoteStatus {
    pub configured: bool,
    pub source: Option<String>,
    pub url: Option<String>,
    pub key: Option<String>,
    pub layout: Option<String>,
    pub owner_id: String,
    pub degraded: bool,
    pub last_error: Option<String>,
}

/// Re-resolves the remote configuration and combines it with the store's
/// health flags.
pub fn remote_status(store: &LedgerStore) -> RemoteStatus {
    let resolved = config::resolve_from(store.local());
    let health = store.status();
    let remote = resolved.remote.as_ref();
    RemoteStatus {
        configured: remote.is_some(),
        source: remote.map(|r| r.source.to_string()),
        url: remote.map(|r| r.url.clone()),
        key: remote.map(|r| r.key_suffix()),
        layout: remote.map(|r| r.layout.as_str().to_string()),
        owner_id: resolved.owner_id,
        degraded: health.degraded,
        last_error: health.last_error,
    }
}

pub async fn handle(store: &LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("status", sub)) => {
            let status = remote_status(store);
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &status)? {
                let missing = || "-".to_string();
                let rows = vec![
                    vec!["Configured".into(), status.configured.to_string()],
                    vec!["Source".into(), status.source.unwrap_or_else(missing)],
                    vec![
                        "URL".into(),
                        status
                            .url
                            .unwrap_or_else(|| format!("Missing {} in environment", config::ENV_URL)),
                    ],
                    vec![
                        "Key".into(),
                        status
                            .key
                            .unwrap_or_else(|| format!("Missing {} in environment", config::ENV_KEY)),
                    ],
                    vec!["Layout".into(), status.layout.unwrap_or_else(missing)],
                    vec!["Owner".into(), status.owner_id],
                    vec!["Degraded".into(), status.degraded.to_string()],
                    vec!["Last error".into(), status.last_error.unwrap_or_else(missing)],
                ];
                println!("{}", pretty_table(&["Setting", "Value"], rows));
            }
        }
        Some(("set", sub)) => {
            let url = required_arg(sub, "url")?;
            let key = required_arg(sub, "key")?;
            let layout = sub
                .get_one::<String>("layout")
                .map(|l| l.parse::<SettingsLayout>())
                .transpose()?;
            config::save_local(store.local(), url, key, layout)
                .context("Remote settings not saved")?;
            println!("Saved remote {}", url.trim());
            if remote_status(store).source.as_deref() == Some("environment") {
                println!("Note: environment configuration still takes priority");
            }
        }
        Some(("clear", _)) => {
            config::clear_local(store.local())?;
            println!("Cleared locally saved remote settings");
        }
        Some(("test", _)) => {
            store
                .test_connection()
                .await
                .context("Remote connection test failed")?;
            println!("Remote connection OK");
        }
        _ => {}
    }
    Ok(())
}
