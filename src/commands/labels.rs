// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::warn_if_degraded;
use crate::models::Ledger;
use crate::settings::AccountConfigUpdate;
use crate::store::LedgerStore;
use crate::utils::{maybe_print_json, pretty_table, required_arg};
use anyhow::Result;

pub async fn handle(store: &LedgerStore, ledger: Ledger, m: &clap::ArgMatches) -> Result<()> {
    let mut settings = store.load_or_seed_settings(ledger).await;
    match m.subcommand() {
        Some(("list", sub)) => {
            if !maybe_print_json(
                sub.get_flag("json"),
                sub.get_flag("jsonl"),
                &settings.account_configs,
            )? {
                let data = settings
                    .account_configs
                    .iter()
                    .map(|(key, cfg)| {
                        let default = if *key == settings.default_account_type {
                            "*"
                        } else {
                            ""
                        };
                        vec![
                            key.clone(),
                            cfg.label.clone(),
                            cfg.color.clone(),
                            default.to_string(),
                            cfg.description.clone(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Key", "Label", "Color", "Default", "Description"], data)
                );
            }
            return Ok(());
        }
        Some(("add", sub)) => {
            let label = required_arg(sub, "label")?;
            let key = settings.add_label(
                label,
                sub.get_one::<String>("color").map(|s| s.as_str()),
                sub.get_one::<String>("description")
                    .map(|s| s.as_str())
                    .unwrap_or(""),
            )?;
            println!("Added label '{}' as {}", label.trim(), key);
        }
        Some(("edit", sub)) => {
            let key = required_arg(sub, "key")?;
            let update = AccountConfigUpdate {
                label: sub.get_one::<String>("label").cloned(),
                color: sub.get_one::<String>("color").cloned(),
                description: sub.get_one::<String>("description").cloned(),
            };
            settings.update_label(key, update)?;
            println!("Updated label {}", key);
        }
        Some(("rm", sub)) => {
            let key = required_arg(sub, "key")?;
            let removed = settings.remove_label(key)?;
            println!(
                "Removed label '{}'; default is now {}",
                removed.label, settings.default_account_type
            );
        }
        Some(("default", sub)) => {
            let key = required_arg(sub, "key")?;
            settings.set_default_label(key)?;
            println!("Default label set to {}", key);
        }
        _ => return Ok(()),
    }
    store.save_settings(&settings, ledger).await?;
    warn_if_degraded(store);
    Ok(())
}
