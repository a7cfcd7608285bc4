// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::warn_if_degraded;
use crate::models::Ledger;
use crate::store::LedgerStore;
use crate::utils::{maybe_print_json, pretty_table, required_arg};
use anyhow::Result;

pub async fn handle(store: &LedgerStore, ledger: Ledger, m: &clap::ArgMatches) -> Result<()> {
    let mut settings = store.load_or_seed_settings(ledger).await;
    match m.subcommand() {
        Some(("list", sub)) => {
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &settings.categories)? {
                let data = settings
                    .categories
                    .iter()
                    .map(|(name, subs)| vec![name.clone(), subs.join(", ")])
                    .collect();
                println!("{}", pretty_table(&["Category", "Sub-categories"], data));
            }
            return Ok(());
        }
        Some(("add", sub)) => {
            let name = required_arg(sub, "name")?;
            settings.add_category(name)?;
            println!("Added category '{}'", name.trim());
        }
        Some(("rm", sub)) => {
            let name = required_arg(sub, "name")?;
            let subs = settings.remove_category(name)?;
            println!(
                "Removed category '{}' and {} sub-categories",
                name.trim(),
                subs.len()
            );
        }
        Some(("add-sub", sub)) => {
            let cat = required_arg(sub, "category")?;
            let name = required_arg(sub, "name")?;
            settings.add_sub_category(cat, name)?;
            println!("Added '{}' under '{}'", name.trim(), cat.trim());
        }
        Some(("rm-sub", sub)) => {
            let cat = required_arg(sub, "category")?;
            let name = required_arg(sub, "name")?;
            settings.remove_sub_category(cat, name)?;
            println!("Removed '{}' from '{}'", name.trim(), cat.trim());
        }
        _ => return Ok(()),
    }
    store.save_settings(&settings, ledger).await?;
    warn_if_degraded(store);
    Ok(())
}
