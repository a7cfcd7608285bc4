// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Ledger;
use crate::store::LedgerStore;
use crate::utils::required_arg;
use anyhow::{Context, Result, bail};

pub async fn handle(store: &LedgerStore, ledger: Ledger, m: &clap::ArgMatches) -> Result<()> {
    let fmt = required_arg(m, "format")?.to_lowercase();
    let out = required_arg(m, "out")?;
    let count = export_transactions(store, ledger, &fmt, out).await?;
    println!("Exported {} transactions to {}", count, out);
    Ok(())
}

/// Writes the ledger's transactions, oldest first, and returns how many.
pub async fn export_transactions(
    store: &LedgerStore,
    ledger: Ledger,
    fmt: &str,
    out: &str,
) -> Result<usize> {
    let mut txs = store.list_transactions(ledger).await;
    txs.sort_by(|a, b| a.date.cmp(&b.date));

    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out))?;
            wtr.write_record([
                "id",
                "date",
                "amount",
                "spending_category",
                "sub_category",
                "account_type",
                "remarks",
                "ledger",
            ])?;
            for t in &txs {
                let date = t.date.to_string();
                let amount = t.amount.to_string();
                wtr.write_record([
                    t.id.as_str(),
                    date.as_str(),
                    amount.as_str(),
                    t.spending_category.as_str(),
                    t.sub_category.as_str(),
                    t.account_type.as_str(),
                    t.remarks.as_str(),
                    t.ledger.as_str(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&txs)?)
                .with_context(|| format!("Write {}", out))?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(txs.len())
}
