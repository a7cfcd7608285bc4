// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::warn_if_degraded;
use crate::models::{Ledger, NewTransaction, Transaction};
use crate::store::LedgerStore;
use crate::utils::{
    fmt_money, maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table,
    required_arg,
};
use anyhow::{Result, bail};

pub async fn handle(store: &LedgerStore, ledger: Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, ledger, sub).await?,
        Some(("list", sub)) => list(store, ledger, sub).await?,
        Some(("rm", sub)) => rm(store, ledger, sub).await?,
        Some(("edit", sub)) => edit(store, ledger, sub).await?,
        _ => {}
    }
    Ok(())
}

async fn add(store: &LedgerStore, ledger: Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let settings = store.load_or_seed_settings(ledger).await;
    let draft = NewTransaction {
        date: parse_date(required_arg(sub, "date")?)?,
        amount: parse_decimal(required_arg(sub, "amount")?)?,
        spending_category: required_arg(sub, "category")?.trim().to_string(),
        sub_category: opt_trimmed(sub, "sub").unwrap_or_default(),
        account_type: opt_trimmed(sub, "account")
            .unwrap_or_else(|| settings.default_account_type.clone()),
        remarks: opt_trimmed(sub, "remarks").unwrap_or_default(),
    };
    settings.check_transaction(&draft)?;

    let (amount, date, category) = (draft.amount, draft.date, draft.spending_category.clone());
    if !store.create_transaction(draft, ledger).await {
        bail!("Could not record transaction: remote and local storage both failed");
    }
    println!(
        "Recorded {} on {} under '{}' ({} ledger)",
        fmt_money(&amount),
        date,
        category,
        ledger
    );
    warn_if_degraded(store);
    Ok(())
}

async fn list(store: &LedgerStore, ledger: Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, ledger, sub).await?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let labels = store
            .get_settings(ledger)
            .await
            .map(|s| s.account_configs)
            .unwrap_or_default();
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.clone(),
                    t.date.to_string(),
                    fmt_money(&t.amount),
                    t.spending_category.clone(),
                    t.sub_category.clone(),
                    labels
                        .get(&t.account_type)
                        .map(|c| c.label.clone())
                        .unwrap_or_else(|| t.account_type.clone()),
                    t.remarks.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Amount", "Category", "Sub", "Account", "Remarks"],
                rows,
            )
        );
    }
    warn_if_degraded(store);
    Ok(())
}

/// Transactions of the ledger, newest first, narrowed by the `list` filters.
pub async fn query_rows(
    store: &LedgerStore,
    ledger: Ledger,
    sub: &clap::ArgMatches,
) -> Result<Vec<Transaction>> {
    let month = sub
        .get_one::<String>("month")
        .map(|m| parse_month(m))
        .transpose()?;
    let category = sub.get_one::<String>("category").map(|s| s.trim());
    let account = sub.get_one::<String>("account").map(|s| s.trim());
    let limit = sub.get_one::<usize>("limit").copied();

    let mut data: Vec<Transaction> = store
        .list_transactions(ledger)
        .await
        .into_iter()
        .filter(|t| {
            month
                .as_deref()
                .is_none_or(|m| t.date.format("%Y-%m").to_string() == m)
        })
        .filter(|t| category.is_none_or(|c| t.spending_category == c))
        .filter(|t| account.is_none_or(|a| t.account_type == a))
        .collect();
    if let Some(limit) = limit {
        data.truncate(limit);
    }
    Ok(data)
}

async fn rm(store: &LedgerStore, ledger: Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let id = required_arg(sub, "id")?.trim();
    if !store.delete_transaction(id, ledger).await {
        bail!("Could not remove transaction {} from the local cache", id);
    }
    println!("Removed transaction {}", id);
    warn_if_degraded(store);
    Ok(())
}

/// Transactions are immutable in the store, so an edit records the
/// replacement first and then deletes the original.
async fn edit(store: &LedgerStore, ledger: Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let id = required_arg(sub, "id")?.trim();
    let Some(existing) = store
        .list_transactions(ledger)
        .await
        .into_iter()
        .find(|t| t.id == id)
    else {
        bail!("Transaction {} not found in {} ledger", id, ledger);
    };

    let mut draft = existing.to_draft();
    if let Some(d) = sub.get_one::<String>("date") {
        draft.date = parse_date(d)?;
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        draft.amount = parse_decimal(a)?;
    }
    if let Some(c) = opt_trimmed(sub, "category") {
        draft.spending_category = c;
    }
    if let Some(s) = sub.get_one::<String>("sub") {
        draft.sub_category = s.trim().to_string();
    }
    if let Some(a) = opt_trimmed(sub, "account") {
        draft.account_type = a;
    }
    if let Some(r) = sub.get_one::<String>("remarks") {
        draft.remarks = r.trim().to_string();
    }
    if draft == existing.to_draft() {
        println!("Nothing to change for {}", id);
        return Ok(());
    }

    let settings = store.load_or_seed_settings(ledger).await;
    settings.check_transaction(&draft)?;
    if !store.create_transaction(draft, ledger).await {
        bail!("Could not record the edited transaction; original {} kept", id);
    }
    store.delete_transaction(id, ledger).await;
    println!("Updated transaction {}", id);
    warn_if_degraded(store);
    Ok(())
}

fn opt_trimmed(sub: &clap::ArgMatches, name: &str) -> Option<String> {
    sub.get_one::<String>(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
