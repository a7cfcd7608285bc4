// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::warn_if_degraded;
use crate::models::Ledger;
use crate::store::LedgerStore;
use crate::summary::summarize;
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;

pub async fn handle(store: &LedgerStore, ledger: Ledger, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("summary", sub)) = m.subcommand() {
        summary(store, ledger, sub).await?;
    }
    Ok(())
}

async fn summary(store: &LedgerStore, ledger: Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let from = sub
        .get_one::<String>("from")
        .map(|s| parse_date(s))
        .transpose()?;
    let to = sub
        .get_one::<String>("to")
        .map(|s| parse_date(s))
        .transpose()?;
    let txs = store.list_transactions(ledger).await;
    let s = summarize(&txs, ledger, from, to);

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }

    let labels = store
        .get_settings(ledger)
        .await
        .map(|s| s.account_configs)
        .unwrap_or_default();

    println!(
        "{} ledger: {} transactions, total {}, spent {}",
        ledger,
        s.count,
        fmt_money(&s.total),
        fmt_money(&s.spent)
    );
    let balances = vec![
        balance_row("Partner", &s.net_partner),
        balance_row("Shared fund", &s.net_shared),
    ];
    println!("{}", pretty_table(&["Balance with", "Net", "Direction"], balances));
    let by_category = s
        .by_category
        .iter()
        .map(|(k, v)| vec![k.clone(), fmt_money(v)])
        .collect();
    println!("{}", pretty_table(&["Category", "Amount"], by_category));

    let by_account = s
        .by_account
        .iter()
        .map(|(k, v)| {
            let label = labels.get(k).map(|c| c.label.clone()).unwrap_or_else(|| k.clone());
            vec![label, fmt_money(v)]
        })
        .collect();
    println!("{}", pretty_table(&["Account", "Amount"], by_account));

    let by_month = s
        .by_month
        .iter()
        .map(|(k, v)| vec![k.clone(), fmt_money(v)])
        .collect();
    println!("{}", pretty_table(&["Month", "Amount"], by_month));
    warn_if_degraded(store);
    Ok(())
}

fn balance_row(counterparty: &str, net: &Decimal) -> Vec<String> {
    let direction = if net.is_zero() {
        "settled".to_string()
    } else if net.is_sign_negative() {
        format!("you owe {}", counterparty.to_lowercase())
    } else {
        format!("{} owes you", counterparty)
    };
    vec![counterparty.to_string(), fmt_money(&net.abs()), direction]
}
