// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Ledger;
use crate::store::LedgerStore;
use anyhow::Result;

pub async fn handle(store: &LedgerStore, ledger: Ledger) -> Result<()> {
    let report = store.reconcile(ledger).await;
    if report.skipped {
        println!("Remote not configured; {} ledger is local only", ledger);
        return Ok(());
    }
    println!(
        "{} ledger: pushed {}, deleted {}, settings {}, {} still queued",
        ledger,
        report.pushed,
        report.deleted,
        if report.settings_pushed {
            "pushed"
        } else {
            "unchanged"
        },
        report.remaining
    );
    Ok(())
}
