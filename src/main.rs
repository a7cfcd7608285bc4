// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use edenwallet::{cache::LocalCache, cli, commands, config, db, models::Ledger, store::LedgerStore};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let matches = cli::build_cli().get_matches();
    let ledger: Ledger = matches
        .get_one::<String>("ledger")
        .map(|s| s.as_str())
        .unwrap_or("personal")
        .parse()?;

    let cache = LocalCache::new(db::open_or_init()?);
    let resolved = config::resolve_from(&cache);
    let store = LedgerStore::from_config(cache, &resolved);

    match matches.subcommand() {
        Some(("tx", sub)) => commands::transactions::handle(&store, ledger, sub).await?,
        Some(("category", sub)) => commands::categories::handle(&store, ledger, sub).await?,
        Some(("label", sub)) => commands::labels::handle(&store, ledger, sub).await?,
        Some(("remote", sub)) => commands::remote::handle(&store, sub).await?,
        Some(("sync", _)) => commands::sync::handle(&store, ledger).await?,
        Some(("report", sub)) => commands::reports::handle(&store, ledger, sub).await?,
        Some(("export", sub)) => commands::exporter::handle(&store, ledger, sub).await?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
