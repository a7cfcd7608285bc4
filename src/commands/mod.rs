// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::LedgerStore;

pub mod categories;
pub mod exporter;
pub mod labels;
pub mod remote;
pub mod reports;
pub mod sync;
pub mod transactions;

/// Tells the user when results came from the local cache because the remote
/// call failed.
pub fn warn_if_degraded(store: &LedgerStore) {
    let status = store.status();
    if status.degraded {
        eprintln!(
            "note: remote unavailable, using local data ({})",
            status.last_error.unwrap_or_default()
        );
    }
}
