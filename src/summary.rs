// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Ledger, Transaction};
use crate::settings::{
    DEFAULT_ACCOUNT_TYPE, OWED_BY_PARTNER, OWED_BY_SHARED, OWED_TO_PARTNER, OWED_TO_SHARED,
    USER_LABEL_PREFIX,
};
use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    /// Every amount in range, whatever its label.
    pub total: Decimal,
    /// Amounts that count as the ledger's own spending.
    pub spent: Decimal,
    /// Owed by the partner minus owed to the partner; positive means the
    /// partner owes you.
    pub net_partner: Decimal,
    /// Same balance against the shared fund.
    pub net_shared: Decimal,
    /// Spending per category, largest first.
    pub by_category: IndexMap<String, Decimal>,
    /// Spending keyed by `YYYY-MM`, oldest first.
    pub by_month: BTreeMap<String, Decimal>,
    /// Every amount per account label.
    pub by_account: IndexMap<String, Decimal>,
}

/// Whether a label counts as spending. In the Personal ledger money owed
/// back to you is not your spending; the Joint ledger counts everything.
pub fn counts_as_spending(ledger: Ledger, account_type: &str) -> bool {
    match ledger {
        Ledger::Joint => true,
        Ledger::Personal => {
            matches!(
                account_type,
                DEFAULT_ACCOUNT_TYPE | OWED_TO_PARTNER | OWED_TO_SHARED
            ) || account_type.starts_with(USER_LABEL_PREFIX)
        }
    }
}

fn sorted_desc(map: IndexMap<String, Decimal>) -> IndexMap<String, Decimal> {
    let mut entries: Vec<(String, Decimal)> = map.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.into_iter().collect()
}

/// Aggregates a ledger's transactions dated within `[from, to]`; open
/// bounds include all.
pub fn summarize(
    txs: &[Transaction],
    ledger: Ledger,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Summary {
    let mut s = Summary::default();
    let mut by_category: IndexMap<String, Decimal> = IndexMap::new();
    let mut by_account: IndexMap<String, Decimal> = IndexMap::new();

    for t in txs
        .iter()
        .filter(|t| from.is_none_or(|f| t.date >= f))
        .filter(|t| to.is_none_or(|end| t.date <= end))
    {
        s.count += 1;
        s.total += t.amount;
        *by_account
            .entry(t.account_type.clone())
            .or_insert(Decimal::ZERO) += t.amount;

        match t.account_type.as_str() {
            OWED_BY_PARTNER => s.net_partner += t.amount,
            OWED_TO_PARTNER => s.net_partner -= t.amount,
            OWED_BY_SHARED => s.net_shared += t.amount,
            OWED_TO_SHARED => s.net_shared -= t.amount,
            _ => {}
        }

        if !counts_as_spending(ledger, &t.account_type) {
            continue;
        }
        s.spent += t.amount;
        *by_category
            .entry(t.spending_category.clone())
            .or_insert(Decimal::ZERO) += t.amount;
        *s.by_month
            .entry(t.date.format("%Y-%m").to_string())
            .or_insert(Decimal::ZERO) += t.amount;
    }

    s.by_category = sorted_desc(by_category);
    s.by_account = sorted_desc(by_account);
    s
}
