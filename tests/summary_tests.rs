// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use chrono::NaiveDate;
use common::draft;
use edenwallet::models::{Ledger, Transaction};
use edenwallet::summary::{counts_as_spending, summarize};
use rust_decimal::Decimal;

fn labelled(id: &str, date: &str, cents: i64, category: &str, account: &str) -> Transaction {
    let mut d = draft(date, cents, 2, category, "");
    d.account_type = account.to_string();
    Transaction::from_draft(id, Ledger::Personal, d)
}

fn sample() -> Vec<Transaction> {
    vec![
        labelled("a", "2024-01-05", 1550, "Food", "OWN_EXPENSE"),
        labelled("b", "2024-01-20", 2500, "Food", "OWN_EXPENSE"),
        labelled("c", "2024-02-10", 4000, "Bills", "OWED_TO_PARTNER"),
        labelled("d", "2024-03-01", 1000, "Transport", "OWN_EXPENSE"),
        labelled("e", "2024-03-02", 6000, "Shopping", "OWED_BY_PARTNER"),
        labelled("f", "2024-03-03", 1200, "Bills", "OWED_BY_SHARED"),
        labelled("g", "2024-03-04", 700, "Food", "OWED_TO_SHARED"),
        labelled("h", "2024-03-05", 300, "Others", "USER_1700000000000"),
    ]
}

#[test]
fn personal_spend_excludes_money_owed_to_you() {
    let s = summarize(&sample(), Ledger::Personal, None, None);
    assert_eq!(s.count, 8);
    assert_eq!(s.total, Decimal::new(17250, 2));
    // 15.50 + 25.00 + 40.00 + 10.00 + 7.00 + 3.00
    assert_eq!(s.spent, Decimal::new(10050, 2));
    assert!(!s.by_category.contains_key("Shopping"));
    assert_eq!(s.by_category["Bills"], Decimal::new(4000, 2));
    assert_eq!(s.by_month["2024-03"], Decimal::new(2000, 2));
    assert_eq!(s.by_account["OWED_BY_PARTNER"], Decimal::new(6000, 2));
}

#[test]
fn joint_ledger_counts_everything_as_spend() {
    let s = summarize(&sample(), Ledger::Joint, None, None);
    assert_eq!(s.spent, s.total);
    assert_eq!(s.by_category["Shopping"], Decimal::new(6000, 2));
}

#[test]
fn net_balances_with_partner_and_shared_fund() {
    let s = summarize(&sample(), Ledger::Personal, None, None);
    // 60.00 owed by partner - 40.00 owed to partner
    assert_eq!(s.net_partner, Decimal::new(2000, 2));
    // 12.00 owed by fund - 7.00 owed to fund
    assert_eq!(s.net_shared, Decimal::new(500, 2));

    let s = summarize(&sample()[..3], Ledger::Personal, None, None);
    assert_eq!(s.net_partner, Decimal::new(-4000, 2));
    assert_eq!(s.net_shared, Decimal::ZERO);
}

#[test]
fn spend_labels_per_ledger() {
    assert!(counts_as_spending(Ledger::Personal, "OWN_EXPENSE"));
    assert!(counts_as_spending(Ledger::Personal, "OWED_TO_SHARED"));
    assert!(counts_as_spending(Ledger::Personal, "USER_42"));
    assert!(!counts_as_spending(Ledger::Personal, "OWED_BY_SHARED"));
    assert!(!counts_as_spending(Ledger::Personal, "SOMETHING_ELSE"));
    assert!(counts_as_spending(Ledger::Joint, "OWED_BY_PARTNER"));
}

#[test]
fn category_and_month_order() {
    let s = summarize(&sample(), Ledger::Personal, None, None);
    let cats: Vec<_> = s.by_category.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    assert_eq!(
        cats,
        vec![
            ("Food", Decimal::new(4750, 2)),
            ("Bills", Decimal::new(4000, 2)),
            ("Transport", Decimal::new(1000, 2)),
            ("Others", Decimal::new(300, 2)),
        ]
    );
    let months: Vec<_> = s.by_month.keys().cloned().collect();
    assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);
}

#[test]
fn date_bounds_are_inclusive() {
    let from = NaiveDate::from_ymd_opt(2024, 1, 20);
    let to = NaiveDate::from_ymd_opt(2024, 2, 10);
    let s = summarize(&sample(), Ledger::Personal, from, to);
    assert_eq!(s.count, 2);
    assert_eq!(s.total, Decimal::new(6500, 2));
    assert_eq!(s.net_partner, Decimal::new(-4000, 2));
}

#[test]
fn empty_input_is_zero() {
    let s = summarize(&[], Ledger::Joint, None, None);
    assert_eq!(s.count, 0);
    assert_eq!(s.total, Decimal::ZERO);
    assert_eq!(s.spent, Decimal::ZERO);
    assert!(s.by_category.is_empty());
}
