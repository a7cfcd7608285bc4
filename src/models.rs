// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workspace partition. Every transaction and settings document belongs to
/// exactly one ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ledger {
    Personal,
    Joint,
}

impl Ledger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ledger::Personal => "Personal",
            Ledger::Joint => "Joint",
        }
    }
}

impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ledger {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "personal" => Ok(Ledger::Personal),
            "joint" => Ok(Ledger::Joint),
            other => Err(anyhow::anyhow!(
                "Unknown ledger '{}', expected personal|joint",
                other
            )),
        }
    }
}

/// A confirmed transaction draft, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub spending_category: String,
    #[serde(default)]
    pub sub_category: String,
    pub account_type: String,
    #[serde(default)]
    pub remarks: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub spending_category: String,
    #[serde(default)]
    pub sub_category: String,
    pub account_type: String,
    #[serde(default)]
    pub remarks: String,
    pub ledger: Ledger,
}

impl Transaction {
    pub fn from_draft(id: impl Into<String>, ledger: Ledger, draft: NewTransaction) -> Self {
        Self {
            id: id.into(),
            date: draft.date,
            amount: draft.amount,
            spending_category: draft.spending_category,
            sub_category: draft.sub_category,
            account_type: draft.account_type,
            remarks: draft.remarks,
            ledger,
        }
    }

    pub fn to_draft(&self) -> NewTransaction {
        NewTransaction {
            date: self.date,
            amount: self.amount,
            spending_category: self.spending_category.clone(),
            sub_category: self.sub_category.clone(),
            account_type: self.account_type.clone(),
            remarks: self.remarks.clone(),
        }
    }

    /// Field-wise equality ignoring the id, which differs between tiers.
    pub fn matches_draft(&self, draft: &NewTransaction) -> bool {
        self.date == draft.date
            && self.amount == draft.amount
            && self.spending_category == draft.spending_category
            && self.sub_category == draft.sub_category
            && self.account_type == draft.account_type
            && self.remarks == draft.remarks
    }
}

/// Local writes that have not reached a configured remote yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outbox {
    #[serde(default)]
    pub creates: Vec<Transaction>,
    #[serde(default)]
    pub deletes: Vec<String>,
    #[serde(default)]
    pub settings_dirty: bool,
}

impl Outbox {
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.deletes.is_empty() && !self.settings_dirty
    }
}
