// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-ledger workspace settings: spending categories and account labels.

use crate::errors::SettingsError;
use crate::models::NewTransaction;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub type CategoryMap = IndexMap<String, Vec<String>>;
pub type AccountConfigs = IndexMap<String, AccountConfig>;

pub const COLOR_PALETTE: [&str; 10] = [
    "blue", "emerald", "rose", "amber", "violet", "indigo", "cyan", "pink", "orange", "slate",
];

pub const DEFAULT_ACCOUNT_TYPE: &str = "OWN_EXPENSE";
pub const OWED_TO_PARTNER: &str = "OWED_TO_PARTNER";
pub const OWED_BY_PARTNER: &str = "OWED_BY_PARTNER";
pub const OWED_TO_SHARED: &str = "OWED_TO_SHARED";
pub const OWED_BY_SHARED: &str = "OWED_BY_SHARED";
/// Prefix of keys generated by [`WorkspaceSettings::add_label`].
pub const USER_LABEL_PREFIX: &str = "USER_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub label: String,
    pub color: String,
    #[serde(default)]
    pub description: String,
}

impl AccountConfig {
    pub fn new(label: &str, color: &str, description: &str) -> Self {
        Self {
            label: label.to_string(),
            color: color.to_string(),
            description: description.to_string(),
        }
    }
}

/// Partial update for an account label; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountConfigUpdate {
    pub label: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSettings {
    pub categories: CategoryMap,
    pub account_configs: AccountConfigs,
    pub default_account_type: String,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        let categories: CategoryMap = [
            (
                "Food",
                vec!["Restaurant", "Dessert/Bread", "Hawker", "Cafe", "Fast Food"],
            ),
            (
                "Groceries",
                vec!["Supermarket", "Wet Market", "Health/Personal Care"],
            ),
            (
                "Transport",
                vec!["Public (Bus/Train)", "Taxi/Grab", "Fuel", "Parking"],
            ),
            (
                "Shopping",
                vec!["Clothes", "Electronics", "Home/Living", "Gifts"],
            ),
            (
                "Bills",
                vec!["Utilities", "Mobile/Wifi", "Subscriptions", "Insurance"],
            ),
            ("Others", vec!["Misc", "Entertainment", "Medical"]),
        ]
        .into_iter()
        .map(|(name, subs)| {
            (
                name.to_string(),
                subs.into_iter().map(String::from).collect(),
            )
        })
        .collect();

        let account_configs: AccountConfigs = [
            (
                DEFAULT_ACCOUNT_TYPE,
                AccountConfig::new(
                    "Personal Spending",
                    "blue",
                    "Transactions that are purely your own expenses.",
                ),
            ),
            (
                OWED_TO_PARTNER,
                AccountConfig::new(
                    "Owed to Partner",
                    "rose",
                    "Money you spent that you owe back to your partner.",
                ),
            ),
            (
                OWED_BY_PARTNER,
                AccountConfig::new(
                    "Owed by Partner",
                    "emerald",
                    "Money your partner owes you (e.g., you paid for them).",
                ),
            ),
            (
                OWED_TO_SHARED,
                AccountConfig::new(
                    "Owed to Shared Fund",
                    "amber",
                    "Money you owe or need to contribute to the joint fund.",
                ),
            ),
            (
                OWED_BY_SHARED,
                AccountConfig::new(
                    "Owed by Shared Fund",
                    "violet",
                    "Money the joint fund owes you (e.g., reimbursements).",
                ),
            ),
        ]
        .into_iter()
        .map(|(key, cfg)| (key.to_string(), cfg))
        .collect();

        Self {
            categories,
            account_configs,
            default_account_type: DEFAULT_ACCOUNT_TYPE.to_string(),
        }
    }
}

fn clean_name(kind: &'static str, raw: &str) -> Result<String, SettingsError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(SettingsError::EmptyName(kind));
    }
    Ok(name.to_string())
}

impl WorkspaceSettings {
    /// Check every invariant a stored settings document must hold.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.account_configs.is_empty() {
            return Err(SettingsError::LastLabel);
        }
        if !self
            .account_configs
            .contains_key(&self.default_account_type)
        {
            return Err(SettingsError::DefaultMissing(
                self.default_account_type.clone(),
            ));
        }
        for (name, subs) in &self.categories {
            if name.trim().is_empty() {
                return Err(SettingsError::EmptyName("Category"));
            }
            for (i, sub) in subs.iter().enumerate() {
                if sub.trim().is_empty() {
                    return Err(SettingsError::EmptyName("Sub-category"));
                }
                if subs[..i].contains(sub) {
                    return Err(SettingsError::duplicate("Sub-category", sub.as_str()));
                }
            }
        }
        for key in self.account_configs.keys() {
            if key.trim().is_empty() {
                return Err(SettingsError::EmptyName("Account label"));
            }
        }
        Ok(())
    }

    pub fn add_category(&mut self, raw: &str) -> Result<(), SettingsError> {
        let name = clean_name("Category", raw)?;
        if self.categories.contains_key(&name) {
            return Err(SettingsError::duplicate("Category", name));
        }
        self.categories.insert(name, Vec::new());
        Ok(())
    }

    /// Removes a category together with its sub-categories.
    pub fn remove_category(&mut self, name: &str) -> Result<Vec<String>, SettingsError> {
        self.categories
            .shift_remove(name.trim())
            .ok_or_else(|| SettingsError::not_found("Category", name.trim()))
    }

    pub fn add_sub_category(&mut self, category: &str, raw: &str) -> Result<(), SettingsError> {
        let sub = clean_name("Sub-category", raw)?;
        let subs = self
            .categories
            .get_mut(category.trim())
            .ok_or_else(|| SettingsError::not_found("Category", category.trim()))?;
        if subs.contains(&sub) {
            return Err(SettingsError::duplicate("Sub-category", sub));
        }
        subs.push(sub);
        Ok(())
    }

    pub fn remove_sub_category(&mut self, category: &str, sub: &str) -> Result<(), SettingsError> {
        let subs = self
            .categories
            .get_mut(category.trim())
            .ok_or_else(|| SettingsError::not_found("Category", category.trim()))?;
        let before = subs.len();
        subs.retain(|s| s != sub.trim());
        if subs.len() == before {
            return Err(SettingsError::not_found("Sub-category", sub.trim()));
        }
        Ok(())
    }

    /// Adds a user-defined label and returns its generated key.
    pub fn add_label(
        &mut self,
        raw_label: &str,
        color: Option<&str>,
        description: &str,
    ) -> Result<String, SettingsError> {
        let label = clean_name("Account label", raw_label)?;
        let color = match color {
            Some(c) => check_color(c)?,
            None => COLOR_PALETTE[self.account_configs.len() % COLOR_PALETTE.len()].to_string(),
        };
        let mut stamp = chrono::Utc::now().timestamp_millis();
        let mut key = format!("{}{}", USER_LABEL_PREFIX, stamp);
        while self.account_configs.contains_key(&key) {
            stamp += 1;
            key = format!("{}{}", USER_LABEL_PREFIX, stamp);
        }
        self.account_configs.insert(
            key.clone(),
            AccountConfig {
                label,
                color,
                description: description.trim().to_string(),
            },
        );
        Ok(key)
    }

    pub fn update_label(
        &mut self,
        key: &str,
        update: AccountConfigUpdate,
    ) -> Result<(), SettingsError> {
        let color = update.color.as_deref().map(check_color).transpose()?;
        let label = update
            .label
            .as_deref()
            .map(|l| clean_name("Account label", l))
            .transpose()?;
        let cfg = self
            .account_configs
            .get_mut(key)
            .ok_or_else(|| SettingsError::not_found("Account label", key))?;
        if let Some(label) = label {
            cfg.label = label;
        }
        if let Some(color) = color {
            cfg.color = color;
        }
        if let Some(description) = update.description {
            cfg.description = description.trim().to_string();
        }
        Ok(())
    }

    /// Removes a label. When it was the default, the first remaining key
    /// becomes the new default. The last label can never be removed.
    pub fn remove_label(&mut self, key: &str) -> Result<AccountConfig, SettingsError> {
        if !self.account_configs.contains_key(key) {
            return Err(SettingsError::not_found("Account label", key));
        }
        if self.account_configs.len() <= 1 {
            return Err(SettingsError::LastLabel);
        }
        let removed = self
            .account_configs
            .shift_remove(key)
            .ok_or_else(|| SettingsError::not_found("Account label", key))?;
        if self.default_account_type == key {
            if let Some(first) = self.account_configs.keys().next() {
                self.default_account_type = first.clone();
            }
        }
        Ok(removed)
    }

    pub fn set_default_label(&mut self, key: &str) -> Result<(), SettingsError> {
        if !self.account_configs.contains_key(key) {
            return Err(SettingsError::not_found("Account label", key));
        }
        self.default_account_type = key.to_string();
        Ok(())
    }

    /// Checks that a draft only references categories and labels defined here.
    pub fn check_transaction(&self, draft: &NewTransaction) -> Result<(), SettingsError> {
        let subs = self
            .categories
            .get(&draft.spending_category)
            .ok_or_else(|| SettingsError::not_found("Category", draft.spending_category.as_str()))?;
        if !draft.sub_category.is_empty() && !subs.contains(&draft.sub_category) {
            return Err(SettingsError::not_found(
                "Sub-category",
                draft.sub_category.as_str(),
            ));
        }
        if !self.account_configs.contains_key(&draft.account_type) {
            return Err(SettingsError::not_found(
                "Account label",
                draft.account_type.as_str(),
            ));
        }
        Ok(())
    }
}

fn check_color(raw: &str) -> Result<String, SettingsError> {
    let color = raw.trim().to_ascii_lowercase();
    if COLOR_PALETTE.contains(&color.as_str()) {
        Ok(color)
    } else {
        Err(SettingsError::UnknownColor(raw.trim().to_string()))
    }
}
