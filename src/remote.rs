// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Remote tier: a PostgREST endpoint (as exposed by Supabase).
//!
//! Every row is scoped by the shared owner id and the ledger. The store only
//! talks to the remote through [`RemoteStore`], so tests can swap in an
//! in-process fake.

use crate::config::{RemoteConfig, SettingsLayout};
use crate::errors::{Result, StoreError};
use crate::models::{Ledger, NewTransaction, Transaction};
use crate::settings::{AccountConfig, WorkspaceSettings};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Rows for (owner, ledger), newest date first.
    async fn list_transactions(&self, owner: &str, ledger: Ledger) -> Result<Vec<Transaction>>;

    async fn insert_transaction(
        &self,
        owner: &str,
        ledger: Ledger,
        draft: &NewTransaction,
    ) -> Result<()>;

    async fn delete_transaction(&self, owner: &str, id: &str) -> Result<()>;

    async fn fetch_settings(&self, owner: &str, ledger: Ledger)
    -> Result<Option<WorkspaceSettings>>;

    async fn upsert_settings(
        &self,
        owner: &str,
        ledger: Ledger,
        settings: &WorkspaceSettings,
    ) -> Result<()>;

    /// Cheap round trip used to test connectivity and credentials.
    async fn ping(&self) -> Result<()>;
}

const TRANSACTIONS: &str = "transactions";
const WORKSPACE_SETTINGS: &str = "workspace_settings";
const CATEGORIES: &str = "categories";
const ACCOUNT_LABELS: &str = "account_labels";

#[derive(Debug, Deserialize)]
struct TransactionRow {
    #[serde(deserialize_with = "id_as_string")]
    id: String,
    date: NaiveDate,
    amount: Decimal,
    spending_category: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    sub_category: String,
    account_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    remarks: String,
}

impl TransactionRow {
    fn into_transaction(self, ledger: Ledger) -> Transaction {
        Transaction {
            id: self.id,
            date: self.date,
            amount: self.amount,
            spending_category: self.spending_category,
            sub_category: self.sub_category,
            account_type: self.account_type,
            remarks: self.remarks,
            ledger,
        }
    }
}

#[derive(Debug, Serialize)]
struct NewTransactionRow<'a> {
    #[serde(flatten)]
    draft: &'a NewTransaction,
    user_id: &'a str,
    ledger: Ledger,
}

#[derive(Debug, Deserialize)]
struct SettingsRow {
    settings: WorkspaceSettings,
}

#[derive(Debug, Serialize)]
struct SettingsUpsert<'a> {
    user_id: &'a str,
    ledger: Ledger,
    settings: &'a WorkspaceSettings,
}

#[derive(Debug, Deserialize)]
struct CategoryRow {
    name: String,
    #[serde(default)]
    sub_categories: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct CategoryInsert<'a> {
    user_id: &'a str,
    ledger: Ledger,
    name: &'a str,
    sub_categories: &'a [String],
    position: usize,
}

#[derive(Debug, Deserialize)]
struct LabelRow {
    key: String,
    label: String,
    color: String,
}

#[derive(Debug, Serialize)]
struct LabelInsert<'a> {
    user_id: &'a str,
    ledger: Ledger,
    key: &'a str,
    label: &'a str,
    color: &'a str,
    position: usize,
}

fn id_as_string<'de, D>(d: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(d)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("unsupported id value {}", other))),
    }
}

fn null_as_empty<'de, D>(d: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

fn scope(owner: &str, ledger: Ledger) -> [(&'static str, String); 2] {
    [
        ("user_id", format!("eq.{}", owner)),
        ("ledger", format!("eq.{}", ledger.as_str())),
    ]
}

/// Normalized reads are ordered by the `position` column that
/// [`normalized_rows`] writes.
fn normalized_query(owner: &str, ledger: Ledger, columns: &str) -> Vec<(&'static str, String)> {
    let mut query = scope(owner, ledger).to_vec();
    query.push(("select", columns.to_string()));
    query.push(("order", "position.asc".to_string()));
    query
}

/// Category and label rows for the normalized layout, default label first.
fn normalized_rows<'a>(
    owner: &'a str,
    ledger: Ledger,
    settings: &'a WorkspaceSettings,
) -> (Vec<CategoryInsert<'a>>, Vec<LabelInsert<'a>>) {
    let cats = settings
        .categories
        .iter()
        .enumerate()
        .map(|(position, (name, subs))| CategoryInsert {
            user_id: owner,
            ledger,
            name,
            sub_categories: subs,
            position,
        })
        .collect();
    let default_first = settings
        .account_configs
        .get_key_value(&settings.default_account_type)
        .into_iter()
        .chain(
            settings
                .account_configs
                .iter()
                .filter(|(k, _)| **k != settings.default_account_type),
        );
    let labels = default_first
        .enumerate()
        .map(|(position, (key, cfg))| LabelInsert {
            user_id: owner,
            ledger,
            key,
            label: &cfg.label,
            color: &cfg.color,
            position,
        })
        .collect();
    (cats, labels)
}

/// Compose settings from normalized rows. The first label becomes the
/// default because the label table carries no default marker.
fn compose_settings(cats: Vec<CategoryRow>, labels: Vec<LabelRow>) -> Option<WorkspaceSettings> {
    if cats.is_empty() && labels.is_empty() {
        return None;
    }
    let default_account_type = labels.first().map(|l| l.key.clone()).unwrap_or_default();
    Some(WorkspaceSettings {
        categories: cats
            .into_iter()
            .map(|c| (c.name, c.sub_categories.unwrap_or_default()))
            .collect(),
        account_configs: labels
            .into_iter()
            .map(|l| {
                (
                    l.key,
                    AccountConfig {
                        label: l.label,
                        color: l.color,
                        description: String::new(),
                    },
                )
            })
            .collect(),
        default_account_type,
    })
}

#[derive(Debug, Clone)]
pub struct PostgrestStore {
    client: reqwest::Client,
    base_url: String,
    key: String,
    layout: SettingsLayout,
}

impl PostgrestStore {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        Ok(Self {
            client: crate::utils::http_client()?,
            base_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
            key: config.key.clone(),
            layout: config.layout,
        })
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(&self.key)
            .map_err(|_| StoreError::config("access key contains invalid header characters"))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.key))
            .map_err(|_| StoreError::config("access key contains invalid header characters"))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    fn table(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::api(status.as_u16(), body))
    }

    async fn get_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let response = self
            .client
            .get(self.table(table))
            .headers(self.headers()?)
            .query(query)
            .send()
            .await?;
        let body = Self::check(response).await?.text().await?;
        debug!("GET {} -> {} bytes", table, body.len());
        Ok(serde_json::from_str(&body)?)
    }

    async fn post_rows<T: Serialize + ?Sized>(
        &self,
        table: &str,
        query: &[(&str, String)],
        prefer: &'static str,
        rows: &T,
    ) -> Result<()> {
        let response = self
            .client
            .post(self.table(table))
            .headers(self.headers()?)
            .header("Prefer", prefer)
            .query(query)
            .json(rows)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete_rows(&self, table: &str, query: &[(&str, String)]) -> Result<()> {
        let response = self
            .client
            .delete(self.table(table))
            .headers(self.headers()?)
            .query(query)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn fetch_normalized(&self, owner: &str, ledger: Ledger) -> Result<Option<WorkspaceSettings>> {
        let query = normalized_query(owner, ledger, "name,sub_categories");
        let cats: Vec<CategoryRow> = self.get_rows(CATEGORIES, &query).await?;

        let query = normalized_query(owner, ledger, "key,label,color");
        let labels: Vec<LabelRow> = self.get_rows(ACCOUNT_LABELS, &query).await?;

        Ok(compose_settings(cats, labels))
    }

    async fn replace_normalized(
        &self,
        owner: &str,
        ledger: Ledger,
        settings: &WorkspaceSettings,
    ) -> Result<()> {
        let (cats, labels) = normalized_rows(owner, ledger, settings);

        self.delete_rows(CATEGORIES, &scope(owner, ledger)).await?;
        if !cats.is_empty() {
            self.post_rows(CATEGORIES, &[], "return=minimal", &cats)
                .await?;
        }
        self.delete_rows(ACCOUNT_LABELS, &scope(owner, ledger))
            .await?;
        self.post_rows(ACCOUNT_LABELS, &[], "return=minimal", &labels)
            .await
    }
}

#[async_trait]
impl RemoteStore for PostgrestStore {
    async fn list_transactions(&self, owner: &str, ledger: Ledger) -> Result<Vec<Transaction>> {
        let mut query = scope(owner, ledger).to_vec();
        query.push(("select", "*".to_string()));
        query.push(("order", "date.desc".to_string()));
        let rows: Vec<TransactionRow> = self.get_rows(TRANSACTIONS, &query).await?;
        Ok(rows
            .into_iter()
            .map(|r| r.into_transaction(ledger))
            .collect())
    }

    async fn insert_transaction(
        &self,
        owner: &str,
        ledger: Ledger,
        draft: &NewTransaction,
    ) -> Result<()> {
        let row = NewTransactionRow {
            draft,
            user_id: owner,
            ledger,
        };
        self.post_rows(TRANSACTIONS, &[], "return=minimal", &[row])
            .await
    }

    async fn delete_transaction(&self, owner: &str, id: &str) -> Result<()> {
        let query = [
            ("id", format!("eq.{}", id)),
            ("user_id", format!("eq.{}", owner)),
        ];
        self.delete_rows(TRANSACTIONS, &query).await
    }

    async fn fetch_settings(
        &self,
        owner: &str,
        ledger: Ledger,
    ) -> Result<Option<WorkspaceSettings>> {
        let settings = match self.layout {
            SettingsLayout::Document => {
                let mut query = scope(owner, ledger).to_vec();
                query.push(("select", "settings".to_string()));
                query.push(("limit", "1".to_string()));
                let rows: Vec<SettingsRow> = self.get_rows(WORKSPACE_SETTINGS, &query).await?;
                rows.into_iter().next().map(|r| r.settings)
            }
            SettingsLayout::Normalized => self.fetch_normalized(owner, ledger).await?,
        };
        if let Some(s) = &settings {
            s.validate()?;
        }
        Ok(settings)
    }

    async fn upsert_settings(
        &self,
        owner: &str,
        ledger: Ledger,
        settings: &WorkspaceSettings,
    ) -> Result<()> {
        match self.layout {
            SettingsLayout::Document => {
                let row = SettingsUpsert {
                    user_id: owner,
                    ledger,
                    settings,
                };
                self.post_rows(
                    WORKSPACE_SETTINGS,
                    &[("on_conflict", "user_id,ledger".to_string())],
                    "resolution=merge-duplicates,return=minimal",
                    &[row],
                )
                .await
            }
            SettingsLayout::Normalized => self.replace_normalized(owner, ledger, settings).await,
        }
    }

    async fn ping(&self) -> Result<()> {
        let (table, column) = match self.layout {
            SettingsLayout::Document => (WORKSPACE_SETTINGS, "ledger"),
            SettingsLayout::Normalized => (CATEGORIES, "name"),
        };
        let query = [("select", column.to_string()), ("limit", "1".to_string())];
        let _: Vec<serde_json::Value> = self.get_rows(table, &query).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transaction_row_accepts_numeric_id_and_null_text() {
        let row: TransactionRow = serde_json::from_value(json!({
            "id": 42,
            "date": "2024-01-05",
            "amount": 15.5,
            "spending_category": "Food",
            "sub_category": null,
            "account_type": "OWN_EXPENSE",
            "remarks": null,
            "ledger": "Personal",
            "user_id": "00000000-0000-0000-0000-000000000000"
        }))
        .unwrap();
        let tx = row.into_transaction(Ledger::Personal);
        assert_eq!(tx.id, "42");
        assert_eq!(tx.amount, Decimal::new(1550, 2));
        assert_eq!(tx.sub_category, "");
        assert_eq!(tx.remarks, "");
    }

    #[test]
    fn insert_row_is_tagged_with_owner_and_ledger() {
        let draft = NewTransaction {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            amount: Decimal::new(1550, 2),
            spending_category: "Food".into(),
            sub_category: "Hawker".into(),
            account_type: "OWN_EXPENSE".into(),
            remarks: "lunch".into(),
        };
        let v = serde_json::to_value(NewTransactionRow {
            draft: &draft,
            user_id: "owner-1",
            ledger: Ledger::Joint,
        })
        .unwrap();
        assert_eq!(v["user_id"], "owner-1");
        assert_eq!(v["ledger"], "Joint");
        assert_eq!(v["spending_category"], "Food");
        assert_eq!(v["date"], "2024-01-05");
        assert!(v.get("id").is_none());
    }

    #[test]
    fn normalized_rows_compose_with_first_label_as_default() {
        let cats = vec![CategoryRow {
            name: "Food".into(),
            sub_categories: Some(vec!["Hawker".into()]),
        }];
        let labels = vec![
            LabelRow {
                key: "B".into(),
                label: "Bee".into(),
                color: "rose".into(),
            },
            LabelRow {
                key: "A".into(),
                label: "Ay".into(),
                color: "blue".into(),
            },
        ];
        let s = compose_settings(cats, labels).unwrap();
        assert_eq!(s.default_account_type, "B");
        assert_eq!(s.categories["Food"], vec!["Hawker".to_string()]);
        assert!(s.validate().is_ok());
        assert!(compose_settings(Vec::new(), Vec::new()).is_none());
    }

    #[test]
    fn normalized_rows_keep_order_with_default_first() {
        let mut settings = WorkspaceSettings::default();
        settings.set_default_label("OWED_TO_SHARED").unwrap();
        let (cats, labels) = normalized_rows("owner-1", Ledger::Personal, &settings);

        let cats = serde_json::to_value(&cats).unwrap();
        assert_eq!(cats[0]["name"], "Food");
        assert_eq!(cats[0]["position"], 0);
        assert_eq!(cats[5]["name"], "Others");
        assert_eq!(cats[5]["position"], 5);

        let labels = serde_json::to_value(&labels).unwrap();
        assert_eq!(labels[0]["key"], "OWED_TO_SHARED");
        assert_eq!(labels[0]["position"], 0);
        assert_eq!(labels[1]["key"], "OWN_EXPENSE");
        assert_eq!(labels[1]["position"], 1);
        assert_eq!(labels.as_array().unwrap().len(), 5);
    }

    #[test]
    fn normalized_reads_request_position_order() {
        let q = normalized_query("abc", Ledger::Joint, "key,label,color");
        assert!(q.contains(&("order", "position.asc".to_string())));
        assert!(q.contains(&("select", "key,label,color".to_string())));
        assert!(q.contains(&("ledger", "eq.Joint".to_string())));
    }

    #[test]
    fn scope_filters_use_postgrest_eq() {
        let q = scope("abc", Ledger::Personal);
        assert_eq!(q[0], ("user_id", "eq.abc".to_string()));
        assert_eq!(q[1], ("ledger", "eq.Personal".to_string()));
    }
}
