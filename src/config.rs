// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Remote connectivity and owner resolution.
//!
//! The remote counts as configured only when a complete, well-formed pair of
//! endpoint URL and access key comes from a single source. Environment values
//! win over values the user saved locally. Placeholders such as
//! `https://your-project.supabase.co` are rejected outright so a template
//! `.env` reads as "not configured".

use crate::cache::LocalCache;
use crate::errors::{Result, StoreError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

pub const ENV_URL: &str = "SUPABASE_URL";
pub const ENV_KEY: &str = "SUPABASE_ANON_KEY";
pub const ENV_OWNER: &str = "EDEN_OWNER_ID";
pub const ENV_LAYOUT: &str = "EDEN_SETTINGS_LAYOUT";

pub const LOCAL_URL: &str = "remote_url";
pub const LOCAL_KEY: &str = "remote_key";
pub const LOCAL_OWNER: &str = "owner_id";
pub const LOCAL_LAYOUT: &str = "settings_layout";

pub const DEFAULT_OWNER_ID: &str = "00000000-0000-0000-0000-000000000000";

const MIN_KEY_LEN: usize = 21;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(your[-_ ]|placeholder|changeme|example|<[^>]*>|^x{3,}|\.\.\.)")
        .expect("placeholder pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Environment,
    Local,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Environment => f.write_str("environment"),
            ConfigSource::Local => f.write_str("local"),
        }
    }
}

/// How workspace settings are laid out on the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsLayout {
    /// One JSON document per (owner, ledger) in `workspace_settings`.
    #[default]
    Document,
    /// Rows in `categories` and `account_labels`.
    Normalized,
}

impl SettingsLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsLayout::Document => "document",
            SettingsLayout::Normalized => "normalized",
        }
    }
}

impl FromStr for SettingsLayout {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" => Ok(SettingsLayout::Document),
            "normalized" => Ok(SettingsLayout::Normalized),
            other => Err(anyhow::anyhow!(
                "Unknown settings layout '{}', expected document|normalized",
                other
            )),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub url: String,
    pub key: String,
    pub layout: SettingsLayout,
    pub source: ConfigSource,
}

impl RemoteConfig {
    /// Last eight characters of the key, for status output.
    pub fn key_suffix(&self) -> String {
        let start = self
            .key
            .char_indices()
            .rev()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(0);
        format!("...{}", &self.key[start..])
    }
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("url", &self.url)
            .field("key", &self.key_suffix())
            .field("layout", &self.layout)
            .field("source", &self.source)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub remote: Option<RemoteConfig>,
    pub owner_id: String,
}

fn is_placeholder(v: &str) -> bool {
    PLACEHOLDER.is_match(v)
}

/// Returns the trimmed URL if it is a usable `https` endpoint.
pub fn valid_url(raw: &str) -> Option<String> {
    let url = raw.trim();
    if url.is_empty() || is_placeholder(url) {
        return None;
    }
    let parsed = reqwest::Url::parse(url).ok()?;
    if parsed.scheme() != "https" || parsed.host_str().is_none_or(str::is_empty) {
        return None;
    }
    Some(url.trim_end_matches('/').to_string())
}

/// Returns the trimmed key if it passes the length and format check.
pub fn valid_key(raw: &str) -> Option<String> {
    let key = raw.trim();
    if key.len() < MIN_KEY_LEN || key.chars().any(char::is_whitespace) || is_placeholder(key) {
        return None;
    }
    Some(key.to_string())
}

fn pair(url: Option<String>, key: Option<String>) -> Option<(String, String)> {
    Some((valid_url(url.as_deref()?)?, valid_key(key.as_deref()?)?))
}

/// Resolve remote connectivity and owner id.
///
/// `env` looks up process configuration; `local` looks up values the user
/// saved. Each pair is taken whole from one source.
pub fn resolve<E, L>(env: E, local: L) -> ResolvedConfig
where
    E: Fn(&str) -> Option<String>,
    L: Fn(&str) -> Option<String>,
{
    let from_env = pair(env(ENV_URL), env(ENV_KEY)).map(|p| (p, ConfigSource::Environment));
    let from_local = || pair(local(LOCAL_URL), local(LOCAL_KEY)).map(|p| (p, ConfigSource::Local));

    let layout: SettingsLayout = env(ENV_LAYOUT)
        .or_else(|| local(LOCAL_LAYOUT))
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();

    let remote = from_env
        .or_else(from_local)
        .map(|((url, key), source)| RemoteConfig {
            url,
            key,
            layout,
            source,
        });

    let owner_id = env(ENV_OWNER)
        .or_else(|| local(LOCAL_OWNER))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !is_placeholder(s))
        .unwrap_or_else(|| DEFAULT_OWNER_ID.to_string());

    ResolvedConfig { remote, owner_id }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve against the process environment and the local cache.
pub fn resolve_from(cache: &LocalCache) -> ResolvedConfig {
    resolve(env_var, |k| cache.get(k).ok().flatten())
}

/// Persist user-entered remote settings. Values that would not resolve are
/// rejected instead of stored.
pub fn save_local(
    cache: &LocalCache,
    url: &str,
    key: &str,
    layout: Option<SettingsLayout>,
) -> Result<()> {
    let url = valid_url(url).ok_or_else(|| {
        StoreError::config(format!("'{}' is not a usable https URL", url.trim()))
    })?;
    let key = valid_key(key).ok_or_else(|| {
        StoreError::config("access key is too short or looks like a placeholder")
    })?;
    cache.put(LOCAL_URL, &url)?;
    cache.put(LOCAL_KEY, &key)?;
    if let Some(layout) = layout {
        cache.put(LOCAL_LAYOUT, layout.as_str())?;
    }
    Ok(())
}

pub fn clear_local(cache: &LocalCache) -> Result<()> {
    cache.remove(LOCAL_URL)?;
    cache.remove(LOCAL_KEY)?;
    cache.remove(LOCAL_LAYOUT)?;
    Ok(())
}
