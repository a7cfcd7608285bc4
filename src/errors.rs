// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error types for the ledger store.
//!
//! Remote and local failures are folded into [`StoreError`]; the facade logs
//! them and falls back instead of returning them. [`SettingsError`] is the one
//! kind callers see, raised when a settings document breaks its invariants.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Local cache error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Remote error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Remote configuration error: {0}")]
    Config(String),

    #[error("Remote returned invalid settings: {0}")]
    InvalidSettings(#[from] SettingsError),

    #[error("Local cache lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Violations of the workspace settings invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    #[error("{kind} '{name}' already exists")]
    Duplicate { kind: &'static str, name: String },

    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    #[error("At least one account label is required")]
    LastLabel,

    #[error("Default account label '{0}' is not defined")]
    DefaultMissing(String),

    #[error("Unknown color '{0}'")]
    UnknownColor(String),
}

impl SettingsError {
    pub fn duplicate(kind: &'static str, name: impl Into<String>) -> Self {
        Self::Duplicate {
            kind,
            name: name.into(),
        }
    }

    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }
}
