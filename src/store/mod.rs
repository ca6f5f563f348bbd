// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Row storage and auth behind one trait.
//!
//! [`RemoteStore`] is the only thing views talk to. [`rest::RestStore`] speaks
//! to a hosted PostgREST/GoTrue project; [`local::LocalStore`] keeps the same
//! tables in SQLite.

pub mod local;
pub mod rest;

use anyhow::Result;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{Backend, Config};
use crate::models::{Category, NewTransaction, Transaction, TransactionPatch, User, UserUpdate};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not signed in; run `fintrack auth login`")]
    NotSignedIn,
    #[error("{0}")]
    Unsupported(&'static str),
    #[error("invalid {column} value '{value}'")]
    InvalidRow { column: &'static str, value: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// Filter for transaction selects. Date bounds are inclusive and rows are
/// always ordered by date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub order: SortOrder,
    pub limit: Option<usize>,
}

impl TxQuery {
    /// Everything between two dates, oldest first.
    pub fn window(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            order: SortOrder::Ascending,
            limit: None,
        }
    }

    /// Whole ledger, newest first.
    pub fn ledger() -> Self {
        Self {
            from: None,
            to: None,
            order: SortOrder::Descending,
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

pub trait RemoteStore {
    fn select_transactions(&self, query: &TxQuery) -> StoreResult<Vec<Transaction>>;

    fn insert_transaction(&self, row: &NewTransaction) -> StoreResult<()>;

    fn update_transaction(&self, id: Uuid, patch: &TransactionPatch) -> StoreResult<()>;

    /// Removing an id that is not there succeeds.
    fn delete_transaction(&self, id: Uuid) -> StoreResult<()>;

    fn select_categories(&self) -> StoreResult<Vec<Category>>;

    /// `None` when there is no signed-in user.
    fn current_user(&self) -> StoreResult<Option<User>>;

    fn update_user(&self, update: &UserUpdate) -> StoreResult<User>;
}

/// Open the store selected by `config`.
pub fn open(config: &Config) -> Result<Box<dyn RemoteStore>> {
    match &config.backend {
        Backend::Local => Ok(Box::new(local::LocalStore::open_default()?)),
        Backend::Rest { url, anon_key } => {
            let path = crate::config::session_path()?;
            Ok(Box::new(rest::RestStore::with_session_file(url, anon_key, path)?))
        }
    }
}
